use agrod_core::view::{Badge, DiagnosisBody, DiagnosisView, DiseaseCard, MaturityBlock};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub const fn badge_color(badge: Badge) -> Color {
    match badge {
        Badge::Primary => Color::Blue,
        Badge::Info => Color::Cyan,
        Badge::Warning => Color::Yellow,
        Badge::Success => Color::Green,
        Badge::Secondary => Color::Gray,
    }
}

fn badge(text: impl Into<String>, badge: Badge) -> Span<'static> {
    Span::styled(
        format!(" {} ", text.into()),
        Style::default()
            .fg(Color::Black)
            .bg(badge_color(badge))
            .add_modifier(Modifier::BOLD),
    )
}

pub fn diagnosis_lines(view: &DiagnosisView) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            view.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            view.summary.clone(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];

    match &view.body {
        DiagnosisBody::Message(message) => {
            lines.push(Line::from(format!("- {message}")));
        }
        DiagnosisBody::Cards(cards) => {
            for card in cards {
                card_lines(card, &mut lines);
            }
        }
    }

    lines
}

fn card_lines(card: &DiseaseCard, lines: &mut Vec<Line<'static>>) {
    lines.push(Line::from(vec![
        Span::styled(
            card.name.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        badge(card.confidence_label(), Badge::Primary),
    ]));
    lines.push(Line::from(card.description.clone()));

    if let Some(maturity) = &card.maturity {
        lines.push(maturity_line(maturity));
    }
    if let Some(severity) = &card.severity {
        lines.push(Line::from(vec![
            Span::styled("Severity: ", Style::default().fg(Color::Yellow)),
            Span::raw(severity.clone()),
        ]));
    }

    lines.push(Line::from(Span::styled(
        "Recommended Treatments:",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for treatment in &card.treatments {
        lines.push(Line::from(format!("- {}", treatment.summary())));
        for detail in treatment.details() {
            lines.push(Line::from(Span::styled(
                format!("    {detail}"),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    lines.push(Line::from(""));
}

fn maturity_line(maturity: &MaturityBlock) -> Line<'static> {
    Line::from(vec![
        Span::raw("Maturity: "),
        badge(maturity.level_label.clone(), maturity.level_badge),
        Span::raw(format!(" Coconuts: {} ", maturity.coconut_count)),
        badge(maturity.harvest_label(), maturity.harvest_badge()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrod_core::view::TreatmentLine;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|span| span.content.as_ref()).collect()
    }

    #[test]
    fn healthy_view_prints_its_message() {
        let view = DiagnosisView {
            title: "No Disease Detected".to_string(),
            summary: "Your crop appears to be healthy.".to_string(),
            body: DiagnosisBody::Message("No pesticides needed at this time.".to_string()),
        };

        let lines = diagnosis_lines(&view);
        assert_eq!(text(&lines[0]), "No Disease Detected");
        assert_eq!(text(&lines[3]), "- No pesticides needed at this time.");
    }

    #[test]
    fn card_lists_treatments_and_details() {
        let view = DiagnosisView {
            title: "Disease Detected".to_string(),
            summary: "1 issue found".to_string(),
            body: DiagnosisBody::Cards(vec![DiseaseCard {
                name: "Leaf Curl".to_string(),
                confidence: 87.4,
                description: "Curling leaves.".to_string(),
                maturity: None,
                severity: Some("High".to_string()),
                treatments: vec![TreatmentLine::Pesticide {
                    name: "Neem Oil".to_string(),
                    description: "Botanical spray".to_string(),
                    application_rate: Some("5 ml/L".to_string()),
                    eco_friendly: Some(true),
                    effectiveness: None,
                }],
            }]),
        };

        let rendered: Vec<String> = diagnosis_lines(&view).iter().map(text).collect();
        assert!(rendered.contains(&"Leaf Curl  87% Match ".to_string()));
        assert!(rendered.contains(&"Severity: High".to_string()));
        assert!(rendered.contains(&"- Neem Oil: Botanical spray".to_string()));
        assert!(rendered.contains(&"    Application Rate: 5 ml/L".to_string()));
        assert!(rendered.contains(&"    Eco-friendly".to_string()));
    }
}
