use agrod_core::raster::half_block_side;
use agrod_core::simulation::GRASS_DARK;
use agrod_core::view::{Badge, DiagnosisBody, DiagnosisView};
use agrod_core::{FieldSimulation, Level, Notice, Raster, Session};
use ratzilla::ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line as TextLine, Span, Text},
    widgets::{
        canvas::{Canvas, Points},
        Block, Borders, Clear, Paragraph, Wrap,
    },
    Frame,
};

const SCENE_WIDTH: f64 = 500.0;

pub fn render(session: &Session, show_help: bool, f: &mut Frame<'_>) {
    let area = f.area();
    let block = Block::default()
        .title("AGROD Crop Health")
        .title_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area).inner(Margin::new(1, 0));
    f.render_widget(block, area);

    let notices = session.notices().active();
    #[allow(clippy::cast_possible_truncation)]
    let notice_height = notices.len().min(4) as u16;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(notice_height),
            Constraint::Min(10),
            Constraint::Length(1),
        ])
        .split(inner);

    render_header(session, f, layout[0]);
    render_notices(notices, f, layout[1]);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[2]);
    render_detection(session, f, content[0]);
    render_simulation(session, f, content[1]);
    render_footer(session, f, layout[3]);

    if show_help {
        render_help(f, area);
    }
}

fn render_header(session: &Session, f: &mut Frame<'_>, area: Rect) {
    let image = session.image().map_or_else(
        || "none (press o)".to_string(),
        |image| format!("{} ({} KB)", image.file_name, image.byte_len.div_ceil(1024)),
    );
    let line = TextLine::from(vec![
        Span::styled("Crop: ", Style::default().fg(Color::Gray)),
        Span::styled(session.crop().label(), Style::default().fg(Color::White)),
        Span::raw("   "),
        Span::styled("Image: ", Style::default().fg(Color::Gray)),
        Span::styled(image, Style::default().fg(Color::White)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

const fn level_color(level: Level) -> Color {
    match level {
        Level::Info => Color::Cyan,
        Level::Success => Color::Green,
        Level::Warning => Color::Yellow,
        Level::Danger => Color::Red,
    }
}

const fn badge_color(badge: Badge) -> Color {
    match badge {
        Badge::Primary => Color::Blue,
        Badge::Info => Color::Cyan,
        Badge::Warning => Color::Yellow,
        Badge::Success => Color::Green,
        Badge::Secondary => Color::Gray,
    }
}

fn render_notices(notices: &[Notice], f: &mut Frame<'_>, area: Rect) {
    let lines = notices
        .iter()
        .map(|notice| {
            let color = level_color(notice.level);
            TextLine::from(vec![
                Span::styled(
                    format!(" {} ", notice.level.as_str().to_uppercase()),
                    Style::default().fg(Color::Black).bg(color),
                ),
                Span::raw(" "),
                Span::styled(notice.message.clone(), Style::default().fg(color)),
            ])
        })
        .collect::<Vec<_>>();
    f.render_widget(Paragraph::new(Text::from(lines)), area);
}

fn render_detection(session: &Session, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Detection")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let text = if session.is_busy() {
        Text::from(Span::styled(
            "Analyzing image...",
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(diagnosis) = session.diagnosis() {
        diagnosis_text(diagnosis)
    } else {
        Text::from("Press 'o' to choose a crop image, 'c' to switch crop, 'a' to analyze.")
    };

    f.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn diagnosis_text(view: &DiagnosisView) -> Text<'static> {
    let mut lines = vec![
        TextLine::from(Span::styled(
            view.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        TextLine::from(Span::styled(
            view.summary.clone(),
            Style::default().fg(Color::Gray),
        )),
        TextLine::from(""),
    ];

    match &view.body {
        DiagnosisBody::Message(message) => lines.push(TextLine::from(format!("- {message}"))),
        DiagnosisBody::Cards(cards) => {
            for card in cards {
                lines.push(TextLine::from(vec![
                    Span::styled(card.name.clone(), Style::default().fg(Color::Cyan)),
                    Span::raw(" "),
                    Span::styled(
                        card.confidence_label(),
                        Style::default().fg(badge_color(Badge::Primary)),
                    ),
                ]));
                lines.push(TextLine::from(card.description.clone()));
                if let Some(maturity) = &card.maturity {
                    lines.push(TextLine::from(vec![
                        Span::raw("Maturity: "),
                        Span::styled(
                            maturity.level_label.clone(),
                            Style::default().fg(badge_color(maturity.level_badge)),
                        ),
                        Span::raw(format!(" | {} coconuts | ", maturity.coconut_count)),
                        Span::styled(
                            maturity.harvest_label(),
                            Style::default().fg(badge_color(maturity.harvest_badge())),
                        ),
                    ]));
                }
                if let Some(severity) = &card.severity {
                    lines.push(TextLine::from(format!("Severity: {severity}")));
                }
                lines.push(TextLine::from("Recommended Treatments:"));
                for treatment in &card.treatments {
                    lines.push(TextLine::from(format!("- {}", treatment.summary())));
                    for detail in treatment.details() {
                        lines.push(TextLine::from(Span::styled(
                            format!("    {detail}"),
                            Style::default().fg(Color::DarkGray),
                        )));
                    }
                }
                lines.push(TextLine::from(""));
            }
        }
    }

    Text::from(lines)
}

fn render_simulation(session: &Session, f: &mut Frame<'_>, area: Rect) {
    let copy = session.simulation_copy();
    let toggle = session.toggle();
    let block = Block::default()
        .title(copy.title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if toggle.enabled {
            Color::Green
        } else {
            Color::DarkGray
        }));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(inner);

    let toggle_label = match (toggle.enabled, toggle.checked) {
        (false, _) => "[ ] Simulation unavailable",
        (true, false) => "[ ] Simulation off (press s)",
        (true, true) => "[x] Simulation on",
    };
    let selector = session.selector();
    let header = Text::from(vec![
        TextLine::from(Span::styled(copy.description, Style::default().fg(Color::Gray))),
        TextLine::from(toggle_label),
        TextLine::from(vec![
            Span::styled(selector.mode.label(), Style::default().fg(Color::Yellow)),
            Span::raw(format!(
                " {}  (t: change, space: {})",
                selector.selected_label(),
                selector.mode.action_label()
            )),
        ]),
    ]);
    f.render_widget(Paragraph::new(header).wrap(Wrap { trim: true }), rows[0]);

    if toggle.checked {
        if let Some(field) = session.field() {
            render_field(field, f, rows[1]);
        }
    }

    if session.hint_available() {
        f.render_widget(
            Paragraph::new(format!("h {}", session.hint_caption())).alignment(Alignment::Right),
            rows[2],
        );
    }
}

fn render_field(field: &FieldSimulation, f: &mut Frame<'_>, area: Rect) {
    let side = half_block_side(area.width, area.height);
    if side < 2 {
        return;
    }
    let square = Rect {
        x: area.x + (area.width - side) / 2,
        y: area.y + (area.height - side / 2) / 2,
        width: side,
        height: side / 2,
    };

    let pixels = usize::from(side);
    let groups = Raster::paint(&field.scene(SCENE_WIDTH), pixels, pixels).color_groups();
    let bound = f64::from(side - 1);
    f.render_widget(
        Canvas::default()
            .marker(Marker::HalfBlock)
            .background_color(Color::Rgb(GRASS_DARK.r, GRASS_DARK.g, GRASS_DARK.b))
            .x_bounds([0.0, bound])
            .y_bounds([0.0, bound])
            .paint(move |ctx| {
                for ((r, g, b), coords) in &groups {
                    ctx.draw(&Points {
                        coords,
                        color: Color::Rgb(*r, *g, *b),
                    });
                }
            }),
        square,
    );
}

fn render_footer(session: &Session, f: &mut Frame<'_>, area: Rect) {
    let shortcuts = if session.simulation_running() {
        "Arrows: fly drone | Space: spray/inspect | t: tool | s: stop | h: hint | F1: help"
    } else {
        "o: open image | c: crop | a: analyze | s: simulation | h: hint | x: dismiss | F1: help"
    };
    f.render_widget(
        Paragraph::new(Span::styled(shortcuts, Style::default().fg(Color::Gray)))
            .alignment(Alignment::Center),
        area,
    );
}

fn render_help(f: &mut Frame<'_>, area: Rect) {
    let popup = area.inner(Margin::new(area.width / 6, area.height / 6));
    f.render_widget(Clear, popup);

    let lines = [
        ("o", "Choose a crop image"),
        ("c", "Cycle crop type"),
        ("a", "Analyze the uploaded image"),
        ("s", "Start or stop the field simulation"),
        ("t / T", "Next / previous pesticide or inspection tool"),
        ("Arrows", "Fly the drone while the simulation runs"),
        ("Space", "Spray or inspect the drone's cell"),
        ("h", "Show a hint for the next step"),
        ("x", "Dismiss the newest notice"),
        ("F1 / Esc", "Close this help"),
    ]
    .iter()
    .map(|(key, action)| {
        TextLine::from(vec![
            Span::styled(
                format!("{key:>10}  "),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(*action),
        ])
    })
    .collect::<Vec<_>>();

    f.render_widget(
        Paragraph::new(Text::from(lines)).block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        ),
        popup,
    );
}
