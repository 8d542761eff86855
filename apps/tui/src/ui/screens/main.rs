use crate::app::{App, InputState};
use crate::ui::widgets::diagnosis::diagnosis_lines;
use crate::ui::widgets::field::render_field;
use crate::ui::widgets::notices::render_notices;
use crate::ui::widgets::popup::{centered_rect, ClearWidget};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::Throbber;

/// Notice banners shown at once; older ones wait for expiry.
const MAX_NOTICE_LINES: usize = 4;

pub fn render_main(app: &App, f: &mut Frame<'_>) {
    let main_layout = build_main_layout(app, f);

    render_title_section(app, f, main_layout[0]);
    render_notices(f, main_layout[1], app.session.notices().active());
    render_content_section(app, f, main_layout[2]);
    render_status_section(app, f, main_layout[3]);
    render_shortcuts(app, f, main_layout[4]);

    if app.input_state == InputState::EnteringPath {
        render_path_popup(app, f);
    }
    if app.show_help {
        render_help_popup(f);
    }
}

fn build_main_layout(app: &App, f: &Frame<'_>) -> Vec<Rect> {
    let notice_lines = app.session.notices().active().len().min(MAX_NOTICE_LINES);
    #[allow(clippy::cast_possible_truncation)]
    let notice_height = notice_lines as u16;

    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Title area
            Constraint::Length(notice_height), // Notice banners
            Constraint::Min(10),               // Content area
            Constraint::Length(3),             // Status area
            Constraint::Length(1),             // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(1, 0)))
        .to_vec()
}

fn render_title_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let title_block = Block::default()
        .title("== AGROD Crop Health ==")
        .title_style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let label_style = Style::default().fg(Color::Gray);
    let value_style = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);

    let image = app.session.image().map_or_else(
        || "none (press o)".to_string(),
        |image| format!("{} ({} KB)", image.file_name, image.byte_len.div_ceil(1024)),
    );

    let line = TextLine::from(vec![
        Span::styled("Crop: ", label_style),
        Span::styled(app.session.crop().label(), value_style),
        Span::raw("   "),
        Span::styled("Image: ", label_style),
        Span::styled(image, value_style),
    ]);

    f.render_widget(Paragraph::new(line).block(title_block), area);
}

fn render_content_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_detection_panel(app, f, columns[0]);
    render_simulation_panel(app, f, columns[1]);
}

fn render_detection_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(" Detection ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if app.session.is_busy() {
        let throbber = Throbber::default()
            .label("Analyzing image...")
            .style(Style::default().fg(Color::Cyan))
            .throbber_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        let mut state = app.throbber.clone();
        let line = Rect { height: 1, ..inner };
        f.render_stateful_widget(throbber, line, &mut state);
        return;
    }

    let text = app.session.diagnosis().map_or_else(
        || {
            Text::from(vec![
                TextLine::from("Upload a crop image with 'o', pick the crop with 'c',"),
                TextLine::from("then press 'a' to analyze it."),
            ])
        },
        |diagnosis| Text::from(diagnosis_lines(diagnosis)),
    );

    f.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
}

fn render_simulation_panel(app: &App, f: &mut Frame<'_>, area: Rect) {
    let copy = app.session.simulation_copy();
    let toggle = app.session.toggle();
    let border = if toggle.enabled {
        Color::Green
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .title(format!(" {} ", copy.title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Description, toggle, selector
            Constraint::Min(4),    // Field
            Constraint::Length(1), // Hint trigger
        ])
        .split(inner);

    let toggle_line = match (toggle.enabled, toggle.checked) {
        (false, _) => Span::styled("[ ] Simulation unavailable", Style::default().fg(Color::DarkGray)),
        (true, false) => Span::styled("[ ] Simulation off (press s)", Style::default().fg(Color::White)),
        (true, true) => Span::styled(
            "[x] Simulation on",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
    };

    let selector = app.session.selector();
    let header = Text::from(vec![
        TextLine::from(Span::styled(copy.description, Style::default().fg(Color::Gray))),
        TextLine::from(toggle_line),
        TextLine::from(vec![
            Span::styled(selector.mode.label(), Style::default().fg(Color::Yellow)),
            Span::raw(" "),
            Span::raw(selector.selected_label().to_string()),
            Span::styled(
                format!("  (t: change, space: {})", selector.mode.action_label()),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
    ]);
    f.render_widget(Paragraph::new(header).wrap(Wrap { trim: true }), rows[0]);

    if toggle.checked {
        if let Some(field) = app.session.field() {
            render_field(f, rows[1], field);
        }
    }

    if app.session.hint_available() {
        let hint = Paragraph::new(TextLine::from(vec![
            Span::styled("h ", Style::default().fg(Color::Yellow)),
            Span::raw(app.session.hint_caption()),
        ]))
        .alignment(Alignment::Right);
        f.render_widget(hint, rows[2]);
    }
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let style = if app.status_message.starts_with("Error") || app.status_message.ends_with("failed") {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };

    let status_paragraph = Paragraph::new(Span::styled(app.status_message.as_str(), style))
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

fn render_shortcuts(app: &App, f: &mut Frame<'_>, area: Rect) {
    let shortcuts = if app.session.simulation_running() {
        "Arrows: fly drone | Space: spray/inspect | t: tool | s: stop | h: hint | F1: help | q: quit"
    } else {
        "o: open image | c: crop | a: analyze | s: simulation | h: hint | x: dismiss | F1: help | q: quit"
    };
    let paragraph = Paragraph::new(Span::styled(shortcuts, Style::default().fg(Color::DarkGray)))
        .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn render_path_popup(app: &App, f: &mut Frame<'_>) {
    let area = centered_rect(60, 20, f.area());
    let popup = Rect {
        height: area.height.max(3),
        ..area
    };
    f.render_widget(ClearWidget, popup);

    let block = Block::default()
        .title(" Image path (Enter to load, Esc to cancel) ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let input = Paragraph::new(TextLine::from(vec![
        Span::raw(app.current_input.as_str()),
        Span::styled("_", Style::default().fg(Color::Yellow)),
    ]))
    .block(block);
    f.render_widget(input, popup);
}

fn render_help_popup(f: &mut Frame<'_>) {
    let area = centered_rect(70, 70, f.area());
    f.render_widget(ClearWidget, area);

    let key_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let entries = [
        ("o", "Open a crop image by path"),
        ("c", "Cycle crop type"),
        ("a", "Analyze the uploaded image"),
        ("s", "Start or stop the field simulation"),
        ("t / T", "Next / previous pesticide or inspection tool"),
        ("Arrows", "Fly the drone while the simulation runs"),
        ("Space", "Spray or inspect the drone's cell"),
        ("h", "Show a hint for the next step"),
        ("x", "Dismiss the newest notice"),
        ("F1 / Esc", "Close this help"),
        ("q", "Quit"),
    ];

    let mut lines = vec![TextLine::from(""), TextLine::from("Keyboard shortcuts"), TextLine::from("")];
    lines.extend(entries.iter().map(|(key, action)| {
        TextLine::from(vec![
            Span::styled(format!("{key:>10}  "), key_style),
            Span::raw(*action),
        ])
    }));

    let help = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(help, area);
}
