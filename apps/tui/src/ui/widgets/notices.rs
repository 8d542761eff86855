use agrod_core::{Level, Notice};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

pub const fn level_color(level: Level) -> Color {
    match level {
        Level::Info => Color::Cyan,
        Level::Success => Color::Green,
        Level::Warning => Color::Yellow,
        Level::Danger => Color::Red,
    }
}

/// Newest notice first, one line each.
pub fn notice_lines(notices: &[Notice]) -> Vec<Line<'static>> {
    notices
        .iter()
        .map(|notice| {
            let color = level_color(notice.level);
            Line::from(vec![
                Span::styled(
                    format!(" {} ", notice.level.as_str().to_uppercase()),
                    Style::default()
                        .fg(Color::Black)
                        .bg(color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(notice.message.clone(), Style::default().fg(color)),
            ])
        })
        .collect()
}

pub fn render_notices(f: &mut Frame<'_>, area: Rect, notices: &[Notice]) {
    if notices.is_empty() || area.height == 0 {
        return;
    }

    let paragraph = Paragraph::new(Text::from(notice_lines(notices))).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
