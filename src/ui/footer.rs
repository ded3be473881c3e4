use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, AppMode};

/// F-key definitions: (key_label, description)
const FKEYS_NORMAL: &[(&str, &str)] = &[
    ("F1", "Help  "),
    ("F2", "Setup "),
    ("F10", "Quit "),
];

const FKEYS_SETTINGS: &[(&str, &str)] = &[
    ("Space", "Toggle "),
    ("Tab", "Info   "),
    ("Enter", "Apply "),
    ("Esc", "Cancel "),
];

const FKEYS_HELP: &[(&str, &str)] = &[("Esc", "Close "), ("F10", "Quit ")];

/// Draw the bottom F-key bar: key in black-on-cyan, description in
/// light-on-dark, then the status message if any
pub fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    // Full-width dark background first
    let bg_fill = " ".repeat(area.width as usize);
    f.render_widget(
        Paragraph::new(bg_fill).style(Style::default().bg(Color::Indexed(234))),
        area,
    );

    let fkeys = match app.mode {
        AppMode::Settings => FKEYS_SETTINGS,
        AppMode::Help => FKEYS_HELP,
        AppMode::Normal => FKEYS_NORMAL,
    };

    let mut spans: Vec<Span> = Vec::new();

    for (key, desc) in fkeys {
        spans.push(Span::styled(
            key.to_string(),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            desc.to_string(),
            Style::default()
                .fg(Color::Indexed(252))  // light gray
                .bg(Color::Indexed(234)), // very dark gray
        ));
    }

    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!(" {status}"),
            Style::default().fg(Color::Yellow).bg(Color::Indexed(234)),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
