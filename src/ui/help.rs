use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::centered_rect;

/// Draw the Help popup (F1)
pub fn draw_help(f: &mut Frame) {
    let area = centered_rect(70, 80, f.area());
    f.render_widget(Clear, area);

    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow),
        ))
    };

    let help_text = vec![
        Line::from(Span::styled(
            " freqpanel - per-CPU frequency and governor control ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section(" Mouse "),
        Line::from("  Drag slider     Set CPU frequency on release"),
        Line::from("  Click governor  Switch to the next governor"),
        Line::from("  Right click     Open setup"),
        Line::from(""),
        section(" Keys "),
        Line::from("  F1/h/?          Show this help"),
        Line::from("  F2/s            Open setup"),
        Line::from("  F10/q/Ctrl+C    Quit"),
        Line::from(""),
        section(" Notes "),
        Line::from("  Control commands run through `sudo -n` and are not checked;"),
        Line::from("  the next refresh shows what the CPU actually does."),
        Line::from("  With coupled controls every CPU follows the one you touch."),
        Line::from(""),
        Line::from(Span::styled(
            " Press Esc or F1 to close ",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
