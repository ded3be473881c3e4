use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::centered_rect;
use crate::app::{App, SettingsTab, SETTINGS_OPTIONS};

const TABS: &[(SettingsTab, &str)] = &[(SettingsTab::Options, "Options"), (SettingsTab::Info, "Info")];

const INFO_TEXT: &[&str] = &[
    "CPU frequency panel",
    "",
    "Drag a slider to request a fixed frequency for that CPU. With",
    "\"Set userspace governor\" on, the CPU is switched to the userspace",
    "governor first, since most governors refuse a fixed frequency.",
    "",
    "Click a governor name to switch that CPU to its next governor.",
    "",
    "With coupled controls, every gesture applies to all CPUs, and all",
    "of them receive the frequency of the slider you released.",
    "",
    "The highest frequency seen during this run is saved for the next",
    "run whenever this page is opened or the program exits.",
];

// ── Main draw entry ─────────────────────────────────────────────────────────

pub fn draw_settings(f: &mut Frame, app: &App) {
    let area = centered_rect(76, 70, f.area());
    f.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Setup ")
        .title_alignment(Alignment::Center)
        .border_style(Style::default().fg(Color::Cyan))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Left 22% tabs | Right 78% content
    let panels = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(22), Constraint::Percentage(78)])
        .split(inner);

    draw_tabs(f, app, panels[0]);

    match app.settings.tab {
        SettingsTab::Options => draw_options(f, app, panels[1]),
        SettingsTab::Info => draw_info(f, panels[1]),
    }
}

// ── Tab list (left side) ────────────────────────────────────────────────────

fn draw_tabs(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled(
            " Categories",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (tab, name) in TABS {
        let style = if *tab == app.settings.tab {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(format!(" {:<14}", name), style)));
    }

    f.render_widget(Paragraph::new(lines), area);
}

// ── Options (checkboxes grouped by heading) ─────────────────────────────────

fn draw_options(f: &mut Frame, app: &App, area: Rect) {
    let form = &app.settings;
    let mut lines = Vec::new();
    let mut group = "";

    for (idx, (heading, label)) in SETTINGS_OPTIONS.iter().enumerate() {
        if *heading != group {
            if !group.is_empty() {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(
                format!(" {heading}"),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
            group = *heading;
        }

        let mark = if form.option(idx) { "[x]" } else { "[ ]" };
        let style = if idx == form.index {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(format!("  {mark} {label}"), style)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  Highest frequency seen: {} kHz", app.panel.max_khz_seen()),
        Style::default().fg(Color::DarkGray),
    )));

    f.render_widget(Paragraph::new(lines), area);
}

fn draw_info(f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = INFO_TEXT.iter().map(|l| Line::from(format!(" {l}"))).collect();
    f.render_widget(
        Paragraph::new(lines)
            .style(Style::default().fg(Color::White))
            .wrap(Wrap { trim: false }),
        area,
    );
}
