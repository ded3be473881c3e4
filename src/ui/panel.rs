use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthChar;

use crate::app::{App, CpuView};
use crate::panel::{CpuRegions, HitRect};

/// Screen rows of one CPU. Parts that are hidden are `None`; rows that run
/// past the bottom of the panel have zero height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuRows {
    pub governor: Option<Rect>,
    pub frequency: Rect,
    pub slider: Option<Rect>,
}

impl CpuRows {
    pub fn regions(&self) -> CpuRegions {
        CpuRegions {
            governor: self.governor.map(hit_rect),
            slider: self.slider.map(hit_rect),
        }
    }
}

fn hit_rect(r: Rect) -> HitRect {
    HitRect::new(r.x, r.y, r.width, r.height)
}

/// Stack each CPU's rows top to bottom, one blank row between CPUs:
///
///   ondemand                      <- governor (click: next governor)
///   cpu0  1800 MHz
///   ===========█-----------       <- slider (drag: set frequency)
pub fn cpu_rows(area: Rect, ncpu: usize, show_governor: bool, show_slider: bool) -> Vec<CpuRows> {
    let row = |y: u16| Rect {
        x: area.x,
        y,
        width: area.width,
        height: u16::from(y < area.bottom()),
    };

    let mut y = area.y;
    let mut next_row = || {
        let r = row(y);
        y = y.saturating_add(1);
        r
    };

    (0..ncpu)
        .map(|_| {
            let governor = show_governor.then(&mut next_row);
            let frequency = next_row();
            let slider = show_slider.then(&mut next_row);
            next_row(); // gap
            CpuRows {
                governor,
                frequency,
                slider,
            }
        })
        .collect()
}

/// Largest slider position: one cell per step across the panel width.
pub fn slider_full_scale(area: Rect) -> u16 {
    area.width.saturating_sub(1)
}

pub fn draw_panel(f: &mut Frame, app: &App, area: Rect) {
    let panel = &app.panel;
    if panel.cpu_count() == 0 {
        let msg = Paragraph::new(Span::styled(
            "No cpufreq CPUs found",
            Style::default().fg(Color::DarkGray),
        ));
        f.render_widget(msg, area);
        return;
    }

    let rows = cpu_rows(area, panel.cpu_count(), panel.show_governor(), panel.show_slider());
    let full_scale = panel.full_scale();

    for (cpu, (parts, view)) in rows.iter().zip(&app.view.cpus).enumerate() {
        if let Some(r) = parts.governor.filter(|r| r.height > 0) {
            draw_governor(f, view, r);
        }
        if parts.frequency.height > 0 {
            draw_frequency(f, cpu, view, parts.frequency);
        }
        if let Some(r) = parts.slider.filter(|r| r.height > 0) {
            let dragging = panel.cpus()[cpu].slider.is_dragging();
            draw_slider(f, view.slider, full_scale, dragging, r);
        }
    }
}

fn draw_governor(f: &mut Frame, view: &CpuView, area: Rect) {
    let text = truncate_to_width(&view.governor, area.width as usize);
    let line = Line::from(Span::styled(
        text,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
    ));
    f.render_widget(Paragraph::new(line), area);
}

fn draw_frequency(f: &mut Frame, cpu: usize, view: &CpuView, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            format!("cpu{cpu} "),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(view.frequency.clone(), Style::default().fg(Color::White)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Filled track up to the knob, the knob, then the empty remainder.
fn draw_slider(f: &mut Frame, position: u16, full_scale: u16, dragging: bool, area: Rect) {
    let position = position.min(full_scale) as usize;
    let empty = (full_scale as usize).saturating_sub(position);
    let knob_color = if dragging { Color::Yellow } else { Color::White };

    let line = Line::from(vec![
        Span::styled("=".repeat(position), Style::default().fg(Color::Green)),
        Span::styled(
            "█",
            Style::default().fg(knob_color).add_modifier(Modifier::BOLD),
        ),
        Span::styled("-".repeat(empty), Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Cut a string to at most `width` terminal columns
fn truncate_to_width(s: &str, width: usize) -> String {
    let mut used = 0;
    s.chars()
        .take_while(|c| {
            used += c.width().unwrap_or(0);
            used <= width
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_stack_with_gaps() {
        let rows = cpu_rows(Rect::new(1, 1, 30, 20), 2, true, true);
        assert_eq!(rows[0].governor.unwrap().y, 1);
        assert_eq!(rows[0].frequency.y, 2);
        assert_eq!(rows[0].slider.unwrap().y, 3);
        assert_eq!(rows[1].governor.unwrap().y, 5);
        assert_eq!(rows[1].slider.unwrap(), Rect::new(1, 7, 30, 1));
    }

    #[test]
    fn test_hidden_parts_have_no_region() {
        let rows = cpu_rows(Rect::new(0, 0, 30, 20), 2, false, false);
        assert_eq!(rows[1].frequency.y, 2);
        let regions = rows[0].regions();
        assert!(regions.governor.is_none());
        assert!(regions.slider.is_none());
    }

    #[test]
    fn test_overflowing_rows_are_not_clickable() {
        let rows = cpu_rows(Rect::new(0, 0, 30, 6), 2, true, true);
        let slider = rows[1].regions().slider.unwrap();
        assert_eq!(slider.height, 0);
        assert!(!slider.contains(0, 7));
    }

    #[test]
    fn test_full_scale_leaves_room_for_knob() {
        assert_eq!(slider_full_scale(Rect::new(0, 0, 41, 1)), 40);
        assert_eq!(slider_full_scale(Rect::new(0, 0, 0, 1)), 0);
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("performance", 4), "perf");
        assert_eq!(truncate_to_width("ondemand", 20), "ondemand");
    }
}
