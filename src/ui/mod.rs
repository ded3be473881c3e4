pub mod footer;
pub mod help;
pub mod panel;
pub mod settings;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::widgets::{Block, Borders};

use crate::app::{App, AppMode};

/// Split the screen into the bordered panel and the footer bar
fn screen_chunks(screen: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // panel
            Constraint::Length(1), // footer (F-key bar)
        ])
        .split(screen);
    (chunks[0], chunks[1])
}

/// Block framing the CPU rows
fn panel_block(title: String) -> Block<'static> {
    Block::default().borders(Borders::ALL).title(title)
}

/// Area inside the panel border where CPU rows are laid out. Drawing and
/// pointer hit tests both go through this.
pub fn panel_area(screen: Rect) -> Rect {
    let (panel, _) = screen_chunks(screen);
    panel_block(String::new()).inner(panel)
}

/// Render the complete UI
pub fn draw(f: &mut Frame, app: &App) {
    let (panel_chunk, footer_chunk) = screen_chunks(f.area());

    let title = if app.brand.is_empty() {
        " CPU frequency ".to_string()
    } else {
        format!(" CPU frequency: {} ", app.brand)
    };
    let block = panel_block(title);
    let inner = block.inner(panel_chunk);
    f.render_widget(block, panel_chunk);

    panel::draw_panel(f, app, inner);
    footer::draw_footer(f, app, footer_chunk);

    // Overlay popups
    match app.mode {
        AppMode::Help => help::draw_help(f),
        AppMode::Settings => settings::draw_settings(f, app),
        AppMode::Normal => {}
    }
}

/// Create a centered rectangle with percentage width/height
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
