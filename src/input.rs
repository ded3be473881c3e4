use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppMode, SettingsTab};

/// Handle a single key input event.
pub fn handle_input(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.mode {
        AppMode::Normal => handle_normal_mode(app, key),
        AppMode::Help => handle_help_mode(app, key),
        AppMode::Settings => handle_settings_mode(app, key),
    }
}

// ── Normal mode ─────────────────────────────────────────────────────────

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::F(10) | KeyCode::Char('q') => app.quit(),
        KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('h') => app.mode = AppMode::Help,
        KeyCode::F(2) | KeyCode::Char('s') => app.open_settings(),
        _ => {}
    }
}

// ── Help overlay ────────────────────────────────────────────────────────

fn handle_help_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::F(10) | KeyCode::Char('q') => app.quit(),
        KeyCode::Esc | KeyCode::F(1) | KeyCode::Enter => app.mode = AppMode::Normal,
        _ => {}
    }
}

// ── Settings overlay: edits a draft, Enter applies it whole ────────────

fn handle_settings_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::F(2) => app.cancel_settings(),
        KeyCode::Enter => app.apply_settings(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
            app.settings.tab = match app.settings.tab {
                SettingsTab::Options => SettingsTab::Info,
                SettingsTab::Info => SettingsTab::Options,
            };
        }
        _ if app.settings.tab == SettingsTab::Info => {}
        KeyCode::Up | KeyCode::Char('k') => app.settings.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.settings.select_next(),
        KeyCode::Char(' ') => app.settings.toggle_selected(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::control::DryRunInvoker;
    use crate::system::cpu::testing::FakeReader;

    fn test_app() -> App {
        let reader = FakeReader::new(&[1_000_000], &["ondemand"]);
        App::new(None, Box::new(reader), Box::new(DryRunInvoker::default()))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_settings_keys_edit_draft_only() {
        let mut app = test_app();
        handle_input(&mut app, key(KeyCode::F(2)));
        assert_eq!(app.mode, AppMode::Settings);

        handle_input(&mut app, key(KeyCode::Down));
        handle_input(&mut app, key(KeyCode::Down));
        handle_input(&mut app, key(KeyCode::Char(' ')));
        assert!(!app.settings.draft.show_slider);
        assert!(app.config.show_slider);

        handle_input(&mut app, key(KeyCode::Enter));
        assert_eq!(app.mode, AppMode::Normal);
        assert!(!app.config.show_slider);
        assert!(!app.panel.show_slider());
    }

    #[test]
    fn test_info_tab_ignores_toggles() {
        let mut app = test_app();
        handle_input(&mut app, key(KeyCode::Char('s')));
        handle_input(&mut app, key(KeyCode::Tab));
        handle_input(&mut app, key(KeyCode::Char(' ')));
        assert!(app.settings.draft.show_governor);
        handle_input(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app();
        handle_input(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);

        let mut app = test_app();
        app.mode = AppMode::Help;
        handle_input(&mut app, key(KeyCode::Esc));
        assert_eq!(app.mode, AppMode::Normal);
        handle_input(&mut app, key(KeyCode::F(10)));
        assert!(app.should_quit);
    }
}
