use std::path::PathBuf;

use log::{info, warn};
use ratatui::layout::Rect;

use crate::config::PanelConfig;
use crate::panel::{CpuPanel, GestureOutcome, PanelDisplay, PointerEvent, Tick};
use crate::system::control::ControlInvoker;
use crate::system::cpu::{detect_cpu_count, HardwareReader};
use crate::ui;

/// Which view/mode the app is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Help,
    Settings, // F2 / right click: options form
}

/// Settings overlay tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsTab {
    Options,
    Info,
}

/// Toggles offered in the settings form, in display order.
pub const SETTINGS_OPTIONS: &[(&str, &str)] = &[
    ("CPUfreq governor", "Show governor"),
    ("CPUfreq governor", "Set userspace governor when moving slider"),
    ("Slider", "Show slider"),
    ("SMP", "Couple controls of multiple CPUs"),
];

/// Draft copy of the settings being edited. Nothing reaches the panel
/// until the whole draft is applied.
#[derive(Debug, Clone, Copy)]
pub struct SettingsForm {
    pub draft: PanelConfig,
    pub index: usize,
    pub tab: SettingsTab,
}

impl SettingsForm {
    pub fn new(config: PanelConfig) -> Self {
        Self {
            draft: config,
            index: 0,
            tab: SettingsTab::Options,
        }
    }

    /// Current value of option `idx` in the draft
    pub fn option(&self, idx: usize) -> bool {
        match idx {
            0 => self.draft.show_governor,
            1 => self.draft.set_userspace_on_drag,
            2 => self.draft.show_slider,
            3 => self.draft.couple_controls,
            _ => false,
        }
    }

    pub fn toggle_selected(&mut self) {
        let flag = match self.index {
            0 => &mut self.draft.show_governor,
            1 => &mut self.draft.set_userspace_on_drag,
            2 => &mut self.draft.show_slider,
            3 => &mut self.draft.couple_controls,
            _ => return,
        };
        *flag = !*flag;
    }

    pub fn select_prev(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        self.index = (self.index + 1).min(SETTINGS_OPTIONS.len() - 1);
    }
}

/// What one CPU row currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuView {
    pub frequency: String,
    pub governor: String,
    pub slider: u16,
}

/// Rendered state of the panel, filled in by the panel core.
#[derive(Debug, Default)]
pub struct PanelView {
    pub cpus: Vec<CpuView>,
    dirty: bool,
}

impl PanelView {
    pub fn new(ncpu: usize) -> Self {
        Self {
            cpus: vec![CpuView::default(); ncpu],
            dirty: true,
        }
    }

    /// Returns whether a redraw was requested, clearing the request.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl PanelDisplay for PanelView {
    fn show_text(&mut self, cpu: usize, frequency: &str, governor: &str) {
        if let Some(view) = self.cpus.get_mut(cpu) {
            view.frequency = frequency.to_string();
            view.governor = governor.to_string();
        }
    }

    fn set_slider(&mut self, cpu: usize, position: u16) {
        if let Some(view) = self.cpus.get_mut(cpu) {
            view.slider = position;
        }
    }

    fn redraw(&mut self) {
        self.dirty = true;
    }
}

/// Main application state
pub struct App {
    pub mode: AppMode,
    pub should_quit: bool,

    pub config: PanelConfig,
    config_path: Option<PathBuf>,

    pub panel: CpuPanel,
    pub view: PanelView,
    reader: Box<dyn HardwareReader>,
    control: Box<dyn ControlInvoker>,

    pub settings: SettingsForm,

    /// CPU model name for the panel title
    pub brand: String,
    /// One-line message shown in the footer
    pub status: Option<String>,
}

impl App {
    pub fn new(
        config_path: Option<PathBuf>,
        reader: Box<dyn HardwareReader>,
        control: Box<dyn ControlInvoker>,
    ) -> Self {
        let config = match &config_path {
            Some(path) => PanelConfig::load(path),
            None => PanelConfig::default(),
        };
        let ncpu = detect_cpu_count(reader.as_ref());
        let panel = CpuPanel::new(ncpu, &config, reader.as_ref());
        info!(
            "{ncpu} cpus, scale {} kHz, governor {}, slider {}, coupled {}",
            panel.max_khz_seen(),
            config.show_governor,
            config.show_slider,
            config.couple_controls
        );

        let mut view = PanelView::new(ncpu);
        panel.publish_text(&mut view);

        Self {
            mode: AppMode::Normal,
            should_quit: false,
            config,
            config_path,
            panel,
            view,
            reader,
            control,
            settings: SettingsForm::new(config),
            brand: String::new(),
            status: None,
        }
    }

    pub fn on_tick(&mut self, tick: Tick) {
        self.panel.on_tick(tick, self.reader.as_ref(), &mut self.view);
    }

    /// Feed a pointer event to the panel. Presses only reach the panel in
    /// normal mode; motion and release always do, so a drag never gets
    /// stuck behind an overlay.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        if matches!(event, PointerEvent::Press { .. }) && self.mode != AppMode::Normal {
            return;
        }
        let outcome = self
            .panel
            .handle_pointer(event, self.control.as_mut(), &mut self.view);
        if let Some(notice) = self.control.take_notice() {
            self.status = Some(notice);
            self.view.redraw();
        }
        if outcome == GestureOutcome::OpenSettings {
            self.open_settings();
        }
    }

    /// Recompute hit regions and slider width for the panel area.
    pub fn update_layout(&mut self, screen: Rect) {
        let area = ui::panel_area(screen);
        let rows = ui::panel::cpu_rows(
            area,
            self.panel.cpu_count(),
            self.panel.show_governor(),
            self.panel.show_slider(),
        );
        let full_scale = ui::panel::slider_full_scale(area);
        let regions = rows.iter().map(ui::panel::CpuRows::regions).collect();
        self.panel.set_layout(full_scale, regions, &mut self.view);
    }

    pub fn open_settings(&mut self) {
        // the session's peak is persisted whenever the settings are viewed
        self.config.max_khz_seen = self.panel.max_khz_seen();
        self.settings = SettingsForm::new(self.config);
        self.mode = AppMode::Settings;
        self.save_config();
    }

    /// Apply the whole draft at once and rebuild the panel with it.
    pub fn apply_settings(&mut self) {
        let mut config = self.settings.draft;
        config.max_khz_seen = self.panel.max_khz_seen();
        self.config = config;
        self.panel.apply_config(&config);
        self.panel.publish_text(&mut self.view);
        self.view.redraw();
        self.mode = AppMode::Normal;
        self.save_config();
    }

    pub fn cancel_settings(&mut self) {
        self.settings = SettingsForm::new(self.config);
        self.mode = AppMode::Normal;
        self.view.redraw();
    }

    pub fn quit(&mut self) {
        self.config.max_khz_seen = self.panel.max_khz_seen();
        self.save_config();
        self.should_quit = true;
    }

    fn save_config(&mut self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = self.config.save(path) {
            warn!("config not saved: {e:#}");
            self.status = Some(format!("Config not saved: {e}"));
            self.view.redraw();
        }
    }
}
