use crate::config::PanelConfig;
use crate::panel::display::PanelDisplay;
use crate::system::cpu::{hardware_max_khz, HardwareReader};

/// Last values read from the OS for one CPU.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpuSample {
    pub frequency_khz: u64,
    /// Empty when the policy could not be read.
    pub governor: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

/// Per-CPU slider: drag state, committed fraction and visual fill.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SliderState {
    pub drag: DragState,
    /// Last committed position, 0.0..=1.0 of the full scale.
    pub fraction: f64,
    /// Visual fill in cells, 0..=full_scale.
    pub position: u16,
}

impl SliderState {
    pub fn is_dragging(&self) -> bool {
        self.drag == DragState::Dragging
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuRecord {
    pub sample: CpuSample,
    pub slider: SliderState,
}

/// Cell rectangle used for pointer hit tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl HitRect {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && x < self.x.saturating_add(self.width)
            && y >= self.y
            && y < self.y.saturating_add(self.height)
    }
}

/// Where one CPU's interactive parts sit on screen. `None` when the part
/// is not displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuRegions {
    pub governor: Option<HitRect>,
    pub slider: Option<HitRect>,
}

/// Owner of the per-CPU mirror and the shared frequency scale.
///
/// All mutation goes through `on_tick`, `handle_pointer`, `apply_config` and
/// `set_layout`, which the event loop calls one at a time.
#[derive(Debug)]
pub struct CpuPanel {
    pub(super) cpus: Vec<CpuRecord>,
    /// Denominator of every slider; never decreases.
    pub(super) max_khz_seen: u64,
    pub(super) show_governor: bool,
    pub(super) show_slider: bool,
    pub(super) set_userspace_on_drag: bool,
    pub(super) couple_controls: bool,
    /// Largest slider position in cells, shared by all sliders.
    pub(super) full_scale: u16,
    pub(super) regions: Vec<CpuRegions>,
    /// Set once governors have been read in the current refresh cycle.
    pub(super) governors_fresh: bool,
}

impl CpuPanel {
    /// Build the mirror for `ncpu` CPUs, seed the scale from the hardware
    /// limits and the persisted peak, and take the first readings.
    pub fn new(ncpu: usize, config: &PanelConfig, reader: &dyn HardwareReader) -> Self {
        let mut panel = Self {
            cpus: vec![CpuRecord::default(); ncpu],
            max_khz_seen: 0,
            show_governor: config.show_governor,
            show_slider: config.show_slider,
            set_userspace_on_drag: config.set_userspace_on_drag,
            couple_controls: config.couple_controls,
            full_scale: 0,
            regions: vec![CpuRegions::default(); ncpu],
            governors_fresh: false,
        };
        panel.raise_scale(hardware_max_khz(reader, ncpu));
        panel.raise_scale(config.max_khz_seen);

        if panel.show_governor {
            panel.refresh_governors(reader);
        }
        panel.refresh_frequencies(reader);
        panel
    }

    pub fn cpu_count(&self) -> usize {
        self.cpus.len()
    }

    pub fn cpus(&self) -> &[CpuRecord] {
        &self.cpus
    }

    pub fn max_khz_seen(&self) -> u64 {
        self.max_khz_seen
    }

    pub fn full_scale(&self) -> u16 {
        self.full_scale
    }

    pub fn show_governor(&self) -> bool {
        self.show_governor
    }

    pub fn show_slider(&self) -> bool {
        self.show_slider
    }

    /// Grow the shared scale; a smaller value is ignored.
    pub fn raise_scale(&mut self, khz: u64) {
        self.max_khz_seen = self.max_khz_seen.max(khz);
    }

    /// Take over the applied settings. A persisted peak only ever raises the
    /// scale.
    pub fn apply_config(&mut self, config: &PanelConfig) {
        self.show_governor = config.show_governor;
        self.show_slider = config.show_slider;
        self.set_userspace_on_drag = config.set_userspace_on_drag;
        self.couple_controls = config.couple_controls;
        self.raise_scale(config.max_khz_seen);
    }

    /// Install the hit regions and slider width computed by the panel
    /// layout. When either changed, idle sliders snap to the live frequency
    /// on the new scale and dragging sliders keep their fraction.
    pub fn set_layout(
        &mut self,
        full_scale: u16,
        mut regions: Vec<CpuRegions>,
        display: &mut dyn PanelDisplay,
    ) {
        regions.resize(self.cpus.len(), CpuRegions::default());
        let changed = full_scale != self.full_scale || regions != self.regions;
        self.full_scale = full_scale;
        self.regions = regions;

        if !changed || !self.show_slider {
            return;
        }
        for cpu in 0..self.cpus.len() {
            let slider = self.cpus[cpu].slider;
            let position = if slider.is_dragging() {
                (slider.fraction * f64::from(full_scale)).round() as u16
            } else {
                self.live_position(cpu)
            };
            self.cpus[cpu].slider.position = position;
            display.set_slider(cpu, position);
        }
    }

    /// `round(full_scale * khz / max_khz_seen)`, or 0 while the scale is
    /// still unknown.
    pub(super) fn live_position(&self, cpu: usize) -> u16 {
        if self.max_khz_seen == 0 {
            return 0;
        }
        let full = u64::from(self.full_scale);
        let khz = self.cpus[cpu].sample.frequency_khz;
        let position = (full * khz + self.max_khz_seen / 2) / self.max_khz_seen;
        position.min(full) as u16
    }

    /// Governor text as shown: empty while governor display is off.
    pub fn governor_text(&self, cpu: usize) -> &str {
        if self.show_governor {
            &self.cpus[cpu].sample.governor
        } else {
            ""
        }
    }
}
