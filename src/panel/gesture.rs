//! Pointer gestures on the panel.
//!
//! Each CPU slider is `Idle` or `Dragging`. A primary press on a slider
//! starts a drag, motion with the primary button held moves it, and the
//! release commits it as control commands. Motion seen without the button
//! held means the release was missed: the drag is dropped without issuing
//! anything.

use log::debug;

use crate::panel::display::PanelDisplay;
use crate::panel::state::{CpuPanel, DragState};
use crate::system::control::ControlInvoker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Press { button: PointerButton, x: u16, y: u16 },
    Motion { x: u16, y: u16, primary_held: bool },
    Release { button: PointerButton, x: u16, y: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOutcome {
    Handled,
    /// Secondary press: the caller should open the settings surface.
    OpenSettings,
}

impl CpuPanel {
    pub fn handle_pointer(
        &mut self,
        event: PointerEvent,
        control: &mut dyn ControlInvoker,
        display: &mut dyn PanelDisplay,
    ) -> GestureOutcome {
        match event {
            PointerEvent::Press {
                button: PointerButton::Secondary,
                ..
            } => return GestureOutcome::OpenSettings,
            PointerEvent::Press {
                button: PointerButton::Primary,
                x,
                y,
            } => self.on_press(x, y, control, display),
            PointerEvent::Press { .. } => {}
            PointerEvent::Motion { x, primary_held, .. } => {
                self.on_motion(x, primary_held, display)
            }
            PointerEvent::Release { .. } => self.on_release(control),
        }
        GestureOutcome::Handled
    }

    fn on_press(
        &mut self,
        x: u16,
        y: u16,
        control: &mut dyn ControlInvoker,
        display: &mut dyn PanelDisplay,
    ) {
        for cpu in 0..self.cpus.len() {
            // a new press cancels any stale drag
            self.cpus[cpu].slider.drag = DragState::Idle;
            let regions = self.regions[cpu];

            if self.show_slider {
                if let Some(slider) = regions.slider.filter(|r| r.contains(x, y)) {
                    self.cpus[cpu].slider.drag = DragState::Dragging;
                    self.commit_position(cpu, x.saturating_sub(slider.x), display);
                }
            }

            if self.show_governor && regions.governor.is_some_and(|r| r.contains(x, y)) {
                for target in self.targets(cpu) {
                    control.advance_governor(target);
                }
            }
        }
    }

    fn on_motion(&mut self, x: u16, primary_held: bool, display: &mut dyn PanelDisplay) {
        for cpu in 0..self.cpus.len() {
            if !self.cpus[cpu].slider.is_dragging() {
                continue;
            }
            if !primary_held {
                debug!("cpu{cpu}: release missed, drag dropped");
                self.cpus[cpu].slider.drag = DragState::Idle;
                continue;
            }
            let x0 = self.regions[cpu].slider.map_or(0, |r| r.x);
            self.commit_position(cpu, x.saturating_sub(x0), display);
        }
    }

    fn on_release(&mut self, control: &mut dyn ControlInvoker) {
        for cpu in 0..self.cpus.len() {
            if !self.cpus[cpu].slider.is_dragging() {
                continue;
            }
            self.cpus[cpu].slider.drag = DragState::Idle;

            // governor first: most governors refuse a fixed frequency
            // unless already in userspace mode
            if self.set_userspace_on_drag {
                for target in self.targets(cpu) {
                    control.force_userspace_governor(target);
                }
            }

            // coupled CPUs all get the released slider's value
            let khz = (self.cpus[cpu].slider.fraction * self.max_khz_seen as f64).round() as u64;
            for target in self.targets(cpu) {
                control.set_absolute_frequency(target, khz);
            }
        }
    }

    /// Store a slider offset clamped to the full scale and show it.
    fn commit_position(&mut self, cpu: usize, offset: u16, display: &mut dyn PanelDisplay) {
        let position = offset.min(self.full_scale);
        let slider = &mut self.cpus[cpu].slider;
        slider.position = position;
        slider.fraction = if self.full_scale == 0 {
            0.0
        } else {
            f64::from(position) / f64::from(self.full_scale)
        };
        display.set_slider(cpu, position);
        display.redraw();
    }

    /// CPUs a gesture on `cpu` applies to.
    fn targets(&self, cpu: usize) -> std::ops::Range<usize> {
        if self.couple_controls {
            0..self.cpus.len()
        } else {
            cpu..cpu + 1
        }
    }
}
