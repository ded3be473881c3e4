use std::time::{Duration, Instant};

use crate::panel::display::PanelDisplay;
use crate::panel::state::CpuPanel;
use crate::system::cpu::{format_mhz, HardwareReader};

/// One pulse of the event loop. Only pulses that cross a whole-second
/// boundary refresh the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub second_elapsed: bool,
}

/// Turns the event loop's sub-second wakeups into `Tick`s, flagging at
/// most one per elapsed second no matter how many wakeups land in it.
#[derive(Debug, Clone)]
pub struct TickClock {
    started: Instant,
    last_second: u64,
}

impl TickClock {
    pub fn new(started: Instant) -> Self {
        Self {
            started,
            last_second: 0,
        }
    }

    pub fn tick_at(&mut self, now: Instant) -> Tick {
        let second = now.saturating_duration_since(self.started).as_secs();
        let second_elapsed = second != self.last_second;
        self.last_second = second;
        Tick { second_elapsed }
    }

    /// Time left until the next whole-second boundary.
    pub fn until_next_second(&self, now: Instant) -> Duration {
        let elapsed = now.saturating_duration_since(self.started);
        let next = Duration::from_secs(elapsed.as_secs() + 1);
        next.saturating_sub(elapsed)
    }
}

impl CpuPanel {
    /// Once-per-second refresh: governors (when shown), frequencies and the
    /// shared scale, idle slider positions, then the text of every CPU.
    pub fn on_tick(
        &mut self,
        tick: Tick,
        reader: &dyn HardwareReader,
        display: &mut dyn PanelDisplay,
    ) {
        if !tick.second_elapsed {
            return;
        }
        self.governors_fresh = false;

        if self.show_governor {
            self.refresh_governors(reader);
        }
        self.refresh_frequencies(reader);

        if self.show_slider {
            for cpu in 0..self.cpus.len() {
                // the live reading must not fight the pointer
                if self.cpus[cpu].slider.is_dragging() {
                    continue;
                }
                let position = self.live_position(cpu);
                self.cpus[cpu].slider.position = position;
                display.set_slider(cpu, position);
            }
        }

        self.publish_text(display);
        display.redraw();
    }

    /// Hand every CPU's frequency and governor strings to the display.
    pub fn publish_text(&self, display: &mut dyn PanelDisplay) {
        for cpu in 0..self.cpus.len() {
            let frequency = format_mhz(self.cpus[cpu].sample.frequency_khz);
            display.show_text(cpu, &frequency, self.governor_text(cpu));
        }
    }

    pub(super) fn refresh_governors(&mut self, reader: &dyn HardwareReader) {
        for (cpu, record) in self.cpus.iter_mut().enumerate() {
            record.sample.governor = reader.read_governor(cpu);
        }
        self.governors_fresh = true;
    }

    /// Governors are read even while hidden, so turning the display on
    /// never shows a stale name.
    fn ensure_governors_fresh(&mut self, reader: &dyn HardwareReader) {
        if !self.governors_fresh {
            self.refresh_governors(reader);
        }
    }

    pub(super) fn refresh_frequencies(&mut self, reader: &dyn HardwareReader) {
        self.ensure_governors_fresh(reader);

        for (cpu, record) in self.cpus.iter_mut().enumerate() {
            record.sample.frequency_khz = reader.read_frequency(cpu);
            self.max_khz_seen = self.max_khz_seen.max(record.sample.frequency_khz);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PanelConfig;
    use crate::panel::display::testing::RecordingDisplay;
    use crate::panel::state::{CpuRegions, DragState};
    use crate::system::cpu::testing::FakeReader;

    const SECOND: Tick = Tick {
        second_elapsed: true,
    };

    fn panel_with(reader: &FakeReader, config: &PanelConfig, full_scale: u16) -> CpuPanel {
        let n = reader.present;
        let mut panel = CpuPanel::new(n, config, reader);
        let mut display = RecordingDisplay::new(n);
        panel.set_layout(full_scale, vec![CpuRegions::default(); n], &mut display);
        panel
    }

    #[test]
    fn test_sub_second_tick_is_noop() {
        let reader = FakeReader::new(&[1_000_000], &["ondemand"]);
        let mut panel = panel_with(&reader, &PanelConfig::default(), 50);
        let mut display = RecordingDisplay::new(1);
        reader.queried.borrow_mut().clear();

        panel.on_tick(Tick { second_elapsed: false }, &reader, &mut display);
        assert!(reader.queried.borrow().is_empty());
        assert_eq!(display.redraws, 0);
    }

    #[test]
    fn test_tick_positions_idle_sliders() {
        let reader = FakeReader::new(&[1_000_000, 500_000, 2_000_000], &["ondemand"; 3]);
        let mut panel = panel_with(&reader, &PanelConfig::default(), 60);
        let mut display = RecordingDisplay::new(3);

        reader.set_freq(1, 1_333_333);
        panel.on_tick(SECOND, &reader, &mut display);

        assert_eq!(panel.max_khz_seen(), 2_000_000);
        // round(60 * f / max)
        assert_eq!(display.sliders, vec![30, 40, 60]);
        for cpu in 0..3 {
            assert_eq!(panel.cpus()[cpu].slider.position, display.sliders[cpu]);
        }
        assert_eq!(display.frequencies[1], "1333 MHz");
        assert_eq!(display.governors[0], "ondemand");
        assert_eq!(display.redraws, 1);
    }

    #[test]
    fn test_dragging_slider_is_left_alone() {
        let reader = FakeReader::new(&[1_000_000, 1_000_000], &["ondemand"; 2]);
        let mut panel = panel_with(&reader, &PanelConfig::default(), 40);
        panel.cpus[1].slider.drag = DragState::Dragging;
        panel.cpus[1].slider.position = 7;
        let mut display = RecordingDisplay::new(2);

        panel.on_tick(SECOND, &reader, &mut display);

        assert_eq!(display.slider_updates, vec![(0, 20)]);
        assert_eq!(panel.cpus()[1].slider.position, 7);
        // text is still refreshed for the dragging CPU
        assert_eq!(display.frequencies[1], "1000 MHz");
    }

    #[test]
    fn test_hidden_slider_not_pushed() {
        let reader = FakeReader::new(&[1_000_000], &["ondemand"]);
        let config = PanelConfig {
            show_slider: false,
            ..PanelConfig::default()
        };
        let mut panel = panel_with(&reader, &config, 40);
        let mut display = RecordingDisplay::new(1);

        panel.on_tick(SECOND, &reader, &mut display);
        assert!(display.slider_updates.is_empty());
        assert_eq!(display.frequencies[0], "1000 MHz");
    }

    #[test]
    fn test_scale_never_shrinks() {
        let reader = FakeReader::new(&[1_000_000, 1_000_000], &["ondemand"; 2]);
        let mut panel = panel_with(&reader, &PanelConfig::default(), 40);
        let mut display = RecordingDisplay::new(2);

        let mut last = panel.max_khz_seen();
        for khz in [2_500_000, 900_000, 3_000_000, 100_000, 0] {
            reader.set_freq(0, khz);
            panel.on_tick(SECOND, &reader, &mut display);
            assert!(panel.max_khz_seen() >= last);
            last = panel.max_khz_seen();
        }
        assert_eq!(last, 3_000_000);
    }

    #[test]
    fn test_new_peak_rescales_every_slider() {
        let reader = FakeReader::new(&[1_000_000, 1_000_000], &["ondemand"; 2]);
        let mut panel = panel_with(&reader, &PanelConfig::default(), 40);
        let mut display = RecordingDisplay::new(2);

        reader.set_freq(0, 4_000_000);
        panel.on_tick(SECOND, &reader, &mut display);
        assert_eq!(display.sliders, vec![40, 10]);
    }

    #[test]
    fn test_unreadable_cpu_shows_zero() {
        let reader = FakeReader::new(&[1_000_000, 1_000_000], &["ondemand", ""]);
        let mut panel = panel_with(&reader, &PanelConfig::default(), 40);
        let mut display = RecordingDisplay::new(2);

        reader.set_freq(1, 0);
        panel.on_tick(SECOND, &reader, &mut display);
        assert_eq!(display.frequencies[1], "0 MHz");
        assert_eq!(display.governors[1], "");
        assert_eq!(display.sliders[1], 0);
        assert_eq!(display.frequencies[0], "1000 MHz");
    }

    #[test]
    fn test_governor_read_once_per_tick_when_shown() {
        let reader = FakeReader::new(&[1_000_000; 4], &["ondemand"; 4]);
        let mut panel = panel_with(&reader, &PanelConfig::default(), 40);
        let mut display = RecordingDisplay::new(4);
        *reader.governor_reads.borrow_mut() = 0;

        panel.on_tick(SECOND, &reader, &mut display);
        assert_eq!(*reader.governor_reads.borrow(), 4);
    }

    #[test]
    fn test_hidden_governor_stays_fresh() {
        let reader = FakeReader::new(&[1_000_000; 2], &["ondemand"; 2]);
        let config = PanelConfig {
            show_governor: false,
            ..PanelConfig::default()
        };
        let mut panel = panel_with(&reader, &config, 40);
        let mut display = RecordingDisplay::new(2);
        *reader.governor_reads.borrow_mut() = 0;

        reader.set_governor(0, "performance");
        panel.on_tick(SECOND, &reader, &mut display);

        // read once through the frequency path, but not rendered
        assert_eq!(*reader.governor_reads.borrow(), 2);
        assert_eq!(panel.cpus()[0].sample.governor, "performance");
        assert_eq!(display.governors[0], "");

        // turning the display on shows the current name on the next tick
        reader.set_governor(0, "userspace");
        panel.apply_config(&PanelConfig::default());
        panel.on_tick(SECOND, &reader, &mut display);
        assert_eq!(display.governors[0], "userspace");
        assert_eq!(*reader.governor_reads.borrow(), 4);
    }

    #[test]
    fn test_tick_clock_flags_each_second_once() {
        let start = Instant::now();
        let mut clock = TickClock::new(start);
        let at = |ms: u64| start + Duration::from_millis(ms);

        assert!(!clock.tick_at(at(250)).second_elapsed);
        assert!(!clock.tick_at(at(750)).second_elapsed);
        assert!(clock.tick_at(at(1_000)).second_elapsed);
        assert!(!clock.tick_at(at(1_250)).second_elapsed);
        assert!(!clock.tick_at(at(1_999)).second_elapsed);
        // a long stall still yields one refresh
        assert!(clock.tick_at(at(4_100)).second_elapsed);
        assert!(!clock.tick_at(at(4_200)).second_elapsed);
    }

    #[test]
    fn test_until_next_second() {
        let start = Instant::now();
        let clock = TickClock::new(start);
        assert_eq!(
            clock.until_next_second(start + Duration::from_millis(1_300)),
            Duration::from_millis(700)
        );
    }
}
