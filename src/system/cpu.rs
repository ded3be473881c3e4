/// Upper bound on the number of CPUs the panel manages.
pub const MAX_CPUS: usize = 8;

/// Read-only view of the cpufreq state the OS exposes for each CPU.
///
/// Every call re-queries the OS. A read that fails degrades to "no data"
/// (0 kHz, empty governor) instead of erroring, so one unreadable CPU never
/// aborts a refresh of the others.
pub trait HardwareReader {
    /// Current frequency in kHz, 0 when unreadable.
    fn read_frequency(&self, cpu: usize) -> u64;

    /// Current governor name, empty when the policy cannot be obtained.
    fn read_governor(&self, cpu: usize) -> String;

    /// Hardware `(min_khz, max_khz)` limits, `(0, 0)` when unreadable.
    fn read_hardware_limits(&self, cpu: usize) -> (u64, u64);

    /// Whether a CPU with this index is present.
    fn cpu_exists(&self, cpu: usize) -> bool;
}

/// Probe CPU indices from 0 until one is absent. Indices at or past
/// `MAX_CPUS` are never queried.
pub fn detect_cpu_count(reader: &dyn HardwareReader) -> usize {
    (0..MAX_CPUS)
        .take_while(|&cpu| reader.cpu_exists(cpu))
        .count()
}

/// Highest hardware maximum across the first `ncpu` CPUs.
pub fn hardware_max_khz(reader: &dyn HardwareReader, ncpu: usize) -> u64 {
    (0..ncpu)
        .map(|cpu| reader.read_hardware_limits(cpu).1)
        .max()
        .unwrap_or(0)
}

/// Format a kHz reading the way the panel shows it: rounded megahertz.
pub fn format_mhz(khz: u64) -> String {
    format!("{} MHz", (khz + 500) / 1000)
}


#[cfg(test)]
mod tests {
    use super::testing::FakeReader;
    use super::*;

    #[test]
    fn test_detect_caps_at_max_cpus() {
        let reader = FakeReader::new(&[1_000_000; 10], &["ondemand"; 10]);

        assert_eq!(detect_cpu_count(&reader), 8);
        assert!(reader.queried.borrow().iter().all(|&cpu| cpu < MAX_CPUS));
    }

    #[test]
    fn test_detect_stops_at_first_gap() {
        let reader = FakeReader::new(&[1_000_000; 3], &["ondemand"; 3]);
        assert_eq!(detect_cpu_count(&reader), 3);
    }

    #[test]
    fn test_detect_zero_cpus() {
        let reader = FakeReader::default();
        assert_eq!(detect_cpu_count(&reader), 0);
        assert_eq!(hardware_max_khz(&reader, 0), 0);
    }

    #[test]
    fn test_hardware_max_takes_largest_limit() {
        let mut reader = FakeReader::new(&[0, 0], &["", ""]);
        reader.limits = vec![(400_000, 2_400_000), (400_000, 3_100_000)];
        assert_eq!(hardware_max_khz(&reader, 2), 3_100_000);
    }

    #[test]
    fn test_format_mhz_rounds() {
        assert_eq!(format_mhz(0), "0 MHz");
        assert_eq!(format_mhz(1_499_499), "1499 MHz");
        assert_eq!(format_mhz(1_499_500), "1500 MHz");
    }
}
