//! cpufreq readings from the Linux sysfs tree.
//!
//! Layout under the root (default `/sys/devices/system/cpu`):
//!
//!   cpuN/                              existence of CPU N
//!   cpuN/cpufreq/scaling_cur_freq      current frequency (kHz)
//!   cpuN/cpufreq/cpuinfo_cur_freq      fallback current frequency (kHz)
//!   cpuN/cpufreq/scaling_governor      current governor name
//!   cpuN/cpufreq/cpuinfo_{min,max}_freq  hardware limits (kHz)

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use log::debug;

use crate::system::cpu::HardwareReader;

pub const DEFAULT_SYSFS_ROOT: &str = "/sys/devices/system/cpu";

/// `HardwareReader` backed by `/sys/devices/system/cpu`.
#[derive(Debug, Clone)]
pub struct SysfsReader {
    root: PathBuf,
}

impl SysfsReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn cpufreq_file(&self, cpu: usize, name: &str) -> PathBuf {
        self.root.join(format!("cpu{cpu}")).join("cpufreq").join(name)
    }

    fn read_khz(&self, cpu: usize, name: &str) -> Result<u64> {
        read_value(&self.cpufreq_file(cpu, name))
    }
}

impl Default for SysfsReader {
    fn default() -> Self {
        Self::new(DEFAULT_SYSFS_ROOT)
    }
}

impl HardwareReader for SysfsReader {
    fn read_frequency(&self, cpu: usize) -> u64 {
        self.read_khz(cpu, "scaling_cur_freq")
            .or_else(|_| self.read_khz(cpu, "cpuinfo_cur_freq"))
            .unwrap_or_else(|e| {
                debug!("cpu{cpu}: no frequency: {e:#}");
                0
            })
    }

    fn read_governor(&self, cpu: usize) -> String {
        let path = self.cpufreq_file(cpu, "scaling_governor");
        match fs::read_to_string(&path) {
            Ok(s) => s.trim().to_string(),
            Err(e) => {
                debug!("cpu{cpu}: no governor at {}: {e}", path.display());
                String::new()
            }
        }
    }

    fn read_hardware_limits(&self, cpu: usize) -> (u64, u64) {
        let limits = self
            .read_khz(cpu, "cpuinfo_min_freq")
            .and_then(|min| Ok((min, self.read_khz(cpu, "cpuinfo_max_freq")?)));
        limits.unwrap_or_else(|e| {
            debug!("cpu{cpu}: no hardware limits: {e:#}");
            (0, 0)
        })
    }

    fn cpu_exists(&self, cpu: usize) -> bool {
        self.root.join(format!("cpu{cpu}")).is_dir()
    }
}

fn read_value<T>(path: &Path) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    raw.trim()
        .parse()
        .with_context(|| format!("parse {}: {:?}", path.display(), raw.trim()))
}
