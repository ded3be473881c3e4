//! freqpanel configuration persistence (htoprc-style key=value format)
//!
//! Saves/loads settings to `$XDG_CONFIG_HOME/freqpanel/freqpanelrc`, all
//! keys under one `[cpufreq]` section.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Section the panel's keys live under.
const SECTION: &str = "cpufreq";

/// Default config file path: `$XDG_CONFIG_HOME/freqpanel/freqpanelrc`,
/// falling back to `$HOME/.config/freqpanel/freqpanelrc`.
pub fn config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("freqpanel").join("freqpanelrc"))
}

/// Persistable panel settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelConfig {
    /// Highest frequency seen, carried into the next run.
    pub max_khz_seen: u64,
    pub show_governor: bool,
    pub show_slider: bool,
    pub set_userspace_on_drag: bool,
    pub couple_controls: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            max_khz_seen: 0,
            show_governor: true,
            show_slider: true,
            set_userspace_on_drag: true,
            couple_controls: false,
        }
    }
}

impl PanelConfig {
    /// Load config from file, returning defaults if it doesn't exist
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(_) => Self::default(),
        }
    }

    /// Parse rc text. Lines outside `[cpufreq]`, unknown keys and values
    /// that don't parse are skipped, leaving the default in place.
    pub fn parse(content: &str) -> Self {
        let mut cfg = Self::default();
        let mut in_section = false;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                in_section = name.trim() == SECTION;
                continue;
            }
            if !in_section {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "max_khz_seen" => {
                    if let Ok(v) = value.parse::<u64>() {
                        cfg.max_khz_seen = v;
                    }
                }
                "show_governor" => set_flag(&mut cfg.show_governor, value),
                "show_slider" => set_flag(&mut cfg.show_slider, value),
                "set_userspace_on_drag" => set_flag(&mut cfg.set_userspace_on_drag, value),
                "couple_controls" => set_flag(&mut cfg.couple_controls, value),
                _ => {} // Ignore unknown keys
            }
        }

        cfg
    }

    pub fn to_rc_string(&self) -> String {
        let b = |v: bool| if v { "1" } else { "0" };

        let lines = [
            "# freqpanel configuration file".to_string(),
            "# Auto-generated, rewritten on apply and on exit".to_string(),
            String::new(),
            format!("[{SECTION}]"),
            format!("max_khz_seen={}", self.max_khz_seen),
            format!("show_governor={}", b(self.show_governor)),
            format!("show_slider={}", b(self.show_slider)),
            format!("set_userspace_on_drag={}", b(self.set_userspace_on_drag)),
            format!("couple_controls={}", b(self.couple_controls)),
        ];
        lines.join("\n") + "\n"
    }

    /// Save config to file, creating the parent directory.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config dir {}", parent.display()))?;
        }
        fs::write(path, self.to_rc_string())
            .with_context(|| format!("write config file {}", path.display()))
    }
}

/// Booleans are stored as 0/1; anything else keeps the current value.
fn set_flag(flag: &mut bool, value: &str) {
    match value {
        "1" => *flag = true,
        "0" => *flag = false,
        _ => {}
    }
}
