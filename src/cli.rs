use std::path::PathBuf;

use clap::Parser;
use simplelog::LevelFilter;

use crate::system::control::{DEFAULT_CPUFREQ_SET_CMD, DEFAULT_NEXT_GOVERNOR_CMD};
use crate::system::sysfs::DEFAULT_SYSFS_ROOT;

/// freqpanel: per-CPU frequency and cpufreq governor panel
#[derive(Parser, Debug)]
#[command(name = "freqpanel")]
#[command(author, version, about)]
#[command(long_about = "Shows the current frequency and governor of every CPU, refreshed \n\
    once a second. Drag a CPU's slider to request a fixed frequency, click \n\
    its governor to switch to the next one, right click for setup.\n\n\
    Control commands run through `sudo -n`, so the helpers must be allowed \n\
    without a password.")]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/freqpanel/freqpanelrc)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Root of the per-CPU sysfs tree
    #[arg(long, default_value = DEFAULT_SYSFS_ROOT)]
    pub sysfs_root: PathBuf,

    /// Log control commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Helper that switches a CPU to its next governor
    #[arg(long, default_value = DEFAULT_NEXT_GOVERNOR_CMD)]
    pub next_governor_cmd: String,

    /// cpufrequtils `cpufreq-set` binary
    #[arg(long, default_value = DEFAULT_CPUFREQ_SET_CMD)]
    pub cpufreq_set_cmd: String,

    /// Write logs to this file (the terminal belongs to the panel)
    #[arg(long, env = "FREQPANEL_LOG_PATH")]
    pub log_file: Option<PathBuf>,

    /// Log level: error, warn, info, debug, trace (default: $RUST_LOG or info)
    #[arg(long)]
    pub log_level: Option<LevelFilter>,
}
