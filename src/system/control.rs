//! Privileged cpufreq control commands.
//!
//! Every command is fire-and-forget for the caller: it is queued to one
//! worker thread that runs the helpers strictly one after another. Success
//! is never read back; the next tick shows whatever the OS actually did.

use std::fmt;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use log::{debug, info, warn};

pub const DEFAULT_NEXT_GOVERNOR_CMD: &str = "/usr/sbin/cpufreqnextgovernor";
pub const DEFAULT_CPUFREQ_SET_CMD: &str = "cpufreq-set";

/// A single control request for one CPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    AdvanceGovernor { cpu: usize },
    ForceUserspace { cpu: usize },
    SetFrequency { cpu: usize, khz: u64 },
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlCommand::AdvanceGovernor { cpu } => write!(f, "cpu{cpu}: next governor"),
            ControlCommand::ForceUserspace { cpu } => write!(f, "cpu{cpu}: governor userspace"),
            ControlCommand::SetFrequency { cpu, khz } => write!(f, "cpu{cpu}: frequency {khz} kHz"),
        }
    }
}

/// Sink for the three control operations. Implementations must not block
/// the caller and must not report failures.
pub trait ControlInvoker {
    fn advance_governor(&mut self, cpu: usize);
    fn force_userspace_governor(&mut self, cpu: usize);
    fn set_absolute_frequency(&mut self, cpu: usize, khz: u64);

    /// One-line message for the footer about the last command, if any.
    fn take_notice(&mut self) -> Option<String> {
        None
    }
}

/// Runs the cpufrequtils helpers through `sudo -n`, in dispatch order.
#[derive(Debug)]
pub struct SudoInvoker {
    next_governor_cmd: String,
    cpufreq_set_cmd: String,
    /// `None` when the worker thread could not be started.
    queue: Option<Sender<Vec<String>>>,
}

impl SudoInvoker {
    pub fn new(next_governor_cmd: impl Into<String>, cpufreq_set_cmd: impl Into<String>) -> Self {
        Self::with_launcher("sudo", next_governor_cmd, cpufreq_set_cmd)
    }

    /// Same as `new`, with `launcher` run in place of `sudo`.
    pub fn with_launcher(
        launcher: impl Into<String>,
        next_governor_cmd: impl Into<String>,
        cpufreq_set_cmd: impl Into<String>,
    ) -> Self {
        let launcher = launcher.into();
        let (tx, rx) = mpsc::channel();
        let worker = thread::Builder::new()
            .name("freqpanel-control".into())
            .spawn(move || run_queue(&launcher, rx));
        let queue = match worker {
            Ok(_) => Some(tx),
            Err(e) => {
                warn!("control worker not started, commands disabled: {e}");
                None
            }
        };
        Self {
            next_governor_cmd: next_governor_cmd.into(),
            cpufreq_set_cmd: cpufreq_set_cmd.into(),
            queue,
        }
    }

    /// Argument vector handed to `sudo -n`.
    fn argv(&self, command: ControlCommand) -> Vec<String> {
        match command {
            ControlCommand::AdvanceGovernor { cpu } => {
                vec![self.next_governor_cmd.clone(), cpu.to_string()]
            }
            ControlCommand::ForceUserspace { cpu } => vec![
                self.cpufreq_set_cmd.clone(),
                "-c".into(),
                cpu.to_string(),
                "-g".into(),
                "userspace".into(),
            ],
            ControlCommand::SetFrequency { cpu, khz } => vec![
                self.cpufreq_set_cmd.clone(),
                "-c".into(),
                cpu.to_string(),
                "-f".into(),
                khz.to_string(),
            ],
        }
    }

    fn dispatch(&self, command: ControlCommand) {
        let Some(queue) = &self.queue else {
            debug!("{command}: dropped, no control worker");
            return;
        };
        if queue.send(self.argv(command)).is_err() {
            debug!("{command}: dropped, control worker gone");
        }
    }
}

/// Worker loop: each helper is waited on before the next one starts, so a
/// frequency request never overtakes the governor change queued before it.
/// Ends when the invoker is dropped.
fn run_queue(launcher: &str, rx: Receiver<Vec<String>>) {
    for argv in rx {
        let line = argv.join(" ");
        // -n: never prompt for a password on the raw-mode terminal
        let status = Command::new(launcher)
            .arg("-n")
            .args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match status {
            Ok(status) if !status.success() => debug!("{launcher} {line}: {status}"),
            Ok(_) => {}
            Err(e) => debug!("{launcher} {line}: spawn failed: {e}"),
        }
    }
}

impl Default for SudoInvoker {
    fn default() -> Self {
        Self::new(DEFAULT_NEXT_GOVERNOR_CMD, DEFAULT_CPUFREQ_SET_CMD)
    }
}

impl ControlInvoker for SudoInvoker {
    fn advance_governor(&mut self, cpu: usize) {
        self.dispatch(ControlCommand::AdvanceGovernor { cpu });
    }

    fn force_userspace_governor(&mut self, cpu: usize) {
        self.dispatch(ControlCommand::ForceUserspace { cpu });
    }

    fn set_absolute_frequency(&mut self, cpu: usize, khz: u64) {
        self.dispatch(ControlCommand::SetFrequency { cpu, khz });
    }
}

/// Logs each command instead of running it (`--dry-run`). The last command
/// is also surfaced as a notice so it shows without a log file.
#[derive(Debug, Default)]
pub struct DryRunInvoker {
    last: Option<ControlCommand>,
}

impl DryRunInvoker {
    fn record(&mut self, command: ControlCommand) {
        info!("dry-run: {command}");
        self.last = Some(command);
    }
}

impl ControlInvoker for DryRunInvoker {
    fn advance_governor(&mut self, cpu: usize) {
        self.record(ControlCommand::AdvanceGovernor { cpu });
    }

    fn force_userspace_governor(&mut self, cpu: usize) {
        self.record(ControlCommand::ForceUserspace { cpu });
    }

    fn set_absolute_frequency(&mut self, cpu: usize, khz: u64) {
        self.record(ControlCommand::SetFrequency { cpu, khz });
    }

    fn take_notice(&mut self) -> Option<String> {
        self.last.take().map(|command| format!("dry run: {command}"))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argv_matches_cpufrequtils() {
        let invoker = SudoInvoker::default();
        assert_eq!(
            invoker.argv(ControlCommand::AdvanceGovernor { cpu: 3 }),
            ["/usr/sbin/cpufreqnextgovernor", "3"]
        );
        assert_eq!(
            invoker.argv(ControlCommand::ForceUserspace { cpu: 1 }),
            ["cpufreq-set", "-c", "1", "-g", "userspace"]
        );
        assert_eq!(
            invoker.argv(ControlCommand::SetFrequency { cpu: 0, khz: 1_600_000 }),
            ["cpufreq-set", "-c", "0", "-f", "1600000"]
        );
    }

    #[test]
    fn test_custom_helpers() {
        let invoker = SudoInvoker::new("/opt/bin/nextgov", "/opt/bin/setfreq");
        assert_eq!(
            invoker.argv(ControlCommand::AdvanceGovernor { cpu: 0 })[0],
            "/opt/bin/nextgov"
        );
        assert_eq!(
            invoker.argv(ControlCommand::SetFrequency { cpu: 2, khz: 1 })[0],
            "/opt/bin/setfreq"
        );
    }

    /// Fake launcher: appends its arguments to `log` once done, and takes
    /// longer for the governor change than for the frequency request.
    #[cfg(unix)]
    fn fake_launcher(dir: &std::path::Path, log: &std::path::Path) -> std::path::PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-sudo");
        let script = format!(
            "#!/bin/sh\nshift\ncase \"$*\" in *\"-g userspace\"*) sleep 0.3 ;; esac\necho \"$*\" >> '{}'\n",
            log.display()
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_commands_complete_in_dispatch_order() {
        let tmp = tempfile::tempdir().unwrap();
        let log = tmp.path().join("done.log");
        let launcher = fake_launcher(tmp.path(), &log);

        let mut invoker =
            SudoInvoker::with_launcher(launcher.display().to_string(), "nextgov", "cpufreq-set");
        invoker.force_userspace_governor(0);
        invoker.set_absolute_frequency(0, 1_000_000);

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        let lines = loop {
            let text = std::fs::read_to_string(&log).unwrap_or_default();
            let lines: Vec<String> = text.lines().map(str::to_string).collect();
            if lines.len() >= 2 || std::time::Instant::now() > deadline {
                break lines;
            }
            thread::sleep(std::time::Duration::from_millis(20));
        };
        assert_eq!(
            lines,
            ["cpufreq-set -c 0 -g userspace", "cpufreq-set -c 0 -f 1000000"]
        );
    }

    #[test]
    fn test_dispatch_does_not_wait_for_helper() {
        let mut invoker = SudoInvoker::with_launcher("/nonexistent/launcher", "nextgov", "set");
        invoker.advance_governor(0);
        invoker.set_absolute_frequency(1, 800_000);
        assert_eq!(invoker.take_notice(), None);
    }

    #[test]
    fn test_dry_run_notice() {
        let mut invoker = DryRunInvoker::default();
        assert_eq!(invoker.take_notice(), None);

        invoker.force_userspace_governor(1);
        invoker.set_absolute_frequency(1, 1_200_000);
        assert_eq!(
            invoker.take_notice().as_deref(),
            Some("dry run: cpu1: frequency 1200000 kHz")
        );
        assert_eq!(invoker.take_notice(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ControlCommand::SetFrequency { cpu: 2, khz: 800_000 }.to_string(),
            "cpu2: frequency 800000 kHz"
        );
    }
}
