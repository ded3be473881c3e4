//! freqpanel: per-CPU frequency and cpufreq governor panel for the terminal.
//!
//! Features:
//!   - Current frequency and governor of every CPU, refreshed once a second
//!   - Drag a slider to request a fixed frequency
//!   - Click a governor name to cycle to the next governor
//!   - Optional coupling: one gesture drives every CPU
//!
//! Keybindings: Press F1 or '?' for help.

mod app;
mod cli;
mod config;
mod input;
mod mouse;
mod panel;
mod system;
mod ui;

use std::fs::File;
use std::io;
use std::str::FromStr;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use simplelog::{LevelFilter, WriteLogger};
use sysinfo::System;

use app::App;
use cli::Cli;
use panel::reconcile::TickClock;
use system::control::{ControlInvoker, DryRunInvoker, SudoInvoker};
use system::sysfs::SysfsReader;

/// Event poll interval; the panel itself refreshes once per whole second
const TICK_FRACTION_MS: u64 = 250;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config_path = cli.config.clone().or_else(config::config_path);
    let control: Box<dyn ControlInvoker> = if cli.dry_run {
        Box::new(DryRunInvoker::default())
    } else {
        Box::new(SudoInvoker::new(&cli.next_governor_cmd, &cli.cpufreq_set_cmd))
    };
    info!(
        "sysfs root {}, config {:?}, dry run {}",
        cli.sysfs_root.display(),
        config_path,
        cli.dry_run
    );

    let mut app = App::new(
        config_path,
        Box::new(SysfsReader::new(&cli.sysfs_root)),
        control,
    );
    app.brand = cpu_brand();

    // Restore the terminal before a panic message is printed
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        default_hook(panic_info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    restore_terminal()?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Main application loop: one thread delivers keys, pointer events and
/// ticks to the app strictly in turn.
fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut clock = TickClock::new(Instant::now());
    let mut input_seen = true;

    loop {
        let size = terminal.size()?;
        app.update_layout(Rect::new(0, 0, size.width, size.height));

        if app.view.take_redraw() || input_seen {
            terminal.draw(|f| ui::draw(f, &*app))?;
        }

        if app.should_quit {
            return Ok(());
        }

        // Wake at least at every whole-second boundary
        let timeout = Duration::from_millis(TICK_FRACTION_MS)
            .min(clock.until_next_second(Instant::now()));
        input_seen = false;

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // crossterm may report Press and Release; only handle Press
                    if key.kind == KeyEventKind::Press {
                        input::handle_input(app, key);
                        input_seen = true;
                    }
                }
                Event::Mouse(mouse) => {
                    mouse::handle_mouse(app, mouse);
                    input_seen = true;
                }
                Event::Resize(_, _) => input_seen = true,
                _ => {}
            }
        }

        app.on_tick(clock.tick_at(Instant::now()));
    }
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// File logger, only when a log path is given. Level from `--log-level`,
/// then `RUST_LOG`, then info.
fn init_logging(cli: &Cli) -> Result<()> {
    let Some(path) = &cli.log_file else {
        return Ok(());
    };
    let level = cli
        .log_level
        .unwrap_or_else(|| env_log_level(std::env::var("RUST_LOG").ok().as_deref()));

    let file = File::create(path).with_context(|| format!("create log file {}", path.display()))?;
    WriteLogger::init(level, simplelog::Config::default(), file)?;
    Ok(())
}

/// Level named by `RUST_LOG`; anything that is not a plain level name,
/// such as a `target=level` directive, falls back to info.
fn env_log_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|v| LevelFilter::from_str(v.trim()).ok())
        .unwrap_or(LevelFilter::Info)
}

/// CPU model name for the panel title
fn cpu_brand() -> String {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    sys.cpus()
        .first()
        .map(|c| c.brand().trim().to_string())
        .unwrap_or_default()
}
