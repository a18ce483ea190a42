//! # padframe Monitor
//!
//! Text-mode debug monitor for a gamepad.
//!
//! Polls the first connected controller every frame and redraws its
//! normalized state, button edges and rumble status in the terminal.
//!
//! # Control Flow
//!
//! 1. **Initialization**
//!    - Load configuration (argument, `config/default.toml`, or defaults)
//!    - Set up logging with tracing subscriber
//!    - Open the evdev driver and look for a controller
//!
//! 2. **Main Loop**
//!    - Update and redraw at `refresh_interval_ms`
//!    - `v` / `b` (followed by Enter) start the strong / weak rumble preset
//!    - `q` or Ctrl+C exits
//!
//! 3. **Shutdown**
//!    - Stop rumble and reset state
//!    - Restore the terminal cursor
//!
//! # Examples
//!
//! ```bash
//! cargo run --release -- config/default.toml
//! ```

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use padframe::config::{Config, LoggingConfig};
use padframe::controller::GamepadController;
use padframe::display::render;
use padframe::driver::evdev::EvdevDriver;

/// Configuration file used when no path is given
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// ANSI: clear screen and hide cursor
const SCREEN_ENTER: &str = "\x1b[2J\x1b[?25l";

/// ANSI: move cursor to top-left
const CURSOR_HOME: &str = "\x1b[H";

/// ANSI: show cursor
const SCREEN_LEAVE: &str = "\x1b[?25h\n";

/// Monitor commands read from stdin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Quit,
    VibrateStrong,
    VibrateWeak,
}

fn parse_command(line: &str) -> Option<Command> {
    match line.trim() {
        "q" | "Q" => Some(Command::Quit),
        "v" | "V" => Some(Command::VibrateStrong),
        "b" | "B" => Some(Command::VibrateWeak),
        _ => None,
    }
}

fn load_config() -> Result<Config> {
    match std::env::args().nth(1) {
        Some(path) => {
            Config::load(&path).with_context(|| format!("Failed to load config from {}", path))
        }
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::load(DEFAULT_CONFIG_PATH)
            .with_context(|| format!("Failed to load config from {}", DEFAULT_CONFIG_PATH)),
        None => Ok(Config::default()),
    }
}

/// Installs the tracing subscriber.
///
/// Stdout belongs to the monitor screen, so logs go to a file when one is
/// configured and to stderr otherwise. The returned guard must be held until
/// exit to flush the file writer.
fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match &config.file {
        Some(file) => {
            let path = Path::new(file);
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("Log file {} has no file name", file))?;

            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

/// Forwards stdin commands from a dedicated thread.
///
/// A plain thread rather than `tokio::io::stdin` so a pending read never
/// holds up runtime shutdown.
fn spawn_command_reader() -> mpsc::UnboundedReceiver<Command> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if let Some(command) = parse_command(&line) {
                if tx.send(command).is_err() {
                    break;
                }
            }
        }
    });
    rx
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = load_config()?;
    let _log_guard = init_logging(&config.logging)?;

    info!("padframe v{} starting...", env!("CARGO_PKG_VERSION"));

    let driver = EvdevDriver::new(config.driver.max_slots, config.driver.rescan_interval_ms);
    let mut pad = GamepadController::new(driver, config.controller_settings());
    if !pad.initialize() {
        warn!("No controller found yet, waiting for one");
    }

    let mut commands = spawn_command_reader();
    let mut frame = interval(Duration::from_millis(config.display.refresh_interval_ms));
    frame.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut stdout = std::io::stdout();
    write!(stdout, "{}", SCREEN_ENTER)?;
    stdout.flush()?;

    let mut frame_count: u64 = 0;

    // Main loop
    loop {
        tokio::select! {
            _ = frame.tick() => {
                pad.update();
                frame_count += 1;

                write!(stdout, "{}{}", CURSOR_HOME, render(&pad))?;
                stdout.flush()?;
            }

            Some(command) = commands.recv() => {
                match command {
                    Command::Quit => {
                        info!("Quit requested");
                        break;
                    }
                    Command::VibrateStrong => pad.start_vibration_with(&config.vibration.strong()),
                    Command::VibrateWeak => pad.start_vibration_with(&config.vibration.weak()),
                }
            }

            // Handle Ctrl+C for graceful shutdown
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    pad.finalize();
    write!(stdout, "{}", SCREEN_LEAVE)?;
    stdout.flush()?;

    info!("Total frames: {}", frame_count);
    Ok(())
}
