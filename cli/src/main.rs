//! Dial CLI - binary entry point and terminal session management.
//!
//! The CLI bridges [`dial_engine`] (interaction state) and [`dial_tui`]
//! (rendering), providing RAII-based terminal management with guaranteed
//! cleanup.
//!
//! # Event Loop
//!
//! A fixed ~60 FPS render cadence:
//!
//! 1. Wait for frame tick
//! 2. Drain the input queue (non-blocking, fed by a blocking reader task)
//! 3. Spawn any action invocations the app queued
//! 4. Apply emitted value changes
//! 5. Render frame
//! 6. Check for quit

mod assets;

use anyhow::{Context, Result, bail};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::future::BoxFuture;
use ratatui::prelude::*;
use std::{
    env,
    fs::{self, OpenOptions},
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use dial_engine::{ActionHandler, validation};
use dial_tui::{App, Palette, draw, handle_event};
use dial_types::{ResolvedSchema, Schema, SettingKind, ValueMap};

const USAGE: &str = "\
dial - keyboard-driven settings TUI

USAGE:
    dial [OPTIONS]

OPTIONS:
    --schema <PATH>    Load the settings schema from a TOML file
                       (defaults to the built-in demo schema)
    --values <PATH>    Seed the value map from a TOML file
    --out <PATH>       Write the final value map to a TOML file on exit
    --check            Validate the schema and values, then exit
    -h, --help         Show this help
";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // If we can't open a log file, prefer "no logs" over corrupting the TUI
    // by writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: <data dir>/dial/logs/dial.log
    if let Some(data_dir) = dirs::data_dir() {
        candidates.push(data_dir.join("dial").join("logs").join("dial.log"));
    }

    // Fallback: ./.dial/logs/dial.log (useful in constrained environments)
    candidates.push(PathBuf::from(".dial").join("logs").join("dial.log"));

    candidates
}

struct CliArgs {
    schema: Option<PathBuf>,
    values: Option<PathBuf>,
    out: Option<PathBuf>,
    check: bool,
}

/// Hand-rolled flag parsing; `None` means help was printed.
fn parse_args() -> Result<Option<CliArgs>> {
    let mut parsed = CliArgs {
        schema: None,
        values: None,
        out: None,
        check: false,
    };
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--schema" => {
                parsed.schema = Some(PathBuf::from(
                    args.next().context("--schema requires a path")?,
                ));
            }
            "--values" => {
                parsed.values = Some(PathBuf::from(
                    args.next().context("--values requires a path")?,
                ));
            }
            "--out" => {
                parsed.out = Some(PathBuf::from(args.next().context("--out requires a path")?));
            }
            "--check" => parsed.check = true,
            "-h" | "--help" => {
                print!("{USAGE}");
                return Ok(None);
            }
            other => bail!("unknown argument `{other}` (try --help)"),
        }
    }
    Ok(Some(parsed))
}

fn load_schema(path: Option<&Path>) -> Result<ResolvedSchema> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading schema {}", path.display()))?,
        None => assets::demo_schema().to_string(),
    };
    let schema: Schema = toml::from_str(&text).context("parsing schema TOML")?;
    schema.resolve().context("resolving schema")
}

fn load_values(path: &Path) -> Result<ValueMap> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading values {}", path.display()))?;
    toml::from_str(&text).context("parsing values TOML")
}

fn save_values(path: &Path, values: &ValueMap) -> Result<()> {
    let text = toml::to_string_pretty(values).context("serializing values")?;
    fs::write(path, text).with_context(|| format!("writing values {}", path.display()))
}

/// Run every setting's synchronous rules against the loaded values and
/// report failures. Returns the number of failing settings.
fn check_values(schema: &ResolvedSchema, values: &ValueMap) -> usize {
    let mut failures = 0;
    for def in schema.settings() {
        if matches!(def.kind, SettingKind::Action) {
            continue;
        }
        let current = values.get(&def.key).or(def.default.as_ref());
        if let Some(message) = validation::check(def, current) {
            println!("{}: {message}", def.key);
            failures += 1;
        }
    }
    failures
}

/// Demo action handler: logs, simulates work, and fails for ids ending in
/// `fail` so the busy/error paths can be exercised by hand.
fn demo_action_handler() -> ActionHandler {
    Arc::new(|id: &str| {
        let id = id.to_string();
        let work: BoxFuture<'static, Result<()>> = Box::pin(async move {
            tracing::info!(action = %id, "action started");
            tokio::time::sleep(Duration::from_millis(750)).await;
            if id.ends_with("fail") {
                bail!("action `{id}` is wired to fail");
            }
            tracing::info!(action = %id, "action finished");
            Ok(())
        });
        work
    })
}

/// RAII wrapper for terminal state with guaranteed cleanup on drop.
///
/// Raw mode and the alternate screen are restored on drop, so the terminal
/// stays usable after panics or early returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;

        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }

        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(terminal) => terminal,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen);
                return Err(err.into());
            }
        };

        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Feed terminal events into a channel from a blocking reader task.
///
/// The task exits once the receiving half is dropped.
fn spawn_input() -> mpsc::UnboundedReceiver<Event> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::task::spawn_blocking(move || {
        loop {
            match event::poll(Duration::from_millis(50)) {
                Ok(true) => match event::read() {
                    Ok(terminal_event) => {
                        if tx.send(terminal_event).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(%err, "input read failed");
                        break;
                    }
                },
                Ok(false) => {
                    if tx.is_closed() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!(%err, "input poll failed");
                    break;
                }
            }
        }
    });
    rx
}

const FRAME_DURATION: Duration = Duration::from_millis(16);

async fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let mut input = spawn_input();
    let palette = Palette::standard();
    let mut frames = tokio::time::interval(FRAME_DURATION);
    frames.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        frames.tick().await;

        // Non-blocking input (drain queue only)
        while let Ok(terminal_event) = input.try_recv() {
            handle_event(app, &terminal_event);
        }

        for invocation in app.take_invocations() {
            tokio::spawn(invocation);
        }
        app.drain_changes();

        terminal.draw(|frame| draw(frame, app, &palette))?;

        if app.should_quit() {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let Some(args) = parse_args()? else {
        return Ok(());
    };

    if args.check {
        // Plain stdout mode, no terminal takeover and no log file needed.
        let schema = load_schema(args.schema.as_deref())?;
        let values = match &args.values {
            Some(path) => load_values(path)?,
            None => ValueMap::new(),
        };
        let settings = schema.settings().count();
        let failures = check_values(&schema, &values);
        if failures > 0 {
            bail!("{failures} of {settings} settings failed validation");
        }
        println!(
            "schema OK: {} pages, {settings} settings",
            schema.pages().len()
        );
        return Ok(());
    }

    init_tracing();

    let schema = load_schema(args.schema.as_deref())?;
    let values = match &args.values {
        Some(path) => load_values(path)?,
        None => ValueMap::new(),
    };

    let mut app = App::new(schema, values).with_action_handler(demo_action_handler());

    {
        let mut session = TerminalSession::new()?;
        run_app(&mut session.terminal, &mut app).await?;
    }

    if let Some(out) = &args.out {
        save_values(out, app.values())?;
        println!("Wrote values to {}", out.display());
    }

    Ok(())
}
