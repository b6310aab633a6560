//! Folio page replay
//!
//! Drives the portfolio page view headlessly: a layout and a recorded
//! session go in, the presentation commands the page would apply come out.
//!
//! ## Usage
//!
//! ```bash
//! # Replay the built-in demo session
//! folio
//!
//! # Replay a session against a page layout, as JSON lines
//! folio --layout page.json --trace session.json --json
//!
//! # Mobile viewport with tuned timings
//! folio --width 390 --height 844 --config folio.json -vv
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use folio_core::{PageConfig, PageLayout};
use folio_ui::Theme;
use tracing::info;

mod demo;
mod trace;

use trace::Replay;

/// Folio - headless portfolio page replay
#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Replay scroll and click sessions against a portfolio page")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Page layout JSON (default: built-in demo page)
    #[arg(short, long)]
    layout: Option<PathBuf>,

    /// Behaviour configuration JSON
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Session to replay (default: built-in demo session)
    #[arg(short, long)]
    trace: Option<PathBuf>,

    /// Viewport width in CSS pixels
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height in CSS pixels
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Initial colour scheme
    #[arg(long, value_enum, default_value_t = ThemeArg::Dark)]
    theme: ThemeArg,

    /// Print one JSON object per command
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => PageConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => PageConfig::default(),
    };
    let layout = match &cli.layout {
        Some(path) => PageLayout::load(path).with_context(|| format!("loading layout {}", path.display()))?,
        None => demo::layout(),
    };
    let steps = match &cli.trace {
        Some(path) => trace::load_trace(path)?,
        None => demo::trace(),
    };

    info!(
        sections = layout.sections.len(),
        steps = steps.len(),
        width = cli.width,
        height = cli.height,
        "starting replay"
    );

    let replay = Replay::new(config, layout, cli.width, cli.height, cli.theme.into());
    let log = replay.run(&steps);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for emitted in &log {
        if cli.json {
            serde_json::to_writer(&mut out, emitted)?;
            writeln!(out)?;
        } else {
            writeln!(
                out,
                "{:>7}ms  {}",
                emitted.at_ms,
                serde_json::to_string(&emitted.command)?
            )?;
        }
    }

    info!(
        commands = log.len(),
        nav_mode = ?replay.page().nav_mode(),
        active = ?replay.page().active_section(),
        theme = %replay.chrome().theme.current(),
        "done"
    );
    Ok(())
}
