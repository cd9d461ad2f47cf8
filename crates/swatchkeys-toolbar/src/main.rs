//! SwatchKeys - replays key presses from stdin through the shortcut engine
//!
//! Each input line is one key press such as `c-a-s-q` or `g`. Fired shortcuts
//! run against a simulated toolbar and the resulting clicks are printed.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use swatchkeys_toolbar::settings::load_automation_config;
use swatchkeys_toolbar::{
    AutomationConfig, FileSettingsStore, ShortcutApp, SimulatedToolbar, ToolbarAutomation,
};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Drawing toolbar shortcuts
#[derive(Parser, Debug)]
#[command(name = "swatchkeys")]
#[command(about = "Replay key presses through the drawing toolbar shortcuts")]
#[command(version)]
struct Cli {
    /// Settings file (JSON, or YAML with a .yaml/.yml extension)
    #[arg(short, long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only print warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the multi-key sequence timeout
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        tracing::Level::WARN
    } else if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut store = match cli.settings {
        Some(path) => FileSettingsStore::new(path),
        None => FileSettingsStore::with_default_location(),
    };
    tracing::debug!(path = %store.path().display(), "using settings");

    let mut app = ShortcutApp::from_settings(&mut store)?;
    if let Some(timeout_ms) = cli.timeout_ms {
        app.engine_mut().config_mut().sequence_timeout_ms = timeout_ms;
    }

    let automation_config = load_automation_config(&store).unwrap_or_else(|e| {
        tracing::warn!("Failed to load automation settings, using defaults: {}", e);
        AutomationConfig::default()
    });
    let mut automation = ToolbarAutomation::new(SimulatedToolbar::new(), automation_config);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut fired = 0;
    while let Some(line) = lines.next_line().await? {
        let spec = line.trim();
        if spec.is_empty() {
            continue;
        }

        let event = match app.parse_key(spec) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Skipping key {:?}: {}", spec, e);
                continue;
            }
        };

        let outcome = app.handle_key(&event);
        tracing::debug!(key = spec, ?outcome, "key handled");
        if outcome.is_handled() {
            fired += 1;
        }
        app.run_pending(&mut automation).await;
    }

    let toolbar = automation.into_inner();
    println!("Shortcuts fired: {}", fired);
    for click in toolbar.clicks() {
        println!("  {:?}", click);
    }
    for alert in toolbar.alerts() {
        println!("Alert: {}", alert);
    }
    if let Some(color) = toolbar.selected_color() {
        println!("Selected color: {}", color);
    }
    println!("Selected pen: {}", toolbar.selected_pen());

    Ok(())
}
