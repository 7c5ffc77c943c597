// avicola - poultry farm records in the terminal
//
// Tracks flocks, feed stock and consumption, and sales against a farm
// backend's HTTP API.
//
// Architecture:
// - API client (reqwest): maps the backend's report/record endpoints
// - Farm pages: per-module collections, form state, summaries
// - TUI (ratatui): tabs, tables, form panel, toasts
// - Demo backend: in-memory stand-in behind the same trait
// - Report: headless plain-text output of the same tables

mod api;
mod cli;
mod config;
mod demo;
mod farm;
mod logging;
mod report;
mod startup;
mod tui;
mod util;

use anyhow::{Context, Result};
use api::{FarmApi, HttpFarmApi};
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use demo::DemoFarmApi;
use farm::SalesPage;
use logging::{ActivityLayer, ActivityLog};
use report::ReportModule;
use std::sync::Arc;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Artificial delay on demo backend calls so the loading spinner shows
const DEMO_LATENCY: Duration = Duration::from_millis(300);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let report_module = match cli.command {
        Some(Commands::Config {
            show,
            reset,
            edit,
            path,
        }) => return cli::handle_config(show, reset, edit, path),
        Some(Commands::Report { module }) => Some(module),
        None => None,
    };

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let config = Config::from_env()?;

    // `report` and AVICOLA_NO_TUI both print to stdout instead of the TUI
    let headless = report_module.is_some() || !config.enable_tui;
    let activity = ActivityLog::new();
    let _file_guard = init_tracing(&config, headless, &activity);

    let api: Arc<dyn FarmApi> = if config.demo_mode {
        tracing::info!("Running in DEMO MODE with in-memory records");
        Arc::new(DemoFarmApi::seeded().with_latency(DEMO_LATENCY))
    } else {
        let http = HttpFarmApi::new(&config.api_url, config.request_timeout())
            .context("Failed to build HTTP client")?;
        tracing::debug!(base_url = http.base_url(), "Farm backend client ready");
        Arc::new(http)
    };

    // Sales are local-only; demo mode starts with the sample sales
    let sales = if config.demo_mode {
        SalesPage::with_records(demo::demo_sales())
    } else {
        SalesPage::new()
    };

    startup::print_startup(&config);
    startup::log_startup(&config);

    if headless {
        let module = report_module.unwrap_or(ReportModule::All);
        tracing::info!(module = ?module, "Printing report");
        let text = report::build_report(api.as_ref(), module, &sales).await;
        print!("{}", text);
    } else {
        tracing::info!("Starting TUI");
        if let Err(e) = tui::run_tui(&config, api, activity, sales).await {
            tracing::error!("TUI error: {:?}", e);
            return Err(e);
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Install the global subscriber
///
/// TUI mode captures events into the activity log (printing would garble the
/// alternate screen); headless mode writes to stderr. File logging adds a
/// JSON layer through a non-blocking writer whose guard the caller must hold.
///
/// Precedence: RUST_LOG env var > config file > default "info"
fn init_tracing(config: &Config, headless: bool, activity: &ActivityLog) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.filter_directive().into());

    let (file_layer, guard) = if config.logging.file_enabled {
        let logging = &config.logging;
        match std::fs::create_dir_all(&logging.file_dir) {
            Ok(()) => {
                let appender = logging
                    .file_rotation
                    .appender(&logging.file_dir, &logging.file_prefix);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_ansi(false);
                (Some(layer), Some(guard))
            }
            Err(e) => {
                eprintln!(
                    "Warning: Could not create log directory {:?}: {}",
                    logging.file_dir, e
                );
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    let activity_layer = (!headless).then(|| ActivityLayer::new(activity.clone()));
    let stderr_layer =
        headless.then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(activity_layer)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    guard
}
