// In app/src/main.rs

use analytics::{daily_totals, streaks, MetricsEngine};
use anyhow::{Context, Result};
use app_config::Settings;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use core_types::{DateWindow, Granularity, Locale};
use rayon::prelude::*;
use std::path::PathBuf;
use std::time::Instant;
use tokio::task;
use tracing_subscriber::prelude::*;

mod report;
mod snapshot;

use crate::report::{print_calendar, print_granularity_summary, print_report, ReportOptions};
use crate::snapshot::load_snapshot;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "Equity curve, drawdown and performance metrics for a trading journal."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Computes the dashboard metrics for a journal snapshot.
    Report {
        /// Path to the snapshot JSON (`{ "trades": [...], "accounts": [...] }`).
        #[arg(short, long)]
        file: PathBuf,

        /// Bucket size: daily, weekly, monthly, quarterly or yearly.
        #[arg(short, long)]
        granularity: Option<Granularity>,

        /// Label language: en or zh.
        #[arg(short, long)]
        locale: Option<Locale>,

        /// Comma-separated account ids. Every account is active when omitted.
        #[arg(short, long, value_delimiter = ',')]
        accounts: Option<Vec<String>>,

        /// First day shown on the curve (YYYY-MM-DD).
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day shown on the curve; only used together with --start.
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Observation date the curve extends to. Defaults to today (UTC).
        #[arg(long)]
        as_of: Option<NaiveDate>,

        /// Print the full result as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Compute every granularity in parallel and print one line each.
        #[arg(long, conflicts_with = "json")]
        all_granularities: bool,
    },

    /// Prints per-day totals and winning streaks.
    Calendar {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, value_delimiter = ',')]
        accounts: Option<Vec<String>>,
    },

    /// Runs the HTTP API.
    Serve,
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let settings = app_config::load_settings().context("Failed to load configuration")?;
    init_tracing(&settings.app.log_level);

    // Parse command-line arguments.
    let cli = Cli::parse();

    tracing::info!(environment = %settings.app.environment, "Starting journal metrics application");

    match cli.command {
        Commands::Report {
            file,
            granularity,
            locale,
            accounts,
            start,
            end,
            as_of,
            json,
            all_granularities,
        } => {
            let options = ReportOptions {
                accounts,
                granularity: granularity.unwrap_or(settings.report.default_granularity),
                locale: locale.unwrap_or(settings.report.default_locale),
                window: DateWindow::new(start, end),
                as_of: as_of.unwrap_or_else(|| Utc::now().date_naive()),
            };
            handle_report(&settings, file, options, json, all_granularities).await?;
        }
        Commands::Calendar { file, accounts } => {
            handle_calendar(file, accounts)?;
        }
        Commands::Serve => {
            web_server::run(settings).await?;
        }
    }

    tracing::info!("Journal metrics application has finished successfully.");

    Ok(())
}

/// Installs the fmt layer with a default level taken from configuration.
fn init_tracing(log_level: &str) {
    let level = log_level.parse::<tracing::Level>().unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::filter::Targets::new()
            .with_target("tower_http", tracing::Level::INFO)
            .with_default(level),
    );
    tracing_subscriber::registry().with(fmt_layer).init();
}

/// Handles the logic for the `report` subcommand.
async fn handle_report(
    settings: &Settings,
    file: PathBuf,
    options: ReportOptions,
    json: bool,
    all_granularities: bool,
) -> Result<()> {
    let start_time = Instant::now();
    let snapshot = load_snapshot(&file)?;
    let engine = MetricsEngine::new(settings.metrics.clone());
    let query = options.query(&snapshot);

    if all_granularities {
        // Each granularity is an independent pure computation; run them on the rayon pool.
        let rows = task::spawn_blocking(move || {
            Granularity::ALL
                .par_iter()
                .map(|&granularity| {
                    let mut query = query.clone();
                    query.granularity = granularity;
                    (granularity, engine.calculate(&snapshot, &query))
                })
                .collect::<Vec<_>>()
        })
        .await?;
        print_granularity_summary(&rows);
    } else {
        let result = engine.calculate(&snapshot, &query);
        if json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print_report(&result, &query);
        }
    }

    tracing::info!(duration = ?start_time.elapsed(), "Report finished.");
    Ok(())
}

/// Handles the logic for the `calendar` subcommand.
fn handle_calendar(file: PathBuf, accounts: Option<Vec<String>>) -> Result<()> {
    let snapshot = load_snapshot(&file)?;
    let active = snapshot.select_accounts(accounts.as_deref());

    let days = daily_totals(snapshot.trades.iter().filter(|t| active.contains(&t.account_id)));
    let streaks = streaks(days.values().copied());
    print_calendar(&days, streaks);
    Ok(())
}
