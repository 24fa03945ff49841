#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal front end for `RiskLens`.
//!
//! ```text
//! risk_lens search <place>
//! risk_lens analyze --lat 39.78 --lon -89.65 [--label "Springfield"] [--json]
//! risk_lens chat
//! risk_lens history [--clear]
//! ```
//!
//! Running `risk_lens` with no subcommand enters interactive mode. The
//! reasoning provider is chosen from the environment (`AI_PROVIDER`,
//! `GEMINI_API_KEY`, `ANTHROPIC_API_KEY`, `OPENAI_API_KEY`).

mod interactive;
mod progress;
mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dialoguer::Input;
use indicatif::MultiProgress;
use risk_lens_ai::client::ReasoningClient;
use risk_lens_dashboard::history::{DEFAULT_HISTORY_PATH, SearchHistory};
use risk_lens_dashboard::{Dashboard, DashboardEvent, DashboardUpdate};
use risk_lens_risk_models::{Coordinate, LanguageCode, SearchResult};

#[derive(Parser)]
#[command(
    name = "risk_lens",
    about = "Geospatial construction risk analysis with an AI assistant"
)]
struct Cli {
    /// Response language code (en, hi, mr, bn, te, ta, gu, kn, ml, pa, mai)
    #[arg(long, global = true, default_value = "en")]
    language: String,

    /// Search history file
    #[arg(long, global = true, default_value = DEFAULT_HISTORY_PATH)]
    history_path: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a place by name and analyze it
    Search {
        /// Place name
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Analyze one coordinate
    Analyze {
        /// Latitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude in degrees
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Name to analyze the coordinate under
        #[arg(long)]
        label: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Talk to the assistant without a selected location
    Chat,
    /// Show recent searches
    History {
        /// Forget all recent searches
        #[arg(long)]
        clear: bool,
    },
}

/// Builds a dashboard from environment configuration.
///
/// # Errors
///
/// Returns an error if no reasoning provider or geocoder can be configured.
fn build_dashboard(cli: &Cli) -> Result<Dashboard, Box<dyn std::error::Error>> {
    let client = ReasoningClient::from_env()?;
    let geocoder = risk_lens_geocoder::create_geocoder_from_env()?;
    let location = risk_lens_dashboard::location::location_from_env();
    let history = SearchHistory::load(&cli.history_path);
    let language = LanguageCode::parse_or_default(&cli.language);

    log::info!(
        "Responding in {} ({} recent searches)",
        language.label(),
        history.entries().len()
    );

    Ok(
        Dashboard::new(client, Arc::from(geocoder), history, language)
            .with_location(Arc::from(location)),
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = progress::init_logger();
    let cli = Cli::parse();

    if let Some(Commands::History { clear }) = &cli.command {
        let mut history = SearchHistory::load(&cli.history_path);
        if *clear {
            history.clear();
            history.save()?;
            println!("Search history cleared.");
        } else if history.entries().is_empty() {
            println!("No recent searches.");
        } else {
            for (i, query) in history.entries().iter().enumerate() {
                println!("{}. {query}", i + 1);
            }
        }
        return Ok(());
    }

    let mut dashboard = build_dashboard(&cli)?;

    let Some(command) = cli.command else {
        return interactive::run(&mut dashboard, &multi).await;
    };

    match command {
        Commands::Search { query } => {
            let query = query.join(" ");
            let updates = progress::spin(
                &multi,
                &format!("Searching for {query}..."),
                dashboard.process(DashboardEvent::Search(query.clone())),
            )
            .await;
            render::print_updates(&updates);
            exit_on_failure(&updates);
        }
        Commands::Analyze {
            lat,
            lon,
            label,
            json,
        } => {
            let coordinate = Coordinate::new(lat, lon);
            if !coordinate.is_finite() {
                eprintln!("Coordinates must be finite numbers");
                std::process::exit(2);
            }

            let event = match label {
                Some(name) => DashboardEvent::SelectPlace(SearchResult {
                    latitude: lat,
                    longitude: lon,
                    display_name: name,
                }),
                None => DashboardEvent::MapClick(coordinate),
            };

            let updates = progress::spin(&multi, "Analyzing site...", dashboard.process(event)).await;

            if json {
                if let Some(prediction) = dashboard.controller().prediction() {
                    println!("{}", serde_json::to_string_pretty(prediction.as_ref())?);
                }
            } else {
                render::print_updates(&updates);
            }
            exit_on_failure(&updates);
        }
        Commands::Chat => {
            dashboard.process(DashboardEvent::Start).await;
            chat_loop(&mut dashboard, &multi).await?;
        }
        Commands::History { .. } => {}
    }

    Ok(())
}

/// Opens the chat panel and relays messages until an empty line.
///
/// # Errors
///
/// Returns an error if reading from the terminal fails.
async fn chat_loop(
    dashboard: &mut Dashboard,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    if !dashboard.controller().view().chat_open() {
        progress::spin(
            multi,
            "Connecting to assistant...",
            dashboard.process(DashboardEvent::ToggleChat),
        )
        .await;
    }

    let mut shown = 0;
    loop {
        if let Some(session) = dashboard.controller().chat_session() {
            print!("{}", render::format_transcript(&session.turns()[shown..]));
            shown = session.turns().len();
        }

        let message: String = Input::new()
            .with_prompt(format!(
                "Message ({}, empty line to leave)",
                dashboard.controller().location_label()
            ))
            .allow_empty(true)
            .interact_text()?;

        if message.trim().is_empty() {
            break;
        }

        let updates = progress::spin(
            multi,
            "Thinking...",
            dashboard.process(DashboardEvent::SendChat(message)),
        )
        .await;
        render::print_updates(&updates);
    }

    dashboard.process(DashboardEvent::ToggleChat).await;
    Ok(())
}

fn exit_on_failure(updates: &[DashboardUpdate]) {
    let failed = updates.iter().any(|u| {
        matches!(
            u,
            DashboardUpdate::SearchNotFound { .. } | DashboardUpdate::AnalysisFailed { .. }
        )
    });
    if failed {
        std::process::exit(1);
    }
}
