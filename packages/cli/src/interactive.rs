//! Menu-driven dashboard session using `dialoguer`.

use dialoguer::{Confirm, Input, Select};
use indicatif::MultiProgress;
use risk_lens_dashboard::controller::AnalysisState;
use risk_lens_dashboard::view::Layer;
use risk_lens_dashboard::{Dashboard, DashboardEvent};
use risk_lens_risk_models::{Coordinate, SUPPORTED_LANGUAGES};

use crate::{chat_loop, progress, render};

/// Top-level actions in the interactive menu.
enum Action {
    Search,
    AnalyzeCoordinate,
    MyLocation,
    ShowAnalysis,
    DismissAnalysis,
    Chat,
    Language,
    Layers,
    Alerts,
    History,
    Quit,
}

impl Action {
    const ALL: &[Self] = &[
        Self::Search,
        Self::AnalyzeCoordinate,
        Self::MyLocation,
        Self::ShowAnalysis,
        Self::DismissAnalysis,
        Self::Chat,
        Self::Language,
        Self::Layers,
        Self::Alerts,
        Self::History,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Search => "Search for a place",
            Self::AnalyzeCoordinate => "Analyze a coordinate",
            Self::MyLocation => "Analyze my location",
            Self::ShowAnalysis => "Show current analysis",
            Self::DismissAnalysis => "Dismiss current analysis",
            Self::Chat => "Chat with the assistant",
            Self::Language => "Change language",
            Self::Layers => "Toggle map layers",
            Self::Alerts => "Alerts",
            Self::History => "Recent searches",
            Self::Quit => "Quit",
        }
    }
}

/// Runs the interactive menu until the user quits.
///
/// # Errors
///
/// Returns an error if a terminal prompt fails.
pub async fn run(
    dashboard: &mut Dashboard,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("RiskLens");
    if let Some(alert) = dashboard.controller().alerts().iter().next() {
        println!("{}", alert.message);
    }
    println!();
    dashboard.process(DashboardEvent::Start).await;

    let labels: Vec<&str> = Action::ALL.iter().map(Action::label).collect();

    loop {
        let idx = Select::new()
            .with_prompt(format!(
                "{} [{}]",
                dashboard.controller().location_label(),
                dashboard.controller().language().label()
            ))
            .items(&labels)
            .default(0)
            .interact()?;

        match Action::ALL[idx] {
            Action::Search => handle_search(dashboard, multi).await?,
            Action::AnalyzeCoordinate => handle_coordinate(dashboard, multi).await?,
            Action::MyLocation => {
                let updates = progress::spin(
                    multi,
                    "Locating...",
                    dashboard.process(DashboardEvent::LocateMe),
                )
                .await;
                render::print_updates(&updates);
            }
            Action::ShowAnalysis => show_analysis(dashboard),
            Action::DismissAnalysis => {
                dashboard.process(DashboardEvent::DismissAnalysis).await;
                println!("Analysis dismissed.");
            }
            Action::Chat => chat_loop(dashboard, multi).await?,
            Action::Language => handle_language(dashboard, multi).await?,
            Action::Layers => handle_layers(dashboard).await?,
            Action::Alerts => handle_alerts(dashboard).await?,
            Action::History => handle_history(dashboard, multi).await?,
            Action::Quit => break,
        }
        println!();
    }

    Ok(())
}

async fn handle_search(
    dashboard: &mut Dashboard,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let query: String = Input::new()
        .with_prompt("Place name")
        .allow_empty(true)
        .interact_text()?;

    search(dashboard, multi, query).await;
    Ok(())
}

async fn search(dashboard: &mut Dashboard, multi: &MultiProgress, query: String) {
    if query.trim().is_empty() {
        return;
    }
    let message = format!("Searching for {}...", query.trim());
    let updates = progress::spin(
        multi,
        &message,
        dashboard.process(DashboardEvent::Search(query)),
    )
    .await;
    render::print_updates(&updates);
}

async fn handle_coordinate(
    dashboard: &mut Dashboard,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let latitude: f64 = Input::new().with_prompt("Latitude").interact_text()?;
    let longitude: f64 = Input::new().with_prompt("Longitude").interact_text()?;

    let coordinate = Coordinate::new(latitude, longitude);
    if !coordinate.is_finite() {
        println!("Coordinates must be finite numbers.");
        return Ok(());
    }

    let updates = progress::spin(
        multi,
        "Analyzing site...",
        dashboard.process(DashboardEvent::MapClick(coordinate)),
    )
    .await;
    render::print_updates(&updates);
    Ok(())
}

fn show_analysis(dashboard: &Dashboard) {
    let controller = dashboard.controller();
    match controller.analysis() {
        AnalysisState::Ready(prediction) => {
            print!(
                "{}",
                render::format_prediction(controller.location_label(), prediction)
            );
        }
        AnalysisState::Analyzing(_) => println!("Analysis in progress."),
        AnalysisState::Idle => println!("No analysis. Search for a place or pick a coordinate."),
    }
}

async fn handle_language(
    dashboard: &mut Dashboard,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<String> = SUPPORTED_LANGUAGES
        .iter()
        .map(|l| format!("{} ({})", l.native, l.label))
        .collect();
    let current = SUPPORTED_LANGUAGES
        .iter()
        .position(|l| l.code == dashboard.controller().language())
        .unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Language")
        .items(&labels)
        .default(current)
        .interact()?;

    let updates = progress::spin(
        multi,
        "Switching language...",
        dashboard.process(DashboardEvent::SetLanguage(SUPPORTED_LANGUAGES[idx].code)),
    )
    .await;
    render::print_updates(&updates);
    Ok(())
}

async fn handle_layers(dashboard: &mut Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    let layers: Vec<(Layer, bool)> = dashboard.controller().view().layers().iter().collect();
    let labels: Vec<String> = layers
        .iter()
        .map(|(layer, visible)| format!("{layer} [{}]", if *visible { "on" } else { "off" }))
        .collect();

    let idx = Select::new()
        .with_prompt("Toggle layer")
        .items(&labels)
        .default(0)
        .interact()?;

    let updates = dashboard
        .process(DashboardEvent::ToggleLayer(layers[idx].0))
        .await;
    render::print_updates(&updates);
    Ok(())
}

async fn handle_alerts(dashboard: &mut Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    dashboard.process(DashboardEvent::ToggleNotifications).await;
    let result = dismiss_alert(dashboard).await;
    dashboard.process(DashboardEvent::ToggleNotifications).await;
    result
}

async fn dismiss_alert(dashboard: &mut Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    let alerts = dashboard.controller().alerts();
    print!("{}", render::format_alerts(alerts));
    if alerts.is_empty() {
        return Ok(());
    }

    let mut items: Vec<String> = alerts.iter().map(|a| a.message.clone()).collect();
    let ids: Vec<String> = alerts.iter().map(|a| a.id.clone()).collect();
    items.push("Back".to_string());

    let idx = Select::new()
        .with_prompt("Dismiss an alert")
        .items(&items)
        .default(items.len() - 1)
        .interact()?;

    if let Some(id) = ids.get(idx) {
        dashboard
            .process(DashboardEvent::DismissAlert(id.clone()))
            .await;
        println!("Dismissed.");
    }
    Ok(())
}

async fn handle_history(
    dashboard: &mut Dashboard,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let entries = dashboard.history().entries().to_vec();
    if entries.is_empty() {
        println!("No recent searches.");
        return Ok(());
    }

    let mut items = entries.clone();
    items.push("Clear history".to_string());
    items.push("Back".to_string());

    let idx = Select::new()
        .with_prompt("Recent searches")
        .items(&items)
        .default(0)
        .interact()?;

    if let Some(query) = entries.get(idx) {
        search(dashboard, multi, query.clone()).await;
    } else if idx == entries.len() {
        let confirmed = Confirm::new()
            .with_prompt("Clear all recent searches?")
            .default(false)
            .interact()?;
        if confirmed {
            let updates = dashboard.process(DashboardEvent::ClearHistory).await;
            render::print_updates(&updates);
        }
    }
    Ok(())
}
