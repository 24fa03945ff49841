//! Plain-text rendering of dashboard state.

use std::fmt::Write as _;

use risk_lens_dashboard::DashboardUpdate;
use risk_lens_dashboard::alerts::AlertLog;
use risk_lens_risk_models::{ChatRole, ChatTurn, PredictionData};

/// Formats one analysis result.
pub fn format_prediction(label: &str, prediction: &PredictionData) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {label} ===");
    let _ = writeln!(
        out,
        "Risk level: {}   Safety score: {}/100",
        prediction.risk_level, prediction.score
    );
    let _ = writeln!(out, "  Flood risk:               {}", prediction.metrics.flood_risk);
    let _ = writeln!(
        out,
        "  Construction feasibility: {}",
        prediction.metrics.construction_feasibility
    );
    let _ = writeln!(
        out,
        "  Elevation profile:        {}",
        prediction.metrics.elevation_profile
    );
    let _ = writeln!(out, "  Land use:                 {}", prediction.metrics.land_use_type);
    let _ = writeln!(out, "\nReasoning:\n  {}", prediction.reasoning);
    let _ = writeln!(out, "\nRecommendation:\n  {}", prediction.recommendation);
    out
}

/// Formats a conversation, one turn per paragraph.
pub fn format_transcript(turns: &[ChatTurn]) -> String {
    let mut out = String::new();
    for turn in turns {
        let speaker = match turn.role {
            ChatRole::User => "You",
            ChatRole::Model => "RiskLens",
        };
        let _ = writeln!(out, "[{speaker}] {}\n", turn.text);
    }
    out
}

/// Formats the alert log, newest first, with its position for selection.
pub fn format_alerts(alerts: &AlertLog) -> String {
    if alerts.is_empty() {
        return "No alerts.\n".to_string();
    }

    let mut out = String::new();
    for (i, alert) in alerts.iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. [{:<7}] {:<12} {} ({})",
            i + 1,
            alert.severity.as_ref().to_uppercase(),
            alert.category.as_ref(),
            alert.message,
            alert.created_at.format("%H:%M:%S"),
        );
    }
    out
}

/// Prints the user-visible part of a batch of updates.
pub fn print_updates(updates: &[DashboardUpdate]) {
    for update in updates {
        match update {
            DashboardUpdate::SearchNotFound { query } => {
                println!("Location \"{query}\" not found.");
            }
            DashboardUpdate::AnalysisReady { label, prediction } => {
                println!();
                print!("{}", format_prediction(label, prediction));
            }
            DashboardUpdate::AnalysisFailed { message }
            | DashboardUpdate::LocationUnavailable { message } => println!("{message}"),
            DashboardUpdate::ChatRejected { reason } => println!("Not sent: {reason}"),
            DashboardUpdate::LayerToggled { layer, visible } => {
                println!("Layer {layer}: {}", if *visible { "on" } else { "off" });
            }
            DashboardUpdate::LanguageChanged(language) => {
                println!("Language: {}", language.label());
            }
            DashboardUpdate::HistoryCleared => println!("Search history cleared."),
            DashboardUpdate::ViewChanged(_)
            | DashboardUpdate::Searching { .. }
            | DashboardUpdate::Analyzing { .. }
            | DashboardUpdate::AnalysisDismissed
            | DashboardUpdate::ChatPanel { .. }
            | DashboardUpdate::NotificationsPanel { .. }
            | DashboardUpdate::ChatTranscript { .. }
            | DashboardUpdate::AlertDismissed { .. } => {}
        }
    }
}
