//! Bounded, most-recent-first alert log.

use std::collections::VecDeque;

use risk_lens_risk_models::{AlertCategory, AlertNotice, AlertSeverity};

/// Maximum number of alerts retained.
pub const MAX_ALERTS: usize = 5;

/// Message of the alert raised when the dashboard starts.
pub const STARTUP_MESSAGE: &str = "Spatial engines active. Pointer analysis enabled.";

/// Ring buffer of [`AlertNotice`]s. Pushing a sixth alert drops the oldest.
#[derive(Debug, Clone, Default)]
pub struct AlertLog {
    alerts: VecDeque<AlertNotice>,
}

impl AlertLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log holding the startup notice.
    #[must_use]
    pub fn with_startup_notice() -> Self {
        let mut log = Self::new();
        log.push(AlertCategory::System, AlertSeverity::Info, STARTUP_MESSAGE);
        log
    }

    /// Records a new alert at the front and returns its id.
    pub fn push(
        &mut self,
        category: AlertCategory,
        severity: AlertSeverity,
        message: impl Into<String>,
    ) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.alerts.push_front(AlertNotice {
            id: id.clone(),
            category,
            message: message.into(),
            created_at: chrono::Utc::now(),
            severity,
        });
        self.alerts.truncate(MAX_ALERTS);
        id
    }

    /// Removes the alert with `id`. Returns whether one was removed.
    pub fn dismiss(&mut self, id: &str) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id != id);
        self.alerts.len() != before
    }

    /// Alerts, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &AlertNotice> {
        self.alerts.iter()
    }

    /// Number of retained alerts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
