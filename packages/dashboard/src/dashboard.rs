//! Event-driven dashboard.
//!
//! [`Dashboard`] owns the [`LifecycleController`] together with the remote
//! services. User actions arrive as [`DashboardEvent`]s; each remote call is
//! pushed onto a [`FuturesUnordered`] and polled concurrently with incoming
//! events, so a slow analysis never blocks interaction. Completions are
//! applied on the same task that handles events, one at a time.

use std::sync::Arc;

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt as _, StreamExt as _};
use risk_lens_ai::client::ReasoningClient;
use risk_lens_geocoder::Geocoder;
use risk_lens_risk_models::{ChatTurn, Coordinate, LanguageCode, PredictionData, SearchResult};
use tokio::sync::mpsc;

use crate::controller::{
    AnalysisCompletion, AnalysisOutcome, AnalysisRequest, ChatCompletion, LifecycleController,
    LocateOutcome, RequestId, SearchCompletion, SearchOutcome,
};
use crate::history::SearchHistory;
use crate::location::{LocationProvider, LocationUnavailable, NoLocation};
use crate::view::{Layer, View};

/// A user action.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// Leave the landing screen.
    Start,
    /// Show the documentation.
    OpenDocs,
    /// Return to the landing screen.
    BackHome,
    /// Search for a place by name.
    Search(String),
    /// Analyze a clicked coordinate.
    MapClick(Coordinate),
    /// Analyze a named place, using its name as the analysis label.
    SelectPlace(SearchResult),
    /// Analyze the device location.
    LocateMe,
    /// Hide the current analysis.
    DismissAnalysis,
    /// Change the response language.
    SetLanguage(LanguageCode),
    /// Open or close the chat panel.
    ToggleChat,
    /// Open or close the alert panel.
    ToggleNotifications,
    /// Send a chat message.
    SendChat(String),
    /// Show or hide a map layer.
    ToggleLayer(Layer),
    /// Remove an alert by id.
    DismissAlert(String),
    /// Forget all past searches.
    ClearHistory,
    /// Stop the event loop, abandoning in-flight calls.
    Shutdown,
}

/// Something the user should see as a result of an event or completion.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardUpdate {
    ViewChanged(View),
    Searching {
        query: String,
    },
    SearchNotFound {
        query: String,
    },
    Analyzing {
        location: String,
    },
    AnalysisReady {
        label: String,
        prediction: Arc<PredictionData>,
    },
    AnalysisFailed {
        message: String,
    },
    AnalysisDismissed,
    LocationUnavailable {
        message: String,
    },
    LanguageChanged(LanguageCode),
    ChatPanel {
        open: bool,
    },
    NotificationsPanel {
        open: bool,
    },
    /// Full transcript after the session was opened or answered.
    ChatTranscript {
        turns: Vec<ChatTurn>,
    },
    ChatRejected {
        reason: String,
    },
    LayerToggled {
        layer: Layer,
        visible: bool,
    },
    AlertDismissed {
        id: String,
    },
    HistoryCleared,
}

enum Completion {
    Search(SearchCompletion),
    Analysis(AnalysisCompletion),
    Chat(ChatCompletion),
    Location(RequestId, Result<Coordinate, LocationUnavailable>),
}

type Inflight = FuturesUnordered<BoxFuture<'static, Completion>>;

/// Dashboard state plus the services it calls.
pub struct Dashboard {
    controller: LifecycleController,
    client: ReasoningClient,
    geocoder: Arc<dyn Geocoder>,
    location: Arc<dyn LocationProvider>,
    history: SearchHistory,
}

impl Dashboard {
    /// Creates a dashboard without device positioning.
    #[must_use]
    pub fn new(
        client: ReasoningClient,
        geocoder: Arc<dyn Geocoder>,
        history: SearchHistory,
        language: LanguageCode,
    ) -> Self {
        Self {
            controller: LifecycleController::new(language),
            client,
            geocoder,
            location: Arc::new(NoLocation),
            history,
        }
    }

    /// Sets the device location source.
    #[must_use]
    pub fn with_location(mut self, location: Arc<dyn LocationProvider>) -> Self {
        self.location = location;
        self
    }

    /// Request and display state.
    #[must_use]
    pub const fn controller(&self) -> &LifecycleController {
        &self.controller
    }

    /// Recent searches.
    #[must_use]
    pub const fn history(&self) -> &SearchHistory {
        &self.history
    }

    /// Handles one event and waits for every call it starts, including
    /// follow-up calls such as the analysis after a search.
    pub async fn process(&mut self, event: DashboardEvent) -> Vec<DashboardUpdate> {
        let mut inflight = Inflight::new();
        let mut updates = Vec::new();

        self.handle_event(event, &mut inflight, &mut updates);
        self.schedule_chat(&mut inflight);

        while let Some(done) = inflight.next().await {
            self.handle_completion(done, &mut inflight, &mut updates);
            self.schedule_chat(&mut inflight);
        }

        updates
    }

    /// Runs until [`DashboardEvent::Shutdown`], or until `events` is closed
    /// and every in-flight call has completed. Returns the final state.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<DashboardEvent>,
        updates: mpsc::Sender<DashboardUpdate>,
    ) -> Self {
        let mut inflight = Inflight::new();
        let mut accepting = true;

        loop {
            let mut batch = Vec::new();

            tokio::select! {
                event = events.recv(), if accepting => match event {
                    Some(DashboardEvent::Shutdown) => {
                        log::info!("Dashboard shutting down with {} call(s) in flight", inflight.len());
                        break;
                    }
                    Some(event) => self.handle_event(event, &mut inflight, &mut batch),
                    None => accepting = false,
                },
                Some(done) = inflight.next(), if !inflight.is_empty() => {
                    self.handle_completion(done, &mut inflight, &mut batch);
                }
                else => break,
            }

            self.schedule_chat(&mut inflight);

            for update in batch {
                if updates.send(update).await.is_err() {
                    log::debug!("Update receiver dropped");
                }
            }
        }

        self
    }

    fn handle_event(
        &mut self,
        event: DashboardEvent,
        inflight: &mut Inflight,
        updates: &mut Vec<DashboardUpdate>,
    ) {
        log::debug!("Event: {event:?}");

        match event {
            DashboardEvent::Start => {
                self.controller.view_mut().start();
                updates.push(DashboardUpdate::ViewChanged(View::Dashboard));
            }
            DashboardEvent::OpenDocs => {
                self.controller.view_mut().open_docs();
                updates.push(DashboardUpdate::ViewChanged(View::Documentation));
            }
            DashboardEvent::BackHome => {
                self.controller.view_mut().back_home();
                updates.push(DashboardUpdate::ViewChanged(View::Home));
            }
            DashboardEvent::Search(query) => match self.controller.begin_search(&query) {
                Some(request) => {
                    updates.push(DashboardUpdate::Searching {
                        query: request.query.clone(),
                    });
                    let geocoder = self.geocoder.clone();
                    inflight.push(request.run(geocoder).map(Completion::Search).boxed());
                }
                None => log::debug!("Ignoring blank search"),
            },
            DashboardEvent::MapClick(coordinate) => {
                let request = self.controller.select_point(coordinate);
                self.spawn_analysis(request, inflight, updates);
            }
            DashboardEvent::SelectPlace(place) => {
                let label = place.display_name.clone();
                let request = self.controller.select_target(place, label);
                self.spawn_analysis(request, inflight, updates);
            }
            DashboardEvent::LocateMe => {
                let id = self.controller.begin_locate();
                let location = self.location.clone();
                inflight.push(
                    async move { Completion::Location(id, location.current_location().await) }
                        .boxed(),
                );
            }
            DashboardEvent::DismissAnalysis => {
                if self.controller.dismiss_analysis() {
                    updates.push(DashboardUpdate::AnalysisDismissed);
                }
            }
            DashboardEvent::SetLanguage(language) => {
                if self.controller.set_language(language) {
                    updates.push(DashboardUpdate::LanguageChanged(language));
                }
            }
            DashboardEvent::ToggleChat => {
                let open = self.controller.toggle_chat();
                updates.push(DashboardUpdate::ChatPanel { open });
            }
            DashboardEvent::ToggleNotifications => {
                let open = self.controller.view_mut().toggle_notifications();
                updates.push(DashboardUpdate::NotificationsPanel { open });
            }
            DashboardEvent::SendChat(text) => match self.controller.begin_chat_send(&text) {
                Ok(request) => {
                    let client = self.client.clone();
                    inflight.push(request.run(client).map(Completion::Chat).boxed());
                }
                Err(e) => updates.push(DashboardUpdate::ChatRejected {
                    reason: e.to_string(),
                }),
            },
            DashboardEvent::ToggleLayer(layer) => {
                let visible = self.controller.view_mut().toggle_layer(layer);
                updates.push(DashboardUpdate::LayerToggled { layer, visible });
            }
            DashboardEvent::DismissAlert(id) => {
                if self.controller.dismiss_alert(&id) {
                    updates.push(DashboardUpdate::AlertDismissed { id });
                }
            }
            DashboardEvent::ClearHistory => {
                self.history.clear();
                self.save_history();
                updates.push(DashboardUpdate::HistoryCleared);
            }
            DashboardEvent::Shutdown => {}
        }
    }

    fn handle_completion(
        &mut self,
        done: Completion,
        inflight: &mut Inflight,
        updates: &mut Vec<DashboardUpdate>,
    ) {
        match done {
            Completion::Search(completion) => match self.controller.complete_search(completion) {
                SearchOutcome::Found {
                    query,
                    analysis,
                    view_changed,
                } => {
                    self.history.record(&query);
                    self.save_history();
                    if view_changed {
                        updates.push(DashboardUpdate::ViewChanged(View::Dashboard));
                    }
                    self.spawn_analysis(analysis, inflight, updates);
                }
                SearchOutcome::NotFound { query } => {
                    updates.push(DashboardUpdate::SearchNotFound { query });
                }
                SearchOutcome::Superseded => {}
            },
            Completion::Analysis(completion) => {
                match self.controller.complete_analysis(completion) {
                    AnalysisOutcome::Ready { label, prediction } => {
                        updates.push(DashboardUpdate::AnalysisReady { label, prediction });
                    }
                    AnalysisOutcome::Failed { message, .. } => {
                        updates.push(DashboardUpdate::AnalysisFailed { message });
                    }
                    AnalysisOutcome::Superseded => {}
                }
            }
            Completion::Chat(completion) => {
                if !self.controller.complete_chat(completion) {
                    return;
                }
                if let Some(session) = self.controller.chat_session() {
                    updates.push(DashboardUpdate::ChatTranscript {
                        turns: session.turns().to_vec(),
                    });
                }
            }
            Completion::Location(id, result) => match self.controller.complete_locate(id, result) {
                LocateOutcome::Selected(request) => {
                    self.spawn_analysis(request, inflight, updates);
                }
                LocateOutcome::Unavailable(e) => {
                    log::warn!("Location lookup failed: {e}");
                    updates.push(DashboardUpdate::LocationUnavailable {
                        message: e.to_string(),
                    });
                }
                LocateOutcome::Superseded => {}
            },
        }
    }

    fn spawn_analysis(
        &self,
        request: AnalysisRequest,
        inflight: &mut Inflight,
        updates: &mut Vec<DashboardUpdate>,
    ) {
        updates.push(DashboardUpdate::Analyzing {
            location: self.controller.location_label().to_string(),
        });
        let client = self.client.clone();
        inflight.push(request.run(client).map(Completion::Analysis).boxed());
    }

    fn schedule_chat(&mut self, inflight: &mut Inflight) {
        if let Some(request) = self.controller.chat_open_request() {
            let client = self.client.clone();
            inflight.push(request.run(client).map(Completion::Chat).boxed());
        }
    }

    fn save_history(&self) {
        if let Err(e) = self.history.save() {
            log::warn!("Failed to save search history: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use risk_lens_ai::AiError;
    use risk_lens_ai::chat::FALLBACK_GREETING;
    use risk_lens_ai::providers::LlmProvider;
    use risk_lens_geocoder::GeocodeError;
    use risk_lens_risk_models::{AlertSeverity, ChatRole};

    use super::*;
    use crate::controller::{AnalysisState, SearchState};
    use crate::location::FixedLocation;

    /// Answers analyses from the coordinate in the prompt and numbers chat
    /// replies. Prompts at latitude 11.5 are slow; prompts at 66.6 fail.
    #[derive(Default)]
    struct ScriptedAssistant {
        analyses: AtomicUsize,
        chats: AtomicUsize,
        system_instructions: Mutex<Vec<String>>,
    }

    fn reply(reasoning: &str) -> String {
        serde_json::json!({
            "riskLevel": "MEDIUM",
            "score": 42,
            "reasoning": reasoning,
            "recommendation": "Raise the plinth.",
            "metrics": {
                "floodRisk": "Moderate",
                "constructionFeasibility": "Feasible",
                "elevationProfile": "Gentle slope",
                "landUseType": "Residential"
            }
        })
        .to_string()
    }

    #[async_trait::async_trait]
    impl LlmProvider for ScriptedAssistant {
        async fn generate_structured(
            &self,
            prompt: &str,
            _schema: &serde_json::Value,
        ) -> Result<String, AiError> {
            self.analyses.fetch_add(1, Ordering::SeqCst);
            if prompt.contains("66.6,") {
                return Err(AiError::Provider {
                    message: "connection reset".to_string(),
                });
            }
            if prompt.contains("11.5,") {
                tokio::time::sleep(Duration::from_millis(150)).await;
                return Ok(reply("slow"));
            }
            Ok(reply("fast"))
        }

        async fn chat(
            &self,
            system_instruction: &str,
            history: &[ChatTurn],
            _message: &str,
        ) -> Result<String, AiError> {
            let n = self.chats.fetch_add(1, Ordering::SeqCst);
            self.system_instructions
                .lock()
                .unwrap()
                .push(system_instruction.to_string());
            Ok(format!("reply {n} after {} turns", history.len()))
        }
    }

    struct TownGeocoder;

    #[async_trait::async_trait]
    impl Geocoder for TownGeocoder {
        async fn search(&self, query: &str) -> Result<Option<SearchResult>, GeocodeError> {
            Ok((query == "Springfield").then(|| SearchResult {
                latitude: 39.78,
                longitude: -89.65,
                display_name: "Springfield, Sangamon County, Illinois".to_string(),
            }))
        }
    }

    fn dashboard() -> (Dashboard, Arc<ScriptedAssistant>) {
        let assistant = Arc::new(ScriptedAssistant::default());
        let client = ReasoningClient::new(assistant.clone());
        let dashboard = Dashboard::new(
            client,
            Arc::new(TownGeocoder),
            SearchHistory::in_memory(),
            LanguageCode::En,
        );
        (dashboard, assistant)
    }

    #[tokio::test]
    async fn search_resolves_and_analyzes() {
        let (mut dashboard, assistant) = dashboard();

        let updates = dashboard
            .process(DashboardEvent::Search("Springfield".to_string()))
            .await;

        let analyzing = updates
            .iter()
            .position(|u| matches!(u, DashboardUpdate::Analyzing { .. }))
            .unwrap();
        let ready = updates
            .iter()
            .position(|u| matches!(
                u,
                DashboardUpdate::AnalysisReady { label, .. }
                    if label == "Springfield, Sangamon County, Illinois"
            ))
            .unwrap();
        assert!(analyzing < ready);
        assert!(updates.contains(&DashboardUpdate::ViewChanged(View::Dashboard)));
        assert_eq!(assistant.analyses.load(Ordering::SeqCst), 1);

        let updates = dashboard
            .process(DashboardEvent::Search("Springfield".to_string()))
            .await;
        assert!(!updates.iter().any(|u| matches!(u, DashboardUpdate::ViewChanged(_))));

        let controller = dashboard.controller();
        assert_eq!(controller.view().view(), View::Dashboard);
        assert!(matches!(controller.search(), SearchState::Found(_)));
        let expected: PredictionData = serde_json::from_str(&reply("fast")).unwrap();
        assert_eq!(controller.prediction().unwrap().as_ref(), &expected);
        assert_eq!(dashboard.history().entries(), ["Springfield"]);
        assert_eq!(assistant.analyses.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unknown_place_is_not_found() {
        let (mut dashboard, assistant) = dashboard();

        let updates = dashboard
            .process(DashboardEvent::Search("Atlantis".to_string()))
            .await;

        assert!(updates.contains(&DashboardUpdate::SearchNotFound {
            query: "Atlantis".to_string()
        }));
        assert_eq!(dashboard.controller().analysis(), &AnalysisState::Idle);
        assert!(dashboard.history().entries().is_empty());
        assert_eq!(assistant.analyses.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_analysis_returns_to_idle_with_alert() {
        let (mut dashboard, _) = dashboard();

        let updates = dashboard
            .process(DashboardEvent::MapClick(Coordinate::new(66.6, 10.0)))
            .await;

        assert!(updates.iter().any(|u| matches!(u, DashboardUpdate::AnalysisFailed { .. })));
        let controller = dashboard.controller();
        assert_eq!(controller.analysis(), &AnalysisState::Idle);
        assert_eq!(controller.alerts().len(), 2);
        assert_eq!(
            controller.alerts().iter().next().unwrap().severity,
            AlertSeverity::Error
        );
    }

    #[tokio::test]
    async fn slow_result_for_old_target_is_discarded() {
        let (dashboard, assistant) = dashboard();
        let (event_tx, event_rx) = mpsc::channel(8);
        let (update_tx, mut update_rx) = mpsc::channel(64);

        let handle = tokio::spawn(dashboard.run(event_rx, update_tx));

        event_tx
            .send(DashboardEvent::MapClick(Coordinate::new(11.5, 20.0)))
            .await
            .unwrap();
        event_tx
            .send(DashboardEvent::MapClick(Coordinate::new(12.5, 20.0)))
            .await
            .unwrap();
        drop(event_tx);

        let dashboard = handle.await.unwrap();

        let mut ready = Vec::new();
        while let Ok(update) = update_rx.try_recv() {
            if let DashboardUpdate::AnalysisReady { prediction, .. } = update {
                ready.push(prediction.reasoning.clone());
            }
        }

        assert_eq!(ready, ["fast"]);
        assert_eq!(assistant.analyses.load(Ordering::SeqCst), 2);
        let controller = dashboard.controller();
        assert_eq!(controller.prediction().unwrap().reasoning, "fast");
        assert_eq!(controller.location_label(), "Point [12.5000, 20.0000]");
        assert_eq!(controller.alerts().len(), 1);
    }

    #[tokio::test]
    async fn chat_session_follows_language() {
        let (mut dashboard, _) = dashboard();

        dashboard.process(DashboardEvent::ToggleChat).await;
        let session = dashboard.controller().chat_session().unwrap();
        assert_eq!(session.turns().len(), 1);
        assert_eq!(session.turns()[0].role, ChatRole::Model);

        dashboard
            .process(DashboardEvent::SendChat("Is it safe to build here?".to_string()))
            .await;
        assert_eq!(dashboard.controller().chat_session().unwrap().turns().len(), 3);

        dashboard
            .process(DashboardEvent::SetLanguage(LanguageCode::Hi))
            .await;
        let session = dashboard.controller().chat_session().unwrap();
        assert_eq!(session.turns().len(), 1);
        assert_eq!(session.language(), LanguageCode::Hi);
    }

    #[tokio::test]
    async fn chat_sees_analysis_once_ready() {
        let (mut dashboard, assistant) = dashboard();

        dashboard.process(DashboardEvent::ToggleChat).await;
        dashboard
            .process(DashboardEvent::MapClick(Coordinate::new(18.52, 73.85)))
            .await;

        let session = dashboard.controller().chat_session().unwrap();
        assert_eq!(session.location_label(), "Point [18.5200, 73.8500]");
        assert!(session.analysis().is_some());

        dashboard
            .process(DashboardEvent::SendChat("Summarize".to_string()))
            .await;
        let instructions = assistant.system_instructions.lock().unwrap();
        assert!(instructions.last().unwrap().contains("Point [18.5200, 73.8500]"));
        assert!(instructions.last().unwrap().contains("MEDIUM"));
    }

    #[tokio::test]
    async fn dismissed_analysis_leaves_chat_context() {
        let (mut dashboard, assistant) = dashboard();

        dashboard.process(DashboardEvent::ToggleChat).await;
        dashboard
            .process(DashboardEvent::MapClick(Coordinate::new(1.0, 2.0)))
            .await;
        assert!(dashboard.controller().chat_session().unwrap().analysis().is_some());

        dashboard.process(DashboardEvent::DismissAnalysis).await;
        assert!(dashboard.controller().prediction().is_none());
        assert!(dashboard.controller().chat_session().unwrap().analysis().is_none());

        dashboard
            .process(DashboardEvent::SendChat("why?".to_string()))
            .await;
        let instructions = assistant.system_instructions.lock().unwrap();
        let last = instructions.last().unwrap();
        assert!(last.contains("- Risk Level: Unknown"));
        assert!(!last.contains("MEDIUM"));
    }

    #[tokio::test]
    async fn blank_chat_message_changes_nothing() {
        let (mut dashboard, assistant) = dashboard();
        dashboard.process(DashboardEvent::ToggleChat).await;
        let chats = assistant.chats.load(Ordering::SeqCst);

        let updates = dashboard
            .process(DashboardEvent::SendChat("   ".to_string()))
            .await;

        assert!(matches!(updates[0], DashboardUpdate::ChatRejected { .. }));
        assert_eq!(assistant.chats.load(Ordering::SeqCst), chats);
        assert_eq!(dashboard.controller().chat_session().unwrap().turns().len(), 1);
        assert_ne!(
            dashboard.controller().chat_session().unwrap().turns()[0].text,
            FALLBACK_GREETING
        );
    }

    #[tokio::test]
    async fn locate_me_without_position() {
        let (mut dashboard, assistant) = dashboard();

        let updates = dashboard.process(DashboardEvent::LocateMe).await;

        assert_eq!(
            updates,
            [DashboardUpdate::LocationUnavailable {
                message: "Unable to retrieve your location".to_string()
            }]
        );
        assert_eq!(dashboard.controller().alerts().len(), 1);
        assert_eq!(assistant.analyses.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn locate_me_analyzes_position() {
        let (dashboard, _) = dashboard();
        let mut dashboard =
            dashboard.with_location(Arc::new(FixedLocation(Coordinate::new(28.61, 77.21))));

        dashboard.process(DashboardEvent::LocateMe).await;

        let controller = dashboard.controller();
        assert_eq!(controller.location_label(), "Point [28.6100, 77.2100]");
        assert!(controller.prediction().is_some());
    }

    struct SlowLocation;

    #[async_trait::async_trait]
    impl LocationProvider for SlowLocation {
        async fn current_location(&self) -> Result<Coordinate, LocationUnavailable> {
            tokio::time::sleep(Duration::from_millis(150)).await;
            Ok(Coordinate::new(28.61, 77.21))
        }
    }

    #[tokio::test]
    async fn map_click_wins_over_slow_location_lookup() {
        let (dashboard, assistant) = dashboard();
        let dashboard = dashboard.with_location(Arc::new(SlowLocation));
        let (event_tx, event_rx) = mpsc::channel(8);
        let (update_tx, _update_rx) = mpsc::channel(64);

        let handle = tokio::spawn(dashboard.run(event_rx, update_tx));

        event_tx.send(DashboardEvent::LocateMe).await.unwrap();
        event_tx
            .send(DashboardEvent::MapClick(Coordinate::new(12.5, 20.0)))
            .await
            .unwrap();
        drop(event_tx);

        let dashboard = handle.await.unwrap();

        assert_eq!(assistant.analyses.load(Ordering::SeqCst), 1);
        let controller = dashboard.controller();
        assert_eq!(controller.location_label(), "Point [12.5000, 20.0000]");
        assert!(controller.prediction().is_some());
    }

    #[tokio::test]
    async fn named_place_uses_its_name_as_label() {
        let (mut dashboard, _) = dashboard();

        let updates = dashboard
            .process(DashboardEvent::SelectPlace(SearchResult {
                latitude: 19.07,
                longitude: 72.87,
                display_name: "Mumbai".to_string(),
            }))
            .await;

        assert_eq!(
            updates[0],
            DashboardUpdate::Analyzing {
                location: "Mumbai".to_string()
            }
        );
        let target = dashboard.controller().target().unwrap();
        assert_eq!(target.analysis_label(), "Mumbai");
        assert!(dashboard.controller().prediction().is_some());
    }

    #[tokio::test]
    async fn layers_and_alerts() {
        let (mut dashboard, _) = dashboard();

        let updates = dashboard
            .process(DashboardEvent::ToggleLayer(Layer::FloodRisk))
            .await;
        assert_eq!(
            updates,
            [DashboardUpdate::LayerToggled {
                layer: Layer::FloodRisk,
                visible: false
            }]
        );

        dashboard.process(DashboardEvent::ToggleNotifications).await;
        assert!(dashboard.controller().view().notifications_open());

        let id = dashboard.controller().alerts().iter().next().unwrap().id.clone();
        dashboard.process(DashboardEvent::DismissAlert(id)).await;
        assert!(dashboard.controller().alerts().is_empty());
    }
}
