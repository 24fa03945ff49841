//! Request lifecycle for the dashboard.
//!
//! Every user action that leads to a remote call is issued a [`RequestId`].
//! The call itself runs detached from the controller (see
//! [`AnalysisRequest::run`], [`SearchRequest::run`], [`ChatOpenRequest::run`],
//! [`ChatSendRequest::run`]) and its completion is handed back through the
//! matching `complete_*` method, which applies it only if the request is
//! still the one the controller is waiting for. Anything older is dropped
//! without touching state or raising an alert.
//!
//! Selecting a new target or switching language also retires the active
//! assistant session; a fresh one is opened lazily while the chat panel is
//! visible (see [`LifecycleController::chat_open_request`]).

use std::sync::Arc;

use risk_lens_ai::analysis::{self, AnalysisError};
use risk_lens_ai::chat::{ChatInputError, ConversationSession, NO_TARGET_LABEL};
use risk_lens_ai::client::ReasoningClient;
use risk_lens_geocoder::{GeocodeNotFound, Geocoder};
use risk_lens_risk_models::{
    AlertCategory, AlertSeverity, Coordinate, LanguageCode, PredictionData, SearchResult,
};
use thiserror::Error;

use crate::alerts::AlertLog;
use crate::location::LocationUnavailable;
use crate::view::{View, ViewState};

/// Analysis label used for map clicks and device locations.
pub const POINT_ANALYSIS_LABEL: &str = "Point Coordinate Analysis";

/// Identity of one issued request. Strictly increasing per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The location currently being (or last) analyzed.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisTarget {
    id: RequestId,
    place: SearchResult,
    analysis_label: String,
}

impl AnalysisTarget {
    /// Request that selected this target.
    #[must_use]
    pub const fn id(&self) -> RequestId {
        self.id
    }

    /// The place as shown to the user.
    #[must_use]
    pub const fn place(&self) -> &SearchResult {
        &self.place
    }

    /// Label sent with the analysis request.
    #[must_use]
    pub fn analysis_label(&self) -> &str {
        &self.analysis_label
    }
}

/// Analysis progress for the current target.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisState {
    /// Nothing requested, dismissed, or the last request failed.
    Idle,
    /// Waiting for the given request.
    Analyzing(RequestId),
    /// Result for the current target.
    Ready(Arc<PredictionData>),
}

/// Place search progress.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchState {
    /// No search submitted.
    Idle,
    /// Waiting for the given request.
    Searching {
        /// Request identity.
        id: RequestId,
        /// Trimmed query.
        query: String,
    },
    /// The last search matched a place.
    Found(SearchResult),
    /// The last search matched nothing.
    NotFound {
        /// Trimmed query.
        query: String,
    },
}

/// One analysis call, detached from the controller.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub id: RequestId,
    pub coordinate: Coordinate,
    pub label: String,
    pub language: LanguageCode,
}

impl AnalysisRequest {
    /// Performs the call.
    pub async fn run(self, client: ReasoningClient) -> AnalysisCompletion {
        let result =
            analysis::analyze(&client, self.coordinate, &self.label, self.language).await;
        AnalysisCompletion {
            id: self.id,
            label: self.label,
            result,
        }
    }
}

/// Finished analysis call.
#[derive(Debug)]
pub struct AnalysisCompletion {
    pub id: RequestId,
    pub label: String,
    pub result: Result<PredictionData, AnalysisError>,
}

/// What [`LifecycleController::complete_analysis`] did with a completion.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// The result is now displayed.
    Ready {
        label: String,
        prediction: Arc<PredictionData>,
    },
    /// The call failed; the state is idle and an alert was raised.
    Failed { alert_id: String, message: String },
    /// A newer request replaced this one, or it was dismissed.
    Superseded,
}

/// One geocoding call, detached from the controller.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub id: RequestId,
    pub query: String,
}

impl SearchRequest {
    /// Performs the lookup.
    pub async fn run(self, geocoder: Arc<dyn Geocoder>) -> SearchCompletion {
        let result = risk_lens_geocoder::resolve(geocoder.as_ref(), &self.query).await;
        SearchCompletion {
            id: self.id,
            query: self.query,
            result,
        }
    }
}

/// Finished geocoding call.
#[derive(Debug)]
pub struct SearchCompletion {
    pub id: RequestId,
    pub query: String,
    pub result: Result<SearchResult, GeocodeNotFound>,
}

/// What [`LifecycleController::complete_search`] did with a completion.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// The match became the target; its analysis must be run.
    /// `view_changed` is set when this switched to the dashboard view.
    Found {
        query: String,
        analysis: AnalysisRequest,
        view_changed: bool,
    },
    /// Nothing matched.
    NotFound { query: String },
    /// A newer search or target replaced this one.
    Superseded,
}

/// What [`LifecycleController::complete_locate`] did with a device position.
#[derive(Debug, Clone)]
pub enum LocateOutcome {
    /// The position became the target; its analysis must be run.
    Selected(AnalysisRequest),
    /// The device could not report a position.
    Unavailable(LocationUnavailable),
    /// Another target was selected while the lookup was running.
    Superseded,
}

/// Opening call for a new assistant session.
#[derive(Debug, Clone)]
pub struct ChatOpenRequest {
    pub id: RequestId,
    pub location_label: String,
    pub analysis: Option<Arc<PredictionData>>,
    pub language: LanguageCode,
}

impl ChatOpenRequest {
    /// Opens the session.
    pub async fn run(self, client: ReasoningClient) -> ChatCompletion {
        let session =
            ConversationSession::open(&client, self.location_label, self.analysis, self.language)
                .await;
        ChatCompletion {
            id: self.id,
            session,
        }
    }
}

/// One user turn on a session taken out of the controller.
#[derive(Debug, Clone)]
pub struct ChatSendRequest {
    pub id: RequestId,
    pub session: ConversationSession,
    pub text: String,
}

impl ChatSendRequest {
    /// Sends the message and returns the session with both new turns.
    pub async fn run(mut self, client: ReasoningClient) -> ChatCompletion {
        if let Err(e) = self.session.send(&client, &self.text).await {
            log::debug!("Chat message rejected: {e}");
        }
        ChatCompletion {
            id: self.id,
            session: self.session,
        }
    }
}

/// Finished assistant call, carrying the session back.
#[derive(Debug)]
pub struct ChatCompletion {
    pub id: RequestId,
    pub session: ConversationSession,
}

/// Why a chat message was not sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatRejected {
    /// The message itself was invalid.
    #[error(transparent)]
    Input(#[from] ChatInputError),

    /// A previous call on this session has not finished.
    #[error("Assistant is still responding")]
    Busy,

    /// The chat panel is closed.
    #[error("Chat panel is closed")]
    Closed,
}

#[derive(Debug, Clone, Default)]
enum ChatSlot {
    #[default]
    Empty,
    Pending(RequestId),
    Active(ConversationSession),
}

/// Single owner of the dashboard's request and display state.
#[derive(Debug, Clone)]
pub struct LifecycleController {
    next_id: u64,
    language: LanguageCode,
    target: Option<AnalysisTarget>,
    analysis: AnalysisState,
    search: SearchState,
    alerts: AlertLog,
    view: ViewState,
    chat: ChatSlot,
    locate: Option<RequestId>,
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self::new(LanguageCode::default())
    }
}

impl LifecycleController {
    /// Creates a controller on the landing view with the startup alert.
    #[must_use]
    pub fn new(language: LanguageCode) -> Self {
        Self {
            next_id: 0,
            language,
            target: None,
            analysis: AnalysisState::Idle,
            search: SearchState::Idle,
            alerts: AlertLog::with_startup_notice(),
            view: ViewState::default(),
            chat: ChatSlot::Empty,
            locate: None,
        }
    }

    const fn issue(&mut self) -> RequestId {
        self.next_id += 1;
        RequestId(self.next_id)
    }

    /// Makes `place` the target and issues its analysis request.
    ///
    /// Any earlier analysis, search, or device location lookup still in
    /// flight is superseded and the assistant session is retired.
    pub fn select_target(
        &mut self,
        place: SearchResult,
        analysis_label: impl Into<String>,
    ) -> AnalysisRequest {
        let id = self.issue();
        let label = analysis_label.into();
        log::info!("Analysis target {id}: {}", place.display_name);

        if matches!(self.search, SearchState::Searching { .. }) {
            self.search = SearchState::Idle;
        }
        self.locate = None;

        let request = AnalysisRequest {
            id,
            coordinate: place.coordinate(),
            label: label.clone(),
            language: self.language,
        };
        self.target = Some(AnalysisTarget {
            id,
            place,
            analysis_label: label,
        });
        self.analysis = AnalysisState::Analyzing(id);
        self.reset_chat();
        request
    }

    /// Targets a raw coordinate (map click or device location).
    pub fn select_point(&mut self, coordinate: Coordinate) -> AnalysisRequest {
        self.select_target(SearchResult::from_point(coordinate), POINT_ANALYSIS_LABEL)
    }

    /// Issues a device location lookup. A target selected before it
    /// resolves wins over the looked-up position.
    pub const fn begin_locate(&mut self) -> RequestId {
        let id = self.issue();
        self.locate = Some(id);
        id
    }

    /// Applies a device position if its lookup is still wanted.
    pub fn complete_locate(
        &mut self,
        id: RequestId,
        result: Result<Coordinate, LocationUnavailable>,
    ) -> LocateOutcome {
        if self.locate != Some(id) {
            log::debug!("Discarding superseded location lookup {id}");
            return LocateOutcome::Superseded;
        }
        self.locate = None;

        match result {
            Ok(coordinate) => LocateOutcome::Selected(self.select_point(coordinate)),
            Err(e) => LocateOutcome::Unavailable(e),
        }
    }

    /// Applies a finished analysis if it is still wanted.
    pub fn complete_analysis(&mut self, completion: AnalysisCompletion) -> AnalysisOutcome {
        if self.analysis != AnalysisState::Analyzing(completion.id) {
            log::debug!(
                "Discarding superseded analysis {} for {}",
                completion.id,
                completion.label
            );
            return AnalysisOutcome::Superseded;
        }

        match completion.result {
            Ok(prediction) => {
                let prediction = Arc::new(prediction);
                self.analysis = AnalysisState::Ready(prediction.clone());
                if let ChatSlot::Active(session) = &mut self.chat {
                    session.set_analysis(Some(prediction.clone()));
                }
                AnalysisOutcome::Ready {
                    label: completion.label,
                    prediction,
                }
            }
            Err(e) => {
                log::error!("Analysis {} for {} failed: {e}", completion.id, completion.label);
                self.analysis = AnalysisState::Idle;
                let message = format!("Analysis failed for {}.", completion.label);
                let alert_id =
                    self.alerts
                        .push(AlertCategory::System, AlertSeverity::Error, message.clone());
                AnalysisOutcome::Failed { alert_id, message }
            }
        }
    }

    /// Clears the displayed result, discarding a pending one.
    /// Returns whether anything was cleared.
    pub fn dismiss_analysis(&mut self) -> bool {
        if self.analysis == AnalysisState::Idle {
            return false;
        }
        self.analysis = AnalysisState::Idle;
        if let ChatSlot::Active(session) = &mut self.chat {
            session.set_analysis(None);
        }
        true
    }

    /// Issues a place search. Blank queries are ignored.
    pub fn begin_search(&mut self, query: &str) -> Option<SearchRequest> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }

        let id = self.issue();
        self.search = SearchState::Searching {
            id,
            query: query.to_string(),
        };
        Some(SearchRequest {
            id,
            query: query.to_string(),
        })
    }

    /// Applies a finished search if it is still wanted.
    ///
    /// A match switches to the dashboard view and becomes the new target.
    pub fn complete_search(&mut self, completion: SearchCompletion) -> SearchOutcome {
        if !matches!(self.search, SearchState::Searching { id, .. } if id == completion.id) {
            log::debug!("Discarding superseded search {}", completion.id);
            return SearchOutcome::Superseded;
        }

        match completion.result {
            Ok(place) => {
                self.search = SearchState::Found(place.clone());
                let view_changed = self.view.view() != View::Dashboard;
                if view_changed {
                    self.view.start();
                }
                let label = place.display_name.clone();
                SearchOutcome::Found {
                    query: completion.query,
                    analysis: self.select_target(place, label),
                    view_changed,
                }
            }
            Err(GeocodeNotFound { query }) => {
                self.search = SearchState::NotFound {
                    query: query.clone(),
                };
                SearchOutcome::NotFound { query }
            }
        }
    }

    /// Switches the response language. Returns whether it changed.
    ///
    /// The assistant session is retired; a displayed analysis is kept.
    pub fn set_language(&mut self, language: LanguageCode) -> bool {
        if self.language == language {
            return false;
        }
        log::info!("Language changed to {}", language.label());
        self.language = language;
        self.reset_chat();
        true
    }

    /// Opens or closes the chat panel. Closing discards the session.
    pub fn toggle_chat(&mut self) -> bool {
        let open = self.view.toggle_chat();
        if !open {
            self.reset_chat();
        }
        open
    }

    fn reset_chat(&mut self) {
        self.chat = ChatSlot::Empty;
    }

    /// Issues the opening call for a new session if the panel is open and
    /// no session exists or is being opened.
    pub fn chat_open_request(&mut self) -> Option<ChatOpenRequest> {
        if !self.view.chat_open() || !matches!(self.chat, ChatSlot::Empty) {
            return None;
        }

        let id = self.issue();
        self.chat = ChatSlot::Pending(id);
        Some(ChatOpenRequest {
            id,
            location_label: self.location_label().to_string(),
            analysis: self.prediction().cloned(),
            language: self.language,
        })
    }

    /// Takes the session out for one user turn.
    ///
    /// # Errors
    ///
    /// Returns [`ChatRejected`] if the message is blank, the panel is
    /// closed, or no idle session is available.
    pub fn begin_chat_send(&mut self, text: &str) -> Result<ChatSendRequest, ChatRejected> {
        if !self.view.chat_open() {
            return Err(ChatRejected::Closed);
        }
        if text.trim().is_empty() {
            return Err(ChatInputError::EmptyMessage.into());
        }

        match std::mem::take(&mut self.chat) {
            ChatSlot::Active(session) => {
                let id = self.issue();
                self.chat = ChatSlot::Pending(id);
                Ok(ChatSendRequest {
                    id,
                    session,
                    text: text.to_string(),
                })
            }
            other => {
                self.chat = other;
                Err(ChatRejected::Busy)
            }
        }
    }

    /// Stores a session returned by a finished chat call if it is still
    /// wanted. Returns whether it was stored.
    pub fn complete_chat(&mut self, completion: ChatCompletion) -> bool {
        if !matches!(self.chat, ChatSlot::Pending(id) if id == completion.id) {
            log::debug!("Discarding superseded chat session {}", completion.id);
            return false;
        }

        let mut session = completion.session;
        session.set_analysis(self.prediction().cloned());
        self.chat = ChatSlot::Active(session);
        true
    }

    /// Label the assistant is told it is discussing.
    #[must_use]
    pub fn location_label(&self) -> &str {
        self.target
            .as_ref()
            .map_or(NO_TARGET_LABEL, |t| t.place.display_name.as_str())
    }

    /// Removes an alert. Returns whether it existed.
    pub fn dismiss_alert(&mut self, id: &str) -> bool {
        self.alerts.dismiss(id)
    }

    /// Current response language.
    #[must_use]
    pub const fn language(&self) -> LanguageCode {
        self.language
    }

    /// Current target, if any.
    #[must_use]
    pub const fn target(&self) -> Option<&AnalysisTarget> {
        self.target.as_ref()
    }

    /// Analysis progress.
    #[must_use]
    pub const fn analysis(&self) -> &AnalysisState {
        &self.analysis
    }

    /// Displayed result, if any.
    #[must_use]
    pub const fn prediction(&self) -> Option<&Arc<PredictionData>> {
        match &self.analysis {
            AnalysisState::Ready(prediction) => Some(prediction),
            _ => None,
        }
    }

    /// Search progress.
    #[must_use]
    pub const fn search(&self) -> &SearchState {
        &self.search
    }

    /// Alerts, newest first.
    #[must_use]
    pub const fn alerts(&self) -> &AlertLog {
        &self.alerts
    }

    /// Presentation state.
    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Mutable presentation state for view and layer changes.
    pub const fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    /// The idle assistant session, if one is open.
    #[must_use]
    pub const fn chat_session(&self) -> Option<&ConversationSession> {
        match &self.chat {
            ChatSlot::Active(session) => Some(session),
            _ => None,
        }
    }

    /// Whether an assistant call is in flight.
    #[must_use]
    pub const fn chat_pending(&self) -> bool {
        matches!(self.chat, ChatSlot::Pending(_))
    }
}

#[cfg(test)]
mod tests {
    use risk_lens_ai::AiError;
    use risk_lens_risk_models::{RiskLevel, SiteMetrics};

    use super::*;

    fn prediction(score: f64) -> PredictionData {
        PredictionData {
            risk_level: RiskLevel::Low,
            score,
            reasoning: "Upland plateau.".to_string(),
            recommendation: "Standard footings.".to_string(),
            metrics: SiteMetrics {
                flood_risk: "Low".to_string(),
                construction_feasibility: "High".to_string(),
                elevation_profile: "Flat".to_string(),
                land_use_type: "Agricultural".to_string(),
            },
        }
    }

    fn finish(request: &AnalysisRequest, score: f64) -> AnalysisCompletion {
        AnalysisCompletion {
            id: request.id,
            label: request.label.clone(),
            result: Ok(prediction(score)),
        }
    }

    fn springfield() -> SearchResult {
        SearchResult {
            latitude: 39.78,
            longitude: -89.65,
            display_name: "Springfield, Illinois".to_string(),
        }
    }

    #[test]
    fn starts_idle_with_startup_alert() {
        let controller = LifecycleController::default();
        assert_eq!(controller.analysis(), &AnalysisState::Idle);
        assert_eq!(controller.view().view(), View::Home);
        assert_eq!(controller.alerts().len(), 1);
        assert_eq!(controller.location_label(), NO_TARGET_LABEL);
    }

    #[test]
    fn newer_target_wins_regardless_of_arrival_order() {
        let mut controller = LifecycleController::default();
        let first = controller.select_point(Coordinate::new(10.0, 20.0));
        let second = controller.select_target(springfield(), "Springfield, Illinois");

        let applied = controller.complete_analysis(finish(&second, 80.0));
        assert!(matches!(applied, AnalysisOutcome::Ready { .. }));

        let stale = controller.complete_analysis(finish(&first, 10.0));
        assert_eq!(stale, AnalysisOutcome::Superseded);

        let shown = controller.prediction().unwrap();
        assert!((shown.score - 80.0).abs() < f64::EPSILON);
        assert_eq!(controller.alerts().len(), 1);
        assert_eq!(controller.location_label(), "Springfield, Illinois");
    }

    #[test]
    fn stale_failure_raises_no_alert() {
        let mut controller = LifecycleController::default();
        let first = controller.select_point(Coordinate::new(10.0, 20.0));
        let _second = controller.select_point(Coordinate::new(11.0, 21.0));

        let outcome = controller.complete_analysis(AnalysisCompletion {
            id: first.id,
            label: first.label,
            result: Err(AnalysisError::Remote(AiError::Timeout { seconds: 60 })),
        });

        assert_eq!(outcome, AnalysisOutcome::Superseded);
        assert!(matches!(controller.analysis(), AnalysisState::Analyzing(_)));
        assert_eq!(controller.alerts().len(), 1);
    }

    #[test]
    fn failure_returns_to_idle_with_alert() {
        let mut controller = LifecycleController::default();
        let request = controller.select_target(springfield(), "Springfield, Illinois");

        let outcome = controller.complete_analysis(AnalysisCompletion {
            id: request.id,
            label: request.label,
            result: Err(AnalysisError::Remote(AiError::Provider {
                message: "connection reset".to_string(),
            })),
        });

        let AnalysisOutcome::Failed { alert_id, message } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(message, "Analysis failed for Springfield, Illinois.");
        assert_eq!(controller.analysis(), &AnalysisState::Idle);
        let newest = controller.alerts().iter().next().unwrap();
        assert_eq!(newest.id, alert_id);
        assert_eq!(newest.severity, AlertSeverity::Error);
    }

    #[test]
    fn dismissing_discards_pending_result() {
        let mut controller = LifecycleController::default();
        let request = controller.select_point(Coordinate::new(1.0, 2.0));
        assert!(controller.dismiss_analysis());
        assert!(!controller.dismiss_analysis());
        assert_eq!(
            controller.complete_analysis(finish(&request, 50.0)),
            AnalysisOutcome::Superseded
        );
        assert!(controller.prediction().is_none());
    }

    #[test]
    fn map_click_labels() {
        let mut controller = LifecycleController::default();
        let request = controller.select_point(Coordinate::new(39.78, -89.65));
        assert_eq!(request.label, POINT_ANALYSIS_LABEL);
        assert_eq!(controller.location_label(), "Point [39.7800, -89.6500]");
    }

    #[test]
    fn search_found_selects_target_and_opens_dashboard() {
        let mut controller = LifecycleController::default();
        let search = controller.begin_search("  Springfield ").unwrap();
        assert_eq!(search.query, "Springfield");

        let outcome = controller.complete_search(SearchCompletion {
            id: search.id,
            query: search.query,
            result: Ok(springfield()),
        });

        let SearchOutcome::Found {
            analysis,
            view_changed,
            ..
        } = outcome
        else {
            panic!("expected a match");
        };
        assert!(view_changed);
        assert_eq!(analysis.label, "Springfield, Illinois");
        assert_eq!(controller.view().view(), View::Dashboard);
        assert_eq!(controller.analysis(), &AnalysisState::Analyzing(analysis.id));

        let search = controller.begin_search("Springfield").unwrap();
        let outcome = controller.complete_search(SearchCompletion {
            id: search.id,
            query: search.query,
            result: Ok(springfield()),
        });
        assert!(matches!(
            outcome,
            SearchOutcome::Found {
                view_changed: false,
                ..
            }
        ));
    }

    #[test]
    fn map_click_supersedes_pending_location_lookup() {
        let mut controller = LifecycleController::default();
        let locate = controller.begin_locate();
        let click = controller.select_point(Coordinate::new(1.0, 2.0));

        let outcome = controller.complete_locate(locate, Ok(Coordinate::new(28.61, 77.21)));
        assert!(matches!(outcome, LocateOutcome::Superseded));
        assert_eq!(controller.location_label(), "Point [1.0000, 2.0000]");
        assert_eq!(controller.analysis(), &AnalysisState::Analyzing(click.id));

        let locate = controller.begin_locate();
        let outcome = controller.complete_locate(locate, Err(LocationUnavailable));
        assert!(matches!(outcome, LocateOutcome::Unavailable(_)));
        assert_eq!(controller.analysis(), &AnalysisState::Analyzing(click.id));
    }

    #[test]
    fn map_click_supersedes_pending_search() {
        let mut controller = LifecycleController::default();
        let search = controller.begin_search("Springfield").unwrap();
        let _click = controller.select_point(Coordinate::new(1.0, 2.0));

        let outcome = controller.complete_search(SearchCompletion {
            id: search.id,
            query: search.query,
            result: Ok(springfield()),
        });
        assert!(matches!(outcome, SearchOutcome::Superseded));
        assert_eq!(controller.location_label(), "Point [1.0000, 2.0000]");
    }

    #[test]
    fn search_not_found_keeps_previous_target() {
        let mut controller = LifecycleController::default();
        let _ = controller.select_target(springfield(), "Springfield, Illinois");
        let search = controller.begin_search("Atlantis").unwrap();

        let outcome = controller.complete_search(SearchCompletion {
            id: search.id,
            query: search.query.clone(),
            result: Err(GeocodeNotFound {
                query: search.query,
            }),
        });

        assert!(matches!(outcome, SearchOutcome::NotFound { .. }));
        assert_eq!(
            controller.search(),
            &SearchState::NotFound {
                query: "Atlantis".to_string()
            }
        );
        assert_eq!(controller.location_label(), "Springfield, Illinois");
    }

    #[test]
    fn blank_search_is_ignored() {
        let mut controller = LifecycleController::default();
        assert!(controller.begin_search("   ").is_none());
        assert_eq!(controller.search(), &SearchState::Idle);
    }

    #[test]
    fn chat_requests_follow_panel_and_context() {
        let mut controller = LifecycleController::default();
        assert!(controller.chat_open_request().is_none());

        assert!(controller.toggle_chat());
        let open = controller.chat_open_request().unwrap();
        assert_eq!(open.location_label, NO_TARGET_LABEL);
        assert!(controller.chat_open_request().is_none());
        assert_eq!(controller.begin_chat_send("hi").unwrap_err(), ChatRejected::Busy);

        // A new target retires the session being opened.
        let _ = controller.select_target(springfield(), "Springfield, Illinois");
        let reopen = controller.chat_open_request().unwrap();
        assert_eq!(reopen.location_label, "Springfield, Illinois");
        assert_ne!(open.id, reopen.id);
    }

    #[test]
    fn empty_chat_message_is_rejected() {
        let mut controller = LifecycleController::default();
        assert_eq!(
            controller.begin_chat_send("hello").unwrap_err(),
            ChatRejected::Closed
        );
        controller.toggle_chat();
        assert_eq!(
            controller.begin_chat_send("  ").unwrap_err(),
            ChatRejected::Input(ChatInputError::EmptyMessage)
        );
    }

    #[test]
    fn language_change_keeps_analysis() {
        let mut controller = LifecycleController::default();
        let request = controller.select_target(springfield(), "Springfield, Illinois");
        controller.complete_analysis(finish(&request, 70.0));

        assert!(controller.set_language(LanguageCode::Ta));
        assert!(!controller.set_language(LanguageCode::Ta));
        assert!(controller.prediction().is_some());
        assert_eq!(controller.language(), LanguageCode::Ta);
    }
}
