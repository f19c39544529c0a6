//! Session controller: the single owner of viewer state
//!
//! All state lives in one [`SessionState`] published through a
//! `tokio::sync::watch` channel. Every user action is a transition on that
//! value; front-ends subscribe and re-render.
//!
//! Each analysis or file load takes the next request number. When it
//! finishes, the outcome is applied only if no newer request was started in
//! the meantime; otherwise it is dropped with [`SessionError::Superseded`]
//! and the state is left as the newer request leaves it.

use crate::history::{HistoryEntry, HistoryError, HistoryStore};
use crate::model::{
    merge_submission, parse_upload, AnalysisResult, ModelError, Submission, DEFAULT_LANGUAGE,
};
use crate::service::{
    AnalysisService, AnalyzeRequest, MorphologyRequest, MorphologyResponse, PartsOfSpeechRequest,
    PartsOfSpeechResponse, ServiceError,
};
use crate::view::{EventsView, Tab, TabController};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Please enter some {0}.")]
    EmptyInput(&'static str),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("History error: {0}")]
    History(#[from] HistoryError),

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request {0} was superseded by a newer request")]
    Superseded(u64),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Everything a front-end needs to draw the viewer.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// A request is in flight.
    pub loading: bool,
    pub current: Option<Arc<AnalysisResult>>,
    pub tabs: TabController,
    pub events_view: EventsView,
    /// Message of the most recent failed action, cleared when a new one starts.
    pub last_error: Option<String>,
    /// Number of the most recently started request.
    pub latest_request: u64,
}

pub struct Session {
    service: Arc<dyn AnalysisService>,
    history: Option<Arc<dyn HistoryStore>>,
    state: watch::Sender<SessionState>,
    issued: AtomicU64,
    default_language: String,
}

impl Session {
    pub fn new(service: Arc<dyn AnalysisService>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            service,
            history: None,
            state,
            issued: AtomicU64::new(0),
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }

    /// Completed results are appended to `history`.
    pub fn with_history(mut self, history: Arc<dyn HistoryStore>) -> Self {
        self.history = Some(history);
        self
    }

    /// Language used when a submission leaves it blank.
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current(&self) -> Option<Arc<AnalysisResult>> {
        self.state.borrow().current.clone()
    }

    // === Analysis ===

    /// Submit text to the analysis service.
    ///
    /// The response is trusted: it is merged with the submission without
    /// schema validation. On failure the previous result stays displayed.
    pub async fn submit_text(&self, submission: Submission) -> SessionResult<Arc<AnalysisResult>> {
        if submission.input_text.trim().is_empty() {
            return Err(self.reject(SessionError::EmptyInput("text to analyze")));
        }
        let mut submission = submission;
        if submission.language.trim().is_empty() {
            submission.language = self.default_language.clone();
        }

        let seq = self.begin();
        let request = AnalyzeRequest::from(&submission);
        tracing::debug!(seq, chars = request.input_text.chars().count(), "submitting text");

        match self.service.analyze(&request).await {
            Ok(raw) => {
                if let Some(message) = raw.get("error") {
                    tracing::warn!(seq, %message, "service response carries an error field");
                }
                self.complete(seq, merge_submission(&raw, &submission))
            }
            Err(e) => self.fail(seq, e.into()),
        }
    }

    /// Load a previously computed analysis from a `.json` file.
    pub async fn load_file(&self, path: &Path) -> SessionResult<Arc<AnalysisResult>> {
        let seq = self.begin();
        tracing::debug!(seq, path = %path.display(), "loading analysis file");
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(source) => {
                return self.fail(
                    seq,
                    SessionError::Io {
                        path: path.to_path_buf(),
                        source,
                    },
                )
            }
        };
        self.apply_upload(seq, &text)
    }

    /// Load analysis JSON already in memory.
    pub fn load_json(&self, text: &str) -> SessionResult<Arc<AnalysisResult>> {
        let seq = self.begin();
        self.apply_upload(seq, text)
    }

    fn apply_upload(&self, seq: u64, text: &str) -> SessionResult<Arc<AnalysisResult>> {
        match parse_upload(text) {
            Ok(result) => self.complete(seq, result),
            Err(e) => self.fail(seq, e.into()),
        }
    }

    /// Display a history entry. Nothing is written back to history, and any
    /// request still in flight is superseded.
    pub fn restore(&self, entry: &HistoryEntry) -> Arc<AnalysisResult> {
        let result = Arc::new(entry.data.clone());
        self.state.send_modify(|state| {
            state.loading = false;
            state.latest_request = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
            state.last_error = None;
            state.current = Some(Arc::clone(&result));
            state.events_view = EventsView::new();
        });
        result
    }

    pub fn history(&self) -> SessionResult<Vec<HistoryEntry>> {
        match &self.history {
            Some(store) => Ok(store.load_all()?),
            None => Ok(Vec::new()),
        }
    }

    // === View state ===

    pub fn select_tab(&self, tab: Tab) {
        self.state.send_modify(|state| state.tabs.select(tab));
    }

    pub fn set_events_filter(&self, filter: impl Into<String>) {
        let filter = filter.into();
        self.state.send_modify(|state| state.events_view.set_filter(filter));
    }

    /// Jump to a 1-based events page, clamped to the filtered result.
    pub fn go_to_events_page(&self, page: usize) {
        self.state.send_modify(|state| {
            let events = state
                .current
                .as_ref()
                .map(|r| r.events.as_slice())
                .unwrap_or_default();
            state.events_view.go_to_page(page, events);
        });
    }

    // === Word-level lookups ===

    /// Morphological analysis of `word`. The language defaults to the one
    /// the displayed result was produced in.
    pub async fn lookup_morphology(
        &self,
        word: &str,
        language: Option<&str>,
    ) -> SessionResult<MorphologyResponse> {
        let word = word.trim();
        if word.is_empty() {
            return Err(SessionError::EmptyInput("word to analyze"));
        }
        let language = match language.map(str::trim).filter(|l| !l.is_empty()) {
            Some(language) => language.to_string(),
            None => self
                .current()
                .map(|r| r.effective_language().to_string())
                .unwrap_or_else(|| self.default_language.clone()),
        };
        let request = MorphologyRequest {
            word: word.to_string(),
            language,
        };
        tracing::debug!(word, language = %request.language, "morphology lookup");
        Ok(self.service.morphology(&request).await?)
    }

    /// Tag `text`, or the displayed result's original text if none is given.
    pub async fn parts_of_speech(
        &self,
        text: Option<&str>,
    ) -> SessionResult<PartsOfSpeechResponse> {
        let input_text = match text {
            Some(text) => text.to_string(),
            None => self
                .current()
                .and_then(|r| r.original_text.clone())
                .unwrap_or_default(),
        };
        if input_text.trim().is_empty() {
            return Err(SessionError::EmptyInput("text to tag"));
        }
        let request = PartsOfSpeechRequest { input_text };
        Ok(self.service.parts_of_speech(&request).await?)
    }

    // === Transitions ===

    /// Sequence numbers are issued under the state lock, so `latest_request`
    /// never lags behind `issued`.
    fn begin(&self) -> u64 {
        let mut seq = 0;
        self.state.send_modify(|state| {
            seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
            state.loading = true;
            state.latest_request = seq;
            state.last_error = None;
        });
        seq
    }

    fn complete(&self, seq: u64, result: AnalysisResult) -> SessionResult<Arc<AnalysisResult>> {
        let result = Arc::new(result);
        let applied = self.state.send_if_modified(|state| {
            if state.latest_request != seq {
                return false;
            }
            state.loading = false;
            state.current = Some(Arc::clone(&result));
            state.events_view = EventsView::new();
            true
        });
        if !applied {
            tracing::warn!(seq, "discarding stale analysis response");
            return Err(SessionError::Superseded(seq));
        }
        self.record(&result);
        Ok(result)
    }

    fn fail<T>(&self, seq: u64, err: SessionError) -> SessionResult<T> {
        let message = err.to_string();
        let applied = self.state.send_if_modified(|state| {
            if state.latest_request != seq {
                return false;
            }
            state.loading = false;
            state.last_error = Some(message);
            true
        });
        if !applied {
            tracing::warn!(seq, error = %err, "discarding stale failure");
            return Err(SessionError::Superseded(seq));
        }
        Err(err)
    }

    /// Record a rejected action without touching the loading flag.
    fn reject(&self, err: SessionError) -> SessionError {
        let message = err.to_string();
        self.state.send_modify(|state| state.last_error = Some(message));
        err
    }

    /// History failures never fail the analysis itself.
    fn record(&self, result: &AnalysisResult) {
        let Some(store) = &self.history else {
            return;
        };
        if let Err(e) = store.append(HistoryEntry::from_result(result)) {
            tracing::warn!(error = %e, "failed to append history entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{OpenStore, SqliteHistoryStore};
    use crate::service::MockService;
    use serde_json::json;

    fn response(summary: &str) -> serde_json::Value {
        json!({
            "summary": summary,
            "events": [{"sentence": "A", "event_type": "X", "verb": "v"}],
            "named_entities": {"persons": [{"entity": "Ada", "description": "engineer"}]}
        })
    }

    #[tokio::test]
    async fn submit_merges_submission_metadata() {
        let service = Arc::new(MockService::new().with_analysis(json!({
            "summary": "s",
            "original_text": "not what was sent",
            "language": "French"
        })));
        let session = Session::new(service.clone());

        let submission = Submission::new("some text", "Spanish").with_doc_date("2025-01-01");
        let result = session.submit_text(submission).await.unwrap();

        assert_eq!(result.original_text.as_deref(), Some("some text"));
        assert_eq!(result.language, "Spanish");
        assert_eq!(result.doc_date.as_deref(), Some("2025-01-01"));

        let sent = service.analyze_requests();
        assert_eq!(sent[0].doc_date, "2025-01-01");
        assert_eq!(sent[0].language, "Spanish");

        let state = session.snapshot();
        assert!(!state.loading);
        assert_eq!(state.current.unwrap().summary, "s");
    }

    #[tokio::test]
    async fn blank_language_uses_default() {
        let service = Arc::new(MockService::new().with_analysis(response("s")));
        let session = Session::new(service.clone()).with_default_language("German");
        let result = session.submit_text(Submission::new("text", " ")).await.unwrap();
        assert_eq!(result.language, "German");
        assert_eq!(service.analyze_requests()[0].language, "German");
    }

    #[tokio::test]
    async fn empty_text_is_rejected_without_a_request() {
        let service = Arc::new(MockService::new());
        let session = Session::new(service.clone());
        let err = session.submit_text(Submission::new("   ", "English")).await.unwrap_err();
        assert!(matches!(err, SessionError::EmptyInput(_)));
        assert!(service.analyze_requests().is_empty());
        assert!(!session.snapshot().loading);
    }

    #[tokio::test]
    async fn failure_keeps_previous_result() {
        let service = Arc::new(
            MockService::new()
                .with_analysis(response("first"))
                .with_failure("connection refused"),
        );
        let session = Session::new(service);

        session.submit_text(Submission::new("one", "English")).await.unwrap();
        let err = session.submit_text(Submission::new("two", "English")).await.unwrap_err();
        assert!(matches!(err, SessionError::Service(_)));

        let state = session.snapshot();
        assert!(!state.loading);
        assert_eq!(state.current.unwrap().summary, "first");
        assert!(state.last_error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn invalid_upload_leaves_state_untouched() {
        let session = Session::new(Arc::new(MockService::new()));
        session.load_json(&response("kept").to_string()).unwrap();

        let err = session.load_json("{not json").unwrap_err();
        assert!(matches!(err, SessionError::Model(ModelError::Parse(_))));
        let err = session.load_json(r#"{"summary": "x"}"#).unwrap_err();
        assert!(matches!(err, SessionError::Model(ModelError::Schema { .. })));

        assert_eq!(session.current().unwrap().summary, "kept");
    }

    #[tokio::test]
    async fn completed_results_are_recorded() {
        let store = Arc::new(SqliteHistoryStore::open_in_memory().unwrap());
        let service = Arc::new(MockService::new().with_analysis(response("from text")));
        let session = Session::new(service).with_history(store.clone());

        session.submit_text(Submission::new("text", "English")).await.unwrap();
        session.load_json(&response("from file").to_string()).unwrap();

        let history = session.history().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].summary, "from file");
        assert_eq!(history[1].snippet, "text");
    }

    #[tokio::test]
    async fn restore_does_not_append() {
        let store = Arc::new(SqliteHistoryStore::open_in_memory().unwrap());
        let session = Session::new(Arc::new(MockService::new())).with_history(store);
        session.load_json(&response("one").to_string()).unwrap();
        session.load_json(&response("two").to_string()).unwrap();

        let older = session.history().unwrap()[1].clone();
        let restored = session.restore(&older);
        assert_eq!(restored.summary, "one");
        assert_eq!(session.current().unwrap().summary, "one");
        assert_eq!(session.history().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn view_state_transitions() {
        let events: Vec<_> = (0..40)
            .map(|i| json!({"sentence": format!("s{i}"), "event_type": "X", "verb": "v"}))
            .collect();
        let raw = json!({"summary": "s", "named_entities": {}, "events": events});
        let session = Session::new(Arc::new(MockService::new()));
        session.load_json(&raw.to_string()).unwrap();

        session.select_tab(Tab::Events);
        session.go_to_events_page(9);
        let state = session.snapshot();
        assert_eq!(state.tabs.active(), Tab::Events);
        assert_eq!(state.events_view.page(&state.current.as_ref().unwrap().events).page, 3);

        session.set_events_filter("s1");
        let state = session.snapshot();
        let page = state.events_view.page(&state.current.as_ref().unwrap().events);
        assert_eq!(page.page, 1);
        // s1 and s10..s19
        assert_eq!(page.total_matches, 11);
    }

    #[tokio::test]
    async fn subscribers_see_transitions() {
        let session = Session::new(Arc::new(MockService::new()));
        let mut rx = session.subscribe();
        session.load_json(&response("watched").to_string()).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().current.as_ref().unwrap().summary, "watched");
    }

    #[tokio::test]
    async fn morphology_language_follows_current_result() {
        let service = Arc::new(
            MockService::new()
                .with_analysis(response("s"))
                .with_morphology("verb, past tense"),
        );
        let session = Session::new(service);
        assert!(matches!(
            session.lookup_morphology("  ", None).await,
            Err(SessionError::EmptyInput(_))
        ));

        session.submit_text(Submission::new("ran home", "English")).await.unwrap();
        let response = session.lookup_morphology("ran", None).await.unwrap();
        assert_eq!(response.analysis, "verb, past tense");
    }

    #[tokio::test]
    async fn parts_of_speech_needs_text() {
        let session = Session::new(Arc::new(MockService::new()));
        let err = session.parts_of_speech(None).await.unwrap_err();
        assert!(matches!(err, SessionError::EmptyInput(_)));
    }

    #[test]
    fn outcome_of_an_older_request_is_dropped() {
        let session = Session::new(Arc::new(MockService::new()));
        let older = session.begin();
        let newer = session.begin();
        assert!(newer > older);

        let err = session.complete(older, AnalysisResult::default()).unwrap_err();
        assert!(matches!(err, SessionError::Superseded(seq) if seq == older));
        let err = session
            .fail::<()>(older, SessionError::EmptyInput("text to analyze"))
            .unwrap_err();
        assert!(matches!(err, SessionError::Superseded(_)));

        let state = session.snapshot();
        assert!(state.loading);
        assert!(state.current.is_none());
        assert!(state.last_error.is_none());
        assert_eq!(state.latest_request, newer);
    }

    #[test]
    fn concurrent_requests_settle_on_the_latest() {
        let session = Session::new(Arc::new(MockService::new()));
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..50 {
                        let seq = session.begin();
                        let result = AnalysisResult {
                            summary: seq.to_string(),
                            ..AnalysisResult::default()
                        };
                        let _ = session.complete(seq, result);
                    }
                });
            }
        });

        let state = session.snapshot();
        assert!(!state.loading);
        assert_eq!(state.latest_request, 400);
        assert_eq!(state.current.unwrap().summary, "400");
    }
}
