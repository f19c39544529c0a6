//! End-to-end session behaviour against the mock service
//!
//! Run with: `cargo test --test session_flow`

mod common;

use anasi::history::HISTORY_CAP;
use anasi::{
    GraphKind, HistoryStore, MockService, OpenStore, Session, SessionError, SqliteHistoryStore,
    Submission, Tab,
};
use common::{minimal_upload, service_response};
use std::sync::Arc;
use std::time::Duration;

fn session_with(service: MockService) -> (Session, Arc<SqliteHistoryStore>) {
    let store = Arc::new(SqliteHistoryStore::open_in_memory().unwrap());
    let session = Session::new(Arc::new(service)).with_history(store.clone());
    (session, store)
}

#[tokio::test]
async fn submitted_text_is_analyzed_rendered_and_recorded() {
    let (session, store) =
        session_with(MockService::new().with_analysis(service_response("A flood")));

    let submission =
        Submission::new("The river flooded Riverside.", "English").with_doc_date("2024-03-05");
    let result = session.submit_text(submission).await.unwrap();

    assert_eq!(result.events.len(), 2);
    assert_eq!(result.events[0].patients.as_deref(), Some("Riverside"));
    assert_eq!(result.events[0].purpose_context, None);
    assert_eq!(result.named_entities.get("persons").len(), 1);

    let timeline: Vec<_> = result.sorted_timeline().iter().map(|b| b.date.as_str()).collect();
    assert_eq!(timeline, vec!["2024-03-03", "2024-03-04"]);

    let causation = GraphKind::Causation.build(&result);
    assert_eq!(causation.edges.len(), 2);
    // "Emergency declared" is only named by a relation
    assert!(causation.node("Emergency declared").unwrap().synthesized);

    let events = GraphKind::EventRelations.build(&result);
    assert_eq!(events.node("e1").unwrap().label, "River floods");

    let entries = store.load_all().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].summary, "A flood");
    assert_eq!(entries[0].snippet, "The river flooded Riverside.");
    assert_eq!(entries[0].doc_date.as_deref(), Some("2024-03-05"));

    session.select_tab(Tab::Timeline);
    let state = session.snapshot();
    let text = anasi::render_tab(
        state.current.as_ref().unwrap(),
        state.tabs.active(),
        &state.events_view,
    );
    assert!(text.contains("Events on 2024-03-03"));
}

#[tokio::test]
async fn stale_success_does_not_overwrite_newer_result() {
    let (session, store) = session_with(
        MockService::new()
            .with_delayed_analysis(Duration::from_millis(200), service_response("slow"))
            .with_analysis(service_response("fast")),
    );

    let (slow, fast) = tokio::join!(
        session.submit_text(Submission::new("first", "English")),
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            session.submit_text(Submission::new("second", "English")).await
        }
    );

    assert!(matches!(slow, Err(SessionError::Superseded(1))));
    assert_eq!(fast.unwrap().summary, "fast");

    let state = session.snapshot();
    assert!(!state.loading);
    assert_eq!(state.latest_request, 2);
    assert_eq!(state.current.unwrap().summary, "fast");

    // Only the applied result is recorded
    let entries = store.load_all().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].summary, "fast");
}

#[tokio::test]
async fn stale_failure_is_discarded() {
    let (session, _) = session_with(
        MockService::new()
            .with_delayed_failure(Duration::from_millis(200), "timed out")
            .with_analysis(service_response("fresh")),
    );

    let (stale, fresh) = tokio::join!(
        session.submit_text(Submission::new("first", "English")),
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            session.submit_text(Submission::new("second", "English")).await
        }
    );

    assert!(matches!(stale, Err(SessionError::Superseded(_))));
    assert!(fresh.is_ok());
    let state = session.snapshot();
    assert!(state.last_error.is_none());
    assert_eq!(state.current.unwrap().summary, "fresh");
}

#[tokio::test]
async fn loading_stays_set_until_latest_request_finishes() {
    let (session, _) = session_with(
        MockService::new()
            .with_analysis(service_response("quick"))
            .with_delayed_analysis(Duration::from_millis(200), service_response("latest")),
    );
    let mut rx = session.subscribe();

    let (first, second) = tokio::join!(
        session.submit_text(Submission::new("first", "English")),
        async {
            // Wait until the first request has been applied
            rx.wait_for(|s| s.current.is_some()).await.unwrap();
            let pending = session.submit_text(Submission::new("second", "English"));
            tokio::pin!(pending);
            tokio::select! {
                result = &mut pending => result,
                _ = tokio::time::sleep(Duration::from_millis(50)) => {
                    assert!(session.snapshot().loading);
                    pending.await
                }
            }
        }
    );

    assert_eq!(first.unwrap().summary, "quick");
    assert_eq!(second.unwrap().summary, "latest");
    assert!(!session.snapshot().loading);
}

#[tokio::test]
async fn service_failure_preserves_displayed_result() {
    let (session, store) = session_with(
        MockService::new()
            .with_analysis(service_response("kept"))
            .with_failure("503 unavailable"),
    );
    session.submit_text(Submission::new("one", "English")).await.unwrap();
    session.select_tab(Tab::Causation);

    let err = session.submit_text(Submission::new("two", "English")).await.unwrap_err();
    assert!(matches!(err, SessionError::Service(_)));

    let state = session.snapshot();
    assert_eq!(state.current.unwrap().summary, "kept");
    assert_eq!(state.tabs.active(), Tab::Causation);
    assert!(!state.loading);
    assert_eq!(store.load_all().unwrap().len(), 1);
}

#[tokio::test]
async fn json_file_loads_without_original_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("analysis.json");
    std::fs::write(&path, minimal_upload().to_string()).unwrap();

    let (session, store) = session_with(MockService::new());
    let result = session.load_file(&path).await.unwrap();

    assert_eq!(result.events.len(), 1);
    assert!(result.original_text.is_none());
    assert!(result.named_entities.get("persons").is_empty());
    assert_eq!(store.load_all().unwrap()[0].snippet, "");
}

#[tokio::test]
async fn unreadable_and_invalid_files_fail_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let (session, store) = session_with(MockService::new());

    let missing = dir.path().join("missing.json");
    let err = session.load_file(&missing).await.unwrap_err();
    assert!(matches!(err, SessionError::Io { .. }));

    let broken = dir.path().join("broken.json");
    std::fs::write(&broken, "{not json").unwrap();
    let err = session.load_file(&broken).await.unwrap_err();
    assert!(err.to_string().starts_with("Error parsing the JSON file"));

    assert!(session.current().is_none());
    assert!(store.load_all().unwrap().is_empty());
}

#[tokio::test]
async fn exported_result_reloads_identically() {
    let (session, _) =
        session_with(MockService::new().with_analysis(service_response("round trip")));
    let original = session
        .submit_text(Submission::new("text", "Spanish"))
        .await
        .unwrap();

    let exported = serde_json::to_string_pretty(original.as_ref()).unwrap();
    let reloaded = session.load_json(&exported).unwrap();
    assert_eq!(reloaded.as_ref(), original.as_ref());
}

#[tokio::test]
async fn history_is_capped_newest_first() {
    let mut service = MockService::new();
    for i in 0..(HISTORY_CAP + 2) {
        service = service.with_analysis(service_response(&format!("analysis {i}")));
    }
    let (session, _) = session_with(service);
    for i in 0..(HISTORY_CAP + 2) {
        session
            .submit_text(Submission::new(format!("text {i}"), "English"))
            .await
            .unwrap();
    }

    let history = session.history().unwrap();
    assert_eq!(history.len(), HISTORY_CAP);
    assert_eq!(history[0].summary, "analysis 6");
    assert_eq!(history[HISTORY_CAP - 1].summary, "analysis 2");
}

#[tokio::test]
async fn history_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.db");

    {
        let store = Arc::new(SqliteHistoryStore::open(&path).unwrap());
        let session = Session::new(Arc::new(MockService::new())).with_history(store);
        session.load_json(&service_response("persisted").to_string()).unwrap();
    }

    let store = Arc::new(SqliteHistoryStore::open(&path).unwrap());
    let session = Session::new(Arc::new(MockService::new())).with_history(store);
    let history = session.history().unwrap();
    assert_eq!(history.len(), 1);

    let restored = session.restore(&history[0]);
    assert_eq!(restored.summary, "persisted");
    assert_eq!(GraphKind::EntityRelations.build(&restored).edges.len(), 1);
}
