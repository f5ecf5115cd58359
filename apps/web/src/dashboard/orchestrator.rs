//! Dashboard state machine: `Loading → {Error, Ready}`, one fetch per visit.

use tracing::{info, warn};

use crate::backend::{Backend, BackendError};
use crate::models::analysis::FitScoreResult;
use crate::storage::{KeyValueStore, FIT_SCORE_KEY};

pub const MISSING_INPUT_MESSAGE: &str =
    "Please go to the input tab and submit your resume and job description";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardState {
    Loading,
    Error(String),
    Ready(FitScoreResult),
}

/// Maps a failed fetch to the message shown on the dashboard.
pub fn error_message(error: &BackendError) -> String {
    if error.status() == Some(422) {
        return MISSING_INPUT_MESSAGE.to_string();
    }
    error
        .server_error()
        .unwrap_or(UNKNOWN_ERROR_MESSAGE)
        .to_string()
}

/// Mirrors a result into browser storage. Failures are logged, never surfaced.
pub fn persist_snapshot(store: &dyn KeyValueStore, result: &FitScoreResult) {
    let encoded = match serde_json::to_string(result) {
        Ok(encoded) => encoded,
        Err(e) => {
            warn!("could not encode fit score snapshot: {e}");
            return;
        }
    };
    if let Err(e) = store.set(FIT_SCORE_KEY, encoded) {
        warn!("could not persist fit score snapshot: {e}");
    }
}

/// Reads the snapshot written by [`persist_snapshot`], if any.
pub fn load_snapshot(store: &dyn KeyValueStore) -> Option<FitScoreResult> {
    let raw = store.get(FIT_SCORE_KEY)?;
    match serde_json::from_str(&raw) {
        Ok(result) => Some(result),
        Err(e) => {
            warn!("discarding unreadable fit score snapshot: {e}");
            None
        }
    }
}

#[derive(Debug)]
pub struct Dashboard {
    state: DashboardState,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            state: DashboardState::Loading,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Applies the outcome of the fetch. Only the first outcome counts;
    /// `Error` and `Ready` are terminal.
    pub fn resolve(&mut self, outcome: Result<FitScoreResult, BackendError>) {
        if self.state != DashboardState::Loading {
            return;
        }
        self.state = match outcome {
            Ok(result) => DashboardState::Ready(result),
            Err(e) => {
                warn!("fit score fetch failed: {e}");
                DashboardState::Error(error_message(&e))
            }
        };
    }

    /// Performs the single fetch of this visit and mirrors a success into `store`.
    /// A dashboard that already left `Loading` does not fetch again.
    pub async fn load(&mut self, backend: &dyn Backend, store: &dyn KeyValueStore) {
        if self.state != DashboardState::Loading {
            return;
        }

        let outcome = backend.fit_score().await;
        if let Ok(result) = &outcome {
            info!("fit score ready: {}%", result.fit_score);
            persist_snapshot(store, result);
        }
        self.resolve(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::{FeedbackCategory, FeedbackItem};
    use crate::storage::MemoryStore;
    use crate::testing::{api_error, FakeBackend};

    fn sample_result() -> FitScoreResult {
        FitScoreResult {
            fit_score: 85,
            matched_skills: vec!["JavaScript".to_string(), "React".to_string()],
            feedback: vec![],
        }
    }

    #[test]
    fn test_starts_loading() {
        assert_eq!(Dashboard::new().state(), &DashboardState::Loading);
    }

    #[test]
    fn test_422_maps_to_fixed_message() {
        let mut dashboard = Dashboard::new();
        dashboard.resolve(Err(api_error(422, Some("ignored"))));
        assert_eq!(
            dashboard.state(),
            &DashboardState::Error(MISSING_INPUT_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_server_error_text_is_used() {
        let mut dashboard = Dashboard::new();
        dashboard.resolve(Err(api_error(
            400,
            Some("Resume or job description not provided."),
        )));
        assert_eq!(
            dashboard.state(),
            &DashboardState::Error("Resume or job description not provided.".to_string())
        );
    }

    #[test]
    fn test_other_failures_are_unknown() {
        let mut dashboard = Dashboard::new();
        dashboard.resolve(Err(api_error(500, None)));
        assert_eq!(
            dashboard.state(),
            &DashboardState::Error(UNKNOWN_ERROR_MESSAGE.to_string())
        );

        let parse_error = serde_json::from_str::<FitScoreResult>("nope").unwrap_err();
        assert_eq!(
            error_message(&BackendError::Parse(parse_error)),
            UNKNOWN_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_terminal_states_ignore_later_outcomes() {
        let mut dashboard = Dashboard::new();
        dashboard.resolve(Ok(sample_result()));
        dashboard.resolve(Err(api_error(422, None)));
        assert_eq!(dashboard.state(), &DashboardState::Ready(sample_result()));
    }

    #[tokio::test]
    async fn test_load_success_mirrors_snapshot() {
        let backend = FakeBackend::default().with_fit_score(Ok(sample_result()));
        let store = MemoryStore::default();
        let mut dashboard = Dashboard::new();

        dashboard.load(&backend, &store).await;

        assert_eq!(dashboard.state(), &DashboardState::Ready(sample_result()));
        assert_eq!(load_snapshot(&store), Some(sample_result()));
    }

    #[tokio::test]
    async fn test_load_fetches_exactly_once() {
        let backend = FakeBackend::default().with_fit_score(Ok(sample_result()));
        let store = MemoryStore::default();
        let mut dashboard = Dashboard::new();

        dashboard.load(&backend, &store).await;
        dashboard.load(&backend, &store).await;

        assert_eq!(backend.fit_score_calls(), 1);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_snapshot() {
        let store = MemoryStore::default();
        persist_snapshot(&store, &sample_result());

        let backend = FakeBackend::default().with_fit_score(Err(api_error(422, None)));
        let mut dashboard = Dashboard::new();
        dashboard.load(&backend, &store).await;

        assert!(matches!(dashboard.state(), DashboardState::Error(_)));
        assert_eq!(load_snapshot(&store), Some(sample_result()));
    }

    #[tokio::test]
    async fn test_persist_failure_is_not_surfaced() {
        let backend = FakeBackend::default().with_fit_score(Ok(FitScoreResult {
            fit_score: 50,
            matched_skills: vec![],
            feedback: vec![FeedbackItem::new(FeedbackCategory::General, "x".repeat(256))],
        }));
        let store = MemoryStore::new(8);
        let mut dashboard = Dashboard::new();

        dashboard.load(&backend, &store).await;

        assert!(matches!(dashboard.state(), DashboardState::Ready(_)));
        assert!(load_snapshot(&store).is_none());
    }

    #[test]
    fn test_corrupt_snapshot_is_ignored() {
        let store = MemoryStore::default();
        store.set(FIT_SCORE_KEY, "{not json".to_string()).unwrap();
        assert!(load_snapshot(&store).is_none());
    }
}
