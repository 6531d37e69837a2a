use chrono::{DateTime, Utc};
use kanban_core::KanbanError;
use serde::Serialize;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    LoadBoards,
    LoadBoard,
    CreateBoard,
    UpdateBoard,
    DeleteBoard,
    ReorderBoards,
    ReorderFavourites,
    ToggleFavourite,
    CreateSection,
    UpdateSection,
    DeleteSection,
    CreateTask,
    UpdateTask,
    DeleteTask,
    MoveTask,
}

/// A remote write or read that did not go through.
///
/// Local state is never rolled back; it stays ahead of the server until the
/// next successful edit or a reload.
#[derive(Debug, Clone, Serialize)]
pub struct SyncFailure {
    pub operation: Operation,
    /// Entity id or debounce key the operation was about.
    pub target: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Broadcast channel for failed gateway calls.
#[derive(Debug, Clone)]
pub struct FailureReporter {
    tx: broadcast::Sender<SyncFailure>,
}

impl FailureReporter {
    /// The channel has a buffer size of 64; slow subscribers lose the oldest failures.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncFailure> {
        self.tx.subscribe()
    }

    pub fn report(&self, operation: Operation, target: &str, error: &KanbanError) {
        if error.is_remote() {
            tracing::warn!(?operation, entity = %target, "sync failed: {}", error);
        } else {
            tracing::error!(?operation, entity = %target, "sync failed locally: {}", error);
        }
        let failure = SyncFailure {
            operation,
            target: target.to_string(),
            message: error.to_string(),
            at: Utc::now(),
        };
        // No subscribers is fine; the warning above is the fallback.
        let _ = self.tx.send(failure);
    }
}

impl Default for FailureReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_failures() {
        let reporter = FailureReporter::new();
        let mut rx = reporter.subscribe();

        reporter.report(
            Operation::DeleteBoard,
            "b1",
            &KanbanError::Network("connection refused".into()),
        );

        let failure = rx.recv().await.unwrap();
        assert_eq!(failure.operation, Operation::DeleteBoard);
        assert_eq!(failure.target, "b1");
        assert_eq!(failure.message, "Network error: connection refused");
    }

    #[test]
    fn test_report_without_subscribers() {
        let reporter = FailureReporter::default();
        reporter.report(
            Operation::UpdateTask,
            "task:title:t1",
            &KanbanError::NotFound("task t1".into()),
        );
    }
}
