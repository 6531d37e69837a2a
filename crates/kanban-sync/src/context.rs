use crate::debounce::DebounceScheduler;
use crate::failure::{FailureReporter, Operation};
use crate::store::BoardStore;
use kanban_core::{KanbanResult, SyncConfig};
use kanban_gateway::BoardGateway;
use std::future::Future;
use std::sync::Arc;

/// Handles shared by every controller of one client session.
#[derive(Clone)]
pub struct SyncContext {
    pub gateway: Arc<dyn BoardGateway>,
    pub store: Arc<BoardStore>,
    pub scheduler: DebounceScheduler,
    pub failures: FailureReporter,
}

impl SyncContext {
    pub fn new(gateway: Arc<dyn BoardGateway>, config: &SyncConfig) -> Self {
        Self {
            gateway,
            store: Arc::new(BoardStore::new()),
            scheduler: DebounceScheduler::new(config.debounce()),
            failures: FailureReporter::new(),
        }
    }

    /// Report a failed call before handing the result back.
    pub(crate) fn check<T>(
        &self,
        operation: Operation,
        target: &str,
        result: KanbanResult<T>,
    ) -> KanbanResult<T> {
        if let Err(ref e) = result {
            self.failures.report(operation, target, e);
        }
        result
    }

    /// Debounce a write under `key`. Failures go to the failure channel.
    pub(crate) fn persist_debounced<F, Fut>(&self, key: String, operation: Operation, write: F)
    where
        F: FnOnce(Arc<dyn BoardGateway>) -> Fut + Send + 'static,
        Fut: Future<Output = KanbanResult<()>> + Send + 'static,
    {
        let gateway = Arc::clone(&self.gateway);
        let failures = self.failures.clone();
        let target = key.clone();
        self.scheduler.schedule_default(key, move || async move {
            match write(gateway).await {
                Ok(()) => tracing::info!(key = %target, "persisted"),
                Err(e) => failures.report(operation, &target, &e),
            }
        });
    }
}

impl std::fmt::Debug for SyncContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncContext")
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}
