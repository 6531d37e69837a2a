use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Where a debounce key currently is in its write cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePhase {
    /// Nothing armed, nothing running.
    Idle,
    /// Timer armed; a newer edit would replace it.
    PendingWrite,
    /// Timer fired and the write is running. It will not be cancelled.
    Writing,
}

struct Slot {
    generation: u64,
    fired: bool,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Registry {
    next_generation: u64,
    slots: HashMap<String, Slot>,
}

/// Decrements the active task count when the task finishes or is aborted.
struct ActiveGuard(Arc<watch::Sender<usize>>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// Per-key timer registry that collapses bursts of edits into one write.
///
/// Scheduling under a key replaces any timer still armed for that key. A
/// timer that has already fired is left alone: its write keeps running and
/// the new edit arms a fresh timer next to it. Different keys never
/// interact.
///
/// Must be used from within a tokio runtime.
#[derive(Clone)]
pub struct DebounceScheduler {
    delay: Duration,
    registry: Arc<Mutex<Registry>>,
    active: Arc<watch::Sender<usize>>,
}

impl DebounceScheduler {
    pub fn new(delay: Duration) -> Self {
        let (active, _) = watch::channel(0);
        Self {
            delay,
            registry: Arc::new(Mutex::new(Registry::default())),
            active: Arc::new(active),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule_default<F, Fut>(&self, key: impl Into<String>, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.schedule(key, self.delay, action);
    }

    pub fn schedule<F, Fut>(&self, key: impl Into<String>, delay: Duration, action: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let key = key.into();
        let mut registry = self.registry.lock();
        registry.next_generation += 1;
        let generation = registry.next_generation;

        self.active.send_modify(|n| *n += 1);
        let guard = ActiveGuard(Arc::clone(&self.active));
        let shared = Arc::clone(&self.registry);
        let task_key = key.clone();

        // Spawned while the registry is locked, so the slot below is in
        // place before the task can look for it.
        let handle = tokio::spawn(async move {
            let _guard = guard;
            tokio::time::sleep(delay).await;

            {
                let mut registry = shared.lock();
                match registry.slots.get_mut(&task_key) {
                    Some(slot) if slot.generation == generation => slot.fired = true,
                    _ => return,
                }
            }

            tracing::debug!(key = %task_key, "debounced write firing");
            action().await;

            let mut registry = shared.lock();
            if registry
                .slots
                .get(&task_key)
                .is_some_and(|slot| slot.generation == generation)
            {
                registry.slots.remove(&task_key);
            }
        });

        let slot = Slot {
            generation,
            fired: false,
            handle,
        };
        if let Some(previous) = registry.slots.insert(key.clone(), slot) {
            if previous.fired {
                tracing::debug!(key = %key, "previous write still running, arming new timer");
            } else {
                previous.handle.abort();
                tracing::debug!(key = %key, "superseded pending write");
            }
        } else {
            tracing::debug!(key = %key, delay_ms = delay.as_millis() as u64, "scheduled write");
        }
    }

    /// Drop the armed timer for `key`. Returns false when nothing was armed
    /// or the write is already running.
    pub fn cancel(&self, key: &str) -> bool {
        let mut registry = self.registry.lock();
        match registry.slots.get(key) {
            Some(slot) if !slot.fired => {
                if let Some(slot) = registry.slots.remove(key) {
                    slot.handle.abort();
                }
                true
            }
            _ => false,
        }
    }

    pub fn phase(&self, key: &str) -> WritePhase {
        match self.registry.lock().slots.get(key) {
            None => WritePhase::Idle,
            Some(slot) if slot.fired => WritePhase::Writing,
            Some(_) => WritePhase::PendingWrite,
        }
    }

    /// Number of armed timers that have not fired yet.
    pub fn pending_count(&self) -> usize {
        self.registry
            .lock()
            .slots
            .values()
            .filter(|slot| !slot.fired)
            .count()
    }

    /// Armed timers plus running writes.
    pub fn active_count(&self) -> usize {
        *self.active.borrow()
    }

    /// Wait until every armed timer has fired and every write has finished.
    pub async fn settle(&self) {
        let mut rx = self.active.subscribe();
        let _ = rx.wait_for(|n| *n == 0).await;
    }
}

impl std::fmt::Debug for DebounceScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebounceScheduler")
            .field("delay", &self.delay)
            .field("active", &self.active_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::Notify;
    use tokio::time::sleep;

    const DELAY: Duration = Duration::from_millis(500);

    fn recorder() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn write(log: &Arc<Mutex<Vec<String>>>, value: &str) -> impl FnOnce() -> std::future::Ready<()> {
        let log = Arc::clone(log);
        let value = value.to_string();
        move || {
            log.lock().push(value);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_value() {
        let scheduler = DebounceScheduler::new(DELAY);
        let log = recorder();

        for value in ["h", "he", "hel", "hello"] {
            scheduler.schedule_default("board:title:1", write(&log, value));
            sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(scheduler.pending_count(), 1);

        scheduler.settle().await;
        assert_eq!(*log.lock(), vec!["hello"]);
        assert_eq!(scheduler.phase("board:title:1"), WritePhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quiet_period_lets_each_write_through() {
        let scheduler = DebounceScheduler::new(DELAY);
        let log = recorder();

        scheduler.schedule_default("k", write(&log, "first"));
        sleep(Duration::from_millis(600)).await;
        scheduler.schedule_default("k", write(&log, "second"));
        scheduler.settle().await;

        assert_eq!(*log.lock(), vec!["first", "second"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let scheduler = DebounceScheduler::new(DELAY);
        let log = recorder();

        scheduler.schedule_default("board:title:1", write(&log, "title"));
        scheduler.schedule_default("board:description:1", write(&log, "description"));
        assert_eq!(scheduler.pending_count(), 2);

        scheduler.settle().await;
        let mut written = log.lock().clone();
        written.sort();
        assert_eq!(written, vec!["description", "title"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_armed_timer() {
        let scheduler = DebounceScheduler::new(DELAY);
        let log = recorder();

        scheduler.schedule_default("k", write(&log, "never"));
        assert_eq!(scheduler.phase("k"), WritePhase::PendingWrite);
        assert!(scheduler.cancel("k"));
        assert!(!scheduler.cancel("k"));

        scheduler.settle().await;
        assert!(log.lock().is_empty());
        assert_eq!(scheduler.active_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_write_is_not_cancelled_by_new_edit() {
        let scheduler = DebounceScheduler::new(DELAY);
        let log = recorder();
        let release = Arc::new(Notify::new());

        {
            let log = Arc::clone(&log);
            let release = Arc::clone(&release);
            scheduler.schedule_default("k", move || async move {
                release.notified().await;
                log.lock().push("slow".to_string());
            });
        }

        sleep(Duration::from_millis(501)).await;
        assert_eq!(scheduler.phase("k"), WritePhase::Writing);
        assert!(!scheduler.cancel("k"));

        scheduler.schedule_default("k", write(&log, "fast"));
        assert_eq!(scheduler.phase("k"), WritePhase::PendingWrite);

        release.notify_one();
        scheduler.settle().await;

        let written = log.lock().clone();
        assert_eq!(written.len(), 2);
        assert!(written.contains(&"slow".to_string()));
        assert!(written.contains(&"fast".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_waits_for_running_writes() {
        let scheduler = DebounceScheduler::new(Duration::from_millis(10));
        let log = recorder();

        {
            let log = Arc::clone(&log);
            scheduler.schedule_default("k", move || async move {
                sleep(Duration::from_secs(2)).await;
                log.lock().push("done".to_string());
            });
        }

        scheduler.settle().await;
        assert_eq!(*log.lock(), vec!["done"]);
        assert_eq!(scheduler.active_count(), 0);
    }
}
