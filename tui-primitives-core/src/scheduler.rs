//! Keyed, cancellable delayed work
//!
//! The coordinators never block: a deferred focus move or a search reset is
//! a message delivered back over a channel after a delay. Scheduling under a
//! key that is already pending replaces the earlier task, which is what makes
//! the search reset a debounce.
//!
//! Every task also listens on a [`CancellationToken`] owned by the scheduler,
//! so nothing scheduled by a primitive fires after the scheduler is dropped.
//!
//! ```ignore
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let mut scheduler = Scheduler::new(tx);
//!
//! scheduler.after("search", Duration::from_millis(350), Deferred::ClearSearch);
//! scheduler.after("search", Duration::from_millis(350), Deferred::ClearSearch); // resets
//! scheduler.cancel(&TaskKey::new("search"));
//! ```

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{AbortHandle, JoinHandle};
use tokio_util::sync::CancellationToken;

/// Identifies a pending task for cancellation and replacement.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TaskKey(String);

impl TaskKey {
    /// Create a new task key.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get the key name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for TaskKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TaskKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Delivers messages of type `T` after a delay, one pending task per key.
pub struct Scheduler<T> {
    tasks: HashMap<TaskKey, AbortHandle>,
    tx: mpsc::UnboundedSender<T>,
    lifetime: CancellationToken,
}

impl<T> Scheduler<T>
where
    T: Send + 'static,
{
    /// Create a scheduler that delivers into `tx`.
    pub fn new(tx: mpsc::UnboundedSender<T>) -> Self {
        Self {
            tasks: HashMap::new(),
            tx,
            lifetime: CancellationToken::new(),
        }
    }

    /// Deliver `message` after `delay`, replacing any task under `key`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn after(&mut self, key: impl Into<TaskKey>, delay: Duration, message: T) -> &mut Self {
        let key = key.into();
        self.cancel(&key);

        let tx = self.tx.clone();
        let token = self.lifetime.child_token();
        let handle: JoinHandle<()> = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(message);
                }
            }
        });

        tracing::trace!(key = key.name(), delay_ms = delay.as_millis() as u64, "Scheduled");
        self.tasks.insert(key, handle.abort_handle());
        self
    }

    /// Cancel the task under `key`. No-op when nothing is pending.
    pub fn cancel(&mut self, key: &TaskKey) {
        if let Some(handle) = self.tasks.remove(key) {
            handle.abort();
        }
    }

    /// Cancel every pending task.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }

    /// Whether a task under `key` has not yet delivered.
    pub fn is_pending(&self, key: &TaskKey) -> bool {
        self.tasks
            .get(key)
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Number of tracked tasks, finished or not.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if there are no tracked tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<T> Drop for Scheduler<T> {
    fn drop(&mut self) {
        self.lifetime.cancel();
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_key() {
        let k1 = TaskKey::new("focus");
        let k2: TaskKey = "focus".into();
        assert_eq!(k1, k2);
        assert_eq!(k1.name(), "focus");
    }

    #[tokio::test(start_paused = true)]
    async fn test_after_delivers() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = Scheduler::new(tx);
        let start = tokio::time::Instant::now();

        scheduler.after("focus", Duration::from_millis(16), 42);

        assert_eq!(rx.recv().await, Some(42));
        assert!(start.elapsed() >= Duration::from_millis(16));
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_key_resets_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = Scheduler::new(tx);
        let start = tokio::time::Instant::now();

        scheduler.after("search", Duration::from_millis(350), 1);
        tokio::time::sleep(Duration::from_millis(200)).await;
        scheduler.after("search", Duration::from_millis(350), 2);

        assert_eq!(rx.recv().await, Some(2));
        assert!(start.elapsed() >= Duration::from_millis(550));

        let nothing = tokio::time::timeout(Duration::from_secs(1), rx.recv()).await;
        assert!(nothing.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = Scheduler::new(tx);

        scheduler
            .after("search", Duration::from_millis(350), "search")
            .after("focus", Duration::from_millis(16), "focus");

        assert_eq!(rx.recv().await, Some("focus"));
        assert_eq!(rx.recv().await, Some("search"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = Scheduler::new(tx);

        scheduler.after("focus", Duration::from_millis(16), 1);
        assert!(scheduler.is_pending(&TaskKey::new("focus")));

        scheduler.cancel(&TaskKey::new("focus"));
        assert!(!scheduler.is_pending(&TaskKey::new("focus")));

        let result = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_everything() {
        let (tx, mut rx) = mpsc::unbounded_channel::<u8>();
        let keep_open = tx.clone();
        let mut scheduler = Scheduler::new(tx);

        scheduler
            .after("a", Duration::from_millis(10), 1)
            .after("b", Duration::from_millis(20), 2);
        assert_eq!(scheduler.len(), 2);
        drop(scheduler);

        let result = tokio::time::timeout(Duration::from_millis(100), rx.recv()).await;
        assert!(result.is_err());
        drop(keep_open);
    }

    #[tokio::test]
    async fn test_cancel_all() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut scheduler = Scheduler::new(tx);

        scheduler
            .after("a", Duration::from_secs(10), ())
            .after("b", Duration::from_secs(10), ());
        assert_eq!(scheduler.len(), 2);

        scheduler.cancel_all();
        assert!(scheduler.is_empty());
    }
}
