//! Capture of every action a store reduces.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use storefront_core::action::Action;
use storefront_core::reducer::Reducer;
use storefront_runtime::Store;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

/// Records actions from a store's broadcast, in reduction order
///
/// Only actions dispatched after [`ActionRecorder::start`] are captured.
pub struct ActionRecorder<A> {
    actions: Arc<Mutex<Vec<A>>>,
    recorded: watch::Receiver<usize>,
    task: JoinHandle<()>,
}

impl<A: Action> ActionRecorder<A> {
    /// Start recording; must be called inside a Tokio runtime
    #[must_use]
    pub fn start<S, R>(store: &Store<S, A, R>) -> Self
    where
        S: Clone + Send + Sync + 'static,
        R: Reducer<State = S, Action = A> + 'static,
    {
        let mut rx = store.subscribe_actions();
        let actions = Arc::new(Mutex::new(Vec::new()));
        let (count_tx, recorded) = watch::channel(0);

        let sink = Arc::clone(&actions);
        let task = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(action) => {
                        let len = {
                            let mut actions = sink.lock().unwrap_or_else(PoisonError::into_inner);
                            actions.push(action);
                            actions.len()
                        };
                        count_tx.send_replace(len);
                    },
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Action recorder lagged");
                    },
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Self {
            actions,
            recorded,
            task,
        }
    }

    /// Actions recorded so far
    #[must_use]
    pub fn actions(&self) -> Vec<A> {
        self.actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Type strings of the recorded actions
    #[must_use]
    pub fn types(&self) -> Vec<&'static str> {
        self.actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(Action::action_type)
            .collect()
    }

    /// Wait for the first recorded action matching `predicate`
    ///
    /// Returns `None` when nothing matched within `timeout`.
    pub async fn wait_for<F>(&self, predicate: F, timeout: Duration) -> Option<A>
    where
        F: Fn(&A) -> bool,
    {
        let find = || {
            self.actions
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .find(|action| predicate(action))
                .cloned()
        };
        self.wait_until(find, timeout).await
    }

    /// Wait until at least `count` actions matching `predicate` were recorded
    ///
    /// Returns the matches, or `None` on timeout.
    pub async fn wait_for_count<F>(&self, count: usize, predicate: F, timeout: Duration) -> Option<Vec<A>>
    where
        F: Fn(&A) -> bool,
    {
        let find = || {
            let matches: Vec<A> = self
                .actions
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .iter()
                .filter(|action| predicate(action))
                .cloned()
                .collect();
            (matches.len() >= count).then_some(matches)
        };
        self.wait_until(find, timeout).await
    }

    async fn wait_until<T>(&self, find: impl Fn() -> Option<T>, timeout: Duration) -> Option<T> {
        let mut recorded = self.recorded.clone();
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            recorded.borrow_and_update();
            if let Some(found) = find() {
                return Some(found);
            }
            match tokio::time::timeout_at(deadline, recorded.changed()).await {
                Ok(Ok(())) => {},
                Ok(Err(_)) | Err(_) => return find(),
            }
        }
    }
}

impl<A> Drop for ActionRecorder<A> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
