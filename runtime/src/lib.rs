//! # Storefront Runtime
//!
//! Runtime for the storefront state engine.
//!
//! ## Core Components
//!
//! - **Store**: Owns the state tree, serializes reduction and publishes
//!   snapshots and actions
//! - **Effect Runtime**: Runs effects against the action stream under their
//!   declared concurrency policy and feeds outcomes back into the store
//!
//! ## Example
//!
//! ```ignore
//! use storefront_runtime::{EffectRuntime, Store};
//!
//! let store = Store::new(AppState::default(), app_reducer());
//! let effects = EffectRuntime::new(store.clone());
//! effects.register(LoadBasketEffect::new(api.clone()));
//!
//! // Send an action
//! store.dispatch(BasketAction::LoadBasket.into());
//!
//! // Read state
//! let loading = store.state(|s| s.basket.loading);
//! ```

use std::sync::Arc;

/// Effect runtime enforcing switch/concat/merge policies
pub mod effects;

/// Store and effect runtime health
pub mod health;

/// Prometheus metrics for observability
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    ///
    /// `dispatch` itself never fails; these only surface from the
    /// request/response helpers.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and no longer accepts actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Timeout waiting for a matching action
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use effects::EffectRuntime;
pub use error::StoreError;
pub use health::{HealthCheck, HealthReport, HealthStatus};

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use storefront_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_broadcast_capacity(4096);
/// assert_eq!(config.broadcast_capacity, 4096);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of actions buffered for each action observer before it lags
    pub broadcast_capacity: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(broadcast_capacity: usize) -> Self {
        Self { broadcast_capacity }
    }

    /// Set the action broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 1024,
        }
    }
}

/// Store module containing the Store implementation
pub mod store {
    use super::{Arc, HealthCheck, HealthStatus, StoreConfig, StoreError};
    use crate::metrics::StoreMetrics;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::{Mutex, PoisonError};
    use std::time::{Duration, Instant};
    use storefront_core::action::Action;
    use storefront_core::reducer::Reducer;
    use storefront_core::selector::{Selection, StateSnapshots};
    use tokio::sync::{broadcast, mpsc, watch};

    /// Filter deciding which actions reach an effect queue
    type Accepts<A> = Box<dyn Fn(&A) -> bool + Send + Sync>;

    /// Unbounded queue of the actions one effect accepts
    struct EffectFeed<A> {
        accepts: Accepts<A>,
        sender: mpsc::UnboundedSender<A>,
    }

    /// The Store - the single authoritative state tree
    ///
    /// The Store manages:
    /// 1. State (published as immutable `Arc` snapshots)
    /// 2. Reducer (business logic)
    /// 3. Effect queues (lossless, one per effect)
    /// 4. Action broadcast (passive observers, may lag)
    ///
    /// Cloning a Store yields another handle to the same state tree.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `R`: Reducer implementation
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Store::new(AppState::default(), app_reducer());
    ///
    /// store.dispatch(AccountAction::LoginUser { credentials }.into());
    /// assert!(store.state(|s| s.user.loading));
    /// ```
    pub struct Store<S, A, R> {
        inner: Arc<Inner<S, A, R>>,
    }

    struct Inner<S, A, R> {
        reducer: R,
        state: watch::Sender<Arc<S>>,
        /// Every reduced action, in reduction order
        actions: broadcast::Sender<A>,
        effect_feeds: Mutex<Vec<EffectFeed<A>>>,
        /// Serializes reduction and broadcast
        dispatch_lock: Mutex<()>,
        shutdown: AtomicBool,
        dispatched: AtomicU64,
        config: StoreConfig,
    }

    impl<S, A, R> Clone for Store<S, A, R> {
        fn clone(&self) -> Self {
            Self {
                inner: Arc::clone(&self.inner),
            }
        }
    }

    impl<S, A, R> Store<S, A, R>
    where
        S: Clone + Send + Sync + 'static,
        A: Action,
        R: Reducer<State = S, Action = A> + 'static,
    {
        /// Create a new store with initial state and reducer
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R) -> Self {
            Self::with_config(initial_state, reducer, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(initial_state: S, reducer: R, config: StoreConfig) -> Self {
            let (state, _) = watch::channel(Arc::new(initial_state));
            let (actions, _) = broadcast::channel(config.broadcast_capacity.max(1));

            Self {
                inner: Arc::new(Inner {
                    reducer,
                    state,
                    actions,
                    effect_feeds: Mutex::new(Vec::new()),
                    dispatch_lock: Mutex::new(()),
                    shutdown: AtomicBool::new(false),
                    dispatched: AtomicU64::new(0),
                    config,
                }),
            }
        }

        /// Reduce an action and notify subscribers
        ///
        /// Reduction runs synchronously on the caller's thread. Concurrent
        /// callers are serialized, so actions are reduced and broadcast in
        /// exactly the order they acquire the store. The action is broadcast
        /// after the new snapshot is published, so effects always observe
        /// the state the action produced.
        ///
        /// After [`Store::shutdown`] actions are dropped with a warning.
        #[tracing::instrument(skip_all, fields(action = action.action_type()), name = "store_dispatch")]
        pub fn dispatch(&self, action: A) {
            if self.inner.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shut down");
                StoreMetrics::record_rejected();
                return;
            }

            let _serialized = self
                .inner
                .dispatch_lock
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            let start = Instant::now();
            self.inner.state.send_modify(|snapshot| {
                let state = Arc::make_mut(snapshot);
                self.inner.reducer.reduce(state, &action);
            });
            StoreMetrics::record_dispatch(action.action_type(), start.elapsed());
            self.inner.dispatched.fetch_add(1, Ordering::Relaxed);

            tracing::debug!(class = ?action.class(), "Action reduced");

            self.inner
                .effect_feeds
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|feed| !(feed.accepts)(&action) || feed.sender.send(action.clone()).is_ok());

            // No receivers simply means nobody is observing yet
            let _ = self.inner.actions.send(action);
        }

        /// The current state snapshot
        #[must_use]
        pub fn snapshot(&self) -> Arc<S> {
            Arc::clone(&*self.inner.state.borrow())
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let wishlist_count = store.state(|s| s.wishlists.entities.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.inner.state.borrow())
        }

        /// Read handle over published snapshots, as handed to effects
        #[must_use]
        pub fn snapshots(&self) -> StateSnapshots<S> {
            StateSnapshots::new(self.inner.state.subscribe())
        }

        /// Live projection of state that emits only on change
        ///
        /// The returned selection yields the current value first and then
        /// only values structurally different from the previous one.
        pub fn select<T, F>(&self, projector: F) -> Selection<T>
        where
            T: Clone + PartialEq + Send + 'static,
            F: Fn(&S) -> T + Send + Sync + 'static,
        {
            self.snapshots().select(projector)
        }

        /// Queue of every later action `accepts` lets through
        ///
        /// Unlike [`Store::subscribe_actions`] the queue never drops actions.
        /// It is fed while the dispatch lock is held, so it sees actions in
        /// reduction order, and it closes on [`Store::shutdown`].
        pub(crate) fn effect_feed<F>(&self, accepts: F) -> mpsc::UnboundedReceiver<A>
        where
            F: Fn(&A) -> bool + Send + Sync + 'static,
        {
            let (sender, receiver) = mpsc::unbounded_channel();
            let _serialized = self
                .inner
                .dispatch_lock
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if !self.is_shutdown() {
                self.inner
                    .effect_feeds
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(EffectFeed {
                        accepts: Box::new(accepts),
                        sender,
                    });
            }
            receiver
        }

        /// Subscribe to all actions reduced by this store
        ///
        /// # Notes
        ///
        /// - Actions are received in reduction order
        /// - If the receiver lags, it skips old actions and receives
        ///   [`broadcast::error::RecvError::Lagged`]
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.inner.actions.subscribe()
        }

        /// Dispatch an action and wait for a matching reduced action
        ///
        /// Designed for request/response flows: subscribe, dispatch the
        /// intent, then wait for the outcome an effect feeds back.
        ///
        /// # Errors
        ///
        /// - [`StoreError::ShutdownInProgress`]: Store is shut down
        /// - [`StoreError::Timeout`]: Timeout expired before a matching action
        /// - [`StoreError::ChannelClosed`]: Action broadcast channel closed
        ///
        /// # Example
        ///
        /// ```ignore
        /// let outcome = store.dispatch_and_wait_for(
        ///     AccountAction::LoginUser { credentials }.into(),
        ///     |a| a.class().is_outcome(),
        ///     Duration::from_secs(10),
        /// ).await?;
        /// ```
        pub async fn dispatch_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            if self.is_shutdown() {
                return Err(StoreError::ShutdownInProgress);
            }

            // Subscribe BEFORE dispatching to avoid missing a fast outcome
            let mut rx = self.inner.actions.subscribe();
            self.dispatch(action);

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Stop accepting actions
        ///
        /// Later dispatches are dropped and effect queues close. Already published snapshots stay
        /// readable.
        pub fn shutdown(&self) {
            if !self.inner.shutdown.swap(true, Ordering::AcqRel) {
                tracing::info!("Store shut down");
            }
            // Closes every effect queue
            self.inner
                .effect_feeds
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
        }

        /// Whether [`Store::shutdown`] was called
        #[must_use]
        pub fn is_shutdown(&self) -> bool {
            self.inner.shutdown.load(Ordering::Acquire)
        }

        /// Number of actions reduced so far
        #[must_use]
        pub fn dispatched(&self) -> u64 {
            self.inner.dispatched.load(Ordering::Relaxed)
        }

        /// Shutdown state and observer counts
        #[must_use]
        pub fn health(&self) -> HealthCheck {
            let check = HealthCheck::new("store")
                .with_gauge("dispatched", self.dispatched())
                .with_gauge("action_observers", self.inner.actions.receiver_count())
                .with_gauge("state_subscribers", self.inner.state.receiver_count())
                .with_gauge("broadcast_capacity", self.inner.config.broadcast_capacity);

            if self.is_shutdown() {
                check.with_status(HealthStatus::Unhealthy, "store is shut down")
            } else {
                check
            }
        }
    }
}

pub use store::Store;
