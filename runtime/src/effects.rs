//! Effect execution.
//!
//! Every registered effect gets its own task fed by an unbounded queue of the
//! actions [`Effect::accepts`]. The store fills the queue during dispatch, so
//! a burst of intents is never lost however late the task is polled. The
//! task starts calls according to the effect's [`Policy`] and dispatches
//! each outcome back into the store:
//!
//! - **Switch**: a new intent aborts the in-flight call. Every call carries a
//!   generation number and results from a superseded generation are
//!   discarded even if they win the race against the abort.
//! - **Concat**: intents queue up; the next call starts only after the
//!   previous outcome has been dispatched.
//! - **Merge**: every intent starts a call immediately.
//!
//! Effects are never retried. A panicking call is logged and counted and
//! produces no action.

use crate::metrics::EffectMetrics;
use crate::store::Store;
use crate::{HealthCheck, HealthStatus, StoreError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use storefront_core::action::Action;
use storefront_core::effect::{Effect, Policy};
use storefront_core::reducer::Reducer;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::Instrument;

/// Runs effects against a [`Store`]
///
/// Dropping the runtime stops every effect loop and aborts in-flight calls.
///
/// # Example
///
/// ```ignore
/// let runtime = EffectRuntime::new(store.clone());
/// runtime.register(LoadReturnRequests::new(api.clone()));
/// runtime.register(CreateReturnRequest::new(api));
///
/// // later
/// runtime.shutdown();
/// ```
pub struct EffectRuntime<S, A, R> {
    store: Store<S, A, R>,
    loops: Mutex<Vec<(&'static str, JoinHandle<()>)>>,
}

impl<S, A, R> EffectRuntime<S, A, R>
where
    S: Clone + Send + Sync + 'static,
    A: Action,
    R: Reducer<State = S, Action = A> + 'static,
{
    /// Create a runtime feeding outcomes into `store`
    #[must_use]
    pub fn new(store: Store<S, A, R>) -> Self {
        Self {
            store,
            loops: Mutex::new(Vec::new()),
        }
    }

    /// The store this runtime dispatches into
    #[must_use]
    pub const fn store(&self) -> &Store<S, A, R> {
        &self.store
    }

    /// Start an effect
    ///
    /// The effect observes every action dispatched after this call returns.
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] once the store is shut down.
    pub fn register<E>(&self, effect: E) -> Result<(), StoreError>
    where
        E: Effect<State = S, Action = A>,
    {
        if self.store.is_shutdown() {
            return Err(StoreError::ShutdownInProgress);
        }

        let name = effect.name();
        let effect = Arc::new(effect);
        let filter = Arc::clone(&effect);
        let actions = self.store.effect_feed(move |action| filter.accepts(action));
        let task = EffectLoop {
            effect,
            store: self.store.clone(),
            in_flight: JoinSet::new(),
            generation: 0,
            queue: VecDeque::new(),
        };

        tracing::debug!(effect = name, "Effect registered");
        let handle = tokio::spawn(
            task.run(actions)
                .instrument(tracing::debug_span!("effect_loop", effect = name)),
        );
        self.loops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((name, handle));
        Ok(())
    }

    /// Names of the registered effects, in registration order
    #[must_use]
    pub fn registered(&self) -> Vec<&'static str> {
        self.loops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, _)| *name)
            .collect()
    }

    /// Stop all effects and shut the store down
    ///
    /// In-flight calls are aborted; their results are never dispatched.
    pub fn shutdown(&self) {
        self.store.shutdown();
        self.abort_loops();
        tracing::info!("Effect runtime shut down");
    }

    /// Health of the effect loops
    #[must_use]
    pub fn health(&self) -> HealthCheck {
        let loops = self.loops.lock().unwrap_or_else(PoisonError::into_inner);
        let stopped: Vec<&str> = loops
            .iter()
            .filter(|(_, handle)| handle.is_finished())
            .map(|(name, _)| *name)
            .collect();

        let mut check = HealthCheck::new("effects").with_gauge("registered", loops.len());
        if self.store.is_shutdown() {
            check = check.with_status(HealthStatus::Unhealthy, "effect runtime is shut down");
        } else if !stopped.is_empty() {
            check = check.with_status(HealthStatus::Degraded, format!("stopped effects: {}", stopped.join(", ")));
        }
        check
    }

    fn abort_loops(&self) {
        for (_, handle) in self
            .loops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
        {
            handle.abort();
        }
    }
}

impl<S, A, R> Drop for EffectRuntime<S, A, R> {
    fn drop(&mut self) {
        let loops = match self.loops.get_mut() {
            Ok(loops) => loops,
            Err(poisoned) => poisoned.into_inner(),
        };
        for (_, handle) in loops.drain(..) {
            handle.abort();
        }
    }
}

/// State of one effect's task
struct EffectLoop<E: Effect, R> {
    effect: Arc<E>,
    store: Store<E::State, E::Action, R>,
    /// Calls in flight, tagged with their switch generation
    in_flight: JoinSet<(u64, Option<E::Action>)>,
    generation: u64,
    /// Concat backlog
    queue: VecDeque<E::Action>,
}

impl<E, R> EffectLoop<E, R>
where
    E: Effect,
    E::State: Clone,
    R: Reducer<State = E::State, Action = E::Action> + 'static,
{
    async fn run(mut self, mut actions: mpsc::UnboundedReceiver<E::Action>) {
        loop {
            tokio::select! {
                biased;

                Some(joined) = self.in_flight.join_next(), if !self.in_flight.is_empty() => {
                    self.complete(joined);
                }

                received = actions.recv() => match received {
                    Some(action) => self.accept(action),
                    None => break,
                },
            }
        }

        self.in_flight.abort_all();
        tracing::debug!("Effect loop finished");
    }

    fn accept(&mut self, action: E::Action) {
        match self.effect.policy() {
            Policy::Switch => {
                if !self.in_flight.is_empty() {
                    tracing::debug!("Superseding in-flight call");
                    EffectMetrics::record_cancelled(self.effect.name());
                    self.in_flight.abort_all();
                }
                self.generation += 1;
                self.start(action);
            },
            Policy::Concat => {
                if self.in_flight.is_empty() {
                    self.start(action);
                } else {
                    self.queue.push_back(action);
                }
            },
            Policy::Merge => self.start(action),
        }
    }

    fn start(&mut self, action: E::Action) {
        let name = self.effect.name();
        let generation = self.generation;
        let call = self.effect.run(action, self.store.snapshots());
        EffectMetrics::record_started(name, self.effect.policy());

        self.in_flight.spawn(
            async move {
                let started = Instant::now();
                tracing::debug!("Effect call started");
                let outcome = call.await;
                EffectMetrics::record_finished(name, started.elapsed());
                tracing::debug!(produced = outcome.is_some(), "Effect call finished");
                (generation, outcome)
            }
            .instrument(tracing::debug_span!("effect_call", effect = name, generation)),
        );
    }

    fn complete(&mut self, joined: Result<(u64, Option<E::Action>), JoinError>) {
        match joined {
            Ok((generation, outcome)) => {
                let superseded =
                    self.effect.policy() == Policy::Switch && generation != self.generation;
                match outcome {
                    Some(_) if superseded => {
                        tracing::debug!(generation, "Discarding superseded result");
                    },
                    Some(action) => self.store.dispatch(action),
                    None => {},
                }
            },
            Err(error) if error.is_cancelled() => {},
            Err(error) => {
                tracing::error!(error = %error, "Effect call panicked");
                EffectMetrics::record_panicked(self.effect.name());
            },
        }

        if self.effect.policy() == Policy::Concat && self.in_flight.is_empty() {
            if let Some(next) = self.queue.pop_front() {
                self.start(next);
            }
        }
    }
}
