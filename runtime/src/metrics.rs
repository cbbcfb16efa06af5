//! Store and effect metrics.
//!
//! Counters and histograms are emitted through the `metrics` facade and are
//! no-ops until a recorder is installed. [`PrometheusMetrics::install`]
//! installs the Prometheus recorder and renders the scrape text:
//!
//! ```rust,no_run
//! use storefront_runtime::metrics::PrometheusMetrics;
//!
//! # fn example() -> Result<(), storefront_runtime::metrics::MetricsError> {
//! let metrics = PrometheusMetrics::install()?;
//! println!("{}", metrics.render());
//! # Ok(())
//! # }
//! ```

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use storefront_core::effect::Policy;
use thiserror::Error;

const REDUCER_BUCKETS: &[f64] = &[0.000_005, 0.000_02, 0.000_1, 0.000_5, 0.001, 0.005, 0.01];
const CALL_BUCKETS: &[f64] = &[0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

/// Metrics setup failures
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Invalid bucket configuration
    #[error("Invalid metrics configuration: {0}")]
    Build(String),

    /// Another global recorder is already installed
    #[error("Metrics recorder already installed: {0}")]
    AlreadyInstalled(String),
}

impl From<BuildError> for MetricsError {
    fn from(error: BuildError) -> Self {
        match error {
            BuildError::FailedToSetGlobalRecorder(inner) => Self::AlreadyInstalled(inner.to_string()),
            other => Self::Build(other.to_string()),
        }
    }
}

/// Handle to the installed Prometheus recorder
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: PrometheusHandle,
}

impl PrometheusMetrics {
    /// Describe every store and effect metric and install the process-wide
    /// Prometheus recorder.
    ///
    /// # Errors
    ///
    /// [`MetricsError::AlreadyInstalled`] when another recorder owns the
    /// process, [`MetricsError::Build`] for invalid buckets.
    pub fn install() -> Result<Self, MetricsError> {
        let handle = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full("store_reducer_duration_seconds".to_string()),
                REDUCER_BUCKETS,
            )?
            .set_buckets_for_metric(Matcher::Full("effect_call_duration_seconds".to_string()), CALL_BUCKETS)?
            .install_recorder()?;

        describe();
        tracing::info!("Prometheus metrics recorder installed");
        Ok(Self { handle })
    }

    /// Scrape text in the Prometheus exposition format
    #[must_use]
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

fn describe() {
    describe_counter!("store_actions_total", "Actions reduced, by action type");
    describe_histogram!("store_reducer_duration_seconds", "Time spent reducing one action");
    describe_counter!("store_actions_rejected_total", "Actions dropped after shutdown");
    describe_counter!("effects_started_total", "Effect calls started, by effect and policy");
    describe_histogram!("effect_call_duration_seconds", "Effect call duration, by effect");
    describe_counter!("effects_cancelled_total", "Effect calls superseded under the switch policy");
    describe_counter!("effects_panicked_total", "Effect calls that panicked");
}

pub(crate) struct StoreMetrics;

impl StoreMetrics {
    pub(crate) fn record_dispatch(action_type: &'static str, duration: Duration) {
        counter!("store_actions_total", "action" => action_type).increment(1);
        histogram!("store_reducer_duration_seconds").record(duration.as_secs_f64());
    }

    pub(crate) fn record_rejected() {
        counter!("store_actions_rejected_total").increment(1);
    }
}

pub(crate) struct EffectMetrics;

impl EffectMetrics {
    pub(crate) fn record_started(effect: &'static str, policy: Policy) {
        counter!("effects_started_total", "effect" => effect, "policy" => policy.to_string()).increment(1);
    }

    pub(crate) fn record_finished(effect: &'static str, duration: Duration) {
        histogram!("effect_call_duration_seconds", "effect" => effect).record(duration.as_secs_f64());
    }

    pub(crate) fn record_cancelled(effect: &'static str) {
        counter!("effects_cancelled_total", "effect" => effect).increment(1);
    }

    pub(crate) fn record_panicked(effect: &'static str) {
        counter!("effects_panicked_total", "effect" => effect).increment(1);
    }
}
