use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Severity of a component, ordered from best to worst
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum HealthStatus {
    /// Accepting and reducing actions
    #[default]
    Healthy,

    /// Running, but some effect loop has stopped
    Degraded,

    /// Shut down
    Unhealthy,
}

impl HealthStatus {
    /// Whether nothing is wrong
    #[must_use]
    pub const fn is_healthy(self) -> bool {
        matches!(self, Self::Healthy)
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Healthy => "healthy",
            Self::Degraded => "degraded",
            Self::Unhealthy => "unhealthy",
        })
    }
}

/// Point-in-time view of the store or the effect runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheck {
    /// `"store"` or `"effects"`
    pub component: &'static str,

    /// Current status
    pub status: HealthStatus,

    /// Set when the status is not healthy
    pub reason: Option<String>,

    /// Counters sampled during the check
    pub gauges: BTreeMap<&'static str, u64>,
}

impl HealthCheck {
    /// A healthy check with no gauges
    #[must_use]
    pub const fn new(component: &'static str) -> Self {
        Self {
            component,
            status: HealthStatus::Healthy,
            reason: None,
            gauges: BTreeMap::new(),
        }
    }

    /// Lower the status to `status` unless it is already worse
    #[must_use]
    pub fn with_status(mut self, status: HealthStatus, reason: impl Into<String>) -> Self {
        if status > self.status {
            self.status = status;
            self.reason = Some(reason.into());
        }
        self
    }

    /// Record a gauge
    #[must_use]
    pub fn with_gauge(mut self, name: &'static str, value: impl TryInto<u64>) -> Self {
        self.gauges.insert(name, value.try_into().unwrap_or(u64::MAX));
        self
    }

    /// A recorded gauge
    #[must_use]
    pub fn gauge(&self, name: &str) -> Option<u64> {
        self.gauges.get(name).copied()
    }
}

/// Health of a whole storefront
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Worst status of all checks
    pub status: HealthStatus,

    /// Component checks
    pub checks: Vec<HealthCheck>,

    /// When the checks were taken
    pub checked_at: DateTime<Utc>,
}

impl HealthReport {
    /// Aggregate component checks
    #[must_use]
    pub fn new(checks: Vec<HealthCheck>) -> Self {
        let status = checks.iter().map(|check| check.status).max().unwrap_or_default();
        Self {
            status,
            checks,
            checked_at: Utc::now(),
        }
    }

    /// Whether every component is healthy
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.status.is_healthy()
    }
}
