//! Error types for the storefront state engine.
//!
//! Two kinds of errors leave this crate:
//!
//! - [`HttpError`]: a transport or domain failure reported by the service
//!   capability. It is plain data and only ever travels inside Failure
//!   actions and slice state.
//! - [`ValidationError`]: a caller passed a missing or invalid argument to a
//!   facade command. It is returned synchronously and never reaches the store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Normalized error record produced when a service call fails.
///
/// A `status` of `0` denotes a transport-level failure where no HTTP
/// response was received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
pub struct HttpError {
    /// HTTP status code (0 when the request never produced a response)
    pub status: u16,

    /// Human readable message, usually the response body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Response headers relevant to the error (e.g. `error-key`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
}

impl HttpError {
    /// Create an error with the given status and no message
    #[must_use]
    pub const fn new(status: u16) -> Self {
        Self {
            status,
            message: None,
            headers: None,
        }
    }

    /// Create a transport-level error (no response received)
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(0).with_message(message)
    }

    /// Attach a message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach a header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Look up a header by name
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|headers| headers.get(name))
            .map(String::as_str)
    }

    /// Whether the request failed before a response was received
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        self.status == 0
    }
}

/// Invalid or missing argument passed to a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required argument was missing or empty
    #[error("{operation}() called without {argument}")]
    MissingArgument {
        /// Command that rejected the call
        operation: &'static str,
        /// Name of the missing argument
        argument: &'static str,
    },

    /// An argument was present but unusable
    #[error("{operation}() called with invalid {argument}: {reason}")]
    InvalidArgument {
        /// Command that rejected the call
        operation: &'static str,
        /// Name of the invalid argument
        argument: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::MissingArgument`]
    #[must_use]
    pub const fn missing(operation: &'static str, argument: &'static str) -> Self {
        Self::MissingArgument {
            operation,
            argument,
        }
    }

    /// Reject `value` when it is empty or only whitespace
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingArgument`] for blank values.
    pub fn require(
        operation: &'static str,
        argument: &'static str,
        value: &str,
    ) -> Result<(), Self> {
        if value.trim().is_empty() {
            Err(Self::missing(operation, argument))
        } else {
            Ok(())
        }
    }
}
