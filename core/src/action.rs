//! Actions are the only way to request a state change.
//!
//! Every feature defines a closed enum of actions. Each variant has a stable,
//! namespaced type string (`"[Account] Login User"`) and a class telling the
//! uniform loading lifecycle how to treat it. Enums normally get both through
//! `#[derive(Action)]` from `storefront-macros`.

use crate::error::HttpError;
use std::fmt::Debug;

/// Role an action plays in the request lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionClass {
    /// Requests an asynchronous operation; the slice enters loading
    Intent,

    /// An asynchronous operation resolved
    Success,

    /// An asynchronous operation failed; carries an [`HttpError`]
    Failure,

    /// Synchronous state change (selection, reset, logout)
    Event,
}

impl ActionClass {
    /// Whether this class resolves a pending request
    #[must_use]
    pub const fn is_outcome(self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }
}

/// An immutable tagged value describing an intent or an outcome.
///
/// Actions should be:
/// - Clone: they are broadcast to every effect and may be recorded
/// - Debug: for logging
/// - Send + Sync + 'static: effects run on other tasks
pub trait Action: Clone + Debug + Send + Sync + 'static {
    /// Stable type string, unique across all features
    fn action_type(&self) -> &'static str;

    /// Lifecycle class of this action
    fn class(&self) -> ActionClass;

    /// Error carried by Failure actions
    fn error(&self) -> Option<&HttpError> {
        None
    }
}

/// Maps a service result to exactly one outcome action.
///
/// # Example
///
/// ```ignore
/// api.get::<User>("customers/-/users/-", options)
///     .await
///     .into_action(
///         |user| UserAction::LoadCompanyUserSuccess { user },
///         |error| UserAction::LoadCompanyUserFail { error },
///     )
/// ```
pub trait ResultExt<T> {
    /// Convert into a Success or Failure action
    fn into_action<A>(
        self,
        on_success: impl FnOnce(T) -> A,
        on_failure: impl FnOnce(HttpError) -> A,
    ) -> A;
}

impl<T> ResultExt<T> for Result<T, HttpError> {
    fn into_action<A>(
        self,
        on_success: impl FnOnce(T) -> A,
        on_failure: impl FnOnce(HttpError) -> A,
    ) -> A {
        match self {
            Ok(value) => on_success(value),
            Err(error) => on_failure(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum PingAction {
        Pong(u32),
        PingFailed(HttpError),
    }

    #[test]
    fn test_into_action_success() {
        let result: Result<u32, HttpError> = Ok(7);
        let action = result.into_action(PingAction::Pong, PingAction::PingFailed);
        assert_eq!(action, PingAction::Pong(7));
    }

    #[test]
    fn test_into_action_failure() {
        let result: Result<u32, HttpError> = Err(HttpError::new(503));
        let action = result.into_action(PingAction::Pong, PingAction::PingFailed);
        assert_eq!(action, PingAction::PingFailed(HttpError::new(503)));
    }

    #[test]
    fn test_outcome_classes() {
        assert!(ActionClass::Success.is_outcome());
        assert!(ActionClass::Failure.is_outcome());
        assert!(!ActionClass::Intent.is_outcome());
        assert!(!ActionClass::Event.is_outcome());
    }
}
