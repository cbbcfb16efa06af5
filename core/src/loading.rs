//! Uniform request lifecycle shared by every slice that talks to the API.
//!
//! ```text
//! Idle ──Intent──▶ Loading ──Success──▶ Idle (error cleared)
//!                     └─────Failure──▶ Idle (error set, data kept)
//! ```
//!
//! An Intent received while already loading restarts the cycle. Outcomes
//! received while idle are still applied.

use crate::action::{Action, ActionClass};
use crate::error::HttpError;

/// A slice with a loading flag and a last error
pub trait Loadable {
    /// Whether a request is in flight
    fn loading(&self) -> bool;

    /// Error of the last failed request
    fn error(&self) -> Option<&HttpError>;

    /// Set the loading flag
    fn set_loading(&mut self, loading: bool);

    /// Replace the stored error
    fn set_error(&mut self, error: Option<HttpError>);
}

/// Implement [`Loadable`] for a struct with `loading: bool` and
/// `error: Option<HttpError>` fields.
///
/// # Example
///
/// ```
/// use storefront_core::{impl_loadable, HttpError};
///
/// #[derive(Default)]
/// struct BasketState {
///     loading: bool,
///     error: Option<HttpError>,
/// }
///
/// impl_loadable!(BasketState);
/// ```
#[macro_export]
macro_rules! impl_loadable {
    ($state:ty) => {
        impl $crate::loading::Loadable for $state {
            fn loading(&self) -> bool {
                self.loading
            }

            fn error(&self) -> ::std::option::Option<&$crate::error::HttpError> {
                self.error.as_ref()
            }

            fn set_loading(&mut self, loading: bool) {
                self.loading = loading;
            }

            fn set_error(&mut self, error: ::std::option::Option<$crate::error::HttpError>) {
                self.error = error;
            }
        }
    };
}

/// Apply the lifecycle transition implied by the action's class
pub fn track_request<S, A>(state: &mut S, action: &A)
where
    S: Loadable + ?Sized,
    A: Action,
{
    match action.class() {
        ActionClass::Intent => {
            state.set_loading(true);
            state.set_error(None);
        },
        ActionClass::Success => {
            state.set_loading(false);
            state.set_error(None);
        },
        ActionClass::Failure => {
            state.set_loading(false);
            state.set_error(action.error().cloned());
        },
        ActionClass::Event => {},
    }
}

/// Clear a stale error without touching the loading flag or data
pub fn reset_error<S: Loadable + ?Sized>(state: &mut S) {
    state.set_error(None);
}
