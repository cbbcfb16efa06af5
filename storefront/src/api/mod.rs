//! REST plumbing shared by the feature effects.
//!
//! Effects are generic over [`ApiService`](storefront_core::ApiService);
//! [`RestApiService`] is the reqwest-backed implementation used in
//! production.

mod rest;

pub use rest::RestApiService;

use crate::app::AppState;
use storefront_core::error::HttpError;
use storefront_core::service::RequestOptions;

/// Header carrying the session token
pub const AUTHENTICATION_TOKEN: &str = "authentication-token";

/// Options for a request made on behalf of the current session.
///
/// Carries the session token when one is known.
#[must_use]
pub fn session_options(state: &AppState) -> RequestOptions {
    match &state.user.api_token {
        Some(token) => RequestOptions::new().with_header(AUTHENTICATION_TOKEN, token.clone()),
        None => RequestOptions::new(),
    }
}

/// Error for a call that cannot be made because session data is missing.
///
/// Like a transport failure no response exists, so the status is `0`.
#[must_use]
pub fn unavailable(what: &str) -> HttpError {
    HttpError::transport(format!("{what} not available"))
}
