//! # Storefront Testing
//!
//! Testing utilities and helpers for the storefront state engine.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`MockApiService`]: Scripted in-memory REST capability with a call log
//! - [`ActionRecorder`]: Captures every action a store reduces
//! - Property-based testing strategies and lifecycle assertions
//!
//! ## Example
//!
//! ```ignore
//! use storefront_state::{Storefront, StorefrontConfig};
//! use storefront_testing::{ActionRecorder, MockApiService, Method};
//!
//! #[tokio::test]
//! async fn test_load_groups() {
//!     let api = MockApiService::new();
//!     api.respond(Method::Get, "customers/C1/groups", json!([]));
//!
//!     let app = Storefront::start(api.clone(), &StorefrontConfig::default()).unwrap();
//!     let recorder = ActionRecorder::start(app.store());
//!     app.organization().load_groups();
//!
//!     recorder.wait_for(|a| a.class().is_outcome(), Duration::from_secs(1)).await;
//! }
//! ```

use tracing_subscriber::EnvFilter;

/// Scripted service mocks
pub mod mocks;

/// Action capture
pub mod recorder;

/// Given-When-Then reducer harness
pub mod reducer_test;

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;
    use storefront_core::error::HttpError;

    /// HTTP status codes seen from the REST backend, including transport failures
    pub fn arb_status() -> impl Strategy<Value = u16> {
        prop_oneof![Just(0u16), 400u16..=404, Just(409u16), 500u16..=504]
    }

    /// Arbitrary [`HttpError`] values
    pub fn arb_http_error() -> impl Strategy<Value = HttpError> {
        (arb_status(), proptest::option::of("[a-zA-Z ]{1,24}")).prop_map(|(status, message)| {
            HttpError {
                status,
                message,
                headers: None,
            }
        })
    }
}

/// Helper assertions for slice state
pub mod assertions {
    use storefront_core::loading::Loadable;

    /// Assert that `loading` implies no error
    ///
    /// # Panics
    ///
    /// Panics if the slice is loading while holding an error.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_loading_invariant<S: Loadable + ?Sized>(state: &S) {
        assert!(
            !(state.loading() && state.error().is_some()),
            "slice is loading while holding error {:?}",
            state.error()
        );
    }

    /// Assert that the slice is at rest
    ///
    /// # Panics
    ///
    /// Panics if the slice is still loading.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_idle<S: Loadable + ?Sized>(state: &S) {
        assert!(!state.loading(), "slice is still loading");
    }
}

/// Install a test-friendly tracing subscriber
///
/// Honors `RUST_LOG` and defaults to `warn`. Safe to call from every test;
/// only the first call installs the subscriber.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{Method, MockApiService, RecordedCall};
pub use recorder::ActionRecorder;
pub use reducer_test::ReducerTest;
