//! # Storefront Core
//!
//! Core traits and types for the storefront state engine.
//!
//! This crate provides the fundamental abstractions for a unidirectional,
//! action-driven store that reconciles client state with a REST backend.
//!
//! ## Core Concepts
//!
//! - **Action**: Tagged value describing an intent or an outcome
//! - **State**: Immutable snapshot made of independently reduced slices
//! - **Reducer**: Pure function `(State, Action) → State`
//! - **Effect**: Standing async subscription turning intents into outcomes
//! - **Service**: The REST capability effects call into
//!
//! ## Architecture Principles
//!
//! - Unidirectional Data Flow
//! - Errors are data (`HttpError` inside Failure actions)
//! - Explicit concurrency policy per effect
//! - Dependency Injection via explicit handles
//!
//! ## Example
//!
//! ```ignore
//! use storefront_core::prelude::*;
//!
//! #[derive(Clone, Debug, Default, PartialEq)]
//! struct CartState {
//!     items: EntityState<LineItem>,
//!     loading: bool,
//!     error: Option<HttpError>,
//! }
//!
//! impl Reducer for CartReducer {
//!     type State = CartState;
//!     type Action = CartAction;
//!
//!     fn reduce(&self, state: &mut CartState, action: &CartAction) {
//!         track_request(state, action);
//!         if let CartAction::LoadCartSuccess { items } = action {
//!             ADAPTER.set_all(items.clone(), &mut state.items);
//!         }
//!     }
//! }
//! ```

/// Action trait, action classes and outcome helpers
pub mod action;

/// Reducer composition utilities
pub mod composition;

/// Effect trait and concurrency policies
pub mod effect;

/// Effect construction macros
pub mod effect_macros;

/// Normalized entity collections
pub mod entity;

/// Error taxonomy
pub mod error;

/// Uniform loading/error lifecycle for slices
pub mod loading;

/// Reducer trait
pub mod reducer;

/// State snapshots and derived selections
pub mod selector;

/// REST service capability contract
pub mod service;

pub use action::{Action, ActionClass, ResultExt};
pub use effect::{Effect, EffectFuture, FnEffect, Policy, effect_fn};
pub use entity::{Entity, EntityAdapter, EntityState, Patch};
pub use error::{HttpError, ValidationError};
pub use loading::{Loadable, reset_error, track_request};
pub use reducer::{Reducer, reduce_all};
pub use selector::{Selection, StateSnapshots};
pub use service::{ApiService, Envelope, RequestOptions, encode_resource_id};

/// Commonly used items for feature modules
pub mod prelude {
    pub use crate::action::{Action, ActionClass, ResultExt};
    pub use crate::composition::{combine_reducers, scope_reducer};
    pub use crate::effect::{Effect, EffectFuture, Policy, effect_fn};
    pub use crate::entity::{Entity, EntityAdapter, EntityState, Patch};
    pub use crate::error::{HttpError, ValidationError};
    pub use crate::loading::{Loadable, reset_error, track_request};
    pub use crate::reducer::Reducer;
    pub use crate::selector::{Selection, StateSnapshots};
    pub use crate::service::{ApiService, Envelope, RequestOptions, encode_resource_id};
    pub use crate::{api_call, async_effect, impl_loadable};
}
