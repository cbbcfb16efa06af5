//! Reducer composition utilities
//!
//! The root state is a product of independent slices. Each feature writes a
//! reducer over its own slice and the application glues them together:
//!
//! - **`scope_reducer`**: Focus a slice reducer on one field of the root state
//! - **`combine_reducers`**: Run several reducers on the same state and action
//!
//! # Examples
//!
//! ```
//! use storefront_core::Reducer;
//! use storefront_core::composition::{combine_reducers, scope_reducer};
//!
//! #[derive(Clone, Default)]
//! struct AppState {
//!     basket: u32,
//!     messages: Vec<String>,
//! }
//!
//! #[derive(Clone)]
//! enum AppAction {
//!     AddToBasket(u32),
//!     Toast(String),
//! }
//!
//! struct BasketReducer;
//! struct MessageReducer;
//!
//! impl Reducer for BasketReducer {
//!     type State = u32;
//!     type Action = AppAction;
//!
//!     fn reduce(&self, state: &mut u32, action: &AppAction) {
//!         if let AppAction::AddToBasket(quantity) = action {
//!             *state += quantity;
//!         }
//!     }
//! }
//!
//! impl Reducer for MessageReducer {
//!     type State = Vec<String>;
//!     type Action = AppAction;
//!
//!     fn reduce(&self, state: &mut Vec<String>, action: &AppAction) {
//!         if let AppAction::Toast(message) = action {
//!             state.push(message.clone());
//!         }
//!     }
//! }
//!
//! let root = combine_reducers(vec![
//!     Box::new(scope_reducer(BasketReducer, |s: &mut AppState| &mut s.basket)),
//!     Box::new(scope_reducer(MessageReducer, |s: &mut AppState| &mut s.messages)),
//! ]);
//!
//! let mut state = AppState::default();
//! root.reduce(&mut state, &AppAction::AddToBasket(2));
//! root.reduce(&mut state, &AppAction::Toast("added".into()));
//! assert_eq!(state.basket, 2);
//! assert_eq!(state.messages, vec!["added".to_string()]);
//! ```

use crate::reducer::Reducer;

/// Boxed reducer over state `S` and action `A`
pub type BoxedReducer<S, A> = Box<dyn Reducer<State = S, Action = A>>;

/// Combines multiple reducers that operate on the same state and action types.
///
/// Reducers run in the order given. Since they normally own disjoint slices
/// the order is unobservable, but it is fixed so replays stay deterministic.
#[must_use]
pub fn combine_reducers<S, A>(reducers: Vec<BoxedReducer<S, A>>) -> CombinedReducer<S, A>
where
    S: 'static,
    A: 'static,
{
    CombinedReducer { reducers }
}

/// A combined reducer that runs multiple reducers in sequence.
///
/// Created by [`combine_reducers`].
pub struct CombinedReducer<S, A> {
    reducers: Vec<BoxedReducer<S, A>>,
}

impl<S, A> CombinedReducer<S, A> {
    /// Number of combined reducers
    #[must_use]
    pub fn len(&self) -> usize {
        self.reducers.len()
    }

    /// Whether no reducers were combined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reducers.is_empty()
    }
}

impl<S, A> Reducer for CombinedReducer<S, A> {
    type State = S;
    type Action = A;

    fn reduce(&self, state: &mut S, action: &A) {
        for reducer in &self.reducers {
            reducer.reduce(state, action);
        }
    }
}

/// Scopes a reducer to operate on a subset of a larger state.
///
/// `lens` borrows the child slice out of the parent. Unlike a get/set pair
/// it needs no clone of the child.
#[must_use]
pub fn scope_reducer<R, S>(reducer: R, lens: fn(&mut S) -> &mut R::State) -> ScopedReducer<R, S>
where
    R: Reducer,
{
    ScopedReducer { reducer, lens }
}

/// A reducer focused on one slice of a parent state.
///
/// Created by [`scope_reducer`].
pub struct ScopedReducer<R: Reducer, S> {
    reducer: R,
    lens: fn(&mut S) -> &mut R::State,
}

impl<R, S> Reducer for ScopedReducer<R, S>
where
    R: Reducer,
    S: Send + Sync,
{
    type State = S;
    type Action = R::Action;

    fn reduce(&self, state: &mut S, action: &R::Action) {
        self.reducer.reduce((self.lens)(state), action);
    }
}
