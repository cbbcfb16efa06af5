//! The Reducer trait - pure state transitions.
//!
//! Reducers are pure functions: `(State, Action) → State`.
//!
//! They must never perform I/O, never read mutable external state and never
//! panic. Given the same inputs they always produce the same output, which
//! makes replaying an action log deterministic.

/// The Reducer trait - core abstraction for state transitions
///
/// # Type Parameters
///
/// - `State`: The slice (or whole tree) this reducer operates on
/// - `Action`: The action type this reducer processes
///
/// # Example
///
/// ```ignore
/// impl Reducer for WishlistReducer {
///     type State = WishlistState;
///     type Action = AppAction;
///
///     fn reduce(&self, state: &mut WishlistState, action: &AppAction) {
///         match action {
///             AppAction::Wishlist(WishlistAction::SelectWishlist { id }) => {
///                 state.selected = Some(id.clone());
///             }
///             // Unrecognized actions leave the state untouched
///             _ => {}
///         }
///     }
/// }
/// ```
pub trait Reducer: Send + Sync {
    /// The state type this reducer operates on
    type State;

    /// The action type this reducer processes
    type Action;

    /// Apply `action` to `state` in place.
    ///
    /// The store hands every reducer a private copy of the previous
    /// snapshot, so mutating in place still yields a new immutable value
    /// for readers.
    fn reduce(&self, state: &mut Self::State, action: &Self::Action);
}

/// Reduce a sequence of actions in order and return the final state
pub fn reduce_all<'a, R>(
    reducer: &R,
    mut state: R::State,
    actions: impl IntoIterator<Item = &'a R::Action>,
) -> R::State
where
    R: Reducer + ?Sized,
    R::Action: 'a,
{
    for action in actions {
        reducer.reduce(&mut state, action);
    }
    state
}
