//! Given/when/then harness for reducers

#![allow(clippy::module_name_repetitions)]

use std::fmt::Debug;
use storefront_core::reducer::Reducer;

type Check<S> = Box<dyn FnOnce(&S)>;

/// Given/when/then harness for a [`Reducer`].
///
/// Every action is reduced before the first check runs, so checks always see
/// the final state. Without [`given_state`](Self::given_state) the slice
/// starts from its `Default`.
///
/// ```ignore
/// use storefront_testing::ReducerTest;
///
/// ReducerTest::new(UserReducer)
///     .given_state(UserState::default())
///     .when_action(AccountAction::LoginUser { credentials }.into())
///     .then_state(|state| {
///         assert!(state.loading);
///         assert_eq!(state.error, None);
///     })
///     .run();
/// ```
pub struct ReducerTest<R: Reducer> {
    reducer: R,
    given: Option<R::State>,
    when: Vec<R::Action>,
    then: Vec<Check<R::State>>,
}

impl<R: Reducer> ReducerTest<R> {
    /// Harness around `reducer`
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            given: None,
            when: Vec::new(),
            then: Vec::new(),
        }
    }

    /// Starting state
    #[must_use]
    pub fn given_state(mut self, state: R::State) -> Self {
        self.given = Some(state);
        self
    }

    /// Queue one action
    #[must_use]
    pub fn when_action(mut self, action: R::Action) -> Self {
        self.when.push(action);
        self
    }

    /// Queue several actions, reduced in iteration order
    #[must_use]
    pub fn when_actions(mut self, actions: impl IntoIterator<Item = R::Action>) -> Self {
        self.when.extend(actions);
        self
    }

    /// Check the final state
    #[must_use]
    pub fn then_state<F>(mut self, check: F) -> Self
    where
        F: FnOnce(&R::State) + 'static,
    {
        self.then.push(Box::new(check));
        self
    }

    /// Check the final state equals `expected`
    #[must_use]
    pub fn then_state_eq(self, expected: R::State) -> Self
    where
        R::State: PartialEq + Debug + 'static,
    {
        self.then_state(move |state| assert_eq!(state, &expected))
    }

    /// Reduce the queued actions and run the checks.
    ///
    /// # Panics
    ///
    /// When no action was queued or a check fails.
    pub fn run(self)
    where
        R::State: Default,
    {
        assert!(!self.when.is_empty(), "ReducerTest needs at least one when_action()");

        let mut state = self.given.unwrap_or_default();
        for action in &self.when {
            self.reducer.reduce(&mut state, action);
        }
        for check in self.then {
            check(&state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq)]
    struct Quantity(u32);

    enum Step {
        Up,
        Down,
    }

    struct QuantityReducer;

    impl Reducer for QuantityReducer {
        type State = Quantity;
        type Action = Step;

        fn reduce(&self, state: &mut Quantity, action: &Step) {
            match action {
                Step::Up => state.0 += 1,
                Step::Down => state.0 = state.0.saturating_sub(1),
            }
        }
    }

    #[test]
    fn test_checks_see_final_state() {
        ReducerTest::new(QuantityReducer)
            .given_state(Quantity(1))
            .when_actions([Step::Up, Step::Up, Step::Down])
            .then_state(|state| assert_eq!(state.0, 2))
            .then_state_eq(Quantity(2))
            .run();
    }

    #[test]
    fn test_starts_from_default() {
        ReducerTest::new(QuantityReducer)
            .when_action(Step::Down)
            .then_state_eq(Quantity(0))
            .run();
    }

    #[test]
    #[should_panic(expected = "at least one when_action")]
    fn test_requires_an_action() {
        ReducerTest::new(QuantityReducer).given_state(Quantity(3)).run();
    }
}
