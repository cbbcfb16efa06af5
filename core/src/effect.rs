//! Effects: standing async subscriptions over the action stream.
//!
//! An effect filters the action stream for the intents it handles, performs
//! one asynchronous call per accepted action and maps the result to at most
//! one follow-up action. Effects never touch state directly; they read
//! snapshots and talk back to the store by returning actions.
//!
//! How overlapping calls of the same effect interact is declared through
//! [`Policy`] and enforced by the runtime.

use crate::action::Action;
use crate::selector::StateSnapshots;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Boxed future produced by one effect invocation.
///
/// Resolves to the follow-up action, or `None` when the effect has nothing
/// to report.
pub type EffectFuture<A> = Pin<Box<dyn Future<Output = Option<A>> + Send>>;

/// Concurrency discipline of an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// A new intent cancels the in-flight call; only the latest result is
    /// dispatched
    Switch,

    /// Intents are queued and run one at a time in arrival order; each
    /// outcome is dispatched before the next call starts
    Concat,

    /// All intents run concurrently and complete in any order
    Merge,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Switch => "switch",
            Self::Concat => "concat",
            Self::Merge => "merge",
        };
        f.write_str(name)
    }
}

/// A standing asynchronous subscription bridging actions to external calls.
///
/// # Example
///
/// ```ignore
/// impl<Api: ApiService> Effect for LoadGroups<Api> {
///     type State = AppState;
///     type Action = AppAction;
///
///     fn name(&self) -> &'static str { "organization.load_groups" }
///     fn policy(&self) -> Policy { Policy::Switch }
///
///     fn accepts(&self, action: &AppAction) -> bool {
///         matches!(action, AppAction::Organization(OrganizationAction::LoadGroups))
///     }
///
///     fn run(&self, _action: AppAction, state: StateSnapshots<AppState>) -> EffectFuture<AppAction> {
///         let api = self.api.clone();
///         async_effect! { ... }
///     }
/// }
/// ```
pub trait Effect: Send + Sync + 'static {
    /// Root state the effect may read
    type State: Send + Sync + 'static;

    /// Action type observed and produced
    type Action: Action;

    /// Stable name used in logs and metrics
    fn name(&self) -> &'static str;

    /// Declared concurrency discipline
    fn policy(&self) -> Policy;

    /// Whether this effect handles `action`
    fn accepts(&self, action: &Self::Action) -> bool;

    /// Start one invocation for an accepted action
    fn run(&self, action: Self::Action, state: StateSnapshots<Self::State>) -> EffectFuture<Self::Action>;
}

/// Effect assembled from a filter and a handler closure.
///
/// Convenient for effects that need no service, such as turning one action
/// into another.
pub struct FnEffect<S, A, F, H> {
    name: &'static str,
    policy: Policy,
    filter: F,
    handler: H,
    _marker: std::marker::PhantomData<fn(S, A)>,
}

/// Build an effect from a filter and a handler
///
/// # Example
///
/// ```ignore
/// let notify = effect_fn(
///     "return_request.created_message",
///     Policy::Merge,
///     |action: &AppAction| matches!(action, AppAction::ReturnRequest(ReturnRequestAction::CreateReturnRequestSuccess { .. })),
///     |_action, _state| async_effect! {
///         Some(MessageAction::DisplaySuccessMessage { message: "Return request created".into() }.into())
///     },
/// );
/// ```
pub fn effect_fn<S, A, F, H>(name: &'static str, policy: Policy, filter: F, handler: H) -> FnEffect<S, A, F, H>
where
    S: Send + Sync + 'static,
    A: Action,
    F: Fn(&A) -> bool + Send + Sync + 'static,
    H: Fn(A, StateSnapshots<S>) -> EffectFuture<A> + Send + Sync + 'static,
{
    FnEffect {
        name,
        policy,
        filter,
        handler,
        _marker: std::marker::PhantomData,
    }
}

impl<S, A, F, H> Effect for FnEffect<S, A, F, H>
where
    S: Send + Sync + 'static,
    A: Action,
    F: Fn(&A) -> bool + Send + Sync + 'static,
    H: Fn(A, StateSnapshots<S>) -> EffectFuture<A> + Send + Sync + 'static,
{
    type State = S;
    type Action = A;

    fn name(&self) -> &'static str {
        self.name
    }

    fn policy(&self) -> Policy {
        self.policy
    }

    fn accepts(&self, action: &A) -> bool {
        (self.filter)(action)
    }

    fn run(&self, action: A, state: StateSnapshots<S>) -> EffectFuture<A> {
        (self.handler)(action, state)
    }
}
