//! Declarative macros for ergonomic effect construction

/// Box an async block into an [`EffectFuture`](crate::effect::EffectFuture)
///
/// The block must evaluate to `Option<Action>`. The result coerces to
/// `EffectFuture` wherever that type is expected.
///
/// # Example
///
/// ```rust,ignore
/// use storefront_core::async_effect;
///
/// async_effect! {
///     let groups = api.get(&path, RequestOptions::new()).await;
///     Some(groups.into_action(
///         |groups| OrganizationAction::LoadGroupsSuccess { groups }.into(),
///         |error| OrganizationAction::LoadGroupsFail { error }.into(),
///     ))
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        ::std::boxed::Box::pin(async move { $($body)* })
    };
}

/// Await a service call and map it to a Success or Failure action
///
/// # Example
///
/// ```rust,ignore
/// use storefront_core::api_call;
///
/// api_call! {
///     call: api.get::<Vec<Group>>(&path, RequestOptions::new()),
///     on_success: |groups| OrganizationAction::LoadGroupsSuccess { groups },
///     on_error: |error| OrganizationAction::LoadGroupsFail { error }
/// }
/// ```
#[macro_export]
macro_rules! api_call {
    (
        call: $call:expr,
        on_success: |$success_param:pat_param| $success_body:expr,
        on_error: |$error_param:pat_param| $error_body:expr
    ) => {
        match $call.await {
            ::std::result::Result::Ok($success_param) => ::std::convert::Into::into($success_body),
            ::std::result::Result::Err($error_param) => ::std::convert::Into::into($error_body),
        }
    };
}
