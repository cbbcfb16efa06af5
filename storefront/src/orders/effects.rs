use super::OrderAction;
use crate::api::session_options;
use crate::app::{AppAction, AppRuntime, AppState};
use crate::models::Order;
use crate::return_request::ReturnRequestAction;
use storefront_core::prelude::*;
use storefront_runtime::StoreError;

/// Register the order effects
///
/// # Errors
///
/// Returns [`StoreError::ShutdownInProgress`] once the store is shut down.
pub fn register_effects<Api: ApiService>(runtime: &AppRuntime, api: &Api) -> Result<(), StoreError> {
    runtime.register(load_orders(api.clone()))?;
    runtime.register(load_return_requests_of_orders())
}

fn load_orders<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "orders.load",
        Policy::Switch,
        |action: &AppAction| matches!(action, AppAction::Order(OrderAction::LoadOrders)),
        move |_action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let outcome: OrderAction = api_call! {
                    call: api.get::<Vec<Order>>("orders", session_options(&state.current())),
                    on_success: |orders| OrderAction::LoadOrdersSuccess { orders },
                    on_error: |error| OrderAction::LoadOrdersFail { error }
                };
                Some(AppAction::Order(outcome))
            }
        },
    )
}

// Loaded orders pull in their return requests
fn load_return_requests_of_orders() -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "orders.load_return_requests",
        Policy::Merge,
        |action: &AppAction| matches!(action, AppAction::Order(OrderAction::LoadOrdersSuccess { .. })),
        |action: AppAction, _state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            async_effect! {
                let AppAction::Order(OrderAction::LoadOrdersSuccess { orders }) = action else {
                    return None;
                };
                if orders.is_empty() {
                    return None;
                }
                let order_ids = orders.into_iter().map(|order| order.id).collect();
                Some(AppAction::ReturnRequest(ReturnRequestAction::LoadOrderReturnRequests { order_ids }))
            }
        },
    )
}
