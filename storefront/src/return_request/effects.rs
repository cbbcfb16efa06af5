//! Return request effects.
//!
//! | effect                             | policy |
//! |------------------------------------|--------|
//! | `return_request.load_reasons`      | switch |
//! | `return_request.load_returnable`   | switch |
//! | `return_request.load_requests`     | concat |
//! | `return_request.create`            | concat |
//! | `return_request.created_message`   | merge  |
//! | `return_request.failed_message`    | merge  |

use super::ReturnRequestAction;
use crate::api::session_options;
use crate::app::{AppAction, AppRuntime, AppState};
use crate::messages::MessageAction;
use crate::models::{ReturnRequest, ReturnablePosition, SelectOption};
use futures::future::try_join_all;
use storefront_core::prelude::*;
use storefront_runtime::StoreError;

/// Confirmation shown after a return request was filed
pub const CREATED_MESSAGE: &str = "Your return request has been submitted.";

/// Register the return request effects
///
/// # Errors
///
/// Returns [`StoreError::ShutdownInProgress`] once the store is shut down.
pub fn register_effects<Api: ApiService>(runtime: &AppRuntime, api: &Api) -> Result<(), StoreError> {
    runtime.register(load_reasons(api.clone()))?;
    runtime.register(load_returnable_items(api.clone()))?;
    runtime.register(load_return_requests(api.clone()))?;
    runtime.register(create_return_request(api.clone()))?;
    runtime.register(created_message())?;
    runtime.register(failed_message())
}

fn order_path(order_id: &str, resource: &str) -> String {
    format!("orders/{}/{resource}", encode_resource_id(order_id))
}

fn load_reasons<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "return_request.load_reasons",
        Policy::Switch,
        |action: &AppAction| matches!(action, AppAction::ReturnRequest(ReturnRequestAction::LoadOrderReturnReasons)),
        move |_action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let outcome: ReturnRequestAction = api_call! {
                    call: api.get::<Vec<SelectOption>>("returnrequests/reasons", session_options(&state.current())),
                    on_success: |reasons| ReturnRequestAction::LoadOrderReturnReasonsSuccess { reasons },
                    on_error: |error| ReturnRequestAction::LoadOrderReturnReasonsFail { error }
                };
                Some(AppAction::ReturnRequest(outcome))
            }
        },
    )
}

fn load_returnable_items<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "return_request.load_returnable",
        Policy::Switch,
        |action: &AppAction| {
            matches!(
                action,
                AppAction::ReturnRequest(ReturnRequestAction::LoadOrderReturnableItems { .. })
            )
        },
        move |action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::ReturnRequest(ReturnRequestAction::LoadOrderReturnableItems { order_id }) = action else {
                    return None;
                };
                let path = order_path(&order_id, "returnableitems");
                let outcome: ReturnRequestAction = api_call! {
                    call: api.get::<Vec<ReturnablePosition>>(&path, session_options(&state.current())),
                    on_success: |items| ReturnRequestAction::LoadOrderReturnableItemsSuccess { items },
                    on_error: |error| ReturnRequestAction::LoadOrderReturnableItemsFail { error }
                };
                Some(AppAction::ReturnRequest(outcome))
            }
        },
    )
}

async fn requests_of_order<Api: ApiService>(
    api: &Api,
    order_id: String,
    options: RequestOptions,
) -> Result<Vec<ReturnRequest>, HttpError> {
    let requests: Vec<ReturnRequest> = api.get(&order_path(&order_id, "returnrequests"), options).await?;
    Ok(requests
        .into_iter()
        .map(|request| ReturnRequest {
            order_id: order_id.clone(),
            ..request
        })
        .collect())
}

fn load_return_requests<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "return_request.load_requests",
        Policy::Concat,
        |action: &AppAction| {
            matches!(
                action,
                AppAction::ReturnRequest(ReturnRequestAction::LoadOrderReturnRequests { .. })
            )
        },
        move |action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::ReturnRequest(ReturnRequestAction::LoadOrderReturnRequests { order_ids }) = action else {
                    return None;
                };
                let options = session_options(&state.current());
                let result: Result<Vec<ReturnRequest>, HttpError> = try_join_all(
                    order_ids
                        .into_iter()
                        .map(|order_id| requests_of_order(&api, order_id, options.clone())),
                )
                .await
                .map(|per_order| per_order.into_iter().flatten().collect());
                Some(AppAction::ReturnRequest(result.into_action(
                    |return_requests| ReturnRequestAction::LoadOrderReturnRequestsSuccess { return_requests },
                    |error| ReturnRequestAction::LoadOrderReturnRequestsFail { error },
                )))
            }
        },
    )
}

fn create_return_request<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "return_request.create",
        Policy::Concat,
        |action: &AppAction| matches!(action, AppAction::ReturnRequest(ReturnRequestAction::CreateReturnRequest { .. })),
        move |action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::ReturnRequest(ReturnRequestAction::CreateReturnRequest { order_id, body }) = action else {
                    return None;
                };
                let path = order_path(&order_id, "returnrequests");
                let result: Result<ReturnRequest, HttpError> =
                    api.post(&path, &body, session_options(&state.current())).await;
                Some(AppAction::ReturnRequest(result.into_action(
                    |request| ReturnRequestAction::CreateReturnRequestSuccess {
                        return_request: ReturnRequest { order_id, ..request },
                    },
                    |error| ReturnRequestAction::CreateReturnRequestFail { error },
                )))
            }
        },
    )
}

fn created_message() -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "return_request.created_message",
        Policy::Merge,
        |action: &AppAction| {
            matches!(
                action,
                AppAction::ReturnRequest(ReturnRequestAction::CreateReturnRequestSuccess { .. })
            )
        },
        |_action: AppAction, _state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            async_effect! {
                Some(AppAction::Message(MessageAction::DisplaySuccessMessage {
                    message: CREATED_MESSAGE.to_string(),
                }))
            }
        },
    )
}

fn failed_message() -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "return_request.failed_message",
        Policy::Merge,
        |action: &AppAction| {
            matches!(
                action,
                AppAction::ReturnRequest(ReturnRequestAction::CreateReturnRequestFail { .. })
            )
        },
        |action: AppAction, _state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            async_effect! {
                let AppAction::ReturnRequest(ReturnRequestAction::CreateReturnRequestFail { error }) = action else {
                    return None;
                };
                let message = error.message.clone().unwrap_or_else(|| error.to_string());
                Some(AppAction::Message(MessageAction::DisplayErrorMessage { message }))
            }
        },
    )
}
