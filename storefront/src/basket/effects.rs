//! Basket effects.
//!
//! Loading switches to the latest request. Adding and updating items are
//! serialized so quantities reach the backend in the order they were
//! requested; deletions of different items may overlap.

use super::{BasketAction, selectors};
use crate::api::{session_options, unavailable};
use crate::app::{AppAction, AppRuntime, AppState};
use crate::models::{Basket, LineItem, Quantity};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use storefront_core::prelude::*;
use storefront_runtime::StoreError;

/// Register the basket effects
///
/// # Errors
///
/// Returns [`StoreError::ShutdownInProgress`] once the store is shut down.
pub fn register_effects<Api: ApiService>(runtime: &AppRuntime, api: &Api) -> Result<(), StoreError> {
    runtime.register(load_basket(api.clone()))?;
    runtime.register(add_product(api.clone()))?;
    runtime.register(update_item(api.clone()))?;
    runtime.register(delete_item(api.clone()))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BasketData {
    #[serde(flatten)]
    basket: Basket,
    #[serde(default)]
    line_items: Vec<LineItem>,
}

#[derive(Serialize)]
struct NewLineItem<'a> {
    product: &'a str,
    quantity: Quantity,
}

#[derive(Serialize)]
struct QuantityChange {
    quantity: Quantity,
}

fn item_path(basket_id: &str, item_id: &str) -> String {
    format!(
        "baskets/{}/items/{}",
        encode_resource_id(basket_id),
        encode_resource_id(item_id)
    )
}

fn load_basket<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "basket.load",
        Policy::Switch,
        |action: &AppAction| matches!(action, AppAction::Basket(BasketAction::LoadBasket)),
        move |_action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let options = session_options(&state.current());
                let outcome: BasketAction = api_call! {
                    call: api.get::<BasketData>("baskets/current", options),
                    on_success: |data| BasketAction::LoadBasketSuccess {
                        basket: data.basket,
                        line_items: data.line_items,
                    },
                    on_error: |error| BasketAction::LoadBasketFail { error }
                };
                Some(AppAction::Basket(outcome))
            }
        },
    )
}

fn add_product<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "basket.add_product",
        Policy::Concat,
        |action: &AppAction| matches!(action, AppAction::Basket(BasketAction::AddProductToBasket { .. })),
        move |action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::Basket(BasketAction::AddProductToBasket { sku, quantity }) = action else {
                    return None;
                };
                let snapshot = state.current();
                let result: Result<LineItem, HttpError> = match selectors::basket_id(&snapshot) {
                    Some(basket_id) => {
                        let path = format!("baskets/{}/items", encode_resource_id(basket_id));
                        let body = NewLineItem {
                            product: &sku,
                            quantity: Quantity::new(quantity),
                        };
                        api.post(&path, &body, session_options(&snapshot)).await
                    },
                    None => Err(unavailable("basket")),
                };
                Some(AppAction::Basket(result.into_action(
                    |line_item| BasketAction::AddProductToBasketSuccess { line_item },
                    |error| BasketAction::AddProductToBasketFail { error },
                )))
            }
        },
    )
}

fn update_item<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "basket.update_item",
        Policy::Concat,
        |action: &AppAction| matches!(action, AppAction::Basket(BasketAction::UpdateBasketItem { .. })),
        move |action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::Basket(BasketAction::UpdateBasketItem { item_id, quantity }) = action else {
                    return None;
                };
                let snapshot = state.current();
                let result: Result<Value, HttpError> = match selectors::basket_id(&snapshot) {
                    Some(basket_id) => {
                        let body = QuantityChange {
                            quantity: Quantity::new(quantity),
                        };
                        api.patch(&item_path(basket_id, &item_id), &body, session_options(&snapshot)).await
                    },
                    None => Err(unavailable("basket")),
                };
                let outcome = match result {
                    Ok(_) => BasketAction::UpdateBasketItemSuccess { item_id, quantity },
                    Err(error) => BasketAction::UpdateBasketItemFail { error },
                };
                Some(AppAction::Basket(outcome))
            }
        },
    )
}

fn delete_item<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "basket.delete_item",
        Policy::Merge,
        |action: &AppAction| matches!(action, AppAction::Basket(BasketAction::DeleteBasketItem { .. })),
        move |action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::Basket(BasketAction::DeleteBasketItem { item_id }) = action else {
                    return None;
                };
                let snapshot = state.current();
                let result: Result<Value, HttpError> = match selectors::basket_id(&snapshot) {
                    Some(basket_id) => api.delete(&item_path(basket_id, &item_id), session_options(&snapshot)).await,
                    None => Err(unavailable("basket")),
                };
                let outcome = match result {
                    Ok(_) => BasketAction::DeleteBasketItemSuccess { item_id },
                    Err(error) => BasketAction::DeleteBasketItemFail { error },
                };
                Some(AppAction::Basket(outcome))
            }
        },
    )
}
