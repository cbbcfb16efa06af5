//! Wishlist effects.
//!
//! Item changes answer with the reloaded wishlist so the slice never has to
//! patch item lists locally.

use super::WishlistAction;
use crate::api::session_options;
use crate::app::{AppAction, AppRuntime, AppState};
use crate::models::Wishlist;
use serde::Serialize;
use serde_json::{Value, json};
use storefront_core::prelude::*;
use storefront_runtime::StoreError;

const WISHLISTS_PATH: &str = "customers/-/users/-/wishlists";

/// Register the wishlist effects
///
/// # Errors
///
/// Returns [`StoreError::ShutdownInProgress`] once the store is shut down.
pub fn register_effects<Api: ApiService>(runtime: &AppRuntime, api: &Api) -> Result<(), StoreError> {
    runtime.register(load_wishlists(api.clone()))?;
    runtime.register(load_shared_wishlist(api.clone()))?;
    runtime.register(create_wishlist(api.clone()))?;
    runtime.register(update_wishlist(api.clone()))?;
    runtime.register(delete_wishlist(api.clone()))?;
    runtime.register(add_product(api.clone()))?;
    runtime.register(remove_item(api.clone()))
}

#[derive(Serialize)]
struct WishlistHeader<'a> {
    title: &'a str,
    preferred: bool,
}

fn wishlist_path(id: &str) -> String {
    format!("{WISHLISTS_PATH}/{}", encode_resource_id(id))
}

async fn reload<Api: ApiService>(api: &Api, id: &str, options: RequestOptions) -> Result<Wishlist, HttpError> {
    api.get(&wishlist_path(id), options).await
}

fn load_wishlists<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "wishlist.load_all",
        Policy::Switch,
        |action: &AppAction| matches!(action, AppAction::Wishlist(WishlistAction::LoadWishlists)),
        move |_action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let outcome: WishlistAction = api_call! {
                    call: api.get::<Vec<Wishlist>>(WISHLISTS_PATH, session_options(&state.current())),
                    on_success: |wishlists| WishlistAction::LoadWishlistsSuccess { wishlists },
                    on_error: |error| WishlistAction::LoadWishlistsFail { error }
                };
                Some(AppAction::Wishlist(outcome))
            }
        },
    )
}

fn load_shared_wishlist<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "wishlist.load_shared",
        Policy::Switch,
        |action: &AppAction| matches!(action, AppAction::Wishlist(WishlistAction::LoadWishlist { .. })),
        move |action: AppAction, _state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::Wishlist(WishlistAction::LoadWishlist { id, owner, secure_code }) = action else {
                    return None;
                };
                let path = format!("wishlists/{}", encode_resource_id(&id));
                let options = RequestOptions::new()
                    .with_param("owner", owner)
                    .with_param("secureCode", secure_code);
                let outcome: WishlistAction = api_call! {
                    call: api.get::<Wishlist>(&path, options),
                    on_success: |wishlist| WishlistAction::LoadWishlistSuccess { wishlist },
                    on_error: |error| WishlistAction::LoadWishlistFail { error }
                };
                Some(AppAction::Wishlist(outcome))
            }
        },
    )
}

fn create_wishlist<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "wishlist.create",
        Policy::Merge,
        |action: &AppAction| matches!(action, AppAction::Wishlist(WishlistAction::CreateWishlist { .. })),
        move |action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::Wishlist(WishlistAction::CreateWishlist { title, preferred }) = action else {
                    return None;
                };
                let body = WishlistHeader { title: &title, preferred };
                let result: Result<Wishlist, HttpError> =
                    api.post(WISHLISTS_PATH, &body, session_options(&state.current())).await;
                Some(AppAction::Wishlist(result.into_action(
                    |wishlist| WishlistAction::CreateWishlistSuccess { wishlist },
                    |error| WishlistAction::CreateWishlistFail { error },
                )))
            }
        },
    )
}

fn update_wishlist<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "wishlist.update",
        Policy::Concat,
        |action: &AppAction| matches!(action, AppAction::Wishlist(WishlistAction::UpdateWishlist { .. })),
        move |action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::Wishlist(WishlistAction::UpdateWishlist { wishlist }) = action else {
                    return None;
                };
                let body = WishlistHeader {
                    title: &wishlist.title,
                    preferred: wishlist.preferred,
                };
                let result: Result<Wishlist, HttpError> = api
                    .put(&wishlist_path(&wishlist.id), &body, session_options(&state.current()))
                    .await;
                Some(AppAction::Wishlist(result.into_action(
                    |wishlist| WishlistAction::UpdateWishlistSuccess { wishlist },
                    |error| WishlistAction::UpdateWishlistFail { error },
                )))
            }
        },
    )
}

fn delete_wishlist<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "wishlist.delete",
        Policy::Merge,
        |action: &AppAction| matches!(action, AppAction::Wishlist(WishlistAction::DeleteWishlist { .. })),
        move |action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::Wishlist(WishlistAction::DeleteWishlist { id }) = action else {
                    return None;
                };
                let result: Result<Value, HttpError> =
                    api.delete(&wishlist_path(&id), session_options(&state.current())).await;
                let outcome = match result {
                    Ok(_) => WishlistAction::DeleteWishlistSuccess { id },
                    Err(error) => WishlistAction::DeleteWishlistFail { error },
                };
                Some(AppAction::Wishlist(outcome))
            }
        },
    )
}

fn add_product<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "wishlist.add_product",
        Policy::Concat,
        |action: &AppAction| matches!(action, AppAction::Wishlist(WishlistAction::AddProductToWishlist { .. })),
        move |action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::Wishlist(WishlistAction::AddProductToWishlist { wishlist_id, sku, quantity }) = action else {
                    return None;
                };
                let options = session_options(&state.current());
                let path = format!("{}/products/{}", wishlist_path(&wishlist_id), encode_resource_id(&sku));
                let added: Result<Value, HttpError> = api
                    .post(&path, &json!({}), options.clone().with_param("quantity", quantity.to_string()))
                    .await;
                let result = match added {
                    Ok(_) => reload(&api, &wishlist_id, options).await,
                    Err(error) => Err(error),
                };
                Some(AppAction::Wishlist(result.into_action(
                    |wishlist| WishlistAction::AddProductToWishlistSuccess { wishlist },
                    |error| WishlistAction::AddProductToWishlistFail { error },
                )))
            }
        },
    )
}

fn remove_item<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "wishlist.remove_item",
        Policy::Concat,
        |action: &AppAction| matches!(action, AppAction::Wishlist(WishlistAction::RemoveItemFromWishlist { .. })),
        move |action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::Wishlist(WishlistAction::RemoveItemFromWishlist { wishlist_id, item_id }) = action else {
                    return None;
                };
                let options = session_options(&state.current());
                let path = format!("{}/items/{}", wishlist_path(&wishlist_id), encode_resource_id(&item_id));
                let removed: Result<Value, HttpError> = api.delete(&path, options.clone()).await;
                let result = match removed {
                    Ok(_) => reload(&api, &wishlist_id, options).await,
                    Err(error) => Err(error),
                };
                Some(AppAction::Wishlist(result.into_action(
                    |wishlist| WishlistAction::RemoveItemFromWishlistSuccess { wishlist },
                    |error| WishlistAction::RemoveItemFromWishlistFail { error },
                )))
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wishlist_path_encodes_id() {
        assert_eq!(wishlist_path("W 1"), "customers/-/users/-/wishlists/W%201");
    }

    #[test]
    fn test_header_wire_format() {
        let body = serde_json::to_value(WishlistHeader {
            title: "Birthday",
            preferred: true,
        })
        .map_err(|e| e.to_string());

        assert_eq!(body, Ok(json!({"title": "Birthday", "preferred": true})));
    }
}
