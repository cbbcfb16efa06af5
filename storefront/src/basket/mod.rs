//! The current shopping basket and its line items.

mod effects;
mod facade;

pub use effects::register_effects;
pub use facade::BasketFacade;

use crate::account::AccountAction;
use crate::app::AppAction;
use crate::models::{Basket, LineItem};
use storefront_core::prelude::*;
use storefront_macros::Action;

/// Basket actions
#[derive(Action, Clone, Debug, PartialEq)]
pub enum BasketAction {
    /// Load the current basket
    #[intent("[Basket] Load Basket")]
    LoadBasket,

    /// Basket loaded
    #[success("[Basket API] Load Basket Success")]
    LoadBasketSuccess {
        /// Basket header
        basket: Basket,
        /// All line items
        line_items: Vec<LineItem>,
    },

    /// Basket could not be loaded
    #[failure("[Basket API] Load Basket Fail")]
    LoadBasketFail {
        /// Cause
        error: HttpError,
    },

    /// Add a product
    #[intent("[Basket] Add Product To Basket")]
    AddProductToBasket {
        /// Product SKU
        sku: String,
        /// Quantity to add
        quantity: u32,
    },

    /// Product added
    #[success("[Basket API] Add Product To Basket Success")]
    AddProductToBasketSuccess {
        /// The new line item
        line_item: LineItem,
    },

    /// Product could not be added
    #[failure("[Basket API] Add Product To Basket Fail")]
    AddProductToBasketFail {
        /// Cause
        error: HttpError,
    },

    /// Change the quantity of a line item
    #[intent("[Basket] Update Basket Item")]
    UpdateBasketItem {
        /// Line item id
        item_id: String,
        /// New quantity
        quantity: u32,
    },

    /// Quantity changed
    #[success("[Basket API] Update Basket Item Success")]
    UpdateBasketItemSuccess {
        /// Line item id
        item_id: String,
        /// New quantity
        quantity: u32,
    },

    /// Quantity could not be changed
    #[failure("[Basket API] Update Basket Item Fail")]
    UpdateBasketItemFail {
        /// Cause
        error: HttpError,
    },

    /// Remove a line item
    #[intent("[Basket] Delete Basket Item")]
    DeleteBasketItem {
        /// Line item id
        item_id: String,
    },

    /// Line item removed
    #[success("[Basket API] Delete Basket Item Success")]
    DeleteBasketItemSuccess {
        /// Line item id
        item_id: String,
    },

    /// Line item could not be removed
    #[failure("[Basket API] Delete Basket Item Fail")]
    DeleteBasketItemFail {
        /// Cause
        error: HttpError,
    },

    /// Forget the last error
    #[event("[Basket] Reset Basket Errors")]
    ResetBasketErrors,
}

/// Line items keyed by their id
pub const LINE_ITEMS: EntityAdapter<LineItem> = EntityAdapter::new();

/// Basket slice
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasketState {
    /// Basket header, once loaded
    pub basket: Option<Basket>,
    /// Line items
    pub line_items: EntityState<LineItem>,
    /// A request is in flight
    pub loading: bool,
    /// Last failure
    pub error: Option<HttpError>,
}

storefront_core::impl_loadable!(BasketState);

/// Reducer for [`BasketState`]
pub struct BasketReducer;

impl Reducer for BasketReducer {
    type State = BasketState;
    type Action = AppAction;

    fn reduce(&self, state: &mut BasketState, action: &AppAction) {
        match action {
            AppAction::Basket(action) => reduce_basket(state, action),
            AppAction::Account(AccountAction::LogoutUser) => *state = BasketState::default(),
            _ => {},
        }
    }
}

fn reduce_basket(state: &mut BasketState, action: &BasketAction) {
    track_request(state, action);

    match action {
        BasketAction::LoadBasketSuccess { basket, line_items } => {
            state.basket = Some(basket.clone());
            LINE_ITEMS.set_all(line_items.iter().cloned(), &mut state.line_items);
        },
        BasketAction::AddProductToBasketSuccess { line_item } => {
            LINE_ITEMS.add_one(line_item.clone(), &mut state.line_items);
        },
        BasketAction::UpdateBasketItemSuccess { item_id, quantity } => {
            let quantity = *quantity;
            let updated = LINE_ITEMS.update_one(
                item_id,
                |item: &mut LineItem| item.quantity.value = quantity,
                &mut state.line_items,
            );
            if !updated {
                tracing::debug!(item_id, "Updated line item is not in the basket");
            }
        },
        BasketAction::DeleteBasketItemSuccess { item_id } => {
            LINE_ITEMS.remove_one(item_id, &mut state.line_items);
        },
        BasketAction::ResetBasketErrors => reset_error(state),
        _ => {},
    }
}

/// Selectors over the basket slice
pub mod selectors {
    use super::LINE_ITEMS;
    use crate::app::AppState;
    use crate::models::{Basket, LineItem};
    use storefront_core::error::HttpError;

    /// Basket header
    #[must_use]
    pub fn current_basket(state: &AppState) -> Option<Basket> {
        state.basket.basket.clone()
    }

    /// Basket id used in item paths
    #[must_use]
    pub fn basket_id(state: &AppState) -> Option<&str> {
        state.basket.basket.as_ref().map(|basket| basket.id.as_str())
    }

    /// Line items in basket order
    #[must_use]
    pub fn line_items(state: &AppState) -> Vec<LineItem> {
        LINE_ITEMS.select_all(&state.basket.line_items)
    }

    /// Sum of all line item quantities, saturating at `u32::MAX`
    #[must_use]
    pub fn item_count(state: &AppState) -> u32 {
        state
            .basket
            .line_items
            .iter()
            .fold(0u32, |total, item| total.saturating_add(item.quantity.value))
    }

    /// Whether a basket request is in flight
    #[must_use]
    pub const fn basket_loading(state: &AppState) -> bool {
        state.basket.loading
    }

    /// Last basket failure
    #[must_use]
    pub fn basket_error(state: &AppState) -> Option<HttpError> {
        state.basket.error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppState;
    use crate::models::Quantity;
    use storefront_testing::ReducerTest;

    fn item(id: &str, sku: &str, quantity: u32) -> LineItem {
        LineItem {
            id: id.to_string(),
            sku: sku.to_string(),
            quantity: Quantity::new(quantity),
            single_base_price: None,
        }
    }

    fn loaded() -> BasketState {
        let mut state = BasketState {
            basket: Some(Basket {
                id: "B1".to_string(),
                ..Basket::default()
            }),
            ..BasketState::default()
        };
        LINE_ITEMS.add_many([item("L1", "sku-1", 1), item("L2", "sku-2", 2)], &mut state.line_items);
        state
    }

    #[test]
    fn test_load_replaces_line_items() {
        ReducerTest::new(BasketReducer)
            .given_state(loaded())
            .when_actions([
                BasketAction::LoadBasket.into(),
                BasketAction::LoadBasketSuccess {
                    basket: Basket {
                        id: "B2".to_string(),
                        ..Basket::default()
                    },
                    line_items: vec![item("L9", "sku-9", 1)],
                }
                .into(),
            ])
            .then_state(|state: &BasketState| {
                assert_eq!(state.line_items.ids(), ["L9".to_string()]);
                assert_eq!(state.basket.as_ref().map(|b| b.id.as_str()), Some("B2"));
                assert!(!state.loading);
            })
            .run();
    }

    #[test]
    fn test_update_merges_quantity_only() {
        ReducerTest::new(BasketReducer)
            .given_state(loaded())
            .when_action(
                BasketAction::UpdateBasketItemSuccess {
                    item_id: "L2".to_string(),
                    quantity: 5,
                }
                .into(),
            )
            .then_state(|state: &BasketState| {
                assert_eq!(state.line_items.get("L2"), Some(&item("L2", "sku-2", 5)));
                assert_eq!(state.line_items.ids(), ["L1".to_string(), "L2".to_string()]);
            })
            .run();
    }

    #[test]
    fn test_update_of_unknown_item_is_ignored() {
        ReducerTest::new(BasketReducer)
            .given_state(loaded())
            .when_action(
                BasketAction::UpdateBasketItemSuccess {
                    item_id: "missing".to_string(),
                    quantity: 5,
                }
                .into(),
            )
            .then_state_eq(loaded())
            .run();
    }

    #[test]
    fn test_failure_keeps_items() {
        let error = HttpError::new(409).with_message("out of stock");

        ReducerTest::new(BasketReducer)
            .given_state(loaded())
            .when_actions([
                BasketAction::DeleteBasketItem {
                    item_id: "L1".to_string(),
                }
                .into(),
                BasketAction::DeleteBasketItemFail { error: error.clone() }.into(),
            ])
            .then_state(move |state: &BasketState| {
                assert_eq!(state.line_items.len(), 2);
                assert_eq!(state.error.as_ref(), Some(&error));
                assert!(!state.loading);
            })
            .run();
    }

    #[test]
    fn test_logout_clears_basket() {
        ReducerTest::new(BasketReducer)
            .given_state(loaded())
            .when_action(AccountAction::LogoutUser.into())
            .then_state_eq(BasketState::default())
            .run();
    }

    #[test]
    fn test_item_count_saturates() {
        let mut state = AppState::default();
        assert_eq!(selectors::item_count(&state), 0);

        state.basket = loaded();
        assert_eq!(selectors::item_count(&state), 3);

        LINE_ITEMS.add_many(
            [item("L3", "sku-3", u32::MAX), item("L4", "sku-4", u32::MAX)],
            &mut state.basket.line_items,
        );
        assert_eq!(selectors::item_count(&state), u32::MAX);
    }
}
