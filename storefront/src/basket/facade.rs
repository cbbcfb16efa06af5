use super::{BasketAction, selectors};
use crate::app::AppStore;
use crate::command::{ensure, require};
use crate::models::{Basket, LineItem};
use storefront_core::error::{HttpError, ValidationError};
use storefront_core::selector::Selection;

/// Basket commands and views
#[derive(Clone)]
pub struct BasketFacade {
    store: AppStore,
}

impl BasketFacade {
    /// Facade over `store`
    #[must_use]
    pub const fn new(store: AppStore) -> Self {
        Self { store }
    }

    /// The basket header
    #[must_use]
    pub fn basket(&self) -> Selection<Option<Basket>> {
        self.store.select(selectors::current_basket)
    }

    /// Line items in basket order
    #[must_use]
    pub fn line_items(&self) -> Selection<Vec<LineItem>> {
        self.store.select(selectors::line_items)
    }

    /// Total quantity of all items
    #[must_use]
    pub fn item_count(&self) -> Selection<u32> {
        self.store.select(selectors::item_count)
    }

    /// Whether a basket request is in flight
    #[must_use]
    pub fn basket_loading(&self) -> Selection<bool> {
        self.store.select(selectors::basket_loading)
    }

    /// Last basket failure
    #[must_use]
    pub fn basket_error(&self) -> Selection<Option<HttpError>> {
        self.store.select(selectors::basket_error)
    }

    /// Load the current basket
    pub fn load_basket(&self) {
        self.store.dispatch(BasketAction::LoadBasket.into());
    }

    /// Add `quantity` of a product
    ///
    /// # Errors
    ///
    /// Rejects a blank SKU or a zero quantity.
    pub fn add_product_to_basket(&self, sku: &str, quantity: u32) -> Result<(), ValidationError> {
        require("add_product_to_basket", "sku", sku)?;
        ensure("add_product_to_basket", "quantity", quantity > 0, "must be positive")?;
        self.store.dispatch(
            BasketAction::AddProductToBasket {
                sku: sku.to_string(),
                quantity,
            }
            .into(),
        );
        Ok(())
    }

    /// Change the quantity of a line item
    ///
    /// # Errors
    ///
    /// Rejects a blank item id or a zero quantity; delete the item instead.
    pub fn update_basket_item(&self, item_id: &str, quantity: u32) -> Result<(), ValidationError> {
        require("update_basket_item", "item_id", item_id)?;
        ensure("update_basket_item", "quantity", quantity > 0, "must be positive")?;
        self.store.dispatch(
            BasketAction::UpdateBasketItem {
                item_id: item_id.to_string(),
                quantity,
            }
            .into(),
        );
        Ok(())
    }

    /// Remove a line item
    ///
    /// # Errors
    ///
    /// Rejects a blank item id.
    pub fn delete_basket_item(&self, item_id: &str) -> Result<(), ValidationError> {
        require("delete_basket_item", "item_id", item_id)?;
        self.store.dispatch(
            BasketAction::DeleteBasketItem {
                item_id: item_id.to_string(),
            }
            .into(),
        );
        Ok(())
    }

    /// Forget the last basket error
    pub fn reset_basket_errors(&self) {
        self.store.dispatch(BasketAction::ResetBasketErrors.into());
    }
}
