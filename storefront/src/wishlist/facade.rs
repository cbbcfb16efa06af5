use super::{WishlistAction, selectors};
use crate::app::AppStore;
use crate::command::{ensure, require};
use crate::models::Wishlist;
use storefront_core::error::{HttpError, ValidationError};
use storefront_core::selector::Selection;

/// Wishlist commands and views
#[derive(Clone)]
pub struct WishlistFacade {
    store: AppStore,
}

impl WishlistFacade {
    /// Facade over `store`
    #[must_use]
    pub const fn new(store: AppStore) -> Self {
        Self { store }
    }

    /// All wishlists of the user
    #[must_use]
    pub fn wishlists(&self) -> Selection<Vec<Wishlist>> {
        self.store.select(selectors::wishlists)
    }

    /// The selected or shared wishlist
    #[must_use]
    pub fn wishlist(&self) -> Selection<Option<Wishlist>> {
        self.store.select(selectors::selected_wishlist)
    }

    /// The preferred wishlist
    #[must_use]
    pub fn preferred_wishlist(&self) -> Selection<Option<Wishlist>> {
        self.store.select(selectors::preferred_wishlist)
    }

    /// Whether a wishlist request is in flight
    #[must_use]
    pub fn wishlist_loading(&self) -> Selection<bool> {
        self.store.select(selectors::wishlist_loading)
    }

    /// Last wishlist failure
    #[must_use]
    pub fn wishlist_error(&self) -> Selection<Option<HttpError>> {
        self.store.select(selectors::wishlist_error)
    }

    /// Load the wishlists of the logged in user
    pub fn load_wishlists(&self) {
        self.store.dispatch(WishlistAction::LoadWishlists.into());
    }

    /// Open a wishlist shared by `owner`
    ///
    /// # Errors
    ///
    /// All three arguments are required.
    pub fn load_wishlist(&self, id: &str, owner: &str, secure_code: &str) -> Result<(), ValidationError> {
        require("load_wishlist", "id", id)?;
        require("load_wishlist", "owner", owner)?;
        require("load_wishlist", "secure_code", secure_code)?;
        self.store.dispatch(
            WishlistAction::LoadWishlist {
                id: id.to_string(),
                owner: owner.to_string(),
                secure_code: secure_code.to_string(),
            }
            .into(),
        );
        Ok(())
    }

    /// Create a wishlist
    ///
    /// # Errors
    ///
    /// Rejects a blank title.
    pub fn create_wishlist(&self, title: &str, preferred: bool) -> Result<(), ValidationError> {
        require("create_wishlist", "title", title)?;
        self.store.dispatch(
            WishlistAction::CreateWishlist {
                title: title.to_string(),
                preferred,
            }
            .into(),
        );
        Ok(())
    }

    /// Rename a wishlist or change its preference
    ///
    /// # Errors
    ///
    /// Rejects a wishlist without id or title.
    pub fn update_wishlist(&self, wishlist: Wishlist) -> Result<(), ValidationError> {
        require("update_wishlist", "id", &wishlist.id)?;
        require("update_wishlist", "title", &wishlist.title)?;
        self.store.dispatch(WishlistAction::UpdateWishlist { wishlist }.into());
        Ok(())
    }

    /// Delete a wishlist
    ///
    /// # Errors
    ///
    /// Rejects a blank id.
    pub fn delete_wishlist(&self, id: &str) -> Result<(), ValidationError> {
        require("delete_wishlist", "id", id)?;
        self.store.dispatch(WishlistAction::DeleteWishlist { id: id.to_string() }.into());
        Ok(())
    }

    /// Put `quantity` of a product on a wishlist
    ///
    /// # Errors
    ///
    /// Rejects blank ids or a zero quantity.
    pub fn add_product_to_wishlist(&self, wishlist_id: &str, sku: &str, quantity: u32) -> Result<(), ValidationError> {
        require("add_product_to_wishlist", "wishlist_id", wishlist_id)?;
        require("add_product_to_wishlist", "sku", sku)?;
        ensure("add_product_to_wishlist", "quantity", quantity > 0, "must be positive")?;
        self.store.dispatch(
            WishlistAction::AddProductToWishlist {
                wishlist_id: wishlist_id.to_string(),
                sku: sku.to_string(),
                quantity,
            }
            .into(),
        );
        Ok(())
    }

    /// Take an item off a wishlist
    ///
    /// # Errors
    ///
    /// Rejects blank ids.
    pub fn remove_item_from_wishlist(&self, wishlist_id: &str, item_id: &str) -> Result<(), ValidationError> {
        require("remove_item_from_wishlist", "wishlist_id", wishlist_id)?;
        require("remove_item_from_wishlist", "item_id", item_id)?;
        self.store.dispatch(
            WishlistAction::RemoveItemFromWishlist {
                wishlist_id: wishlist_id.to_string(),
                item_id: item_id.to_string(),
            }
            .into(),
        );
        Ok(())
    }

    /// Show a wishlist in detail
    pub fn select_wishlist(&self, id: impl Into<String>) {
        self.store.dispatch(WishlistAction::SelectWishlist { id: id.into() }.into());
    }
}
