//! Wishlists of the logged in user, plus shared wishlists opened by link.

mod effects;
mod facade;

pub use effects::register_effects;
pub use facade::WishlistFacade;

use crate::account::AccountAction;
use crate::app::AppAction;
use crate::models::Wishlist;
use storefront_core::prelude::*;
use storefront_macros::Action;

/// Wishlist actions
#[derive(Action, Clone, Debug, PartialEq)]
pub enum WishlistAction {
    /// Load all wishlists of the user
    #[intent("[Wishlist] Load Wishlists")]
    LoadWishlists,

    /// Wishlists loaded
    #[success("[Wishlist API] Load Wishlists Success")]
    LoadWishlistsSuccess {
        /// All wishlists of the user
        wishlists: Vec<Wishlist>,
    },

    /// Wishlists could not be loaded
    #[failure("[Wishlist API] Load Wishlists Fail")]
    LoadWishlistsFail {
        /// Cause
        error: HttpError,
    },

    /// Load a wishlist shared by another user
    #[intent("[Wishlist] Load Wishlist")]
    LoadWishlist {
        /// Wishlist id
        id: String,
        /// Login of the owner
        owner: String,
        /// Secret from the share link
        secure_code: String,
    },

    /// Shared wishlist loaded
    #[success("[Wishlist API] Load Wishlist Success")]
    LoadWishlistSuccess {
        /// The wishlist
        wishlist: Wishlist,
    },

    /// Shared wishlist could not be loaded
    #[failure("[Wishlist API] Load Wishlist Fail")]
    LoadWishlistFail {
        /// Cause
        error: HttpError,
    },

    /// Create a wishlist
    #[intent("[Wishlist] Create Wishlist")]
    CreateWishlist {
        /// Title
        title: String,
        /// Make it the preferred wishlist
        preferred: bool,
    },

    /// Wishlist created
    #[success("[Wishlist API] Create Wishlist Success")]
    CreateWishlistSuccess {
        /// The new wishlist
        wishlist: Wishlist,
    },

    /// Wishlist could not be created
    #[failure("[Wishlist API] Create Wishlist Fail")]
    CreateWishlistFail {
        /// Cause
        error: HttpError,
    },

    /// Change title or preference of a wishlist
    #[intent("[Wishlist] Update Wishlist")]
    UpdateWishlist {
        /// The changed wishlist
        wishlist: Wishlist,
    },

    /// Wishlist updated
    #[success("[Wishlist API] Update Wishlist Success")]
    UpdateWishlistSuccess {
        /// The wishlist as stored by the backend
        wishlist: Wishlist,
    },

    /// Wishlist could not be updated
    #[failure("[Wishlist API] Update Wishlist Fail")]
    UpdateWishlistFail {
        /// Cause
        error: HttpError,
    },

    /// Delete a wishlist
    #[intent("[Wishlist] Delete Wishlist")]
    DeleteWishlist {
        /// Wishlist id
        id: String,
    },

    /// Wishlist deleted
    #[success("[Wishlist API] Delete Wishlist Success")]
    DeleteWishlistSuccess {
        /// Wishlist id
        id: String,
    },

    /// Wishlist could not be deleted
    #[failure("[Wishlist API] Delete Wishlist Fail")]
    DeleteWishlistFail {
        /// Cause
        error: HttpError,
    },

    /// Put a product on a wishlist
    #[intent("[Wishlist] Add Item To Wishlist")]
    AddProductToWishlist {
        /// Target wishlist
        wishlist_id: String,
        /// Product SKU
        sku: String,
        /// Desired quantity
        quantity: u32,
    },

    /// Product added
    #[success("[Wishlist API] Add Item To Wishlist Success")]
    AddProductToWishlistSuccess {
        /// The wishlist with the new item
        wishlist: Wishlist,
    },

    /// Product could not be added
    #[failure("[Wishlist API] Add Item To Wishlist Fail")]
    AddProductToWishlistFail {
        /// Cause
        error: HttpError,
    },

    /// Take an item off a wishlist
    #[intent("[Wishlist] Remove Item From Wishlist")]
    RemoveItemFromWishlist {
        /// Wishlist holding the item
        wishlist_id: String,
        /// Item id
        item_id: String,
    },

    /// Item removed
    #[success("[Wishlist API] Remove Item From Wishlist Success")]
    RemoveItemFromWishlistSuccess {
        /// The wishlist without the item
        wishlist: Wishlist,
    },

    /// Item could not be removed
    #[failure("[Wishlist API] Remove Item From Wishlist Fail")]
    RemoveItemFromWishlistFail {
        /// Cause
        error: HttpError,
    },

    /// Select the wishlist shown in detail
    #[event("[Wishlist] Select Wishlist")]
    SelectWishlist {
        /// Wishlist id
        id: String,
    },
}

/// Wishlists keyed by id
pub const WISHLISTS: EntityAdapter<Wishlist> = EntityAdapter::new();

/// Wishlist slice
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WishlistState {
    /// All known wishlists
    pub wishlists: EntityState<Wishlist>,
    /// Id of the selected wishlist
    pub selected: Option<String>,
    /// A request is in flight
    pub loading: bool,
    /// Last failure
    pub error: Option<HttpError>,
}

storefront_core::impl_loadable!(WishlistState);

/// Reducer for [`WishlistState`]
pub struct WishlistReducer;

impl Reducer for WishlistReducer {
    type State = WishlistState;
    type Action = AppAction;

    fn reduce(&self, state: &mut WishlistState, action: &AppAction) {
        match action {
            AppAction::Wishlist(action) => reduce_wishlist(state, action),
            AppAction::Account(AccountAction::LogoutUser) => *state = WishlistState::default(),
            _ => {},
        }
    }
}

fn reduce_wishlist(state: &mut WishlistState, action: &WishlistAction) {
    track_request(state, action);

    match action {
        WishlistAction::LoadWishlistsSuccess { wishlists } => {
            WISHLISTS.set_all(wishlists.iter().cloned(), &mut state.wishlists);
            if state
                .selected
                .as_deref()
                .is_some_and(|id| !state.wishlists.contains(id))
            {
                state.selected = None;
            }
        },
        WishlistAction::LoadWishlistSuccess { wishlist } => {
            WISHLISTS.add_one(wishlist.clone(), &mut state.wishlists);
            state.selected = Some(wishlist.id.clone());
        },
        WishlistAction::CreateWishlistSuccess { wishlist } | WishlistAction::UpdateWishlistSuccess { wishlist } => {
            if wishlist.preferred {
                unset_preferred(state);
            }
            WISHLISTS.add_one(wishlist.clone(), &mut state.wishlists);
        },
        WishlistAction::AddProductToWishlistSuccess { wishlist }
        | WishlistAction::RemoveItemFromWishlistSuccess { wishlist } => {
            WISHLISTS.add_one(wishlist.clone(), &mut state.wishlists);
        },
        WishlistAction::DeleteWishlistSuccess { id } => {
            WISHLISTS.remove_one(id, &mut state.wishlists);
            if state.selected.as_ref() == Some(id) {
                state.selected = None;
            }
        },
        WishlistAction::SelectWishlist { id } => state.selected = Some(id.clone()),
        _ => {},
    }
}

// Only one wishlist can be preferred
fn unset_preferred(state: &mut WishlistState) {
    let ids = state.wishlists.ids().to_vec();
    for id in ids {
        WISHLISTS.update_one(&id, |wishlist: &mut Wishlist| wishlist.preferred = false, &mut state.wishlists);
    }
}

/// Selectors over the wishlist slice
pub mod selectors {
    use super::WISHLISTS;
    use crate::app::AppState;
    use crate::models::Wishlist;
    use storefront_core::error::HttpError;

    /// All wishlists
    #[must_use]
    pub fn wishlists(state: &AppState) -> Vec<Wishlist> {
        WISHLISTS.select_all(&state.wishlists.wishlists)
    }

    /// The selected wishlist
    #[must_use]
    pub fn selected_wishlist(state: &AppState) -> Option<Wishlist> {
        let id = state.wishlists.selected.as_deref()?;
        WISHLISTS.select_by_id(id, &state.wishlists.wishlists)
    }

    /// The preferred wishlist
    #[must_use]
    pub fn preferred_wishlist(state: &AppState) -> Option<Wishlist> {
        state.wishlists.wishlists.iter().find(|w| w.preferred).cloned()
    }

    /// Whether a wishlist request is in flight
    #[must_use]
    pub const fn wishlist_loading(state: &AppState) -> bool {
        state.wishlists.loading
    }

    /// Last wishlist failure
    #[must_use]
    pub fn wishlist_error(state: &AppState) -> Option<HttpError> {
        state.wishlists.error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wishlist(id: &str, preferred: bool) -> Wishlist {
        Wishlist {
            id: id.to_string(),
            title: format!("List {id}"),
            preferred,
            ..Wishlist::default()
        }
    }

    fn reduce(state: &mut WishlistState, action: WishlistAction) {
        WishlistReducer.reduce(state, &action.into());
    }

    #[test]
    fn test_shared_wishlist_is_selected() {
        let mut state = WishlistState::default();
        reduce(
            &mut state,
            WishlistAction::LoadWishlist {
                id: "W1".to_string(),
                owner: "patricia".to_string(),
                secure_code: "abc".to_string(),
            },
        );
        assert!(state.loading);

        reduce(
            &mut state,
            WishlistAction::LoadWishlistSuccess {
                wishlist: wishlist("W1", false),
            },
        );

        assert!(!state.loading);
        assert_eq!(state.selected.as_deref(), Some("W1"));
        assert_eq!(state.wishlists.len(), 1);
    }

    #[test]
    fn test_single_preferred_wishlist() {
        let mut state = WishlistState::default();
        reduce(
            &mut state,
            WishlistAction::LoadWishlistsSuccess {
                wishlists: vec![wishlist("W1", true), wishlist("W2", false)],
            },
        );
        reduce(
            &mut state,
            WishlistAction::CreateWishlistSuccess {
                wishlist: wishlist("W3", true),
            },
        );

        let preferred: Vec<_> = state.wishlists.iter().filter(|w| w.preferred).map(|w| w.id.as_str()).collect();
        assert_eq!(preferred, ["W3"]);
        assert_eq!(state.wishlists.ids(), ["W1".to_string(), "W2".to_string(), "W3".to_string()]);
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut state = WishlistState::default();
        reduce(
            &mut state,
            WishlistAction::LoadWishlistsSuccess {
                wishlists: vec![wishlist("W1", false)],
            },
        );
        reduce(&mut state, WishlistAction::SelectWishlist { id: "W1".to_string() });
        reduce(&mut state, WishlistAction::DeleteWishlistSuccess { id: "W1".to_string() });

        assert_eq!(state.selected, None);
        assert!(state.wishlists.is_empty());
    }

    #[test]
    fn test_logout_resets() {
        let mut state = WishlistState::default();
        reduce(
            &mut state,
            WishlistAction::LoadWishlistsSuccess {
                wishlists: vec![wishlist("W1", false)],
            },
        );
        WishlistReducer.reduce(&mut state, &AccountAction::LogoutUser.into());

        assert_eq!(state, WishlistState::default());
    }
}
