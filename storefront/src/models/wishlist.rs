use super::Quantity;
use serde::{Deserialize, Serialize};
use storefront_core::entity::Entity;

/// A named list of products a user wants to remember
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wishlist {
    /// Wishlist id
    pub id: String,

    /// Display title
    pub title: String,

    /// Whether this is the user's preferred wishlist
    #[serde(default)]
    pub preferred: bool,

    /// Items, when the backend returned them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<WishlistItem>,

    /// Item count, when reported without the items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_count: Option<u32>,
}

impl Entity for Wishlist {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A product on a wishlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    /// Product SKU
    pub sku: String,

    /// Item id within the wishlist
    pub id: String,

    /// Creation time in milliseconds since the epoch
    pub creation_date: i64,

    /// How many the owner wants
    pub desired_quantity: Quantity,

    /// How many were already bought from this list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchased_quantity: Option<Quantity>,
}
