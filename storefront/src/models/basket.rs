use super::Quantity;
use serde::{Deserialize, Serialize};
use storefront_core::entity::Entity;

/// A monetary amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    /// Amount in the currency's major unit
    pub value: f64,

    /// ISO 4217 currency code
    pub currency: String,
}

/// The current shopping basket, without its line items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basket {
    /// Basket id used in item paths
    pub id: String,

    /// Grand total
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Price>,

    /// Number of line items reported by the backend
    #[serde(default)]
    pub total_product_quantity: u32,
}

/// One product position in the basket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Line item id
    pub id: String,

    /// Product SKU
    #[serde(rename = "product")]
    pub sku: String,

    /// Ordered quantity
    pub quantity: Quantity,

    /// Price of a single unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_base_price: Option<Price>,
}

impl Entity for LineItem {
    fn id(&self) -> &str {
        &self.id
    }
}
