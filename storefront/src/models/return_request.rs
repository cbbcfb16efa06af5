use super::Quantity;
use serde::{Deserialize, Serialize};

/// A return request filed against an order.
///
/// Ids are only unique per order, so collections key requests by
/// `"{order_id}_{id}"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    /// Order the request belongs to
    #[serde(default)]
    pub order_id: String,

    /// Request id within the order
    pub id: String,

    /// Processing status, e.g. `PENDING`
    #[serde(default)]
    pub status: String,

    /// Returned positions
    #[serde(default)]
    pub items: Vec<ReturnRequestItem>,
}

/// One returned position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequestItem {
    /// Order position being returned
    pub position_id: String,

    /// Product SKU
    #[serde(default)]
    pub sku: String,

    /// Returned quantity
    pub quantity: Quantity,

    /// Reason code, see [`SelectOption`]
    pub reason: String,
}

/// An order position that can still be returned
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnablePosition {
    /// Order position id
    pub position_id: String,

    /// Product SKU
    pub sku: String,

    /// Quantity still returnable
    pub quantity: Quantity,
}

/// A label/value pair offered for selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Display label
    pub label: String,

    /// Submitted value
    pub value: String,
}

/// Body of a new return request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequestBody {
    /// Positions to return
    pub items: Vec<ReturnRequestItem>,

    /// Free text comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
