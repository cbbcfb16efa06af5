use super::basket::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_core::entity::Entity;

/// A placed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order id
    pub id: String,

    /// Human readable order number
    pub document_no: String,

    /// When the order was placed
    pub creation_date: DateTime<Utc>,

    /// Backend status code, e.g. `NEW`, `COMPLETED`
    pub status: String,

    /// Grand total
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Price>,
}

impl Entity for Order {
    fn id(&self) -> &str {
        &self.id
    }
}
