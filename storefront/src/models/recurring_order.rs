use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use storefront_core::entity::Entity;

/// An order placed automatically on a schedule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringOrder {
    /// Recurring order id
    pub id: String,

    /// Human readable number
    #[serde(default)]
    pub number: String,

    /// Whether the schedule is running
    #[serde(default)]
    pub active: bool,

    /// Whether the schedule ended with an error
    #[serde(default)]
    pub expired: bool,

    /// ISO 8601 duration between orders, e.g. `P1M`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    /// First execution date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    /// Next planned execution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_order_date: Option<NaiveDate>,

    /// Ids of the orders placed so far
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_ids: Vec<String>,
}

impl Entity for RecurringOrder {
    fn id(&self) -> &str {
        &self.id
    }
}
