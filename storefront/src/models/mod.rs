//! Domain models exchanged with the REST backend.
//!
//! All models use camelCase on the wire. Optional members default when the
//! backend omits them.

mod account;
mod basket;
mod group;
mod order;
mod recurring_order;
mod return_request;
mod wishlist;

pub use account::{Credentials, Customer, PasswordChange, Registration, User};
pub use basket::{Basket, LineItem, Price};
pub use group::Group;
pub use order::Order;
pub use recurring_order::RecurringOrder;
pub use return_request::{
    ReturnRequest, ReturnRequestBody, ReturnRequestItem, ReturnablePosition, SelectOption,
};
pub use wishlist::{Wishlist, WishlistItem};

use serde::{Deserialize, Serialize};

/// An amount with an optional unit of measure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quantity {
    /// Amount
    pub value: u32,

    /// Unit of measure, e.g. `"pcs"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Quantity {
    /// Quantity without a unit
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self { value, unit: None }
    }
}
