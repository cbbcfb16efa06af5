//! # Storefront State
//!
//! Feature slices for an e-commerce storefront built on the storefront state
//! engine: session, basket, wishlists, orders, return requests, recurring
//! orders, organization hierarchies and notifications.
//!
//! Every feature follows the same pattern: a facade command dispatches an
//! intent, an effect calls the REST backend and the outcome action is
//! reduced back into the feature's slice.
//!
//! ## Features
//!
//! | module              | slice                      | facade                          |
//! |---------------------|----------------------------|---------------------------------|
//! | [`account`]         | `AppState::user`           | [`AccountFacade`]               |
//! | [`basket`]          | `AppState::basket`         | [`BasketFacade`]                |
//! | [`wishlist`]        | `AppState::wishlists`      | [`WishlistFacade`]              |
//! | [`orders`]          | `AppState::orders`         | [`OrderFacade`]                 |
//! | [`return_request`]  | `AppState::return_requests`| [`ReturnRequestFacade`]         |
//! | [`recurring_orders`]| `AppState::recurring_orders`| [`RecurringOrdersFacade`]      |
//! | [`organization`]    | `AppState::organization`   | [`OrganizationHierarchiesFacade`] |
//! | [`messages`]        | `AppState::messages`       | [`MessageFacade`]               |
//!
//! ## Example
//!
//! ```ignore
//! use storefront_state::{RestApiService, Storefront, StorefrontConfig};
//!
//! let config = StorefrontConfig::from_env()?;
//! let storefront = Storefront::start(RestApiService::new(&config)?, &config)?;
//!
//! storefront.recurring_orders().load_recurring_orders(None);
//! let mut orders = storefront.recurring_orders().recurring_orders();
//! while let Some(orders) = orders.next().await {
//!     println!("{} recurring orders", orders.len());
//! }
//! ```

pub mod account;
pub mod api;
pub mod app;
pub mod basket;
mod command;
pub mod config;
pub mod messages;
pub mod models;
pub mod orders;
pub mod organization;
pub mod recurring_orders;
pub mod return_request;
pub mod wishlist;

pub use account::{AccountAction, AccountFacade};
pub use api::RestApiService;
pub use app::{AppAction, AppReducer, AppRuntime, AppState, AppStore, Storefront, app_reducer};
pub use basket::{BasketAction, BasketFacade};
pub use config::{ConfigError, StorefrontConfig};
pub use messages::{MessageAction, MessageFacade};
pub use orders::{OrderAction, OrderFacade};
pub use organization::{OrganizationAction, OrganizationHierarchiesFacade};
pub use recurring_orders::{RecurringOrderAction, RecurringOrdersFacade};
pub use return_request::{ReturnRequestAction, ReturnRequestFacade};
pub use wishlist::{WishlistAction, WishlistFacade};
