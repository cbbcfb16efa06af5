//! Order history of the logged in user.

mod effects;
mod facade;

pub use effects::register_effects;
pub use facade::OrderFacade;

use crate::account::AccountAction;
use crate::app::AppAction;
use crate::models::Order;
use storefront_core::prelude::*;
use storefront_macros::Action;

/// Order actions
#[derive(Action, Clone, Debug, PartialEq)]
pub enum OrderAction {
    /// Load the order history
    #[intent("[Order] Load Orders")]
    LoadOrders,

    /// Orders loaded
    #[success("[Order API] Load Orders Success")]
    LoadOrdersSuccess {
        /// Orders, newest first
        orders: Vec<Order>,
    },

    /// Orders could not be loaded
    #[failure("[Order API] Load Orders Fail")]
    LoadOrdersFail {
        /// Cause
        error: HttpError,
    },

    /// Select the order shown in detail
    #[event("[Order] Select Order")]
    SelectOrder {
        /// Order id
        id: String,
    },
}

/// Orders keyed by id
pub const ORDERS: EntityAdapter<Order> = EntityAdapter::new();

/// Order slice
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderState {
    /// Loaded orders
    pub orders: EntityState<Order>,
    /// Id of the selected order
    pub selected: Option<String>,
    /// A request is in flight
    pub loading: bool,
    /// Last failure
    pub error: Option<HttpError>,
}

storefront_core::impl_loadable!(OrderState);

/// Reducer for [`OrderState`]
pub struct OrderReducer;

impl Reducer for OrderReducer {
    type State = OrderState;
    type Action = AppAction;

    fn reduce(&self, state: &mut OrderState, action: &AppAction) {
        match action {
            AppAction::Order(action) => {
                track_request(state, action);
                match action {
                    OrderAction::LoadOrdersSuccess { orders } => {
                        ORDERS.set_all(orders.iter().cloned(), &mut state.orders);
                    },
                    OrderAction::SelectOrder { id } => state.selected = Some(id.clone()),
                    _ => {},
                }
            },
            AppAction::Account(AccountAction::LogoutUser) => *state = OrderState::default(),
            _ => {},
        }
    }
}

/// Selectors over the order slice
pub mod selectors {
    use super::ORDERS;
    use crate::app::AppState;
    use crate::models::Order;
    use storefront_core::error::HttpError;

    /// Orders in load order
    #[must_use]
    pub fn orders(state: &AppState) -> Vec<Order> {
        ORDERS.select_all(&state.orders.orders)
    }

    /// The selected order
    #[must_use]
    pub fn selected_order(state: &AppState) -> Option<Order> {
        let id = state.orders.selected.as_deref()?;
        ORDERS.select_by_id(id, &state.orders.orders)
    }

    /// Whether orders are loading
    #[must_use]
    pub const fn orders_loading(state: &AppState) -> bool {
        state.orders.loading
    }

    /// Last order failure
    #[must_use]
    pub fn orders_error(state: &AppState) -> Option<HttpError> {
        state.orders.error.clone()
    }
}
