//! Recurring orders of the customer, or of one of its users.
//!
//! Every call needs the customer and the user, so the effects wait until the
//! session knows both before talking to the API.

mod effects;
mod facade;

pub use effects::{RECURRING_ORDER_MEDIA_TYPE, register_effects};
pub use facade::RecurringOrdersFacade;

use crate::account::AccountAction;
use crate::app::AppAction;
use crate::models::RecurringOrder;
use storefront_core::prelude::*;
use storefront_macros::Action;

/// Context in which a business customer administrates all recurring orders
pub const ADMIN_CONTEXT: &str = "ADMIN";

/// Recurring order actions.
///
/// `context` selects whose recurring orders are meant; see
/// [`ADMIN_CONTEXT`].
#[derive(Action, Clone, Debug, PartialEq)]
pub enum RecurringOrderAction {
    /// Load all recurring orders
    #[intent("[Recurring Orders] Load Recurring Orders")]
    LoadRecurringOrders {
        /// Listing context
        context: Option<String>,
    },

    /// Recurring orders loaded
    #[success("[Recurring Orders API] Load Recurring Orders Success")]
    LoadRecurringOrdersSuccess {
        /// Loaded recurring orders
        recurring_orders: Vec<RecurringOrder>,
    },

    /// Recurring orders could not be loaded
    #[failure("[Recurring Orders API] Load Recurring Orders Fail")]
    LoadRecurringOrdersFail {
        /// Cause
        error: HttpError,
    },

    /// Load one recurring order and select it
    #[intent("[Recurring Orders] Load Recurring Order")]
    LoadRecurringOrder {
        /// Recurring order id
        id: String,
        /// Listing context
        context: Option<String>,
    },

    /// Recurring order loaded
    #[success("[Recurring Orders API] Load Recurring Order Success")]
    LoadRecurringOrderSuccess {
        /// The recurring order
        recurring_order: RecurringOrder,
    },

    /// Recurring order could not be loaded
    #[failure("[Recurring Orders API] Load Recurring Order Fail")]
    LoadRecurringOrderFail {
        /// Cause
        error: HttpError,
    },

    /// Pause or resume a recurring order
    #[intent("[Recurring Orders] Update Recurring Order")]
    UpdateRecurringOrder {
        /// Recurring order id
        id: String,
        /// Whether the schedule should run
        active: bool,
        /// Listing context
        context: Option<String>,
    },

    /// Recurring order updated
    #[success("[Recurring Orders API] Update Recurring Order Success")]
    UpdateRecurringOrderSuccess {
        /// The recurring order as stored by the backend
        recurring_order: RecurringOrder,
    },

    /// Recurring order could not be updated
    #[failure("[Recurring Orders API] Update Recurring Order Fail")]
    UpdateRecurringOrderFail {
        /// Cause
        error: HttpError,
    },

    /// Delete a recurring order
    #[intent("[Recurring Orders] Delete Recurring Order")]
    DeleteRecurringOrder {
        /// Recurring order id
        id: String,
        /// Listing context
        context: Option<String>,
    },

    /// Recurring order deleted
    #[success("[Recurring Orders API] Delete Recurring Order Success")]
    DeleteRecurringOrderSuccess {
        /// Recurring order id
        id: String,
    },

    /// Recurring order could not be deleted
    #[failure("[Recurring Orders API] Delete Recurring Order Fail")]
    DeleteRecurringOrderFail {
        /// Cause
        error: HttpError,
    },
}

/// Recurring orders keyed by id
pub const RECURRING_ORDERS: EntityAdapter<RecurringOrder> = EntityAdapter::new();

/// Recurring order slice
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecurringOrderState {
    /// Known recurring orders
    pub recurring_orders: EntityState<RecurringOrder>,
    /// Id of the selected recurring order
    pub selected: Option<String>,
    /// A request is in flight
    pub loading: bool,
    /// Last failure
    pub error: Option<HttpError>,
}

storefront_core::impl_loadable!(RecurringOrderState);

/// Reducer for [`RecurringOrderState`]
pub struct RecurringOrderReducer;

impl Reducer for RecurringOrderReducer {
    type State = RecurringOrderState;
    type Action = AppAction;

    fn reduce(&self, state: &mut RecurringOrderState, action: &AppAction) {
        match action {
            AppAction::RecurringOrder(action) => reduce_recurring_order(state, action),
            AppAction::Account(AccountAction::LogoutUser) => *state = RecurringOrderState::default(),
            _ => {},
        }
    }
}

fn reduce_recurring_order(state: &mut RecurringOrderState, action: &RecurringOrderAction) {
    track_request(state, action);

    match action {
        RecurringOrderAction::LoadRecurringOrdersSuccess { recurring_orders } => {
            RECURRING_ORDERS.set_all(recurring_orders.iter().cloned(), &mut state.recurring_orders);
        },
        RecurringOrderAction::LoadRecurringOrder { id, .. } => state.selected = Some(id.clone()),
        RecurringOrderAction::LoadRecurringOrderSuccess { recurring_order }
        | RecurringOrderAction::UpdateRecurringOrderSuccess { recurring_order } => {
            RECURRING_ORDERS.add_one(recurring_order.clone(), &mut state.recurring_orders);
        },
        RecurringOrderAction::DeleteRecurringOrderSuccess { id } => {
            RECURRING_ORDERS.remove_one(id, &mut state.recurring_orders);
            if state.selected.as_ref() == Some(id) {
                state.selected = None;
            }
        },
        _ => {},
    }
}

/// Selectors over the recurring order slice
pub mod selectors {
    use super::RECURRING_ORDERS;
    use crate::app::AppState;
    use crate::models::RecurringOrder;
    use storefront_core::error::HttpError;

    /// All known recurring orders
    #[must_use]
    pub fn recurring_orders(state: &AppState) -> Vec<RecurringOrder> {
        RECURRING_ORDERS.select_all(&state.recurring_orders.recurring_orders)
    }

    /// The selected recurring order
    #[must_use]
    pub fn selected_recurring_order(state: &AppState) -> Option<RecurringOrder> {
        let id = state.recurring_orders.selected.as_deref()?;
        RECURRING_ORDERS.select_by_id(id, &state.recurring_orders.recurring_orders)
    }

    /// Whether a recurring order call is in flight
    #[must_use]
    pub const fn recurring_orders_loading(state: &AppState) -> bool {
        state.recurring_orders.loading
    }

    /// Last recurring order failure
    #[must_use]
    pub fn recurring_orders_error(state: &AppState) -> Option<HttpError> {
        state.recurring_orders.error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recurring_order(id: &str, active: bool) -> RecurringOrder {
        RecurringOrder {
            id: id.to_string(),
            number: format!("RO-{id}"),
            active,
            ..RecurringOrder::default()
        }
    }

    fn reduce(state: &mut RecurringOrderState, action: RecurringOrderAction) {
        RecurringOrderReducer.reduce(state, &action.into());
    }

    #[test]
    fn test_update_replaces_entity() {
        let mut state = RecurringOrderState::default();
        reduce(
            &mut state,
            RecurringOrderAction::LoadRecurringOrdersSuccess {
                recurring_orders: vec![recurring_order("R1", true), recurring_order("R2", true)],
            },
        );
        reduce(
            &mut state,
            RecurringOrderAction::UpdateRecurringOrder {
                id: "R1".to_string(),
                active: false,
                context: None,
            },
        );
        assert!(state.loading);

        reduce(
            &mut state,
            RecurringOrderAction::UpdateRecurringOrderSuccess {
                recurring_order: recurring_order("R1", false),
            },
        );

        assert!(!state.loading);
        assert_eq!(state.recurring_orders.get("R1").map(|r| r.active), Some(false));
        assert_eq!(state.recurring_orders.ids(), ["R1".to_string(), "R2".to_string()]);
    }

    #[test]
    fn test_delete_of_selected_clears_selection() {
        let mut state = RecurringOrderState::default();
        reduce(
            &mut state,
            RecurringOrderAction::LoadRecurringOrder {
                id: "R1".to_string(),
                context: None,
            },
        );
        reduce(
            &mut state,
            RecurringOrderAction::LoadRecurringOrderSuccess {
                recurring_order: recurring_order("R1", true),
            },
        );
        assert_eq!(state.selected.as_deref(), Some("R1"));

        reduce(&mut state, RecurringOrderAction::DeleteRecurringOrderSuccess { id: "R1".to_string() });

        assert_eq!(state.selected, None);
        assert!(state.recurring_orders.is_empty());
    }
}
