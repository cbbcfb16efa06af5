use super::{RecurringOrderAction, selectors};
use crate::app::AppStore;
use crate::command::require;
use crate::models::RecurringOrder;
use storefront_core::error::{HttpError, ValidationError};
use storefront_core::selector::Selection;

/// Recurring order commands and views.
///
/// Commands may be issued before login completes; the calls go out once the
/// customer and user are known.
#[derive(Clone)]
pub struct RecurringOrdersFacade {
    store: AppStore,
}

impl RecurringOrdersFacade {
    /// Facade over `store`
    #[must_use]
    pub const fn new(store: AppStore) -> Self {
        Self { store }
    }

    /// All known recurring orders
    #[must_use]
    pub fn recurring_orders(&self) -> Selection<Vec<RecurringOrder>> {
        self.store.select(selectors::recurring_orders)
    }

    /// The selected recurring order
    #[must_use]
    pub fn selected_recurring_order(&self) -> Selection<Option<RecurringOrder>> {
        self.store.select(selectors::selected_recurring_order)
    }

    /// Whether a recurring order call is in flight
    #[must_use]
    pub fn recurring_orders_loading(&self) -> Selection<bool> {
        self.store.select(selectors::recurring_orders_loading)
    }

    /// Last recurring order failure
    #[must_use]
    pub fn recurring_orders_error(&self) -> Selection<Option<HttpError>> {
        self.store.select(selectors::recurring_orders_error)
    }

    /// Load the recurring orders visible in `context`
    pub fn load_recurring_orders(&self, context: Option<&str>) {
        self.store.dispatch(
            RecurringOrderAction::LoadRecurringOrders {
                context: context.map(str::to_string),
            }
            .into(),
        );
    }

    /// Load and select one recurring order
    ///
    /// # Errors
    ///
    /// Rejects a blank id.
    pub fn load_recurring_order(&self, id: &str, context: Option<&str>) -> Result<(), ValidationError> {
        require("load_recurring_order", "recurring_order_id", id)?;
        self.store.dispatch(
            RecurringOrderAction::LoadRecurringOrder {
                id: id.to_string(),
                context: context.map(str::to_string),
            }
            .into(),
        );
        Ok(())
    }

    /// Pause or resume a recurring order
    ///
    /// # Errors
    ///
    /// Rejects a blank id.
    pub fn update_recurring_order(&self, id: &str, active: bool, context: Option<&str>) -> Result<(), ValidationError> {
        require("update_recurring_order", "recurring_order_id", id)?;
        self.store.dispatch(
            RecurringOrderAction::UpdateRecurringOrder {
                id: id.to_string(),
                active,
                context: context.map(str::to_string),
            }
            .into(),
        );
        Ok(())
    }

    /// Delete a recurring order
    ///
    /// # Errors
    ///
    /// Rejects a blank id.
    pub fn delete_recurring_order(&self, id: &str, context: Option<&str>) -> Result<(), ValidationError> {
        require("delete_recurring_order", "recurring_order_id", id)?;
        self.store.dispatch(
            RecurringOrderAction::DeleteRecurringOrder {
                id: id.to_string(),
                context: context.map(str::to_string),
            }
            .into(),
        );
        Ok(())
    }
}
