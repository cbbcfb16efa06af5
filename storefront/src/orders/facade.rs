use super::{OrderAction, selectors};
use crate::app::AppStore;
use crate::models::Order;
use storefront_core::error::HttpError;
use storefront_core::selector::Selection;

/// Order history views
#[derive(Clone)]
pub struct OrderFacade {
    store: AppStore,
}

impl OrderFacade {
    /// Facade over `store`
    #[must_use]
    pub const fn new(store: AppStore) -> Self {
        Self { store }
    }

    /// Loaded orders
    #[must_use]
    pub fn orders(&self) -> Selection<Vec<Order>> {
        self.store.select(selectors::orders)
    }

    /// The selected order
    #[must_use]
    pub fn selected_order(&self) -> Selection<Option<Order>> {
        self.store.select(selectors::selected_order)
    }

    /// Whether orders are loading
    #[must_use]
    pub fn orders_loading(&self) -> Selection<bool> {
        self.store.select(selectors::orders_loading)
    }

    /// Last order failure
    #[must_use]
    pub fn orders_error(&self) -> Selection<Option<HttpError>> {
        self.store.select(selectors::orders_error)
    }

    /// Load the order history; return requests of the orders follow
    pub fn load_orders(&self) {
        self.store.dispatch(OrderAction::LoadOrders.into());
    }

    /// Show an order in detail
    pub fn select_order(&self, id: impl Into<String>) {
        self.store.dispatch(OrderAction::SelectOrder { id: id.into() }.into());
    }
}
