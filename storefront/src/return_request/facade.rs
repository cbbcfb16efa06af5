use super::{ReturnRequestAction, selectors};
use crate::app::AppStore;
use crate::command::{require, require_any};
use crate::models::{ReturnRequest, ReturnRequestBody, ReturnablePosition, SelectOption};
use storefront_core::error::{HttpError, ValidationError};
use storefront_core::selector::Selection;

/// Return request commands and views
#[derive(Clone)]
pub struct ReturnRequestFacade {
    store: AppStore,
}

impl ReturnRequestFacade {
    /// Facade over `store`
    #[must_use]
    pub const fn new(store: AppStore) -> Self {
        Self { store }
    }

    /// All known return requests
    #[must_use]
    pub fn return_requests(&self) -> Selection<Vec<ReturnRequest>> {
        self.store.select(selectors::return_requests)
    }

    /// Return requests filed against one order
    #[must_use]
    pub fn order_return_requests(&self, order_id: &str) -> Selection<Vec<ReturnRequest>> {
        self.store.select(selectors::return_requests_of(order_id.to_string()))
    }

    /// Selectable return reasons
    #[must_use]
    pub fn reasons(&self) -> Selection<Vec<SelectOption>> {
        self.store.select(selectors::reasons)
    }

    /// Returnable positions of the last inspected order
    #[must_use]
    pub fn returnable_items(&self) -> Selection<Vec<ReturnablePosition>> {
        self.store.select(selectors::returnable_items)
    }

    /// Whether a return request call is in flight
    #[must_use]
    pub fn loading(&self) -> Selection<bool> {
        self.store.select(selectors::return_requests_loading)
    }

    /// Last return request failure
    #[must_use]
    pub fn error(&self) -> Selection<Option<HttpError>> {
        self.store.select(selectors::return_request_error)
    }

    /// Load the selectable return reasons
    pub fn load_reasons(&self) {
        self.store.dispatch(ReturnRequestAction::LoadOrderReturnReasons.into());
    }

    /// Load what can still be returned from an order
    ///
    /// # Errors
    ///
    /// Rejects a blank order id.
    pub fn load_returnable_items(&self, order_id: &str) -> Result<(), ValidationError> {
        require("load_returnable_items", "order_id", order_id)?;
        self.store.dispatch(
            ReturnRequestAction::LoadOrderReturnableItems {
                order_id: order_id.to_string(),
            }
            .into(),
        );
        Ok(())
    }

    /// Load the return requests of `order_ids`
    ///
    /// # Errors
    ///
    /// Rejects an empty id list.
    pub fn load_return_requests(&self, order_ids: Vec<String>) -> Result<(), ValidationError> {
        require_any("load_return_requests", "order_ids", &order_ids)?;
        self.store
            .dispatch(ReturnRequestAction::LoadOrderReturnRequests { order_ids }.into());
        Ok(())
    }

    /// File a return request
    ///
    /// # Errors
    ///
    /// Rejects a blank order id or a body without items.
    pub fn create_return_request(&self, order_id: &str, body: ReturnRequestBody) -> Result<(), ValidationError> {
        require("create_return_request", "order_id", order_id)?;
        require_any("create_return_request", "items", &body.items)?;
        self.store.dispatch(
            ReturnRequestAction::CreateReturnRequest {
                order_id: order_id.to_string(),
                body,
            }
            .into(),
        );
        Ok(())
    }
}
