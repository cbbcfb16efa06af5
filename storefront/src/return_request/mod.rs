//! Return requests filed against orders.
//!
//! Request ids repeat across orders, so the collection is keyed by
//! `"{order_id}_{id}"`.

mod effects;
mod facade;

pub use effects::register_effects;
pub use facade::ReturnRequestFacade;

use crate::account::AccountAction;
use crate::app::AppAction;
use crate::models::{ReturnRequest, ReturnRequestBody, ReturnablePosition, SelectOption};
use storefront_core::prelude::*;
use storefront_macros::Action;

/// Return request actions
#[derive(Action, Clone, Debug, PartialEq)]
pub enum ReturnRequestAction {
    /// Load the selectable return reasons
    #[intent("[Return Request] Load Order Return Reasons")]
    LoadOrderReturnReasons,

    /// Reasons loaded
    #[success("[Return Request API] Load Order Return Reasons Success")]
    LoadOrderReturnReasonsSuccess {
        /// Selectable reasons
        reasons: Vec<SelectOption>,
    },

    /// Reasons could not be loaded
    #[failure("[Return Request API] Load Order Return Reasons Fail")]
    LoadOrderReturnReasonsFail {
        /// Cause
        error: HttpError,
    },

    /// Load the positions of an order that can still be returned
    #[intent("[Return Request] Load Order Returnable Items")]
    LoadOrderReturnableItems {
        /// Order id
        order_id: String,
    },

    /// Returnable positions loaded
    #[success("[Return Request API] Load Order Returnable Items Success")]
    LoadOrderReturnableItemsSuccess {
        /// Returnable positions
        items: Vec<ReturnablePosition>,
    },

    /// Returnable positions could not be loaded
    #[failure("[Return Request API] Load Order Returnable Items Fail")]
    LoadOrderReturnableItemsFail {
        /// Cause
        error: HttpError,
    },

    /// Load the return requests of some orders
    #[intent("[Return Request] Load Order Return Requests")]
    LoadOrderReturnRequests {
        /// Order ids
        order_ids: Vec<String>,
    },

    /// Return requests loaded
    #[success("[Return Request API] Load Order Return Requests Success")]
    LoadOrderReturnRequestsSuccess {
        /// Requests of all requested orders
        return_requests: Vec<ReturnRequest>,
    },

    /// Return requests could not be loaded
    #[failure("[Return Request API] Load Order Return Requests Fail")]
    LoadOrderReturnRequestsFail {
        /// Cause
        error: HttpError,
    },

    /// File a return request
    #[intent("[Return Request] Create Return Request")]
    CreateReturnRequest {
        /// Order to return from
        order_id: String,
        /// Returned positions
        body: ReturnRequestBody,
    },

    /// Return request filed
    #[success("[Return Request API] Create Return Request Success")]
    CreateReturnRequestSuccess {
        /// The new request
        return_request: ReturnRequest,
    },

    /// Return request could not be filed
    #[failure("[Return Request API] Create Return Request Fail")]
    CreateReturnRequestFail {
        /// Cause
        error: HttpError,
    },
}

/// Key of a return request within the collection
#[must_use]
pub fn return_request_key(request: &ReturnRequest) -> String {
    format!("{}_{}", request.order_id, request.id)
}

/// Return requests keyed by order and request id
pub const RETURN_REQUESTS: EntityAdapter<ReturnRequest> = EntityAdapter::with_select_id(return_request_key);

/// Return request slice
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnRequestState {
    /// Known return requests
    pub requests: EntityState<ReturnRequest>,
    /// Selectable return reasons
    pub reasons: Vec<SelectOption>,
    /// Returnable positions of the last inspected order
    pub returnable_items: Vec<ReturnablePosition>,
    /// A request is in flight
    pub loading: bool,
    /// Last failure
    pub error: Option<HttpError>,
}

storefront_core::impl_loadable!(ReturnRequestState);

/// Reducer for [`ReturnRequestState`]
pub struct ReturnRequestReducer;

impl Reducer for ReturnRequestReducer {
    type State = ReturnRequestState;
    type Action = AppAction;

    fn reduce(&self, state: &mut ReturnRequestState, action: &AppAction) {
        match action {
            AppAction::ReturnRequest(action) => reduce_return_request(state, action),
            AppAction::Account(AccountAction::LogoutUser) => *state = ReturnRequestState::default(),
            _ => {},
        }
    }
}

fn reduce_return_request(state: &mut ReturnRequestState, action: &ReturnRequestAction) {
    track_request(state, action);

    match action {
        ReturnRequestAction::LoadOrderReturnReasonsSuccess { reasons } => state.reasons.clone_from(reasons),
        ReturnRequestAction::LoadOrderReturnableItems { .. } => state.returnable_items.clear(),
        ReturnRequestAction::LoadOrderReturnableItemsSuccess { items } => state.returnable_items.clone_from(items),
        ReturnRequestAction::LoadOrderReturnRequestsSuccess { return_requests } => {
            RETURN_REQUESTS.add_many(return_requests.iter().cloned(), &mut state.requests);
        },
        ReturnRequestAction::CreateReturnRequestSuccess { return_request } => {
            RETURN_REQUESTS.add_one(return_request.clone(), &mut state.requests);
        },
        _ => {},
    }
}

/// Selectors over the return request slice
pub mod selectors {
    use super::RETURN_REQUESTS;
    use crate::app::AppState;
    use crate::models::{ReturnRequest, ReturnablePosition, SelectOption};
    use storefront_core::error::HttpError;

    /// All known return requests
    #[must_use]
    pub fn return_requests(state: &AppState) -> Vec<ReturnRequest> {
        RETURN_REQUESTS.select_all(&state.return_requests.requests)
    }

    /// Return requests of one order
    #[must_use]
    pub fn return_requests_of(order_id: String) -> impl Fn(&AppState) -> Vec<ReturnRequest> + Send + Sync + 'static {
        move |state| {
            state
                .return_requests
                .requests
                .iter()
                .filter(|request| request.order_id == order_id)
                .cloned()
                .collect()
        }
    }

    /// Selectable return reasons
    #[must_use]
    pub fn reasons(state: &AppState) -> Vec<SelectOption> {
        state.return_requests.reasons.clone()
    }

    /// Returnable positions of the last inspected order
    #[must_use]
    pub fn returnable_items(state: &AppState) -> Vec<ReturnablePosition> {
        state.return_requests.returnable_items.clone()
    }

    /// Whether a return request call is in flight
    #[must_use]
    pub const fn return_requests_loading(state: &AppState) -> bool {
        state.return_requests.loading
    }

    /// Last return request failure
    #[must_use]
    pub fn return_request_error(state: &AppState) -> Option<HttpError> {
        state.return_requests.error.clone()
    }
}
