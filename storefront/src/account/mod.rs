//! Session and profile of the current user.
//!
//! Logging in resolves both the customer and the user; logging out resets
//! this slice and every slice holding personal data.

mod effects;
mod facade;

pub use effects::{LoginEffect, basic_authorization, register_effects};
pub use facade::AccountFacade;

use crate::app::AppAction;
use crate::models::{Credentials, Customer, PasswordChange, Registration, User};
use storefront_core::prelude::*;
use storefront_macros::Action;

/// Account actions
#[derive(Action, Clone, Debug, PartialEq)]
pub enum AccountAction {
    /// Log in with credentials
    #[intent("[Account] Login User")]
    LoginUser {
        /// Login and password
        credentials: Credentials,
    },

    /// Customer and user resolved
    #[success("[Account API] Login User Success")]
    LoginUserSuccess {
        /// Logged in customer
        customer: Customer,
        /// Logged in user
        user: User,
        /// `authentication-token` issued with the login, if any
        api_token: Option<String>,
    },

    /// Login rejected
    #[failure("[Account API] Login User Failed")]
    LoginUserFail {
        /// Cause
        error: HttpError,
    },

    /// Remember the session token
    #[event("[Account Internal] Set API Token")]
    SetApiToken {
        /// Token sent as `authentication-token`
        api_token: String,
    },

    /// Reload the business user
    #[intent("[Account Internal] Load Company User")]
    LoadCompanyUser,

    /// Business user loaded
    #[success("[Account API] Load Company User Success")]
    LoadCompanyUserSuccess {
        /// The user
        user: User,
    },

    /// Business user could not be loaded
    #[failure("[Account API] Load Company User Fail")]
    LoadCompanyUserFail {
        /// Cause
        error: HttpError,
    },

    /// End the session
    #[event("[Account] Logout User")]
    LogoutUser,

    /// Register a new customer; logs in on success
    #[intent("[Account] Create User")]
    CreateUser {
        /// Customer, user and credentials
        registration: Registration,
    },

    /// Registration rejected
    #[failure("[Account API] Create User Failed")]
    CreateUserFail {
        /// Cause
        error: HttpError,
    },

    /// Update the profile of the logged in user
    #[intent("[Account] Update User")]
    UpdateUser {
        /// The new profile
        user: User,
    },

    /// Profile updated
    #[success("[Account API] Update User Succeeded")]
    UpdateUserSuccess {
        /// Profile as stored by the backend
        user: User,
    },

    /// Profile update rejected
    #[failure("[Account API] Update User Failed")]
    UpdateUserFail {
        /// Cause
        error: HttpError,
    },

    /// Change the password of the logged in user
    #[intent("[Account] Update User Password")]
    UpdateUserPassword {
        /// New and current password
        change: PasswordChange,
    },

    /// Password changed
    #[success("[Account API] Update User Password Succeeded")]
    UpdateUserPasswordSuccess,

    /// Password change rejected
    #[failure("[Account API] Update User Password Failed")]
    UpdateUserPasswordFail {
        /// Cause
        error: HttpError,
    },

    /// Update the company data of a business customer
    #[intent("[Account] Update Customer")]
    UpdateCustomer {
        /// The new customer data
        customer: Customer,
    },

    /// Customer updated
    #[success("[Account API] Update Customer Succeeded")]
    UpdateCustomerSuccess {
        /// Customer as stored by the backend
        customer: Customer,
    },

    /// Customer update rejected
    #[failure("[Account API] Update Customer Failed")]
    UpdateCustomerFail {
        /// Cause
        error: HttpError,
    },

    /// Forget the last error
    #[event("[Account Internal] Reset User Error")]
    UserErrorReset,

    /// Restore a session from a stored token
    #[intent("[Account] Load User by API Token")]
    LoadUserByApiToken {
        /// Token of the session to restore
        api_token: String,
    },
}

/// Session slice
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserState {
    /// Customer of the session
    pub customer: Option<Customer>,
    /// User of the session
    pub user: Option<User>,
    /// Whether login succeeded
    pub authorized: bool,
    /// Session token
    pub api_token: Option<String>,
    /// A request is in flight
    pub loading: bool,
    /// Last failure
    pub error: Option<HttpError>,
}

storefront_core::impl_loadable!(UserState);

/// Reducer for [`UserState`]
pub struct UserReducer;

impl Reducer for UserReducer {
    type State = UserState;
    type Action = AppAction;

    fn reduce(&self, state: &mut UserState, action: &AppAction) {
        if let AppAction::Account(action) = action {
            reduce_account(state, action);
        }
    }
}

fn reduce_account(state: &mut UserState, action: &AccountAction) {
    track_request(state, action);

    match action {
        AccountAction::LoginUser { .. } => {
            state.customer = None;
            state.user = None;
            state.authorized = false;
        },
        AccountAction::LoginUserSuccess { customer, user, api_token } => {
            state.customer = Some(customer.clone());
            state.user = Some(user.clone());
            state.authorized = true;
            if let Some(api_token) = api_token {
                state.api_token = Some(api_token.clone());
            }
        },
        AccountAction::SetApiToken { api_token } | AccountAction::LoadUserByApiToken { api_token } => {
            state.api_token = Some(api_token.clone());
        },
        AccountAction::LoadCompanyUserSuccess { user } | AccountAction::UpdateUserSuccess { user } => {
            state.user = Some(user.clone());
        },
        AccountAction::UpdateCustomerSuccess { customer } => {
            state.customer = Some(customer.clone());
        },
        AccountAction::LogoutUser => *state = UserState::default(),
        AccountAction::UserErrorReset => reset_error(state),
        _ => {},
    }
}

/// Selectors over the session slice
pub mod selectors {
    use crate::app::AppState;
    use crate::models::{Customer, User};
    use storefront_core::error::HttpError;

    /// Customer of the session
    #[must_use]
    pub fn logged_in_customer(state: &AppState) -> Option<Customer> {
        state.user.customer.clone()
    }

    /// User of the session
    #[must_use]
    pub fn logged_in_user(state: &AppState) -> Option<User> {
        state.user.user.clone()
    }

    /// Whether a user is logged in
    #[must_use]
    pub const fn is_user_logged_in(state: &AppState) -> bool {
        state.user.authorized
    }

    /// Whether the session belongs to a business customer
    #[must_use]
    pub fn is_business_customer(state: &AppState) -> bool {
        state
            .user
            .customer
            .as_ref()
            .is_some_and(|customer| customer.is_business_customer)
    }

    /// Customer and user, once both are known
    #[must_use]
    pub fn customer_and_user(state: &AppState) -> Option<(&Customer, &User)> {
        Some((state.user.customer.as_ref()?, state.user.user.as_ref()?))
    }

    /// Whether an account request is in flight
    #[must_use]
    pub const fn user_loading(state: &AppState) -> bool {
        state.user.loading
    }

    /// Last account failure
    #[must_use]
    pub fn user_error(state: &AppState) -> Option<HttpError> {
        state.user.error.clone()
    }
}
