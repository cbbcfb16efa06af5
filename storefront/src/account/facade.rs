use super::{AccountAction, selectors};
use crate::app::AppStore;
use crate::command::require;
use crate::models::{Credentials, Customer, PasswordChange, Registration, User};
use storefront_core::error::{HttpError, ValidationError};
use storefront_core::selector::Selection;

/// Session and profile commands and views
#[derive(Clone)]
pub struct AccountFacade {
    store: AppStore,
}

impl AccountFacade {
    /// Facade over `store`
    #[must_use]
    pub const fn new(store: AppStore) -> Self {
        Self { store }
    }

    /// The logged in user
    #[must_use]
    pub fn user(&self) -> Selection<Option<User>> {
        self.store.select(selectors::logged_in_user)
    }

    /// The logged in customer
    #[must_use]
    pub fn customer(&self) -> Selection<Option<Customer>> {
        self.store.select(selectors::logged_in_customer)
    }

    /// Whether a user is logged in
    #[must_use]
    pub fn is_logged_in(&self) -> Selection<bool> {
        self.store.select(selectors::is_user_logged_in)
    }

    /// Whether an account request is in flight
    #[must_use]
    pub fn user_loading(&self) -> Selection<bool> {
        self.store.select(selectors::user_loading)
    }

    /// Last account failure
    #[must_use]
    pub fn user_error(&self) -> Selection<Option<HttpError>> {
        self.store.select(selectors::user_error)
    }

    /// Log in
    ///
    /// An `authentication-token` issued with the customer response becomes
    /// the session token.
    ///
    /// # Errors
    ///
    /// Rejects blank login or password.
    pub fn login_user(&self, credentials: Credentials) -> Result<(), ValidationError> {
        require("login_user", "login", &credentials.login)?;
        require("login_user", "password", &credentials.password)?;
        self.store.dispatch(AccountAction::LoginUser { credentials }.into());
        Ok(())
    }

    /// Restore a session from a stored token
    ///
    /// # Errors
    ///
    /// Rejects a blank token.
    pub fn load_user_by_api_token(&self, api_token: &str) -> Result<(), ValidationError> {
        require("load_user_by_api_token", "api_token", api_token)?;
        self.store.dispatch(
            AccountAction::LoadUserByApiToken {
                api_token: api_token.to_string(),
            }
            .into(),
        );
        Ok(())
    }

    /// Remember a session token received out of band
    pub fn set_api_token(&self, api_token: impl Into<String>) {
        self.store.dispatch(
            AccountAction::SetApiToken {
                api_token: api_token.into(),
            }
            .into(),
        );
    }

    /// Log out
    pub fn logout_user(&self) {
        self.store.dispatch(AccountAction::LogoutUser.into());
    }

    /// Register a customer and log in as its user
    ///
    /// # Errors
    ///
    /// Rejects a registration without login or password.
    pub fn create_user(&self, registration: Registration) -> Result<(), ValidationError> {
        require("create_user", "login", &registration.credentials.login)?;
        require("create_user", "password", &registration.credentials.password)?;
        self.store.dispatch(AccountAction::CreateUser { registration }.into());
        Ok(())
    }

    /// Update the profile of the logged in user
    pub fn update_user(&self, user: User) {
        self.store.dispatch(AccountAction::UpdateUser { user }.into());
    }

    /// Change the password of the logged in user
    ///
    /// # Errors
    ///
    /// Rejects blank passwords.
    pub fn update_user_password(&self, password: &str, current_password: &str) -> Result<(), ValidationError> {
        require("update_user_password", "password", password)?;
        require("update_user_password", "current_password", current_password)?;
        let change = PasswordChange {
            password: password.to_string(),
            current_password: current_password.to_string(),
        };
        self.store.dispatch(AccountAction::UpdateUserPassword { change }.into());
        Ok(())
    }

    /// Update the company data of a business customer
    ///
    /// # Errors
    ///
    /// Rejects a customer without customer number.
    pub fn update_customer(&self, customer: Customer) -> Result<(), ValidationError> {
        require("update_customer", "customer_no", &customer.customer_no)?;
        self.store.dispatch(AccountAction::UpdateCustomer { customer }.into());
        Ok(())
    }

    /// Forget the last account error
    pub fn reset_user_error(&self) {
        self.store.dispatch(AccountAction::UserErrorReset.into());
    }
}
