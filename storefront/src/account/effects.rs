//! Account effects.
//!
//! | effect                        | policy |
//! |-------------------------------|--------|
//! | `account.login`               | switch |
//! | `account.load_by_api_token`   | switch |
//! | `account.load_company_user`   | switch |
//! | `account.create_user`         | concat |
//! | `account.update_user`         | concat |
//! | `account.update_password`     | concat |
//! | `account.update_customer`     | concat |

use super::AccountAction;
use crate::api::{AUTHENTICATION_TOKEN, session_options, unavailable};
use crate::app::{AppAction, AppRuntime, AppState};
use crate::models::{Credentials, Customer, User};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::Value;
use storefront_core::prelude::*;
use storefront_runtime::StoreError;

/// Register the account effects
///
/// # Errors
///
/// Returns [`StoreError::ShutdownInProgress`] once the store is shut down.
pub fn register_effects<Api: ApiService>(runtime: &AppRuntime, api: &Api) -> Result<(), StoreError> {
    runtime.register(LoginEffect::new(api.clone()))?;
    runtime.register(load_user_by_api_token(api.clone()))?;
    runtime.register(load_company_user(api.clone()))?;
    runtime.register(create_user(api.clone()))?;
    runtime.register(update_user(api.clone()))?;
    runtime.register(update_user_password(api.clone()))?;
    runtime.register(update_customer(api.clone()))
}

/// `Authorization` header value for credentials
#[must_use]
pub fn basic_authorization(credentials: &Credentials) -> String {
    let encoded = STANDARD.encode(format!("{}:{}", credentials.login, credentials.password));
    format!("BASIC {encoded}")
}

struct SignedIn {
    customer: Customer,
    user: User,
    api_token: Option<String>,
}

/// Resolve customer and user with the given authorization.
///
/// The `authentication-token` issued with the customer response becomes the
/// session token for later requests.
async fn sign_in<Api: ApiService>(api: &Api, options: RequestOptions) -> Result<SignedIn, HttpError> {
    let (customer, api_token): (Customer, _) =
        api.get_with_header("customers/-", options.clone(), AUTHENTICATION_TOKEN).await?;
    let user: User = api.get("customers/-/users/-", options).await?;
    Ok(SignedIn { customer, user, api_token })
}

fn login_outcome(result: Result<SignedIn, HttpError>) -> AppAction {
    AppAction::Account(result.into_action(
        |SignedIn { customer, user, api_token }| AccountAction::LoginUserSuccess { customer, user, api_token },
        |error| AccountAction::LoginUserFail { error },
    ))
}

/// Log in with Basic authorization.
///
/// A newer login attempt supersedes an older one.
pub struct LoginEffect<Api> {
    api: Api,
}

impl<Api: ApiService> LoginEffect<Api> {
    /// Create the effect
    #[must_use]
    pub const fn new(api: Api) -> Self {
        Self { api }
    }
}

impl<Api: ApiService> Effect for LoginEffect<Api> {
    type State = AppState;
    type Action = AppAction;

    fn name(&self) -> &'static str {
        "account.login"
    }

    fn policy(&self) -> Policy {
        Policy::Switch
    }

    fn accepts(&self, action: &AppAction) -> bool {
        matches!(action, AppAction::Account(AccountAction::LoginUser { .. }))
    }

    fn run(&self, action: AppAction, _state: StateSnapshots<AppState>) -> EffectFuture<AppAction> {
        let api = self.api.clone();
        async_effect! {
            let AppAction::Account(AccountAction::LoginUser { credentials }) = action else {
                return None;
            };
            tracing::debug!(login = %credentials.login, "Signing in");

            let options = RequestOptions::new().with_header("Authorization", basic_authorization(&credentials));
            Some(login_outcome(sign_in(&api, options).await))
        }
    }
}

fn load_user_by_api_token<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "account.load_by_api_token",
        Policy::Switch,
        |action: &AppAction| matches!(action, AppAction::Account(AccountAction::LoadUserByApiToken { .. })),
        move |action: AppAction, _state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::Account(AccountAction::LoadUserByApiToken { api_token }) = action else {
                    return None;
                };
                let options = RequestOptions::new().with_header(AUTHENTICATION_TOKEN, api_token);
                Some(login_outcome(sign_in(&api, options).await))
            }
        },
    )
}

fn load_company_user<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "account.load_company_user",
        Policy::Switch,
        |action: &AppAction| matches!(action, AppAction::Account(AccountAction::LoadCompanyUser)),
        move |_action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let options = session_options(&state.current());
                let outcome: AccountAction = api_call! {
                    call: api.get::<User>("customers/-/users/-", options),
                    on_success: |user| AccountAction::LoadCompanyUserSuccess { user },
                    on_error: |error| AccountAction::LoadCompanyUserFail { error }
                };
                Some(AppAction::Account(outcome))
            }
        },
    )
}

fn create_user<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "account.create_user",
        Policy::Concat,
        |action: &AppAction| matches!(action, AppAction::Account(AccountAction::CreateUser { .. })),
        move |action: AppAction, _state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::Account(AccountAction::CreateUser { registration }) = action else {
                    return None;
                };
                let created: Result<Value, HttpError> =
                    api.post("customers", &registration, RequestOptions::new()).await;
                let outcome = match created {
                    Ok(_) => AccountAction::LoginUser {
                        credentials: registration.credentials,
                    },
                    Err(error) => AccountAction::CreateUserFail { error },
                };
                Some(AppAction::Account(outcome))
            }
        },
    )
}

/// Profile body for private customers, whose user data lives on the customer
#[derive(Serialize)]
struct PrivateCustomerProfile<'a> {
    #[serde(flatten)]
    customer: &'a Customer,
    #[serde(flatten)]
    user: &'a User,
}

fn update_user<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "account.update_user",
        Policy::Concat,
        |action: &AppAction| matches!(action, AppAction::Account(AccountAction::UpdateUser { .. })),
        move |action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::Account(AccountAction::UpdateUser { user }) = action else {
                    return None;
                };
                let snapshot = state.current();
                let options = session_options(&snapshot);

                let result: Result<User, HttpError> = match &snapshot.user.customer {
                    None => Err(unavailable("customer")),
                    Some(customer) if customer.is_business_customer => {
                        api.put("customers/-/users/-", &user, options).await
                    },
                    Some(customer) => {
                        let profile = PrivateCustomerProfile { customer, user: &user };
                        api.put("customers/-", &profile, options).await
                    },
                };
                Some(AppAction::Account(result.into_action(
                    |user| AccountAction::UpdateUserSuccess { user },
                    |error| AccountAction::UpdateUserFail { error },
                )))
            }
        },
    )
}

fn update_user_password<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "account.update_password",
        Policy::Concat,
        |action: &AppAction| matches!(action, AppAction::Account(AccountAction::UpdateUserPassword { .. })),
        move |action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::Account(AccountAction::UpdateUserPassword { change }) = action else {
                    return None;
                };
                let options = session_options(&state.current());
                let outcome: AccountAction = api_call! {
                    call: api.put::<Value, _>("customers/-/users/-/credentials/password", &change, options),
                    on_success: |_| AccountAction::UpdateUserPasswordSuccess,
                    on_error: |error| AccountAction::UpdateUserPasswordFail { error }
                };
                Some(AppAction::Account(outcome))
            }
        },
    )
}

fn update_customer<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "account.update_customer",
        Policy::Concat,
        |action: &AppAction| matches!(action, AppAction::Account(AccountAction::UpdateCustomer { .. })),
        move |action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::Account(AccountAction::UpdateCustomer { customer }) = action else {
                    return None;
                };
                let options = session_options(&state.current());
                let outcome: AccountAction = api_call! {
                    call: api.put::<Customer, _>("customers/-", &customer, options),
                    on_success: |customer| AccountAction::UpdateCustomerSuccess { customer },
                    on_error: |error| AccountAction::UpdateCustomerFail { error }
                };
                Some(AppAction::Account(outcome))
            }
        },
    )
}
