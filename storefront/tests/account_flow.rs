//! Session flows through the whole storefront: facade, store, effects and a
//! scripted backend.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use serde_json::json;
use std::time::Duration;
use storefront_core::prelude::*;
use storefront_state::models::{Credentials, Customer, Registration, User};
use storefront_state::{AccountAction, AppAction, BasketAction, Storefront, StorefrontConfig};
use storefront_testing::{ActionRecorder, Method, MockApiService, init_tracing};

const TIMEOUT: Duration = Duration::from_secs(2);

fn credentials() -> Credentials {
    Credentials::new("patricia@test.intershop.de", "!InterShop00!")
}

fn script_session(api: &MockApiService) {
    api.respond(
        Method::Get,
        "customers/-",
        json!({"customerNo": "Patricia", "customerType": "PrivateCustomer", "isBusinessCustomer": false}),
    );
    api.respond(
        Method::Get,
        "customers/-/users/-",
        json!({"login": "patricia@test.intershop.de", "firstName": "Patricia", "lastName": "Miller"}),
    );
}

fn start(api: &MockApiService) -> Storefront {
    init_tracing();
    Storefront::start(api.clone(), &StorefrontConfig::default()).unwrap()
}

fn is_login_outcome(action: &AppAction) -> bool {
    matches!(
        action,
        AppAction::Account(AccountAction::LoginUserSuccess { .. } | AccountAction::LoginUserFail { .. })
    )
}

#[tokio::test]
async fn test_login_success_sets_session() {
    let api = MockApiService::new();
    script_session(&api);
    let storefront = start(&api);
    let recorder = ActionRecorder::start(storefront.store());

    storefront.account().login_user(credentials()).unwrap();
    let outcome = recorder.wait_for(is_login_outcome, TIMEOUT).await.unwrap();

    assert!(matches!(outcome, AppAction::Account(AccountAction::LoginUserSuccess { .. })));
    assert!(storefront.account().is_logged_in().get());
    assert_eq!(
        storefront.account().user().get().map(|user| user.login),
        Some("patricia@test.intershop.de".to_string())
    );

    let calls = api.calls();
    let paths: Vec<_> = calls.iter().map(|call| call.path.as_str()).collect();
    assert_eq!(paths, ["customers/-", "customers/-/users/-"]);
    for call in &calls {
        assert_eq!(
            call.headers.get("Authorization").map(String::as_str),
            Some("BASIC cGF0cmljaWFAdGVzdC5pbnRlcnNob3AuZGU6IUludGVyU2hvcDAwIQ==")
        );
    }
}

#[tokio::test]
async fn test_login_keeps_issued_token_for_later_requests() {
    let api = MockApiService::new();
    api.respond_with_headers(
        Method::Get,
        "customers/-",
        json!({"customerNo": "Patricia", "customerType": "PrivateCustomer", "isBusinessCustomer": false}),
        [("authentication-token", "issued-token")],
    );
    api.respond(
        Method::Get,
        "customers/-/users/-",
        json!({"login": "patricia@test.intershop.de", "firstName": "Patricia", "lastName": "Miller"}),
    );
    let storefront = start(&api);
    let recorder = ActionRecorder::start(storefront.store());

    storefront.account().login_user(credentials()).unwrap();
    let outcome = recorder.wait_for(is_login_outcome, TIMEOUT).await.unwrap();

    assert!(matches!(
        outcome,
        AppAction::Account(AccountAction::LoginUserSuccess { api_token: Some(ref token), .. }) if token == "issued-token"
    ));
    assert_eq!(
        storefront.store().state(|state| state.user.api_token.clone()),
        Some("issued-token".to_string())
    );

    storefront.basket().load_basket();
    recorder
        .wait_for(
            |action| matches!(action, AppAction::Basket(BasketAction::LoadBasketFail { .. })),
            TIMEOUT,
        )
        .await
        .unwrap();

    let call = &api.calls_to(Method::Get, "baskets/current")[0];
    assert_eq!(
        call.headers.get("authentication-token").map(String::as_str),
        Some("issued-token")
    );
}

#[tokio::test]
async fn test_login_failure_then_reset() {
    let api = MockApiService::new();
    api.fail(
        Method::Get,
        "customers/-",
        HttpError::new(401).with_header("error-key", "account.login.failed"),
    );
    let storefront = start(&api);
    let recorder = ActionRecorder::start(storefront.store());

    storefront.account().login_user(credentials()).unwrap();
    recorder.wait_for(is_login_outcome, TIMEOUT).await.unwrap();

    let error = storefront.account().user_error().get().unwrap();
    assert_eq!(error.status, 401);
    assert_eq!(error.header("error-key"), Some("account.login.failed"));
    assert!(!storefront.account().is_logged_in().get());
    assert!(api.calls_to(Method::Get, "customers/-/users/-").is_empty());

    storefront.account().reset_user_error();
    assert_eq!(storefront.account().user_error().get(), None);
    assert!(!storefront.account().user_loading().get());
}

#[tokio::test]
async fn test_invalid_login_never_dispatches() {
    let api = MockApiService::new();
    let storefront = start(&api);
    let before = storefront.store().dispatched();

    let result = storefront.account().login_user(Credentials::new("patricia@test.intershop.de", ""));

    assert!(matches!(result, Err(ValidationError::MissingArgument { .. })));
    assert_eq!(storefront.store().dispatched(), before);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_api_token_restores_session() {
    let api = MockApiService::new();
    script_session(&api);
    let storefront = start(&api);
    let recorder = ActionRecorder::start(storefront.store());

    storefront.account().load_user_by_api_token("token-1").unwrap();
    recorder.wait_for(is_login_outcome, TIMEOUT).await.unwrap();

    assert!(storefront.account().is_logged_in().get());
    assert_eq!(
        storefront.store().state(|state| state.user.api_token.clone()),
        Some("token-1".to_string())
    );
    let call = &api.calls_to(Method::Get, "customers/-")[0];
    assert_eq!(call.headers.get("authentication-token").map(String::as_str), Some("token-1"));
}

#[tokio::test]
async fn test_registration_logs_in() {
    let api = MockApiService::new();
    api.respond(Method::Post, "customers", json!(null));
    script_session(&api);
    let storefront = start(&api);
    let recorder = ActionRecorder::start(storefront.store());

    let registration = Registration {
        customer: Customer {
            customer_no: "Patricia".to_string(),
            ..Customer::default()
        },
        user: User {
            login: "patricia@test.intershop.de".to_string(),
            ..User::default()
        },
        credentials: credentials(),
    };
    storefront.account().create_user(registration).unwrap();
    recorder.wait_for(is_login_outcome, TIMEOUT).await.unwrap();

    assert_eq!(
        recorder.types()[..2],
        ["[Account] Create User", "[Account] Login User"]
    );
    assert!(storefront.account().is_logged_in().get());
}

#[tokio::test]
async fn test_logout_clears_every_slice() {
    let api = MockApiService::new();
    script_session(&api);
    api.respond(
        Method::Get,
        "baskets/current",
        json!({"id": "B1", "lineItems": [{"id": "L1", "product": "sku-1", "quantity": {"value": 1}}]}),
    );
    let storefront = start(&api);
    let recorder = ActionRecorder::start(storefront.store());

    storefront.account().login_user(credentials()).unwrap();
    recorder.wait_for(is_login_outcome, TIMEOUT).await.unwrap();
    storefront.basket().load_basket();
    recorder
        .wait_for(
            |action| matches!(action, AppAction::Basket(BasketAction::LoadBasketSuccess { .. })),
            TIMEOUT,
        )
        .await
        .unwrap();
    assert_eq!(storefront.basket().item_count().get(), 1);

    storefront.account().logout_user();

    assert!(!storefront.account().is_logged_in().get());
    assert_eq!(storefront.basket().basket().get(), None);
    assert!(storefront.basket().line_items().get().is_empty());
}
