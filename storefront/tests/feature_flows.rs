//! Feature flows: effect policies, effect chains and preconditions observed
//! through the public facades.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use futures::StreamExt;
use serde_json::json;
use std::pin::pin;
use std::time::Duration;
use storefront_core::prelude::*;
use storefront_state::messages::MessageKind;
use storefront_state::models::{
    Basket, Customer, Group, Quantity, ReturnRequestBody, ReturnRequestItem, User,
};
use storefront_state::recurring_orders::{ADMIN_CONTEXT, RECURRING_ORDER_MEDIA_TYPE};
use storefront_state::{
    AccountAction, AppAction, BasketAction, OrganizationAction, RecurringOrderAction, ReturnRequestAction,
    Storefront, StorefrontConfig, WishlistAction,
};
use storefront_runtime::StoreConfig;
use storefront_testing::{ActionRecorder, Method, MockApiService, init_tracing};

const TIMEOUT: Duration = Duration::from_secs(2);

// ============================================================================
// Fixtures
// ============================================================================

fn start(api: &MockApiService) -> Storefront {
    init_tracing();
    Storefront::start(api.clone(), &StorefrontConfig::default()).unwrap()
}

fn with_basket(storefront: &Storefront) {
    storefront.store().dispatch(
        BasketAction::LoadBasketSuccess {
            basket: Basket {
                id: "B1".to_string(),
                ..Basket::default()
            },
            line_items: Vec::new(),
        }
        .into(),
    );
}

fn business_session() -> AppAction {
    AccountAction::LoginUserSuccess {
        customer: Customer {
            customer_no: "OilCorp".to_string(),
            is_business_customer: true,
            ..Customer::default()
        },
        user: User {
            login: "jlink@test.intershop.de".to_string(),
            ..User::default()
        },
        api_token: None,
    }
    .into()
}

fn line_item(id: &str, sku: &str, quantity: u32) -> serde_json::Value {
    json!({"id": id, "product": sku, "quantity": {"value": quantity}})
}

// ============================================================================
// Basket policies
// ============================================================================

#[tokio::test]
async fn test_add_to_basket_is_sequential() {
    let api = MockApiService::new();
    api.respond_after(
        Method::Post,
        "baskets/B1/items",
        line_item("L1", "sku-1", 1),
        Duration::from_millis(80),
    );
    api.respond_after(
        Method::Post,
        "baskets/B1/items",
        line_item("L2", "sku-2", 2),
        Duration::from_millis(80),
    );
    let storefront = start(&api);
    with_basket(&storefront);
    let recorder = ActionRecorder::start(storefront.store());

    storefront.basket().add_product_to_basket("sku-1", 1).unwrap();
    storefront.basket().add_product_to_basket("sku-2", 2).unwrap();
    recorder
        .wait_for_count(
            2,
            |action| matches!(action, AppAction::Basket(BasketAction::AddProductToBasketSuccess { .. })),
            TIMEOUT,
        )
        .await
        .unwrap();

    let calls = api.calls_to(Method::Post, "baskets/B1/items");
    assert_eq!(calls.len(), 2);
    assert!(calls[1].started >= calls[0].finished.unwrap());
    assert_eq!(calls[0].body, Some(json!({"product": "sku-1", "quantity": {"value": 1}})));

    let ids: Vec<_> = storefront.basket().line_items().get().into_iter().map(|item| item.id).collect();
    assert_eq!(ids, ["L1", "L2"]);
    assert_eq!(storefront.basket().item_count().get(), 3);
}

#[tokio::test]
async fn test_reloading_basket_discards_superseded_result() {
    let api = MockApiService::new();
    api.respond_after(
        Method::Get,
        "baskets/current",
        json!({"id": "stale", "lineItems": []}),
        Duration::from_millis(300),
    );
    api.respond_after(
        Method::Get,
        "baskets/current",
        json!({"id": "B2", "lineItems": [line_item("L9", "sku-9", 1)]}),
        Duration::from_millis(10),
    );
    let storefront = start(&api);
    let recorder = ActionRecorder::start(storefront.store());

    storefront.basket().load_basket();
    tokio::time::sleep(Duration::from_millis(20)).await;
    storefront.basket().load_basket();
    recorder
        .wait_for(
            |action| matches!(action, AppAction::Basket(BasketAction::LoadBasketSuccess { .. })),
            TIMEOUT,
        )
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(400)).await;

    let successes = recorder
        .types()
        .into_iter()
        .filter(|kind| *kind == "[Basket API] Load Basket Success")
        .count();
    assert_eq!(successes, 1);
    assert_eq!(storefront.basket().basket().get().map(|basket| basket.id), Some("B2".to_string()));
    assert_eq!(api.calls_to(Method::Get, "baskets/current")[0].finished, None);
}

#[tokio::test]
async fn test_basket_item_deletions_overlap() {
    let api = MockApiService::new();
    api.respond_after(Method::Delete, "baskets/B1/items/L1", json!(null), Duration::from_millis(100));
    api.respond_after(Method::Delete, "baskets/B1/items/L2", json!(null), Duration::from_millis(100));
    let storefront = start(&api);
    with_basket(&storefront);
    let recorder = ActionRecorder::start(storefront.store());

    storefront.basket().delete_basket_item("L1").unwrap();
    storefront.basket().delete_basket_item("L2").unwrap();
    recorder
        .wait_for_count(
            2,
            |action| matches!(action, AppAction::Basket(BasketAction::DeleteBasketItemSuccess { .. })),
            TIMEOUT,
        )
        .await
        .unwrap();

    let first = &api.calls_to(Method::Delete, "baskets/B1/items/L1")[0];
    let second = &api.calls_to(Method::Delete, "baskets/B1/items/L2")[0];
    assert!(second.started < first.finished.unwrap());
}

fn deletions_finished(api: &MockApiService) -> usize {
    api.calls()
        .iter()
        .filter(|call| call.method == Method::Delete && call.finished.is_some())
        .count()
}

#[tokio::test]
async fn test_deletion_burst_beyond_broadcast_capacity_completes() {
    init_tracing();
    let api = MockApiService::new();
    for n in 0..30 {
        api.respond(Method::Delete, format!("baskets/B1/items/L{n}"), json!(null));
    }
    let config = StorefrontConfig::default().with_store(StoreConfig::default().with_broadcast_capacity(8));
    let storefront = Storefront::start(api.clone(), &config).unwrap();
    with_basket(&storefront);

    for n in 0..30 {
        storefront.basket().delete_basket_item(&format!("L{n}")).unwrap();
    }
    tokio::time::timeout(TIMEOUT, async {
        while deletions_finished(&api) < 30 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("every deletion reaches the backend");
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert_eq!(api.calls().iter().filter(|call| call.method == Method::Delete).count(), 30);
    assert!(!storefront.basket().basket_loading().get());
    assert_eq!(storefront.basket().basket_error().get(), None);
}

#[tokio::test]
async fn test_basket_item_change_without_basket_fails() {
    let api = MockApiService::new();
    let storefront = start(&api);
    let recorder = ActionRecorder::start(storefront.store());

    storefront.basket().update_basket_item("L1", 4).unwrap();
    let outcome = recorder.wait_for(|action| action.class().is_outcome(), TIMEOUT).await.unwrap();

    let AppAction::Basket(BasketAction::UpdateBasketItemFail { error }) = outcome else {
        panic!("unexpected outcome {outcome:?}");
    };
    assert!(error.is_transport());
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_basket_commands_never_dispatch() {
    let api = MockApiService::new();
    let storefront = start(&api);
    let before = storefront.store().dispatched();

    assert!(storefront.basket().add_product_to_basket("", 1).is_err());
    assert!(storefront.basket().add_product_to_basket("sku-1", 0).is_err());
    assert!(storefront.basket().delete_basket_item("  ").is_err());

    assert_eq!(storefront.store().dispatched(), before);
}

// ============================================================================
// Orders and return requests
// ============================================================================

#[tokio::test]
async fn test_loaded_orders_pull_in_return_requests() {
    let api = MockApiService::new();
    api.respond(
        Method::Get,
        "orders",
        json!([{"id": "O1", "documentNo": "00000001", "creationDate": "2024-03-01T12:00:00Z", "status": "COMPLETED"}]),
    );
    api.respond(
        Method::Get,
        "orders/O1/returnrequests",
        json!([{"id": "R1", "status": "PENDING"}]),
    );
    let storefront = start(&api);
    let recorder = ActionRecorder::start(storefront.store());

    storefront.orders().load_orders();
    recorder
        .wait_for(
            |action| {
                matches!(
                    action,
                    AppAction::ReturnRequest(ReturnRequestAction::LoadOrderReturnRequestsSuccess { .. })
                )
            },
            TIMEOUT,
        )
        .await
        .unwrap();

    let ids = storefront.store().state(|state| state.return_requests.requests.ids().to_vec());
    assert_eq!(ids, ["O1_R1"]);
    let requests = storefront.return_requests().order_return_requests("O1").get();
    assert_eq!(requests[0].order_id, "O1");
    assert_eq!(storefront.orders().orders().get().len(), 1);
}

#[tokio::test]
async fn test_return_request_outcomes_raise_messages() {
    let api = MockApiService::new();
    api.respond(Method::Post, "orders/O1/returnrequests", json!({"id": "R2", "status": "PENDING"}));
    api.fail(
        Method::Post,
        "orders/O2/returnrequests",
        HttpError::new(422).with_message("Quantity exceeds returnable quantity"),
    );
    let storefront = start(&api);
    let recorder = ActionRecorder::start(storefront.store());
    let body = ReturnRequestBody {
        items: vec![ReturnRequestItem {
            position_id: "1".to_string(),
            sku: "sku-1".to_string(),
            quantity: Quantity::new(1),
            reason: "DAMAGED".to_string(),
        }],
        comment: None,
    };

    storefront.return_requests().create_return_request("O1", body.clone()).unwrap();
    storefront.return_requests().create_return_request("O2", body).unwrap();
    recorder
        .wait_for_count(2, |action| matches!(action, AppAction::Message(_)), TIMEOUT)
        .await
        .unwrap();

    let messages = storefront.messages().messages().get();
    assert_eq!(messages[0].kind, MessageKind::Success);
    assert_eq!(messages[1].kind, MessageKind::Error);
    assert_eq!(messages[1].text, "Quantity exceeds returnable quantity");
    assert!(
        storefront
            .store()
            .state(|state| state.return_requests.requests.contains("O1_R2"))
    );
}

#[tokio::test]
async fn test_return_request_needs_items() {
    let api = MockApiService::new();
    let storefront = start(&api);
    let before = storefront.store().dispatched();

    let result = storefront
        .return_requests()
        .create_return_request("O1", ReturnRequestBody::default());

    assert!(matches!(result, Err(ValidationError::MissingArgument { argument: "items", .. })));
    assert!(storefront.return_requests().load_return_requests(Vec::new()).is_err());
    assert_eq!(storefront.store().dispatched(), before);
}

// ============================================================================
// Recurring orders
// ============================================================================

#[tokio::test]
async fn test_recurring_orders_wait_for_session() {
    let api = MockApiService::new();
    api.respond(
        Method::Get,
        "customers/OilCorp/users/jlink%40test.intershop.de/recurringorders",
        json!({"data": [{"id": "RO1", "number": "0001", "active": true}]}),
    );
    let storefront = start(&api);
    let recorder = ActionRecorder::start(storefront.store());

    storefront.recurring_orders().load_recurring_orders(None);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(api.calls().is_empty());

    storefront.store().dispatch(business_session());
    recorder
        .wait_for(
            |action| {
                matches!(
                    action,
                    AppAction::RecurringOrder(RecurringOrderAction::LoadRecurringOrdersSuccess { .. })
                )
            },
            TIMEOUT,
        )
        .await
        .unwrap();

    let call = &api.calls()[0];
    assert_eq!(call.headers.get("Accept").map(String::as_str), Some(RECURRING_ORDER_MEDIA_TYPE));
    let ids: Vec<_> = storefront
        .recurring_orders()
        .recurring_orders()
        .get()
        .into_iter()
        .map(|order| order.id)
        .collect();
    assert_eq!(ids, ["RO1"]);
}

#[tokio::test]
async fn test_admin_context_updates_customer_recurring_order() {
    let api = MockApiService::new();
    api.respond(
        Method::Patch,
        "customers/OilCorp/recurringorders/RO1",
        json!({"data": {"id": "RO1", "active": false}}),
    );
    let storefront = start(&api);
    storefront.store().dispatch(business_session());
    let recorder = ActionRecorder::start(storefront.store());

    storefront
        .recurring_orders()
        .update_recurring_order("RO1", false, Some(ADMIN_CONTEXT))
        .unwrap();
    recorder.wait_for(|action| action.class().is_outcome(), TIMEOUT).await.unwrap();

    let call = &api.calls_to(Method::Patch, "customers/OilCorp/recurringorders/RO1")[0];
    assert_eq!(call.body, Some(json!({"active": false})));
    assert_eq!(
        storefront
            .store()
            .state(|state| state.recurring_orders.recurring_orders.get("RO1").map(|order| order.active)),
        Some(false)
    );
}

#[tokio::test]
async fn test_recurring_order_commands_need_an_id() {
    let api = MockApiService::new();
    let storefront = start(&api);
    let before = storefront.store().dispatched();

    let update = storefront.recurring_orders().update_recurring_order("", true, None);
    let delete = storefront.recurring_orders().delete_recurring_order("", None);

    assert_eq!(
        update,
        Err(ValidationError::missing("update_recurring_order", "recurring_order_id"))
    );
    assert_eq!(
        delete,
        Err(ValidationError::missing("delete_recurring_order", "recurring_order_id"))
    );
    assert_eq!(storefront.store().dispatched(), before);
}

// ============================================================================
// Wishlists and organization
// ============================================================================

#[tokio::test]
async fn test_shared_wishlist_is_loaded_with_secure_code() {
    let api = MockApiService::new();
    api.respond(
        Method::Get,
        "wishlists/W1",
        json!({"id": "W1", "title": "Birthday", "preferred": false}),
    );
    let storefront = start(&api);
    let recorder = ActionRecorder::start(storefront.store());

    storefront.wishlists().load_wishlist("W1", "patricia", "abc").unwrap();
    recorder
        .wait_for(
            |action| matches!(action, AppAction::Wishlist(WishlistAction::LoadWishlistSuccess { .. })),
            TIMEOUT,
        )
        .await
        .unwrap();

    let call = &api.calls_to(Method::Get, "wishlists/W1")[0];
    assert_eq!(
        call.params,
        [
            ("owner".to_string(), "patricia".to_string()),
            ("secureCode".to_string(), "abc".to_string())
        ]
    );
    assert_eq!(storefront.wishlists().wishlist().get().map(|w| w.title), Some("Birthday".to_string()));
    assert_eq!(storefront.wishlists().wishlist_error().get(), None);
}

#[tokio::test]
async fn test_group_is_created_below_parent() {
    let api = MockApiService::new();
    api.respond(
        Method::Post,
        "customers/OilCorp/groups",
        json!({"id": "sales", "name": "Sales", "parentId": "root"}),
    );
    let storefront = start(&api);
    storefront.store().dispatch(business_session());
    let recorder = ActionRecorder::start(storefront.store());

    let child = Group {
        name: "Sales".to_string(),
        ..Group::default()
    };
    storefront.organization().create_and_add_group("root", child).unwrap();
    recorder
        .wait_for(
            |action| matches!(action, AppAction::Organization(OrganizationAction::CreateGroupSuccess { .. })),
            TIMEOUT,
        )
        .await
        .unwrap();

    let call = &api.calls_to(Method::Post, "customers/OilCorp/groups")[0];
    assert_eq!(call.body.as_ref().unwrap()["parentId"], "root");
    assert_eq!(storefront.organization().groups().get().len(), 1);
}

#[tokio::test]
async fn test_group_without_name_is_rejected() {
    let api = MockApiService::new();
    let storefront = start(&api);
    let before = storefront.store().dispatched();

    let result = storefront.organization().create_and_add_group("root", Group::default());

    assert_eq!(result, Err(ValidationError::missing("create_and_add_group", "name")));
    assert_eq!(storefront.store().dispatched(), before);
}

// ============================================================================
// Messages
// ============================================================================

#[tokio::test]
async fn test_new_messages_include_those_raised_before_first_poll() {
    let storefront = start(&MockApiService::new());
    storefront.messages().success("already shown");

    let mut messages = pin!(storefront.messages().new_messages());
    storefront.messages().success("raised after call");

    let message = tokio::time::timeout(TIMEOUT, messages.next()).await.unwrap().unwrap();
    assert_eq!(message.text, "raised after call");
    assert_eq!(message.kind, MessageKind::Success);
}

#[tokio::test]
async fn test_new_messages_after_dismiss() {
    let storefront = start(&MockApiService::new());
    let mut messages = pin!(storefront.messages().new_messages());

    storefront.messages().error("stale");
    let stale = tokio::time::timeout(TIMEOUT, messages.next()).await.unwrap().unwrap();
    assert_eq!(stale.text, "stale");

    storefront.messages().dismiss();
    storefront.messages().error("fresh");

    let fresh = tokio::time::timeout(TIMEOUT, messages.next()).await.unwrap().unwrap();
    assert_eq!(fresh.text, "fresh");
    assert_eq!(fresh.kind, MessageKind::Error);
    assert!(fresh.seq > stale.seq);
}
