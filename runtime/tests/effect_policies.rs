//! Integration tests for effect concurrency policies
//!
//! Each test wires a real Store and EffectRuntime to a scripted
//! `MockApiService` and asserts on the reduced actions and the call log.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use serde_json::json;
use std::time::Duration;
use storefront_core::prelude::*;
use storefront_macros::Action;
use storefront_runtime::{EffectRuntime, Store, StoreConfig, StoreError};
use storefront_testing::{ActionRecorder, Method, MockApiService, init_tracing};

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Action, Clone, Debug, PartialEq)]
enum LookupAction {
    #[intent("[Lookup] Fetch")]
    Fetch { key: String },

    #[success("[Lookup API] Fetch Success")]
    FetchSuccess { key: String, value: u32 },

    #[failure("[Lookup API] Fetch Fail")]
    FetchFail { key: String, error: HttpError },

    #[intent("[Lookup] Explode")]
    Explode,

    #[event("[Lookup] Ready")]
    Ready,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct LookupState {
    values: Vec<(String, u32)>,
    ready: bool,
    loading: bool,
    error: Option<HttpError>,
}

storefront_core::impl_loadable!(LookupState);

struct LookupReducer;

impl Reducer for LookupReducer {
    type State = LookupState;
    type Action = LookupAction;

    fn reduce(&self, state: &mut LookupState, action: &LookupAction) {
        track_request(state, action);
        match action {
            LookupAction::FetchSuccess { key, value } => state.values.push((key.clone(), *value)),
            LookupAction::Ready => state.ready = true,
            _ => {},
        }
    }
}

type LookupStore = Store<LookupState, LookupAction, LookupReducer>;

struct FetchEffect {
    api: MockApiService,
    policy: Policy,
    wait_until_ready: bool,
}

impl Effect for FetchEffect {
    type State = LookupState;
    type Action = LookupAction;

    fn name(&self) -> &'static str {
        "lookup.fetch"
    }

    fn policy(&self) -> Policy {
        self.policy
    }

    fn accepts(&self, action: &LookupAction) -> bool {
        matches!(action, LookupAction::Fetch { .. })
    }

    fn run(&self, action: LookupAction, state: StateSnapshots<LookupState>) -> EffectFuture<LookupAction> {
        let api = self.api.clone();
        let wait_until_ready = self.wait_until_ready;
        async_effect! {
            let LookupAction::Fetch { key } = action else {
                return None;
            };
            if wait_until_ready {
                state.first_where(|s| s.ready).await?;
            }
            let result: Result<u32, HttpError> = api.get(&format!("lookup/{key}"), RequestOptions::new()).await;
            Some(match result {
                Ok(value) => LookupAction::FetchSuccess { key, value },
                Err(error) => LookupAction::FetchFail { key, error },
            })
        }
    }
}

fn setup(policy: Policy) -> (LookupStore, EffectRuntime<LookupState, LookupAction, LookupReducer>, MockApiService) {
    init_tracing();
    let api = MockApiService::new();
    let store = Store::new(LookupState::default(), LookupReducer);
    let runtime = EffectRuntime::new(store.clone());
    runtime
        .register(FetchEffect {
            api: api.clone(),
            policy,
            wait_until_ready: false,
        })
        .unwrap();
    (store, runtime, api)
}

fn fetch(key: &str) -> LookupAction {
    LookupAction::Fetch { key: key.to_string() }
}

fn is_success(action: &LookupAction) -> bool {
    matches!(action, LookupAction::FetchSuccess { .. })
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_concat_finishes_first_call_before_starting_next() {
    let (store, _runtime, api) = setup(Policy::Concat);
    api.respond_after(Method::Get, "lookup/a", json!(1), Duration::from_millis(60));
    api.respond(Method::Get, "lookup/b", json!(2));
    let recorder = ActionRecorder::start(&store);

    store.dispatch(fetch("a"));
    store.dispatch(fetch("b"));

    let outcomes = recorder
        .wait_for_count(2, is_success, Duration::from_secs(2))
        .await
        .expect("both fetches resolve");
    assert_eq!(
        outcomes,
        vec![
            LookupAction::FetchSuccess { key: "a".into(), value: 1 },
            LookupAction::FetchSuccess { key: "b".into(), value: 2 },
        ]
    );

    let a = &api.calls_to(Method::Get, "lookup/a")[0];
    let b = &api.calls_to(Method::Get, "lookup/b")[0];
    assert!(b.started >= a.finished.unwrap());
    assert_eq!(store.state(|s| s.values.clone()), vec![("a".to_string(), 1), ("b".to_string(), 2)]);
}

#[tokio::test]
async fn test_switch_discards_superseded_result() {
    let (store, _runtime, api) = setup(Policy::Switch);
    api.respond_after(Method::Get, "lookup/slow", json!(1), Duration::from_millis(80));
    api.respond_after(Method::Get, "lookup/fast", json!(2), Duration::from_millis(10));
    let recorder = ActionRecorder::start(&store);

    store.dispatch(fetch("slow"));
    tokio::time::sleep(Duration::from_millis(5)).await;
    store.dispatch(fetch("fast"));

    recorder
        .wait_for(is_success, Duration::from_secs(2))
        .await
        .expect("latest fetch resolves");
    tokio::time::sleep(Duration::from_millis(150)).await;

    let successes: Vec<_> = recorder.actions().into_iter().filter(is_success).collect();
    assert_eq!(successes, vec![LookupAction::FetchSuccess { key: "fast".into(), value: 2 }]);
    assert_eq!(api.calls_to(Method::Get, "lookup/slow")[0].finished, None);
    assert!(!store.state(|s| s.loading));
}

#[tokio::test]
async fn test_merge_runs_calls_concurrently() {
    let (store, _runtime, api) = setup(Policy::Merge);
    api.respond_after(Method::Get, "lookup/a", json!(1), Duration::from_millis(60));
    api.respond_after(Method::Get, "lookup/b", json!(2), Duration::from_millis(10));
    let recorder = ActionRecorder::start(&store);

    store.dispatch(fetch("a"));
    store.dispatch(fetch("b"));

    let outcomes = recorder
        .wait_for_count(2, is_success, Duration::from_secs(2))
        .await
        .expect("both fetches resolve");
    assert_eq!(
        outcomes,
        vec![
            LookupAction::FetchSuccess { key: "b".into(), value: 2 },
            LookupAction::FetchSuccess { key: "a".into(), value: 1 },
        ]
    );

    let a = &api.calls_to(Method::Get, "lookup/a")[0];
    let b = &api.calls_to(Method::Get, "lookup/b")[0];
    assert!(b.started < a.finished.unwrap());
}

#[tokio::test]
async fn test_burst_beyond_broadcast_capacity_reaches_every_effect() {
    init_tracing();
    let api = MockApiService::new();
    api.respond(Method::Get, "lookup/a", json!(1));
    let config = StoreConfig::default().with_broadcast_capacity(4);
    let store = Store::with_config(LookupState::default(), LookupReducer, config);
    let runtime = EffectRuntime::new(store.clone());
    runtime
        .register(FetchEffect {
            api: api.clone(),
            policy: Policy::Merge,
            wait_until_ready: false,
        })
        .unwrap();

    // The effect loop cannot run until the whole burst is dispatched
    for _ in 0..40 {
        store.dispatch(fetch("a"));
    }

    let mut values = store.select(|s| s.values.len());
    tokio::time::timeout(Duration::from_secs(2), async {
        while values.next().await != Some(40) {}
    })
    .await
    .expect("every intent produces an outcome");

    assert_eq!(api.calls_to(Method::Get, "lookup/a").len(), 40);
    assert!(!store.state(|s| s.loading));
}

#[tokio::test]
async fn test_failure_becomes_exactly_one_failure_action() {
    let (store, _runtime, api) = setup(Policy::Switch);
    api.fail(Method::Get, "lookup/gone", HttpError::new(404).with_message("Not Found"));
    let recorder = ActionRecorder::start(&store);

    store.dispatch(fetch("gone"));
    let failure = recorder
        .wait_for(|a| a.class() == ActionClass::Failure, Duration::from_secs(2))
        .await
        .expect("failure dispatched");
    tokio::time::sleep(Duration::from_millis(30)).await;

    assert_eq!(failure.error().map(|e| e.status), Some(404));
    assert_eq!(recorder.types(), vec!["[Lookup] Fetch", "[Lookup API] Fetch Fail"]);
    assert_eq!(store.state(|s| s.error.clone()), Some(HttpError::new(404).with_message("Not Found")));
    assert!(!store.state(|s| s.loading));
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn test_precondition_blocks_until_state_qualifies() {
    init_tracing();
    let api = MockApiService::new();
    api.respond(Method::Get, "lookup/a", json!(7));
    let store = Store::new(LookupState::default(), LookupReducer);
    let runtime = EffectRuntime::new(store.clone());
    runtime
        .register(FetchEffect {
            api: api.clone(),
            policy: Policy::Switch,
            wait_until_ready: true,
        })
        .unwrap();
    let recorder = ActionRecorder::start(&store);

    store.dispatch(fetch("a"));
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(api.calls().is_empty());

    store.dispatch(LookupAction::Ready);
    recorder
        .wait_for(is_success, Duration::from_secs(2))
        .await
        .expect("fetch resolves once ready");
    assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn test_panicking_effect_does_not_stop_the_store() {
    let (store, runtime, api) = setup(Policy::Merge);
    api.respond(Method::Get, "lookup/a", json!(3));
    runtime
        .register(effect_fn(
            "lookup.explode",
            Policy::Merge,
            |action: &LookupAction| matches!(action, LookupAction::Explode),
            |_action, _state: StateSnapshots<LookupState>| {
                async_effect! {
                    let explode = true;
                    if explode {
                        panic!("effect exploded");
                    }
                    None
                }
            },
        ))
        .unwrap();
    let recorder = ActionRecorder::start(&store);

    store.dispatch(LookupAction::Explode);
    store.dispatch(fetch("a"));

    recorder
        .wait_for(is_success, Duration::from_secs(2))
        .await
        .expect("healthy effect keeps running");
    assert_eq!(runtime.registered(), vec!["lookup.fetch", "lookup.explode"]);
    assert!(runtime.health().status.is_healthy());
}

#[tokio::test]
async fn test_shutdown_stops_effects_and_store() {
    let (store, runtime, api) = setup(Policy::Merge);
    api.respond_after(Method::Get, "lookup/a", json!(1), Duration::from_millis(40));

    store.dispatch(fetch("a"));
    tokio::time::sleep(Duration::from_millis(5)).await;
    runtime.shutdown();
    tokio::time::sleep(Duration::from_millis(80)).await;

    assert!(store.state(|s| s.values.is_empty()));
    assert!(store.is_shutdown());
    assert!(!runtime.health().status.is_healthy());
    let register = runtime.register(FetchEffect {
        api,
        policy: Policy::Merge,
        wait_until_ready: false,
    });
    assert_eq!(register, Err(StoreError::ShutdownInProgress));
}

#[tokio::test]
async fn test_dispatch_and_wait_for_outcome() {
    let (store, _runtime, api) = setup(Policy::Switch);
    api.respond(Method::Get, "lookup/a", json!(5));

    let outcome = store
        .dispatch_and_wait_for(fetch("a"), |a| a.class().is_outcome(), Duration::from_secs(2))
        .await
        .unwrap();

    assert_eq!(outcome, LookupAction::FetchSuccess { key: "a".into(), value: 5 });
}
