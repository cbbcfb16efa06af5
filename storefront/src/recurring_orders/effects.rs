//! Recurring order effects.
//!
//! | effect                       | policy |
//! |------------------------------|--------|
//! | `recurring_orders.load_all`  | switch |
//! | `recurring_orders.load`      | switch |
//! | `recurring_orders.update`    | concat |
//! | `recurring_orders.delete`    | merge  |

use super::{ADMIN_CONTEXT, RecurringOrderAction};
use crate::account::selectors::customer_and_user;
use crate::api::session_options;
use crate::app::{AppAction, AppRuntime, AppState};
use crate::models::{Customer, RecurringOrder, User};
use serde::Serialize;
use serde_json::Value;
use storefront_core::prelude::*;
use storefront_runtime::StoreError;

/// Media type of the recurring order API
pub const RECURRING_ORDER_MEDIA_TYPE: &str = "application/vnd.intershop.recurringorder.v2+json";

/// Register the recurring order effects
///
/// # Errors
///
/// Returns [`StoreError::ShutdownInProgress`] once the store is shut down.
pub fn register_effects<Api: ApiService>(runtime: &AppRuntime, api: &Api) -> Result<(), StoreError> {
    runtime.register(LoadRecurringOrders::new(api.clone()))?;
    runtime.register(load_recurring_order(api.clone()))?;
    runtime.register(update_recurring_order(api.clone()))?;
    runtime.register(delete_recurring_order(api.clone()))
}

/// Resource collection holding the recurring orders visible in `context`
fn endpoint(customer: &Customer, user: &User, context: Option<&str>) -> String {
    let customer_no = encode_resource_id(&customer.customer_no);
    if !customer.is_business_customer {
        return format!("privatecustomers/{customer_no}/recurringorders");
    }
    if context == Some(ADMIN_CONTEXT) {
        format!("customers/{customer_no}/recurringorders")
    } else {
        format!("customers/{customer_no}/users/{}/recurringorders", encode_resource_id(&user.login))
    }
}

/// Wait until customer and user are known and resolve the endpoint.
///
/// `None` once the store is gone.
async fn resolve<S>(state: &StateSnapshots<AppState>, context: Option<S>) -> Option<(String, RequestOptions)>
where
    S: AsRef<str>,
{
    let snapshot = state.first_where(|state| customer_and_user(state).is_some()).await?;
    let (customer, user) = customer_and_user(&snapshot)?;
    let path = endpoint(customer, user, context.as_ref().map(AsRef::as_ref));
    let options = session_options(&snapshot).with_header("Accept", RECURRING_ORDER_MEDIA_TYPE);
    Some((path, options))
}

#[derive(Serialize)]
struct ActivePatch {
    active: bool,
}

/// Load the recurring orders of the context once the session is known.
pub struct LoadRecurringOrders<Api> {
    api: Api,
}

impl<Api: ApiService> LoadRecurringOrders<Api> {
    /// Create the effect
    #[must_use]
    pub const fn new(api: Api) -> Self {
        Self { api }
    }
}

impl<Api: ApiService> Effect for LoadRecurringOrders<Api> {
    type State = AppState;
    type Action = AppAction;

    fn name(&self) -> &'static str {
        "recurring_orders.load_all"
    }

    fn policy(&self) -> Policy {
        Policy::Switch
    }

    fn accepts(&self, action: &AppAction) -> bool {
        matches!(
            action,
            AppAction::RecurringOrder(RecurringOrderAction::LoadRecurringOrders { .. })
        )
    }

    fn run(&self, action: AppAction, state: StateSnapshots<AppState>) -> EffectFuture<AppAction> {
        let api = self.api.clone();
        async_effect! {
            let AppAction::RecurringOrder(RecurringOrderAction::LoadRecurringOrders { context }) = action else {
                return None;
            };
            let (path, options) = resolve(&state, context).await?;
            let outcome: RecurringOrderAction = api_call! {
                call: api.get::<Envelope<Vec<RecurringOrder>>>(&path, options),
                on_success: |envelope| RecurringOrderAction::LoadRecurringOrdersSuccess {
                    recurring_orders: envelope.into_inner(),
                },
                on_error: |error| RecurringOrderAction::LoadRecurringOrdersFail { error }
            };
            Some(AppAction::RecurringOrder(outcome))
        }
    }
}

fn load_recurring_order<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "recurring_orders.load",
        Policy::Switch,
        |action: &AppAction| {
            matches!(
                action,
                AppAction::RecurringOrder(RecurringOrderAction::LoadRecurringOrder { .. })
            )
        },
        move |action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::RecurringOrder(RecurringOrderAction::LoadRecurringOrder { id, context }) = action else {
                    return None;
                };
                let (path, options) = resolve(&state, context).await?;
                let path = format!("{path}/{}", encode_resource_id(&id));
                let outcome: RecurringOrderAction = api_call! {
                    call: api.get::<Envelope<RecurringOrder>>(&path, options),
                    on_success: |envelope| RecurringOrderAction::LoadRecurringOrderSuccess {
                        recurring_order: envelope.into_inner(),
                    },
                    on_error: |error| RecurringOrderAction::LoadRecurringOrderFail { error }
                };
                Some(AppAction::RecurringOrder(outcome))
            }
        },
    )
}

fn update_recurring_order<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "recurring_orders.update",
        Policy::Concat,
        |action: &AppAction| {
            matches!(
                action,
                AppAction::RecurringOrder(RecurringOrderAction::UpdateRecurringOrder { .. })
            )
        },
        move |action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::RecurringOrder(RecurringOrderAction::UpdateRecurringOrder { id, active, context }) = action else {
                    return None;
                };
                let (path, options) = resolve(&state, context).await?;
                let path = format!("{path}/{}", encode_resource_id(&id));
                let result: Result<Envelope<RecurringOrder>, HttpError> =
                    api.patch(&path, &ActivePatch { active }, options).await;
                Some(AppAction::RecurringOrder(result.into_action(
                    |envelope| RecurringOrderAction::UpdateRecurringOrderSuccess {
                        recurring_order: envelope.into_inner(),
                    },
                    |error| RecurringOrderAction::UpdateRecurringOrderFail { error },
                )))
            }
        },
    )
}

fn delete_recurring_order<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "recurring_orders.delete",
        Policy::Merge,
        |action: &AppAction| {
            matches!(
                action,
                AppAction::RecurringOrder(RecurringOrderAction::DeleteRecurringOrder { .. })
            )
        },
        move |action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::RecurringOrder(RecurringOrderAction::DeleteRecurringOrder { id, context }) = action else {
                    return None;
                };
                let (path, options) = resolve(&state, context).await?;
                let path = format!("{path}/{}", encode_resource_id(&id));
                let result: Result<Value, HttpError> = api.delete(&path, options).await;
                let outcome = match result {
                    Ok(_) => RecurringOrderAction::DeleteRecurringOrderSuccess { id },
                    Err(error) => RecurringOrderAction::DeleteRecurringOrderFail { error },
                };
                Some(AppAction::RecurringOrder(outcome))
            }
        },
    )
}
