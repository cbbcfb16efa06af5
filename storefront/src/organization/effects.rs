use super::OrganizationAction;
use crate::api::session_options;
use crate::app::{AppAction, AppRuntime, AppState};
use crate::models::Group;
use storefront_core::prelude::*;
use storefront_runtime::StoreError;

/// Register the organization hierarchy effects
///
/// # Errors
///
/// Returns [`StoreError::ShutdownInProgress`] once the store is shut down.
pub fn register_effects<Api: ApiService>(runtime: &AppRuntime, api: &Api) -> Result<(), StoreError> {
    runtime.register(load_groups(api.clone()))?;
    runtime.register(create_group(api.clone()))
}

/// Groups collection of the logged in customer, once it is known
async fn groups_path(state: &StateSnapshots<AppState>) -> Option<(String, RequestOptions)> {
    let snapshot = state.first_where(|state| state.user.customer.is_some()).await?;
    let customer = snapshot.user.customer.as_ref()?;
    let path = format!("customers/{}/groups", encode_resource_id(&customer.customer_no));
    Some((path, session_options(&snapshot)))
}

fn load_groups<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "organization.load_groups",
        Policy::Switch,
        |action: &AppAction| matches!(action, AppAction::Organization(OrganizationAction::LoadGroups)),
        move |_action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let (path, options) = groups_path(&state).await?;
                let outcome: OrganizationAction = api_call! {
                    call: api.get::<Vec<Group>>(&path, options),
                    on_success: |groups| OrganizationAction::LoadGroupsSuccess { groups },
                    on_error: |error| OrganizationAction::LoadGroupsFail { error }
                };
                Some(AppAction::Organization(outcome))
            }
        },
    )
}

fn create_group<Api: ApiService>(api: Api) -> impl Effect<State = AppState, Action = AppAction> {
    effect_fn(
        "organization.create_group",
        Policy::Concat,
        |action: &AppAction| matches!(action, AppAction::Organization(OrganizationAction::CreateGroup { .. })),
        move |action: AppAction, state: StateSnapshots<AppState>| -> EffectFuture<AppAction> {
            let api = api.clone();
            async_effect! {
                let AppAction::Organization(OrganizationAction::CreateGroup { parent_id, child }) = action else {
                    return None;
                };
                let (path, options) = groups_path(&state).await?;
                let child = Group {
                    parent_id: Some(parent_id),
                    ..child
                };
                let result: Result<Group, HttpError> = api.post(&path, &child, options).await;
                Some(AppAction::Organization(result.into_action(
                    |group| OrganizationAction::CreateGroupSuccess { group },
                    |error| OrganizationAction::CreateGroupFail { error },
                )))
            }
        },
    )
}
