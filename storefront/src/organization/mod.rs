//! Organization hierarchies of a business customer.

mod effects;
mod facade;

pub use effects::register_effects;
pub use facade::OrganizationHierarchiesFacade;

use crate::account::AccountAction;
use crate::app::AppAction;
use crate::models::Group;
use storefront_core::prelude::*;
use storefront_macros::Action;

/// Organization hierarchy actions
#[derive(Action, Clone, Debug, PartialEq)]
pub enum OrganizationAction {
    /// Load all groups of the customer
    #[intent("[Organization Hierarchies] Load Groups")]
    LoadGroups,

    /// Groups loaded
    #[success("[Organization Hierarchies API] Load Groups Success")]
    LoadGroupsSuccess {
        /// All groups
        groups: Vec<Group>,
    },

    /// Groups could not be loaded
    #[failure("[Organization Hierarchies API] Load Groups Fail")]
    LoadGroupsFail {
        /// Cause
        error: HttpError,
    },

    /// Create a group below `parent_id`
    #[intent("[Organization Hierarchies] Create Group")]
    CreateGroup {
        /// Parent group id
        parent_id: String,
        /// The new group
        child: Group,
    },

    /// Group created
    #[success("[Organization Hierarchies API] Create Group Success")]
    CreateGroupSuccess {
        /// The group as stored by the backend
        group: Group,
    },

    /// Group could not be created
    #[failure("[Organization Hierarchies API] Create Group Fail")]
    CreateGroupFail {
        /// Cause
        error: HttpError,
    },
}

/// Groups keyed by id
pub const GROUPS: EntityAdapter<Group> = EntityAdapter::new();

/// Organization slice
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationState {
    /// Known groups
    pub groups: EntityState<Group>,
    /// A request is in flight
    pub loading: bool,
    /// Last failure
    pub error: Option<HttpError>,
}

storefront_core::impl_loadable!(OrganizationState);

/// Reducer for [`OrganizationState`]
pub struct OrganizationReducer;

impl Reducer for OrganizationReducer {
    type State = OrganizationState;
    type Action = AppAction;

    fn reduce(&self, state: &mut OrganizationState, action: &AppAction) {
        match action {
            AppAction::Organization(action) => {
                track_request(state, action);
                match action {
                    OrganizationAction::LoadGroupsSuccess { groups } => {
                        GROUPS.set_all(groups.iter().cloned(), &mut state.groups);
                    },
                    OrganizationAction::CreateGroupSuccess { group } => {
                        GROUPS.add_one(group.clone(), &mut state.groups);
                    },
                    _ => {},
                }
            },
            AppAction::Account(AccountAction::LogoutUser) => *state = OrganizationState::default(),
            _ => {},
        }
    }
}

/// Selectors over the organization slice
pub mod selectors {
    use super::GROUPS;
    use crate::app::AppState;
    use crate::models::Group;
    use storefront_core::error::HttpError;

    /// All groups
    #[must_use]
    pub fn groups(state: &AppState) -> Vec<Group> {
        GROUPS.select_all(&state.organization.groups)
    }

    /// Groups without parent
    #[must_use]
    pub fn root_groups(state: &AppState) -> Vec<Group> {
        state
            .organization
            .groups
            .iter()
            .filter(|group| group.parent_id.is_none())
            .cloned()
            .collect()
    }

    /// Whether a group call is in flight
    #[must_use]
    pub const fn groups_loading(state: &AppState) -> bool {
        state.organization.loading
    }

    /// Last group failure
    #[must_use]
    pub fn groups_error(state: &AppState) -> Option<HttpError> {
        state.organization.error.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_testing::ReducerTest;

    fn group(id: &str, parent_id: Option<&str>) -> Group {
        Group {
            id: id.to_string(),
            name: format!("Group {id}"),
            description: None,
            parent_id: parent_id.map(str::to_string),
        }
    }

    #[test]
    fn test_created_group_is_appended() {
        let mut given = OrganizationState::default();
        GROUPS.add_one(group("root", None), &mut given.groups);

        ReducerTest::new(OrganizationReducer)
            .given_state(given)
            .when_actions([
                OrganizationAction::CreateGroup {
                    parent_id: "root".to_string(),
                    child: group("", Some("root")),
                }
                .into(),
                OrganizationAction::CreateGroupSuccess {
                    group: group("sales", Some("root")),
                }
                .into(),
            ])
            .then_state(|state: &OrganizationState| {
                assert_eq!(state.groups.ids(), ["root".to_string(), "sales".to_string()]);
                assert!(!state.loading);
            })
            .run();
    }

    #[test]
    fn test_logout_resets() {
        let mut given = OrganizationState::default();
        GROUPS.add_one(group("root", None), &mut given.groups);

        ReducerTest::new(OrganizationReducer)
            .given_state(given)
            .when_action(AccountAction::LogoutUser.into())
            .then_state_eq(OrganizationState::default())
            .run();
    }
}
