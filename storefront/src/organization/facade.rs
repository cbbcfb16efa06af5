use super::{OrganizationAction, selectors};
use crate::app::AppStore;
use crate::command::require;
use crate::models::Group;
use storefront_core::error::{HttpError, ValidationError};
use storefront_core::selector::Selection;

/// Organization hierarchy commands and views
#[derive(Clone)]
pub struct OrganizationHierarchiesFacade {
    store: AppStore,
}

impl OrganizationHierarchiesFacade {
    /// Facade over `store`
    #[must_use]
    pub const fn new(store: AppStore) -> Self {
        Self { store }
    }

    /// All groups
    #[must_use]
    pub fn groups(&self) -> Selection<Vec<Group>> {
        self.store.select(selectors::groups)
    }

    /// Groups without parent
    #[must_use]
    pub fn root_groups(&self) -> Selection<Vec<Group>> {
        self.store.select(selectors::root_groups)
    }

    /// Whether a group call is in flight
    #[must_use]
    pub fn groups_loading(&self) -> Selection<bool> {
        self.store.select(selectors::groups_loading)
    }

    /// Last group failure
    #[must_use]
    pub fn groups_error(&self) -> Selection<Option<HttpError>> {
        self.store.select(selectors::groups_error)
    }

    /// Load the groups of the logged in customer
    pub fn load_groups(&self) {
        self.store.dispatch(OrganizationAction::LoadGroups.into());
    }

    /// Create `child` below the group `parent_id`.
    ///
    /// An empty child id lets the backend assign one.
    ///
    /// # Errors
    ///
    /// Rejects a blank parent id or group name.
    pub fn create_and_add_group(&self, parent_id: &str, child: Group) -> Result<(), ValidationError> {
        require("create_and_add_group", "parent_id", parent_id)?;
        require("create_and_add_group", "name", &child.name)?;
        self.store.dispatch(
            OrganizationAction::CreateGroup {
                parent_id: parent_id.to_string(),
                child,
            }
            .into(),
        );
        Ok(())
    }
}
