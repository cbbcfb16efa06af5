use serde::{Deserialize, Serialize};
use storefront_core::entity::Entity;

/// A node in a business customer's organization hierarchy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Group id
    pub id: String,

    /// Display name
    pub name: String,

    /// Free text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Parent group; `None` for a root group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

impl Entity for Group {
    fn id(&self) -> &str {
        &self.id
    }
}
