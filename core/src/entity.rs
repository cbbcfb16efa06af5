//! Normalized entity collections.
//!
//! An [`EntityState`] pairs an id → entity map with a separate ordered id
//! list, giving O(1) lookup and a stable iteration order. All mutation goes
//! through an [`EntityAdapter`], which owns the id selection function so
//! reducers never re-implement id bookkeeping.
//!
//! # Invariants
//!
//! - every id in `ids` has an entry in `entities` and vice versa
//! - ids are unique

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// An entity with its own natural id
pub trait Entity {
    /// Natural id of this entity
    fn id(&self) -> &str;
}

/// A partial update applied to an existing entity.
///
/// Closures are patches, so `|item: &mut LineItem| item.quantity = 3` works
/// directly; structs with optional fields implement it to express a shallow
/// merge.
pub trait Patch<T> {
    /// Merge this patch into `entity`
    fn apply(self, entity: &mut T);
}

impl<T, F> Patch<T> for F
where
    F: FnOnce(&mut T),
{
    fn apply(self, entity: &mut T) {
        self(entity);
    }
}

/// Collection of entities keyed by id with a stable order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityState<T> {
    ids: Vec<String>,
    entities: HashMap<String, T>,
}

impl<T> EntityState<T> {
    /// Create an empty collection
    #[must_use]
    pub fn new() -> Self {
        Self {
            ids: Vec::new(),
            entities: HashMap::new(),
        }
    }

    /// Ids in insertion order
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Look up an entity by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&T> {
        self.entities.get(id)
    }

    /// Whether an id is present
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    /// Iterate entities in id order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.ids.iter().filter_map(|id| self.entities.get(id))
    }

    /// Number of entities
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the collection is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<T> Default for EntityState<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn natural_id<T: Entity>(entity: &T) -> String {
    entity.id().to_string()
}

/// CRUD primitives over an [`EntityState`].
///
/// # Example
///
/// ```
/// use storefront_core::entity::{EntityAdapter, EntityState};
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct Request { order_id: String, id: String }
///
/// fn request_key(request: &Request) -> String {
///     format!("{}_{}", request.order_id, request.id)
/// }
///
/// const ADAPTER: EntityAdapter<Request> = EntityAdapter::with_select_id(request_key);
///
/// let mut state = EntityState::new();
/// ADAPTER.add_one(Request { order_id: "O1".into(), id: "R1".into() }, &mut state);
/// assert!(state.contains("O1_R1"));
/// ```
pub struct EntityAdapter<T> {
    select_id: fn(&T) -> String,
}

impl<T: Entity> EntityAdapter<T> {
    /// Adapter keyed by the entity's natural id
    #[must_use]
    pub const fn new() -> Self {
        Self {
            select_id: natural_id::<T>,
        }
    }
}

impl<T: Entity> Default for EntityAdapter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EntityAdapter<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EntityAdapter<T> {}

impl<T> std::fmt::Debug for EntityAdapter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityAdapter").finish_non_exhaustive()
    }
}

impl<T> EntityAdapter<T> {
    /// Adapter with a custom id function.
    ///
    /// The function must be pure and stable for the entity's lifetime.
    #[must_use]
    pub const fn with_select_id(select_id: fn(&T) -> String) -> Self {
        Self { select_id }
    }

    /// Collection key for `entity`
    #[must_use]
    pub fn select_id(&self, entity: &T) -> String {
        (self.select_id)(entity)
    }

    /// Insert or fully replace one entity.
    ///
    /// A replaced entity keeps its position in the id order.
    pub fn add_one(&self, entity: T, state: &mut EntityState<T>) {
        let id = self.select_id(&entity);
        if state.entities.insert(id.clone(), entity).is_none() {
            state.ids.push(id);
        }
    }

    /// Insert or fully replace many entities, in order
    pub fn add_many(&self, entities: impl IntoIterator<Item = T>, state: &mut EntityState<T>) {
        for entity in entities {
            self.add_one(entity, state);
        }
    }

    /// Replace the whole collection
    pub fn set_all(&self, entities: impl IntoIterator<Item = T>, state: &mut EntityState<T>) {
        self.remove_all(state);
        self.add_many(entities, state);
    }

    /// Remove one entity; returns `false` when the id was absent
    pub fn remove_one(&self, id: &str, state: &mut EntityState<T>) -> bool {
        if state.entities.remove(id).is_none() {
            return false;
        }
        state.ids.retain(|existing| existing != id);
        true
    }

    /// Remove every listed id that is present
    pub fn remove_many<'a>(&self, ids: impl IntoIterator<Item = &'a str>, state: &mut EntityState<T>) {
        for id in ids {
            self.remove_one(id, state);
        }
    }

    /// Empty the collection
    pub fn remove_all(&self, state: &mut EntityState<T>) {
        state.ids.clear();
        state.entities.clear();
    }

    /// Shallow-merge `patch` into an existing entity.
    ///
    /// Returns `false` without touching the collection when the id is
    /// absent; the caller decides whether that is an error.
    pub fn update_one(&self, id: &str, patch: impl Patch<T>, state: &mut EntityState<T>) -> bool {
        match state.entities.get_mut(id) {
            Some(entity) => {
                patch.apply(entity);
                true
            },
            None => false,
        }
    }

    /// All entities in id order
    #[must_use]
    pub fn select_all(&self, state: &EntityState<T>) -> Vec<T>
    where
        T: Clone,
    {
        state.iter().cloned().collect()
    }

    /// Entity by id
    #[must_use]
    pub fn select_by_id(&self, id: &str, state: &EntityState<T>) -> Option<T>
    where
        T: Clone,
    {
        state.get(id).cloned()
    }

    /// Number of entities
    #[must_use]
    pub fn total(&self, state: &EntityState<T>) -> usize {
        state.len()
    }
}
