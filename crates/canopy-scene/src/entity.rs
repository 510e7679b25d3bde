//! Entity identifiers and the scene-graph node type.
//!
//! An [`EntityId`] is a UUID newtype. Unlike a generational index, a UUID
//! survives clipboard round-trips and document export/import without a
//! remapping table, and it can never be accidentally recycled: deletion is
//! final, and re-creation always uses a fresh id.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::component::{Component, ComponentSet};

// ---------------------------------------------------------------------------
// EntityId
// ---------------------------------------------------------------------------

/// A globally unique, immutable entity identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Generate a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID (used when restoring exported documents).
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A node in the scene graph.
///
/// The [`EntityStore`](crate::store::EntityStore) exclusively owns every
/// `Entity`; all other subsystems hold [`EntityId`]s and resolve them through
/// the store. `children` is the ordered child list and must stay consistent
/// with each child's `parent` back-reference and `index` component.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Unique id, immutable once assigned.
    pub id: EntityId,
    /// Entity type tag (e.g. `"sprite"`, `"group"`).
    pub kind: String,
    /// Owning parent, or `None` for a root-level entity.
    pub parent: Option<EntityId>,
    /// Ordered child ids. Every listed id exists and points back here.
    pub children: Vec<EntityId>,
    /// The entity's component collection.
    pub components: ComponentSet,
}

impl Entity {
    /// The value of this entity's `index` component, if present.
    pub fn index(&self) -> Option<i64> {
        self.components.by_id(Component::INDEX).and_then(Component::index_value)
    }

    /// The value of this entity's `name` component, if present.
    pub fn name(&self) -> Option<&str> {
        self.components.by_id(Component::NAME).and_then(Component::name_value)
    }

    /// Capture this entity as a serializable seed (id included), suitable for
    /// exact re-creation via `CreateEntity`.
    pub fn to_seed(&self) -> EntitySeed {
        EntitySeed {
            id: Some(self.id),
            kind: self.kind.clone(),
            parent: self.parent,
            components: self.components.iter().cloned().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// EntitySeed
// ---------------------------------------------------------------------------

/// The serializable payload of a `CreateEntity` action: everything needed to
/// build one entity.
///
/// A seed without an `id` receives a fresh one on creation; history replay
/// and clipboard paste supply concrete ids so that redo reproduces identical
/// state. A seed without an `index` component is appended to its sibling
/// group; one without a `name` component is named `"{kind} {n}"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySeed {
    /// Explicit id, or `None` to generate one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    /// Entity type tag.
    pub kind: String,
    /// Target parent. An unknown parent yields a root-level entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntityId>,
    /// Initial components.
    #[serde(default)]
    pub components: Vec<Component>,
}

impl EntitySeed {
    /// A seed with just a type tag, everything else defaulted.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            id: None,
            kind: kind.into(),
            parent: None,
            components: Vec::new(),
        }
    }

    /// Set the target parent.
    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Add an initial component.
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// The seed's explicit `index` component value, if any.
    pub fn index(&self) -> Option<i64> {
        self.components
            .iter()
            .find(|c| c.id == Component::INDEX)
            .and_then(Component::index_value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
