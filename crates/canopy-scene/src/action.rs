//! The action vocabulary: every scene mutation as a serializable record.
//!
//! Actions are the contract surface of the core. They form a closed tagged
//! union that the [`Editor`](crate::editor::Editor) matches on; there is no
//! open registration of action types. Each mutating variant carries a
//! `persist` flag: when `true` the dispatcher records an inverse/forward pair
//! in the history, when `false` (the form the history manager itself uses
//! during undo/redo) the mutation applies without touching the stacks.

use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::entity::{EntityId, EntitySeed};

// ---------------------------------------------------------------------------
// Update payloads
// ---------------------------------------------------------------------------

/// Requested parent change inside an [`EntityUpdate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParentUpdate {
    /// Leave the parent as it is.
    #[default]
    Unchanged,
    /// Detach and make the entity root-level.
    Root,
    /// Reparent under the given entity.
    To(EntityId),
}

/// One entry of an `UpdateEntity` action: a component merge and an optional
/// reparent for a single entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityUpdate {
    /// Target entity.
    pub id: EntityId,
    /// Optional parent change.
    #[serde(default)]
    pub parent: ParentUpdate,
    /// Components to merge via the collection's transactional set.
    #[serde(default)]
    pub components: Vec<Component>,
}

impl EntityUpdate {
    /// An update that merges components without touching the parent.
    pub fn components(id: EntityId, components: Vec<Component>) -> Self {
        Self {
            id,
            parent: ParentUpdate::Unchanged,
            components,
        }
    }
}

/// One entry of a `SortEntity` or `CloneEntity` action: a target position
/// expressed as `{id, index, parent}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortMove {
    /// Entity to move (for clone: the source subtree root).
    pub id: EntityId,
    /// Target sibling index.
    pub index: i64,
    /// Target parent, `None` for root level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<EntityId>,
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A serializable command describing one requested mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Insert entities, fixing up missing `index`/`name` components.
    CreateEntity {
        /// Seeds to create, parents before children.
        data: Vec<EntitySeed>,
        /// Record an inverse pair in the history.
        persist: bool,
    },
    /// Cascade-remove the listed entities and all their descendants.
    DeleteEntity {
        /// Subtree roots to delete. Unknown ids are skipped with a warning.
        ids: Vec<EntityId>,
        /// Record an inverse pair in the history.
        persist: bool,
    },
    /// Merge components, optionally reparenting and resorting.
    UpdateEntity {
        /// Per-entity merges.
        data: Vec<EntityUpdate>,
        /// Human-readable description for the history entry.
        #[serde(default)]
        message: String,
        /// Record an inverse pair in the history.
        persist: bool,
    },
    /// Reindex siblings and move entities to new positions.
    SortEntity {
        /// Requested moves.
        data: Vec<SortMove>,
        /// Record an inverse pair in the history.
        persist: bool,
    },
    /// Deep-copy subtrees and place the copies among existing siblings.
    CloneEntity {
        /// Source roots with their target positions.
        data: Vec<SortMove>,
        /// Record an inverse pair in the history.
        persist: bool,
    },
    /// Export the listed subtrees into the clipboard buffer.
    CopyEntity {
        /// Selection roots to copy (descendants are included automatically).
        ids: Vec<EntityId>,
    },
    /// Unselect, copy, then delete -- recorded as one atomic history entry.
    CutEntity {
        /// Subtree roots to cut.
        ids: Vec<EntityId>,
        /// Record an inverse pair in the history.
        #[serde(default = "default_persist")]
        persist: bool,
    },
    /// Rebuild the clipboard buffer with fresh ids and insert it, anchoring
    /// root-level entries to the isolated entity (or the scene root).
    PasteData {
        /// Record an inverse pair in the history.
        #[serde(default = "default_persist")]
        persist: bool,
    },
    /// Add entities to the selection, sharing an edit buffer of components.
    Select {
        /// Ids to select. Unknown ids are skipped with a warning.
        ids: Vec<EntityId>,
        /// Components for the shared edit buffer (upserted by id).
        #[serde(default)]
        components: Vec<Component>,
        /// Record an inverse pair in the history.
        persist: bool,
        /// Clear the current selection first.
        #[serde(default)]
        unselect_current: bool,
    },
    /// Remove entities (or everything, when `ids` is `None`) from the selection.
    Unselect {
        /// Specific ids to unselect, or `None` to clear everything.
        #[serde(default)]
        ids: Option<Vec<EntityId>>,
        /// Specific buffer components to drop, or `None` for all of them.
        #[serde(default)]
        components: Option<Vec<Component>>,
        /// Record an inverse pair in the history.
        persist: bool,
    },
    /// Scope the editor to one entity (or back to the scene root with `None`).
    Isolate {
        /// The entity to isolate, or `None` to leave isolation.
        #[serde(default)]
        id: Option<EntityId>,
        /// Record an inverse pair in the history.
        persist: bool,
    },
    /// Push a pre-built inverse/forward pair onto the history.
    PushHistory {
        /// Actions that undo the committed change.
        actions: Vec<Action>,
        /// Actions that redo it.
        last: Vec<Action>,
        /// Replace the top entry instead of appending (coalesces a train of
        /// fine-grained updates, e.g. a drag-resize, into one entry).
        #[serde(default, rename = "override")]
        override_last: bool,
    },
    /// Replay the most recent history entry's inverse actions.
    UndoHistory,
    /// Replay the most recently undone entry's forward actions.
    RedoHistory,
    /// Clear both history stacks.
    ResetHistory,
}

fn default_persist() -> bool {
    true
}

impl Action {
    /// The `persist` flag, for variants that carry one.
    pub fn persist(&self) -> Option<bool> {
        match self {
            Action::CreateEntity { persist, .. }
            | Action::DeleteEntity { persist, .. }
            | Action::UpdateEntity { persist, .. }
            | Action::SortEntity { persist, .. }
            | Action::CloneEntity { persist, .. }
            | Action::CutEntity { persist, .. }
            | Action::PasteData { persist }
            | Action::Select { persist, .. }
            | Action::Unselect { persist, .. }
            | Action::Isolate { persist, .. } => Some(*persist),
            _ => None,
        }
    }

    /// Force `persist` off. Every action stored in a history entry goes
    /// through this, otherwise replay would push new entries and corrupt the
    /// stacks.
    pub fn unpersisted(mut self) -> Self {
        if let Action::CreateEntity { persist, .. }
        | Action::DeleteEntity { persist, .. }
        | Action::UpdateEntity { persist, .. }
        | Action::SortEntity { persist, .. }
        | Action::CloneEntity { persist, .. }
        | Action::CutEntity { persist, .. }
        | Action::PasteData { persist }
        | Action::Select { persist, .. }
        | Action::Unselect { persist, .. }
        | Action::Isolate { persist, .. } = &mut self
        {
            *persist = false;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// DispatchOutcome
// ---------------------------------------------------------------------------

/// Out-parameters of a dispatch: which entities were created and deleted,
/// across the whole batch (nested internal actions included).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchOutcome {
    /// Ids of entities inserted by this dispatch.
    pub created: Vec<EntityId>,
    /// Ids of entities removed by this dispatch (cascade included).
    pub deleted: Vec<EntityId>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
