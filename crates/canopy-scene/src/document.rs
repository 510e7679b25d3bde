//! Whole-scene export and import.
//!
//! A [`SceneDocument`] is the serializable form of a scene: every entity as a
//! seed, parents before children. Import validates the document completely
//! before building anything, so a rejected document never leaves a
//! half-loaded store behind.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, EntitySeed};
use crate::store::EntityStore;
use crate::SceneError;

/// Current document schema version.
pub const DOCUMENT_VERSION: u32 = 1;

/// The serializable form of a whole scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Schema version, for forward-compatible readers.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Every entity as a seed, in hierarchical pre-order (each parent before
    /// its children).
    pub entities: Vec<EntitySeed>,
}

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

impl SceneDocument {
    /// Capture the whole store. Roots come in index order, each followed by
    /// its subtree in pre-order, so the document is loadable front to back.
    pub fn export(store: &EntityStore) -> Self {
        let mut entities = Vec::with_capacity(store.len());
        for root in store.roots() {
            for id in crate::sort::collect_subtree(store, root) {
                if let Some(entity) = store.get(id) {
                    entities.push(entity.to_seed());
                }
            }
        }
        Self {
            version: DOCUMENT_VERSION,
            entities,
        }
    }

    /// Build a fresh store from the document.
    ///
    /// The document is validated first: every seed needs an explicit id, ids
    /// must be unique, parents must refer to entities in the document, and
    /// the parent graph must be acyclic. Any violation rejects the whole
    /// document without building anything.
    pub fn import(&self) -> Result<EntityStore, SceneError> {
        self.validate()?;

        let mut store = EntityStore::new();
        let mut pending: Vec<&EntitySeed> = self.entities.iter().collect();
        // Parents must exist before their children are inserted. The export
        // order already satisfies this; re-ordered documents converge in a
        // few passes, and validation guarantees progress (no cycles, no
        // dangling parents).
        while !pending.is_empty() {
            let before = pending.len();
            pending.retain(|seed| {
                let ready = seed.parent.map_or(true, |p| store.contains(p));
                if ready {
                    store.create_from_seed((*seed).clone());
                }
                !ready
            });
            debug_assert!(pending.len() < before, "validated document must make progress");
        }
        Ok(store)
    }

    fn validate(&self) -> Result<(), SceneError> {
        let mut ids: HashSet<EntityId> = HashSet::with_capacity(self.entities.len());
        let mut parents: HashMap<EntityId, Option<EntityId>> = HashMap::new();
        for seed in &self.entities {
            let Some(id) = seed.id else {
                return Err(SceneError::DocumentRejected(
                    "document seed without an explicit id".into(),
                ));
            };
            if !ids.insert(id) {
                return Err(SceneError::DocumentRejected(format!(
                    "duplicate entity id {id}"
                )));
            }
            parents.insert(id, seed.parent);
        }
        for seed in &self.entities {
            if let Some(p) = seed.parent {
                if !ids.contains(&p) {
                    return Err(SceneError::DocumentRejected(format!(
                        "entity {} references parent {p} outside the document",
                        seed.id.unwrap_or_default()
                    )));
                }
            }
        }
        // Cycle check: walk each parent chain; a chain longer than the
        // document can only loop.
        for seed in &self.entities {
            let mut steps = 0;
            let mut current = seed.parent;
            while let Some(p) = current {
                steps += 1;
                if steps > self.entities.len() {
                    return Err(SceneError::DocumentRejected(format!(
                        "parent cycle through entity {p}"
                    )));
                }
                current = parents.get(&p).copied().flatten();
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
