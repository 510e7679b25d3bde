//! Copy/paste buffer with id remapping.
//!
//! Copy captures the selected subtrees as seeds, each tagged with a private
//! bookkeeping component recording the source id and whether the entry was a
//! selection root. Paste never reuses those ids: [`Clipboard::rebuild`] mints
//! a fresh id for every entry and rewrites parent references through the
//! old-to-new map, so pasting twice yields two independent subtrees and
//! pasting after the source was deleted still works.

use std::collections::HashMap;

use serde_json::Value;
use tracing::warn;

use crate::component::Component;
use crate::entity::{EntityId, EntitySeed};
use crate::sort::collect_subtree;
use crate::store::EntityStore;

/// Id of the bookkeeping component a buffered seed carries. Stripped on paste.
const DESCRIPTOR: &str = "clipboard";

/// The copy/paste buffer. Holds seeds, not live entities, so the buffer stays
/// valid across any later mutation of the scene.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    buffer: Vec<EntitySeed>,
}

impl Clipboard {
    /// An empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the buffer holds anything to paste.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Number of buffered seeds (descendants included).
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Drop the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Replace the buffer with the subtrees rooted at `ids`.
    ///
    /// Ids nested under another listed id are dropped first: their subtree is
    /// already captured through the outer root, and keeping them would paste
    /// the inner subtree twice. Unknown ids are skipped with a warning.
    pub fn copy(&mut self, store: &EntityStore, ids: &[EntityId]) {
        let roots: Vec<EntityId> = ids
            .iter()
            .copied()
            .filter(|id| {
                if !store.contains(*id) {
                    warn!(entity = %id, "copy skipped an unknown entity");
                    return false;
                }
                !ids.iter().any(|other| *other != *id && store.is_ancestor(*other, *id))
            })
            .collect();

        self.buffer.clear();
        for root in &roots {
            for id in collect_subtree(store, *root) {
                let Some(entity) = store.get(id) else { continue };
                let mut seed = entity.to_seed();
                seed.id = None;
                seed.components.push(descriptor(id, id == *root));
                self.buffer.push(seed);
            }
        }
    }

    /// Build pasteable seeds from the buffer: fresh id per entry, parent
    /// references rewritten through the old-to-new map, root entries anchored
    /// under `anchor` (the isolated entity, or scene root for `None`).
    ///
    /// Root entries lose their `index` component so the store appends them at
    /// the end of the anchor's sibling group; descendants keep theirs, which
    /// preserves in-subtree ordering.
    pub fn rebuild(&self, anchor: Option<EntityId>) -> Vec<EntitySeed> {
        let mut remap: HashMap<EntityId, EntityId> = HashMap::new();
        for seed in &self.buffer {
            if let Some(source) = descriptor_source(seed) {
                remap.insert(source, EntityId::new());
            }
        }

        let mut seeds = Vec::with_capacity(self.buffer.len());
        for seed in &self.buffer {
            let Some(source) = descriptor_source(seed) else { continue };
            let is_root = descriptor_is_root(seed);
            let mut out = seed.clone();
            out.id = remap.get(&source).copied();
            out.parent = if is_root {
                anchor
            } else {
                seed.parent.and_then(|p| remap.get(&p).copied())
            };
            out.components.retain(|c| {
                c.id != DESCRIPTOR && !(is_root && c.id == Component::INDEX)
            });
            seeds.push(out);
        }
        seeds
    }
}

fn descriptor(source: EntityId, root: bool) -> Component {
    Component::new(DESCRIPTOR, DESCRIPTOR)
        .with_field("ref", source.to_string())
        .with_field("root", root)
}

fn descriptor_source(seed: &EntitySeed) -> Option<EntityId> {
    seed.components
        .iter()
        .find(|c| c.id == DESCRIPTOR)?
        .field("ref")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .map(EntityId::from_uuid)
}

fn descriptor_is_root(seed: &EntitySeed) -> bool {
    seed.components
        .iter()
        .find(|c| c.id == DESCRIPTOR)
        .and_then(|c| c.field("root"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
