//! The [`EntityStore`] owns the canonical entity list and the parent/child
//! structure derived from it.
//!
//! The store provides structural primitives only: insert from a seed, remove,
//! reparent, resort, lookup. Composite semantics (cascade delete, inverse
//! recording, sibling reindexing) live in the dispatcher, which drives these
//! primitives and is responsible for leaving the structural invariants intact
//! at the end of every dispatch.

use std::collections::HashMap;

use tracing::warn;

use crate::component::{Component, ComponentSet};
use crate::entity::{Entity, EntityId, EntitySeed};
use crate::SceneError;

// ---------------------------------------------------------------------------
// EntityStore
// ---------------------------------------------------------------------------

/// Flat list of entities plus the derived parent -> children index.
///
/// `order` is the global traversal order used by the renderer; it is append-
/// on-create and re-sorted stably by `index` component value on
/// [`resort`](Self::resort).
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: HashMap<EntityId, Entity>,
    order: Vec<EntityId>,
}

impl EntityStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // -- lookup --------------------------------------------------------------

    /// Whether an entity with this id exists.
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Look up an entity by id.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Mutable lookup. The caller must preserve the structural invariants.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Look up an entity, surfacing a typed error when it is missing. This is
    /// the form for callers that require the entity to exist before composing
    /// a command.
    pub fn assert_entity(&self, id: EntityId) -> Result<&Entity, SceneError> {
        self.get(id).ok_or(SceneError::EntityNotFound(id))
    }

    /// Child ids of an entity, in child-list order. With `deep`, the entire
    /// subtree below the entity in pre-order (the entity itself excluded).
    pub fn get_children(&self, id: EntityId, deep: bool) -> Vec<EntityId> {
        let Some(entity) = self.get(id) else {
            return Vec::new();
        };
        if !deep {
            return entity.children.clone();
        }
        let mut result = Vec::new();
        let mut stack: Vec<EntityId> = entity.children.iter().rev().copied().collect();
        while let Some(child) = stack.pop() {
            result.push(child);
            if let Some(e) = self.get(child) {
                stack.extend(e.children.iter().rev().copied());
            }
        }
        result
    }

    /// The sibling group under `parent`: the child list for `Some`, or the
    /// root-level entities (stably ordered by `index` value) for `None`.
    pub fn siblings(&self, parent: Option<EntityId>) -> Vec<EntityId> {
        match parent {
            Some(p) => self.get(p).map(|e| e.children.clone()).unwrap_or_default(),
            None => {
                let mut roots: Vec<EntityId> = self
                    .order
                    .iter()
                    .filter(|id| self.entities[*id].parent.is_none())
                    .copied()
                    .collect();
                roots.sort_by_key(|id| self.index_or_max(*id));
                roots
            }
        }
    }

    /// Root-level entity ids, ordered by `index` value.
    pub fn roots(&self) -> Vec<EntityId> {
        self.siblings(None)
    }

    /// All entity ids in global traversal order.
    pub fn iter_order(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.order.iter().copied()
    }

    /// Number of entities in the store.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the store holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // -- structural mutation -------------------------------------------------

    /// Build an entity from a seed and insert it.
    ///
    /// Missing `index` components are assigned `len(siblings)`; missing
    /// `name` components are assigned `"{kind} {sameKindSiblingCount + 1}"`.
    /// An unknown parent yields a root-level entity (not an error). A seed
    /// whose explicit id already exists is skipped with a warning and yields
    /// `None`.
    pub fn create_from_seed(&mut self, seed: EntitySeed) -> Option<EntityId> {
        let id = seed.id.unwrap_or_else(EntityId::new);
        if self.contains(id) {
            warn!(entity = %id, "create skipped: entity id already exists");
            return None;
        }

        let parent = match seed.parent {
            Some(p) if !self.contains(p) => {
                warn!(entity = %id, parent = %p, "unknown parent, creating at root level");
                None
            }
            other => other,
        };

        let mut components = ComponentSet::new();
        components.set(seed.components);

        let siblings = self.siblings(parent);
        if components.by_id(Component::INDEX).is_none() {
            components.add([Component::index(siblings.len() as i64)]);
        }
        if components.by_id(Component::NAME).is_none() {
            let same_kind = siblings
                .iter()
                .filter(|s| self.entities[s].kind == seed.kind)
                .count();
            components.add([Component::name(format!("{} {}", seed.kind, same_kind + 1))]);
        }

        let entity = Entity {
            id,
            kind: seed.kind,
            parent,
            children: Vec::new(),
            components,
        };

        if let Some(p) = parent {
            let position = entity.index();
            let children = &mut self.entities.get_mut(&p).expect("parent checked").children;
            let pos = match position {
                Some(i) if i >= 0 => (i as usize).min(children.len()),
                _ => children.len(),
            };
            children.insert(pos, id);
        }

        self.entities.insert(id, entity);
        self.order.push(id);
        Some(id)
    }

    /// Remove one entity, detaching it from its parent's child list.
    ///
    /// Does not cascade; callers remove descendants first.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        if let Some(p) = entity.parent {
            if let Some(parent) = self.entities.get_mut(&p) {
                parent.children.retain(|c| *c != id);
            }
        }
        self.order.retain(|e| *e != id);
        Some(entity)
    }

    /// Move an entity under a new parent (or to root level), attaching it at
    /// the position given by its current `index` component (clamped).
    ///
    /// Returns `false` without mutating when the target is unknown, the new
    /// parent does not exist, or the new parent lies inside the entity's own
    /// subtree (which would detach the subtree from the graph).
    pub fn reparent(&mut self, id: EntityId, new_parent: Option<EntityId>) -> bool {
        if !self.contains(id) {
            warn!(entity = %id, "reparent skipped: unknown entity");
            return false;
        }
        if let Some(p) = new_parent {
            if !self.contains(p) {
                warn!(entity = %id, parent = %p, "reparent skipped: unknown parent");
                return false;
            }
            if p == id || self.is_ancestor(id, p) {
                warn!(entity = %id, parent = %p, "reparent skipped: parent is inside the entity's subtree");
                return false;
            }
        }

        let old_parent = self.entities[&id].parent;
        if old_parent == new_parent {
            return true;
        }
        if let Some(op) = old_parent {
            if let Some(parent) = self.entities.get_mut(&op) {
                parent.children.retain(|c| *c != id);
            }
        }
        let position = self.entities[&id].index();
        if let Some(np) = new_parent {
            let children = &mut self.entities.get_mut(&np).expect("parent checked").children;
            let pos = match position {
                Some(i) if i >= 0 => (i as usize).min(children.len()),
                _ => children.len(),
            };
            children.insert(pos, id);
        }
        self.entities.get_mut(&id).expect("entity checked").parent = new_parent;
        true
    }

    /// Re-sort the entire entity list by `index` component value (stable,
    /// ascending), and realign every child list with its children's indices.
    ///
    /// Global rather than localized on purpose: cross-parent ordering only
    /// matters for traversal order, not semantics.
    pub fn resort(&mut self) {
        let entities = &self.entities;
        let mut order = std::mem::take(&mut self.order);
        order.sort_by_key(|id| entities.get(id).and_then(Entity::index).unwrap_or(i64::MAX));
        self.order = order;

        let mut reordered: Vec<(EntityId, Vec<EntityId>)> = Vec::new();
        for (id, entity) in &self.entities {
            if entity.children.len() > 1 {
                let mut children = entity.children.clone();
                children.sort_by_key(|c| self.index_or_max(*c));
                if children != entity.children {
                    reordered.push((*id, children));
                }
            }
        }
        for (id, children) in reordered {
            self.entities.get_mut(&id).expect("id from iteration").children = children;
        }
    }

    // -- consistency ---------------------------------------------------------

    /// Verify the structural invariants: parent/child symmetry, order-list
    /// completeness, and contiguous `{0..n-1}` indices per sibling group.
    ///
    /// Violations are programming errors in the mutation paths, not
    /// recoverable conditions; the dispatcher asserts this in debug builds at
    /// the end of every top-level dispatch.
    pub fn check_consistency(&self) -> Result<(), String> {
        if self.order.len() != self.entities.len() {
            return Err(format!(
                "order list has {} entries for {} entities",
                self.order.len(),
                self.entities.len()
            ));
        }
        for id in &self.order {
            if !self.entities.contains_key(id) {
                return Err(format!("order lists unknown entity {id}"));
            }
        }

        for (id, entity) in &self.entities {
            if let Some(p) = entity.parent {
                let Some(parent) = self.entities.get(&p) else {
                    return Err(format!("entity {id} has unknown parent {p}"));
                };
                if !parent.children.contains(id) {
                    return Err(format!("entity {id} missing from parent {p} child list"));
                }
            }
            for child in &entity.children {
                match self.entities.get(child) {
                    None => return Err(format!("entity {id} lists unknown child {child}")),
                    Some(c) if c.parent != Some(*id) => {
                        return Err(format!("child {child} does not point back to {id}"))
                    }
                    Some(_) => {}
                }
            }
        }

        let mut groups: Vec<Option<EntityId>> = vec![None];
        groups.extend(self.entities.keys().map(|id| Some(*id)));
        for group in groups {
            let siblings = self.siblings(group);
            let mut indices: Vec<i64> = siblings
                .iter()
                .filter_map(|id| self.entities.get(id).and_then(Entity::index))
                .collect();
            if indices.len() != siblings.len() {
                return Err(format!("sibling group {group:?} has entities without an index"));
            }
            indices.sort_unstable();
            let expected: Vec<i64> = (0..siblings.len() as i64).collect();
            if indices != expected {
                return Err(format!(
                    "sibling group {group:?} indices {indices:?} are not contiguous"
                ));
            }
        }
        Ok(())
    }

    // -- ancestry ------------------------------------------------------------

    fn index_or_max(&self, id: EntityId) -> i64 {
        self.entities.get(&id).and_then(Entity::index).unwrap_or(i64::MAX)
    }

    /// Whether `ancestor` is a strict ancestor of `id`. Used to reject
    /// reparenting an entity under its own subtree, and by bulk operations to
    /// fold ids nested under another listed id into that id's cascade.
    pub fn is_ancestor(&self, ancestor: EntityId, id: EntityId) -> bool {
        let mut current = self.entities.get(&id).and_then(|e| e.parent);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.entities.get(&p).and_then(|e| e.parent);
        }
        false
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
