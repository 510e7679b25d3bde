//! Sibling index maintenance.
//!
//! Creation, deletion, and re-ordering must keep every sibling group's
//! `index` components a contiguous permutation `{0..n-1}`. The planners here
//! compute the minimal set of index writes for a structural change; the
//! dispatcher feeds the plans through `UpdateEntity` so the writes produce a
//! capturable diff.

use crate::component::Component;
use crate::entity::{Entity, EntityId};
use crate::store::EntityStore;

/// One planned index write.
pub type IndexWrite = (EntityId, i64);

/// The subtree rooted at `id` in pre-order, the root included. This is the
/// child-lookup that cascade deletion and cloning expand through.
pub fn collect_subtree(store: &EntityStore, id: EntityId) -> Vec<EntityId> {
    let mut result = vec![id];
    result.extend(store.get_children(id, true));
    result
}

/// Index writes that compact a sibling group to `{0..n-1}` in its current
/// order. Entities whose index is already correct are omitted.
pub fn compact_plan(store: &EntityStore, parent: Option<EntityId>) -> Vec<IndexWrite> {
    store
        .siblings(parent)
        .into_iter()
        .enumerate()
        .filter_map(|(pos, id)| {
            let current = store.get(id).and_then(Entity::index);
            (current != Some(pos as i64)).then_some((id, pos as i64))
        })
        .collect()
}

/// Index writes that move `id` from `old_index` to `new_index` within one
/// sibling group: every sibling strictly between the two positions shifts by
/// one in the direction of `sign(old_index - new_index)`.
///
/// Requires `old_index` to be a live position in the group; callers with a
/// sentinel index (a fresh clone) use [`compact_plan`] instead.
pub fn shift_plan(
    store: &EntityStore,
    id: EntityId,
    old_index: i64,
    new_index: i64,
    parent: Option<EntityId>,
) -> Vec<IndexWrite> {
    let mut writes = Vec::new();
    if old_index == new_index {
        return writes;
    }
    for sibling in store.siblings(parent) {
        if sibling == id {
            continue;
        }
        let Some(index) = store.get(sibling).and_then(Entity::index) else {
            continue;
        };
        if old_index > new_index && index >= new_index && index < old_index {
            writes.push((sibling, index + 1));
        } else if old_index < new_index && index > old_index && index <= new_index {
            writes.push((sibling, index - 1));
        }
    }
    writes.push((id, new_index));
    writes
}

/// Wrap index writes as `UpdateEntity` payload entries.
pub fn writes_to_updates(writes: Vec<IndexWrite>) -> Vec<crate::action::EntityUpdate> {
    writes
        .into_iter()
        .map(|(id, index)| crate::action::EntityUpdate::components(id, vec![Component::index(index)]))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntitySeed;

    fn scene() -> (EntityStore, EntityId, Vec<EntityId>) {
        let mut store = EntityStore::new();
        let root = store.create_from_seed(EntitySeed::new("group")).unwrap();
        let children: Vec<EntityId> = (0..4)
            .map(|_| {
                store
                    .create_from_seed(EntitySeed::new("sprite").with_parent(root))
                    .unwrap()
            })
            .collect();
        (store, root, children)
    }

    #[test]
    fn subtree_is_preorder_and_includes_root() {
        let mut store = EntityStore::new();
        let root = store.create_from_seed(EntitySeed::new("group")).unwrap();
        let a = store
            .create_from_seed(EntitySeed::new("group").with_parent(root))
            .unwrap();
        let b = store
            .create_from_seed(EntitySeed::new("sprite").with_parent(root))
            .unwrap();
        let a1 = store
            .create_from_seed(EntitySeed::new("sprite").with_parent(a))
            .unwrap();
        assert_eq!(collect_subtree(&store, root), vec![root, a, a1, b]);
        assert_eq!(collect_subtree(&store, b), vec![b]);
    }

    #[test]
    fn shift_up_moves_intermediates_down() {
        let (store, root, c) = scene();
        // Move the last child (index 3) to position 1: siblings 1 and 2 shift up by one.
        let writes = shift_plan(&store, c[3], 3, 1, Some(root));
        assert!(writes.contains(&(c[1], 2)));
        assert!(writes.contains(&(c[2], 3)));
        assert!(writes.contains(&(c[3], 1)));
        assert_eq!(writes.len(), 3);
    }

    #[test]
    fn shift_down_moves_intermediates_up() {
        let (store, root, c) = scene();
        // Move the first child (index 0) to position 2: siblings 1 and 2 shift down by one.
        let writes = shift_plan(&store, c[0], 0, 2, Some(root));
        assert!(writes.contains(&(c[1], 0)));
        assert!(writes.contains(&(c[2], 1)));
        assert!(writes.contains(&(c[0], 2)));
        assert_eq!(writes.len(), 3);
    }

    #[test]
    fn shift_to_same_position_is_empty() {
        let (store, root, c) = scene();
        assert!(shift_plan(&store, c[1], 1, 1, Some(root)).is_empty());
    }

    #[test]
    fn compact_skips_correct_indices() {
        let (mut store, root, c) = scene();
        // Remove the middle child; the survivors above it need compaction.
        store.remove(c[1]);
        let writes = compact_plan(&store, Some(root));
        assert_eq!(writes, vec![(c[2], 1), (c[3], 2)]);
    }
}
