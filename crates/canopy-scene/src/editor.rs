//! The action dispatcher.
//!
//! [`Editor`] owns every piece of mutable scene state (store, history,
//! selection, clipboard) and applies action batches against it. A batch is
//! atomic relative to other dispatches: all mutation happens synchronously on
//! the dispatch call stack, in declared order, and observers only run after
//! the outermost batch completes.
//!
//! Persisted actions record an inverse/forward pair in the history as part of
//! their own application, built from the structured diffs the store and
//! component collection return. Every action the dispatcher itself replays
//! (undo, redo, internal sub-steps of composite actions) carries
//! `persist = false` so replay never grows the stacks.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::action::{Action, DispatchOutcome, EntityUpdate, ParentUpdate, SortMove};
use crate::clipboard::Clipboard;
use crate::component::Component;
use crate::document::SceneDocument;
use crate::entity::{Entity, EntityId, EntitySeed};
use crate::history::HistoryManager;
use crate::selection::Selection;
use crate::sort;
use crate::store::EntityStore;
use crate::SceneError;

/// Callback invoked after each completed dispatch with the actions that were
/// applied (internal sub-steps included) and the store they ran against.
pub type Observer = Box<dyn FnMut(&[Action], &EntityStore)>;

// ---------------------------------------------------------------------------
// Editor
// ---------------------------------------------------------------------------

/// The scene editor core: entity store, history, selection, and clipboard
/// behind a single action-dispatch entry point.
#[derive(Default)]
pub struct Editor {
    store: EntityStore,
    history: HistoryManager,
    selection: Selection,
    clipboard: Clipboard,
    observers: Vec<Observer>,
    journal: Vec<Action>,
    outcome: DispatchOutcome,
    dispatching: bool,
}

impl Editor {
    /// An empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    // -- collaborator surface --------------------------------------------------

    /// The entity store (read only; all mutation goes through actions).
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Look up an entity by id.
    pub fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.store.get(id)
    }

    /// Child ids of an entity, optionally the whole subtree in pre-order.
    pub fn get_children(&self, id: EntityId, deep: bool) -> Vec<EntityId> {
        self.store.get_children(id, deep)
    }

    /// Look up an entity, surfacing a typed error when it is missing.
    pub fn assert_entity(&self, id: EntityId) -> Result<&Entity, SceneError> {
        self.store.assert_entity(id)
    }

    /// The selection/isolation state.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The undo/redo stacks.
    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    /// Whether the clipboard holds anything to paste.
    pub fn can_paste(&self) -> bool {
        !self.clipboard.is_empty()
    }

    /// Register a dispatch observer.
    pub fn observe(&mut self, observer: impl FnMut(&[Action], &EntityStore) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Capture the scene for persistence hand-off.
    pub fn export(&self) -> SceneDocument {
        SceneDocument::export(&self.store)
    }

    /// Replace the scene with a validated document. Resets the history and
    /// the selection; the clipboard survives so content can be pasted across
    /// documents.
    pub fn import(&mut self, document: &SceneDocument) -> Result<(), SceneError> {
        self.store = document.import()?;
        self.history.reset();
        self.selection = Selection::new();
        Ok(())
    }

    // -- dispatch ---------------------------------------------------------------

    /// Dispatch a single action.
    pub fn dispatch_one(&mut self, action: Action) -> DispatchOutcome {
        self.dispatch(vec![action])
    }

    /// Apply a batch of actions in declared order.
    ///
    /// Returns which entities the batch created and deleted, cascades and
    /// internal sub-steps included. In debug builds the structural invariants
    /// are verified after the batch; a violation is a bug in a mutation path
    /// and panics rather than being reported.
    pub fn dispatch(&mut self, actions: Vec<Action>) -> DispatchOutcome {
        debug_assert!(!self.dispatching, "dispatch reentered mid-mutation");
        self.dispatching = true;
        self.journal.clear();
        self.outcome = DispatchOutcome::default();

        for action in actions {
            self.apply(action);
        }

        #[cfg(debug_assertions)]
        if let Err(violation) = self.store.check_consistency() {
            panic!("structural invariant violated after dispatch: {violation}");
        }

        self.dispatching = false;
        let journal = std::mem::take(&mut self.journal);
        let mut observers = std::mem::take(&mut self.observers);
        for observer in &mut observers {
            observer(&journal, &self.store);
        }
        observers.extend(self.observers.drain(..));
        self.observers = observers;

        std::mem::take(&mut self.outcome)
    }

    fn apply(&mut self, action: Action) {
        self.journal.push(action.clone());
        match action {
            Action::CreateEntity { data, persist } => self.apply_create(data, persist),
            Action::DeleteEntity { ids, persist } => {
                if let Some((undo, roots)) = self.delete_entities(&ids) {
                    if persist {
                        let redo = vec![Action::DeleteEntity {
                            ids: roots,
                            persist: false,
                        }];
                        self.history.push(undo, redo, false);
                    }
                }
            }
            Action::UpdateEntity {
                data,
                message,
                persist,
            } => self.apply_update(data, message, persist),
            Action::SortEntity { data, persist } => self.apply_sort(data, persist),
            Action::CloneEntity { data, persist } => self.apply_clone(data, persist),
            Action::CopyEntity { ids } => self.clipboard.copy(&self.store, &ids),
            Action::CutEntity { ids, persist } => self.apply_cut(ids, persist),
            Action::PasteData { persist } => self.apply_paste(persist),
            Action::Select {
                ids,
                components,
                persist,
                unselect_current,
            } => self.apply_select(ids, components, persist, unselect_current),
            Action::Unselect {
                ids,
                components,
                persist,
            } => self.apply_unselect(ids, components, persist),
            Action::Isolate { id, persist } => self.apply_isolate(id, persist),
            Action::PushHistory {
                actions,
                last,
                override_last,
            } => {
                let actions = actions.into_iter().map(Action::unpersisted).collect();
                let last = last.into_iter().map(Action::unpersisted).collect();
                self.history.push(actions, last, override_last);
            }
            Action::UndoHistory => {
                if let Some(entry) = self.history.begin_undo() {
                    for inverse in entry.actions.clone() {
                        self.apply(inverse);
                    }
                    self.history.finish_undo(entry);
                } else {
                    debug!("undo on an empty history is a no-op");
                }
            }
            Action::RedoHistory => {
                if let Some(entry) = self.history.begin_redo() {
                    for forward in entry.actions.clone() {
                        self.apply(forward);
                    }
                    self.history.finish_redo(entry);
                } else {
                    debug!("redo on an empty history is a no-op");
                }
            }
            Action::ResetHistory => self.history.reset(),
        }
    }

    // -- entity CRUD ------------------------------------------------------------

    /// Insert seeds and return the created ids plus their concrete seeds
    /// (ids, indices, and names already assigned), the form redo replays.
    fn create_entities(&mut self, data: Vec<EntitySeed>) -> (Vec<EntityId>, Vec<EntitySeed>) {
        let mut created = Vec::new();
        let mut concrete = Vec::new();
        for seed in data {
            if let Some(id) = self.store.create_from_seed(seed) {
                created.push(id);
                if let Some(entity) = self.store.get(id) {
                    concrete.push(entity.to_seed());
                }
            }
        }
        self.outcome.created.extend(created.iter().copied());
        (created, concrete)
    }

    fn apply_create(&mut self, data: Vec<EntitySeed>, persist: bool) {
        let (created, concrete) = self.create_entities(data);
        if persist && !created.is_empty() {
            self.history.push(
                vec![Action::DeleteEntity {
                    ids: created,
                    persist: false,
                }],
                vec![Action::CreateEntity {
                    data: concrete,
                    persist: false,
                }],
                false,
            );
        }
    }

    /// Cascade-remove the listed subtrees.
    ///
    /// Returns the undo action list (subtree re-creation, survivor index
    /// restoration, and selection/isolation restoration when the deletion
    /// touched them) plus the deduplicated subtree roots, or `None` when
    /// nothing was deleted.
    fn delete_entities(&mut self, ids: &[EntityId]) -> Option<(Vec<Action>, Vec<EntityId>)> {
        // Reduce the listed ids to ancestor-free subtree roots. An id nested
        // under another listed id is covered by that id's cascade, whichever
        // of the two the caller listed first.
        let mut roots: Vec<EntityId> = Vec::new();
        for id in ids {
            if !self.store.contains(*id) {
                warn!(entity = %id, "delete skipped an unknown entity");
                continue;
            }
            if roots.contains(id) {
                continue;
            }
            let nested = ids.iter().any(|other| {
                *other != *id
                    && self.store.contains(*other)
                    && self.store.is_ancestor(*other, *id)
            });
            if !nested {
                roots.push(*id);
            }
        }
        // Root subtrees are disjoint, so pre-order expansion lists every
        // parent before its children; undo replays the seeds front to back.
        let mut targets: Vec<EntityId> = Vec::new();
        for root in &roots {
            targets.extend(sort::collect_subtree(&self.store, *root));
        }
        if targets.is_empty() {
            return None;
        }

        // Capture before removal: seeds in parents-before-children order, and
        // the sibling groups that will need compaction afterwards.
        let seeds: Vec<EntitySeed> = targets
            .iter()
            .filter_map(|id| self.store.get(*id).map(Entity::to_seed))
            .collect();
        let mut groups: Vec<Option<EntityId>> = Vec::new();
        for id in &targets {
            let parent = self.store.get(*id).and_then(|e| e.parent);
            let parent_survives = parent.map_or(true, |p| !targets.contains(&p));
            if parent_survives && !groups.contains(&parent) {
                groups.push(parent);
            }
        }
        let (prev_ids, prev_buffer) = self.selection.snapshot();
        let prev_isolated = self.selection.isolated();

        // Children first, so no child list ever references a removed entity.
        for id in targets.iter().rev() {
            self.store.remove(*id);
        }
        self.outcome.deleted.extend(targets.iter().copied());

        let selection_changed = self.selection.retain_existing(&targets);
        let isolation_changed = self.selection.isolated() != prev_isolated;

        // Compact each surviving group, remembering the pre-compaction index
        // values so one undo restores both the subtree and its old siblings.
        let mut restores: Vec<EntityUpdate> = Vec::new();
        let mut compacted = false;
        for group in groups {
            for (id, index) in sort::compact_plan(&self.store, group) {
                let before = self.store.get(id).and_then(Entity::index);
                if let Some(entity) = self.store.get_mut(id) {
                    entity.components.set([Component::index(index)]);
                    compacted = true;
                }
                if let Some(before) = before {
                    restores.push(EntityUpdate::components(id, vec![Component::index(before)]));
                }
            }
        }
        if compacted {
            self.store.resort();
        }

        let mut undo = vec![Action::CreateEntity {
            data: seeds,
            persist: false,
        }];
        if !restores.is_empty() {
            undo.push(Action::UpdateEntity {
                data: restores,
                message: String::new(),
                persist: false,
            });
        }
        if isolation_changed {
            undo.push(Action::Isolate {
                id: prev_isolated,
                persist: false,
            });
        }
        if selection_changed {
            undo.push(Action::Select {
                ids: prev_ids,
                components: prev_buffer,
                persist: false,
                unselect_current: true,
            });
        }
        Some((undo, roots))
    }

    fn apply_update(&mut self, data: Vec<EntityUpdate>, message: String, persist: bool) {
        let (sel_ids, sel_buffer) = self.selection.snapshot();
        let mut inverse: Vec<EntityUpdate> = Vec::new();
        let mut applied: Vec<EntityUpdate> = Vec::new();
        let mut dirty_groups: Vec<Option<EntityId>> = Vec::new();
        let mut needs_resort = false;
        let mut selection_touched = false;

        for entry in data {
            let Some(entity) = self.store.get(entry.id) else {
                warn!(entity = %entry.id, "update skipped an unknown entity");
                continue;
            };
            let old_parent = entity.parent;

            // Merge first, so a reparent in the same entry attaches at the
            // freshly written index.
            let diff = match self.store.get_mut(entry.id) {
                Some(e) => e.components.set(entry.components.clone()),
                None => continue,
            };
            let mut inverse_components: Vec<Component> = Vec::new();
            for change in &diff.updated {
                inverse_components.push(change.before.clone());
            }
            for added in &diff.added {
                inverse_components.push(added.clone().for_delete());
            }
            for removed in &diff.removed {
                inverse_components.push(removed.clone());
            }
            if entry.components.iter().any(|c| c.id == Component::INDEX) {
                needs_resort = true;
            }

            let mut inverse_parent = ParentUpdate::Unchanged;
            let target = match entry.parent {
                ParentUpdate::Unchanged => None,
                ParentUpdate::Root => Some(None),
                ParentUpdate::To(p) => Some(Some(p)),
            };
            if let Some(new_parent) = target {
                if new_parent != old_parent && self.store.reparent(entry.id, new_parent) {
                    needs_resort = true;
                    inverse_parent = match old_parent {
                        Some(p) => ParentUpdate::To(p),
                        None => ParentUpdate::Root,
                    };
                    for group in [old_parent, new_parent] {
                        if !dirty_groups.contains(&group) {
                            dirty_groups.push(group);
                        }
                    }
                }
            }

            // A selected entity's merge is mirrored into the shared edit
            // buffer so multi-select editing shows current values. A merge
            // that changed nothing leaves the buffer alone, keeping no-op
            // updates free of side effects.
            if self.selection.contains(entry.id) && !diff.is_empty() {
                let merged: Vec<Component> = entry
                    .components
                    .iter()
                    .filter(|c| !c.marked_for_delete)
                    .cloned()
                    .collect();
                self.selection.select(&[], &merged);
                selection_touched = true;
            }

            if !inverse_components.is_empty() || inverse_parent != ParentUpdate::Unchanged {
                inverse.push(EntityUpdate {
                    id: entry.id,
                    parent: inverse_parent,
                    components: inverse_components,
                });
            }
            applied.push(entry);
        }

        // Groups a reparent pulled an entity out of (or into) are compacted
        // back to contiguity; the writes join the same inverse/forward pair.
        let mut compacted = false;
        for group in dirty_groups {
            for (id, index) in sort::compact_plan(&self.store, group) {
                let before = self.store.get(id).and_then(Entity::index);
                if let Some(entity) = self.store.get_mut(id) {
                    entity.components.set([Component::index(index)]);
                    compacted = true;
                }
                if let Some(before) = before {
                    inverse.push(EntityUpdate::components(id, vec![Component::index(before)]));
                }
                applied.push(EntityUpdate::components(id, vec![Component::index(index)]));
            }
        }
        if needs_resort || compacted {
            self.store.resort();
        }

        if persist && !inverse.is_empty() {
            inverse.reverse();
            let mut undo = vec![Action::UpdateEntity {
                data: inverse,
                message: message.clone(),
                persist: false,
            }];
            let mut redo = vec![Action::UpdateEntity {
                data: applied,
                message,
                persist: false,
            }];
            if selection_touched {
                undo.push(Action::Select {
                    ids: sel_ids.clone(),
                    components: sel_buffer,
                    persist: false,
                    unselect_current: true,
                });
                let (cur_ids, cur_buffer) = self.selection.snapshot();
                redo.push(Action::Select {
                    ids: cur_ids,
                    components: cur_buffer,
                    persist: false,
                    unselect_current: true,
                });
            }
            self.history.push(undo, redo, false);
        }
    }

    // -- ordering ----------------------------------------------------------------

    fn apply_sort(&mut self, data: Vec<SortMove>, persist: bool) {
        let mut inverse_moves: Vec<SortMove> = Vec::new();
        let mut applied: Vec<SortMove> = Vec::new();

        for mv in data {
            let Some(entity) = self.store.get(mv.id) else {
                warn!(entity = %mv.id, "sort skipped an unknown entity");
                continue;
            };
            let old_parent = entity.parent;
            let old_index = entity.index();

            if mv.parent == old_parent {
                let group_last = self.store.siblings(mv.parent).len() as i64 - 1;
                let target = mv.index.clamp(0, group_last.max(0));
                let writes = match old_index {
                    Some(old) if old >= 0 => {
                        if old == target {
                            continue;
                        }
                        sort::shift_plan(&self.store, mv.id, old, target, mv.parent)
                    }
                    // Sentinel index (a fresh clone appended to the group):
                    // treat the end of the group as the old position.
                    _ => {
                        let mut writes =
                            sort::shift_plan(&self.store, mv.id, group_last, target, mv.parent);
                        if writes.is_empty() {
                            writes.push((mv.id, target));
                        }
                        writes
                    }
                };
                self.apply(Action::UpdateEntity {
                    data: sort::writes_to_updates(writes),
                    message: String::new(),
                    persist: false,
                });
            } else {
                // Cross-group: append to the new group first (reparent plus an
                // end-of-group index, compacted by the update), then shift to
                // the requested position within that group.
                if let Some(p) = mv.parent {
                    if !self.store.contains(p) {
                        warn!(entity = %mv.id, parent = %p, "sort skipped: unknown parent");
                        continue;
                    }
                    if p == mv.id || self.store.get_children(mv.id, true).contains(&p) {
                        warn!(entity = %mv.id, parent = %p, "sort skipped: parent is inside the entity's subtree");
                        continue;
                    }
                }
                let appended = self.store.siblings(mv.parent).len() as i64;
                let parent_update = match mv.parent {
                    Some(p) => ParentUpdate::To(p),
                    None => ParentUpdate::Root,
                };
                self.apply(Action::UpdateEntity {
                    data: vec![EntityUpdate {
                        id: mv.id,
                        parent: parent_update,
                        components: vec![Component::index(appended)],
                    }],
                    message: String::new(),
                    persist: false,
                });
                let target = mv.index.clamp(0, appended);
                if target != appended {
                    let writes =
                        sort::shift_plan(&self.store, mv.id, appended, target, mv.parent);
                    self.apply(Action::UpdateEntity {
                        data: sort::writes_to_updates(writes),
                        message: String::new(),
                        persist: false,
                    });
                }
            }

            inverse_moves.push(SortMove {
                id: mv.id,
                index: old_index.unwrap_or(-1),
                parent: old_parent,
            });
            applied.push(mv);
        }

        if persist && !applied.is_empty() {
            inverse_moves.reverse();
            self.history.push(
                vec![Action::SortEntity {
                    data: inverse_moves,
                    persist: false,
                }],
                vec![Action::SortEntity {
                    data: applied,
                    persist: false,
                }],
                false,
            );
        }
    }

    fn apply_clone(&mut self, data: Vec<SortMove>, persist: bool) {
        let mut clone_roots: Vec<EntityId> = Vec::new();
        let mut redo_seeds: Vec<EntitySeed> = Vec::new();
        let mut placements: Vec<SortMove> = Vec::new();

        for mv in data {
            if !self.store.contains(mv.id) {
                warn!(entity = %mv.id, "clone skipped an unknown entity");
                continue;
            }
            let sources = sort::collect_subtree(&self.store, mv.id);
            let remap: HashMap<EntityId, EntityId> =
                sources.iter().map(|s| (*s, EntityId::new())).collect();

            let mut batch: Vec<EntitySeed> = Vec::new();
            for source in &sources {
                let Some(entity) = self.store.get(*source) else { continue };
                let mut seed = entity.to_seed();
                seed.id = remap.get(source).copied();
                seed.parent = if *source == mv.id {
                    mv.parent
                } else {
                    entity.parent.and_then(|p| remap.get(&p).copied())
                };
                for component in seed.components.iter_mut() {
                    if component.id == Component::NAME {
                        if let Some(name) = component.name_value() {
                            *component = Component::name(format!("{name} clone"));
                        }
                    }
                }
                if *source == mv.id {
                    // Sentinel: the clone lands at the end of the group and
                    // the placement sort below shifts it into position.
                    for component in seed.components.iter_mut() {
                        if component.id == Component::INDEX {
                            *component = Component::index(-1);
                        }
                    }
                }
                batch.push(seed);
            }

            let (created, _) = self.create_entities(batch.clone());
            if created.is_empty() {
                continue;
            }
            let root = remap[&mv.id];
            let placement = SortMove {
                id: root,
                index: mv.index,
                parent: mv.parent,
            };
            self.apply(Action::SortEntity {
                data: vec![placement.clone()],
                persist: false,
            });

            clone_roots.push(root);
            redo_seeds.extend(batch);
            placements.push(placement);
        }

        if persist && !clone_roots.is_empty() {
            self.history.push(
                vec![Action::DeleteEntity {
                    ids: clone_roots,
                    persist: false,
                }],
                vec![
                    Action::CreateEntity {
                        data: redo_seeds,
                        persist: false,
                    },
                    Action::SortEntity {
                        data: placements,
                        persist: false,
                    },
                ],
                false,
            );
        }
    }

    // -- clipboard ----------------------------------------------------------------

    fn apply_cut(&mut self, ids: Vec<EntityId>, persist: bool) {
        let (prev_ids, prev_buffer) = self.selection.snapshot();
        self.selection.clear();
        self.clipboard.copy(&self.store, &ids);

        let Some((mut undo, roots)) = self.delete_entities(&ids) else {
            self.selection.select(&prev_ids, &prev_buffer);
            return;
        };
        if persist {
            undo.push(Action::Select {
                ids: prev_ids,
                components: prev_buffer,
                persist: false,
                unselect_current: true,
            });
            self.history.push(
                undo,
                vec![Action::CutEntity {
                    ids: roots,
                    persist: false,
                }],
                false,
            );
        }
    }

    fn apply_paste(&mut self, persist: bool) {
        if self.clipboard.is_empty() {
            debug!("paste skipped: clipboard is empty");
            return;
        }
        let anchor = self.selection.isolated();
        let seeds = self.clipboard.rebuild(anchor);
        let roots: Vec<EntityId> = seeds
            .iter()
            .filter(|s| s.parent == anchor)
            .filter_map(|s| s.id)
            .collect();

        let (created, concrete) = self.create_entities(seeds);
        if created.is_empty() {
            return;
        }
        if persist {
            self.history.push(
                vec![Action::DeleteEntity {
                    ids: roots,
                    persist: false,
                }],
                vec![Action::CreateEntity {
                    data: concrete,
                    persist: false,
                }],
                false,
            );
        }
    }

    // -- selection ------------------------------------------------------------------

    fn apply_select(
        &mut self,
        ids: Vec<EntityId>,
        components: Vec<Component>,
        persist: bool,
        unselect_current: bool,
    ) {
        let (prev_ids, prev_buffer) = self.selection.snapshot();
        if unselect_current {
            self.selection.clear();
        }
        let existing: Vec<EntityId> = ids
            .into_iter()
            .filter(|id| {
                let known = self.store.contains(*id);
                if !known {
                    warn!(entity = %id, "select skipped an unknown entity");
                }
                known
            })
            .collect();
        self.selection.select(&existing, &components);

        if persist && self.selection.snapshot() != (prev_ids.clone(), prev_buffer.clone()) {
            self.history.push(
                vec![Action::Select {
                    ids: prev_ids,
                    components: prev_buffer,
                    persist: false,
                    unselect_current: true,
                }],
                vec![Action::Select {
                    ids: existing,
                    components,
                    persist: false,
                    unselect_current,
                }],
                false,
            );
        }
    }

    fn apply_unselect(
        &mut self,
        ids: Option<Vec<EntityId>>,
        components: Option<Vec<Component>>,
        persist: bool,
    ) {
        let (prev_ids, prev_buffer) = self.selection.snapshot();
        self.selection.unselect(ids.as_deref(), components.as_deref());

        if persist && self.selection.snapshot() != (prev_ids.clone(), prev_buffer.clone()) {
            self.history.push(
                vec![Action::Select {
                    ids: prev_ids,
                    components: prev_buffer,
                    persist: false,
                    unselect_current: true,
                }],
                vec![Action::Unselect {
                    ids,
                    components,
                    persist: false,
                }],
                false,
            );
        }
    }

    fn apply_isolate(&mut self, id: Option<EntityId>, persist: bool) {
        if self.selection.isolated() == id {
            return;
        }
        if let Some(target) = id {
            if !self.store.contains(target) {
                warn!(entity = %target, "isolate skipped an unknown entity");
                return;
            }
        }
        let (prev_ids, prev_buffer) = self.selection.snapshot();
        self.selection.clear();
        let previous = self.selection.isolate(id);

        if persist {
            self.history.push(
                vec![
                    Action::Isolate {
                        id: previous,
                        persist: false,
                    },
                    Action::Select {
                        ids: prev_ids,
                        components: prev_buffer,
                        persist: false,
                        unselect_current: true,
                    },
                ],
                vec![Action::Isolate { id, persist: false }],
                false,
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
