//! Selection and isolation state.
//!
//! The tracker is plain data: an ordered id list, a shared component buffer
//! for multi-entity editing, and the optional isolation scope. Inverse
//! capture lives in the dispatcher; the tracker only exposes enough of its
//! state to snapshot it before a change.

use tracing::warn;

use crate::component::Component;
use crate::entity::EntityId;

/// The current selection, its shared edit buffer, and the isolation scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: Vec<EntityId>,
    buffer: Vec<Component>,
    isolated: Option<EntityId>,
}

impl Selection {
    /// An empty selection at scene-root scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected ids in selection order.
    pub fn ids(&self) -> &[EntityId] {
        &self.ids
    }

    /// The shared edit buffer.
    pub fn buffer(&self) -> &[Component] {
        &self.buffer
    }

    /// The isolation scope, `None` at scene root.
    pub fn isolated(&self) -> Option<EntityId> {
        self.isolated
    }

    /// Whether `id` is currently selected.
    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Add ids to the selection and upsert buffer components by id.
    /// Already-selected ids keep their position instead of duplicating.
    pub fn select(&mut self, ids: &[EntityId], components: &[Component]) {
        for id in ids {
            if !self.ids.contains(id) {
                self.ids.push(*id);
            }
        }
        for component in components {
            match self.buffer.iter_mut().find(|c| c.id == component.id) {
                Some(existing) => *existing = component.clone(),
                None => self.buffer.push(component.clone()),
            }
        }
    }

    /// Remove specific ids (or all of them) and specific buffer components
    /// (or the whole buffer). Ids that were never selected are skipped with a
    /// warning.
    pub fn unselect(&mut self, ids: Option<&[EntityId]>, components: Option<&[Component]>) {
        match ids {
            Some(ids) => {
                for id in ids {
                    if !self.ids.contains(id) {
                        warn!(entity = %id, "unselect skipped an id that was not selected");
                    }
                }
                self.ids.retain(|id| !ids.contains(id));
            }
            None => self.ids.clear(),
        }
        match components {
            Some(components) => self
                .buffer
                .retain(|c| !components.iter().any(|drop| drop.id == c.id)),
            None => self.buffer.clear(),
        }
        if self.ids.is_empty() {
            self.buffer.clear();
        }
    }

    /// Clear ids and buffer in one step.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.buffer.clear();
    }

    /// Drop deleted entities from the selection. Returns `true` when the
    /// selection changed, so the dispatcher can fold the restore into the
    /// deletion's history entry.
    pub fn retain_existing(&mut self, deleted: &[EntityId]) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| !deleted.contains(id));
        if self.ids.is_empty() {
            self.buffer.clear();
        }
        if let Some(isolated) = self.isolated {
            if deleted.contains(&isolated) {
                self.isolated = None;
            }
        }
        self.ids.len() != before
    }

    /// Set the isolation scope. Returns the previous scope.
    pub fn isolate(&mut self, id: Option<EntityId>) -> Option<EntityId> {
        std::mem::replace(&mut self.isolated, id)
    }

    /// Snapshot the ids and buffer for inverse capture.
    pub fn snapshot(&self) -> (Vec<EntityId>, Vec<Component>) {
        (self.ids.clone(), self.buffer.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_deduplicates_and_upserts_buffer() {
        let mut selection = Selection::new();
        let (a, b) = (EntityId::new(), EntityId::new());
        selection.select(&[a, b], &[Component::new("transform", "transform")]);
        selection.select(&[a], &[Component::new("transform", "transform")
            .with_field("x", serde_json::json!(4))]);

        assert_eq!(selection.ids(), &[a, b]);
        assert_eq!(selection.buffer().len(), 1);
        assert_eq!(
            selection.buffer()[0].field("x"),
            Some(&serde_json::json!(4))
        );
    }

    #[test]
    fn unselect_none_clears_everything() {
        let mut selection = Selection::new();
        selection.select(&[EntityId::new()], &[Component::new("c", "c")]);
        selection.unselect(None, None);
        assert!(selection.is_empty());
        assert!(selection.buffer().is_empty());
    }

    #[test]
    fn unselect_specific_ids_keeps_the_rest() {
        let mut selection = Selection::new();
        let (a, b) = (EntityId::new(), EntityId::new());
        selection.select(&[a, b], &[]);
        selection.unselect(Some(&[a]), None);
        assert_eq!(selection.ids(), &[b]);
    }

    #[test]
    fn empty_selection_drops_the_buffer() {
        let mut selection = Selection::new();
        let a = EntityId::new();
        selection.select(&[a], &[Component::new("c", "c")]);
        selection.unselect(Some(&[a]), Some(&[]));
        assert!(selection.buffer().is_empty());
    }

    #[test]
    fn retain_existing_prunes_deleted_ids_and_isolation() {
        let mut selection = Selection::new();
        let (a, b) = (EntityId::new(), EntityId::new());
        selection.select(&[a, b], &[]);
        selection.isolate(Some(a));

        assert!(selection.retain_existing(&[a]));
        assert_eq!(selection.ids(), &[b]);
        assert_eq!(selection.isolated(), None);
        assert!(!selection.retain_existing(&[a]));
    }

    #[test]
    fn isolate_returns_previous_scope() {
        let mut selection = Selection::new();
        let a = EntityId::new();
        assert_eq!(selection.isolate(Some(a)), None);
        assert_eq!(selection.isolate(None), Some(a));
    }
}
