//! Canopy Scene -- the data/command core of a visual scene editor.
//!
//! A mutable scene graph of entities carrying typed components, behind a
//! single action-dispatch entry point with transactional undo/redo. Every
//! mutation is a serializable [`Action`](action::Action); persisted actions
//! record an exact inverse/forward pair in the history, built from structured
//! diffs rather than full-state snapshots.
//!
//! # Quick Start
//!
//! ```
//! use canopy_scene::prelude::*;
//!
//! let mut editor = Editor::new();
//! let outcome = editor.dispatch_one(Action::CreateEntity {
//!     data: vec![EntitySeed::new("sprite")],
//!     persist: true,
//! });
//! let id = outcome.created[0];
//! assert_eq!(editor.get_entity(id).unwrap().name(), Some("sprite 1"));
//! assert_eq!(editor.get_entity(id).unwrap().index(), Some(0));
//!
//! editor.dispatch_one(Action::UndoHistory);
//! assert!(editor.get_entity(id).is_none());
//!
//! editor.dispatch_one(Action::RedoHistory);
//! assert!(editor.get_entity(id).is_some());
//! ```

#![deny(unsafe_code)]

pub mod action;
pub mod clipboard;
pub mod component;
pub mod document;
pub mod editor;
pub mod entity;
pub mod history;
pub mod render;
pub mod selection;
pub mod sort;
pub mod store;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors surfaced to callers of the scene core.
///
/// Referential failures inside bulk actions (an unknown id among many) are
/// logged and skipped instead; only operations that require an entity or a
/// whole document to be valid up front return these.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// The entity does not exist.
    #[error("entity {0} does not exist")]
    EntityNotFound(entity::EntityId),

    /// An imported document failed validation and was not loaded.
    #[error("scene document rejected: {0}")]
    DocumentRejected(String),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::action::{Action, DispatchOutcome, EntityUpdate, ParentUpdate, SortMove};
    pub use crate::clipboard::Clipboard;
    pub use crate::component::{Component, ComponentChange, ComponentSet, SetDiff, SetTransaction};
    pub use crate::document::SceneDocument;
    pub use crate::editor::Editor;
    pub use crate::entity::{Entity, EntityId, EntitySeed};
    pub use crate::history::{HistoryEntry, HistoryManager};
    pub use crate::render::SceneRenderer;
    pub use crate::selection::Selection;
    pub use crate::store::EntityStore;
    pub use crate::SceneError;
}
