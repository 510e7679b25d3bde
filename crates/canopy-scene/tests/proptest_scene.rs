//! Property tests for the dispatch surface.
//!
//! Random action sequences are applied against a fresh editor and the core
//! guarantees are checked afterwards: structural invariants always hold,
//! undo^n / redo^n reproduces exact state, and unpersisted dispatches never
//! touch the history stacks.

use std::collections::BTreeMap;

use canopy_scene::prelude::*;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum EditOp {
    Create { parent: usize, kind: usize },
    Delete { target: usize, also: Option<usize> },
    Update { target: usize, value: i64 },
    SortSame { target: usize, index: i64 },
    SortAcross { target: usize, parent: usize, index: i64 },
    Clone { target: usize, index: i64 },
    Select { target: usize, replace: bool },
    Unselect,
    Isolate { target: usize },
    Copy { target: usize },
    Paste,
}

fn edit_op_strategy() -> impl Strategy<Value = EditOp> {
    prop_oneof![
        (0..16usize, 0..3usize).prop_map(|(parent, kind)| EditOp::Create { parent, kind }),
        // `also` makes bulk deletes common, including ancestor/descendant
        // pairs in either listing order and duplicate ids.
        (0..16usize, prop::option::of(0..16usize))
            .prop_map(|(target, also)| EditOp::Delete { target, also }),
        (0..16usize, -64..64i64).prop_map(|(target, value)| EditOp::Update { target, value }),
        (0..16usize, 0..8i64).prop_map(|(target, index)| EditOp::SortSame { target, index }),
        (0..16usize, 0..16usize, 0..8i64)
            .prop_map(|(target, parent, index)| EditOp::SortAcross { target, parent, index }),
        (0..16usize, 0..8i64).prop_map(|(target, index)| EditOp::Clone { target, index }),
        (0..16usize, any::<bool>()).prop_map(|(target, replace)| EditOp::Select { target, replace }),
        Just(EditOp::Unselect),
        (0..16usize).prop_map(|target| EditOp::Isolate { target }),
        (0..16usize).prop_map(|target| EditOp::Copy { target }),
        Just(EditOp::Paste),
    ]
}

const KINDS: [&str; 3] = ["group", "sprite", "text"];

/// Translate an op into an action against the current entity population.
/// Ops targeting an empty scene fall back to a create.
fn to_action(editor: &Editor, op: &EditOp, persist: bool) -> Action {
    let ids: Vec<EntityId> = editor.store().iter_order().collect();
    let pick = |idx: usize| ids[idx % ids.len()];

    if ids.is_empty() {
        return Action::CreateEntity {
            data: vec![EntitySeed::new("group")],
            persist,
        };
    }
    match op {
        EditOp::Create { parent, kind } => {
            // parent index past the population means root level
            let mut seed = EntitySeed::new(KINDS[kind % KINDS.len()]);
            if parent % (ids.len() + 1) < ids.len() {
                seed.parent = Some(pick(*parent));
            }
            Action::CreateEntity {
                data: vec![seed],
                persist,
            }
        }
        EditOp::Delete { target, also } => {
            let mut targets = vec![pick(*target)];
            if let Some(also) = also {
                targets.push(pick(*also));
            }
            Action::DeleteEntity {
                ids: targets,
                persist,
            }
        }
        EditOp::Update { target, value } => Action::UpdateEntity {
            data: vec![EntityUpdate::components(
                pick(*target),
                vec![Component::new("prop", "prop").with_field("value", *value)],
            )],
            message: String::new(),
            persist,
        },
        EditOp::SortSame { target, index } => {
            let id = pick(*target);
            let parent = editor.get_entity(id).and_then(|e| e.parent);
            Action::SortEntity {
                data: vec![SortMove {
                    id,
                    index: *index,
                    parent,
                }],
                persist,
            }
        }
        EditOp::SortAcross { target, parent, index } => {
            let parent = if parent % (ids.len() + 1) < ids.len() {
                Some(pick(*parent))
            } else {
                None
            };
            Action::SortEntity {
                data: vec![SortMove {
                    id: pick(*target),
                    index: *index,
                    parent,
                }],
                persist,
            }
        }
        EditOp::Clone { target, index } => {
            let id = pick(*target);
            let parent = editor.get_entity(id).and_then(|e| e.parent);
            Action::CloneEntity {
                data: vec![SortMove {
                    id,
                    index: *index,
                    parent,
                }],
                persist,
            }
        }
        EditOp::Select { target, replace } => Action::Select {
            ids: vec![pick(*target)],
            components: vec![],
            persist,
            unselect_current: *replace,
        },
        EditOp::Unselect => Action::Unselect {
            ids: None,
            components: None,
            persist,
        },
        EditOp::Isolate { target } => {
            let id = if target % (ids.len() + 1) < ids.len() {
                Some(pick(*target))
            } else {
                None
            };
            Action::Isolate { id, persist }
        }
        EditOp::Copy { target } => Action::CopyEntity {
            ids: vec![pick(*target)],
        },
        EditOp::Paste => Action::PasteData { persist },
    }
}

fn seeded_editor() -> Editor {
    let mut editor = Editor::new();
    let root = editor
        .dispatch_one(Action::CreateEntity {
            data: vec![EntitySeed::new("group")],
            persist: true,
        })
        .created[0];
    editor.dispatch_one(Action::CreateEntity {
        data: vec![
            EntitySeed::new("sprite").with_parent(root),
            EntitySeed::new("sprite").with_parent(root),
            EntitySeed::new("text"),
        ],
        persist: true,
    });
    editor
}

fn snapshot(editor: &Editor) -> (BTreeMap<EntityId, Entity>, Selection) {
    let entities = editor
        .store()
        .iter_order()
        .filter_map(|id| editor.get_entity(id).map(|e| (id, e.clone())))
        .collect();
    (entities, editor.selection().clone())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Structural invariants hold after any random persisted sequence:
    /// parent/child symmetry, order completeness, and contiguous sibling
    /// indices.
    #[test]
    fn invariants_hold_after_random_ops(ops in prop::collection::vec(edit_op_strategy(), 1..40)) {
        let mut editor = seeded_editor();
        for op in &ops {
            let action = to_action(&editor, op, true);
            editor.dispatch_one(action);
        }
        prop_assert!(editor.store().check_consistency().is_ok());
    }

    /// Undoing every recorded entry returns to the starting state, and
    /// redoing them all reproduces the exact final state, deep-equal across
    /// entities and selection.
    #[test]
    fn undo_redo_round_trip(ops in prop::collection::vec(edit_op_strategy(), 1..25)) {
        let mut editor = seeded_editor();
        let initial = snapshot(&editor);
        let base_depth = editor.history().undo_depth();

        for op in &ops {
            let action = to_action(&editor, op, true);
            editor.dispatch_one(action);
        }
        let after = snapshot(&editor);
        let steps = editor.history().undo_depth() - base_depth;

        for _ in 0..steps {
            editor.dispatch_one(Action::UndoHistory);
        }
        prop_assert_eq!(snapshot(&editor), initial);

        for _ in 0..steps {
            editor.dispatch_one(Action::RedoHistory);
        }
        prop_assert_eq!(snapshot(&editor), after);
    }

    /// Dispatching with `persist = false` leaves both stacks untouched, for
    /// every action kind the generator emits.
    #[test]
    fn unpersisted_ops_leave_the_stacks_alone(ops in prop::collection::vec(edit_op_strategy(), 1..25)) {
        let mut editor = seeded_editor();
        let undo_depth = editor.history().undo_depth();

        for op in &ops {
            let action = to_action(&editor, op, false);
            editor.dispatch_one(action);
        }
        prop_assert_eq!(editor.history().undo_depth(), undo_depth);
        prop_assert_eq!(editor.history().redo_depth(), 0);
    }

    /// Cloning any subtree yields ids disjoint from every pre-existing
    /// entity, and the copies form a tree of the same size.
    #[test]
    fn clone_ids_are_disjoint(target in 0..16usize, index in 0..8i64) {
        let mut editor = seeded_editor();
        let ids: Vec<EntityId> = editor.store().iter_order().collect();
        let source = ids[target % ids.len()];
        let subtree = 1 + editor.get_children(source, true).len();
        let parent = editor.get_entity(source).and_then(|e| e.parent);

        let outcome = editor.dispatch_one(Action::CloneEntity {
            data: vec![SortMove { id: source, index, parent }],
            persist: true,
        });
        prop_assert_eq!(outcome.created.len(), subtree);
        for id in &outcome.created {
            prop_assert!(!ids.contains(id));
        }
        prop_assert!(editor.store().check_consistency().is_ok());
    }
}
