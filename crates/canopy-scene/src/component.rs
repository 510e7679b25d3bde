//! Components and the per-entity component collection.
//!
//! A [`Component`] is a value type: mutation always replaces the whole
//! record, never shares it between entities, so the history manager can rely
//! on independent clones. Type-specific fields ride in a flattened JSON map
//! (the same flexibility trade-off the action payloads make).
//!
//! The collection's upsert path is transactional: [`ComponentSet::begin_set`]
//! returns a [`SetTransaction`] whose `commit` reports exactly which
//! components were added, replaced, or removed, together with their previous
//! values. This diff is how inverse actions are built without diffing full
//! entity state.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// A typed data record attached to an entity.
///
/// `id` is unique within the owning entity (but not globally). `kind` is the
/// component type tag. Any additional fields in the serialized form land in
/// `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Unique id within the owning entity.
    pub id: String,
    /// Component type tag.
    pub kind: String,
    /// Whether the component may be removed by the user.
    #[serde(default = "default_true")]
    pub removable: bool,
    /// Whether the component may be edited by the user.
    #[serde(default = "default_true")]
    pub editable: bool,
    /// When `true` in an incoming update, the merge removes the component
    /// instead of replacing it.
    #[serde(default, skip_serializing_if = "is_false")]
    pub marked_for_delete: bool,
    /// Type-specific fields.
    #[serde(flatten)]
    pub fields: serde_json::Map<String, Value>,
}

fn default_true() -> bool {
    true
}

fn is_false(value: &bool) -> bool {
    !value
}

impl Component {
    /// Well-known id of the sibling-order component every entity carries.
    pub const INDEX: &'static str = "index";
    /// Well-known id of the display-name component.
    pub const NAME: &'static str = "name";

    /// A new component with empty fields.
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            removable: true,
            editable: true,
            marked_for_delete: false,
            fields: serde_json::Map::new(),
        }
    }

    /// The mandatory sibling-order component. Not removable, not editable.
    pub fn index(index: i64) -> Self {
        let mut c = Self::new(Self::INDEX, Self::INDEX);
        c.removable = false;
        c.editable = false;
        c.fields.insert("index".to_owned(), Value::from(index));
        c
    }

    /// The display-name component. Not removable, but editable.
    pub fn name(name: impl Into<String>) -> Self {
        let mut c = Self::new(Self::NAME, Self::NAME);
        c.removable = false;
        c.fields.insert("name".to_owned(), Value::from(name.into()));
        c
    }

    /// Set a type-specific field, builder style.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Mark this component for removal on the next merge, builder style.
    pub fn for_delete(mut self) -> Self {
        self.marked_for_delete = true;
        self
    }

    /// Read a type-specific field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The `index` field value, for `index`-kind components.
    pub fn index_value(&self) -> Option<i64> {
        self.fields.get("index").and_then(Value::as_i64)
    }

    /// The `name` field value, for `name`-kind components.
    pub fn name_value(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }
}

// ---------------------------------------------------------------------------
// Set diff
// ---------------------------------------------------------------------------

/// One replaced component: its previous and new value.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentChange {
    /// Value before the merge.
    pub before: Component,
    /// Value after the merge.
    pub after: Component,
}

/// The structured outcome of a [`SetTransaction::commit`].
///
/// Everything needed to build the exact inverse of the merge: re-add what was
/// removed, restore the `before` of what was replaced, remove what was added.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetDiff {
    /// Components that did not exist before and were added.
    pub added: Vec<Component>,
    /// Components that existed and were replaced with a different value.
    pub updated: Vec<ComponentChange>,
    /// Components removed because the incoming value was marked for delete.
    pub removed: Vec<Component>,
}

impl SetDiff {
    /// Whether the merge changed anything at all.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ComponentSet
// ---------------------------------------------------------------------------

/// Per-entity ordered collection of components, keyed by unique id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentSet {
    components: Vec<Component>,
}

impl ComponentSet {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append components. Each id must not already be present.
    pub fn add(&mut self, components: impl IntoIterator<Item = Component>) {
        for component in components {
            debug_assert!(
                self.by_id(&component.id).is_none(),
                "duplicate component id '{}' -- use set() to upsert",
                component.id
            );
            self.components.push(component);
        }
    }

    /// Remove the component with the given id, returning it.
    pub fn remove(&mut self, id: &str) -> Option<Component> {
        let pos = self.components.iter().position(|c| c.id == id)?;
        Some(self.components.remove(pos))
    }

    /// Begin a transactional upsert. The returned handle is scoped to this
    /// one merge; `commit` consumes it and yields the structured diff.
    pub fn begin_set(&mut self) -> SetTransaction<'_> {
        SetTransaction { set: self }
    }

    /// Convenience upsert: `begin_set().commit(components)`.
    pub fn set(&mut self, components: impl IntoIterator<Item = Component>) -> SetDiff {
        self.begin_set().commit(components)
    }

    /// Look up a component by id.
    pub fn by_id(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// All components of the given type, in collection order.
    pub fn by_type<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Component> {
        self.components.iter().filter(move |c| c.kind == kind)
    }

    /// Iterate all components in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl FromIterator<Component> for ComponentSet {
    fn from_iter<T: IntoIterator<Item = Component>>(iter: T) -> Self {
        let mut set = Self::new();
        set.add(iter);
        set
    }
}

impl<'a> IntoIterator for &'a ComponentSet {
    type Item = &'a Component;
    type IntoIter = std::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

// ---------------------------------------------------------------------------
// SetTransaction
// ---------------------------------------------------------------------------

/// A scoped handle for one upsert against a [`ComponentSet`].
///
/// For each incoming component: no existing component with that id means an
/// add; an existing, different component is replaced; an incoming component
/// with `marked_for_delete` removes the existing one. An incoming value equal
/// to the existing one is a no-op and does not appear in the diff.
pub struct SetTransaction<'a> {
    set: &'a mut ComponentSet,
}

impl SetTransaction<'_> {
    /// Apply the merge and return the structured before/after diff.
    pub fn commit(self, components: impl IntoIterator<Item = Component>) -> SetDiff {
        let mut diff = SetDiff::default();

        for incoming in components {
            if incoming.marked_for_delete {
                if let Some(removed) = self.set.remove(&incoming.id) {
                    diff.removed.push(removed);
                }
                continue;
            }

            match self.set.components.iter_mut().find(|c| c.id == incoming.id) {
                None => {
                    self.set.components.push(incoming.clone());
                    diff.added.push(incoming);
                }
                Some(existing) if *existing != incoming => {
                    let before = std::mem::replace(existing, incoming.clone());
                    diff.updated.push(ComponentChange {
                        before,
                        after: incoming,
                    });
                }
                Some(_) => {}
            }
        }

        diff
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
