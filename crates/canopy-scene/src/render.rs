//! The renderer boundary.
//!
//! The core never draws. View layers implement [`SceneRenderer`] and the
//! editor's host wires it to dispatch observers; the trait exists here so the
//! core and the view agree on the seam without a crate dependency in either
//! direction.

use crate::component::Component;
use crate::entity::{EntityId, EntitySeed};

/// The presentation layer, seen from the data core.
///
/// Object safe: hosts hold it as `Box<dyn SceneRenderer>`.
pub trait SceneRenderer {
    /// Convert view-space pixel coordinates into scene coordinates.
    fn project_to_scene(&self, x: f64, y: f64) -> (f64, f64);

    /// Show a transient preview of an entity that does not exist yet
    /// (drag-drop ghosts and the like).
    fn create_preview(&mut self, seed: &EntitySeed);

    /// Update a live preview with new component values.
    fn update_preview(&mut self, id: EntityId, components: &[Component]);

    /// Discard a preview.
    fn remove_preview(&mut self, id: EntityId);

    /// Resize the view surface.
    fn set_size(&mut self, width: u32, height: u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingRenderer {
        previews: Vec<EntityId>,
        size: (u32, u32),
    }

    impl SceneRenderer for RecordingRenderer {
        fn project_to_scene(&self, x: f64, y: f64) -> (f64, f64) {
            (x / 2.0, y / 2.0)
        }

        fn create_preview(&mut self, _seed: &EntitySeed) {}

        fn update_preview(&mut self, id: EntityId, _components: &[Component]) {
            self.previews.push(id);
        }

        fn remove_preview(&mut self, id: EntityId) {
            self.previews.retain(|p| *p != id);
        }

        fn set_size(&mut self, width: u32, height: u32) {
            self.size = (width, height);
        }
    }

    #[test]
    fn trait_is_object_safe() {
        let mut renderer: Box<dyn SceneRenderer> = Box::<RecordingRenderer>::default();
        let id = EntityId::new();
        renderer.set_size(800, 600);
        renderer.update_preview(id, &[]);
        renderer.remove_preview(id);
        assert_eq!(renderer.project_to_scene(10.0, 4.0), (5.0, 2.0));
    }
}
