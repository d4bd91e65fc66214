use std::sync::Arc;

use egui::Key;

use crate::document::BackgroundImage;
use crate::layer::LayerPatch;
use crate::store::EditorStore;
use crate::surface::{RenderSurface, SurfaceEvent};

/// Keeps the rendering surface consistent with the layer collection, and
/// writes surface-originated geometry changes back into the store.
///
/// The bridge owns the session's single surface reference; dropping the
/// bridge disposes the surface, so event subscriptions and surface resources
/// are released on every exit path.
pub struct RenderSyncBridge<S: RenderSurface> {
    surface: S,
    last_revision: Option<u64>,
    last_background: Option<Arc<BackgroundImage>>,
}

impl<S: RenderSurface> RenderSyncBridge<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            last_revision: None,
            last_background: None,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Store -> Surface reconciliation.
    ///
    /// When the store revision moved, every text drawable is removed and one
    /// is recreated per current layer in paint order, tagged with the owning
    /// layer's id. A full destructive rebuild, not an incremental diff:
    /// simpler to reason about at the cost of O(n) recreation per change and
    /// of any in-progress surface interaction. The background is not a
    /// drawable: it is only re-sent when the `Arc` changed identity, so a
    /// rebuild does not force a texture re-upload.
    pub fn reconcile(&mut self, store: &EditorStore) {
        if self.last_revision == Some(store.revision()) {
            return;
        }
        self.last_revision = Some(store.revision());

        self.surface.set_dimensions(store.canvas_size());
        let background = store.background().cloned();
        let unchanged = match (&self.last_background, &background) {
            (Some(prev), Some(next)) => Arc::ptr_eq(prev, next),
            (None, None) => true,
            _ => false,
        };
        if !unchanged {
            match &background {
                Some(image) => self.surface.set_background(Arc::clone(image)),
                None => self.surface.clear_background(),
            }
            self.last_background = background;
        }
        self.surface.clear_text_objects();
        for layer in store.document().layers_by_z() {
            self.surface.add_text_object(layer);
        }
        self.surface.set_active(store.selected_layer());
    }

    /// Surface -> Store reconciliation: drains the surface's queued events
    /// and applies them through the store's operations.
    pub fn apply_surface_events(&mut self, store: &mut EditorStore) {
        for event in self.surface.take_events() {
            match event {
                SurfaceEvent::SelectionCreated(id) => store.select_layer(Some(id)),
                SurfaceEvent::SelectionCleared => store.select_layer(None),
                SurfaceEvent::ObjectModified { id, geometry } => store.update_layer(
                    id,
                    LayerPatch::geometry(
                        geometry.x,
                        geometry.y,
                        geometry.width,
                        geometry.height,
                        geometry.rotation,
                    ),
                ),
            }
        }
    }

    /// Keyboard control of the active selection: arrows nudge by 1 unit (10
    /// with Shift held, unclamped, off-canvas allowed), Delete removes the
    /// layer.
    pub fn handle_keys(&mut self, ctx: &egui::Context, store: &mut EditorStore) {
        let Some(id) = store.selected_layer() else {
            return;
        };
        // Arrow keys should not fight a focused text field.
        if ctx.wants_keyboard_input() {
            return;
        }

        let (dx, dy, delete) = ctx.input(|input| {
            let step = if input.modifiers.shift { 10.0 } else { 1.0 };
            let mut dx = 0.0;
            let mut dy = 0.0;
            if input.key_pressed(Key::ArrowLeft) {
                dx -= step;
            }
            if input.key_pressed(Key::ArrowRight) {
                dx += step;
            }
            if input.key_pressed(Key::ArrowUp) {
                dy -= step;
            }
            if input.key_pressed(Key::ArrowDown) {
                dy += step;
            }
            (dx, dy, input.key_pressed(Key::Delete))
        });

        if delete {
            store.delete_layer(id);
            return;
        }
        if dx != 0.0 || dy != 0.0 {
            if let Some(layer) = store.document().find_layer(id) {
                let patch = LayerPatch::position(layer.x + dx, layer.y + dy);
                store.update_layer(id, patch);
            }
        }
    }
}

impl<S: RenderSurface> Drop for RenderSyncBridge<S> {
    fn drop(&mut self) {
        self.surface.dispose();
    }
}
