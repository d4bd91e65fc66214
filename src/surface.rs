use std::sync::Arc;

use crate::document::{BackgroundImage, CanvasSize};
use crate::layer::{LayerId, TextLayer};

/// A geometry change finished on the surface (drag, resize, rotate), reported
/// with the object's final position/size/rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifiedGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotation: f32,
}

/// Events the rendering surface emits back towards the document model.
/// Each carries only the tagged layer id, never a layer value.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    SelectionCreated(LayerId),
    SelectionCleared,
    ObjectModified {
        id: LayerId,
        geometry: ModifiedGeometry,
    },
}

/// A raster readback of the surface's current contents at 1x scale.
#[derive(Debug, Clone)]
pub struct RasterSnapshot {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8, row-major.
    pub rgba: Vec<u8>,
}

/// The external mutable rendering surface the sync bridge reconciles against.
///
/// Exactly one live implementation exists per editing session and it is owned
/// by the bridge. Drawables added here are tagged with the owning layer's id
/// so surface-originated events can be attributed back to a layer; the surface
/// must never retain the layer itself.
pub trait RenderSurface {
    /// Sets the surface's pixel dimensions.
    fn set_dimensions(&mut self, size: CanvasSize);

    /// Installs a background image, replacing any previous one.
    fn set_background(&mut self, image: Arc<BackgroundImage>);

    /// Clears the background.
    fn clear_background(&mut self);

    /// Removes every tagged text drawable.
    fn clear_text_objects(&mut self);

    /// Adds one drawable for the given layer, tagged with `layer.id`.
    /// The layer reference is only read during this call.
    fn add_text_object(&mut self, layer: &TextLayer);

    /// Marks the drawable tagged with `id` as the active selection, or clears
    /// the active selection. Does not emit a selection event.
    fn set_active(&mut self, id: Option<LayerId>);

    /// Drains the events queued since the last call, in order.
    fn take_events(&mut self) -> Vec<SurfaceEvent>;

    /// Produces a raster snapshot of the current contents (background plus
    /// all drawables), or `None` if the surface cannot rasterize yet.
    fn snapshot(&self) -> Option<RasterSnapshot>;

    /// Releases surface-held resources. Called exactly once, on teardown.
    fn dispose(&mut self);
}
