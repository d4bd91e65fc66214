use crate::layer::{LayerId, LayerPatch, TextLayer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Pixel dimensions of the composition canvas.
///
/// Derived from the background image's natural dimensions once a background is
/// set; 800x600 before that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// A decoded background image: RGBA pixels plus natural dimensions.
///
/// Held behind an `Arc` so history snapshots share the pixel buffer instead of
/// deep-copying it on every push. The reference is replaced, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    /// Name of the source file, kept for user-facing messages.
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8, row-major, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl BackgroundImage {
    pub fn size(&self) -> CanvasSize {
        CanvasSize {
            width: self.width,
            height: self.height,
        }
    }
}

/// The snapshot triple: layer collection, background reference, canvas size.
///
/// This is the unit stored in history. Selection and the rendering-surface
/// handle deliberately live outside of it. `Clone` is the snapshot operation;
/// the background pixels are shared via `Arc`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    layers: Vec<TextLayer>,
    background: Option<Arc<BackgroundImage>>,
    canvas_size: CanvasSize,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        layers: Vec<TextLayer>,
        background: Option<Arc<BackgroundImage>>,
        canvas_size: CanvasSize,
    ) -> Self {
        Self {
            layers,
            background,
            canvas_size,
        }
    }

    pub fn layers(&self) -> &[TextLayer] {
        &self.layers
    }

    pub fn background(&self) -> Option<&Arc<BackgroundImage>> {
        self.background.as_ref()
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas_size
    }

    pub fn find_layer(&self, id: LayerId) -> Option<&TextLayer> {
        self.layers.iter().find(|layer| layer.id == id)
    }

    /// Appends a layer at the top of the stacking order.
    pub fn add_layer(&mut self, layer: TextLayer) {
        self.layers.push(layer);
    }

    /// Merges the patch into the matching layer. Returns false if no layer
    /// matches, leaving the collection untouched.
    pub fn update_layer(&mut self, id: LayerId, patch: &LayerPatch) -> bool {
        match self.layers.iter_mut().find(|layer| layer.id == id) {
            Some(layer) => {
                layer.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the matching layer, if any.
    pub fn remove_layer(&mut self, id: LayerId) -> Option<TextLayer> {
        let index = self.layers.iter().position(|layer| layer.id == id)?;
        Some(self.layers.remove(index))
    }

    /// Moves the layer at `from` to position `to`, then renumbers every
    /// z-index to contiguous `0..n-1` matching the new order.
    ///
    /// Out-of-range indices leave the collection untouched.
    pub fn reorder_layers(&mut self, from: usize, to: usize) -> bool {
        if from >= self.layers.len() || to >= self.layers.len() {
            return false;
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        for (index, layer) in self.layers.iter_mut().enumerate() {
            layer.z_index = index;
        }
        true
    }

    /// Installs a new background: canvas size becomes the image's natural
    /// dimensions and the layer collection is always emptied.
    pub fn set_background(&mut self, image: Arc<BackgroundImage>) {
        self.canvas_size = image.size();
        self.background = Some(image);
        self.layers.clear();
    }

    /// Layers in ascending z-index order, the order they are painted in.
    pub fn layers_by_z(&self) -> Vec<&TextLayer> {
        let mut sorted: Vec<&TextLayer> = self.layers.iter().collect();
        sorted.sort_by_key(|layer| layer.z_index);
        sorted
    }
}
