use egui::Color32;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A unique, stable identifier for a text layer.
///
/// Minted once when the layer is created and never changed afterwards; this is
/// the only thing the rendering surface is allowed to hold on to when tagging
/// its drawables (never the layer itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(Uuid);

impl LayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Horizontal text alignment within the layer box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Font weight variants offered by the properties panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
    Lighter,
    Bolder,
}

impl FontWeight {
    pub fn label(&self) -> &'static str {
        match self {
            FontWeight::Normal => "Regular",
            FontWeight::Bold => "Bold",
            FontWeight::Lighter => "Light",
            FontWeight::Bolder => "Bolder",
        }
    }

    pub const ALL: [FontWeight; 4] = [
        FontWeight::Normal,
        FontWeight::Bold,
        FontWeight::Lighter,
        FontWeight::Bolder,
    ];
}

/// Opacity is kept inside this range; fully transparent layers are not
/// representable on purpose so a layer can never silently disappear.
pub const MIN_OPACITY: f32 = 0.1;
pub const MAX_OPACITY: f32 = 1.0;

/// A single positioned, styled text element within the composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    pub id: LayerId,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub font_size: f32,
    pub font_family: String,
    pub font_weight: FontWeight,
    pub color: Color32,
    pub opacity: f32,
    /// Rotation in degrees, clockwise.
    pub rotation: f32,
    pub text_align: TextAlign,
    /// Integer stacking order, highest drawn on top.
    pub z_index: usize,
}

impl TextLayer {
    /// Creates a layer with the default styling, centered on a canvas of the
    /// given size, stacked on top of `layer_count` existing layers.
    pub fn new(text: impl Into<String>, canvas_width: u32, canvas_height: u32, layer_count: usize) -> Self {
        Self {
            id: LayerId::new(),
            text: text.into(),
            x: canvas_width as f32 / 2.0 - 100.0,
            y: canvas_height as f32 / 2.0 - 25.0,
            width: 200.0,
            height: 50.0,
            font_size: 24.0,
            font_family: "Arial".to_owned(),
            font_weight: FontWeight::Normal,
            color: Color32::BLACK,
            opacity: MAX_OPACITY,
            rotation: 0.0,
            text_align: TextAlign::Center,
            z_index: layer_count,
        }
    }

    /// Merges every `Some` field of the patch into this layer.
    ///
    /// Field updates are independent so a live slider drag can patch one field
    /// at a time. Opacity is clamped to the representable range.
    pub fn apply(&mut self, patch: &LayerPatch) {
        if let Some(text) = &patch.text {
            self.text = text.clone();
        }
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(font_size) = patch.font_size {
            self.font_size = font_size;
        }
        if let Some(font_family) = &patch.font_family {
            self.font_family = font_family.clone();
        }
        if let Some(font_weight) = patch.font_weight {
            self.font_weight = font_weight;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = opacity.clamp(MIN_OPACITY, MAX_OPACITY);
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = rotation;
        }
        if let Some(text_align) = patch.text_align {
            self.text_align = text_align;
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = z_index;
        }
    }
}

/// A field-level partial update for [`TextLayer`], the unit accepted by
/// `EditorStore::update_layer`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerPatch {
    pub text: Option<String>,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub font_size: Option<f32>,
    pub font_family: Option<String>,
    pub font_weight: Option<FontWeight>,
    pub color: Option<Color32>,
    pub opacity: Option<f32>,
    pub rotation: Option<f32>,
    pub text_align: Option<TextAlign>,
    pub z_index: Option<usize>,
}

impl LayerPatch {
    /// Patch carrying the final geometry of a surface-side manipulation.
    pub fn geometry(x: f32, y: f32, width: f32, height: f32, rotation: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            width: Some(width),
            height: Some(height),
            rotation: Some(rotation),
            ..Default::default()
        }
    }

    /// Patch moving the layer to a new position, keeping everything else.
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }
}
