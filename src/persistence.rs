use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{BackgroundImage, CanvasSize, Document};
use crate::layer::TextLayer;

/// Fixed key the single record is stored under.
pub const STORAGE_KEY: &str = "image-text-composer";

/// Errors that can occur while writing the persisted record. Read-side
/// failures are deliberately not surfaced: malformed or missing data falls
/// back to the initial empty state.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize state: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to write state: {0}")]
    WriteError(#[from] std::io::Error),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// The persisted record: exactly the snapshot triple, JSON-shaped with the
/// background carried as a base64-encoded PNG.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    pub background_image: Option<String>,
    pub layers: Vec<TextLayer>,
    pub canvas_size: CanvasSize,
}

impl SavedState {
    pub fn from_document(document: &Document) -> Self {
        Self {
            background_image: document.background().and_then(|bg| encode_background(bg)),
            layers: document.layers().to_vec(),
            canvas_size: document.canvas_size(),
        }
    }

    pub fn into_document(self) -> Document {
        let background = self.background_image.as_deref().and_then(decode_background);
        Document::from_parts(self.layers, background, self.canvas_size)
    }
}

/// Reads and writes the single saved record under a state directory.
#[derive(Debug, Clone)]
pub struct PersistenceStore {
    state_dir: PathBuf,
}

impl PersistenceStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    fn record_path(&self) -> PathBuf {
        self.state_dir.join(format!("{STORAGE_KEY}.json"))
    }

    /// Serializes and writes the record, creating the state directory if
    /// needed.
    pub fn save(&self, document: &Document) -> PersistenceResult<()> {
        std::fs::create_dir_all(&self.state_dir)?;
        let json = serde_json::to_string(&SavedState::from_document(document))?;
        std::fs::write(self.record_path(), json)?;
        Ok(())
    }

    /// Reads the record back, or `None` when it is missing or malformed.
    /// Parse failures are swallowed and logged, never surfaced.
    pub fn load(&self) -> Option<Document> {
        let json = match std::fs::read_to_string(self.record_path()) {
            Ok(json) => json,
            Err(_) => return None,
        };
        match serde_json::from_str::<SavedState>(&json) {
            Ok(saved) => Some(saved.into_document()),
            Err(err) => {
                log::warn!("Ignoring malformed saved state: {err}");
                None
            }
        }
    }

    /// Removes the persisted record, if any.
    pub fn clear(&self) {
        let path = self.record_path();
        if path.exists() {
            if let Err(err) = std::fs::remove_file(&path) {
                log::warn!("Failed to remove saved state {}: {err}", path.display());
            }
        }
    }
}

fn encode_background(bg: &Arc<BackgroundImage>) -> Option<String> {
    let buffer = image::RgbaImage::from_raw(bg.width, bg.height, bg.rgba.clone())?;
    let mut bytes = Vec::new();
    if let Err(err) = buffer.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png) {
        log::warn!("Failed to encode background for persistence: {err}");
        return None;
    }
    Some(BASE64.encode(bytes))
}

fn decode_background(encoded: &str) -> Option<Arc<BackgroundImage>> {
    let bytes = match BASE64.decode(encoded) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("Ignoring malformed persisted background: {err}");
            return None;
        }
    };
    match image::load_from_memory(&bytes) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            Some(Arc::new(BackgroundImage {
                name: "saved-background".to_owned(),
                width,
                height,
                rgba: rgba.into_raw(),
            }))
        }
        Err(err) => {
            log::warn!("Ignoring undecodable persisted background: {err}");
            None
        }
    }
}

/// Default state directory: alongside the executable's working directory.
pub fn default_state_dir() -> PathBuf {
    Path::new(".image-text-composer").to_path_buf()
}
