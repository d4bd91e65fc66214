use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::document::BackgroundImage;
use crate::error::{ComposerError, ComposerResult};

// Single static counter for all decode requests.
static NEXT_REQUEST_TOKEN: AtomicU64 = AtomicU64::new(1);

fn next_token() -> u64 {
    NEXT_REQUEST_TOKEN.fetch_add(1, Ordering::SeqCst)
}

struct DecodeOutcome {
    token: u64,
    result: ComposerResult<Arc<BackgroundImage>>,
}

/// Asynchronous background-image decoding.
///
/// Each request is tagged with a monotonically increasing token and decoded on
/// a worker thread; the app polls for the outcome each frame. An outcome whose
/// token is not the current one belongs to an abandoned request and is
/// discarded, so a stale decode can never mutate a store it no longer
/// corresponds to. There is no cancellation of in-flight decodes.
pub struct ImageLoader {
    current_token: u64,
    slot: Arc<Mutex<Option<DecodeOutcome>>>,
}

impl Default for ImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageLoader {
    pub fn new() -> Self {
        Self {
            current_token: 0,
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// True while the newest request has not produced an outcome yet.
    pub fn is_pending(&self) -> bool {
        self.current_token != 0 && self.slot.lock().is_none()
    }

    /// Validates the file's extension and starts decoding it on a worker
    /// thread. The validation error is reported synchronously; decode errors
    /// arrive through [`poll`](Self::poll).
    pub fn request_from_path(&mut self, path: PathBuf) -> ComposerResult<()> {
        check_extension(&path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_owned());

        let token = next_token();
        self.current_token = token;
        let slot = Arc::clone(&self.slot);
        std::thread::spawn(move || {
            log::info!("Decoding background image: {}", path.display());
            let result = std::fs::read(&path)
                .map_err(|e| ComposerError::ImageDecode(e.to_string()))
                .and_then(|bytes| decode(&name, &bytes));
            store_outcome(&slot, DecodeOutcome { token, result });
        });
        Ok(())
    }

    /// Like [`request_from_path`](Self::request_from_path) for in-memory
    /// bytes (e.g. a file dropped onto the window).
    pub fn request_from_bytes(&mut self, name: String, bytes: Vec<u8>) -> ComposerResult<()> {
        check_extension(Path::new(&name))?;
        let token = next_token();
        self.current_token = token;
        let slot = Arc::clone(&self.slot);
        std::thread::spawn(move || {
            log::info!("Decoding background image from memory: {} ({} bytes)", name, bytes.len());
            let result = decode(&name, &bytes);
            store_outcome(&slot, DecodeOutcome { token, result });
        });
        Ok(())
    }

    /// Returns the newest request's outcome once, or `None` while it is still
    /// decoding. Outcomes from superseded requests are dropped silently.
    pub fn poll(&mut self) -> Option<ComposerResult<Arc<BackgroundImage>>> {
        let outcome = self.slot.lock().take()?;
        if outcome.token != self.current_token {
            log::debug!(
                "Discarding stale decode result (token {} != current {})",
                outcome.token,
                self.current_token
            );
            return None;
        }
        self.current_token = 0;
        Some(outcome.result)
    }
}

/// A worker finishing late must not clobber the outcome of a newer request.
fn store_outcome(slot: &Mutex<Option<DecodeOutcome>>, outcome: DecodeOutcome) {
    let mut slot = slot.lock();
    if slot.as_ref().is_none_or(|existing| existing.token < outcome.token) {
        *slot = Some(outcome);
    }
}

fn check_extension(path: &Path) -> ComposerResult<()> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if matches!(ext.as_str(), "png" | "jpg" | "jpeg") {
        Ok(())
    } else {
        Err(ComposerError::UnsupportedImageType(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or(ext),
        ))
    }
}

fn decode(name: &str, bytes: &[u8]) -> ComposerResult<Arc<BackgroundImage>> {
    match image::load_from_memory(bytes) {
        Ok(img) => {
            log::debug!("Successfully decoded image: {}x{}", img.width(), img.height());
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            Ok(Arc::new(BackgroundImage {
                name: name.to_owned(),
                width,
                height,
                rgba: rgba.into_raw(),
            }))
        }
        Err(err) => {
            log::error!("Failed to decode image {name}: {err}");
            Err(ComposerError::ImageDecode(err.to_string()))
        }
    }
}
