use std::io::Cursor;
use std::path::Path;

use crate::error::{ComposerError, ComposerResult};
use crate::store::EditorStore;
use crate::surface::RenderSurface;

/// File name offered for the download, mirrored by the default export path.
pub const EXPORT_FILE_NAME: &str = "image-text-composition.png";

/// Produces the downloadable raster image from the surface's current pixels.
pub struct ExportService;

impl ExportService {
    /// Encodes the surface's current composited contents (background plus all
    /// visible layers, 1x scale) as a PNG byte stream.
    ///
    /// Fails without touching any state when no background is set or the
    /// surface cannot produce a snapshot.
    pub fn export_composition(
        store: &EditorStore,
        surface: &dyn RenderSurface,
    ) -> ComposerResult<Vec<u8>> {
        if store.background().is_none() {
            return Err(ComposerError::NoBackground);
        }
        let snapshot = surface.snapshot().ok_or(ComposerError::SurfaceMissing)?;

        let mut bytes = Vec::new();
        let buffer =
            image::RgbaImage::from_raw(snapshot.width, snapshot.height, snapshot.rgba)
                .ok_or_else(|| ComposerError::PngEncode("pixel buffer size mismatch".into()))?;
        buffer
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .map_err(|e| ComposerError::PngEncode(e.to_string()))?;

        log::info!(
            "Exported composition: {}x{} px, {} bytes",
            snapshot.width,
            snapshot.height,
            bytes.len()
        );
        Ok(bytes)
    }

    /// Writes the encoded PNG next to the working directory under the fixed
    /// download name.
    pub fn save_png(bytes: &[u8], dir: &Path) -> ComposerResult<std::path::PathBuf> {
        let path = dir.join(EXPORT_FILE_NAME);
        std::fs::write(&path, bytes)?;
        Ok(path)
    }
}
