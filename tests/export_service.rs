use std::sync::Arc;

use image_text_composer::surface::RasterSnapshot;
use image_text_composer::{
    BackgroundImage, CanvasSize, ComposerError, EditorStore, ExportService, RenderSurface,
    SurfaceEvent, TextLayer,
};

/// Surface stub that hands back a fixed pixel buffer.
struct SnapshotSurface {
    snapshot: Option<RasterSnapshot>,
}

impl RenderSurface for SnapshotSurface {
    fn set_dimensions(&mut self, _size: CanvasSize) {}
    fn set_background(&mut self, _image: Arc<BackgroundImage>) {}
    fn clear_background(&mut self) {}
    fn clear_text_objects(&mut self) {}
    fn add_text_object(&mut self, _layer: &TextLayer) {}
    fn set_active(&mut self, _id: Option<image_text_composer::LayerId>) {}
    fn take_events(&mut self) -> Vec<SurfaceEvent> {
        Vec::new()
    }
    fn snapshot(&self) -> Option<RasterSnapshot> {
        self.snapshot.clone()
    }
    fn dispose(&mut self) {}
}

fn test_background() -> Arc<BackgroundImage> {
    Arc::new(BackgroundImage {
        name: "bg.png".to_owned(),
        width: 2,
        height: 2,
        rgba: vec![255u8; 2 * 2 * 4],
    })
}

#[test]
fn test_export_requires_background() {
    let store = EditorStore::new();
    let surface = SnapshotSurface {
        snapshot: Some(RasterSnapshot {
            width: 2,
            height: 2,
            rgba: vec![0u8; 16],
        }),
    };
    let err = ExportService::export_composition(&store, &surface).unwrap_err();
    assert!(matches!(err, ComposerError::NoBackground));
}

#[test]
fn test_export_requires_live_surface_snapshot() {
    let mut store = EditorStore::new();
    store.set_background(test_background());
    let surface = SnapshotSurface { snapshot: None };
    let err = ExportService::export_composition(&store, &surface).unwrap_err();
    assert!(matches!(err, ComposerError::SurfaceMissing));
}

#[test]
fn test_export_produces_decodable_png() {
    let mut store = EditorStore::new();
    store.set_background(test_background());

    let mut rgba = Vec::new();
    for pixel in [[255u8, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255], [9, 9, 9, 255]] {
        rgba.extend_from_slice(&pixel);
    }
    let surface = SnapshotSurface {
        snapshot: Some(RasterSnapshot {
            width: 2,
            height: 2,
            rgba: rgba.clone(),
        }),
    };

    let bytes = ExportService::export_composition(&store, &surface).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (2, 2));
    assert_eq!(decoded.into_raw(), rgba);
}
