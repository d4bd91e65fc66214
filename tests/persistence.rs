use std::sync::Arc;

use image_text_composer::persistence::{PersistenceStore, STORAGE_KEY, SavedState};
use image_text_composer::{BackgroundImage, EditorStore};

fn test_background() -> Arc<BackgroundImage> {
    // A small opaque red image so the PNG round trip is observable.
    let (width, height) = (4u32, 3u32);
    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for _ in 0..width * height {
        rgba.extend_from_slice(&[200, 30, 30, 255]);
    }
    Arc::new(BackgroundImage {
        name: "red.png".to_owned(),
        width,
        height,
        rgba,
    })
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let persistence = PersistenceStore::new(dir.path());

    let mut store = EditorStore::new();
    store.set_background(test_background());
    let id = store.add_layer("Hello");
    persistence.save(store.document()).unwrap();

    let loaded = persistence.load().expect("saved state should load");
    assert_eq!(loaded.layers().len(), 1);
    assert_eq!(loaded.layers()[0].id, id);
    assert_eq!(loaded.layers()[0].text, "Hello");
    assert_eq!(loaded.canvas_size(), store.canvas_size());

    let bg = loaded.background().expect("background should survive");
    assert_eq!((bg.width, bg.height), (4, 3));
    assert_eq!(&bg.rgba[..4], &[200, 30, 30, 255]);
}

#[test]
fn test_missing_state_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let persistence = PersistenceStore::new(dir.path());
    assert!(persistence.load().is_none());
}

#[test]
fn test_malformed_state_is_tolerated() {
    let dir = tempfile::tempdir().unwrap();
    let persistence = PersistenceStore::new(dir.path());
    std::fs::write(dir.path().join(format!("{STORAGE_KEY}.json")), "{not json").unwrap();
    assert!(persistence.load().is_none());
}

#[test]
fn test_clear_removes_the_record() {
    let dir = tempfile::tempdir().unwrap();
    let persistence = PersistenceStore::new(dir.path());
    let store = EditorStore::new();
    persistence.save(store.document()).unwrap();
    assert!(persistence.load().is_some());

    persistence.clear();
    assert!(persistence.load().is_none());
}

#[test]
fn test_saved_state_json_shape() {
    let mut store = EditorStore::new();
    store.add_layer("Hello");
    let saved = SavedState::from_document(store.document());
    let json = serde_json::to_value(&saved).unwrap();

    // The record keeps the fixed camelCase key shape.
    assert!(json.get("backgroundImage").is_some());
    assert!(json.get("layers").is_some());
    assert_eq!(json["canvasSize"]["width"], 800);
    assert_eq!(json["canvasSize"]["height"], 600);
    let layer = &json["layers"][0];
    assert!(layer.get("fontSize").is_some());
    assert!(layer.get("fontFamily").is_some());
    assert!(layer.get("textAlign").is_some());
    assert!(layer.get("zIndex").is_some());
}
