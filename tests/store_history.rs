use std::sync::Arc;

use image_text_composer::history::HISTORY_CAP;
use image_text_composer::layer::LayerPatch;
use image_text_composer::panels::shift_layer;
use image_text_composer::{BackgroundImage, EditorStore};

fn test_background(width: u32, height: u32) -> Arc<BackgroundImage> {
    Arc::new(BackgroundImage {
        name: "test.png".to_owned(),
        width,
        height,
        rgba: vec![0u8; (width * height * 4) as usize],
    })
}

fn layer_texts(store: &EditorStore) -> Vec<&str> {
    store.layers().iter().map(|l| l.text.as_str()).collect()
}

fn assert_history_invariant(store: &EditorStore) {
    let history = store.history();
    assert!(history.index() < history.len());
    assert!(history.len() <= HISTORY_CAP);
}

#[test]
fn test_add_undo_redo_scenario() {
    // The walkthrough from the product behavior: empty -> add -> add ->
    // undo x2 -> redo x2.
    let mut store = EditorStore::new();
    assert_eq!(store.history().len(), 1);
    assert_eq!(store.history().index(), 0);

    store.add_layer("Hello");
    assert_eq!(store.history().len(), 2);
    assert_eq!(store.history().index(), 1);
    assert_eq!(layer_texts(&store), vec!["Hello"]);

    store.add_layer("World");
    assert_eq!(store.history().len(), 3);
    assert_eq!(store.history().index(), 2);
    assert_eq!(layer_texts(&store), vec!["Hello", "World"]);

    store.undo();
    assert_eq!(store.history().index(), 1);
    assert_eq!(layer_texts(&store), vec!["Hello"]);

    store.undo();
    assert_eq!(store.history().index(), 0);
    assert!(store.layers().is_empty());

    store.redo();
    store.redo();
    assert_eq!(store.history().index(), 2);
    assert_eq!(layer_texts(&store), vec!["Hello", "World"]);
    assert_history_invariant(&store);
}

#[test]
fn test_undo_redo_round_trip_is_exact() {
    let mut store = EditorStore::new();
    let id = store.add_layer("Hello");
    store.update_layer(
        id,
        LayerPatch {
            font_size: Some(42.0),
            rotation: Some(12.5),
            opacity: Some(0.4),
            ..Default::default()
        },
    );
    store.add_layer("World");

    let before = store.document().clone();
    store.undo();
    assert_ne!(*store.document(), before);
    store.redo();
    assert_eq!(*store.document(), before);
}

#[test]
fn test_undo_redo_boundaries_are_noops() {
    let mut store = EditorStore::new();
    store.undo();
    store.undo();
    assert_eq!(store.history().index(), 0);
    assert_eq!(store.history().len(), 1);

    store.add_layer("Hello");
    store.redo();
    store.redo();
    assert_eq!(store.history().index(), 1);
    assert_eq!(layer_texts(&store), vec!["Hello"]);
}

#[test]
fn test_history_cap_evicts_oldest() {
    let mut store = EditorStore::new();
    let id = store.add_layer("Hello");
    // 25 consecutive updates on the same layer.
    for i in 0..25 {
        store.update_layer(
            id,
            LayerPatch {
                font_size: Some(10.0 + i as f32),
                ..Default::default()
            },
        );
        assert_history_invariant(&store);
    }

    assert_eq!(store.history().len(), HISTORY_CAP);
    assert_eq!(store.history().index(), HISTORY_CAP - 1);
    // The index denotes the most recent snapshot.
    assert_eq!(store.layers()[0].font_size, 34.0);
    store.undo();
    assert_eq!(store.layers()[0].font_size, 33.0);
}

#[test]
fn test_push_truncates_redo_branch() {
    let mut store = EditorStore::new();
    store.add_layer("Hello");
    store.add_layer("World");
    store.undo();
    assert!(store.can_redo());

    store.add_layer("Branch");
    assert!(!store.can_redo());
    assert_eq!(layer_texts(&store), vec!["Hello", "Branch"]);
    assert_eq!(store.history().len(), 3);
}

#[test]
fn test_set_background_clears_layers_and_resizes_canvas() {
    let mut store = EditorStore::new();
    store.add_layer("Hello");
    store.add_layer("World");
    assert_eq!(store.layers().len(), 2);

    store.set_background(test_background(1024, 768));
    assert!(store.layers().is_empty());
    assert_eq!(store.canvas_size().width, 1024);
    assert_eq!(store.canvas_size().height, 768);
    // The push records the cleared layer list.
    assert!(store.history().current().layers().is_empty());
    assert_history_invariant(&store);
}

#[test]
fn test_add_layer_defaults_and_selection() {
    let mut store = EditorStore::new();
    let id = store.add_layer("Hello");
    assert_eq!(store.selected_layer(), Some(id));

    let layer = store.document().find_layer(id).unwrap();
    // Centered in the default 800x600 canvas.
    assert_eq!(layer.x, 300.0);
    assert_eq!(layer.y, 275.0);
    assert_eq!(layer.width, 200.0);
    assert_eq!(layer.height, 50.0);
    assert_eq!(layer.font_size, 24.0);
    assert_eq!(layer.opacity, 1.0);
    assert_eq!(layer.rotation, 0.0);
    assert_eq!(layer.z_index, 0);

    let second = store.add_layer("World");
    assert_eq!(store.document().find_layer(second).unwrap().z_index, 1);
}

#[test]
fn test_delete_layer_selection_behavior() {
    let mut store = EditorStore::new();
    let first = store.add_layer("Hello");
    let second = store.add_layer("World");

    // Deleting a non-selected layer leaves selection untouched.
    store.select_layer(Some(second));
    store.delete_layer(first);
    assert_eq!(store.selected_layer(), Some(second));

    // Deleting the selected layer clears selection.
    store.delete_layer(second);
    assert_eq!(store.selected_layer(), None);
    assert!(store.layers().is_empty());
}

#[test]
fn test_unknown_id_is_a_noop() {
    let mut store = EditorStore::new();
    store.add_layer("Hello");
    let len_before = store.history().len();
    let ghost = image_text_composer::LayerId::new();

    store.update_layer(ghost, LayerPatch::position(1.0, 2.0));
    store.delete_layer(ghost);

    assert_eq!(store.history().len(), len_before);
    assert_eq!(layer_texts(&store), vec!["Hello"]);
}

#[test]
fn test_select_layer_creates_no_history() {
    let mut store = EditorStore::new();
    let id = store.add_layer("Hello");
    let len_before = store.history().len();

    store.select_layer(None);
    store.select_layer(Some(id));
    assert_eq!(store.history().len(), len_before);
}

#[test]
fn test_reorder_preserves_ids_and_renumbers() {
    let mut store = EditorStore::new();
    let a = store.add_layer("a");
    let b = store.add_layer("b");
    let c = store.add_layer("c");
    let len_before = store.history().len();

    store.reorder_layers(0, 2);

    // No history entry for reorder.
    assert_eq!(store.history().len(), len_before);
    // Same ids, same count, z-indices exactly 0..n-1 in the new order.
    let ids: Vec<_> = store.layers().iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![b, c, a]);
    let zs: Vec<_> = store.layers().iter().map(|l| l.z_index).collect();
    assert_eq!(zs, vec![0, 1, 2]);
}

#[test]
fn test_shift_layer_survives_sparse_z_indices() {
    // Deleting the middle layer leaves z-indices 0 and 2 on a collection of
    // length 2; moving must still work because positions are resolved by id.
    let mut store = EditorStore::new();
    let a = store.add_layer("a");
    let b = store.add_layer("b");
    let c = store.add_layer("c");
    store.delete_layer(b);
    let zs: Vec<_> = store.layers().iter().map(|l| l.z_index).collect();
    assert_eq!(zs, vec![0, 2]);

    assert!(shift_layer(&mut store, a, true));
    let ids: Vec<_> = store.layers().iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![c, a]);
    let zs: Vec<_> = store.layers().iter().map(|l| l.z_index).collect();
    assert_eq!(zs, vec![0, 1]);

    // Boundary moves refuse instead of silently no-oping mid-stack.
    assert!(!shift_layer(&mut store, a, true));
    assert!(!shift_layer(&mut store, c, false));

    // A later add stays on top with a unique z-index.
    let d = store.add_layer("d");
    assert_eq!(store.document().find_layer(d).unwrap().z_index, 2);
}

#[test]
fn test_reorder_out_of_range_is_noop() {
    let mut store = EditorStore::new();
    store.add_layer("a");
    let before = store.document().clone();
    store.reorder_layers(0, 5);
    assert_eq!(*store.document(), before);
}

#[test]
fn test_opacity_is_clamped() {
    let mut store = EditorStore::new();
    let id = store.add_layer("Hello");
    store.update_layer(
        id,
        LayerPatch {
            opacity: Some(0.0),
            ..Default::default()
        },
    );
    assert_eq!(store.layers()[0].opacity, 0.1);
    store.update_layer(
        id,
        LayerPatch {
            opacity: Some(2.0),
            ..Default::default()
        },
    );
    assert_eq!(store.layers()[0].opacity, 1.0);
}

#[test]
fn test_reset_restores_initial_configuration() {
    let mut store = EditorStore::new();
    store.set_background(test_background(100, 100));
    store.add_layer("Hello");

    store.reset();
    assert!(store.layers().is_empty());
    assert!(store.background().is_none());
    assert_eq!(store.canvas_size().width, 800);
    assert_eq!(store.canvas_size().height, 600);
    assert_eq!(store.history().len(), 1);
    assert_eq!(store.history().index(), 0);
}

#[test]
fn test_load_state_discards_prior_history() {
    let mut store = EditorStore::new();
    store.add_layer("old");

    let mut other = EditorStore::new();
    other.set_background(test_background(320, 240));
    let snapshot = other.document().clone();

    store.load_state(snapshot.clone());
    assert_eq!(*store.document(), snapshot);
    assert_eq!(store.history().len(), 1);
    assert_eq!(store.history().index(), 0);
    assert_eq!(store.selected_layer(), None);
    assert!(!store.can_undo());
    assert!(!store.can_redo());
}

#[test]
fn test_undo_clears_selection() {
    let mut store = EditorStore::new();
    let id = store.add_layer("Hello");
    store.select_layer(Some(id));
    store.undo();
    assert_eq!(store.selected_layer(), None);
}
