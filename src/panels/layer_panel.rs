use egui::Ui;

use crate::layer::LayerId;
use crate::store::EditorStore;

/// Moves the layer one step up (towards the top of the stack) or down,
/// resolving the layer's current collection position by id.
///
/// Positions are collection indices, not z-index values: z-indices can be
/// sparse after a delete, so a row's `z_index` must never be used as an index
/// into the collection. Returns false when the layer is missing or already at
/// the boundary.
pub fn shift_layer(store: &mut EditorStore, id: LayerId, up: bool) -> bool {
    let Some(from) = store.layers().iter().position(|layer| layer.id == id) else {
        return false;
    };
    let to = if up {
        if from + 1 >= store.layers().len() {
            return false;
        }
        from + 1
    } else {
        if from == 0 {
            return false;
        }
        from - 1
    };
    store.reorder_layers(from, to);
    true
}

/// Layer list, topmost first. Clicking a row toggles selection; rows can be
/// deleted or moved one step up/down the stacking order.
pub fn layer_panel(ui: &mut Ui, store: &mut EditorStore) {
    ui.heading(format!("Layers ({})", store.layers().len()));
    ui.separator();

    if store.layers().is_empty() {
        ui.weak("No text layers yet");
        ui.weak("Add some text to get started");
        return;
    }

    // Display top of the stack first.
    let mut rows: Vec<(usize, (LayerId, String))> = store
        .layers()
        .iter()
        .map(|layer| (layer.z_index, (layer.id, layer.text.clone())))
        .collect();
    rows.sort_by(|a, b| b.0.cmp(&a.0));

    let selected = store.selected_layer();
    let mut clicked = None;
    let mut deleted = None;
    let mut moved = None;

    for (_, (id, text)) in &rows {
        let label: String = text.chars().take(24).collect();
        ui.horizontal(|ui| {
            if ui
                .selectable_label(selected == Some(*id), &label)
                .clicked()
            {
                clicked = Some(*id);
            }
            if ui.small_button("⬆").clicked() {
                moved = Some((*id, true));
            }
            if ui.small_button("⬇").clicked() {
                moved = Some((*id, false));
            }
            if ui.small_button("🗑").clicked() {
                deleted = Some(*id);
            }
        });
    }

    if let Some(id) = clicked {
        // Clicking the selected layer deselects it.
        store.select_layer(if selected == Some(id) { None } else { Some(id) });
    }
    if let Some((id, up)) = moved {
        shift_layer(store, id, up);
    }
    if let Some(id) = deleted {
        store.delete_layer(id);
    }
}
