use egui::Ui;

use crate::fonts::FontCatalog;
use crate::layer::{FontWeight, LayerPatch, MAX_OPACITY, MIN_OPACITY, TextAlign};
use crate::store::EditorStore;

/// Property editors for the selected layer. Every change becomes its own
/// `update_layer` call and therefore its own history entry, including live
/// slider drags.
pub fn properties_panel(ui: &mut Ui, store: &mut EditorStore, catalog: &FontCatalog) {
    ui.heading("Text Properties");
    ui.separator();

    let Some(id) = store.selected_layer() else {
        ui.weak("Select a text layer to edit its properties");
        return;
    };
    let Some(layer) = store.document().find_layer(id) else {
        return;
    };

    let mut text = layer.text.clone();
    let mut font_family = layer.font_family.clone();
    let mut font_size = layer.font_size;
    let mut font_weight = layer.font_weight;
    let mut color = layer.color;
    let mut opacity = layer.opacity;
    let mut rotation = layer.rotation;
    let mut text_align = layer.text_align;

    let mut patch = LayerPatch::default();

    ui.label("Text");
    if ui.text_edit_multiline(&mut text).changed() {
        patch.text = Some(text.clone());
    }

    ui.label("Font Family");
    egui::ComboBox::from_id_salt("font_family")
        .selected_text(font_family.clone())
        .show_ui(ui, |ui| {
            for family in catalog.families() {
                if ui
                    .selectable_value(&mut font_family, family.clone(), family)
                    .clicked()
                {
                    patch.font_family = Some(font_family.clone());
                }
            }
        });

    ui.label("Font Size");
    if ui
        .add(egui::Slider::new(&mut font_size, 8.0..=200.0))
        .changed()
    {
        patch.font_size = Some(font_size);
    }

    ui.label("Font Weight");
    egui::ComboBox::from_id_salt("font_weight")
        .selected_text(font_weight.label())
        .show_ui(ui, |ui| {
            for weight in FontWeight::ALL {
                if ui
                    .selectable_value(&mut font_weight, weight, weight.label())
                    .clicked()
                {
                    patch.font_weight = Some(font_weight);
                }
            }
        });

    ui.horizontal(|ui| {
        ui.label("Color");
        if egui::color_picker::color_edit_button_srgba(
            ui,
            &mut color,
            egui::color_picker::Alpha::Opaque,
        )
        .changed()
        {
            patch.color = Some(color);
        }
    });

    ui.label("Opacity");
    if ui
        .add(egui::Slider::new(&mut opacity, MIN_OPACITY..=MAX_OPACITY))
        .changed()
    {
        patch.opacity = Some(opacity);
    }

    ui.label("Rotation");
    if ui
        .add(egui::Slider::new(&mut rotation, -180.0..=180.0).suffix("°"))
        .changed()
    {
        patch.rotation = Some(rotation);
    }

    ui.label("Alignment");
    ui.horizontal(|ui| {
        for (align, label) in [
            (TextAlign::Left, "Left"),
            (TextAlign::Center, "Center"),
            (TextAlign::Right, "Right"),
        ] {
            if ui
                .selectable_value(&mut text_align, align, label)
                .clicked()
            {
                patch.text_align = Some(text_align);
            }
        }
    });

    if patch != LayerPatch::default() {
        store.update_layer(id, patch);
    }
}
