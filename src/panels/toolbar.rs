use egui::Ui;

use crate::store::EditorStore;

/// Toolbar requests the app resolves (export and reset touch collaborators
/// the panel has no business holding).
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    AddText(String),
    Undo,
    Redo,
    Reset,
    Export,
}

/// Top toolbar: add-text entry, undo/redo with the history position,
/// reset and export.
pub fn toolbar(ui: &mut Ui, store: &EditorStore, pending_text: &mut String) -> Option<ToolbarAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading("Image Text Composer");
        ui.separator();

        let text_edit = egui::TextEdit::singleline(pending_text).hint_text("New Text");
        ui.add(text_edit);
        if ui.button("Add text").clicked() {
            let text = if pending_text.trim().is_empty() {
                "New Text".to_owned()
            } else {
                pending_text.trim().to_owned()
            };
            pending_text.clear();
            action = Some(ToolbarAction::AddText(text));
        }

        ui.separator();

        if ui.add_enabled(store.can_undo(), egui::Button::new("Undo")).clicked() {
            action = Some(ToolbarAction::Undo);
        }
        ui.label(format!(
            "{}/{}",
            store.history().index() + 1,
            store.history().len()
        ));
        if ui.add_enabled(store.can_redo(), egui::Button::new("Redo")).clicked() {
            action = Some(ToolbarAction::Redo);
        }

        ui.separator();

        if ui.button("Reset").clicked() {
            action = Some(ToolbarAction::Reset);
        }
        if ui
            .add_enabled(store.background().is_some(), egui::Button::new("Export PNG"))
            .clicked()
        {
            action = Some(ToolbarAction::Export);
        }
    });

    action
}
