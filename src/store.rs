use std::sync::Arc;

use crate::document::{BackgroundImage, CanvasSize, Document};
use crate::event::{DocumentEvent, EditorEvent, EventBus, HistoryEvent, LayerEvent, SelectionEvent};
use crate::history::HistoryStack;
use crate::layer::{LayerId, LayerPatch, TextLayer};

/// The editing-session context object: document, selection, bounded history
/// and the event bus observers subscribe to.
///
/// Constructed once per session and passed explicitly to every component that
/// needs it; there is no ambient global store. Every mutating operation except
/// `select_layer` and `reorder_layers` pushes a history snapshot.
#[derive(Debug)]
pub struct EditorStore {
    document: Document,
    selected: Option<LayerId>,
    history: HistoryStack,
    /// Bumped whenever the layer collection, background, canvas size or
    /// selection may have changed; the render sync bridge reconciles against
    /// this.
    revision: u64,
    event_bus: EventBus,
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorStore {
    pub fn new() -> Self {
        let document = Document::new();
        Self {
            history: HistoryStack::with_initial(document.clone()),
            document,
            selected: None,
            revision: 0,
            event_bus: EventBus::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn layers(&self) -> &[TextLayer] {
        self.document.layers()
    }

    pub fn background(&self) -> Option<&Arc<BackgroundImage>> {
        self.document.background()
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.document.canvas_size()
    }

    pub fn selected_layer(&self) -> Option<LayerId> {
        self.selected
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Monotonic change counter observed by the render sync bridge.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    fn push_snapshot(&mut self) {
        self.history.push(self.document.clone());
    }

    /// Installs an already-decoded background image.
    ///
    /// Canvas size becomes the image's natural dimensions and the layer
    /// collection is always emptied. Decode failures and a missing rendering
    /// surface are rejected upstream, before this is called, so the store
    /// never observes a half-applied background.
    pub fn set_background(&mut self, image: Arc<BackgroundImage>) {
        let canvas_size = image.size();
        self.document.set_background(image);
        self.selected = None;
        self.push_snapshot();
        self.touch();
        self.event_bus
            .emit(EditorEvent::DocumentChanged(DocumentEvent::BackgroundChanged {
                canvas_size,
            }));
    }

    /// Creates a text layer centered in the current canvas with default
    /// styling, stacks it on top, selects it.
    pub fn add_layer(&mut self, text: impl Into<String>) -> LayerId {
        let size = self.document.canvas_size();
        let layer = TextLayer::new(text, size.width, size.height, self.document.layers().len());
        let id = layer.id;
        self.document.add_layer(layer);
        self.selected = Some(id);
        self.push_snapshot();
        self.touch();
        self.event_bus
            .emit(EditorEvent::LayerChanged(LayerEvent::Added { id }));
        id
    }

    /// Merges the patch into the matching layer and records a snapshot.
    /// A call with an unknown id changes nothing and records nothing.
    pub fn update_layer(&mut self, id: LayerId, patch: LayerPatch) {
        if !self.document.update_layer(id, &patch) {
            log::warn!("update_layer: no layer with id {id}");
            return;
        }
        self.push_snapshot();
        self.touch();
        self.event_bus
            .emit(EditorEvent::LayerChanged(LayerEvent::Updated { id }));
    }

    /// Removes the matching layer, clearing selection if it pointed at it.
    /// A call with an unknown id changes nothing and records nothing.
    pub fn delete_layer(&mut self, id: LayerId) {
        if self.document.remove_layer(id).is_none() {
            log::warn!("delete_layer: no layer with id {id}");
            return;
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.push_snapshot();
        self.touch();
        self.event_bus
            .emit(EditorEvent::LayerChanged(LayerEvent::Removed { id }));
    }

    /// Pure selection change; never creates a history entry.
    pub fn select_layer(&mut self, id: Option<LayerId>) {
        if self.selected == id {
            return;
        }
        self.selected = id;
        self.touch();
        self.event_bus.emit(EditorEvent::SelectionChanged(match id {
            Some(id) => SelectionEvent::Selected(id),
            None => SelectionEvent::Cleared,
        }));
    }

    /// Moves one layer within the ordered collection and renumbers all
    /// z-indices to contiguous `0..n-1`. Deliberately outside of history,
    /// matching the shipped product behavior.
    pub fn reorder_layers(&mut self, from: usize, to: usize) {
        if !self.document.reorder_layers(from, to) {
            log::warn!("reorder_layers: index out of range ({from} -> {to})");
            return;
        }
        self.touch();
        self.event_bus
            .emit(EditorEvent::LayerChanged(LayerEvent::Reordered { from, to }));
    }

    /// Steps back one snapshot. Idempotent no-op at the oldest entry.
    /// Selection is always reset; it is not part of the snapshot.
    pub fn undo(&mut self) {
        if let Some(snapshot) = self.history.undo() {
            self.document = snapshot.clone();
            self.selected = None;
            self.touch();
            self.event_bus
                .emit(EditorEvent::HistoryChanged(HistoryEvent::Undone));
        }
    }

    /// Steps forward one snapshot. Idempotent no-op at the newest entry.
    pub fn redo(&mut self) {
        if let Some(snapshot) = self.history.redo() {
            self.document = snapshot.clone();
            self.selected = None;
            self.touch();
            self.event_bus
                .emit(EditorEvent::HistoryChanged(HistoryEvent::Redone));
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Restores the initial empty configuration: no background, no layers,
    /// single-entry history at index 0. Clearing the persisted record is the
    /// caller's responsibility.
    pub fn reset(&mut self) {
        self.document = Document::new();
        self.selected = None;
        self.history = HistoryStack::with_initial(self.document.clone());
        self.touch();
        self.event_bus
            .emit(EditorEvent::DocumentChanged(DocumentEvent::Reset));
    }

    /// Replaces live state with an externally supplied snapshot (restored from
    /// persistence). Prior history is discarded: the new history is a single
    /// entry containing exactly this snapshot, at index 0.
    pub fn load_state(&mut self, snapshot: Document) {
        self.history = HistoryStack::with_initial(snapshot.clone());
        self.document = snapshot;
        self.selected = None;
        self.touch();
        self.event_bus
            .emit(EditorEvent::DocumentChanged(DocumentEvent::Loaded));
    }
}
