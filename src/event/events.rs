use crate::document::CanvasSize;
use crate::layer::LayerId;

/// Events broadcast by the editor store after each mutation, so observers
/// (persistence, status display) react without reaching into the store.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    LayerChanged(LayerEvent),
    SelectionChanged(SelectionEvent),
    DocumentChanged(DocumentEvent),
    HistoryChanged(HistoryEvent),
}

#[derive(Debug, Clone)]
pub enum LayerEvent {
    Added { id: LayerId },
    Removed { id: LayerId },
    Updated { id: LayerId },
    Reordered { from: usize, to: usize },
}

#[derive(Debug, Clone)]
pub enum SelectionEvent {
    Selected(LayerId),
    Cleared,
}

#[derive(Debug, Clone)]
pub enum DocumentEvent {
    BackgroundChanged { canvas_size: CanvasSize },
    Reset,
    Loaded,
}

#[derive(Debug, Clone)]
pub enum HistoryEvent {
    Undone,
    Redone,
}
