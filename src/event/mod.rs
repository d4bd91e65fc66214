mod bus;
mod events;

pub use bus::{EventBus, EventHandler};
pub use events::{DocumentEvent, EditorEvent, HistoryEvent, LayerEvent, SelectionEvent};
