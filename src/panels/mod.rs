mod layer_panel;
mod properties_panel;
mod toolbar;

pub use layer_panel::{layer_panel, shift_layer};
pub use properties_panel::properties_panel;
pub use toolbar::{ToolbarAction, toolbar};
