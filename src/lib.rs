#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod document;
pub mod error;
pub mod event;
pub mod export;
pub mod fonts;
pub mod history;
pub mod layer;
pub mod loader;
pub mod panels;
pub mod persistence;
pub mod raster;
pub mod store;
pub mod surface;
pub mod sync;

pub use app::ComposerApp;
pub use document::{BackgroundImage, CanvasSize, Document};
pub use error::{ComposerError, ComposerResult};
pub use export::ExportService;
pub use history::{HISTORY_CAP, HistoryStack};
pub use layer::{FontWeight, LayerId, LayerPatch, TextAlign, TextLayer};
pub use store::EditorStore;
pub use surface::{RenderSurface, SurfaceEvent};
pub use sync::RenderSyncBridge;
