use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::canvas::CanvasSurface;
use crate::event::{DocumentEvent, EditorEvent, EventHandler};
use crate::export::ExportService;
use crate::fonts::FontCatalog;
use crate::loader::ImageLoader;
use crate::panels::{ToolbarAction, layer_panel, properties_panel, toolbar};
use crate::persistence::{PersistenceStore, default_state_dir};
use crate::store::EditorStore;
use crate::sync::RenderSyncBridge;

/// Event-bus observer that flags the document for persistence after every
/// background change.
struct SaveOnBackgroundChange {
    flag: Arc<AtomicBool>,
}

impl EventHandler for SaveOnBackgroundChange {
    fn handle_event(&mut self, event: &EditorEvent) {
        if let EditorEvent::DocumentChanged(DocumentEvent::BackgroundChanged { .. }) = event {
            self.flag.store(true, Ordering::Relaxed);
        }
    }
}

/// The application shell wiring store, bridge, loader, fonts and persistence
/// together. One store and one bridge (owning the single surface) exist for
/// the session's lifetime; dropping the app disposes the surface.
pub struct ComposerApp {
    store: EditorStore,
    bridge: Option<RenderSyncBridge<CanvasSurface>>,
    loader: ImageLoader,
    catalog: FontCatalog,
    persistence: PersistenceStore,
    save_needed: Arc<AtomicBool>,
    pending_text: String,
    status: Option<String>,
}

impl ComposerApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let catalog = FontCatalog::new();
        let bridge = match catalog.export_font_bytes() {
            Some(bytes) => Some(RenderSyncBridge::new(CanvasSurface::new(&bytes))),
            None => {
                log::error!("No embedded font available; rendering surface not created");
                None
            }
        };

        let mut store = EditorStore::new();
        let save_needed = Arc::new(AtomicBool::new(false));
        store.event_bus().subscribe(Box::new(SaveOnBackgroundChange {
            flag: Arc::clone(&save_needed),
        }));

        // Read the saved record once at startup; missing or malformed data
        // falls back to the empty initial state.
        let persistence = PersistenceStore::new(default_state_dir());
        if let Some(document) = persistence.load() {
            store.load_state(document);
        }

        Self {
            store,
            bridge,
            loader: ImageLoader::new(),
            catalog,
            persistence,
            save_needed,
            pending_text: String::new(),
            status: None,
        }
    }

    fn report(&mut self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("{message}");
        self.status = Some(message);
    }

    /// Queues a decode for the first image file dropped onto the window.
    fn check_for_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        if self.bridge.is_none() {
            self.report(crate::error::ComposerError::SurfaceMissing.to_string());
            return;
        }
        let result = if let Some(bytes) = file.bytes {
            self.loader.request_from_bytes(file.name.clone(), bytes.to_vec())
        } else if let Some(path) = file.path {
            self.loader.request_from_path(path)
        } else {
            log::warn!("Dropped file has no accessible data: {}", file.name);
            return;
        };
        if let Err(err) = result {
            self.report(err.to_string());
        } else {
            self.status = Some("Loading image…".to_owned());
        }
    }

    /// Applies the newest finished decode; stale results were already dropped
    /// by the loader.
    fn poll_decode(&mut self) {
        match self.loader.poll() {
            Some(Ok(image)) => {
                if self.bridge.is_none() {
                    // Surface went away while decoding; state stays unchanged.
                    self.report(crate::error::ComposerError::SurfaceMissing.to_string());
                    return;
                }
                self.status = Some(format!(
                    "Background set: {} ({}x{})",
                    image.name, image.width, image.height
                ));
                self.store.set_background(image);
            }
            Some(Err(err)) => self.report(err.to_string()),
            None => {}
        }
    }

    fn handle_toolbar_action(&mut self, action: ToolbarAction) {
        match action {
            ToolbarAction::AddText(text) => {
                self.store.add_layer(text);
            }
            ToolbarAction::Undo => self.store.undo(),
            ToolbarAction::Redo => self.store.redo(),
            ToolbarAction::Reset => {
                self.persistence.clear();
                self.store.reset();
                self.status = None;
            }
            ToolbarAction::Export => self.export(),
        }
    }

    fn export(&mut self) {
        let Some(bridge) = &self.bridge else {
            self.report(crate::error::ComposerError::SurfaceMissing.to_string());
            return;
        };
        match ExportService::export_composition(&self.store, bridge.surface())
            .and_then(|bytes| ExportService::save_png(&bytes, std::path::Path::new(".")))
        {
            Ok(path) => self.status = Some(format!("Exported to {}", path.display())),
            Err(err) => self.report(err.to_string()),
        }
    }

    /// Guarantees every family referenced by the document is resolvable
    /// before this frame renders.
    fn ensure_fonts(&mut self, ctx: &egui::Context) {
        let families: Vec<String> = self
            .store
            .layers()
            .iter()
            .map(|layer| layer.font_family.clone())
            .collect();
        for family in families {
            self.catalog.ensure_available(ctx, &family);
        }
    }

    fn save_if_needed(&mut self) {
        if self.save_needed.swap(false, Ordering::Relaxed) {
            if let Err(err) = self.persistence.save(self.store.document()) {
                log::error!("Failed to persist state: {err}");
            }
        }
    }
}

impl eframe::App for ComposerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_for_dropped_files(ctx);
        self.poll_decode();
        self.ensure_fonts(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            if let Some(action) = toolbar(ui, &self.store, &mut self.pending_text) {
                self.handle_toolbar_action(action);
            }
        });

        egui::SidePanel::left("layers").default_width(220.0).show(ctx, |ui| {
            layer_panel(ui, &mut self.store);
        });

        egui::SidePanel::right("properties").default_width(260.0).show(ctx, |ui| {
            properties_panel(ui, &mut self.store, &self.catalog);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            match &self.status {
                Some(status) => ui.label(status),
                None => ui.weak("Drop a PNG or JPG image onto the window to start"),
            };
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            match &mut self.bridge {
                Some(bridge) => {
                    bridge.reconcile(&self.store);
                    egui::ScrollArea::both().show(ui, |ui| {
                        bridge.surface_mut().show(ui);
                    });
                    bridge.apply_surface_events(&mut self.store);
                    bridge.handle_keys(ctx, &mut self.store);
                }
                None => {
                    ui.weak("Rendering surface unavailable");
                }
            }
        });

        if self.loader.is_pending() {
            ctx.request_repaint();
        }
        self.save_if_needed();
    }
}
