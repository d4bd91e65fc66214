#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use image_text_composer::ComposerApp;

fn main() -> eframe::Result {
    env_logger::init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Image Text Composer",
        native_options,
        Box::new(|cc| Ok(Box::new(ComposerApp::new(cc)))),
    )
}
