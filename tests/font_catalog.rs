use egui::{Color32, FontFamily, FontId};
use image_text_composer::fonts::FontCatalog;

#[test]
fn test_catalog_is_ordered_with_arial_first() {
    let catalog = FontCatalog::new();
    let families = catalog.families();
    // The default layer family leads the list.
    assert_eq!(families[0], "Arial");
    assert!(families.iter().any(|f| f == "Roboto"));
    assert!(families.len() >= 10);
}

#[test]
fn test_ensure_available_is_idempotent() {
    let mut catalog = FontCatalog::new();
    let ctx = egui::Context::default();

    assert!(!catalog.is_installed("Montserrat"));
    catalog.ensure_available(&ctx, "Montserrat");
    assert!(catalog.is_installed("Montserrat"));

    // Repeating the call must not disturb the installation.
    catalog.ensure_available(&ctx, "Montserrat");
    assert!(catalog.is_installed("Montserrat"));
}

#[test]
fn test_installed_family_resolves_for_layout() {
    let mut catalog = FontCatalog::new();
    let ctx = egui::Context::default();
    catalog.ensure_available(&ctx, "Oswald");

    // Resolving the family in a layout call must not panic on the next frame.
    let _ = ctx.run(egui::RawInput::default(), |ctx| {
        ctx.fonts(|fonts| {
            fonts.layout_no_wrap(
                "sample".to_owned(),
                FontId::new(16.0, FontFamily::Name("Oswald".into())),
                Color32::BLACK,
            )
        });
    });
}
