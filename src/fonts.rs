use std::collections::HashSet;

use egui::{FontDefinitions, FontFamily};

/// The built-in family catalog, ordered by popularity. Stands in for a
/// network font catalog; the names are offered as-is in the properties panel.
const BUILTIN_FAMILIES: &[&str] = &[
    "Arial",
    "Roboto",
    "Open Sans",
    "Montserrat",
    "Lato",
    "Noto Sans",
    "Poppins",
    "Source Sans Pro",
    "Raleway",
    "Merriweather",
    "Ubuntu",
    "Nunito",
    "PT Sans",
    "Oswald",
    "Work Sans",
];

/// Provides the ordered list of available font family names and guarantees a
/// family is visually available before the next render.
///
/// Availability is implemented by registering the family name as an egui
/// font-family alias backed by the embedded default font stack, so a
/// `FontId` naming any catalog family always resolves. `ensure_available` is
/// idempotent.
pub struct FontCatalog {
    families: Vec<String>,
    installed: HashSet<String>,
    definitions: FontDefinitions,
}

impl Default for FontCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FontCatalog {
    pub fn new() -> Self {
        Self {
            families: BUILTIN_FAMILIES.iter().map(|s| (*s).to_owned()).collect(),
            installed: HashSet::new(),
            definitions: FontDefinitions::default(),
        }
    }

    /// Ordered family names for the properties panel.
    pub fn families(&self) -> &[String] {
        &self.families
    }

    /// True once `ensure_available` has installed the family alias.
    pub fn is_installed(&self, family: &str) -> bool {
        self.installed.contains(family)
    }

    /// Makes `family` resolvable by egui before the next render. Calling it
    /// again for the same family is a no-op.
    pub fn ensure_available(&mut self, ctx: &egui::Context, family: &str) {
        if self.installed.contains(family) {
            return;
        }
        let fallback = self.definitions.families[&FontFamily::Proportional].clone();
        self.definitions
            .families
            .insert(FontFamily::Name(family.into()), fallback);
        ctx.set_fonts(self.definitions.clone());
        self.installed.insert(family.to_owned());
        log::debug!("Installed font family alias: {family}");
    }

    /// TTF bytes of the default proportional font, used by the export
    /// compositor so no font assets need to ship with the binary.
    pub fn export_font_bytes(&self) -> Option<Vec<u8>> {
        let name = self
            .definitions
            .families
            .get(&FontFamily::Proportional)?
            .first()?;
        let data = self.definitions.font_data.get(name)?;
        Some(data.font.to_vec())
    }
}
