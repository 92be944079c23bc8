use crate::dom;
use meridian_builder::{BuilderCatalog, CatalogLoader, EmbeddedCatalogs, ItineraryCatalog};

/// Builder options, or an empty catalogue if the bundled data is unreadable.
#[must_use]
pub fn builder_catalog() -> BuilderCatalog {
    EmbeddedCatalogs.load_builder_catalog().unwrap_or_else(|err| {
        dom::console_error(&format!("Failed to load builder catalog: {err}"));
        BuilderCatalog::default()
    })
}

/// Itinerary plans, or none if the bundled data is unreadable.
#[must_use]
pub fn itinerary_catalog() -> ItineraryCatalog {
    EmbeddedCatalogs.load_itinerary().unwrap_or_else(|err| {
        dom::console_error(&format!("Failed to load itinerary: {err}"));
        ItineraryCatalog::default()
    })
}
