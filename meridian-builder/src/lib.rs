//! Meridian Experience Builder
//!
//! Platform-agnostic state engine for the experience builder: configuration
//! model, query-string codec, date-range resolution, summary and message
//! rendering, plus the models behind the date picker and custom selects.
//! Nothing here touches the DOM.

pub mod builder;
pub mod calendar;
pub mod catalog;
pub mod config;
pub mod date;
pub mod error;
pub mod handoff;
pub mod itinerary;
pub mod layout;
pub mod query;
pub mod render;
pub mod resolver;
pub mod schedule;
pub mod select;

pub use builder::{BuilderChange, BuilderEdit, ChangeSink, DaysControl, ExperienceBuilder};
pub use calendar::{CalendarCell, CellContext, DayPick, MonthView, month_grid, picker_label};
pub use catalog::{AddonOption, BuilderCatalog};
pub use config::{AddonSet, Days, ExperienceConfig, coerce_group};
pub use date::IsoDate;
pub use error::BuilderError;
pub use handoff::ContactHandoff;
pub use itinerary::{ItineraryCatalog, ItineraryDay, followed_duration};
pub use query::{PartialConfig, QueryParams, ShareLocation, decode, encode};
pub use render::{Summary, build_message, format_date_range, summarize};
pub use resolver::{Correction, DateBounds, DateResolution, resolve_dates};
pub use schedule::{Debouncer, FrameGate};
pub use select::SelectRegistry;

/// Trait for abstracting catalogue loading.
/// Platform-specific implementations decide where the JSON comes from.
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load a named catalogue and deserialise it.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogue is unknown or cannot be parsed.
    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned;

    /// Load the builder option catalogue.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogue cannot be loaded.
    fn load_builder_catalog(&self) -> Result<BuilderCatalog, Self::Error> {
        self.load_config("builder")
    }

    /// Load the itinerary plans.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalogue cannot be loaded.
    fn load_itinerary(&self) -> Result<ItineraryCatalog, Self::Error> {
        self.load_config("itinerary")
    }
}

/// Catalogues compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedCatalogs;

impl CatalogLoader for EmbeddedCatalogs {
    type Error = BuilderError;

    fn load_config<T>(&self, config_name: &str) -> Result<T, Self::Error>
    where
        T: serde::de::DeserializeOwned,
    {
        let json = match config_name {
            "builder" => include_str!("../../meridian-web/static/assets/data/builder.json"),
            "itinerary" => include_str!("../../meridian-web/static/assets/data/itinerary.json"),
            _ => return Err(BuilderError::UnknownCatalog(config_name.to_string())),
        };
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalogs_load() {
        let loader = EmbeddedCatalogs;
        let catalog = loader.load_builder_catalog().unwrap();
        assert!(catalog.has_custom_days());
        assert_eq!(catalog.initial_city(), "Madrid");
        let itinerary = loader.load_itinerary().unwrap();
        assert_eq!(itinerary.plan_for(3).len(), 3);
    }

    #[test]
    fn unknown_catalog_is_an_error() {
        let err = EmbeddedCatalogs
            .load_config::<serde_json::Value>("pricing")
            .expect_err("unknown catalog");
        assert!(err.to_string().contains("Unknown catalog"));
    }
}
