//! Option catalogue for the builder controls.
use crate::config::{DEFAULT_GROUP, Days, parse_leading_int};
use serde::{Deserialize, Serialize};

pub const CUSTOM_DAYS_OPTION: &str = "Customize";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonOption {
    pub key: String,
    pub label: String,
}

/// Allowed values for every control plus their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderCatalog {
    #[serde(default)]
    pub cities: Vec<String>,
    #[serde(default)]
    pub default_city: Option<String>,
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default)]
    pub default_days: Option<String>,
    #[serde(default = "default_custom_option")]
    pub custom_days_option: String,
    #[serde(default)]
    pub levels: Vec<String>,
    #[serde(default)]
    pub default_level: Option<String>,
    #[serde(default = "default_group")]
    pub default_group: u8,
    #[serde(default)]
    pub addons: Vec<AddonOption>,
    #[serde(default)]
    pub contact_topics: Vec<String>,
    #[serde(default)]
    pub preferred_topic: Option<String>,
}

impl Default for BuilderCatalog {
    fn default() -> Self {
        Self {
            cities: Vec::new(),
            default_city: None,
            days: Vec::new(),
            default_days: None,
            custom_days_option: default_custom_option(),
            levels: Vec::new(),
            default_level: None,
            default_group: default_group(),
            addons: Vec::new(),
            contact_topics: Vec::new(),
            preferred_topic: None,
        }
    }
}

impl BuilderCatalog {
    #[must_use]
    pub fn has_city(&self, city: &str) -> bool {
        self.cities.iter().any(|c| c == city)
    }

    #[must_use]
    pub fn has_level(&self, level: &str) -> bool {
        self.levels.iter().any(|l| l == level)
    }

    #[must_use]
    pub fn has_days_option(&self, option: &str) -> bool {
        self.days.iter().any(|d| d == option)
    }

    #[must_use]
    pub fn has_custom_days(&self) -> bool {
        self.has_days_option(&self.custom_days_option)
    }

    #[must_use]
    pub fn is_custom_days(&self, option: &str) -> bool {
        option == self.custom_days_option
    }

    #[must_use]
    pub fn initial_city(&self) -> String {
        pick_default(self.default_city.as_ref(), &self.cities)
    }

    #[must_use]
    pub fn initial_days_option(&self) -> String {
        pick_default(self.default_days.as_ref(), &self.days)
    }

    #[must_use]
    pub fn initial_level(&self) -> String {
        pick_default(self.default_level.as_ref(), &self.levels)
    }

    /// Label shown for an add-on key; unknown keys are shown verbatim.
    #[must_use]
    pub fn addon_label<'a>(&'a self, key: &'a str) -> &'a str {
        self.addons
            .iter()
            .find(|a| a.key == key)
            .map_or(key, |a| a.label.as_str())
    }

    /// Duration implied by the days select and, when the custom option is
    /// selected, the exact-days input.
    #[must_use]
    pub fn days_value(&self, option: &str, custom_input: &str) -> Option<Days> {
        if self.is_custom_days(option) {
            return Some(
                parse_leading_int(custom_input)
                    .and_then(|n| u32::try_from(n).ok())
                    .and_then(Days::count)
                    .unwrap_or_else(|| Days::Label(option.to_string())),
            );
        }
        Days::parse(option)
    }

    /// Topic to pre-select on the contact form, if the form offers it.
    #[must_use]
    pub fn contact_topic<'a>(&'a self, offered: &[String]) -> Option<&'a str> {
        self.preferred_topic
            .as_deref()
            .filter(|t| offered.iter().any(|o| o.as_str() == *t))
    }
}

fn pick_default(preferred: Option<&String>, options: &[String]) -> String {
    preferred
        .filter(|p| options.contains(*p))
        .or_else(|| options.first())
        .cloned()
        .unwrap_or_default()
}

fn default_custom_option() -> String {
    CUSTOM_DAYS_OPTION.to_string()
}

const fn default_group() -> u8 {
    DEFAULT_GROUP
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CatalogLoader, EmbeddedCatalogs};

    #[test]
    fn static_catalog_offers_custom_duration() {
        let catalog = EmbeddedCatalogs.load_builder_catalog().unwrap();
        assert!(!catalog.cities.is_empty());
        assert!(catalog.has_custom_days());
        assert!(catalog.has_days_option("5"));
        assert_eq!(catalog.default_group, 4);
    }

    #[test]
    fn days_value_reads_custom_input() {
        let catalog = EmbeddedCatalogs.load_builder_catalog().unwrap();
        assert_eq!(catalog.days_value("5", ""), Days::count(5));
        assert_eq!(catalog.days_value("Customize", "10"), Days::count(10));
        assert_eq!(
            catalog.days_value("Customize", "0"),
            Some(Days::Label("Customize".into()))
        );
        assert_eq!(
            catalog.days_value("Customize", ""),
            Some(Days::Label("Customize".into()))
        );
        assert_eq!(catalog.days_value("", ""), None);
    }

    #[test]
    fn defaults_fall_back_to_first_option() {
        let catalog = serde_json::from_str::<BuilderCatalog>(
            r#"{"cities":["Lisbon","Porto"],"default_city":"Berlin","levels":["Elite"]}"#,
        )
        .unwrap();
        assert_eq!(catalog.initial_city(), "Lisbon");
        assert_eq!(catalog.initial_level(), "Elite");
        assert_eq!(catalog.initial_days_option(), "");
        assert_eq!(catalog.custom_days_option, CUSTOM_DAYS_OPTION);
    }

    #[test]
    fn contact_topic_requires_offered_option() {
        let catalog = EmbeddedCatalogs.load_builder_catalog().unwrap();
        let offered = vec!["General".to_string(), "Training Camp".to_string()];
        assert_eq!(catalog.contact_topic(&offered), Some("Training Camp"));
        assert_eq!(catalog.contact_topic(&["General".to_string()]), None);
    }
}
