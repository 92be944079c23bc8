//! Mapping between [`ExperienceConfig`] and the page's query string.
//!
//! The query string is always a complete re-encoding of the state, so a
//! decode of an encode reproduces the same visible configuration.
use crate::config::{Days, ExperienceConfig, parse_leading_int};
use crate::date::IsoDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const KEY_CITY: &str = "city";
pub const KEY_DAYS: &str = "days";
pub const KEY_LEVEL: &str = "level";
pub const KEY_GROUP: &str = "group";
pub const KEY_DATE_START: &str = "date_start";
pub const KEY_DATE_END: &str = "date_end";
pub const KEY_ADDONS: &str = "addons";

/// Ordered `application/x-www-form-urlencoded` pairs with the same
/// get/set/delete behaviour as the browser's `URLSearchParams`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Parse a search string, with or without its leading `?`.
    #[must_use]
    pub fn parse(search: &str) -> Self {
        let raw = search.strip_prefix('?').unwrap_or(search);
        Self {
            pairs: form_urlencoded::parse(raw.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// First value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace the first `key` in place and drop any later duplicates, or
    /// append when the key is absent.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        let mut slot = Some(value);
        self.pairs.retain_mut(|(k, v)| {
            if k != key {
                return true;
            }
            match slot.take() {
                Some(next) => {
                    *v = next;
                    true
                }
                None => false,
            }
        });
        if let Some(value) = slot {
            self.pairs.push((key.to_string(), value));
        }
    }

    pub fn delete(&mut self, key: &str) {
        self.pairs.retain(|(k, _)| k != key);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish();
        f.write_str(&encoded)
    }
}

/// Whatever the query string says about the configuration. Every field is
/// optional; malformed values are already discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialConfig {
    pub city: Option<String>,
    pub days: Option<Days>,
    pub level: Option<String>,
    pub group: Option<i64>,
    pub date_start: Option<IsoDate>,
    pub date_end: Option<IsoDate>,
    pub addons: Option<Vec<String>>,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Read the builder keys out of a query string.
#[must_use]
pub fn decode(search: &str) -> PartialConfig {
    decode_params(&QueryParams::parse(search))
}

#[must_use]
pub fn decode_params(params: &QueryParams) -> PartialConfig {
    let date = |key: &str| {
        let raw = non_empty(params.get(key))?;
        let parsed = IsoDate::parse(raw);
        if parsed.is_none() {
            log::debug!("discarding malformed {key}={raw}");
        }
        parsed
    };
    PartialConfig {
        city: non_empty(params.get(KEY_CITY)).map(str::to_string),
        days: non_empty(params.get(KEY_DAYS)).and_then(Days::parse),
        level: non_empty(params.get(KEY_LEVEL)).map(str::to_string),
        group: non_empty(params.get(KEY_GROUP)).and_then(parse_leading_int),
        date_start: date(KEY_DATE_START),
        date_end: date(KEY_DATE_END),
        addons: non_empty(params.get(KEY_ADDONS)).map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        }),
    }
}

/// Write every builder key onto `params`, leaving unrelated keys alone.
pub fn encode_into(config: &ExperienceConfig, params: &mut QueryParams) {
    params.set(KEY_CITY, config.city.as_str());
    params.set(
        KEY_DAYS,
        config.days.as_ref().map(ToString::to_string).unwrap_or_default(),
    );
    params.set(KEY_LEVEL, config.level.as_str());
    params.set(KEY_GROUP, config.group.to_string());

    match config.date_start {
        Some(d) => params.set(KEY_DATE_START, d.to_string()),
        None => params.delete(KEY_DATE_START),
    }
    match config.date_end {
        Some(d) => params.set(KEY_DATE_END, d.to_string()),
        None => params.delete(KEY_DATE_END),
    }
    if config.addons.is_empty() {
        params.delete(KEY_ADDONS);
    } else {
        params.set(KEY_ADDONS, config.addons.join(","));
    }
}

/// Encode onto an empty query string.
#[must_use]
pub fn encode(config: &ExperienceConfig) -> String {
    let mut params = QueryParams::default();
    encode_into(config, &mut params);
    params.to_string()
}

/// The parts of the page URL the shareable link is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareLocation {
    pub origin: String,
    pub pathname: String,
    pub params: QueryParams,
    pub hash: String,
}

impl ShareLocation {
    #[must_use]
    pub fn new(origin: &str, pathname: &str, search: &str, hash: &str) -> Self {
        Self {
            origin: origin.to_string(),
            pathname: pathname.to_string(),
            params: QueryParams::parse(search),
            hash: hash.to_string(),
        }
    }

    /// Re-encode `config` over the current parameters and return the
    /// relative link (`pathname?query#hash`).
    pub fn encode(&mut self, config: &ExperienceConfig) -> String {
        encode_into(config, &mut self.params);
        self.relative()
    }

    #[must_use]
    pub fn relative(&self) -> String {
        format!("{}?{}{}", self.pathname, self.params, self.hash)
    }

    /// Absolute link for the clipboard.
    #[must_use]
    pub fn absolute(&self) -> String {
        format!("{}{}", self.origin, self.relative())
    }
}
