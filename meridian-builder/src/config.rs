//! The experience configuration and its field-level invariants.
use crate::date::IsoDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

pub const GROUP_MIN: u8 = 1;
pub const GROUP_MAX: u8 = 50;
pub const DEFAULT_GROUP: u8 = 4;

/// Requested duration: a concrete number of days, or an opaque option label
/// such as the `Customize` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Days {
    Count(NonZeroU32),
    Label(String),
}

impl Days {
    /// Digits-only values become a count; everything else (including `0`) is
    /// kept verbatim as a label. Empty input is `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() {
            return None;
        }
        if raw.bytes().all(|b| b.is_ascii_digit())
            && let Some(n) = raw.parse::<u32>().ok().and_then(NonZeroU32::new)
        {
            return Some(Self::Count(n));
        }
        Some(Self::Label(raw.to_string()))
    }

    #[must_use]
    pub fn count(n: u32) -> Option<Self> {
        NonZeroU32::new(n).map(Self::Count)
    }

    /// The range limit this duration imposes, if any.
    #[must_use]
    pub const fn limit(&self) -> Option<u32> {
        match self {
            Self::Count(n) => Some(n.get()),
            Self::Label(_) => None,
        }
    }
}

impl fmt::Display for Days {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(n) => write!(f, "{n}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// Selected add-ons in order of first selection, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddonSet(Vec<String>);

impl AddonSet {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Flip membership of `key`. Returns `true` when the add-on is now on.
    pub fn toggle(&mut self, key: &str) -> bool {
        if let Some(idx) = self.0.iter().position(|a| a == key) {
            self.0.remove(idx);
            false
        } else {
            self.0.push(key.to_string());
            true
        }
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|a| a == key)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn join(&self, sep: &str) -> String {
        self.0.join(sep)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl<S: Into<String>> FromIterator<S> for AddonSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for item in iter {
            let item = item.into();
            if !item.is_empty() && !set.contains(&item) {
                set.0.push(item);
            }
        }
        set
    }
}

/// The single entity behind the builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceConfig {
    pub city: String,
    pub days: Option<Days>,
    pub date_start: Option<IsoDate>,
    pub date_end: Option<IsoDate>,
    pub level: String,
    pub group: u8,
    pub addons: AddonSet,
}

impl Default for ExperienceConfig {
    fn default() -> Self {
        Self {
            city: String::new(),
            days: None,
            date_start: None,
            date_end: None,
            level: String::new(),
            group: DEFAULT_GROUP,
            addons: AddonSet::new(),
        }
    }
}

impl ExperienceConfig {
    /// Numeric duration limit for the date range, if the duration is concrete.
    #[must_use]
    pub fn days_limit(&self) -> Option<u32> {
        self.days.as_ref().and_then(Days::limit)
    }
}

/// Integer prefix of `raw`, read the way a browser's `parseInt` reads it:
/// surrounding whitespace ignored, optional sign, then leading digits.
#[must_use]
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

/// Pull an integer into `[GROUP_MIN, GROUP_MAX]`.
#[must_use]
pub fn clamp_group(n: i64) -> u8 {
    let clamped = n.clamp(i64::from(GROUP_MIN), i64::from(GROUP_MAX));
    u8::try_from(clamped).unwrap_or(DEFAULT_GROUP)
}

/// Coerce a raw group-size input. Non-numeric input falls back to
/// `DEFAULT_GROUP`; numbers are clamped into range.
#[must_use]
pub fn coerce_group(raw: &str) -> u8 {
    parse_leading_int(raw).map_or(DEFAULT_GROUP, clamp_group)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_parse_distinguishes_counts_and_labels() {
        assert_eq!(Days::parse("5"), Days::count(5));
        assert_eq!(
            Days::parse("Customize"),
            Some(Days::Label("Customize".into()))
        );
        assert_eq!(Days::parse("0"), Some(Days::Label("0".into())));
        assert_eq!(Days::parse("5 days"), Some(Days::Label("5 days".into())));
        assert_eq!(Days::parse(""), None);
        assert_eq!(Days::count(7).and_then(|d| d.limit()), Some(7));
        assert_eq!(Days::Label("Customize".into()).limit(), None);
    }

    #[test]
    fn group_coercion_stays_in_range() {
        assert_eq!(coerce_group("0"), 1);
        assert_eq!(coerce_group("-5"), 1);
        assert_eq!(coerce_group("abc"), DEFAULT_GROUP);
        assert_eq!(coerce_group("999"), 50);
        assert_eq!(coerce_group(" 12 "), 12);
        assert_eq!(coerce_group("8 people"), 8);
        assert_eq!(coerce_group(""), DEFAULT_GROUP);
        assert_eq!(coerce_group("99999999999999999999999"), 50);
    }

    #[test]
    fn leading_int_follows_parse_int() {
        assert_eq!(parse_leading_int("42abc"), Some(42));
        assert_eq!(parse_leading_int("+3"), Some(3));
        assert_eq!(parse_leading_int("-"), None);
        assert_eq!(parse_leading_int("x1"), None);
    }

    #[test]
    fn addon_toggle_twice_restores_order() {
        let mut set: AddonSet = ["Spa", "Physio", "Video"].into_iter().collect();
        assert!(set.toggle("Gastronomy"));
        assert!(!set.toggle("Gastronomy"));
        assert_eq!(set.join(","), "Spa,Physio,Video");

        assert!(!set.toggle("Physio"));
        assert!(set.toggle("Physio"));
        assert_eq!(set.join(","), "Spa,Video,Physio");
    }

    #[test]
    fn addon_collection_drops_duplicates_and_blanks() {
        let set: AddonSet = ["Spa", "", "Spa", "Physio"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice(), ["Spa".to_string(), "Physio".to_string()]);
    }

    #[test]
    fn config_serialises_with_camel_case_dates() {
        let config = ExperienceConfig {
            city: "Madrid".into(),
            days: Days::count(5),
            date_start: IsoDate::parse("2025-06-01"),
            date_end: None,
            level: "Premium".into(),
            group: 4,
            addons: ["Spa"].into_iter().collect(),
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["days"], 5);
        assert_eq!(json["dateStart"], "2025-06-01");
        assert!(json["dateEnd"].is_null());
        assert_eq!(json["addons"][0], "Spa");
        let back: ExperienceConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back, config);
    }
}
