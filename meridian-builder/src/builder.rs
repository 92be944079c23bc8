//! The experience builder engine.
//!
//! Owns the configuration, the raw control values it is derived from and the
//! share location. Every edit runs one synchronous pass: apply the edit,
//! resolve the date range, clamp the group size, re-encode the URL, render
//! the summary and publish the change.
use crate::catalog::BuilderCatalog;
use crate::config::{
    AddonSet, ExperienceConfig, GROUP_MAX, GROUP_MIN, clamp_group, coerce_group, parse_leading_int,
};
use crate::date::IsoDate;
use crate::query::{PartialConfig, ShareLocation, decode_params};
use crate::render::{Summary, summarize};
use crate::resolver::{Correction, DateBounds, resolve_dates};
use serde::{Deserialize, Serialize};

/// One user interaction with a builder control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "control", content = "value", rename_all = "snake_case")]
pub enum BuilderEdit {
    City(String),
    /// The days select changed to this option value.
    DaysOption(String),
    /// The exact-days input shown for the custom option changed.
    CustomDays(String),
    Level(String),
    /// Raw text from the group-size input.
    Group(String),
    DateStart(Option<IsoDate>),
    DateEnd(Option<IsoDate>),
    ToggleAddon(String),
}

/// Raw values of the duration controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaysControl {
    pub option: String,
    pub custom: String,
}

/// Everything a listener needs after a change: the full state plus the
/// freshly encoded shareable link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderChange {
    #[serde(flatten)]
    pub config: ExperienceConfig,
    pub share: String,
    #[serde(skip)]
    pub summary: Option<Summary>,
    #[serde(skip)]
    pub bounds: DateBounds,
    #[serde(skip)]
    pub corrections: Vec<Correction>,
}

/// Receiver of change broadcasts. The engine keeps no subscriber list; it
/// hands each change to whatever sink the caller passes in.
pub trait ChangeSink {
    fn publish(&self, change: &BuilderChange);
}

impl ChangeSink for () {
    fn publish(&self, _change: &BuilderChange) {}
}

impl<F: Fn(&BuilderChange)> ChangeSink for F {
    fn publish(&self, change: &BuilderChange) {
        self(change);
    }
}

#[derive(Debug, Clone)]
pub struct ExperienceBuilder {
    catalog: BuilderCatalog,
    days_control: DaysControl,
    config: ExperienceConfig,
    bounds: DateBounds,
    location: ShareLocation,
    share: String,
}

impl ExperienceBuilder {
    /// Build the initial state: catalogue defaults, then any query overrides
    /// that pass validation, then one resolver pass.
    #[must_use]
    pub fn new(catalog: BuilderCatalog, location: ShareLocation) -> Self {
        let overrides = decode_params(&location.params);
        let days_control = DaysControl {
            option: catalog.initial_days_option(),
            custom: String::new(),
        };
        let config = ExperienceConfig {
            city: catalog.initial_city(),
            days: catalog.days_value(&days_control.option, &days_control.custom),
            level: catalog.initial_level(),
            group: clamp_group(i64::from(catalog.default_group)),
            ..ExperienceConfig::default()
        };
        let mut builder = Self {
            catalog,
            days_control,
            config,
            bounds: DateBounds::default(),
            location,
            share: String::new(),
        };
        builder.merge_overrides(overrides);
        builder.refresh();
        builder
    }

    fn merge_overrides(&mut self, overrides: PartialConfig) {
        if let Some(city) = overrides.city {
            if self.catalog.has_city(&city) {
                self.config.city = city;
            } else {
                log::debug!("ignoring unknown city override {city}");
            }
        }
        if let Some(days) = overrides.days {
            let value = days.to_string();
            if self.catalog.has_days_option(&value) {
                self.select_days_option(value);
            } else if let Some(n) = days.limit() {
                if self.catalog.has_custom_days() {
                    self.days_control.option = self.catalog.custom_days_option.clone();
                    self.days_control.custom = n.to_string();
                }
            } else {
                log::debug!("ignoring unknown days override {value}");
            }
        }
        if let Some(level) = overrides.level {
            if self.catalog.has_level(&level) {
                self.config.level = level;
            } else {
                log::debug!("ignoring unknown level override {level}");
            }
        }
        if let Some(group) = overrides.group
            && (i64::from(GROUP_MIN)..=i64::from(GROUP_MAX)).contains(&group)
        {
            self.config.group = clamp_group(group);
        }
        if overrides.date_start.is_some() {
            self.config.date_start = overrides.date_start;
        }
        if overrides.date_end.is_some() {
            self.config.date_end = overrides.date_end;
        }
        if let Some(addons) = overrides.addons {
            self.config.addons = addons.into_iter().collect::<AddonSet>();
        }
    }

    fn select_days_option(&mut self, option: String) {
        if !self.catalog.is_custom_days(&option) {
            self.days_control.custom.clear();
        }
        self.days_control.option = option;
    }

    /// Apply one edit, publish the resulting change and return it.
    pub fn apply<S: ChangeSink + ?Sized>(&mut self, edit: BuilderEdit, sink: &S) -> BuilderChange {
        log::trace!("builder edit: {edit:?}");
        match edit {
            BuilderEdit::City(city) => self.config.city = city,
            BuilderEdit::DaysOption(option) => self.select_days_option(option),
            BuilderEdit::CustomDays(raw) => self.days_control.custom = raw,
            BuilderEdit::Level(level) => self.config.level = level,
            BuilderEdit::Group(raw) => {
                self.config.group = if raw.trim().is_empty() {
                    self.config.group
                } else {
                    coerce_group(&raw)
                };
            }
            BuilderEdit::DateStart(date) => self.config.date_start = date,
            BuilderEdit::DateEnd(date) => self.config.date_end = date,
            BuilderEdit::ToggleAddon(key) => {
                self.config.addons.toggle(&key);
            }
        }
        let corrections = self.refresh();
        let change = self.change(corrections);
        sink.publish(&change);
        change
    }

    /// Publish the current state without editing it (used after mount).
    pub fn publish<S: ChangeSink + ?Sized>(&self, sink: &S) -> BuilderChange {
        let change = self.change(Vec::new());
        sink.publish(&change);
        change
    }

    fn refresh(&mut self) -> Vec<Correction> {
        self.config.days = self
            .catalog
            .days_value(&self.days_control.option, &self.days_control.custom);
        let resolution = resolve_dates(
            self.config.days_limit(),
            self.config.date_start,
            self.config.date_end,
        );
        self.config.date_start = resolution.date_start;
        self.config.date_end = resolution.date_end;
        self.bounds = resolution.bounds;
        self.share = self.location.encode(&self.config);
        resolution.corrections
    }

    fn change(&self, corrections: Vec<Correction>) -> BuilderChange {
        BuilderChange {
            config: self.config.clone(),
            share: self.share.clone(),
            summary: Some(self.summary()),
            bounds: self.bounds,
            corrections,
        }
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        let custom = self.catalog.is_custom_days(&self.days_control.option);
        summarize(&self.config, custom)
    }

    #[must_use]
    pub const fn config(&self) -> &ExperienceConfig {
        &self.config
    }

    #[must_use]
    pub const fn catalog(&self) -> &BuilderCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn days_control(&self) -> &DaysControl {
        &self.days_control
    }

    /// Whether the exact-days input should be visible.
    #[must_use]
    pub fn custom_days_visible(&self) -> bool {
        self.catalog.is_custom_days(&self.days_control.option)
    }

    #[must_use]
    pub const fn bounds(&self) -> DateBounds {
        self.bounds
    }

    /// Relative shareable link (`pathname?query#hash`).
    #[must_use]
    pub fn share(&self) -> &str {
        &self.share
    }

    /// Absolute shareable link for the clipboard.
    #[must_use]
    pub fn share_absolute(&self) -> String {
        self.location.absolute()
    }

    /// Numeric value of the exact-days input, if it holds one.
    #[must_use]
    pub fn custom_days_count(&self) -> Option<i64> {
        parse_leading_int(&self.days_control.custom)
    }
}
