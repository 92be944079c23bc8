//! Day-by-day itinerary plans keyed by duration.
use crate::builder::BuilderChange;
use crate::config::Days;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Durations that have a dedicated plan.
pub const PLANNED_DURATIONS: [u32; 3] = [3, 5, 7];
/// Plan shown for any other duration.
pub const FALLBACK_DURATION: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub title: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryCatalog {
    #[serde(default)]
    pub plans: BTreeMap<u32, Vec<ItineraryDay>>,
}

impl ItineraryCatalog {
    /// Plan for `days`, or the fallback plan.
    #[must_use]
    pub fn plan_for(&self, days: u32) -> &[ItineraryDay] {
        self.plans
            .get(&days)
            .or_else(|| self.plans.get(&FALLBACK_DURATION))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Duration the itinerary should switch to after a builder change, if the
/// change names one of the planned durations.
#[must_use]
pub fn followed_duration(change: &BuilderChange) -> Option<u32> {
    match change.config.days {
        Some(Days::Count(n)) if PLANNED_DURATIONS.contains(&n.get()) => Some(n.get()),
        _ => None,
    }
}
