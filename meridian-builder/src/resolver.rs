//! Keeps the start date, end date and requested duration consistent.
//!
//! Resolution is a single linear pass: given the edited values it computes
//! the corrected range and the bounds the two date fields should advertise.
//! It never feeds back into itself, so one edit yields at most one
//! corrective pass.
use crate::date::IsoDate;
use serde::{Deserialize, Serialize};

/// Min/max each date field should accept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    pub start_min: Option<IsoDate>,
    pub start_max: Option<IsoDate>,
    pub end_min: Option<IsoDate>,
    pub end_max: Option<IsoDate>,
}

impl DateBounds {
    #[must_use]
    pub fn allows_start(&self, date: IsoDate) -> bool {
        within(date, self.start_min, self.start_max)
    }

    #[must_use]
    pub fn allows_end(&self, date: IsoDate) -> bool {
        within(date, self.end_min, self.end_max)
    }
}

fn within(date: IsoDate, min: Option<IsoDate>, max: Option<IsoDate>) -> bool {
    min.is_none_or(|m| date >= m) && max.is_none_or(|m| date <= m)
}

/// A value the resolver changed on the user's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "to", rename_all = "snake_case")]
pub enum Correction {
    /// End fell before start and was cleared to force re-selection.
    EndCleared,
    /// End exceeded the duration window and was pulled back.
    EndClamped(IsoDate),
    /// Start fell outside the window ending at the end date.
    StartClamped(IsoDate),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateResolution {
    pub date_start: Option<IsoDate>,
    pub date_end: Option<IsoDate>,
    pub bounds: DateBounds,
    pub corrections: Vec<Correction>,
}

impl DateResolution {
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.corrections.is_empty()
    }
}

fn span(limit: u32) -> i64 {
    i64::from(limit.saturating_sub(1))
}

fn bounds_for(limit: Option<u32>, start: Option<IsoDate>, end: Option<IsoDate>) -> DateBounds {
    let limit = limit.filter(|l| *l > 0);
    DateBounds {
        start_min: limit.zip(end).and_then(|(l, e)| e.add_days(-span(l))),
        start_max: end,
        end_min: start,
        end_max: limit.zip(start).and_then(|(l, s)| s.add_days(span(l))),
    }
}

/// Resolve a date range against an optional duration limit (in days).
#[must_use]
pub fn resolve_dates(
    limit: Option<u32>,
    date_start: Option<IsoDate>,
    date_end: Option<IsoDate>,
) -> DateResolution {
    let limit = limit.filter(|l| *l > 0);
    let mut start = date_start;
    let mut end = date_end;
    let mut corrections = Vec::new();

    if let (Some(s), Some(e)) = (start, end) {
        if e < s {
            end = None;
            corrections.push(Correction::EndCleared);
        } else if let Some(l) = limit {
            if let Some(max_end) = s.add_days(span(l))
                && e > max_end
            {
                end = Some(max_end);
                corrections.push(Correction::EndClamped(max_end));
            }
            let anchor = end.unwrap_or(e);
            if let Some(min_start) = anchor.add_days(-span(l))
                && s < min_start
            {
                start = Some(min_start);
                corrections.push(Correction::StartClamped(min_start));
            }
        }
    }

    if !corrections.is_empty() {
        log::debug!("date range corrected: {corrections:?}");
    }

    DateResolution {
        date_start: start,
        date_end: end,
        bounds: bounds_for(limit, start, end),
        corrections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(raw: &str) -> IsoDate {
        IsoDate::parse(raw).unwrap()
    }

    #[test]
    fn end_beyond_duration_is_clamped() {
        let r = resolve_dates(Some(5), Some(d("2025-06-01")), Some(d("2025-06-10")));
        assert_eq!(r.date_end, Some(d("2025-06-05")));
        assert_eq!(r.date_start, Some(d("2025-06-01")));
        assert_eq!(r.corrections, vec![Correction::EndClamped(d("2025-06-05"))]);
    }

    #[test]
    fn end_before_start_is_cleared_not_swapped() {
        let r = resolve_dates(Some(5), Some(d("2025-06-10")), Some(d("2025-06-01")));
        assert_eq!(r.date_start, Some(d("2025-06-10")));
        assert_eq!(r.date_end, None);
        assert_eq!(r.corrections, vec![Correction::EndCleared]);
        assert_eq!(r.bounds.start_max, None);
    }

    #[test]
    fn no_limit_only_orders_dates() {
        let r = resolve_dates(None, Some(d("2025-06-01")), Some(d("2025-08-30")));
        assert!(!r.changed());
        assert_eq!(r.bounds.end_min, Some(d("2025-06-01")));
        assert_eq!(r.bounds.start_max, Some(d("2025-08-30")));
        assert_eq!(r.bounds.end_max, None);
        assert_eq!(r.bounds.start_min, None);
    }

    #[test]
    fn bounds_follow_duration_window() {
        let r = resolve_dates(Some(3), Some(d("2025-06-01")), None);
        assert_eq!(r.bounds.end_min, Some(d("2025-06-01")));
        assert_eq!(r.bounds.end_max, Some(d("2025-06-03")));
        assert!(r.bounds.allows_end(d("2025-06-03")));
        assert!(!r.bounds.allows_end(d("2025-06-04")));

        let r = resolve_dates(Some(3), None, Some(d("2025-06-10")));
        assert_eq!(r.bounds.start_min, Some(d("2025-06-08")));
        assert_eq!(r.bounds.start_max, Some(d("2025-06-10")));
        assert!(!r.bounds.allows_start(d("2025-06-07")));
    }

    #[test]
    fn single_day_duration_pins_end_to_start() {
        let r = resolve_dates(Some(1), Some(d("2025-06-01")), Some(d("2025-06-02")));
        assert_eq!(r.date_end, Some(d("2025-06-01")));
        assert_eq!(r.bounds.end_max, Some(d("2025-06-01")));
    }

    #[test]
    fn at_most_one_correction_per_pass_for_any_duration() {
        let start = d("2025-01-15");
        for limit in 1..=40 {
            for offset in -45..=45 {
                let end = start.add_days(offset).unwrap();
                let r = resolve_dates(Some(limit), Some(start), Some(end));
                assert!(r.corrections.len() <= 1, "limit {limit}, offset {offset}");
                assert!(
                    !r.corrections
                        .iter()
                        .any(|c| matches!(c, Correction::StartClamped(_))),
                    "start never moves once end is clamped"
                );
                let again = resolve_dates(Some(limit), r.date_start, r.date_end);
                assert!(!again.changed(), "resolution must be a fixed point");
            }
        }
    }

    #[test]
    fn shrinking_duration_clamps_existing_range() {
        let r = resolve_dates(Some(7), Some(d("2025-06-01")), Some(d("2025-06-07")));
        assert!(!r.changed());
        let r = resolve_dates(Some(3), r.date_start, r.date_end);
        assert_eq!(r.date_end, Some(d("2025-06-03")));
    }
}
