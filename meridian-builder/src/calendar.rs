//! Month grid model behind the date picker popup.
use crate::date::{IsoDate, MONTH_NAMES};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Six Sunday-first weeks.
pub const GRID_CELLS: usize = 42;
pub const PLACEHOLDER_LABEL: &str = "Choose a date";

/// The month currently shown by the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    /// 1-based.
    pub month: u32,
}

impl MonthView {
    #[must_use]
    pub fn containing(date: IsoDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Month to show on open: the selected date's, else today's.
    #[must_use]
    pub fn initial(selected: Option<IsoDate>, today: IsoDate) -> Self {
        Self::containing(selected.unwrap_or(today))
    }

    /// Shift by whole months, rolling the year over.
    #[must_use]
    pub fn shift(self, delta: i32) -> Self {
        let index = self.year * 12 + i32::try_from(self.month).unwrap_or(1) - 1 + delta;
        Self {
            year: index.div_euclid(12),
            month: u32::try_from(index.rem_euclid(12) + 1).unwrap_or(1),
        }
    }

    #[must_use]
    pub fn prev(self) -> Self {
        self.shift(-1)
    }

    #[must_use]
    pub fn next(self) -> Self {
        self.shift(1)
    }

    #[must_use]
    pub fn month_name(self) -> &'static str {
        usize::try_from(self.month.saturating_sub(1))
            .ok()
            .and_then(|i| MONTH_NAMES.get(i))
            .copied()
            .unwrap_or("")
    }

    /// Heading shown above the grid, e.g. `June 2025`.
    #[must_use]
    pub fn title(self) -> String {
        format!("{} {}", self.month_name(), self.year)
    }

    fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCell {
    pub date: IsoDate,
    pub day: u32,
    pub out_of_month: bool,
    pub selected: bool,
    pub today: bool,
    pub disabled: bool,
}

impl CalendarCell {
    /// CSS classes in the picker's naming scheme.
    #[must_use]
    pub fn classes(&self) -> Vec<&'static str> {
        let mut classes = vec!["mpCal__day"];
        if self.out_of_month {
            classes.push("is-out");
        }
        if self.selected {
            classes.push("is-selected");
        }
        if self.today {
            classes.push("is-today");
        }
        if self.disabled {
            classes.push("is-disabled");
        }
        classes
    }
}

/// Inputs that decide each cell's flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellContext {
    pub selected: Option<IsoDate>,
    pub today: Option<IsoDate>,
    pub min: Option<IsoDate>,
    pub max: Option<IsoDate>,
}

impl CellContext {
    #[must_use]
    pub fn is_disabled(&self, date: IsoDate) -> bool {
        self.min.is_some_and(|m| date < m) || self.max.is_some_and(|m| date > m)
    }
}

/// The 42 cells for `view`, starting on the Sunday on or before the 1st.
#[must_use]
pub fn month_grid(view: MonthView, ctx: &CellContext) -> Vec<CalendarCell> {
    let Some(first) = view.first_day() else {
        return Vec::new();
    };
    let lead = i64::from(first.weekday().num_days_from_sunday());
    let first = IsoDate::from_naive(first);
    (0..GRID_CELLS)
        .filter_map(|i| {
            let offset = i64::try_from(i).ok()? - lead;
            let date = first.add_days(offset)?;
            Some(CalendarCell {
                date,
                day: date.day(),
                out_of_month: date.month() != view.month || date.year() != view.year,
                selected: ctx.selected == Some(date),
                today: ctx.today == Some(date),
                disabled: ctx.is_disabled(date),
            })
        })
        .collect()
}

/// Result of clicking a day in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPick {
    /// Write the date into the field and close the picker.
    Choose(IsoDate),
    /// Disabled day; nothing happens.
    Ignored,
}

#[must_use]
pub fn pick_day(cell: &CalendarCell) -> DayPick {
    if cell.disabled {
        DayPick::Ignored
    } else {
        DayPick::Choose(cell.date)
    }
}

/// Text on the picker button and whether it is the placeholder.
#[must_use]
pub fn picker_label(value: Option<IsoDate>) -> (String, bool) {
    value.map_or_else(
        || (PLACEHOLDER_LABEL.to_string(), true),
        |d| (d.format_short(), false),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(raw: &str) -> IsoDate {
        IsoDate::parse(raw).unwrap()
    }

    #[test]
    fn june_2025_starts_on_sunday() {
        let grid = month_grid(
            MonthView {
                year: 2025,
                month: 6,
            },
            &CellContext::default(),
        );
        assert_eq!(grid.len(), GRID_CELLS);
        assert_eq!(grid[0].date, d("2025-06-01"));
        assert!(!grid[0].out_of_month);
        assert_eq!(grid[29].date, d("2025-06-30"));
        assert!(grid[30].out_of_month);
        assert_eq!(grid[41].date, d("2025-07-12"));
    }

    #[test]
    fn leading_cells_come_from_previous_month() {
        let grid = month_grid(
            MonthView {
                year: 2025,
                month: 1,
            },
            &CellContext::default(),
        );
        // 1 Jan 2025 is a Wednesday.
        assert_eq!(grid[0].date, d("2024-12-29"));
        assert!(grid[0].out_of_month);
        assert_eq!(grid[3].date, d("2025-01-01"));
        assert!(!grid[3].out_of_month);
    }

    #[test]
    fn flags_follow_context() {
        let ctx = CellContext {
            selected: Some(d("2025-06-03")),
            today: Some(d("2025-06-02")),
            min: Some(d("2025-06-02")),
            max: Some(d("2025-06-05")),
        };
        let grid = month_grid(MonthView::containing(d("2025-06-15")), &ctx);
        let cell = |day: usize| grid[day - 1];
        assert!(cell(1).disabled);
        assert!(cell(2).today && !cell(2).disabled);
        assert!(cell(3).selected);
        assert!(cell(6).disabled);
        assert_eq!(cell(3).classes(), vec!["mpCal__day", "is-selected"]);
        assert_eq!(pick_day(&cell(6)), DayPick::Ignored);
        assert_eq!(pick_day(&cell(4)), DayPick::Choose(d("2025-06-04")));
    }

    #[test]
    fn navigation_rolls_years() {
        let jan = MonthView {
            year: 2025,
            month: 1,
        };
        assert_eq!(
            jan.prev(),
            MonthView {
                year: 2024,
                month: 12
            }
        );
        assert_eq!(jan.prev().next(), jan);
        assert_eq!(jan.shift(23).month_name(), "December");
        assert_eq!(jan.shift(23).year, 2026);
        assert_eq!(jan.prev().title(), "December 2024");
    }

    #[test]
    fn initial_view_prefers_selection() {
        let today = d("2025-03-10");
        assert_eq!(MonthView::initial(None, today).month, 3);
        assert_eq!(MonthView::initial(Some(d("2025-09-01")), today).month, 9);
    }

    #[test]
    fn label_uses_placeholder_when_empty() {
        assert_eq!(picker_label(None), ("Choose a date".to_string(), true));
        assert_eq!(
            picker_label(Some(d("2025-06-01"))),
            ("01 Jun 2025".to_string(), false)
        );
    }
}
