//! Human-readable renderings of an [`ExperienceConfig`].
use crate::config::{Days, ExperienceConfig};
use crate::date::IsoDate;
use serde::{Deserialize, Serialize};

pub const FLEXIBLE: &str = "Flexible";
pub const FLEXIBLE_SIDE: &str = "(flexible)";
pub const NO_ADDONS: &str = "None";
pub const CUSTOM_DAYS_LABEL: &str = "Custom";

const MESSAGE_HEADER: [&str; 3] = [
    "Hi Meridian Padel,",
    "",
    "I\u{2019}d like to request a premium padel experience with:",
];

/// `start → end`, with `(flexible)` standing in for a missing side.
#[must_use]
pub fn format_date_range(start: Option<IsoDate>, end: Option<IsoDate>) -> String {
    match (start, end) {
        (Some(s), Some(e)) => format!("{} \u{2192} {}", s.format_short(), e.format_short()),
        (Some(s), None) => format!("{} \u{2192} {FLEXIBLE_SIDE}", s.format_short()),
        (None, Some(e)) => format!("{FLEXIBLE_SIDE} \u{2192} {}", e.format_short()),
        (None, None) => FLEXIBLE.to_string(),
    }
}

/// What the on-page summary card shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub city: String,
    pub days_label: String,
    pub dates_label: String,
    pub level: String,
    pub group: u8,
    /// Chips to render; a single `None` chip when nothing is selected.
    pub addons: Vec<SummaryChip>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryChip {
    pub label: String,
    pub selected: bool,
}

/// Build the summary. `custom_selected` tells whether the days control sits
/// on the custom option, which labels an open-ended duration as `Custom`.
#[must_use]
pub fn summarize(config: &ExperienceConfig, custom_selected: bool) -> Summary {
    let days_label = match &config.days {
        Some(Days::Count(n)) => n.to_string(),
        Some(Days::Label(_)) if custom_selected => CUSTOM_DAYS_LABEL.to_string(),
        Some(Days::Label(label)) => label.clone(),
        None => String::new(),
    };
    let addons = if config.addons.is_empty() {
        vec![SummaryChip {
            label: NO_ADDONS.to_string(),
            selected: false,
        }]
    } else {
        config
            .addons
            .iter()
            .map(|a| SummaryChip {
                label: a.to_string(),
                selected: true,
            })
            .collect()
    };
    Summary {
        city: config.city.clone(),
        days_label,
        dates_label: format_date_range(config.date_start, config.date_end),
        level: config.level.clone(),
        group: config.group,
        addons,
    }
}

/// Bullet lines for each populated field, in a fixed order.
#[must_use]
pub fn message_lines(config: &ExperienceConfig) -> Vec<String> {
    let mut lines = Vec::new();
    if !config.city.is_empty() {
        lines.push(format!("\u{2022} City: {}", config.city));
    }
    match &config.days {
        Some(Days::Count(n)) => lines.push(format!("\u{2022} Duration: {n} days")),
        Some(Days::Label(label)) if !label.is_empty() => {
            lines.push(format!("\u{2022} Duration: {label}"));
        }
        _ => {}
    }
    if config.date_start.is_some() || config.date_end.is_some() {
        lines.push(format!(
            "\u{2022} Dates: {}",
            format_date_range(config.date_start, config.date_end)
        ));
    }
    if !config.level.is_empty() {
        lines.push(format!("\u{2022} Package level: {}", config.level));
    }
    lines.push(format!("\u{2022} Group size: {}", config.group));
    if !config.addons.is_empty() {
        lines.push(format!("\u{2022} Add-ons: {}", config.addons.join(", ")));
    }
    lines
}

/// Plain-text body for pre-filling the contact form.
#[must_use]
pub fn build_message(config: &ExperienceConfig) -> String {
    MESSAGE_HEADER
        .iter()
        .map(|line| (*line).to_string())
        .chain(message_lines(config))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AddonSet;

    fn d(raw: &str) -> Option<IsoDate> {
        IsoDate::parse(raw)
    }

    fn madrid() -> ExperienceConfig {
        ExperienceConfig {
            city: "Madrid".into(),
            days: Days::count(5),
            date_start: None,
            date_end: None,
            level: "Premium".into(),
            group: 4,
            addons: ["Spa"].into_iter().collect(),
        }
    }

    #[test]
    fn date_range_covers_all_shapes() {
        assert_eq!(
            format_date_range(d("2025-06-01"), d("2025-06-05")),
            "01 Jun 2025 → 05 Jun 2025"
        );
        assert_eq!(
            format_date_range(d("2025-06-01"), None),
            "01 Jun 2025 → (flexible)"
        );
        assert_eq!(
            format_date_range(None, d("2025-06-05")),
            "(flexible) → 05 Jun 2025"
        );
        assert_eq!(format_date_range(None, None), "Flexible");
    }

    #[test]
    fn message_lists_populated_fields_without_dates() {
        let lines = message_lines(&madrid());
        assert_eq!(
            lines,
            vec![
                "• City: Madrid",
                "• Duration: 5 days",
                "• Package level: Premium",
                "• Group size: 4",
                "• Add-ons: Spa",
            ]
        );
        let message = build_message(&madrid());
        assert!(message.starts_with("Hi Meridian Padel,\n\n"));
        assert!(!message.contains("Dates:"));
    }

    #[test]
    fn message_includes_dates_and_label_duration() {
        let mut config = madrid();
        config.days = Some(Days::Label("Customize".into()));
        config.date_start = d("2025-06-01");
        config.addons = AddonSet::new();
        let message = build_message(&config);
        assert!(message.contains("• Duration: Customize\n"));
        assert!(message.contains("• Dates: 01 Jun 2025 → (flexible)"));
        assert!(!message.contains("Add-ons"));
    }

    #[test]
    fn summary_labels_custom_and_empty_addons() {
        let mut config = madrid();
        config.days = Some(Days::Label("Customize".into()));
        config.addons = AddonSet::new();
        let summary = summarize(&config, true);
        assert_eq!(summary.days_label, "Custom");
        assert_eq!(summary.dates_label, "Flexible");
        assert_eq!(summary.addons.len(), 1);
        assert_eq!(summary.addons[0].label, "None");
        assert!(!summary.addons[0].selected);

        let summary = summarize(&madrid(), false);
        assert_eq!(summary.days_label, "5");
        assert!(summary.addons[0].selected);
    }
}
