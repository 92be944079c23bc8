//! Replays scripted control edits against a headless engine.
use std::cell::Cell;

use meridian_builder::{
    BuilderCatalog, BuilderChange, BuilderEdit, Correction, ExperienceBuilder, IsoDate,
    ShareLocation, Summary, build_message,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScriptError {
    #[error("edit `{0}` must look like control=value")]
    MissingSeparator(String),
    #[error("unknown control `{0}` (expected city, days, days_custom, level, group, date_start, date_end or addon)")]
    UnknownControl(String),
}

/// Parse one `control=value` edit.
///
/// Date values that are not `YYYY-MM-DD` clear the field, the same as an
/// emptied date input.
///
/// # Errors
/// Returns an error if the separator is missing or the control is unknown.
pub fn parse_edit(raw: &str) -> Result<BuilderEdit, ScriptError> {
    let (control, value) = raw
        .split_once('=')
        .ok_or_else(|| ScriptError::MissingSeparator(raw.to_string()))?;
    let value = value.trim().to_string();
    let edit = match control.trim() {
        "city" => BuilderEdit::City(value),
        "days" => BuilderEdit::DaysOption(value),
        "days_custom" => BuilderEdit::CustomDays(value),
        "level" => BuilderEdit::Level(value),
        "group" => BuilderEdit::Group(value),
        "date_start" => BuilderEdit::DateStart(IsoDate::parse(&value)),
        "date_end" => BuilderEdit::DateEnd(IsoDate::parse(&value)),
        "addon" => BuilderEdit::ToggleAddon(value),
        other => return Err(ScriptError::UnknownControl(other.to_string())),
    };
    Ok(edit)
}

/// # Errors
/// Returns the first edit that fails to parse.
pub fn parse_edits(raw: &[String]) -> Result<Vec<BuilderEdit>, ScriptError> {
    raw.iter().map(|e| parse_edit(e)).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayStep {
    pub edit: BuilderEdit,
    pub share: String,
    pub corrections: Vec<Correction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayOutcome {
    pub initial_share: String,
    pub steps: Vec<ReplayStep>,
    #[serde(rename = "final")]
    pub final_state: BuilderChange,
    pub summary: Summary,
    pub message: String,
    pub link: String,
    /// Broadcasts seen during the replay; one per edit.
    pub broadcasts: usize,
}

/// Load `location` into a fresh engine and apply `edits` in order.
#[must_use]
pub fn replay(catalog: BuilderCatalog, location: ShareLocation, edits: &[BuilderEdit]) -> ReplayOutcome {
    let mut engine = ExperienceBuilder::new(catalog, location);
    let initial_share = engine.share().to_string();
    let broadcasts = Cell::new(0_usize);
    let sink = |change: &BuilderChange| {
        broadcasts.set(broadcasts.get() + 1);
        log::trace!("broadcast {}", change.share);
    };

    let steps = edits
        .iter()
        .map(|edit| {
            let change = engine.apply(edit.clone(), &sink);
            ReplayStep {
                edit: edit.clone(),
                share: change.share,
                corrections: change.corrections,
            }
        })
        .collect();

    let final_state = engine.publish(&());
    ReplayOutcome {
        initial_share,
        steps,
        summary: engine.summary(),
        message: build_message(engine.config()),
        link: engine.share_absolute(),
        final_state,
        broadcasts: broadcasts.get(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_builder::{CatalogLoader, EmbeddedCatalogs};

    fn location(search: &str) -> ShareLocation {
        ShareLocation::new("https://meridian.example", "/", search, "")
    }

    #[test]
    fn parses_every_control() {
        assert_eq!(parse_edit("city=Valencia"), Ok(BuilderEdit::City("Valencia".into())));
        assert_eq!(parse_edit("group= 12 "), Ok(BuilderEdit::Group("12".into())));
        assert_eq!(
            parse_edit("date_end=2025-06-10"),
            Ok(BuilderEdit::DateEnd(IsoDate::parse("2025-06-10")))
        );
        assert_eq!(parse_edit("date_start="), Ok(BuilderEdit::DateStart(None)));
        assert_eq!(parse_edit("addon=Video analysis"), Ok(BuilderEdit::ToggleAddon("Video analysis".into())));
    }

    #[test]
    fn rejects_malformed_edits() {
        assert_eq!(
            parse_edit("city"),
            Err(ScriptError::MissingSeparator("city".into()))
        );
        assert_eq!(
            parse_edit("price=10"),
            Err(ScriptError::UnknownControl("price".into()))
        );
        assert!(parse_edits(&["city=Madrid".into(), "nope".into()]).is_err());
    }

    #[test]
    fn replay_records_each_step_and_clamp() {
        let edits = parse_edits(&[
            "days=5".into(),
            "date_start=2025-06-01".into(),
            "date_end=2025-06-10".into(),
        ])
        .unwrap();
        let outcome = replay(EmbeddedCatalogs.load_builder_catalog().unwrap(), location(""), &edits);
        assert_eq!(outcome.steps.len(), 3);
        assert_eq!(outcome.broadcasts, 3);
        assert_eq!(
            outcome.steps[2].corrections,
            vec![Correction::EndClamped(IsoDate::parse("2025-06-05").unwrap())]
        );
        assert_eq!(outcome.final_state.config.date_end, IsoDate::parse("2025-06-05"));
        assert!(outcome.link.starts_with("https://meridian.example/?"));
        assert!(outcome.message.contains("• Dates: 01 Jun 2025 → 05 Jun 2025"));
    }
}
