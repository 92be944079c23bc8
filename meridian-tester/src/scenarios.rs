//! Logic scenarios exercising the builder engine without a browser.
use std::fmt::Debug;
use std::time::{Duration, Instant};

use colored::Colorize;
use meridian_builder::itinerary::PLANNED_DURATIONS;
use meridian_builder::render::message_lines;
use meridian_builder::{
    BuilderCatalog, BuilderChange, BuilderEdit, ContactHandoff, Correction, Days,
    ExperienceBuilder, ExperienceConfig, IsoDate, ShareLocation, encode, followed_duration,
    resolve_dates,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_key: String,
    pub scenario_name: String,
    pub passed: bool,
    pub checks_run: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub duration: Duration,
}

/// Collects pass/fail outcomes for one scenario.
#[derive(Debug, Default)]
pub struct Checks {
    run: usize,
    failures: Vec<String>,
}

impl Checks {
    pub fn check(&mut self, ok: bool, what: impl Into<String>) {
        self.run += 1;
        if !ok {
            self.failures.push(what.into());
        }
    }

    pub fn equal<T: PartialEq + Debug>(&mut self, what: &str, actual: &T, expected: &T) {
        self.check(
            actual == expected,
            format!("{what}: expected {expected:?}, got {actual:?}"),
        );
    }
}

pub struct Scenario {
    pub key: &'static str,
    pub name: &'static str,
    run: fn(&BuilderCatalog, &mut Checks),
}

impl Scenario {
    #[must_use]
    pub fn run(&self, catalog: &BuilderCatalog, verbose: bool) -> ScenarioResult {
        if verbose {
            println!("🧪 Running scenario: {}", self.name.bright_white());
        }
        let started = Instant::now();
        let mut checks = Checks::default();
        (self.run)(catalog, &mut checks);
        ScenarioResult {
            scenario_key: self.key.to_string(),
            scenario_name: self.name.to_string(),
            passed: checks.failures.is_empty(),
            checks_run: checks.run,
            failures: checks.failures,
            duration: started.elapsed(),
        }
    }
}

const SCENARIOS: &[Scenario] = &[
    Scenario {
        key: "url-round-trip",
        name: "Shared links reproduce the state",
        run: url_round_trip,
    },
    Scenario {
        key: "link-stability",
        name: "Re-encoding a loaded link is stable",
        run: link_stability,
    },
    Scenario {
        key: "duration-clamp",
        name: "End date clamps to the duration",
        run: duration_clamp,
    },
    Scenario {
        key: "end-before-start",
        name: "End before start is cleared",
        run: end_before_start,
    },
    Scenario {
        key: "single-pass",
        name: "Date resolution converges in one pass",
        run: single_pass,
    },
    Scenario {
        key: "group-clamp",
        name: "Group size stays within 1..=50",
        run: group_clamp,
    },
    Scenario {
        key: "custom-days",
        name: "Exact day counts use the custom option",
        run: custom_days,
    },
    Scenario {
        key: "message-lines",
        name: "Message skips empty fields",
        run: message_rendering,
    },
    Scenario {
        key: "addon-toggle",
        name: "Add-on toggles are reversible",
        run: addon_toggle,
    },
    Scenario {
        key: "itinerary-follow",
        name: "Itinerary follows planned durations",
        run: itinerary_follow,
    },
    Scenario {
        key: "contact-handoff",
        name: "Contact hand-off carries the state",
        run: contact_handoff,
    },
];

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS.iter().map(|s| (s.key, s.name)).collect()
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<&'static Scenario> {
    let key = key.to_lowercase();
    SCENARIOS.iter().find(|s| s.key == key)
}

/// Split a comma-separated list, expanding `all` to every scenario.
#[must_use]
pub fn expand_scenarios(arg: &str) -> Vec<String> {
    let mut keys: Vec<String> = arg
        .split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect();
    if keys.iter().any(|k| k == "all") {
        keys.retain(|k| k != "all");
        keys.extend(SCENARIOS.iter().map(|s| s.key.to_string()));
    }
    keys
}

fn engine(catalog: &BuilderCatalog, search: &str) -> ExperienceBuilder {
    ExperienceBuilder::new(
        catalog.clone(),
        ShareLocation::new("https://meridianpadel.com", "/experience", search, ""),
    )
}

fn date(raw: &str) -> Option<IsoDate> {
    IsoDate::parse(raw)
}

fn url_round_trip(catalog: &BuilderCatalog, checks: &mut Checks) {
    let configs = [
        engine(catalog, "").config().clone(),
        ExperienceConfig {
            city: "Valencia".into(),
            days: Days::count(3),
            date_start: date("2025-06-01"),
            date_end: date("2025-06-03"),
            level: "Elite".into(),
            group: 12,
            addons: ["Physio", "Spa"].into_iter().collect(),
        },
        ExperienceConfig {
            city: "Marbella".into(),
            days: Days::count(7),
            date_start: None,
            date_end: date("2025-09-20"),
            level: "Signature".into(),
            group: 50,
            addons: ["Private transfers"].into_iter().collect(),
        },
    ];
    for config in configs {
        let reloaded = engine(catalog, &encode(&config));
        checks.equal(
            &format!("reload of {}", encode(&config)),
            reloaded.config(),
            &config,
        );
    }
}

fn link_stability(catalog: &BuilderCatalog, checks: &mut Checks) {
    let search = "?utm_source=mail&days=10&city=Mallorca&addons=Spa,%20Physio,,&date_start=2025-02-30";
    let first = engine(catalog, search);
    let query = first.share().trim_start_matches("/experience").to_string();
    let second = engine(catalog, &query);
    checks.equal("second encoding", &second.share().to_string(), &first.share().to_string());
    checks.check(
        first.share().contains("utm_source=mail"),
        "foreign query parameters must survive re-encoding",
    );
    checks.check(
        !first.share().contains("date_start"),
        "an impossible date must be dropped from the link",
    );
}

fn duration_clamp(catalog: &BuilderCatalog, checks: &mut Checks) {
    let mut builder = engine(catalog, "?days=5&date_start=2025-06-01");
    let change = builder.apply(BuilderEdit::DateEnd(date("2025-06-10")), &());
    checks.equal("clamped end", &change.config.date_end, &date("2025-06-05"));
    checks.equal("start untouched", &change.config.date_start, &date("2025-06-01"));
    checks.equal("end max", &change.bounds.end_max, &date("2025-06-05"));

    let change = builder.apply(BuilderEdit::DaysOption("3".into()), &());
    checks.equal("shortened end", &change.config.date_end, &date("2025-06-03"));
}

fn end_before_start(catalog: &BuilderCatalog, checks: &mut Checks) {
    let mut builder = engine(catalog, "?days=5&date_start=2025-06-10");
    let change = builder.apply(BuilderEdit::DateEnd(date("2025-06-01")), &());
    checks.equal("end cleared", &change.config.date_end, &None);
    checks.equal("start kept", &change.config.date_start, &date("2025-06-10"));
    checks.equal("correction", &change.corrections, &vec![Correction::EndCleared]);
}

fn single_pass(_catalog: &BuilderCatalog, checks: &mut Checks) {
    let anchor = date("2025-01-15");
    for limit in [None, Some(1), Some(2), Some(5), Some(31), Some(u32::MAX)] {
        for start_offset in -40_i64..=40 {
            let start = anchor.and_then(|a| a.add_days(start_offset));
            let first = resolve_dates(limit, start, anchor);
            let second = resolve_dates(limit, first.date_start, first.date_end);
            checks.check(
                !second.changed(),
                format!("limit {limit:?} offset {start_offset}: second pass changed {:?}", second.corrections),
            );
            checks.check(
                !first.corrections.iter().any(|c| matches!(c, Correction::StartClamped(_))),
                format!("limit {limit:?} offset {start_offset}: start was re-clamped"),
            );
        }
    }
}

fn group_clamp(catalog: &BuilderCatalog, checks: &mut Checks) {
    let mut builder = engine(catalog, "");
    for (raw, expected) in [("0", 1_u8), ("-5", 1), ("abc", 4), ("999", 50), ("12", 12)] {
        let change = builder.apply(BuilderEdit::Group(raw.into()), &());
        checks.equal(&format!("group {raw:?}"), &change.config.group, &expected);
    }
    for (search, expected) in [("?group=0", 4_u8), ("?group=51", 4), ("?group=abc", 4), ("?group=7", 7)] {
        checks.equal(search, &engine(catalog, search).config().group, &expected);
    }
}

fn custom_days(catalog: &BuilderCatalog, checks: &mut Checks) {
    let builder = engine(catalog, "?days=10");
    checks.equal("days", &builder.config().days, &Days::count(10));
    checks.check(builder.custom_days_visible(), "custom input must be shown for 10 days");

    let mut builder = engine(catalog, "?days=Customize&date_start=2025-06-01");
    let change = builder.apply(BuilderEdit::DateEnd(date("2025-08-01")), &());
    checks.equal("no limit without a number", &change.config.date_end, &date("2025-08-01"));

    let change = builder.apply(BuilderEdit::CustomDays("4".into()), &());
    checks.equal("exact days limit", &change.config.date_end, &date("2025-06-04"));

    let change = builder.apply(BuilderEdit::DaysOption("7".into()), &());
    checks.equal("leaving custom clears input", &builder.days_control().custom, &String::new());
    checks.equal("preset days", &change.config.days, &Days::count(7));
}

fn message_rendering(_catalog: &BuilderCatalog, checks: &mut Checks) {
    let config = ExperienceConfig {
        city: "Madrid".into(),
        days: Days::count(5),
        level: "Premium".into(),
        group: 4,
        addons: ["Spa"].into_iter().collect(),
        ..ExperienceConfig::default()
    };
    let expected = vec![
        "• City: Madrid".to_string(),
        "• Duration: 5 days".to_string(),
        "• Package level: Premium".to_string(),
        "• Group size: 4".to_string(),
        "• Add-ons: Spa".to_string(),
    ];
    checks.equal("message lines", &message_lines(&config), &expected);
}

fn addon_toggle(catalog: &BuilderCatalog, checks: &mut Checks) {
    let mut builder = engine(catalog, "?addons=Spa,Physio");
    let before = builder.config().addons.clone();
    builder.apply(BuilderEdit::ToggleAddon("Gastronomy".into()), &());
    let after = builder.apply(BuilderEdit::ToggleAddon("Gastronomy".into()), &());
    checks.equal("double toggle", &after.config.addons, &before);

    let after = builder.apply(BuilderEdit::ToggleAddon("Spa".into()), &());
    checks.equal("remaining order", &after.config.addons.join(","), &"Physio".to_string());
}

fn itinerary_follow(catalog: &BuilderCatalog, checks: &mut Checks) {
    let mut builder = engine(catalog, "");
    let edits = [
        BuilderEdit::DaysOption("3".into()),
        BuilderEdit::DaysOption("Customize".into()),
        BuilderEdit::CustomDays("4".into()),
        BuilderEdit::DaysOption("7".into()),
    ];
    let followed: Vec<Option<u32>> = edits
        .into_iter()
        .map(|edit| {
            let change: BuilderChange = builder.apply(edit, &());
            followed_duration(&change)
        })
        .collect();
    checks.equal(
        "followed durations",
        &followed,
        &vec![Some(PLANNED_DURATIONS[0]), None, None, Some(PLANNED_DURATIONS[2])],
    );
}

fn contact_handoff(catalog: &BuilderCatalog, checks: &mut Checks) {
    let mut builder = engine(catalog, "?days=3&date_start=2025-06-01");
    builder.apply(BuilderEdit::ToggleAddon("Spa".into()), &());
    builder.apply(BuilderEdit::City("Barcelona".into()), &());
    match ContactHandoff::prepare(builder.config(), catalog, &catalog.contact_topics) {
        Ok(handoff) => {
            checks.check(handoff.message.contains("• City: Barcelona"), "message uses the latest city");
            checks.equal("topic", &handoff.topic.as_deref(), &Some("Training Camp"));
            match handoff.restore() {
                Ok(restored) => checks.equal("restored state", &restored, builder.config()),
                Err(err) => checks.check(false, format!("restore failed: {err}")),
            }
        }
        Err(err) => checks.check(false, format!("hand-off failed: {err}")),
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_builder::{CatalogLoader, EmbeddedCatalogs};

    #[test]
    fn every_scenario_passes_against_bundled_catalog() {
        let catalog = EmbeddedCatalogs.load_builder_catalog().unwrap();
        for scenario in SCENARIOS {
            let result = scenario.run(&catalog, false);
            assert!(result.passed, "{}: {:?}", result.scenario_name, result.failures);
            assert!(result.checks_run > 0);
        }
    }

    #[test]
    fn all_expands_and_unknown_keys_pass_through() {
        let keys = expand_scenarios("all, duration-clamp");
        assert_eq!(keys[0], "duration-clamp");
        assert_eq!(keys.len(), SCENARIOS.len() + 1);
        assert!(get_scenario("Duration-Clamp").is_some());
        assert!(get_scenario("nope").is_none());
    }

    #[test]
    fn failed_checks_are_reported() {
        let mut checks = Checks::default();
        checks.equal("answer", &41, &42);
        checks.check(true, "fine");
        assert_eq!(checks.run, 2);
        assert_eq!(checks.failures, vec!["answer: expected 42, got 41".to_string()]);
    }
}
