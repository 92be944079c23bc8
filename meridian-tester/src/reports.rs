use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use crate::scenarios::ScenarioResult;
use crate::script::ReplayOutcome;

#[allow(clippy::cast_precision_loss)]
fn success_rate(results: &[ScenarioResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let passed = results.iter().filter(|r| r.passed).count();
    (passed as f64 / results.len() as f64) * 100.0
}

pub fn generate_console_report<W: Write + ?Sized>(
    out: &mut W,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Scenario Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "===========================".cyan())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "Total scenarios: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Success rate: {:.1}%", success_rate(results))?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(out, "{status} {}", result.scenario_name.bold())?;
        writeln!(out, "   Checks: {}", result.checks_run)?;
        writeln!(out, "   Time: {:?}", result.duration)?;
        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(out: &mut W, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(results)?)?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    out: &mut W,
    results: &[ScenarioResult],
) -> Result<()> {
    writeln!(out, "# Meridian Builder Scenario Results\n")?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total scenarios**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", total - passed)?;
    writeln!(out, "- **Success rate**: {:.1}%\n", success_rate(results))?;

    writeln!(out, "## Detailed Results\n")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(out, "### {status} {}\n", result.scenario_name)?;
        writeln!(out, "- **Key**: `{}`", result.scenario_key)?;
        writeln!(out, "- **Checks**: {}", result.checks_run)?;
        if !result.failures.is_empty() {
            writeln!(out, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(out, "  - {failure}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn replay_console<W: Write + ?Sized>(out: &mut W, outcome: &ReplayOutcome) -> Result<()> {
    writeln!(out, "{}", "🔗 Builder Replay".bright_cyan().bold())?;
    writeln!(out, "{}", "=================".cyan())?;
    writeln!(out, "Loaded: {}", outcome.initial_share)?;
    for (i, step) in outcome.steps.iter().enumerate() {
        writeln!(out, "{:>3}. {:?}", i + 1, step.edit)?;
        writeln!(out, "     → {}", step.share)?;
        for correction in &step.corrections {
            writeln!(out, "     {} {correction:?}", "corrected".yellow())?;
        }
    }
    writeln!(out)?;
    let s = &outcome.summary;
    writeln!(out, "{}", "Summary".bold())?;
    writeln!(out, "  City:  {}", s.city)?;
    writeln!(out, "  Days:  {}", s.days_label)?;
    writeln!(out, "  Dates: {}", s.dates_label)?;
    writeln!(out, "  Level: {}", s.level)?;
    writeln!(out, "  Group: {}", s.group)?;
    let chips: Vec<&str> = s.addons.iter().map(|c| c.label.as_str()).collect();
    writeln!(out, "  Add-ons: {}", chips.join(", "))?;
    writeln!(out)?;
    writeln!(out, "{}", "Message".bold())?;
    writeln!(out, "{}", outcome.message)?;
    writeln!(out)?;
    writeln!(out, "Link: {}", outcome.link.green())?;
    Ok(())
}

pub fn replay_json<W: Write + ?Sized>(out: &mut W, outcome: &ReplayOutcome) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(outcome)?)?;
    Ok(())
}

pub fn replay_markdown<W: Write + ?Sized>(out: &mut W, outcome: &ReplayOutcome) -> Result<()> {
    writeln!(out, "# Meridian Builder Replay\n")?;
    writeln!(out, "- **Loaded**: `{}`", outcome.initial_share)?;
    writeln!(out, "- **Edits**: {}", outcome.steps.len())?;
    writeln!(out, "- **Link**: <{}>\n", outcome.link)?;
    writeln!(out, "## Message\n")?;
    writeln!(out, "```text\n{}\n```", outcome.message)?;
    Ok(())
}
