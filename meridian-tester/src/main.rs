mod reports;
mod scenarios;
mod script;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use meridian_builder::{CatalogLoader, EmbeddedCatalogs, ShareLocation};
use scenarios::{ScenarioResult, expand_scenarios, get_scenario, list_scenarios};
use script::{parse_edits, replay};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TestMode {
    /// Load a link, apply scripted edits and print the result
    Replay,
    /// Run the logic scenarios
    Scenarios,
}

#[derive(Debug, Parser)]
#[command(name = "meridian-tester", version)]
#[command(about = "Headless QA runner for the Meridian experience builder")]
struct Args {
    /// What to run: replay a link, or the logic scenarios
    #[arg(long, value_enum, default_value_t = TestMode::Scenarios)]
    mode: TestMode,

    /// Query string to load (replay mode), e.g. `?days=5&city=Madrid`
    #[arg(long, default_value = "")]
    query: String,

    /// Page origin used for the absolute link (replay mode)
    #[arg(long, default_value = "https://meridianpadel.com")]
    origin: String,

    /// Page path the builder lives on (replay mode)
    #[arg(long, default_value = "/")]
    path: String,

    /// Control edit as control=value; repeat to apply several in order
    #[arg(long = "edit")]
    edits: Vec<String>,

    /// Scenarios to run (comma-separated, `all` for every scenario)
    #[arg(long, default_value = "all")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    let catalog = EmbeddedCatalogs
        .load_builder_catalog()
        .context("loading builder catalog")?;

    match args.mode {
        TestMode::Replay => {
            let edits = parse_edits(&args.edits)?;
            let location = ShareLocation::new(&args.origin, &args.path, &args.query, "");
            let outcome = replay(catalog, location, &edits);
            let mut output_target = OutputTarget::new(args.output.clone())?;
            match args.report.as_str() {
                "json" => reports::replay_json(&mut output_target, &outcome)?,
                "markdown" => reports::replay_markdown(&mut output_target, &outcome)?,
                _ => reports::replay_console(&mut output_target, &outcome)?,
            }
            output_target.flush_inner()?;
        }
        TestMode::Scenarios => {
            if args.report == "console" {
                announce_banner();
            }
            let start_time = Instant::now();
            let results = run_scenarios(&args, &catalog);
            write_reports(&args, &results, start_time)?;
            if results.iter().any(|r| !r.passed) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:20} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎾 Meridian Builder Tester".bright_cyan().bold());
    println!("{}", "==========================".cyan());
}

fn run_scenarios(args: &Args, catalog: &meridian_builder::BuilderCatalog) -> Vec<ScenarioResult> {
    let mut results = Vec::new();
    for key in expand_scenarios(&args.scenarios) {
        if let Some(scenario) = get_scenario(&key) {
            results.push(scenario.run(catalog, args.verbose));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", key.yellow());
        }
    }
    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, results)?,
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Meridian Builder Scenario Results\n\n_No scenarios executed._"
                )?;
            } else {
                reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            mode: TestMode::Scenarios,
            query: String::new(),
            origin: "https://meridianpadel.com".to_string(),
            path: "/".to_string(),
            edits: Vec::new(),
            scenarios: "duration-clamp,nope".to_string(),
            list_scenarios: false,
            report: "json".to_string(),
            output: None,
            verbose: false,
        }
    }

    #[test]
    fn args_parse_repeated_edits() {
        let args = Args::parse_from([
            "meridian-tester",
            "--mode",
            "replay",
            "--query",
            "?days=5",
            "--edit",
            "city=Valencia",
            "--edit",
            "group=12",
        ]);
        assert_eq!(args.mode, TestMode::Replay);
        assert_eq!(args.edits, vec!["city=Valencia", "group=12"]);
        assert_eq!(args.path, "/");
    }

    #[test]
    fn unknown_scenarios_are_skipped() {
        let catalog = EmbeddedCatalogs.load_builder_catalog().unwrap();
        let results = run_scenarios(&base_args(), &catalog);
        assert_eq!(results.len(), 1);
        assert!(results[0].passed);
    }

    #[test]
    fn reports_write_to_file() {
        let path = std::env::temp_dir().join(format!(
            "meridian-tester-report-{}",
            std::process::id()
        ));
        let args = Args {
            output: Some(path.clone()),
            report: "markdown".to_string(),
            ..base_args()
        };
        write_reports(&args, &[], Instant::now()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("_No scenarios executed._"));
        let _ = std::fs::remove_file(path);
    }
}
