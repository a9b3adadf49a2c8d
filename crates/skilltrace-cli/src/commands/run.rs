//! The `skilltrace run` command.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;

use skilltrace_core::config::load_config_from;
use skilltrace_core::error::RatingError;
use skilltrace_core::model::RatingPoint;
use skilltrace_core::parser;
use skilltrace_core::report::RatingReport;
use skilltrace_core::tracker::{ProgressReporter, RatingTracker};
use skilltrace_report::csv::write_csv_report;
use skilltrace_report::html::write_html_report;

/// Arguments for `skilltrace run`; `None` falls back to the config file.
pub struct RunArgs {
    pub input: PathBuf,
    pub initial_prior: Option<f64>,
    pub sigma: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub step: Option<f64>,
    pub output: Option<PathBuf>,
    pub format: Option<String>,
    pub partial: bool,
    pub config: Option<PathBuf>,
}

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_step_complete(&self, point: &RatingPoint) {
        tracing::debug!(
            "attempt {}: {} -> {:.2}",
            point.index + 1,
            point.observation,
            point.rating
        );
    }

    fn on_step_error(&self, error: &RatingError) {
        tracing::error!("attempt {} failed: {}", error.index + 1, error.source);
    }

    fn on_trace_complete(&self, total: usize, completed: usize, elapsed: Duration) {
        eprintln!(
            "\nRated {completed}/{total} attempts ({:.1}ms)",
            elapsed.as_secs_f64() * 1000.0
        );
    }
}

pub fn execute(args: RunArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    let mut estimator = config.estimator;
    if let Some(v) = args.initial_prior {
        estimator.initial_prior = v;
    }
    if let Some(v) = args.sigma {
        estimator.sigma = v;
    }
    if let Some(v) = args.lower {
        estimator.lower_bound = v;
    }
    if let Some(v) = args.upper {
        estimator.upper_bound = v;
    }
    if let Some(v) = args.step {
        estimator.step = v;
    }

    let tracker = RatingTracker::new(estimator)?;

    let formats = resolve_formats(args.format.as_deref(), &config.formats)?;
    let output = args.output.unwrap_or(config.output_dir);

    let observations = parser::load_observations(&args.input)?;
    parser::validate_observations(&observations);

    eprintln!(
        "skilltrace v{}: rating {} attempts from {}",
        env!("CARGO_PKG_VERSION"),
        observations.len(),
        args.input.display()
    );

    let source = args.input.display().to_string();
    let start = Instant::now();
    let outcome = tracker.run_with_progress(&observations, &ConsoleReporter);
    let duration_ms = start.elapsed().as_millis() as u64;

    let (report, failure) = match outcome {
        Ok(trace) => (
            RatingReport::new(source, estimator, trace, duration_ms),
            None,
        ),
        Err(err) => {
            if !args.partial {
                return Err(err.into());
            }
            (
                RatingReport::partial(source, estimator, &err, duration_ms),
                Some(err),
            )
        }
    };

    print_table(&report);
    print_summary(&report);
    write_outputs(&report, &formats, &output)?;

    match failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

/// Expand a comma-separated format list; `all` means every format, `none` means no files.
fn resolve_formats(flag: Option<&str>, configured: &[String]) -> Result<Vec<String>> {
    let requested: Vec<String> = match flag {
        Some(f) => f.split(',').map(|s| s.trim().to_lowercase()).collect(),
        None => configured.iter().map(|s| s.to_lowercase()).collect(),
    };

    let mut formats: Vec<String> = Vec::new();
    for fmt in requested {
        let expanded: &[&str] = match fmt.as_str() {
            "all" => &["json", "html", "csv"],
            "none" | "" => &[],
            "json" => &["json"],
            "html" => &["html"],
            "csv" => &["csv"],
            other => anyhow::bail!(
                "unknown output format: '{other}' (expected json, html, csv, all, none)"
            ),
        };
        for name in expanded {
            if !formats.iter().any(|f| f == name) {
                formats.push((*name).to_string());
            }
        }
    }
    Ok(formats)
}

fn write_outputs(report: &RatingReport, formats: &[String], output: &Path) -> Result<()> {
    if formats.is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    for fmt in formats {
        match fmt.as_str() {
            "json" => {
                let path = output.join(format!("ratings-{timestamp}.json"));
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("ratings-{timestamp}.html"));
                write_html_report(report, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            "csv" => {
                let path = output.join(format!("ratings-{timestamp}.csv"));
                write_csv_report(&report.trace, &path)?;
                eprintln!("CSV export: {}", path.display());
            }
            _ => {}
        }
    }
    Ok(())
}

fn print_table(report: &RatingReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["index", "Correctness", "Difficulty", "Time", "Rating"]);

    for p in &report.trace {
        table.add_row(vec![
            Cell::new(p.index + 1),
            Cell::new(u8::from(p.observation.correct)),
            Cell::new(p.observation.difficulty),
            Cell::new(p.observation.response_time),
            Cell::new(format!("{:.2}", p.rating)),
        ]);
    }

    println!("{table}");
}

fn print_summary(report: &RatingReport) {
    let s = &report.summary;
    println!(
        "Final rating: {:.2} ({:+.2} from {:.2}) | accuracy {:.1}% | peak {:.2} | lowest {:.2}",
        s.final_rating,
        s.net_change,
        s.initial_rating,
        s.accuracy * 100.0,
        s.peak_rating,
        s.lowest_rating
    );
}
