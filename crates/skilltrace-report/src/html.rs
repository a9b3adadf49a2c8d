//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined: a rating
//! line chart over attempts and a row-per-attempt table.

use anyhow::Result;
use std::path::Path;

use skilltrace_core::model::RatingTrace;
use skilltrace_core::report::RatingReport;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from a rating report.
pub fn generate_html(report: &RatingReport) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>skilltrace report: {}</title>\n",
        html_escape(&report.source)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Ratings Tracker</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Source: <strong>{}</strong> | {} attempts | prior {} | sigma {} | {}</p>\n",
        html_escape(&report.source),
        report.summary.attempts,
        report.config.initial_prior,
        report.config.sigma,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if let Some(failure) = &report.failure {
        html.push_str(&format!(
            "<p class=\"fail\">Stopped at attempt {}: {}</p>\n",
            failure.index + 1,
            html_escape(&failure.message)
        ));
    }
    html.push_str("</header>\n");

    // Summary
    let s = &report.summary;
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Attempts</th><th>Accuracy</th><th>Initial</th><th>Final</th><th>Peak</th><th>Lowest</th><th>Change</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{}</td><td>{:.1}%</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td><td>{:.2}</td><td>{:+.2}</td></tr></tbody>\n",
        s.attempts,
        s.accuracy * 100.0,
        s.initial_rating,
        s.final_rating,
        s.peak_rating,
        s.lowest_rating,
        s.net_change,
    ));
    html.push_str("</table>\n");

    if !report.trace.is_empty() {
        html.push_str(&generate_line_chart(&report.trace));
    }
    html.push_str("</section>\n");

    // Per-attempt rows
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Attempts</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">index</th><th onclick=\"sortTable(1)\">Correctness</th><th onclick=\"sortTable(2)\">Difficulty</th><th onclick=\"sortTable(3)\">Time</th><th onclick=\"sortTable(4)\">Rating</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for p in &report.trace {
        let class = if p.observation.correct { "pass" } else { "fail" };
        html.push_str(&format!(
            "<tr><td>{}</td><td class=\"{}\">{}</td><td>{}</td><td>{}</td><td>{:.2}</td></tr>\n",
            p.index + 1,
            class,
            u8::from(p.observation.correct),
            p.observation.difficulty,
            p.observation.response_time,
            p.rating,
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &RatingReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

/// Round `max` up to the next multiple of ten, with a floor of ten.
fn y_axis_max(max: f64) -> f64 {
    ((max / 10.0).ceil() * 10.0).max(10.0)
}

fn generate_line_chart(trace: &RatingTrace) -> String {
    let width = 800.0;
    let height = 400.0;
    let left = 60.0;
    let right = 20.0;
    let top = 20.0;
    let bottom = 50.0;
    let plot_w = width - left - right;
    let plot_h = height - top - bottom;

    let ratings = trace.ratings();
    let y_max = y_axis_max(ratings.iter().copied().fold(0.0, f64::max));
    let n = ratings.len();

    let x_at = |i: usize| {
        if n == 1 {
            left + plot_w / 2.0
        } else {
            left + plot_w * i as f64 / (n - 1) as f64
        }
    };
    let y_at = |r: f64| top + plot_h * (1.0 - r.max(0.0) / y_max);

    let mut svg = format!(
        "<svg width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" xmlns=\"http://www.w3.org/2000/svg\" role=\"img\" aria-label=\"Rating by attempt\">\n"
    );

    // Horizontal grid lines and y labels
    for tick in 0..=5 {
        let value = y_max * tick as f64 / 5.0;
        let y = y_at(value);
        svg.push_str(&format!(
            "  <line x1=\"{left}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"var(--border)\"/>\n",
            left + plot_w
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.1}\" y=\"{y:.1}\" font-size=\"12\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{value:.0}</text>\n",
            left - 8.0
        ));
    }

    // Axis titles
    svg.push_str(&format!(
        "  <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"13\" fill=\"currentColor\" text-anchor=\"middle\">Attempts</text>\n",
        left + plot_w / 2.0,
        height - 10.0
    ));
    svg.push_str(&format!(
        "  <text x=\"16\" y=\"{:.1}\" font-size=\"13\" fill=\"currentColor\" text-anchor=\"middle\" transform=\"rotate(-90 16 {:.1})\">Rating</text>\n",
        top + plot_h / 2.0,
        top + plot_h / 2.0
    ));

    let points: Vec<String> = ratings
        .iter()
        .enumerate()
        .map(|(i, &r)| format!("{:.1},{:.1}", x_at(i), y_at(r)))
        .collect();

    // Filled area under the line
    svg.push_str(&format!(
        "  <polygon points=\"{:.1},{:.1} {} {:.1},{:.1}\" fill=\"rgba(75, 192, 192, 0.2)\"/>\n",
        x_at(0),
        top + plot_h,
        points.join(" "),
        x_at(n - 1),
        top + plot_h
    ));
    svg.push_str(&format!(
        "  <polyline points=\"{}\" fill=\"none\" stroke=\"rgba(75, 192, 192, 1)\" stroke-width=\"2\"/>\n",
        points.join(" ")
    ));

    for (i, &r) in ratings.iter().enumerate() {
        svg.push_str(&format!(
            "  <circle cx=\"{:.1}\" cy=\"{:.1}\" r=\"3\" fill=\"rgba(75, 192, 192, 1)\"><title>Attempt {}: {:.2}</title></circle>\n",
            x_at(i),
            y_at(r),
            i + 1,
            r
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; max-width: 100%; height: auto; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = parseFloat(a.cells[col].textContent);
    const vb = parseFloat(b.cells[col].textContent);
    return asc ? va - vb : vb - va;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
