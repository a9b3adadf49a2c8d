//! CSV export of a rating trace.
//!
//! One row per attempt, `index,x,b,T,rating`, with ratings unrounded so the
//! file can be re-analysed.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::Path;

use skilltrace_core::model::RatingTrace;

/// Render a trace as CSV text.
pub fn generate_csv(trace: &RatingTrace) -> String {
    let mut out = String::from("index,x,b,T,rating\n");
    for p in trace {
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{},{},{},{},{}",
            p.index + 1,
            u8::from(p.observation.correct),
            p.observation.difficulty,
            p.observation.response_time,
            p.rating
        );
    }
    out
}

/// Write a trace as CSV to a file.
pub fn write_csv_report(trace: &RatingTrace, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, generate_csv(trace))
        .with_context(|| format!("failed to write CSV to {}", path.display()))?;
    Ok(())
}
