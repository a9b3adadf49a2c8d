//! The `skilltrace validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(input: PathBuf) -> Result<()> {
    let observations = skilltrace_core::parser::load_observations(&input)?;
    println!(
        "Attempts file: {} ({} attempts)",
        input.display(),
        observations.len()
    );

    let warnings = skilltrace_core::parser::validate_observations(&observations);
    for w in &warnings {
        println!("  [{}] WARNING: {}", w.index + 1, w.message);
    }

    if warnings.is_empty() {
        println!("All observations valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
