//! The `skilltrace init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("skilltrace.toml"), SAMPLE_CONFIG)?;
    write_if_missing(Path::new("attempts.csv"), EXAMPLE_ATTEMPTS)?;

    println!("\nNext steps:");
    println!("  1. Edit skilltrace.toml to change the prior or the rating grid");
    println!("  2. Run: skilltrace validate --input attempts.csv");
    println!("  3. Run: skilltrace run --input attempts.csv");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# skilltrace configuration

output_dir = "./skilltrace-results"
formats = ["json", "html"]

[estimator]
initial_prior = 25.0
sigma = 2.0
lower_bound = 0.0
upper_bound = 100.0
step = 0.1
"#;

const EXAMPLE_ATTEMPTS: &str = "\
x,b,T
1,30,12
0,45,40
1,20,8
1,60,25
";
