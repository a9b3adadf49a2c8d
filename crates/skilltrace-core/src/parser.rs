//! Observation file parser.
//!
//! Loads ordered attempt records from CSV, JSON or TOML files and validates
//! them. Malformed records are rejected here so the estimator only ever sees
//! well-typed observations.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::InvalidObservationError;
use crate::model::Observation;
use crate::params::{effective_slope, guessing_floor};

/// Supported input formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
    Toml,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(InputFormat::Csv),
            Some("json") => Ok(InputFormat::Json),
            Some("toml") => Ok(InputFormat::Toml),
            Some(other) => anyhow::bail!(
                "unsupported input format '.{other}' for {} (expected .csv, .json or .toml)",
                path.display()
            ),
            None => anyhow::bail!("cannot infer input format for {}", path.display()),
        }
    }
}

/// Parse an observation file, choosing the format by extension.
pub fn load_observations(path: &Path) -> Result<Vec<Observation>> {
    let format = InputFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read observations: {}", path.display()))?;

    let observations = parse_observations_str(&content, format)
        .with_context(|| format!("failed to parse observations: {}", path.display()))?;
    tracing::debug!(
        "loaded {} observations from {}",
        observations.len(),
        path.display()
    );
    Ok(observations)
}

/// Parse observations from an in-memory string.
pub fn parse_observations_str(content: &str, format: InputFormat) -> Result<Vec<Observation>> {
    let observations = match format {
        InputFormat::Csv => parse_csv(content)?,
        InputFormat::Json => {
            serde_json::from_str::<Vec<Observation>>(content).context("invalid JSON attempts")?
        }
        InputFormat::Toml => {
            toml::from_str::<TomlAttemptsFile>(content)
                .context("invalid TOML attempts")?
                .attempts
        }
    };

    for (i, obs) in observations.iter().enumerate() {
        check_observation(obs, i + 1)?;
    }
    Ok(observations)
}

/// Intermediate TOML structure: a list of `[[attempts]]` tables.
#[derive(Debug, Deserialize)]
struct TomlAttemptsFile {
    #[serde(default)]
    attempts: Vec<Observation>,
}

const CORRECT_NAMES: &[&str] = &["x", "correct", "correctness"];
const DIFFICULTY_NAMES: &[&str] = &["b", "difficulty"];
const TIME_NAMES: &[&str] = &["t", "time", "response_time"];

fn find_column(header: &[&str], names: &[&str], canonical: &str) -> Result<usize> {
    header
        .iter()
        .position(|h| names.contains(&h.trim().to_ascii_lowercase().as_str()))
        .ok_or_else(|| InvalidObservationError::MissingColumn(canonical.to_string()).into())
}

fn parse_correct(raw: &str, line: usize) -> Result<bool, InvalidObservationError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "1.0" | "true" => Ok(true),
        "0" | "0.0" | "false" => Ok(false),
        _ => Err(InvalidObservationError::InvalidValue {
            line,
            field: "x",
            value: raw.trim().to_string(),
        }),
    }
}

fn parse_real(raw: &str, line: usize, field: &'static str) -> Result<f64, InvalidObservationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InvalidObservationError::InvalidValue {
            line,
            field,
            value: raw.trim().to_string(),
        })
}

/// Parse CSV with a header row naming the `x`, `b` and `T` columns.
///
/// Columns may appear in any order; extra columns are ignored. Blank lines
/// and `#` comments are skipped.
fn parse_csv(content: &str) -> Result<Vec<Observation>> {
    let mut rows = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

    let Some((_, header_line)) = rows.next() else {
        return Err(InvalidObservationError::MissingHeader.into());
    };
    let header: Vec<&str> = header_line.split(',').collect();
    let x_col = find_column(&header, CORRECT_NAMES, "x")?;
    let b_col = find_column(&header, DIFFICULTY_NAMES, "b")?;
    let t_col = find_column(&header, TIME_NAMES, "T")?;
    let needed = x_col.max(b_col).max(t_col) + 1;

    rows.map(|(line, row)| -> Result<Observation> {
        let fields: Vec<&str> = row.split(',').collect();
        if fields.len() < needed {
            return Err(InvalidObservationError::ColumnCount {
                line,
                expected: needed,
                got: fields.len(),
            }
            .into());
        }
        let response_time = parse_real(fields[t_col], line, "T")?;
        if response_time < 0.0 {
            return Err(InvalidObservationError::InvalidValue {
                line,
                field: "T",
                value: fields[t_col].trim().to_string(),
            }
            .into());
        }
        Ok(Observation::new(
            parse_correct(fields[x_col], line)?,
            parse_real(fields[b_col], line, "b")?,
            response_time,
        ))
    })
    .collect()
}

/// Reject values the estimator cannot take, regardless of source format.
///
/// `record` is the 1-based position of the observation in the input.
fn check_observation(obs: &Observation, record: usize) -> Result<(), InvalidObservationError> {
    if !obs.difficulty.is_finite() {
        return Err(InvalidObservationError::InvalidValue {
            line: record,
            field: "b",
            value: obs.difficulty.to_string(),
        });
    }
    if !obs.response_time.is_finite() || obs.response_time < 0.0 {
        return Err(InvalidObservationError::InvalidValue {
            line: record,
            field: "T",
            value: obs.response_time.to_string(),
        });
    }
    Ok(())
}

/// A warning from observation validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Zero-based observation index.
    pub index: usize,
    /// Warning message.
    pub message: String,
}

/// Flag observations that are accepted but fall outside the model's intended range.
pub fn validate_observations(observations: &[Observation]) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    for (index, obs) in observations.iter().enumerate() {
        let b = obs.difficulty;

        // Response time 1.0 only probes the difficulty-dependent terms.
        if let Err(e) = effective_slope(b, 1.0) {
            warnings.push(ValidationWarning {
                index,
                message: format!("{e}; rating will fail"),
            });
            continue;
        }

        if !(0.0..=100.0).contains(&b) {
            warnings.push(ValidationWarning {
                index,
                message: format!("difficulty {b} is outside the intended 0-100 range"),
            });
        }

        let floor = guessing_floor(b);
        if !(0.0..1.0).contains(&floor) {
            warnings.push(ValidationWarning {
                index,
                message: format!(
                    "guessing floor {floor:.4} for difficulty {b} is not a valid probability"
                ),
            });
        }
    }

    for w in &warnings {
        tracing::warn!("observation {}: {}", w.index, w.message);
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_CSV: &str = "\
x,b,T
1,25,30
0,50,20.5
1,10,0
";

    #[test]
    fn parse_valid_csv() {
        let obs = parse_observations_str(VALID_CSV, InputFormat::Csv).unwrap();
        assert_eq!(obs.len(), 3);
        assert_eq!(obs[0], Observation::new(true, 25.0, 30.0));
        assert_eq!(obs[1], Observation::new(false, 50.0, 20.5));
        assert_eq!(obs[2].response_time, 0.0);
    }

    #[test]
    fn csv_columns_in_any_order_with_extras() {
        let csv = "\
# exported from the quiz sheet
student,Time,Difficulty,Correct
ana,12,40,true

ana,8,35,false
";
        let obs = parse_observations_str(csv, InputFormat::Csv).unwrap();
        assert_eq!(
            obs,
            vec![
                Observation::new(true, 40.0, 12.0),
                Observation::new(false, 35.0, 8.0),
            ]
        );
    }

    #[test]
    fn header_only_csv_is_empty() {
        let obs = parse_observations_str("x,b,T\n", InputFormat::Csv).unwrap();
        assert!(obs.is_empty());
    }

    #[test]
    fn missing_column_is_rejected() {
        let err = parse_observations_str("x,b\n1,25\n", InputFormat::Csv).unwrap_err();
        assert_eq!(
            err.downcast_ref::<InvalidObservationError>(),
            Some(&InvalidObservationError::MissingColumn("T".into()))
        );
    }

    #[test]
    fn bad_values_report_line_and_field() {
        let err = parse_observations_str("x,b,T\n1,25,30\n2,25,30\n", InputFormat::Csv).unwrap_err();
        assert_eq!(
            err.downcast_ref::<InvalidObservationError>(),
            Some(&InvalidObservationError::InvalidValue {
                line: 3,
                field: "x",
                value: "2".into(),
            })
        );

        let err = parse_observations_str("x,b,T\n1,hard,30\n", InputFormat::Csv).unwrap_err();
        assert!(err.to_string().contains("'b'"), "got: {err}");

        let err = parse_observations_str("x,b,T\n1,25,-3\n", InputFormat::Csv).unwrap_err();
        assert!(err.to_string().contains("'T'"), "got: {err}");
    }

    #[test]
    fn short_row_is_rejected() {
        let err = parse_observations_str("x,b,T\n1,25\n", InputFormat::Csv).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<InvalidObservationError>(),
            Some(InvalidObservationError::ColumnCount { line: 2, .. })
        ));
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = parse_observations_str("\n\n", InputFormat::Csv).unwrap_err();
        assert_eq!(
            err.downcast_ref::<InvalidObservationError>(),
            Some(&InvalidObservationError::MissingHeader)
        );
    }

    #[test]
    fn parse_json_and_toml() {
        let json = r#"[{"x": 1, "b": 25, "T": 30}, {"x": false, "b": 60, "T": 4.5}]"#;
        let from_json = parse_observations_str(json, InputFormat::Json).unwrap();

        let toml = r#"
[[attempts]]
x = 1
b = 25
T = 30

[[attempts]]
x = false
b = 60.0
T = 4.5
"#;
        let from_toml = parse_observations_str(toml, InputFormat::Toml).unwrap();
        assert_eq!(from_json, from_toml);
        assert_eq!(from_json.len(), 2);
    }

    #[test]
    fn json_negative_time_is_rejected() {
        let json = r#"[{"x": 1, "b": 25, "T": -1}]"#;
        assert!(parse_observations_str(json, InputFormat::Json).is_err());
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            InputFormat::from_path(&PathBuf::from("a.CSV")).unwrap(),
            InputFormat::Csv
        );
        assert_eq!(
            InputFormat::from_path(&PathBuf::from("a.json")).unwrap(),
            InputFormat::Json
        );
        assert!(InputFormat::from_path(&PathBuf::from("a.xlsx")).is_err());
        assert!(InputFormat::from_path(&PathBuf::from("attempts")).is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("attempts.csv");
        std::fs::write(&path, VALID_CSV).unwrap();

        let obs = load_observations(&path).unwrap();
        assert_eq!(obs.len(), 3);
    }

    #[test]
    fn validate_flags_out_of_range_difficulty() {
        let obs = vec![
            Observation::new(true, 50.0, 10.0),
            Observation::new(true, 120.0, 10.0),
            Observation::new(true, 200.0, 10.0),
            Observation::new(true, -30.0, 10.0),
        ];
        let warnings = validate_observations(&obs);

        assert!(!warnings.iter().any(|w| w.index == 0));
        assert!(warnings
            .iter()
            .any(|w| w.index == 1 && w.message.contains("outside")));
        assert!(warnings
            .iter()
            .any(|w| w.index == 2 && w.message.contains("guessing floor")));
        assert!(warnings
            .iter()
            .any(|w| w.index == 3 && w.message.contains("undefined")));
    }
}
