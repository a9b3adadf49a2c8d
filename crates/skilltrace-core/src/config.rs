//! Estimator and run configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::estimator::{grid_point_count, MAX_GRID_POINTS};

/// Per-run estimator settings. Fixed for every observation in a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Rating the first observation starts from.
    #[serde(default = "default_initial_prior")]
    pub initial_prior: f64,
    /// Spread of the Gaussian prior penalty.
    #[serde(default = "default_sigma")]
    pub sigma: f64,
    /// Lowest candidate rating.
    #[serde(default = "default_lower_bound")]
    pub lower_bound: f64,
    /// Highest candidate rating.
    #[serde(default = "default_upper_bound")]
    pub upper_bound: f64,
    /// Distance between candidate ratings.
    #[serde(default = "default_step")]
    pub step: f64,
}

fn default_initial_prior() -> f64 {
    25.0
}
fn default_sigma() -> f64 {
    2.0
}
fn default_lower_bound() -> f64 {
    0.0
}
fn default_upper_bound() -> f64 {
    100.0
}
fn default_step() -> f64 {
    0.1
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            initial_prior: default_initial_prior(),
            sigma: default_sigma(),
            lower_bound: default_lower_bound(),
            upper_bound: default_upper_bound(),
            step: default_step(),
        }
    }
}

impl EstimatorConfig {
    /// Check every setting the estimator relies on.
    ///
    /// The initial prior must lie on the searched interval; every later prior
    /// is a previous estimate, so all ratings then stay inside the grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("initial_prior", self.initial_prior),
            ("sigma", self.sigma),
            ("lower_bound", self.lower_bound),
            ("upper_bound", self.upper_bound),
            ("step", self.step),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        if self.sigma <= 0.0 {
            return Err(ConfigError::NonPositiveSigma(self.sigma));
        }
        if self.step <= 0.0 {
            return Err(ConfigError::NonPositiveStep(self.step));
        }
        if self.lower_bound >= self.upper_bound {
            return Err(ConfigError::EmptyGrid {
                lower: self.lower_bound,
                upper: self.upper_bound,
            });
        }
        let points = grid_point_count(self.lower_bound, self.upper_bound, self.step);
        if points > MAX_GRID_POINTS as f64 {
            return Err(ConfigError::GridTooFine {
                points,
                max: MAX_GRID_POINTS,
            });
        }
        if !(self.lower_bound..=self.upper_bound).contains(&self.initial_prior) {
            return Err(ConfigError::PriorOutsideGrid {
                prior: self.initial_prior,
                lower: self.lower_bound,
                upper: self.upper_bound,
            });
        }
        Ok(())
    }
}

/// Top-level skilltrace configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkilltraceConfig {
    /// Estimator settings.
    #[serde(default)]
    pub estimator: EstimatorConfig,
    /// Output directory for reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Report formats written by `run` (json, html, csv).
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./skilltrace-results")
}

fn default_formats() -> Vec<String> {
    vec!["json".to_string()]
}

impl Default for SkilltraceConfig {
    fn default() -> Self {
        Self {
            estimator: EstimatorConfig::default(),
            output_dir: default_output_dir(),
            formats: default_formats(),
        }
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `skilltrace.toml` in the current directory
/// 2. `~/.config/skilltrace/config.toml`
///
/// Environment variable overrides: `SKILLTRACE_INITIAL_PRIOR`, `SKILLTRACE_SIGMA`.
pub fn load_config_from(path: Option<&Path>) -> Result<SkilltraceConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("skilltrace.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            parse_config_str(
                &std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config: {}", path.display()))?,
            )
            .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SkilltraceConfig::default(),
    };

    apply_env_overrides(&mut config.estimator, |key| std::env::var(key).ok())?;

    Ok(config)
}

/// Parse a TOML config string.
pub fn parse_config_str(content: &str) -> Result<SkilltraceConfig> {
    Ok(toml::from_str::<SkilltraceConfig>(content)?)
}

fn apply_env_overrides<F>(estimator: &mut EstimatorConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    for (key, slot) in [
        ("SKILLTRACE_INITIAL_PRIOR", &mut estimator.initial_prior),
        ("SKILLTRACE_SIGMA", &mut estimator.sigma),
    ] {
        if let Some(raw) = lookup(key) {
            *slot = raw
                .trim()
                .parse()
                .with_context(|| format!("{key} is not a number: '{raw}'"))?;
        }
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("skilltrace"))
}
