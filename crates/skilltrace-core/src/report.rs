//! Rating report types with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::EstimatorConfig;
use crate::error::RatingError;
use crate::model::RatingTrace;
use crate::statistics::TraceSummary;

/// A complete rating report for one input sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Where the observations came from (usually a file path).
    pub source: String,
    /// Estimator settings used for the run.
    pub config: EstimatorConfig,
    /// Per-observation ratings, unrounded.
    pub trace: RatingTrace,
    /// Aggregate statistics over `trace`.
    pub summary: TraceSummary,
    /// Set when the run stopped early; `trace` then holds the completed prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureSummary>,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Where and why a run stopped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureSummary {
    pub index: usize,
    pub prior: f64,
    pub message: String,
}

impl From<&RatingError> for FailureSummary {
    fn from(err: &RatingError) -> Self {
        Self {
            index: err.index,
            prior: err.prior,
            message: err.to_string(),
        }
    }
}

impl RatingReport {
    /// Build a report for a completed trace.
    pub fn new(
        source: impl Into<String>,
        config: EstimatorConfig,
        trace: RatingTrace,
        duration_ms: u64,
    ) -> Self {
        let summary = TraceSummary::compute(&trace);
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            source: source.into(),
            config,
            trace,
            summary,
            failure: None,
            duration_ms,
        }
    }

    /// Build a report holding the partial trace of a failed run.
    pub fn partial(
        source: impl Into<String>,
        config: EstimatorConfig,
        err: &RatingError,
        duration_ms: u64,
    ) -> Self {
        let mut report = Self::new(source, config, err.completed.clone(), duration_ms);
        report.failure = Some(FailureSummary::from(err));
        report
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: RatingReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }
}
