use std::collections::BTreeMap;

use serde::Serialize;

use crate::outcome::{ConversionOutcome, Failure, FailureReason};

/// Failures quoted in the status message.
pub const QUOTED_FAILURES: usize = 3;

pub const CONVERSION_CATEGORY: &str = "Surface Conversion";
pub const FAILURE_CATEGORY: &str = "Conversion Failures";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultLevel {
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ObjectResults {
    pub level: ResultLevel,
    pub category: &'static str,
    pub object_ids: Vec<String>,
    pub message: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Converted,
    NoAreaBoundaries,
    NothingConverted,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    pub status: RunStatus,
    pub candidates: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub by_reason: BTreeMap<FailureReason, usize>,
    pub surface_ids: Vec<String>,
    pub failures: Vec<Failure>,
    pub version_id: Option<String>,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[ConversionOutcome]) -> Self {
        let mut by_reason = BTreeMap::new();
        let mut surface_ids = Vec::new();
        let mut failures = Vec::new();
        let mut skipped = 0;

        for outcome in outcomes {
            match outcome {
                ConversionOutcome::Success(result) => surface_ids.push(result.object_id()),
                ConversionOutcome::Failure(failure) => {
                    *by_reason.entry(failure.reason).or_insert(0) += 1;
                    if failure.reason.is_skip() {
                        skipped += 1;
                    }
                    failures.push(failure.clone());
                }
            }
        }

        let converted = surface_ids.len();
        let status = if outcomes.is_empty() {
            RunStatus::NoAreaBoundaries
        } else if converted == 0 {
            RunStatus::NothingConverted
        } else {
            RunStatus::Converted
        };

        Self {
            status,
            candidates: outcomes.len(),
            converted,
            skipped,
            failed: failures.len() - skipped,
            by_reason,
            surface_ids,
            failures,
            version_id: None,
        }
    }

    pub fn message(&self) -> String {
        match self.status {
            RunStatus::NoAreaBoundaries => "No area boundaries found in the model".to_string(),
            RunStatus::NothingConverted => format!(
                "No area boundaries could be converted to surfaces ({} failed, {} skipped)",
                self.failed, self.skipped
            ),
            RunStatus::Converted => match &self.version_id {
                Some(version) => format!(
                    "Converted {} area boundaries to surfaces. Created new version: {version}",
                    self.converted
                ),
                None => format!("Converted {} area boundaries to surfaces", self.converted),
            },
        }
    }

    pub fn object_results(&self) -> Vec<ObjectResults> {
        let mut results = Vec::new();
        if self.converted > 0 {
            results.push(ObjectResults {
                level: ResultLevel::Info,
                category: CONVERSION_CATEGORY,
                object_ids: self.surface_ids.clone(),
                message: format!(
                    "Successfully converted {} area boundaries to surfaces",
                    self.converted
                ),
            });
        }
        if let Some(message) = self.failure_digest() {
            results.push(ObjectResults {
                level: ResultLevel::Error,
                category: FAILURE_CATEGORY,
                object_ids: self
                    .failures
                    .iter()
                    .filter(|failure| !failure.reason.is_skip())
                    .map(|failure| failure.source_id.clone())
                    .collect(),
                message,
            });
        }
        results
    }

    pub fn failure_digest(&self) -> Option<String> {
        let failed: Vec<String> = self
            .failures
            .iter()
            .filter(|failure| !failure.reason.is_skip())
            .take(QUOTED_FAILURES)
            .map(Failure::to_string)
            .collect();
        if failed.is_empty() {
            return None;
        }
        Some(format!(
            "Failed to convert {} boundaries: {}",
            self.failed,
            failed.join("; ")
        ))
    }
}
