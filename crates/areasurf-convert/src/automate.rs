use anyhow::{Context, Result};
use areasurf_base::ConversionSettings;
use areasurf_model::ObjectGraph;
use serde_json::Value as Json;
use tracing::{info, warn};

use crate::pipeline::run_conversion;
use crate::summary::{ObjectResults, RunStatus, RunSummary};

/// The automation platform as seen from one function run.
///
/// Errors returned here are the host's own and end the run.
pub trait AutomationHost {
    fn receive_version(&mut self) -> Result<ObjectGraph>;

    fn create_version(&mut self, objects: Vec<Json>, message: &str) -> Result<String>;

    /// Attaches result messages to objects, once per run and only when there are any.
    fn attach_results(&mut self, results: &[ObjectResults]) -> Result<()>;

    fn report(&mut self, summary: &RunSummary) -> Result<()>;
}

pub fn automate<H>(host: &mut H, settings: &ConversionSettings) -> Result<RunSummary>
where
    H: AutomationHost + ?Sized,
{
    settings.validate().context("invalid function inputs")?;
    let graph = host
        .receive_version()
        .context("failed to receive the triggering version")?;

    let run = run_conversion(&graph, settings);
    let mut summary = run.summary.clone();

    if summary.status == RunStatus::Converted {
        let objects = run.output_objects(&graph, settings);
        let object_count = objects.len();
        let version = host
            .create_version(objects, &run.version_message())
            .context("failed to publish converted surfaces")?;
        info!(version = %version, objects = object_count, "published new version");
        summary.version_id = Some(version);
    }

    match summary.status {
        RunStatus::Converted => info!(
            converted = summary.converted,
            skipped = summary.skipped,
            failed = summary.failed,
            "{}",
            summary.message()
        ),
        RunStatus::NoAreaBoundaries | RunStatus::NothingConverted => warn!(
            candidates = summary.candidates,
            skipped = summary.skipped,
            failed = summary.failed,
            "{}",
            summary.message()
        ),
    }
    if let Some(digest) = summary.failure_digest() {
        warn!("{digest}");
    }

    let results = summary.object_results();
    if !results.is_empty() {
        host.attach_results(&results)
            .context("failed to attach object results")?;
    }
    host.report(&summary).context("failed to report run status")?;
    Ok(summary)
}
