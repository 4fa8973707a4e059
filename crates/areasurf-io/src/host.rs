use anyhow::Result;
use areasurf_base::Guid;
use areasurf_convert::{AutomationHost, ObjectResults, RunSummary};
use areasurf_model::ObjectGraph;
use serde_json::{Value as Json, json};
use tracing::{debug, info};

use crate::context::HostContext;
use crate::json::{load_graph, write_json};

/// Host backed by the local filesystem.
pub struct FileHost {
    context: HostContext,
    token: Option<String>,
    attached: Vec<ObjectResults>,
}

impl FileHost {
    pub fn new(context: HostContext, token: Option<String>) -> Self {
        Self {
            context,
            token,
            attached: Vec::new(),
        }
    }

    pub fn context(&self) -> &HostContext {
        &self.context
    }
}

impl AutomationHost for FileHost {
    fn receive_version(&mut self) -> Result<ObjectGraph> {
        debug!(
            project = %self.context.project_id,
            version = %self.context.version_id,
            authenticated = self.token.is_some(),
            "receiving version"
        );
        let graph = load_graph(&self.context.source_path)?;
        info!(
            path = %self.context.source_path.display(),
            objects = graph.len(),
            "version received"
        );
        Ok(graph)
    }

    fn create_version(&mut self, objects: Vec<Json>, message: &str) -> Result<String> {
        let version_id = Guid::new().to_object_id();
        let document = json!({
            "id": version_id,
            "project_id": self.context.project_id,
            "model_id": self.context.model_id,
            "parent_version_id": self.context.version_id,
            "message": message,
            "objects": objects,
        });
        let path = self.context.version_path(&version_id);
        write_json(&document, &path)?;
        info!(path = %path.display(), "version written");
        Ok(version_id)
    }

    fn attach_results(&mut self, results: &[ObjectResults]) -> Result<()> {
        debug!(groups = results.len(), "attaching object results");
        self.attached.extend_from_slice(results);
        Ok(())
    }

    fn report(&mut self, summary: &RunSummary) -> Result<()> {
        let document = json!({
            "project_id": self.context.project_id,
            "version_id": self.context.version_id,
            "message": summary.message(),
            "failure_digest": summary.failure_digest(),
            "summary": summary,
            "object_results": self.attached,
        });
        write_json(&document, self.context.summary_path())
    }
}
