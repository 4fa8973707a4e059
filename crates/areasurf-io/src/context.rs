use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HostContext {
    pub project_id: String,
    pub model_id: String,
    pub version_id: String,
    pub source_path: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub server_url: Option<String>,
}

impl HostContext {
    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join("summary.json")
    }

    pub fn version_path(&self, version_id: &str) -> PathBuf {
        self.output_dir.join(format!("{version_id}.json"))
    }
}
