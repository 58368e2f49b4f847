use crate::engine::{EngineFailure, EngineOption};
use crate::model::{FormatOutput, OutputMeta, ToolVersions, ValidateOutput};
use std::collections::BTreeMap;

pub type EngineResult<T> = std::result::Result<T, EngineFailure>;

/// One method per tool command. Implementations run the command against the
/// working directory they are bound to and never retry or interpret failures.
#[async_trait::async_trait]
pub trait Engine: Send + Sync {
    /// Initialize the working directory
    async fn init(&self, options: &[EngineOption]) -> EngineResult<()>;
    async fn validate(&self) -> EngineResult<ValidateOutput>;
    /// Returns `true` when the plan contains changes
    async fn plan(&self, options: &[EngineOption]) -> EngineResult<bool>;
    async fn apply(&self, options: &[EngineOption]) -> EngineResult<()>;
    async fn destroy(&self, options: &[EngineOption]) -> EngineResult<()>;

    /// Check formatting without touching any file
    async fn format_check(&self, options: &[EngineOption]) -> EngineResult<FormatOutput>;
    /// Rewrite configuration files in canonical format
    async fn format_write(&self, options: &[EngineOption]) -> EngineResult<()>;

    async fn force_unlock(&self, lock_id: &str) -> EngineResult<()>;
    /// Download and update modules
    async fn get(&self, options: &[EngineOption]) -> EngineResult<()>;
    async fn graph(&self) -> EngineResult<String>;
    async fn import(&self, address: &str, id: &str) -> EngineResult<()>;
    async fn output(&self) -> EngineResult<BTreeMap<String, OutputMeta>>;
    async fn providers_schema(&self) -> EngineResult<serde_json::Value>;
    async fn providers_lock(&self) -> EngineResult<()>;
    async fn show(&self) -> EngineResult<serde_json::Value>;

    async fn state_rm(&self, address: &str) -> EngineResult<()>;
    async fn state_mv(&self, source: &str, destination: &str) -> EngineResult<()>;
    async fn untaint(&self, address: &str) -> EngineResult<()>;
    async fn version(&self) -> EngineResult<ToolVersions>;

    async fn workspace_show(&self) -> EngineResult<String>;
    /// Returns all workspaces and the name of the current one
    async fn workspace_list(&self) -> EngineResult<(Vec<String>, String)>;
    async fn workspace_select(&self, name: &str) -> EngineResult<()>;
    async fn workspace_new(&self, name: &str) -> EngineResult<()>;
    async fn workspace_delete(&self, name: &str) -> EngineResult<()>;
}
