#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::time::Duration;

use tf_lcm_api::engine::{Engine, EngineFailure, EngineOption, EngineResult};
use tf_lcm_api::model::{Diagnostic, FormatOutput, OutputMeta, ToolVersions, ValidateOutput};

/// One recorded engine invocation
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub command: &'static str,
    pub options: Vec<EngineOption>,
    pub args: Vec<String>,
}

#[derive(Debug, Default)]
struct FakeState {
    initialized: bool,
    plan_changes: bool,
    invalid_config: bool,
    unformatted: Vec<String>,
    workspaces: Vec<String>,
    current_workspace: String,
    failure: Option<String>,
}

/// In-memory engine that records every call and mimics the tool's outcomes
#[derive(Debug)]
pub struct FakeEngine {
    state: Mutex<FakeState>,
    calls: Mutex<Vec<Call>>,
    delay: Duration,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                initialized: true,
                workspaces: vec!["default".to_string()],
                current_workspace: "default".to_string(),
                ..Default::default()
            }),
            calls: Mutex::new(Vec::new()),
            delay: Duration::ZERO,
        }
    }

    pub fn uninitialized() -> Self {
        let engine = Self::new();
        engine.state.lock().initialized = false;
        engine
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_plan_changes(self) -> Self {
        self.state.lock().plan_changes = true;
        self
    }

    pub fn with_invalid_config(self) -> Self {
        self.state.lock().invalid_config = true;
        self
    }

    pub fn with_unformatted(self, files: &[&str]) -> Self {
        self.state.lock().unformatted = files.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Make every command fail with the given stderr
    pub fn failing(self, stderr: &str) -> Self {
        self.state.lock().failure = Some(stderr.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn commands(&self) -> Vec<&'static str> {
        self.calls.lock().iter().map(|c| c.command).collect()
    }

    pub fn last_options(&self, command: &str) -> Option<Vec<EngineOption>> {
        self.calls
            .lock()
            .iter()
            .rev()
            .find(|c| c.command == command)
            .map(|c| c.options.clone())
    }

    async fn record(
        &self,
        command: &'static str,
        options: &[EngineOption],
        args: &[&str],
        needs_init: bool,
    ) -> EngineResult<()> {
        self.calls.lock().push(Call {
            command,
            options: options.to_vec(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let state = self.state.lock();
        if needs_init && !state.initialized {
            return Err(EngineFailure::from_exit(
                vec![command.to_string()],
                Some(1),
                "Error: Backend initialization required, please run \"terraform init\"".to_string(),
            ));
        }
        if let Some(stderr) = &state.failure {
            return Err(EngineFailure::from_exit(
                vec![command.to_string()],
                Some(1),
                stderr.clone(),
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Engine for FakeEngine {
    async fn init(&self, options: &[EngineOption]) -> EngineResult<()> {
        self.record("init", options, &[], false).await?;
        self.state.lock().initialized = true;
        Ok(())
    }

    async fn validate(&self) -> EngineResult<ValidateOutput> {
        self.record("validate", &[], &[], true).await?;
        if self.state.lock().invalid_config {
            return Ok(ValidateOutput {
                format_version: Some("1.0".to_string()),
                valid: false,
                error_count: 1,
                warning_count: 0,
                diagnostics: vec![Diagnostic {
                    severity: "error".to_string(),
                    summary: "Unsupported block type".to_string(),
                    detail: Some("Blocks of type \"resourc\" are not expected here.".to_string()),
                    range: None,
                    snippet: None,
                }],
            });
        }
        Ok(ValidateOutput {
            format_version: Some("1.0".to_string()),
            valid: true,
            error_count: 0,
            warning_count: 0,
            diagnostics: Vec::new(),
        })
    }

    async fn plan(&self, options: &[EngineOption]) -> EngineResult<bool> {
        self.record("plan", options, &[], true).await?;
        Ok(self.state.lock().plan_changes)
    }

    async fn apply(&self, options: &[EngineOption]) -> EngineResult<()> {
        self.record("apply", options, &[], true).await?;
        self.state.lock().plan_changes = false;
        Ok(())
    }

    async fn destroy(&self, options: &[EngineOption]) -> EngineResult<()> {
        self.record("destroy", options, &[], true).await
    }

    async fn format_check(&self, options: &[EngineOption]) -> EngineResult<FormatOutput> {
        self.record("format_check", options, &[], false).await?;
        let unformatted = self.state.lock().unformatted.clone();
        Ok(FormatOutput {
            formatted: unformatted.is_empty(),
            changed_files: unformatted,
        })
    }

    async fn format_write(&self, options: &[EngineOption]) -> EngineResult<()> {
        self.record("format_write", options, &[], false).await?;
        self.state.lock().unformatted.clear();
        Ok(())
    }

    async fn force_unlock(&self, lock_id: &str) -> EngineResult<()> {
        self.record("force_unlock", &[], &[lock_id], true).await
    }

    async fn get(&self, options: &[EngineOption]) -> EngineResult<()> {
        self.record("get", options, &[], false).await
    }

    async fn graph(&self) -> EngineResult<String> {
        self.record("graph", &[], &[], true).await?;
        Ok("digraph {\n\tcompound = \"true\"\n}\n".to_string())
    }

    async fn import(&self, address: &str, id: &str) -> EngineResult<()> {
        self.record("import", &[], &[address, id], true).await
    }

    async fn output(&self) -> EngineResult<BTreeMap<String, OutputMeta>> {
        self.record("output", &[], &[], true).await?;
        let mut outputs = BTreeMap::new();
        outputs.insert(
            "hello".to_string(),
            OutputMeta {
                sensitive: false,
                value_type: serde_json::json!("string"),
                value: serde_json::json!("world"),
            },
        );
        Ok(outputs)
    }

    async fn providers_schema(&self) -> EngineResult<serde_json::Value> {
        self.record("providers_schema", &[], &[], true).await?;
        Ok(serde_json::json!({ "format_version": "1.0", "provider_schemas": {} }))
    }

    async fn providers_lock(&self) -> EngineResult<()> {
        self.record("providers_lock", &[], &[], true).await
    }

    async fn show(&self) -> EngineResult<serde_json::Value> {
        self.record("show", &[], &[], true).await?;
        Ok(serde_json::json!({ "format_version": "1.0", "terraform_version": "1.3.4" }))
    }

    async fn state_rm(&self, address: &str) -> EngineResult<()> {
        self.record("state_rm", &[], &[address], true).await
    }

    async fn state_mv(&self, source: &str, destination: &str) -> EngineResult<()> {
        self.record("state_mv", &[], &[source, destination], true).await
    }

    async fn untaint(&self, address: &str) -> EngineResult<()> {
        self.record("untaint", &[], &[address], true).await
    }

    async fn version(&self) -> EngineResult<ToolVersions> {
        self.record("version", &[], &[], false).await?;
        let mut provider_selections = BTreeMap::new();
        provider_selections.insert(
            "registry.terraform.io/hashicorp/null".to_string(),
            "3.2.1".to_string(),
        );
        Ok(ToolVersions {
            terraform_version: "1.3.4".to_string(),
            provider_selections,
        })
    }

    async fn workspace_show(&self) -> EngineResult<String> {
        self.record("workspace_show", &[], &[], false).await?;
        Ok(self.state.lock().current_workspace.clone())
    }

    async fn workspace_list(&self) -> EngineResult<(Vec<String>, String)> {
        self.record("workspace_list", &[], &[], true).await?;
        let state = self.state.lock();
        Ok((state.workspaces.clone(), state.current_workspace.clone()))
    }

    async fn workspace_select(&self, name: &str) -> EngineResult<()> {
        self.record("workspace_select", &[], &[name], true).await?;
        let mut state = self.state.lock();
        if !state.workspaces.iter().any(|w| w == name) {
            return Err(EngineFailure::from_exit(
                vec!["workspace".into(), "select".into()],
                Some(1),
                format!("Workspace \"{}\" doesn't exist.", name),
            ));
        }
        state.current_workspace = name.to_string();
        Ok(())
    }

    async fn workspace_new(&self, name: &str) -> EngineResult<()> {
        self.record("workspace_new", &[], &[name], true).await?;
        let mut state = self.state.lock();
        state.workspaces.push(name.to_string());
        state.current_workspace = name.to_string();
        Ok(())
    }

    async fn workspace_delete(&self, name: &str) -> EngineResult<()> {
        self.record("workspace_delete", &[], &[name], true).await?;
        self.state.lock().workspaces.retain(|w| w != name);
        Ok(())
    }
}
