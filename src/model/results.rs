use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Machine-readable report of `validate -json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_version: Option<String>,
    pub valid: bool,
    pub error_count: u32,
    pub warning_count: u32,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Source location, kept as reported by the tool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<serde_json::Value>,
}

/// Output of `/plan`. The field is published as `formatted` but reports
/// whether the plan contains changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOutput {
    #[serde(rename = "formatted")]
    pub changed: bool,
}

/// Result of a formatting check
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOutput {
    pub formatted: bool,
    #[serde(default)]
    pub changed_files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphOutput {
    #[serde(rename = "formatted")]
    pub output: String,
}

/// One root module output value as reported by `output -json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputMeta {
    #[serde(default)]
    pub sensitive: bool,
    #[serde(rename = "type", default)]
    pub value_type: serde_json::Value,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputOutput {
    pub output: BTreeMap<String, OutputMeta>,
}

/// Tool version plus the version selected for each provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolVersions {
    pub terraform_version: String,
    #[serde(default)]
    pub provider_selections: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionOutput {
    pub version: String,
    pub providers: BTreeMap<String, String>,
}

impl From<ToolVersions> for VersionOutput {
    fn from(versions: ToolVersions) -> Self {
        Self {
            version: versions.terraform_version,
            providers: versions.provider_selections,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceShowOutput {
    #[serde(rename = "formatted")]
    pub current: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceListOutput {
    pub current: String,
    pub list: Vec<String>,
}

/// Every success payload a route can produce
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperationOutput {
    Validate(ValidateOutput),
    Plan(PlanOutput),
    Format(FormatOutput),
    Graph(GraphOutput),
    Output(OutputOutput),
    /// `providers schema -json` document, passed through untouched
    ProvidersSchema(serde_json::Value),
    /// `show -json` state document, passed through untouched
    Show(serde_json::Value),
    Version(VersionOutput),
    WorkspaceShow(WorkspaceShowOutput),
    WorkspaceList(WorkspaceListOutput),
}
