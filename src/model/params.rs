//! Validated query parameters, one struct per route that accepts any.

/// Query params for `/plan`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanQueryParams {
    pub vars: Vec<String>,
    pub var_files: Vec<String>,
}

/// Query params for `/apply`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyQueryParams {
    pub refresh_only: bool,
    pub replace: String,
    pub vars: Vec<String>,
    pub var_files: Vec<String>,
    /// `0` means the tool's own default is used
    pub parallelism: u32,
}

/// Query params for `/destroy`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestroyQueryParams {
    pub vars: Vec<String>,
    pub var_files: Vec<String>,
    pub parallelism: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForceUnlockQueryParams {
    pub lock_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportQueryParams {
    pub address: String,
    pub id: String,
}

/// Query params for `/state/rm` and `/untaint`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressQueryParams {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMvQueryParams {
    pub source: String,
    pub destination: String,
}

/// Query params for `/workspace/select`, `/workspace/new` and `/workspace/delete`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceQueryParams {
    pub name: String,
}
