use std::fmt;

/// One discrete flag passed to a tool invocation.
///
/// Options are rendered in the order they were built; repeated `Var` and
/// `VarFile` entries each become their own flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOption {
    /// `key=value` assignment, forwarded without validation
    Var(String),
    VarFile(String),
    Parallelism(u32),
    Refresh(bool),
    Replace(String),
    Upgrade(bool),
    Update(bool),
    Recursive,
}

impl EngineOption {
    pub fn to_arg(&self) -> String {
        match self {
            EngineOption::Var(assignment) => format!("-var={}", assignment),
            EngineOption::VarFile(path) => format!("-var-file={}", path),
            EngineOption::Parallelism(n) => format!("-parallelism={}", n),
            EngineOption::Refresh(refresh) => format!("-refresh={}", refresh),
            EngineOption::Replace(address) => format!("-replace={}", address),
            EngineOption::Upgrade(upgrade) => format!("-upgrade={}", upgrade),
            EngineOption::Update(update) => format!("-update={}", update),
            EngineOption::Recursive => "-recursive".to_string(),
        }
    }
}

impl fmt::Display for EngineOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_arg())
    }
}

pub fn to_args(options: &[EngineOption]) -> Vec<String> {
    options.iter().map(EngineOption::to_arg).collect()
}
