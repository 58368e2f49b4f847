use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Signals the tool prints when a command needs `terraform init` first.
/// Covers the wording of 0.12 through 1.x releases, with or without the
/// diagnostic box drawn around messages.
static NO_INIT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"Error: Could not satisfy plugin requirements|",
        r"Error: Could not load plugin|",
        r"Error: Backend initialization required|",
        r"Error: Module not installed|",
        r"Error: Missing required provider|",
        r#"Please run "terraform init"|"#,
        r"Error: Inconsistent dependency lock file|",
        r"run:[\s│]+terraform init|",
        r"running:[\s│]+terraform init|",
        r#"Run\s+"terraform\s+init""#,
    ))
    .expect("no-init regex should compile")
});

/// Whether the tool output asks for the working directory to be initialized
pub fn needs_init(output: &str) -> bool {
    NO_INIT_REGEX.is_match(output)
}

/// Describe how a process ended; no code means it was killed by a signal
fn describe_exit(code: &Option<i32>, output: &str) -> String {
    let status = match code {
        Some(code) => format!("exit status {}", code),
        None => "terminated by signal".to_string(),
    };
    if output.is_empty() {
        status
    } else {
        format!("{}: {}", status, output)
    }
}

/// Failure of a single tool invocation
#[derive(Debug, Error)]
pub enum EngineFailure {
    /// The working directory has not been initialized
    #[error("{stderr}")]
    NotInitialized { stderr: String },

    #[error("{}", describe_exit(.code, .stderr))]
    Exited {
        args: Vec<String>,
        code: Option<i32>,
        stderr: String,
    },

    #[error("failed to run terraform: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("unexpected terraform output: {0}")]
    Decode(#[from] serde_json::Error),
}

impl EngineFailure {
    /// Build the failure for a process that exited unsuccessfully, recognizing
    /// the not-initialized signal once here so callers can match on the variant.
    pub fn from_exit(args: Vec<String>, code: Option<i32>, stderr: String) -> Self {
        let stderr = stderr.trim().to_string();
        if needs_init(&stderr) {
            EngineFailure::NotInitialized { stderr }
        } else {
            EngineFailure::Exited { args, code, stderr }
        }
    }

    pub fn is_not_initialized(&self) -> bool {
        matches!(self, EngineFailure::NotInitialized { .. })
    }
}
