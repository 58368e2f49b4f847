use crate::engine::failure::needs_init;
use crate::engine::option::to_args;
use crate::engine::{Engine, EngineFailure, EngineOption, EngineResult};
use crate::model::{FormatOutput, OutputMeta, ToolVersions, ValidateOutput};
use itertools::Itertools;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;

/// Exit code of `plan -detailed-exitcode` when the plan has changes
const PLAN_CHANGED_EXIT_CODE: i32 = 2;
/// Exit code of `fmt -check` when some files are not formatted
const FMT_UNFORMATTED_EXIT_CODE: i32 = 3;

/// Handle bound to one working directory and one installed tool executable.
///
/// Every call spawns a child process in the working directory. The child is
/// killed when the returned future is dropped, so a cancelled request also
/// stops the command it started.
#[derive(Debug, Clone)]
pub struct Terraform {
    working_dir: PathBuf,
    exec_path: PathBuf,
}

/// Captured result of one finished process
#[derive(Debug)]
struct CommandOutput {
    args: Vec<String>,
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl CommandOutput {
    /// Some commands report errors on stdout, so fall back to it when stderr is empty
    fn into_failure(self) -> EngineFailure {
        let output = if self.stderr.trim().is_empty() {
            self.stdout
        } else {
            self.stderr
        };
        EngineFailure::from_exit(self.args, self.code, output)
    }
}

impl Terraform {
    pub fn new(
        working_dir: impl Into<PathBuf>,
        exec_path: impl Into<PathBuf>,
    ) -> anyhow::Result<Self> {
        let working_dir = working_dir.into();
        if !working_dir.is_dir() {
            anyhow::bail!(
                "working directory {} does not exist or is not a directory",
                working_dir.display()
            );
        }

        Ok(Self {
            working_dir,
            exec_path: exec_path.into(),
        })
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn exec_path(&self) -> &Path {
        &self.exec_path
    }

    /// Run the tool and capture its output regardless of the exit status
    async fn execute(&self, args: Vec<String>) -> EngineResult<CommandOutput> {
        let started = Instant::now();
        log::debug!("running {} {}", self.exec_path.display(), args.iter().join(" "));

        let output = Command::new(&self.exec_path)
            .args(&args)
            .current_dir(&self.working_dir)
            .env("TF_IN_AUTOMATION", "1")
            .env("CHECKPOINT_DISABLE", "1")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await?;

        log::debug!(
            "terraform {} exited with {:?} after {:?}",
            args.first().map(String::as_str).unwrap_or_default(),
            output.status.code(),
            started.elapsed()
        );

        Ok(CommandOutput {
            args,
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Run the tool, treating any non-zero exit status as a failure
    async fn run(&self, args: Vec<String>) -> EngineResult<String> {
        let output = self.execute(args).await?;
        match output.code {
            Some(0) => Ok(output.stdout),
            _ => Err(output.into_failure()),
        }
    }

    async fn run_json<T: serde::de::DeserializeOwned>(
        &self,
        args: Vec<String>,
    ) -> EngineResult<T> {
        let stdout = self.run(args).await?;
        Ok(serde_json::from_str(&stdout)?)
    }
}

fn command(base: &[&str], options: &[EngineOption]) -> Vec<String> {
    base.iter()
        .map(|arg| arg.to_string())
        .chain(to_args(options))
        .collect()
}

/// Parse `workspace list` output, where the current workspace is marked with `*`
fn parse_workspace_list(stdout: &str) -> (Vec<String>, String) {
    let mut current = String::new();
    let mut workspaces = Vec::new();
    for line in stdout.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.strip_prefix('*') {
            Some(name) => {
                current = name.trim().to_string();
                workspaces.push(current.clone());
            }
            None => workspaces.push(line.to_string()),
        }
    }
    (workspaces, current)
}

fn parse_file_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait::async_trait]
impl Engine for Terraform {
    async fn init(&self, options: &[EngineOption]) -> EngineResult<()> {
        self.run(command(&["init", "-no-color", "-input=false"], options))
            .await
            .map(|_| ())
    }

    async fn validate(&self) -> EngineResult<ValidateOutput> {
        // the report is printed to stdout even when validation fails with exit code 1
        let output = self
            .execute(command(&["validate", "-no-color", "-json"], &[]))
            .await?;
        let report: ValidateOutput = match serde_json::from_str(&output.stdout) {
            Ok(report) => report,
            Err(_) if output.code != Some(0) => return Err(output.into_failure()),
            Err(err) => return Err(err.into()),
        };

        if !report.valid {
            let text = report
                .diagnostics
                .iter()
                .map(|d| {
                    let detail = d.detail.as_deref().unwrap_or_default();
                    format!("{}: {}", d.summary, detail)
                })
                .join("\n");
            if needs_init(&text) {
                return Err(EngineFailure::NotInitialized { stderr: text });
            }
        }

        Ok(report)
    }

    async fn plan(&self, options: &[EngineOption]) -> EngineResult<bool> {
        let output = self
            .execute(command(
                &["plan", "-no-color", "-input=false", "-detailed-exitcode"],
                options,
            ))
            .await?;
        match output.code {
            Some(0) => Ok(false),
            Some(PLAN_CHANGED_EXIT_CODE) => Ok(true),
            _ => Err(output.into_failure()),
        }
    }

    async fn apply(&self, options: &[EngineOption]) -> EngineResult<()> {
        self.run(command(
            &["apply", "-no-color", "-input=false", "-auto-approve"],
            options,
        ))
        .await
        .map(|_| ())
    }

    async fn destroy(&self, options: &[EngineOption]) -> EngineResult<()> {
        self.run(command(
            &["destroy", "-no-color", "-input=false", "-auto-approve"],
            options,
        ))
        .await
        .map(|_| ())
    }

    async fn format_check(&self, options: &[EngineOption]) -> EngineResult<FormatOutput> {
        let output = self
            .execute(command(&["fmt", "-no-color", "-list=true", "-check"], options))
            .await?;
        match output.code {
            Some(0) => Ok(FormatOutput {
                formatted: true,
                changed_files: Vec::new(),
            }),
            Some(FMT_UNFORMATTED_EXIT_CODE) => Ok(FormatOutput {
                formatted: false,
                changed_files: parse_file_list(&output.stdout),
            }),
            _ => Err(output.into_failure()),
        }
    }

    async fn format_write(&self, options: &[EngineOption]) -> EngineResult<()> {
        self.run(command(&["fmt", "-no-color", "-list=true", "-write=true"], options))
            .await
            .map(|_| ())
    }

    async fn force_unlock(&self, lock_id: &str) -> EngineResult<()> {
        self.run(command(&["force-unlock", "-no-color", "-force", lock_id], &[]))
            .await
            .map(|_| ())
    }

    async fn get(&self, options: &[EngineOption]) -> EngineResult<()> {
        self.run(command(&["get", "-no-color"], options))
            .await
            .map(|_| ())
    }

    async fn graph(&self) -> EngineResult<String> {
        self.run(command(&["graph", "-no-color"], &[])).await
    }

    async fn import(&self, address: &str, id: &str) -> EngineResult<()> {
        self.run(command(&["import", "-no-color", "-input=false", address, id], &[]))
            .await
            .map(|_| ())
    }

    async fn output(&self) -> EngineResult<BTreeMap<String, OutputMeta>> {
        self.run_json(command(&["output", "-no-color", "-json"], &[]))
            .await
    }

    async fn providers_schema(&self) -> EngineResult<serde_json::Value> {
        self.run_json(command(&["providers", "schema", "-json", "-no-color"], &[]))
            .await
    }

    async fn providers_lock(&self) -> EngineResult<()> {
        self.run(command(&["providers", "lock", "-no-color"], &[]))
            .await
            .map(|_| ())
    }

    async fn show(&self) -> EngineResult<serde_json::Value> {
        self.run_json(command(&["show", "-no-color", "-json"], &[]))
            .await
    }

    async fn state_rm(&self, address: &str) -> EngineResult<()> {
        self.run(command(&["state", "rm", "-no-color", address], &[]))
            .await
            .map(|_| ())
    }

    async fn state_mv(&self, source: &str, destination: &str) -> EngineResult<()> {
        self.run(command(&["state", "mv", "-no-color", source, destination], &[]))
            .await
            .map(|_| ())
    }

    async fn untaint(&self, address: &str) -> EngineResult<()> {
        self.run(command(&["untaint", "-no-color", address], &[]))
            .await
            .map(|_| ())
    }

    async fn version(&self) -> EngineResult<ToolVersions> {
        self.run_json(command(&["version", "-json"], &[])).await
    }

    async fn workspace_show(&self) -> EngineResult<String> {
        let stdout = self.run(command(&["workspace", "show", "-no-color"], &[])).await?;
        Ok(stdout.trim().to_string())
    }

    async fn workspace_list(&self) -> EngineResult<(Vec<String>, String)> {
        let stdout = self.run(command(&["workspace", "list", "-no-color"], &[])).await?;
        Ok(parse_workspace_list(&stdout))
    }

    async fn workspace_select(&self, name: &str) -> EngineResult<()> {
        self.run(command(&["workspace", "select", "-no-color", name], &[]))
            .await
            .map(|_| ())
    }

    async fn workspace_new(&self, name: &str) -> EngineResult<()> {
        self.run(command(&["workspace", "new", "-no-color", name], &[]))
            .await
            .map(|_| ())
    }

    async fn workspace_delete(&self, name: &str) -> EngineResult<()> {
        self.run(command(&["workspace", "delete", "-no-color", name], &[]))
            .await
            .map(|_| ())
    }
}
