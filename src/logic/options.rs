//! Translation of validated query parameters into ordered engine options.
//!
//! Nothing here touches the file system or checks identifiers; malformed
//! values surface as failures of the tool itself.

use crate::engine::EngineOption;
use crate::model::{ApplyQueryParams, DestroyQueryParams, PlanQueryParams};

fn variable_options<'a>(
    vars: &'a [String],
    var_files: &'a [String],
) -> impl Iterator<Item = EngineOption> + 'a {
    vars.iter()
        .cloned()
        .map(EngineOption::Var)
        .chain(var_files.iter().cloned().map(EngineOption::VarFile))
}

/// A zero parallelism means "use the tool's default", so no option is built
fn parallelism_option(parallelism: u32) -> Option<EngineOption> {
    (parallelism != 0).then_some(EngineOption::Parallelism(parallelism))
}

pub fn plan_options(params: &PlanQueryParams) -> Vec<EngineOption> {
    variable_options(&params.vars, &params.var_files).collect()
}

pub fn apply_options(params: &ApplyQueryParams) -> Vec<EngineOption> {
    let mut options = vec![EngineOption::Refresh(params.refresh_only)];
    if !params.replace.is_empty() {
        options.push(EngineOption::Replace(params.replace.clone()));
    }
    options.extend(variable_options(&params.vars, &params.var_files));
    options.extend(parallelism_option(params.parallelism));
    options
}

pub fn destroy_options(params: &DestroyQueryParams) -> Vec<EngineOption> {
    let mut options: Vec<EngineOption> =
        variable_options(&params.vars, &params.var_files).collect();
    options.extend(parallelism_option(params.parallelism));
    options
}

/// `init` always upgrades already installed plugins and modules
pub fn init_options() -> Vec<EngineOption> {
    vec![EngineOption::Upgrade(true)]
}

/// `get` always updates already downloaded modules
pub fn get_options() -> Vec<EngineOption> {
    vec![EngineOption::Update(true)]
}

/// `fmt` check and write both walk subdirectories
pub fn format_options() -> Vec<EngineOption> {
    vec![EngineOption::Recursive]
}
