use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;

use crate::api::query::ValidQuery;
use crate::api::ApiError;
use crate::engine::{Engine, EngineFailure};
use crate::logic::{
    apply_options, classify, destroy_options, format_options, get_options, init_options,
    plan_options,
};
use crate::model::{
    AddressQueryParams, ApplyQueryParams, DestroyQueryParams, ForceUnlockQueryParams,
    GraphOutput, ImportQueryParams, JsonResult, OperationOutput, OutputOutput, PlanOutput,
    PlanQueryParams, StateMvQueryParams, VersionOutput, WorkspaceListOutput,
    WorkspaceQueryParams, WorkspaceShowOutput,
};

/// The single engine handle shared by all requests
pub type AppState<E> = Arc<E>;

pub type ApiResult = Result<Json<JsonResult>, ApiError>;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

fn failed(command: &'static str) -> impl FnOnce(EngineFailure) -> ApiError {
    move |failure| classify(command, failure)
}

fn done(message: &str) -> ApiResult {
    Ok(Json(JsonResult::message(message)))
}

/// Wrap a success payload into the response envelope
fn respond(message: &str, output: OperationOutput) -> ApiResult {
    Ok(Json(JsonResult::encode(message, &output)?))
}

pub async fn init<E: Engine>(State(engine): State<AppState<E>>) -> ApiResult {
    log::info!("initializing working directory");
    engine.init(&init_options()).await.map_err(failed("init"))?;
    done("Terraform has been successfully initialized!")
}

pub async fn validate<E: Engine>(State(engine): State<AppState<E>>) -> ApiResult {
    let report = engine.validate().await.map_err(failed("validate"))?;
    log::info!(
        "validate finished: valid={} errors={} warnings={}",
        report.valid,
        report.error_count,
        report.warning_count
    );
    respond("Validate complete!", OperationOutput::Validate(report))
}

pub async fn plan<E: Engine>(
    State(engine): State<AppState<E>>,
    ValidQuery(params): ValidQuery<PlanQueryParams>,
) -> ApiResult {
    let changed = engine
        .plan(&plan_options(&params))
        .await
        .map_err(failed("plan"))?;
    respond("Plan complete!", OperationOutput::Plan(PlanOutput { changed }))
}

pub async fn apply<E: Engine>(
    State(engine): State<AppState<E>>,
    ValidQuery(params): ValidQuery<ApplyQueryParams>,
) -> ApiResult {
    log::info!("applying configuration");
    engine
        .apply(&apply_options(&params))
        .await
        .map_err(failed("apply"))?;
    done("Apply complete!")
}

pub async fn destroy<E: Engine>(
    State(engine): State<AppState<E>>,
    ValidQuery(params): ValidQuery<DestroyQueryParams>,
) -> ApiResult {
    log::info!("destroying managed infrastructure");
    engine
        .destroy(&destroy_options(&params))
        .await
        .map_err(failed("destroy"))?;
    done("Destroy complete!")
}

/// Check formatting first and only rewrite files when something is off
pub async fn fmt<E: Engine>(State(engine): State<AppState<E>>) -> ApiResult {
    let options = format_options();
    let check = engine
        .format_check(&options)
        .await
        .map_err(failed("fmt"))?;

    let formatted = check.formatted;
    let envelope = JsonResult::encode("", &OperationOutput::Format(check))?;
    if formatted {
        return Ok(Json(JsonResult {
            message: "config files are already formatted!".to_string(),
            ..envelope
        }));
    }

    engine
        .format_write(&options)
        .await
        .map_err(failed("fmt"))?;
    Ok(Json(JsonResult {
        message: "config files got formatted".to_string(),
        ..envelope
    }))
}

pub async fn force_unlock<E: Engine>(
    State(engine): State<AppState<E>>,
    ValidQuery(params): ValidQuery<ForceUnlockQueryParams>,
) -> ApiResult {
    log::info!("force-unlocking state lock {}", params.lock_id);
    engine
        .force_unlock(&params.lock_id)
        .await
        .map_err(failed("force-unlock"))?;
    done("Terraform state has been successfully unlocked!")
}

pub async fn get_modules<E: Engine>(State(engine): State<AppState<E>>) -> ApiResult {
    engine.get(&get_options()).await.map_err(failed("get"))?;
    done("Modules have been successfully updated!")
}

pub async fn graph<E: Engine>(State(engine): State<AppState<E>>) -> ApiResult {
    let output = engine.graph().await.map_err(failed("graph"))?;
    respond("Graph complete!", OperationOutput::Graph(GraphOutput { output }))
}

pub async fn import<E: Engine>(
    State(engine): State<AppState<E>>,
    ValidQuery(params): ValidQuery<ImportQueryParams>,
) -> ApiResult {
    log::info!("importing {} as {}", params.id, params.address);
    engine
        .import(&params.address, &params.id)
        .await
        .map_err(failed("import"))?;
    done("Import successful!")
}

pub async fn output<E: Engine>(State(engine): State<AppState<E>>) -> ApiResult {
    let output = engine.output().await.map_err(failed("output"))?;
    respond("Output complete!", OperationOutput::Output(OutputOutput { output }))
}

pub async fn providers_schema<E: Engine>(State(engine): State<AppState<E>>) -> ApiResult {
    let schema = engine
        .providers_schema()
        .await
        .map_err(failed("providers schema"))?;
    respond("Providers schema complete!", OperationOutput::ProvidersSchema(schema))
}

pub async fn providers_lock<E: Engine>(State(engine): State<AppState<E>>) -> ApiResult {
    engine
        .providers_lock()
        .await
        .map_err(failed("providers lock"))?;
    done("Success! Terraform has updated the lock file.")
}

pub async fn show<E: Engine>(State(engine): State<AppState<E>>) -> ApiResult {
    let state = engine.show().await.map_err(failed("show"))?;
    respond("Show complete!", OperationOutput::Show(state))
}

pub async fn state_rm<E: Engine>(
    State(engine): State<AppState<E>>,
    ValidQuery(params): ValidQuery<AddressQueryParams>,
) -> ApiResult {
    log::info!("removing {} from state", params.address);
    engine
        .state_rm(&params.address)
        .await
        .map_err(failed("state rm"))?;
    done("State rm complete!")
}

pub async fn state_mv<E: Engine>(
    State(engine): State<AppState<E>>,
    ValidQuery(params): ValidQuery<StateMvQueryParams>,
) -> ApiResult {
    log::info!("moving {} to {} in state", params.source, params.destination);
    engine
        .state_mv(&params.source, &params.destination)
        .await
        .map_err(failed("state mv"))?;
    done("State mv complete!")
}

pub async fn untaint<E: Engine>(
    State(engine): State<AppState<E>>,
    ValidQuery(params): ValidQuery<AddressQueryParams>,
) -> ApiResult {
    engine
        .untaint(&params.address)
        .await
        .map_err(failed("untaint"))?;
    done("Untaint complete!")
}

pub async fn version<E: Engine>(State(engine): State<AppState<E>>) -> ApiResult {
    let versions = engine.version().await.map_err(failed("version"))?;
    respond(
        "Version complete!",
        OperationOutput::Version(VersionOutput::from(versions)),
    )
}

pub async fn workspace_show<E: Engine>(State(engine): State<AppState<E>>) -> ApiResult {
    let current = engine
        .workspace_show()
        .await
        .map_err(failed("workspace show"))?;
    respond(
        "Workspace show complete!",
        OperationOutput::WorkspaceShow(WorkspaceShowOutput { current }),
    )
}

pub async fn workspace_list<E: Engine>(State(engine): State<AppState<E>>) -> ApiResult {
    let (list, current) = engine
        .workspace_list()
        .await
        .map_err(failed("workspace list"))?;
    respond(
        "Workspace list complete!",
        OperationOutput::WorkspaceList(WorkspaceListOutput { current, list }),
    )
}

pub async fn workspace_select<E: Engine>(
    State(engine): State<AppState<E>>,
    ValidQuery(params): ValidQuery<WorkspaceQueryParams>,
) -> ApiResult {
    engine
        .workspace_select(&params.name)
        .await
        .map_err(failed("workspace select"))?;
    done("Workspace select complete!")
}

pub async fn workspace_new<E: Engine>(
    State(engine): State<AppState<E>>,
    ValidQuery(params): ValidQuery<WorkspaceQueryParams>,
) -> ApiResult {
    log::info!("creating workspace {}", params.name);
    engine
        .workspace_new(&params.name)
        .await
        .map_err(failed("workspace new"))?;
    done("Workspace new complete!")
}

pub async fn workspace_delete<E: Engine>(
    State(engine): State<AppState<E>>,
    ValidQuery(params): ValidQuery<WorkspaceQueryParams>,
) -> ApiResult {
    log::info!("deleting workspace {}", params.name);
    engine
        .workspace_delete(&params.name)
        .await
        .map_err(failed("workspace delete"))?;
    done("Workspace delete complete!")
}
