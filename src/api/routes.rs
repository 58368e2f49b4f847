use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers;
use crate::engine::Engine;

pub fn create_router<E: Engine + 'static>() -> Router<Arc<E>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Lifecycle
        .route("/init", post(handlers::init::<E>))
        .route("/validate", post(handlers::validate::<E>))
        .route("/plan", post(handlers::plan::<E>))
        .route("/apply", post(handlers::apply::<E>))
        .route("/destroy", post(handlers::destroy::<E>))
        .route("/fmt", post(handlers::fmt::<E>))
        .route("/force-unlock", post(handlers::force_unlock::<E>))
        .route("/get", post(handlers::get_modules::<E>))
        .route("/graph", post(handlers::graph::<E>))
        .route("/import", post(handlers::import::<E>))
        .route("/output", get(handlers::output::<E>))
        // Providers
        .route("/providers/schema", get(handlers::providers_schema::<E>))
        .route("/providers/lock", post(handlers::providers_lock::<E>))
        // State
        .route("/show", get(handlers::show::<E>))
        .route("/state/rm", delete(handlers::state_rm::<E>))
        .route("/state/mv", post(handlers::state_mv::<E>))
        .route("/untaint", delete(handlers::untaint::<E>))
        .route("/version", get(handlers::version::<E>))
        // Workspaces
        .route("/workspace/show", get(handlers::workspace_show::<E>))
        .route("/workspace/list", get(handlers::workspace_list::<E>))
        .route("/workspace/select", post(handlers::workspace_select::<E>))
        .route("/workspace/new", post(handlers::workspace_new::<E>))
        .route("/workspace/delete", delete(handlers::workspace_delete::<E>))
}
