pub mod api;
pub mod config;
pub mod engine;
pub mod logic;
pub mod model;

// Export API types
pub use api::handlers;
pub use api::routes;
pub use api::ApiError;

pub use config::AppConfig;
pub use engine::{Engine, EngineFailure, EngineOption, HandleCache, Terraform};
pub use model::*;

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

use crate::api::request_log::{handle_panic, log_requests, TrustedProxy};

/// Initialize logging; `debug_mode` lowers the default filter, `RUST_LOG` wins
pub fn init_logging(debug_mode: bool) {
    let default_filter = if debug_mode { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Build the complete application around one engine handle
pub fn build_app<E: Engine + 'static>(
    engine: Arc<E>,
    config: &AppConfig,
) -> anyhow::Result<Router> {
    let mut router = api::routes::create_router::<E>();
    if config.debug_mode {
        let docs = api::docs::docs_router(&config.swagger_url, &config.version);
        router = router.merge(docs);
    }

    let proxy = TrustedProxy(config.trusted_proxy_addr()?);
    Ok(router
        .layer(axum::middleware::from_fn_with_state(proxy, log_requests))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(engine))
}

/// Create the process-wide tool handle and compare its version with the
/// configured one
pub async fn setup_terraform(config: &AppConfig) -> anyhow::Result<Terraform> {
    let terraform = Terraform::new(&config.workdir, &config.terraform_exec_path)?;

    match terraform.version().await {
        Ok(versions) if versions.terraform_version != config.terraform_version => log::warn!(
            "configured Terraform version {} but {} reports {}",
            config.terraform_version,
            terraform.exec_path().display(),
            versions.terraform_version
        ),
        Ok(versions) => log::info!("using Terraform {}", versions.terraform_version),
        Err(e) => log::warn!("could not determine Terraform version: {}", e),
    }

    Ok(terraform)
}

pub async fn serve_app(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log::info!("Terraform API running on http://{}", bind_address);
    if config.debug_mode {
        log::info!(
            "API documentation available at http://{}/{}",
            bind_address,
            config.swagger_url
        );
    }

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("shutting down");
}

/// Load configuration from the environment and serve until interrupted
pub async fn run_server() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(config.debug_mode);
    let config = config.resolve()?;
    log::info!(
        "managing {} with Terraform {}",
        config.workdir.display(),
        config.terraform_version
    );

    let terraform = Arc::new(setup_terraform(&config).await?);
    let app = build_app(terraform, &config)?;
    serve_app(app, &config).await
}
