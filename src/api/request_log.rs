use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use std::any::Any;
use std::net::{IpAddr, SocketAddr};
use std::time::Instant;

use crate::model::JsonResult;

/// Proxy whose `X-Forwarded-For` header is believed
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustedProxy(pub Option<IpAddr>);

/// Address of the client, looking through the trusted proxy only
pub fn client_address(
    peer: Option<SocketAddr>,
    headers: &HeaderMap,
    proxy: TrustedProxy,
) -> String {
    let peer_ip = peer.map(|addr| addr.ip());
    if let (Some(peer_ip), Some(trusted)) = (peer_ip, proxy.0) {
        if peer_ip == trusted {
            let forwarded = headers
                .get("x-forwarded-for")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.split(',').next())
                .map(str::trim)
                .filter(|value| !value.is_empty());
            if let Some(client) = forwarded {
                return client.to_string();
            }
        }
    }

    peer_ip
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub async fn log_requests(
    State(proxy): State<TrustedProxy>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let request_id = uuid::Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);
    let client = client_address(peer, request.headers(), proxy);

    let response = next.run(request).await;

    log::info!(
        "{} {} {} {} {:?} {}",
        request_id,
        client,
        method,
        path,
        started.elapsed(),
        response.status().as_u16()
    );
    response
}

/// Turn a handler panic into the error envelope
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    log::error!("handler panicked: {}", detail);

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(JsonResult::message(format!("internal error: {}", detail))),
    )
        .into_response()
}
