//! Request pipeline filters: panic recovery, structured request logging,
//! and bearer-token authentication.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use futures_util::FutureExt;

use user_order_auth::{verify_token, TokenError};

use crate::app::errors::{json_error, RequestError};
use crate::context::AuthContext;

/// State for the auth filter: the token secret, fixed at startup.
#[derive(Clone)]
pub struct AuthState {
    pub jwt_secret: Arc<str>,
}

/// Authentication filter for protected routes.
///
/// Extracts and verifies the bearer token, then injects [`AuthContext`]
/// into the request scope. Public routes (register, login, health) are not
/// behind this filter.
pub async fn require_auth(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Ok(token) => token,
        Err(resp) => return resp,
    };

    if state.jwt_secret.is_empty() {
        tracing::error!("jwt secret is empty; refusing to verify tokens");
        return json_error(StatusCode::INTERNAL_SERVER_ERROR, "server configuration error");
    }

    let claims = match verify_token(token, &state.jwt_secret) {
        Ok(claims) => claims,
        Err(TokenError::Expired) => {
            return json_error(StatusCode::UNAUTHORIZED, "token expired");
        }
        Err(_) => return json_error(StatusCode::UNAUTHORIZED, "invalid token"),
    };

    req.extensions_mut()
        .insert(AuthContext::new(claims.user_id, claims.email));

    next.run(req).await
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, Response> {
    let Some(header) = headers.get(header::AUTHORIZATION) else {
        return Err(json_error(
            StatusCode::UNAUTHORIZED,
            "authorization header required",
        ));
    };

    // Prefix match is exact and case-sensitive.
    header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| json_error(StatusCode::UNAUTHORIZED, "bearer token required"))
}

/// Request logger: one structured line per completed request, level keyed
/// off the response status.
pub async fn log_requests(
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let target = req
        .uri()
        .path_and_query()
        .map(|pq| pq.to_string())
        .unwrap_or_else(|| req.uri().path().to_string());
    let client_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .unwrap_or_else(|| "-".to_string());

    let res = next.run(req).await;

    let status = res.status();
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    // Error responses tag themselves with the message they rendered.
    let error = res
        .extensions()
        .get::<RequestError>()
        .map_or("-", |e| e.0.as_str());

    if status.is_server_error() {
        tracing::error!(%method, target, status = status.as_u16(), latency_ms, client_ip, error, "request");
    } else if status.is_client_error() {
        tracing::warn!(%method, target, status = status.as_u16(), latency_ms, client_ip, error, "request");
    } else {
        tracing::info!(%method, target, status = status.as_u16(), latency_ms, client_ip, error, "request");
    }

    res
}

/// Recovery filter: a panicking handler becomes a generic 500 instead of a
/// dropped connection. The panic payload goes to the log only.
pub async fn recover_panics(
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    match std::panic::AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(res) => res,
        Err(panic) => {
            let msg = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            tracing::error!(panic = %msg, "handler panicked");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
    }
}
