//! Public routes: registration and login.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::RegisterRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::bind_error(rejection),
    };

    match services.users.register(body.into()).await {
        Ok(user) => {
            (StatusCode::CREATED, Json(dto::UserResponse::from(&user))).into_response()
        }
        Err(e) => errors::user_error_response(e),
    }
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::bind_error(rejection),
    };

    match services.users.login(body.into()).await {
        Ok(token) => Json(dto::TokenResponse { token }).into_response(),
        Err(e) => errors::user_error_response(e),
    }
}
