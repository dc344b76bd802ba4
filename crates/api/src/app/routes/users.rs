//! User routes.
//!
//! `GET /users/:id` is deliberately self-masking: looking up any id other
//! than your own answers 404, so the route leaks neither profile data nor
//! account existence. The mutating routes answer 403 on an owner mismatch.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::app::routes::common;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::AuthContext;

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    let page = common::parse_page(&params);
    let filter = common::parse_user_filter(&params);

    match services.users.list(page, &filter).await {
        Ok(result) => Json(dto::user_page_body(page, &result)).into_response(),
        Err(e) => errors::user_error_response(e),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match common::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if id != auth.user_id() {
        return errors::json_error(StatusCode::NOT_FOUND, "user not found");
    }

    match services.users.get_by_id(id).await {
        Ok(user) => Json(dto::UserResponse::from(&user)).into_response(),
        Err(e) => errors::user_error_response(e),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdateUserRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match common::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Err(resp) = common::require_owner(id, &auth) {
        return resp;
    }
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::bind_error(rejection),
    };

    // A no-op patch still answers 200 with the current entity.
    match services.users.update(id, body.into()).await {
        Ok(outcome) => {
            Json(dto::UserResponse::from(&outcome.into_inner())).into_response()
        }
        Err(e) => errors::user_error_response(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match common::parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    if let Err(resp) = common::require_owner(id, &auth) {
        return resp;
    }

    match services.users.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::user_error_response(e),
    }
}
