//! Order routes (entirely owner-scoped).

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

/// Parse `/:id` and enforce ownership.
fn scope_user(raw_user_id: &str, auth: &AuthContext) -> Result<u32, axum::response::Response> {
    let user_id = common::parse_id(raw_user_id)?;
    common::require_owner(user_id, auth)?;
    Ok(user_id)
}

/// Parse `/:id/orders/:order_id` and enforce ownership. Both ids are
/// shape-checked before the owner comparison.
fn scope_order(
    raw_user_id: &str,
    raw_order_id: &str,
    auth: &AuthContext,
) -> Result<(u32, u32), axum::response::Response> {
    let user_id = common::parse_id(raw_user_id)?;
    let order_id = common::parse_id(raw_order_id)?;
    common::require_owner(user_id, auth)?;
    Ok((user_id, order_id))
}

pub async fn create_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    body: Result<Json<dto::CreateOrderRequest>, JsonRejection>,
) -> axum::response::Response {
    let user_id = match scope_user(&id, &auth) {
        Ok(user_id) => user_id,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::bind_error(rejection),
    };

    // Owner comes from the verified token, never from the body.
    match services.orders.create(user_id, body.into()).await {
        Ok(order) => {
            (StatusCode::CREATED, Json(dto::OrderResponse::from(&order))).into_response()
        }
        Err(e) => errors::order_error_response(e),
    }
}

pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    let user_id = match scope_user(&id, &auth) {
        Ok(user_id) => user_id,
        Err(resp) => return resp,
    };
    let page = common::parse_page(&params);

    match services.orders.list_by_user(user_id, page).await {
        Ok(result) => Json(dto::order_page_body(page, &result)).into_response(),
        Err(e) => errors::order_error_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path((id, order_id)): Path<(String, String)>,
) -> axum::response::Response {
    let (user_id, order_id) = match scope_order(&id, &order_id, &auth) {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };

    match services.orders.get_by_id(order_id, user_id).await {
        Ok(order) => Json(dto::OrderResponse::from(&order)).into_response(),
        Err(e) => errors::order_error_response(e),
    }
}

pub async fn update_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path((id, order_id)): Path<(String, String)>,
    body: Result<Json<dto::UpdateOrderRequest>, JsonRejection>,
) -> axum::response::Response {
    let (user_id, order_id) = match scope_order(&id, &order_id, &auth) {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::bind_error(rejection),
    };

    match services.orders.update(order_id, user_id, body.into()).await {
        Ok(outcome) => {
            Json(dto::OrderResponse::from(&outcome.into_inner())).into_response()
        }
        Err(e) => errors::order_error_response(e),
    }
}

pub async fn delete_order(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(auth): Extension<AuthContext>,
    Path((id, order_id)): Path<(String, String)>,
) -> axum::response::Response {
    let (user_id, order_id) = match scope_order(&id, &order_id, &auth) {
        Ok(ids) => ids,
        Err(resp) => return resp,
    };

    match services.orders.delete(order_id, user_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::order_error_response(e),
    }
}
