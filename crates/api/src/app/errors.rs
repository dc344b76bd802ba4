//! Consistent error responses.
//!
//! The canonical error body is `{"error": string}` with an optional
//! `"details"` string for validation failures. Store and library messages
//! never reach a response body; they are logged here instead.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use user_order_orders::OrderServiceError;
use user_order_users::UserServiceError;

/// Response-extension tag carrying the error string of a failed request so
/// the request logger can fold it into its per-request line.
#[derive(Debug, Clone)]
pub struct RequestError(pub String);

pub fn json_error(status: StatusCode, error: impl Into<String>) -> axum::response::Response {
    let error = error.into();
    let mut resp = (status, axum::Json(json!({ "error": &error }))).into_response();
    resp.extensions_mut().insert(RequestError(error));
    resp
}

pub fn json_error_with_details(
    status: StatusCode,
    error: impl Into<String>,
    details: impl Into<String>,
) -> axum::response::Response {
    let error = error.into();
    let details = details.into();
    let mut resp = (
        status,
        axum::Json(json!({
            "error": &error,
            "details": &details,
        })),
    )
        .into_response();
    resp.extensions_mut()
        .insert(RequestError(format!("{error}: {details}")));
    resp
}

/// A body that failed to bind: 400 with the extractor's human message in
/// `details`.
pub fn bind_error(rejection: JsonRejection) -> axum::response::Response {
    json_error_with_details(
        StatusCode::BAD_REQUEST,
        "invalid request body",
        rejection.body_text(),
    )
}

pub fn user_error_response(err: UserServiceError) -> axum::response::Response {
    match err {
        UserServiceError::InvalidInput(details) => {
            json_error_with_details(StatusCode::BAD_REQUEST, "invalid input", details)
        }
        UserServiceError::InvalidCredentials => {
            json_error(StatusCode::UNAUTHORIZED, "invalid credentials")
        }
        UserServiceError::NotFound => json_error(StatusCode::NOT_FOUND, "user not found"),
        UserServiceError::AlreadyExists => json_error(
            StatusCode::CONFLICT,
            "user with this email already exists",
        ),
        UserServiceError::EmailTaken => json_error(StatusCode::CONFLICT, "email already taken"),
        UserServiceError::Db(msg) => {
            tracing::error!(error = %msg, "user store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
        UserServiceError::Internal(msg) => {
            tracing::error!(error = %msg, "user service failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
    }
}

pub fn order_error_response(err: OrderServiceError) -> axum::response::Response {
    match err {
        OrderServiceError::InvalidInput(details) => {
            json_error_with_details(StatusCode::BAD_REQUEST, "invalid input", details)
        }
        OrderServiceError::NotFound => json_error(StatusCode::NOT_FOUND, "order not found"),
        OrderServiceError::Db(msg) => {
            tracing::error!(error = %msg, "order store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
    }
}
