use axum::{
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod common;
pub mod orders;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints (mounted under `/api`).
pub fn protected_router() -> Router {
    Router::new()
        .route("/users", get(users::list_users))
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/users/:id/orders",
            post(orders::create_order).get(orders::list_orders),
        )
        .route(
            "/users/:id/orders/:order_id",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        )
}
