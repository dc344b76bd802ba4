//! Request/response DTOs and JSON mapping helpers.
//!
//! Response DTOs are the only things serialized to clients; neither carries
//! the password hash, so it cannot leak by construction.

use serde::{Deserialize, Serialize};
use serde_json::json;

use user_order_core::{Order, Page, PageRequest, User};
use user_order_orders::{CreateOrder, OrderPatch};
use user_order_users::{Login, RegisterUser, UserPatch};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub age: u32,
    pub password: String,
}

impl From<RegisterRequest> for RegisterUser {
    fn from(r: RegisterRequest) -> Self {
        Self {
            name: r.name,
            email: r.email,
            age: r.age,
            password: r.password,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl From<LoginRequest> for Login {
    fn from(r: LoginRequest) -> Self {
        Self {
            email: r.email,
            password: r.password,
        }
    }
}

/// Absent fields mean "leave untouched" (never a sentinel zero).
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(r: UpdateUserRequest) -> Self {
        Self {
            name: r.name,
            email: r.email,
            age: r.age,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub product_name: String,
    pub quantity: u32,
    pub price: f64,
}

impl From<CreateOrderRequest> for CreateOrder {
    fn from(r: CreateOrderRequest) -> Self {
        Self {
            product_name: r.product_name,
            quantity: r.quantity,
            price: r.price,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrderRequest {
    pub product_name: Option<String>,
    pub quantity: Option<u32>,
    pub price: Option<f64>,
}

impl From<UpdateOrderRequest> for OrderPatch {
    fn from(r: UpdateOrderRequest) -> Self {
        Self {
            product_name: r.product_name,
            quantity: r.quantity,
            price: r.price,
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub age: u32,
}

impl From<&User> for UserResponse {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
            age: u.age,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: u32,
    pub user_id: u32,
    pub product_name: String,
    pub quantity: u32,
    pub price: f64,
}

impl From<&Order> for OrderResponse {
    fn from(o: &Order) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            product_name: o.product_name.clone(),
            quantity: o.quantity,
            price: o.price,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Paginated envelope for users: `{page, limit, total, users}`.
pub fn user_page_body(page: PageRequest, result: &Page<User>) -> serde_json::Value {
    json!({
        "page": page.page(),
        "limit": page.limit(),
        "total": result.total,
        "users": result.items.iter().map(UserResponse::from).collect::<Vec<_>>(),
    })
}

/// Paginated envelope for orders: `{page, limit, total, orders}`.
pub fn order_page_body(page: PageRequest, result: &Page<Order>) -> serde_json::Value {
    json!({
        "page": page.page(),
        "limit": page.limit(),
        "total": result.total,
        "orders": result.items.iter().map(OrderResponse::from).collect::<Vec<_>>(),
    })
}
