//! Service bundle shared by all handlers.

use std::sync::Arc;

use user_order_core::{OrderRepository, UserRepository};
use user_order_orders::OrderService;
use user_order_users::{TokenConfig, UserService};

/// Everything a handler needs, wired once at startup and carried through
/// request extensions.
pub struct AppServices {
    pub users: UserService,
    pub orders: OrderService,
    jwt_secret: String,
}

impl AppServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        order_repo: Arc<dyn OrderRepository>,
        token: TokenConfig,
    ) -> Self {
        let jwt_secret = token.secret.clone();
        Self {
            users: UserService::new(user_repo, token),
            orders: OrderService::new(order_repo),
            jwt_secret,
        }
    }

    /// Secret the auth filter verifies against (same one the user service
    /// signs with).
    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }
}
