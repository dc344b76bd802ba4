//! Request-scoped values.

/// Authenticated identity for a request.
///
/// Inserted by the auth middleware after token verification and read by
/// every handler on a protected route. Carried in request extensions, never
/// in globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    user_id: u32,
    email: String,
}

impl AuthContext {
    pub fn new(user_id: u32, email: String) -> Self {
        Self { user_id, email }
    }

    pub fn user_id(&self) -> u32 {
        self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}
