//! `user-order-auth` — credential and token primitives.
//!
//! This crate is intentionally decoupled from HTTP and storage: it hashes
//! and verifies passwords, and issues/verifies the HS256 bearer tokens the
//! API hands out at login.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password, PasswordError};
pub use token::{issue_token, verify_token, Claims, TokenError, TOKEN_ISSUER};
