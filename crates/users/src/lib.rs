//! `user-order-users` — business rules for the user aggregate.
//!
//! Registration, login (credential check + token minting), selective
//! profile update, listing with clamped pagination, and soft-delete.

pub mod service;

pub use service::{
    Login, RegisterUser, TokenConfig, UserPatch, UserService, UserServiceError,
};
