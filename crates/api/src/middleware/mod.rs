//! Request middleware.

pub mod auth;

pub use auth::{AuthAdmin, BEARER_COOKIE, auth_middleware};
