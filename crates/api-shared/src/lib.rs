//! # API Shared
//!
//! Shared utilities and definitions for the goals APIs.
//!
//! Contains:
//! - Wire types for request and response bodies (`wire` module)
//! - Shared services like `HealthService`
//! - Token authentication (`auth` module)
//!
//! Used by `api-rest` for common functionality.

pub mod auth;
pub mod health;
pub mod timestamp;
pub mod wire;

pub use auth::{AuthError, AuthenticatedUser, TokenRegistry};
pub use health::HealthService;
pub use wire::*;
