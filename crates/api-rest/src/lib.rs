//! # API REST
//!
//! HTTP surface of the goals service.
//!
//! Routes are authenticated by [`auth::require_user`], delegate to
//! [`GoalController`](goals_core::GoalController) and answer with the JSON envelopes from
//! `api-shared`. Core errors are mapped to status codes in [`envelope`].

use api_shared::TokenRegistry;
use goals_core::GoalController;
use std::sync::Arc;

pub mod auth;
pub mod envelope;
pub mod routes;

pub use routes::{router, ApiDoc};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    controller: GoalController,
    tokens: Arc<TokenRegistry>,
}

impl AppState {
    pub fn new(controller: GoalController, tokens: TokenRegistry) -> Self {
        Self {
            controller,
            tokens: Arc::new(tokens),
        }
    }

    pub fn controller(&self) -> &GoalController {
        &self.controller
    }

    pub fn tokens(&self) -> &TokenRegistry {
        &self.tokens
    }
}
