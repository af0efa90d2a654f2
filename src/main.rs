use anyhow::Context;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use api_shared::TokenRegistry;
use goals_core::config::{archived_statuses_from_env_value, store_kind_from_env_value};
use goals_core::{CoreConfig, GoalController, DEFAULT_GOAL_DATA_DIR};

/// Main entry point for the goals service
///
/// Resolves configuration from the environment once, builds the goal controller over the
/// configured store and serves the REST API.
///
/// # Environment Variables
/// - `GOALS_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `GOALS_STORE`: `files` or `memory` (default: "files")
/// - `GOAL_DATA_DIR`: Directory for goal documents (default: "goal_data")
/// - `GOALS_ARCHIVED_STATUSES`: Comma-separated archived statuses (default: "completed,abandoned")
/// - `GOALS_API_TOKENS`: Comma-separated `token=userId` pairs; required
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("goals=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("GOALS_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let goal_data_dir = std::env::var("GOAL_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_GOAL_DATA_DIR));
    let store_kind = store_kind_from_env_value(std::env::var("GOALS_STORE").ok())?;
    let archived = archived_statuses_from_env_value(std::env::var("GOALS_ARCHIVED_STATUSES").ok())?;
    let cfg = CoreConfig::new(goal_data_dir, store_kind, archived)?;

    let tokens = std::env::var("GOALS_API_TOKENS").context("GOALS_API_TOKENS must be set")?;
    let tokens = TokenRegistry::from_env_value(&tokens).context("invalid GOALS_API_TOKENS")?;

    let controller = GoalController::from_config(&cfg);
    let app = api_rest::router(AppState::new(controller, tokens));

    tracing::info!("++ Starting goals REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr)
        .await
        .with_context(|| format!("failed to bind {rest_addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
