//! Goal persistence.
//!
//! [`GoalStore`] is the seam between the controller and a document collection. Every store
//! filters through [`GoalQuery::apply`] and patches through [`GoalUpdate::apply_to`].
//!
//! No store offers transactions across calls. A load followed by a `save` of the same goal races
//! with any other writer, and the last `save` wins.

pub mod files;
pub mod memory;

use crate::config::{CoreConfig, StoreKind};
use crate::error::GoalResult;
use crate::goal::{Goal, GoalUpdate};
use crate::ids::GoalId;
use crate::query::GoalQuery;
use async_trait::async_trait;
use std::sync::Arc;

pub use files::FileGoalStore;
pub use memory::MemoryGoalStore;

#[async_trait]
pub trait GoalStore: Send + Sync {
    /// Returns the goals matching `query`, sorted and limited as it requests.
    async fn find(&self, query: &GoalQuery) -> GoalResult<Vec<Goal>>;

    /// Returns the goal with `id`, or `None` if there is none.
    async fn find_by_id(&self, id: &GoalId) -> GoalResult<Option<Goal>>;

    /// Applies `update` to the goal with `id` and returns the updated record, or `None` if there
    /// is no such goal.
    async fn find_one_and_update(
        &self,
        id: &GoalId,
        update: &GoalUpdate,
    ) -> GoalResult<Option<Goal>>;

    /// Inserts `goal`, or replaces the stored goal with the same id.
    async fn save(&self, goal: Goal) -> GoalResult<Goal>;

    /// Deletes the goal with `id` together with its comments. Deleting a missing goal succeeds.
    async fn remove(&self, id: &GoalId) -> GoalResult<()>;
}

/// Opens the store selected by `cfg`.
pub fn open_store(cfg: &CoreConfig) -> Arc<dyn GoalStore> {
    match cfg.store_kind() {
        StoreKind::Files => Arc::new(FileGoalStore::new(cfg)),
        StoreKind::Memory => Arc::new(MemoryGoalStore::new()),
    }
}
