//! In-process goal store.

use super::GoalStore;
use crate::error::GoalResult;
use crate::goal::{Goal, GoalUpdate};
use crate::ids::GoalId;
use crate::query::GoalQuery;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Goals held in memory in insertion order.
///
/// Replacing a goal through [`GoalStore::save`] keeps its original position.
#[derive(Debug, Default)]
pub struct MemoryGoalStore {
    goals: RwLock<Vec<Goal>>,
}

impl MemoryGoalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GoalStore for MemoryGoalStore {
    async fn find(&self, query: &GoalQuery) -> GoalResult<Vec<Goal>> {
        let goals = self.goals.read().await;
        Ok(query.apply(goals.iter().cloned()))
    }

    async fn find_by_id(&self, id: &GoalId) -> GoalResult<Option<Goal>> {
        let goals = self.goals.read().await;
        Ok(goals.iter().find(|g| &g.id == id).cloned())
    }

    async fn find_one_and_update(
        &self,
        id: &GoalId,
        update: &GoalUpdate,
    ) -> GoalResult<Option<Goal>> {
        let mut goals = self.goals.write().await;
        Ok(goals.iter_mut().find(|g| &g.id == id).map(|goal| {
            update.apply_to(goal);
            goal.clone()
        }))
    }

    async fn save(&self, goal: Goal) -> GoalResult<Goal> {
        let mut goals = self.goals.write().await;
        match goals.iter_mut().find(|g| g.id == goal.id) {
            Some(existing) => *existing = goal.clone(),
            None => goals.push(goal.clone()),
        }
        Ok(goal)
    }

    async fn remove(&self, id: &GoalId) -> GoalResult<()> {
        let mut goals = self.goals.write().await;
        goals.retain(|g| &g.id != id);
        Ok(())
    }
}
