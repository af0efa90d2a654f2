//! Goal operations behind the REST surface.
//!
//! [`GoalController`] maps each request onto one query or one load/mutate/persist sequence
//! against a [`GoalStore`]. It carries no mutable state of its own; everything it holds is
//! injected at construction.
//!
//! Only the list-style reads and `create` take the caller's user id. Operations addressed by goal
//! id (`get`, `update`, `remove` and the note operations) are not scoped to an owner: any caller
//! holding the id reaches the goal.

use crate::config::CoreConfig;
use crate::constants::RESERVED_GOAL_IDS;
use crate::error::{GoalError, GoalResult};
use crate::goal::{Goal, GoalChanges, GoalUpdate, NewComment, NewGoal};
use crate::ids::{CommentId, GoalId};
use crate::markdown::{render_comments, MarkdownRenderer, MarkdownService};
use crate::query::{DueDateRange, GoalQuery, SortOrder, StatusFilter, StatusSets};
use crate::stores::{open_store, GoalStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct GoalController {
    store: Arc<dyn GoalStore>,
    renderer: Arc<dyn MarkdownRenderer>,
    statuses: StatusSets,
}

impl GoalController {
    pub fn new(
        store: Arc<dyn GoalStore>,
        renderer: Arc<dyn MarkdownRenderer>,
        statuses: StatusSets,
    ) -> Self {
        Self {
            store,
            renderer,
            statuses,
        }
    }

    /// Builds a controller over the store selected by `cfg`, rendering with [`MarkdownService`].
    pub fn from_config(cfg: &CoreConfig) -> Self {
        tracing::info!(
            "goal store: {} ({}), archived statuses: {:?}",
            cfg.store_kind(),
            cfg.goals_dir().display(),
            cfg.archived_statuses()
        );
        Self::new(
            open_store(cfg),
            Arc::new(MarkdownService::new()),
            cfg.status_sets(),
        )
    }

    async fn query_by_status_and_due(
        &self,
        user_id: &str,
        status: &StatusFilter,
        due: DueDateRange,
    ) -> GoalResult<Vec<Goal>> {
        let query = GoalQuery::for_user(user_id)
            .with_status(status.clone())
            .with_due(due);
        self.store.find(&query).await
    }

    /// The user's goals whose status is active.
    pub async fn list(&self, user_id: &str) -> GoalResult<Vec<Goal>> {
        self.query_by_status_and_due(user_id, self.statuses.active(), DueDateRange::unbounded())
            .await
    }

    /// The user's goals whose status is archived.
    pub async fn list_archived(&self, user_id: &str) -> GoalResult<Vec<Goal>> {
        self.query_by_status_and_due(user_id, self.statuses.archived(), DueDateRange::unbounded())
            .await
    }

    /// Active goals due after `start` and up to and including `stop`.
    ///
    /// Both bounds are epoch milliseconds as path text; `"0"` leaves that side open.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::InvalidInput`] if a bound cannot be parsed.
    pub async fn by_due_date_range(
        &self,
        user_id: &str,
        start: &str,
        stop: &str,
    ) -> GoalResult<Vec<Goal>> {
        let due = DueDateRange::from_bounds(start, stop)?;
        self.query_by_status_and_due(user_id, self.statuses.active(), due)
            .await
    }

    /// The active goal with the earliest due date still in the future.
    pub async fn upcoming_one(&self, user_id: &str) -> GoalResult<Option<Goal>> {
        self.upcoming_one_at(user_id, Utc::now()).await
    }

    /// [`upcoming_one`](Self::upcoming_one) evaluated at `now`.
    pub async fn upcoming_one_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> GoalResult<Option<Goal>> {
        let query = GoalQuery::for_user(user_id)
            .with_status(self.statuses.active().clone())
            .with_due(DueDateRange::after(now))
            .sorted(SortOrder::DueDateAscending)
            .limit(1);
        Ok(self.store.find(&query).await?.into_iter().next())
    }

    /// Fetches a goal with its comments rendered to HTML.
    ///
    /// The rendered copy is only returned, never written back.
    pub async fn get(&self, id: &GoalId) -> GoalResult<Option<Goal>> {
        let goal = self.store.find_by_id(id).await?;
        Ok(goal.map(|g| render_comments(self.renderer.as_ref(), g)))
    }

    /// Creates a goal owned by `user_id`.
    ///
    /// A client-supplied id is honoured, replacing the fields of any goal already stored under it
    /// as long as that goal also belongs to `user_id`. The stored comments are kept on replace.
    /// `createDate` defaults to now.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::InvalidInput`] for an id reserved by a collection route, and
    /// [`GoalError::OwnershipMismatch`] if the body names a different owner or if the supplied id
    /// belongs to another user's goal.
    pub async fn create(&self, user_id: &str, input: NewGoal) -> GoalResult<Goal> {
        if let Some(claimed) = input.user_id.as_deref() {
            if claimed != user_id {
                tracing::warn!("user {} tried to create a goal for {}", user_id, claimed);
                return Err(GoalError::OwnershipMismatch);
            }
        }

        let (id, comments) = match input.id {
            Some(id) => {
                if RESERVED_GOAL_IDS.contains(&id.as_str()) {
                    return Err(GoalError::InvalidInput(format!(
                        "goal id '{id}' is reserved"
                    )));
                }
                match self.store.find_by_id(&id).await? {
                    Some(existing) if existing.user_id != user_id => {
                        tracing::warn!("user {} tried to overwrite goal {}", user_id, id);
                        return Err(GoalError::OwnershipMismatch);
                    }
                    Some(existing) => (id, existing.comments),
                    None => (id, Vec::new()),
                }
            }
            None => (GoalId::generate(), Vec::new()),
        };

        let goal = Goal {
            id,
            user_id: user_id.to_owned(),
            title: input.title,
            description: input.description.unwrap_or_default(),
            goal_type: input.goal_type,
            status: input.status,
            due_date: input.due_date,
            create_date: Some(input.create_date.unwrap_or_else(Utc::now)),
            comments,
        };
        let saved = self.store.save(goal).await?;
        tracing::info!("created goal {} for user {}", saved.id, saved.user_id);
        Ok(saved)
    }

    /// Applies a partial change and returns the updated goal, or `None` if there is no such goal.
    pub async fn update(&self, id: &GoalId, changes: GoalChanges) -> GoalResult<Option<Goal>> {
        let update = GoalUpdate::from(changes);
        let updated = self.store.find_one_and_update(id, &update).await?;
        if updated.is_some() {
            tracing::debug!("updated goal {}", id);
        }
        Ok(updated)
    }

    /// Deletes a goal and returns it as it was before deletion.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::NotFound`] if there is no such goal.
    pub async fn remove(&self, id: &GoalId) -> GoalResult<Goal> {
        let goal = self.load(id).await?;
        self.store.remove(id).await?;
        tracing::info!("removed goal {}", id);
        Ok(goal)
    }

    /// Appends a comment and persists the goal.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::NotFound`] if there is no such goal.
    pub async fn create_note(&self, id: &GoalId, note: NewComment) -> GoalResult<Goal> {
        let mut goal = self.load(id).await?;
        goal.comments.push(note.into_comment());
        self.store.save(goal).await
    }

    /// Removes the comment `note_id` (if present) and persists the goal.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::NotFound`] if there is no such goal.
    pub async fn remove_note(&self, id: &GoalId, note_id: &CommentId) -> GoalResult<Goal> {
        let mut goal = self.load(id).await?;
        if !goal.remove_comment(note_id) {
            tracing::debug!("goal {} has no comment {}", id, note_id);
        }
        self.store.save(goal).await
    }

    async fn load(&self, id: &GoalId) -> GoalResult<Goal> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| GoalError::NotFound(id.to_string()))
    }
}
