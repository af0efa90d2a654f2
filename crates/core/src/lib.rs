//! # Goals Core
//!
//! Core business logic for the goals service.
//!
//! This crate contains the goal data model and its operations:
//! - Goal and comment records, creation inputs and partial updates
//! - Queries by owner, active/archived status and due-date window
//! - The [`GoalStore`] seam with in-memory and sharded JSON file implementations
//! - Markdown rendering of comments for single-goal reads
//! - [`GoalController`], which maps each request onto store calls
//!
//! **No API concerns**: Authentication, HTTP servers, and wire formats belong in `api-rest` or
//! `api-shared`.

pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod goal;
pub mod ids;
pub mod markdown;
pub mod query;
pub mod stores;

pub use config::{CoreConfig, StoreKind};
pub use constants::DEFAULT_GOAL_DATA_DIR;
pub use controller::GoalController;
pub use error::{GoalError, GoalResult};
pub use goal::{Comment, Goal, GoalChanges, GoalUpdate, NewComment, NewGoal};
pub use ids::{CommentId, GoalId};
pub use markdown::{MarkdownRenderer, MarkdownService};
pub use query::{DueDateRange, GoalQuery, SortOrder, StatusFilter, StatusSets};
pub use stores::{FileGoalStore, GoalStore, MemoryGoalStore};
