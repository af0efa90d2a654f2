//! Constants used throughout the goals core crate.
//!
//! This module contains path, filename and default-value constants to keep storage layout and
//! configuration defaults consistent across the codebase.

/// Default directory for goal data storage when no explicit directory is configured.
pub const DEFAULT_GOAL_DATA_DIR: &str = "goal_data";

/// Directory name (under the data directory) holding the sharded goal documents.
pub const GOALS_DIR_NAME: &str = "goals";

/// Filename of the JSON document stored for each goal.
pub const GOAL_JSON_FILENAME: &str = "goal.json";

/// Statuses treated as archived when none are configured.
pub const DEFAULT_ARCHIVED_STATUSES: &[&str] = &["completed", "abandoned"];

/// Upper bound on the length of goal and comment identifiers.
pub const MAX_ID_LEN: usize = 64;

/// Path segments under `/api/goals/` taken by collection routes; a goal cannot be created with
/// one of these as its id.
pub const RESERVED_GOAL_IDS: &[&str] = &["archived", "upcoming"];

/// Sentinel used by due-date range requests to mean "no bound on this side".
pub const UNBOUNDED_SENTINEL: &str = "0";
