//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handling never reads process-wide environment variables.

use crate::constants::{DEFAULT_ARCHIVED_STATUSES, GOALS_DIR_NAME};
use crate::query::StatusSets;
use crate::{GoalError, GoalResult};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which [`GoalStore`](crate::GoalStore) backs the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StoreKind {
    /// One JSON document per goal under the data directory.
    #[default]
    Files,
    /// Process memory; contents are lost on exit.
    Memory,
}

impl FromStr for StoreKind {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "files" | "file" => Ok(StoreKind::Files),
            "memory" | "mem" => Ok(StoreKind::Memory),
            other => Err(GoalError::InvalidInput(format!(
                "unknown store kind '{other}' (expected 'files' or 'memory')"
            ))),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Files => f.write_str("files"),
            StoreKind::Memory => f.write_str("memory"),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    goal_data_dir: PathBuf,
    store_kind: StoreKind,
    archived_statuses: Vec<String>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::InvalidInput`] if `archived_statuses` is empty or contains a blank
    /// status.
    pub fn new(
        goal_data_dir: PathBuf,
        store_kind: StoreKind,
        archived_statuses: Vec<String>,
    ) -> GoalResult<Self> {
        if archived_statuses.is_empty() {
            return Err(GoalError::InvalidInput(
                "at least one archived status must be configured".into(),
            ));
        }
        if archived_statuses.iter().any(|s| s.trim().is_empty()) {
            return Err(GoalError::InvalidInput(
                "archived statuses cannot be blank".into(),
            ));
        }

        Ok(Self {
            goal_data_dir,
            store_kind,
            archived_statuses,
        })
    }

    pub fn goals_dir(&self) -> PathBuf {
        self.goal_data_dir.join(GOALS_DIR_NAME)
    }

    pub fn store_kind(&self) -> StoreKind {
        self.store_kind
    }

    pub fn archived_statuses(&self) -> &[String] {
        &self.archived_statuses
    }

    pub fn status_sets(&self) -> StatusSets {
        StatusSets::from_archived(self.archived_statuses.iter().cloned())
    }
}

/// Parse the archived status list from an optional comma-separated value.
///
/// If `value` is `None` or blank, returns [`DEFAULT_ARCHIVED_STATUSES`]. Entries are trimmed and
/// empty entries dropped.
pub fn archived_statuses_from_env_value(value: Option<String>) -> GoalResult<Vec<String>> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(value) = value else {
        return Ok(DEFAULT_ARCHIVED_STATUSES
            .iter()
            .map(|s| s.to_string())
            .collect());
    };

    let statuses: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if statuses.is_empty() {
        return Err(GoalError::InvalidInput(format!(
            "archived status list contains no statuses: '{value}'"
        )));
    }
    Ok(statuses)
}

/// Parse the store kind from an optional string value, defaulting to [`StoreKind::Files`].
pub fn store_kind_from_env_value(value: Option<String>) -> GoalResult<StoreKind> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<StoreKind>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archived_statuses_default_when_unset() {
        let statuses = archived_statuses_from_env_value(None).unwrap();
        assert_eq!(statuses, vec!["completed".to_string(), "abandoned".to_string()]);

        let statuses = archived_statuses_from_env_value(Some("   ".into())).unwrap();
        assert_eq!(statuses.len(), 2);
    }

    #[test]
    fn test_archived_statuses_trims_entries() {
        let statuses = archived_statuses_from_env_value(Some(" done , dropped,,".into())).unwrap();
        assert_eq!(statuses, vec!["done".to_string(), "dropped".to_string()]);
    }

    #[test]
    fn test_archived_statuses_rejects_only_separators() {
        assert!(archived_statuses_from_env_value(Some(",,".into())).is_err());
    }

    #[test]
    fn test_store_kind_parsing() {
        assert_eq!(store_kind_from_env_value(None).unwrap(), StoreKind::Files);
        assert_eq!(
            store_kind_from_env_value(Some("Memory".into())).unwrap(),
            StoreKind::Memory
        );
        assert!(store_kind_from_env_value(Some("mongo".into())).is_err());
    }

    #[test]
    fn test_core_config_rejects_empty_statuses() {
        let result = CoreConfig::new(PathBuf::from("/tmp/goals"), StoreKind::Memory, vec![]);
        assert!(matches!(result, Err(GoalError::InvalidInput(_))));
    }

    #[test]
    fn test_core_config_paths_and_status_sets() {
        let cfg = CoreConfig::new(
            PathBuf::from("/srv/goal_data"),
            StoreKind::Files,
            vec!["completed".into()],
        )
        .unwrap();

        assert_eq!(cfg.goals_dir(), PathBuf::from("/srv/goal_data/goals"));
        assert!(cfg.status_sets().archived().matches(Some("completed")));
        assert!(cfg.status_sets().active().matches(Some("in-progress")));
    }
}
