//! File-backed goal store.
//!
//! Each goal is one JSON document at `<goals_dir>/<s1>/<s2>/<id>/goal.json`, using the sharding
//! scheme described in [`crate::ids`]. Documents are written to a uniquely named temporary file
//! in the goal's directory and renamed into place, so readers never observe a partial write.
//!
//! All filesystem work runs on the blocking thread pool via `tokio::task::spawn_blocking`.

use super::GoalStore;
use crate::config::CoreConfig;
use crate::constants::GOAL_JSON_FILENAME;
use crate::error::{GoalError, GoalResult};
use crate::goal::{Goal, GoalUpdate};
use crate::ids::GoalId;
use crate::query::GoalQuery;
use async_trait::async_trait;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Goal store rooted at a goals directory.
///
/// `find` orders goals by `createDate` and then by id, since the filesystem has no insertion
/// order.
#[derive(Clone, Debug)]
pub struct FileGoalStore {
    goals_dir: PathBuf,
}

impl FileGoalStore {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self::with_goals_dir(cfg.goals_dir())
    }

    pub fn with_goals_dir(goals_dir: impl Into<PathBuf>) -> Self {
        Self {
            goals_dir: goals_dir.into(),
        }
    }

    async fn blocking<T, F>(&self, f: F) -> GoalResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> GoalResult<T> + Send + 'static,
    {
        let goals_dir = self.goals_dir.clone();
        tokio::task::spawn_blocking(move || f(&goals_dir)).await?
    }
}

#[async_trait]
impl GoalStore for FileGoalStore {
    async fn find(&self, query: &GoalQuery) -> GoalResult<Vec<Goal>> {
        let query = query.clone();
        self.blocking(move |dir| Ok(query.apply(load_all(dir)?)))
            .await
    }

    async fn find_by_id(&self, id: &GoalId) -> GoalResult<Option<Goal>> {
        let id = id.clone();
        self.blocking(move |dir| read_goal(&goal_file(dir, &id)))
            .await
    }

    async fn find_one_and_update(
        &self,
        id: &GoalId,
        update: &GoalUpdate,
    ) -> GoalResult<Option<Goal>> {
        let id = id.clone();
        let update = update.clone();
        self.blocking(move |dir| {
            let Some(mut goal) = read_goal(&goal_file(dir, &id))? else {
                return Ok(None);
            };
            update.apply_to(&mut goal);
            write_goal(dir, &goal)?;
            Ok(Some(goal))
        })
        .await
    }

    async fn save(&self, goal: Goal) -> GoalResult<Goal> {
        self.blocking(move |dir| {
            write_goal(dir, &goal)?;
            Ok(goal)
        })
        .await
    }

    async fn remove(&self, id: &GoalId) -> GoalResult<()> {
        let id = id.clone();
        self.blocking(move |dir| {
            match fs::remove_dir_all(id.sharded_dir(dir)) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(GoalError::FileDelete(e)),
            }
        })
        .await
    }
}

fn goal_file(goals_dir: &Path, id: &GoalId) -> PathBuf {
    id.sharded_dir(goals_dir).join(GOAL_JSON_FILENAME)
}

fn read_goal(path: &Path) -> GoalResult<Option<Goal>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(GoalError::FileRead(e)),
    };
    serde_json::from_str(&contents)
        .map(Some)
        .map_err(GoalError::Deserialization)
}

fn write_goal(goals_dir: &Path, goal: &Goal) -> GoalResult<()> {
    let dir = goal.id.sharded_dir(goals_dir);
    fs::create_dir_all(&dir).map_err(GoalError::StorageDirCreation)?;

    let json = serde_json::to_vec_pretty(goal).map_err(GoalError::Serialization)?;
    let tmp = dir.join(format!(
        "{GOAL_JSON_FILENAME}.{}.tmp",
        Uuid::new_v4().simple()
    ));
    fs::write(&tmp, json).map_err(GoalError::FileWrite)?;

    if let Err(e) = fs::rename(&tmp, dir.join(GOAL_JSON_FILENAME)) {
        let _ = fs::remove_file(&tmp);
        return Err(GoalError::FileWrite(e));
    }
    tracing::debug!("wrote goal {} to {}", goal.id, dir.display());
    Ok(())
}

/// Reads every goal under `goals_dir`.
///
/// Documents that cannot be parsed are logged and skipped so one corrupt file does not hide the
/// rest of the collection.
fn load_all(goals_dir: &Path) -> GoalResult<Vec<Goal>> {
    let mut goals = Vec::new();

    let s1_iter = match fs::read_dir(goals_dir) {
        Ok(it) => it,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(goals),
        Err(e) => return Err(GoalError::FileRead(e)),
    };

    for s1 in s1_iter.flatten() {
        let s1_path = s1.path();
        if !s1_path.is_dir() {
            continue;
        }
        let Ok(s2_iter) = fs::read_dir(&s1_path) else {
            continue;
        };

        for s2 in s2_iter.flatten() {
            let s2_path = s2.path();
            if !s2_path.is_dir() {
                continue;
            }
            let Ok(id_iter) = fs::read_dir(&s2_path) else {
                continue;
            };

            for id_ent in id_iter.flatten() {
                let goal_path = id_ent.path().join(GOAL_JSON_FILENAME);
                if !goal_path.is_file() {
                    continue;
                }
                match read_goal(&goal_path) {
                    Ok(Some(goal)) => goals.push(goal),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!("failed to load goal {}: {}", goal_path.display(), e);
                    }
                }
            }
        }
    }

    goals.sort_by(|a, b| {
        a.create_date
            .cmp(&b.create_date)
            .then_with(|| a.id.cmp(&b.id))
    });
    Ok(goals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::{Comment, GoalChanges};
    use crate::ids::CommentId;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn goal(id: &str, user: &str, created: i64) -> Goal {
        Goal {
            id: GoalId::parse(id).unwrap(),
            user_id: user.into(),
            title: Some(format!("goal {id}")),
            description: String::new(),
            goal_type: Some("personal".into()),
            status: Some("active".into()),
            due_date: None,
            create_date: Some(Utc.timestamp_millis_opt(created).unwrap()),
            comments: vec![],
        }
    }

    #[tokio::test]
    async fn test_save_writes_sharded_document() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileGoalStore::with_goals_dir(temp_dir.path());

        store
            .save(goal("550e8400e29b41d4a716446655440000", "u1", 1))
            .await
            .unwrap();

        let path = temp_dir
            .path()
            .join("55/0e/550e8400e29b41d4a716446655440000")
            .join(GOAL_JSON_FILENAME);
        assert!(path.is_file(), "goal document should exist");

        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty(), "temporary files should be renamed away");
    }

    #[tokio::test]
    async fn test_round_trip_keeps_comment_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileGoalStore::with_goals_dir(temp_dir.path());

        let mut g = goal("g1", "u1", 1);
        for (id, content) in [("c1", "first"), ("c2", "second"), ("c3", "third")] {
            g.comments.push(Comment {
                id: CommentId::parse(id).unwrap(),
                content: content.into(),
                date: None,
            });
        }
        store.save(g.clone()).await.unwrap();

        let loaded = store.find_by_id(&g.id).await.unwrap().unwrap();
        assert_eq!(loaded, g);
    }

    #[tokio::test]
    async fn test_find_orders_by_create_date_then_id() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileGoalStore::with_goals_dir(temp_dir.path());

        store.save(goal("bbbb", "u1", 20)).await.unwrap();
        store.save(goal("aaaa", "u1", 20)).await.unwrap();
        store.save(goal("cccc", "u1", 10)).await.unwrap();
        store.save(goal("dddd", "u2", 5)).await.unwrap();

        let found = store.find(&GoalQuery::for_user("u1")).await.unwrap();
        let ids: Vec<&str> = found.iter().map(|g| g.id.as_str()).collect();

        assert_eq!(ids, vec!["cccc", "aaaa", "bbbb"]);
    }

    #[tokio::test]
    async fn test_find_on_missing_directory_is_empty() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileGoalStore::with_goals_dir(temp_dir.path().join("not-there"));

        let found = store.find(&GoalQuery::for_user("u1")).await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_find_skips_corrupt_documents() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileGoalStore::with_goals_dir(temp_dir.path());
        store.save(goal("good", "u1", 1)).await.unwrap();

        let corrupt_dir = temp_dir.path().join("ba/d_/bad");
        fs::create_dir_all(&corrupt_dir).unwrap();
        fs::write(corrupt_dir.join(GOAL_JSON_FILENAME), "{ not json").unwrap();

        let found = store.find(&GoalQuery::for_user("u1")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "good");
    }

    #[tokio::test]
    async fn test_find_one_and_update_persists() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileGoalStore::with_goals_dir(temp_dir.path());
        let g = goal("g1", "u1", 1);
        store.save(g.clone()).await.unwrap();

        let update = GoalUpdate::from(GoalChanges {
            status: Some("completed".into()),
            ..Default::default()
        });
        let updated = store
            .find_one_and_update(&g.id, &update)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status.as_deref(), Some("completed"));

        let reloaded = store.find_by_id(&g.id).await.unwrap().unwrap();
        assert_eq!(reloaded.status.as_deref(), Some("completed"));
        assert_eq!(reloaded.title.as_deref(), Some("goal g1"));
    }

    #[tokio::test]
    async fn test_remove_deletes_goal_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = FileGoalStore::with_goals_dir(temp_dir.path());
        let g = goal("g1", "u1", 1);
        store.save(g.clone()).await.unwrap();

        store.remove(&g.id).await.unwrap();

        assert!(!g.id.sharded_dir(temp_dir.path()).exists());
        assert!(store.find_by_id(&g.id).await.unwrap().is_none());
        store.remove(&g.id).await.unwrap();
    }
}
