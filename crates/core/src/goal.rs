//! Goal and comment records, plus the inputs used to create and change them.

use crate::ids::{CommentId, GoalId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's tracked objective as persisted by a [`GoalStore`](crate::GoalStore).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: GoalId,
    pub user_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub goal_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub create_date: Option<DateTime<Utc>>,
    /// Comments in insertion order.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// A timestamped markdown annotation owned by a single goal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    /// Raw markdown as written by the user.
    pub content: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// Fields accepted when creating a goal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewGoal {
    /// Client-chosen identifier; generated when absent.
    pub id: Option<GoalId>,
    /// Owner claimed by the request body, checked against the authenticated user.
    pub user_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub goal_type: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub create_date: Option<DateTime<Utc>>,
}

/// Fields accepted when creating a comment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewComment {
    pub content: String,
    pub date: Option<DateTime<Utc>>,
}

impl NewComment {
    pub(crate) fn into_comment(self) -> Comment {
        Comment {
            id: CommentId::generate(),
            content: self.content,
            date: self.date,
        }
    }
}

/// A partial change to a goal as received from a client.
///
/// `due_date` is two-level: the outer `None` means the field was omitted and the stored value
/// stays, `Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GoalChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub goal_type: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

/// The field-level update a store applies in a find-and-modify.
///
/// `user_id`, `create_date` and `comments` cannot be changed through an update.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GoalUpdate {
    pub title: Option<String>,
    pub description: String,
    pub goal_type: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl From<GoalChanges> for GoalUpdate {
    fn from(changes: GoalChanges) -> Self {
        Self {
            title: changes.title,
            description: changes.description.unwrap_or_default(),
            goal_type: changes.goal_type,
            status: changes.status,
            due_date: changes.due_date,
        }
    }
}

impl GoalUpdate {
    /// Writes the set fields of this update into `goal`.
    pub fn apply_to(&self, goal: &mut Goal) {
        if let Some(title) = &self.title {
            goal.title = Some(title.clone());
        }
        goal.description = self.description.clone();
        if let Some(goal_type) = &self.goal_type {
            goal.goal_type = Some(goal_type.clone());
        }
        if let Some(status) = &self.status {
            goal.status = Some(status.clone());
        }
        if let Some(due_date) = self.due_date {
            goal.due_date = due_date;
        }
    }
}

impl Goal {
    /// Removes the comment with `comment_id`, returning whether one was removed.
    pub fn remove_comment(&mut self, comment_id: &CommentId) -> bool {
        let before = self.comments.len();
        self.comments.retain(|c| &c.id != comment_id);
        self.comments.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_goal() -> Goal {
        Goal {
            id: GoalId::parse("g1").unwrap(),
            user_id: "u1".into(),
            title: Some("Run a marathon".into()),
            description: "42km".into(),
            goal_type: Some("fitness".into()),
            status: Some("active".into()),
            due_date: Some(Utc.timestamp_millis_opt(5_000).unwrap()),
            create_date: None,
            comments: vec![],
        }
    }

    #[test]
    fn test_update_leaves_due_date_when_omitted() {
        let mut goal = sample_goal();
        let update = GoalUpdate::from(GoalChanges {
            title: Some("Run a half marathon".into()),
            ..Default::default()
        });

        update.apply_to(&mut goal);

        assert_eq!(goal.title.as_deref(), Some("Run a half marathon"));
        assert_eq!(goal.due_date, Some(Utc.timestamp_millis_opt(5_000).unwrap()));
        assert_eq!(goal.status.as_deref(), Some("active"));
        assert_eq!(goal.description, "");
    }

    #[test]
    fn test_update_clears_due_date_when_explicitly_null() {
        let mut goal = sample_goal();
        let update = GoalUpdate::from(GoalChanges {
            due_date: Some(None),
            ..Default::default()
        });

        update.apply_to(&mut goal);

        assert_eq!(goal.due_date, None);
        assert_eq!(goal.user_id, "u1");
    }

    #[test]
    fn test_remove_comment_reports_whether_removed() {
        let mut goal = sample_goal();
        goal.comments.push(Comment {
            id: CommentId::parse("c1").unwrap(),
            content: "first".into(),
            date: None,
        });

        assert!(!goal.remove_comment(&CommentId::parse("c2").unwrap()));
        assert_eq!(goal.comments.len(), 1);
        assert!(goal.remove_comment(&CommentId::parse("c1").unwrap()));
        assert!(goal.comments.is_empty());
    }

    #[test]
    fn test_goal_json_uses_camel_case_and_type_key() {
        let json = serde_json::to_value(sample_goal()).unwrap();

        assert_eq!(json["userId"], "u1");
        assert_eq!(json["type"], "fitness");
        assert!(json.get("dueDate").is_some());
    }
}
