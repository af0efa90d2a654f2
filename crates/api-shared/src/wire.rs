//! JSON request and response bodies of the goals API.
//!
//! These types are the wire contract only; conversion to and from the core model happens in the
//! API crates.

use crate::timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CommentDoc {
    pub id: String,
    /// Markdown as stored, or HTML when returned from a single-goal read.
    pub content: String,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalDoc {
    pub id: String,
    pub user_id: String,
    pub title: Option<String>,
    pub description: String,
    #[serde(rename = "type")]
    pub goal_type: Option<String>,
    pub status: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub create_date: Option<DateTime<Utc>>,
    pub comments: Vec<CommentDoc>,
}

/// Envelope for operations returning a list of goals.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GoalsRes {
    pub goals: Vec<GoalDoc>,
}

/// Envelope for operations returning one goal; `goal` is `null` when there is none.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GoalRes {
    pub goal: Option<GoalDoc>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct GoalReq {
    pub goal: GoalFields,
}

/// Goal fields accepted on create and update.
///
/// `dueDate` distinguishes an absent key (outer `None`) from an explicit `null`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GoalFields {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub goal_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "timestamp::deserialize_present")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub due_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub create_date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct CommentReq {
    pub comment: CommentFields,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, ToSchema)]
pub struct CommentFields {
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Envelope for every failed operation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: ErrorBody,
}
