//! Goal and comment identifiers.
//!
//! Identifiers are opaque to callers, but because a goal identifier becomes a path component in
//! the file-backed store, every identifier is validated on construction:
//!
//! - Length: 1 to [`MAX_ID_LEN`] bytes
//! - Characters: ASCII alphanumerics, `-` and `_`
//!
//! Server-generated identifiers are the simple (32 lowercase hex character) form of a random
//! UUID, for example `550e8400e29b41d4a716446655440000`. Clients may supply their own goal
//! identifier on creation as long as it satisfies the rules above.
//!
//! ## Sharded directory layout
//! For a goal identifier `g`, the file store keeps the goal under:
//! `parent_dir/<g[0..2]>/<g[2..4]>/<g>/`
//!
//! Identifiers shorter than four characters are right-padded with `_` when deriving the shard
//! segments, so every goal lands exactly two levels below `parent_dir`.

use crate::constants::MAX_ID_LEN;
use crate::error::{GoalError, GoalResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Returns true if `input` is acceptable as a goal or comment identifier.
fn is_valid_identifier(input: &str) -> bool {
    !input.is_empty()
        && input.len() <= MAX_ID_LEN
        && input
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'-' | b'_'))
}

fn invalid_identifier(kind: &str, input: &str) -> GoalError {
    GoalError::InvalidInput(format!(
        "{kind} id must be 1-{MAX_ID_LEN} characters of [A-Za-z0-9_-], got: '{input}'"
    ))
}

/// Identifier of a goal record.
///
/// Once constructed, the contained value is guaranteed to satisfy the identifier rules, so it is
/// safe to use as a filesystem path component.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GoalId(String);

impl GoalId {
    /// Generates a fresh identifier from a random UUID in simple form.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Validates an externally supplied identifier.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::InvalidInput`] if `input` is empty, too long, or contains characters
    /// outside `[A-Za-z0-9_-]`.
    pub fn parse(input: &str) -> GoalResult<Self> {
        if is_valid_identifier(input) {
            return Ok(Self(input.to_owned()));
        }
        Err(invalid_identifier("goal", input))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `parent_dir/<s1>/<s2>/<id>/` where `s1`/`s2` are the first two pairs of
    /// characters of this identifier (padded with `_` for very short identifiers).
    pub(crate) fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
        let padded = format!("{:_<4}", self.0);
        let s1 = &padded[0..2];
        let s2 = &padded[2..4];
        parent_dir.join(s1).join(s2).join(&self.0)
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GoalId {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GoalId::parse(s)
    }
}

impl TryFrom<String> for GoalId {
    type Error = GoalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_valid_identifier(&value) {
            return Ok(Self(value));
        }
        Err(invalid_identifier("goal", &value))
    }
}

impl From<GoalId> for String {
    fn from(id: GoalId) -> Self {
        id.0
    }
}

/// Identifier of a comment within a goal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CommentId(String);

impl CommentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn parse(input: &str) -> GoalResult<Self> {
        if is_valid_identifier(input) {
            return Ok(Self(input.to_owned()));
        }
        Err(invalid_identifier("comment", input))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CommentId {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommentId::parse(s)
    }
}

impl TryFrom<String> for CommentId {
    type Error = GoalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_valid_identifier(&value) {
            return Ok(Self(value));
        }
        Err(invalid_identifier("comment", &value))
    }
}

impl From<CommentId> for String {
    fn from(id: CommentId) -> Self {
        id.0
    }
}
