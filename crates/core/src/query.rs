//! Goal queries: owner, status partition, due-date window, ordering and limit.
//!
//! Both store implementations evaluate a [`GoalQuery`] through [`GoalQuery::apply`], so filtering
//! and ordering rules live in exactly one place.

use crate::constants::UNBOUNDED_SENTINEL;
use crate::error::{GoalError, GoalResult};
use crate::goal::Goal;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Membership test on a goal's status.
///
/// A goal without a status is never `In` a set and is always `NotIn` it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusFilter {
    In(BTreeSet<String>),
    NotIn(BTreeSet<String>),
}

impl StatusFilter {
    pub fn matches(&self, status: Option<&str>) -> bool {
        match (self, status) {
            (StatusFilter::In(set), Some(s)) => set.contains(s),
            (StatusFilter::In(_), None) => false,
            (StatusFilter::NotIn(set), Some(s)) => !set.contains(s),
            (StatusFilter::NotIn(_), None) => true,
        }
    }
}

/// The active and archived status filters a controller is built with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusSets {
    active: StatusFilter,
    archived: StatusFilter,
}

impl StatusSets {
    pub fn new(active: StatusFilter, archived: StatusFilter) -> Self {
        Self { active, archived }
    }

    /// Builds the partition from the archived statuses: archived is membership in the list,
    /// active is everything else.
    pub fn from_archived<I, S>(archived: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = archived.into_iter().map(Into::into).collect();
        Self {
            active: StatusFilter::NotIn(set.clone()),
            archived: StatusFilter::In(set),
        }
    }

    pub fn active(&self) -> &StatusFilter {
        &self.active
    }

    pub fn archived(&self) -> &StatusFilter {
        &self.archived
    }
}

/// Due-date window: `after` is exclusive, `until` is inclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DueDateRange {
    pub after: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl DueDateRange {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn after(instant: DateTime<Utc>) -> Self {
        Self {
            after: Some(instant),
            until: None,
        }
    }

    /// Parses the path form of a range: two epoch-millisecond bounds where `"0"` leaves that
    /// side open.
    ///
    /// # Errors
    ///
    /// Returns [`GoalError::InvalidInput`] if a bound is neither `"0"` nor a representable
    /// epoch-millisecond timestamp.
    pub fn from_bounds(start: &str, stop: &str) -> GoalResult<Self> {
        Ok(Self {
            after: parse_bound("dueDateStart", start)?,
            until: parse_bound("dueDateStop", stop)?,
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.after.is_none() && self.until.is_none()
    }

    /// A goal without a due date only matches an unbounded range.
    pub fn matches(&self, due_date: Option<DateTime<Utc>>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(due) = due_date else {
            return false;
        };
        self.after.map_or(true, |after| due > after) && self.until.map_or(true, |until| due <= until)
    }
}

fn parse_bound(name: &str, raw: &str) -> GoalResult<Option<DateTime<Utc>>> {
    if raw == UNBOUNDED_SENTINEL {
        return Ok(None);
    }
    let millis: i64 = raw.trim().parse().map_err(|_| {
        GoalError::InvalidInput(format!("{name} must be epoch milliseconds, got: '{raw}'"))
    })?;
    DateTime::from_timestamp_millis(millis)
        .map(Some)
        .ok_or_else(|| GoalError::InvalidInput(format!("{name} is out of range: {millis}")))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    /// Earliest due date first; goals without a due date sort before all others.
    DueDateAscending,
}

/// Query over a single user's goals.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalQuery {
    pub user_id: String,
    pub status: Option<StatusFilter>,
    pub due: DueDateRange,
    pub sort: Option<SortOrder>,
    pub limit: Option<usize>,
}

impl GoalQuery {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            status: None,
            due: DueDateRange::unbounded(),
            sort: None,
            limit: None,
        }
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_due(mut self, due: DueDateRange) -> Self {
        self.due = due;
        self
    }

    pub fn sorted(mut self, sort: SortOrder) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, goal: &Goal) -> bool {
        goal.user_id == self.user_id
            && self
                .status
                .as_ref()
                .map_or(true, |filter| filter.matches(goal.status.as_deref()))
            && self.due.matches(goal.due_date)
    }

    /// Filters `goals` (given in store order), then sorts and truncates them.
    pub fn apply<I>(&self, goals: I) -> Vec<Goal>
    where
        I: IntoIterator<Item = Goal>,
    {
        let mut matched: Vec<Goal> = goals.into_iter().filter(|g| self.matches(g)).collect();

        if let Some(SortOrder::DueDateAscending) = self.sort {
            // stable: ties keep store order
            matched.sort_by(|a, b| a.due_date.cmp(&b.due_date));
        }
        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::GoalId;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    fn goal(id: &str, user: &str, status: Option<&str>, due: Option<i64>) -> Goal {
        Goal {
            id: GoalId::parse(id).unwrap(),
            user_id: user.into(),
            title: Some(id.into()),
            description: String::new(),
            goal_type: None,
            status: status.map(Into::into),
            due_date: due.map(at),
            create_date: None,
            comments: vec![],
        }
    }

    #[test]
    fn test_status_sets_partition_every_status() {
        let sets = StatusSets::from_archived(["completed", "abandoned"]);

        for status in [Some("completed"), Some("abandoned"), Some("active"), Some(""), None] {
            assert_ne!(
                sets.active().matches(status),
                sets.archived().matches(status),
                "status {status:?} must be in exactly one set"
            );
        }
    }

    #[test]
    fn test_from_bounds_sentinels() {
        assert!(DueDateRange::from_bounds("0", "0").unwrap().is_unbounded());

        let range = DueDateRange::from_bounds("1000", "0").unwrap();
        assert_eq!(range.after, Some(at(1000)));
        assert_eq!(range.until, None);
    }

    #[test]
    fn test_from_bounds_rejects_garbage() {
        match DueDateRange::from_bounds("yesterday", "0") {
            Err(GoalError::InvalidInput(msg)) => assert!(msg.contains("dueDateStart")),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_range_bounds_are_exclusive_then_inclusive() {
        let range = DueDateRange::from_bounds("1000", "2000").unwrap();

        assert!(!range.matches(Some(at(1000))));
        assert!(range.matches(Some(at(1001))));
        assert!(range.matches(Some(at(2000))));
        assert!(!range.matches(Some(at(2001))));
        assert!(!range.matches(None));
        assert!(DueDateRange::unbounded().matches(None));
    }

    #[test]
    fn test_apply_scopes_to_user_and_status() {
        let sets = StatusSets::from_archived(["completed"]);
        let goals = vec![
            goal("a1", "u1", Some("active"), None),
            goal("a2", "u1", Some("completed"), None),
            goal("a3", "u2", Some("active"), None),
        ];

        let active = GoalQuery::for_user("u1")
            .with_status(sets.active().clone())
            .apply(goals.clone());
        let archived = GoalQuery::for_user("u1")
            .with_status(sets.archived().clone())
            .apply(goals);

        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id.as_str(), "a1");
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].id.as_str(), "a2");
    }

    #[test]
    fn test_apply_sorts_then_limits() {
        let goals = vec![
            goal("late", "u1", None, Some(3000)),
            goal("early", "u1", None, Some(1500)),
            goal("mid", "u1", None, Some(2000)),
        ];

        let result = GoalQuery::for_user("u1")
            .with_due(DueDateRange::after(at(1000)))
            .sorted(SortOrder::DueDateAscending)
            .limit(1)
            .apply(goals);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id.as_str(), "early");
    }
}
