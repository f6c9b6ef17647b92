use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{common::Identifiable, id::EntryId};

/// A savings goal with a target amount and optional deadline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    pub id: EntryId,
    pub name: String,
    pub target: f64,
    pub current: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

impl Goal {
    /// Completion percentage, capped at 100. A non-positive target counts
    /// as 0 rather than dividing by zero.
    pub fn progress_percent(&self) -> f64 {
        if self.target <= 0.0 {
            return 0.0;
        }
        (self.current / self.target * 100.0).min(100.0)
    }
}

impl Identifiable for Goal {
    fn id(&self) -> EntryId {
        self.id
    }
}

/// Caller-supplied fields of a goal before the store assigns an id.
#[derive(Debug, Clone)]
pub struct GoalDraft {
    pub name: String,
    pub target: f64,
    pub current: f64,
    pub deadline: Option<NaiveDate>,
}

impl GoalDraft {
    pub fn new(name: impl Into<String>, target: f64, current: f64) -> Self {
        Self {
            name: name.into(),
            target,
            current,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub(crate) fn assign(self, id: EntryId) -> Goal {
        Goal {
            id,
            name: self.name,
            target: self.target,
            current: self.current,
            deadline: self.deadline,
        }
    }
}

/// Partial update applied to an existing goal: supplied fields overwrite,
/// absent fields are retained.
#[derive(Debug, Clone, Default)]
pub struct GoalPatch {
    pub name: Option<String>,
    pub target: Option<f64>,
    pub current: Option<f64>,
    pub deadline: Option<NaiveDate>,
}

impl GoalPatch {
    pub fn current(amount: f64) -> Self {
        Self {
            current: Some(amount),
            ..Self::default()
        }
    }

    pub(crate) fn apply(self, goal: &mut Goal) {
        if let Some(name) = self.name {
            goal.name = name;
        }
        if let Some(target) = self.target {
            goal.target = target;
        }
        if let Some(current) = self.current {
            goal.current = current;
        }
        if let Some(deadline) = self.deadline {
            goal.deadline = Some(deadline);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::id::EntryId;

    fn goal(target: f64, current: f64) -> Goal {
        Goal {
            id: EntryId::from_millis(1),
            name: "Emergency Fund".into(),
            target,
            current,
            deadline: None,
        }
    }

    #[test]
    fn progress_caps_at_one_hundred() {
        assert_eq!(goal(1000.0, 2500.0).progress_percent(), 100.0);
    }

    #[test]
    fn progress_guards_non_positive_targets() {
        assert_eq!(goal(0.0, 500.0).progress_percent(), 0.0);
        assert_eq!(goal(-10.0, 500.0).progress_percent(), 0.0);
    }

    #[test]
    fn patch_overwrites_only_supplied_fields() {
        let mut updated = goal(1000.0, 250.0);
        GoalPatch::current(500.0).apply(&mut updated);
        assert_eq!(updated.current, 500.0);
        assert_eq!(updated.target, 1000.0);
        assert_eq!(updated.name, "Emergency Fund");
    }
}
