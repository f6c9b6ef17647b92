use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Millisecond-epoch identifier assigned at record creation.
///
/// Ids are unique within a store and sort by creation order, so the newest
/// record always carries the largest id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(i64);

impl EntryId {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hands out fresh [`EntryId`]s.
///
/// Two records created in the same millisecond still receive distinct ids:
/// the generator bumps past the last value it issued or observed.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: i64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> EntryId {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        EntryId(self.last)
    }

    /// Records an id loaded from storage so freshly issued ids never
    /// collide with persisted ones.
    pub fn observe(&mut self, id: EntryId) {
        self.last = self.last.max(id.as_millis());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_strictly_increasing() {
        let mut ids = IdGenerator::new();
        let first = ids.next();
        let second = ids.next();
        let third = ids.next();
        assert!(first < second);
        assert!(second < third);
    }

    #[test]
    fn observe_guards_against_persisted_ids() {
        let mut ids = IdGenerator::new();
        let future = EntryId::from_millis(i64::MAX - 8);
        ids.observe(future);
        assert!(ids.next() > future);
    }
}
