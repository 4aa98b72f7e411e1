use serde::{Deserialize, Serialize};

/// Primary key of a task aggregate.
///
/// The value is assigned by the persistence layer on first save; until then
/// the identifier holds the unassigned sentinel (`0`). Wrapping the raw
/// integer prevents mixing task keys with other integer-based identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Creates an identifier from a raw key assigned by the store.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the sentinel identifier of a not-yet-persisted aggregate.
    pub fn unassigned() -> Self {
        Self(0)
    }

    /// Returns true once the persistence layer has assigned a real key.
    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }

    /// Returns the raw key value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::unassigned()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<TaskId> for i64 {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unassigned() {
        assert!(!TaskId::default().is_assigned());
        assert_eq!(TaskId::default(), TaskId::unassigned());
    }

    #[test]
    fn assigned_id_preserves_value() {
        let id = TaskId::new(42);
        assert!(id.is_assigned());
        assert_eq!(id.as_i64(), 42);
    }

    #[test]
    fn serialization_roundtrip() {
        let id = TaskId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let deserialized: TaskId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
