//! Domain validation errors.

use thiserror::Error;

/// Errors raised by value object constructors.
///
/// Validation happens at construction, before any aggregate mutation, so a
/// failed validation leaves the aggregate in its prior state with no event
/// recorded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Task title is empty or whitespace.
    #[error("task title cannot be empty")]
    EmptyTitle,

    /// Task title exceeds the length bound.
    #[error("task title cannot exceed {max} characters (got {len})")]
    TitleTooLong { len: usize, max: usize },

    /// Task description exceeds the length bound.
    #[error("task description cannot exceed {max} characters (got {len})")]
    DescriptionTooLong { len: usize, max: usize },

    /// User identifier is empty or whitespace.
    #[error("user id cannot be empty")]
    EmptyUserId,
}
