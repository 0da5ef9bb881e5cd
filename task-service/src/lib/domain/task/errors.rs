use thiserror::Error;

/// Error for TaskId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for TaskTitle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskTitleError {
    #[error("Title is required")]
    Empty,

    #[error("Title cannot be null")]
    Null,

    #[error("Title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error for TaskDescription validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDescriptionError {
    #[error("Description too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error for all task operations
#[derive(Debug, Clone, Error)]
pub enum TaskError {
    #[error("Task not found: {0}")]
    NotFound(String),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),
}
