use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::task::errors::TaskDescriptionError;
use crate::domain::task::errors::TaskIdError;
use crate::domain::task::errors::TaskTitleError;
use crate::domain::user::models::UserId;

/// Task aggregate entity.
///
/// Always belongs to exactly one owner; `owner_id` and `created_at` never
/// change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub owner_id: UserId,
    pub title: TaskTitle,
    pub description: Option<TaskDescription>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a task ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, TaskIdError> {
        Uuid::parse_str(s)
            .map(TaskId)
            .map_err(|e| TaskIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Task title, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTitle(String);

impl TaskTitle {
    const MAX_LENGTH: usize = 255;

    /// # Errors
    /// * `Empty` - Nothing left after trimming
    /// * `TooLong` - More than 255 characters after trimming
    pub fn new(title: String) -> Result<Self, TaskTitleError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(TaskTitleError::Empty);
        }

        let length = trimmed.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(TaskTitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Free-form task description.
///
/// There is no empty description: blank input means "no description".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescription(String);

impl TaskDescription {
    const MAX_LENGTH: usize = 1000;

    /// Parse a raw description, normalizing blank input to `None`.
    ///
    /// # Errors
    /// * `TooLong` - More than 1000 characters after trimming
    pub fn parse(description: &str) -> Result<Option<Self>, TaskDescriptionError> {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let length = trimmed.chars().count();
        if length > Self::MAX_LENGTH {
            return Err(TaskDescriptionError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }

        Ok(Some(Self(trimmed.to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to create a task with validated fields.
#[derive(Debug, Clone)]
pub struct CreateTaskCommand {
    pub title: TaskTitle,
    pub description: Option<TaskDescription>,
}
