use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::task::errors::TaskError;
use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::task::update::TaskPatch;
use crate::domain::user::models::UserId;

/// Port for owner-scoped task operations.
///
/// Every operation takes the caller's identity; a task owned by someone else
/// is reported exactly like a task that does not exist.
#[async_trait]
pub trait TaskServicePort: Send + Sync + 'static {
    /// List the owner's tasks, newest first.
    async fn list_tasks(&self, owner: &UserId) -> Result<Vec<Task>, TaskError>;

    /// Create a new, not yet completed task.
    async fn create_task(
        &self,
        owner: &UserId,
        command: CreateTaskCommand,
    ) -> Result<Task, TaskError>;

    /// # Errors
    /// * `NotFound` - No such task for this owner
    /// * `DatabaseError` - Database operation failed
    async fn get_task(&self, owner: &UserId, id: &TaskId) -> Result<Task, TaskError>;

    /// Apply a partial update and return the stored result.
    ///
    /// # Errors
    /// * `NotFound` - No such task for this owner
    /// * `DatabaseError` - Database operation failed
    async fn update_task(
        &self,
        owner: &UserId,
        id: &TaskId,
        patch: TaskPatch,
    ) -> Result<Task, TaskError>;

    /// # Errors
    /// * `NotFound` - No such task for this owner
    /// * `DatabaseError` - Database operation failed
    async fn delete_task(&self, owner: &UserId, id: &TaskId) -> Result<(), TaskError>;
}

/// Persistence operations for task aggregate.
///
/// The owner is part of every lookup predicate.
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    /// Tasks of `owner` ordered by `created_at` descending.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Task>, TaskError>;

    async fn create(&self, task: Task) -> Result<Task, TaskError>;

    async fn find(&self, id: &TaskId, owner: &UserId) -> Result<Option<Task>, TaskError>;

    /// Atomically apply `patch` to the matching task.
    ///
    /// Returns the task as stored after the write, or `None` if no task
    /// matched both `id` and `owner`.
    async fn update(
        &self,
        id: &TaskId,
        owner: &UserId,
        patch: &TaskPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Task>, TaskError>;

    /// Returns the number of removed tasks (0 or 1).
    async fn delete(&self, id: &TaskId, owner: &UserId) -> Result<u64, TaskError>;
}
