use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::SubsecRound;
use chrono::Utc;

use crate::domain::task::errors::TaskError;
use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::task::ports::TaskRepository;
use crate::domain::task::ports::TaskServicePort;
use crate::domain::task::update::TaskPatch;
use crate::domain::user::models::UserId;

/// Domain service implementation for task operations.
pub struct TaskService<TR>
where
    TR: TaskRepository,
{
    repository: Arc<TR>,
}

impl<TR> TaskService<TR>
where
    TR: TaskRepository,
{
    pub fn new(repository: Arc<TR>) -> Self {
        Self { repository }
    }
}

/// Current time at the microsecond precision the store keeps.
fn current_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[async_trait]
impl<TR> TaskServicePort for TaskService<TR>
where
    TR: TaskRepository,
{
    async fn list_tasks(&self, owner: &UserId) -> Result<Vec<Task>, TaskError> {
        self.repository.list_by_owner(owner).await
    }

    async fn create_task(
        &self,
        owner: &UserId,
        command: CreateTaskCommand,
    ) -> Result<Task, TaskError> {
        let now = current_timestamp();
        let task = Task {
            id: TaskId::new(),
            owner_id: *owner,
            title: command.title,
            description: command.description,
            completed: false,
            created_at: now,
            updated_at: now,
        };

        let created = self.repository.create(task).await?;
        tracing::debug!(task_id = %created.id, owner_id = %owner, "Task created");

        Ok(created)
    }

    async fn get_task(&self, owner: &UserId, id: &TaskId) -> Result<Task, TaskError> {
        self.repository
            .find(id, owner)
            .await?
            .ok_or(TaskError::NotFound(id.to_string()))
    }

    async fn update_task(
        &self,
        owner: &UserId,
        id: &TaskId,
        patch: TaskPatch,
    ) -> Result<Task, TaskError> {
        self.repository
            .update(id, owner, &patch, current_timestamp())
            .await?
            .ok_or(TaskError::NotFound(id.to_string()))
    }

    async fn delete_task(&self, owner: &UserId, id: &TaskId) -> Result<(), TaskError> {
        let removed = self.repository.delete(id, owner).await?;
        if removed == 0 {
            return Err(TaskError::NotFound(id.to_string()));
        }

        tracing::debug!(task_id = %id, owner_id = %owner, "Task deleted");
        Ok(())
    }
}
