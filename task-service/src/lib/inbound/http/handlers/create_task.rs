use axum::extract::State;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::FieldViolations;
use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskDescription;
use crate::domain::task::models::TaskTitle;
use crate::domain::task::ports::TaskServicePort;
use crate::inbound::http::extract::StrictJson;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn create_task(
    State(state): State<AppState>,
    identity: AuthenticatedUser,
    StrictJson(body): StrictJson<CreateTaskRequestBody>,
) -> Result<ApiSuccess<TaskResponseData>, ApiError> {
    state
        .task_service
        .create_task(&identity.user_id, body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref task| ApiSuccess::new(StatusCode::CREATED, task.into()))
}

/// HTTP request body for creating a task (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTaskRequestBody {
    title: String,
    #[serde(default)]
    description: Option<String>,
}

impl CreateTaskRequestBody {
    fn try_into_command(self) -> Result<CreateTaskCommand, ApiError> {
        let mut violations = FieldViolations::default();

        let title = violations.check("title", TaskTitle::new(self.title));
        let description = violations.check(
            "description",
            self.description
                .as_deref()
                .map(TaskDescription::parse)
                .transpose()
                .map(Option::flatten),
        );

        violations.into_result()?;

        match (title, description) {
            (Some(title), Some(description)) => Ok(CreateTaskCommand { title, description }),
            _ => Err(ApiError::invalid_body("Invalid task")),
        }
    }
}

/// Wire representation of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponseData {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Task> for TaskResponseData {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.as_str().to_string(),
            description: task.description.as_ref().map(|d| d.as_str().to_string()),
            completed: task.completed,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}
