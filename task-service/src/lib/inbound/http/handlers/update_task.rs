use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::create_task::TaskResponseData;
use super::get_task::parse_task_id;
use super::ApiError;
use super::ApiSuccess;
use super::FieldViolations;
use crate::domain::task::errors::TaskTitleError;
use crate::domain::task::models::TaskDescription;
use crate::domain::task::models::TaskTitle;
use crate::domain::task::ports::TaskServicePort;
use crate::domain::task::update::FieldUpdate;
use crate::domain::task::update::TaskPatch;
use crate::inbound::http::extract::present;
use crate::inbound::http::extract::StrictJson;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn update_task(
    State(state): State<AppState>,
    identity: AuthenticatedUser,
    Path(task_id): Path<String>,
    StrictJson(body): StrictJson<UpdateTaskRequestBody>,
) -> Result<ApiSuccess<TaskResponseData>, ApiError> {
    let task_id = parse_task_id(&task_id)?;
    let patch = body.try_into_patch()?;

    state
        .task_service
        .update_task(&identity.user_id, &task_id, patch)
        .await
        .map_err(ApiError::from)
        .map(|ref task| ApiSuccess::new(StatusCode::OK, task.into()))
}

/// HTTP request body for a partial task update (raw JSON)
///
/// Each field keeps wire presence: absent, `null` or a value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTaskRequestBody {
    #[serde(default, deserialize_with = "present")]
    title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    completed: Option<Option<bool>>,
}

impl UpdateTaskRequestBody {
    fn try_into_patch(self) -> Result<TaskPatch, ApiError> {
        let mut violations = FieldViolations::default();

        let title = violations.check(
            "title",
            FieldUpdate::required(self.title, TaskTitle::new, || TaskTitleError::Null),
        );
        let description = violations.check(
            "description",
            FieldUpdate::nullable(self.description, |raw: String| TaskDescription::parse(&raw)),
        );
        let completed = violations.check(
            "completed",
            FieldUpdate::required(self.completed, Ok::<bool, &str>, || "must be a boolean"),
        );

        violations.into_result()?;

        TaskPatch::new(
            title.unwrap_or_default(),
            description.unwrap_or_default(),
            completed.unwrap_or_default(),
        )
        .map_err(ApiError::from)
    }
}
