use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Postgres;
use sqlx::QueryBuilder;
use sqlx::Row;

use crate::domain::task::errors::TaskError;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskDescription;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::TaskTitle;
use crate::domain::task::ports::TaskRepository;
use crate::domain::task::update::FieldUpdate;
use crate::domain::task::update::TaskPatch;
use crate::domain::user::models::UserId;

const TASK_COLUMNS: &str = "id, owner_id, title, description, completed, created_at, updated_at";

pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_task(row: PgRow) -> Result<Task, TaskError> {
        let column_error = |e: sqlx::Error| TaskError::DatabaseError(e.to_string());

        let title: String = row.try_get("title").map_err(column_error)?;
        let description: Option<String> = row.try_get("description").map_err(column_error)?;

        Ok(Task {
            id: TaskId(row.try_get("id").map_err(column_error)?),
            owner_id: UserId(row.try_get("owner_id").map_err(column_error)?),
            title: TaskTitle::new(title)
                .map_err(|e| TaskError::DatabaseError(format!("Stored title is invalid: {}", e)))?,
            description: match description {
                Some(description) => TaskDescription::parse(&description).map_err(|e| {
                    TaskError::DatabaseError(format!("Stored description is invalid: {}", e))
                })?,
                None => None,
            },
            completed: row.try_get("completed").map_err(column_error)?,
            created_at: row.try_get("created_at").map_err(column_error)?,
            updated_at: row.try_get("updated_at").map_err(column_error)?,
        })
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Task>, TaskError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM tasks WHERE owner_id = $1 ORDER BY created_at DESC, id DESC",
            TASK_COLUMNS
        ))
        .bind(owner.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Self::row_to_task).collect()
    }

    async fn create(&self, task: Task) -> Result<Task, TaskError> {
        // The stored row is returned so timestamps carry the column precision.
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO tasks (id, owner_id, title, description, completed, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            TASK_COLUMNS
        ))
        .bind(task.id.0)
        .bind(task.owner_id.0)
        .bind(task.title.as_str())
        .bind(task.description.as_ref().map(|d| d.as_str()))
        .bind(task.completed)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        Self::row_to_task(row)
    }

    async fn find(&self, id: &TaskId, owner: &UserId) -> Result<Option<Task>, TaskError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM tasks WHERE id = $1 AND owner_id = $2",
            TASK_COLUMNS
        ))
        .bind(id.0)
        .bind(owner.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        row.map(Self::row_to_task).transpose()
    }

    async fn update(
        &self,
        id: &TaskId,
        owner: &UserId,
        patch: &TaskPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Task>, TaskError> {
        // Only columns with a resolved intent are written; the owner predicate
        // and RETURNING keep the check and the read-back in one statement.
        let mut builder = QueryBuilder::<Postgres>::new("UPDATE tasks SET updated_at = ");
        builder.push_bind(updated_at);

        if let FieldUpdate::Set(title) = patch.title() {
            builder.push(", title = ").push_bind(title.as_str().to_string());
        }
        match patch.description() {
            FieldUpdate::Keep => {}
            FieldUpdate::Clear => {
                builder.push(", description = NULL");
            }
            FieldUpdate::Set(description) => {
                builder
                    .push(", description = ")
                    .push_bind(description.as_str().to_string());
            }
        }
        if let FieldUpdate::Set(completed) = patch.completed() {
            builder.push(", completed = ").push_bind(*completed);
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id.0)
            .push(" AND owner_id = ")
            .push_bind(owner.0)
            .push(" RETURNING ")
            .push(TASK_COLUMNS);

        let row = builder
            .build()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        row.map(Self::row_to_task).transpose()
    }

    async fn delete(&self, id: &TaskId, owner: &UserId) -> Result<u64, TaskError> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id.0)
        .bind(owner.0)
        .execute(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
