//! Partial-update semantics for tasks.
//!
//! A PATCH body says three different things about each field: nothing (the key
//! is absent), "remove the value" (`null`, or an empty string for nullable
//! text) or "replace the value". Raw wire presence is modelled as
//! `Option<Option<R>>` (outer `None` = absent, `Some(None)` = `null`) and
//! resolved here into a [`FieldUpdate`] per field. A [`TaskPatch`] is the set of
//! resolved intents for one update and is the only thing the service and the
//! repositories ever see.

use chrono::DateTime;
use chrono::Utc;
use thiserror::Error;

use crate::domain::task::models::Task;
use crate::domain::task::models::TaskDescription;
use crate::domain::task::models::TaskTitle;

/// Resolved intent for a single field of a partial update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldUpdate<T> {
    /// Leave the stored value untouched.
    #[default]
    Keep,
    /// Remove the stored value. Only meaningful for nullable fields.
    Clear,
    /// Replace the stored value.
    Set(T),
}

impl<T> FieldUpdate<T> {
    /// Resolve a field that may be kept or replaced, but never cleared.
    ///
    /// `on_null` produces the error for an explicit `null`.
    pub fn required<R, E>(
        raw: Option<Option<R>>,
        parse: impl FnOnce(R) -> Result<T, E>,
        on_null: impl FnOnce() -> E,
    ) -> Result<Self, E> {
        match raw {
            None => Ok(Self::Keep),
            Some(None) => Err(on_null()),
            Some(Some(value)) => parse(value).map(Self::Set),
        }
    }

    /// Resolve a nullable field.
    ///
    /// `parse` returns `Ok(None)` for values that normalize to "empty"
    /// (e.g. whitespace-only text), which resolve to [`FieldUpdate::Clear`]
    /// exactly like an explicit `null`.
    pub fn nullable<R, E>(
        raw: Option<Option<R>>,
        parse: impl FnOnce(R) -> Result<Option<T>, E>,
    ) -> Result<Self, E> {
        match raw {
            None => Ok(Self::Keep),
            Some(None) => Ok(Self::Clear),
            Some(Some(value)) => Ok(parse(value)?.map_or(Self::Clear, Self::Set)),
        }
    }

    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, Self::Clear)
    }

    /// Merge into the current value of a nullable field.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Keep => current,
            Self::Clear => None,
            Self::Set(value) => Some(value),
        }
    }

    /// Merge into the current value of a non-nullable field.
    ///
    /// [`TaskPatch::new`] never lets `Clear` reach a non-nullable field.
    pub fn apply_required(self, current: T) -> T {
        match self {
            Self::Set(value) => value,
            Self::Keep | Self::Clear => current,
        }
    }
}

/// Error for a set of field intents that cannot form an update.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskPatchError {
    #[error("no-op update: at least one field must be provided")]
    NoChanges,

    #[error("{0} cannot be cleared")]
    NotNullable(&'static str),
}

/// Validated partial update of a task.
///
/// Holds at least one non-`Keep` intent; `title` and `completed` are never
/// `Clear`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPatch {
    title: FieldUpdate<TaskTitle>,
    description: FieldUpdate<TaskDescription>,
    completed: FieldUpdate<bool>,
}

impl TaskPatch {
    /// Build a patch from resolved intents.
    ///
    /// # Errors
    /// * `NotNullable` - `Clear` on `title` or `completed`
    /// * `NoChanges` - Every field is `Keep`
    pub fn new(
        title: FieldUpdate<TaskTitle>,
        description: FieldUpdate<TaskDescription>,
        completed: FieldUpdate<bool>,
    ) -> Result<Self, TaskPatchError> {
        if title.is_clear() {
            return Err(TaskPatchError::NotNullable("title"));
        }
        if completed.is_clear() {
            return Err(TaskPatchError::NotNullable("completed"));
        }
        if title.is_keep() && description.is_keep() && completed.is_keep() {
            return Err(TaskPatchError::NoChanges);
        }

        Ok(Self {
            title,
            description,
            completed,
        })
    }

    pub fn title(&self) -> &FieldUpdate<TaskTitle> {
        &self.title
    }

    pub fn description(&self) -> &FieldUpdate<TaskDescription> {
        &self.description
    }

    pub fn completed(&self) -> &FieldUpdate<bool> {
        &self.completed
    }

    /// Merge the patch into `task`, stamping `updated_at`.
    ///
    /// Pure; callers must run it under whatever makes the read and the write
    /// of `task` atomic.
    pub fn apply(&self, task: &Task, updated_at: DateTime<Utc>) -> Task {
        Task {
            id: task.id,
            owner_id: task.owner_id,
            title: self.title.clone().apply_required(task.title.clone()),
            description: self.description.clone().apply(task.description.clone()),
            completed: self.completed.clone().apply_required(task.completed),
            created_at: task.created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::task::errors::TaskTitleError;
    use crate::domain::task::models::TaskId;
    use crate::domain::user::models::UserId;

    fn title(raw: Option<Option<&str>>) -> Result<FieldUpdate<TaskTitle>, TaskTitleError> {
        FieldUpdate::required(
            raw.map(|v| v.map(str::to_string)),
            TaskTitle::new,
            || TaskTitleError::Null,
        )
    }

    fn description(raw: Option<Option<&str>>) -> FieldUpdate<TaskDescription> {
        FieldUpdate::nullable(raw, TaskDescription::parse).unwrap()
    }

    fn existing_task() -> Task {
        let created_at = Utc::now() - Duration::hours(1);
        Task {
            id: TaskId::new(),
            owner_id: UserId::new(),
            title: TaskTitle::new("Buy milk".to_string()).unwrap(),
            description: Some(TaskDescription::parse("two litres").unwrap().unwrap()),
            completed: false,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn test_required_field_resolution() {
        assert_eq!(title(None).unwrap(), FieldUpdate::Keep);
        assert_eq!(title(Some(None)), Err(TaskTitleError::Null));
        assert_eq!(title(Some(Some("   "))), Err(TaskTitleError::Empty));
        assert_eq!(
            title(Some(Some("  Walk dog "))).unwrap(),
            FieldUpdate::Set(TaskTitle::new("Walk dog".to_string()).unwrap())
        );
    }

    #[test]
    fn test_nullable_field_resolution() {
        assert_eq!(description(None), FieldUpdate::Keep);
        assert_eq!(description(Some(None)), FieldUpdate::Clear);
        assert_eq!(description(Some(Some(""))), FieldUpdate::Clear);
        assert_eq!(description(Some(Some("   "))), FieldUpdate::Clear);

        let set = description(Some(Some("  fresh ")));
        match set {
            FieldUpdate::Set(value) => assert_eq!(value.as_str(), "fresh"),
            other => panic!("expected Set, got {:?}", other),
        }
    }

    #[test]
    fn test_boolean_field_resolution() {
        let resolve = |raw: Option<Option<bool>>| {
            FieldUpdate::required(raw, Ok::<bool, &str>, || "must be a boolean")
        };

        assert_eq!(resolve(None), Ok(FieldUpdate::Keep));
        assert_eq!(resolve(Some(Some(true))), Ok(FieldUpdate::Set(true)));
        assert_eq!(resolve(Some(Some(false))), Ok(FieldUpdate::Set(false)));
        assert_eq!(resolve(Some(None)), Err("must be a boolean"));
    }

    #[test]
    fn test_patch_rejects_no_changes() {
        let result = TaskPatch::new(FieldUpdate::Keep, FieldUpdate::Keep, FieldUpdate::Keep);
        assert_eq!(result, Err(TaskPatchError::NoChanges));
    }

    #[test]
    fn test_patch_rejects_clearing_required_fields() {
        assert_eq!(
            TaskPatch::new(FieldUpdate::Clear, FieldUpdate::Keep, FieldUpdate::Keep),
            Err(TaskPatchError::NotNullable("title"))
        );
        assert_eq!(
            TaskPatch::new(FieldUpdate::Keep, FieldUpdate::Keep, FieldUpdate::Clear),
            Err(TaskPatchError::NotNullable("completed"))
        );
    }

    #[test]
    fn test_apply_only_touches_resolved_fields() {
        let task = existing_task();
        let now = Utc::now();
        let patch =
            TaskPatch::new(FieldUpdate::Keep, FieldUpdate::Keep, FieldUpdate::Set(true)).unwrap();

        let updated = patch.apply(&task, now);

        assert!(updated.completed);
        assert_eq!(updated.title, task.title);
        assert_eq!(updated.description, task.description);
        assert_eq!(updated.created_at, task.created_at);
        assert_eq!(updated.updated_at, now);
        assert_eq!(updated.id, task.id);
        assert_eq!(updated.owner_id, task.owner_id);
    }

    #[test]
    fn test_apply_clears_and_sets() {
        let task = existing_task();
        let patch = TaskPatch::new(
            FieldUpdate::Set(TaskTitle::new("Buy oat milk".to_string()).unwrap()),
            FieldUpdate::Clear,
            FieldUpdate::Keep,
        )
        .unwrap();

        let updated = patch.apply(&task, Utc::now());

        assert_eq!(updated.title.as_str(), "Buy oat milk");
        assert_eq!(updated.description, None);
        assert!(!updated.completed);
    }
}
