//! Process-local repositories.
//!
//! Used when no database URL is configured and by the HTTP tests. Every
//! mutation runs under a single write lock, which gives the same atomicity the
//! Postgres implementations get from single statements.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::task::errors::TaskError;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::task::ports::TaskRepository;
use crate::domain::task::update::TaskPatch;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users.values().any(|existing| existing.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.to_string()));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| &user.email == email).cloned())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<HashMap<TaskId, Task>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Task>, TaskError> {
        let tasks = self.tasks.read().await;

        let mut owned: Vec<Task> = tasks
            .values()
            .filter(|task| &task.owner_id == owner)
            .cloned()
            .collect();
        owned.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.0.cmp(&a.id.0))
        });

        Ok(owned)
    }

    async fn create(&self, task: Task) -> Result<Task, TaskError> {
        self.tasks.write().await.insert(task.id, task.clone());
        Ok(task)
    }

    async fn find(&self, id: &TaskId, owner: &UserId) -> Result<Option<Task>, TaskError> {
        let tasks = self.tasks.read().await;
        Ok(tasks.get(id).filter(|task| &task.owner_id == owner).cloned())
    }

    async fn update(
        &self,
        id: &TaskId,
        owner: &UserId,
        patch: &TaskPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Task>, TaskError> {
        let mut tasks = self.tasks.write().await;

        match tasks.get_mut(id) {
            Some(task) if &task.owner_id == owner => {
                *task = patch.apply(task, updated_at);
                Ok(Some(task.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: &TaskId, owner: &UserId) -> Result<u64, TaskError> {
        let mut tasks = self.tasks.write().await;

        let owned = tasks.get(id).is_some_and(|task| &task.owner_id == owner);
        if !owned {
            return Ok(0);
        }

        tasks.remove(id);
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::task::models::TaskDescription;
    use crate::domain::task::models::TaskTitle;
    use crate::domain::task::update::FieldUpdate;

    fn task(owner: UserId, title: &str, created_at: DateTime<Utc>) -> Task {
        Task {
            id: TaskId::new(),
            owner_id: owner,
            title: TaskTitle::new(title.to_string()).unwrap(),
            description: TaskDescription::parse("note").unwrap(),
            completed: false,
            created_at,
            updated_at: created_at,
        }
    }

    fn user(email: &str) -> User {
        User {
            id: UserId::new(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: "$argon2id$placeholder".to_string(),
            name: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_user_email_is_unique() {
        let repository = InMemoryUserRepository::new();

        repository.create(user("a@x.com")).await.unwrap();
        let result = repository.create(user("a@x.com")).await;

        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_user_lookup_by_email() {
        let repository = InMemoryUserRepository::new();
        let created = repository.create(user("a@x.com")).await.unwrap();

        let email = EmailAddress::new("A@x.com".to_string()).unwrap();
        let found = repository.find_by_email(&email).await.unwrap().unwrap();

        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn test_list_is_owner_scoped_and_newest_first() {
        let repository = InMemoryTaskRepository::new();
        let owner = UserId::new();
        let now = Utc::now();

        repository
            .create(task(owner, "older", now - Duration::minutes(5)))
            .await
            .unwrap();
        repository.create(task(owner, "newer", now)).await.unwrap();
        repository
            .create(task(UserId::new(), "someone else", now))
            .await
            .unwrap();

        let listed = repository.list_by_owner(&owner).await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|t| t.title.as_str()).collect();

        assert_eq!(titles, vec!["newer", "older"]);
    }

    #[tokio::test]
    async fn test_list_breaks_created_at_ties_by_id() {
        let repository = InMemoryTaskRepository::new();
        let owner = UserId::new();
        let now = Utc::now();

        let first = repository.create(task(owner, "a", now)).await.unwrap();
        let second = repository.create(task(owner, "b", now)).await.unwrap();

        let listed = repository.list_by_owner(&owner).await.unwrap();
        let ids: Vec<TaskId> = listed.iter().map(|t| t.id).collect();

        let mut expected = vec![first.id, second.id];
        expected.sort_by(|a, b| b.0.cmp(&a.0));
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_foreign_task_is_invisible() {
        let repository = InMemoryTaskRepository::new();
        let owner = UserId::new();
        let intruder = UserId::new();
        let created = repository
            .create(task(owner, "private", Utc::now()))
            .await
            .unwrap();
        let patch =
            TaskPatch::new(FieldUpdate::Keep, FieldUpdate::Keep, FieldUpdate::Set(true)).unwrap();

        assert!(repository.find(&created.id, &intruder).await.unwrap().is_none());
        assert!(repository
            .update(&created.id, &intruder, &patch, Utc::now())
            .await
            .unwrap()
            .is_none());
        assert_eq!(repository.delete(&created.id, &intruder).await.unwrap(), 0);

        let untouched = repository.find(&created.id, &owner).await.unwrap().unwrap();
        assert_eq!(untouched, created);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repository = InMemoryTaskRepository::new();
        let owner = UserId::new();
        let created = repository
            .create(task(owner, "draft", Utc::now()))
            .await
            .unwrap();
        let patch =
            TaskPatch::new(FieldUpdate::Keep, FieldUpdate::Clear, FieldUpdate::Set(true)).unwrap();

        let updated = repository
            .update(&created.id, &owner, &patch, Utc::now())
            .await
            .unwrap()
            .unwrap();
        assert!(updated.completed);
        assert_eq!(updated.description, None);
        assert_eq!(updated.title, created.title);

        assert_eq!(repository.delete(&created.id, &owner).await.unwrap(), 1);
        assert_eq!(repository.delete(&created.id, &owner).await.unwrap(), 0);
    }
}
