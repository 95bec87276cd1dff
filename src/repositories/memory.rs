use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{new_id, StoreResult, TaskDetailsRepository, TaskRepository, UserRepository};
use crate::models::details::{DetailsFields, TaskDetails};
use crate::models::task::{Task, TaskFields};
use crate::models::user::{NewUser, User};
use crate::utils::errors::StoreError;

/// Process-local store keeping records in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: RwLock<Vec<Task>>,
    details: RwLock<Vec<TaskDetails>>,
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<Task>> {
        Ok(self.tasks.read().await.clone())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Task>> {
        Ok(self.tasks.read().await.iter().find(|t| t.id == id).cloned())
    }

    async fn create(&self, user_id: &str, fields: TaskFields) -> StoreResult<Task> {
        let now = Utc::now();
        let task = Task {
            id: new_id(),
            user_id: user_id.to_string(),
            task: fields.task,
            date_start: fields.date_start,
            date_due: fields.date_due,
            completed: fields.completed,
            created_at: now,
            updated_at: now,
        };

        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn update(&self, id: &str, fields: TaskFields) -> StoreResult<Option<Task>> {
        let mut tasks = self.tasks.write().await;
        let Some(task) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        task.task = fields.task;
        task.date_start = fields.date_start;
        task.date_due = fields.date_due;
        task.completed = fields.completed;
        task.updated_at = Utc::now();
        Ok(Some(task.clone()))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        Ok(tasks.len() != before)
    }
}

#[async_trait]
impl TaskDetailsRepository for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<TaskDetails>> {
        Ok(self.details.read().await.clone())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<TaskDetails>> {
        Ok(self.details.read().await.iter().find(|d| d.id == id).cloned())
    }

    async fn find_by_task_id(&self, task_id: &str) -> StoreResult<Option<TaskDetails>> {
        Ok(self
            .details
            .read()
            .await
            .iter()
            .find(|d| d.task_id == task_id)
            .cloned())
    }

    async fn create(&self, task_id: &str, fields: DetailsFields) -> StoreResult<TaskDetails> {
        let mut all = self.details.write().await;
        if all.iter().any(|d| d.task_id == task_id) {
            return Err(StoreError::Conflict(format!("details for task {}", task_id)));
        }

        let now = Utc::now();
        let details = TaskDetails {
            id: new_id(),
            task_id: task_id.to_string(),
            summary: fields.summary,
            notes: fields.notes,
            status: fields.status,
            priority: fields.priority,
            created_at: now,
            updated_at: now,
        };

        all.push(details.clone());
        Ok(details)
    }

    async fn update(&self, id: &str, fields: DetailsFields) -> StoreResult<Option<TaskDetails>> {
        let mut all = self.details.write().await;
        let Some(details) = all.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };

        details.summary = fields.summary;
        details.notes = fields.notes;
        details.status = fields.status;
        details.priority = fields.priority;
        details.updated_at = Utc::now();
        Ok(Some(details.clone()))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut all = self.details.write().await;
        let before = all.len();
        all.retain(|d| d.id != id);
        Ok(all.len() != before)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn list(&self) -> StoreResult<Vec<User>> {
        Ok(self.users.read().await.clone())
    }

    async fn get(&self, id: &str) -> StoreResult<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(StoreError::Conflict(format!("email {}", user.email)));
        }

        let now = Utc::now();
        let user = User {
            id: new_id(),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };

        users.push(user.clone());
        Ok(user)
    }
}
