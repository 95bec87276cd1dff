//! Storage capabilities consumed by the HTTP layer.
//!
//! Handlers only see these traits; the composition root decides whether they
//! are backed by Postgres ([`crate::database::Database`]) or by
//! [`memory::MemoryStore`].

use async_trait::async_trait;

use crate::models::details::{DetailsFields, TaskDetails};
use crate::models::task::{Task, TaskFields};
use crate::models::user::{NewUser, User};
use crate::utils::errors::StoreError;

pub mod memory;
pub mod postgres;

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Every stored task, unfiltered and in the backend's natural order.
    async fn list(&self) -> StoreResult<Vec<Task>>;

    async fn get(&self, id: &str) -> StoreResult<Option<Task>>;

    async fn create(&self, user_id: &str, fields: TaskFields) -> StoreResult<Task>;

    /// Overwrites title, dates and completion flag. `None` when the task is absent.
    async fn update(&self, id: &str, fields: TaskFields) -> StoreResult<Option<Task>>;

    /// Returns whether a task was removed.
    async fn delete(&self, id: &str) -> StoreResult<bool>;
}

#[async_trait]
pub trait TaskDetailsRepository: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<TaskDetails>>;

    async fn get(&self, id: &str) -> StoreResult<Option<TaskDetails>>;

    /// Details attached to a task, if any. The earliest record wins when
    /// several reference the same task.
    async fn find_by_task_id(&self, task_id: &str) -> StoreResult<Option<TaskDetails>>;

    async fn create(&self, task_id: &str, fields: DetailsFields) -> StoreResult<TaskDetails>;

    async fn update(&self, id: &str, fields: DetailsFields) -> StoreResult<Option<TaskDetails>>;

    async fn delete(&self, id: &str) -> StoreResult<bool>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list(&self) -> StoreResult<Vec<User>>;

    async fn get(&self, id: &str) -> StoreResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn create(&self, user: NewUser) -> StoreResult<User>;
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
