use async_trait::async_trait;

use super::{new_id, StoreResult, TaskDetailsRepository, TaskRepository, UserRepository};
use crate::database::Database;
use crate::models::details::{DetailsFields, TaskDetails};
use crate::models::task::{Task, TaskFields};
use crate::models::user::{NewUser, User};

const TASK_COLUMNS: &str =
    "id, user_id, task, date_start, date_due, completed, created_at, updated_at";
const DETAILS_COLUMNS: &str =
    "id, task_id, summary, notes, status, priority, created_at, updated_at";
const USER_COLUMNS: &str =
    "id, first_name, last_name, email, password_hash, created_at, updated_at";

#[async_trait]
impl TaskRepository for Database {
    async fn list(&self) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!("SELECT {} FROM tasks", TASK_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching tasks: {}", e);
                e
            })?;

        Ok(tasks)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = $1",
            TASK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn create(&self, user_id: &str, fields: TaskFields) -> StoreResult<Task> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, user_id, task, date_start, date_due, completed)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(new_id())
        .bind(user_id)
        .bind(&fields.task)
        .bind(fields.date_start)
        .bind(fields.date_due)
        .bind(fields.completed)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Database error creating task: {}", e);
            e
        })?;

        Ok(task)
    }

    async fn update(&self, id: &str, fields: TaskFields) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks
             SET task = $1, date_start = $2, date_due = $3, completed = $4, updated_at = NOW()
             WHERE id = $5
             RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(&fields.task)
        .bind(fields.date_start)
        .bind(fields.date_due)
        .bind(fields.completed)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Database error updating task: {}", e);
            e
        })?;

        Ok(task)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TaskDetailsRepository for Database {
    async fn list(&self) -> StoreResult<Vec<TaskDetails>> {
        let details = sqlx::query_as::<_, TaskDetails>(&format!(
            "SELECT {} FROM task_details ORDER BY created_at",
            DETAILS_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<TaskDetails>> {
        let details = sqlx::query_as::<_, TaskDetails>(&format!(
            "SELECT {} FROM task_details WHERE id = $1",
            DETAILS_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(details)
    }

    async fn find_by_task_id(&self, task_id: &str) -> StoreResult<Option<TaskDetails>> {
        let details = sqlx::query_as::<_, TaskDetails>(&format!(
            "SELECT {} FROM task_details WHERE task_id = $1 ORDER BY created_at LIMIT 1",
            DETAILS_COLUMNS
        ))
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(details)
    }

    async fn create(&self, task_id: &str, fields: DetailsFields) -> StoreResult<TaskDetails> {
        let details = sqlx::query_as::<_, TaskDetails>(&format!(
            "INSERT INTO task_details (id, task_id, summary, notes, status, priority)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            DETAILS_COLUMNS
        ))
        .bind(new_id())
        .bind(task_id)
        .bind(&fields.summary)
        .bind(&fields.notes)
        .bind(&fields.status)
        .bind(&fields.priority)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Database error creating task details: {}", e);
            e
        })?;

        Ok(details)
    }

    async fn update(&self, id: &str, fields: DetailsFields) -> StoreResult<Option<TaskDetails>> {
        let details = sqlx::query_as::<_, TaskDetails>(&format!(
            "UPDATE task_details
             SET summary = $1, notes = $2, status = $3, priority = $4, updated_at = NOW()
             WHERE id = $5
             RETURNING {}",
            DETAILS_COLUMNS
        ))
        .bind(&fields.summary)
        .bind(&fields.notes)
        .bind(&fields.status)
        .bind(&fields.priority)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(details)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM task_details WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UserRepository for Database {
    async fn list(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = $1",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE lower(email) = lower($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, user: NewUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, first_name, last_name, email, password_hash)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(new_id())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Database error creating user: {}", e);
            e
        })?;

        Ok(user)
    }
}
