use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::details::TaskDetails;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Task {
    pub id: String,
    pub user_id: String,
    pub task: String,
    pub date_start: Option<DateTime<Utc>>,
    pub date_due: Option<DateTime<Utc>>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated, store-ready values for creating or overwriting a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFields {
    pub task: String,
    pub date_start: Option<DateTime<Utc>>,
    pub date_due: Option<DateTime<Utc>>,
    pub completed: bool,
}

/// A task joined with its optional details record for a single response.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TaskWithDetails {
    pub id: String,
    pub user_id: String,
    pub task: String,
    pub date_start: Option<DateTime<Utc>>,
    pub date_due: Option<DateTime<Utc>>,
    pub completed: bool,
    pub details: Option<TaskDetails>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskWithDetails {
    pub fn new(task: Task, details: Option<TaskDetails>) -> Self {
        TaskWithDetails {
            id: task.id,
            user_id: task.user_id,
            task: task.task,
            date_start: task.date_start,
            date_due: task.date_due,
            completed: task.completed,
            details,
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Body of both the create and the update endpoint.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TaskRequest {
    /// Owning user; tasks created without one are unowned.
    #[serde(default)]
    pub user_id: Option<String>,
    #[validate(length(min = 1, message = "Task name is required"))]
    pub task: String,
    /// RFC 3339, `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM:SS`.
    #[serde(default)]
    pub date_start: Option<String>,
    #[serde(default)]
    pub date_due: Option<String>,
    #[serde(default)]
    pub completed: bool,
}
