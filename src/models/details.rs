use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use chrono::{DateTime, Utc};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize, ToSchema)]
pub struct TaskDetails {
    pub id: String,
    pub task_id: String,
    pub summary: String,
    pub notes: String,
    pub status: String,
    pub priority: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsFields {
    pub summary: String,
    pub notes: String,
    pub status: String,
    pub priority: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDetailsRequest {
    #[validate(length(min = 1, message = "task_id is required"))]
    pub task_id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateDetailsRequest {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub priority: String,
}

impl From<CreateDetailsRequest> for DetailsFields {
    fn from(req: CreateDetailsRequest) -> Self {
        DetailsFields {
            summary: req.summary,
            notes: req.notes,
            status: req.status,
            priority: req.priority,
        }
    }
}

impl From<UpdateDetailsRequest> for DetailsFields {
    fn from(req: UpdateDetailsRequest) -> Self {
        DetailsFields {
            summary: req.summary,
            notes: req.notes,
            status: req.status,
            priority: req.priority,
        }
    }
}
