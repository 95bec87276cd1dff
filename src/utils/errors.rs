use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use std::fmt;

use crate::models::response::MessageResponse;

/// Failures raised by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness rule rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(db.constraint().unwrap_or("unique constraint").to_string())
            }
            _ => StoreError::Database(err),
        }
    }
}

#[derive(Debug)]
pub enum ServiceError {
    NotFound(String),
    ValidationError(String),
    Conflict(String),
    DatabaseError(String),
    InternalError(String),
    ListingFailed(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ServiceError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            ServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ServiceError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            ServiceError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
            ServiceError::ListingFailed(msg) => write!(f, "Listing Failed: {}", msg),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::DatabaseError(_)
            | ServiceError::InternalError(_)
            | ServiceError::ListingFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match self {
            ServiceError::NotFound(msg) => {
                log::warn!("Not Found: {}", msg);
                msg.clone()
            }
            ServiceError::ValidationError(msg) => {
                log::warn!("Validation Error: {}", msg);
                msg.clone()
            }
            ServiceError::Conflict(msg) => {
                log::warn!("Conflict: {}", msg);
                msg.clone()
            }
            ServiceError::DatabaseError(msg) => {
                log::error!("Database Error: {}", msg);
                "Database operation failed".to_string() // Don't expose database details
            }
            ServiceError::InternalError(msg) => {
                log::error!("Internal Error: {}", msg);
                "Something went wrong".to_string()
            }
            ServiceError::ListingFailed(msg) => {
                log::error!("Listing Failed: {}", msg);
                "Failed to fetch todos".to_string()
            }
        };

        HttpResponse::build(status).json(MessageResponse::new(status.as_u16(), message))
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(what) => {
                ServiceError::Conflict(format!("Record already exists ({})", what))
            }
            StoreError::Database(e) => ServiceError::DatabaseError(e.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errs: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errs.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let messages: Vec<String> = fields
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid {}", field),
                })
            })
            .collect();

        ServiceError::ValidationError(messages.join("; "))
    }
}

// Convert bcrypt errors to ServiceError
impl From<bcrypt::BcryptError> for ServiceError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ServiceError::InternalError(format!("Password hashing error: {}", err))
    }
}
