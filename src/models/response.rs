use serde::Serialize;
use utoipa::ToSchema;

/// `{code, data}` envelope wrapped around every successful read.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { code: 200, data }
    }

    pub fn created(data: T) -> Self {
        Self { code: 201, data }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Items<T> {
    pub items: Vec<T>,
}

/// `{code, message}` body for mutations and errors.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub code: u16,
    pub message: String,
}

impl MessageResponse {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
