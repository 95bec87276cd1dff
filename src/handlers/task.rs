use actix_web::{web, HttpResponse, Result};
use validator::Validate;

use crate::models::response::{ApiResponse, MessageResponse};
use crate::models::task::{Task, TaskFields, TaskRequest, TaskWithDetails};
use crate::services::assembler::{self, ListParams, ListQuery, Page};
use crate::state::AppState;
use crate::utils::dates::parse_optional;
use crate::utils::errors::ServiceError;

// Validates a create/update body and turns it into store-ready fields
fn task_fields(req: &TaskRequest) -> Result<TaskFields, ServiceError> {
    if req.task.trim().is_empty() {
        return Err(ServiceError::ValidationError("Task name is required".to_string()));
    }
    req.validate()?;

    let date_start = parse_optional(req.date_start.as_deref(), "date_start")?;
    let date_due = parse_optional(req.date_due.as_deref(), "date_due")?;

    if let (Some(start), Some(due)) = (date_start, date_due) {
        if start > due {
            return Err(ServiceError::ValidationError(
                "Start date cannot be after due date".to_string(),
            ));
        }
    }

    Ok(TaskFields {
        task: req.task.clone(),
        date_start,
        date_due,
        completed: req.completed,
    })
}

async fn find_task(state: &AppState, task_id: &str) -> Result<Task, ServiceError> {
    state.tasks.get(task_id).await?.ok_or_else(|| {
        log::warn!("Todo not found: {}", task_id);
        ServiceError::NotFound("Todo not found".to_string())
    })
}

/// List todos with their details, sorted and paginated
#[utoipa::path(
    get,
    path = "/api/v1/todos",
    tag = "todos",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of todos", body = ApiResponse<Page>),
        (status = 500, description = "Listing failed", body = MessageResponse)
    )
)]
pub async fn get_todos(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/v1/todos");

    let params = ListParams::from_query(&query);

    let tasks = state.tasks.list().await.map_err(|e| {
        log::error!("Failed to list todos: {}", e);
        ServiceError::ListingFailed(e.to_string())
    })?;

    let page = assembler::assemble(tasks, state.details.as_ref(), &params).await;

    log::info!(
        "Retrieved {} of {} todos (page {}/{})",
        page.items.len(),
        page.pagination.total_items,
        page.pagination.current_page,
        page.pagination.total_pages
    );
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// Get a single todo with its details
#[utoipa::path(
    get,
    path = "/api/v1/todos/{id}",
    tag = "todos",
    params(
        ("id" = String, Path, description = "Todo ID")
    ),
    responses(
        (status = 200, description = "Todo retrieved", body = ApiResponse<TaskWithDetails>),
        (status = 404, description = "Todo not found", body = MessageResponse)
    )
)]
pub async fn get_todo(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let task_id = path.into_inner();
    log::info!("GET /api/v1/todos/{}", task_id);

    let task = find_task(&state, &task_id).await?;
    let details = assembler::attached_details(state.details.as_ref(), &task.id).await;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(TaskWithDetails::new(task, details))))
}

/// Create a todo
#[utoipa::path(
    post,
    path = "/api/v1/todos/create",
    tag = "todos",
    request_body = TaskRequest,
    responses(
        (status = 201, description = "Todo created", body = ApiResponse<Task>),
        (status = 400, description = "Validation error", body = MessageResponse)
    )
)]
pub async fn create_todo(
    state: web::Data<AppState>,
    body: web::Json<TaskRequest>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("POST /api/v1/todos/create - Creating todo: {}", body.task);

    let fields = task_fields(&body)?;
    let user_id = body.user_id.as_deref().unwrap_or_default();
    let task = state.tasks.create(user_id, fields).await?;

    log::info!("Todo created successfully with ID: {}", task.id);
    Ok(HttpResponse::Created().json(ApiResponse::created(task)))
}

/// Overwrite a todo's title, dates and completion flag
#[utoipa::path(
    put,
    path = "/api/v1/todos/update/{id}",
    tag = "todos",
    params(
        ("id" = String, Path, description = "Todo ID")
    ),
    request_body = TaskRequest,
    responses(
        (status = 200, description = "Todo updated", body = ApiResponse<Task>),
        (status = 400, description = "Validation error", body = MessageResponse),
        (status = 404, description = "Todo not found", body = MessageResponse)
    )
)]
pub async fn update_todo(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<TaskRequest>,
) -> Result<HttpResponse, ServiceError> {
    let task_id = path.into_inner();
    log::info!("PUT /api/v1/todos/update/{}", task_id);

    let fields = task_fields(&body)?;
    let task = state
        .tasks
        .update(&task_id, fields)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Todo not found".to_string()))?;

    log::info!("Todo updated successfully: {}", task_id);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(task)))
}

/// Flip a todo's completion flag
#[utoipa::path(
    put,
    path = "/api/v1/todos/toggle/{id}",
    tag = "todos",
    params(
        ("id" = String, Path, description = "Todo ID")
    ),
    responses(
        (status = 200, description = "Completion toggled", body = ApiResponse<Task>),
        (status = 404, description = "Todo not found", body = MessageResponse)
    )
)]
pub async fn toggle_todo(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let task_id = path.into_inner();
    log::info!("PUT /api/v1/todos/toggle/{}", task_id);

    let current = find_task(&state, &task_id).await?;
    let fields = TaskFields {
        task: current.task,
        date_start: current.date_start,
        date_due: current.date_due,
        completed: !current.completed,
    };

    // The todo may have been deleted between the read and the write.
    let task = state
        .tasks
        .update(&task_id, fields)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Todo not found".to_string()))?;

    log::info!("Todo {} marked completed={}", task_id, task.completed);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(task)))
}

/// Delete a todo
#[utoipa::path(
    delete,
    path = "/api/v1/todos/delete/{id}",
    tag = "todos",
    params(
        ("id" = String, Path, description = "Todo ID")
    ),
    responses(
        (status = 200, description = "Todo deleted", body = MessageResponse),
        (status = 404, description = "Todo not found", body = MessageResponse)
    )
)]
pub async fn delete_todo(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let task_id = path.into_inner();
    log::info!("DELETE /api/v1/todos/delete/{}", task_id);

    if !state.tasks.delete(&task_id).await? {
        return Err(ServiceError::NotFound("Todo not found".to_string()));
    }

    log::info!("Todo deleted successfully: {}", task_id);
    Ok(HttpResponse::Ok().json(MessageResponse::new(200, "Successfully deleted todo")))
}

pub fn task_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/todos")
            .route("", web::get().to(get_todos))
            .route("/create", web::post().to(create_todo))
            .route("/update/{id}", web::put().to(update_todo))
            .route("/toggle/{id}", web::put().to(toggle_todo))
            .route("/delete/{id}", web::delete().to(delete_todo))
            .route("/{id}", web::get().to(get_todo)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(task: &str, start: Option<&str>, due: Option<&str>) -> TaskRequest {
        TaskRequest {
            user_id: None,
            task: task.to_string(),
            date_start: start.map(String::from),
            date_due: due.map(String::from),
            completed: false,
        }
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = task_fields(&request("   ", None, None)).unwrap_err();
        assert_eq!(err.to_string(), "Validation Error: Task name is required");
    }

    #[test]
    fn long_titles_are_accepted() {
        let title = "x".repeat(2_000);
        let fields = task_fields(&request(&title, None, None)).unwrap();
        assert_eq!(fields.task.len(), 2_000);
    }

    #[test]
    fn start_after_due_is_rejected() {
        let err = task_fields(&request("ship", Some("2024-05-02"), Some("2024-05-01"))).unwrap_err();
        assert_eq!(err.to_string(), "Validation Error: Start date cannot be after due date");
    }

    #[test]
    fn equal_start_and_due_are_accepted() {
        let fields = task_fields(&request("ship", Some("2024-05-01"), Some("2024-05-01T00:00:00Z"))).unwrap();
        assert_eq!(fields.date_start, fields.date_due);
    }

    #[test]
    fn one_sided_dates_skip_ordering_check() {
        let fields = task_fields(&request("ship", None, Some("2024-05-01"))).unwrap();
        assert!(fields.date_start.is_none());
        assert!(fields.date_due.is_some());
    }
}
