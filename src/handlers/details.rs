use actix_web::{web, HttpResponse, Result};
use validator::Validate;

use crate::models::details::{CreateDetailsRequest, TaskDetails, UpdateDetailsRequest};
use crate::models::response::{ApiResponse, Items, MessageResponse};
use crate::state::AppState;
use crate::utils::errors::ServiceError;

/// List every details record
#[utoipa::path(
    get,
    path = "/api/v1/todo-details",
    tag = "todo-details",
    responses(
        (status = 200, description = "Details retrieved", body = ApiResponse<Items<TaskDetails>>)
    )
)]
pub async fn get_all_details(state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/v1/todo-details");

    let items = state.details.list().await?;

    log::info!("Retrieved {} details records", items.len());
    Ok(HttpResponse::Ok().json(ApiResponse::ok(Items { items })))
}

/// Get a details record by its own ID
#[utoipa::path(
    get,
    path = "/api/v1/todo-details/{id}",
    tag = "todo-details",
    params(
        ("id" = String, Path, description = "Details ID")
    ),
    responses(
        (status = 200, description = "Details retrieved", body = ApiResponse<TaskDetails>),
        (status = 404, description = "Details not found", body = MessageResponse)
    )
)]
pub async fn get_details(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let details_id = path.into_inner();
    log::info!("GET /api/v1/todo-details/{}", details_id);

    let details = state
        .details
        .get(&details_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Todo details not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(details)))
}

/// Attach details to a todo
#[utoipa::path(
    post,
    path = "/api/v1/todo-details/create",
    tag = "todo-details",
    request_body = CreateDetailsRequest,
    responses(
        (status = 201, description = "Details created", body = ApiResponse<TaskDetails>),
        (status = 400, description = "Validation error", body = MessageResponse),
        (status = 409, description = "Todo already has details", body = MessageResponse)
    )
)]
pub async fn create_details(
    state: web::Data<AppState>,
    body: web::Json<CreateDetailsRequest>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("POST /api/v1/todo-details/create - For todo: {}", body.task_id);

    body.validate()?;
    let req = body.into_inner();
    let task_id = req.task_id.clone();

    if state.tasks.get(&task_id).await?.is_none() {
        return Err(ServiceError::ValidationError(format!("Todo '{}' not found", task_id)));
    }

    if state.details.find_by_task_id(&task_id).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "Todo '{}' already has details",
            task_id
        )));
    }

    let details = state.details.create(&task_id, req.into()).await?;

    log::info!("Details {} created for todo {}", details.id, task_id);
    Ok(HttpResponse::Created().json(ApiResponse::created(details)))
}

/// Overwrite a details record
#[utoipa::path(
    put,
    path = "/api/v1/todo-details/update/{id}",
    tag = "todo-details",
    params(
        ("id" = String, Path, description = "Details ID")
    ),
    request_body = UpdateDetailsRequest,
    responses(
        (status = 200, description = "Details updated", body = ApiResponse<TaskDetails>),
        (status = 404, description = "Details not found", body = MessageResponse)
    )
)]
pub async fn update_details(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateDetailsRequest>,
) -> Result<HttpResponse, ServiceError> {
    let details_id = path.into_inner();
    log::info!("PUT /api/v1/todo-details/update/{}", details_id);

    let details = state
        .details
        .update(&details_id, body.into_inner().into())
        .await?
        .ok_or_else(|| ServiceError::NotFound("Todo details not found".to_string()))?;

    log::info!("Details updated successfully: {}", details_id);
    Ok(HttpResponse::Ok().json(ApiResponse::ok(details)))
}

/// Delete a details record
#[utoipa::path(
    delete,
    path = "/api/v1/todo-details/delete/{id}",
    tag = "todo-details",
    params(
        ("id" = String, Path, description = "Details ID")
    ),
    responses(
        (status = 200, description = "Details deleted", body = MessageResponse),
        (status = 404, description = "Details not found", body = MessageResponse)
    )
)]
pub async fn delete_details(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let details_id = path.into_inner();
    log::info!("DELETE /api/v1/todo-details/delete/{}", details_id);

    if !state.details.delete(&details_id).await? {
        return Err(ServiceError::NotFound("Todo details not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(MessageResponse::new(200, "Successfully deleted todo details")))
}

pub fn details_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/todo-details")
            .route("", web::get().to(get_all_details))
            .route("/create", web::post().to(create_details))
            .route("/update/{id}", web::put().to(update_details))
            .route("/delete/{id}", web::delete().to(delete_details))
            .route("/{id}", web::get().to(get_details)),
    );
}
