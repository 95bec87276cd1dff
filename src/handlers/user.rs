use actix_web::{web, HttpResponse, Result};
use validator::Validate;

use crate::models::response::{ApiResponse, Items, MessageResponse};
use crate::models::user::{CreateUserRequest, NewUser, UserResponse};
use crate::state::AppState;
use crate::utils::errors::ServiceError;

/// Register a user
#[utoipa::path(
    post,
    path = "/api/v1/users/create",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserResponse>),
        (status = 400, description = "Validation error", body = MessageResponse),
        (status = 409, description = "Email already registered", body = MessageResponse)
    )
)]
pub async fn create_user(
    state: web::Data<AppState>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, ServiceError> {
    log::info!("POST /api/v1/users/create - Registering: {}", body.email);

    body.validate()?;
    let req = body.into_inner();

    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(ServiceError::Conflict("Email is already registered".to_string()));
    }

    // Hash on the blocking pool
    let cost = state.bcrypt_cost;
    let password = req.password;
    let password_hash = web::block(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ServiceError::InternalError(format!("Hashing task failed: {}", e)))??;

    let user = state
        .users
        .create(NewUser {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password_hash,
        })
        .await?;

    log::info!("User created successfully with ID: {}", user.id);
    Ok(HttpResponse::Created().json(ApiResponse::created(UserResponse::from(user))))
}

/// List users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved", body = ApiResponse<Items<UserResponse>>)
    )
)]
pub async fn get_users(state: web::Data<AppState>) -> Result<HttpResponse, ServiceError> {
    log::info!("GET /api/v1/users");

    let items: Vec<UserResponse> = state
        .users
        .list()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    log::info!("Retrieved {} users", items.len());
    Ok(HttpResponse::Ok().json(ApiResponse::ok(Items { items })))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User retrieved", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = MessageResponse)
    )
)]
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = path.into_inner();
    log::info!("GET /api/v1/users/{}", user_id);

    let user = state
        .users
        .get(&user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(UserResponse::from(user))))
}

pub fn user_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(get_users))
            .route("/create", web::post().to(create_user))
            .route("/{id}", web::get().to(get_user)),
    );
}
