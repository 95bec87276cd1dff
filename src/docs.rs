use utoipa::OpenApi;

use crate::handlers::{details, health, task, user};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo Backend API",
        description = "REST API for todo lists, their details and user accounts"
    ),
    paths(
        health::health_check,
        task::get_todos,
        task::get_todo,
        task::create_todo,
        task::update_todo,
        task::toggle_todo,
        task::delete_todo,
        details::get_all_details,
        details::get_details,
        details::create_details,
        details::update_details,
        details::delete_details,
        user::create_user,
        user::get_users,
        user::get_user,
    ),
    tags(
        (name = "health", description = "Service status"),
        (name = "todos", description = "Todo items"),
        (name = "todo-details", description = "Notes, status and priority attached to a todo"),
        (name = "users", description = "User accounts")
    )
)]
pub struct ApiDoc;
