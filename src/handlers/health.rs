use actix_web::{web, HttpResponse, Result};
use serde::Serialize;
use utoipa::ToSchema;

use crate::database::DatabaseStats;
use crate::models::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub storage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<HealthStats>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStats {
    pub users: i64,
    pub tasks: i64,
    pub details: i64,
}

// A failed count query leaves the stats out rather than reporting zeros.
fn reported_stats(stats: anyhow::Result<DatabaseStats>) -> Option<HealthStats> {
    match stats {
        Ok(stats) => Some(HealthStats {
            users: stats.users,
            tasks: stats.tasks,
            details: stats.details,
        }),
        Err(e) => {
            log::warn!("⚠️  Could not collect database stats: {:#}", e);
            None
        }
    }
}

/// Service and storage health
#[utoipa::path(
    get,
    path = "/api/v1/healthcheck",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = ApiResponse<HealthStatus>),
        (status = 503, description = "Database unreachable", body = MessageResponse)
    )
)]
pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    let Some(db) = &state.database else {
        return Ok(HttpResponse::Ok().json(ApiResponse::ok(HealthStatus {
            status: "ok".to_string(),
            storage: state.storage_name().to_string(),
            stats: None,
        })));
    };

    match db.health_check().await {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiResponse::ok(HealthStatus {
            status: "ok".to_string(),
            storage: state.storage_name().to_string(),
            stats: reported_stats(db.get_stats().await),
        }))),
        Err(e) => {
            log::error!("Database health check failed: {}", e);
            Ok(HttpResponse::ServiceUnavailable().json(MessageResponse::new(
                503,
                "Database connection failed",
            )))
        }
    }
}

pub async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "name": "Todo Backend API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "REST API for todo lists"
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/healthcheck", web::get().to(health_check));
}
