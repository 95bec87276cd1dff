use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::utils::errors::ServiceError;

pub mod details;
pub mod health;
pub mod task;
pub mod user;

pub use details::details_config;
pub use task::task_config;
pub use user::user_config;

fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::warn!("Rejected body for {} {}: {}", req.method(), req.path(), err);
    ServiceError::ValidationError("Invalid request body".to_string()).into()
}

/// Registers every route of the API.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("/", web::get().to(health::index))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/v1")
                        .configure(health::configure)
                        .configure(task_config)
                        .configure(details_config)
                        .configure(user_config),
                )
                .service(web::scope("/v2").configure(health::configure)),
        );
}
