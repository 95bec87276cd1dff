use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use todo_be::config::{AppConfig, StorageBackend};
use todo_be::docs::ApiDoc;
use todo_be::{handlers, AppState, Database};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Reads .env, so it runs before the logger picks up RUST_LOG.
    let config = AppConfig::from_env();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config.map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    let state = match (config.storage, config.database_url.as_deref()) {
        (StorageBackend::Postgres, Some(url)) => {
            let db = Database::new(url)
                .await
                .map(Arc::new)
                .map_err(|e| {
                    log::error!("❌ {:#}", e);
                    std::io::Error::new(std::io::ErrorKind::ConnectionRefused, e.to_string())
                })?;

            if let Err(e) = db.ensure_schema().await {
                log::error!("❌ {:#}", e);
                return Err(std::io::Error::new(std::io::ErrorKind::Other, e.to_string()));
            }
            if let Err(e) = db.check_tables().await {
                log::warn!("⚠️  {:#}", e);
            }
            match db.get_stats().await {
                Ok(stats) => stats.log_stats(),
                Err(e) => log::warn!("⚠️  {:#}", e),
            }

            AppState::postgres(db, config.bcrypt_cost)
        }
        _ => {
            log::warn!("⚠️  Using in-memory storage; data is lost on restart");
            AppState::in_memory(config.bcrypt_cost)
        }
    };

    log::info!("🚀 Starting Todo Backend API on port {} ({})", config.port, config.environment);
    log::info!("📋 Allowed frontend URLs: {:?}", config.frontend_urls);

    let allowed_origins = config.frontend_urls.clone();
    let serve_docs = config.is_development();
    let state = web::Data::new(state);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                "Authorization",
                "Content-Type",
                "Accept",
                "Origin",
                "X-Requested-With",
            ])
            .supports_credentials()
            .max_age(300);

        // Add allowed origins
        for origin in &allowed_origins {
            cors = cors.allowed_origin(origin);
        }

        let mut app = App::new()
            .wrap(cors)
            .wrap(actix_web::middleware::Logger::default())
            .app_data(state.clone())
            .configure(handlers::configure);

        if serve_docs {
            app = app.service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
            );
        }

        app
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}
