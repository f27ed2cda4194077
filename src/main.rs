//! Parkflow Backend Server
//!
//! Backend for parking lot administration: spot and tier catalogs, vehicle
//! admission, occupancy tracking, and fee settlement. Entity collections are
//! served through a Redis cache in front of PostgreSQL.

use actix_web::{http::header, middleware, web, App, HttpResponse, HttpServer};
use parkflow_api::{
    configure_audits, configure_occupancy, configure_spots, configure_tiers, configure_vehicles,
};
use parkflow_cache::RedisCache;
use parkflow_core::config::AppConfig;
use parkflow_db::create_pool;
use std::env;
use std::time::Duration;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "parkflow",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Configure API routes
fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Health check
            .route("/health", web::get().to(health_check))
            // Parking spot catalog
            .configure(configure_spots)
            // Price tier catalog
            .configure(configure_tiers)
            // Vehicle admission and settlement
            .configure(configure_vehicles)
            // Occupancy mappings
            .configure(configure_occupancy)
            // Audit trail
            .configure(configure_audits),
    );
}

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "parkflow={},parkflow_api={},parkflow_services={},parkflow_db={},parkflow_cache={},actix_web=info,sqlx=warn",
            log_level, log_level, log_level, log_level, log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    init_tracing();

    info!("Starting Parkflow backend v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // CORS configuration
    let cors_origins = env::var("CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    info!("Connecting to database...");
    let pool = create_pool(&config.database.url, Some(config.database.max_connections))
        .await
        .expect("Failed to create database pool");

    info!(
        "Database connection established with {} max connections",
        config.database.max_connections
    );

    // The cache is load-bearing for every read path; refuse to boot without it
    info!("Connecting to Redis...");
    let cache = RedisCache::new(&config.redis.url)
        .await
        .expect("Failed to connect to Redis");
    cache.ping().await.expect("Redis health check failed");

    info!("Redis connection established");

    let bind_addr = config.server_addr();
    info!(
        "Starting HTTP server on {} with {} workers",
        bind_addr, config.server.workers
    );

    let workers = config.server.workers;
    let timeout_secs = config.server.timeout_secs;

    // Create and run server
    HttpServer::new(move || {
        // Configure CORS - clone cors_origins for each worker
        let cors_origins_inner = cors_origins.clone();
        let cors = actix_cors::Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origins: Vec<&str> = cors_origins_inner.split(',').collect();
                if let Ok(origin_str) = origin.to_str() {
                    origins.iter().any(|o| o.trim() == origin_str)
                } else {
                    false
                }
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            // Add database pool and cache to app data
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                let error_message = err.to_string();
                actix_web::error::InternalError::from_response(
                    err,
                    HttpResponse::BadRequest().json(serde_json::json!({
                        "error": "invalid_query",
                        "message": error_message
                    })),
                )
                .into()
            }))
            // Middleware
            .wrap(cors)
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(middleware::NormalizePath::trim())
            // Configure routes
            .configure(configure_routes)
            // Root redirect to health
            .route(
                "/",
                web::get().to(|| async {
                    HttpResponse::Found()
                        .append_header(("Location", "/api/v1/health"))
                        .finish()
                }),
            )
    })
    .workers(workers)
    .client_request_timeout(Duration::from_secs(timeout_secs))
    .bind(&bind_addr)?
    .run()
    .await
}
