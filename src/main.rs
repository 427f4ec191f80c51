mod api;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "5001".to_string());
    let database_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");
    // Fail fast instead of signing tokens with a fallback secret
    env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let allowed_origins = env::var("ALLOWED_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:5173,http://127.0.0.1:5173".to_string());

    log::info!("🚀 Starting AdChain Service...");
    log::info!("📊 Database: {}", database_url);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        for origin in allowed_origins.split(',').map(str::trim).filter(|o| !o.is_empty()) {
            cors = cors.allowed_origin(origin);
        }

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .wrap(cors)
            .wrap(middleware::SecurityHeaders)
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone())
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Account service: signup/login are public, the rest requires JWT
            .service(
                web::scope("/api/users")
                    .route("/signup", web::post().to(api::users::signup))
                    .route("/login", web::post().to(api::users::login))
                    .service(
                        web::resource("/profile")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(web::get().to(api::users::get_profile))
                            .route(web::put().to(api::users::update_profile))
                    )
                    .service(
                        web::resource("/notifications")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route(web::get().to(api::users::get_notifications))
                    )
            )
            // Ad service: all routes require JWT
            .service(
                web::scope("/api/ads")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("", web::post().to(api::ads::create_ad))
                    .route("", web::get().to(api::ads::get_ads))
                    .route("/posted", web::get().to(api::ads::get_posted_ads))
                    .route("/accepted", web::get().to(api::ads::get_accepted_ads))
                    .route("/{id}/accept", web::post().to(api::ads::accept_ad))
                    .route("/{id}/submit-proof", web::post().to(api::ads::submit_proof))
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
