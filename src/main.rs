use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod config;
mod db;
mod dto;
mod error;
mod handlers;
mod models;
mod services;
mod store;

use config::Config;
use store::memory::MemoryStore;
use store::postgres::PgHabitStore;
use store::HabitStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HabitStore>,
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/ws", get(handlers::ws::ws_handler))
        // Habits
        .route("/api/habits", get(handlers::habits::list_habits))
        .route("/api/habits", post(handlers::habits::create_habit))
        .route("/api/habits/:id", get(handlers::habits::get_habit))
        .route(
            "/api/habits/:id/complete",
            put(handlers::habits::toggle_habit),
        )
        .route("/api/habits/:id", delete(handlers::habits::delete_habit))
        // Stats
        .route("/api/stats", get(handlers::stats::get_stats))
        .with_state(state)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "habitdeck_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Config::from_env();

    let store: Arc<dyn HabitStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::create_pool(url).await;

            // Run migrations
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .expect("Failed to run database migrations");

            tracing::info!("Database migrations applied");
            Arc::new(PgHabitStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store; state is not persisted");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState { store };

    let allowed_origins: Vec<axum::http::HeaderValue> = {
        let mut origins = vec![config
            .frontend_url
            .parse::<axum::http::HeaderValue>()
            .unwrap()];
        // In dev, also allow LAN access (e.g. testing from another device)
        if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
            for o in extra.split(',') {
                if let Ok(hv) = o.trim().parse::<axum::http::HeaderValue>() {
                    origins.push(hv);
                }
            }
        }
        origins
    };
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true);

    let app = app(state).layer(cors).layer(TraceLayer::new_for_http());

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
