pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod storage;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Database;
use crate::models::{
    AccessLevel, Department, Device, EmployeeDepartment, EmployeeDevice, ExchangeHistory,
    FileExchangeHistory, FileMainLocation, Position,
};
use crate::storage::{LocalStorage, StorageProvider};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    pub storage: Arc<dyn StorageProvider>,
}

impl AppState {
    /// State backed by local disk storage at the configured upload path
    pub fn new(db: Database, config: Config) -> Self {
        let storage = Arc::new(LocalStorage::new(&config.storage.upload_path));
        Self {
            db,
            config: Arc::new(config),
            storage,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/token", post(handlers::auth::token))
        .route("/api/employee", post(handlers::employee::create_employee))
        .route("/api/department", handlers::resource::routes::<Department>())
        .route("/api/device", handlers::resource::routes::<Device>())
        .route("/api/position", handlers::resource::routes::<Position>())
        .route("/api/accesslevel", handlers::resource::routes::<AccessLevel>())
        .route(
            "/api/employeedepartment",
            handlers::resource::routes::<EmployeeDepartment>(),
        )
        .route(
            "/api/employeedevice",
            handlers::resource::routes::<EmployeeDevice>(),
        )
        .route(
            "/api/exchangehistory",
            handlers::resource::routes::<ExchangeHistory>(),
        )
        .route(
            "/api/filemainlocation",
            handlers::resource::routes::<FileMainLocation>(),
        )
        .route(
            "/api/fileexchangehistory",
            handlers::resource::routes::<FileExchangeHistory>(),
        );

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/api/employee", get(handlers::employee::list_employees))
        .route(
            "/api/filemain",
            get(handlers::file::list_files).post(handlers::file::upload_file),
        )
        // Upload also accepts an id segment; it is ignored since ids are database assigned
        .route(
            "/api/filemain/:id",
            get(handlers::file::download_file)
                .post(handlers::file::upload_file)
                .delete(handlers::file::delete_file),
        )
        .route("/api/filedelete/:id", delete(handlers::file::delete_file))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(state.config.storage.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
