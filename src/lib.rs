pub mod api;
pub mod config;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use sqlx::SqlitePool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::ImportConfig;
use crate::services::datasource::DataSource;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::health::health_check,
        api::handlers::import::list_datasources,
        api::handlers::import::upload_form,
        api::handlers::import::run_upload,
        api::handlers::import::get_job,
    ),
    components(
        schemas(
            api::handlers::health::HealthResponse,
            api::handlers::import::UploadResponse,
            models::ImportJob,
            models::SourceInfo,
            models::FormFragment,
            models::FormMessage,
            models::MessageLevel,
            models::ImportOutcome,
        )
    ),
    tags(
        (name = "system", description = "Health and diagnostics"),
        (name = "import", description = "Bulk import data sources and jobs")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: ImportConfig,
    pub sources: Arc<Vec<Arc<dyn DataSource>>>,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route(
            "/import/datasources",
            get(api::handlers::import::list_datasources),
        )
        .route("/import/upload/form", get(api::handlers::import::upload_form))
        .route("/import/upload", post(api::handlers::import::run_upload))
        .route("/import/jobs/:id", get(api::handlers::import::get_job))
        .with_state(state)
}
