use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::AppState;
use crate::api::error::AppError;
use crate::models::{FormFragment, ImportJob, SourceInfo};
use crate::services::datasource::{self, SubmittedValues};
use crate::services::jobs;

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub job_id: String,
    pub table_name: String,
    pub number_of_columns: usize,
    pub column_headers: Vec<String>,
    pub rows_imported: u64,
}

#[utoipa::path(
    get,
    path = "/import/datasources",
    responses(
        (status = 200, description = "Registered data sources", body = [SourceInfo])
    ),
    tag = "import"
)]
pub async fn list_datasources(State(state): State<AppState>) -> Json<Vec<SourceInfo>> {
    Json(state.sources.iter().map(|s| s.info()).collect())
}

#[utoipa::path(
    get,
    path = "/import/upload/form",
    responses(
        (status = 200, description = "Upload source form fragment", body = FormFragment)
    ),
    tag = "import"
)]
pub async fn upload_form(State(state): State<AppState>) -> Result<Json<FormFragment>, AppError> {
    let source = datasource::find(&state.sources, "upload")
        .ok_or_else(|| AppError::NotFound("Data source 'upload' not found".to_string()))?;

    Ok(Json(source.build_form(&state.config)))
}

#[utoipa::path(
    post,
    path = "/import/upload",
    request_body = Object,
    responses(
        (status = 200, description = "File staged for import", body = UploadResponse),
        (status = 400, description = "Invalid selection or unreadable file")
    ),
    tag = "import"
)]
pub async fn run_upload(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<UploadResponse>, AppError> {
    let source = datasource::find(&state.sources, "upload")
        .ok_or_else(|| AppError::NotFound("Data source 'upload' not found".to_string()))?;

    let values = SubmittedValues::from_form(body, source.submittable_fields());

    let job = jobs::create_job(&state.db, &source.info().name).await?;

    match source
        .initialize(&state.db, &state.config, &job.id, &values)
        .await
    {
        Ok(outcome) => Ok(Json(UploadResponse {
            job_id: job.id,
            table_name: outcome.table_name,
            number_of_columns: outcome.number_of_columns,
            column_headers: outcome.column_headers,
            rows_imported: outcome.rows_imported,
        })),
        Err(e) => {
            // An interrupted load may leave a partial staging table behind;
            // the job lifecycle discards it later.
            jobs::mark_failed(&state.db, &job.id, &e.to_string()).await?;
            Err(e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/import/jobs/{id}",
    params(
        ("id" = String, Path, description = "Import job id")
    ),
    responses(
        (status = 200, description = "Import job record", body = ImportJob),
        (status = 404, description = "Unknown job")
    ),
    tag = "import"
)]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ImportJob>, AppError> {
    Ok(Json(jobs::fetch_job(&state.db, &id).await?))
}
