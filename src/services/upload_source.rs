use std::fs;
use std::path::{Path, PathBuf};

use sqlx::SqlitePool;
use tracing::info;

use crate::api::error::AppError;
use crate::config::{ImportConfig, IngestMode};
use crate::models::{FormFragment, FormMessage, ImportOutcome, MessageLevel, SourceInfo};
use crate::services::datasource::{DataSource, SubmittedValues};
use crate::services::{jobs, source_reader, staging};
use crate::utils::sanitize::strip_nbsp;
use crate::utils::validation::validate_file_name;

pub const FIELD_FILE_NAME: &str = "file_name";
pub const FIELD_FIRST_ROW_HEADER: &str = "is_first_row_header";

/// Data source that loads a previously uploaded CSV file into a staging
/// table for field mapping.
pub struct UploadDataSource;

impl UploadDataSource {
    /// Configured upload directory if it exists, else the bundled sample
    /// data. The fallback is a degraded mode surfaced on the form, not an
    /// error.
    fn resolve_data_dir(config: &ImportConfig) -> (PathBuf, bool) {
        if config.upload_dir.is_dir() {
            (config.upload_dir.clone(), false)
        } else {
            (config.sample_data_dir.clone(), true)
        }
    }

    fn list_csv_files(dir: &Path) -> Vec<String> {
        let mut files: Vec<String> = fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter(|e| e.path().is_file())
                    .filter_map(|e| e.file_name().into_string().ok())
                    .filter(|name| name.to_lowercase().ends_with(".csv"))
                    .collect()
            })
            .unwrap_or_default();
        files.sort();
        files
    }
}

#[async_trait::async_trait]
impl DataSource for UploadDataSource {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: "upload".to_string(),
            title: "Uploaded file (CSV)".to_string(),
        }
    }

    fn submittable_fields(&self) -> &'static [&'static str] {
        &[FIELD_FILE_NAME, FIELD_FIRST_ROW_HEADER]
    }

    fn build_form(&self, config: &ImportConfig) -> FormFragment {
        let (dir, fallback) = Self::resolve_data_dir(config);
        let files = Self::list_csv_files(&dir);

        let mut messages = Vec::new();
        if fallback {
            messages.push(FormMessage {
                level: MessageLevel::Warning,
                text: format!(
                    "Upload directory '{}' is not available; offering bundled sample data from '{}'",
                    config.upload_dir.display(),
                    dir.display()
                ),
            });
        }
        if files.is_empty() {
            messages.push(FormMessage {
                level: MessageLevel::Info,
                text: format!("No files available for import in '{}'", dir.display()),
            });
        }

        let mut html = String::new();
        html.push_str("<select name=\"file_name\">\n");
        for file in &files {
            html.push_str(&format!("  <option value=\"{0}\">{0}</option>\n", file));
        }
        html.push_str("</select>\n");
        html.push_str(
            "<label><input type=\"checkbox\" name=\"is_first_row_header\" checked /> \
             First row contains column headers</label>",
        );

        FormFragment { html, messages }
    }

    async fn initialize(
        &self,
        db: &SqlitePool,
        config: &ImportConfig,
        job_id: &str,
        values: &SubmittedValues,
    ) -> Result<ImportOutcome, AppError> {
        let file_name = values.string(FIELD_FILE_NAME).unwrap_or_default();
        let file_name =
            validate_file_name(file_name).map_err(|e| AppError::BadRequest(e.to_string()))?;
        let is_first_row_header = values.bool(FIELD_FIRST_ROW_HEADER);

        let (dir, fallback) = Self::resolve_data_dir(config);
        if fallback {
            info!(
                "Upload directory '{}' missing; reading from sample data",
                config.upload_dir.display()
            );
        }

        let path = dir.join(&file_name);
        if !path.is_file() {
            return Err(AppError::BadRequest(format!(
                "File '{}' is not available for import",
                file_name
            )));
        }

        let reader = source_reader::open_rows(&path)?;
        let mut records = reader.into_records();

        let first = records
            .next()
            .transpose()
            .map_err(|e| AppError::SourceRead(e.to_string()))?
            .ok_or_else(|| {
                AppError::BadRequest(format!("File '{}' contains no rows", file_name))
            })?;

        // Header policy: either consume row 1 as column names (NBSP
        // stripped, duplicates and empties passed through as-is), or
        // synthesize positional names from the first data row's arity and
        // keep that row as data.
        let (columns, pending): (Vec<String>, Option<csv::StringRecord>) = if is_first_row_header {
            (first.iter().map(strip_nbsp).collect(), None)
        } else {
            (
                (0..first.len()).map(|i| format!("column_{}", i)).collect(),
                Some(first),
            )
        };

        let table_name = staging::staging_table_name(job_id);
        staging::create_staging_table(db, &table_name, &columns).await?;

        let (batch_size, row_cap) = match config.ingest_mode {
            IngestMode::Full => (config.batch_size, None),
            IngestMode::Preview => (1, Some(config.preview_rows)),
        };

        let mut writer = staging::StagingWriter::new(db, &table_name, &columns, batch_size);
        let mut ingested: usize = 0;

        for record in pending.into_iter().map(Ok::<_, csv::Error>).chain(records) {
            if let Some(cap) = row_cap {
                if ingested >= cap {
                    break;
                }
            }

            let record = record.map_err(|e| AppError::SourceRead(e.to_string()))?;
            let row: Vec<String> = record.iter().map(strip_nbsp).collect();
            writer.push(row).await?;
            ingested += 1;
        }
        writer.flush().await?;

        staging::add_tracking_columns(db, &table_name).await?;

        let outcome = ImportOutcome {
            number_of_columns: columns.len(),
            column_headers: columns,
            rows_imported: writer.rows_written(),
            table_name,
        };
        jobs::mark_ready(db, job_id, &outcome).await?;

        info!(
            "📊 Loaded {} rows x {} columns from '{}' into {}",
            outcome.rows_imported, outcome.number_of_columns, file_name, outcome.table_name
        );

        Ok(outcome)
    }
}
