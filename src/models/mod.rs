use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Job status: created, data source not yet run.
pub const JOB_STATUS_PENDING: &str = "pending";
/// Job status: staging table populated, ready for field mapping.
pub const JOB_STATUS_READY: &str = "ready";
/// Job status: the data source failed; see `status_message`.
pub const JOB_STATUS_FAILED: &str = "failed";

/// Persisted record coordinating a multi-step import.
///
/// The data source writes `table_name`, `number_of_columns` and
/// `column_headers` onto this record; later import steps own the staging
/// table's lifecycle from there.
#[derive(Debug, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ImportJob {
    pub id: String,
    pub source_name: String,
    pub status: String,
    pub status_message: Option<String>,
    pub table_name: Option<String>,
    pub number_of_columns: Option<i64>,
    /// JSON array of display headers.
    pub column_headers: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Descriptive metadata for one registered data source.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SourceInfo {
    /// Stable identifier used to select the source.
    pub name: String,
    /// Human-readable title shown in the import wizard.
    pub title: String,
}

/// Severity of a message attached to a data-source form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Warning,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FormMessage {
    pub level: MessageLevel,
    pub text: String,
}

/// An HTML fragment plus advisory messages, rendered into the host
/// platform's import wizard.
#[derive(Debug, Serialize, ToSchema)]
pub struct FormFragment {
    pub html: String,
    pub messages: Vec<FormMessage>,
}

/// Result metadata a data source produces for the owning import job.
#[derive(Debug, Serialize, ToSchema)]
pub struct ImportOutcome {
    pub table_name: String,
    pub number_of_columns: usize,
    pub column_headers: Vec<String>,
    pub rows_imported: u64,
}
