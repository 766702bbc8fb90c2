use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::api::error::AppError;
use crate::utils::sanitize::quote_ident;

/// Fixed per-row tracking columns appended to every staging table, shared by
/// all data sources. Later import steps record per-row mapping status and
/// errors here.
pub const TRACKING_COLUMNS: &[(&str, &str)] = &[
    ("_import_status", "TEXT NOT NULL DEFAULT 'NEW'"),
    ("_import_message", "TEXT"),
];

/// Conservative floor for SQLITE_MAX_VARIABLE_NUMBER; older SQLite builds
/// allow no more than 999 bind parameters per statement.
const MAX_BIND_PARAMS: usize = 999;

/// Each import job owns an exclusively named staging table.
pub fn staging_table_name(job_id: &str) -> String {
    // Job ids are UUIDs; dashes make poor identifiers.
    format!("import_job_{}", job_id.replace('-', ""))
}

/// Creates the staging table shaped to the discovered columns. Everything is
/// stored as TEXT; typing happens downstream during field mapping.
pub async fn create_staging_table(
    db: &SqlitePool,
    table: &str,
    columns: &[String],
) -> Result<(), AppError> {
    let cols: Vec<String> = columns
        .iter()
        .map(|c| format!("{} TEXT", quote_ident(c)))
        .collect();
    let ddl = format!("CREATE TABLE {} ({})", quote_ident(table), cols.join(", "));

    if let Err(e) = sqlx::query(&ddl).execute(db).await {
        // Duplicate header names pass through undeduplicated, so SQLite is
        // the first place they fail. That is the user's input to fix, not a
        // server fault.
        if e.to_string().to_lowercase().contains("duplicate column") {
            return Err(AppError::BadRequest(format!(
                "The header row contains duplicate column names: {}",
                e
            )));
        }
        return Err(e.into());
    }
    Ok(())
}

/// Appends the shared tracking columns once the raw rows are loaded.
pub async fn add_tracking_columns(db: &SqlitePool, table: &str) -> Result<(), AppError> {
    for (name, definition) in TRACKING_COLUMNS {
        let ddl = format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            quote_ident(table),
            quote_ident(name),
            definition
        );
        sqlx::query(&ddl).execute(db).await?;
    }
    Ok(())
}

/// Accumulates rows and writes them in bounded multi-row inserts.
///
/// Inserts use `INSERT OR IGNORE`: the staging table carries no unique key
/// under normal operation, so duplicate-key conflicts cannot occur and any
/// that do are dropped silently. Cell values are bound as statement
/// parameters, never spliced into the SQL text.
pub struct StagingWriter<'a> {
    db: &'a SqlitePool,
    insert_prefix: String,
    arity: usize,
    batch_size: usize,
    buffer: Vec<Vec<String>>,
    rows_written: u64,
}

impl<'a> StagingWriter<'a> {
    pub fn new(db: &'a SqlitePool, table: &str, columns: &[String], batch_size: usize) -> Self {
        let cols: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
        let insert_prefix = format!(
            "INSERT OR IGNORE INTO {} ({}) ",
            quote_ident(table),
            cols.join(", ")
        );

        // Batches are bounded by bind-parameter count as well as row count:
        // a very wide file must not blow SQLITE_MAX_VARIABLE_NUMBER.
        let arity = columns.len();
        let rows_per_statement = (MAX_BIND_PARAMS / arity.max(1)).max(1);

        Self {
            db,
            insert_prefix,
            arity,
            batch_size: batch_size.clamp(1, rows_per_statement),
            buffer: Vec::new(),
            rows_written: 0,
        }
    }

    /// Queues one row, flushing when the batch is full. Rows whose arity
    /// does not match the staging schema are rejected outright.
    pub async fn push(&mut self, row: Vec<String>) -> Result<(), AppError> {
        if row.len() != self.arity {
            return Err(AppError::SourceRead(format!(
                "row has {} values, expected {}",
                row.len(),
                self.arity
            )));
        }

        self.buffer.push(row);
        if self.buffer.len() >= self.batch_size {
            self.flush().await?;
        }
        Ok(())
    }

    /// Writes any buffered rows. Must be called once after the last `push`.
    pub async fn flush(&mut self) -> Result<(), AppError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new(self.insert_prefix.as_str());
        qb.push_values(self.buffer.drain(..), |mut b, row| {
            for cell in row {
                b.push_bind(cell);
            }
        });

        let result = qb.build().execute(self.db).await?;
        self.rows_written += result.rows_affected();
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}
