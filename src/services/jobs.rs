use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::api::error::AppError;
use crate::models::{
    ImportJob, ImportOutcome, JOB_STATUS_FAILED, JOB_STATUS_PENDING, JOB_STATUS_READY,
};

pub async fn create_job(db: &SqlitePool, source_name: &str) -> Result<ImportJob, AppError> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        "INSERT INTO import_jobs (id, source_name, status, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(source_name)
    .bind(JOB_STATUS_PENDING)
    .bind(Utc::now())
    .execute(db)
    .await?;

    fetch_job(db, &id).await
}

pub async fn fetch_job(db: &SqlitePool, id: &str) -> Result<ImportJob, AppError> {
    sqlx::query_as::<_, ImportJob>("SELECT * FROM import_jobs WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Import job '{}' not found", id)))
}

/// Persists the data source's result metadata onto the owning job record.
pub async fn mark_ready(
    db: &SqlitePool,
    id: &str,
    outcome: &ImportOutcome,
) -> Result<(), AppError> {
    let headers = serde_json::to_string(&outcome.column_headers)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    sqlx::query(
        "UPDATE import_jobs
         SET status = ?, status_message = NULL, table_name = ?,
             number_of_columns = ?, column_headers = ?
         WHERE id = ?",
    )
    .bind(JOB_STATUS_READY)
    .bind(&outcome.table_name)
    .bind(outcome.number_of_columns as i64)
    .bind(headers)
    .bind(id)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn mark_failed(db: &SqlitePool, id: &str, message: &str) -> Result<(), AppError> {
    sqlx::query("UPDATE import_jobs SET status = ?, status_message = ? WHERE id = ?")
        .bind(JOB_STATUS_FAILED)
        .bind(message)
        .bind(id)
        .execute(db)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::database::run_migrations;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_job_lifecycle_ready() {
        let db = memory_pool().await;
        let job = create_job(&db, "upload").await.unwrap();
        assert_eq!(job.status, JOB_STATUS_PENDING);
        assert!(job.table_name.is_none());

        let outcome = ImportOutcome {
            table_name: "import_job_x".to_string(),
            number_of_columns: 3,
            column_headers: vec!["a".into(), "b".into(), "c".into()],
            rows_imported: 1,
        };
        mark_ready(&db, &job.id, &outcome).await.unwrap();

        let job = fetch_job(&db, &job.id).await.unwrap();
        assert_eq!(job.status, JOB_STATUS_READY);
        assert_eq!(job.table_name.as_deref(), Some("import_job_x"));
        assert_eq!(job.number_of_columns, Some(3));
        assert_eq!(job.column_headers.as_deref(), Some(r#"["a","b","c"]"#));
    }

    #[tokio::test]
    async fn test_job_lifecycle_failed() {
        let db = memory_pool().await;
        let job = create_job(&db, "upload").await.unwrap();

        mark_failed(&db, &job.id, "CSV error: unequal lengths")
            .await
            .unwrap();

        let job = fetch_job(&db, &job.id).await.unwrap();
        assert_eq!(job.status, JOB_STATUS_FAILED);
        assert_eq!(
            job.status_message.as_deref(),
            Some("CSV error: unequal lengths")
        );
    }

    #[tokio::test]
    async fn test_fetch_unknown_job() {
        let db = memory_pool().await;
        assert!(matches!(
            fetch_job(&db, "nope").await,
            Err(AppError::NotFound(_))
        ));
    }
}
