use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;
use tracing::info;

pub async fn setup_database() -> anyhow::Result<SqlitePool> {
    let db_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://import.db?mode=rwc".to_string());

    info!("📂 Database: {}", db_url);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    info!("✅ Database connected successfully");

    run_migrations(&pool).await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    info!("🔄 Running auto-migrations...");

    // Staging tables are created per job at import time; only the job
    // bookkeeping table is part of the fixed schema.
    let stmts = vec![(
        "import_jobs",
        "CREATE TABLE IF NOT EXISTS import_jobs (
            id TEXT PRIMARY KEY,
            source_name TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            status_message TEXT,
            table_name TEXT,
            number_of_columns INTEGER,
            column_headers TEXT,
            created_at TIMESTAMP
        )",
    )];

    for (name, stmt) in stmts {
        match sqlx::query(stmt).execute(pool).await {
            Ok(_) => info!("   - Table '{}' checked/created", name),
            Err(e) => tracing::warn!("   - Failed to create table '{}': {}", name, e),
        }
    }

    Ok(())
}
