use sqlx::SqlitePool;
use tracing::info;

/// Initialize the database schema.
///
/// One table only — schema migration is out of scope for this service; a
/// schema change means recreating the database.
pub async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id       TEXT PRIMARY KEY,
            name     TEXT NOT NULL,
            email    TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    info!("Database schema ready");
    Ok(())
}
