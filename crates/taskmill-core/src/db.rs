use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::CoreError;

pub type DbPool = SqlitePool;

/// Opens (creating if missing) the SQLite database at `database_url` and
/// ensures the schema exists. The returned pool is the single persistence
/// handle for the process; it is constructed here and passed down, never
/// held in ambient global state.
pub async fn establish_connection(database_url: &str) -> Result<DbPool, CoreError> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(CoreError::Database)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    init_schema(&pool).await?;
    Ok(pool)
}

async fn init_schema(pool: &DbPool) -> Result<(), CoreError> {
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS recurring_templates (
            id                  BLOB PRIMARY KEY,
            agency_id           BLOB NOT NULL,
            title               TEXT NOT NULL,
            description         TEXT,
            client_id           BLOB,
            service_id          BLOB,
            priority            TEXT,
            assigned_to         BLOB,
            tag_id              BLOB,
            document_request    TEXT,
            frequency           TEXT NOT NULL,
            interval            INTEGER NOT NULL DEFAULT 1,
            start_date          DATE NOT NULL,
            end_date            DATE,
            day_of_week         INTEGER,
            day_of_month        INTEGER,
            week_of_month       INTEGER,
            due_date_offset     INTEGER,
            target_date_offset  INTEGER,
            is_active           BOOLEAN NOT NULL DEFAULT 1,
            created_by          BLOB NOT NULL,
            created_at          DATETIME NOT NULL,
            updated_at          DATETIME NOT NULL,
            last_fired_at       DATETIME
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_templates_agency ON recurring_templates(agency_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"CREATE INDEX IF NOT EXISTS idx_templates_window
        ON recurring_templates(is_active, start_date, end_date)"#,
    )
    .execute(pool)
    .await?;

    // Spawned tasks are independent rows with no back-reference to the
    // template that produced them.
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS tasks (
            id                  BLOB PRIMARY KEY,
            agency_id           BLOB NOT NULL,
            title               TEXT NOT NULL,
            description         TEXT,
            client_id           BLOB,
            service_id          BLOB,
            priority            TEXT,
            assigned_to         BLOB,
            tag_id              BLOB,
            document_request    TEXT,
            status              TEXT NOT NULL DEFAULT 'pending',
            due_date            DATE,
            target_date         DATE,
            created_by          BLOB NOT NULL,
            created_at          DATETIME NOT NULL,
            updated_at          DATETIME NOT NULL
        )"#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_tasks_agency ON tasks(agency_id)")
        .execute(pool)
        .await?;

    Ok(())
}
