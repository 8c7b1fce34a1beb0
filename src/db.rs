use anyhow::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use std::{path::PathBuf, sync::Arc};
use tokio::{fs, sync::OnceCell};

static SHARED_CONN: OnceCell<Arc<DatabaseConnection>> = OnceCell::const_new();

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let conn = Database::connect(database_url).await?;
    Ok(conn)
}

/// Process-wide connection, opened on first use and reused afterwards.
///
/// Concurrent first callers wait on the same initialization; a failed attempt leaves the
/// cell empty so the next caller retries.
pub async fn shared_conn(database_url: &str) -> Result<Arc<DatabaseConnection>> {
    let conn = SHARED_CONN
        .get_or_try_init(|| async move {
            let conn = create_orm_conn(database_url).await?;
            tracing::info!("database connection established");
            Ok::<_, anyhow::Error>(Arc::new(conn))
        })
        .await?;
    Ok(Arc::clone(conn))
}

/// Close the process-wide connection pool, if it was ever opened.
pub async fn close_shared_conn() -> Result<()> {
    if let Some(conn) = SHARED_CONN.get() {
        if let DatabaseConnection::SqlxPostgresPoolConnection(_) = conn.as_ref() {
            conn.get_postgres_connection_pool().close().await;
            tracing::info!("database connection closed");
        }
    }
    Ok(())
}

/// Minimal migration runner that executes SQL files in `migrations/` in filename order.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    let mut entries = fs::read_dir("migrations").await?;
    let mut files: Vec<PathBuf> = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }
    files.sort();

    let backend = conn.get_database_backend();
    for file in files {
        tracing::debug!(file = %file.display(), "applying migration");
        let sql = fs::read_to_string(&file).await?;
        for statement in split_statements(&sql) {
            conn.execute(Statement::from_string(backend, statement))
                .await?;
        }
    }

    Ok(())
}

/// Split a migration file into single statements.
///
/// Postgres prepared statements cannot contain multiple commands. `--` comment lines are
/// dropped first so punctuation inside them never splits a statement.
fn split_statements(sql: &str) -> Vec<String> {
    let body: String = sql
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    body.split(';')
        .map(str::trim)
        .filter(|stmt| !stmt.is_empty())
        .map(|stmt| format!("{stmt};"))
        .collect()
}
