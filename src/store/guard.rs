use rusqlite::Connection;
use thiserror::Error;

const TRIGGER_NAME: &str = "prevent_delete_on_status_log";

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("trigger already exists: {0}")]
    AlreadyExists(&'static str),
    #[error("trigger does not exist: {0}")]
    NotFound(&'static str),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

fn guard_exists(conn: &Connection) -> rusqlite::Result<bool> {
    let mut stmt =
        conn.prepare("SELECT 1 FROM sqlite_master WHERE type='trigger' AND name = ?1 LIMIT 1;")?;
    let mut rows = stmt.query([TRIGGER_NAME])?;
    Ok(rows.next()?.is_some())
}

/// Installs a trigger making the progress history append-only at the SQL
/// layer: the engine treats the log as immutable, and deletions slipping in
/// from other connections would silently rewrite past analytics.
pub fn install_status_log_guard(conn: &Connection) -> Result<(), GuardError> {
    if guard_exists(conn)? {
        return Err(GuardError::AlreadyExists(TRIGGER_NAME));
    }
    conn.execute_batch(
        "CREATE TRIGGER prevent_delete_on_status_log
         BEFORE DELETE ON status_log
         BEGIN
           SELECT RAISE(ABORT, 'Progress history is append-only');
         END;",
    )?;
    Ok(())
}

pub fn remove_status_log_guard(conn: &Connection) -> Result<(), GuardError> {
    if !guard_exists(conn)? {
        return Err(GuardError::NotFound(TRIGGER_NAME));
    }
    conn.execute_batch("DROP TRIGGER prevent_delete_on_status_log;")?;
    Ok(())
}
