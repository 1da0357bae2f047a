//! `SQLite` PRAGMA configuration.

use crate::error::DbResult;
use rusqlite::Connection;

/// Executes a single SQL statement that may return rows (PRAGMAs).
fn exec_stmt(conn: &Connection, sql: &str) -> rusqlite::Result<()> {
    conn.prepare(sql)?.query([])?.next()?;
    Ok(())
}

/// Applies connection PRAGMA settings (raw rusqlite version).
///
/// Returns raw `rusqlite::Result` for compatibility with r2d2's
/// connection customizer hooks.
pub fn apply_pragmas_raw(conn: &Connection) -> rusqlite::Result<()> {
    // WAL keeps readers unblocked while a batch commits
    exec_stmt(conn, "PRAGMA journal_mode = WAL")?;
    exec_stmt(conn, "PRAGMA synchronous = NORMAL")?;
    // 8MB page cache
    exec_stmt(conn, "PRAGMA cache_size = -8000")?;
    exec_stmt(conn, "PRAGMA busy_timeout = 5000")?;
    // Required for ON DELETE CASCADE on contents
    exec_stmt(conn, "PRAGMA foreign_keys = ON")?;
    exec_stmt(conn, "PRAGMA temp_store = MEMORY")?;

    Ok(())
}

/// Applies connection PRAGMA settings.
///
/// # Errors
///
/// Returns `DbError::Sqlite` if any PRAGMA statement fails.
pub fn apply_pragmas(conn: &Connection) -> DbResult<()> {
    apply_pragmas_raw(conn)?;
    Ok(())
}

/// Refreshes query planner statistics after a large batch.
pub fn analyze(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute("ANALYZE", [])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pragmas_apply() {
        let conn = Connection::open_in_memory().unwrap();
        apply_pragmas(&conn).unwrap();

        let journal_mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        // In-memory databases report "memory"; WAL requires a file on disk
        assert!(journal_mode.to_lowercase() == "wal" || journal_mode.to_lowercase() == "memory");

        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }
}
