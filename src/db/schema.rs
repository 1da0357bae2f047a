//! Database schema definitions.

use crate::error::{DbError, DbResult};
use rusqlite::Connection;

/// Current schema version for migrations.
pub const SCHEMA_VERSION: u32 = 1;

/// Initializes the database schema.
///
/// # Errors
///
/// Returns `DbError::Sqlite` if schema creation fails.
/// Returns `DbError::Migration` if the file was written by a newer schema.
pub fn init_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- One row per indexed file
        CREATE TABLE IF NOT EXISTS files (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            path TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            size INTEGER NOT NULL,
            last_modified INTEGER NOT NULL,
            extension TEXT NOT NULL
        );

        -- Word frequencies, many rows per file
        CREATE TABLE IF NOT EXISTS contents (
            id INTEGER PRIMARY KEY,
            file_id INTEGER NOT NULL REFERENCES files(id) ON DELETE CASCADE,
            word TEXT NOT NULL,
            count INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_files_path ON files(path);
        CREATE INDEX IF NOT EXISTS idx_files_name ON files(name);
        CREATE INDEX IF NOT EXISTS idx_contents_word ON contents(word);
        CREATE INDEX IF NOT EXISTS idx_contents_file ON contents(file_id);

        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_info (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        ) WITHOUT ROWID;
        "#,
    )?;

    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM schema_info WHERE key = 'version'",
            [],
            |row| row.get(0),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(other),
        })?;

    if let Some(version) = stored {
        let version: u32 = version
            .parse()
            .map_err(|_| DbError::Migration(format!("unreadable schema version '{version}'")))?;
        if version > SCHEMA_VERSION {
            return Err(DbError::Migration(format!(
                "database schema v{version} is newer than supported v{SCHEMA_VERSION}"
            )));
        }
    }

    conn.execute(
        "INSERT OR REPLACE INTO schema_info (key, value) VALUES ('version', ?1)",
        [SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pragmas::apply_pragmas;

    #[test]
    fn test_schema_creation() {
        let conn = Connection::open_in_memory().unwrap();
        apply_pragmas(&conn).unwrap();
        init_schema(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(Result::ok)
            .collect();

        assert!(tables.contains(&"files".to_string()));
        assert!(tables.contains(&"contents".to_string()));
        assert!(tables.contains(&"schema_info".to_string()));
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
    }

    #[test]
    fn test_rejects_newer_schema() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute(
            "UPDATE schema_info SET value = '99' WHERE key = 'version'",
            [],
        )
        .unwrap();

        let err = init_schema(&conn).unwrap_err();
        assert!(matches!(err, DbError::Migration(_)));
    }
}
