//! Database layer: file metadata plus per-file word frequencies.
//!
//! Writes happen in whole batches inside one transaction; reads return
//! metadata only and leave word counts to explicit hydration.

mod pragmas;
mod schema;

pub use pragmas::apply_pragmas;
pub use schema::{init_schema, SCHEMA_VERSION};

use crate::error::{DbError, DbResult};
use crate::paths;
use crate::types::{FileEntry, FileId, WordCounts};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::ToSql;
use rusqlite::{params, TransactionBehavior};
use serde::Serialize;
use std::path::Path;

/// Content rows inserted per multi-row INSERT statement.
pub const CONTENT_CHUNK_ROWS: usize = 500;

const FILE_COLUMNS: &str = "id, path, name, size, last_modified, extension";

/// A content search hit with its summed occurrence count.
#[derive(Debug, Clone, Serialize)]
pub struct ContentMatch {
    pub entry: FileEntry,
    /// Sum of counts over every stored word that matched.
    pub relevance: u64,
}

/// Database handle.
///
/// The pool holds a single connection, which serializes every reader and
/// writer in the process. `rusqlite::Connection` is not Sync; r2d2 makes
/// the handle shareable across threads.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Opens or creates a database at the given path.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Pool` if connection pool creation fails.
    /// Returns `DbError::Sqlite` or `DbError::Migration` if schema
    /// initialization fails.
    pub fn open(path: &Path) -> DbResult<Self> {
        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| pragmas::apply_pragmas_raw(conn));
        let pool = Pool::builder().max_size(1).min_idle(Some(1)).build(manager)?;
        tracing::debug!("Opened database at {}", path.display());
        Self::with_pool(pool)
    }

    /// Creates an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns `DbError::Pool` if connection pool creation fails.
    /// Returns `DbError::Sqlite` if schema initialization fails.
    pub fn in_memory() -> DbResult<Self> {
        let manager =
            SqliteConnectionManager::memory().with_init(|conn| pragmas::apply_pragmas_raw(conn));
        // A recycled connection would be a brand-new empty database
        let pool = Pool::builder()
            .max_size(1)
            .max_lifetime(None)
            .idle_timeout(None)
            .build(manager)?;
        Self::with_pool(pool)
    }

    fn with_pool(pool: Pool<SqliteConnectionManager>) -> DbResult<Self> {
        {
            let conn = pool.get()?;
            init_schema(&conn)?;
        }
        Ok(Self { pool })
    }

    /// Gets the connection from the pool.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Pool` if the connection is not available within the timeout.
    pub fn conn(&self) -> DbResult<PooledConnection<SqliteConnectionManager>> {
        self.pool.get().map_err(DbError::from)
    }

    /// Persists a batch of entries in a single transaction.
    ///
    /// Each file row is upserted by path and the entry's `id` is set to the
    /// stored identifier. Existing content rows for every file in the batch
    /// are replaced; entries with an empty word map end up metadata-only.
    /// Any failure rolls back the whole batch. The `id` fields of the
    /// entries are assigned only once the commit succeeds.
    ///
    /// Returns the number of content rows written.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Pool` if no connection is available.
    /// Returns `DbError::Sqlite` if any statement or the commit fails.
    pub fn save_batch(&self, entries: &mut [FileEntry]) -> DbResult<usize> {
        if entries.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn()?;
        // IMMEDIATE takes the write lock up front instead of failing at COMMIT
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut ids: Vec<i64> = Vec::with_capacity(entries.len());

        {
            let mut upsert = tx.prepare_cached(
                r"
                INSERT INTO files (path, name, size, last_modified, extension)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(path) DO UPDATE SET
                    name = excluded.name,
                    size = excluded.size,
                    last_modified = excluded.last_modified,
                    extension = excluded.extension
                ",
            )?;
            let mut select_id = tx.prepare_cached("SELECT id FROM files WHERE path = ?1")?;

            for entry in entries.iter() {
                upsert.execute(params![
                    &entry.path,
                    &entry.file_name,
                    entry.size as i64,
                    entry.last_modified,
                    &entry.extension,
                ])?;

                // last_insert_rowid() is unreliable with ON CONFLICT DO UPDATE
                ids.push(select_id.query_row(params![&entry.path], |row| row.get(0))?);
            }
        }

        let mut rows_written = 0;
        {
            let mut delete = tx.prepare_cached("DELETE FROM contents WHERE file_id = ?1")?;
            let mut insert_full = tx.prepare_cached(&insert_contents_sql(CONTENT_CHUNK_ROWS))?;

            for (entry, &file_id) in entries.iter().zip(&ids) {
                delete.execute([file_id])?;

                if entry.word_counts.is_empty() {
                    continue;
                }

                let rows: Vec<(&String, &u32)> = entry.word_counts.iter().collect();
                for chunk in rows.chunks(CONTENT_CHUNK_ROWS) {
                    let mut values: Vec<&dyn ToSql> = Vec::with_capacity(chunk.len() * 3);
                    for (word, count) in chunk {
                        values.push(&file_id);
                        values.push(*word);
                        values.push(*count);
                    }

                    if chunk.len() == CONTENT_CHUNK_ROWS {
                        insert_full.execute(values.as_slice())?;
                    } else {
                        tx.prepare_cached(&insert_contents_sql(chunk.len()))?
                            .execute(values.as_slice())?;
                    }
                    rows_written += chunk.len();
                }
            }
        }

        tx.commit()?;

        for (entry, id) in entries.iter_mut().zip(ids) {
            entry.id = Some(FileId::new(id));
        }

        if rows_written > 10_000 {
            if let Err(e) = pragmas::analyze(&conn) {
                tracing::warn!("ANALYZE after batch failed: {}", e);
            }
        }

        tracing::info!(
            "Saved batch: {} files, {} content rows",
            entries.len(),
            rows_written
        );
        Ok(rows_written)
    }

    /// Finds a file by exact path (metadata only).
    ///
    /// Backslashes in `path` are normalized before matching.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Pool` if no connection is available.
    /// Returns `DbError::Sqlite` if the query fails (other than no rows).
    pub fn find_by_path(&self, path: &str) -> DbResult<Option<FileEntry>> {
        let normalized = paths::to_forward_slashes(path);
        let conn = self.conn()?;
        let result = conn.query_row(
            &format!("SELECT {FILE_COLUMNS} FROM files WHERE path = ?1"),
            params![normalized],
            row_to_entry,
        );

        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::Sqlite(e)),
        }
    }

    /// Files whose path or name contains `partial`.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Pool` if no connection is available.
    /// Returns `DbError::Sqlite` if the query fails.
    pub fn search_by_partial_path(&self, partial: &str) -> DbResult<Vec<FileEntry>> {
        let pattern = like_contains(&paths::to_forward_slashes(partial));
        self.query_entries(
            &format!(
                r"SELECT {FILE_COLUMNS} FROM files
                  WHERE path LIKE ?1 ESCAPE '\' OR name LIKE ?1 ESCAPE '\'
                  ORDER BY path"
            ),
            &pattern,
        )
    }

    /// Files whose name contains `name`.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Pool` if no connection is available.
    /// Returns `DbError::Sqlite` if the query fails.
    pub fn search_by_name(&self, name: &str) -> DbResult<Vec<FileEntry>> {
        self.query_entries(
            &format!(
                r"SELECT {FILE_COLUMNS} FROM files
                  WHERE name LIKE ?1 ESCAPE '\'
                  ORDER BY path"
            ),
            &like_contains(name),
        )
    }

    /// Files with a stored word containing `query`, most occurrences first.
    ///
    /// Relevance is the sum of counts over every matching word of a file.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Pool` if no connection is available.
    /// Returns `DbError::Sqlite` if the query fails.
    pub fn search_by_content(&self, query: &str) -> DbResult<Vec<ContentMatch>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            r"
            SELECT f.id, f.path, f.name, f.size, f.last_modified, f.extension,
                   SUM(c.count) AS relevance
            FROM files f
            JOIN contents c ON c.file_id = f.id
            WHERE c.word LIKE ?1 ESCAPE '\'
            GROUP BY f.id
            ORDER BY relevance DESC, f.path
            ",
        )?;

        let results = stmt
            .query_map(params![like_contains(&query.to_lowercase())], |row| {
                Ok(ContentMatch {
                    entry: row_to_entry(row)?,
                    relevance: row.get::<_, i64>(6)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(results)
    }

    /// Loads an entry's word counts from the store, replacing any in memory.
    ///
    /// Entries without an `id` (never persisted) are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Pool` if no connection is available.
    /// Returns `DbError::Sqlite` if the query fails.
    pub fn load_word_counts(&self, entry: &mut FileEntry) -> DbResult<()> {
        let Some(file_id) = entry.id else {
            return Ok(());
        };

        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached("SELECT word, count FROM contents WHERE file_id = ?1")?;
        let counts = stmt
            .query_map([file_id.as_i64()], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?))
            })?
            .collect::<Result<WordCounts, _>>()?;

        tracing::debug!("Hydrated {} words for {}", counts.len(), entry.path);
        entry.word_counts = counts;
        Ok(())
    }

    /// Gets the number of indexed files.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Pool` if no connection is available.
    /// Returns `DbError::Sqlite` if the query fails.
    pub fn file_count(&self) -> DbResult<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Gets the number of stored (file, word, count) rows.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Pool` if no connection is available.
    /// Returns `DbError::Sqlite` if the query fails.
    pub fn content_row_count(&self) -> DbResult<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM contents", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Indexed file counts per extension, largest first.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Pool` if no connection is available.
    /// Returns `DbError::Sqlite` if the query fails.
    pub fn extension_counts(&self) -> DbResult<Vec<(String, u64)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT extension, COUNT(*) AS n FROM files GROUP BY extension ORDER BY n DESC, extension",
        )?;
        let counts = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    }

    /// Deletes every file and content row.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Pool` if no connection is available.
    /// Returns `DbError::Sqlite` if either delete fails (nothing is removed).
    pub fn clear(&self) -> DbResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM contents", [])?;
        tx.execute("DELETE FROM files", [])?;
        tx.commit()?;
        tracing::info!("Index cleared");
        Ok(())
    }

    fn query_entries(&self, sql: &str, pattern: &str) -> DbResult<Vec<FileEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(sql)?;
        let results = stmt
            .query_map(params![pattern], row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(results)
    }
}

/// Maps the leading `FILE_COLUMNS` of a row to a metadata-only entry.
fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<FileEntry> {
    let mut entry = FileEntry::new(
        row.get::<_, String>(1)?,
        row.get::<_, String>(2)?,
        row.get::<_, i64>(3)? as u64,
        row.get::<_, i64>(4)?,
        row.get::<_, String>(5)?,
    );
    entry.id = Some(FileId::new(row.get(0)?));
    Ok(entry)
}

/// Builds a `%needle%` LIKE pattern with `\` escaping for wildcards.
fn like_contains(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn insert_contents_sql(rows: usize) -> String {
    let mut sql = String::from("INSERT INTO contents (file_id, word, count) VALUES ");
    for i in 0..rows {
        if i > 0 {
            sql.push(',');
        }
        let base = i * 3;
        sql.push_str(&format!("(?{},?{},?{})", base + 1, base + 2, base + 3));
    }
    sql
}

// Compile-time assertion for thread safety.
#[cfg(test)]
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Database>();
};
