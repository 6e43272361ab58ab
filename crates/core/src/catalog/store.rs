//! SQLite-backed catalog persistence.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::row::{GameRow, COLUMNS};
use crate::{
    error::{CatalogError, CatalogResult},
    filter::FilterCriteria,
    models::GameEntry,
};

/// Schema version written to `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

const CREATE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS games (
    id          TEXT PRIMARY KEY NOT NULL,
    name        TEXT NOT NULL,
    min_players INTEGER NOT NULL,
    max_players INTEGER NOT NULL,
    duration    TEXT,
    size        TEXT,
    complexity  TEXT,
    is_coop     INTEGER NOT NULL DEFAULT 0,
    picture     TEXT NOT NULL DEFAULT ''
);
"#;

const INSERT_ROW: &str = r#"
INSERT INTO games (id, name, min_players, max_players, duration, size, complexity, is_coop, picture)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
"#;

const UPSERT_ROW: &str = r#"
INSERT INTO games (id, name, min_players, max_players, duration, size, complexity, is_coop, picture)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
ON CONFLICT(id) DO UPDATE SET
    name = excluded.name,
    min_players = excluded.min_players,
    max_players = excluded.max_players,
    duration = excluded.duration,
    size = excluded.size,
    complexity = excluded.complexity,
    is_coop = excluded.is_coop,
    picture = excluded.picture
"#;

const UPDATE_ROW: &str = r#"
UPDATE games SET
    name = ?2,
    min_players = ?3,
    max_players = ?4,
    duration = ?5,
    size = ?6,
    complexity = ?7,
    is_coop = ?8,
    picture = ?9
WHERE id = ?1
"#;

/// Storage engine contract consumed by [`Catalog`](super::Catalog).
///
/// Each call is atomic on its own; batches run inside one transaction.
pub trait CatalogStore: Send {
    /// Insert new rows; fails if an identifier already exists.
    fn insert(&mut self, rows: &[GameRow]) -> CatalogResult<()>;

    /// Insert rows or overwrite the existing rows with the same identifier.
    fn upsert(&mut self, rows: &[GameRow]) -> CatalogResult<()>;

    /// Overwrite rows that exist; unknown identifiers are skipped. Returns
    /// how many rows changed.
    fn update(&mut self, rows: &[GameRow]) -> CatalogResult<usize>;

    /// Delete every row whose identifier is listed, returning how many went away.
    fn delete_by_ids(&mut self, ids: &[String]) -> CatalogResult<usize>;

    /// Fetch one row; [`CatalogError::NotFound`] when absent.
    fn get(&self, id: &str) -> CatalogResult<GameRow>;

    /// Every stored row.
    fn all(&self) -> CatalogResult<Vec<GameRow>>;

    /// Delete the given rows by identifier.
    fn delete(&mut self, rows: &[GameRow]) -> CatalogResult<usize> {
        let ids: Vec<String> = rows.iter().map(|row| row.id.clone()).collect();
        self.delete_by_ids(&ids)
    }

    /// Rows eligible under `criteria`, in storage order.
    fn query(&self, criteria: &FilterCriteria) -> CatalogResult<Vec<GameRow>> {
        Ok(self
            .all()?
            .into_iter()
            .filter(|row| criteria.matches(&GameEntry::from(row.clone())))
            .collect())
    }
}

/// [`CatalogStore`] implementation over a single SQLite database.
pub struct SqliteCatalogStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteCatalogStore {
    /// Open (or create) the catalog database at `path`.
    pub fn open(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| CatalogError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        let store = Self::prepare(conn, Some(path.to_path_buf()))?;
        info!(path = %path.display(), "Catalog database opened");
        Ok(store)
    }

    /// Open a private, non-persistent catalog.
    pub fn open_in_memory() -> CatalogResult<Self> {
        Self::prepare(Connection::open_in_memory()?, None)
    }

    /// Location of the database file, if it lives on disk.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn prepare(conn: Connection, path: Option<PathBuf>) -> CatalogResult<Self> {
        let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
        match version {
            0 => {
                conn.execute_batch(CREATE_SCHEMA)?;
                conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
                debug!("Catalog schema created at version {SCHEMA_VERSION}");
            }
            SCHEMA_VERSION => {}
            found => {
                return Err(CatalogError::UnsupportedSchema {
                    found,
                    expected: SCHEMA_VERSION,
                })
            }
        }
        Ok(Self { conn, path })
    }

    fn write_rows(&mut self, sql: &str, rows: &[GameRow]) -> CatalogResult<usize> {
        let tx = self.conn.transaction()?;
        let mut written = 0;
        {
            let mut stmt = tx.prepare_cached(sql)?;
            for row in rows {
                written += stmt.execute(params![
                    row.id,
                    row.name,
                    row.min_players,
                    row.max_players,
                    row.duration,
                    row.size,
                    row.complexity,
                    row.is_coop,
                    row.picture,
                ])?;
            }
        }
        tx.commit()?;
        Ok(written)
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn insert(&mut self, rows: &[GameRow]) -> CatalogResult<()> {
        self.write_rows(INSERT_ROW, rows).map(|_| ())
    }

    fn upsert(&mut self, rows: &[GameRow]) -> CatalogResult<()> {
        self.write_rows(UPSERT_ROW, rows).map(|_| ())
    }

    fn update(&mut self, rows: &[GameRow]) -> CatalogResult<usize> {
        self.write_rows(UPDATE_ROW, rows)
    }

    fn delete_by_ids(&mut self, ids: &[String]) -> CatalogResult<usize> {
        let tx = self.conn.transaction()?;
        let mut removed = 0;
        {
            let mut stmt = tx.prepare_cached("DELETE FROM games WHERE id = ?1")?;
            for id in ids {
                removed += stmt.execute(params![id])?;
            }
        }
        tx.commit()?;
        Ok(removed)
    }

    fn get(&self, id: &str) -> CatalogResult<GameRow> {
        let sql = format!("SELECT {COLUMNS} FROM games WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id], GameRow::from_sql)
            .optional()?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    fn all(&self) -> CatalogResult<Vec<GameRow>> {
        let sql = format!("SELECT {COLUMNS} FROM games ORDER BY rowid");
        let mut stmt = self.conn.prepare_cached(&sql)?;
        let rows = stmt
            .query_map([], GameRow::from_sql)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Complexity, Duration};
    use tempfile::tempdir;

    fn row(id: &str, min: i64, max: i64, duration: Option<&str>) -> GameRow {
        GameRow {
            id: id.to_string(),
            name: format!("Game {id}"),
            min_players: min,
            max_players: max,
            duration: duration.map(str::to_string),
            size: None,
            complexity: None,
            is_coop: false,
            picture: String::new(),
        }
    }

    #[test]
    fn insert_get_and_list() -> CatalogResult<()> {
        let mut store = SqliteCatalogStore::open_in_memory()?;
        store.insert(&[row("a", 2, 4, Some("SHORT")), row("b", 1, 2, None)])?;

        assert_eq!(store.get("a")?, row("a", 2, 4, Some("SHORT")));
        let ids: Vec<_> = store.all()?.into_iter().map(|row| row.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
        Ok(())
    }

    #[test]
    fn missing_rows_report_not_found() -> CatalogResult<()> {
        let store = SqliteCatalogStore::open_in_memory()?;
        let err = store.get("ghost").unwrap_err();
        assert!(err.is_not_found());
        Ok(())
    }

    #[test]
    fn duplicate_insert_is_rejected() -> CatalogResult<()> {
        let mut store = SqliteCatalogStore::open_in_memory()?;
        store.insert(&[row("a", 1, 1, None)])?;
        let err = store.insert(&[row("a", 2, 2, None)]).unwrap_err();
        assert!(matches!(err, CatalogError::Storage(_)));
        assert_eq!(store.get("a")?.min_players, 1);
        Ok(())
    }

    #[test]
    fn upsert_overwrites_in_place() -> CatalogResult<()> {
        let mut store = SqliteCatalogStore::open_in_memory()?;
        store.insert(&[row("a", 1, 1, None), row("b", 1, 1, None)])?;

        let mut changed = row("a", 3, 5, Some("LONG"));
        changed.is_coop = true;
        store.upsert(&[changed.clone(), row("c", 2, 2, None)])?;

        assert_eq!(store.get("a")?, changed);
        let ids: Vec<_> = store.all()?.into_iter().map(|row| row.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        Ok(())
    }

    #[test]
    fn update_skips_missing_rows() -> CatalogResult<()> {
        let mut store = SqliteCatalogStore::open_in_memory()?;
        store.insert(&[row("a", 1, 1, None)])?;

        let changed = row("a", 2, 4, Some("SHORT"));
        let updated = store.update(&[changed.clone(), row("gone", 1, 1, None)])?;
        assert_eq!(updated, 1);
        assert_eq!(store.get("a")?, changed);
        assert!(store.get("gone").unwrap_err().is_not_found());
        Ok(())
    }

    #[test]
    fn delete_by_ids_counts_removed_rows() -> CatalogResult<()> {
        let mut store = SqliteCatalogStore::open_in_memory()?;
        store.insert(&[row("a", 1, 1, None), row("b", 1, 1, None), row("c", 1, 1, None)])?;

        let removed = store.delete_by_ids(&["a".to_string(), "missing".to_string()])?;
        assert_eq!(removed, 1);
        let removed = store.delete(&[row("c", 1, 1, None)])?;
        assert_eq!(removed, 1);

        let ids: Vec<_> = store.all()?.into_iter().map(|row| row.id).collect();
        assert_eq!(ids, vec!["b"]);
        Ok(())
    }

    #[test]
    fn query_applies_filter_predicate() -> CatalogResult<()> {
        let mut store = SqliteCatalogStore::open_in_memory()?;
        let mut complex = row("b", 1, 2, Some("LONG"));
        complex.complexity = Some("COMPLEX".to_string());
        store.insert(&[row("a", 2, 4, Some("SHORT")), complex])?;

        let criteria = FilterCriteria::for_players(2).with_durations([Duration::Short]);
        let ids: Vec<_> = store.query(&criteria)?.into_iter().map(|row| row.id).collect();
        assert_eq!(ids, vec!["a"]);

        let criteria = FilterCriteria::for_players(2).with_complexities([Complexity::Complex]);
        let ids: Vec<_> = store.query(&criteria)?.into_iter().map(|row| row.id).collect();
        assert_eq!(ids, vec!["b"]);
        Ok(())
    }

    #[test]
    fn reopening_keeps_rows_and_schema() -> CatalogResult<()> {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("games.db");
        {
            let mut store = SqliteCatalogStore::open(&path)?;
            assert_eq!(store.path(), Some(path.as_path()));
            store.insert(&[row("a", 1, 4, None)])?;
        }
        let store = SqliteCatalogStore::open(&path)?;
        assert_eq!(store.all()?.len(), 1);
        Ok(())
    }

    #[test]
    fn unknown_schema_versions_are_rejected() -> CatalogResult<()> {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("games.db");
        {
            let conn = Connection::open(&path)?;
            conn.pragma_update(None, "user_version", 7)?;
        }
        match SqliteCatalogStore::open(&path) {
            Err(CatalogError::UnsupportedSchema { found, expected }) => {
                assert_eq!(found, 7);
                assert_eq!(expected, SCHEMA_VERSION);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected schema rejection"),
        }
        Ok(())
    }
}
