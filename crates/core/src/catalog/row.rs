//! Storage-side representation of a catalog entry.

use std::str::FromStr;

use rusqlite::Row;
use tracing::warn;

use crate::models::{Complexity, Duration, GameEntry, Size};

/// Column list shared by every `SELECT` against the games table.
pub(crate) const COLUMNS: &str =
    "id, name, min_players, max_players, duration, size, complexity, is_coop, picture";

/// A catalog row exactly as SQLite stores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRow {
    /// Primary key.
    pub id: String,
    /// Game name, possibly empty.
    pub name: String,
    /// Lower player bound as stored.
    pub min_players: i64,
    /// Upper player bound as stored.
    pub max_players: i64,
    /// Upper-case duration name, `NULL` when unset.
    pub duration: Option<String>,
    /// Upper-case size name, `NULL` when unset.
    pub size: Option<String>,
    /// Upper-case complexity name, `NULL` when unset.
    pub complexity: Option<String>,
    /// Stored as `0`/`1`.
    pub is_coop: bool,
    /// Picture reference; empty when unset.
    pub picture: String,
}

impl GameRow {
    pub(crate) fn from_sql(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            min_players: row.get("min_players")?,
            max_players: row.get("max_players")?,
            duration: row.get("duration")?,
            size: row.get("size")?,
            complexity: row.get("complexity")?,
            is_coop: row.get("is_coop")?,
            picture: row.get("picture")?,
        })
    }
}

impl From<&GameEntry> for GameRow {
    fn from(entry: &GameEntry) -> Self {
        Self {
            id: entry.id.clone(),
            name: entry.name.clone(),
            min_players: i64::from(entry.min_players),
            max_players: i64::from(entry.max_players),
            duration: entry.duration.map(|value| value.as_str().to_string()),
            size: entry.size.map(|value| value.as_str().to_string()),
            complexity: entry.complexity.map(|value| value.as_str().to_string()),
            is_coop: entry.is_coop,
            picture: entry.picture.clone(),
        }
    }
}

impl From<GameRow> for GameEntry {
    fn from(row: GameRow) -> Self {
        let duration = parse_column::<Duration>(&row.id, row.duration.as_deref());
        let size = parse_column::<Size>(&row.id, row.size.as_deref());
        let complexity = parse_column::<Complexity>(&row.id, row.complexity.as_deref());
        Self {
            min_players: saturate(row.min_players),
            max_players: saturate(row.max_players),
            id: row.id,
            name: row.name,
            duration,
            size,
            complexity,
            is_coop: row.is_coop,
            picture: row.picture,
        }
    }
}

fn parse_column<T>(id: &str, raw: Option<&str>) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = raw?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(game_id = %id, "Dropping stored attribute: {err}");
            None
        }
    }
}

fn saturate(value: i64) -> u8 {
    u8::try_from(value).unwrap_or(if value < 0 { 0 } else { u8::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_row_entry_is_identity() {
        let mut entry = GameEntry::with_id("a");
        entry.name = "Spirit Island".to_string();
        entry.min_players = 1;
        entry.max_players = 4;
        entry.duration = Some(Duration::Long);
        entry.complexity = Some(Complexity::Complex);
        entry.is_coop = true;
        entry.picture = "file:///pictures/spirit.jpg".to_string();

        let row = GameRow::from(&entry);
        assert_eq!(row.duration.as_deref(), Some("LONG"));
        assert_eq!(row.size, None);
        assert_eq!(GameEntry::from(row), entry);
    }

    #[test]
    fn unknown_attributes_and_wide_integers_are_tolerated() {
        let row = GameRow {
            id: "b".to_string(),
            name: String::new(),
            min_players: -3,
            max_players: 9000,
            duration: Some("ETERNAL".to_string()),
            size: Some("compact".to_string()),
            complexity: None,
            is_coop: false,
            picture: String::new(),
        };
        let entry = GameEntry::from(row);
        assert_eq!(entry.min_players, 0);
        assert_eq!(entry.max_players, u8::MAX);
        assert_eq!(entry.duration, None);
        assert_eq!(entry.size, Some(Size::Compact));
    }
}
