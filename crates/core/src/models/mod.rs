//! Shared domain models.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Smallest player count a game can be configured for.
pub const MIN_PLAYERS: u8 = 1;
/// Largest player count a game can be configured for.
pub const MAX_PLAYERS: u8 = 12;

/// Label shown for a game without a name.
pub const UNNAMED_PLACEHOLDER: &str = "Unnamed game";
/// Label shown for an unset attribute.
pub const UNSET_LABEL: &str = "--";

/// Error returned when a stored attribute name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownAttribute {
    kind: &'static str,
    value: String,
}

macro_rules! attribute_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, [$($variant:ident => $stored:literal),+ $(,)?]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Name used in the persisted catalog.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $stored),+
                }
            }

            /// Capitalised label for display.
            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownAttribute;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($stored) {
                        return Ok($name::$variant);
                    }
                )+
                Err(UnknownAttribute {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }
    };
}

attribute_enum!(
    /// Rough playing time of a game.
    Duration, "duration", [Short => "SHORT", Medium => "MEDIUM", Long => "LONG"]
);

attribute_enum!(
    /// Table footprint of a game.
    Size, "size", [Compact => "COMPACT", Normal => "NORMAL", Large => "LARGE"]
);

attribute_enum!(
    /// Rules weight of a game.
    Complexity, "complexity", [Simple => "SIMPLE", Average => "AVERAGE", Complex => "COMPLEX"]
);

/// Returns the display label of an optional attribute, or `--` when unset.
pub fn attribute_label<T: fmt::Display>(value: Option<T>) -> String {
    value
        .map(|value| value.to_string())
        .unwrap_or_else(|| UNSET_LABEL.to_string())
}

/// One game in the personal catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEntry {
    /// Opaque identifier assigned at creation.
    pub id: String,
    /// Free-text name; may be empty.
    pub name: String,
    /// Fewest players the game supports.
    pub min_players: u8,
    /// Most players the game supports.
    pub max_players: u8,
    /// Playing time, if known.
    pub duration: Option<Duration>,
    /// Table footprint, if known.
    pub size: Option<Size>,
    /// Rules weight, if known.
    pub complexity: Option<Complexity>,
    /// Whether the game is cooperative.
    pub is_coop: bool,
    /// Reference to an externally stored image; empty when unset.
    pub picture: String,
}

impl Default for GameEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEntry {
    /// Create a blank entry with a fresh identifier.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    /// Create a blank entry with the given identifier.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            min_players: MIN_PLAYERS,
            max_players: MIN_PLAYERS,
            duration: None,
            size: None,
            complexity: None,
            is_coop: false,
            picture: String::new(),
        }
    }

    /// Name for display, falling back to a placeholder when empty.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            UNNAMED_PLACEHOLDER
        } else {
            &self.name
        }
    }

    /// Whether `players` falls inside the supported range.
    pub fn supports_players(&self, players: u8) -> bool {
        self.min_players <= players && players <= self.max_players
    }

    /// Whether the stored range is ordered and inside `[MIN_PLAYERS, MAX_PLAYERS]`.
    pub fn has_valid_player_range(&self) -> bool {
        MIN_PLAYERS <= self.min_players
            && self.min_players <= self.max_players
            && self.max_players <= MAX_PLAYERS
    }

    /// Human readable player range, e.g. `2-4` or `3`.
    pub fn players_label(&self) -> String {
        if self.min_players == self.max_players {
            self.min_players.to_string()
        } else {
            format!("{}-{}", self.min_players, self.max_players)
        }
    }

    /// Whether a picture reference has been recorded.
    pub fn has_picture(&self) -> bool {
        !self.picture.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entries_use_defaults() {
        let entry = GameEntry::new();
        assert!(Uuid::parse_str(&entry.id).is_ok());
        assert_eq!(entry.name, "");
        assert_eq!((entry.min_players, entry.max_players), (1, 1));
        assert_eq!(entry.duration, None);
        assert!(!entry.is_coop);
        assert!(!entry.has_picture());
        assert_ne!(entry.id, GameEntry::new().id);
    }

    #[test]
    fn display_name_falls_back_to_placeholder() {
        let mut entry = GameEntry::with_id("a");
        assert_eq!(entry.display_name(), UNNAMED_PLACEHOLDER);
        entry.name = "Azul".to_string();
        assert_eq!(entry.display_name(), "Azul");
    }

    #[test]
    fn attributes_parse_stored_names() {
        assert_eq!("SHORT".parse::<Duration>(), Ok(Duration::Short));
        assert_eq!("average".parse::<Complexity>(), Ok(Complexity::Average));
        assert_eq!(Size::Large.as_str(), "LARGE");
        assert!("HUGE".parse::<Size>().is_err());
    }

    #[test]
    fn labels_match_display_conventions() {
        assert_eq!(attribute_label(Some(Duration::Medium)), "Medium");
        assert_eq!(attribute_label(None::<Size>), "--");
    }

    #[test]
    fn player_range_checks() {
        let mut entry = GameEntry::with_id("a");
        entry.min_players = 2;
        entry.max_players = 4;
        assert!(entry.supports_players(2));
        assert!(entry.supports_players(4));
        assert!(!entry.supports_players(5));
        assert_eq!(entry.players_label(), "2-4");
        assert!(entry.has_valid_player_range());

        entry.min_players = 5;
        assert!(!entry.has_valid_player_range());
    }
}
