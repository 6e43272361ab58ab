//! Filter criteria used to narrow the catalog down to eligible games.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::{Complexity, Duration, GameEntry, Size, MAX_PLAYERS, MIN_PLAYERS};

/// Selections made on the bot screen.
///
/// An empty attribute set accepts every value, including unset ones. A
/// non-empty set only accepts entries whose attribute is set and listed.
/// `want_coop` and `want_competitive` are recorded but do not take part in
/// matching yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Number of people who want to play.
    pub players: u8,
    /// Accepted durations.
    #[serde(default)]
    pub durations: BTreeSet<Duration>,
    /// Accepted sizes.
    #[serde(default)]
    pub sizes: BTreeSet<Size>,
    /// Accepted complexities.
    #[serde(default)]
    pub complexities: BTreeSet<Complexity>,
    /// Cooperative games requested.
    #[serde(default)]
    pub want_coop: bool,
    /// Competitive games requested.
    #[serde(default)]
    pub want_competitive: bool,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::for_players(MIN_PLAYERS)
    }
}

impl FilterCriteria {
    /// Criteria accepting every game that supports `players`.
    pub fn for_players(players: u8) -> Self {
        Self {
            players,
            durations: BTreeSet::new(),
            sizes: BTreeSet::new(),
            complexities: BTreeSet::new(),
            want_coop: false,
            want_competitive: false,
        }
    }

    /// Replace the accepted durations.
    pub fn with_durations(mut self, durations: impl IntoIterator<Item = Duration>) -> Self {
        self.durations = durations.into_iter().collect();
        self
    }

    /// Replace the accepted sizes.
    pub fn with_sizes(mut self, sizes: impl IntoIterator<Item = Size>) -> Self {
        self.sizes = sizes.into_iter().collect();
        self
    }

    /// Replace the accepted complexities.
    pub fn with_complexities(
        mut self,
        complexities: impl IntoIterator<Item = Complexity>,
    ) -> Self {
        self.complexities = complexities.into_iter().collect();
        self
    }

    /// Move the player count by `delta`, staying inside the supported range.
    pub fn adjust_players(&mut self, delta: i16) {
        let next = (self.players as i16 + delta).clamp(MIN_PLAYERS as i16, MAX_PLAYERS as i16);
        self.players = next as u8;
    }

    /// Flip whether `duration` is accepted.
    pub fn toggle_duration(&mut self, duration: Duration) {
        toggle(&mut self.durations, duration);
    }

    /// Flip whether `size` is accepted.
    pub fn toggle_size(&mut self, size: Size) {
        toggle(&mut self.sizes, size);
    }

    /// Flip whether `complexity` is accepted.
    pub fn toggle_complexity(&mut self, complexity: Complexity) {
        toggle(&mut self.complexities, complexity);
    }

    /// Whether `entry` is eligible under these criteria.
    pub fn matches(&self, entry: &GameEntry) -> bool {
        entry.supports_players(self.players)
            && accepts(&self.durations, entry.duration)
            && accepts(&self.sizes, entry.size)
            && accepts(&self.complexities, entry.complexity)
    }

    /// Keep only the eligible entries, preserving their order.
    pub fn apply<I>(&self, entries: I) -> Vec<GameEntry>
    where
        I: IntoIterator<Item = GameEntry>,
    {
        entries
            .into_iter()
            .filter(|entry| self.matches(entry))
            .collect()
    }
}

fn accepts<T: Ord>(accepted: &BTreeSet<T>, value: Option<T>) -> bool {
    if accepted.is_empty() {
        return true;
    }
    value.map(|value| accepted.contains(&value)).unwrap_or(false)
}

fn toggle<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}
