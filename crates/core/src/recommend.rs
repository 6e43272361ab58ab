//! Random pick from the eligible set.

use chrono::{DateTime, Utc};
use rand::{seq::SliceRandom, Rng};
use tracing::debug;

use crate::{filter::FilterCriteria, models::GameEntry};

/// A game drawn from the eligible set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    /// The suggested game.
    pub game: GameEntry,
    /// Size of the set it was drawn from.
    pub eligible: usize,
    /// When the draw happened.
    pub drawn_at: DateTime<Utc>,
}

/// Outcome of a draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    /// A game was picked.
    Picked(Recommendation),
    /// Nothing in the catalog matched the criteria.
    NoEligibleGame,
}

impl Suggestion {
    /// The picked game, if there was one.
    pub fn game(&self) -> Option<&GameEntry> {
        match self {
            Suggestion::Picked(recommendation) => Some(&recommendation.game),
            Suggestion::NoEligibleGame => None,
        }
    }
}

/// Pick one element of `eligible` uniformly at random.
pub fn pick<'a, R>(eligible: &'a [GameEntry], rng: &mut R) -> Option<&'a GameEntry>
where
    R: Rng + ?Sized,
{
    eligible.choose(rng)
}

/// The eligible set captured when the user asked for a game.
///
/// Draws never re-query the catalog; edits made after the capture are not
/// reflected until a new `Recommender` is built.
#[derive(Debug, Clone)]
pub struct Recommender {
    criteria: FilterCriteria,
    eligible: Vec<GameEntry>,
}

impl Recommender {
    /// Capture `eligible` as the result of filtering with `criteria`.
    pub fn new(criteria: FilterCriteria, eligible: Vec<GameEntry>) -> Self {
        Self { criteria, eligible }
    }

    /// Filter `games` with `criteria` and capture the result.
    pub fn from_catalog(criteria: FilterCriteria, games: Vec<GameEntry>) -> Self {
        let eligible = criteria.apply(games);
        Self::new(criteria, eligible)
    }

    /// Criteria the eligible set was computed with.
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// The captured eligible set.
    pub fn eligible(&self) -> &[GameEntry] {
        &self.eligible
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.eligible.is_empty()
    }

    /// Draw one game. Repeated draws are independent and may repeat.
    pub fn draw<R>(&self, rng: &mut R) -> Suggestion
    where
        R: Rng + ?Sized,
    {
        match pick(&self.eligible, rng) {
            Some(game) => {
                debug!(game_id = %game.id, eligible = self.eligible.len(), "Drew a game");
                Suggestion::Picked(Recommendation {
                    game: game.clone(),
                    eligible: self.eligible.len(),
                    drawn_at: Utc::now(),
                })
            }
            None => {
                debug!(players = self.criteria.players, "No eligible game");
                Suggestion::NoEligibleGame
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Duration;
    use rand::{rngs::StdRng, SeedableRng};
    use std::collections::BTreeSet;

    fn game(id: &str, min: u8, max: u8) -> GameEntry {
        let mut entry = GameEntry::with_id(id);
        entry.min_players = min;
        entry.max_players = max;
        entry
    }

    #[test]
    fn draws_always_come_from_the_eligible_set() {
        let games = vec![game("a", 1, 4), game("b", 2, 2), game("c", 3, 6)];
        let recommender = Recommender::from_catalog(FilterCriteria::for_players(2), games);
        let eligible: BTreeSet<_> = recommender
            .eligible()
            .iter()
            .map(|game| game.id.clone())
            .collect();
        assert_eq!(eligible.len(), 2);

        let mut rng = StdRng::seed_from_u64(7);
        let mut drawn = BTreeSet::new();
        for _ in 0..64 {
            match recommender.draw(&mut rng) {
                Suggestion::Picked(recommendation) => {
                    assert_eq!(recommendation.eligible, 2);
                    assert!(eligible.contains(&recommendation.game.id));
                    drawn.insert(recommendation.game.id);
                }
                Suggestion::NoEligibleGame => panic!("expected a pick"),
            }
        }
        assert_eq!(drawn, eligible);
    }

    #[test]
    fn empty_eligible_set_reports_no_game() {
        let recommender = Recommender::from_catalog(
            FilterCriteria::for_players(6).with_durations([Duration::Short]),
            vec![game("a", 2, 4), game("b", 1, 2)],
        );
        assert!(recommender.is_empty());
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(recommender.draw(&mut rng), Suggestion::NoEligibleGame);
        assert_eq!(recommender.draw(&mut rng).game(), None);
    }

    #[test]
    fn pick_handles_single_and_empty_slices() {
        let mut rng = StdRng::seed_from_u64(3);
        let only = [game("only", 1, 1)];
        assert_eq!(pick(&only, &mut rng).map(|g| g.id.as_str()), Some("only"));
        assert!(pick(&[], &mut rng).is_none());
    }
}
