//! Turn and scoring state of a single memory round

use super::deck::{Card, Deck, Difficulty, Theme};
use crate::constants::{MATCH_REVEAL_DELAY, MISMATCH_HIDE_DELAY};
use std::time::{Duration, Instant};

/// Whether the two pending cards share a face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Match,
    Mismatch,
}

/// A pair waiting to be resolved after its delay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Generation of the round that produced this pair
    pub generation: u64,
    pub first: usize,
    pub second: usize,
    pub outcome: MatchOutcome,
}

impl Resolution {
    /// How long the pair stays face up before `Round::apply`
    pub fn delay(&self) -> Duration {
        match self.outcome {
            MatchOutcome::Match => MATCH_REVEAL_DELAY,
            MatchOutcome::Mismatch => MISMATCH_HIDE_DELAY,
        }
    }
}

/// Result of selecting a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Nothing changed
    Ignored,
    /// The card was turned over and is waiting for a partner
    Revealed,
    /// The second card was turned over; apply the resolution after its delay
    Pair(Resolution),
}

/// State of one round, from deal to the last matched pair
#[derive(Debug, Clone)]
pub struct Round {
    theme: Theme,
    difficulty: Difficulty,
    deck: Deck,
    pending: Vec<usize>,
    matched_pairs: usize,
    incorrect_attempts: usize,
    started_at: Instant,
    ended_at: Option<Instant>,
    generation: u64,
}

impl Round {
    /// Deals a fresh deck and starts the clock
    pub fn start(theme: Theme, difficulty: Difficulty, generation: u64, now: Instant) -> Self {
        Self::with_deck(Deck::deal(theme, difficulty), theme, difficulty, generation, now)
    }

    /// Starts a round on a prepared deck
    pub fn with_deck(
        deck: Deck,
        theme: Theme,
        difficulty: Difficulty,
        generation: u64,
        now: Instant,
    ) -> Self {
        Self {
            theme,
            difficulty,
            deck,
            pending: Vec::with_capacity(2),
            matched_pairs: 0,
            incorrect_attempts: 0,
            started_at: now,
            ended_at: None,
            generation,
        }
    }

    /// Turns a card over
    ///
    /// Ignored while a pair is pending, for matched or already pending cards,
    /// for unknown ids, and once the round is complete. A mismatch is counted
    /// as soon as the second card is turned, before its resolution runs.
    pub fn select(&mut self, card_id: usize) -> Selection {
        if self.is_complete() || self.pending.len() == 2 || self.pending.contains(&card_id) {
            return Selection::Ignored;
        }

        match self.deck.get_mut(card_id) {
            Some(card) if !card.matched => card.revealed = true,
            _ => return Selection::Ignored,
        }
        self.pending.push(card_id);

        let [first, second] = match self.pending[..] {
            [first, second] => [first, second],
            _ => return Selection::Revealed,
        };

        let same_face = self.face(first) == self.face(second);
        let outcome = if same_face {
            MatchOutcome::Match
        } else {
            self.incorrect_attempts += 1;
            MatchOutcome::Mismatch
        };

        Selection::Pair(Resolution {
            generation: self.generation,
            first,
            second,
            outcome,
        })
    }

    /// Applies a pending pair's resolution
    ///
    /// Returns false without changing anything when the resolution belongs to
    /// another round or no longer matches the pending pair.
    pub fn apply(&mut self, resolution: &Resolution, now: Instant) -> bool {
        if resolution.generation != self.generation
            || self.pending[..] != [resolution.first, resolution.second]
        {
            return false;
        }

        for id in [resolution.first, resolution.second] {
            if let Some(card) = self.deck.get_mut(id) {
                match resolution.outcome {
                    MatchOutcome::Match => card.matched = true,
                    MatchOutcome::Mismatch => card.revealed = false,
                }
            }
        }
        self.pending.clear();

        if resolution.outcome == MatchOutcome::Match {
            self.matched_pairs += 1;
            if self.is_complete() && self.ended_at.is_none() {
                self.ended_at = Some(now);
            }
        }

        true
    }

    pub fn is_complete(&self) -> bool {
        self.matched_pairs == self.difficulty.pair_count()
    }

    /// Percentage of attempts that found a pair, rounded; 0 with no attempts
    pub fn accuracy(&self) -> u32 {
        let attempts = self.matched_pairs + self.incorrect_attempts;
        if attempts == 0 {
            return 0;
        }
        (self.matched_pairs as f64 / attempts as f64 * 100.0).round() as u32
    }

    /// Time since the start, frozen once complete
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.ended_at
            .unwrap_or(now)
            .saturating_duration_since(self.started_at)
    }

    fn face(&self, id: usize) -> Option<&'static str> {
        self.deck.get(id).map(|c| c.face)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn cards(&self) -> &[Card] {
        self.deck.cards()
    }

    pub fn pending(&self) -> &[usize] {
        &self.pending
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn incorrect_attempts(&self) -> usize {
        self.incorrect_attempts
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<Instant> {
        self.ended_at
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Formats a duration as `m:ss`
pub fn format_clock(duration: Duration) -> String {
    let seconds = duration.as_secs();
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn easy_round() -> Round {
        Round::start(Theme::Nature, Difficulty::Easy, 1, Instant::now())
    }

    /// Two unmatched ids with different faces
    fn mismatched_pair(round: &Round) -> (usize, usize) {
        let mut open = round.cards().iter().filter(|c| !c.matched);
        let first = open.next().unwrap();
        let other = open.find(|c| c.face != first.face).unwrap();
        (first.id, other.id)
    }

    fn resolve(round: &mut Round, a: usize, b: usize) -> Resolution {
        assert_eq!(round.select(a), Selection::Revealed);
        match round.select(b) {
            Selection::Pair(resolution) => {
                assert!(round.apply(&resolution, Instant::now()));
                resolution
            }
            other => panic!("expected a pair, got {:?}", other),
        }
    }

    #[test]
    fn test_matching_pair() {
        let mut round = easy_round();
        let a = 0;
        let b = round.deck().partner_of(a).unwrap();

        assert_eq!(round.select(a), Selection::Revealed);
        let resolution = match round.select(b) {
            Selection::Pair(r) => r,
            other => panic!("expected a pair, got {:?}", other),
        };
        assert_eq!(resolution.outcome, MatchOutcome::Match);
        assert_eq!(resolution.delay(), Duration::from_millis(500));
        assert_eq!(round.matched_pairs(), 0);

        assert!(round.apply(&resolution, Instant::now()));
        assert!(round.cards()[a].matched && round.cards()[b].matched);
        assert!(round.cards()[a].is_face_up());
        assert_eq!(round.matched_pairs(), 1);
        assert_eq!(round.incorrect_attempts(), 0);
        assert!(round.pending().is_empty());
    }

    #[test]
    fn test_mismatching_pair() {
        let mut round = easy_round();
        let (a, c) = mismatched_pair(&round);

        round.select(a);
        let resolution = match round.select(c) {
            Selection::Pair(r) => r,
            other => panic!("expected a pair, got {:?}", other),
        };
        assert_eq!(resolution.outcome, MatchOutcome::Mismatch);
        assert_eq!(resolution.delay(), Duration::from_millis(1000));
        // Counted before the cards flip back
        assert_eq!(round.incorrect_attempts(), 1);
        assert!(round.cards()[a].revealed);

        assert!(round.apply(&resolution, Instant::now()));
        assert!(!round.cards()[a].revealed && !round.cards()[c].revealed);
        assert_eq!(round.matched_pairs(), 0);
        assert_eq!(round.incorrect_attempts(), 1);
    }

    #[test]
    fn test_ignored_selections() {
        let mut round = easy_round();
        let (a, c) = mismatched_pair(&round);

        assert_eq!(round.select(a), Selection::Revealed);
        // Same card again is a no-op
        assert_eq!(round.select(a), Selection::Ignored);
        assert_eq!(round.pending(), &[a]);

        assert!(matches!(round.select(c), Selection::Pair(_)));
        // A third card while the pair is pending
        let third = (0..round.deck().len()).find(|id| *id != a && *id != c).unwrap();
        assert_eq!(round.select(third), Selection::Ignored);
        assert!(!round.cards()[third].revealed);
        assert_eq!(round.pending().len(), 2);

        assert_eq!(round.select(1000), Selection::Ignored);
    }

    #[test]
    fn test_matched_card_cannot_be_selected() {
        let mut round = easy_round();
        let b = round.deck().partner_of(0).unwrap();
        resolve(&mut round, 0, b);

        assert_eq!(round.select(0), Selection::Ignored);
        assert_eq!(round.select(b), Selection::Ignored);
        assert!(round.pending().is_empty());
    }

    #[test]
    fn test_stale_resolution_is_rejected() {
        let mut round = easy_round();
        let b = round.deck().partner_of(0).unwrap();
        round.select(0);
        let resolution = match round.select(b) {
            Selection::Pair(r) => r,
            other => panic!("expected a pair, got {:?}", other),
        };

        let foreign = Resolution {
            generation: 99,
            ..resolution
        };
        assert!(!round.apply(&foreign, Instant::now()));
        assert_eq!(round.matched_pairs(), 0);

        assert!(round.apply(&resolution, Instant::now()));
        // Applying twice does nothing
        assert!(!round.apply(&resolution, Instant::now()));
        assert_eq!(round.matched_pairs(), 1);
    }

    #[test]
    fn test_completion_and_elapsed() {
        let start = Instant::now();
        let mut round = Round::start(Theme::Ocean, Difficulty::Easy, 1, start);
        let mut done = std::collections::HashSet::new();

        for id in 0..round.deck().len() {
            if done.contains(&id) {
                continue;
            }
            assert!(!round.is_complete());
            let partner = round.deck().partner_of(id).unwrap();
            done.insert(partner);
            resolve(&mut round, id, partner);
        }

        assert!(round.is_complete());
        assert_eq!(round.matched_pairs(), 6);
        assert_eq!(round.accuracy(), 100);

        let ended = round.ended_at().unwrap();
        let later = ended + Duration::from_secs(60);
        assert_eq!(round.elapsed(later), ended - start);
        // Frozen: nothing selectable once complete
        assert_eq!(round.select(0), Selection::Ignored);
    }

    #[test]
    fn test_elapsed_while_in_progress() {
        let start = Instant::now();
        let round = Round::start(Theme::Nature, Difficulty::Medium, 1, start);
        let now = start + Duration::from_millis(83_500);
        assert_eq!(round.elapsed(now), Duration::from_millis(83_500));
        assert_eq!(format_clock(round.elapsed(now)), "1:23");
    }

    #[test]
    fn test_accuracy() {
        let mut round = easy_round();
        assert_eq!(round.accuracy(), 0);

        let (a, c) = mismatched_pair(&round);
        resolve(&mut round, a, c);
        assert_eq!(round.accuracy(), 0);

        let b = round.deck().partner_of(a).unwrap();
        resolve(&mut round, a, b);
        // 1 / (1 + 1)
        assert_eq!(round.accuracy(), 50);

        let (x, y) = mismatched_pair(&round);
        resolve(&mut round, x, y);
        // 1 / 3 rounds to 33
        assert_eq!(round.accuracy(), 33);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(Duration::ZERO), "0:00");
        assert_eq!(format_clock(Duration::from_secs(9)), "0:09");
        assert_eq!(format_clock(Duration::from_secs(600)), "10:00");
    }
}
