//! Timed driver for memory rounds
//!
//! `Round` is a plain state machine; this module adds the clock. Pair
//! resolutions are applied by spawned tasks after their delay. Every start
//! and reset bumps a generation counter, and a task whose generation is no
//! longer current drops its resolution instead of touching the new round.

use super::deck::{Card, Difficulty, Theme};
use super::round::{Resolution, Round, Selection};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::Instant;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    NotStarted,
    InProgress,
    Complete,
}

/// Point-in-time view of the session for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundSnapshot {
    pub phase: Phase,
    pub generation: u64,
    pub theme: Option<Theme>,
    pub difficulty: Option<Difficulty>,
    pub cards: Vec<Card>,
    pub pending: Vec<usize>,
    pub matched_pairs: usize,
    pub pair_count: usize,
    pub incorrect_attempts: usize,
    pub accuracy: u32,
}

impl RoundSnapshot {
    fn not_started(generation: u64) -> Self {
        Self {
            phase: Phase::NotStarted,
            generation,
            theme: None,
            difficulty: None,
            cards: Vec::new(),
            pending: Vec::new(),
            matched_pairs: 0,
            pair_count: 0,
            incorrect_attempts: 0,
            accuracy: 0,
        }
    }

    fn of(round: &Round) -> Self {
        Self {
            phase: phase_of(Some(round)),
            generation: round.generation(),
            theme: Some(round.theme()),
            difficulty: Some(round.difficulty()),
            cards: round.cards().to_vec(),
            pending: round.pending().to_vec(),
            matched_pairs: round.matched_pairs(),
            pair_count: round.difficulty().pair_count(),
            incorrect_attempts: round.incorrect_attempts(),
            accuracy: round.accuracy(),
        }
    }
}

fn phase_of(round: Option<&Round>) -> Phase {
    match round {
        None => Phase::NotStarted,
        Some(r) if r.is_complete() => Phase::Complete,
        Some(_) => Phase::InProgress,
    }
}

struct SessionState {
    round: Option<Round>,
    generation: u64,
}

impl SessionState {
    fn snapshot(&self) -> RoundSnapshot {
        match &self.round {
            Some(round) => RoundSnapshot::of(round),
            None => RoundSnapshot::not_started(self.generation),
        }
    }
}

/// Memory game session
///
/// Cheap to clone; clones share the same round.
#[derive(Clone)]
pub struct MatchSession {
    state: Arc<Mutex<SessionState>>,
    updates: Arc<watch::Sender<RoundSnapshot>>,
}

impl Default for MatchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchSession {
    pub fn new() -> Self {
        let (updates, _) = watch::channel(RoundSnapshot::not_started(0));
        Self {
            state: Arc::new(Mutex::new(SessionState {
                round: None,
                generation: 0,
            })),
            updates: Arc::new(updates),
        }
    }

    /// Receives a snapshot after every change, including timed resolutions
    pub fn subscribe(&self) -> watch::Receiver<RoundSnapshot> {
        self.updates.subscribe()
    }

    /// Deals a new round
    ///
    /// Any round in play is abandoned first, exactly as `reset` would.
    pub async fn start(&self, theme: Theme, difficulty: Difficulty) -> RoundSnapshot {
        let mut state = self.state.lock().await;
        state.generation += 1;
        let generation = state.generation;
        state.round = Some(Round::start(
            theme,
            difficulty,
            generation,
            Instant::now().into_std(),
        ));

        tracing::info!(
            theme = theme.label(),
            difficulty = difficulty.label(),
            generation,
            "Started memory round"
        );
        self.publish(&state)
    }

    /// Turns a card over, scheduling the resolution when a pair is complete
    pub async fn select(&self, card_id: usize) -> Selection {
        let mut state = self.state.lock().await;
        let Some(round) = state.round.as_mut() else {
            return Selection::Ignored;
        };

        let selection = round.select(card_id);
        match selection {
            Selection::Ignored => return selection,
            Selection::Revealed => {}
            Selection::Pair(resolution) => {
                tracing::debug!(
                    first = resolution.first,
                    second = resolution.second,
                    outcome = ?resolution.outcome,
                    "Pair turned over"
                );
                let session = self.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(resolution.delay()).await;
                    session.resolve(resolution).await;
                });
            }
        }

        self.publish(&state);
        selection
    }

    async fn resolve(&self, resolution: Resolution) {
        let mut state = self.state.lock().await;
        if state.generation != resolution.generation {
            tracing::debug!(
                scheduled = resolution.generation,
                current = state.generation,
                "Dropping resolution from abandoned round"
            );
            return;
        }

        let Some(round) = state.round.as_mut() else {
            return;
        };
        if !round.apply(&resolution, Instant::now().into_std()) {
            return;
        }

        if round.is_complete() {
            tracing::info!(
                matched_pairs = round.matched_pairs(),
                incorrect_attempts = round.incorrect_attempts(),
                accuracy = round.accuracy(),
                elapsed_ms = round.elapsed(Instant::now().into_std()).as_millis() as u64,
                "Memory round complete"
            );
        }
        self.publish(&state);
    }

    /// Abandons the current round
    pub async fn reset(&self) {
        let mut state = self.state.lock().await;
        state.generation += 1;
        state.round = None;
        self.publish(&state);
    }

    pub async fn phase(&self) -> Phase {
        phase_of(self.state.lock().await.round.as_ref())
    }

    pub async fn snapshot(&self) -> RoundSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Time on the clock; `None` before the first start
    pub async fn elapsed(&self) -> Option<Duration> {
        let state = self.state.lock().await;
        state
            .round
            .as_ref()
            .map(|r| r.elapsed(Instant::now().into_std()))
    }

    fn publish(&self, state: &SessionState) -> RoundSnapshot {
        let snapshot = state.snapshot();
        self.updates.send_replace(snapshot.clone());
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::round::MatchOutcome;

    const PAST_MATCH_DELAY: Duration = Duration::from_millis(600);
    const PAST_MISMATCH_DELAY: Duration = Duration::from_millis(1100);

    fn partner(snapshot: &RoundSnapshot, id: usize) -> usize {
        let face = snapshot.cards[id].face;
        snapshot
            .cards
            .iter()
            .find(|c| c.face == face && c.id != id)
            .unwrap()
            .id
    }

    fn stranger(snapshot: &RoundSnapshot, id: usize) -> usize {
        let face = snapshot.cards[id].face;
        snapshot.cards.iter().find(|c| c.face != face).unwrap().id
    }

    #[tokio::test(start_paused = true)]
    async fn test_match_resolves_after_delay() {
        let session = MatchSession::new();
        let snapshot = session.start(Theme::Nature, Difficulty::Easy).await;
        assert_eq!(snapshot.phase, Phase::InProgress);
        assert_eq!(snapshot.cards.len(), 12);

        let b = partner(&snapshot, 0);
        assert_eq!(session.select(0).await, Selection::Revealed);
        assert!(matches!(
            session.select(b).await,
            Selection::Pair(r) if r.outcome == MatchOutcome::Match
        ));

        // Still pending until the delay runs out
        let pending = session.snapshot().await;
        assert_eq!(pending.pending, vec![0, b]);
        assert_eq!(pending.matched_pairs, 0);

        tokio::time::sleep(PAST_MATCH_DELAY).await;
        let resolved = session.snapshot().await;
        assert!(resolved.cards[0].matched && resolved.cards[b].matched);
        assert_eq!(resolved.matched_pairs, 1);
        assert_eq!(resolved.incorrect_attempts, 0);
        assert!(resolved.pending.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_mismatch_hides_cards_after_delay() {
        let session = MatchSession::new();
        let snapshot = session.start(Theme::Ocean, Difficulty::Easy).await;
        let c = stranger(&snapshot, 0);

        session.select(0).await;
        session.select(c).await;
        assert_eq!(session.snapshot().await.incorrect_attempts, 1);

        // A third card is rejected while the pair is pending
        let third = partner(&snapshot, 0);
        assert_eq!(session.select(third).await, Selection::Ignored);

        tokio::time::sleep(PAST_MATCH_DELAY).await;
        assert!(session.snapshot().await.cards[0].revealed);

        tokio::time::sleep(PAST_MISMATCH_DELAY - PAST_MATCH_DELAY).await;
        let resolved = session.snapshot().await;
        assert!(!resolved.cards[0].revealed && !resolved.cards[c].revealed);
        assert_eq!(resolved.matched_pairs, 0);
        assert_eq!(resolved.incorrect_attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_resolution_does_not_touch_new_round() {
        let session = MatchSession::new();
        let snapshot = session.start(Theme::Nature, Difficulty::Easy).await;
        let c = stranger(&snapshot, 0);
        session.select(0).await;
        session.select(c).await;

        session.reset().await;
        assert_eq!(session.phase().await, Phase::NotStarted);
        let fresh = session.start(Theme::Nature, Difficulty::Easy).await;
        session.select(0).await;

        tokio::time::sleep(PAST_MISMATCH_DELAY).await;
        let after = session.snapshot().await;
        assert_eq!(after.generation, fresh.generation);
        assert_eq!(after.incorrect_attempts, 0);
        assert_eq!(after.pending, vec![0]);
        assert!(after.cards[0].revealed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_round_completes_once() {
        let session = MatchSession::new();
        let mut updates = session.subscribe();
        let snapshot = session.start(Theme::Nature, Difficulty::Easy).await;

        let mut done = std::collections::HashSet::new();
        for id in 0..snapshot.cards.len() {
            if !done.insert(id) {
                continue;
            }
            let other = partner(&snapshot, id);
            done.insert(other);
            assert_ne!(session.phase().await, Phase::Complete);
            session.select(id).await;
            session.select(other).await;
            tokio::time::sleep(PAST_MATCH_DELAY).await;
        }

        let finished = session.snapshot().await;
        assert_eq!(finished.phase, Phase::Complete);
        assert_eq!(finished.matched_pairs, 6);
        assert_eq!(finished.accuracy, 100);
        assert_eq!(updates.borrow_and_update().phase, Phase::Complete);

        // Clock is frozen and further selections are ignored
        let frozen = session.elapsed().await.unwrap();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(session.elapsed().await.unwrap(), frozen);
        assert_eq!(session.select(0).await, Selection::Ignored);

        session.reset().await;
        assert_eq!(session.phase().await, Phase::NotStarted);
        assert!(session.elapsed().await.is_none());
    }

    #[tokio::test]
    async fn test_select_before_start_is_ignored() {
        let session = MatchSession::new();
        assert_eq!(session.select(0).await, Selection::Ignored);
        assert_eq!(session.snapshot().await.phase, Phase::NotStarted);
    }
}
