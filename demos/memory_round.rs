use dashboard_core::game::{format_clock, Difficulty, MatchSession, Phase, Theme};
use rand::seq::SliceRandom;
use tracing_subscriber::EnvFilter;

/// Plays one round with a player who remembers every card they have seen
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let session = MatchSession::new();
    let mut updates = session.subscribe();
    let board = session.start(Theme::Ocean, Difficulty::Medium).await;
    println!(
        "Dealt {} cards ({} columns)",
        board.cards.len(),
        Difficulty::Medium.grid_columns()
    );

    let mut order: Vec<usize> = (0..board.cards.len()).collect();
    order.shuffle(&mut rand::thread_rng());
    let mut seen: Vec<Option<&'static str>> = vec![None; board.cards.len()];

    while session.phase().await == Phase::InProgress {
        let snapshot = session.snapshot().await;
        let open: Vec<usize> = order
            .iter()
            .copied()
            .filter(|&id| !snapshot.cards[id].matched)
            .collect();

        // Pick a known pair if there is one, otherwise guess
        let known = open.iter().find_map(|&a| {
            let face = seen[a]?;
            open.iter()
                .find(|&&b| b != a && seen[b] == Some(face))
                .map(|&b| (a, b))
        });
        let (first, second) = known.unwrap_or_else(|| {
            let a = open.iter().copied().find(|&id| seen[id].is_none()).unwrap_or(open[0]);
            let b = open.iter().copied().find(|&id| id != a).unwrap_or(a);
            (a, b)
        });

        session.select(first).await;
        session.select(second).await;
        let turned = session.snapshot().await;
        seen[first] = Some(turned.cards[first].face);
        seen[second] = Some(turned.cards[second].face);

        // Wait for the pair to resolve
        while updates.changed().await.is_ok() {
            if updates.borrow_and_update().pending.is_empty() {
                break;
            }
        }
    }

    let finished = session.snapshot().await;
    let elapsed = session.elapsed().await.unwrap_or_default();
    println!(
        "Matched {}/{} pairs in {} with {} misses ({}% accuracy)",
        finished.matched_pairs,
        finished.pair_count,
        format_clock(elapsed),
        finished.incorrect_attempts,
        finished.accuracy
    );
}
