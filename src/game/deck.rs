//! Themes, difficulties and deck construction

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Card art set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Nature,
    Ocean,
}

const NATURE_SYMBOLS: &[&str] = &[
    "🌲", "🌸", "🍄", "🦋", "🌿", "🌺", "🍀", "🌻", "🌵", "🌾", "🍁", "🌷",
];

const OCEAN_SYMBOLS: &[&str] = &[
    "🐠", "🐙", "🦈", "🐚", "🦀", "🐢", "🦑", "🐋", "🦭", "🐡", "🐬", "🦐",
];

impl Theme {
    /// Ordered symbol set; always long enough for `Difficulty::Hard`
    pub fn symbols(&self) -> &'static [&'static str] {
        match self {
            Theme::Nature => NATURE_SYMBOLS,
            Theme::Ocean => OCEAN_SYMBOLS,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Theme::Nature => "Nature",
            Theme::Ocean => "Ocean",
        }
    }

    pub fn all() -> &'static [Theme] {
        &[Theme::Nature, Theme::Ocean]
    }
}

/// Board size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Number of distinct pairs dealt
    pub fn pair_count(&self) -> usize {
        match self {
            Difficulty::Easy => 6,
            Difficulty::Medium => 8,
            Difficulty::Hard => 12,
        }
    }

    /// Columns of the board grid (4x3, 4x4, 6x4)
    pub fn grid_columns(&self) -> usize {
        match self {
            Difficulty::Easy | Difficulty::Medium => 4,
            Difficulty::Hard => 6,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn all() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    }
}

/// A single card on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    /// Position on the board, unique within a deal
    pub id: usize,
    pub face: &'static str,
    pub revealed: bool,
    pub matched: bool,
}

impl Card {
    /// Matched cards stay face up regardless of `revealed`
    pub fn is_face_up(&self) -> bool {
        self.revealed || self.matched
    }
}

/// An ordered deal of cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Deals a shuffled deck using the thread-local RNG
    pub fn deal(theme: Theme, difficulty: Difficulty) -> Self {
        Self::deal_with_rng(theme, difficulty, &mut rand::thread_rng())
    }

    /// Deals a deck shuffled with `rng`; deterministic for a seeded RNG
    pub fn deal_with_rng<R: Rng + ?Sized>(theme: Theme, difficulty: Difficulty, rng: &mut R) -> Self {
        let faces = &theme.symbols()[..difficulty.pair_count()];

        let mut deck: Vec<&'static str> = faces.iter().chain(faces.iter()).copied().collect();
        deck.shuffle(rng);

        let cards = deck
            .into_iter()
            .enumerate()
            .map(|(id, face)| Card {
                id,
                face,
                revealed: false,
                matched: false,
            })
            .collect();

        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, id: usize) -> Option<&Card> {
        self.cards.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: usize) -> Option<&mut Card> {
        self.cards.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Id of the other card with the same face as `id`
    pub fn partner_of(&self, id: usize) -> Option<usize> {
        let face = self.get(id)?.face;
        self.cards
            .iter()
            .find(|c| c.face == face && c.id != id)
            .map(|c| c.id)
    }
}
