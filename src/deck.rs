use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

use crate::error::TrackerError;

/// Lowest and highest card rank in the mini-game deck.
pub const MIN_RANK: u8 = 1;
pub const MAX_RANK: u8 = 11;

/// Single-use deck of ranks 1-11, one copy of each per round.
pub struct Deck {
    cards: Vec<u8>,
    rng: SmallRng,
}

impl Deck {
    pub fn new(seed: u64) -> Self {
        let mut deck = Deck {
            cards: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
        };
        deck.reset();
        deck
    }

    /// Restore all 11 ranks and reshuffle. Called at every round start.
    pub fn reset(&mut self) {
        self.cards.clear();
        self.cards.extend(MIN_RANK..=MAX_RANK);
        self.cards.shuffle(&mut self.rng);
    }

    /// Draw one rank without replacement.
    pub fn draw(&mut self) -> Result<u8, TrackerError> {
        self.cards.pop().ok_or(TrackerError::EmptyDeck)
    }

    /// Take a specific rank out of the deck, e.g. a card seen face-up on
    /// the table. Returns false if it was already gone.
    pub fn remove_rank(&mut self, rank: u8) -> bool {
        if let Some(pos) = self.cards.iter().position(|&c| c == rank) {
            self.cards.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn remaining(&self) -> &[u8] {
        &self.cards
    }

    pub fn remaining_count(&self) -> usize {
        self.cards.len()
    }
}
