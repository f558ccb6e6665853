//! The shared pile in the middle of the table.

use super::{Card, Deck, Side};

/// A card on the pile along with the side that played it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub card: Card,
    pub played_by: Side,
}

/// The shared pile. Append-only during play, emptied in one go when collected.
#[derive(Debug, Clone, Default)]
pub struct Pile {
    entries: Vec<Entry>,
}

impl Pile {
    /// The number of cards on the pile.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Up to the last `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> &[Entry] {
        let idx = self.entries.len().saturating_sub(n);
        &self.entries[idx..]
    }

    /// Places a card on top of the pile.
    pub fn append(&mut self, card: Card, played_by: Side) {
        self.entries.push(Entry { card, played_by });
    }

    /// Moves every card on the pile to the back of `deck`, returning the number of cards moved.
    pub fn collect_into(&mut self, deck: &mut Deck) -> usize {
        let count = self.entries.len();
        deck.extend(self.entries.drain(..).map(|e| e.card));
        count
    }
}
