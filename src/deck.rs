//! A deck of cards.

use std::collections::VecDeque;
use std::iter::FromIterator;

use rand::distributions::{Distribution, Standard};
use rand::seq::SliceRandom;

/// Returned when drawing from an empty deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("deck is empty")]
pub struct EmptyDeck;

/// A deck of cards, drawn from the front and replenished at the back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck<C> {
    cards: VecDeque<C>,
}

impl<C> Distribution<Deck<C>> for Standard
where
    Deck<C>: Default,
{
    fn sample<R: rand::prelude::Rng + ?Sized>(&self, rng: &mut R) -> Deck<C> {
        let mut deck = Deck::default();
        deck.shuffle(rng);
        deck
    }
}

impl<C> FromIterator<C> for Deck<C> {
    fn from_iter<T: IntoIterator<Item = C>>(iter: T) -> Self {
        let cards = iter.into_iter().collect();
        Self { cards }
    }
}

impl<C> Extend<C> for Deck<C> {
    fn extend<T: IntoIterator<Item = C>>(&mut self, iter: T) {
        self.cards.extend(iter);
    }
}

impl<C> IntoIterator for Deck<C> {
    type Item = C;
    type IntoIter = std::collections::vec_deque::IntoIter<C>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}

impl<C> Deck<C> {
    /// Creates an empty deck.
    pub fn empty() -> Self {
        Self {
            cards: VecDeque::new(),
        }
    }

    /// The number of cards remaining in the deck.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns true if there are no cards left.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Removes the front card from the deck.
    pub fn draw(&mut self) -> Result<C, EmptyDeck> {
        self.cards.pop_front().ok_or(EmptyDeck)
    }

    /// Places a card at the back of the deck.
    pub fn push(&mut self, card: C) {
        self.cards.push_back(card);
    }

    /// Splits up to `n` cards off the front of the deck.
    pub fn deal(&mut self, n: usize) -> Deck<C> {
        let n = n.min(self.cards.len());
        self.cards.drain(..n).collect()
    }

    /// Iterates over the cards, front to back.
    pub fn iter(&self) -> impl Iterator<Item = &C> + '_ {
        self.cards.iter()
    }

    /// Shuffles the deck in place.
    pub fn shuffle<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.make_contiguous().shuffle(rng);
    }
}
