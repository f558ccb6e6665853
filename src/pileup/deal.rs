//! Initial conditions for a game.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use itertools::Itertools;
use rand::distributions::{Distribution, Standard};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Card, Deck, SetupError, COPIES, DECK_SIZE};

/// Cards dealt to each side.
pub const HAND_SIZE: usize = DECK_SIZE / 2;

/// The cards dealt to each side, front of the deck first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub player: Vec<Card>,
    pub cpu: Vec<Card>,
}

impl Distribution<Deal> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Deal {
        Deal::new(rng.gen()).expect("deck is valid")
    }
}

impl Deal {
    /// Deals the first half of `deck` to the player, and the rest to the CPU.
    pub fn new(mut deck: Deck) -> Result<Self, SetupError> {
        if deck.len() != DECK_SIZE {
            return Err(SetupError::IncompleteDeck(deck.len()));
        }
        let player = deck.deal(HAND_SIZE).into_iter().collect();
        let cpu = deck.into_iter().collect();
        let deal = Self { player, cpu };
        deal.validate()?;
        Ok(deal)
    }

    /// Creates a [`Deal`] from a deck shuffled with `rng`.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Standard.sample(rng)
    }

    /// Checks that the deal is a complete deck split evenly between the sides.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.player.len() != HAND_SIZE || self.cpu.len() != HAND_SIZE {
            return Err(SetupError::UnevenDeal {
                expect: HAND_SIZE,
                player: self.player.len(),
                cpu: self.cpu.len(),
            });
        }
        let mut seen = HashSet::with_capacity(DECK_SIZE);
        for card in self.player.iter().chain(&self.cpu) {
            if !seen.insert(card.id) {
                return Err(SetupError::DuplicateCard(card.id));
            }
        }
        let counts = self.player.iter().chain(&self.cpu).counts_by(|c| c.rank);
        if let Some((&rank, &count)) = counts
            .iter()
            .sorted()
            .find(|(_, n)| **n != usize::from(COPIES))
        {
            return Err(SetupError::RankCount { rank, count });
        }
        Ok(())
    }

    /// Reads a deal from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, SetupError> {
        let reader = BufReader::new(File::open(path)?);
        let deal: Deal = serde_json::from_reader(reader)?;
        deal.validate()?;
        Ok(deal)
    }

    /// Writes the deal to a JSON file.
    pub fn to_json_file(&self, path: &Path) -> Result<(), SetupError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_random_is_valid() {
        let deal = Deal::from_rng(&mut rand::thread_rng());
        assert_eq!(deal.player.len(), HAND_SIZE);
        assert_eq!(deal.cpu.len(), HAND_SIZE);
        deal.validate().unwrap();
    }

    #[test]
    fn test_seeded() {
        let a = Deal::from_rng(&mut StdRng::seed_from_u64(7));
        let b = Deal::from_rng(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_incomplete() {
        let deck: Deck = Deck::default().into_iter().skip(1).collect();
        assert_matches!(Deal::new(deck), Err(SetupError::IncompleteDeck(39)));
    }

    #[test]
    fn test_invalid() {
        let mut deal = Deal::new(Deck::default()).unwrap();
        let card = deal.cpu.pop().unwrap();
        deal.player.push(card);
        assert_matches!(deal.validate(), Err(SetupError::UnevenDeal { .. }));

        let mut deal = Deal::new(Deck::default()).unwrap();
        deal.cpu[0] = deal.player[0];
        assert_matches!(deal.validate(), Err(SetupError::DuplicateCard(_)));

        let mut deal = Deal::new(Deck::default()).unwrap();
        deal.cpu[19].rank = deal.player[0].rank;
        assert_matches!(deal.validate(), Err(SetupError::RankCount { .. }));
    }
}
