//! Cards and sides.

use std::convert::TryFrom;
use std::fmt::Display;

use ansi_term::ANSIString;
use serde::{Deserialize, Serialize};

use crate::deck;

/// The lowest card rank.
pub const MIN_RANK: u8 = 1;
/// The highest card rank.
pub const MAX_RANK: u8 = 10;
/// Cards at or below this rank open an obligation.
pub const SPECIAL_MAX: u8 = 3;
/// Copies of each rank in a full deck.
pub const COPIES: u8 = 4;
/// Size of a full deck.
pub const DECK_SIZE: usize = (MAX_RANK as usize) * (COPIES as usize);

/// Card rank, between 1 and 10 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rank(u8);

impl TryFrom<u8> for Rank {
    type Error = InvalidRank;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (MIN_RANK..=MAX_RANK).contains(&value) {
            Ok(Rank(value))
        } else {
            Err(InvalidRank(value))
        }
    }
}
impl From<Rank> for u8 {
    fn from(rank: Rank) -> Self {
        rank.0
    }
}
impl Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rank {0} is out of range")]
pub struct InvalidRank(pub u8);

impl Rank {
    /// Every rank, lowest first.
    pub fn all_ranks() -> impl Iterator<Item = Rank> {
        (MIN_RANK..=MAX_RANK).map(Rank)
    }

    /// The numeric value of the rank.
    pub fn value(self) -> u8 {
        self.0
    }

    /// Special cards force the opponent to respond.
    pub fn is_special(self) -> bool {
        self.0 <= SPECIAL_MAX
    }
}

/// Stable identity of a card. Only meaningful for display diffing.
pub type CardId = u8;

/// A card. Cards have no suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub rank: Rank,
    pub id: CardId,
}
impl Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.rank.fmt(f)
    }
}
impl Card {
    /// Creates a new [`Card`].
    pub fn new(rank: Rank, id: CardId) -> Self {
        Self { rank, id }
    }

    /// Returns a string representation of the card, decorated with ANSI color codes.
    pub fn to_ansi_string(self) -> ANSIString<'static> {
        use ansi_term::Colour::{Red, White};
        if self.rank.is_special() {
            Red.bold().paint(self.to_string())
        } else {
            White.paint(self.to_string())
        }
    }

    /// Returns a [`ratatui::text::Span`] for the card.
    #[cfg(feature = "tui")]
    pub fn to_span(self) -> ratatui::text::Span<'static> {
        use ratatui::style::{Color, Stylize};
        let span = ratatui::text::Span::raw(format!("[{:>2}]", self.rank));
        if self.rank.is_special() {
            span.fg(Color::Red).bold()
        } else {
            span
        }
    }
}

/// One of the two sides at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The human.
    Player,
    /// The automated opponent.
    Cpu,
}
impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Side::Player => "You",
            Side::Cpu => "CPU",
        })
    }
}
impl Side {
    /// The opposing side.
    pub fn other(self) -> Side {
        match self {
            Side::Player => Side::Cpu,
            Side::Cpu => Side::Player,
        }
    }
}

/// A deck of pileup cards.
pub type Deck = deck::Deck<Card>;
impl Default for Deck {
    fn default() -> Self {
        itertools::iproduct!(Rank::all_ranks(), 0..COPIES)
            .zip(0..)
            .map(|((rank, _), id)| Card { rank, id })
            .collect()
    }
}
