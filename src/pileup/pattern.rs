//! Pile patterns that let the player claim the pile.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::pile::Entry;
use super::Rank;

/// A recognized arrangement of the cards on top of the pile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pattern {
    /// The last two cards are different ranks that sum to ten.
    Ten,
    /// The last two cards have the same rank.
    Twin,
    /// The last card matches the card two below it.
    Sandwich,
}
impl Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
impl Pattern {
    /// The label shown when the pattern is claimed.
    pub fn label(self) -> &'static str {
        match self {
            Pattern::Ten => "THE TEN!",
            Pattern::Twin => "THE TWIN!",
            Pattern::Sandwich => "THE SANDWICH!",
        }
    }
}

/// Finds the pattern formed by the trailing ranks, oldest first.
///
/// Rules are checked in priority order: ten, then twin, then sandwich. The first match wins, so
/// `[5, 5, 5]` is a twin even though it is also a sandwich. A pair of fives is reported as a twin
/// rather than a ten.
pub fn evaluate_ranks(ranks: &[Rank]) -> Option<Pattern> {
    let (last, prev) = match ranks {
        [.., prev, last] => (last.value(), prev.value()),
        _ => return None,
    };
    if last != prev && last + prev == 10 {
        return Some(Pattern::Ten);
    }
    if last == prev {
        return Some(Pattern::Twin);
    }
    match ranks {
        [.., third, _, last] if third == last => Some(Pattern::Sandwich),
        _ => None,
    }
}

/// Finds the pattern formed by the top of the pile.
pub fn evaluate(entries: &[Entry]) -> Option<Pattern> {
    let idx = entries.len().saturating_sub(3);
    let ranks: Vec<Rank> = entries[idx..].iter().map(|e| e.card.rank).collect();
    evaluate_ranks(&ranks)
}
