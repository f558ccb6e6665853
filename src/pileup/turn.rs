//! Turn state.

use std::fmt::Display;
use std::num::NonZeroU8;

use super::Side;

/// The state of the turn. Exactly one is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnState {
    /// No obligation is pending.
    Normal { to_play: Side },
    /// A special card was played, and `to_play` must keep playing until the obligation resolves.
    Forced {
        to_play: Side,
        flips_remaining: NonZeroU8,
    },
    /// An obligation failed, and the pile is about to go to `beneficiary`.
    Collecting { beneficiary: Side },
    /// Play is suspended.
    Paused(Suspended),
    /// The game is over.
    GameOver { winner: Side },
}

impl Display for TurnState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnState::Normal { to_play } => write!(f, "{to_play} to play"),
            TurnState::Forced {
                to_play,
                flips_remaining,
            } => write!(f, "{to_play} to answer ({flips_remaining} left)"),
            TurnState::Collecting { beneficiary } => write!(f, "{beneficiary} collecting"),
            TurnState::Paused(_) => f.write_str("Paused"),
            TurnState::GameOver { winner } => write!(f, "{winner} won"),
        }
    }
}

impl TurnState {
    /// The side that plays the next card, if a card can be played.
    pub fn to_play(&self) -> Option<Side> {
        match self {
            TurnState::Normal { to_play } | TurnState::Forced { to_play, .. } => Some(*to_play),
            _ => None,
        }
    }

    /// Returns true if a card can be played, or the pile claimed.
    pub fn is_playable(&self) -> bool {
        self.to_play().is_some()
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, TurnState::Paused(_))
    }

    /// The winner, if the game is over.
    pub fn winner(&self) -> Option<Side> {
        match self {
            TurnState::GameOver { winner } => Some(*winner),
            _ => None,
        }
    }
}

/// A suspended turn state.
///
/// Only a [`TurnState::Normal`], [`TurnState::Forced`] or [`TurnState::Collecting`] state can be
/// suspended, so a pause never wraps another pause or a finished game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suspended(Box<TurnState>);

impl Suspended {
    /// Suspends `state`, or returns `None` if it cannot be suspended.
    pub fn new(state: TurnState) -> Option<Self> {
        match state {
            TurnState::Paused(_) | TurnState::GameOver { .. } => None,
            state => Some(Self(Box::new(state))),
        }
    }

    /// The state in effect when play was suspended.
    pub fn state(&self) -> &TurnState {
        &self.0
    }

    /// Consumes the suspension, returning the state to resume.
    pub fn resume(self) -> TurnState {
        *self.0
    }
}
