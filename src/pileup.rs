//! The game of pileup.
//!
//! Two sides take turns flipping cards from their decks onto a shared pile. A card ranked three or
//! lower forces the other side to answer with that many cards; if the answer contains no special
//! card, the pile goes to whoever set the obligation. The human player may claim the pile at any
//! time by spotting a [`Pattern`] on top of it, but pays a card for every false claim. The first
//! side to run out of cards loses.

use std::fmt::Display;
use std::num::NonZeroU8;
use std::path::PathBuf;
use std::time::Instant;

use log::info;

mod card;
mod config;
mod console;
mod deal;
mod error;
mod machine;
mod pattern;
mod pile;
mod scheduler;
mod session;
mod simulate;
mod turn;
#[cfg(feature = "tui")]
mod tui;
use self::card::{Card, CardId, Deck, Rank, Side, COPIES, DECK_SIZE};
pub use self::config::Config;
use self::deal::Deal;
use self::error::{ConfigError, SetupError};
use self::machine::{Claim, Machine};
use self::pattern::Pattern;
use self::pile::Pile;
use self::scheduler::{Scheduler, Task, TaskId};
use self::session::{Session, Snapshot};
use self::turn::{Suspended, TurnState};

use self::console::Console;
pub use self::console::cli_main;
pub use self::simulate::simulate_main;
#[cfg(feature = "tui")]
pub use self::tui::tui_main;

/// Where the front ends save the current deal on request.
const SAVE_PATH: &str = "pileup.json";

/// Why a pile changed hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectReason {
    /// The side answering an obligation failed to play a special card in time.
    Obligation,
    /// The player spotted a pattern.
    Claim(Pattern),
}

/// An event that occurs during the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A side played a card onto the pile.
    Played { side: Side, card: Card },
    /// A special card obliges `to_play` to answer with `flips` cards.
    Obligation { to_play: Side, flips: NonZeroU8 },
    /// An obligation failed, and the pile will go to the beneficiary.
    Collecting { beneficiary: Side },
    /// The pile was added to a side's deck.
    Collected {
        side: Side,
        cards: usize,
        reason: CollectReason,
    },
    /// The player claimed the pile.
    Claimed(Pattern),
    /// The player claimed the pile, but there was no pattern.
    FalseClaim,
    /// A card was paid for a false claim.
    Penalty { from: Side, to: Side, card: Card },
    /// The side that made a false claim had no card to pay.
    PenaltySkipped(Side),
    /// Play was suspended.
    Paused,
    /// Play was resumed.
    Resumed,
    /// The game is over.
    GameOver { winner: Side },
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::Played { side, card } => write!(f, "{side} played {card}"),
            Event::Obligation { to_play, flips } => {
                write!(f, "{to_play} must answer within {flips}")
            }
            Event::Collecting { beneficiary } => write!(f, "{beneficiary} will take the pile"),
            Event::Collected {
                side,
                cards,
                reason: CollectReason::Obligation,
            } => write!(f, "{side} took {cards} cards"),
            Event::Collected {
                side,
                cards,
                reason: CollectReason::Claim(pattern),
            } => write!(f, "{side} took {cards} cards with {pattern}"),
            Event::Claimed(pattern) => write!(f, "Claimed {pattern}"),
            Event::FalseClaim => f.write_str("No match!"),
            Event::Penalty { from, to, card } => write!(f, "{from} paid {card} to {to}"),
            Event::PenaltySkipped(side) => write!(f, "{side} had no card to pay"),
            Event::Paused => f.write_str("Paused"),
            Event::Resumed => f.write_str("Resumed"),
            Event::GameOver { winner } => write!(f, "{winner} won the game"),
        }
    }
}

/// How a front end sets up its session.
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub config: Config,
    /// Play this deal instead of shuffling.
    pub deal_path: Option<PathBuf>,
    /// Save the first deal to this file.
    pub save_deal_path: Option<PathBuf>,
}

impl Options {
    /// Loads the configured deal, if there is one.
    fn load_deal(&self) -> anyhow::Result<Option<Deal>> {
        let Some(path) = &self.deal_path else {
            return Ok(None);
        };
        info!("loading deal from {}", path.display());
        Ok(Some(Deal::from_json_file(path)?))
    }

    fn save_deal(&self, deal: &Deal) -> anyhow::Result<()> {
        if let Some(path) = &self.save_deal_path {
            info!("saving deal to {}", path.display());
            deal.to_json_file(path)?;
        }
        Ok(())
    }

    /// Loads or shuffles the deal for a game without timers.
    fn first_deal(&self) -> anyhow::Result<Deal> {
        let deal = match self.load_deal()? {
            Some(deal) => deal,
            None => Deal::from_rng(&mut self.config.rng()),
        };
        self.save_deal(&deal)?;
        Ok(deal)
    }

    /// Starts a session with the configured deal, or a shuffled one.
    fn open_session(&self, now: Instant) -> anyhow::Result<Session> {
        let config = self.config.clone();
        let session = match self.load_deal()? {
            Some(deal) => Session::with_deal(config, deal, now)?,
            None => Session::new(config, now)?,
        };
        self.save_deal(session.deal())?;
        Ok(session)
    }
}
