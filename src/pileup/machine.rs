//! The turn state machine.

use std::collections::VecDeque;
use std::num::NonZeroU8;

use log::{debug, trace, warn};

use super::pattern::{self, Pattern};
use super::{Card, CollectReason, Deal, Deck, Event, Pile, Rank, Side, Suspended, TurnState};


/// The outcome of a claim on the pile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// Claims are only heard while cards are being played.
    Ignored,
    /// The pile formed a pattern, and now belongs to the claimant.
    Matched(Pattern),
    /// The pile did not form a pattern. The claimant owes a penalty.
    Missed,
}

/// The rules engine for a single game.
///
/// Play starts in [`TurnState::Normal`] with the player to move, and advances one card at a time
/// via [`advance`](`Machine::advance`). Playing a special card (rank three or lower) forces the
/// opponent to answer with that many cards. If the opponent plays another special card in the
/// course of answering, the obligation is reset against the other side. If the opponent answers
/// with enough normal cards, the obligation fails: the machine enters [`TurnState::Collecting`],
/// and the pile goes to the side that set the obligation when the caller invokes
/// [`finish_collection`](`Machine::finish_collection`).
///
/// At any point during play, a side may [`claim`](`Machine::claim`) the pile. A claim succeeds if
/// the top of the pile forms a [`Pattern`]; otherwise the claimant owes a card to the opponent,
/// paid via [`penalize`](`Machine::penalize`).
///
/// A side with an empty deck loses the game. Decks are checked before every card is played.
///
/// Operations that are invalid in the current state are no-ops.
#[derive(Debug)]
pub struct Machine {
    player: Deck,
    cpu: Deck,
    pile: Pile,
    state: TurnState,
    events: VecDeque<Event>,
    /// Number of cards in play, fixed for the life of the machine.
    total: usize,
}

impl From<Deal> for Machine {
    fn from(deal: Deal) -> Self {
        let player: Deck = deal.player.into_iter().collect();
        let cpu: Deck = deal.cpu.into_iter().collect();
        let total = player.len() + cpu.len();
        Self {
            player,
            cpu,
            pile: Pile::default(),
            state: TurnState::Normal {
                to_play: Side::Player,
            },
            events: VecDeque::new(),
            total,
        }
    }
}

/// The obligation opened by playing a card of this rank, if any.
fn obligation(rank: Rank) -> Option<NonZeroU8> {
    if rank.is_special() {
        NonZeroU8::new(rank.value())
    } else {
        None
    }
}

impl Machine {
    /// The current turn state.
    pub fn state(&self) -> &TurnState {
        &self.state
    }

    /// The deck held by the specified side.
    pub fn deck(&self, side: Side) -> &Deck {
        match side {
            Side::Player => &self.player,
            Side::Cpu => &self.cpu,
        }
    }

    fn deck_mut(&mut self, side: Side) -> &mut Deck {
        match side {
            Side::Player => &mut self.player,
            Side::Cpu => &mut self.cpu,
        }
    }

    /// The shared pile.
    pub fn pile(&self) -> &Pile {
        &self.pile
    }

    /// Pops the oldest event from the queue of events.
    pub fn pop_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }

    /// The total number of cards across both decks and the pile.
    pub fn card_count(&self) -> usize {
        self.player.len() + self.cpu.len() + self.pile.len()
    }

    fn check_conservation(&self) {
        debug_assert_eq!(self.card_count(), self.total, "cards must be conserved");
    }

    fn set_state(&mut self, state: TurnState) {
        debug!("{} -> {}", self.state, state);
        self.state = state;
    }

    /// Ends the game if either side is out of cards, returning the winner.
    fn check_elimination(&mut self, to_play: Side) -> Option<Side> {
        let loser = match (self.player.is_empty(), self.cpu.is_empty()) {
            (false, false) => return None,
            (true, false) => Side::Player,
            (false, true) => Side::Cpu,
            (true, true) => {
                warn!("both decks are empty, {to_play} was about to play");
                debug_assert_eq!(self.total, 0, "decks drained together with cards in play");
                to_play
            }
        };
        let winner = loser.other();
        self.set_state(TurnState::GameOver { winner });
        self.events.push_back(Event::GameOver { winner });
        Some(winner)
    }

    /// Plays the next card, and returns it.
    ///
    /// Does nothing unless the state is [`TurnState::Normal`] or [`TurnState::Forced`]. Returns
    /// `None` without playing if the game was over, or has just ended because a deck ran out.
    pub fn advance(&mut self) -> Option<Card> {
        let Some(acting) = self.state.to_play() else {
            trace!("advance ignored in state {}", self.state);
            return None;
        };
        if self.check_elimination(acting).is_some() {
            return None;
        }
        let card = self
            .deck_mut(acting)
            .draw()
            .expect("decks are checked before drawing");
        self.pile.append(card, acting);
        self.events.push_back(Event::Played { side: acting, card });

        let next = match (&self.state, obligation(card.rank)) {
            (_, Some(flips)) => {
                let to_play = acting.other();
                self.events.push_back(Event::Obligation { to_play, flips });
                TurnState::Forced {
                    to_play,
                    flips_remaining: flips,
                }
            }
            (
                TurnState::Forced {
                    to_play,
                    flips_remaining,
                },
                None,
            ) => match NonZeroU8::new(flips_remaining.get() - 1) {
                Some(flips_remaining) => TurnState::Forced {
                    to_play: *to_play,
                    flips_remaining,
                },
                None => {
                    let beneficiary = to_play.other();
                    self.events.push_back(Event::Collecting { beneficiary });
                    TurnState::Collecting { beneficiary }
                }
            },
            (_, None) => TurnState::Normal {
                to_play: acting.other(),
            },
        };
        self.set_state(next);
        self.check_conservation();
        Some(card)
    }

    /// Transfers the pile to the beneficiary of a failed obligation, who plays next.
    ///
    /// Does nothing unless the state is [`TurnState::Collecting`]. Returns true if the pile was
    /// transferred.
    pub fn finish_collection(&mut self) -> bool {
        let TurnState::Collecting { beneficiary } = self.state else {
            trace!("finish_collection ignored in state {}", self.state);
            return false;
        };
        self.collect(beneficiary, CollectReason::Obligation);
        self.set_state(TurnState::Normal {
            to_play: beneficiary,
        });
        true
    }

    fn collect(&mut self, side: Side, reason: CollectReason) {
        let mut pile = std::mem::take(&mut self.pile);
        let cards = pile.collect_into(self.deck_mut(side));
        debug!("{side} collects {cards} cards ({reason:?})");
        self.events.push_back(Event::Collected {
            side,
            cards,
            reason,
        });
        self.check_conservation();
    }

    /// Claims the pile on behalf of `claimant`.
    ///
    /// Claims are heard only in [`TurnState::Normal`] or [`TurnState::Forced`]. A successful
    /// claim moves the pile to the claimant, who plays next. A missed claim leaves the state
    /// unchanged; the caller is expected to follow up with [`penalize`](`Machine::penalize`).
    pub fn claim(&mut self, claimant: Side) -> Claim {
        if !self.state.is_playable() {
            trace!("claim ignored in state {}", self.state);
            return Claim::Ignored;
        }
        match pattern::evaluate(self.pile.entries()) {
            Some(pattern) => {
                self.events.push_back(Event::Claimed(pattern));
                self.collect(claimant, CollectReason::Claim(pattern));
                self.set_state(TurnState::Normal { to_play: claimant });
                Claim::Matched(pattern)
            }
            None => {
                debug!("{claimant} made a false claim");
                self.events.push_back(Event::FalseClaim);
                Claim::Missed
            }
        }
    }

    /// Moves one card from the claimant's deck to the opponent's, as the price of a false claim.
    ///
    /// Skipped if the claimant has no cards, or the game is over. The turn state is untouched.
    pub fn penalize(&mut self, claimant: Side) -> Option<Card> {
        if self.state.winner().is_some() {
            trace!("penalty ignored in state {}", self.state);
            return None;
        }
        let to = claimant.other();
        match self.deck_mut(claimant).draw() {
            Ok(card) => {
                self.deck_mut(to).push(card);
                debug!("{claimant} pays {card} to {to}");
                self.events.push_back(Event::Penalty {
                    from: claimant,
                    to,
                    card,
                });
                self.check_conservation();
                Some(card)
            }
            Err(err) => {
                debug!("penalty skipped: {err}");
                self.events.push_back(Event::PenaltySkipped(claimant));
                None
            }
        }
    }

    /// Suspends play. Returns false if the game is already paused or over.
    pub fn pause(&mut self) -> bool {
        match Suspended::new(self.state.clone()) {
            Some(suspended) => {
                self.set_state(TurnState::Paused(suspended));
                self.events.push_back(Event::Paused);
                true
            }
            None => false,
        }
    }

    /// Resumes play in the state that was suspended. Returns false if the game wasn't paused.
    pub fn resume(&mut self) -> bool {
        let TurnState::Paused(suspended) = &self.state else {
            return false;
        };
        let state = suspended.clone().resume();
        self.set_state(state);
        self.events.push_back(Event::Resumed);
        true
    }
}
