//! Session management.
//!
//! A [`Session`] owns the [`Machine`] for the current game, along with the [`Scheduler`] that
//! drives it. The front end feeds it the current time via [`tick`](`Session::tick`), and forwards
//! the player's input. Both happen on the same thread, so no locking is needed; the only care
//! required is that timers belonging to a finished game never touch its replacement, which is why
//! every game starts by cancelling every timer.

use std::time::Instant;

use delegate::delegate;
use log::{debug, info, trace};
use rand::rngs::StdRng;

use super::{
    Claim, Config, Deal, Deck, Event, Machine, Pile, Rank, Scheduler, SetupError, Side, Task,
    TaskId, TurnState,
};

#[cfg(test)]
mod test;

/// Shown while a false claim is waiting on its penalty.
const FALSE_CLAIM_MESSAGE: &str = "NO MATCH!";

/// A read-only view of the session, for presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub player_cards: usize,
    pub cpu_cards: usize,
    /// The pile, oldest card first.
    pub pile: Vec<(Rank, Side)>,
    pub state: TurnState,
    /// A transient message, such as the name of a claimed pattern.
    pub message: Option<String>,
    pub game_over: bool,
    pub winner: Option<Side>,
}

/// A game in progress, and the timers that drive it.
#[derive(Debug)]
pub struct Session {
    config: Config,
    rng: StdRng,
    /// How the current game was dealt.
    deal: Deal,
    machine: Machine,
    scheduler: Scheduler,
    message: Option<String>,
    collect_task: Option<TaskId>,
    penalty_task: Option<TaskId>,
    message_task: Option<TaskId>,
}

impl Session {
    /// Creates a session, and starts a game with a freshly shuffled deck.
    pub fn new(config: Config, now: Instant) -> Result<Self, SetupError> {
        config.validate()?;
        let mut rng = config.rng();
        let deal = Deal::from_rng(&mut rng);
        Ok(Self::build(config, rng, deal, now))
    }

    /// Creates a session, and starts a game with the specified deal.
    pub fn with_deal(config: Config, deal: Deal, now: Instant) -> Result<Self, SetupError> {
        config.validate()?;
        deal.validate()?;
        let rng = config.rng();
        Ok(Self::build(config, rng, deal, now))
    }

    fn build(config: Config, rng: StdRng, deal: Deal, now: Instant) -> Self {
        let mut session = Self {
            scheduler: Scheduler::new(config.autoplay_interval()),
            machine: Machine::from(deal.clone()),
            deal: deal.clone(),
            config,
            rng,
            message: None,
            collect_task: None,
            penalty_task: None,
            message_task: None,
        };
        session.start(deal, now);
        session
    }

    delegate! {
        to self.machine {
            /// The current turn state.
            pub fn state(&self) -> &TurnState;
            /// The shared pile.
            pub fn pile(&self) -> &Pile;
            /// The deck held by the specified side.
            pub fn deck(&self, side: Side) -> &Deck;
            /// Pops the oldest event from the queue of events.
            pub fn pop_event(&mut self) -> Option<Event>;
        }
        to self.scheduler {
            /// The next time at which [`tick`](`Session::tick`) has work to do.
            pub fn next_deadline(&self) -> Option<Instant>;
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// How the current game was dealt.
    pub fn deal(&self) -> &Deal {
        &self.deal
    }

    /// The transient message, if one is showing.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Shuffles, deals, and starts a new game. Anything pending from the old game is cancelled.
    pub fn new_game(&mut self, now: Instant) -> Deal {
        let deal = Deal::from_rng(&mut self.rng);
        self.start(deal.clone(), now);
        deal
    }

    /// Starts a new game with the specified deal.
    pub fn new_game_with(&mut self, deal: Deal, now: Instant) -> Result<(), SetupError> {
        deal.validate()?;
        self.start(deal, now);
        Ok(())
    }

    fn start(&mut self, deal: Deal, now: Instant) {
        self.cancel_timers();
        self.message = None;
        self.machine = Machine::from(deal.clone());
        self.deal = deal;
        self.scheduler.start(now);
        info!("new game");
    }

    /// Stops autoplay, and cancels every delayed task.
    fn cancel_timers(&mut self) {
        self.scheduler.cancel_all();
        self.collect_task = None;
        self.penalty_task = None;
        self.message_task = None;
    }

    /// Runs every task that is due at `now`. Returns true if anything happened.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        while let Some(task) = self.scheduler.pop_due(now) {
            changed |= self.run(task, now);
        }
        changed
    }

    fn run(&mut self, task: Task, now: Instant) -> bool {
        match task {
            Task::AutoPlay => self.autoplay(now),
            Task::FinishCollect => {
                self.collect_task = None;
                self.machine.finish_collection()
            }
            Task::ApplyPenalty { claimant } => {
                self.penalty_task = None;
                self.machine.penalize(claimant);
                self.message = None;
                self.restart_autoplay(now);
                true
            }
            Task::ClearMessage => {
                self.message_task = None;
                self.message = None;
                self.restart_autoplay(now);
                true
            }
        }
    }

    fn autoplay(&mut self, now: Instant) -> bool {
        if !self.machine.state().is_playable() {
            trace!("autoplay tick skipped in state {}", self.machine.state());
            return false;
        }
        self.machine.advance();
        if let Some(winner) = self.machine.state().winner() {
            info!("game over, {winner} won");
            self.cancel_timers();
        } else if matches!(self.machine.state(), TurnState::Collecting { .. }) {
            self.arm_collect(now);
        }
        true
    }

    fn arm_collect(&mut self, now: Instant) {
        let delay = self.config.collect_delay();
        debug!("collecting in {delay:?}");
        self.collect_task = Some(self.scheduler.schedule(now, delay, Task::FinishCollect));
    }

    fn restart_autoplay(&mut self, now: Instant) {
        if self.machine.state().winner().is_none() && self.penalty_task.is_none() {
            self.scheduler.start(now);
        }
    }

    /// The player taps the pile.
    ///
    /// Ignored while a previous false claim is awaiting its penalty, and whenever the machine
    /// isn't accepting claims. Autoplay stops until the outcome has been displayed.
    pub fn claim(&mut self, now: Instant) -> Claim {
        if self.penalty_task.is_some() {
            trace!("claim ignored, penalty pending");
            return Claim::Ignored;
        }
        let claim = self.machine.claim(Side::Player);
        match claim {
            Claim::Matched(pattern) => {
                self.scheduler.stop();
                self.show_message(pattern.label(), now);
            }
            Claim::Missed => {
                self.scheduler.stop();
                if let Some(id) = self.message_task.take() {
                    self.scheduler.cancel(id);
                }
                self.message = Some(FALSE_CLAIM_MESSAGE.into());
                let delay = self.config.penalty_delay();
                let task = Task::ApplyPenalty {
                    claimant: Side::Player,
                };
                self.penalty_task = Some(self.scheduler.schedule(now, delay, task));
            }
            Claim::Ignored => (),
        }
        claim
    }

    fn show_message(&mut self, message: &str, now: Instant) {
        if let Some(id) = self.message_task.take() {
            self.scheduler.cancel(id);
        }
        self.message = Some(message.into());
        let delay = self.config.message_duration();
        self.message_task = Some(self.scheduler.schedule(now, delay, Task::ClearMessage));
    }

    /// Suspends play. A pending collection waits until play resumes.
    pub fn pause(&mut self) -> bool {
        if !self.machine.pause() {
            return false;
        }
        if let Some(id) = self.collect_task.take() {
            self.scheduler.cancel(id);
        }
        true
    }

    /// Resumes play.
    pub fn resume(&mut self, now: Instant) -> bool {
        if !self.machine.resume() {
            return false;
        }
        if matches!(self.machine.state(), TurnState::Collecting { .. }) {
            self.arm_collect(now);
        }
        true
    }

    /// Pauses a running game, or resumes a paused one.
    pub fn toggle_pause(&mut self, now: Instant) -> bool {
        if self.machine.state().is_paused() {
            self.resume(now)
        } else {
            self.pause()
        }
    }

    /// Takes a snapshot of the game, for presentation.
    pub fn snapshot(&self) -> Snapshot {
        let state = self.machine.state().clone();
        let winner = state.winner();
        Snapshot {
            player_cards: self.machine.deck(Side::Player).len(),
            cpu_cards: self.machine.deck(Side::Cpu).len(),
            pile: self
                .machine
                .pile()
                .entries()
                .iter()
                .map(|e| (e.card.rank, e.played_by))
                .collect(),
            state,
            message: self.message.clone(),
            game_over: winner.is_some(),
            winner,
        }
    }
}
