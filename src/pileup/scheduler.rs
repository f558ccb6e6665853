//! Timers for automatic play and delayed effects.
//!
//! The scheduler never looks at the clock itself. The caller passes in the current [`Instant`],
//! runs whatever [`pop_due`](`Scheduler::pop_due`) hands back, and sleeps until
//! [`next_deadline`](`Scheduler::next_deadline`). All effects therefore run on the caller's
//! context, one at a time.

use std::time::{Duration, Instant};

use log::trace;

use super::Side;

pub type TaskId = u64;

/// Shorter autoplay intervals are rounded up to this.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Work for the session to perform when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// The periodic autoplay tick.
    AutoPlay,
    /// Hand the pile to the beneficiary of a failed obligation.
    FinishCollect,
    /// Charge the claimant for a false claim.
    ApplyPenalty { claimant: Side },
    /// Hide the claim label, and restart autoplay.
    ClearMessage,
}

#[derive(Debug, Clone)]
struct Pending {
    id: TaskId,
    due: Instant,
    task: Task,
}

/// A periodic autoplay timer, plus a queue of one-shot delayed tasks.
#[derive(Debug)]
pub struct Scheduler {
    interval: Duration,
    /// The next autoplay tick, if autoplay is running.
    next_tick: Option<Instant>,
    /// Delayed tasks, ordered by deadline. Tasks with equal deadlines run in the order scheduled.
    pending: Vec<Pending>,
    next_id: TaskId,
}

impl Scheduler {
    /// Creates a stopped scheduler with the specified autoplay interval.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            next_tick: None,
            pending: vec![],
            next_id: 0,
        }
    }

    /// Starts autoplay. The first tick fires one interval from `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_tick = Some(now + self.interval);
    }

    /// Stops autoplay. Delayed tasks are unaffected.
    pub fn stop(&mut self) {
        self.next_tick = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Schedules `task` to run `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration, task: Task) -> TaskId {
        let id = self.next_id;
        self.next_id += 1;
        let due = now + delay;
        let idx = self.pending.partition_point(|p| p.due <= due);
        trace!("scheduled {task:?} as #{id}");
        self.pending.insert(idx, Pending { id, due, task });
        id
    }

    /// Cancels a delayed task. Returns false if it already ran, or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Stops autoplay and cancels every delayed task.
    pub fn cancel_all(&mut self) {
        self.stop();
        self.pending.clear();
    }

    /// Returns true if a matching task is waiting to run.
    pub fn has_pending(&self, task: Task) -> bool {
        self.pending.iter().any(|p| p.task == task)
    }

    /// The earliest time at which something is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        let delayed = self.pending.first().map(|p| p.due);
        match (self.next_tick, delayed) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Removes and returns the earliest task that is due at `now`.
    ///
    /// A delayed task due at the same instant as an autoplay tick runs first. An autoplay tick
    /// that is late by several intervals fires once; the next tick is scheduled on the first
    /// interval boundary after `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<Task> {
        let tick = self.next_tick.filter(|&t| t <= now);
        let delayed = self.pending.first().map(|p| p.due).filter(|&d| d <= now);
        match (tick, delayed) {
            (Some(t), Some(d)) if d <= t => Some(self.pending.remove(0).task),
            (Some(t), _) => {
                let behind = now.duration_since(t).as_nanos() / self.interval.as_nanos();
                let skip = u32::try_from(behind + 1).unwrap_or(u32::MAX);
                self.next_tick = Some(t + self.interval * skip);
                Some(Task::AutoPlay)
            }
            (None, Some(_)) => Some(self.pending.remove(0).task),
            (None, None) => None,
        }
    }
}
