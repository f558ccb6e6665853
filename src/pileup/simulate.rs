//! Headless play, without timers or claims.

use log::{info, warn};

use super::{Console, Event, Machine, Options, Side, TurnState};

/// A game still running after this many plays is abandoned.
const MAX_PLAYS: usize = 100_000;

/// Plays the machine until the game is over, handing every event to `notify`. Returns the
/// winner and the number of cards played, or `None` if the game was abandoned.
fn play_out(machine: &mut Machine, mut notify: impl FnMut(Event)) -> Option<(Side, usize)> {
    let mut plays = 0;
    loop {
        if let Some(winner) = machine.state().winner() {
            return Some((winner, plays));
        }
        if plays == MAX_PLAYS {
            warn!("abandoned after {plays} plays");
            return None;
        }
        if let TurnState::Collecting { .. } = machine.state() {
            machine.finish_collection();
        } else if machine.advance().is_some() {
            plays += 1;
        }
        while let Some(event) = machine.pop_event() {
            notify(event);
        }
    }
}

/// Plays a single game as fast as possible, printing every event.
pub fn simulate_main(options: &Options) -> anyhow::Result<()> {
    let console = Console::default();
    let mut machine = Machine::from(options.first_deal()?);
    match play_out(&mut machine, |event| console.notify(&event)) {
        Some((winner, plays)) => {
            info!("{winner} won after {plays} plays");
            println!("{plays} cards played");
            Ok(())
        }
        None => Err(anyhow::anyhow!("no winner after {MAX_PLAYS} plays")),
    }
}
