//! Line-oriented console interface.

use std::io::{self, BufRead};
use std::path::Path;
use std::str::FromStr;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Instant;

use ansi_term::{ANSIString, ANSIStrings};
use log::debug;

use super::{Card, Claim, Event, Options, Session, Side, SAVE_PATH};

const HELP: &str = "\
Commands:
  <enter>  claim the pile
  p        pause or resume
  n        new game
  s        save the deal
  ?        show the table
  q        quit";

/// A command typed at the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Claim,
    Pause,
    NewGame,
    Save,
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "t" | "tap" => Ok(Command::Claim),
            "p" | "pause" => Ok(Command::Pause),
            "n" | "new" => Ok(Command::NewGame),
            "s" | "save" => Ok(Command::Save),
            "?" => Ok(Command::Status),
            "h" | "help" => Ok(Command::Help),
            "q" | "quit" => Ok(Command::Quit),
            _ => Err(()),
        }
    }
}

/// Prints game events to standard output.
pub struct Console {
    color: bool,
}
impl Default for Console {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Console {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn format(&self, s: &ANSIStrings) -> String {
        if self.color {
            s.to_string()
        } else {
            ansi_term::unstyle(s)
        }
    }

    fn format_card(&self, card: Card) -> String {
        self.format(&ANSIStrings(&[card.to_ansi_string()]))
    }

    fn format_cards<'a>(&self, cards: impl Iterator<Item = &'a Card>) -> String {
        let mut parts: Vec<ANSIString> = vec!["[".into()];
        for (i, card) in cards.enumerate() {
            if i != 0 {
                parts.push(", ".into());
            }
            parts.push(card.to_ansi_string());
        }
        parts.push("]".into());
        self.format(&ANSIStrings(&parts))
    }

    pub fn notify(&self, event: &Event) {
        match event {
            Event::Played { side, card } => println!("{side}: {}", self.format_card(*card)),
            Event::Penalty { from, to, card } => {
                println!("{from} paid {} to {to}", self.format_card(*card));
            }
            Event::GameOver { winner: Side::Player } => println!("You win!"),
            Event::GameOver { winner: Side::Cpu } => println!("CPU wins!"),
            _ => println!("{event}"),
        }
    }

    /// Prints the card counts, the top of the pile, and whose turn it is.
    fn print_status(&self, session: &Session) {
        let pile = session.pile();
        let top = pile.tail(3).iter().map(|e| &e.card);
        println!(
            "You: {}  CPU: {}  Pile: {} ({} cards)  {}",
            session.deck(Side::Player).len(),
            session.deck(Side::Cpu).len(),
            self.format_cards(top),
            pile.len(),
            session.state()
        );
    }

    fn execute(&self, session: &mut Session, command: Command, now: Instant) {
        match command {
            Command::Claim => {
                if session.claim(now) == Claim::Ignored {
                    println!("Nothing to claim right now");
                }
            }
            Command::Pause => {
                if !session.toggle_pause(now) {
                    println!("Nothing to pause");
                }
            }
            Command::NewGame => {
                session.new_game(now);
            }
            Command::Save => match session.deal().to_json_file(Path::new(SAVE_PATH)) {
                Ok(()) => println!("Wrote to {SAVE_PATH}"),
                Err(e) => println!("Failed to write {SAVE_PATH}: {e}"),
            },
            Command::Status => self.print_status(session),
            Command::Help => println!("{HELP}"),
            Command::Quit => (),
        }
    }
}

/// Reads lines from standard input on a separate thread, so that the game keeps running while the
/// player thinks.
fn spawn_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Waits for a line of input, giving up at the deadline. Returns `Err` once input is closed.
fn next_line(input: &Receiver<String>, deadline: Option<Instant>) -> Result<Option<String>, ()> {
    let Some(deadline) = deadline else {
        return input.recv().map(Some).map_err(|_| ());
    };
    match input.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(line) => Ok(Some(line)),
        Err(RecvTimeoutError::Timeout) => Ok(None),
        Err(RecvTimeoutError::Disconnected) => Err(()),
    }
}

/// Runs the game with a simple command-line interface.
pub fn cli_main(options: &Options) -> anyhow::Result<()> {
    let console = Console::default();
    let mut session = options.open_session(Instant::now())?;
    let input = spawn_reader();
    println!("{HELP}");
    loop {
        while let Some(event) = session.pop_event() {
            console.notify(&event);
        }
        let Ok(line) = next_line(&input, session.next_deadline()) else {
            debug!("input closed");
            break;
        };
        let now = Instant::now();
        if let Some(line) = line {
            match Command::from_str(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => console.execute(&mut session, command, now),
                Err(()) => println!("Invalid input, try again"),
            }
        }
        session.tick(now);
    }
    Ok(())
}
