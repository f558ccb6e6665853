//! Rich terminal UI.

use std::io::{self, stdout, Stdout};
use std::path::Path;
use std::time::{Duration, Instant};

use log::debug;
use ratatui::crossterm::event::{KeyCode, KeyEventKind};
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::crossterm::{event, ExecutableCommand};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

mod board;
mod history;
use self::board::Board;
use self::history::History;

use super::{Claim, Options, Session, SAVE_PATH};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// How long to wait for a key press while no timer is pending.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Initializes the terminal for the TUI.
pub fn tui_init() -> io::Result<Term> {
    stdout().execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;
    Ok(terminal)
}

/// Restores the original terminal mode.
pub fn tui_restore() -> io::Result<()> {
    stdout().execute(LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// Helper struct to keep track of UI areas in the layout.
struct Areas {
    board: Rect,
    message: Rect,
    help: Rect,
    history: Rect,
}
impl Areas {
    /// Performs layout math to figure out the render areas.
    fn new(frame: &Frame) -> Self {
        let [game, history] = Layout::new(
            Direction::Horizontal,
            [Constraint::Length(32), Constraint::Min(20)],
        )
        .areas(frame.area());
        let [board, message, help] = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(9), // board
                Constraint::Length(3), // messages
                Constraint::Min(1),    // key help
            ],
        )
        .areas(game);
        Self {
            board,
            message,
            help,
            history,
        }
    }
}

const HELP: &str = "space: claim  p: pause  n: new  s: save  q: quit";

/// Terminal UI state.
pub struct Tui {
    /// The game being played.
    session: Session,
    /// Everything that happened in the current game.
    history: History,
    /// An error message to display to the user.
    error: Option<String>,
    /// A debug message to display to the user.
    debug: Option<String>,
    /// Set to true to exit the main loop.
    exit: bool,
}

impl From<Session> for Tui {
    fn from(session: Session) -> Self {
        Self {
            session,
            history: History::default(),
            error: None,
            debug: None,
            exit: false,
        }
    }
}

impl Tui {
    /// Runs the terminal UI until the user exits.
    pub fn run(mut self, mut terminal: Term) -> anyhow::Result<()> {
        while !self.exit {
            self.drain_events();
            terminal.draw(|frame| self.render_frame(frame))?;
            self.handle_events()?;
            self.session.tick(Instant::now());
        }
        Ok(())
    }

    /// Moves pending game events into the history pane.
    fn drain_events(&mut self) {
        while let Some(event) = self.session.pop_event() {
            self.history.push(event);
        }
    }

    // Top-level frame renderer.
    fn render_frame(&mut self, frame: &mut Frame) {
        let areas = Areas::new(frame);
        let snapshot = self.session.snapshot();
        let top = self.session.pile().tail(3);
        frame.render_widget(Board::new(&snapshot, top), areas.board);
        frame.render_widget(&self.history, areas.history);

        let mut lines = vec![];
        if let Some(message) = snapshot.message {
            lines.push(Line::from(message).yellow().bold().centered());
        }
        if let Some(error) = self.error.clone() {
            lines.push(Line::from(error).red().bold());
        }
        if let Some(debug) = self.debug.clone() {
            lines.push(Line::from(debug).blue().bold());
        }
        frame.render_widget(Paragraph::new(lines), areas.message);
        frame.render_widget(Paragraph::new(HELP).dim(), areas.help);
    }

    /// Top-level event handler. Waits for a key press until the next timer is due.
    fn handle_events(&mut self) -> io::Result<()> {
        let timeout = self
            .session
            .next_deadline()
            .map_or(IDLE_POLL, |d| d.saturating_duration_since(Instant::now()));
        if !event::poll(timeout)? {
            return Ok(());
        }
        let event::Event::Key(key) = event::read()? else {
            return Ok(());
        };
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        // Output messages only persist until the next key press.
        self.error = None;
        self.debug = None;

        let now = Instant::now();
        match key.code {
            KeyCode::Char('q') => self.exit = true,
            KeyCode::Enter | KeyCode::Char(' ') => self.claim(now),
            KeyCode::Char('p') => {
                if !self.session.toggle_pause(now) {
                    self.debug = Some("Nothing to pause".into());
                }
            }
            KeyCode::Char('n') => self.new_game(now),
            KeyCode::Char('s') => self.save_deal(),
            _ => (),
        }
        Ok(())
    }

    fn claim(&mut self, now: Instant) {
        if self.session.claim(now) == Claim::Ignored {
            debug!("claim ignored in state {}", self.session.state());
        }
    }

    fn new_game(&mut self, now: Instant) {
        self.session.new_game(now);
        self.history.clear();
    }

    /// Saves the current deal to a file.
    fn save_deal(&mut self) {
        match self.session.deal().to_json_file(Path::new(SAVE_PATH)) {
            Ok(()) => self.debug = Some(format!("Wrote to {SAVE_PATH}")),
            Err(e) => self.error = Some(format!("Failed to write {SAVE_PATH}: {e}")),
        }
    }
}

/// Runs the game in a rich terminal UI.
pub fn tui_main(options: &Options) -> anyhow::Result<()> {
    let tui = Tui::from(options.open_session(Instant::now())?);
    let terminal = tui_init()?;
    let result = tui.run(terminal);
    tui_restore()?;
    result
}
