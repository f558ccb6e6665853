//! Widget for the table: both decks and the top of the pile

use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::pileup::pile::Entry;
use crate::pileup::{Side, Snapshot, TurnState};

pub struct Board<'a> {
    snapshot: &'a Snapshot,
    top: &'a [Entry],
}

impl<'a> Board<'a> {
    pub fn new(snapshot: &'a Snapshot, top: &'a [Entry]) -> Self {
        Self { snapshot, top }
    }

    fn deck_line(&self, side: Side) -> Line<'static> {
        let cards = match side {
            Side::Player => self.snapshot.player_cards,
            Side::Cpu => self.snapshot.cpu_cards,
        };
        let line = Line::from(format!("{side}: {cards} cards"));
        if self.snapshot.state.to_play() == Some(side) {
            line.bold().centered()
        } else {
            line.centered()
        }
    }

    fn pile_line(&self) -> Line<'static> {
        if self.top.is_empty() {
            return Line::from("(empty)").dim().centered();
        }
        let mut spans = vec![];
        for (i, entry) in self.top.iter().enumerate() {
            if i != 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(entry.card.to_span());
        }
        Line::from(spans).centered()
    }

    fn state_line(&self) -> Line<'static> {
        let line = match (self.snapshot.winner, &self.snapshot.state) {
            (Some(Side::Player), _) => Line::from("You win!").green().bold(),
            (Some(Side::Cpu), _) => Line::from("CPU wins!").red().bold(),
            (None, TurnState::Paused(_)) => Line::from("Paused").yellow(),
            (None, state) => Line::from(state.to_string()),
        };
        line.centered()
    }

    fn to_lines(&self) -> Vec<Line<'static>> {
        vec![
            self.deck_line(Side::Cpu),
            Line::default(),
            self.pile_line(),
            Line::from(format!("{} in pile", self.snapshot.pile.len())).centered(),
            Line::default(),
            self.deck_line(Side::Player),
            self.state_line(),
        ]
    }
}

impl Widget for Board<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let lines = self.to_lines();
        Paragraph::new(lines)
            .block(Block::bordered())
            .render(area, buf)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn render(board: Board) -> String {
        let area = Rect::new(0, 0, 30, 9);
        let mut buf = Buffer::empty(area);
        board.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_render() {
        let snapshot = Snapshot {
            player_cards: 19,
            cpu_cards: 21,
            pile: vec![],
            state: TurnState::Normal {
                to_play: Side::Cpu,
            },
            message: None,
            game_over: false,
            winner: None,
        };
        let text = render(Board::new(&snapshot, &[]));
        assert!(text.contains("You: 19 cards"));
        assert!(text.contains("CPU: 21 cards"));
        assert!(text.contains("(empty)"));
        assert!(text.contains("CPU to play"));
    }

    #[test]
    fn test_render_game_over() {
        let snapshot = Snapshot {
            player_cards: 40,
            cpu_cards: 0,
            pile: vec![],
            state: TurnState::GameOver {
                winner: Side::Player,
            },
            message: None,
            game_over: true,
            winner: Some(Side::Player),
        };
        assert!(render(Board::new(&snapshot, &[])).contains("You win!"));
    }
}
