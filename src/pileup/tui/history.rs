//! Widget for the event history pane

use std::collections::VecDeque;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::pileup::{CollectReason, Event};

/// Oldest events are dropped beyond this many.
const CAPACITY: usize = 500;

#[derive(Debug, Clone, Default)]
pub struct History {
    events: VecDeque<Event>,
}

impl History {
    pub fn push(&mut self, event: Event) {
        if self.events.len() == CAPACITY {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

fn event_line(event: &Event) -> Line<'static> {
    match event {
        Event::Played { side, card } => Line::from(vec![
            Span::from(format!("{side} played ")),
            card.to_span(),
        ]),
        Event::Penalty { from, to, card } => Line::from(vec![
            Span::from(format!("{from} paid ")),
            card.to_span(),
            Span::from(format!(" to {to}")),
        ])
        .red(),
        Event::Collected {
            reason: CollectReason::Claim(_),
            ..
        }
        | Event::Claimed(_) => Line::from(event.to_string()).green(),
        Event::FalseClaim | Event::PenaltySkipped(_) => Line::from(event.to_string()).red(),
        Event::GameOver { .. } => Line::from(event.to_string()).bold(),
        _ => Line::from(event.to_string()),
    }
}

impl Widget for &History {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Newest events at the bottom, scrolled so the latest is always visible.
        let rows = usize::from(area.height.saturating_sub(2));
        let skip = self.events.len().saturating_sub(rows);
        let lines: Vec<Line> = self.events.iter().skip(skip).map(event_line).collect();
        Paragraph::new(lines)
            .block(Block::bordered().title("History"))
            .render(area, buf);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::pileup::Side;

    #[test]
    fn test_capacity() {
        let mut history = History::default();
        for _ in 0..CAPACITY {
            history.push(Event::Paused);
        }
        history.push(Event::GameOver {
            winner: Side::Player,
        });
        assert_eq!(history.events.len(), CAPACITY);
        assert_eq!(
            history.events.back(),
            Some(&Event::GameOver {
                winner: Side::Player
            })
        );
    }

    #[test]
    fn test_render_latest() {
        let mut history = History::default();
        for event in [Event::Paused, Event::Resumed, Event::FalseClaim] {
            history.push(event);
        }
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        (&history).render(area, &mut buf);
        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(!text.contains("Paused"));
        assert!(text.contains("Resumed"));
        assert!(text.contains("No match!"));
    }
}
