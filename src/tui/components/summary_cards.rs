// Summary cards - a row of bordered label/value boxes above each table

use crate::tui::layout::Breakpoint;
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Height the card row needs
pub const CARD_HEIGHT: u16 = 4;

pub struct Card {
    pub label: &'static str,
    pub value: String,
    /// Second line under the value, e.g. a count
    pub detail: Option<String>,
}

impl Card {
    pub fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Lay the cards out side by side; narrow terminals drop the detail line
pub fn render(f: &mut Frame, area: Rect, cards: &[Card], theme: &Theme) {
    if cards.is_empty() {
        return;
    }
    let show_detail = Breakpoint::from_width(area.width).at_least(Breakpoint::Normal);

    let constraints = vec![Constraint::Ratio(1, cards.len() as u32); cards.len()];
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (card, slot) in cards.iter().zip(slots.iter()) {
        let mut lines = vec![Line::styled(
            card.value.clone(),
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        )];
        if let (true, Some(detail)) = (show_detail, &card.detail) {
            lines.push(Line::styled(detail.clone(), Style::default().fg(theme.muted)));
        }

        let widget = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(theme.border_type)
                .border_style(Style::default().fg(theme.border))
                .title(format!(" {} ", card.label)),
        );
        f.render_widget(widget, *slot);
    }
}
