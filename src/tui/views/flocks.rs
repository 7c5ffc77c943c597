// Flocks view: summary cards, search line, flock table

use crate::farm::table;
use crate::tui::app::App;
use crate::tui::components::summary_cards::{self, CARD_HEIGHT};
use crate::tui::components::{Card, RecordTable};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let page = &app.flocks;
    let show_search = app.searching || !page.search().is_empty();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CARD_HEIGHT),
            Constraint::Length(if show_search { 1 } else { 0 }),
            Constraint::Min(4),
        ])
        .split(area);

    let s = page.summary();
    let cards = [
        Card::new("Lots", s.total.to_string()),
        Card::new("Active", s.active.to_string()),
        Card::new("Closed", s.closed.to_string()),
        Card::new("Birds", s.active_birds.to_string()).with_detail("in active lots"),
    ];
    summary_cards::render(f, chunks[0], &cards, theme);

    if show_search {
        let cursor = if app.searching { "▏" } else { "" };
        let search = Paragraph::new(Line::from(vec![
            Span::styled(" / ", Style::default().fg(theme.highlight)),
            Span::styled(
                format!("{}{}", page.search(), cursor),
                Style::default().fg(theme.foreground),
            ),
        ]));
        f.render_widget(search, chunks[1]);
    }

    let visible = page.visible();
    let rows = visible.iter().map(|flock| table::flock_row(flock)).collect();
    let mut widget = RecordTable::new(&table::FLOCKS, rows);
    if !visible.is_empty() {
        widget = widget.selected(app.flock_selected);
    }
    if !page.search().is_empty() {
        widget = widget.subtitle(format!("{} of {}", visible.len(), page.flocks().len()));
    }
    widget.render(f, chunks[2], theme);
}
