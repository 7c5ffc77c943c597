// Navigation bar component
//
// App name, one tab per page, and a spinner while backend calls are in flight.

use crate::tui::app::{App, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.title))
        .title_top(Line::from(" ? ").right_aligned());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(16), Constraint::Min(10), Constraint::Length(12)])
        .split(inner);

    let title = Paragraph::new(" 🐔 avicola").style(
        Style::default()
            .fg(theme.title)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(title, chunks[0]);

    let titles: Vec<Line> = View::ALL
        .iter()
        .map(|v| Line::from(format!("{} {}", v.index() + 1, v.name())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.view.index())
        .style(Style::default().fg(theme.muted))
        .highlight_style(
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(Span::styled("│", Style::default().fg(theme.border)));
    f.render_widget(tabs, chunks[1]);

    if app.pending > 0 {
        let busy = Paragraph::new(format!("{} loading", app.spinner_char()))
            .style(Style::default().fg(theme.info))
            .right_aligned();
        f.render_widget(busy, chunks[2]);
    }
}
