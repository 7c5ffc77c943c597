//! Activity panel component
//!
//! Shows the newest entries of the [`ActivityLog`] that the tracing layer
//! fills, colored by level. Always follows the tail.

use crate::logging::{ActivityEntry, ActivityLevel, ActivityLog};
use crate::tui::theme::Theme;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, log: &ActivityLog, theme: &Theme) {
    let visible = area.height.saturating_sub(2) as usize;
    let entries = log.recent(visible);

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| ListItem::new(format_entry(entry, theme)))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border))
            .title(format!(" Activity ({}) ", log.len())),
    );
    f.render_widget(list, area);
}

fn format_entry<'a>(entry: &'a ActivityEntry, theme: &Theme) -> Line<'a> {
    let color = match entry.level {
        ActivityLevel::Error => theme.error,
        ActivityLevel::Warn => theme.warning,
        ActivityLevel::Info => theme.foreground,
        ActivityLevel::Debug | ActivityLevel::Trace => theme.muted,
    };
    Line::from(vec![
        Span::styled(
            format!("{} ", entry.timestamp.format("%H:%M:%S")),
            Style::default().fg(theme.muted),
        ),
        Span::styled(format!("{:5} ", entry.level.as_str()), Style::default().fg(color)),
        Span::styled(entry.message.as_str(), Style::default().fg(color)),
    ])
}
