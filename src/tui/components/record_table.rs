//! Record table component
//!
//! Renders one [`TableLayout`] with its rows. Column widths come from the
//! header and cell widths; an empty collection shows the layout's empty-state
//! message centered under the header, since ratatui rows cannot span columns.

use crate::farm::table::TableLayout;
use crate::tui::theme::Theme;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const MAX_COLUMN_WIDTH: u16 = 30;

pub struct RecordTable<'a> {
    pub layout: &'a TableLayout,
    pub rows: Vec<Vec<String>>,
    /// Highlighted row, if the table is selectable
    pub selected: Option<usize>,
    /// Extra text for the block title, e.g. the active search
    pub subtitle: Option<String>,
}

impl<'a> RecordTable<'a> {
    pub fn new(layout: &'a TableLayout, rows: Vec<Vec<String>>) -> Self {
        Self {
            layout,
            rows,
            selected: None,
            subtitle: None,
        }
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected = Some(index);
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    fn widths(&self) -> Vec<Constraint> {
        self.layout
            .headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                let widest = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.width())
                    .chain(std::iter::once(header.width()))
                    .max()
                    .unwrap_or(0) as u16;
                Constraint::Min(widest.min(MAX_COLUMN_WIDTH))
            })
            .collect()
    }

    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme) {
        let title = match &self.subtitle {
            Some(sub) => format!(" {} ({}) ", self.layout.title, sub),
            None => format!(" {} ({}) ", self.layout.title, self.rows.len()),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border))
            .title(title);

        let header = Row::new(self.layout.headers.iter().copied()).style(
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD),
        );
        let rows = self.rows.iter().map(|cells| {
            Row::new(cells.iter().map(String::as_str)).style(Style::default().fg(theme.foreground))
        });

        let table = Table::new(rows, self.widths())
            .header(header)
            .column_spacing(2)
            .row_highlight_style(
                Style::default()
                    .bg(theme.selection_bg)
                    .fg(theme.highlight)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ")
            .block(block);

        let mut state = TableState::default().with_selected(self.selected);
        f.render_stateful_widget(table, area, &mut state);

        if self.rows.is_empty() {
            // area minus borders minus header row
            let empty_area = Rect {
                x: area.x + 1,
                y: area.y + 2,
                width: area.width.saturating_sub(2),
                height: area.height.saturating_sub(3).min(1),
            };
            let empty = Paragraph::new(self.layout.empty)
                .style(Style::default().fg(theme.muted))
                .centered();
            f.render_widget(empty, empty_area);
        }
    }
}
