// Feed view: summary cards, inventory/consumption switcher, active table

use crate::farm::{table, FeedTab};
use crate::tui::app::App;
use crate::tui::components::summary_cards::{self, CARD_HEIGHT};
use crate::tui::components::{Card, RecordTable};
use crate::util::format_quantity;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::Tabs,
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let page = &app.feed;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(CARD_HEIGHT),
            Constraint::Length(1),
            Constraint::Min(4),
        ])
        .split(area);

    let s = page.summary();
    let cards = [
        Card::new("Stock", format_quantity(s.total_stock))
            .with_detail(format!("{} items", s.item_count)),
        Card::new("Feed types", s.feed_types.to_string()),
        Card::new("Consumed", format_quantity(s.total_consumed))
            .with_detail(format!("{} records", s.consumption_count)),
    ];
    summary_cards::render(f, chunks[0], &cards, theme);

    let selected = match page.tab {
        FeedTab::Inventory => 0,
        FeedTab::Consumption => 1,
    };
    let tabs = Tabs::new([Line::from("Inventory"), Line::from("Consumption")])
        .select(selected)
        .style(Style::default().fg(theme.muted))
        .highlight_style(
            Style::default()
                .fg(theme.highlight)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, chunks[1]);

    let widget = match page.tab {
        FeedTab::Inventory => RecordTable::new(
            &table::INVENTORY,
            page.inventory().iter().map(table::inventory_row).collect(),
        ),
        FeedTab::Consumption => RecordTable::new(
            &table::CONSUMPTION,
            page.consumption().iter().map(table::consumption_row).collect(),
        ),
    };
    widget.render(f, chunks[2], theme);
}
