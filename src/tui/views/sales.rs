// Sales view: revenue cards and the sales table

use crate::farm::{format_money, table};
use crate::tui::app::App;
use crate::tui::components::summary_cards::{self, CARD_HEIGHT};
use crate::tui::components::{Card, RecordTable};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let page = &app.sales;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(CARD_HEIGHT), Constraint::Min(4)])
        .split(area);

    let s = page.summary();
    let cards = [
        Card::new("Revenue", format!("${}", format_money(s.total_revenue)))
            .with_detail(format!("{} sales", s.count)),
        Card::new("Birds", format!("${}", format_money(s.bird_revenue)))
            .with_detail(format!("{} sales", s.bird_count)),
        Card::new("Feed", format!("${}", format_money(s.feed_revenue)))
            .with_detail(format!("{} sales", s.feed_count)),
    ];
    summary_cards::render(f, chunks[0], &cards, &app.theme);

    let rows = page.sales().iter().map(table::sale_row).collect();
    RecordTable::new(&table::SALES, rows).render(f, chunks[1], &app.theme);
}
