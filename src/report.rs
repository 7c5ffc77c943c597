// Headless report - fetch the collections and print them as plain text
//
// Used by `avicola report` and by `AVICOLA_NO_TUI=1`. A failed fetch is
// logged by the page and rendered as the empty-state row; it never aborts.

use crate::api::FarmApi;
use crate::farm::table::{self, TableLayout};
use crate::farm::{format_money, FeedPage, FlockPage, SalesPage};
use crate::util::{fit_width, format_quantity};
use clap::ValueEnum;
use std::fmt::Write as _;
use unicode_width::UnicodeWidthStr;

/// Widest a single report column may get before it is cut with `…`
const MAX_COLUMN_WIDTH: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportModule {
    Flocks,
    Feed,
    Sales,
    #[default]
    All,
}

impl ReportModule {
    fn includes(self, other: ReportModule) -> bool {
        self == ReportModule::All || self == other
    }
}

/// Load what `module` asks for and render it
pub async fn build_report(api: &dyn FarmApi, module: ReportModule, sales: &SalesPage) -> String {
    let mut out = String::new();

    if module.includes(ReportModule::Flocks) {
        let mut flocks = FlockPage::new();
        let _ = flocks.load(api).await;
        out.push_str(&render_flocks(&flocks));
    }
    if module.includes(ReportModule::Feed) {
        let mut feed = FeedPage::new();
        let _ = feed.load(api).await;
        out.push_str(&render_feed(&feed));
    }
    if module.includes(ReportModule::Sales) {
        out.push_str(&render_sales(sales));
    }
    out
}

pub fn render_flocks(page: &FlockPage) -> String {
    let s = page.summary();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Flocks: {} total, {} active, {} closed, {} birds in active lots",
        s.total, s.active, s.closed, s.active_birds
    );
    let rows: Vec<_> = page.flocks().iter().map(table::flock_row).collect();
    out.push_str(&text_table(&table::FLOCKS, &rows));
    out
}

pub fn render_feed(page: &FeedPage) -> String {
    let s = page.summary();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Feed: {} in stock across {} items ({} types), {} consumed in {} records",
        format_quantity(s.total_stock),
        s.item_count,
        s.feed_types,
        format_quantity(s.total_consumed),
        s.consumption_count
    );
    let rows: Vec<_> = page.inventory().iter().map(table::inventory_row).collect();
    out.push_str(&text_table(&table::INVENTORY, &rows));
    let rows: Vec<_> = page.consumption().iter().map(table::consumption_row).collect();
    out.push_str(&text_table(&table::CONSUMPTION, &rows));
    out
}

pub fn render_sales(page: &SalesPage) -> String {
    let s = page.summary();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Sales: ${} from {} sales (birds ${} / {}, feed ${} / {})",
        format_money(s.total_revenue),
        s.count,
        format_money(s.bird_revenue),
        s.bird_count,
        format_money(s.feed_revenue),
        s.feed_count
    );
    let rows: Vec<_> = page.sales().iter().map(table::sale_row).collect();
    out.push_str(&text_table(&table::SALES, &rows));
    out
}

/// Column-aligned plain text table with a title line
fn text_table(layout: &TableLayout, rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = layout.headers.iter().map(|h| h.width()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.width().min(MAX_COLUMN_WIDTH));
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "\n== {} ==", layout.title);
    let _ = writeln!(out, "{}", aligned(layout.headers.iter().copied(), &widths));
    let total: usize = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    let _ = writeln!(out, "{}", "-".repeat(total));
    if rows.is_empty() {
        let _ = writeln!(out, "{}", layout.empty);
    }
    for row in rows {
        let _ = writeln!(out, "{}", aligned(row.iter().map(String::as_str), &widths));
    }
    out.push('\n');
    out
}

fn aligned<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let mut s = String::new();
    for (i, (cell, w)) in cells.zip(widths).enumerate() {
        if i > 0 {
            s.push_str("  ");
        }
        let cell = fit_width(cell, *w);
        s.push_str(&cell);
        s.push_str(&" ".repeat(w.saturating_sub(cell.width())));
    }
    s.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, FailingApi};
    use crate::demo::{demo_sales, DemoFarmApi};

    #[tokio::test]
    async fn test_report_lists_demo_records() {
        let api = DemoFarmApi::seeded();
        let sales = SalesPage::with_records(demo_sales());
        let report = build_report(&api, ReportModule::All, &sales).await;

        assert!(report.contains("Flocks: 3 total, 2 active, 1 closed, 784 birds in active lots"));
        assert!(report.contains("== Feed inventory =="));
        assert!(report.contains("Starter feed"));
        assert!(report.contains("Sales: $975.00 from 2 sales"));
        assert!(report.contains("ABC Restaurant"));
    }

    #[tokio::test]
    async fn test_failed_fetch_renders_empty_state() {
        let api = FailingApi(ApiError::Network("connection refused".into()));
        let report = build_report(&api, ReportModule::Flocks, &SalesPage::new()).await;

        assert!(report.contains("Flocks: 0 total"));
        assert!(report.contains(table::FLOCKS.empty));
        assert!(!report.contains("== Feed inventory =="));
    }

    #[test]
    fn test_table_aligns_columns() {
        let rows = vec![["F1", "Starter feed", "250", "kg", "2025-01-08"]
            .iter()
            .map(|s| s.to_string())
            .collect()];
        let text = text_table(&table::INVENTORY, &rows);
        let lines: Vec<_> = text.lines().filter(|l| !l.is_empty()).collect();
        assert_eq!(lines[0], "== Feed inventory ==");
        // header and row start their second column at the same offset
        let header_col = lines[1].find("Feed type").unwrap();
        let row_col = lines[3].find("Starter feed").unwrap();
        assert_eq!(header_col, row_col);
    }
}
