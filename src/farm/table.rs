//! Row layouts shared by the TUI tables and the headless report

use super::{format_money, FeedConsumptionRecord, FeedInventoryItem, Flock, SaleRecord};
use crate::util::format_quantity;

/// Column headings plus the row shown when there is nothing to list
#[derive(Debug, Clone, Copy)]
pub struct TableLayout {
    pub title: &'static str,
    pub headers: &'static [&'static str],
    pub empty: &'static str,
}

pub const FLOCKS: TableLayout = TableLayout {
    title: "Flocks",
    headers: &[
        "Lot ID",
        "Bird type",
        "Initial",
        "Current",
        "Start date",
        "Status",
        "Closed",
    ],
    empty: "No flocks found",
};

pub const INVENTORY: TableLayout = TableLayout {
    title: "Feed inventory",
    headers: &["Feed ID", "Feed type", "Quantity", "Unit", "Date added"],
    empty: "No feed in inventory",
};

pub const CONSUMPTION: TableLayout = TableLayout {
    title: "Feed consumption",
    headers: &["Record ID", "Lot ID", "Feed type", "Quantity", "Unit", "Date"],
    empty: "No consumption recorded",
};

pub const SALES: TableLayout = TableLayout {
    title: "Sales",
    headers: &[
        "Sale ID",
        "Type",
        "Description",
        "Quantity",
        "Unit price",
        "Total",
        "Customer",
        "Date",
    ],
    empty: "No sales recorded",
};

pub fn flock_row(flock: &Flock) -> Vec<String> {
    vec![
        flock.id.clone(),
        flock.bird_type.clone(),
        flock.initial_quantity.to_string(),
        flock.current_quantity.to_string(),
        flock.start_date.clone(),
        flock.status.as_str().to_string(),
        flock.closed_date.clone().unwrap_or_else(|| "-".to_string()),
    ]
}

pub fn inventory_row(item: &FeedInventoryItem) -> Vec<String> {
    vec![
        item.id.clone(),
        item.feed_type.clone(),
        format_quantity(item.available_quantity),
        item.unit.clone(),
        item.date_added.clone(),
    ]
}

pub fn consumption_row(record: &FeedConsumptionRecord) -> Vec<String> {
    vec![
        record.id.clone(),
        record.flock_id.clone(),
        record.feed_type.clone(),
        format_quantity(record.quantity),
        record.unit.clone(),
        record.date.clone(),
    ]
}

pub fn sale_row(sale: &SaleRecord) -> Vec<String> {
    vec![
        sale.id.clone(),
        sale.kind.as_str().to_string(),
        sale.item_description.clone(),
        sale.quantity.normalize().to_string(),
        format!("${}", format_money(sale.unit_price)),
        format!("${}", format_money(sale.total_amount)),
        sale.customer.clone(),
        sale.date.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_sales;

    #[test]
    fn test_rows_match_header_count() {
        let sale = &demo_sales()[0];
        assert_eq!(sale_row(sale).len(), SALES.headers.len());

        let flock = Flock {
            id: "FL001".to_string(),
            bird_type: "Broiler".to_string(),
            start_date: "2025-01-10".to_string(),
            initial_quantity: 500,
            current_quantity: 480,
            status: crate::farm::FlockStatus::Active,
            closed_date: None,
        };
        let row = flock_row(&flock);
        assert_eq!(row.len(), FLOCKS.headers.len());
        assert_eq!(row[5], "active");
        assert_eq!(row[6], "-");
    }

    #[test]
    fn test_sale_row_formats_money() {
        let row = sale_row(&demo_sales()[0]);
        assert_eq!(row[3], "100");
        assert_eq!(row[4], "$8.50");
        assert_eq!(row[5], "$850.00");
    }
}
