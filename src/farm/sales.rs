//! Sales page state
//!
//! Sales never leave the process: there is no backend endpoint for them, so a
//! recorded sale is inserted straight into the local collection.

use super::form::{FieldKind, FieldSpec, FormError, FormState, DATE_FORMAT};
use super::notice::Notice;
use rust_decimal::Decimal;

pub const SALE_TYPES: &[&str] = &["birds", "feed"];

/// Record Sale form: every field required
pub const SALE_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("type", "Type", FieldKind::Choice(SALE_TYPES)).with_default("birds"),
    FieldSpec::required("itemDescription", "Item", FieldKind::Text),
    FieldSpec::required("quantity", "Quantity", FieldKind::Number),
    FieldSpec::required("unitPrice", "Unit price", FieldKind::Number),
    FieldSpec::required("customer", "Customer", FieldKind::Text),
    FieldSpec::required("date", "Date", FieldKind::Date),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleKind {
    Birds,
    Feed,
}

impl SaleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleKind::Birds => "birds",
            SaleKind::Feed => "feed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "birds" => Some(SaleKind::Birds),
            "feed" => Some(SaleKind::Feed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub id: String,
    pub kind: SaleKind,
    pub item_description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    /// Fixed when the sale is recorded
    pub total_amount: Decimal,
    pub customer: String,
    pub date: String,
}

/// quantity × unit price, rounded to cents; `None` on overflow
pub fn sale_total(quantity: Decimal, unit_price: Decimal) -> Option<Decimal> {
    quantity.checked_mul(unit_price).map(|total| total.round_dp(2))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SalesSummary {
    pub total_revenue: Decimal,
    pub count: usize,
    pub bird_revenue: Decimal,
    pub bird_count: usize,
    pub feed_revenue: Decimal,
    pub feed_count: usize,
}

impl SalesSummary {
    pub fn from_sales(sales: &[SaleRecord]) -> Self {
        sales.iter().fold(Self::default(), |mut acc, sale| {
            acc.total_revenue += sale.total_amount;
            acc.count += 1;
            match sale.kind {
                SaleKind::Birds => {
                    acc.bird_revenue += sale.total_amount;
                    acc.bird_count += 1;
                }
                SaleKind::Feed => {
                    acc.feed_revenue += sale.total_amount;
                    acc.feed_count += 1;
                }
            }
            acc
        })
    }
}

#[derive(Debug, Clone)]
pub struct SalesPage {
    sales: Vec<SaleRecord>,
    pub form: FormState,
    pub form_open: bool,
}

impl Default for SalesPage {
    fn default() -> Self {
        Self::new()
    }
}

impl SalesPage {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(sales: Vec<SaleRecord>) -> Self {
        Self {
            sales,
            form: FormState::new(SALE_FIELDS),
            form_open: false,
        }
    }

    pub fn sales(&self) -> &[SaleRecord] {
        &self.sales
    }

    pub fn summary(&self) -> SalesSummary {
        SalesSummary::from_sales(&self.sales)
    }

    pub fn toggle_form(&mut self) {
        self.form_open = !self.form_open;
    }

    fn next_id(&self) -> String {
        format!("SL{:03}", self.sales.len() + 1)
    }

    fn prepare_sale(&self) -> Result<SaleRecord, FormError> {
        self.form.validate()?;
        let kind = SaleKind::parse(self.form.get("type")).ok_or(FormError::MissingField {
            label: "Type",
        })?;
        let quantity = self.form.decimal("quantity")?;
        let unit_price = self.form.decimal("unitPrice")?;
        let date = self.form.date("date")?;

        // The revenue summary adds every total, so it must stay representable
        let total_amount = sale_total(quantity, unit_price)
            .filter(|total| self.summary().total_revenue.checked_add(*total).is_some())
            .ok_or(FormError::TooLarge { label: "Total" })?;

        Ok(SaleRecord {
            id: self.next_id(),
            kind,
            item_description: self.form.text("itemDescription"),
            quantity,
            unit_price,
            total_amount,
            customer: self.form.text("customer"),
            date: date.format(DATE_FORMAT).to_string(),
        })
    }

    /// Validate the form and insert the sale locally
    pub fn record_sale(&mut self) -> Notice {
        let sale = match self.prepare_sale() {
            Ok(sale) => sale,
            Err(e) => return e.notice(),
        };
        tracing::info!(id = %sale.id, total = %sale.total_amount, "Sale recorded");
        let notice = Notice::success(
            "Sale recorded",
            format!("Sale {} recorded: ${}", sale.id, format_money(sale.total_amount)),
        );
        self.sales.push(sale);
        self.form.reset();
        self.form_open = false;
        notice
    }
}

/// `1234.5` → `1,234.50`
pub fn format_money(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let grouped = crate::util::group_thousands(whole);
    if negative {
        format!("-{}.{}", grouped, cents)
    } else {
        format!("{}.{}", grouped, cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fill(page: &mut SalesPage, kind: &str, qty: &str, price: &str) {
        page.form.set("type", kind);
        page.form.set("itemDescription", "Broiler Chickens");
        page.form.set("quantity", qty);
        page.form.set("unitPrice", price);
        page.form.set("customer", "ABC Restaurant");
        page.form.set("date", "2025-01-25");
    }

    #[test]
    fn test_sale_total_is_exact() {
        assert_eq!(sale_total(dec!(100), dec!(8.50)), Some(dec!(850.00)));
        assert_eq!(sale_total(dec!(3), dec!(0.10)), Some(dec!(0.30)));
        assert_eq!(sale_total(dec!(2.5), dec!(1.333)), Some(dec!(3.33)));
        assert_eq!(sale_total(Decimal::MAX, dec!(2)), None);
    }

    #[test]
    fn test_overflowing_total_is_rejected() {
        let mut page = SalesPage::new();
        fill(&mut page, "birds", "79228162514264337593543950335", "2");

        let notice = page.record_sale();

        assert_eq!(notice.title, "Validation error");
        assert!(notice.message.contains("too large"));
        assert!(page.sales().is_empty());
        assert_eq!(page.form.get("unitPrice"), "2");
    }

    #[test]
    fn test_total_that_would_overflow_revenue_is_rejected() {
        let mut page = SalesPage::new();
        fill(&mut page, "birds", "79228162514264337593543950335", "1");
        assert!(!page.record_sale().is_error());

        fill(&mut page, "feed", "79228162514264337593543950335", "1");
        assert!(page.record_sale().is_error());
        assert_eq!(page.sales().len(), 1);
        assert_eq!(page.summary().total_revenue, Decimal::MAX);
    }

    #[test]
    fn test_record_sale_assigns_sequential_id() {
        let mut page = SalesPage::new();
        page.toggle_form();
        fill(&mut page, "birds", "100", "8.50");

        let notice = page.record_sale();

        assert!(!notice.is_error());
        assert_eq!(page.sales().len(), 1);
        let sale = &page.sales()[0];
        assert_eq!(sale.id, "SL001");
        assert_eq!(sale.kind, SaleKind::Birds);
        assert_eq!(sale.total_amount, dec!(850.00));
        assert!(!page.form_open);
        assert_eq!(page.form.get("customer"), "");

        fill(&mut page, "feed", "50", "2.50");
        page.record_sale();
        assert_eq!(page.sales()[1].id, "SL002");
    }

    #[test]
    fn test_missing_field_keeps_form() {
        let mut page = SalesPage::new();
        fill(&mut page, "birds", "100", "8.50");
        page.form.set("customer", "");

        let notice = page.record_sale();

        assert_eq!(notice.title, "Validation error");
        assert!(page.sales().is_empty());
        assert_eq!(page.form.get("quantity"), "100");
    }

    #[test]
    fn test_zero_price_is_rejected() {
        let mut page = SalesPage::new();
        fill(&mut page, "birds", "10", "0");
        assert!(page.record_sale().is_error());
        assert!(page.sales().is_empty());
    }

    #[test]
    fn test_summary_splits_by_kind() {
        let mut page = SalesPage::new();
        fill(&mut page, "birds", "100", "8.50");
        page.record_sale();
        fill(&mut page, "feed", "50", "2.50");
        page.record_sale();

        let summary = page.summary();
        assert_eq!(summary.total_revenue, dec!(975.00));
        assert_eq!(summary.count, 2);
        assert_eq!(summary.bird_revenue, dec!(850.00));
        assert_eq!(summary.bird_count, 1);
        assert_eq!(summary.feed_revenue, dec!(125.00));
        assert_eq!(summary.feed_count, 1);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(dec!(0)), "0.00");
        assert_eq!(format_money(dec!(850)), "850.00");
        assert_eq!(format_money(dec!(1234.5)), "1,234.50");
        assert_eq!(format_money(dec!(1234567.891)), "1,234,567.89");
        assert_eq!(format_money(dec!(-42.1)), "-42.10");
    }
}
