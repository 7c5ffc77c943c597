//! Feed page state: inventory and consumption
//!
//! Two collections and two independent forms. Recording consumption is the
//! one cross-entity update in the system: the consumption record is appended
//! and the matching inventory item's stock drops by the consumed amount, both
//! only after the backend confirms.

use super::form::{FieldKind, FieldSpec, FormError, FormState, DATE_FORMAT};
use super::notice::Notice;
use crate::api::wire::{NewConsumption, NewFood};
use crate::api::{ApiError, FarmApi};
use std::collections::BTreeSet;

pub const FEED_TYPES: &[&str] = &[
    "Starter feed",
    "Grower feed",
    "Finisher feed",
    "Layer feed",
    "Supplement",
];

pub const UNITS: &[&str] = &["kg", "lbs", "g"];

/// Add Feed form: required {quantity, feedType, unit, date}
pub const ADD_FEED_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("quantity", "Quantity", FieldKind::Number),
    FieldSpec::required("feedType", "Feed type", FieldKind::Choice(FEED_TYPES)),
    FieldSpec::required("unit", "Unit", FieldKind::Choice(UNITS)).with_default("kg"),
    FieldSpec::required("date", "Date added", FieldKind::Date),
];

/// Record Consumption form: required {flockId, feedType, quantity, date}
pub const CONSUMPTION_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("flockId", "Flock", FieldKind::Lookup),
    FieldSpec::required("feedType", "Feed type", FieldKind::Lookup),
    FieldSpec::required("quantity", "Quantity", FieldKind::Number),
    FieldSpec::required("unit", "Unit", FieldKind::Choice(UNITS))
        .with_default("kg")
        .optional(),
    FieldSpec::required("date", "Date", FieldKind::Date),
];

/// A stocked quantity of one feed type
#[derive(Debug, Clone, PartialEq)]
pub struct FeedInventoryItem {
    pub id: String,
    pub feed_type: String,
    pub available_quantity: f64,
    pub unit: String,
    pub date_added: String,
}

/// Feed used by a specific flock
#[derive(Debug, Clone, PartialEq)]
pub struct FeedConsumptionRecord {
    pub id: String,
    pub flock_id: String,
    pub feed_type: String,
    pub quantity: f64,
    pub unit: String,
    pub date: String,
}

/// Aggregates shown in the feed summary cards
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeedSummary {
    pub total_stock: f64,
    pub item_count: usize,
    pub feed_types: usize,
    pub total_consumed: f64,
    pub consumption_count: usize,
}

impl FeedSummary {
    pub fn compute(inventory: &[FeedInventoryItem], consumption: &[FeedConsumptionRecord]) -> Self {
        let feed_types = inventory
            .iter()
            .map(|i| i.feed_type.as_str())
            .collect::<BTreeSet<_>>()
            .len();
        Self {
            total_stock: inventory.iter().map(|i| i.available_quantity).sum(),
            item_count: inventory.len(),
            feed_types,
            total_consumed: consumption.iter().map(|c| c.quantity).sum(),
            consumption_count: consumption.len(),
        }
    }
}

/// Which feed form is open (at most one at a time)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedForm {
    AddFeed,
    RecordConsumption,
}

/// Which table the feed page shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedTab {
    #[default]
    Inventory,
    Consumption,
}

impl FeedTab {
    pub fn toggle(self) -> Self {
        match self {
            FeedTab::Inventory => FeedTab::Consumption,
            FeedTab::Consumption => FeedTab::Inventory,
        }
    }
}

/// A consumption request that passed local checks
///
/// Carries the inventory item it was checked against, so the decrement hits
/// that item even if another item with the same feed type exists.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConsumption {
    pub request: NewConsumption,
    pub item_id: String,
    pub quantity: f64,
}

#[derive(Debug, Clone)]
pub struct FeedPage {
    inventory: Vec<FeedInventoryItem>,
    consumption: Vec<FeedConsumptionRecord>,
    pub add_form: FormState,
    pub consumption_form: FormState,
    pub open_form: Option<FeedForm>,
    pub tab: FeedTab,
    pub adding: bool,
    pub recording: bool,
}

impl Default for FeedPage {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedPage {
    pub fn new() -> Self {
        Self {
            inventory: Vec::new(),
            consumption: Vec::new(),
            add_form: FormState::new(ADD_FEED_FIELDS),
            consumption_form: FormState::new(CONSUMPTION_FIELDS),
            open_form: None,
            tab: FeedTab::default(),
            adding: false,
            recording: false,
        }
    }

    pub fn inventory(&self) -> &[FeedInventoryItem] {
        &self.inventory
    }

    pub fn consumption(&self) -> &[FeedConsumptionRecord] {
        &self.consumption
    }

    pub fn summary(&self) -> FeedSummary {
        FeedSummary::compute(&self.inventory, &self.consumption)
    }

    /// Distinct feed types currently in inventory, in first-seen order
    pub fn stocked_feed_types(&self) -> Vec<String> {
        let mut seen = Vec::<String>::new();
        for item in &self.inventory {
            if !seen.contains(&item.feed_type) {
                seen.push(item.feed_type.clone());
            }
        }
        seen
    }

    /// Open `form`, or close it if it is already the open one
    pub fn toggle_form(&mut self, form: FeedForm) {
        self.open_form = if self.open_form == Some(form) {
            None
        } else {
            Some(form)
        };
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Load
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn load(&mut self, api: &dyn FarmApi) -> Result<(), ApiError> {
        let inventory = api.list_inventory().await;
        let consumption = api.list_consumption().await;
        let inventory = self.apply_inventory(inventory);
        let consumption = self.apply_consumption(consumption);
        inventory.and(consumption).map(|_| ())
    }

    pub fn apply_inventory(
        &mut self,
        result: Result<Vec<FeedInventoryItem>, ApiError>,
    ) -> Result<usize, ApiError> {
        match result {
            Ok(items) => {
                tracing::info!(count = items.len(), "Loaded feed inventory");
                self.inventory = items;
                Ok(self.inventory.len())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load feed inventory");
                Err(e)
            }
        }
    }

    pub fn apply_consumption(
        &mut self,
        result: Result<Vec<FeedConsumptionRecord>, ApiError>,
    ) -> Result<usize, ApiError> {
        match result {
            Ok(records) => {
                tracing::info!(count = records.len(), "Loaded feed consumption");
                self.consumption = records;
                Ok(self.consumption.len())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load feed consumption");
                Err(e)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Add feed
    // ─────────────────────────────────────────────────────────────────────────

    pub fn prepare_add_feed(&self) -> Result<NewFood, FormError> {
        if self.adding {
            return Err(FormError::Busy);
        }
        let form = &self.add_form;
        form.validate()?;
        let quantity = form.quantity("quantity")?;
        let date = form.date("date")?;

        Ok(NewFood {
            available_quantity: quantity,
            food_type: form.text("feedType"),
            unit: form.text("unit"),
            date_insert: date.format(DATE_FORMAT).to_string(),
        })
    }

    pub fn complete_add_feed(&mut self, result: Result<FeedInventoryItem, ApiError>) -> Notice {
        self.adding = false;
        match result {
            Ok(item) => {
                tracing::info!(id = %item.id, feed_type = %item.feed_type, "Feed added");
                let notice = Notice::success(
                    "Feed added",
                    format!("{} added to inventory", item.feed_type),
                );
                self.inventory.push(item);
                self.add_form.reset();
                self.open_form = None;
                notice
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to add feed");
                Notice::error("Error", format!("Could not add the feed: {}", e))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Record consumption
    // ─────────────────────────────────────────────────────────────────────────

    /// Validate, parse, and check stock against the first item of the chosen feed type
    pub fn prepare_consumption(&self) -> Result<PendingConsumption, FormError> {
        if self.recording {
            return Err(FormError::Busy);
        }
        let form = &self.consumption_form;
        form.validate()?;
        let quantity = form.quantity("quantity")?;
        let date = form.date("date")?;
        let feed_type = form.text("feedType");

        let item = self
            .inventory
            .iter()
            .find(|i| i.feed_type == feed_type)
            .ok_or_else(|| FormError::UnknownFeedType {
                feed_type: feed_type.clone(),
            })?;

        // Stock is drawn down in the item's own unit, so the entry must match it
        let entered = form.text("unit");
        if !entered.is_empty() && !item.unit.is_empty() && entered != item.unit {
            return Err(FormError::UnitMismatch {
                feed_type,
                stock_unit: item.unit.clone(),
                entered,
            });
        }
        let unit = if !item.unit.is_empty() {
            item.unit.clone()
        } else if !entered.is_empty() {
            entered
        } else {
            "kg".to_string()
        };

        if item.available_quantity < quantity {
            return Err(FormError::InsufficientStock {
                feed_type,
                available: item.available_quantity,
                requested: quantity,
                unit,
            });
        }

        Ok(PendingConsumption {
            request: NewConsumption {
                bird_lot_id: form.text("flockId"),
                type_food: feed_type,
                quantity_used: quantity,
                unit,
                date_insert: date.format(DATE_FORMAT).to_string(),
            },
            item_id: item.id.clone(),
            quantity,
        })
    }

    /// On success: append the record and draw down the checked inventory item
    pub fn complete_consumption(
        &mut self,
        pending: PendingConsumption,
        result: Result<FeedConsumptionRecord, ApiError>,
    ) -> Notice {
        self.recording = false;
        let mut record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to record consumption");
                return Notice::error("Error", format!("Could not record consumption: {}", e));
            }
        };

        // Backends have been seen to omit nested refs; fill from what we sent
        if record.flock_id.is_empty() {
            record.flock_id = pending.request.bird_lot_id.clone();
        }
        if record.feed_type.is_empty() {
            record.feed_type = pending.request.type_food.clone();
        }
        if record.unit.is_empty() {
            record.unit = pending.request.unit.clone();
        }

        match self.inventory.iter_mut().find(|i| i.id == pending.item_id) {
            Some(item) => item.available_quantity -= pending.quantity,
            None => tracing::warn!(
                item_id = %pending.item_id,
                "Inventory item vanished before consumption was confirmed"
            ),
        }

        tracing::info!(
            flock = %record.flock_id,
            feed_type = %record.feed_type,
            quantity = record.quantity,
            "Consumption recorded"
        );
        self.consumption.push(record);
        self.consumption_form.reset();
        self.open_form = None;
        Notice::success("Consumption recorded", "Feed consumption recorded")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FailingApi;
    use crate::demo::DemoFarmApi;
    use crate::farm::NoticeKind;

    /// Whole submit cycle in one call: prepare, send, complete
    async fn submit_add_feed(page: &mut FeedPage, api: &dyn FarmApi) -> Notice {
        let request = match page.prepare_add_feed() {
            Ok(request) => request,
            Err(e) => return e.notice(),
        };
        page.adding = true;
        let result = api.add_feed(&request).await;
        page.complete_add_feed(result)
    }

    async fn submit_consumption(page: &mut FeedPage, api: &dyn FarmApi) -> Notice {
        let pending = match page.prepare_consumption() {
            Ok(pending) => pending,
            Err(e) => return e.notice(),
        };
        page.recording = true;
        let result = api.record_consumption(&pending.request).await;
        page.complete_consumption(pending, result)
    }

    fn item(id: &str, feed_type: &str, qty: f64) -> FeedInventoryItem {
        FeedInventoryItem {
            id: id.to_string(),
            feed_type: feed_type.to_string(),
            available_quantity: qty,
            unit: "kg".to_string(),
            date_added: "2025-01-01".to_string(),
        }
    }

    fn fill_consumption(page: &mut FeedPage, feed_type: &str, quantity: &str) {
        let form = &mut page.consumption_form;
        form.set("flockId", "FL001");
        form.set("feedType", feed_type);
        form.set("quantity", quantity);
        form.set("date", "2025-01-25");
    }

    async fn loaded_page(api: &DemoFarmApi) -> FeedPage {
        let mut page = FeedPage::new();
        page.load(api).await.unwrap();
        page
    }

    #[test]
    fn test_summary_sums_and_distinct_types() {
        let mut page = FeedPage::new();
        page.apply_inventory(Ok(vec![
            item("1", "Starter feed", 100.0),
            item("2", "Starter feed", 50.0),
            item("3", "Layer feed", 25.5),
        ]))
        .unwrap();
        let summary = page.summary();
        assert_eq!(summary.total_stock, 175.5);
        assert_eq!(summary.item_count, 3);
        assert_eq!(summary.feed_types, 2);
        assert_eq!(summary.consumption_count, 0);
        assert_eq!(page.stocked_feed_types(), ["Starter feed", "Layer feed"]);
    }

    #[test]
    fn test_only_one_form_open() {
        let mut page = FeedPage::new();
        page.toggle_form(FeedForm::AddFeed);
        page.toggle_form(FeedForm::RecordConsumption);
        assert_eq!(page.open_form, Some(FeedForm::RecordConsumption));
        page.toggle_form(FeedForm::RecordConsumption);
        assert_eq!(page.open_form, None);
    }

    #[tokio::test]
    async fn test_add_feed_appends_mapped_record() {
        let api = DemoFarmApi::seeded();
        let mut page = loaded_page(&api).await;
        let before = page.inventory().len();
        page.toggle_form(FeedForm::AddFeed);
        page.add_form.set("quantity", "80");
        page.add_form.set("feedType", "Supplement");
        page.add_form.set("date", "2025-01-30");

        let notice = submit_add_feed(&mut page, &api).await;

        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(page.inventory().len(), before + 1);
        let added = page.inventory().last().unwrap();
        assert_eq!(added.feed_type, "Supplement");
        assert_eq!(added.available_quantity, 80.0);
        assert_eq!(added.unit, "kg");
        assert_eq!(added.date_added, "2025-01-30");
        assert_eq!(page.open_form, None);
        assert_eq!(page.add_form.get("quantity"), "");
    }

    #[tokio::test]
    async fn test_add_feed_missing_field_is_validation_error() {
        let api = DemoFarmApi::seeded();
        let mut page = loaded_page(&api).await;
        let before = page.inventory().to_vec();
        page.add_form.set("quantity", "80");

        let notice = submit_add_feed(&mut page, &api).await;

        assert_eq!(notice.title, "Validation error");
        assert_eq!(page.inventory(), before.as_slice());
    }

    #[tokio::test]
    async fn test_record_consumption_decrements_matching_item() {
        let api = DemoFarmApi::seeded();
        let mut page = loaded_page(&api).await;
        let target = page.inventory()[0].clone();
        let before_records = page.consumption().len();
        fill_consumption(&mut page, &target.feed_type, "12.5");

        let notice = submit_consumption(&mut page, &api).await;

        assert_eq!(notice.kind, NoticeKind::Success, "{notice}");
        assert_eq!(page.consumption().len(), before_records + 1);
        let record = page.consumption().last().unwrap();
        assert_eq!(record.flock_id, "FL001");
        assert_eq!(record.feed_type, target.feed_type);
        assert_eq!(record.quantity, 12.5);
        let after = page
            .inventory()
            .iter()
            .find(|i| i.id == target.id)
            .unwrap();
        assert_eq!(after.available_quantity, target.available_quantity - 12.5);
    }

    #[tokio::test]
    async fn test_insufficient_stock_blocks_submission() {
        let api = DemoFarmApi::seeded();
        let mut page = loaded_page(&api).await;
        let target = page.inventory()[0].clone();
        let records = page.consumption().len();
        let too_much = format!("{}", target.available_quantity + 1.0);
        fill_consumption(&mut page, &target.feed_type, &too_much);

        let notice = submit_consumption(&mut page, &api).await;

        assert!(notice.is_error());
        assert_eq!(notice.title, "Insufficient stock");
        assert_eq!(page.consumption().len(), records);
        assert_eq!(page.inventory()[0], target);
    }

    #[tokio::test]
    async fn test_unknown_feed_type_blocks_submission() {
        let api = DemoFarmApi::seeded();
        let mut page = loaded_page(&api).await;
        fill_consumption(&mut page, "Mystery feed", "1");

        let err = page.prepare_consumption().unwrap_err();
        assert_eq!(
            err,
            FormError::UnknownFeedType {
                feed_type: "Mystery feed".to_string()
            }
        );
    }

    #[test]
    fn test_first_matching_item_is_checked() {
        let mut page = FeedPage::new();
        page.apply_inventory(Ok(vec![
            item("A", "Starter feed", 5.0),
            item("B", "Starter feed", 500.0),
        ]))
        .unwrap();
        fill_consumption(&mut page, "Starter feed", "3");

        let pending = page.prepare_consumption().unwrap();
        assert_eq!(pending.item_id, "A");
        assert_eq!(pending.request.unit, "kg");
        assert_eq!(pending.request.quantity_used, 3.0);
    }

    #[test]
    fn test_unit_must_match_stocked_item() {
        let mut page = FeedPage::new();
        let mut lbs = item("A", "Grower feed", 40.0);
        lbs.unit = "lbs".to_string();
        page.apply_inventory(Ok(vec![item("K", "Starter feed", 50.0), lbs]))
            .unwrap();

        fill_consumption(&mut page, "Starter feed", "10");
        page.consumption_form.set("unit", "g");
        assert_eq!(
            page.prepare_consumption(),
            Err(FormError::UnitMismatch {
                feed_type: "Starter feed".to_string(),
                stock_unit: "kg".to_string(),
                entered: "g".to_string(),
            })
        );

        // left blank, the unit follows the stocked item
        fill_consumption(&mut page, "Grower feed", "10");
        page.consumption_form.set("unit", "");
        let pending = page.prepare_consumption().unwrap();
        assert_eq!(pending.item_id, "A");
        assert_eq!(pending.request.unit, "lbs");

        page.consumption_form.set("unit", "lbs");
        let pending = page.prepare_consumption().unwrap();
        let notice = page.complete_consumption(
            pending,
            Ok(FeedConsumptionRecord {
                id: "C1".to_string(),
                flock_id: "FL001".to_string(),
                feed_type: "Grower feed".to_string(),
                quantity: 10.0,
                unit: "lbs".to_string(),
                date: "2025-01-25".to_string(),
            }),
        );
        assert!(!notice.is_error());
        assert_eq!(page.inventory()[1].available_quantity, 30.0);
        assert_eq!(page.inventory()[0].available_quantity, 50.0);
    }

    #[test]
    fn test_failed_consumption_does_not_touch_inventory() {
        let mut page = FeedPage::new();
        page.apply_inventory(Ok(vec![item("A", "Starter feed", 50.0)]))
            .unwrap();
        fill_consumption(&mut page, "Starter feed", "10");
        let pending = page.prepare_consumption().unwrap();

        let notice =
            page.complete_consumption(pending, Err(ApiError::Rejected("lot is closed".into())));

        assert!(notice.is_error());
        assert!(notice.message.contains("lot is closed"));
        assert_eq!(page.inventory()[0].available_quantity, 50.0);
        assert!(page.consumption().is_empty());
        assert_eq!(page.consumption_form.get("quantity"), "10");
    }

    #[test]
    fn test_sparse_response_is_filled_from_request() {
        let mut page = FeedPage::new();
        page.apply_inventory(Ok(vec![item("A", "Starter feed", 50.0)]))
            .unwrap();
        fill_consumption(&mut page, "Starter feed", "10");
        let pending = page.prepare_consumption().unwrap();

        page.complete_consumption(
            pending,
            Ok(FeedConsumptionRecord {
                id: "C9".to_string(),
                flock_id: String::new(),
                feed_type: String::new(),
                quantity: 10.0,
                unit: String::new(),
                date: "2025-01-25".to_string(),
            }),
        );

        let record = &page.consumption()[0];
        assert_eq!(record.flock_id, "FL001");
        assert_eq!(record.feed_type, "Starter feed");
        assert_eq!(record.unit, "kg");
        assert_eq!(page.inventory()[0].available_quantity, 40.0);
    }

    #[tokio::test]
    async fn test_failed_loads_leave_empty_collections() {
        let api = FailingApi(ApiError::Network("connection refused".into()));
        let mut page = FeedPage::new();

        assert!(page.load(&api).await.is_err());
        assert!(page.inventory().is_empty());
        assert!(page.consumption().is_empty());
    }
}
