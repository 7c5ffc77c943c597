// Demo mode: an in-memory farm backend to showcase the TUI without a server
//
// Seeds a few flocks, a stocked feed store, and some consumption history,
// then answers every `FarmApi` call from memory after a short delay so the
// loading states are visible. The backend's rules are applied here too:
// consumption beyond stock is rejected, accepted consumption draws stock down.
//
// Run with: AVICOLA_DEMO=1 cargo run --release

use crate::api::wire::{NewBirdLot, NewConsumption, NewFood};
use crate::api::{ApiError, FarmApi};
use crate::farm::{
    FeedConsumptionRecord, FeedInventoryItem, Flock, FlockStatus, SaleKind, SaleRecord,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Default)]
struct DemoState {
    flocks: Vec<Flock>,
    inventory: Vec<FeedInventoryItem>,
    consumption: Vec<FeedConsumptionRecord>,
}

/// `FarmApi` backed by process memory
#[derive(Debug, Default)]
pub struct DemoFarmApi {
    state: Mutex<DemoState>,
    latency: Duration,
}

impl DemoFarmApi {
    /// No records, no delay
    #[cfg(test)]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Realistic starting data, no delay
    pub fn seeded() -> Self {
        Self {
            state: Mutex::new(DemoState {
                flocks: seed_flocks(),
                inventory: seed_inventory(),
                consumption: seed_consumption(),
            }),
            latency: Duration::ZERO,
        }
    }

    /// Delay every call by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut DemoState) -> T) -> Result<T, ApiError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ApiError::Network("demo backend state poisoned".to_string()))?;
        Ok(f(&mut state))
    }
}

#[async_trait]
impl FarmApi for DemoFarmApi {
    async fn list_flocks(&self) -> Result<Vec<Flock>, ApiError> {
        self.pause().await;
        self.with_state(|s| s.flocks.clone())
    }

    async fn create_flock(&self, request: &NewBirdLot) -> Result<Flock, ApiError> {
        self.pause().await;
        self.with_state(|s| {
            let flock = Flock {
                id: format!("FL{:03}", s.flocks.len() + 1),
                bird_type: request.bird_type.clone(),
                start_date: request.start_date.clone(),
                initial_quantity: request.initial_quantity,
                current_quantity: request.current_quantity,
                status: FlockStatus::Active,
                closed_date: None,
            };
            s.flocks.push(flock.clone());
            flock
        })
    }

    async fn list_inventory(&self) -> Result<Vec<FeedInventoryItem>, ApiError> {
        self.pause().await;
        self.with_state(|s| s.inventory.clone())
    }

    async fn add_feed(&self, request: &NewFood) -> Result<FeedInventoryItem, ApiError> {
        self.pause().await;
        self.with_state(|s| {
            let item = FeedInventoryItem {
                id: format!("F{:03}", s.inventory.len() + 1),
                feed_type: request.food_type.clone(),
                available_quantity: request.available_quantity,
                unit: request.unit.clone(),
                date_added: request.date_insert.clone(),
            };
            s.inventory.push(item.clone());
            item
        })
    }

    async fn list_consumption(&self) -> Result<Vec<FeedConsumptionRecord>, ApiError> {
        self.pause().await;
        self.with_state(|s| s.consumption.clone())
    }

    async fn record_consumption(
        &self,
        request: &NewConsumption,
    ) -> Result<FeedConsumptionRecord, ApiError> {
        self.pause().await;
        self.with_state(|s| {
            let Some(item) = s
                .inventory
                .iter_mut()
                .find(|i| i.feed_type == request.type_food)
            else {
                return Err(ApiError::Rejected(format!(
                    "no {} in stock",
                    request.type_food
                )));
            };
            if item.available_quantity < request.quantity_used {
                return Err(ApiError::Rejected(format!(
                    "only {} {} of {} available",
                    item.available_quantity, item.unit, item.feed_type
                )));
            }
            item.available_quantity -= request.quantity_used;

            let record = FeedConsumptionRecord {
                id: format!("C{:03}", s.consumption.len() + 1),
                flock_id: request.bird_lot_id.clone(),
                feed_type: request.type_food.clone(),
                quantity: request.quantity_used,
                unit: request.unit.clone(),
                date: request.date_insert.clone(),
            };
            s.consumption.push(record.clone());
            Ok(record)
        })?
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Seed data
// ─────────────────────────────────────────────────────────────────────────────

fn flock(id: &str, bird_type: &str, start: &str, initial: u32, current: u32) -> Flock {
    Flock {
        id: id.to_string(),
        bird_type: bird_type.to_string(),
        start_date: start.to_string(),
        initial_quantity: initial,
        current_quantity: current,
        status: FlockStatus::Active,
        closed_date: None,
    }
}

fn seed_flocks() -> Vec<Flock> {
    let mut closed = flock("FL003", "Turkey", "2024-09-02", 120, 112);
    closed.status = FlockStatus::Closed;
    closed.closed_date = Some("2024-12-20".to_string());

    vec![
        flock("FL001", "Broiler", "2025-01-10", 500, 488),
        flock("FL002", "Layer", "2024-11-15", 300, 296),
        closed,
    ]
}

fn item(id: &str, feed_type: &str, qty: f64, date: &str) -> FeedInventoryItem {
    FeedInventoryItem {
        id: id.to_string(),
        feed_type: feed_type.to_string(),
        available_quantity: qty,
        unit: "kg".to_string(),
        date_added: date.to_string(),
    }
}

fn seed_inventory() -> Vec<FeedInventoryItem> {
    vec![
        item("F001", "Starter feed", 250.0, "2025-01-08"),
        item("F002", "Grower feed", 400.0, "2025-01-12"),
        item("F003", "Layer feed", 180.5, "2025-01-15"),
    ]
}

fn seed_consumption() -> Vec<FeedConsumptionRecord> {
    vec![
        FeedConsumptionRecord {
            id: "C001".to_string(),
            flock_id: "FL001".to_string(),
            feed_type: "Starter feed".to_string(),
            quantity: 25.0,
            unit: "kg".to_string(),
            date: "2025-01-20".to_string(),
        },
        FeedConsumptionRecord {
            id: "C002".to_string(),
            flock_id: "FL002".to_string(),
            feed_type: "Layer feed".to_string(),
            quantity: 18.0,
            unit: "kg".to_string(),
            date: "2025-01-21".to_string(),
        },
    ]
}

/// The two sample sales shown on a fresh Sales page
pub fn demo_sales() -> Vec<SaleRecord> {
    vec![
        SaleRecord {
            id: "SL001".to_string(),
            kind: SaleKind::Birds,
            item_description: "Broiler Chickens".to_string(),
            quantity: Decimal::new(100, 0),
            unit_price: Decimal::new(850, 2),
            total_amount: Decimal::new(85000, 2),
            customer: "ABC Restaurant".to_string(),
            date: "2025-01-25".to_string(),
        },
        SaleRecord {
            id: "SL002".to_string(),
            kind: SaleKind::Feed,
            item_description: "Starter Feed".to_string(),
            quantity: Decimal::new(50, 0),
            unit_price: Decimal::new(250, 2),
            total_amount: Decimal::new(12500, 2),
            customer: "Local Farm Co-op".to_string(),
            date: "2025-01-26".to_string(),
        },
    ]
}
