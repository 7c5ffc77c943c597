//! Backend record shapes and their mapping to local records
//!
//! Inbound DTOs are deliberately forgiving: ids may arrive as strings or
//! numbers, numeric fields may be missing or null, and nothing at field level
//! fails a decode. Only a structurally wrong body (an object where an array
//! is expected, a non-object record) is treated as malformed.

use super::ApiError;
use crate::farm::{FeedConsumptionRecord, FeedInventoryItem, Flock, FlockStatus};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Message used when the backend rejects a call without saying why
pub const DEFAULT_REJECTION: &str = "the server rejected the request";

// ─────────────────────────────────────────────────────────────────────────────
// Lenient field decoders
// ─────────────────────────────────────────────────────────────────────────────

fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let s = lenient_string(d)?;
    Ok(if s.trim().is_empty() { None } else { Some(s) })
}

fn value_as_f64(value: Option<Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(value_as_f64(Option::<Value>::deserialize(d)?))
}

fn lenient_u32<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let n = value_as_f64(Option::<Value>::deserialize(d)?);
    Ok(n.round().clamp(0.0, u32::MAX as f64) as u32)
}

/// `1`, `true`, `"1"`, `"true"` and `"active"` all read as true
fn lenient_flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64() == Some(1.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s == "1" || s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("active")
        }
        _ => false,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Mutation envelope
// ─────────────────────────────────────────────────────────────────────────────

/// `{status, rsp_data, rsp_msg?}` wrapper returned by every mutating call
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default, deserialize_with = "lenient_flag")]
    pub status: bool,
    pub rsp_data: Option<T>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub rsp_msg: Option<String>,
}

impl<T> Envelope<T> {
    /// A false status is a failure even when the transport said 2xx
    pub fn into_result(self) -> Result<T, ApiError> {
        if !self.status {
            return Err(ApiError::Rejected(
                self.rsp_msg
                    .unwrap_or_else(|| DEFAULT_REJECTION.to_string()),
            ));
        }
        self.rsp_data
            .ok_or_else(|| ApiError::Decode("response envelope has no rsp_data".to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Bird lots
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirdLotDto {
    #[serde(default, deserialize_with = "lenient_string")]
    pub lot_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date_entry: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub closing_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub status: bool,
    #[serde(rename = "bird_type", default, deserialize_with = "lenient_string")]
    pub bird_type: String,
    #[serde(rename = "initial_quantity", default, deserialize_with = "lenient_u32")]
    pub initial_quantity: u32,
    #[serde(rename = "current_quantity", default, deserialize_with = "lenient_u32")]
    pub current_quantity: u32,
}

impl From<BirdLotDto> for Flock {
    fn from(dto: BirdLotDto) -> Self {
        Flock {
            id: dto.lot_id,
            bird_type: dto.bird_type,
            start_date: dto.date_entry,
            initial_quantity: dto.initial_quantity,
            current_quantity: dto.current_quantity,
            status: if dto.status {
                FlockStatus::Active
            } else {
                FlockStatus::Closed
            },
            closed_date: dto.closing_date,
        }
    }
}

/// Body of `POST /bird-lot/register`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBirdLot {
    pub bird_type: String,
    pub initial_quantity: u32,
    pub current_quantity: u32,
    pub start_date: String,
    pub status: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Feed inventory
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDto {
    #[serde(default, deserialize_with = "lenient_string")]
    pub food_id: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub food_type: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub available_quantity: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit_measurement: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date_insert: String,
}

impl From<FoodDto> for FeedInventoryItem {
    fn from(dto: FoodDto) -> Self {
        FeedInventoryItem {
            id: dto.food_id,
            feed_type: dto.food_type,
            available_quantity: dto.available_quantity,
            unit: dto.unit_measurement,
            date_added: dto.date_insert,
        }
    }
}

/// Body of `POST /food/record`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFood {
    pub available_quantity: f64,
    pub food_type: String,
    pub unit: String,
    pub date_insert: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Feed consumption
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotRefDto {
    #[serde(default, deserialize_with = "lenient_string")]
    pub lot_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRefDto {
    #[serde(default, deserialize_with = "lenient_string")]
    pub food_id: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub food_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit_measurement: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionDto {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default)]
    pub bird_lot: Option<LotRefDto>,
    #[serde(default)]
    pub food: Option<FoodRefDto>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub quantity_used: f64,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
}

impl From<ConsumptionDto> for FeedConsumptionRecord {
    fn from(dto: ConsumptionDto) -> Self {
        let food = dto.food.unwrap_or_default();
        FeedConsumptionRecord {
            id: dto.id,
            flock_id: dto.bird_lot.unwrap_or_default().lot_id,
            feed_type: food.food_type,
            quantity: dto.quantity_used,
            unit: dto.unit.unwrap_or(food.unit_measurement),
            date: dto.date,
        }
    }
}

/// Body of `POST /food/consumption`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConsumption {
    pub bird_lot_id: String,
    pub type_food: String,
    pub quantity_used: f64,
    pub unit: String,
    pub date_insert: String,
}
