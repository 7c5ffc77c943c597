//! Farm backend client
//!
//! `FarmApi` is the seam between the pages and the remote collaborator. The
//! HTTP implementation talks to the `/api` backend with reqwest; demo mode
//! and tests swap in in-memory implementations of the same trait.

pub mod wire;

use crate::farm::{FeedConsumptionRecord, FeedInventoryItem, Flock};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use wire::{BirdLotDto, ConsumptionDto, Envelope, FoodDto, NewBirdLot, NewConsumption, NewFood};

// ─────────────────────────────────────────────────────────────────────────────
// Endpoints (relative to the configured base URL)
// ─────────────────────────────────────────────────────────────────────────────

pub const FLOCK_REPORT: &str = "/bird-lot/report";
pub const FLOCK_REGISTER: &str = "/bird-lot/register";
pub const FEED_REPORT: &str = "/food/report";
pub const FEED_RECORD: &str = "/food/record";
pub const CONSUMPTION_REPORT: &str = "/food/report-consumption";
pub const CONSUMPTION_RECORD: &str = "/food/consumption";

/// Longest backend error body kept in an error message
const MAX_ERROR_BODY: usize = 200;

/// Errors that can occur talking to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout
    Network(String),
    /// Non-2xx HTTP status
    Status { status: u16, message: String },
    /// Envelope came back with `status: false`
    Rejected(String),
    /// Body did not have the expected shape
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Status { status, message } if message.is_empty() => {
                write!(f, "Backend returned HTTP {}", status)
            }
            Self::Status { status, message } => {
                write!(f, "Backend returned HTTP {}: {}", status, message)
            }
            Self::Rejected(msg) => write!(f, "{}", msg),
            Self::Decode(msg) => write!(f, "Unexpected response: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else if e.is_timeout() {
            ApiError::Network("request timed out".to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

/// Operations the farm backend offers
///
/// Each call maps the backend's record shape to the local one before
/// returning, so callers never see wire DTOs on the inbound side.
#[async_trait]
pub trait FarmApi: Send + Sync {
    async fn list_flocks(&self) -> Result<Vec<Flock>, ApiError>;

    async fn create_flock(&self, request: &NewBirdLot) -> Result<Flock, ApiError>;

    async fn list_inventory(&self) -> Result<Vec<FeedInventoryItem>, ApiError>;

    async fn add_feed(&self, request: &NewFood) -> Result<FeedInventoryItem, ApiError>;

    async fn list_consumption(&self) -> Result<Vec<FeedConsumptionRecord>, ApiError>;

    async fn record_consumption(
        &self,
        request: &NewConsumption,
    ) -> Result<FeedConsumptionRecord, ApiError>;
}

/// reqwest-backed client for the farm backend
pub struct HttpFarmApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFarmApi {
    /// Create a client for `base_url` (e.g. `http://localhost:8080/api`)
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON array
    async fn fetch_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        tracing::debug!("GET {}", path);
        let response = self.client.get(self.url(path)).send().await?;
        let response = ensure_success(response).await?;
        Ok(response.json::<Vec<T>>().await?)
    }

    /// POST a JSON body and unwrap the `{status, rsp_data, rsp_msg}` envelope
    async fn post_envelope<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        tracing::debug!("POST {}", path);
        let response = self.client.post(self.url(path)).json(body).send().await?;
        let response = ensure_success(response).await?;
        let envelope: Envelope<T> = response.json().await?;
        envelope.into_result()
    }
}

/// Turn a non-2xx response into `ApiError::Status`, keeping a short body excerpt
async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = crate::util::truncate_utf8_safe(body.trim(), MAX_ERROR_BODY).to_string();
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl FarmApi for HttpFarmApi {
    async fn list_flocks(&self) -> Result<Vec<Flock>, ApiError> {
        let lots: Vec<BirdLotDto> = self.fetch_list(FLOCK_REPORT).await?;
        Ok(lots.into_iter().map(Flock::from).collect())
    }

    async fn create_flock(&self, request: &NewBirdLot) -> Result<Flock, ApiError> {
        let lot: BirdLotDto = self.post_envelope(FLOCK_REGISTER, request).await?;
        Ok(lot.into())
    }

    async fn list_inventory(&self) -> Result<Vec<FeedInventoryItem>, ApiError> {
        let foods: Vec<FoodDto> = self.fetch_list(FEED_REPORT).await?;
        Ok(foods.into_iter().map(FeedInventoryItem::from).collect())
    }

    async fn add_feed(&self, request: &NewFood) -> Result<FeedInventoryItem, ApiError> {
        let food: FoodDto = self.post_envelope(FEED_RECORD, request).await?;
        Ok(food.into())
    }

    async fn list_consumption(&self) -> Result<Vec<FeedConsumptionRecord>, ApiError> {
        let records: Vec<ConsumptionDto> = self.fetch_list(CONSUMPTION_REPORT).await?;
        Ok(records
            .into_iter()
            .map(FeedConsumptionRecord::from)
            .collect())
    }

    async fn record_consumption(
        &self,
        request: &NewConsumption,
    ) -> Result<FeedConsumptionRecord, ApiError> {
        let record: ConsumptionDto = self.post_envelope(CONSUMPTION_RECORD, request).await?;
        Ok(record.into())
    }
}

/// Backend that fails every call with the same error
#[cfg(test)]
pub(crate) struct FailingApi(pub ApiError);

#[cfg(test)]
#[async_trait]
impl FarmApi for FailingApi {
    async fn list_flocks(&self) -> Result<Vec<Flock>, ApiError> {
        Err(self.0.clone())
    }

    async fn create_flock(&self, _request: &NewBirdLot) -> Result<Flock, ApiError> {
        Err(self.0.clone())
    }

    async fn list_inventory(&self) -> Result<Vec<FeedInventoryItem>, ApiError> {
        Err(self.0.clone())
    }

    async fn add_feed(&self, _request: &NewFood) -> Result<FeedInventoryItem, ApiError> {
        Err(self.0.clone())
    }

    async fn list_consumption(&self) -> Result<Vec<FeedConsumptionRecord>, ApiError> {
        Err(self.0.clone())
    }

    async fn record_consumption(
        &self,
        _request: &NewConsumption,
    ) -> Result<FeedConsumptionRecord, ApiError> {
        Err(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::farm::FlockStatus;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpFarmApi {
        HttpFarmApi::new(&format!("{}/api/", server.uri()), None).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let api = HttpFarmApi::new("http://localhost:8080/api/", None).unwrap();
        assert_eq!(api.base_url(), "http://localhost:8080/api");
        assert_eq!(api.url(FLOCK_REPORT), "http://localhost:8080/api/bird-lot/report");
    }

    #[tokio::test]
    async fn test_list_flocks_maps_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/bird-lot/report"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"lotId": "FL001", "dateEntry": "2025-01-10", "status": 1,
                 "bird_type": "Broiler", "initial_quantity": 500, "current_quantity": 500},
                {"lotId": "FL002", "dateEntry": "2024-11-02", "closingDate": "2025-01-05",
                 "status": 0, "bird_type": "Layer", "initial_quantity": 200, "current_quantity": 190}
            ])))
            .mount(&server)
            .await;

        let flocks = client_for(&server).list_flocks().await.unwrap();

        assert_eq!(flocks.len(), 2);
        assert_eq!(flocks[0].id, "FL001");
        assert_eq!(flocks[0].status, FlockStatus::Active);
        assert_eq!(flocks[1].status, FlockStatus::Closed);
        assert_eq!(flocks[1].closed_date.as_deref(), Some("2025-01-05"));
    }

    #[tokio::test]
    async fn test_list_fails_on_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/food/report"))
            .respond_with(ResponseTemplate::new(500).set_body_string("database offline"))
            .mount(&server)
            .await;

        let err = client_for(&server).list_inventory().await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                message: "database offline".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_list_fails_on_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/food/report-consumption"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"oops": true})))
            .mount(&server)
            .await;

        let err = client_for(&server).list_consumption().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let server = MockServer::start().await;
        let api = client_for(&server);
        drop(server);

        let err = api.list_flocks().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_add_feed_posts_body_and_maps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/food/record"))
            .and(body_json(json!({
                "availableQuantity": 100.0,
                "foodType": "Starter feed",
                "unit": "kg",
                "dateInsert": "2025-01-25"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": true,
                "rsp_data": {"foodId": "F9", "type": "Starter feed", "availableQuantity": 100,
                             "unitMeasurement": "kg", "dateInsert": "2025-01-25"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let item = client_for(&server)
            .add_feed(&NewFood {
                available_quantity: 100.0,
                food_type: "Starter feed".to_string(),
                unit: "kg".to_string(),
                date_insert: "2025-01-25".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(item.id, "F9");
        assert_eq!(item.available_quantity, 100.0);
    }

    #[tokio::test]
    async fn test_rejected_envelope_on_2xx_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/bird-lot/register"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": false,
                "rsp_msg": "invalid bird type"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .create_flock(&NewBirdLot {
                bird_type: "Dragon".to_string(),
                initial_quantity: 1,
                current_quantity: 1,
                start_date: "2025-01-01".to_string(),
                status: "active".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, ApiError::Rejected("invalid bird type".to_string()));
        assert_eq!(err.to_string(), "invalid bird type");
    }

    #[tokio::test]
    async fn test_record_consumption_maps_nested_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/food/consumption"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "status": true,
                "rsp_data": {"id": 11, "birdLot": {"lotId": "FL001"},
                             "food": {"foodId": "F1", "type": "Grower feed", "unitMeasurement": "kg"},
                             "quantityUsed": 25.5, "date": "2025-01-26"}
            })))
            .mount(&server)
            .await;

        let record = client_for(&server)
            .record_consumption(&NewConsumption {
                bird_lot_id: "FL001".to_string(),
                type_food: "Grower feed".to_string(),
                quantity_used: 25.5,
                unit: "kg".to_string(),
                date_insert: "2025-01-26".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(record.id, "11");
        assert_eq!(record.flock_id, "FL001");
        assert_eq!(record.feed_type, "Grower feed");
        assert_eq!(record.quantity, 25.5);
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::Status {
            status: 404,
            message: String::new(),
        };
        assert_eq!(err.to_string(), "Backend returned HTTP 404");
        assert_eq!(
            ApiError::Network("connection refused".into()).to_string(),
            "Network error: connection refused"
        );
    }
}
