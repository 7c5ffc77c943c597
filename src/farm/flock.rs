//! Flock (bird lot) page state
//!
//! Holds the flock collection, the "create flock" form, and the ID search box.
//! Creation is confirmed against the backend; closure is a local mutation
//! because the backend exposes no closing endpoint.

use super::form::{FieldKind, FieldSpec, FormError, FormState, DATE_FORMAT};
use super::notice::Notice;
use crate::api::wire::NewBirdLot;
use crate::api::{ApiError, FarmApi};
use chrono::NaiveDate;

/// Bird types offered by the create form
pub const BIRD_TYPES: &[&str] = &["Broiler", "Layer", "Turkey", "Duck", "Quail"];

/// Create Flock form: required {quantity, birdType, startDate}
pub const CREATE_FLOCK_FIELDS: &[FieldSpec] = &[
    FieldSpec::required("quantity", "Quantity", FieldKind::Number),
    FieldSpec::required("birdType", "Bird type", FieldKind::Choice(BIRD_TYPES)),
    FieldSpec::required("startDate", "Start date", FieldKind::Date),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlockStatus {
    Active,
    Closed,
}

impl FlockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlockStatus::Active => "active",
            FlockStatus::Closed => "closed",
        }
    }
}

/// A tracked group of birds of one type
#[derive(Debug, Clone, PartialEq)]
pub struct Flock {
    pub id: String,
    pub bird_type: String,
    pub start_date: String,
    pub initial_quantity: u32,
    /// As reported by the backend; not adjusted locally
    pub current_quantity: u32,
    pub status: FlockStatus,
    pub closed_date: Option<String>,
}

impl Flock {
    pub fn is_active(&self) -> bool {
        self.status == FlockStatus::Active
    }
}

/// Aggregates shown in the flock summary cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlockSummary {
    pub total: usize,
    pub active: usize,
    pub closed: usize,
    /// Sum of current quantity across active lots
    pub active_birds: u64,
}

impl FlockSummary {
    pub fn from_flocks(flocks: &[Flock]) -> Self {
        flocks.iter().fold(Self::default(), |mut acc, flock| {
            acc.total += 1;
            if flock.is_active() {
                acc.active += 1;
                acc.active_birds += u64::from(flock.current_quantity);
            } else {
                acc.closed += 1;
            }
            acc
        })
    }
}

/// Case-insensitive substring match on flock ID; an empty query matches all
pub fn filter_by_id<'a>(flocks: &'a [Flock], query: &str) -> Vec<&'a Flock> {
    if query.is_empty() {
        return flocks.iter().collect();
    }
    let needle = query.to_lowercase();
    flocks
        .iter()
        .filter(|f| f.id.to_lowercase().contains(&needle))
        .collect()
}

/// Flock page: collection, create form, search box
#[derive(Debug, Clone)]
pub struct FlockPage {
    flocks: Vec<Flock>,
    pub form: FormState,
    pub form_open: bool,
    /// A create request is in flight
    pub submitting: bool,
    search: String,
}

impl Default for FlockPage {
    fn default() -> Self {
        Self::new()
    }
}

impl FlockPage {
    pub fn new() -> Self {
        Self {
            flocks: Vec::new(),
            form: FormState::new(CREATE_FLOCK_FIELDS),
            form_open: false,
            submitting: false,
            search: String::new(),
        }
    }

    pub fn flocks(&self) -> &[Flock] {
        &self.flocks
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Flocks matching the current search, recomputed on every call
    pub fn visible(&self) -> Vec<&Flock> {
        filter_by_id(&self.flocks, &self.search)
    }

    pub fn summary(&self) -> FlockSummary {
        FlockSummary::from_flocks(&self.flocks)
    }

    /// IDs of active flocks, offered by the consumption form
    pub fn active_ids(&self) -> Vec<String> {
        self.flocks
            .iter()
            .filter(|f| f.is_active())
            .map(|f| f.id.clone())
            .collect()
    }

    pub fn toggle_form(&mut self) {
        self.form_open = !self.form_open;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Load
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn load(&mut self, api: &dyn FarmApi) -> Result<usize, ApiError> {
        let result = api.list_flocks().await;
        self.apply_loaded(result)
    }

    /// Replace the collection on success; on failure log and keep what we have
    pub fn apply_loaded(&mut self, result: Result<Vec<Flock>, ApiError>) -> Result<usize, ApiError> {
        match result {
            Ok(flocks) => {
                tracing::info!(count = flocks.len(), "Loaded flocks");
                self.flocks = flocks;
                Ok(self.flocks.len())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load flocks");
                Err(e)
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Create
    // ─────────────────────────────────────────────────────────────────────────

    /// Validate the form and build the register payload
    pub fn prepare_create(&self) -> Result<NewBirdLot, FormError> {
        if self.submitting {
            return Err(FormError::Busy);
        }
        self.form.validate()?;
        let quantity = self.form.count("quantity")?;
        let start_date = self.form.date("startDate")?;

        Ok(NewBirdLot {
            bird_type: self.form.text("birdType"),
            initial_quantity: quantity,
            current_quantity: quantity,
            start_date: start_date.format(DATE_FORMAT).to_string(),
            status: FlockStatus::Active.as_str().to_string(),
        })
    }

    /// Apply the backend's answer to a create request
    pub fn complete_create(&mut self, result: Result<Flock, ApiError>) -> Notice {
        self.submitting = false;
        match result {
            Ok(flock) => {
                tracing::info!(id = %flock.id, "Flock created");
                let notice = Notice::success("Flock created", format!("Flock {} created", flock.id));
                self.flocks.push(flock);
                self.form.reset();
                self.form_open = false;
                notice
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create flock");
                Notice::error("Error", format!("Could not create the flock: {}", e))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Close
    // ─────────────────────────────────────────────────────────────────────────

    /// Mark a flock closed as of `today`. Closing a closed flock changes nothing.
    pub fn close_flock(&mut self, id: &str, today: NaiveDate) -> Notice {
        let Some(flock) = self.flocks.iter_mut().find(|f| f.id == id) else {
            return Notice::error("Error", format!("Flock {} not found", id));
        };

        if !flock.is_active() {
            return Notice::info("Already closed", format!("Flock {} is already closed", id));
        }

        flock.status = FlockStatus::Closed;
        flock.closed_date = Some(today.format(DATE_FORMAT).to_string());
        tracing::info!(id, "Flock closed");
        Notice::success("Flock closed", format!("Flock {} has been closed", id))
    }
}
