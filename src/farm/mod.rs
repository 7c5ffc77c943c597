//! Farm records and page state
//!
//! Everything here is UI-framework free: pages own their collections and
//! forms, talk to the backend through `FarmApi`, and answer with `Notice`s
//! that the shell turns into toasts.

pub mod feed;
pub mod flock;
pub mod form;
pub mod notice;
pub mod sales;
pub mod table;

pub use feed::{FeedConsumptionRecord, FeedForm, FeedInventoryItem, FeedPage, FeedSummary, FeedTab};
pub use flock::{Flock, FlockPage, FlockStatus, FlockSummary};
pub use form::{FieldKind, FieldSpec, FormError, FormState};
pub use notice::{Notice, NoticeKind};
pub use sales::{format_money, SaleKind, SaleRecord, SalesPage, SalesSummary};

/// Today's date on the local clock (flock closure stamp)
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
