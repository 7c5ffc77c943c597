// Components module - reusable UI building blocks
//
// Shell components are rendered in every view:
// - Nav bar: app name, page tabs, loading spinner
// - Status bar: backend, uptime, key hints
// - Activity panel: recent tracing events
//
// Page components (summary cards, record table, form panel) are composed by
// the views.

pub mod activity_panel;
pub mod form_panel;
pub mod nav_bar;
pub mod record_table;
pub mod status_bar;
pub mod summary_cards;
pub mod toast;

pub use record_table::RecordTable;
pub use summary_cards::Card;
pub use toast::Toast;
