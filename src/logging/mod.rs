// Logging module - In-memory activity capture for TUI display
//
// A custom tracing layer records events into a bounded ring buffer that the
// activity panel renders. Writing to stderr while the alternate screen is up
// would garble the display, so in TUI mode this layer replaces the fmt layer.

use chrono::{DateTime, Local};
use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::{Arc, Mutex};
use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// Maximum number of entries kept in memory
pub const MAX_ACTIVITY_ENTRIES: usize = 200;

/// A single event captured from tracing
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Local>,
    pub level: ActivityLevel,
    /// Message followed by `key=value` pairs for the structured fields
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<&Level> for ActivityLevel {
    fn from(level: &Level) -> Self {
        match *level {
            Level::ERROR => ActivityLevel::Error,
            Level::WARN => ActivityLevel::Warn,
            Level::INFO => ActivityLevel::Info,
            Level::DEBUG => ActivityLevel::Debug,
            Level::TRACE => ActivityLevel::Trace,
        }
    }
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Error => "ERROR",
            ActivityLevel::Warn => "WARN",
            ActivityLevel::Info => "INFO",
            ActivityLevel::Debug => "DEBUG",
            ActivityLevel::Trace => "TRACE",
        }
    }
}

/// Shared ring buffer of recent activity
#[derive(Clone)]
pub struct ActivityLog {
    entries: Arc<Mutex<VecDeque<ActivityEntry>>>,
    capacity: usize,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::with_capacity(MAX_ACTIVITY_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    /// Add an entry, dropping the oldest once full
    pub fn push(&self, entry: ActivityEntry) {
        // A poisoned lock only means a panic mid-push; the deque is still usable
        let mut entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// The newest `n` entries, oldest first
    pub fn recent(&self, n: usize) -> Vec<ActivityEntry> {
        let entries = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let skip = entries.len().saturating_sub(n);
        entries.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracing layer that copies every event it sees into an `ActivityLog`
pub struct ActivityLayer {
    log: ActivityLog,
}

impl ActivityLayer {
    pub fn new(log: ActivityLog) -> Self {
        Self { log }
    }
}

impl<S> Layer<S> for ActivityLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        self.log.push(ActivityEntry {
            timestamp: Local::now(),
            level: ActivityLevel::from(event.metadata().level()),
            message: visitor.finish(),
        });
    }

    fn enabled(&self, _metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        // Filtering happens at the subscriber level
        true
    }
}

/// Collects the message and the remaining fields of one event
#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: String,
}

impl FieldVisitor {
    fn finish(self) -> String {
        if self.fields.is_empty() {
            self.message
        } else if self.message.is_empty() {
            self.fields
        } else {
            format!("{} {}", self.message, self.fields)
        }
    }

    fn push_field(&mut self, name: &str, value: &dyn std::fmt::Display) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", name, value);
    }
}

impl tracing::field::Visit for FieldVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), &value);
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        let rendered = format!("{:?}", value);
        if field.name() == "message" {
            self.message = rendered;
        } else {
            self.push_field(field.name(), &rendered);
        }
    }
}
