//! Form state holders
//!
//! A `FormState` is a flat name → string map for one in-progress form, driven
//! by a static field table. Pages own one holder per create/record action, so
//! no state is shared between forms. Parsing helpers turn the raw strings into
//! typed values and report the first problem as a `FormError`.

use super::notice::Notice;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Date format accepted by every date field and sent to the backend
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// How a field is edited in the form panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    /// Fixed option list, cycled with ←/→
    Choice(&'static [&'static str]),
    /// Options supplied at runtime by the owning page (feed types in stock, active flocks)
    Lookup,
}

impl FieldKind {
    pub fn is_selectable(&self) -> bool {
        matches!(self, FieldKind::Choice(_) | FieldKind::Lookup)
    }
}

/// Static description of one form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub default: &'static str,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            default: "",
            required: true,
        }
    }

    pub const fn with_default(self, default: &'static str) -> Self {
        Self { default, ..self }
    }

    pub const fn optional(self) -> Self {
        Self {
            required: false,
            ..self
        }
    }
}

/// Reasons a submission is refused before any network call
#[derive(Debug, Clone, PartialEq)]
pub enum FormError {
    MissingField {
        label: &'static str,
    },
    InvalidNumber {
        label: &'static str,
        value: String,
    },
    NotPositive {
        label: &'static str,
    },
    InvalidDate {
        label: &'static str,
        value: String,
    },
    /// A computed amount no longer fits the number type
    TooLarge {
        label: &'static str,
    },
    UnknownFeedType {
        feed_type: String,
    },
    InsufficientStock {
        feed_type: String,
        available: f64,
        requested: f64,
        unit: String,
    },
    /// Consumption entered in a different unit than the stock is kept in
    UnitMismatch {
        feed_type: String,
        stock_unit: String,
        entered: String,
    },
    /// The same form already has a request in flight
    Busy,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField { label } => write!(f, "{} is required", label),
            Self::InvalidNumber { label, value } => {
                write!(f, "{} must be a number (got {:?})", label, value)
            }
            Self::NotPositive { label } => write!(f, "{} must be greater than zero", label),
            Self::InvalidDate { label, value } => {
                write!(f, "{} must be a date as YYYY-MM-DD (got {:?})", label, value)
            }
            Self::TooLarge { label } => write!(f, "{} is too large", label),
            Self::UnknownFeedType { feed_type } => {
                write!(f, "Feed type {:?} is not in inventory", feed_type)
            }
            Self::InsufficientStock {
                feed_type,
                available,
                requested,
                unit,
            } => write!(
                f,
                "Only {} {} of {} in stock, {} {} requested",
                available, unit, feed_type, requested, unit
            ),
            Self::UnitMismatch {
                feed_type,
                stock_unit,
                entered,
            } => write!(
                f,
                "{} is stocked in {}, not {}",
                feed_type, stock_unit, entered
            ),
            Self::Busy => write!(f, "A previous submission is still in progress"),
        }
    }
}

impl std::error::Error for FormError {}

impl FormError {
    /// Destructive notice for this failure
    pub fn notice(&self) -> Notice {
        let title = match self {
            Self::MissingField { .. }
            | Self::InvalidNumber { .. }
            | Self::NotPositive { .. }
            | Self::InvalidDate { .. }
            | Self::TooLarge { .. }
            | Self::UnitMismatch { .. } => "Validation error",
            Self::UnknownFeedType { .. } | Self::InsufficientStock { .. } => "Insufficient stock",
            Self::Busy => "Please wait",
        };
        Notice::error(title, self.to_string())
    }
}

/// In-progress input for a single form
#[derive(Debug, Clone)]
pub struct FormState {
    fields: &'static [FieldSpec],
    values: Vec<String>,
    /// Field under edit in the form panel
    cursor: usize,
}

impl FormState {
    pub fn new(fields: &'static [FieldSpec]) -> Self {
        Self {
            fields,
            values: fields.iter().map(|f| f.default.to_string()).collect(),
            cursor: 0,
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    fn label_of(&self, name: &str) -> &'static str {
        self.index_of(name)
            .map(|i| self.fields[i].label)
            .unwrap_or("Field")
    }

    /// Raw value of a field ("" for unknown names)
    pub fn get(&self, name: &str) -> &str {
        self.index_of(name)
            .map(|i| self.values[i].as_str())
            .unwrap_or("")
    }

    /// Set a field value; returns false for unknown field names
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        match self.index_of(name) {
            Some(i) => {
                self.values[i] = value.into();
                true
            }
            None => false,
        }
    }

    pub fn value_at(&self, index: usize) -> &str {
        self.values.get(index).map(String::as_str).unwrap_or("")
    }

    /// Back to defaults with the cursor on the first field
    pub fn reset(&mut self) {
        for (value, spec) in self.values.iter_mut().zip(self.fields) {
            *value = spec.default.to_string();
        }
        self.cursor = 0;
    }

    /// Fails on the first required field that is blank
    pub fn validate(&self) -> Result<(), FormError> {
        for (spec, value) in self.fields.iter().zip(&self.values) {
            if spec.required && value.trim().is_empty() {
                return Err(FormError::MissingField { label: spec.label });
            }
        }
        Ok(())
    }

    /// Trimmed owned copy of a field
    pub fn text(&self, name: &str) -> String {
        self.get(name).trim().to_string()
    }

    /// Positive, finite float (feed quantities)
    pub fn quantity(&self, name: &str) -> Result<f64, FormError> {
        let raw = self.get(name).trim();
        let label = self.label_of(name);
        let value: f64 = raw.parse().map_err(|_| FormError::InvalidNumber {
            label,
            value: raw.to_string(),
        })?;
        if !value.is_finite() {
            return Err(FormError::InvalidNumber {
                label,
                value: raw.to_string(),
            });
        }
        if value <= 0.0 {
            return Err(FormError::NotPositive { label });
        }
        Ok(value)
    }

    /// Positive whole number (bird head counts)
    pub fn count(&self, name: &str) -> Result<u32, FormError> {
        let raw = self.get(name).trim();
        let label = self.label_of(name);
        let value: u32 = raw.parse().map_err(|_| FormError::InvalidNumber {
            label,
            value: raw.to_string(),
        })?;
        if value == 0 {
            return Err(FormError::NotPositive { label });
        }
        Ok(value)
    }

    /// Positive exact decimal (sale quantities and prices)
    pub fn decimal(&self, name: &str) -> Result<Decimal, FormError> {
        let raw = self.get(name).trim();
        let label = self.label_of(name);
        let value = Decimal::from_str(raw).map_err(|_| FormError::InvalidNumber {
            label,
            value: raw.to_string(),
        })?;
        if value <= Decimal::ZERO {
            return Err(FormError::NotPositive { label });
        }
        Ok(value)
    }

    pub fn date(&self, name: &str) -> Result<NaiveDate, FormError> {
        let raw = self.get(name).trim();
        NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| FormError::InvalidDate {
            label: self.label_of(name),
            value: raw.to_string(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cursor editing (form panel)
    // ─────────────────────────────────────────────────────────────────────────

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn focused(&self) -> Option<&'static FieldSpec> {
        self.fields.get(self.cursor)
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.cursor = (self.cursor + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.cursor = self
                .cursor
                .checked_sub(1)
                .unwrap_or(self.fields.len() - 1);
        }
    }

    /// Append a typed character to the focused field (ignored on choice fields)
    pub fn push_char(&mut self, c: char) {
        let Some(spec) = self.focused() else {
            return;
        };
        let accepted = match spec.kind {
            FieldKind::Choice(_) | FieldKind::Lookup => false,
            FieldKind::Number => c.is_ascii_digit() || c == '.',
            FieldKind::Date => c.is_ascii_digit() || c == '-',
            FieldKind::Text => !c.is_control(),
        };
        if accepted {
            self.values[self.cursor].push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(value) = self.values.get_mut(self.cursor) {
            value.pop();
        }
    }

    /// Step the focused field through `options`, wrapping at both ends.
    /// A value not in the list jumps to the first (or last) option.
    pub fn cycle<S: AsRef<str>>(&mut self, options: &[S], forward: bool) {
        if options.is_empty() {
            return;
        }
        let current = self.value_at(self.cursor);
        let position = options.iter().position(|o| o.as_ref() == current);
        let next = match (position, forward) {
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => i.checked_sub(1).unwrap_or(options.len() - 1),
            (None, true) => 0,
            (None, false) => options.len() - 1,
        };
        self.values[self.cursor] = options[next].as_ref().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const CHOICES: &[&str] = &["kg", "lbs", "g"];
    const FIELDS: &[FieldSpec] = &[
        FieldSpec::required("quantity", "Quantity", FieldKind::Number),
        FieldSpec::required("unit", "Unit", FieldKind::Choice(CHOICES)).with_default("kg"),
        FieldSpec::required("date", "Date", FieldKind::Date),
        FieldSpec::required("note", "Note", FieldKind::Text).optional(),
    ];

    #[test]
    fn test_new_form_uses_defaults() {
        let form = FormState::new(FIELDS);
        assert_eq!(form.get("quantity"), "");
        assert_eq!(form.get("unit"), "kg");
        assert_eq!(form.get("missing"), "");
    }

    #[test]
    fn test_validate_reports_first_blank_required_field() {
        let mut form = FormState::new(FIELDS);
        form.set("quantity", "   ");
        assert_eq!(
            form.validate(),
            Err(FormError::MissingField { label: "Quantity" })
        );

        form.set("quantity", "10");
        assert_eq!(form.validate(), Err(FormError::MissingField { label: "Date" }));

        // optional field may stay empty
        form.set("date", "2025-01-25");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_quantity_rejects_nan_and_garbage() {
        let mut form = FormState::new(FIELDS);
        for bad in ["abc", "NaN", "inf", "1.2.3"] {
            form.set("quantity", bad);
            assert!(
                matches!(form.quantity("quantity"), Err(FormError::InvalidNumber { .. })),
                "{bad} should not parse"
            );
        }
        form.set("quantity", "0");
        assert_eq!(
            form.quantity("quantity"),
            Err(FormError::NotPositive { label: "Quantity" })
        );
        form.set("quantity", " 12.5 ");
        assert_eq!(form.quantity("quantity"), Ok(12.5));
    }

    #[test]
    fn test_count_and_decimal_parsing() {
        let mut form = FormState::new(FIELDS);
        form.set("quantity", "500");
        assert_eq!(form.count("quantity"), Ok(500));
        form.set("quantity", "12.5");
        assert!(form.count("quantity").is_err());
        assert_eq!(form.decimal("quantity"), Ok(dec!(12.5)));
    }

    #[test]
    fn test_date_parsing() {
        let mut form = FormState::new(FIELDS);
        form.set("date", "2025-02-30");
        assert!(matches!(
            form.date("date"),
            Err(FormError::InvalidDate { .. })
        ));
        form.set("date", "2025-02-28");
        assert_eq!(
            form.date("date"),
            Ok(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap())
        );
    }

    #[test]
    fn test_reset_restores_defaults_and_cursor() {
        let mut form = FormState::new(FIELDS);
        form.set("quantity", "3");
        form.set("unit", "g");
        form.focus_next();
        form.reset();
        assert_eq!(form.get("quantity"), "");
        assert_eq!(form.get("unit"), "kg");
        assert_eq!(form.cursor(), 0);
    }

    #[test]
    fn test_typing_respects_field_kind() {
        let mut form = FormState::new(FIELDS);
        for c in "1a2.5".chars() {
            form.push_char(c);
        }
        assert_eq!(form.get("quantity"), "12.5");

        // choice field ignores typing
        form.focus_next();
        form.push_char('x');
        assert_eq!(form.get("unit"), "kg");

        form.focus_prev();
        form.pop_char();
        assert_eq!(form.get("quantity"), "12.");
    }

    #[test]
    fn test_cycle_wraps_both_ways() {
        let mut form = FormState::new(FIELDS);
        form.focus_next();
        form.cycle(CHOICES, true);
        assert_eq!(form.get("unit"), "lbs");
        form.cycle(CHOICES, true);
        form.cycle(CHOICES, true);
        assert_eq!(form.get("unit"), "kg");
        form.cycle(CHOICES, false);
        assert_eq!(form.get("unit"), "g");
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = FormState::new(FIELDS);
        form.focus_prev();
        assert_eq!(form.cursor(), FIELDS.len() - 1);
        form.focus_next();
        assert_eq!(form.cursor(), 0);
    }

    #[test]
    fn test_error_notice_is_destructive() {
        let notice = FormError::MissingField { label: "Date" }.notice();
        assert!(notice.is_error());
        assert_eq!(notice.title, "Validation error");
        assert_eq!(notice.message, "Date is required");
    }
}
