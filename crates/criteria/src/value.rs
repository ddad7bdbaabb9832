//! Field types and the typed values filters compare against.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

/// Date format accepted for [`FieldType::Date`] operands.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// The declared type of a filterable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Free text, compared case-sensitively.
    Text,
    /// Signed 64-bit integer.
    Integer,
    /// Exact decimal (amounts, balances, distances).
    Decimal,
    /// Calendar date without time zone.
    Date,
    /// Point in time, normalized to UTC.
    Instant,
    /// Closed set of named variants.
    Enum(&'static [&'static str]),
    /// `true` / `false`.
    Boolean,
}

impl FieldType {
    /// Returns true if values of this type have a natural ordering usable by
    /// the `greaterThan` family of operators.
    pub fn is_orderable(&self) -> bool {
        matches!(
            self,
            FieldType::Integer | FieldType::Decimal | FieldType::Date | FieldType::Instant
        )
    }

    /// Returns true if substring operators apply to this type.
    pub fn is_textual(&self) -> bool {
        matches!(self, FieldType::Text)
    }

    /// Returns a short lowercase name for messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Integer => "integer",
            FieldType::Decimal => "decimal",
            FieldType::Date => "date",
            FieldType::Instant => "instant",
            FieldType::Enum(_) => "enum",
            FieldType::Boolean => "boolean",
        }
    }

    /// Converts one raw operand into a value of this type.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when `raw` is not a valid literal for
    /// this type. The parser wraps it into `InvalidFilterSyntax`.
    pub fn parse_value(&self, raw: &str) -> Result<Value, String> {
        match self {
            FieldType::Text => Ok(Value::Text(raw.to_string())),
            FieldType::Integer => i64::from_str(raw)
                .map(Value::Integer)
                .map_err(|_| format!("expected an integer, got '{raw}'")),
            FieldType::Decimal => Decimal::from_str(raw)
                .map(Value::Decimal)
                .map_err(|_| format!("expected a decimal number, got '{raw}'")),
            FieldType::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map(Value::Date)
                .map_err(|_| format!("expected a date (YYYY-MM-DD), got '{raw}'")),
            FieldType::Instant => DateTime::parse_from_rfc3339(raw)
                .map(|dt| Value::Instant(dt.with_timezone(&Utc)))
                .map_err(|_| format!("expected an RFC 3339 timestamp, got '{raw}'")),
            FieldType::Enum(variants) => {
                if variants.contains(&raw) {
                    Ok(Value::Enum(raw.to_string()))
                } else {
                    Err(format!(
                        "expected one of [{}], got '{raw}'",
                        variants.join(", ")
                    ))
                }
            }
            FieldType::Boolean => parse_bool(raw).map(Value::Boolean),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses the literal `true` or `false`.
pub(crate) fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(format!("expected 'true' or 'false', got '{raw}'")),
    }
}

/// A typed field value, either read from a record or parsed from an operand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Text(String),
    Integer(i64),
    Decimal(Decimal),
    Date(NaiveDate),
    Instant(DateTime<Utc>),
    Enum(String),
    Boolean(bool),
}

impl Value {
    /// Compares two values of the same variant by their natural ordering.
    ///
    /// Returns `None` when the variants differ. Decimals compare numerically,
    /// so `1.0` and `1.00` are equal.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Instant(a), Value::Instant(b)) => Some(a.cmp(b)),
            (Value::Enum(a), Value::Enum(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Returns true if both values are of the same variant and equal.
    pub fn same_as(&self, other: &Value) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }

    /// Returns the text content for text and enum values.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) | Value::Enum(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{n}"),
            Value::Decimal(d) => write!(f, "{d}"),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::Instant(t) => write!(f, "{}", t.to_rfc3339()),
            Value::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Instant(t)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}
