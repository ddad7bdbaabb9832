//! Error types for ledger operations.

use fleetbooks_criteria::FilterError;
use thiserror::Error;

/// Errors returned by repository and dispatch operations on a [`Ledger`](crate::Ledger).
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The query could not be parsed or evaluated.
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// No record of this kind has the requested id.
    #[error("{entity} with id {id} not found")]
    RecordNotFound {
        /// Entity name, e.g. `Invoice`.
        entity: &'static str,
        /// The id that was looked up.
        id: i64,
    },

    /// A record passed to `create` already carries an id.
    #[error("a new {entity} cannot already have an id (got {id})")]
    IdAlreadyAssigned { entity: &'static str, id: i64 },

    /// A record passed to `update` has no id.
    #[error("{entity} id is required for an update")]
    MissingId { entity: &'static str },

    /// The record's id differs from the id being written.
    #[error("{entity} id {found} does not match the target id {expected}")]
    IdMismatch {
        entity: &'static str,
        expected: i64,
        found: i64,
    },

    /// The id sequence cannot advance past `last_id`.
    #[error("id sequence exhausted after {last_id}")]
    IdSequenceExhausted { last_id: i64 },

    /// Built-in demo data could not be constructed.
    #[error("invalid seed data: {reason}")]
    InvalidSeed { reason: String },

    /// A partial update is not an object or leaves the record unreadable.
    #[error("invalid patch for {entity}: {reason}")]
    InvalidPatch { entity: &'static str, reason: String },

    /// An entity name that matches no known kind.
    #[error("unknown entity '{name}'{}", suggestion_suffix(.suggestion))]
    UnknownEntity {
        name: String,
        suggestion: Option<&'static str>,
    },

    /// A record could not be converted to or from JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn suggestion_suffix(suggestion: &Option<&'static str>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use fleetbooks_criteria::FilterErrorKind;

    #[test]
    fn test_not_found_message() {
        let err = LedgerError::RecordNotFound {
            entity: "Invoice",
            id: 42,
        };
        assert_eq!(err.to_string(), "Invoice with id 42 not found");
    }

    #[test]
    fn test_filter_error_is_transparent() {
        let err: LedgerError = FilterError::unknown_field("Vehicle", "bogus", None).into();
        assert_eq!(err.to_string(), "unknown filter field 'bogus' for Vehicle");
        match err {
            LedgerError::Filter(inner) => assert_eq!(inner.kind(), FilterErrorKind::UnknownFilterField),
            other => panic!("expected filter error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_entity_suggestion() {
        let err = LedgerError::UnknownEntity {
            name: "invoice".to_string(),
            suggestion: Some("invoices"),
        };
        assert_eq!(err.to_string(), "unknown entity 'invoice' (did you mean 'invoices'?)");

        let err = LedgerError::UnknownEntity {
            name: "widgets".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "unknown entity 'widgets'");
    }
}
