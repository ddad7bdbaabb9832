//! Error types for criteria parsing and evaluation.

use thiserror::Error;

use crate::operator::Operator;
use crate::value::FieldType;

/// A specialized Result type for criteria operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors raised while turning query parameters into criteria.
///
/// All of these are detected before any record is looked at. They are
/// deterministic functions of the input and never worth retrying.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// The operator suffix or operand could not be understood.
    #[error("invalid filter '{parameter}': {reason}")]
    InvalidFilterSyntax {
        /// The offending parameter, as the caller wrote it.
        parameter: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The parameter names a field the entity does not have.
    #[error("unknown filter field '{field}' for {entity}{}", suggestion_suffix(.suggestion))]
    UnknownFilterField {
        /// The entity whose descriptors were consulted.
        entity: String,
        /// The unrecognized field name.
        field: String,
        /// The closest known field name, if one is near enough.
        suggestion: Option<String>,
    },

    /// The operator exists but cannot be applied to this field's type.
    #[error("operator '{operator}' is not supported for {field_type} field '{field}'")]
    UnsupportedOperatorForType {
        /// The field the operator was applied to.
        field: String,
        /// The rejected operator.
        operator: Operator,
        /// The field's declared type.
        field_type: FieldType,
    },
}

/// Discriminant of [`FilterError`] for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterErrorKind {
    /// See [`FilterError::InvalidFilterSyntax`].
    InvalidFilterSyntax,
    /// See [`FilterError::UnknownFilterField`].
    UnknownFilterField,
    /// See [`FilterError::UnsupportedOperatorForType`].
    UnsupportedOperatorForType,
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

impl FilterError {
    /// Creates an invalid syntax error.
    pub fn invalid_syntax(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        FilterError::InvalidFilterSyntax {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unknown field error.
    pub fn unknown_field(
        entity: impl Into<String>,
        field: impl Into<String>,
        suggestion: Option<String>,
    ) -> Self {
        FilterError::UnknownFilterField {
            entity: entity.into(),
            field: field.into(),
            suggestion,
        }
    }

    /// Creates an unsupported operator error.
    pub fn unsupported_operator(
        field: impl Into<String>,
        operator: Operator,
        field_type: FieldType,
    ) -> Self {
        FilterError::UnsupportedOperatorForType {
            field: field.into(),
            operator,
            field_type,
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> FilterErrorKind {
        match self {
            FilterError::InvalidFilterSyntax { .. } => FilterErrorKind::InvalidFilterSyntax,
            FilterError::UnknownFilterField { .. } => FilterErrorKind::UnknownFilterField,
            FilterError::UnsupportedOperatorForType { .. } => {
                FilterErrorKind::UnsupportedOperatorForType
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_field_message_without_suggestion() {
        let err = FilterError::unknown_field("BankAccount", "bogus", None);
        assert_eq!(
            err.to_string(),
            "unknown filter field 'bogus' for BankAccount"
        );
        assert_eq!(err.kind(), FilterErrorKind::UnknownFilterField);
    }

    #[test]
    fn test_unknown_field_message_with_suggestion() {
        let err = FilterError::unknown_field("BankAccount", "nmae", Some("name".to_string()));
        assert_eq!(
            err.to_string(),
            "unknown filter field 'nmae' for BankAccount (did you mean 'name'?)"
        );
    }

    #[test]
    fn test_unsupported_operator_message() {
        let err = FilterError::unsupported_operator("active", Operator::Contains, FieldType::Boolean);
        assert_eq!(
            err.to_string(),
            "operator 'contains' is not supported for boolean field 'active'"
        );
        assert_eq!(err.kind(), FilterErrorKind::UnsupportedOperatorForType);
    }

    #[test]
    fn test_invalid_syntax_message() {
        let err = FilterError::invalid_syntax("id.greaterThan", "expected an integer, got 'abc'");
        assert_eq!(
            err.to_string(),
            "invalid filter 'id.greaterThan': expected an integer, got 'abc'"
        );
        assert_eq!(err.kind(), FilterErrorKind::InvalidFilterSyntax);
    }
}
