//! Filter operators and the types they apply to.

use std::fmt;

use crate::value::FieldType;

/// A comparison operator, written as the suffix of a query parameter key
/// (`name.contains=Foo`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Equals,
    NotEquals,
    In,
    NotIn,
    /// `true` selects non-null values, `false` selects nulls.
    Specified,
    Contains,
    DoesNotContain,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Operator; 11] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::In,
        Operator::NotIn,
        Operator::Specified,
        Operator::Contains,
        Operator::DoesNotContain,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
    ];

    /// Looks up an operator by its exact query-parameter suffix.
    ///
    /// Matching is case-sensitive: `greaterThan` is recognized, `greaterthan`
    /// is not.
    pub fn from_suffix(suffix: &str) -> Option<Operator> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_suffix() == suffix)
    }

    /// Returns the query-parameter suffix for this operator.
    pub fn as_suffix(&self) -> &'static str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "notEquals",
            Operator::In => "in",
            Operator::NotIn => "notIn",
            Operator::Specified => "specified",
            Operator::Contains => "contains",
            Operator::DoesNotContain => "doesNotContain",
            Operator::GreaterThan => "greaterThan",
            Operator::GreaterThanOrEqual => "greaterThanOrEqual",
            Operator::LessThan => "lessThan",
            Operator::LessThanOrEqual => "lessThanOrEqual",
        }
    }

    /// Returns true for operators taking a comma-separated list of operands.
    pub fn is_multi_valued(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    /// Returns true for the substring operators.
    pub fn is_substring(&self) -> bool {
        matches!(self, Operator::Contains | Operator::DoesNotContain)
    }

    /// Returns true for the ordering operators.
    pub fn is_ordering(&self) -> bool {
        matches!(
            self,
            Operator::GreaterThan
                | Operator::GreaterThanOrEqual
                | Operator::LessThan
                | Operator::LessThanOrEqual
        )
    }

    /// Returns true if this operator can be applied to a field of `field_type`.
    ///
    /// Equality, membership and `specified` apply to every type. Substring
    /// operators need text. Ordering operators need an orderable type.
    pub fn supports(&self, field_type: &FieldType) -> bool {
        if self.is_substring() {
            field_type.is_textual()
        } else if self.is_ordering() {
            field_type.is_orderable()
        } else {
            true
        }
    }

    /// Returns the operators applicable to `field_type`.
    pub fn supported_for(field_type: &FieldType) -> Vec<Operator> {
        Operator::ALL
            .into_iter()
            .filter(|op| op.supports(field_type))
            .collect()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_suffix())
    }
}
