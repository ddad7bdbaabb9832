//! Filter conditions and the criteria built from them.

use std::fmt;

use crate::error::{FilterError, FilterResult};
use crate::operator::Operator;
use crate::value::Value;

/// The right-hand side of a filter condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// One value, for the unary operators.
    Single(Value),
    /// One or more values, for `in` / `notIn`.
    Many(Vec<Value>),
    /// The boolean argument of `specified`.
    Flag(bool),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Single(value) => write!(f, "{value}"),
            Operand::Many(values) => {
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
            Operand::Flag(flag) => write!(f, "{flag}"),
        }
    }
}

/// One `field.operator=value` triple.
///
/// Conditions are immutable once built. [`FilterCondition::new`] checks that
/// the operand shape fits the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCondition {
    field: String,
    operator: Operator,
    operand: Operand,
}

impl FilterCondition {
    /// Creates a condition, validating the operand against the operator.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidFilterSyntax` if `in`/`notIn` receive
    /// anything but a non-empty list, `specified` receives anything but a
    /// flag, or another operator receives anything but a single value.
    pub fn new(field: impl Into<String>, operator: Operator, operand: Operand) -> FilterResult<Self> {
        let field = field.into();
        let shape_ok = match (&operator, &operand) {
            (Operator::Specified, Operand::Flag(_)) => true,
            (op, Operand::Many(values)) if op.is_multi_valued() => !values.is_empty(),
            (op, Operand::Single(_)) => !op.is_multi_valued() && *op != Operator::Specified,
            _ => false,
        };

        if !shape_ok {
            return Err(FilterError::invalid_syntax(
                format!("{field}.{operator}"),
                format!("operand '{operand}' does not fit operator '{operator}'"),
            ));
        }

        Ok(Self {
            field,
            operator,
            operand,
        })
    }

    /// Shorthand for `field.equals=value`.
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> FilterResult<Self> {
        Self::new(field, Operator::Equals, Operand::Single(value.into()))
    }

    /// Shorthand for `field.specified=flag`.
    pub fn specified(field: impl Into<String>, flag: bool) -> FilterResult<Self> {
        Self::new(field, Operator::Specified, Operand::Flag(flag))
    }

    /// Returns the field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Returns the operand.
    pub fn operand(&self) -> &Operand {
        &self.operand
    }
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}={}", self.field, self.operator, self.operand)
    }
}

/// An ordered list of conditions, combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    conditions: Vec<FilterCondition>,
}

impl Criteria {
    /// Criteria without conditions; matches every record.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates criteria from conditions, keeping their order.
    pub fn new(conditions: Vec<FilterCondition>) -> Self {
        Self { conditions }
    }

    /// Iterates over the conditions in order.
    pub fn iter(&self) -> std::slice::Iter<'_, FilterCondition> {
        self.conditions.iter()
    }

    /// Returns the number of conditions.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Returns true if there are no conditions.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl<'a> IntoIterator for &'a Criteria {
    type Item = &'a FilterCondition;
    type IntoIter = std::slice::Iter<'a, FilterCondition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<FilterCondition> for Criteria {
    fn from_iter<I: IntoIterator<Item = FilterCondition>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{condition}")?;
        }
        Ok(())
    }
}
