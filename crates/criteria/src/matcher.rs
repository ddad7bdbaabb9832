//! Matching one field value against one condition.

use std::cmp::Ordering;

use crate::condition::{FilterCondition, Operand};
use crate::operator::Operator;
use crate::value::Value;

/// Evaluates a single condition against a single field value.
///
/// Matching is total: it never panics and never errors. A null field value
/// matches only `specified=false`. Every other operator, `equals` and
/// `notEquals` included, is false on null.
pub struct FieldMatcher;

impl FieldMatcher {
    /// Returns true if `value` satisfies `condition`.
    pub fn matches(value: Option<&Value>, condition: &FilterCondition) -> bool {
        let operator = condition.operator();
        let operand = condition.operand();

        if let (Operator::Specified, Operand::Flag(expected)) = (operator, operand) {
            return value.is_some() == *expected;
        }

        let Some(value) = value else {
            return false;
        };

        match (operator, operand) {
            (Operator::Equals, Operand::Single(expected)) => value.same_as(expected),
            (Operator::NotEquals, Operand::Single(expected)) => {
                value.compare(expected).is_some_and(|o| o != Ordering::Equal)
            }
            (Operator::In, Operand::Many(expected)) => expected.iter().any(|e| value.same_as(e)),
            (Operator::NotIn, Operand::Many(expected)) => {
                expected.iter().all(|e| value.compare(e).is_some_and(|o| o != Ordering::Equal))
            }
            (Operator::Contains, Operand::Single(expected)) => {
                substring(value, expected).unwrap_or(false)
            }
            (Operator::DoesNotContain, Operand::Single(expected)) => {
                substring(value, expected).is_some_and(|found| !found)
            }
            (Operator::GreaterThan, Operand::Single(expected)) => {
                ordered(value, expected, |o| o == Ordering::Greater)
            }
            (Operator::GreaterThanOrEqual, Operand::Single(expected)) => {
                ordered(value, expected, |o| o != Ordering::Less)
            }
            (Operator::LessThan, Operand::Single(expected)) => {
                ordered(value, expected, |o| o == Ordering::Less)
            }
            (Operator::LessThanOrEqual, Operand::Single(expected)) => {
                ordered(value, expected, |o| o != Ordering::Greater)
            }
            // Operand shapes are fixed by FilterCondition::new.
            _ => false,
        }
    }
}

/// Case-sensitive substring test. `None` when either side is not text.
fn substring(value: &Value, needle: &Value) -> Option<bool> {
    match (value, needle) {
        (Value::Text(haystack), Value::Text(needle)) => Some(haystack.contains(needle.as_str())),
        _ => None,
    }
}

fn ordered(value: &Value, expected: &Value, accept: impl Fn(Ordering) -> bool) -> bool {
    value.compare(expected).is_some_and(accept)
}
