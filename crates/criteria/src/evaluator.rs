//! Combining conditions into a single record predicate.
//!
//! This module provides the [`CriteriaEvaluator`], which ANDs every condition
//! of a [`Criteria`] into one predicate over records of an entity type.
//!
//! # Example
//!
//! ```
//! use fleetbooks_criteria::{CriteriaEvaluator, DescriptorSet, FieldType, FilterParser, Value};
//!
//! struct Vehicle {
//!     id: i64,
//!     make: String,
//! }
//!
//! let fields = DescriptorSet::<Vehicle>::builder("Vehicle")
//!     .id("id", |v| Some(Value::Integer(v.id)))
//!     .field("make", FieldType::Text, |v| Some(Value::Text(v.make.clone())))
//!     .build();
//!
//! let criteria = FilterParser::parse_filters(&fields, [("make.equals", "Volvo")]).unwrap();
//! let evaluator = CriteriaEvaluator::new(&fields, &criteria).unwrap();
//!
//! let vehicles = vec![
//!     Vehicle { id: 1, make: "Volvo".to_string() },
//!     Vehicle { id: 2, make: "Scania".to_string() },
//! ];
//! let matched = evaluator.filter_records(&vehicles);
//! assert_eq!(matched.len(), 1);
//! assert_eq!(matched[0].id, 1);
//! ```

use crate::condition::{Criteria, FilterCondition};
use crate::descriptor::{Accessor, DescriptorSet};
use crate::error::{FilterError, FilterResult};
use crate::matcher::FieldMatcher;

/// A condition bound to the accessor of its field.
struct BoundCondition<'a, R> {
    accessor: Accessor<R>,
    condition: &'a FilterCondition,
}

/// Evaluates criteria against records.
///
/// Building the evaluator resolves every field once and re-checks operator
/// support, so evaluation itself cannot fail. The evaluator holds no mutable
/// state and can be shared between threads.
pub struct CriteriaEvaluator<'a, R> {
    bound: Vec<BoundCondition<'a, R>>,
}

impl<'a, R> CriteriaEvaluator<'a, R> {
    /// Creates an evaluator for `criteria` over records described by `descriptors`.
    ///
    /// # Errors
    ///
    /// - `FilterError::UnknownFilterField` if a condition names a field the
    ///   descriptors do not have.
    /// - `FilterError::UnsupportedOperatorForType` if a condition's operator
    ///   does not apply to its field's type.
    pub fn new(descriptors: &DescriptorSet<R>, criteria: &'a Criteria) -> FilterResult<Self> {
        let bound = criteria
            .iter()
            .map(|condition| {
                let descriptor = descriptors.get(condition.field()).ok_or_else(|| {
                    FilterError::unknown_field(
                        descriptors.entity(),
                        condition.field(),
                        descriptors.suggest(condition.field()).map(str::to_string),
                    )
                })?;

                let field_type = descriptor.field_type();
                if !condition.operator().supports(&field_type) {
                    return Err(FilterError::unsupported_operator(
                        condition.field(),
                        condition.operator(),
                        field_type,
                    ));
                }

                Ok(BoundCondition {
                    accessor: descriptor.accessor(),
                    condition,
                })
            })
            .collect::<FilterResult<Vec<_>>>()?;

        Ok(Self { bound })
    }

    /// Returns true if `record` satisfies every condition.
    ///
    /// Criteria without conditions accept every record.
    pub fn matches(&self, record: &R) -> bool {
        self.bound.iter().all(|b| {
            let value = (b.accessor)(record);
            FieldMatcher::matches(value.as_ref(), b.condition)
        })
    }

    /// Returns the evaluator as a plain predicate closure.
    pub fn predicate(&self) -> impl Fn(&R) -> bool + '_ {
        move |record| self.matches(record)
    }

    /// Filters a slice of records, returning only those that match.
    pub fn filter_records<'b>(&self, records: &'b [R]) -> Vec<&'b R> {
        records.iter().filter(|record| self.matches(record)).collect()
    }

    /// Returns the number of bound conditions.
    pub fn len(&self) -> usize {
        self.bound.len()
    }

    /// Returns true if the evaluator accepts every record.
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty()
    }
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
