//! Attribute-filter criteria for fleetbooks records.
//!
//! This crate turns flat query parameters into typed filter conditions,
//! combines them into a predicate over records, and runs that predicate over
//! an in-memory slice with sorting, paging and exact counts. It knows nothing
//! about concrete entities: a record type takes part by implementing
//! [`Entity`] and describing its fields in a [`DescriptorSet`].
//!
//! # Query syntax
//!
//! - `<field>.<operator>=<value>`, e.g. `name.contains=Foo`,
//!   `id.greaterThanOrEqual=5`, `status.in=A,B`, `name.specified=true`
//! - `sort=<field>,<asc|desc>` (repeatable; default `id,asc`)
//! - `page=<n>` (0-based) and `size=<n>`
//!
//! ## Operators
//! - `equals`, `notEquals`, `in`, `notIn`, `specified` on every type
//! - `contains`, `doesNotContain` on text
//! - `greaterThan`, `greaterThanOrEqual`, `lessThan`, `lessThanOrEqual` on
//!   integers, decimals, dates and instants
//!
//! # Example
//!
//! ```
//! use std::sync::LazyLock;
//! use fleetbooks_criteria::{
//!     CriteriaEvaluator, DescriptorSet, Entity, FieldType, FilterParser, QueryExecutor, Value,
//! };
//!
//! struct BankAccount {
//!     id: i64,
//!     name: String,
//! }
//!
//! static FIELDS: LazyLock<DescriptorSet<BankAccount>> = LazyLock::new(|| {
//!     DescriptorSet::<BankAccount>::builder("BankAccount")
//!         .id("id", |a| Some(Value::Integer(a.id)))
//!         .field("name", FieldType::Text, |a| Some(Value::Text(a.name.clone())))
//!         .build()
//! });
//!
//! impl Entity for BankAccount {
//!     const NAME: &'static str = "BankAccount";
//!     fn descriptors() -> &'static DescriptorSet<Self> {
//!         &FIELDS
//!     }
//! }
//!
//! let accounts = vec![BankAccount { id: 1, name: "AAAAAAAAAA".to_string() }];
//! let request = FilterParser::parse_query_string(
//!     BankAccount::descriptors(),
//!     "name.equals=AAAAAAAAAA&sort=id,desc",
//! )
//! .unwrap();
//!
//! let evaluator = CriteriaEvaluator::new(BankAccount::descriptors(), &request.criteria).unwrap();
//! let executor = QueryExecutor::new(&accounts);
//! let page = executor
//!     .page(evaluator.predicate(), &request.sort, &request.page)
//!     .unwrap();
//! assert_eq!(page.total, 1);
//! ```

mod condition;
mod descriptor;
mod error;
mod evaluator;
mod matcher;
mod operator;
mod parser;
mod query;
mod value;

pub use condition::{Criteria, FilterCondition, Operand};
pub use descriptor::{Accessor, DescriptorSet, DescriptorSetBuilder, Entity, FieldDescriptor};
pub use error::{FilterError, FilterErrorKind, FilterResult};
pub use evaluator::CriteriaEvaluator;
pub use matcher::FieldMatcher;
pub use operator::Operator;
pub use parser::{FilterParser, RESERVED_PARAMS};
pub use query::{Direction, Order, Page, PageRequest, QueryExecutor, QueryRequest, Sort};
pub use value::{FieldType, Value};

#[cfg(test)]
mod tests;
