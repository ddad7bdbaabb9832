//! Query-parameter parser.
//!
//! Turns `<field>.<operator>=<value>` parameters into typed
//! [`FilterCondition`]s, and `sort` / `page` / `size` into a [`QueryRequest`].
//! Every check happens here so that evaluation can never fail:
//!
//! 1. the field must exist (`UnknownFilterField`);
//! 2. the operator suffix must be known (`InvalidFilterSyntax`);
//! 3. the operator must apply to the field's type (`UnsupportedOperatorForType`);
//! 4. the operand must convert to the field's type (`InvalidFilterSyntax`).

use tracing::debug;

use crate::condition::{Criteria, FilterCondition, Operand};
use crate::descriptor::DescriptorSet;
use crate::error::{FilterError, FilterResult};
use crate::operator::Operator;
use crate::query::{Direction, Order, PageRequest, QueryRequest, Sort};
use crate::value::parse_bool;

/// Query parameters that control paging and are never treated as filters.
pub const RESERVED_PARAMS: [&str; 3] = [SORT_PARAM, PAGE_PARAM, SIZE_PARAM];

const SORT_PARAM: &str = "sort";
const PAGE_PARAM: &str = "page";
const SIZE_PARAM: &str = "size";

/// Separator between the values of `in` / `notIn`.
const LIST_SEPARATOR: char = ',';

/// Parser for criteria query parameters.
///
/// # Example
///
/// ```
/// use fleetbooks_criteria::{DescriptorSet, FieldType, FilterParser, Operator, Value};
///
/// struct Account {
///     id: i64,
///     name: String,
/// }
///
/// let fields = DescriptorSet::<Account>::builder("Account")
///     .id("id", |a| Some(Value::Integer(a.id)))
///     .field("name", FieldType::Text, |a| Some(Value::Text(a.name.clone())))
///     .build();
///
/// let condition = FilterParser::parse_param(&fields, "name.contains", "Foo").unwrap();
/// assert_eq!(condition.operator(), Operator::Contains);
///
/// let request = FilterParser::parse_query_string(&fields, "id.in=1,2&sort=name,desc").unwrap();
/// assert_eq!(request.criteria.len(), 1);
/// ```
pub struct FilterParser;

impl FilterParser {
    /// Parses one condition given its field and an `operator=value` expression.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidFilterSyntax` if `expression` has no `=`,
    /// plus every error [`FilterParser::parse_param`] can return.
    pub fn parse_condition<R>(
        descriptors: &DescriptorSet<R>,
        field: &str,
        expression: &str,
    ) -> FilterResult<FilterCondition> {
        let Some((suffix, raw)) = expression.split_once('=') else {
            return Err(FilterError::invalid_syntax(
                format!("{field}.{expression}"),
                "expected '<operator>=<value>'",
            ));
        };
        Self::build(descriptors, field, suffix, raw)
    }

    /// Parses one query parameter such as (`name.contains`, `Foo`).
    ///
    /// The key is split at its last `.`; the part before is the field and the
    /// part after is the operator.
    ///
    /// # Errors
    ///
    /// - `FilterError::UnknownFilterField` if the field is not described.
    /// - `FilterError::InvalidFilterSyntax` if the key has no operator, the
    ///   operator is unknown, or the value does not convert.
    /// - `FilterError::UnsupportedOperatorForType` if the operator does not
    ///   apply to the field's type.
    pub fn parse_param<R>(
        descriptors: &DescriptorSet<R>,
        key: &str,
        value: &str,
    ) -> FilterResult<FilterCondition> {
        let Some((field, suffix)) = key.rsplit_once('.') else {
            return Err(FilterError::invalid_syntax(
                key,
                "missing operator suffix, expected '<field>.<operator>'",
            ));
        };
        Self::build(descriptors, field, suffix, value)
    }

    /// Parses every filter parameter in order, skipping `sort`, `page` and `size`.
    ///
    /// Parameters are never silently dropped: any other key that fails to
    /// parse fails the whole call.
    ///
    /// # Errors
    ///
    /// Returns the first error [`FilterParser::parse_param`] reports.
    pub fn parse_filters<R, I, K, V>(descriptors: &DescriptorSet<R>, params: I) -> FilterResult<Criteria>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        params
            .into_iter()
            .filter(|(key, _)| !RESERVED_PARAMS.contains(&key.as_ref()))
            .map(|(key, value)| Self::parse_param(descriptors, key.as_ref(), value.as_ref()))
            .collect()
    }

    /// Parses a `sort` value: `<field>` or `<field>,<asc|desc>`.
    ///
    /// # Errors
    ///
    /// - `FilterError::UnknownFilterField` if the field is not described.
    /// - `FilterError::InvalidFilterSyntax` if the field is empty or the
    ///   direction is neither `asc` nor `desc`.
    pub fn parse_sort<R>(descriptors: &DescriptorSet<R>, raw: &str) -> FilterResult<Order> {
        let (field, direction) = match raw.split_once(',') {
            Some((field, direction)) => {
                let direction = Direction::parse(direction).ok_or_else(|| {
                    FilterError::invalid_syntax(
                        format!("{SORT_PARAM}={raw}"),
                        format!("unknown sort direction '{direction}', expected 'asc' or 'desc'"),
                    )
                })?;
                (field, direction)
            }
            None => (raw, Direction::Asc),
        };

        if field.is_empty() {
            return Err(FilterError::invalid_syntax(
                format!("{SORT_PARAM}={raw}"),
                "missing sort field",
            ));
        }
        if descriptors.get(field).is_none() {
            return Err(unknown_field(descriptors, field));
        }
        Ok(Order::new(field, direction))
    }

    /// Parses filters, sort keys and paging from one parameter list.
    ///
    /// `page` defaults to 0. A missing `size` leaves the page size for the
    /// caller to choose (see [`PageRequest::or_size`]).
    ///
    /// # Errors
    ///
    /// Returns the first filter or sort error, or
    /// `FilterError::InvalidFilterSyntax` for a malformed `page` / `size`.
    pub fn parse_request<R, I, K, V>(descriptors: &DescriptorSet<R>, params: I) -> FilterResult<QueryRequest>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut conditions = Vec::new();
        let mut sort = Sort::unsorted();
        let mut page = PageRequest::unpaged();

        for (key, value) in params {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                SORT_PARAM => sort = sort.then(Self::parse_sort(descriptors, value)?),
                PAGE_PARAM => page.page = parse_page_number(key, value, 0)?,
                SIZE_PARAM => page.size = Some(parse_page_number(key, value, 1)?),
                _ => conditions.push(Self::parse_param(descriptors, key, value)?),
            }
        }

        let request = QueryRequest {
            criteria: Criteria::new(conditions),
            sort,
            page,
        };
        debug!(
            entity = descriptors.entity(),
            criteria = %request.criteria,
            sort = %request.sort,
            page = request.page.page,
            size = ?request.page.size,
            "parsed query"
        );
        Ok(request)
    }

    /// Parses a URL query string (`name.contains=Foo&sort=id,desc`).
    ///
    /// A leading `?` is ignored. Keys and values are percent-decoded.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::InvalidFilterSyntax` if the string cannot be
    /// decoded, plus every error [`FilterParser::parse_request`] can return.
    pub fn parse_query_string<R>(descriptors: &DescriptorSet<R>, query: &str) -> FilterResult<QueryRequest> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|e| FilterError::invalid_syntax(query, e.to_string()))?;
        Self::parse_request(descriptors, pairs)
    }

    fn build<R>(
        descriptors: &DescriptorSet<R>,
        field: &str,
        suffix: &str,
        raw: &str,
    ) -> FilterResult<FilterCondition> {
        let parameter = format!("{field}.{suffix}");

        let descriptor = descriptors
            .get(field)
            .ok_or_else(|| unknown_field(descriptors, field))?;

        let operator = Operator::from_suffix(suffix).ok_or_else(|| {
            FilterError::invalid_syntax(&parameter, format!("unknown operator '{suffix}'"))
        })?;

        let field_type = descriptor.field_type();
        if !operator.supports(&field_type) {
            return Err(FilterError::unsupported_operator(field, operator, field_type));
        }

        let operand = match operator {
            Operator::Specified => Operand::Flag(
                parse_bool(raw).map_err(|reason| FilterError::invalid_syntax(&parameter, reason))?,
            ),
            op if op.is_multi_valued() => {
                let values = raw
                    .split(LIST_SEPARATOR)
                    .filter(|segment| !segment.is_empty())
                    .map(|segment| field_type.parse_value(segment))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|reason| FilterError::invalid_syntax(&parameter, reason))?;
                if values.is_empty() {
                    return Err(FilterError::invalid_syntax(
                        &parameter,
                        "expected at least one value",
                    ));
                }
                Operand::Many(values)
            }
            _ => Operand::Single(
                field_type
                    .parse_value(raw)
                    .map_err(|reason| FilterError::invalid_syntax(&parameter, reason))?,
            ),
        };

        FilterCondition::new(field, operator, operand)
    }
}

fn unknown_field<R>(descriptors: &DescriptorSet<R>, field: &str) -> FilterError {
    FilterError::unknown_field(
        descriptors.entity(),
        field,
        descriptors.suggest(field).map(str::to_string),
    )
}

fn parse_page_number(key: &str, raw: &str, min: usize) -> FilterResult<usize> {
    match raw.parse::<usize>() {
        Ok(n) if n >= min => Ok(n),
        _ => Err(FilterError::invalid_syntax(
            format!("{key}={raw}"),
            format!("expected an integer >= {min}"),
        )),
    }
}
