//! Tests for the query-parameter parser.

use super::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

// ==================== Test Helpers ====================

const FUEL_TYPES: &[&str] = &["PETROL", "DIESEL", "ELECTRIC"];

struct Vehicle {
    id: i64,
    registration: String,
    odometer_km: i64,
    fuel_type: &'static str,
    purchased_on: Option<NaiveDate>,
    active: bool,
    value: rust_decimal::Decimal,
}

fn fields() -> DescriptorSet<Vehicle> {
    DescriptorSet::<Vehicle>::builder("Vehicle")
        .id("id", |v| Some(Value::Integer(v.id)))
        .field("registration", FieldType::Text, |v| {
            Some(Value::Text(v.registration.clone()))
        })
        .field("odometerKm", FieldType::Integer, |v| Some(Value::Integer(v.odometer_km)))
        .field("fuelType", FieldType::Enum(FUEL_TYPES), |v| {
            Some(Value::Enum(v.fuel_type.to_string()))
        })
        .field("purchasedOn", FieldType::Date, |v| v.purchased_on.map(Value::Date))
        .field("active", FieldType::Boolean, |v| Some(Value::Boolean(v.active)))
        .field("value", FieldType::Decimal, |v| Some(Value::Decimal(v.value)))
        .build()
}

fn parse(key: &str, value: &str) -> FilterResult<FilterCondition> {
    FilterParser::parse_param(&fields(), key, value)
}

fn kind(result: FilterResult<FilterCondition>) -> FilterErrorKind {
    result.unwrap_err().kind()
}

// ==================== Single Parameters ====================

#[test]
fn test_parse_text_equals() {
    let cond = parse("registration.equals", "AB-123").unwrap();
    assert_eq!(cond.field(), "registration");
    assert_eq!(cond.operator(), Operator::Equals);
    assert_eq!(cond.operand(), &Operand::Single(Value::Text("AB-123".to_string())));
}

#[test]
fn test_parse_every_text_operator() {
    for suffix in ["equals", "notEquals", "contains", "doesNotContain"] {
        let cond = parse(&format!("registration.{suffix}"), "AB").unwrap();
        assert_eq!(cond.operator().as_suffix(), suffix);
    }
}

#[test]
fn test_parse_integer_ordering() {
    let cond = parse("odometerKm.greaterThanOrEqual", "5").unwrap();
    assert_eq!(cond.operator(), Operator::GreaterThanOrEqual);
    assert_eq!(cond.operand(), &Operand::Single(Value::Integer(5)));
}

#[test]
fn test_parse_decimal_operand() {
    let cond = parse("value.lessThan", "1999.99").unwrap();
    assert_eq!(cond.operand(), &Operand::Single(Value::Decimal(dec!(1999.99))));
}

#[test]
fn test_parse_date_operand() {
    let cond = parse("purchasedOn.lessThanOrEqual", "2024-12-31").unwrap();
    let expected = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
    assert_eq!(cond.operand(), &Operand::Single(Value::Date(expected)));
}

#[test]
fn test_parse_specified() {
    let cond = parse("purchasedOn.specified", "false").unwrap();
    assert_eq!(cond.operand(), &Operand::Flag(false));
    assert_eq!(cond.to_string(), "purchasedOn.specified=false");
}

#[test]
fn test_parse_specified_rejects_non_boolean() {
    assert_eq!(
        kind(parse("registration.specified", "yes")),
        FilterErrorKind::InvalidFilterSyntax
    );
}

#[test]
fn test_parse_empty_text_operand_is_allowed() {
    let cond = parse("registration.equals", "").unwrap();
    assert_eq!(cond.operand(), &Operand::Single(Value::Text(String::new())));
}

// ==================== Multi-valued Operators ====================

#[test]
fn test_parse_in_splits_on_comma() {
    let cond = parse("fuelType.in", "PETROL,DIESEL").unwrap();
    assert_eq!(
        cond.operand(),
        &Operand::Many(vec![
            Value::Enum("PETROL".to_string()),
            Value::Enum("DIESEL".to_string()),
        ])
    );
}

#[test]
fn test_parse_in_single_value() {
    let cond = parse("id.notIn", "7").unwrap();
    assert_eq!(cond.operand(), &Operand::Many(vec![Value::Integer(7)]));
}

#[test]
fn test_parse_in_drops_empty_segments() {
    let cond = parse("id.in", "1,,2,").unwrap();
    assert_eq!(
        cond.operand(),
        &Operand::Many(vec![Value::Integer(1), Value::Integer(2)])
    );
}

#[test]
fn test_parse_in_empty_list_is_invalid() {
    assert_eq!(kind(parse("id.in", "")), FilterErrorKind::InvalidFilterSyntax);
    assert_eq!(kind(parse("id.in", ",,")), FilterErrorKind::InvalidFilterSyntax);
}

#[test]
fn test_parse_in_rejects_any_bad_element() {
    let err = parse("id.in", "1,two,3").unwrap_err();
    assert_eq!(err.kind(), FilterErrorKind::InvalidFilterSyntax);
    assert!(err.to_string().contains("'two'"), "{err}");
}

// ==================== Errors ====================

#[test]
fn test_unknown_field() {
    let err = parse("bogus.equals", "1").unwrap_err();
    assert_eq!(
        err,
        FilterError::unknown_field("Vehicle", "bogus", None)
    );
}

#[test]
fn test_unknown_field_with_suggestion() {
    let err = parse("odometerKn.equals", "1").unwrap_err();
    assert_eq!(
        err,
        FilterError::unknown_field("Vehicle", "odometerKn", Some("odometerKm".to_string()))
    );
}

#[test]
fn test_unknown_field_checked_before_operator() {
    assert_eq!(kind(parse("bogus.nonsense", "1")), FilterErrorKind::UnknownFilterField);
}

#[test]
fn test_unknown_operator() {
    let err = parse("registration.like", "AB").unwrap_err();
    assert_eq!(err.kind(), FilterErrorKind::InvalidFilterSyntax);
    assert!(err.to_string().contains("unknown operator 'like'"), "{err}");
}

#[test]
fn test_operator_suffix_is_case_sensitive() {
    assert_eq!(
        kind(parse("odometerKm.greaterthan", "1")),
        FilterErrorKind::InvalidFilterSyntax
    );
}

#[test]
fn test_missing_operator_suffix() {
    assert_eq!(kind(parse("registration", "AB")), FilterErrorKind::InvalidFilterSyntax);
}

#[test]
fn test_non_numeric_operand_for_numeric_field() {
    assert_eq!(
        kind(parse("odometerKm.equals", "far")),
        FilterErrorKind::InvalidFilterSyntax
    );
    assert_eq!(kind(parse("value.greaterThan", "lots")), FilterErrorKind::InvalidFilterSyntax);
}

#[test]
fn test_unknown_enum_variant() {
    assert_eq!(kind(parse("fuelType.equals", "STEAM")), FilterErrorKind::InvalidFilterSyntax);
}

#[test]
fn test_contains_on_boolean_is_unsupported() {
    let err = parse("active.contains", "true").unwrap_err();
    assert_eq!(
        err,
        FilterError::unsupported_operator("active", Operator::Contains, FieldType::Boolean)
    );
}

#[test]
fn test_ordering_on_enum_is_unsupported() {
    assert_eq!(
        kind(parse("fuelType.greaterThan", "PETROL")),
        FilterErrorKind::UnsupportedOperatorForType
    );
}

#[test]
fn test_ordering_on_text_is_unsupported() {
    assert_eq!(
        kind(parse("registration.lessThan", "M")),
        FilterErrorKind::UnsupportedOperatorForType
    );
}

#[test]
fn test_contains_on_number_is_unsupported() {
    assert_eq!(
        kind(parse("odometerKm.contains", "1")),
        FilterErrorKind::UnsupportedOperatorForType
    );
}

#[test]
fn test_unsupported_operator_checked_before_operand() {
    assert_eq!(
        kind(parse("active.greaterThan", "not-a-bool")),
        FilterErrorKind::UnsupportedOperatorForType
    );
}

// ==================== parse_condition ====================

#[test]
fn test_parse_condition_from_expression() {
    let cond = FilterParser::parse_condition(&fields(), "registration", "contains=Foo").unwrap();
    assert_eq!(cond.to_string(), "registration.contains=Foo");
}

#[test]
fn test_parse_condition_value_may_contain_equals() {
    let cond = FilterParser::parse_condition(&fields(), "registration", "equals=a=b").unwrap();
    assert_eq!(cond.operand(), &Operand::Single(Value::Text("a=b".to_string())));
}

#[test]
fn test_parse_condition_without_equals_sign() {
    let err = FilterParser::parse_condition(&fields(), "registration", "contains").unwrap_err();
    assert_eq!(err.kind(), FilterErrorKind::InvalidFilterSyntax);
}

// ==================== parse_filters ====================

#[test]
fn test_parse_filters_keeps_order_and_skips_paging() {
    let criteria = FilterParser::parse_filters(
        &fields(),
        [
            ("active.equals", "true"),
            ("sort", "id,desc"),
            ("page", "2"),
            ("size", "10"),
            ("odometerKm.lessThan", "100000"),
        ],
    )
    .unwrap();

    let rendered: Vec<String> = criteria.iter().map(|c| c.to_string()).collect();
    assert_eq!(rendered, vec!["active.equals=true", "odometerKm.lessThan=100000"]);
}

#[test]
fn test_parse_filters_fails_on_first_bad_param() {
    let result = FilterParser::parse_filters(
        &fields(),
        [("active.equals", "true"), ("bogus.equals", "1")],
    );
    assert_eq!(result.unwrap_err().kind(), FilterErrorKind::UnknownFilterField);
}

#[test]
fn test_parse_filters_empty() {
    let criteria = FilterParser::parse_filters(&fields(), Vec::<(String, String)>::new()).unwrap();
    assert!(criteria.is_empty());
}

// ==================== Sort and Paging ====================

#[test]
fn test_parse_sort_with_direction() {
    let order = FilterParser::parse_sort(&fields(), "odometerKm,desc").unwrap();
    assert_eq!(order, Order::desc("odometerKm"));
}

#[test]
fn test_parse_sort_defaults_to_ascending() {
    let order = FilterParser::parse_sort(&fields(), "registration").unwrap();
    assert_eq!(order, Order::asc("registration"));
}

#[test]
fn test_parse_sort_direction_ignores_case() {
    let order = FilterParser::parse_sort(&fields(), "id,DESC").unwrap();
    assert_eq!(order.direction, Direction::Desc);
}

#[test]
fn test_parse_sort_errors() {
    let unknown = FilterParser::parse_sort(&fields(), "bogus,asc").unwrap_err();
    assert_eq!(unknown.kind(), FilterErrorKind::UnknownFilterField);

    let direction = FilterParser::parse_sort(&fields(), "id,sideways").unwrap_err();
    assert_eq!(direction.kind(), FilterErrorKind::InvalidFilterSyntax);

    let empty = FilterParser::parse_sort(&fields(), ",asc").unwrap_err();
    assert_eq!(empty.kind(), FilterErrorKind::InvalidFilterSyntax);
}

#[test]
fn test_parse_request() {
    let request = FilterParser::parse_request(
        &fields(),
        [
            ("fuelType.in", "PETROL,DIESEL"),
            ("sort", "odometerKm,desc"),
            ("sort", "id"),
            ("page", "1"),
            ("size", "5"),
        ],
    )
    .unwrap();

    assert_eq!(request.criteria.len(), 1);
    assert_eq!(
        request.sort,
        Sort::by(Order::desc("odometerKm")).then(Order::asc("id"))
    );
    assert_eq!(request.page, PageRequest::of(1, 5));
}

#[test]
fn test_parse_request_defaults() {
    let request = FilterParser::parse_request(&fields(), Vec::<(&str, &str)>::new()).unwrap();
    assert!(request.criteria.is_empty());
    assert!(request.sort.is_empty());
    assert_eq!(request.page, PageRequest::unpaged());
}

#[test]
fn test_parse_request_rejects_bad_paging() {
    for (key, value) in [("page", "-1"), ("page", "first"), ("size", "0"), ("size", "")] {
        let err = FilterParser::parse_request(&fields(), [(key, value)]).unwrap_err();
        assert_eq!(err.kind(), FilterErrorKind::InvalidFilterSyntax, "{key}={value}");
    }
}

#[test]
fn test_parse_query_string_decodes() {
    let request = FilterParser::parse_query_string(
        &fields(),
        "?registration.contains=AB%20C&registration.notEquals=X%2CY&sort=id,desc",
    )
    .unwrap();

    let rendered: Vec<String> = request.criteria.iter().map(|c| c.to_string()).collect();
    assert_eq!(
        rendered,
        vec!["registration.contains=AB C", "registration.notEquals=X,Y"]
    );
    assert_eq!(request.sort, Sort::by(Order::desc("id")));
}

#[test]
fn test_parse_query_string_unknown_field() {
    let err = FilterParser::parse_query_string(&fields(), "bogus.equals=1").unwrap_err();
    assert_eq!(err.kind(), FilterErrorKind::UnknownFilterField);
}

#[test]
fn test_parse_query_string_empty() {
    let request = FilterParser::parse_query_string(&fields(), "").unwrap();
    assert!(request.criteria.is_empty());
}

#[test]
fn test_parsed_condition_renders_back_to_query_form() {
    for (key, value) in [
        ("registration.contains", "Foo"),
        ("id.greaterThanOrEqual", "5"),
        ("fuelType.in", "PETROL,DIESEL"),
        ("registration.specified", "true"),
        ("purchasedOn.equals", "2023-07-01"),
    ] {
        let cond = parse(key, value).unwrap();
        assert_eq!(cond.to_string(), format!("{key}={value}"));
    }
}

// Silences dead-code warnings for fields only read through accessors.
#[test]
fn test_vehicle_fixture_accessors() {
    let vehicle = Vehicle {
        id: 1,
        registration: "AB-123".to_string(),
        odometer_km: 10,
        fuel_type: "DIESEL",
        purchased_on: None,
        active: true,
        value: dec!(10),
    };
    let set = fields();
    let values: Vec<Option<Value>> = set.fields().iter().map(|f| f.read(&vehicle)).collect();
    assert_eq!(values.len(), 7);
    assert_eq!(values[4], None);
}
