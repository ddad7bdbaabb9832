//! Behavioral properties of parsing, evaluation and querying, checked
//! end-to-end over a small account fixture.

use std::sync::LazyLock;

use chrono::NaiveDate;
use fleetbooks_criteria::{
    Criteria, CriteriaEvaluator, DescriptorSet, Direction, Entity, FieldType, FilterErrorKind,
    FilterParser, Order, PageRequest, QueryExecutor, Sort, Value,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ==================== Fixture ====================

const CURRENCIES: &[&str] = &["EUR", "USD", "GBP"];

#[derive(Debug, Clone)]
struct Account {
    id: i64,
    name: String,
    bank_name: Option<String>,
    currency: &'static str,
    initial_balance: Decimal,
    opened_on: Option<NaiveDate>,
    active: bool,
}

static ACCOUNT_FIELDS: LazyLock<DescriptorSet<Account>> = LazyLock::new(|| {
    DescriptorSet::<Account>::builder("Account")
        .id("id", |a| Some(Value::Integer(a.id)))
        .field("name", FieldType::Text, |a| Some(Value::Text(a.name.clone())))
        .field("bankName", FieldType::Text, |a| a.bank_name.clone().map(Value::Text))
        .field("currency", FieldType::Enum(CURRENCIES), |a| {
            Some(Value::Enum(a.currency.to_string()))
        })
        .field("initialBalance", FieldType::Decimal, |a| {
            Some(Value::Decimal(a.initial_balance))
        })
        .field("openedOn", FieldType::Date, |a| a.opened_on.map(Value::Date))
        .field("active", FieldType::Boolean, |a| Some(Value::Boolean(a.active)))
        .build()
});

impl Entity for Account {
    const NAME: &'static str = "Account";

    fn descriptors() -> &'static DescriptorSet<Self> {
        &ACCOUNT_FIELDS
    }
}

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

fn accounts() -> Vec<Account> {
    vec![
        Account {
            id: 1,
            name: "Operating".to_string(),
            bank_name: Some("Nordbank".to_string()),
            currency: "EUR",
            initial_balance: dec!(1500.00),
            opened_on: date(2021, 3, 1),
            active: true,
        },
        Account {
            id: 2,
            name: "Payroll".to_string(),
            bank_name: None,
            currency: "EUR",
            initial_balance: dec!(0),
            opened_on: None,
            active: true,
        },
        Account {
            id: 3,
            name: "Reserve".to_string(),
            bank_name: Some("Westbank".to_string()),
            currency: "USD",
            initial_balance: dec!(25000),
            opened_on: date(2019, 11, 20),
            active: false,
        },
        Account {
            id: 4,
            name: "Travel".to_string(),
            bank_name: Some("Nordbank".to_string()),
            currency: "GBP",
            initial_balance: dec!(1),
            opened_on: date(2023, 7, 1),
            active: true,
        },
    ]
}

/// Ids of records matching a query string, unpaged, in id order.
fn found(records: &[Account], query: &str) -> Vec<i64> {
    let request = FilterParser::parse_query_string(Account::descriptors(), query).unwrap();
    let evaluator = CriteriaEvaluator::new(Account::descriptors(), &request.criteria).unwrap();
    QueryExecutor::new(records)
        .list(evaluator.predicate(), &Sort::unsorted(), &PageRequest::unpaged())
        .unwrap()
        .into_iter()
        .map(|a| a.id)
        .collect()
}

fn count(records: &[Account], query: &str) -> usize {
    let request = FilterParser::parse_query_string(Account::descriptors(), query).unwrap();
    let evaluator = CriteriaEvaluator::new(Account::descriptors(), &request.criteria).unwrap();
    QueryExecutor::new(records).count(evaluator.predicate())
}

fn sorted(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids
}

/// Every non-null value each field takes in the fixture, rendered in query form.
fn values_by_field(records: &[Account]) -> Vec<(&'static str, Vec<String>)> {
    Account::descriptors()
        .fields()
        .iter()
        .map(|field| {
            let mut values: Vec<String> = records
                .iter()
                .filter_map(|r| field.read(r))
                .map(|v| v.to_string())
                .collect();
            values.sort();
            values.dedup();
            (field.name(), values)
        })
        .collect()
}

// ==================== Partition Properties ====================

#[test]
fn test_equals_and_not_equals_partition_non_null_records() {
    let records = accounts();
    for (field, values) in values_by_field(&records) {
        let non_null = found(&records, &format!("{field}.specified=true"));
        for value in values {
            let query_value = value.replace('+', "%2B");
            let equal = found(&records, &format!("{field}.equals={query_value}"));
            let not_equal = found(&records, &format!("{field}.notEquals={query_value}"));

            assert!(
                equal.iter().all(|id| !not_equal.contains(id)),
                "{field}={value}: groups overlap"
            );
            let mut union = equal.clone();
            union.extend(&not_equal);
            assert_eq!(sorted(union), non_null, "{field}={value}: union is not the non-null set");
        }
    }
}

#[test]
fn test_null_joins_neither_equals_nor_not_equals() {
    let records = accounts();
    assert!(!found(&records, "bankName.equals=Nordbank").contains(&2));
    assert!(!found(&records, "bankName.notEquals=Nordbank").contains(&2));
    assert!(!found(&records, "openedOn.notEquals=2021-03-01").contains(&2));
}

#[test]
fn test_specified_partitions_every_field() {
    let records = accounts();
    for field in Account::descriptors().names() {
        let with = found(&records, &format!("{field}.specified=true"));
        let without = found(&records, &format!("{field}.specified=false"));
        assert!(with.iter().all(|id| !without.contains(id)), "{field}: overlap");
        let mut all = with.clone();
        all.extend(&without);
        assert_eq!(sorted(all), vec![1, 2, 3, 4], "{field}: not exhaustive");
    }
}

#[test]
fn test_in_is_equivalent_to_or_of_equals() {
    let records = accounts();
    let cases = [
        ("currency", "EUR", "GBP"),
        ("name", "Payroll", "Travel"),
        ("bankName", "Nordbank", "Westbank"),
        ("initialBalance", "0", "25000"),
        ("openedOn", "2019-11-20", "2023-07-01"),
        ("active", "true", "false"),
        ("id", "2", "9"),
    ];
    for (field, a, b) in cases {
        let in_result = found(&records, &format!("{field}.in={a},{b}"));
        let mut either = found(&records, &format!("{field}.equals={a}"));
        either.extend(found(&records, &format!("{field}.equals={b}")));
        either.dedup();
        assert_eq!(in_result, sorted(either), "{field}.in={a},{b}");
    }
}

#[test]
fn test_not_in_is_complement_of_in_over_non_null() {
    let records = accounts();
    let in_result = found(&records, "bankName.in=Nordbank");
    let not_in = found(&records, "bankName.notIn=Nordbank");
    assert_eq!(in_result, vec![1, 4]);
    assert_eq!(not_in, vec![3]);
}

// ==================== Count and List ====================

#[test]
fn test_count_equals_unpaged_list_length_for_any_sort() {
    let records = accounts();
    let queries = [
        "",
        "active.equals=true",
        "currency.in=EUR,USD",
        "openedOn.specified=false",
        "initialBalance.greaterThanOrEqual=1&name.doesNotContain=e",
        "name.equals=nobody",
    ];
    let sorts = [
        Sort::unsorted(),
        Sort::by_id(),
        Sort::by(Order::desc("initialBalance")),
        Sort::by(Order::asc("openedOn")).then(Order::new("name", Direction::Desc)),
    ];

    for query in queries {
        let request = FilterParser::parse_query_string(Account::descriptors(), query).unwrap();
        let evaluator = CriteriaEvaluator::new(Account::descriptors(), &request.criteria).unwrap();
        let executor = QueryExecutor::new(&records);
        let counted = executor.count(evaluator.predicate());
        for sort in &sorts {
            let listed = executor
                .list(evaluator.predicate(), sort, &PageRequest::unpaged())
                .unwrap();
            assert_eq!(counted, listed.len(), "query '{query}' sort '{sort}'");
        }
    }
}

#[test]
fn test_page_total_is_independent_of_page_size() {
    let records = accounts();
    let executor = QueryExecutor::new(&records);
    for size in 1..=5 {
        let page = executor
            .page(|a: &Account| a.active, &Sort::unsorted(), &PageRequest::of(0, size))
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.content.len(), size.min(3));
    }
}

// ==================== Round Trip ====================

#[test]
fn test_round_trip_equals_includes_and_other_value_excludes() {
    let records = accounts();
    for record in &records {
        let only = std::slice::from_ref(record);
        for field in Account::descriptors().fields() {
            let Some(value) = field.read(record) else {
                continue;
            };
            let x = value.to_string();
            assert_eq!(found(only, &format!("{}.equals={x}", field.name())), vec![record.id]);

            let other = records
                .iter()
                .filter_map(|r| field.read(r))
                .map(|v| v.to_string())
                .find(|v| v != &x);
            if let Some(y) = other {
                assert!(
                    found(only, &format!("{}.equals={y}", field.name())).is_empty(),
                    "{}={y} should exclude record {}",
                    field.name(),
                    record.id
                );
            }
        }
    }
}

// ==================== Scenarios ====================

#[test]
fn test_scenario_name_equals() {
    let records = vec![Account {
        id: 10,
        name: "AAAAAAAAAA".to_string(),
        bank_name: None,
        currency: "EUR",
        initial_balance: dec!(0),
        opened_on: None,
        active: true,
    }];

    assert_eq!(found(&records, "name.equals=AAAAAAAAAA"), vec![10]);
    assert_eq!(count(&records, "name.equals=AAAAAAAAAA"), 1);

    assert!(found(&records, "name.equals=BBBBBBBBBB").is_empty());
    assert_eq!(count(&records, "name.equals=BBBBBBBBBB"), 0);
}

#[test]
fn test_scenario_greater_than_is_strict() {
    let records: Vec<Account> = accounts().into_iter().filter(|a| a.id == 4).collect();
    assert_eq!(records[0].initial_balance, dec!(1));

    assert_eq!(found(&records, "initialBalance.greaterThan=0"), vec![4]);
    assert!(found(&records, "initialBalance.greaterThan=1").is_empty());
}

#[test]
fn test_scenario_unknown_field_is_surfaced() {
    let err = FilterParser::parse_query_string(Account::descriptors(), "bogus.equals=1").unwrap_err();
    assert_eq!(err.kind(), FilterErrorKind::UnknownFilterField);
    assert!(err.to_string().contains("bogus"));
}

#[test]
fn test_hand_built_unknown_field_never_returns_records() {
    let criteria: Criteria = vec![fleetbooks_criteria::FilterCondition::equals(
        "bogus",
        Value::Integer(1),
    )
    .unwrap()]
    .into_iter()
    .collect();
    let result = CriteriaEvaluator::new(Account::descriptors(), &criteria);
    assert_eq!(result.err().map(|e| e.kind()), Some(FilterErrorKind::UnknownFilterField));
}

// ==================== Should Be Found / Should Not Be Found ====================

fn should_be_found(records: &[Account], query: &str, id: i64) {
    assert!(found(records, query).contains(&id), "{query} should find {id}");
}

fn should_not_be_found(records: &[Account], query: &str, id: i64) {
    assert!(!found(records, query).contains(&id), "{query} should not find {id}");
}

#[test]
fn test_text_filters_on_one_account() {
    let records = accounts();
    should_be_found(&records, "name.contains=Oper", 1);
    should_not_be_found(&records, "name.contains=oper", 1);
    should_be_found(&records, "name.doesNotContain=Pay", 1);
    should_not_be_found(&records, "name.doesNotContain=Oper", 1);
    should_be_found(&records, "name.in=Operating,Nothing", 1);
    should_not_be_found(&records, "name.in=Nothing", 1);
}

#[test]
fn test_ordering_filters_on_one_account() {
    let records = accounts();
    should_be_found(&records, "initialBalance.greaterThanOrEqual=1500", 1);
    should_not_be_found(&records, "initialBalance.greaterThan=1500", 1);
    should_be_found(&records, "initialBalance.lessThanOrEqual=1500.00", 1);
    should_not_be_found(&records, "initialBalance.lessThan=1500", 1);

    should_be_found(&records, "openedOn.greaterThan=2021-02-28", 1);
    should_not_be_found(&records, "openedOn.lessThan=2021-03-01", 1);
    should_be_found(&records, "openedOn.lessThanOrEqual=2021-03-01", 1);
    should_not_be_found(&records, "openedOn.greaterThanOrEqual=2021-03-02", 1);
}

#[test]
fn test_specified_filters_on_one_account() {
    let records = accounts();
    should_be_found(&records, "bankName.specified=true", 1);
    should_not_be_found(&records, "bankName.specified=false", 1);
    should_be_found(&records, "bankName.specified=false", 2);
    should_not_be_found(&records, "bankName.specified=true", 2);
}
