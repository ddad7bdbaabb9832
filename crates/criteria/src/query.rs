//! Sorting, paging and the query executor.
//!
//! [`QueryExecutor`] applies a predicate to a read-consistent slice of records.
//! `list` filters, sorts and slices one page. `count` counts every match,
//! whatever the page.

use std::cmp::Ordering;
use std::fmt;

use tracing::debug;

use crate::condition::Criteria;
use crate::descriptor::{Accessor, DescriptorSet, Entity};
use crate::error::{FilterError, FilterResult};
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    /// Returns the query-parameter spelling (`asc` / `desc`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }

    /// Parses `asc` / `desc`, ignoring case.
    pub fn parse(raw: &str) -> Option<Direction> {
        if raw.eq_ignore_ascii_case("asc") {
            Some(Direction::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Some(Direction::Desc)
        } else {
            None
        }
    }
}

/// One sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub field: String,
    pub direction: Direction,
}

impl Order {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, Direction::Desc)
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.field, self.direction.as_str())
    }
}

/// Ordered list of sort keys. Earlier keys take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    /// No explicit ordering; the executor falls back to `id,asc`.
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// The default ordering, `id,asc`.
    pub fn by_id() -> Self {
        Self::by(Order::asc("id"))
    }

    /// Sort by a single key.
    pub fn by(order: Order) -> Self {
        Self {
            orders: vec![order],
        }
    }

    /// Appends a lower-precedence key.
    pub fn then(mut self, order: Order) -> Self {
        self.orders.push(order);
        self
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, order) in self.orders.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "sort={order}")?;
        }
        Ok(())
    }
}

/// Which slice of the sorted matches to return.
///
/// `page` is 0-based. A `size` of `None` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: Option<usize>,
}

impl PageRequest {
    /// Every match in one page.
    pub fn unpaged() -> Self {
        Self::default()
    }

    /// Page `page` of `size` records.
    pub fn of(page: usize, size: usize) -> Self {
        Self {
            page,
            size: Some(size),
        }
    }

    /// Uses `size` if no size was requested.
    pub fn or_size(self, size: usize) -> Self {
        Self {
            page: self.page,
            size: self.size.or(Some(size)),
        }
    }

    /// Number of records to skip.
    pub fn offset(&self) -> usize {
        match self.size {
            Some(size) => self.page.saturating_mul(size),
            None => 0,
        }
    }
}

/// Everything a list request carries: filters, sort and page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRequest {
    pub criteria: Criteria,
    pub sort: Sort,
    pub page: PageRequest,
}

/// One page of results plus the total number of matches.
#[derive(Debug, Clone)]
pub struct Page<'a, R> {
    pub content: Vec<&'a R>,
    /// Matches across the whole store, not just this page.
    pub total: usize,
    pub page: usize,
    pub size: Option<usize>,
}

impl<R> Page<'_, R> {
    /// Number of pages needed to show every match.
    pub fn total_pages(&self) -> usize {
        match self.size {
            Some(size) if size > 0 => self.total.div_ceil(size),
            _ => usize::from(self.total > 0),
        }
    }

    /// Returns true if a later page has records.
    pub fn has_next(&self) -> bool {
        self.page.saturating_add(1) < self.total_pages()
    }
}

/// A sort key resolved against the descriptors.
struct SortKey<R> {
    accessor: Accessor<R>,
    direction: Direction,
}

/// Runs predicates over a slice of records.
///
/// The slice is the snapshot: `list` and `count` never see concurrent writes,
/// and nothing is cached between calls.
pub struct QueryExecutor<'a, R> {
    records: &'a [R],
    descriptors: &'a DescriptorSet<R>,
}

impl<'a, R: Entity> QueryExecutor<'a, R> {
    /// Creates an executor over `records` using the entity's descriptors.
    pub fn new(records: &'a [R]) -> Self {
        Self::with_descriptors(records, R::descriptors())
    }
}

impl<'a, R> QueryExecutor<'a, R> {
    /// Creates an executor with an explicit descriptor set.
    pub fn with_descriptors(records: &'a [R], descriptors: &'a DescriptorSet<R>) -> Self {
        Self {
            records,
            descriptors,
        }
    }

    /// Returns the sorted page of records matching `predicate`.
    ///
    /// An empty `sort` orders by id ascending. Any other sort gets an
    /// `id,asc` tie-break unless it already orders by id.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownFilterField` if the sort names an unknown field.
    pub fn list<P>(&self, predicate: P, sort: &Sort, page: &PageRequest) -> FilterResult<Vec<&'a R>>
    where
        P: Fn(&R) -> bool,
    {
        let keys = self.resolve_sort(sort)?;
        let mut matches: Vec<&'a R> = self.records.iter().filter(|r| predicate(r)).collect();
        matches.sort_by(|a, b| compare_records(*a, *b, &keys));

        let offset = page.offset();
        let content = match page.size {
            Some(size) => matches.into_iter().skip(offset).take(size).collect(),
            None => matches,
        };
        Ok(content)
    }

    /// Counts every record matching `predicate`, ignoring paging.
    pub fn count<P>(&self, predicate: P) -> usize
    where
        P: Fn(&R) -> bool,
    {
        self.records.iter().filter(|r| predicate(r)).count()
    }

    /// Runs `list` and `count` over the same snapshot.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::UnknownFilterField` if the sort names an unknown field.
    pub fn page<P>(&self, predicate: P, sort: &Sort, page: &PageRequest) -> FilterResult<Page<'a, R>>
    where
        P: Fn(&R) -> bool,
    {
        let content = self.list(&predicate, sort, page)?;
        let total = self.count(&predicate);
        debug!(
            entity = self.descriptors.entity(),
            total,
            returned = content.len(),
            page = page.page,
            "query executed"
        );
        Ok(Page {
            content,
            total,
            page: page.page,
            size: page.size,
        })
    }

    fn resolve_sort(&self, sort: &Sort) -> FilterResult<Vec<SortKey<R>>> {
        let mut keys = Vec::with_capacity(sort.orders().len() + 1);
        let mut has_id = false;

        for order in sort.orders() {
            let descriptor = self.descriptors.get(&order.field).ok_or_else(|| {
                FilterError::unknown_field(
                    self.descriptors.entity(),
                    order.field.clone(),
                    self.descriptors.suggest(&order.field).map(str::to_string),
                )
            })?;
            has_id |= descriptor.name() == self.descriptors.id_field_name();
            keys.push(SortKey {
                accessor: descriptor.accessor(),
                direction: order.direction,
            });
        }

        if !has_id {
            keys.push(SortKey {
                accessor: self.descriptors.id_field().accessor(),
                direction: Direction::Asc,
            });
        }
        Ok(keys)
    }
}

/// Compares two records key by key.
fn compare_records<R>(a: &R, b: &R, keys: &[SortKey<R>]) -> Ordering {
    for key in keys {
        let ordering = compare_nullable((key.accessor)(a), (key.accessor)(b));
        let ordering = match key.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Null sorts after every value, so it comes last ascending and first descending.
fn compare_nullable(a: Option<Value>, b: Option<Value>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.compare(&b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::FieldType;
    use std::sync::LazyLock;

    #[derive(Debug, PartialEq)]
    struct Trip {
        id: i64,
        driver: String,
        km: Option<i64>,
    }

    static TRIP_FIELDS: LazyLock<DescriptorSet<Trip>> = LazyLock::new(|| {
        DescriptorSet::<Trip>::builder("Trip")
            .id("id", |t| Some(Value::Integer(t.id)))
            .field("driver", FieldType::Text, |t| Some(Value::Text(t.driver.clone())))
            .field("km", FieldType::Integer, |t| t.km.map(Value::Integer))
            .build()
    });

    impl Entity for Trip {
        const NAME: &'static str = "Trip";

        fn descriptors() -> &'static DescriptorSet<Self> {
            &TRIP_FIELDS
        }
    }

    fn trips() -> Vec<Trip> {
        vec![
            Trip { id: 3, driver: "Bea".to_string(), km: Some(40) },
            Trip { id: 1, driver: "Ann".to_string(), km: None },
            Trip { id: 2, driver: "Bea".to_string(), km: Some(10) },
            Trip { id: 4, driver: "Cal".to_string(), km: Some(25) },
        ]
    }

    fn ids(records: &[&Trip]) -> Vec<i64> {
        records.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_default_sort_is_id_ascending() {
        let data = trips();
        let executor = QueryExecutor::new(&data);
        let listed = executor
            .list(|_| true, &Sort::unsorted(), &PageRequest::unpaged())
            .unwrap();
        assert_eq!(ids(&listed), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_sort_id_desc() {
        let data = trips();
        let executor = QueryExecutor::new(&data);
        let listed = executor
            .list(|_| true, &Sort::by(Order::desc("id")), &PageRequest::unpaged())
            .unwrap();
        assert_eq!(ids(&listed), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_sort_ties_broken_by_id() {
        let data = trips();
        let executor = QueryExecutor::new(&data);
        let listed = executor
            .list(|_| true, &Sort::by(Order::desc("driver")), &PageRequest::unpaged())
            .unwrap();
        assert_eq!(ids(&listed), vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_nulls_last_ascending_first_descending() {
        let data = trips();
        let executor = QueryExecutor::new(&data);
        let asc = executor
            .list(|_| true, &Sort::by(Order::asc("km")), &PageRequest::unpaged())
            .unwrap();
        assert_eq!(ids(&asc), vec![2, 4, 3, 1]);

        let desc = executor
            .list(|_| true, &Sort::by(Order::desc("km")), &PageRequest::unpaged())
            .unwrap();
        assert_eq!(ids(&desc), vec![1, 3, 4, 2]);
    }

    #[test]
    fn test_paging_slices_sorted_matches() {
        let data = trips();
        let executor = QueryExecutor::new(&data);
        let first = executor
            .list(|_| true, &Sort::unsorted(), &PageRequest::of(0, 3))
            .unwrap();
        let second = executor
            .list(|_| true, &Sort::unsorted(), &PageRequest::of(1, 3))
            .unwrap();
        let third = executor
            .list(|_| true, &Sort::unsorted(), &PageRequest::of(2, 3))
            .unwrap();
        assert_eq!(ids(&first), vec![1, 2, 3]);
        assert_eq!(ids(&second), vec![4]);
        assert!(third.is_empty());
    }

    #[test]
    fn test_count_ignores_paging() {
        let data = trips();
        let executor = QueryExecutor::new(&data);
        let is_bea = |t: &Trip| t.driver == "Bea";
        let page = executor
            .page(is_bea, &Sort::unsorted(), &PageRequest::of(0, 1))
            .unwrap();
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.total, 2);
        assert_eq!(executor.count(is_bea), 2);
        assert_eq!(page.total_pages(), 2);
        assert!(page.has_next());
    }

    #[test]
    fn test_unknown_sort_field_is_reported() {
        let data = trips();
        let executor = QueryExecutor::new(&data);
        let err = executor
            .list(|_| true, &Sort::by(Order::asc("drivr")), &PageRequest::unpaged())
            .unwrap_err();
        assert_eq!(
            err,
            FilterError::unknown_field("Trip", "drivr", Some("driver".to_string()))
        );
    }

    #[test]
    fn test_total_pages_unpaged() {
        let page: Page<'_, Trip> = Page {
            content: vec![],
            total: 0,
            page: 0,
            size: None,
        };
        assert_eq!(page.total_pages(), 0);
        assert!(!page.has_next());
    }

    #[test]
    fn test_last_possible_page_is_empty_without_next() {
        let data = trips();
        let executor = QueryExecutor::new(&data);
        let page = executor
            .page(|_| true, &Sort::unsorted(), &PageRequest::of(usize::MAX, 2))
            .unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.total, 4);
        assert!(!page.has_next());
    }

    #[test]
    fn test_page_request_or_size() {
        assert_eq!(PageRequest::unpaged().or_size(20), PageRequest::of(0, 20));
        assert_eq!(PageRequest::of(2, 5).or_size(20), PageRequest::of(2, 5));
        assert_eq!(PageRequest::of(2, 5).offset(), 10);
    }

    #[test]
    fn test_sort_display() {
        let sort = Sort::by(Order::asc("name")).then(Order::desc("id"));
        assert_eq!(sort.to_string(), "sort=name,asc&sort=id,desc");
    }
}
