//! Choosing a record type at runtime.
//!
//! Command-line and other string-driven callers name a record type by its
//! resource name (`invoices`, `fleet-trips`, ...) and exchange records as
//! `serde_json::Value`. [`EntityKind`] maps the name to the concrete type and
//! the `*_json` methods on [`Ledger`] dispatch to the generic repository.

use std::fmt;
use std::str::FromStr;

use fleetbooks_criteria::{DescriptorSet, Entity, FilterParser, Operator};
use serde::Serialize;
use strsim::levenshtein;

use crate::error::{LedgerError, Result};
use crate::models::{BankAccount, FleetTrip, Invoice, ServiceLog, Vehicle};
use crate::repository::Stored;
use crate::Ledger;

/// Maximum edit distance for "did you mean" suggestions.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// The record types a ledger stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    BankAccount,
    Invoice,
    Vehicle,
    FleetTrip,
    ServiceLog,
}

/// Calls `$body` with `$R` bound to the record type of `$kind`.
macro_rules! with_kind {
    ($kind:expr, $R:ident => $body:expr) => {
        match $kind {
            EntityKind::BankAccount => {
                type $R = BankAccount;
                $body
            }
            EntityKind::Invoice => {
                type $R = Invoice;
                $body
            }
            EntityKind::Vehicle => {
                type $R = Vehicle;
                $body
            }
            EntityKind::FleetTrip => {
                type $R = FleetTrip;
                $body
            }
            EntityKind::ServiceLog => {
                type $R = ServiceLog;
                $body
            }
        }
    };
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::BankAccount,
        EntityKind::Invoice,
        EntityKind::Vehicle,
        EntityKind::FleetTrip,
        EntityKind::ServiceLog,
    ];

    /// The plural, kebab-case resource name, e.g. `bank-accounts`.
    pub fn resource(&self) -> &'static str {
        match self {
            EntityKind::BankAccount => "bank-accounts",
            EntityKind::Invoice => "invoices",
            EntityKind::Vehicle => "vehicles",
            EntityKind::FleetTrip => "fleet-trips",
            EntityKind::ServiceLog => "service-logs",
        }
    }

    /// The entity name used in messages, e.g. `BankAccount`.
    pub fn entity_name(&self) -> &'static str {
        with_kind!(self, R => R::NAME)
    }

    /// Field names in declaration order, the id first.
    pub fn field_names(&self) -> Vec<&'static str> {
        with_kind!(self, R => R::descriptors().names().collect())
    }

    /// Describes every filterable field of this kind.
    pub fn describe(&self) -> Vec<FieldInfo> {
        with_kind!(self, R => describe_fields(R::descriptors()))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

impl FromStr for EntityKind {
    type Err = LedgerError;

    /// Accepts the resource name (`fleet-trips`), its singular (`fleet-trip`)
    /// or the entity name (`FleetTrip`), ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        let found = Self::ALL.into_iter().find(|kind| {
            let resource = kind.resource();
            wanted == resource
                || Some(wanted.as_str()) == resource.strip_suffix('s')
                || wanted == kind.entity_name().to_lowercase()
        });

        found.ok_or_else(|| LedgerError::UnknownEntity {
            name: s.to_string(),
            suggestion: suggest_resource(&wanted),
        })
    }
}

fn suggest_resource(name: &str) -> Option<&'static str> {
    EntityKind::ALL
        .iter()
        .map(|kind| (kind.resource(), levenshtein(name, kind.resource())))
        .filter(|(_, distance)| *distance <= MAX_SUGGESTION_DISTANCE)
        .min_by_key(|(_, distance)| *distance)
        .map(|(resource, _)| resource)
}

/// A filterable field as shown by `fb fields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    pub name: &'static str,
    /// Type name, e.g. `decimal`.
    #[serde(rename = "type")]
    pub field_type: &'static str,
    /// Allowed values for enum fields, empty otherwise.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<&'static str>,
    /// Operator suffixes the field accepts.
    pub operators: Vec<&'static str>,
}

fn describe_fields<R>(descriptors: &DescriptorSet<R>) -> Vec<FieldInfo> {
    descriptors
        .fields()
        .iter()
        .map(|field| {
            let field_type = field.field_type();
            FieldInfo {
                name: field.name(),
                field_type: field_type.name(),
                values: match field_type {
                    fleetbooks_criteria::FieldType::Enum(values) => values.to_vec(),
                    _ => Vec::new(),
                },
                operators: Operator::supported_for(&field_type)
                    .into_iter()
                    .map(|op| op.as_suffix())
                    .collect(),
            }
        })
        .collect()
}

/// One page of records in JSON form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// Resource name of the records.
    pub entity: &'static str,
    /// Matches across the whole table.
    pub total: usize,
    pub page: usize,
    pub size: Option<usize>,
    pub records: Vec<serde_json::Value>,
}

impl Ledger {
    /// Parses query parameters for `kind` and returns one page of matches.
    ///
    /// `default_size` applies when the parameters carry no `size`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Filter` for any filter, sort or paging error.
    pub fn search<I, K, V>(&self, kind: EntityKind, params: I, default_size: Option<usize>) -> Result<SearchResult>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        with_kind!(kind, R => self.search_as::<R, _, _, _>(kind, params, default_size))
    }

    /// Counts records of `kind` matching the filter parameters.
    ///
    /// `sort`, `page` and `size` are validated the same way as for
    /// [`Ledger::search`] but do not change the count.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Filter` for any filter, sort or paging error.
    pub fn count_matching<I, K, V>(&self, kind: EntityKind, params: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        with_kind!(kind, R => {
            let request = FilterParser::parse_request(R::descriptors(), params)?;
            self.count::<R>(&request.criteria)
        })
    }

    /// Looks up one record of `kind` as JSON.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::RecordNotFound` if no record has this id.
    pub fn find_json(&self, kind: EntityKind, id: i64) -> Result<serde_json::Value> {
        with_kind!(kind, R => Ok(serde_json::to_value(self.find::<R>(id)?)?))
    }

    /// Creates a record of `kind` from JSON and returns it with its id.
    ///
    /// # Errors
    ///
    /// - `LedgerError::Json` if `record` is not a valid record of this kind.
    /// - `LedgerError::IdAlreadyAssigned` if it carries an id.
    pub fn create_json(&mut self, kind: EntityKind, record: serde_json::Value) -> Result<serde_json::Value> {
        with_kind!(kind, R => {
            let record: R = serde_json::from_value(record)?;
            Ok(serde_json::to_value(self.create(record)?)?)
        })
    }

    /// Replaces a record of `kind` with the JSON `record`.
    ///
    /// A body without an id takes `id`.
    ///
    /// # Errors
    ///
    /// Same as [`Ledger::update`], plus `LedgerError::Json` for an invalid body.
    pub fn update_json(
        &mut self,
        kind: EntityKind,
        id: i64,
        record: serde_json::Value,
    ) -> Result<serde_json::Value> {
        with_kind!(kind, R => {
            let mut record: R = serde_json::from_value(record)?;
            if record.id().is_none() {
                record.set_id(id);
            }
            Ok(serde_json::to_value(self.update(id, record)?)?)
        })
    }

    /// Applies a partial update to a record of `kind`.
    ///
    /// # Errors
    ///
    /// Same as [`Ledger::patch`].
    pub fn patch_json(
        &mut self,
        kind: EntityKind,
        id: i64,
        patch: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        with_kind!(kind, R => Ok(serde_json::to_value(self.patch::<R>(id, patch)?)?))
    }

    /// Deletes a record of `kind`.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::RecordNotFound` if no record has this id.
    pub fn delete_json(&mut self, kind: EntityKind, id: i64) -> Result<serde_json::Value> {
        with_kind!(kind, R => Ok(serde_json::to_value(self.delete::<R>(id)?)?))
    }

    fn search_as<R, I, K, V>(&self, kind: EntityKind, params: I, default_size: Option<usize>) -> Result<SearchResult>
    where
        R: Stored,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = FilterParser::parse_request(R::descriptors(), params)?;
        if let Some(size) = default_size {
            request.page = request.page.or_size(size);
        }

        let page = self.query::<R>(&request)?;
        let records = page
            .content
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(SearchResult {
            entity: kind.resource(),
            total: page.total,
            page: page.page,
            size: page.size,
            records,
        })
    }
}
