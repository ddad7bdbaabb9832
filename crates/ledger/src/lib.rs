//! Record store for fleetbooks.
//!
//! This crate holds the accounting and fleet records in one serializable
//! [`Ledger`], persists it as JSON through [`LedgerStore`], and exposes CRUD
//! and filtered queries over each record type. Queries use the
//! `<field>.<operator>=<value>` syntax of `fleetbooks_criteria`.
//!
//! ```
//! use fleetbooks_criteria::{Entity, FilterParser};
//! use fleetbooks_ledger::{seed, Invoice};
//!
//! let ledger = seed::demo_ledger()?;
//! let request = FilterParser::parse_query_string(
//!     Invoice::descriptors(),
//!     "status.in=ISSUED,PAID&sort=totalAmount,desc",
//! )?;
//! let page = ledger.query::<Invoice>(&request)?;
//! assert_eq!(page.total, page.content.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub mod error;
pub mod kind;
pub mod models;
pub mod repository;
pub mod seed;
pub mod store;

pub use error::{LedgerError, Result};
pub use kind::{EntityKind, FieldInfo, SearchResult};
pub use models::{BankAccount, FleetTrip, FuelType, Invoice, InvoiceStatus, ServiceLog, ServiceType, Vehicle};
pub use repository::Stored;
pub use store::{LedgerStore, LedgerStoreError};

/// Current on-disk format version.
pub const LEDGER_VERSION: u32 = 1;

/// Every record, grouped by type, plus the shared id sequence.
///
/// Ids come from one sequence for all record types, so an id is unique
/// across the whole ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    /// Format version of the serialized ledger.
    #[serde(default = "default_version")]
    pub version: u32,

    /// The id the next created record receives.
    #[serde(default = "default_next_id")]
    pub next_id: i64,

    #[serde(default)]
    pub bank_accounts: Vec<BankAccount>,

    #[serde(default)]
    pub invoices: Vec<Invoice>,

    #[serde(default)]
    pub vehicles: Vec<Vehicle>,

    #[serde(default)]
    pub fleet_trips: Vec<FleetTrip>,

    #[serde(default)]
    pub service_logs: Vec<ServiceLog>,

    /// UTC timestamp of the last mutation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_version() -> u32 {
    LEDGER_VERSION
}

fn default_next_id() -> i64 {
    1
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self {
            version: LEDGER_VERSION,
            next_id: default_next_id(),
            bank_accounts: Vec::new(),
            invoices: Vec::new(),
            vehicles: Vec::new(),
            fleet_trips: Vec::new(),
            service_logs: Vec::new(),
            updated_at: None,
        }
    }

    /// Returns true if the ledger holds no records.
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    /// Total number of records across every table.
    pub fn record_count(&self) -> usize {
        self.bank_accounts.len()
            + self.invoices.len()
            + self.vehicles.len()
            + self.fleet_trips.len()
            + self.service_logs.len()
    }

    /// Moves `next_id` past the highest stored id.
    ///
    /// A hand-edited file can carry ids at or above `next_id`; without this
    /// the next `create` would hand out a duplicate.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::IdSequenceExhausted` if a stored id is
    /// `i64::MAX`, leaving no id to hand out next.
    pub fn reconcile_next_id(&mut self) -> Result<()> {
        let max_id = self
            .bank_accounts
            .iter()
            .filter_map(|r| r.id)
            .chain(self.invoices.iter().filter_map(|r| r.id))
            .chain(self.vehicles.iter().filter_map(|r| r.id))
            .chain(self.fleet_trips.iter().filter_map(|r| r.id))
            .chain(self.service_logs.iter().filter_map(|r| r.id))
            .max()
            .unwrap_or(0);

        if max_id >= self.next_id {
            warn!(next_id = self.next_id, max_id, "id sequence behind stored records, advancing");
            self.next_id = max_id
                .checked_add(1)
                .ok_or(LedgerError::IdSequenceExhausted { last_id: max_id })?;
        }
        Ok(())
    }

    pub(crate) fn allocate_id(&mut self) -> Result<i64> {
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or(LedgerError::IdSequenceExhausted { last_id: id })?;
        Ok(id)
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
