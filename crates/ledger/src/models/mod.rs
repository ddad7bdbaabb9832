//! Record types stored in the ledger.
//!
//! Every model serializes with camelCase keys, and those keys are also its
//! filter field names, so `totalAmount.greaterThan=100` filters the
//! `totalAmount` member of an [`Invoice`]. Enumerations use their
//! SCREAMING_SNAKE_CASE names both on the wire and in filters.

mod bank_account;
mod fleet_trip;
mod invoice;
mod service_log;
mod vehicle;

pub use bank_account::BankAccount;
pub use fleet_trip::FleetTrip;
pub use invoice::{Invoice, InvoiceStatus};
pub use service_log::{ServiceLog, ServiceType};
pub use vehicle::{FuelType, Vehicle};
