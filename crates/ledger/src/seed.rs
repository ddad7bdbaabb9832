//! Demo records for trying out queries.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use fleetbooks_criteria::Entity;

use crate::error::{LedgerError, Result};
use crate::models::{
    BankAccount, FleetTrip, FuelType, Invoice, InvoiceStatus, ServiceLog, ServiceType, Vehicle,
};
use crate::Ledger;

fn date(y: i32, m: u32, d: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d).ok_or_else(|| LedgerError::InvalidSeed {
        reason: format!("{y:04}-{m:02}-{d:02} is not a calendar date"),
    })
}

fn instant(y: i32, m: u32, d: u32, h: u32, min: u32) -> Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .ok_or_else(|| LedgerError::InvalidSeed {
            reason: format!("{y:04}-{m:02}-{d:02}T{h:02}:{min:02} is not a valid instant"),
        })
}

/// Cents to a two-place decimal.
fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Builds a small ledger with every record type populated.
///
/// The content is fixed, so ids and values are the same on every call.
///
/// # Errors
///
/// Fails with `LedgerError::InvalidSeed` if a built-in date is invalid.
pub fn demo_ledger() -> Result<Ledger> {
    let mut ledger = Ledger::new();

    let operating = ledger.create(BankAccount {
        id: None,
        name: "Operating".to_string(),
        bank_name: "Nordbank".to_string(),
        account_number: "NL91NORD0417164300".to_string(),
        currency: "EUR".to_string(),
        initial_balance: money(1_250_000),
        opened_on: date(2019, 4, 1)?,
        active: true,
    })?;
    ledger.create(BankAccount {
        id: None,
        name: "Fuel cards".to_string(),
        bank_name: "Westbank".to_string(),
        account_number: "NL20WEST0123456789".to_string(),
        currency: "EUR".to_string(),
        initial_balance: money(0),
        opened_on: date(2021, 9, 15)?,
        active: true,
    })?;
    ledger.create(BankAccount {
        id: None,
        name: "USD reserve".to_string(),
        bank_name: "Westbank".to_string(),
        account_number: "US64WEST0000987654".to_string(),
        currency: "USD".to_string(),
        initial_balance: money(5_000_000),
        opened_on: date(2018, 1, 2)?,
        active: false,
    })?;

    let invoices = [
        ("INV-2024-001", "Harbor Logistics", date(2024, 1, 10)?, Some(date(2024, 2, 9)?), 420_000, InvoiceStatus::Paid, None),
        ("INV-2024-002", "Greenfield Farms", date(2024, 2, 3)?, Some(date(2024, 3, 4)?), 185_050, InvoiceStatus::Issued, Some("Deliver to north gate")),
        ("INV-2024-003", "Harbor Logistics", date(2024, 3, 18)?, None, 97_500, InvoiceStatus::Draft, None),
        ("INV-2024-004", "City Council", date(2024, 4, 2)?, Some(date(2024, 5, 2)?), 1_210_000, InvoiceStatus::Cancelled, Some("Replaced by INV-2024-005")),
    ];
    for (number, customer, issued, due, cents, status, notes) in invoices {
        ledger.create(Invoice {
            id: None,
            invoice_number: number.to_string(),
            customer_name: customer.to_string(),
            issue_date: issued,
            due_date: due,
            total_amount: money(cents),
            status,
            notes: notes.map(str::to_string),
            bank_account_id: operating.id.filter(|_| status != InvoiceStatus::Draft),
        })?;
    }

    let truck = ledger.create(Vehicle {
        id: None,
        registration: "BX-471-K".to_string(),
        make: "Volvo".to_string(),
        model: "FH16".to_string(),
        model_year: 2020,
        fuel_type: FuelType::Diesel,
        odometer_km: 312_400,
        purchased_on: Some(date(2020, 6, 30)?),
        active: true,
    })?;
    let van = ledger.create(Vehicle {
        id: None,
        registration: "EV-220-N".to_string(),
        make: "Renault".to_string(),
        model: "Kangoo E-Tech".to_string(),
        model_year: 2023,
        fuel_type: FuelType::Electric,
        odometer_km: 18_950,
        purchased_on: None,
        active: true,
    })?;
    ledger.create(Vehicle {
        id: None,
        registration: "OL-009-D".to_string(),
        make: "Ford".to_string(),
        model: "Transit".to_string(),
        model_year: 2012,
        fuel_type: FuelType::Petrol,
        odometer_km: 401_000,
        purchased_on: Some(date(2012, 3, 12)?),
        active: false,
    })?;

    let truck_id = truck.id.ok_or(LedgerError::MissingId { entity: Vehicle::NAME })?;
    let van_id = van.id.ok_or(LedgerError::MissingId { entity: Vehicle::NAME })?;

    ledger.create(FleetTrip {
        id: None,
        vehicle_id: truck_id,
        driver_name: "Ana Costa".to_string(),
        started_at: instant(2024, 3, 4, 6, 30)?,
        ended_at: Some(instant(2024, 3, 4, 17, 5)?),
        distance_km: Decimal::new(6124, 1),
        purpose: Some("Port delivery".to_string()),
    })?;
    ledger.create(FleetTrip {
        id: None,
        vehicle_id: van_id,
        driver_name: "Ben Okafor".to_string(),
        started_at: instant(2024, 3, 5, 8, 0)?,
        ended_at: Some(instant(2024, 3, 5, 12, 45)?),
        distance_km: Decimal::new(874, 1),
        purpose: None,
    })?;
    ledger.create(FleetTrip {
        id: None,
        vehicle_id: van_id,
        driver_name: "Ana Costa".to_string(),
        started_at: instant(2024, 3, 6, 7, 15)?,
        ended_at: None,
        distance_km: Decimal::ZERO,
        purpose: Some("City parcels".to_string()),
    })?;

    ledger.create(ServiceLog {
        id: None,
        vehicle_id: truck_id,
        service_date: date(2024, 1, 22)?,
        service_type: ServiceType::Routine,
        description: "Oil and filter change".to_string(),
        cost: money(48_500),
        odometer_km: Some(305_120),
    })?;
    ledger.create(ServiceLog {
        id: None,
        vehicle_id: truck_id,
        service_date: date(2024, 2, 14)?,
        service_type: ServiceType::Tyres,
        description: "Replace front tyres".to_string(),
        cost: money(132_000),
        odometer_km: None,
    })?;
    ledger.create(ServiceLog {
        id: None,
        vehicle_id: van_id,
        service_date: date(2024, 3, 1)?,
        service_type: ServiceType::Inspection,
        description: "Annual inspection".to_string(),
        cost: money(9_900),
        odometer_km: Some(18_400),
    })?;

    ledger.updated_at = None;
    Ok(ledger)
}
