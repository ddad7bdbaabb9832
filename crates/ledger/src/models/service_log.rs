use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use fleetbooks_criteria::{DescriptorSet, Entity, FieldType, Value};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::repository::Stored;
use crate::Ledger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    Routine,
    Repair,
    Inspection,
    Tyres,
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [
        ServiceType::Routine,
        ServiceType::Repair,
        ServiceType::Inspection,
        ServiceType::Tyres,
    ];

    pub const NAMES: &'static [&'static str] = &["ROUTINE", "REPAIR", "INSPECTION", "TYRES"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Routine => "ROUTINE",
            ServiceType::Repair => "REPAIR",
            ServiceType::Inspection => "INSPECTION",
            ServiceType::Tyres => "TYRES",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A workshop visit for a vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub vehicle_id: i64,
    pub service_date: NaiveDate,
    pub service_type: ServiceType,
    pub description: String,
    pub cost: Decimal,
    /// Odometer reading at the time of service.
    #[serde(default)]
    pub odometer_km: Option<i64>,
}

static FIELDS: LazyLock<DescriptorSet<ServiceLog>> = LazyLock::new(|| {
    DescriptorSet::<ServiceLog>::builder(ServiceLog::NAME)
        .id("id", |s| s.id.map(Value::Integer))
        .field("vehicleId", FieldType::Integer, |s| Some(Value::Integer(s.vehicle_id)))
        .field("serviceDate", FieldType::Date, |s| Some(Value::Date(s.service_date)))
        .field("serviceType", FieldType::Enum(ServiceType::NAMES), |s| {
            Some(Value::Enum(s.service_type.as_str().to_string()))
        })
        .field("description", FieldType::Text, |s| Some(Value::Text(s.description.clone())))
        .field("cost", FieldType::Decimal, |s| Some(Value::Decimal(s.cost)))
        .field("odometerKm", FieldType::Integer, |s| s.odometer_km.map(Value::Integer))
        .build()
});

impl Entity for ServiceLog {
    const NAME: &'static str = "ServiceLog";

    fn descriptors() -> &'static DescriptorSet<Self> {
        &FIELDS
    }
}

impl Stored for ServiceLog {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn table(ledger: &Ledger) -> &Vec<Self> {
        &ledger.service_logs
    }

    fn table_mut(ledger: &mut Ledger) -> &mut Vec<Self> {
        &mut ledger.service_logs
    }
}
