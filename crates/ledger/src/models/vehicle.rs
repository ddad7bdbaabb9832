use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use fleetbooks_criteria::{DescriptorSet, Entity, FieldType, Value};
use serde::{Deserialize, Serialize};

use crate::repository::Stored;
use crate::Ledger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
    Lpg,
}

impl FuelType {
    pub const ALL: [FuelType; 5] = [
        FuelType::Petrol,
        FuelType::Diesel,
        FuelType::Electric,
        FuelType::Hybrid,
        FuelType::Lpg,
    ];

    pub const NAMES: &'static [&'static str] = &["PETROL", "DIESEL", "ELECTRIC", "HYBRID", "LPG"];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Petrol => "PETROL",
            FuelType::Diesel => "DIESEL",
            FuelType::Electric => "ELECTRIC",
            FuelType::Hybrid => "HYBRID",
            FuelType::Lpg => "LPG",
        }
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vehicle in the fleet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub registration: String,
    pub make: String,
    pub model: String,
    pub model_year: i64,
    pub fuel_type: FuelType,
    #[serde(default)]
    pub odometer_km: i64,
    #[serde(default)]
    pub purchased_on: Option<NaiveDate>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

static FIELDS: LazyLock<DescriptorSet<Vehicle>> = LazyLock::new(|| {
    DescriptorSet::<Vehicle>::builder(Vehicle::NAME)
        .id("id", |v| v.id.map(Value::Integer))
        .field("registration", FieldType::Text, |v| {
            Some(Value::Text(v.registration.clone()))
        })
        .field("make", FieldType::Text, |v| Some(Value::Text(v.make.clone())))
        .field("model", FieldType::Text, |v| Some(Value::Text(v.model.clone())))
        .field("modelYear", FieldType::Integer, |v| Some(Value::Integer(v.model_year)))
        .field("fuelType", FieldType::Enum(FuelType::NAMES), |v| {
            Some(Value::Enum(v.fuel_type.as_str().to_string()))
        })
        .field("odometerKm", FieldType::Integer, |v| Some(Value::Integer(v.odometer_km)))
        .field("purchasedOn", FieldType::Date, |v| v.purchased_on.map(Value::Date))
        .field("active", FieldType::Boolean, |v| Some(Value::Boolean(v.active)))
        .build()
});

impl Entity for Vehicle {
    const NAME: &'static str = "Vehicle";

    fn descriptors() -> &'static DescriptorSet<Self> {
        &FIELDS
    }
}

impl Stored for Vehicle {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn table(ledger: &Ledger) -> &Vec<Self> {
        &ledger.vehicles
    }

    fn table_mut(ledger: &mut Ledger) -> &mut Vec<Self> {
        &mut ledger.vehicles
    }
}
