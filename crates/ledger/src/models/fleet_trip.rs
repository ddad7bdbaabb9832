use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use fleetbooks_criteria::{DescriptorSet, Entity, FieldType, Value};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::repository::Stored;
use crate::Ledger;

/// One trip driven with a fleet vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetTrip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub vehicle_id: i64,
    pub driver_name: String,
    pub started_at: DateTime<Utc>,
    /// `None` while the trip is still under way.
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    pub distance_km: Decimal,
    #[serde(default)]
    pub purpose: Option<String>,
}

static FIELDS: LazyLock<DescriptorSet<FleetTrip>> = LazyLock::new(|| {
    DescriptorSet::<FleetTrip>::builder(FleetTrip::NAME)
        .id("id", |t| t.id.map(Value::Integer))
        .field("vehicleId", FieldType::Integer, |t| Some(Value::Integer(t.vehicle_id)))
        .field("driverName", FieldType::Text, |t| Some(Value::Text(t.driver_name.clone())))
        .field("startedAt", FieldType::Instant, |t| Some(Value::Instant(t.started_at)))
        .field("endedAt", FieldType::Instant, |t| t.ended_at.map(Value::Instant))
        .field("distanceKm", FieldType::Decimal, |t| Some(Value::Decimal(t.distance_km)))
        .field("purpose", FieldType::Text, |t| t.purpose.clone().map(Value::Text))
        .build()
});

impl Entity for FleetTrip {
    const NAME: &'static str = "FleetTrip";

    fn descriptors() -> &'static DescriptorSet<Self> {
        &FIELDS
    }
}

impl Stored for FleetTrip {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn table(ledger: &Ledger) -> &Vec<Self> {
        &ledger.fleet_trips
    }

    fn table_mut(ledger: &mut Ledger) -> &mut Vec<Self> {
        &mut ledger.fleet_trips
    }
}
