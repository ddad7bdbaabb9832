use std::sync::LazyLock;

use chrono::NaiveDate;
use fleetbooks_criteria::{DescriptorSet, Entity, FieldType, Value};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::repository::Stored;
use crate::Ledger;

/// A bank account invoices are paid into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub bank_name: String,
    pub account_number: String,
    /// ISO 4217 code, e.g. `EUR`.
    pub currency: String,
    pub initial_balance: Decimal,
    pub opened_on: NaiveDate,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

static FIELDS: LazyLock<DescriptorSet<BankAccount>> = LazyLock::new(|| {
    DescriptorSet::<BankAccount>::builder(BankAccount::NAME)
        .id("id", |a| a.id.map(Value::Integer))
        .field("name", FieldType::Text, |a| Some(Value::Text(a.name.clone())))
        .field("bankName", FieldType::Text, |a| Some(Value::Text(a.bank_name.clone())))
        .field("accountNumber", FieldType::Text, |a| {
            Some(Value::Text(a.account_number.clone()))
        })
        .field("currency", FieldType::Text, |a| Some(Value::Text(a.currency.clone())))
        .field("initialBalance", FieldType::Decimal, |a| {
            Some(Value::Decimal(a.initial_balance))
        })
        .field("openedOn", FieldType::Date, |a| Some(Value::Date(a.opened_on)))
        .field("active", FieldType::Boolean, |a| Some(Value::Boolean(a.active)))
        .build()
});

impl Entity for BankAccount {
    const NAME: &'static str = "BankAccount";

    fn descriptors() -> &'static DescriptorSet<Self> {
        &FIELDS
    }
}

impl Stored for BankAccount {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn table(ledger: &Ledger) -> &Vec<Self> {
        &ledger.bank_accounts
    }

    fn table_mut(ledger: &mut Ledger) -> &mut Vec<Self> {
        &mut ledger.bank_accounts
    }
}
