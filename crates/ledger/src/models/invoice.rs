use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use fleetbooks_criteria::{DescriptorSet, Entity, FieldType, Value};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::repository::Stored;
use crate::Ledger;

/// Where an invoice is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Issued,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 4] = [
        InvoiceStatus::Draft,
        InvoiceStatus::Issued,
        InvoiceStatus::Paid,
        InvoiceStatus::Cancelled,
    ];

    /// Wire names, in declaration order.
    pub const NAMES: &'static [&'static str] = &["DRAFT", "ISSUED", "PAID", "CANCELLED"];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "DRAFT",
            InvoiceStatus::Issued => "ISSUED",
            InvoiceStatus::Paid => "PAID",
            InvoiceStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An invoice issued to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub invoice_number: String,
    pub customer_name: String,
    pub issue_date: NaiveDate,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub total_amount: Decimal,
    #[serde(default)]
    pub status: InvoiceStatus,
    #[serde(default)]
    pub notes: Option<String>,
    /// Account the invoice is paid into, if any.
    #[serde(default)]
    pub bank_account_id: Option<i64>,
}

static FIELDS: LazyLock<DescriptorSet<Invoice>> = LazyLock::new(|| {
    DescriptorSet::<Invoice>::builder(Invoice::NAME)
        .id("id", |i| i.id.map(Value::Integer))
        .field("invoiceNumber", FieldType::Text, |i| {
            Some(Value::Text(i.invoice_number.clone()))
        })
        .field("customerName", FieldType::Text, |i| {
            Some(Value::Text(i.customer_name.clone()))
        })
        .field("issueDate", FieldType::Date, |i| Some(Value::Date(i.issue_date)))
        .field("dueDate", FieldType::Date, |i| i.due_date.map(Value::Date))
        .field("totalAmount", FieldType::Decimal, |i| Some(Value::Decimal(i.total_amount)))
        .field("status", FieldType::Enum(InvoiceStatus::NAMES), |i| {
            Some(Value::Enum(i.status.as_str().to_string()))
        })
        .field("notes", FieldType::Text, |i| i.notes.clone().map(Value::Text))
        .field("bankAccountId", FieldType::Integer, |i| i.bank_account_id.map(Value::Integer))
        .build()
});

impl Entity for Invoice {
    const NAME: &'static str = "Invoice";

    fn descriptors() -> &'static DescriptorSet<Self> {
        &FIELDS
    }
}

impl Stored for Invoice {
    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn table(ledger: &Ledger) -> &Vec<Self> {
        &ledger.invoices
    }

    fn table_mut(ledger: &mut Ledger) -> &mut Vec<Self> {
        &mut ledger.invoices
    }
}
