// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Months, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const UNCATEGORIZED: &str = "Uncategorized";

pub const INCOME_CATEGORIES: &[&str] = &["Salary", "Business", "Investments", "Bonus", "Others"];

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Shopping",
    "Bills",
    "Health",
    "Uber",
    "Grocery",
    "Bike Repair",
    "Bank Maintenance",
    "Internet",
    "Recharges",
    "Subscriptions",
    "Friends",
    "Family",
    "Investment",
    "Petrol",
    "House Rent",
    "Electricity",
    "Water Bills",
    "Credit Card Bill",
    "Others",
];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {what} '{value}', expected one of: {expected}")]
pub struct ParseKindError {
    pub what: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl ParseKindError {
    pub fn new(what: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            what,
            value: value.to_string(),
            expected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxKind::Income => "income",
            TxKind::Expense => "expense",
        }
    }

    pub fn suggested_categories(&self) -> &'static [&'static str] {
        match self {
            TxKind::Income => INCOME_CATEGORIES,
            TxKind::Expense => EXPENSE_CATEGORIES,
        }
    }
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TxKind::Income),
            "expense" => Ok(TxKind::Expense),
            _ => Err(ParseKindError::new("transaction type", s, "income, expense")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: String,
    pub kind: TxKind,
    pub amount: Decimal,
    pub category: String,
    pub occurred_at: NaiveDateTime,
    pub description: Option<String>,
}

impl Transaction {
    pub fn date(&self) -> NaiveDate {
        self.occurred_at.date()
    }

    /// Signed contribution to a balance: income adds, expense subtracts.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TxKind::Income => self.amount,
            TxKind::Expense => -self.amount,
        }
    }
}

/// A numeric field as it arrives from the document store: either a JSON
/// number or a string holding one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

/// Untyped transaction document. Every field may be missing, and a field of
/// the wrong JSON type reads as missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Assigned by local storage; ids in imported documents are not kept.
    #[serde(default, skip_deserializing)]
    pub id: Option<i64>,
    #[serde(default, alias = "uid", deserialize_with = "lenient_string")]
    pub user_id: Option<String>,
    #[serde(default, rename = "type", alias = "kind", deserialize_with = "lenient_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<RawAmount>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
    #[serde(
        default,
        alias = "createdAt",
        alias = "date",
        deserialize_with = "lenient_timestamp"
    )]
    pub occurred_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

fn lenient_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_amount<'de, D: Deserializer<'de>>(de: D) -> Result<Option<RawAmount>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Number(n) => n.as_f64().map(RawAmount::Number),
        Value::String(s) => Some(RawAmount::Text(s)),
        _ => None,
    })
}

/// Accepts a date string, epoch seconds or milliseconds, or a store
/// timestamp object (`{"seconds": .., "nanoseconds": ..}`). Instants are
/// rendered as RFC 3339 so they parse like any other timestamp string.
fn lenient_timestamp<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    let instant = match Value::deserialize(de)? {
        Value::String(s) => return Ok(Some(s)),
        Value::Number(n) => n.as_i64().and_then(|v| {
            // Anything past the year 5138 in seconds is taken as milliseconds.
            if v.abs() >= 100_000_000_000 {
                DateTime::from_timestamp_millis(v)
            } else {
                DateTime::from_timestamp(v, 0)
            }
        }),
        Value::Object(map) => {
            let field = |a: &str, b: &str| map.get(a).or_else(|| map.get(b)).and_then(Value::as_i64);
            field("seconds", "_seconds").and_then(|secs| {
                let nanos = field("nanoseconds", "_nanoseconds").unwrap_or(0);
                DateTime::from_timestamp(secs, u32::try_from(nanos).unwrap_or(0))
            })
        }
        _ => None,
    };
    Ok(instant.map(|dt| dt.to_rfc3339()))
}

impl RawTransaction {
    /// Coerce into a well-formed record. Never fails: missing or broken
    /// fields fall back to safe defaults and are reported through `tracing`.
    pub fn coerce(self, owner: &str, now: NaiveDateTime) -> Transaction {
        let id = self.id.unwrap_or_default();

        let kind = match self.kind.as_deref().map(str::parse::<TxKind>) {
            Some(Ok(k)) => k,
            other => {
                tracing::warn!(id, kind = ?other, "unrecognised transaction type, treating as expense");
                TxKind::Expense
            }
        };

        let amount = match &self.amount {
            Some(RawAmount::Number(n)) => Decimal::try_from(*n).ok(),
            Some(RawAmount::Text(s)) => s.trim().parse::<Decimal>().ok(),
            None => None,
        };
        let amount = match amount {
            Some(a) if a.is_sign_negative() => {
                tracing::warn!(id, %a, "negative amount, using its magnitude");
                a.abs()
            }
            Some(a) => a,
            None => {
                tracing::warn!(id, "missing or invalid amount, using 0");
                Decimal::ZERO
            }
        };

        let category = self
            .category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_string());

        let occurred_at = match self
            .occurred_at
            .as_deref()
            .and_then(crate::utils::parse_timestamp)
        {
            Some(ts) => ts,
            None => {
                tracing::warn!(id, "missing or invalid timestamp, using ingest time");
                now
            }
        };

        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Transaction {
            id,
            user_id: owner.to_string(),
            kind,
            amount,
            category,
            occurred_at,
            description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
        }
    }

    /// The date one period after `d`. Monthly steps clamp to the last day of
    /// shorter months.
    pub fn advance(&self, d: NaiveDate) -> NaiveDate {
        let next = match self {
            Frequency::Daily => d.checked_add_days(Days::new(1)),
            Frequency::Weekly => d.checked_add_days(Days::new(7)),
            Frequency::Monthly => d.checked_add_months(Months::new(1)),
        };
        next.unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            "monthly" => Ok(Frequency::Monthly),
            _ => Err(ParseKindError::new("frequency", s, "daily, weekly, monthly")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringRule {
    pub id: i64,
    pub user_id: String,
    pub kind: TxKind,
    pub category: String,
    pub amount: Decimal,
    pub description: Option<String>,
    pub next_date: NaiveDate,
    pub frequency: Frequency,
}

impl RecurringRule {
    /// Every scheduled date on or before `today`, plus the first date after it.
    pub fn due_dates(&self, today: NaiveDate) -> (Vec<NaiveDate>, NaiveDate) {
        let mut due = Vec::new();
        let mut next = self.next_date;
        while next <= today {
            due.push(next);
            let after = self.frequency.advance(next);
            if after == next {
                break;
            }
            next = after;
        }
        (due, next)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub gstin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl InvoiceItem {
    pub fn line_total(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub user_id: String,
    pub number: String,
    pub issued_on: NaiveDate,
    pub client: Party,
    pub sender: Party,
    pub gst_rate: Decimal,
    pub items: Vec<InvoiceItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub gst: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub total: Decimal,
}

impl Invoice {
    /// GST is charged on top of the item subtotal and split evenly into
    /// central and state halves.
    pub fn totals(&self) -> InvoiceTotals {
        let subtotal: Decimal = self.items.iter().map(InvoiceItem::line_total).sum();
        if self.gst_rate.is_sign_negative() {
            return InvoiceTotals {
                subtotal,
                total: subtotal,
                ..Default::default()
            };
        }
        let gst = subtotal * self.gst_rate / Decimal::ONE_HUNDRED;
        let half = gst / Decimal::TWO;
        InvoiceTotals {
            subtotal,
            gst,
            cgst: half,
            sgst: half,
            total: subtotal + gst,
        }
    }
}
