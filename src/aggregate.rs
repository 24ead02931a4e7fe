// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dashboard views over a user's transactions: window filtering, sorting,
//! totals, the expense breakdown and the cumulative daily balance.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{ParseKindError, Transaction, TxKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    ThisWeek,
    ThisMonth,
    Last30Days,
    /// Both endpoint days included.
    Custom { from: NaiveDate, to: NaiveDate },
    All,
}

impl Window {
    /// Resolve to a half-open `[start, end)` range relative to `now`.
    /// `None` means unbounded.
    pub fn bounds(&self, now: NaiveDateTime) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let today = now.date();
        let (start, end) = match *self {
            Window::All => return None,
            Window::ThisWeek => {
                let monday = today - Days::new(u64::from(today.weekday().num_days_from_monday()));
                (monday, monday + Days::new(7))
            }
            Window::ThisMonth => {
                let first = today.with_day(1).unwrap_or(today);
                (first, first.checked_add_months(Months::new(1)).unwrap_or(NaiveDate::MAX))
            }
            Window::Last30Days => (
                today - Days::new(29),
                today.succ_opt().unwrap_or(NaiveDate::MAX),
            ),
            Window::Custom { from, to } => {
                let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
                (lo, hi.succ_opt().unwrap_or(NaiveDate::MAX))
            }
        };
        Some((start.and_time(NaiveTime::MIN), end.and_time(NaiveTime::MIN)))
    }

    pub fn contains(&self, ts: NaiveDateTime, now: NaiveDateTime) -> bool {
        match self.bounds(now) {
            Some((start, end)) => ts >= start && ts < end,
            None => true,
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Window::ThisWeek => f.write_str("this week"),
            Window::ThisMonth => f.write_str("this month"),
            Window::Last30Days => f.write_str("last 30 days"),
            Window::Custom { from, to } => write!(f, "{} to {}", from, to),
            Window::All => f.write_str("all time"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl FromStr for SortOrder {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            _ => Err(ParseKindError::new("sort order", s, "asc, desc")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalancePoint {
    pub date: NaiveDate,
    /// Income minus expense on this day.
    pub net: Decimal,
    /// Running total up to and including this day.
    pub balance: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregationResult {
    pub transactions: Vec<Transaction>,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub net: Decimal,
    pub category_breakdown: Vec<CategoryTotal>,
    pub daily_balance: Vec<BalancePoint>,
}

/// Aggregate against the current local time.
pub fn aggregate(transactions: &[Transaction], window: Window, order: SortOrder) -> AggregationResult {
    aggregate_at(transactions, window, order, Local::now().naive_local())
}

pub fn aggregate_at(
    transactions: &[Transaction],
    window: Window,
    order: SortOrder,
    now: NaiveDateTime,
) -> AggregationResult {
    let filtered = filter_sorted(transactions, window, order, now);
    let (total_income, total_expense) = totals(&filtered);
    let category_breakdown = category_breakdown(&filtered);
    let daily_balance = daily_balance(&filtered);
    tracing::debug!(
        input = transactions.len(),
        kept = filtered.len(),
        %window,
        "aggregated transactions"
    );
    AggregationResult {
        transactions: filtered,
        total_income,
        total_expense,
        net: total_income - total_expense,
        category_breakdown,
        daily_balance,
    }
}

/// Records inside `window`, stably sorted by `occurred_at`.
pub fn filter_sorted(
    transactions: &[Transaction],
    window: Window,
    order: SortOrder,
    now: NaiveDateTime,
) -> Vec<Transaction> {
    let bounds = window.bounds(now);
    let mut out: Vec<Transaction> = transactions
        .iter()
        .filter(|t| match bounds {
            Some((start, end)) => t.occurred_at >= start && t.occurred_at < end,
            None => true,
        })
        .cloned()
        .collect();
    match order {
        SortOrder::Ascending => out.sort_by(|a, b| a.occurred_at.cmp(&b.occurred_at)),
        SortOrder::Descending => out.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at)),
    }
    out
}

/// (income, expense) sums.
pub fn totals(transactions: &[Transaction]) -> (Decimal, Decimal) {
    transactions
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(inc, exp), t| match t.kind {
            TxKind::Income => (inc + t.amount, exp),
            TxKind::Expense => (inc, exp + t.amount),
        })
}

/// Expense totals per category, largest first. Income never appears here.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut agg: HashMap<&str, Decimal> = HashMap::new();
    for t in transactions.iter().filter(|t| t.kind == TxKind::Expense) {
        *agg.entry(t.category.as_str()).or_insert(Decimal::ZERO) += t.amount;
    }
    let mut items: Vec<CategoryTotal> = agg
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect();
    items.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    items
}

/// Per-day net and running balance, always oldest day first.
pub fn daily_balance(transactions: &[Transaction]) -> Vec<BalancePoint> {
    let mut per_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for t in transactions {
        *per_day.entry(t.date()).or_insert(Decimal::ZERO) += t.signed_amount();
    }
    let mut balance = Decimal::ZERO;
    per_day
        .into_iter()
        .map(|(date, net)| {
            balance += net;
            BalancePoint { date, net, balance }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    fn tx(id: i64, kind: TxKind, amount: i64, category: &str, when: NaiveDateTime) -> Transaction {
        Transaction {
            id,
            user_id: "u1".into(),
            kind,
            amount: Decimal::from(amount),
            category: category.into(),
            occurred_at: when,
            description: None,
        }
    }

    // 2024-03-15 is a Friday.
    fn friday() -> NaiveDateTime {
        at(2024, 3, 15)
    }

    #[test]
    fn empty_input_gives_empty_result() {
        let r = aggregate_at(&[], Window::ThisMonth, SortOrder::Descending, friday());
        assert_eq!(r, AggregationResult::default());
    }

    #[test]
    fn this_week_starts_on_monday() {
        let txs = vec![
            tx(1, TxKind::Expense, 10, "Food", at(2024, 3, 11)),
            tx(2, TxKind::Expense, 20, "Food", at(2024, 3, 3)),
            tx(3, TxKind::Expense, 30, "Food", at(2024, 3, 17)),
            tx(4, TxKind::Expense, 40, "Food", at(2024, 3, 18)),
        ];
        let r = aggregate_at(&txs, Window::ThisWeek, SortOrder::Ascending, friday());
        let ids: Vec<i64> = r.transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn monday_midnight_is_inside_the_week() {
        let monday = NaiveDate::from_ymd_opt(2024, 3, 11)
            .unwrap()
            .and_time(NaiveTime::MIN);
        assert!(Window::ThisWeek.contains(monday, friday()));
        assert!(!Window::ThisWeek.contains(monday - chrono::Duration::seconds(1), friday()));
    }

    #[test]
    fn this_month_and_last_30_days() {
        let txs = vec![
            tx(1, TxKind::Income, 100, "Salary", at(2024, 3, 1)),
            tx(2, TxKind::Expense, 10, "Food", at(2024, 2, 20)),
            tx(3, TxKind::Expense, 10, "Food", at(2024, 2, 14)),
        ];
        let month = aggregate_at(&txs, Window::ThisMonth, SortOrder::Ascending, friday());
        assert_eq!(month.transactions.len(), 1);

        let last30 = aggregate_at(&txs, Window::Last30Days, SortOrder::Ascending, friday());
        let ids: Vec<i64> = last30.transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn last_30_days_fenceposts() {
        let now = friday();
        let first = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let today_late = now.date().and_hms_opt(23, 59, 59).unwrap();

        assert!(Window::Last30Days.contains(first.and_time(NaiveTime::MIN), now));
        assert!(!Window::Last30Days.contains(
            first.and_time(NaiveTime::MIN) - chrono::Duration::seconds(1),
            now
        ));
        assert!(Window::Last30Days.contains(today_late, now));
        assert!(!Window::Last30Days.contains(at(2024, 3, 16), now));

        let txs = vec![
            tx(1, TxKind::Expense, 1, "Food", at(2024, 2, 14)),
            tx(2, TxKind::Expense, 1, "Food", at(2024, 2, 15)),
            tx(3, TxKind::Expense, 1, "Food", today_late),
        ];
        let r = aggregate_at(&txs, Window::Last30Days, SortOrder::Ascending, now);
        let ids: Vec<i64> = r.transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn custom_range_includes_both_endpoint_days() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let late = to.and_hms_opt(23, 59, 59).unwrap();
        let txs = vec![
            tx(1, TxKind::Expense, 1, "Food", from.and_time(NaiveTime::MIN)),
            tx(2, TxKind::Expense, 1, "Food", late),
            tx(3, TxKind::Expense, 1, "Food", at(2024, 1, 21)),
            tx(4, TxKind::Expense, 1, "Food", at(2024, 1, 9)),
        ];
        let r = aggregate_at(
            &txs,
            Window::Custom { from: to, to: from },
            SortOrder::Ascending,
            friday(),
        );
        let ids: Vec<i64> = r.transactions.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn sort_is_stable_for_equal_timestamps() {
        let when = at(2024, 3, 12);
        let txs = vec![
            tx(1, TxKind::Expense, 1, "A", when),
            tx(2, TxKind::Expense, 1, "B", when),
            tx(3, TxKind::Expense, 1, "C", at(2024, 3, 13)),
        ];
        let desc = filter_sorted(&txs, Window::All, SortOrder::Descending, friday());
        let ids: Vec<i64> = desc.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn breakdown_excludes_income() {
        let txs = vec![
            tx(1, TxKind::Income, 1000, "Salary", at(2024, 3, 12)),
            tx(2, TxKind::Expense, 200, "Food", at(2024, 3, 12)),
        ];
        let r = aggregate_at(&txs, Window::All, SortOrder::Descending, friday());
        assert_eq!(
            r.category_breakdown,
            vec![CategoryTotal {
                category: "Food".into(),
                amount: Decimal::from(200),
            }]
        );
    }

    #[test]
    fn breakdown_sorted_by_amount() {
        let txs = vec![
            tx(1, TxKind::Expense, 50, "Food", at(2024, 3, 12)),
            tx(2, TxKind::Expense, 300, "House Rent", at(2024, 3, 12)),
            tx(3, TxKind::Expense, 70, "Food", at(2024, 3, 13)),
        ];
        let cats: Vec<(String, Decimal)> = category_breakdown(&txs)
            .into_iter()
            .map(|c| (c.category, c.amount))
            .collect();
        assert_eq!(
            cats,
            vec![
                ("House Rent".to_string(), Decimal::from(300)),
                ("Food".to_string(), Decimal::from(120)),
            ]
        );
    }

    #[test]
    fn daily_balance_is_chronological_and_ends_at_net() {
        let txs = vec![
            tx(1, TxKind::Income, 1000, "Salary", at(2024, 3, 1)),
            tx(2, TxKind::Expense, 200, "Food", at(2024, 3, 3)),
            tx(3, TxKind::Expense, 50, "Transport", at(2024, 3, 1)),
            tx(4, TxKind::Income, 25, "Bonus", at(2024, 3, 2)),
        ];
        let r = aggregate_at(&txs, Window::All, SortOrder::Descending, friday());
        let series: Vec<(u32, Decimal, Decimal)> = r
            .daily_balance
            .iter()
            .map(|p| (p.date.day(), p.net, p.balance))
            .collect();
        assert_eq!(
            series,
            vec![
                (1, Decimal::from(950), Decimal::from(950)),
                (2, Decimal::from(25), Decimal::from(975)),
                (3, Decimal::from(-200), Decimal::from(775)),
            ]
        );
        assert_eq!(r.total_income, Decimal::from(1025));
        assert_eq!(r.total_expense, Decimal::from(250));
        assert_eq!(
            r.total_income - r.total_expense,
            r.daily_balance.last().unwrap().balance
        );
        assert_eq!(r.net, Decimal::from(775));
        assert_eq!(r.transactions[0].id, 2);
    }
}
