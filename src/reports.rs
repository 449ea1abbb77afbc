// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregations behind the dashboard, budget and report views.
//! Expenses are reported as positive magnitudes throughout.

use crate::models::{Budget, Period, Transaction, TransactionType};
use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

pub fn totals(txs: &[Transaction]) -> Totals {
    let mut t = Totals::default();
    for tx in txs {
        match tx.r#type {
            TransactionType::Income => t.income += tx.amount,
            TransactionType::Expense => t.expenses += tx.amount.abs(),
        }
    }
    t.net = t.income - t.expenses;
    t
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthFlow {
    pub month: String, // YYYY-MM
    pub income: Decimal,
    pub expenses: Decimal,
}

/// Per-month income and expenses, newest month first, at most `months` rows.
pub fn monthly_cashflow(txs: &[Transaction], months: usize) -> Vec<MonthFlow> {
    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for tx in txs {
        let entry = map
            .entry(tx.date.format("%Y-%m").to_string())
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match tx.r#type {
            TransactionType::Income => entry.0 += tx.amount,
            TransactionType::Expense => entry.1 += tx.amount.abs(),
        }
    }
    map.into_iter()
        .rev()
        .take(months)
        .map(|(month, (income, expenses))| MonthFlow {
            month,
            income,
            expenses,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySpend {
    pub category: String,
    pub spent: Decimal,
}

/// Expense totals per category, largest first (ties by name). `month` is
/// `YYYY-MM`; `None` covers everything.
pub fn spend_by_category(txs: &[Transaction], month: Option<&str>) -> Vec<CategorySpend> {
    let mut agg: HashMap<&str, Decimal> = HashMap::new();
    for tx in txs {
        if tx.r#type != TransactionType::Expense {
            continue;
        }
        if let Some(m) = month {
            if tx.date.format("%Y-%m").to_string() != m {
                continue;
            }
        }
        *agg.entry(tx.category.as_str()).or_insert(Decimal::ZERO) += tx.amount.abs();
    }
    let mut items: Vec<CategorySpend> = agg
        .into_iter()
        .map(|(category, spent)| CategorySpend {
            category: category.to_string(),
            spent,
        })
        .collect();
    items.sort_by(|a, b| b.spent.cmp(&a.spent).then_with(|| a.category.cmp(&b.category)));
    items
}

/// Inclusive first and last day of the `period` window that contains `day`.
/// Weeks run Monday to Sunday.
pub fn period_window(period: Period, day: NaiveDate) -> (NaiveDate, NaiveDate) {
    match period {
        Period::Daily => (day, day),
        Period::Weekly => {
            let start = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
            (start, start + Duration::days(6))
        }
        Period::Monthly => {
            let start = day.with_day(1).unwrap_or(day);
            let next = if start.month() == 12 {
                NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
            };
            let end = next.map_or(day, |n| n - Duration::days(1));
            (start, end)
        }
        Period::Yearly => {
            let start = NaiveDate::from_ymd_opt(day.year(), 1, 1).unwrap_or(day);
            let end = NaiveDate::from_ymd_opt(day.year(), 12, 31).unwrap_or(day);
            (start, end)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetStatus {
    pub budget_id: i64,
    pub category: String,
    pub period: Period,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub over_budget: bool,
}

/// Spend against each budget within its current window around `today`,
/// counting only the budget owner's expenses in the budget's category.
pub fn budget_status(
    budgets: &[Budget],
    txs: &[Transaction],
    today: NaiveDate,
) -> Vec<BudgetStatus> {
    budgets
        .iter()
        .map(|b| {
            let (start, end) = period_window(b.period, today);
            let spent: Decimal = txs
                .iter()
                .filter(|t| {
                    t.user_id == b.user_id
                        && t.r#type == TransactionType::Expense
                        && t.category.eq_ignore_ascii_case(&b.category)
                        && t.date >= start
                        && t.date <= end
                })
                .map(|t| t.amount.abs())
                .sum();
            BudgetStatus {
                budget_id: b.id,
                category: b.category.clone(),
                period: b.period,
                start,
                end,
                limit: b.amount,
                spent,
                remaining: b.amount - spent,
                over_budget: spent > b.amount,
            }
        })
        .collect()
}
