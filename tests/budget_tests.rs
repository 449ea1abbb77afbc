// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use famledger::Database;
use famledger::models::{BudgetPatch, NewBudget, NewTransaction, Period, TransactionType};
use famledger::reports::{budget_status, monthly_cashflow, spend_by_category, totals};
use rust_decimal::Decimal;

fn d(s: &str) -> chrono::NaiveDate {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn spend(db: &mut Database, amount: &str, category: &str, date: &str) {
    let amount: Decimal = amount.parse().unwrap();
    let r#type = if amount < Decimal::ZERO {
        TransactionType::Expense
    } else {
        TransactionType::Income
    };
    db.transactions()
        .create(NewTransaction {
            user_id: 1,
            amount,
            r#type,
            category: category.into(),
            description: String::new(),
            date: d(date),
        })
        .unwrap();
}

fn setup() -> Database {
    let mut db = Database::in_memory();
    db.budgets()
        .create(NewBudget {
            user_id: 1,
            category: "Food".into(),
            amount: "50.00".parse().unwrap(),
            period: Period::Monthly,
        })
        .unwrap();
    db.budgets()
        .create(NewBudget {
            user_id: 1,
            category: "Travel".into(),
            amount: Decimal::from(20),
            period: Period::Weekly,
        })
        .unwrap();
    spend(&mut db, "-30", "Food", "2025-08-02");
    spend(&mut db, "-25.5", "food", "2025-08-20");
    spend(&mut db, "-99", "Food", "2025-07-31");
    spend(&mut db, "-15", "Travel", "2025-08-10"); // Sunday of the previous week
    spend(&mut db, "-5", "Travel", "2025-08-11");
    spend(&mut db, "3000", "Salary", "2025-08-01");
    db
}

#[test]
fn budget_amount_must_be_positive() {
    let mut db = Database::in_memory();
    let err = db
        .budgets()
        .create(NewBudget {
            user_id: 1,
            category: "Food".into(),
            amount: Decimal::ZERO,
            period: Period::Daily,
        })
        .unwrap_err();
    assert!(err.is_invalid());

    let mut db = setup();
    let patch = BudgetPatch {
        amount: Some(Decimal::from(-1)),
        ..BudgetPatch::default()
    };
    assert!(db.budgets().update(1, patch).unwrap_err().is_invalid());
    assert_eq!(db.budgets().by_id(1).unwrap().amount, Decimal::from(50));
}

#[test]
fn budget_status_counts_only_the_current_window() {
    let mut db = setup();
    let budgets = db.budgets().by_user(1);
    let txs = db.transactions().by_user(1);
    let status = budget_status(&budgets, &txs, d("2025-08-14"));

    assert_eq!(status.len(), 2);
    let food = &status[0];
    assert_eq!(food.category, "Food");
    assert_eq!((food.start, food.end), (d("2025-08-01"), d("2025-08-31")));
    assert_eq!(format!("{:.2}", food.spent), "55.50");
    assert_eq!(format!("{:.2}", food.remaining), "-5.50");
    assert!(food.over_budget);

    let travel = &status[1];
    assert_eq!((travel.start, travel.end), (d("2025-08-11"), d("2025-08-17")));
    assert_eq!(travel.spent, Decimal::from(5));
    assert!(!travel.over_budget);
}

#[test]
fn for_category_is_case_insensitive() {
    let mut db = setup();
    assert_eq!(db.budgets().for_category(1, "FOOD").unwrap().id, 1);
    assert!(db.budgets().for_category(2, "Food").is_none());
}

#[test]
fn totals_and_breakdowns() {
    let mut db = setup();
    let txs = db.transactions().by_user(1);

    let t = totals(&txs);
    assert_eq!(t.income, Decimal::from(3000));
    assert_eq!(format!("{:.2}", t.expenses), "174.50");
    assert_eq!(format!("{:.2}", t.net), "2825.50");

    let flow = monthly_cashflow(&txs, 12);
    assert_eq!(flow.len(), 2);
    assert_eq!(flow[0].month, "2025-08");
    assert_eq!(flow[1].month, "2025-07");
    assert_eq!(flow[1].expenses, Decimal::from(99));
    assert_eq!(monthly_cashflow(&txs, 1).len(), 1);

    let cats = spend_by_category(&txs, Some("2025-08"));
    let names: Vec<&str> = cats.iter().map(|c| c.category.as_str()).collect();
    // Category names are grouped exactly as recorded.
    assert_eq!(names, ["Food", "food", "Travel"]);
}
