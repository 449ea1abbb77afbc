// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::user;
use crate::repo::{Database, TransactionFilter};
use crate::reports;
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;

pub fn handle(db: &mut Database, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("totals", sub)) => totals(db, sub)?,
        Some(("cashflow", sub)) => cashflow(db, sub)?,
        Some(("spend-by-category", sub)) => spend_by_category(db, sub)?,
        _ => {}
    }
    Ok(())
}

fn month_arg(sub: &clap::ArgMatches) -> Result<Option<String>> {
    sub.get_one::<String>("month")
        .map(|s| parse_month(s))
        .transpose()
}

fn totals(db: &mut Database, sub: &clap::ArgMatches) -> Result<()> {
    let filter = TransactionFilter {
        month: month_arg(sub)?,
        ..TransactionFilter::for_user(user(sub)?)
    };
    let t = reports::totals(&db.transactions().filter(&filter));
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &t)? {
        let rows = vec![vec![
            fmt_money(&t.income),
            fmt_money(&t.expenses),
            fmt_money(&t.net),
        ]];
        println!("{}", pretty_table(&["Income", "Expenses", "Net"], rows));
    }
    Ok(())
}

fn cashflow(db: &mut Database, sub: &clap::ArgMatches) -> Result<()> {
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);
    let txs = db.transactions().by_user(user(sub)?);
    let data = reports::monthly_cashflow(&txs, months);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|f| {
                vec![
                    f.month.clone(),
                    fmt_money(&f.income),
                    fmt_money(&f.expenses),
                    fmt_money(&(f.income - f.expenses)),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expenses", "Net"], rows)
        );
    }
    Ok(())
}

fn spend_by_category(db: &mut Database, sub: &clap::ArgMatches) -> Result<()> {
    let month = month_arg(sub)?;
    let txs = db.transactions().by_user(user(sub)?);
    let data = reports::spend_by_category(&txs, month.as_deref());
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|c| vec![c.category.clone(), fmt_money(&c.spent)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }
    Ok(())
}
