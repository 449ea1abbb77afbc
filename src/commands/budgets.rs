// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{arg, id, user};
use crate::models::{BudgetPatch, NewBudget, Period};
use crate::repo::Database;
use crate::reports::budget_status;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{Result, bail};

pub fn handle(db: &mut Database, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(db, sub)?,
        Some(("list", sub)) => list(db, sub)?,
        Some(("edit", sub)) => edit(db, sub)?,
        Some(("rm", sub)) => {
            let id = id(sub)?;
            if !db.budgets().delete(id)? {
                bail!("No budget with id {}", id);
            }
            println!("Removed budget {}", id);
        }
        Some(("status", sub)) => status(db, sub)?,
        _ => {}
    }
    Ok(())
}

fn parse_period(s: &str) -> Result<Period> {
    s.parse().map_err(anyhow::Error::msg)
}

fn set(db: &mut Database, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = user(sub)?;
    if db.users().by_id(user_id).is_none() {
        bail!("No user with id {}", user_id);
    }
    let b = db.budgets().create(NewBudget {
        user_id,
        category: arg(sub, "category")?.to_string(),
        amount: parse_decimal(arg(sub, "amount")?)?,
        period: parse_period(arg(sub, "period")?)?,
    })?;
    println!(
        "Budget {} set: {} {} per {}",
        b.id,
        b.category,
        fmt_money(&b.amount),
        b.period
    );
    Ok(())
}

fn list(db: &mut Database, sub: &clap::ArgMatches) -> Result<()> {
    let budgets = match sub.get_one::<i64>("user") {
        Some(u) => db.budgets().by_user(*u),
        None => db.budgets().all(),
    };
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &budgets)? {
        let data = budgets
            .into_iter()
            .map(|b| {
                vec![
                    b.id.to_string(),
                    b.user_id.to_string(),
                    b.category,
                    b.period.to_string(),
                    fmt_money(&b.amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "User", "Category", "Period", "Budget"], data)
        );
    }
    Ok(())
}

fn edit(db: &mut Database, sub: &clap::ArgMatches) -> Result<()> {
    let id = id(sub)?;
    let patch = BudgetPatch {
        category: sub.get_one::<String>("category").cloned(),
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        period: sub
            .get_one::<String>("period")
            .map(|s| parse_period(s))
            .transpose()?,
    };
    match db.budgets().update(id, patch)? {
        Some(b) => println!("Updated budget {}", b.id),
        None => bail!("No budget with id {}", id),
    }
    Ok(())
}

fn status(db: &mut Database, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = user(sub)?;
    let today = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => chrono::Local::now().date_naive(),
    };
    let budgets = db.budgets().by_user(user_id);
    let txs = db.transactions().by_user(user_id);
    let data = budget_status(&budgets, &txs, today);

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|s| {
                vec![
                    s.category.clone(),
                    format!("{}..{}", s.start, s.end),
                    fmt_money(&s.limit),
                    fmt_money(&s.spent),
                    fmt_money(&s.remaining),
                    if s.over_budget { "OVER".into() } else { "ok".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Category", "Window", "Budget", "Spent", "Remaining", "Status"],
                rows
            )
        );
    }
    Ok(())
}
