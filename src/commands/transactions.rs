// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{arg, id, user};
use crate::models::{NewTransaction, Transaction, TransactionPatch, TransactionType};
use crate::repo::{Database, TransactionFilter};
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_decimal, parse_month, pretty_table};
use anyhow::{Result, bail};
use serde::Serialize;

pub fn handle(db: &mut Database, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(db, sub)?,
        Some(("list", sub)) => list(db, sub)?,
        Some(("edit", sub)) => edit(db, sub)?,
        Some(("rm", sub)) => {
            let id = id(sub)?;
            if !db.transactions().delete(id)? {
                bail!("No transaction with id {}", id);
            }
            println!("Removed transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn parse_type(s: &str) -> Result<TransactionType> {
    s.parse().map_err(anyhow::Error::msg)
}

fn add(db: &mut Database, sub: &clap::ArgMatches) -> Result<()> {
    let user_id = user(sub)?;
    if db.users().by_id(user_id).is_none() {
        bail!("No user with id {}", user_id);
    }
    let tx = db.transactions().create(NewTransaction {
        user_id,
        amount: parse_decimal(arg(sub, "amount")?)?,
        r#type: parse_type(arg(sub, "type")?)?,
        category: arg(sub, "category")?.to_string(),
        description: sub
            .get_one::<String>("description")
            .cloned()
            .unwrap_or_default(),
        date: parse_date(arg(sub, "date")?)?,
    })?;
    println!(
        "Recorded {} {} on {} in '{}' (id {})",
        tx.r#type,
        fmt_money(&tx.amount),
        tx.date,
        tx.category,
        tx.id
    );
    Ok(())
}

fn edit(db: &mut Database, sub: &clap::ArgMatches) -> Result<()> {
    let id = id(sub)?;
    let patch = TransactionPatch {
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        r#type: sub
            .get_one::<String>("type")
            .map(|s| parse_type(s))
            .transpose()?,
        category: sub.get_one::<String>("category").cloned(),
        description: sub.get_one::<String>("description").cloned(),
        date: sub
            .get_one::<String>("date")
            .map(|s| parse_date(s))
            .transpose()?,
    };
    match db.transactions().update(id, patch)? {
        Some(tx) => println!("Updated transaction {}", tx.id),
        None => bail!("No transaction with id {}", id),
    }
    Ok(())
}

fn list(db: &mut Database, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(db, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.user_id.to_string(),
                    r.r#type.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "User", "Type", "Amount", "Category", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub r#type: String,
    pub amount: String,
    pub category: String,
    pub description: String,
}

impl From<Transaction> for TransactionRow {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            date: t.date.to_string(),
            user_id: t.user_id,
            r#type: t.r#type.to_string(),
            amount: fmt_money(&t.amount),
            category: t.category,
            description: t.description,
        }
    }
}

/// Applies the `tx list` filters, newest first.
pub fn query_rows(db: &mut Database, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let filter = TransactionFilter {
        user_id: sub.get_one::<i64>("user").copied(),
        r#type: sub
            .get_one::<String>("type")
            .map(|s| parse_type(s))
            .transpose()?,
        category: sub.get_one::<String>("category").cloned(),
        month: sub
            .get_one::<String>("month")
            .map(|s| parse_month(s))
            .transpose()?,
        limit: sub.get_one::<usize>("limit").copied(),
    };
    Ok(db
        .transactions()
        .filter(&filter)
        .into_iter()
        .map(TransactionRow::from)
        .collect())
}
