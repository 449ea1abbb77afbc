// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{arg, user};
use crate::repo::Database;
use anyhow::{Result, bail};
use serde_json::json;

pub fn handle(db: &mut Database, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(db, sub),
        _ => Ok(()),
    }
}

fn export_transactions(db: &mut Database, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = arg(sub, "format")?.to_lowercase();
    let out = arg(sub, "out")?;
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    // Oldest first, the order the ledger was written in.
    let mut txs = db.transactions().by_user(user(sub)?);
    txs.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record(["id", "date", "type", "amount", "category", "description"])?;
        for t in &txs {
            wtr.write_record([
                t.id.to_string(),
                t.date.to_string(),
                t.r#type.to_string(),
                t.amount.to_string(),
                t.category.clone(),
                t.description.clone(),
            ])?;
        }
        wtr.flush()?;
    } else {
        let items: Vec<_> = txs
            .iter()
            .map(|t| {
                json!({
                    "id": t.id, "date": t.date.to_string(), "type": t.r#type.as_str(),
                    "amount": t.amount.to_string(), "category": t.category, "description": t.description
                })
            })
            .collect();
        std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
    }
    tracing::info!(count = txs.len(), format = %fmt, "transactions exported");
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}
