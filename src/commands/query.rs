// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::arg;
use crate::query::QueryOutcome;
use crate::repo::Database;
use anyhow::Result;
use serde_json::Value;

/// `42` and `null` parse as JSON; anything that is not valid JSON is taken
/// as a plain string.
pub fn parse_param(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub fn handle(db: &mut Database, m: &clap::ArgMatches) -> Result<()> {
    let text = arg(m, "text")?;
    let params: Vec<Value> = m
        .get_many::<String>("params")
        .map(|vals| vals.map(|s| parse_param(s)).collect())
        .unwrap_or_default();

    match db.query(text, &params)? {
        QueryOutcome::Rows(rows) => println!("{}", serde_json::to_string_pretty(&rows)?),
        QueryOutcome::Inserted { id } => println!("Inserted id {}", id),
        QueryOutcome::Affected { rows } => println!("{} row(s) affected", rows),
        QueryOutcome::Empty => println!("No matching operation"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_prefer_json() {
        assert_eq!(parse_param("7"), Value::from(7));
        assert_eq!(parse_param("null"), Value::Null);
        assert_eq!(parse_param("-50.25"), Value::from(-50.25));
        assert_eq!(parse_param("Food"), Value::from("Food"));
        assert_eq!(parse_param("2025-08-01"), Value::from("2025-08-01"));
    }
}
