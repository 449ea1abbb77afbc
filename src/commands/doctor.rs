// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::repo::Database;
use crate::utils::pretty_table;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub kind: &'static str,
    pub detail: String,
}

fn issue(kind: &'static str, detail: String) -> Issue {
    Issue { kind, detail }
}

/// Inconsistencies the repositories would not have let through, which a
/// hand-edited or older store can still contain.
pub fn diagnose(db: &Database, now: DateTime<Utc>) -> Vec<Issue> {
    let mut out = Vec::new();
    let users: HashSet<i64> = db.user_rows().iter().map(|u| u.id).collect();

    // 1) Rows owned by a user that no longer exists
    for t in db.transaction_rows() {
        if !users.contains(&t.user_id) {
            out.push(issue(
                "txn_orphan_user",
                format!("transaction {} -> user {}", t.id, t.user_id),
            ));
        }
        if !t.r#type.accepts(t.amount) {
            out.push(issue(
                "txn_sign_mismatch",
                format!("transaction {}: {} as {}", t.id, t.amount, t.r#type),
            ));
        }
    }
    for b in db.budget_rows() {
        if !users.contains(&b.user_id) {
            out.push(issue(
                "budget_orphan_user",
                format!("budget {} -> user {}", b.id, b.user_id),
            ));
        }
    }

    // 2) More than one budget for the same user and category
    let mut seen: HashMap<(i64, String), Vec<i64>> = HashMap::new();
    for b in db.budget_rows() {
        seen.entry((b.user_id, b.category.to_lowercase()))
            .or_default()
            .push(b.id);
    }
    let mut dups: Vec<_> = seen.into_iter().filter(|(_, ids)| ids.len() > 1).collect();
    dups.sort();
    for ((user_id, category), ids) in dups {
        let ids: Vec<String> = ids.iter().map(i64::to_string).collect();
        out.push(issue(
            "duplicate_budget",
            format!("user {} / {}: ids {}", user_id, category, ids.join(",")),
        ));
    }

    // 3) Codes that can never verify again
    let inert = db.otp_rows().iter().filter(|o| !o.is_active(now)).count();
    if inert > 0 {
        out.push(issue(
            "inert_otps",
            format!("{} used or expired (run `otp purge`)", inert),
        ));
    }
    out
}

pub fn handle(db: &Database) -> Result<()> {
    let found = diagnose(db, Utc::now());
    if found.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = found
            .into_iter()
            .map(|i| vec![i.kind.to_string(), i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
