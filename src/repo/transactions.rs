// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::table::Table;
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction, TransactionPatch, TransactionType};
use crate::storage::Storage;
use chrono::Utc;
use rust_decimal::Decimal;

pub struct Transactions<'a> {
    pub(super) table: &'a mut Table<Transaction>,
    pub(super) storage: &'a Storage,
}

/// Narrowing for [`Transactions::filter`]. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub user_id: Option<i64>,
    pub r#type: Option<TransactionType>,
    pub category: Option<String>,
    /// `YYYY-MM`
    pub month: Option<String>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn for_user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    pub fn matches(&self, t: &Transaction) -> bool {
        if self.user_id.is_some_and(|u| u != t.user_id) {
            return false;
        }
        if self.r#type.is_some_and(|ty| ty != t.r#type) {
            return false;
        }
        if let Some(cat) = &self.category {
            if !t.category.eq_ignore_ascii_case(cat) {
                return false;
            }
        }
        if let Some(month) = &self.month {
            if t.date.format("%Y-%m").to_string() != *month {
                return false;
            }
        }
        true
    }
}

fn check_sign(r#type: TransactionType, amount: Decimal) -> Result<()> {
    if r#type.accepts(amount) {
        Ok(())
    } else {
        Err(Error::Invalid(format!(
            "amount {} does not agree with type '{}'",
            amount, r#type
        )))
    }
}

impl Transactions<'_> {
    pub fn all(&self) -> Vec<Transaction> {
        self.table.rows().to_vec()
    }

    pub fn by_id(&self, id: i64) -> Option<Transaction> {
        self.table.get(id).cloned()
    }

    /// The user's rows, newest date first.
    pub fn by_user(&self, user_id: i64) -> Vec<Transaction> {
        self.filter(&TransactionFilter::for_user(user_id))
    }

    /// Matching rows, newest date first (then highest id), capped by `limit`.
    pub fn filter(&self, f: &TransactionFilter) -> Vec<Transaction> {
        let mut rows: Vec<Transaction> = self
            .table
            .rows()
            .iter()
            .filter(|t| f.matches(t))
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.date, b.id).cmp(&(a.date, a.id)));
        if let Some(limit) = f.limit {
            rows.truncate(limit);
        }
        rows
    }

    pub fn create(&mut self, new: NewTransaction) -> Result<Transaction> {
        check_sign(new.r#type, new.amount)?;
        if new.category.trim().is_empty() {
            return Err(Error::Invalid("category must not be empty".into()));
        }
        let now = Utc::now();
        let tx = Transaction {
            id: self.table.next_id()?,
            user_id: new.user_id,
            amount: new.amount,
            r#type: new.r#type,
            category: new.category,
            description: new.description,
            date: new.date,
            created_at: now,
            updated_at: now,
        };
        let tx = self.table.insert(self.storage, tx)?;
        tracing::info!(id = tx.id, user_id = tx.user_id, amount = %tx.amount, "transaction created");
        Ok(tx)
    }

    /// Merges `patch`; the merged row must still satisfy the sign rule.
    pub fn update(&mut self, id: i64, patch: TransactionPatch) -> Result<Option<Transaction>> {
        let Some(mut tx) = self.table.get(id).cloned() else {
            return Ok(None);
        };
        if let Some(amount) = patch.amount {
            tx.amount = amount;
        }
        if let Some(ty) = patch.r#type {
            tx.r#type = ty;
        }
        if let Some(category) = patch.category {
            tx.category = category;
        }
        if let Some(description) = patch.description {
            tx.description = description;
        }
        if let Some(date) = patch.date {
            tx.date = date;
        }
        check_sign(tx.r#type, tx.amount)?;
        tx.updated_at = Utc::now();

        self.table.replace(self.storage, tx.clone())?;
        tracing::info!(id, "transaction updated");
        Ok(Some(tx))
    }

    pub fn delete(&mut self, id: i64) -> Result<bool> {
        let removed = self.table.remove(self.storage, id)?;
        if removed {
            tracing::info!(id, "transaction deleted");
        }
        Ok(removed)
    }
}
