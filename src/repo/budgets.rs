// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::table::Table;
use crate::error::{Error, Result};
use crate::models::{Budget, BudgetPatch, NewBudget};
use crate::storage::Storage;
use chrono::Utc;
use rust_decimal::Decimal;

pub struct Budgets<'a> {
    pub(super) table: &'a mut Table<Budget>,
    pub(super) storage: &'a Storage,
}

fn check_amount(amount: Decimal) -> Result<()> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(Error::Invalid(format!(
            "budget amount must be positive, got {}",
            amount
        )))
    }
}

impl Budgets<'_> {
    pub fn all(&self) -> Vec<Budget> {
        self.table.rows().to_vec()
    }

    pub fn by_id(&self, id: i64) -> Option<Budget> {
        self.table.get(id).cloned()
    }

    pub fn by_user(&self, user_id: i64) -> Vec<Budget> {
        self.table
            .rows()
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect()
    }

    /// First budget row for (user, category). Several may exist; the oldest wins.
    pub fn for_category(&self, user_id: i64, category: &str) -> Option<Budget> {
        self.table
            .rows()
            .iter()
            .find(|b| b.user_id == user_id && b.category.eq_ignore_ascii_case(category))
            .cloned()
    }

    pub fn create(&mut self, new: NewBudget) -> Result<Budget> {
        check_amount(new.amount)?;
        let now = Utc::now();
        let budget = Budget {
            id: self.table.next_id()?,
            user_id: new.user_id,
            category: new.category,
            amount: new.amount,
            period: new.period,
            created_at: now,
            updated_at: now,
        };
        let budget = self.table.insert(self.storage, budget)?;
        tracing::info!(id = budget.id, category = %budget.category, "budget created");
        Ok(budget)
    }

    pub fn update(&mut self, id: i64, patch: BudgetPatch) -> Result<Option<Budget>> {
        let Some(mut budget) = self.table.get(id).cloned() else {
            return Ok(None);
        };
        if let Some(category) = patch.category {
            budget.category = category;
        }
        if let Some(amount) = patch.amount {
            check_amount(amount)?;
            budget.amount = amount;
        }
        if let Some(period) = patch.period {
            budget.period = period;
        }
        budget.updated_at = Utc::now();

        self.table.replace(self.storage, budget.clone())?;
        tracing::info!(id, "budget updated");
        Ok(Some(budget))
    }

    pub fn delete(&mut self, id: i64) -> Result<bool> {
        let removed = self.table.remove(self.storage, id)?;
        if removed {
            tracing::info!(id, "budget deleted");
        }
        Ok(removed)
    }
}
