// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::table::Table;
use crate::error::{Error, Result};
use crate::models::Category;
use crate::storage::Storage;
use chrono::Utc;

pub struct Categories<'a> {
    pub(super) table: &'a mut Table<Category>,
    pub(super) storage: &'a Storage,
}

impl Categories<'_> {
    pub fn all(&self) -> Vec<Category> {
        self.table.rows().to_vec()
    }

    pub fn by_id(&self, id: i64) -> Option<Category> {
        self.table.get(id).cloned()
    }

    pub fn by_name(&self, name: &str) -> Option<Category> {
        self.table
            .rows()
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .cloned()
    }

    pub fn create(&mut self, name: &str, icon: Option<&str>) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Invalid("category name must not be empty".into()));
        }
        if self.by_name(name).is_some() {
            return Err(Error::Conflict(format!("Category '{}' already exists", name)));
        }
        let category = Category {
            id: self.table.next_id()?,
            name: name.to_string(),
            icon: icon.map(str::to_string),
            created_at: Utc::now(),
        };
        let category = self.table.insert(self.storage, category)?;
        tracing::info!(id = category.id, name = %category.name, "category created");
        Ok(category)
    }

    pub fn delete(&mut self, id: i64) -> Result<bool> {
        self.table.remove(self.storage, id)
    }
}
