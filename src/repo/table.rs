// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{Error, Result};
use crate::models::Record;
use crate::storage::Storage;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// One hydrated collection. Every mutation writes the whole next collection
/// to storage first and only swaps it in once the write succeeded.
#[derive(Debug)]
pub(crate) struct Table<T> {
    key: &'static str,
    rows: Vec<T>,
}

impl<T> Table<T>
where
    T: Record + Clone + Serialize + DeserializeOwned,
{
    pub(crate) fn load(storage: &Storage, key: &'static str) -> Self {
        let rows: Vec<T> = storage.get_or_default(key);
        tracing::debug!(key, count = rows.len(), "hydrated");
        Self { key, rows }
    }

    pub(crate) fn rows(&self) -> &[T] {
        &self.rows
    }

    pub(crate) fn get(&self, id: i64) -> Option<&T> {
        self.rows.iter().find(|r| r.id() == id)
    }

    /// `max(id) + 1`, or 1 for an empty collection.
    pub(crate) fn next_id(&self) -> Result<i64> {
        match self.rows.iter().map(Record::id).max() {
            None => Ok(1),
            Some(m) => m
                .checked_add(1)
                .ok_or_else(|| Error::Invalid(format!("{}: id space exhausted", self.key))),
        }
    }

    fn commit(&mut self, storage: &Storage, next: Vec<T>) -> Result<()> {
        if !storage.set(self.key, &next) {
            return Err(Error::Persist(self.key.to_string()));
        }
        self.rows = next;
        Ok(())
    }

    pub(crate) fn insert(&mut self, storage: &Storage, row: T) -> Result<T> {
        let mut next = self.rows.clone();
        next.push(row.clone());
        self.commit(storage, next)?;
        Ok(row)
    }

    /// Swaps in `row` for the stored row with the same id. `false` if none.
    pub(crate) fn replace(&mut self, storage: &Storage, row: T) -> Result<bool> {
        let Some(idx) = self.rows.iter().position(|r| r.id() == row.id()) else {
            return Ok(false);
        };
        let mut next = self.rows.clone();
        next[idx] = row;
        self.commit(storage, next)?;
        Ok(true)
    }

    pub(crate) fn remove(&mut self, storage: &Storage, id: i64) -> Result<bool> {
        Ok(self.remove_where(storage, |r| r.id() == id)? > 0)
    }

    /// Drops every row matching `pred`; returns how many went.
    pub(crate) fn remove_where<F>(&mut self, storage: &Storage, pred: F) -> Result<usize>
    where
        F: Fn(&T) -> bool,
    {
        let next: Vec<T> = self.rows.iter().filter(|r| !pred(r)).cloned().collect();
        let removed = self.rows.len() - next.len();
        if removed > 0 {
            self.commit(storage, next)?;
        }
        Ok(removed)
    }

    pub(crate) fn reload(&mut self, storage: &Storage) {
        self.rows = storage.get_or_default(self.key);
    }
}
