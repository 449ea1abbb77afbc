// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::table::Table;
use crate::error::{Error, Result};
use crate::models::{NewOtp, Otp};
use crate::storage::Storage;
use chrono::{DateTime, Utc};

pub struct Otps<'a> {
    pub(super) table: &'a mut Table<Otp>,
    pub(super) storage: &'a Storage,
}

impl Otps<'_> {
    pub fn all(&self) -> Vec<Otp> {
        self.table.rows().to_vec()
    }

    pub fn by_id(&self, id: i64) -> Option<Otp> {
        self.table.get(id).cloned()
    }

    pub fn for_contact(&self, contact: &str) -> Vec<Otp> {
        self.table
            .rows()
            .iter()
            .filter(|o| o.contact == contact)
            .cloned()
            .collect()
    }

    /// Appends a new code. Older codes for the same contact stay in place and
    /// simply lose to this one at lookup time.
    pub fn store(&mut self, new: NewOtp) -> Result<Otp> {
        if new.contact.trim().is_empty() {
            return Err(Error::Invalid("contact must not be empty".into()));
        }
        let otp = Otp {
            id: self.table.next_id()?,
            user_id: new.user_id,
            contact: new.contact,
            otp_code: new.otp_code,
            expires_at: new.expires_at,
            is_used: false,
            created_at: Utc::now(),
        };
        let otp = self.table.insert(self.storage, otp)?;
        tracing::info!(id = otp.id, expires_at = %otp.expires_at, "otp stored");
        Ok(otp)
    }

    pub fn active_for_contact(&self, contact: &str) -> Option<Otp> {
        self.active_for_contact_at(contact, Utc::now())
    }

    /// The authoritative code for `contact`: unused, unexpired at `now`, and
    /// newest by `created_at` (higher id on a tie).
    pub fn active_for_contact_at(&self, contact: &str, now: DateTime<Utc>) -> Option<Otp> {
        self.table
            .rows()
            .iter()
            .filter(|o| o.contact == contact && o.is_active(now))
            .max_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)))
            .cloned()
    }

    pub fn mark_used(&mut self, id: i64) -> Result<bool> {
        let Some(mut otp) = self.table.get(id).cloned() else {
            return Ok(false);
        };
        otp.is_used = true;
        self.table.replace(self.storage, otp)?;
        tracing::info!(id, "otp marked used");
        Ok(true)
    }

    pub fn delete(&mut self, id: i64) -> Result<bool> {
        self.table.remove(self.storage, id)
    }

    /// Hard-deletes used and expired codes. Returns how many were removed.
    pub fn purge_inert(&mut self, now: DateTime<Utc>) -> Result<usize> {
        let removed = self.table.remove_where(self.storage, |o| !o.is_active(now))?;
        if removed > 0 {
            tracing::info!(removed, "purged inert otps");
        }
        Ok(removed)
    }
}
