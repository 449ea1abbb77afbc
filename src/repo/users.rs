// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::table::Table;
use crate::auth::hash_password;
use crate::error::{Error, Result};
use crate::models::{NewUser, User, UserPatch};
use crate::storage::Storage;
use chrono::Utc;

pub struct Users<'a> {
    pub(super) table: &'a mut Table<User>,
    pub(super) storage: &'a Storage,
}

fn normalize_phone(phone: Option<String>) -> Option<String> {
    phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
}

impl Users<'_> {
    pub fn all(&self) -> Vec<User> {
        self.table.rows().to_vec()
    }

    pub fn count(&self) -> usize {
        self.table.rows().len()
    }

    pub fn by_id(&self, id: i64) -> Option<User> {
        self.table.get(id).cloned()
    }

    /// Lookups trim their input the same way `create` trims what it stores.
    pub fn by_email(&self, email: &str) -> Option<User> {
        let email = email.trim();
        self.table.rows().iter().find(|u| u.email == email).cloned()
    }

    pub fn by_phone(&self, phone: &str) -> Option<User> {
        let phone = phone.trim();
        if phone.is_empty() {
            return None;
        }
        self.table
            .rows()
            .iter()
            .find(|u| u.phone.as_deref() == Some(phone))
            .cloned()
    }

    /// Rejects a taken email or phone before anything is written.
    pub fn create(&mut self, new: NewUser) -> Result<User> {
        let email = new.email.trim().to_string();
        if email.is_empty() {
            return Err(Error::Invalid("email must not be empty".into()));
        }
        let phone = normalize_phone(new.phone);
        self.ensure_unique(None, &email, phone.as_deref())?;

        let password_hash = hash_password(&new.password)?;
        let now = Utc::now();
        let user = User {
            id: self.table.next_id()?,
            username: new.username,
            email,
            phone,
            password_hash,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        };
        let user = self.table.insert(self.storage, user)?;
        tracing::info!(id = user.id, email = %user.email, "user created");
        Ok(user)
    }

    /// Merges `patch` over the stored user. `Ok(None)` if the id is unknown.
    pub fn update(&mut self, id: i64, patch: UserPatch) -> Result<Option<User>> {
        let Some(current) = self.table.get(id).cloned() else {
            return Ok(None);
        };
        let mut next = current;
        if let Some(username) = patch.username {
            next.username = username;
        }
        if let Some(email) = patch.email {
            let email = email.trim().to_string();
            if email.is_empty() {
                return Err(Error::Invalid("email must not be empty".into()));
            }
            next.email = email;
        }
        if let Some(phone) = patch.phone {
            next.phone = normalize_phone(phone);
        }
        self.ensure_unique(Some(id), &next.email, next.phone.as_deref())?;
        if let Some(password) = patch.password {
            next.password_hash = hash_password(&password)?;
        }
        next.updated_at = Utc::now();

        self.table.replace(self.storage, next.clone())?;
        tracing::info!(id, "user updated");
        Ok(Some(next))
    }

    pub fn touch_last_login(&mut self, id: i64) -> Result<Option<User>> {
        let Some(mut user) = self.table.get(id).cloned() else {
            return Ok(None);
        };
        let now = Utc::now();
        user.last_login_at = Some(now);
        user.updated_at = now;
        self.table.replace(self.storage, user.clone())?;
        Ok(Some(user))
    }

    pub fn delete(&mut self, id: i64) -> Result<bool> {
        let removed = self.table.remove(self.storage, id)?;
        if removed {
            tracing::info!(id, "user deleted");
        }
        Ok(removed)
    }

    fn ensure_unique(&self, except: Option<i64>, email: &str, phone: Option<&str>) -> Result<()> {
        let others = self.table.rows().iter().filter(|u| Some(u.id) != except);
        for u in others {
            if u.email == email {
                return Err(Error::Conflict(
                    "User with this email already exists".into(),
                ));
            }
            if phone.is_some() && u.phone.as_deref() == phone {
                return Err(Error::Conflict(
                    "User with this phone number already exists".into(),
                ));
            }
        }
        Ok(())
    }
}
