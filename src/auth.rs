// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Password hashing, credential checks, and the one-time-code lifecycle.
//!
//! A code is *issued* by [`Database::issue_otp`], stays the authoritative code
//! for its contact until a newer one is issued, and ends either *used*
//! (consumed by a successful [`Database::verify_otp`]) or *expired* (computed
//! from `expires_at` at read time). Neither end state is ever revalidated.

use crate::error::{Error, Result};
use crate::models::{NewOtp, Otp, User, UserPatch};
use crate::notify::Notifier;
use crate::repo::Database;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::str::FromStr;

pub const OTP_LENGTH: usize = 6;
pub const DEFAULT_OTP_TTL_MINUTES: i64 = 5;

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

/// `false` for a wrong password and for a stored hash that does not parse.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is malformed");
            false
        }
    }
}

/// Six random decimal digits, never with a leading zero.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

/// How a verified code is retired. Both make it permanently invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OtpConsumption {
    #[default]
    MarkUsed,
    Remove,
}

impl FromStr for OtpConsumption {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mark" | "mark-used" | "mark_used" => Ok(OtpConsumption::MarkUsed),
            "remove" | "delete" => Ok(OtpConsumption::Remove),
            other => Err(format!("Unknown OTP consumption '{}' (use mark|remove)", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpOptions {
    pub ttl: Duration,
    pub consumption: OtpConsumption,
}

impl Default for OtpOptions {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(DEFAULT_OTP_TTL_MINUTES),
            consumption: OtpConsumption::default(),
        }
    }
}

impl Database {
    /// The user for `email` if `password` matches, with `last_login_at`
    /// stamped. Unknown email and wrong password both give `None`.
    pub fn verify_credentials(&mut self, email: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.users().by_email(email) else {
            tracing::debug!("credential check failed");
            return Ok(None);
        };
        if !verify_password(password, &user.password_hash) {
            tracing::debug!("credential check failed");
            return Ok(None);
        }
        let user = self.users().touch_last_login(user.id)?;
        if let Some(u) = &user {
            tracing::info!(id = u.id, "user signed in");
        }
        Ok(user)
    }

    /// Replaces the password after checking the current one. `false` if the
    /// user is unknown or `current` does not match.
    pub fn change_password(&mut self, user_id: i64, current: &str, new: &str) -> Result<bool> {
        let Some(user) = self.users().by_id(user_id) else {
            return Ok(false);
        };
        if !verify_password(current, &user.password_hash) {
            tracing::debug!(user_id, "current password did not match");
            return Ok(false);
        }
        let patch = UserPatch {
            password: Some(new.to_string()),
            ..UserPatch::default()
        };
        Ok(self.users().update(user_id, patch)?.is_some())
    }

    pub fn update_profile(
        &mut self,
        user_id: i64,
        username: &str,
        email: &str,
        phone: Option<&str>,
    ) -> Result<Option<User>> {
        let patch = UserPatch {
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            phone: Some(phone.map(str::to_string)),
            password: None,
        };
        self.users().update(user_id, patch)
    }

    /// Stores a fresh code for `contact` and hands it to `notifier`. The row is
    /// kept even when delivery fails; the failure is returned, not retried.
    pub fn issue_otp(
        &mut self,
        notifier: &dyn Notifier,
        contact: &str,
        user_id: Option<i64>,
    ) -> Result<Otp> {
        let ttl = self.otp_options().ttl;
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| Error::Invalid(format!("otp ttl out of range: {}", ttl)))?;
        let otp = self.otps().store(NewOtp {
            user_id,
            contact: contact.to_string(),
            otp_code: generate_code(),
            expires_at,
        })?;
        match notifier.send(contact, &otp.otp_code) {
            Ok(true) => Ok(otp),
            Ok(false) => {
                tracing::warn!(id = otp.id, "notifier reported non-delivery");
                Err(Error::Delivery(format!("code not delivered to {}", contact)))
            }
            Err(e) => {
                tracing::warn!(id = otp.id, error = %e, "notifier failed");
                Err(Error::Delivery(e.to_string()))
            }
        }
    }

    pub fn verify_otp(&mut self, contact: &str, code: &str) -> Result<bool> {
        self.verify_otp_at(contact, code, Utc::now())
    }

    /// Checks `code` against the authoritative code for `contact` at `now`
    /// and consumes it on a match. A mismatch changes nothing.
    pub fn verify_otp_at(&mut self, contact: &str, code: &str, now: DateTime<Utc>) -> Result<bool> {
        let Some(otp) = self.otps().active_for_contact_at(contact, now) else {
            return Ok(false);
        };
        if otp.otp_code != code {
            tracing::debug!(id = otp.id, "otp mismatch");
            return Ok(false);
        }
        let consumption = self.otp_options().consumption;
        let consumed = match consumption {
            OtpConsumption::MarkUsed => self.otps().mark_used(otp.id)?,
            OtpConsumption::Remove => self.otps().delete(otp.id)?,
        };
        tracing::info!(id = otp.id, ?consumption, "otp verified");
        Ok(consumed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trip() {
        let h = hash_password("s3cret").unwrap();
        assert!(h.starts_with("$argon2"));
        assert!(verify_password("s3cret", &h));
        assert!(!verify_password("S3cret", &h));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("password", "password"));
    }

    #[test]
    fn codes_are_six_digits() {
        for _ in 0..50 {
            let c = generate_code();
            assert_eq!(c.len(), OTP_LENGTH);
            assert!(c.chars().all(|ch| ch.is_ascii_digit()));
            assert_ne!(c.as_bytes()[0], b'0');
        }
    }

    #[test]
    fn consumption_parses() {
        assert_eq!("remove".parse::<OtpConsumption>(), Ok(OtpConsumption::Remove));
        assert_eq!("MARK".parse::<OtpConsumption>(), Ok(OtpConsumption::MarkUsed));
        assert!("burn".parse::<OtpConsumption>().is_err());
    }
}
