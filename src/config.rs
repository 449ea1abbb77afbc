// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::auth::{DEFAULT_OTP_TTL_MINUTES, OtpConsumption, OtpOptions};
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_LOG_FILTER: &str = "famledger=info";
/// One year.
pub const MAX_OTP_TTL_MINUTES: i64 = 525_600;

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub otp_ttl_minutes: i64,
    pub otp_consumption: OtpConsumption,
    pub webhook_url: Option<String>,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| env::var(k).ok())
    }

    /// Builds the config from any variable source; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = match lookup("FAMLEDGER_DB") {
            Some(p) if !p.trim().is_empty() => PathBuf::from(p),
            _ => crate::db::default_db_path()?,
        };
        let otp_ttl_minutes = match lookup("FAMLEDGER_OTP_TTL_MINUTES") {
            Some(v) => v
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|m| (1..=MAX_OTP_TTL_MINUTES).contains(m))
                .with_context(|| {
                    format!(
                        "FAMLEDGER_OTP_TTL_MINUTES must be an integer in 1..={}, got '{}'",
                        MAX_OTP_TTL_MINUTES, v
                    )
                })?,
            None => DEFAULT_OTP_TTL_MINUTES,
        };
        let otp_consumption = match lookup("FAMLEDGER_OTP_CONSUME") {
            Some(v) => v.parse().map_err(anyhow::Error::msg)?,
            None => OtpConsumption::default(),
        };
        Ok(Self {
            db_path,
            otp_ttl_minutes,
            otp_consumption,
            webhook_url: lookup("FAMLEDGER_WEBHOOK_URL").filter(|u| !u.trim().is_empty()),
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    pub fn otp_options(&self) -> OtpOptions {
        OtpOptions {
            ttl: chrono::Duration::minutes(self.otp_ttl_minutes),
            consumption: self.otp_consumption,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn cfg(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn explicit_values_win() {
        let c = cfg(&[
            ("FAMLEDGER_DB", "/tmp/x.sqlite"),
            ("FAMLEDGER_OTP_TTL_MINUTES", "10"),
            ("FAMLEDGER_OTP_CONSUME", "remove"),
            ("FAMLEDGER_WEBHOOK_URL", "http://localhost:9000/otp"),
        ])
        .unwrap();
        assert_eq!(c.db_path, PathBuf::from("/tmp/x.sqlite"));
        assert_eq!(c.otp_options().ttl, chrono::Duration::minutes(10));
        assert_eq!(c.otp_consumption, OtpConsumption::Remove);
        assert_eq!(c.webhook_url.as_deref(), Some("http://localhost:9000/otp"));
        assert_eq!(c.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn bad_ttl_is_rejected() {
        assert!(cfg(&[("FAMLEDGER_DB", "x.sqlite"), ("FAMLEDGER_OTP_TTL_MINUTES", "0")]).is_err());
        assert!(cfg(&[("FAMLEDGER_DB", "x.sqlite"), ("FAMLEDGER_OTP_TTL_MINUTES", "soon")]).is_err());
    }

    #[test]
    fn ttl_past_one_year_is_rejected() {
        let max = MAX_OTP_TTL_MINUTES.to_string();
        let c = cfg(&[("FAMLEDGER_DB", "x.sqlite"), ("FAMLEDGER_OTP_TTL_MINUTES", &max)]).unwrap();
        assert_eq!(c.otp_options().ttl, chrono::Duration::minutes(MAX_OTP_TTL_MINUTES));

        let over = (MAX_OTP_TTL_MINUTES + 1).to_string();
        assert!(cfg(&[("FAMLEDGER_DB", "x.sqlite"), ("FAMLEDGER_OTP_TTL_MINUTES", &over)]).is_err());
        assert!(
            cfg(&[("FAMLEDGER_DB", "x.sqlite"), ("FAMLEDGER_OTP_TTL_MINUTES", "999999999999999")])
                .is_err()
        );
    }

    #[test]
    fn defaults_for_otp() {
        let c = cfg(&[("FAMLEDGER_DB", "x.sqlite")]).unwrap();
        assert_eq!(c.otp_options(), OtpOptions::default());
        assert!(c.webhook_url.is_none());
    }
}
