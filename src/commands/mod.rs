// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budgets;
pub mod categories;
pub mod doctor;
pub mod exporter;
pub mod otp;
pub mod query;
pub mod reports;
pub mod transactions;
pub mod users;

use anyhow::{Context, Result};

/// A required string argument. clap enforces presence; this keeps the
/// handlers free of unwraps when a matches set is built by hand.
pub(crate) fn arg<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing --{}", name))
}

pub(crate) fn id(m: &clap::ArgMatches) -> Result<i64> {
    m.get_one::<i64>("id").copied().context("missing --id")
}

pub(crate) fn user(m: &clap::ArgMatches) -> Result<i64> {
    m.get_one::<i64>("user").copied().context("missing --user")
}
