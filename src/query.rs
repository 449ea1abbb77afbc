// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Request-shaped access to the repositories.
//!
//! A [`Query`] names one repository operation with its fields spelled out;
//! [`Database::execute`] runs it through the same repository calls a direct
//! caller would use. [`translate`] accepts the older command-text form
//! (`"INSERT INTO users ..."` plus positional params) for call sites that
//! still speak it.

use crate::error::{Error, Result};
use crate::models::{NewBudget, NewOtp, NewTransaction, NewUser, Period, TransactionType, UserPatch};
use crate::repo::Database;
use crate::schema;
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Otps,
    Transactions,
    Budgets,
    Categories,
}

impl Collection {
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Users => schema::USERS,
            Collection::Otps => schema::OTPS,
            Collection::Transactions => schema::TRANSACTIONS,
            Collection::Budgets => schema::BUDGETS,
            Collection::Categories => schema::CATEGORIES,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "users" => Ok(Collection::Users),
            "otps" => Ok(Collection::Otps),
            "transactions" => Ok(Collection::Transactions),
            "budgets" => Ok(Collection::Budgets),
            "categories" => Ok(Collection::Categories),
            other => Err(format!("Unknown collection '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Query {
    SelectAll { collection: Collection },
    InsertUser(NewUser),
    InsertOtp(NewOtp),
    InsertTransaction(NewTransaction),
    InsertBudget(NewBudget),
    UpdateUserPassword { id: i64, password: String },
    UpdateUserProfile {
        id: i64,
        username: String,
        email: String,
        phone: Option<String>,
    },
    Delete { collection: Collection, id: i64 },
}

impl Query {
    pub fn kind(&self) -> &'static str {
        match self {
            Query::SelectAll { .. } => "select_all",
            Query::InsertUser(_) => "insert_user",
            Query::InsertOtp(_) => "insert_otp",
            Query::InsertTransaction(_) => "insert_transaction",
            Query::InsertBudget(_) => "insert_budget",
            Query::UpdateUserPassword { .. } => "update_user_password",
            Query::UpdateUserProfile { .. } => "update_user_profile",
            Query::Delete { .. } => "delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Rows(Vec<Value>),
    Inserted { id: i64 },
    Affected { rows: usize },
    Empty,
}

impl QueryOutcome {
    pub fn rows(&self) -> &[Value] {
        match self {
            QueryOutcome::Rows(rows) => rows,
            _ => &[],
        }
    }
}

fn affected(hit: bool) -> QueryOutcome {
    QueryOutcome::Affected {
        rows: usize::from(hit),
    }
}

fn to_rows<T: serde::Serialize>(rows: &[T]) -> Result<QueryOutcome> {
    let rows = rows
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(QueryOutcome::Rows(rows))
}

impl Database {
    pub fn execute(&mut self, query: Query) -> Result<QueryOutcome> {
        tracing::debug!(kind = query.kind(), "execute");
        match query {
            Query::SelectAll { collection } => match collection {
                Collection::Users => to_rows(self.user_rows()),
                Collection::Otps => to_rows(self.otp_rows()),
                Collection::Transactions => to_rows(self.transaction_rows()),
                Collection::Budgets => to_rows(self.budget_rows()),
                Collection::Categories => to_rows(self.category_rows()),
            },
            Query::InsertUser(new) => {
                let id = self.users().create(new)?.id;
                Ok(QueryOutcome::Inserted { id })
            }
            Query::InsertOtp(new) => {
                let id = self.otps().store(new)?.id;
                Ok(QueryOutcome::Inserted { id })
            }
            Query::InsertTransaction(new) => {
                let id = self.transactions().create(new)?.id;
                Ok(QueryOutcome::Inserted { id })
            }
            Query::InsertBudget(new) => {
                let id = self.budgets().create(new)?.id;
                Ok(QueryOutcome::Inserted { id })
            }
            Query::UpdateUserPassword { id, password } => {
                let patch = UserPatch {
                    password: Some(password),
                    ..UserPatch::default()
                };
                Ok(affected(self.users().update(id, patch)?.is_some()))
            }
            Query::UpdateUserProfile {
                id,
                username,
                email,
                phone,
            } => Ok(affected(
                self.update_profile(id, &username, &email, phone.as_deref())?
                    .is_some(),
            )),
            Query::Delete { collection, id } => {
                let hit = match collection {
                    Collection::Users => self.users().delete(id)?,
                    Collection::Otps => self.otps().delete(id)?,
                    Collection::Transactions => self.transactions().delete(id)?,
                    Collection::Budgets => self.budgets().delete(id)?,
                    Collection::Categories => self.categories().delete(id)?,
                };
                Ok(affected(hit))
            }
        }
    }

    /// Command-text entry point. Text that names no known operation gives
    /// [`QueryOutcome::Empty`].
    pub fn query(&mut self, text: &str, params: &[Value]) -> Result<QueryOutcome> {
        match translate(text, params)? {
            Some(q) => self.execute(q),
            None => {
                tracing::debug!(text, "unrecognized command text");
                Ok(QueryOutcome::Empty)
            }
        }
    }
}

static SELECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\bselect\b.*?\bfrom\s+([a-z_]+)").unwrap());
static INSERT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\binsert\s+into\s+([a-z_]+)").unwrap());
static UPDATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)\bupdate\s+([a-z_]+)").unwrap());
static DELETE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)\bdelete\s+from\s+([a-z_]+)").unwrap());

fn target(re: &Regex, text: &str) -> Option<Collection> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Maps command text plus positional params onto a [`Query`].
///
/// Matching is case-insensitive and tried in the order SELECT, INSERT,
/// UPDATE, DELETE. Param order per insert: users
/// `[username, email, password, phone?]`, otps
/// `[user_id, contact, otp_code, expires_at]`, transactions
/// `[user_id, amount, type, category, description, date]`, budgets
/// `[user_id, category, amount, period]`. `UPDATE users` takes the id from the
/// last param; text mentioning `password` sets only the password (param 0),
/// otherwise `[username, email, phone]`. DELETE takes the id from param 0.
pub fn translate(text: &str, params: &[Value]) -> Result<Option<Query>> {
    let p = Params(params);

    if let Some(collection) = target(&SELECT_RE, text) {
        return Ok(Some(Query::SelectAll { collection }));
    }

    if let Some(collection) = target(&INSERT_RE, text) {
        let q = match collection {
            Collection::Users => Query::InsertUser(NewUser {
                username: p.string(0, "username")?,
                email: p.string(1, "email")?,
                password: p.string(2, "password")?,
                phone: p.opt_string(3),
            }),
            Collection::Otps => Query::InsertOtp(NewOtp {
                user_id: p.opt_i64(0, "user_id")?,
                contact: p.string(1, "contact")?,
                otp_code: p.string(2, "otp_code")?,
                expires_at: p.datetime(3, "expires_at")?,
            }),
            Collection::Transactions => Query::InsertTransaction(NewTransaction {
                user_id: p.i64(0, "user_id")?,
                amount: p.decimal(1, "amount")?,
                r#type: p.parsed::<TransactionType>(2, "type")?,
                category: p.string(3, "category")?,
                description: p.opt_string(4).unwrap_or_default(),
                date: p.date(5, "date")?,
            }),
            Collection::Budgets => Query::InsertBudget(NewBudget {
                user_id: p.i64(0, "user_id")?,
                category: p.string(1, "category")?,
                amount: p.decimal(2, "amount")?,
                period: p.parsed::<Period>(3, "period")?,
            }),
            Collection::Categories => return Ok(None),
        };
        return Ok(Some(q));
    }

    if let Some(collection) = target(&UPDATE_RE, text) {
        if collection != Collection::Users || params.is_empty() {
            return Ok(None);
        }
        let id = p.i64(params.len() - 1, "id")?;
        let q = if text.to_lowercase().contains("password") {
            Query::UpdateUserPassword {
                id,
                password: p.string(0, "password")?,
            }
        } else {
            Query::UpdateUserProfile {
                id,
                username: p.string(0, "username")?,
                email: p.string(1, "email")?,
                phone: p.opt_string(2),
            }
        };
        return Ok(Some(q));
    }

    if let Some(collection) = target(&DELETE_RE, text) {
        return Ok(Some(Query::Delete {
            collection,
            id: p.i64(0, "id")?,
        }));
    }

    Ok(None)
}

struct Params<'a>(&'a [Value]);

fn bad(name: &str, idx: usize, why: &str) -> Error {
    Error::Invalid(format!("param {} ({}): {}", idx, name, why))
}

impl Params<'_> {
    fn get(&self, idx: usize, name: &str) -> Result<&Value> {
        self.0.get(idx).ok_or_else(|| bad(name, idx, "missing"))
    }

    fn string(&self, idx: usize, name: &str) -> Result<String> {
        match self.get(idx, name)? {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            _ => Err(bad(name, idx, "expected a string")),
        }
    }

    /// Missing, null, and empty all read as absent.
    fn opt_string(&self, idx: usize) -> Option<String> {
        match self.0.get(idx) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    fn i64(&self, idx: usize, name: &str) -> Result<i64> {
        match self.get(idx, name)? {
            Value::Number(n) => n.as_i64().ok_or_else(|| bad(name, idx, "expected an integer")),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| bad(name, idx, "expected an integer")),
            _ => Err(bad(name, idx, "expected an integer")),
        }
    }

    fn opt_i64(&self, idx: usize, name: &str) -> Result<Option<i64>> {
        match self.0.get(idx) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.i64(idx, name).map(Some),
        }
    }

    fn decimal(&self, idx: usize, name: &str) -> Result<Decimal> {
        let v = self.get(idx, name)?;
        serde_json::from_value(v.clone()).map_err(|_| bad(name, idx, "expected a decimal"))
    }

    fn parsed<T: FromStr<Err = String>>(&self, idx: usize, name: &str) -> Result<T> {
        self.string(idx, name)?
            .parse()
            .map_err(|e: String| bad(name, idx, &e))
    }

    fn datetime(&self, idx: usize, name: &str) -> Result<DateTime<Utc>> {
        let s = self.string(idx, name)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|_| bad(name, idx, "expected an RFC 3339 timestamp"))
    }

    /// A plain `YYYY-MM-DD`, or a full timestamp reduced to its UTC date.
    fn date(&self, idx: usize, name: &str) -> Result<NaiveDate> {
        let s = self.string(idx, name)?;
        if let Ok(d) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
            return Ok(d);
        }
        DateTime::parse_from_rfc3339(&s)
            .map(|d| d.with_timezone(&Utc).date_naive())
            .map_err(|_| bad(name, idx, "expected a date"))
    }
}
