// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Entity repositories over the key/value store.
//!
//! [`Database`] owns the [`Storage`] handle and one hydrated collection per
//! entity. The accessors (`users()`, `transactions()`, ...) hand out short-lived
//! views; every mutating call persists its whole collection before returning,
//! so there is never unflushed state.

mod budgets;
mod categories;
mod otps;
mod table;
mod transactions;
mod users;

pub use budgets::Budgets;
pub use categories::Categories;
pub use otps::Otps;
pub use transactions::{TransactionFilter, Transactions};
pub use users::Users;

use crate::auth::OtpOptions;
use crate::models::{Budget, Category, Otp, Transaction, User};
use crate::schema::{self, BootstrapReport};
use crate::storage::{KvBackend, MemoryBackend, Storage};
use table::Table;

pub struct Database {
    storage: Storage,
    users: Table<User>,
    otps: Table<Otp>,
    transactions: Table<Transaction>,
    budgets: Table<Budget>,
    categories: Table<Category>,
    bootstrap: BootstrapReport,
    otp: OtpOptions,
}

impl Database {
    /// Bootstraps the store behind `backend` and hydrates every collection.
    pub fn open(backend: impl KvBackend + 'static) -> Self {
        let storage = Storage::new(backend);
        let bootstrap = schema::bootstrap(&storage);
        let db = Self {
            users: Table::load(&storage, schema::USERS),
            otps: Table::load(&storage, schema::OTPS),
            transactions: Table::load(&storage, schema::TRANSACTIONS),
            budgets: Table::load(&storage, schema::BUDGETS),
            categories: Table::load(&storage, schema::CATEGORIES),
            storage,
            bootstrap,
            otp: OtpOptions::default(),
        };
        tracing::debug!(
            users = db.users.rows().len(),
            transactions = db.transactions.rows().len(),
            budgets = db.budgets.rows().len(),
            otps = db.otps.rows().len(),
            categories = db.categories.rows().len(),
            "database loaded"
        );
        db
    }

    pub fn in_memory() -> Self {
        Self::open(MemoryBackend::new())
    }

    pub fn with_options(mut self, otp: OtpOptions) -> Self {
        self.otp = otp;
        self
    }

    pub fn otp_options(&self) -> &OtpOptions {
        &self.otp
    }

    /// What the bootstrap pass at open time wrote.
    pub fn bootstrap_report(&self) -> BootstrapReport {
        self.bootstrap
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Re-reads every collection from storage, dropping the in-memory copies.
    pub fn reload(&mut self) {
        self.users.reload(&self.storage);
        self.otps.reload(&self.storage);
        self.transactions.reload(&self.storage);
        self.budgets.reload(&self.storage);
        self.categories.reload(&self.storage);
    }

    pub fn users(&mut self) -> Users<'_> {
        Users {
            table: &mut self.users,
            storage: &self.storage,
        }
    }

    pub fn otps(&mut self) -> Otps<'_> {
        Otps {
            table: &mut self.otps,
            storage: &self.storage,
        }
    }

    pub fn transactions(&mut self) -> Transactions<'_> {
        Transactions {
            table: &mut self.transactions,
            storage: &self.storage,
        }
    }

    pub fn budgets(&mut self) -> Budgets<'_> {
        Budgets {
            table: &mut self.budgets,
            storage: &self.storage,
        }
    }

    pub fn categories(&mut self) -> Categories<'_> {
        Categories {
            table: &mut self.categories,
            storage: &self.storage,
        }
    }

    pub(crate) fn user_rows(&self) -> &[User] {
        self.users.rows()
    }

    pub(crate) fn otp_rows(&self) -> &[Otp] {
        self.otps.rows()
    }

    pub(crate) fn transaction_rows(&self) -> &[Transaction] {
        self.transactions.rows()
    }

    pub(crate) fn budget_rows(&self) -> &[Budget] {
        self.budgets.rows()
    }

    pub(crate) fn category_rows(&self) -> &[Category] {
        self.categories.rows()
    }
}
