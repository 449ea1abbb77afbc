// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! First-use seeding of the five collections.

use crate::auth::hash_password;
use crate::models::{Budget, Category, Otp, Transaction, User};
use crate::storage::Storage;
use chrono::Utc;

pub const USERS: &str = "users";
pub const OTPS: &str = "otps";
pub const TRANSACTIONS: &str = "transactions";
pub const BUDGETS: &str = "budgets";
pub const CATEGORIES: &str = "categories";

pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "password";

pub const DEFAULT_CATEGORIES: [(&str, &str); 10] = [
    ("Food", "utensils"),
    ("Transportation", "car"),
    ("Housing", "home"),
    ("Entertainment", "tv"),
    ("Shopping", "shopping-bag"),
    ("Healthcare", "activity"),
    ("Education", "book"),
    ("Utilities", "zap"),
    ("Travel", "map"),
    ("Other", "more-horizontal"),
];

/// Which collections a bootstrap pass wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub users: bool,
    pub categories: bool,
    pub transactions: bool,
    pub budgets: bool,
    pub otps: bool,
}

impl BootstrapReport {
    pub fn wrote_anything(&self) -> bool {
        self.users || self.categories || self.transactions || self.budgets || self.otps
    }
}

/// Seeds missing collections. Users and categories are also reseeded when
/// they decode to an empty list; the other three only when the key is absent.
/// Safe to call any number of times.
pub fn bootstrap(storage: &Storage) -> BootstrapReport {
    let mut report = BootstrapReport::default();

    let users: Vec<User> = storage.get_or_default(USERS);
    if users.is_empty() {
        report.users = seed_users(storage);
    }

    let categories: Vec<Category> = storage.get_or_default(CATEGORIES);
    if categories.is_empty() {
        report.categories = seed_categories(storage);
    }

    if !storage.contains(TRANSACTIONS) {
        report.transactions = storage.set(TRANSACTIONS, &Vec::<Transaction>::new());
    }
    if !storage.contains(BUDGETS) {
        report.budgets = storage.set(BUDGETS, &Vec::<Budget>::new());
    }
    if !storage.contains(OTPS) {
        report.otps = storage.set(OTPS, &Vec::<Otp>::new());
    }

    if report.wrote_anything() {
        tracing::info!(?report, "store bootstrapped");
    } else {
        tracing::debug!("store already initialized");
    }
    report
}

fn seed_users(storage: &Storage) -> bool {
    let password_hash = match hash_password(DEMO_PASSWORD) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!(error = %e, "could not hash demo password, users left unseeded");
            return false;
        }
    };
    let now = Utc::now();
    let demo = User {
        id: 1,
        username: DEMO_USERNAME.to_string(),
        email: DEMO_EMAIL.to_string(),
        phone: None,
        password_hash,
        created_at: now,
        updated_at: now,
        last_login_at: None,
    };
    let ok = storage.set(USERS, &[demo]);
    if ok {
        tracing::info!("seeded demo user");
    }
    ok
}

fn seed_categories(storage: &Storage) -> bool {
    let now = Utc::now();
    let rows: Vec<Category> = DEFAULT_CATEGORIES
        .iter()
        .enumerate()
        .map(|(i, (name, icon))| Category {
            id: i as i64 + 1,
            name: (*name).to_string(),
            icon: Some((*icon).to_string()),
            created_at: now,
        })
        .collect();
    let ok = storage.set(CATEGORIES, &rows);
    if ok {
        tracing::info!(count = rows.len(), "seeded default categories");
    }
    ok
}
