// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use famledger::Database;
use famledger::db::SqliteBackend;
use famledger::models::{NewBudget, NewTransaction, NewUser, Period, TransactionType};
use famledger::schema::{self, DEFAULT_CATEGORIES, DEMO_EMAIL, DEMO_PASSWORD, DEMO_USERNAME};
use famledger::storage::{KvBackend, MemoryBackend};
use rust_decimal::Decimal;
use std::cell::Cell;
use std::rc::Rc;
use tempfile::tempdir;

fn d(s: &str) -> chrono::NaiveDate {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn seed_on_empty_store() {
    let mut db = Database::in_memory();
    assert!(db.bootstrap_report().wrote_anything());
    assert_eq!(db.users().count(), 1);
    assert_eq!(db.categories().all().len(), 10);
    assert!(db.transactions().all().is_empty());
    assert!(db.budgets().all().is_empty());
    assert!(db.otps().all().is_empty());

    let demo = db.users().by_email(DEMO_EMAIL).unwrap();
    assert_eq!(demo.id, 1);
    assert_eq!(demo.username, DEMO_USERNAME);
    assert_ne!(demo.password_hash, DEMO_PASSWORD);

    let names: Vec<String> = db.categories().all().into_iter().map(|c| c.name).collect();
    let expected: Vec<&str> = DEFAULT_CATEGORIES.iter().map(|(n, _)| *n).collect();
    assert_eq!(names, expected);
}

#[test]
fn bootstrap_is_idempotent() {
    let backend = MemoryBackend::new();
    let mut first = Database::open(backend.clone());
    first
        .users()
        .create(NewUser {
            username: "ann".into(),
            email: "ann@example.com".into(),
            password: "pw".into(),
            phone: None,
        })
        .unwrap();

    let mut second = Database::open(backend.clone());
    assert!(!second.bootstrap_report().wrote_anything());
    assert_eq!(second.users().count(), 2);
    assert_eq!(second.categories().all().len(), 10);

    let mut third = Database::open(backend);
    assert_eq!(third.users().count(), 2);
}

#[test]
fn corrupt_users_are_reseeded_and_empty_categories_refilled() {
    let backend = MemoryBackend::new();
    backend.put_raw(schema::USERS, "{not json");
    backend.put_raw(schema::CATEGORIES, "[]");
    backend.put_raw(schema::TRANSACTIONS, "[]");

    let mut db = Database::open(backend.clone());
    let report = db.bootstrap_report();
    assert!(report.users);
    assert!(report.categories);
    assert!(!report.transactions);
    assert_eq!(db.users().count(), 1);
    assert_eq!(db.categories().all().len(), 10);
}

#[test]
fn corrupt_transactions_hydrate_as_empty() {
    let backend = MemoryBackend::new();
    backend.put_raw(schema::TRANSACTIONS, "[{\"id\":");
    let mut db = Database::open(backend.clone());
    // The key exists, so bootstrap leaves it alone; reads fall back to empty.
    assert!(!db.bootstrap_report().transactions);
    assert!(db.transactions().all().is_empty());
    assert_eq!(backend.raw(schema::TRANSACTIONS).unwrap(), "[{\"id\":");
}

#[test]
fn reload_round_trip_in_memory() {
    let backend = MemoryBackend::new();
    let mut db = Database::open(backend.clone());
    let tx = db
        .transactions()
        .create(NewTransaction {
            user_id: 1,
            amount: Decimal::new(-1250, 2),
            r#type: TransactionType::Expense,
            category: "Food".into(),
            description: "Tacos".into(),
            date: d("2025-03-04"),
        })
        .unwrap();
    let budget = db
        .budgets()
        .create(NewBudget {
            user_id: 1,
            category: "Food".into(),
            amount: Decimal::from(300),
            period: Period::Monthly,
        })
        .unwrap();

    let mut fresh = Database::open(backend);
    assert_eq!(fresh.transactions().by_id(tx.id), Some(tx));
    assert_eq!(fresh.budgets().by_id(budget.id), Some(budget));
}

#[test]
fn reload_round_trip_sqlite_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite");

    let user = {
        let mut db = Database::open(SqliteBackend::open(&path).unwrap());
        db.users()
            .create(NewUser {
                username: "bo".into(),
                email: "bo@example.com".into(),
                password: "hunter2".into(),
                phone: Some("+15550001111".into()),
            })
            .unwrap()
    };

    let mut db = Database::open(SqliteBackend::open(&path).unwrap());
    assert!(!db.bootstrap_report().wrote_anything());
    assert_eq!(db.users().by_id(user.id), Some(user));

    db.reload();
    assert_eq!(db.users().count(), 2);
}

#[test]
fn exhausted_id_space_is_invalid_not_a_panic() {
    let backend = MemoryBackend::new();
    let row = format!(
        r#"[{{"id":{},"name":"Edited","icon":null,"created_at":"2025-01-01T00:00:00Z"}}]"#,
        i64::MAX
    );
    backend.write(schema::CATEGORIES, &row).unwrap();

    let mut db = Database::open(backend);
    assert_eq!(db.categories().all().len(), 1);
    let err = db.categories().create("Pets", None).unwrap_err();
    assert!(err.is_invalid());
    assert_eq!(db.categories().all().len(), 1);
}

/// Memory backend whose writes can be switched off mid-test.
#[derive(Clone)]
struct Flaky {
    inner: MemoryBackend,
    fail: Rc<Cell<bool>>,
}

impl KvBackend for Flaky {
    fn read(&self, key: &str) -> famledger::Result<Option<String>> {
        self.inner.read(key)
    }

    fn write(&self, key: &str, value: &str) -> famledger::Result<()> {
        if self.fail.get() {
            return Err(famledger::Error::Persist(format!("refusing {}", key)));
        }
        self.inner.write(key, value)
    }

    fn keys(&self) -> famledger::Result<Vec<String>> {
        self.inner.keys()
    }
}

#[test]
fn failed_write_leaves_memory_unchanged() {
    let fail = Rc::new(Cell::new(false));
    let mut db = Database::open(Flaky {
        inner: MemoryBackend::new(),
        fail: fail.clone(),
    });
    fail.set(true);

    let err = db
        .categories()
        .create("Pets", Some("paw"))
        .unwrap_err();
    assert!(matches!(err, famledger::Error::Persist(_)));
    assert_eq!(db.categories().all().len(), 10);
    assert!(db.categories().by_name("Pets").is_none());

    assert!(matches!(
        db.users().delete(1),
        Err(famledger::Error::Persist(_))
    ));
    assert_eq!(db.users().count(), 1);
}

#[test]
fn ids_restart_at_one_once_a_collection_is_empty() {
    let mut db = Database::in_memory();
    let first = db.categories().create("Pets", None).unwrap();
    assert_eq!(first.id, 11);

    let new_budget = || NewBudget {
        user_id: 1,
        category: "Food".into(),
        amount: Decimal::from(10),
        period: Period::Weekly,
    };
    let a = db.budgets().create(new_budget()).unwrap();
    assert_eq!(a.id, 1);
    assert!(db.budgets().delete(1).unwrap());
    let b = db.budgets().create(new_budget()).unwrap();
    assert_eq!(b.id, 1);

    let c = db.budgets().create(new_budget()).unwrap();
    assert_eq!(c.id, 2);
    assert!(db.budgets().delete(1).unwrap());
    let e = db.budgets().create(new_budget()).unwrap();
    assert_eq!(e.id, 3);
}
