// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Duration, Utc};
use famledger::auth::{OtpConsumption, OtpOptions};
use famledger::models::NewOtp;
use famledger::notify::{LogNotifier, Notifier};
use famledger::{Database, Error};
use std::cell::RefCell;

const CONTACT: &str = "+15550102030";

fn new_otp(code: &str, ttl_minutes: i64) -> NewOtp {
    NewOtp {
        user_id: None,
        contact: CONTACT.to_string(),
        otp_code: code.to_string(),
        expires_at: Utc::now() + Duration::minutes(ttl_minutes),
    }
}

/// Records what it was asked to send.
#[derive(Default)]
struct Outbox {
    sent: RefCell<Vec<(String, String)>>,
}

impl Notifier for Outbox {
    fn send(&self, destination: &str, code: &str) -> famledger::Result<bool> {
        self.sent
            .borrow_mut()
            .push((destination.to_string(), code.to_string()));
        Ok(true)
    }
}

struct Refusing;

impl Notifier for Refusing {
    fn send(&self, _destination: &str, _code: &str) -> famledger::Result<bool> {
        Ok(false)
    }
}

#[test]
fn stored_code_is_found_by_contact() {
    let mut db = Database::in_memory();
    db.otps().store(new_otp("123456", 5)).unwrap();
    let found = db.otps().active_for_contact(CONTACT).unwrap();
    assert_eq!(found.otp_code, "123456");
    assert!(db.otps().active_for_contact("+19999999999").is_none());
}

#[test]
fn newest_code_wins() {
    let mut db = Database::in_memory();
    db.otps().store(new_otp("111111", 5)).unwrap();
    let second = db.otps().store(new_otp("222222", 5)).unwrap();

    let found = db.otps().active_for_contact(CONTACT).unwrap();
    assert_eq!(found.id, second.id);
    assert_eq!(found.otp_code, "222222");

    // The superseded code no longer verifies.
    assert!(!db.verify_otp(CONTACT, "111111").unwrap());
    assert!(db.verify_otp(CONTACT, "222222").unwrap());
}

#[test]
fn verify_succeeds_exactly_once() {
    let mut db = Database::in_memory();
    let otp = db.otps().store(new_otp("424242", 5)).unwrap();

    assert!(!db.verify_otp(CONTACT, "000000").unwrap());
    assert!(!db.otps().by_id(otp.id).unwrap().is_used);

    assert!(db.verify_otp(CONTACT, "424242").unwrap());
    assert!(db.otps().by_id(otp.id).unwrap().is_used);
    assert!(!db.verify_otp(CONTACT, "424242").unwrap());
}

#[test]
fn expired_codes_are_inert() {
    let mut db = Database::in_memory();
    db.otps().store(new_otp("555555", -1)).unwrap();
    assert!(db.otps().active_for_contact(CONTACT).is_none());
    assert!(!db.verify_otp(CONTACT, "555555").unwrap());

    let live = db.otps().store(new_otp("666666", 5)).unwrap();
    let later = Utc::now() + Duration::minutes(10);
    assert!(db.otps().active_for_contact_at(CONTACT, later).is_none());
    assert!(!db.verify_otp_at(CONTACT, "666666", later).unwrap());
    assert!(!db.otps().by_id(live.id).unwrap().is_used);
}

#[test]
fn remove_mode_deletes_on_success() {
    let mut db = Database::in_memory().with_options(OtpOptions {
        consumption: OtpConsumption::Remove,
        ..OtpOptions::default()
    });
    let otp = db.otps().store(new_otp("909090", 5)).unwrap();
    assert!(db.verify_otp(CONTACT, "909090").unwrap());
    assert!(db.otps().by_id(otp.id).is_none());
    assert!(!db.verify_otp(CONTACT, "909090").unwrap());
}

#[test]
fn issue_hands_the_stored_code_to_the_notifier() {
    let mut db = Database::in_memory();
    let outbox = Outbox::default();
    let otp = db.issue_otp(&outbox, CONTACT, Some(1)).unwrap();

    assert_eq!(otp.otp_code.len(), 6);
    assert_eq!(otp.user_id, Some(1));
    assert_eq!(
        outbox.sent.borrow().as_slice(),
        &[(CONTACT.to_string(), otp.otp_code.clone())]
    );
    let ttl = otp.expires_at - otp.created_at;
    assert!(ttl <= Duration::minutes(5) && ttl > Duration::minutes(4));
    assert!(db.verify_otp(CONTACT, &otp.otp_code).unwrap());
}

#[test]
fn issue_honours_configured_ttl() {
    let mut db = Database::in_memory().with_options(OtpOptions {
        ttl: Duration::minutes(30),
        ..OtpOptions::default()
    });
    let otp = db.issue_otp(&LogNotifier, CONTACT, None).unwrap();
    let ttl = otp.expires_at - otp.created_at;
    assert!(ttl <= Duration::minutes(30) && ttl > Duration::minutes(29));
}

#[test]
fn ttl_past_the_calendar_is_invalid() {
    let mut db = Database::in_memory().with_options(OtpOptions {
        ttl: Duration::days(100_000_000),
        ..OtpOptions::default()
    });
    let err = db.issue_otp(&LogNotifier, CONTACT, None).unwrap_err();
    assert!(matches!(err, Error::Invalid(_)));
    assert!(db.otps().for_contact(CONTACT).is_empty());
}

#[test]
fn delivery_failure_is_surfaced_and_row_kept() {
    let mut db = Database::in_memory();
    let err = db.issue_otp(&Refusing, CONTACT, None).unwrap_err();
    assert!(matches!(err, Error::Delivery(_)));
    assert_eq!(db.otps().for_contact(CONTACT).len(), 1);

    assert!(db.issue_otp(&LogNotifier, CONTACT, None).is_ok());
    assert_eq!(db.otps().for_contact(CONTACT).len(), 2);
}

#[test]
fn purge_drops_used_and_expired() {
    let mut db = Database::in_memory();
    db.otps().store(new_otp("100001", -5)).unwrap();
    let used = db.otps().store(new_otp("100002", 5)).unwrap();
    db.otps().mark_used(used.id).unwrap();
    let live = db.otps().store(new_otp("100003", 5)).unwrap();

    assert_eq!(db.otps().purge_inert(Utc::now()).unwrap(), 2);
    let left = db.otps().all();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, live.id);
}

#[test]
fn blank_contact_is_invalid() {
    let mut db = Database::in_memory();
    let mut otp = new_otp("123123", 5);
    otp.contact = " ".into();
    assert!(db.otps().store(otp).unwrap_err().is_invalid());
}
