// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use famledger::models::{NewUser, UserPatch};
use famledger::schema::{DEMO_EMAIL, DEMO_PASSWORD};
use famledger::{Database, Error};

fn new_user(email: &str, phone: Option<&str>) -> NewUser {
    NewUser {
        username: email.split('@').next().unwrap().to_string(),
        email: email.to_string(),
        password: "correct horse".to_string(),
        phone: phone.map(str::to_string),
    }
}

#[test]
fn duplicate_email_is_a_conflict_without_mutation() {
    let mut db = Database::in_memory();
    let before = db.users().all();

    let err = db.users().create(new_user(DEMO_EMAIL, None)).unwrap_err();
    assert!(err.is_conflict());
    assert!(matches!(err, Error::Conflict(ref m) if m == "User with this email already exists"));
    assert_eq!(db.users().all(), before);
}

#[test]
fn duplicate_phone_is_a_conflict() {
    let mut db = Database::in_memory();
    db.users()
        .create(new_user("a@example.com", Some("+15551234567")))
        .unwrap();
    let err = db
        .users()
        .create(new_user("b@example.com", Some("+15551234567")))
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(ref m) if m.contains("phone")));
    assert_eq!(db.users().count(), 2);

    // Absent phones never collide.
    db.users().create(new_user("c@example.com", None)).unwrap();
    db.users().create(new_user("d@example.com", Some(""))).unwrap();
    assert_eq!(db.users().count(), 4);
}

#[test]
fn empty_email_is_invalid() {
    let mut db = Database::in_memory();
    let err = db.users().create(new_user("  ", None)).unwrap_err();
    assert!(err.is_invalid());
    assert_eq!(db.users().count(), 1);
}

#[test]
fn update_rejects_taking_another_users_email() {
    let mut db = Database::in_memory();
    let ann = db.users().create(new_user("ann@example.com", None)).unwrap();
    let patch = UserPatch {
        email: Some(DEMO_EMAIL.into()),
        ..UserPatch::default()
    };
    assert!(db.users().update(ann.id, patch).unwrap_err().is_conflict());
    assert_eq!(db.users().by_id(ann.id).unwrap().email, "ann@example.com");

    // Keeping your own email is fine.
    let same = db
        .update_profile(ann.id, "annie", "ann@example.com", Some("+4420000000"))
        .unwrap()
        .unwrap();
    assert_eq!(same.username, "annie");
    assert_eq!(same.phone.as_deref(), Some("+4420000000"));
    assert!(same.updated_at >= ann.updated_at);
    assert_eq!(same.created_at, ann.created_at);
}

#[test]
fn update_and_delete_missing_ids() {
    let mut db = Database::in_memory();
    assert!(db.users().update(99, UserPatch::default()).unwrap().is_none());
    assert!(!db.users().delete(99).unwrap());
    assert!(db.update_profile(99, "x", "x@example.com", None).unwrap().is_none());
}

#[test]
fn verify_credentials_stamps_last_login() {
    let mut db = Database::in_memory();
    assert!(db.users().by_email(DEMO_EMAIL).unwrap().last_login_at.is_none());

    let user = db.verify_credentials(DEMO_EMAIL, DEMO_PASSWORD).unwrap().unwrap();
    assert_eq!(user.id, 1);
    assert!(user.last_login_at.is_some());
    assert_eq!(db.users().by_id(1).unwrap().last_login_at, user.last_login_at);
}

#[test]
fn verify_credentials_mismatch_is_uniform_and_side_effect_free() {
    let mut db = Database::in_memory();
    let before = db.users().all();

    assert!(db.verify_credentials(DEMO_EMAIL, "Password").unwrap().is_none());
    assert!(db.verify_credentials("nobody@example.com", DEMO_PASSWORD).unwrap().is_none());
    assert_eq!(db.users().all(), before);
}

#[test]
fn lookups_trim_like_create_does() {
    let mut db = Database::in_memory();
    let user = db
        .users()
        .create(new_user(" pat@example.com ", Some(" 5550001111 ")))
        .unwrap();
    assert_eq!(user.email, "pat@example.com");

    assert_eq!(db.users().by_email(" pat@example.com").unwrap().id, user.id);
    assert_eq!(db.users().by_phone("5550001111 ").unwrap().id, user.id);
    assert!(db.users().by_phone("  ").is_none());

    let padded = format!(" {} ", DEMO_EMAIL);
    let demo = db.verify_credentials(&padded, DEMO_PASSWORD).unwrap().unwrap();
    assert_eq!(demo.id, 1);
}

#[test]
fn change_password_requires_current() {
    let mut db = Database::in_memory();
    assert!(!db.change_password(1, "wrong", "next-secret").unwrap());
    assert!(db.change_password(1, DEMO_PASSWORD, "next-secret").unwrap());

    assert!(db.verify_credentials(DEMO_EMAIL, DEMO_PASSWORD).unwrap().is_none());
    assert!(db.verify_credentials(DEMO_EMAIL, "next-secret").unwrap().is_some());
    assert!(!db.change_password(42, "a", "b").unwrap());
}
