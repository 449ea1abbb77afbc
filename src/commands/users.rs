// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{arg, id};
use crate::models::{NewUser, User};
use crate::repo::Database;
use crate::utils::{mask_contact, maybe_print_json, pretty_table};
use anyhow::{Result, bail};
use serde::Serialize;

pub fn handle(db: &mut Database, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(db, sub)?,
        Some(("list", sub)) => list(db, sub)?,
        Some(("login", sub)) => login(db, sub)?,
        Some(("passwd", sub)) => passwd(db, sub)?,
        Some(("update", sub)) => update(db, sub)?,
        Some(("rm", sub)) => {
            let id = id(sub)?;
            if db.users().delete(id)? {
                println!("Removed user {}", id);
            } else {
                bail!("No user with id {}", id);
            }
        }
        _ => {}
    }
    Ok(())
}

fn add(db: &mut Database, sub: &clap::ArgMatches) -> Result<()> {
    let user = db.users().create(NewUser {
        username: arg(sub, "username")?.to_string(),
        email: arg(sub, "email")?.to_string(),
        password: arg(sub, "password")?.to_string(),
        phone: sub.get_one::<String>("phone").cloned(),
    })?;
    println!("Added user {} '{}' <{}>", user.id, user.username, user.email);
    Ok(())
}

/// Public view of a user; the password hash never leaves the store.
#[derive(Serialize)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub created_at: String,
    pub last_login_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            username: u.username.clone(),
            email: u.email.clone(),
            phone: u.phone.clone().unwrap_or_default(),
            created_at: u.created_at.to_rfc3339(),
            last_login_at: u
                .last_login_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
        }
    }
}

fn list(db: &mut Database, sub: &clap::ArgMatches) -> Result<()> {
    let data: Vec<UserRow> = db.users().all().iter().map(UserRow::from).collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|u| {
                vec![
                    u.id.to_string(),
                    u.username.clone(),
                    u.email.clone(),
                    if u.phone.is_empty() {
                        String::new()
                    } else {
                        mask_contact(&u.phone)
                    },
                    u.last_login_at.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Username", "Email", "Phone", "Last login"], rows)
        );
    }
    Ok(())
}

fn login(db: &mut Database, sub: &clap::ArgMatches) -> Result<()> {
    let email = arg(sub, "email")?;
    match db.verify_credentials(email, arg(sub, "password")?)? {
        Some(user) => println!("Signed in as {} (id {})", user.username, user.id),
        None => bail!("Invalid email or password"),
    }
    Ok(())
}

fn passwd(db: &mut Database, sub: &clap::ArgMatches) -> Result<()> {
    let id = id(sub)?;
    if db.change_password(id, arg(sub, "current")?, arg(sub, "new")?)? {
        println!("Password changed for user {}", id);
        Ok(())
    } else {
        bail!("Current password did not match or user {} does not exist", id)
    }
}

fn update(db: &mut Database, sub: &clap::ArgMatches) -> Result<()> {
    let id = id(sub)?;
    let phone = sub.get_one::<String>("phone").map(String::as_str);
    match db.update_profile(id, arg(sub, "username")?, arg(sub, "email")?, phone)? {
        Some(u) => println!("Updated user {} '{}' <{}>", u.id, u.username, u.email),
        None => bail!("No user with id {}", id),
    }
    Ok(())
}
