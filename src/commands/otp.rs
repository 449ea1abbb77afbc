// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::arg;
use crate::notify::Notifier;
use crate::repo::Database;
use crate::utils::mask_contact;
use anyhow::{Result, bail};
use chrono::Utc;

pub fn handle(db: &mut Database, notifier: &dyn Notifier, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("send", sub)) => {
            let contact = arg(sub, "contact")?;
            let user_id = sub.get_one::<i64>("user").copied();
            let otp = db.issue_otp(notifier, contact, user_id)?;
            println!(
                "Code sent to {} (valid until {})",
                mask_contact(contact),
                otp.expires_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        Some(("verify", sub)) => {
            let contact = arg(sub, "contact")?;
            if db.verify_otp(contact, arg(sub, "code")?)? {
                println!("Code accepted for {}", mask_contact(contact));
            } else {
                bail!("Invalid or expired code");
            }
        }
        Some(("purge", _)) => {
            let n = db.otps().purge_inert(Utc::now())?;
            println!("Purged {} used or expired codes", n);
        }
        _ => {}
    }
    Ok(())
}
