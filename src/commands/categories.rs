// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{arg, id};
use crate::repo::Database;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, bail};

pub fn handle(db: &mut Database, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = arg(sub, "name")?;
            let icon = sub.get_one::<String>("icon").map(String::as_str);
            let c = db.categories().create(name, icon)?;
            println!("Added category '{}' (id {})", c.name, c.id);
        }
        Some(("list", sub)) => {
            let mut cats = db.categories().all();
            cats.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
                let data = cats
                    .into_iter()
                    .map(|c| vec![c.id.to_string(), c.name, c.icon.unwrap_or_default()])
                    .collect();
                println!("{}", pretty_table(&["ID", "Category", "Icon"], data));
            }
        }
        Some(("rm", sub)) => {
            let id = id(sub)?;
            if !db.categories().delete(id)? {
                bail!("No category with id {}", id);
            }
            println!("Removed category {}", id);
        }
        _ => {}
    }
    Ok(())
}
