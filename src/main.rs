// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use famledger::config::Config;
use famledger::notify::{LogNotifier, Notifier, WebhookNotifier};
use famledger::{cli, commands, db};

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter)
        .unwrap_or_else(|_| EnvFilter::new(famledger::config::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut config = Config::from_env()?;
    init_tracing(&config.log_filter);
    if let Some(path) = matches.get_one::<String>("db") {
        config.db_path = PathBuf::from(path);
    }

    let mut db = db::open_or_init(&config)?;
    let notifier: Box<dyn Notifier> = match &config.webhook_url {
        Some(url) => Box::new(WebhookNotifier::new(url.as_str())?),
        None => Box::new(LogNotifier),
    };

    match matches.subcommand() {
        Some(("init", _)) => {
            let seeded = db.bootstrap_report();
            println!("Store ready at {}", config.db_path.display());
            if seeded.wrote_anything() {
                println!(
                    "Seeded demo user '{}' and default categories",
                    famledger::schema::DEMO_USERNAME
                );
            }
        }
        Some(("user", sub)) => commands::users::handle(&mut db, sub)?,
        Some(("otp", sub)) => commands::otp::handle(&mut db, notifier.as_ref(), sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut db, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut db, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&mut db, sub)?,
        Some(("report", sub)) => commands::reports::handle(&mut db, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&mut db, sub)?,
        Some(("query", sub)) => commands::query::handle(&mut db, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&db)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
