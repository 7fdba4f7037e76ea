// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use rusqlite::Connection;
use tracing_subscriber::EnvFilter;

use ledgersweep::store::{MovementStore, RestStore, SqliteStore};
use ledgersweep::{cli, commands, config, db};

fn init_logging(verbose: bool) {
    let default = if verbose {
        "ledgersweep=debug"
    } else {
        "ledgersweep=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_store<'c>(conn: &'c Connection, remote: bool) -> Result<Box<dyn MovementStore + 'c>> {
    if remote {
        let url = config::api_url(conn)?;
        tracing::info!("Using REST backend at {}", url);
        Ok(Box::new(RestStore::new(&url, config::api_token())?))
    } else {
        Ok(Box::new(SqliteStore::new(conn)))
    }
}

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    init_logging(matches.get_flag("verbose"));

    let path = db::db_path(matches.get_one::<String>("db").map(String::as_str))?;
    let conn = db::open_or_init(&path)?;
    let remote = matches.get_flag("remote");

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", path.display());
        }
        Some(("clean", sub)) => {
            let limit = config::batch_limit(&conn)?;
            commands::sweep::clean(open_store(&conn, remote)?.as_mut(), sub, limit)?;
        }
        Some(("classify", sub)) => {
            let limit = config::batch_limit(&conn)?;
            commands::sweep::classify(open_store(&conn, remote)?.as_mut(), sub, limit)?;
        }
        Some(("sweep", sub)) => {
            let limit = config::batch_limit(&conn)?;
            commands::sweep::run(open_store(&conn, remote)?.as_mut(), sub, limit)?;
        }
        Some(("doctor", sub)) => {
            let store = open_store(&conn, remote)?;
            let local = (!remote).then_some(&conn);
            commands::doctor::handle(&*store, local, sub)?;
        }
        Some((name @ ("rules" | "movements"), _)) if remote => {
            bail!("'{}' only works on the local database", name);
        }
        Some(("rules", sub)) => commands::rules::handle(&conn, sub)?,
        Some(("movements", sub)) => commands::movements::handle(&conn, sub)?,
        Some(("config", sub)) => commands::config::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
