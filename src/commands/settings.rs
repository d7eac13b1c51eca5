// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Settings, set_setting};
use crate::db::db_path;
use crate::error::Error;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let s = Settings::load(conn)?;
            let path = db_path()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            let data = vec![
                vec!["currency".to_string(), s.currency],
                vec!["database".to_string(), path],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], data));
        }
        Some(("currency", sub)) => {
            let code = sub.get_one::<String>("code").unwrap().trim().to_uppercase();
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(Error::InvalidInput(format!(
                    "currency must be a 3 letter code, got '{}'",
                    code
                ))
                .into());
            }
            set_setting(conn, "currency", &code)?;
            tracing::info!(currency = %code, "display currency changed");
            println!("Display currency set to {}", code);
        }
        _ => {}
    }
    Ok(())
}
