// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::assistant::answer;
use crate::cli::user_of;
use crate::commands::transactions::load_transactions;
use crate::config::Settings;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    println!("{}", reply(conn, m)?);
    Ok(())
}

pub fn reply(conn: &Connection, m: &clap::ArgMatches) -> Result<String> {
    let message = m
        .get_many::<String>("message")
        .map(|parts| parts.map(String::as_str).collect::<Vec<_>>().join(" "))
        .unwrap_or_default();
    let txs = load_transactions(conn, &user_of(m))?;
    let settings = Settings::load(conn)?;
    Ok(answer(&message, &txs, &settings.prefix()))
}
