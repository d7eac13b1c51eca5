// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cli::user_of;
use crate::commands::transactions::load_transactions;
use crate::db::to_db_datetime;
use crate::error::Error;
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        return Err(Error::InvalidInput(format!("Unknown format: {} (use csv|json)", fmt)).into());
    }

    // Oldest first, the order they were entered in
    let mut txs = load_transactions(conn, &user_of(sub))?;
    txs.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "type", "category", "amount", "notes"])?;
            for t in &txs {
                wtr.write_record([
                    t.date.as_ref().map(to_db_datetime).unwrap_or_default(),
                    t.kind.as_str().to_string(),
                    t.category.clone().unwrap_or_default(),
                    t.amount.to_string(),
                    t.notes.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let items: Vec<_> = txs
                .iter()
                .map(|t| {
                    json!({
                        "date": t.date.as_ref().map(to_db_datetime),
                        "type": t.kind.as_str(),
                        "category": t.category,
                        "amount": t.amount.to_string(),
                        "notes": t.notes,
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
    }
    tracing::info!(count = txs.len(), path = %out, "transactions exported");
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}
