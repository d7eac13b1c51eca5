// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cli::user_of;
use crate::db::to_db_datetime;
use crate::models::{Transaction, TxKind};
use crate::utils::{coerce_amount, lenient_datetime};
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use rusqlite::{Connection, params};
use serde::Deserialize;
use std::path::Path;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => import_transactions(conn, sub),
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    category: Option<String>,
    amount: Option<String>,
    notes: Option<String>,
}

fn read_csv(path: &str) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;
    let mut out = Vec::new();
    for (i, result) in rdr.deserialize::<CsvRow>().enumerate() {
        let line = i + 2;
        let row = result.with_context(|| format!("Malformed CSV row at line {}", line))?;
        let kind = TxKind::from_label(&row.kind)
            .ok_or_else(|| anyhow!("Unknown type '{}' at line {}", row.kind, line))?;
        out.push(Transaction {
            id: 0,
            user_id: String::new(),
            kind,
            category: row.category.filter(|c| !c.is_empty()),
            amount: coerce_amount(row.amount.as_deref()),
            date: row.date.as_deref().and_then(lenient_datetime),
            notes: row.notes.filter(|n| !n.is_empty()),
        });
    }
    Ok(out)
}

fn read_json(path: &str) -> Result<Vec<Transaction>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Read JSON {}", path))?;
    let txs: Vec<Transaction> =
        serde_json::from_str(&raw).with_context(|| format!("Parse transactions from {}", path))?;
    Ok(txs)
}

fn import_transactions(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_of(sub);
    let path = sub.get_one::<String>("path").unwrap().trim();
    let fmt = match sub.get_one::<String>("format") {
        Some(f) => f.trim().to_lowercase(),
        None => Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_else(|| "csv".into()),
    };
    let txs = match fmt.as_str() {
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        other => return Err(anyhow!("Unknown format: {} (use csv|json)", other)),
    };

    let tx = conn.transaction()?;
    let mut incomplete = 0usize;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO transactions(user_id, type, category, amount, date, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for t in &txs {
            let category = t.category.as_deref().map(str::trim).filter(|c| !c.is_empty());
            if category.is_none() || t.date.is_none() {
                incomplete += 1;
            }
            stmt.execute(params![
                user,
                t.kind.as_str(),
                category,
                t.amount.to_string(),
                t.date.as_ref().map(to_db_datetime),
                t.notes
            ])?;
        }
    }
    tx.commit()?;

    if incomplete > 0 {
        tracing::warn!(
            incomplete,
            "rows without category or date will not count toward budgets"
        );
    }
    tracing::info!(count = txs.len(), user = %user, "transactions imported");
    println!("Imported {} transactions from {}", txs.len(), path);
    Ok(())
}
