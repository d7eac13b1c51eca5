// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cli::user_of;
use crate::config::Settings;
use crate::db::to_db_datetime;
use crate::error::Error;
use crate::models::{Transaction, TxKind};
use crate::period::end_of_day;
use crate::summary::same_category;
use crate::utils::{
    coerce_amount, fmt_datetime, fmt_money, lenient_datetime, maybe_print_json, parse_amount,
    parse_datetime, pretty_table,
};
use anyhow::{Result, anyhow};
use chrono::{Local, NaiveDateTime};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("replace", sub)) => replace(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        _ => {}
    }
    Ok(())
}

struct TxInput {
    kind: TxKind,
    category: String,
    amount: rust_decimal::Decimal,
    date: NaiveDateTime,
    notes: Option<String>,
}

fn read_input(sub: &clap::ArgMatches) -> Result<TxInput> {
    let kind_raw = sub.get_one::<String>("type").unwrap();
    let kind = TxKind::from_label(kind_raw)
        .ok_or_else(|| anyhow!("Unknown transaction type '{}'", kind_raw))?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    if category.is_empty() {
        return Err(Error::InvalidInput("category must not be empty".into()).into());
    }
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_datetime(s)?,
        None => Local::now().naive_local(),
    };
    let notes = sub
        .get_one::<String>("notes")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());
    Ok(TxInput {
        kind,
        category,
        amount,
        date,
        notes,
    })
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_of(sub);
    let input = read_input(sub)?;
    let id = insert_transaction(
        conn,
        &user,
        input.kind,
        &input.category,
        &input.amount,
        &input.date,
        input.notes.as_deref(),
    )?;
    tracing::info!(id, user = %user, kind = input.kind.as_str(), "transaction recorded");
    println!(
        "Recorded {} {} in '{}' on {} (id {})",
        input.kind.as_str(),
        input.amount,
        input.category,
        fmt_datetime(&input.date),
        id
    );
    Ok(())
}

pub fn insert_transaction(
    conn: &Connection,
    user: &str,
    kind: TxKind,
    category: &str,
    amount: &rust_decimal::Decimal,
    date: &NaiveDateTime,
    notes: Option<&str>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(user_id, type, category, amount, date, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user,
            kind.as_str(),
            category,
            amount.to_string(),
            to_db_datetime(date),
            notes
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn replace(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_of(sub);
    let id = *sub.get_one::<i64>("id").unwrap();
    let input = read_input(sub)?;
    let n = conn.execute(
        "UPDATE transactions SET type=?1, category=?2, amount=?3, date=?4, notes=?5
         WHERE id=?6 AND user_id=?7",
        params![
            input.kind.as_str(),
            input.category,
            input.amount.to_string(),
            to_db_datetime(&input.date),
            input.notes,
            id,
            user
        ],
    )?;
    if n == 0 {
        return Err(Error::NotFound {
            entity: "Transaction",
            id,
            user,
        }
        .into());
    }
    tracing::info!(id, user = %user, "transaction replaced");
    println!("Replaced transaction {}", id);
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_of(sub);
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute(
        "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
        params![id, user],
    )?;
    if n == 0 {
        return Err(Error::NotFound {
            entity: "Transaction",
            id,
            user,
        }
        .into());
    }
    tracing::info!(id, user = %user, "transaction removed");
    println!("Removed transaction {}", id);
    Ok(())
}

/// All of a user's transactions, newest first.
///
/// Rows with an unknown type are dropped; unparseable amounts become zero and
/// unparseable dates become `None`.
pub fn load_transactions(conn: &Connection, user: &str) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, type, category, amount, date, notes FROM transactions
         WHERE user_id=?1 ORDER BY date DESC, id DESC",
    )?;
    let mut rows = stmt.query(params![user])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let kind_raw: String = r.get(2)?;
        let Some(kind) = TxKind::from_label(&kind_raw) else {
            tracing::warn!(id, kind = %kind_raw, "skipping transaction with unknown type");
            continue;
        };
        let amount_raw: Option<String> = r.get(4)?;
        let date_raw: Option<String> = r.get(5)?;
        let date = date_raw.as_deref().and_then(lenient_datetime);
        if date.is_none() {
            tracing::warn!(id, "transaction has no usable date");
        }
        out.push(Transaction {
            id,
            user_id: r.get(1)?,
            kind,
            category: r.get(3)?,
            amount: coerce_amount(amount_raw.as_deref()),
            date,
            notes: r.get(6)?,
        });
    }
    tracing::debug!(user, count = out.len(), "loaded transactions");
    Ok(out)
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let user = user_of(sub);
    let kind = sub
        .get_one::<String>("type")
        .and_then(|s| TxKind::from_label(s));
    let category = sub.get_one::<String>("category");
    let from = sub
        .get_one::<String>("from")
        .map(|s| parse_datetime(s))
        .transpose()?;
    let to = sub
        .get_one::<String>("to")
        .map(|s| parse_datetime(s))
        .transpose()?
        .map(|d| end_of_day(d.date()));
    let limit = sub.get_one::<usize>("limit").copied();

    let rows = load_transactions(conn, &user)?
        .into_iter()
        .filter(|t| kind.is_none_or(|k| t.kind == k))
        .filter(|t| match category {
            Some(c) => t.category.as_deref().is_some_and(|tc| same_category(tc, c)),
            None => true,
        })
        .filter(|t| match (from, t.date) {
            (Some(f), Some(d)) => d >= f,
            (Some(_), None) => false,
            (None, _) => true,
        })
        .filter(|t| match (to, t.date) {
            (Some(e), Some(d)) => d <= e,
            (Some(_), None) => false,
            (None, _) => true,
        })
        .take(limit.unwrap_or(usize::MAX))
        .collect();
    Ok(rows)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let settings = Settings::load(conn)?;
        let prefix = settings.prefix();
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.date.as_ref().map(fmt_datetime).unwrap_or_default(),
                    t.kind.as_str().to_string(),
                    t.category.clone().unwrap_or_default(),
                    fmt_money(&t.amount, &prefix),
                    t.notes.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["ID", "Date", "Type", "Category", "Amount", "Notes"], rows)
        );
    }
    Ok(())
}
