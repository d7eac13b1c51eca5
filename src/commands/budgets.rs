// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cli::user_of;
use crate::commands::transactions::load_transactions;
use crate::config::Settings;
use crate::db::to_db_datetime;
use crate::error::Error;
use crate::models::Budget;
use crate::period::PeriodKind;
use crate::summary::{budget_interval, rollup};
use crate::utils::{
    coerce_amount, fmt_money, lenient_datetime, maybe_print_json, parse_amount, parse_datetime,
    pretty_table,
};
use anyhow::Result;
use chrono::Local;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("status", sub)) => status(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_of(sub);
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    if category.is_empty() {
        return Err(Error::InvalidInput("category must not be empty".into()).into());
    }
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let period = PeriodKind::from_label(sub.get_one::<String>("period").unwrap());
    let start = sub
        .get_one::<String>("start")
        .map(|s| parse_datetime(s))
        .transpose()?;
    let end = sub
        .get_one::<String>("end")
        .map(|s| parse_datetime(s))
        .transpose()?;
    if let (Some(s), Some(e)) = (start, end) {
        if e.date() < s.date() {
            return Err(Error::InvalidInput(format!(
                "end date {} is before start date {}",
                e.date(),
                s.date()
            ))
            .into());
        }
    }

    conn.execute(
        "INSERT INTO budgets(user_id, category, amount, period, start_date, end_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user,
            category,
            amount.to_string(),
            period.as_str(),
            start.as_ref().map(to_db_datetime),
            end.as_ref().map(to_db_datetime)
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, user = %user, period = period.as_str(), "budget created");
    match (start, end) {
        (Some(s), Some(e)) => println!(
            "Budget {} set: {} {} from {} to {}",
            id,
            category,
            amount,
            s.date(),
            e.date()
        ),
        _ => println!("Budget {} set: {} {} per {} period", id, category, amount, period),
    }
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_of(sub);
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute(
        "DELETE FROM budgets WHERE id=?1 AND user_id=?2",
        params![id, user],
    )?;
    if n == 0 {
        return Err(Error::NotFound {
            entity: "Budget",
            id,
            user,
        }
        .into());
    }
    tracing::info!(id, user = %user, "budget removed");
    println!("Removed budget {}", id);
    Ok(())
}

pub fn load_budgets(conn: &Connection, user: &str) -> Result<Vec<Budget>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, category, amount, period, start_date, end_date
         FROM budgets WHERE user_id=?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![user], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, Option<String>>(6)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, user_id, category, amount, period, start, end) = row?;
        out.push(Budget {
            id,
            user_id,
            category,
            amount: coerce_amount(amount.as_deref()),
            period: period
                .as_deref()
                .map(PeriodKind::from_label)
                .unwrap_or_default(),
            start_date: start.as_deref().and_then(lenient_datetime),
            end_date: end.as_deref().and_then(lenient_datetime),
        });
    }
    Ok(out)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let budgets = load_budgets(conn, &user_of(sub))?;
    if maybe_print_json(json_flag, jsonl_flag, &budgets)? {
        return Ok(());
    }
    let prefix = Settings::load(conn)?.prefix();
    let data = budgets
        .iter()
        .map(|b| {
            let window = match (b.start_date, b.end_date) {
                (Some(s), Some(e)) => format!("{} .. {}", s.date(), e.date()),
                _ => "current period".to_string(),
            };
            vec![
                b.id.to_string(),
                b.category.clone(),
                fmt_money(&b.amount, &prefix),
                b.period.to_string(),
                window,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Category", "Amount", "Period", "Window"], data)
    );
    Ok(())
}

fn status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let user = user_of(sub);
    let now = match sub.get_one::<String>("as_of") {
        Some(s) => parse_datetime(s)?,
        None => Local::now().naive_local(),
    };
    let budgets = load_budgets(conn, &user)?;
    let transactions = load_transactions(conn, &user)?;
    let summary = rollup(&budgets, &transactions, now);

    if jsonl_flag {
        maybe_print_json(false, true, &summary.per_budget)?;
        return Ok(());
    }
    if maybe_print_json(json_flag, false, &summary)? {
        return Ok(());
    }

    let prefix = Settings::load(conn)?.prefix();
    let rows = budgets
        .iter()
        .zip(&summary.per_budget)
        .map(|(b, s)| {
            let iv = budget_interval(b, now);
            vec![
                s.budget_id.to_string(),
                s.category.clone(),
                format!("{} .. {}", iv.start.date(), iv.end.date()),
                fmt_money(&s.budgeted, &prefix),
                fmt_money(&s.spent, &prefix),
                fmt_money(&s.remaining, &prefix),
                format!("{:.0}%", s.percentage.round_dp(0)),
                s.status.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "ID", "Category", "Window", "Budget", "Spent", "Remaining", "Used", "Status"
            ],
            rows
        )
    );
    println!(
        "Total budget {}  spent {}  {} {}  ({:.0}% used)",
        fmt_money(&summary.total_budget, &prefix),
        fmt_money(&summary.total_spent, &prefix),
        if summary.is_over_budget() {
            "over by"
        } else {
            "remaining"
        },
        fmt_money(&summary.remaining.abs(), &prefix),
        summary.percentage_used().round_dp(0)
    );
    Ok(())
}
