// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cli::user_of;
use crate::commands::transactions::load_transactions;
use crate::config::Settings;
use crate::insights::{monthly_trend, overview, spend_by_category};
use crate::period::{PeriodKind, current_period};
use crate::utils::{fmt_money, maybe_print_json, parse_datetime, pretty_table};
use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("overview", sub)) => show_overview(conn, sub)?,
        Some(("spend-by-category", sub)) => show_spend_by_category(conn, sub)?,
        Some(("trend", sub)) => show_trend(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn show_overview(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let txs = load_transactions(conn, &user_of(sub))?;
    let o = overview(&txs);
    if maybe_print_json(json_flag, jsonl_flag, &o)? {
        return Ok(());
    }
    let prefix = Settings::load(conn)?.prefix();
    let data = vec![
        vec!["Income".to_string(), fmt_money(&o.total_income, &prefix)],
        vec!["Expense".to_string(), fmt_money(&o.total_expense, &prefix)],
        vec!["Balance".to_string(), fmt_money(&o.balance, &prefix)],
    ];
    println!("{}", pretty_table(&["", "Total"], data));
    if o.in_deficit {
        println!(
            "Warning: expenses exceed income by {}",
            fmt_money(&o.balance.abs(), &prefix)
        );
    }
    Ok(())
}

fn show_spend_by_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let now = match sub.get_one::<String>("as_of") {
        Some(s) => parse_datetime(s)?,
        None => Local::now().naive_local(),
    };
    let interval = sub
        .get_one::<String>("period")
        .map(|p| current_period(PeriodKind::from_label(p), now.date()));
    let txs = load_transactions(conn, &user_of(sub))?;
    let rows = spend_by_category(&txs, interval.as_ref());
    if maybe_print_json(json_flag, jsonl_flag, &rows)? {
        return Ok(());
    }
    let prefix = Settings::load(conn)?.prefix();
    if let Some(iv) = interval {
        println!("{} .. {}", iv.start.date(), iv.end.date());
    }
    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.category.clone(),
                r.count.to_string(),
                fmt_money(&r.spent, &prefix),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Count", "Spent"], data));
    Ok(())
}

fn show_trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months = sub.get_one::<u32>("months").copied().unwrap_or(6) as usize;
    let today = match sub.get_one::<String>("as_of") {
        Some(s) => parse_datetime(s)?,
        None => Local::now().naive_local(),
    }
    .date();
    let txs = load_transactions(conn, &user_of(sub))?;
    let rows = monthly_trend(&txs, months, today);
    if maybe_print_json(json_flag, jsonl_flag, &rows)? {
        return Ok(());
    }
    let prefix = Settings::load(conn)?.prefix();
    let data = rows
        .iter()
        .map(|r| {
            vec![
                r.month.clone(),
                fmt_money(&r.income, &prefix),
                fmt_money(&r.expense, &prefix),
                fmt_money(&r.net, &prefix),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expense", "Net"], data)
    );
    Ok(())
}
