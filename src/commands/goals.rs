// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cli::user_of;
use crate::config::Settings;
use crate::db::to_db_datetime;
use crate::error::Error;
use crate::goals::{contribute, goal_progress};
use crate::models::{Contribution, GoalCategory, SavingsGoal};
use crate::utils::{
    coerce_amount, fmt_money, lenient_datetime, maybe_print_json, parse_amount, parse_datetime,
    pretty_table,
};
use anyhow::{Context, Result};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("contribute", sub)) => add_contribution(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_of(sub);
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    if name.is_empty() {
        return Err(Error::InvalidInput("goal name must not be empty".into()).into());
    }
    let target = parse_amount(sub.get_one::<String>("target").unwrap())?;
    let current = parse_amount(sub.get_one::<String>("current").unwrap())?;
    let deadline = parse_datetime(sub.get_one::<String>("deadline").unwrap())?;
    let category = GoalCategory::from_label(sub.get_one::<String>("category").unwrap());

    conn.execute(
        "INSERT INTO savings_goals(user_id, name, target_amount, current_amount, deadline, category)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user,
            name,
            target.to_string(),
            current.to_string(),
            to_db_datetime(&deadline),
            category.as_str()
        ],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(id, user = %user, "savings goal created");
    println!(
        "Goal {} '{}' created: target {} by {}",
        id,
        name,
        target,
        deadline.date()
    );
    Ok(())
}

fn contributions_for(conn: &Connection, goal_id: i64) -> Result<Vec<Contribution>> {
    let mut stmt = conn.prepare_cached(
        "SELECT amount, date FROM goal_contributions WHERE goal_id=?1 ORDER BY date, id",
    )?;
    let rows = stmt.query_map(params![goal_id], |r| {
        Ok((r.get::<_, Option<String>>(0)?, r.get::<_, String>(1)?))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (amount, date) = row?;
        let Some(date) = lenient_datetime(&date) else {
            tracing::warn!(goal_id, date = %date, "skipping contribution with bad date");
            continue;
        };
        out.push(Contribution {
            amount: coerce_amount(amount.as_deref()),
            date,
        });
    }
    Ok(out)
}

fn goal_from_row(conn: &Connection, r: &rusqlite::Row<'_>) -> Result<SavingsGoal> {
    let id: i64 = r.get(0)?;
    let deadline_raw: String = r.get(5)?;
    let deadline = lenient_datetime(&deadline_raw)
        .with_context(|| format!("Invalid deadline '{}' on goal {}", deadline_raw, id))?;
    Ok(SavingsGoal {
        id,
        user_id: r.get(1)?,
        name: r.get(2)?,
        target_amount: coerce_amount(r.get::<_, Option<String>>(3)?.as_deref()),
        current_amount: coerce_amount(r.get::<_, Option<String>>(4)?.as_deref()),
        deadline,
        category: GoalCategory::from_label(&r.get::<_, String>(6)?),
        contributions: contributions_for(conn, id)?,
    })
}

const GOAL_COLUMNS: &str =
    "SELECT id, user_id, name, target_amount, current_amount, deadline, category FROM savings_goals";

/// A user's goals, most recently created first.
pub fn load_goals(conn: &Connection, user: &str) -> Result<Vec<SavingsGoal>> {
    let mut stmt = conn.prepare(&format!("{} WHERE user_id=?1 ORDER BY id DESC", GOAL_COLUMNS))?;
    let mut rows = stmt.query(params![user])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(goal_from_row(conn, r)?);
    }
    Ok(out)
}

pub fn load_goal(conn: &Connection, user: &str, id: i64) -> Result<SavingsGoal> {
    let mut stmt = conn.prepare(&format!("{} WHERE id=?1 AND user_id=?2", GOAL_COLUMNS))?;
    let mut rows = stmt.query(params![id, user])?;
    match rows.next()? {
        Some(r) => goal_from_row(conn, r),
        None => Err(Error::NotFound {
            entity: "Goal",
            id,
            user: user.to_string(),
        }
        .into()),
    }
}

fn add_contribution(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_of(sub);
    let id = *sub.get_one::<i64>("id").unwrap();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let now = Local::now().naive_local();

    let mut goal = load_goal(conn, &user, id)?;
    contribute(&mut goal, amount, now)?;

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "UPDATE savings_goals SET current_amount=?1 WHERE id=?2",
        params![goal.current_amount.to_string(), id],
    )?;
    tx.execute(
        "INSERT INTO goal_contributions(goal_id, amount, date) VALUES (?1, ?2, ?3)",
        params![id, amount.to_string(), to_db_datetime(&now)],
    )?;
    tx.commit()?;

    let p = goal_progress(&goal, now);
    tracing::info!(id, user = %user, "contribution recorded");
    println!(
        "Added {} to '{}': {} of {} ({:.1}%)",
        amount, goal.name, goal.current_amount, goal.target_amount, p.progress
    );
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = user_of(sub);
    let id = *sub.get_one::<i64>("id").unwrap();
    let owned: Option<i64> = conn
        .query_row(
            "SELECT id FROM savings_goals WHERE id=?1 AND user_id=?2",
            params![id, user],
            |r| r.get(0),
        )
        .optional()?;
    if owned.is_none() {
        return Err(Error::NotFound {
            entity: "Goal",
            id,
            user,
        }
        .into());
    }
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM goal_contributions WHERE goal_id=?1", params![id])?;
    tx.execute("DELETE FROM savings_goals WHERE id=?1", params![id])?;
    tx.commit()?;
    tracing::info!(id, user = %user, "savings goal removed");
    println!("Removed goal {}", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let now = match sub.get_one::<String>("as_of") {
        Some(s) => parse_datetime(s)?,
        None => Local::now().naive_local(),
    };
    let goals = load_goals(conn, &user_of(sub))?;
    let progress: Vec<_> = goals.iter().map(|g| goal_progress(g, now)).collect();
    if maybe_print_json(json_flag, jsonl_flag, &progress)? {
        return Ok(());
    }
    let prefix = Settings::load(conn)?.prefix();
    let rows = progress
        .iter()
        .map(|p| {
            let due = if p.completed {
                "done".to_string()
            } else if p.days_remaining < 0 {
                format!("{} days overdue", -p.days_remaining)
            } else {
                format!("{} days", p.days_remaining)
            };
            vec![
                p.goal_id.to_string(),
                p.name.clone(),
                p.category.as_str().to_string(),
                fmt_money(&p.current, &prefix),
                fmt_money(&p.target, &prefix),
                format!("{:.1}%", p.progress),
                due,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Goal", "Category", "Saved", "Target", "Progress", "Due"],
            rows
        )
    );
    Ok(())
}
