// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fintrack::commands::goals::{self, load_goal, load_goals};
use fintrack::error::Error;
use fintrack::goals::{ProgressBand, goal_progress};
use fintrack::models::GoalCategory;
use fintrack::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn goal_cmd(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["fintrack"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("goal", goal_m)) = matches.subcommand() {
        goals::handle(conn, goal_m)
    } else {
        panic!("no goal subcommand");
    }
}

fn add_trip(conn: &Connection) {
    goal_cmd(
        conn,
        &[
            "--user", "u1", "goal", "add", "--name", "Goa trip", "--target", "10000",
            "--deadline", "2025-12-31", "--category", "Vacation",
        ],
    )
    .unwrap();
}

#[test]
fn add_then_contribute_updates_progress_and_history() {
    let conn = setup();
    add_trip(&conn);
    goal_cmd(&conn, &["--user", "u1", "goal", "contribute", "--id", "1", "--amount", "2500"]).unwrap();
    goal_cmd(&conn, &["--user", "u1", "goal", "contribute", "--id", "1", "--amount", "5000"]).unwrap();

    let goal = load_goal(&conn, "u1", 1).unwrap();
    assert_eq!(goal.category, GoalCategory::Vacation);
    assert_eq!(goal.current_amount, Decimal::from(7500));
    assert_eq!(goal.contributions.len(), 2);
    assert_eq!(goal.contributions[0].amount, Decimal::from(2500));

    let now = NaiveDate::from_ymd_opt(2025, 12, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let p = goal_progress(&goal, now);
    assert_eq!(p.progress, Decimal::from(75));
    assert_eq!(p.band, ProgressBand::Close);
    assert_eq!(p.still_needed, Decimal::from(2500));
    assert_eq!(p.days_remaining, 30);
    assert!(!p.completed);
}

#[test]
fn contribution_must_be_positive() {
    let conn = setup();
    add_trip(&conn);
    let err = goal_cmd(&conn, &["--user", "u1", "goal", "contribute", "--id", "1", "--amount", "0"])
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::InvalidInput(_))));

    let err = goal_cmd(&conn, &["--user", "u1", "goal", "contribute", "--id", "1", "--amount=-5"])
        .unwrap_err();
    assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NegativeAmount(_))));

    let goal = load_goal(&conn, "u1", 1).unwrap();
    assert_eq!(goal.current_amount, Decimal::ZERO);
    assert!(goal.contributions.is_empty());
}

#[test]
fn goals_belong_to_their_user() {
    let conn = setup();
    add_trip(&conn);
    let err = goal_cmd(&conn, &["--user", "u2", "goal", "contribute", "--id", "1", "--amount", "10"])
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::NotFound { entity: "Goal", .. })
    ));
    assert!(load_goals(&conn, "u2").unwrap().is_empty());
    assert!(goal_cmd(&conn, &["--user", "u2", "goal", "rm", "--id", "1"]).is_err());
}

#[test]
fn unknown_category_falls_back_to_general() {
    let conn = setup();
    goal_cmd(
        &conn,
        &[
            "goal", "add", "--name", "Rainy day", "--target", "500", "--current", "600",
            "--deadline", "2025-06-01", "--category", "yacht",
        ],
    )
    .unwrap();
    let goals = load_goals(&conn, cli::DEFAULT_USER).unwrap();
    assert_eq!(goals[0].category, GoalCategory::General);

    let now = NaiveDate::from_ymd_opt(2025, 7, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let p = goal_progress(&goals[0], now);
    assert_eq!(p.progress, Decimal::ONE_HUNDRED);
    assert!(p.completed);
    assert!(p.days_remaining < 0);
}

#[test]
fn list_and_remove() {
    let conn = setup();
    add_trip(&conn);
    goal_cmd(&conn, &["--user", "u1", "goal", "contribute", "--id", "1", "--amount", "100"]).unwrap();
    goal_cmd(&conn, &["--user", "u1", "goal", "list", "--as-of", "2025-01-01"]).unwrap();
    goal_cmd(&conn, &["--user", "u1", "goal", "list", "--json"]).unwrap();
    goal_cmd(&conn, &["--user", "u1", "goal", "rm", "--id", "1"]).unwrap();

    assert!(load_goals(&conn, "u1").unwrap().is_empty());
    let left: i64 = conn
        .query_row("SELECT COUNT(*) FROM goal_contributions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(left, 0);
}

#[test]
fn failed_remove_keeps_contribution_history() {
    let conn = setup();
    add_trip(&conn);
    goal_cmd(&conn, &["--user", "u1", "goal", "contribute", "--id", "1", "--amount", "100"]).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER keep_goals BEFORE DELETE ON savings_goals
         BEGIN SELECT RAISE(ABORT, 'goal is locked'); END;",
    )
    .unwrap();

    assert!(goal_cmd(&conn, &["--user", "u1", "goal", "rm", "--id", "1"]).is_err());

    let goal = load_goal(&conn, "u1", 1).unwrap();
    assert_eq!(goal.contributions.len(), 1);
    assert_eq!(goal.current_amount, Decimal::from(100));
}
