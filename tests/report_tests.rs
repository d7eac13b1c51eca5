// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use fintrack::commands::transactions::load_transactions;
use fintrack::commands::{ask, reports, settings};
use fintrack::config::Settings;
use fintrack::insights::monthly_trend;
use fintrack::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO transactions(user_id, type, category, amount, date) VALUES
            ('default', 'expense', 'food ', '120', '2024-03-02T12:00:00'),
            ('default', 'expense', 'Food', '80', '2024-03-09T12:00:00'),
            ('default', 'expense', 'Car insurance', '300', '2024-01-15T12:00:00'),
            ('default', 'expense', 'Car', '40', '2024-03-10T12:00:00'),
            ('default', 'income', 'Salary', '1000', '2024-03-01T09:00:00'),
            ('other', 'expense', 'Food', '999', '2024-03-02T12:00:00');
        "#,
    )
    .unwrap();
    conn
}

fn ask_reply(conn: &Connection, args: &[&str]) -> String {
    let mut argv = vec!["fintrack", "ask"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("ask", ask_m)) = matches.subcommand() {
        ask::reply(conn, ask_m).unwrap()
    } else {
        panic!("no ask subcommand");
    }
}

fn config_cmd(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["fintrack", "config"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("config", m)) = matches.subcommand() {
        settings::handle(conn, m)
    } else {
        panic!("no config subcommand");
    }
}

#[test]
fn ask_how_much_uses_the_users_own_spend() {
    let conn = setup();
    let reply = ask_reply(&conn, &["How", "much", "did", "I", "spend", "on", "food?"]);
    assert_eq!(reply, "You've spent ₹200.00 on Food so far.");
}

#[test]
fn ask_prefers_the_longest_category_name() {
    let conn = setup();
    let reply = ask_reply(&conn, &["how much for car insurance"]);
    assert!(reply.contains("Car insurance"), "{}", reply);
    assert!(reply.contains("₹300.00"), "{}", reply);
}

#[test]
fn ask_biggest_and_summary_follow_display_currency() {
    let conn = setup();
    config_cmd(&conn, &["currency", "usd"]).unwrap();
    assert_eq!(Settings::load(&conn).unwrap().currency, "USD");

    let reply = ask_reply(&conn, &["what's", "my", "biggest", "expense?"]);
    assert_eq!(reply, "Your biggest expense category is Car insurance with $300.00.");

    let reply = ask_reply(&conn, &["give", "me", "a", "summary"]);
    assert_eq!(reply, "Total expenses: $540.00. Total income: $1000.00.");
}

#[test]
fn ask_falls_back_to_help() {
    let conn = setup();
    let reply = ask_reply(&conn, &["hello"]);
    assert!(reply.starts_with("I can answer questions like"));
    assert!(reply.contains("₹540.00"));
}

#[test]
fn currency_code_is_validated() {
    let conn = setup();
    assert!(config_cmd(&conn, &["currency", "rupees"]).is_err());
    assert_eq!(Settings::load(&conn).unwrap().currency, "INR");
}

#[test]
fn reports_render() {
    let conn = setup();
    let run = |args: &[&str]| {
        let mut argv = vec!["fintrack", "report"];
        argv.extend_from_slice(args);
        let matches = cli::build_cli().get_matches_from(argv);
        if let Some(("report", m)) = matches.subcommand() {
            reports::handle(&conn, m).unwrap();
        } else {
            panic!("no report subcommand");
        }
    };
    run(&["overview"]);
    run(&["overview", "--json"]);
    run(&["spend-by-category"]);
    run(&["spend-by-category", "--period", "monthly", "--as-of", "2024-03-20", "--jsonl"]);
    run(&["trend"]);
    run(&["trend", "--months", "3", "--as-of", "2024-03-20", "--json"]);
}

#[test]
fn trend_groups_the_users_records_by_month() {
    let conn = setup();
    let txs = load_transactions(&conn, cli::DEFAULT_USER).unwrap();
    let rows = monthly_trend(&txs, 3, NaiveDate::from_ymd_opt(2024, 3, 20).unwrap());

    let months: Vec<&str> = rows.iter().map(|r| r.month.as_str()).collect();
    assert_eq!(months, ["2024-01", "2024-02", "2024-03"]);
    assert_eq!(rows[0].expense, Decimal::from(300));
    assert_eq!(rows[1].expense, Decimal::ZERO);
    assert_eq!(rows[2].income, Decimal::from(1000));
    assert_eq!(rows[2].expense, Decimal::from(240));
    assert_eq!(rows[2].net, Decimal::from(760));
}
