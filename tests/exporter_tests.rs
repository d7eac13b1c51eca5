// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fintrack::{cli, commands::exporter, db};
use rusqlite::Connection;
use serde_json::json;
use tempfile::tempdir;

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO transactions(user_id, type, category, amount, date, notes) VALUES
            ('u1', 'expense', 'Groceries', '12.34', '2025-01-02T09:30:00', 'Weekly run'),
            ('u1', 'income', 'Salary', '5000', '2025-01-01T08:00:00', NULL),
            ('u2', 'expense', 'Fuel', '40', '2025-01-03T10:00:00', NULL);
        "#,
    )
    .unwrap();
    conn
}

fn run_export(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["fintrack"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn export_transactions_writes_pretty_json_oldest_first() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(
        &conn,
        &[
            "--user", "u1", "export", "transactions", "--format", "json", "--out", &out_str,
        ],
    )
    .unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        parsed,
        json!([
            {
                "date": "2025-01-01T08:00:00",
                "type": "income",
                "category": "Salary",
                "amount": "5000",
                "notes": null
            },
            {
                "date": "2025-01-02T09:30:00",
                "type": "expense",
                "category": "Groceries",
                "amount": "12.34",
                "notes": "Weekly run"
            }
        ])
    );
}

#[test]
fn export_transactions_writes_csv_header_and_rows() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    let out_str = out_path.to_string_lossy().to_string();

    run_export(&conn, &["--user", "u2", "export", "transactions", "--out", &out_str]).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "date,type,category,amount,notes");
    assert_eq!(lines[1], "2025-01-03T10:00:00,expense,Fuel,40,");
    assert_eq!(lines.len(), 2);
}

#[test]
fn export_rejects_unknown_format_without_writing() {
    let conn = base_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.xml");
    let out_str = out_path.to_string_lossy().to_string();

    let err = run_export(
        &conn,
        &["export", "transactions", "--format", "xml", "--out", &out_str],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Unknown format: xml"));
    assert!(!out_path.exists());
}
