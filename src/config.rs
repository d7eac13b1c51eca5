// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

pub const DB_ENV: &str = "FINTRACK_DB";
pub const LOG_ENV: &str = "FINTRACK_LOG";
pub const DEFAULT_CURRENCY: &str = "INR";

/// Display settings, read from the database each time a command runs and
/// handed to whatever renders output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub currency: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl Settings {
    pub fn load(conn: &Connection) -> Result<Self> {
        let currency = get_setting(conn, "currency")?.unwrap_or_else(|| DEFAULT_CURRENCY.into());
        Ok(Self { currency })
    }

    pub fn symbol(&self) -> &str {
        match self.currency.as_str() {
            "INR" => "₹",
            "USD" => "$",
            "EUR" => "€",
            "GBP" => "£",
            "JPY" => "¥",
            _ => "",
        }
    }

    /// Currency prefix for money columns: the symbol, or the code plus a space.
    pub fn prefix(&self) -> String {
        match self.symbol() {
            "" => format!("{} ", self.currency),
            s => s.to_string(),
        }
    }
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}
