// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::period::start_of_day;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Accepts `YYYY-MM-DD` (midnight) or `YYYY-MM-DDTHH:MM[:SS]`, local time.
pub fn parse_datetime(s: &str) -> Result<NaiveDateTime> {
    lenient_datetime(s).ok_or_else(|| {
        anyhow!(
            "Invalid date '{}', expected YYYY-MM-DD or YYYY-MM-DDTHH:MM",
            s.trim()
        )
    })
}

/// Best-effort instant parsing for stored and imported data.
///
/// RFC 3339 timestamps carrying an offset are converted to local time.
pub fn lenient_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(start_of_day)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Amount entered by a user: must parse and must not be negative.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d.is_sign_negative() && !d.is_zero() {
        return Err(crate::error::Error::NegativeAmount(d).into());
    }
    Ok(d)
}

/// Stored amount text; anything that is not a number counts as zero.
pub fn coerce_amount(raw: Option<&str>) -> Decimal {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s.parse::<Decimal>().unwrap_or_else(|_| {
            tracing::warn!(amount = s, "non-numeric amount treated as 0");
            Decimal::ZERO
        }),
        _ => Decimal::ZERO,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(Decimal),
    Text(String),
    Other(IgnoredAny),
}

/// Serde adapter: numbers, numeric strings, or anything else as zero.
pub fn de_lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    let raw = Option::<RawAmount>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawAmount::Number(d)) => d,
        Some(RawAmount::Text(s)) => coerce_amount(Some(&s)),
        Some(RawAmount::Other(_)) | None => Decimal::ZERO,
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInstant {
    Text(String),
    Other(IgnoredAny),
}

/// Serde adapter: unparseable or missing instants become `None`.
pub fn de_lenient_datetime<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    let raw = Option::<RawInstant>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawInstant::Text(s)) => lenient_datetime(&s),
        _ => None,
    })
}

pub fn fmt_money(d: &Decimal, symbol: &str) -> String {
    if d.is_sign_negative() && !d.is_zero() {
        format!("-{}{:.2}", symbol, d.abs().round_dp(2))
    } else {
        format!("{}{:.2}", symbol, d.round_dp(2))
    }
}

pub fn fmt_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "de_lenient_amount")]
        amount: Decimal,
        #[serde(default, deserialize_with = "de_lenient_datetime")]
        date: Option<NaiveDateTime>,
    }

    #[test]
    fn datetime_accepts_bare_dates_and_times() {
        let d = parse_datetime("2024-03-01").unwrap();
        assert_eq!(d.to_string(), "2024-03-01 00:00:00");
        let d = parse_datetime(" 2024-03-01T18:45 ").unwrap();
        assert_eq!(d.to_string(), "2024-03-01 18:45:00");
        assert!(parse_datetime("01/03/2024").is_err());
    }

    #[test]
    fn amount_rejects_negative_input() {
        assert_eq!(parse_amount(" 12.50 ").unwrap(), dec("12.50"));
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn coerce_amount_defaults_to_zero() {
        assert_eq!(coerce_amount(Some("42.5")), dec("42.5"));
        assert_eq!(coerce_amount(Some("forty")), Decimal::ZERO);
        assert_eq!(coerce_amount(None), Decimal::ZERO);
    }

    #[test]
    fn lenient_serde_adapters() {
        let r: Row = serde_json::from_str(r#"{"amount": 12.5, "date": "2024-03-01"}"#).unwrap();
        assert_eq!(r.amount, dec("12.5"));
        assert!(r.date.is_some());

        let r: Row = serde_json::from_str(r#"{"amount": "lots", "date": 17}"#).unwrap();
        assert_eq!(r.amount, Decimal::ZERO);
        assert!(r.date.is_none());

        let r: Row = serde_json::from_str(r#"{"amount": null}"#).unwrap();
        assert_eq!(r.amount, Decimal::ZERO);
        assert!(r.date.is_none());

        let r: Row = serde_json::from_str(r#"{"amount": "7", "date": "not a date"}"#).unwrap();
        assert_eq!(r.amount, dec("7"));
        assert!(r.date.is_none());
    }

    #[test]
    fn money_formatting_keeps_sign_outside_symbol() {
        assert_eq!(fmt_money(&dec("100"), "₹"), "₹100.00");
        assert_eq!(fmt_money(&dec("-12.349"), "$"), "-$12.35");
    }
}
