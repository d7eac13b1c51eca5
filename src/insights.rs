// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::{Transaction, TxKind};
use crate::period::{Interval, PeriodKind, current_period};
use crate::summary::normalize_category;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub in_deficit: bool,
}

pub fn overview(transactions: &[Transaction]) -> Overview {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    for t in transactions {
        match t.kind {
            TxKind::Income => total_income = total_income.saturating_add(t.amount),
            TxKind::Expense => total_expense = total_expense.saturating_add(t.amount),
        }
    }
    let balance = total_income.saturating_sub(total_expense);
    Overview {
        total_income,
        total_expense,
        balance,
        in_deficit: balance < Decimal::ZERO,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySpend {
    pub category: String,
    pub spent: Decimal,
    pub count: usize,
}

/// Expense totals per category, largest first.
///
/// Spellings that normalise to the same key are merged under the first one
/// seen. `interval` of `None` means all time. Uncategorised expenses are
/// skipped, as are undated ones when an interval is given.
pub fn spend_by_category(
    transactions: &[Transaction],
    interval: Option<&Interval>,
) -> Vec<CategorySpend> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<CategorySpend> = Vec::new();
    for t in transactions.iter().filter(|t| t.kind == TxKind::Expense) {
        let Some(label) = t
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        else {
            continue;
        };
        if let Some(iv) = interval {
            if !t.date.is_some_and(|d| iv.contains(d)) {
                continue;
            }
        }
        let key = normalize_category(label);
        let slot = *index.entry(key).or_insert_with(|| {
            out.push(CategorySpend {
                category: label.to_string(),
                spent: Decimal::ZERO,
                count: 0,
            });
            out.len() - 1
        });
        out[slot].spent = out[slot].spent.saturating_add(t.amount);
        out[slot].count += 1;
    }
    out.sort_by(|a, b| b.spent.cmp(&a.spent).then_with(|| a.category.cmp(&b.category)));
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotals {
    /// `YYYY-MM`
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Income and expense per calendar month for the `months` months ending with
/// the one containing `today`, oldest first. Undated records are skipped.
pub fn monthly_trend(
    transactions: &[Transaction],
    months: usize,
    today: NaiveDate,
) -> Vec<MonthTotals> {
    let mut windows = Vec::with_capacity(months);
    let mut cursor = Some(today);
    while windows.len() < months {
        let Some(day) = cursor else { break };
        let iv = current_period(PeriodKind::Monthly, day);
        cursor = iv.start.date().pred_opt();
        windows.push(iv);
    }
    windows.reverse();

    windows
        .iter()
        .map(|iv| {
            let mut income = Decimal::ZERO;
            let mut expense = Decimal::ZERO;
            for t in transactions.iter().filter(|t| t.date.is_some_and(|d| iv.contains(d))) {
                match t.kind {
                    TxKind::Income => income = income.saturating_add(t.amount),
                    TxKind::Expense => expense = expense.saturating_add(t.amount),
                }
            }
            MonthTotals {
                month: iv.start.format("%Y-%m").to_string(),
                income,
                expense,
                net: income.saturating_sub(expense),
            }
        })
        .collect()
}
