// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget versus actual spend.
//!
//! Everything here is a pure function of the budgets, the transactions and
//! the reference instant. Nothing is cached: callers recompute whenever their
//! inputs change.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

use crate::models::{Budget, Transaction, TxKind};
use crate::period::{Interval, PeriodKind, resolve_period};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Categories compare case-insensitively, ignoring surrounding whitespace.
pub fn normalize_category(s: &str) -> String {
    s.trim().to_lowercase()
}

pub fn same_category(a: &str, b: &str) -> bool {
    normalize_category(a) == normalize_category(b)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    OnTrack,
    Good,
    Warning,
    Over,
}

impl Status {
    /// Bands are `[0, 50)`, `[50, 75)`, `[75, 90)` and `90` upward.
    pub fn from_percentage(pct: Decimal) -> Self {
        if pct < Decimal::from(50) {
            Self::OnTrack
        } else if pct < Decimal::from(75) {
            Self::Good
        } else if pct < Decimal::from(90) {
            Self::Warning
        } else {
            Self::Over
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OnTrack => "On Track",
            Self::Good => "Good",
            Self::Warning => "Warning",
            Self::Over => "Over Budget",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub budget_id: i64,
    pub category: String,
    pub period: PeriodKind,
    pub budgeted: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage: Decimal,
    pub status: Status,
    pub matched: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rollup {
    pub total_budget: Decimal,
    pub total_spent: Decimal,
    pub remaining: Decimal,
    pub per_budget: Vec<BudgetSummary>,
}

impl Rollup {
    pub fn is_over_budget(&self) -> bool {
        self.remaining.is_sign_negative() && !self.remaining.is_zero()
    }

    /// Share of the whole portfolio already spent, 0 when nothing is budgeted.
    pub fn percentage_used(&self) -> Decimal {
        percentage_of(self.total_spent, self.total_budget)
    }
}

/// The window `budget` is evaluated over at `now`.
pub fn budget_interval(budget: &Budget, now: NaiveDateTime) -> Interval {
    resolve_period(budget.period, budget.start_date, budget.end_date, now)
}

/// Expenses in the budget's category that fall inside its window.
///
/// Records without a category or a date are skipped.
pub fn matching_expenses<'a>(
    budget: &Budget,
    transactions: &'a [Transaction],
    now: NaiveDateTime,
) -> Vec<&'a Transaction> {
    let interval = budget_interval(budget, now);
    let wanted = normalize_category(&budget.category);
    let matched: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| t.kind == TxKind::Expense)
        .filter(|t| {
            t.category
                .as_deref()
                .is_some_and(|c| normalize_category(c) == wanted)
        })
        .filter(|t| t.date.is_some_and(|d| interval.contains(d)))
        .collect();
    tracing::debug!(
        budget_id = budget.id,
        category = %wanted,
        start = %interval.start,
        end = %interval.end,
        matched = matched.len(),
        "matched expenses"
    );
    matched
}

pub fn aggregate<'a, I>(budget: &Budget, matched: I) -> BudgetSummary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut spent = Decimal::ZERO;
    let mut count = 0;
    for t in matched {
        spent = spent.saturating_add(t.amount);
        count += 1;
    }
    let percentage = percentage_of(spent, budget.amount);
    BudgetSummary {
        budget_id: budget.id,
        category: budget.category.trim().to_string(),
        period: budget.period,
        budgeted: budget.amount,
        spent,
        remaining: budget.amount.saturating_sub(spent),
        percentage,
        status: Status::from_percentage(percentage),
        matched: count,
    }
}

/// Every budget is an independent filter, so a transaction matching two
/// budgets counts toward both.
pub fn rollup(budgets: &[Budget], transactions: &[Transaction], now: NaiveDateTime) -> Rollup {
    let per_budget: Vec<BudgetSummary> = budgets
        .iter()
        .map(|b| aggregate(b, matching_expenses(b, transactions, now)))
        .collect();
    // Totals saturate at the Decimal range instead of overflowing.
    let total_budget = budgets
        .iter()
        .fold(Decimal::ZERO, |acc, b| acc.saturating_add(b.amount));
    let total_spent = per_budget
        .iter()
        .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.spent));
    Rollup {
        total_budget,
        total_spent,
        remaining: total_budget.saturating_sub(total_spent),
        per_budget,
    }
}

fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|r| r.checked_mul(HUNDRED))
        .unwrap_or(Decimal::MAX)
}
