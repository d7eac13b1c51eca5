// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{Contribution, GoalCategory, SavingsGoal};

const DAY_MS: i64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProgressBand {
    Complete,
    Close,
    Halfway,
    Started,
    Low,
}

impl ProgressBand {
    pub fn from_progress(pct: Decimal) -> Self {
        if pct >= Decimal::ONE_HUNDRED {
            Self::Complete
        } else if pct >= Decimal::from(75) {
            Self::Close
        } else if pct >= Decimal::from(50) {
            Self::Halfway
        } else if pct >= Decimal::from(25) {
            Self::Started
        } else {
            Self::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalProgress {
    pub goal_id: i64,
    pub name: String,
    pub category: GoalCategory,
    pub target: Decimal,
    pub current: Decimal,
    pub still_needed: Decimal,
    pub progress: Decimal,
    pub band: ProgressBand,
    pub days_remaining: i64,
    pub completed: bool,
}

/// Percent of the target saved, capped at 100.
pub fn progress(current: Decimal, target: Decimal) -> Decimal {
    if target <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    current
        .checked_div(target)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ONE_HUNDRED)
        .min(Decimal::ONE_HUNDRED)
}

/// Whole days until `deadline`, rounded up. Negative once it has passed.
pub fn days_remaining(deadline: NaiveDateTime, now: NaiveDateTime) -> i64 {
    let ms = (deadline - now).num_milliseconds();
    let days = ms.div_euclid(DAY_MS);
    if ms.rem_euclid(DAY_MS) != 0 { days + 1 } else { days }
}

pub fn goal_progress(goal: &SavingsGoal, now: NaiveDateTime) -> GoalProgress {
    let pct = progress(goal.current_amount, goal.target_amount);
    GoalProgress {
        goal_id: goal.id,
        name: goal.name.clone(),
        category: goal.category,
        target: goal.target_amount,
        current: goal.current_amount,
        still_needed: goal
            .target_amount
            .saturating_sub(goal.current_amount)
            .max(Decimal::ZERO),
        progress: pct,
        band: ProgressBand::from_progress(pct),
        days_remaining: days_remaining(goal.deadline, now),
        completed: pct >= Decimal::ONE_HUNDRED,
    }
}

/// Add `amount` to the goal and record it in its history.
pub fn contribute(goal: &mut SavingsGoal, amount: Decimal, now: NaiveDateTime) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidInput(format!(
            "contribution must be positive, got {}",
            amount
        )));
    }
    goal.current_amount = goal.current_amount.checked_add(amount).ok_or_else(|| {
        Error::InvalidInput(format!("contribution {} overflows goal '{}'", amount, goal.name))
    })?;
    goal.contributions.push(Contribution { amount, date: now });
    Ok(())
}
