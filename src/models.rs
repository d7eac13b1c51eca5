// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::period::PeriodKind;
use crate::utils::{de_lenient_amount, de_lenient_datetime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Expense,
    Income,
}

impl TxKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Some(Self::Expense),
            "income" => Some(Self::Income),
            _ => None,
        }
    }
}

/// A recorded income or expense.
///
/// `category` and `date` are optional because records arrive from storage and
/// imports that do not always carry them; such records never match a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: TxKind,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "de_lenient_amount")]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "de_lenient_datetime")]
    pub date: Option<NaiveDateTime>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub user_id: String,
    pub category: String,
    #[serde(default, deserialize_with = "de_lenient_amount")]
    pub amount: Decimal,
    #[serde(default)]
    pub period: PeriodKind,
    // Without both dates the budget follows the current period.
    #[serde(default, deserialize_with = "de_lenient_datetime")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "de_lenient_datetime")]
    pub end_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
    Vacation,
    House,
    Car,
    Education,
    Emergency,
    #[default]
    General,
    Wedding,
    Gadget,
}

impl GoalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vacation => "vacation",
            Self::House => "house",
            Self::Car => "car",
            Self::Education => "education",
            Self::Emergency => "emergency",
            Self::General => "general",
            Self::Wedding => "wedding",
            Self::Gadget => "gadget",
        }
    }

    pub fn all() -> &'static [GoalCategory] {
        &[
            Self::Vacation,
            Self::House,
            Self::Car,
            Self::Education,
            Self::Emergency,
            Self::General,
            Self::Wedding,
            Self::Gadget,
        ]
    }

    /// Unrecognised labels land in `general`.
    pub fn from_label(s: &str) -> Self {
        let s = s.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .unwrap_or_default()
    }
}

impl<'de> Deserialize<'de> for GoalCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| Self::from_label(&s)).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub amount: Decimal,
    pub date: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub deadline: NaiveDateTime,
    #[serde(default)]
    pub category: GoalCategory,
    #[serde(default)]
    pub contributions: Vec<Contribution>,
}
