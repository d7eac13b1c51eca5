// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Keyword driven answers over a user's own transactions.

use crate::insights::{overview, spend_by_category};
use crate::models::Transaction;
use crate::summary::normalize_category;
use crate::utils::fmt_money;

pub fn answer(message: &str, transactions: &[Transaction], symbol: &str) -> String {
    let lower = message.to_lowercase();
    let by_category = spend_by_category(transactions, None);
    let totals = overview(transactions);

    if lower.contains("how much") {
        // Longest name first so "car insurance" beats "car".
        let hit = by_category
            .iter()
            .filter(|c| lower.contains(&normalize_category(&c.category)))
            .max_by_key(|c| c.category.len());
        if let Some(c) = hit {
            return format!(
                "You've spent {} on {} so far.",
                fmt_money(&c.spent, symbol),
                c.category
            );
        }
    }

    if lower.contains("biggest") || lower.contains("highest") {
        return match by_category.first() {
            Some(top) => format!(
                "Your biggest expense category is {} with {}.",
                top.category,
                fmt_money(&top.spent, symbol)
            ),
            None => "No expenses found yet.".to_string(),
        };
    }

    if lower.contains("summary") || lower.contains("overview") {
        return format!(
            "Total expenses: {}. Total income: {}.",
            fmt_money(&totals.total_expense, symbol),
            fmt_money(&totals.total_income, symbol)
        );
    }

    format!(
        "I can answer questions like 'How much did I spend on food?' or \
         'What's my biggest expense category?'.\nQuick totals: expenses {}, income {}.",
        fmt_money(&totals.total_expense, symbol),
        fmt_money(&totals.total_income, symbol)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TxKind;
    use rust_decimal::Decimal;

    fn tx(kind: TxKind, category: &str, amount: i64) -> Transaction {
        Transaction {
            id: 0,
            user_id: "u1".into(),
            kind,
            category: Some(category.into()),
            amount: Decimal::from(amount),
            date: None,
            notes: None,
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            tx(TxKind::Expense, "Food", 120),
            tx(TxKind::Expense, "food", 30),
            tx(TxKind::Expense, "Car", 40),
            tx(TxKind::Expense, "Car Insurance", 400),
            tx(TxKind::Income, "Salary", 2000),
        ]
    }

    #[test]
    fn how_much_for_known_category() {
        let reply = answer("How much did I spend on FOOD?", &sample(), "₹");
        assert_eq!(reply, "You've spent ₹150.00 on Food so far.");
    }

    #[test]
    fn how_much_prefers_longest_category() {
        let reply = answer("how much on car insurance", &sample(), "$");
        assert_eq!(reply, "You've spent $400.00 on Car Insurance so far.");
    }

    #[test]
    fn biggest_category() {
        let reply = answer("What's my highest expense?", &sample(), "$");
        assert_eq!(reply, "Your biggest expense category is Car Insurance with $400.00.");
        assert_eq!(answer("biggest?", &[], "$"), "No expenses found yet.");
    }

    #[test]
    fn summary_reports_totals() {
        let reply = answer("give me a summary", &sample(), "$");
        assert_eq!(reply, "Total expenses: $590.00. Total income: $2000.00.");
    }

    #[test]
    fn unknown_question_falls_back_to_help() {
        let reply = answer("should I buy a boat", &sample(), "$");
        assert!(reply.starts_with("I can answer questions"));
        assert!(reply.contains("expenses $590.00"));
    }
}
