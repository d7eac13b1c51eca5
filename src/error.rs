// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

/// Failures raised by the storage and command layers.
///
/// The budget calculation itself never fails; bad records are skipped or
/// coerced there instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{entity} {id} not found for user '{user}'")]
    NotFound {
        entity: &'static str,
        id: i64,
        user: String,
    },

    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
