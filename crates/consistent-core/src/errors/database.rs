// ABOUTME: Conversion from sqlx errors into AppError
// ABOUTME: Maps missing rows and unique violations onto specific error codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use sqlx::Error as SqlxError;

use super::{AppError, ErrorCode};

impl From<SqlxError> for AppError {
    fn from(error: SqlxError) -> Self {
        let mapped = match &error {
            SqlxError::RowNotFound => Self::new(ErrorCode::ResourceNotFound, "Record not found"),
            SqlxError::Database(db_error) if db_error.is_unique_violation() => Self::new(
                ErrorCode::ResourceAlreadyExists,
                format!("Duplicate record: {}", db_error.message()),
            ),
            _ => Self::database(error.to_string()),
        };
        mapped.with_source(error)
    }
}
