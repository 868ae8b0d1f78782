// ABOUTME: Calendar-day helpers shared by storage, HTTP parsing, and streak math
// ABOUTME: Dates travel as YYYY-MM-DD strings and weekdays are numbered from Sunday = 0
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use chrono::{Datelike, NaiveDate, Utc};

use crate::errors::{AppError, AppResult};

/// Wire and storage format for calendar days
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string
///
/// # Errors
///
/// Returns `INVALID_INPUT` naming the offending value when it is not a valid calendar day
pub fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| {
        AppError::invalid_input(format!("Invalid date '{value}', expected YYYY-MM-DD: {e}"))
    })
}

/// Format a day as `YYYY-MM-DD`
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Weekday number with Sunday = 0 through Saturday = 6
#[must_use]
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Current UTC calendar day
#[must_use]
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Resolve an optional `today` override, falling back to the UTC date
///
/// # Errors
///
/// Returns `INVALID_INPUT` if the override is present but malformed
pub fn resolve_today(override_value: Option<&str>) -> AppResult<NaiveDate> {
    override_value.map_or_else(|| Ok(utc_today()), parse_date)
}
