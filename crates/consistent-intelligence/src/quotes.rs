// ABOUTME: Daily stoic quote rotation
// ABOUTME: Picks one of a fixed set of quotes by day of year
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use chrono::{Datelike, NaiveDate};

/// Quotes shown in rotation, one per day
pub const STOIC_QUOTES: [&str; 12] = [
    "The best revenge is to be unlike him who performed the injury. - Marcus Aurelius",
    "Waste no more time arguing about what a good man should be. Be one. - Marcus Aurelius",
    "It is not death that a man should fear, but he should fear never beginning to live. - Marcus Aurelius",
    "The happiness of your life depends upon the quality of your thoughts. - Marcus Aurelius",
    "If it is not right, do not do it; if it is not true, do not say it. - Marcus Aurelius",
    "Wealth consists not in having great possessions, but in having few wants. - Epictetus",
    "First say to yourself what you would be; and then do what you have to do. - Epictetus",
    "It's not what happens to you, but how you react to it that matters. - Epictetus",
    "We suffer more often in imagination than in reality. - Seneca",
    "Luck is what happens when preparation meets opportunity. - Seneca",
    "Difficulties strengthen the mind, as labor does the body. - Seneca",
    "Begin at once to live, and count each separate day as a separate life. - Seneca",
];

/// Quote of the day, indexed by the 1-based day of year
#[must_use]
pub fn daily_quote(date: NaiveDate) -> &'static str {
    STOIC_QUOTES[date.ordinal() as usize % STOIC_QUOTES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::date;

    #[test]
    fn test_quote_rotates_by_day_of_year() {
        // Jan 1 is day 1
        assert_eq!(daily_quote(date("2024-01-01")), STOIC_QUOTES[1]);
        assert_eq!(daily_quote(date("2024-01-11")), STOIC_QUOTES[11]);
        assert_eq!(daily_quote(date("2024-01-12")), STOIC_QUOTES[0]);
        assert_eq!(daily_quote(date("2024-01-13")), STOIC_QUOTES[1]);
    }

    #[test]
    fn test_last_quote_is_reachable() {
        assert_eq!(
            daily_quote(date("2024-12-24")),
            "Begin at once to live, and count each separate day as a separate life. - Seneca"
        );
    }
}
