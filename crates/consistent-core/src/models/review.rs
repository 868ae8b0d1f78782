// ABOUTME: Review periods and coach conversation turns used by the prompt flows
// ABOUTME: Weekly reviews look back 7 days and monthly reviews 30 days, both ending today
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::limits::{MONTHLY_REVIEW_DAYS, WEEKLY_REVIEW_DAYS};

/// Window covered by an insight review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewPeriod {
    /// Today and the previous 6 days
    Weekly,
    /// Today and the previous 29 days
    Monthly,
}

impl ReviewPeriod {
    /// Number of calendar days in the window, today included
    #[must_use]
    pub const fn lookback_days(self) -> i64 {
        match self {
            Self::Weekly => WEEKLY_REVIEW_DAYS,
            Self::Monthly => MONTHLY_REVIEW_DAYS,
        }
    }

    /// Human label used in user-facing messages
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Weekly => "7 days",
            Self::Monthly => "30 days",
        }
    }

    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for ReviewPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Speaker of a coach conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The person being coached
    User,
    /// The coach
    Assistant,
}

impl ChatRole {
    /// Wire name, also used as the speaker tag in prompts
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One prior message in a coach conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Who spoke
    pub role: ChatRole,
    /// What was said
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_period_windows() {
        assert_eq!(ReviewPeriod::Weekly.lookback_days(), 7);
        assert_eq!(ReviewPeriod::Monthly.lookback_days(), 30);
        assert_eq!(ReviewPeriod::Monthly.label(), "30 days");
    }

    #[test]
    fn test_chat_turn_wire_format() {
        let turn: ChatTurn =
            serde_json::from_str(r#"{"role":"assistant","content":"Keep going"}"#).unwrap();
        assert_eq!(turn.role, ChatRole::Assistant);
        assert!(serde_json::from_str::<ChatTurn>(r#"{"role":"system","content":"x"}"#).is_err());
    }
}
