// ABOUTME: Habit and habit-log models with draft validation
// ABOUTME: Enforces name/description lengths and the 0..=6 weekday range for target days
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::limits::{
    HABIT_DESCRIPTION_MAX_CHARS, HABIT_NAME_MAX_CHARS, HABIT_NAME_MIN_CHARS, MAX_WEEKDAY,
};
use crate::errors::{AppError, AppResult};

/// Short weekday names indexed from Sunday
pub const WEEKDAY_SHORT_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Single-letter weekday names indexed from Sunday
pub const WEEKDAY_NARROW_NAMES: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

/// How often a habit is expected to be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitFrequency {
    /// Every day
    Daily,
    /// On the habit's target weekdays
    Weekly,
}

impl HabitFrequency {
    /// Storage representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl fmt::Display for HabitFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitFrequency {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            other => Err(AppError::invalid_input(format!(
                "Unknown habit frequency '{other}', expected 'daily' or 'weekly'"
            ))),
        }
    }
}

/// A recurring user-defined behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    /// Habit ID (UUID v4)
    pub id: String,
    /// Owning user
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Free-form description, empty when not provided
    pub description: String,
    /// Daily or weekly
    pub frequency: HabitFrequency,
    /// Weekday numbers (0 = Sunday) the habit is due on, sorted ascending
    pub target_days: Vec<u8>,
    /// Hidden from active views when true
    pub archived: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Whether the habit counts toward daily streaks
    #[must_use]
    pub fn is_daily(&self) -> bool {
        self.frequency == HabitFrequency::Daily
    }
}

/// Per-date completion record for a habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitLog {
    /// Log ID (UUID v4)
    pub id: String,
    /// Habit this log belongs to
    pub habit_id: String,
    /// Owning user
    pub user_id: String,
    /// Calendar day
    pub date: NaiveDate,
    /// Whether the habit was done that day
    pub completed: bool,
    /// Optional note
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Unvalidated habit fields as submitted by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitDraft {
    /// Display name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Daily or weekly
    pub frequency: HabitFrequency,
    /// Optional target weekdays
    #[serde(default)]
    pub target_days: Option<Vec<i64>>,
}

/// Habit fields that passed validation and are ready to persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedHabit {
    /// Trimmed display name
    pub name: String,
    /// Description, `""` when absent
    pub description: String,
    /// Daily or weekly
    pub frequency: HabitFrequency,
    /// Sorted, deduplicated weekday numbers
    pub target_days: Vec<u8>,
}

impl HabitDraft {
    /// Validate lengths and weekday ranges
    ///
    /// # Errors
    ///
    /// Returns `INVALID_INPUT` describing the first violated rule
    pub fn validate(self) -> AppResult<ValidatedHabit> {
        let name = self.name.trim().to_owned();
        let name_len = name.chars().count();
        if !(HABIT_NAME_MIN_CHARS..=HABIT_NAME_MAX_CHARS).contains(&name_len) {
            return Err(AppError::invalid_input(format!(
                "Habit name must be between {HABIT_NAME_MIN_CHARS} and {HABIT_NAME_MAX_CHARS} characters"
            )));
        }

        let description = self.description.unwrap_or_default();
        if description.chars().count() > HABIT_DESCRIPTION_MAX_CHARS {
            return Err(AppError::invalid_input(format!(
                "Habit description must be at most {HABIT_DESCRIPTION_MAX_CHARS} characters"
            )));
        }

        let mut target_days = self
            .target_days
            .unwrap_or_default()
            .into_iter()
            .map(|day| {
                u8::try_from(day)
                    .ok()
                    .filter(|d| *d <= MAX_WEEKDAY)
                    .ok_or_else(|| {
                        AppError::invalid_input(format!(
                            "Target day {day} is out of range (0 = Sunday .. 6 = Saturday)"
                        ))
                    })
            })
            .collect::<AppResult<Vec<u8>>>()?;
        target_days.sort_unstable();
        target_days.dedup();

        Ok(ValidatedHabit {
            name,
            description,
            frequency: self.frequency,
            target_days,
        })
    }
}

/// Which habits a listing should include
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitFilter {
    /// Not archived
    #[default]
    Active,
    /// Archived only
    Archived,
    /// Everything
    All,
}

/// Encode target days for storage as a compact comma list (`"1,3,5"`)
#[must_use]
pub fn encode_target_days(days: &[u8]) -> String {
    days.iter()
        .map(u8::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Decode target days stored by [`encode_target_days`]
///
/// # Errors
///
/// Returns an internal error if the stored value is corrupt
pub fn decode_target_days(raw: &str) -> AppResult<Vec<u8>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u8>()
                .ok()
                .filter(|d| *d <= MAX_WEEKDAY)
                .ok_or_else(|| AppError::internal(format!("Corrupt target day value '{part}'")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    fn draft(name: &str) -> HabitDraft {
        HabitDraft {
            name: name.to_owned(),
            description: None,
            frequency: HabitFrequency::Weekly,
            target_days: Some(vec![5, 1, 3, 1]),
        }
    }

    #[test]
    fn test_validate_defaults_and_sorts() {
        let valid = draft("  Read  ").validate().unwrap();
        assert_eq!(valid.name, "Read");
        assert_eq!(valid.description, "");
        assert_eq!(valid.target_days, vec![1, 3, 5]);
    }

    #[test]
    fn test_validate_name_bounds() {
        assert_eq!(draft("R").validate().unwrap_err().code, ErrorCode::InvalidInput);
        assert!(draft(&"x".repeat(50)).validate().is_ok());
        assert!(draft(&"x".repeat(51)).validate().is_err());
    }

    #[test]
    fn test_validate_description_and_days() {
        let mut long = draft("Run");
        long.description = Some("d".repeat(201));
        assert!(long.validate().is_err());

        let mut bad_day = draft("Run");
        bad_day.target_days = Some(vec![7]);
        assert!(bad_day.validate().unwrap_err().message.contains("out of range"));

        let mut negative = draft("Run");
        negative.target_days = Some(vec![-1]);
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_target_day_storage_format() {
        assert_eq!(encode_target_days(&[0, 2, 6]), "0,2,6");
        assert_eq!(decode_target_days("0,2,6").unwrap(), vec![0, 2, 6]);
        assert!(decode_target_days("").unwrap().is_empty());
        assert!(decode_target_days("9").is_err());
    }

    #[test]
    fn test_frequency_parse() {
        assert_eq!("Daily".parse::<HabitFrequency>().unwrap(), HabitFrequency::Daily);
        assert!("monthly".parse::<HabitFrequency>().is_err());
        let json = serde_json::to_string(&HabitFrequency::Weekly).unwrap();
        assert_eq!(json, "\"weekly\"");
    }
}
