// ABOUTME: Fixture builders shared by the unit tests in this crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

#![allow(clippy::unwrap_used)]

use chrono::{NaiveDate, TimeZone, Utc};
use consistent_core::dates::parse_date;
use consistent_core::models::{Habit, HabitFrequency, HabitLog};

pub fn date(value: &str) -> NaiveDate {
    parse_date(value).unwrap()
}

fn habit(id: &str, frequency: HabitFrequency, target_days: &[u8]) -> Habit {
    Habit {
        id: id.to_owned(),
        user_id: "user-1".to_owned(),
        name: format!("Habit {id}"),
        description: String::new(),
        frequency,
        target_days: target_days.to_vec(),
        archived: false,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}

pub fn daily_habit(id: &str) -> Habit {
    habit(id, HabitFrequency::Daily, &[])
}

pub fn weekly_habit(id: &str, target_days: &[u8]) -> Habit {
    habit(id, HabitFrequency::Weekly, target_days)
}

pub fn log(habit_id: &str, day: &str, completed: bool) -> HabitLog {
    HabitLog {
        id: format!("{habit_id}-{day}"),
        habit_id: habit_id.to_owned(),
        user_id: "user-1".to_owned(),
        date: date(day),
        completed,
        notes: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
    }
}
