// ABOUTME: Daily and weekly completion progress across a user's active habits
// ABOUTME: Weekly habits only count on their target weekdays; daily habits count every day
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use consistent_core::constants::limits::WEEKLY_PROGRESS_DAYS;
use consistent_core::dates::weekday_index;
use consistent_core::models::{Habit, HabitFrequency, HabitLog, WEEKDAY_NARROW_NAMES};
use serde::{Deserialize, Serialize};

/// Completion totals for one day of the weekly chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayProgress {
    /// Calendar day
    pub date: NaiveDate,
    /// Narrow weekday name (`S`, `M`, `T`, ...)
    pub day: String,
    /// Due habits completed that day
    pub completed: u32,
    /// Habits due that day
    pub total_applicable: u32,
}

/// Completion summary for today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayProgress {
    /// Due habits completed today
    pub completed: u32,
    /// Habits due today
    pub total: u32,
    /// Rounded completion percentage, 0 when nothing is due
    pub percentage: u32,
}

/// Whether `habit` is expected on `date`
#[must_use]
pub fn is_due(habit: &Habit, date: NaiveDate) -> bool {
    match habit.frequency {
        HabitFrequency::Daily => true,
        HabitFrequency::Weekly => habit.target_days.contains(&weekday_index(date)),
    }
}

/// Set of `(habit_id, date)` pairs that have a completed log
fn completions(logs: &[HabitLog]) -> HashSet<(&str, NaiveDate)> {
    logs.iter()
        .filter(|log| log.completed)
        .map(|log| (log.habit_id.as_str(), log.date))
        .collect()
}

fn tally(
    habits: &[Habit],
    done: &HashSet<(&str, NaiveDate)>,
    date: NaiveDate,
) -> (u32, u32) {
    habits
        .iter()
        .filter(|habit| is_due(habit, date))
        .fold((0, 0), |(completed, total), habit| {
            let hit = u32::from(done.contains(&(habit.id.as_str(), date)));
            (completed + hit, total + 1)
        })
}

/// Progress for the last seven days, oldest first, ending with `today`
#[must_use]
pub fn weekly_progress(habits: &[Habit], logs: &[HabitLog], today: NaiveDate) -> Vec<DayProgress> {
    let done = completions(logs);
    (0..WEEKLY_PROGRESS_DAYS as u64)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| {
            let (completed, total_applicable) = tally(habits, &done, date);
            DayProgress {
                date,
                day: WEEKDAY_NARROW_NAMES[usize::from(weekday_index(date))].to_owned(),
                completed,
                total_applicable,
            }
        })
        .collect()
}

/// Share of today's due habits that are completed
#[must_use]
pub fn today_progress(habits: &[Habit], logs: &[HabitLog], today: NaiveDate) -> TodayProgress {
    let (completed, total) = tally(habits, &completions(logs), today);
    let percentage = if total == 0 {
        0
    } else {
        (f64::from(completed) / f64::from(total) * 100.0).round() as u32
    };
    TodayProgress {
        completed,
        total,
        percentage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{daily_habit, date, log, weekly_habit};

    #[test]
    fn test_is_due_uses_target_days() {
        // 2024-06-10 is a Monday
        let monday = date("2024-06-10");
        assert!(is_due(&daily_habit("d"), monday));
        assert!(is_due(&weekly_habit("w", &[1, 3]), monday));
        assert!(!is_due(&weekly_habit("w", &[0, 6]), monday));
        assert!(!is_due(&weekly_habit("w", &[]), monday));
    }

    #[test]
    fn test_weekly_progress_window() {
        let habits = vec![daily_habit("d"), weekly_habit("w", &[1])];
        let logs = vec![
            log("d", "2024-06-10", true),
            log("w", "2024-06-10", true),
            log("d", "2024-06-04", true),
            log("d", "2024-06-03", true),
        ];
        let week = weekly_progress(&habits, &logs, date("2024-06-10"));

        assert_eq!(week.len(), 7);
        assert_eq!(week[0].date, date("2024-06-04"));
        assert_eq!(week[0].day, "T");
        assert_eq!(week[0].completed, 1);
        assert_eq!(week[0].total_applicable, 1);
        assert_eq!(week[6].date, date("2024-06-10"));
        assert_eq!(week[6].day, "M");
        assert_eq!(week[6].completed, 2);
        assert_eq!(week[6].total_applicable, 2);
    }

    #[test]
    fn test_today_progress_rounds() {
        let habits = vec![daily_habit("a"), daily_habit("b"), daily_habit("c")];
        let logs = vec![log("a", "2024-06-10", true), log("b", "2024-06-10", false)];
        let progress = today_progress(&habits, &logs, date("2024-06-10"));
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.percentage, 33);
    }

    #[test]
    fn test_today_progress_with_nothing_due() {
        let habits = vec![weekly_habit("w", &[0])];
        let progress = today_progress(&habits, &[], date("2024-06-10"));
        assert_eq!(progress.total, 0);
        assert_eq!(progress.percentage, 0);
    }

    #[test]
    fn test_completed_log_on_non_target_day_not_counted() {
        let habits = vec![weekly_habit("w", &[3])];
        let logs = vec![log("w", "2024-06-10", true)];
        let progress = today_progress(&habits, &logs, date("2024-06-10"));
        assert_eq!(progress, TodayProgress { completed: 0, total: 0, percentage: 0 });
    }
}
