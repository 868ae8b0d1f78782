// ABOUTME: Streak calculation for daily habits
// ABOUTME: Grace-day streaks for the sidebar and strict streaks ending today for the dashboard
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use consistent_core::models::{Habit, HabitLog};

/// Streak calculator over a user's habit logs
pub struct StreakCalculator;

impl StreakCalculator {
    /// Current streak with a one-day grace period.
    ///
    /// Counts consecutive completed days backwards from `today`. When today has no
    /// completed log yet, counting starts from yesterday instead, so a streak is not
    /// shown as broken before the day is over. Weekly habits always return 0.
    #[must_use]
    pub fn current_streak(habit: &Habit, logs: &[HabitLog], today: NaiveDate) -> u32 {
        if !habit.is_daily() {
            return 0;
        }

        let completed = completed_dates(&habit.id, logs);
        if completed.is_empty() {
            return 0;
        }

        let start = if completed.contains(&today) {
            Some(today)
        } else {
            today.checked_sub_days(Days::new(1))
        };

        start.map_or(0, |day| count_back(&completed, day))
    }

    /// Consecutive completed days ending exactly at `today`, without grace
    #[must_use]
    pub fn strict_streak(habit_id: &str, logs: &[HabitLog], today: NaiveDate) -> u32 {
        count_back(&completed_dates(habit_id, logs), today)
    }

    /// Longest strict streak among the daily habits, 0 when there are none
    #[must_use]
    pub fn longest_current_streak(habits: &[Habit], logs: &[HabitLog], today: NaiveDate) -> u32 {
        habits
            .iter()
            .filter(|habit| habit.is_daily())
            .map(|habit| Self::strict_streak(&habit.id, logs, today))
            .max()
            .unwrap_or(0)
    }
}

fn completed_dates(habit_id: &str, logs: &[HabitLog]) -> HashSet<NaiveDate> {
    logs.iter()
        .filter(|log| log.completed && log.habit_id == habit_id)
        .map(|log| log.date)
        .collect()
}

fn count_back(completed: &HashSet<NaiveDate>, start: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = Some(start);
    while let Some(current) = day.filter(|d| completed.contains(d)) {
        streak += 1;
        day = current.checked_sub_days(Days::new(1));
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{daily_habit, date, log, weekly_habit};

    #[test]
    fn test_streak_counts_back_from_today() {
        let habit = daily_habit("h1");
        let logs = vec![
            log("h1", "2024-06-10", true),
            log("h1", "2024-06-09", true),
            log("h1", "2024-06-08", true),
            log("h1", "2024-06-06", true),
        ];
        assert_eq!(
            StreakCalculator::current_streak(&habit, &logs, date("2024-06-10")),
            3
        );
    }

    #[test]
    fn test_grace_day_counts_from_yesterday() {
        let habit = daily_habit("h1");
        let logs = vec![log("h1", "2024-06-09", true), log("h1", "2024-06-08", true)];
        let today = date("2024-06-10");

        assert_eq!(StreakCalculator::current_streak(&habit, &logs, today), 2);
        assert_eq!(StreakCalculator::strict_streak("h1", &logs, today), 0);
    }

    #[test]
    fn test_gap_of_two_days_breaks_streak() {
        let habit = daily_habit("h1");
        let logs = vec![log("h1", "2024-06-08", true)];
        assert_eq!(
            StreakCalculator::current_streak(&habit, &logs, date("2024-06-10")),
            0
        );
    }

    #[test]
    fn test_uncompleted_logs_and_other_habits_ignored() {
        let habit = daily_habit("h1");
        let logs = vec![
            log("h1", "2024-06-10", false),
            log("h2", "2024-06-10", true),
            log("h1", "2024-06-09", true),
        ];
        assert_eq!(
            StreakCalculator::current_streak(&habit, &logs, date("2024-06-10")),
            1
        );
    }

    #[test]
    fn test_weekly_habits_have_no_streak() {
        let habit = weekly_habit("w1", &[1, 3]);
        let logs = vec![log("w1", "2024-06-10", true)];
        assert_eq!(
            StreakCalculator::current_streak(&habit, &logs, date("2024-06-10")),
            0
        );
    }

    #[test]
    fn test_longest_current_streak_takes_max_of_daily_habits() {
        let habits = vec![daily_habit("a"), daily_habit("b"), weekly_habit("w", &[])];
        let logs = vec![
            log("a", "2024-06-10", true),
            log("b", "2024-06-10", true),
            log("b", "2024-06-09", true),
            log("w", "2024-06-10", true),
            log("w", "2024-06-09", true),
            log("w", "2024-06-08", true),
        ];
        assert_eq!(
            StreakCalculator::longest_current_streak(&habits, &logs, date("2024-06-10")),
            2
        );
        assert_eq!(
            StreakCalculator::longest_current_streak(&[], &logs, date("2024-06-10")),
            0
        );
    }
}
