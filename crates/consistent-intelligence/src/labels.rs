// ABOUTME: Human-readable frequency labels for habit cards
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use consistent_core::models::{Habit, HabitFrequency, WEEKDAY_SHORT_NAMES};

/// Label such as `Daily`, `Mon, Wed, Fri` or `Daily (Weekly Target)`
#[must_use]
pub fn frequency_label(habit: &Habit) -> String {
    match habit.frequency {
        HabitFrequency::Daily => "Daily".to_owned(),
        HabitFrequency::Weekly if habit.target_days.is_empty() => "Weekly".to_owned(),
        HabitFrequency::Weekly if habit.target_days.len() == WEEKDAY_SHORT_NAMES.len() => {
            "Daily (Weekly Target)".to_owned()
        }
        HabitFrequency::Weekly => {
            let mut days = habit.target_days.clone();
            days.sort_unstable();
            days.iter()
                .filter_map(|day| WEEKDAY_SHORT_NAMES.get(usize::from(*day)).copied())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{daily_habit, weekly_habit};

    #[test]
    fn test_frequency_labels() {
        assert_eq!(frequency_label(&daily_habit("d")), "Daily");
        assert_eq!(frequency_label(&weekly_habit("w", &[])), "Weekly");
        assert_eq!(frequency_label(&weekly_habit("w", &[5, 1, 3])), "Mon, Wed, Fri");
        assert_eq!(
            frequency_label(&weekly_habit("w", &[0, 1, 2, 3, 4, 5, 6])),
            "Daily (Weekly Target)"
        );
    }
}
