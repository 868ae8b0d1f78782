// ABOUTME: Read-side aggregates: dashboard cards, sidebar streaks and contribution graphs
// ABOUTME: Loads a bounded window of logs once and hands it to the intelligence crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use chrono::{Days, NaiveDate};
use consistent_core::constants::limits::{
    CONTRIBUTION_GRAPH_WEEKS, DAYS_PER_WEEK, SIDEBAR_LOG_WINDOW_DAYS,
};
use consistent_core::models::{Habit, HabitFilter, HabitLog};
use consistent_intelligence::{
    build_graph, daily_quote, frequency_label, today_progress, weekly_progress, ContributionGraph,
    DayProgress, StreakCalculator, TodayProgress,
};
use serde::Serialize;

use crate::database::Database;
use crate::errors::AppResult;

/// A habit card on the dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardHabit {
    /// The habit
    pub habit: Habit,
    /// Human-readable schedule
    pub frequency_label: String,
    /// Consecutive completed days ending today
    pub current_streak: u32,
    /// Completed today
    pub completed_today: bool,
    /// This habit's heatmap
    pub contributions: ContributionGraph,
}

/// Dashboard aggregate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// Reference day
    pub today: NaiveDate,
    /// Active habits, newest first
    pub habits: Vec<DashboardHabit>,
    /// Best strict streak across daily habits
    pub longest_current_streak: u32,
    /// Due habits completed today
    pub today_progress: TodayProgress,
}

/// A habit row in the sidebar
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarHabit {
    /// Habit id
    pub id: String,
    /// Habit name
    pub name: String,
    /// Streak with a grace day for today
    pub current_streak: u32,
    /// Completed today
    pub completed_today: bool,
}

/// Sidebar aggregate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sidebar {
    /// Reference day
    pub today: NaiveDate,
    /// Active habits with streaks
    pub habits: Vec<SidebarHabit>,
    /// Last seven days, oldest first
    pub weekly_progress: Vec<DayProgress>,
    /// Quote of the day
    pub quote: &'static str,
}

fn days_before(today: NaiveDate, days: i64) -> NaiveDate {
    let days = u64::try_from(days).unwrap_or(0);
    today.checked_sub_days(Days::new(days)).unwrap_or(today)
}

/// First day whose logs can appear in a contribution graph for `today`
#[must_use]
pub fn graph_window_start(today: NaiveDate) -> NaiveDate {
    days_before(today, CONTRIBUTION_GRAPH_WEEKS * DAYS_PER_WEEK)
}

fn completed_on(logs: &[HabitLog], habit_id: &str, day: NaiveDate) -> bool {
    logs.iter()
        .any(|log| log.habit_id == habit_id && log.date == day && log.completed)
}

fn logs_for(logs: &[HabitLog], habit_id: &str) -> Vec<HabitLog> {
    logs.iter()
        .filter(|log| log.habit_id == habit_id)
        .cloned()
        .collect()
}

/// Build the dashboard for `today`
///
/// # Errors
///
/// Returns a database error if habits or logs cannot be loaded
pub async fn dashboard(db: &Database, user_id: &str, today: NaiveDate) -> AppResult<Dashboard> {
    let habits = db.habits().list(user_id, HabitFilter::Active).await?;
    let logs = db.logs().list_since(user_id, graph_window_start(today)).await?;

    let cards = habits
        .iter()
        .map(|habit| {
            let own_logs = logs_for(&logs, &habit.id);
            DashboardHabit {
                frequency_label: frequency_label(habit),
                current_streak: StreakCalculator::strict_streak(&habit.id, &own_logs, today),
                completed_today: completed_on(&own_logs, &habit.id, today),
                contributions: build_graph(&own_logs, today),
                habit: habit.clone(),
            }
        })
        .collect();

    Ok(Dashboard {
        today,
        longest_current_streak: StreakCalculator::longest_current_streak(&habits, &logs, today),
        today_progress: today_progress(&habits, &logs, today),
        habits: cards,
    })
}

/// Build the sidebar for `today`
///
/// # Errors
///
/// Returns a database error if habits or logs cannot be loaded
pub async fn sidebar(db: &Database, user_id: &str, today: NaiveDate) -> AppResult<Sidebar> {
    let habits = db.habits().list(user_id, HabitFilter::Active).await?;
    let logs = db
        .logs()
        .list_since(user_id, days_before(today, SIDEBAR_LOG_WINDOW_DAYS))
        .await?;

    let rows = habits
        .iter()
        .map(|habit| SidebarHabit {
            id: habit.id.clone(),
            name: habit.name.clone(),
            current_streak: StreakCalculator::current_streak(habit, &logs, today),
            completed_today: completed_on(&logs, &habit.id, today),
        })
        .collect();

    Ok(Sidebar {
        today,
        habits: rows,
        weekly_progress: weekly_progress(&habits, &logs, today),
        quote: daily_quote(today),
    })
}

/// Build the aggregate graph over active habits, or one habit's graph
///
/// # Errors
///
/// Returns `RESOURCE_NOT_FOUND` when `habit_id` is not one of the user's habits
pub async fn contributions(
    db: &Database,
    user_id: &str,
    habit_id: Option<&str>,
    today: NaiveDate,
) -> AppResult<ContributionGraph> {
    let logs = db.logs().list_since(user_id, graph_window_start(today)).await?;

    let selected: Vec<HabitLog> = match habit_id {
        Some(habit_id) => {
            let habit = db.habits().get(user_id, habit_id).await?;
            logs_for(&logs, &habit.id)
        }
        None => {
            let active = db.habits().list(user_id, HabitFilter::Active).await?;
            logs.into_iter()
                .filter(|log| active.iter().any(|habit| habit.id == log.habit_id))
                .collect()
        }
    };

    Ok(build_graph(&selected, today))
}
