// ABOUTME: GitHub-style contribution graph layout for habit completions
// ABOUTME: Buckets completed logs per day into a 53-week Sunday-first grid with month labels
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 git-consistent contributors

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, Days, NaiveDate};
use consistent_core::constants::limits::{
    CONTRIBUTION_GRAPH_WEEKS, CONTRIBUTION_MAX_LEVEL, DAYS_PER_WEEK, MAX_WEEKDAY,
    MONTH_LABEL_MIN_COLUMN_GAP,
};
use consistent_core::dates::weekday_index;
use consistent_core::models::HabitLog;
use serde::{Deserialize, Serialize};

const DAYS_IN_WEEK: usize = DAYS_PER_WEEK as usize;

/// One cell of the contribution graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionDay {
    /// Calendar day
    pub date: NaiveDate,
    /// Completed logs on this day
    pub count: u32,
    /// Color intensity 0..=4
    pub level: u8,
}

/// Month name placed above a graph column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthLabel {
    /// Short month name, e.g. `Jan`
    pub label: String,
    /// Zero-based week column
    pub column: usize,
}

/// Calendar heatmap covering 53 weeks that end on the Saturday of the current week
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionGraph {
    /// First cell (always a Sunday)
    pub start: NaiveDate,
    /// Last cell (always a Saturday)
    pub end: NaiveDate,
    /// Columns of seven days, Sunday first
    pub weeks: Vec<[ContributionDay; DAYS_IN_WEEK]>,
    /// Labels for the columns where a month begins
    pub month_labels: Vec<MonthLabel>,
    /// Completed logs inside the grid window
    pub total_completions: u32,
}

impl ContributionGraph {
    /// Iterate cells in date order
    pub fn days(&self) -> impl Iterator<Item = &ContributionDay> {
        self.weeks.iter().flatten()
    }
}

/// Lay out the graph for `today` from the given logs.
///
/// Only completed logs inside the grid window are counted. Days after `today`
/// keep their count but always render at level 0.
#[must_use]
pub fn build_graph(logs: &[HabitLog], today: NaiveDate) -> ContributionGraph {
    let days_to_saturday = u64::from(MAX_WEEKDAY - weekday_index(today));
    let end = today
        .checked_add_days(Days::new(days_to_saturday))
        .unwrap_or(today);
    let span = (CONTRIBUTION_GRAPH_WEEKS * DAYS_PER_WEEK - 1) as u64;
    let start = end.checked_sub_days(Days::new(span)).unwrap_or(end);

    let mut counts: HashMap<NaiveDate, u32> = HashMap::new();
    for log in logs
        .iter()
        .filter(|log| log.completed && log.date >= start && log.date <= end)
    {
        *counts.entry(log.date).or_default() += 1;
    }

    let cells: Vec<ContributionDay> = start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|date| {
            let count = counts.get(&date).copied().unwrap_or(0);
            ContributionDay {
                date,
                count,
                level: level_for_count(count, date > today),
            }
        })
        .collect();

    let month_labels = month_labels(&cells);
    let total_completions = counts.values().sum();
    let weeks = cells
        .chunks_exact(DAYS_IN_WEEK)
        .filter_map(|week| <[ContributionDay; DAYS_IN_WEEK]>::try_from(week).ok())
        .collect();

    ContributionGraph {
        start,
        end,
        weeks,
        month_labels,
        total_completions,
    }
}

/// Intensity for a day's completion count; future days are always 0
#[must_use]
pub fn level_for_count(count: u32, is_future: bool) -> u8 {
    if is_future {
        return 0;
    }
    u8::try_from(count).map_or(CONTRIBUTION_MAX_LEVEL, |c| c.min(CONTRIBUTION_MAX_LEVEL))
}

/// A month is labeled at the first column holding one of its first seven days,
/// provided that column sits at least three columns after the previous label.
fn month_labels(cells: &[ContributionDay]) -> Vec<MonthLabel> {
    let mut labels = Vec::new();
    let mut labeled_months = HashSet::new();
    let mut last_column: Option<usize> = None;

    for (index, cell) in cells.iter().enumerate() {
        let year_month = (cell.date.year(), cell.date.month());
        if cell.date.day() > 7 || labeled_months.contains(&year_month) {
            continue;
        }
        let column = index / DAYS_IN_WEEK;
        if last_column.is_some_and(|last| column < last + MONTH_LABEL_MIN_COLUMN_GAP) {
            continue;
        }
        labels.push(MonthLabel {
            label: cell.date.format("%b").to_string(),
            column,
        });
        last_column = Some(column);
        labeled_months.insert(year_month);
    }

    labels
}
