//! Aggregate statistics shown on domain pages.
//!
//! # Invariants
//! - Percentages are rounded to one decimal and are 0 for an empty total.
//! - "Week" windows are the trailing 7×24h before `now`; "today" is the
//!   local calendar day of `now`.

use crate::model::entry::Entry;
use crate::model::project::{Project, Task};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Mood emoji scale used by journal entries, best first.
pub const MOOD_SCALE: &[(&str, u8)] = &[("😄", 5), ("😊", 4), ("😐", 3), ("😟", 2), ("😢", 1)];

const NEUTRAL_MOOD_SCORE: u8 = 3;
const UNCATEGORIZED: &str = "Uncategorized";

/// Rounds to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `completed / total × 100` rounded to one decimal; 0 when `total` is 0.
pub fn completion_percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round1(completed as f64 / total as f64 * 100.0)
}

/// Score of a mood label. Labels may carry text after the emoji
/// (`"😊 Happy"`); unknown labels score as neutral.
pub fn mood_score(mood: &str) -> u8 {
    let trimmed = mood.trim();
    MOOD_SCALE
        .iter()
        .find(|(emoji, _)| trimmed.starts_with(emoji))
        .map_or(NEUTRAL_MOOD_SCORE, |(_, score)| *score)
}

/// Emoji whose score is nearest to `average`. Ties resolve to the happier one.
pub fn mood_emoji_for(average: f64) -> &'static str {
    MOOD_SCALE
        .iter()
        .min_by(|(_, left), (_, right)| {
            let left = (f64::from(*left) - average).abs();
            let right = (f64::from(*right) - average).abs();
            left.total_cmp(&right)
        })
        .map_or("😐", |(emoji, _)| *emoji)
}

/// Whitespace-separated word count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

fn local_today(now: DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    now.with_timezone(offset).date_naive()
}

fn is_today(entry: &Entry, today: NaiveDate, offset: &FixedOffset) -> bool {
    entry.local_date(offset) == today
}

/// Occurrence counts of one category label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KindCounts {
    pub today: usize,
    pub week: usize,
    pub total: usize,
}

pub fn kind_counts(
    entries: &[Entry],
    kind: &str,
    now: DateTime<Utc>,
    offset: &FixedOffset,
) -> KindCounts {
    let today = local_today(now, offset);
    let week_start = now - Duration::days(7);
    let matching: Vec<&Entry> = entries.iter().filter(|entry| entry.kind == kind).collect();

    KindCounts {
        today: matching
            .iter()
            .filter(|entry| is_today(entry, today, offset))
            .count(),
        week: matching
            .iter()
            .filter(|entry| entry.recorded_at >= week_start)
            .count(),
        total: matching.len(),
    }
}

/// Summed counts for today, this week and the week before.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodTotals {
    pub today: f64,
    pub this_week: f64,
    pub last_week: f64,
    /// Percent reduction from last week to this week; 0 when last week is 0.
    pub improvement: f64,
}

/// Week-over-week totals of `amount` (addiction counts).
pub fn period_totals(entries: &[Entry], now: DateTime<Utc>, offset: &FixedOffset) -> PeriodTotals {
    let today = local_today(now, offset);
    let this_week_start = now - Duration::days(7);
    let last_week_start = now - Duration::days(14);
    let amount = |entry: &Entry| entry.amount.unwrap_or(0.0);

    let today_total = entries
        .iter()
        .filter(|entry| is_today(entry, today, offset))
        .map(amount)
        .sum();
    let this_week: f64 = entries
        .iter()
        .filter(|entry| entry.recorded_at >= this_week_start)
        .map(amount)
        .sum();
    let last_week: f64 = entries
        .iter()
        .filter(|entry| {
            entry.recorded_at >= last_week_start && entry.recorded_at < this_week_start
        })
        .map(amount)
        .sum();

    let improvement = if last_week > 0.0 {
        round1((last_week - this_week) / last_week * 100.0)
    } else {
        0.0
    };

    PeriodTotals {
        today: today_total,
        this_week,
        last_week,
        improvement,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompletionRate {
    pub completed: usize,
    pub total: usize,
    pub rate: f64,
}

impl CompletionRate {
    fn of<'a>(entries: impl Iterator<Item = &'a Entry>) -> Self {
        let mut completed = 0;
        let mut total = 0;
        for entry in entries {
            total += 1;
            if entry.completed == Some(true) {
                completed += 1;
            }
        }
        Self {
            completed,
            total,
            rate: completion_percentage(completed, total),
        }
    }
}

/// Ritual completion for today, the trailing week and all time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompletionStats {
    pub today: CompletionRate,
    pub week: CompletionRate,
    pub overall: CompletionRate,
}

pub fn completion_stats(
    entries: &[Entry],
    now: DateTime<Utc>,
    offset: &FixedOffset,
) -> CompletionStats {
    let today = local_today(now, offset);
    let week_start = now - Duration::days(7);

    CompletionStats {
        today: CompletionRate::of(
            entries
                .iter()
                .filter(|entry| is_today(entry, today, offset)),
        ),
        week: CompletionRate::of(
            entries
                .iter()
                .filter(|entry| entry.recorded_at >= week_start),
        ),
        overall: CompletionRate::of(entries.iter()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinanceTotals {
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    /// `income - expenses`.
    pub balance: f64,
}

pub fn finance_totals(entries: &[Entry]) -> FinanceTotals {
    let sum_of = |kind: &str| -> f64 {
        entries
            .iter()
            .filter(|entry| entry.kind == kind)
            .filter_map(|entry| entry.amount)
            .sum()
    };
    let income = sum_of("Income");
    let expenses = sum_of("Expense");
    FinanceTotals {
        income,
        expenses,
        savings: sum_of("Savings"),
        balance: income - expenses,
    }
}

/// Sum of `amount` per spending category.
pub fn category_totals(entries: &[Entry]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for entry in entries {
        let category = entry
            .category
            .as_deref()
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .unwrap_or(UNCATEGORIZED);
        *totals.entry(category.to_string()).or_insert(0.0) += entry.amount.unwrap_or(0.0);
    }
    totals
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalStats {
    pub today: usize,
    pub week: usize,
    pub month: usize,
    pub total: usize,
    /// Mean mood score over entries carrying a mood, one decimal; 0 if none.
    pub average_mood: f64,
    pub average_mood_emoji: &'static str,
}

pub fn journal_stats(entries: &[Entry], now: DateTime<Utc>, offset: &FixedOffset) -> JournalStats {
    let today = local_today(now, offset);
    let week_start = now - Duration::days(7);
    let month_start = now - Duration::days(30);

    let scores: Vec<f64> = entries
        .iter()
        .filter_map(|entry| entry.mood.as_deref())
        .filter(|mood| !mood.trim().is_empty())
        .map(|mood| f64::from(mood_score(mood)))
        .collect();
    let average = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };

    JournalStats {
        today: entries
            .iter()
            .filter(|entry| is_today(entry, today, offset))
            .count(),
        week: entries
            .iter()
            .filter(|entry| entry.recorded_at >= week_start)
            .count(),
        month: entries
            .iter()
            .filter(|entry| entry.recorded_at >= month_start)
            .count(),
        total: entries.len(),
        average_mood: round1(average),
        average_mood_emoji: if scores.is_empty() {
            "😐"
        } else {
            mood_emoji_for(average)
        },
    }
}

/// One timestamped numeric reading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericPoint {
    pub recorded_at: DateTime<Utc>,
    pub value: f64,
}

/// Chronological readings of one label, e.g. the weight trend.
///
/// Entries without an `amount` fall back to parsing `value`; unparseable
/// ones are skipped.
pub fn numeric_series(entries: &[Entry], kind: &str) -> Vec<NumericPoint> {
    let mut points: Vec<NumericPoint> = entries
        .iter()
        .filter(|entry| entry.kind == kind)
        .filter_map(|entry| {
            let value = entry.amount.or_else(|| {
                entry
                    .value
                    .as_deref()
                    .and_then(|text| text.trim().parse::<f64>().ok())
            })?;
            value.is_finite().then(|| NumericPoint {
                recorded_at: entry.recorded_at,
                value,
            })
        })
        .collect();
    points.sort_by_key(|point| point.recorded_at);
    points
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectProgress {
    pub total: usize,
    pub completed: usize,
    pub percentage: f64,
}

impl ProjectProgress {
    /// Done means at least one task and every task completed.
    pub fn is_done(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Progress over one project's tasks.
pub fn project_progress(tasks: &[Task]) -> ProjectProgress {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    ProjectProgress {
        total,
        completed,
        percentage: completion_percentage(completed, total),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortfolioStats {
    pub total_projects: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub completed_projects: usize,
    pub overall_progress: f64,
}

pub fn portfolio_stats(projects: &[Project], tasks: &[Task]) -> PortfolioStats {
    let completed_tasks = tasks.iter().filter(|task| task.completed).count();
    let completed_projects = projects
        .iter()
        .filter(|project| {
            let owned: Vec<Task> = tasks
                .iter()
                .filter(|task| task.project_id == project.id)
                .cloned()
                .collect();
            project_progress(&owned).is_done()
        })
        .count();

    PortfolioStats {
        total_projects: projects.len(),
        total_tasks: tasks.len(),
        completed_tasks,
        completed_projects,
        overall_progress: completion_percentage(completed_tasks, tasks.len()),
    }
}
