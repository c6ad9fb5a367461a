//! Day-bucketed chart series over trailing windows.
//!
//! # Invariants
//! - A window of N days always yields exactly N points, oldest first, the
//!   last point being `today`.
//! - Days without matching entries yield zero-valued points.

use crate::model::entry::Entry;
use chrono::{Days, FixedOffset, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use super::summary::{completion_percentage, mood_score};

/// Trailing range of calendar days used for charting. Always at least one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DayWindow(usize);

impl DayWindow {
    pub const WEEK: Self = Self(7);
    pub const FORTNIGHT: Self = Self(14);
    pub const MONTH: Self = Self(30);

    pub fn days(self) -> usize {
        self.0
    }

    /// Builds a window of `days` calendar days; `None` for zero.
    pub fn from_days(days: u32) -> Option<Self> {
        match days {
            0 => None,
            days => Some(Self(days as usize)),
        }
    }
}

/// Reduction applied to the entries falling into one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    /// Number of entries.
    Count,
    /// Sum of `amount`.
    Sum,
    /// 1.0 when at least one entry matched.
    Any,
    /// Mean of `amount`; 0 for an empty day.
    Mean,
    /// Number of completed entries.
    CompletedCount,
}

impl Reducer {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "count" => Some(Self::Count),
            "sum" => Some(Self::Sum),
            "any" => Some(Self::Any),
            "mean" | "avg" | "average" => Some(Self::Mean),
            "completed" => Some(Self::CompletedCount),
            _ => None,
        }
    }

    pub fn apply(self, day: &[&Entry]) -> f64 {
        match self {
            Self::Count => day.len() as f64,
            Self::Sum => day.iter().filter_map(|entry| entry.amount).sum(),
            Self::Any => {
                if day.is_empty() {
                    0.0
                } else {
                    1.0
                }
            }
            Self::Mean => {
                let amounts: Vec<f64> = day.iter().filter_map(|entry| entry.amount).collect();
                if amounts.is_empty() {
                    0.0
                } else {
                    amounts.iter().sum::<f64>() / amounts.len() as f64
                }
            }
            Self::CompletedCount => day.iter().filter(|entry| entry.is_completed()).count() as f64,
        }
    }
}

/// One charted day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// One charted day with a value per category label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySeries {
    pub date: NaiveDate,
    pub values: BTreeMap<String, f64>,
}

/// Per-day completion ratio.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCompletion {
    pub date: NaiveDate,
    pub completed: usize,
    pub total: usize,
    pub rate: f64,
}

/// Per-day journal mood.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayMood {
    pub date: NaiveDate,
    /// Mean mood score (1-5) of entries carrying a mood; 0 when none do.
    pub average_mood: f64,
    pub entries: usize,
}

/// Returns the last `len` calendar dates ending at `today`, ascending.
pub fn trailing_days(today: NaiveDate, len: usize) -> Vec<NaiveDate> {
    (0..len)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back as u64)))
        .collect()
}

/// Groups entries by local calendar day, restricted to `days`.
fn group_by_day<'a, F>(
    entries: &'a [Entry],
    days: &[NaiveDate],
    offset: &FixedOffset,
    filter: F,
) -> BTreeMap<NaiveDate, Vec<&'a Entry>>
where
    F: Fn(&Entry) -> bool,
{
    let mut grouped: BTreeMap<NaiveDate, Vec<&Entry>> =
        days.iter().map(|day| (*day, Vec::new())).collect();
    for entry in entries.iter().filter(|entry| filter(entry)) {
        if let Some(bucket) = grouped.get_mut(&entry.local_date(offset)) {
            bucket.push(entry);
        }
    }
    grouped
}

/// Produces one point per day of `window`, reducing the entries accepted by
/// `filter` on each day.
pub fn bucket_by_day<F>(
    entries: &[Entry],
    window: DayWindow,
    today: NaiveDate,
    offset: &FixedOffset,
    filter: F,
    reducer: Reducer,
) -> Vec<DayPoint>
where
    F: Fn(&Entry) -> bool,
{
    let days = trailing_days(today, window.days());
    let grouped = group_by_day(entries, &days, offset, filter);
    grouped
        .into_iter()
        .map(|(date, day)| DayPoint {
            date,
            value: reducer.apply(&day),
        })
        .collect()
}

/// Produces one multi-value point per day with a value for every label in
/// `kinds`, as used by stacked or multi-line charts.
pub fn series_by_kind(
    entries: &[Entry],
    window: DayWindow,
    today: NaiveDate,
    offset: &FixedOffset,
    kinds: &[&str],
    reducer: Reducer,
) -> Vec<DaySeries> {
    let days = trailing_days(today, window.days());
    let grouped = group_by_day(entries, &days, offset, |entry| {
        kinds.contains(&entry.kind.as_str())
    });
    grouped
        .into_iter()
        .map(|(date, day)| {
            let values = kinds
                .iter()
                .map(|kind| {
                    let matching: Vec<&Entry> = day
                        .iter()
                        .copied()
                        .filter(|entry| entry.kind == *kind)
                        .collect();
                    ((*kind).to_string(), reducer.apply(&matching))
                })
                .collect();
            DaySeries { date, values }
        })
        .collect()
}

/// Per-day completed/total ratio for completion-tracked entries.
pub fn daily_completion_rate(
    entries: &[Entry],
    window: DayWindow,
    today: NaiveDate,
    offset: &FixedOffset,
) -> Vec<DayCompletion> {
    let days = trailing_days(today, window.days());
    group_by_day(entries, &days, offset, |_| true)
        .into_iter()
        .map(|(date, day)| {
            let completed = day
                .iter()
                .filter(|entry| entry.completed == Some(true))
                .count();
            let total = day.len();
            DayCompletion {
                date,
                completed,
                total,
                rate: completion_percentage(completed, total),
            }
        })
        .collect()
}

/// Per-day mean mood score of journal entries.
pub fn daily_mood_average(
    entries: &[Entry],
    window: DayWindow,
    today: NaiveDate,
    offset: &FixedOffset,
) -> Vec<DayMood> {
    let days = trailing_days(today, window.days());
    group_by_day(entries, &days, offset, |_| true)
        .into_iter()
        .map(|(date, day)| {
            let scores: Vec<f64> = day
                .iter()
                .filter_map(|entry| entry.mood.as_deref())
                .filter(|mood| !mood.trim().is_empty())
                .map(|mood| f64::from(mood_score(mood)))
                .collect();
            let average_mood = if scores.is_empty() {
                0.0
            } else {
                scores.iter().sum::<f64>() / scores.len() as f64
            };
            DayMood {
                date,
                average_mood,
                entries: day.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{trailing_days, DayWindow, Reducer};
    use chrono::NaiveDate;

    #[test]
    fn trailing_days_crosses_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let days = trailing_days(today, 3);
        assert_eq!(
            days,
            vec![
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                today,
            ]
        );
    }

    #[test]
    fn window_rejects_zero_days_only() {
        assert_eq!(DayWindow::from_days(0), None);
        assert_eq!(DayWindow::from_days(1).map(DayWindow::days), Some(1));
        assert_eq!(DayWindow::from_days(14), Some(DayWindow::FORTNIGHT));
        assert_eq!(DayWindow::from_days(90).map(DayWindow::days), Some(90));
    }

    #[test]
    fn reducers_are_zero_for_empty_days() {
        for reducer in [
            Reducer::Count,
            Reducer::Sum,
            Reducer::Any,
            Reducer::Mean,
            Reducer::CompletedCount,
        ] {
            assert_eq!(reducer.apply(&[]), 0.0);
        }
    }
}
