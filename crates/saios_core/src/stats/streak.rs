//! Streak computations.
//!
//! Two separate semantics exist and are never mixed:
//! - consecutive-day streak: how many days in a row, ending today, had at
//!   least one qualifying entry (ritual completion streaks);
//! - days since last: calendar days between today and the most recent
//!   qualifying entry (addiction clean streaks).

use crate::model::entry::Entry;
use chrono::{FixedOffset, NaiveDate};
use std::collections::{BTreeMap, BTreeSet};

/// Counts consecutive qualifying days walking back from `today`.
///
/// Several entries on one day count once. A day without a qualifying entry
/// ends the walk, so a streak with nothing logged today is 0.
pub fn consecutive_day_streak<F>(
    entries: &[Entry],
    offset: &FixedOffset,
    today: NaiveDate,
    qualifies: F,
) -> u32
where
    F: Fn(&Entry) -> bool,
{
    let days: BTreeSet<NaiveDate> = entries
        .iter()
        .filter(|entry| qualifies(entry))
        .map(|entry| entry.local_date(offset))
        .collect();

    let mut streak = 0;
    let mut expected = Some(today);
    while let Some(day) = expected {
        if !days.contains(&day) {
            break;
        }
        streak += 1;
        expected = day.pred_opt();
    }
    streak
}

/// Calendar days between `today` and the most recent qualifying entry.
///
/// Returns `None` when nothing qualifies. Entries dated after `today` yield
/// 0 rather than a negative count.
pub fn days_since_last<F>(
    entries: &[Entry],
    offset: &FixedOffset,
    today: NaiveDate,
    qualifies: F,
) -> Option<i64>
where
    F: Fn(&Entry) -> bool,
{
    entries
        .iter()
        .filter(|entry| qualifies(entry))
        .map(|entry| entry.local_date(offset))
        .max()
        .map(|last| (today - last).num_days().max(0))
}

/// Completion streak for every label in `kinds`.
pub fn completion_streaks(
    entries: &[Entry],
    kinds: &[&str],
    offset: &FixedOffset,
    today: NaiveDate,
) -> BTreeMap<String, u32> {
    kinds
        .iter()
        .map(|kind| {
            let streak = consecutive_day_streak(entries, offset, today, |entry| {
                entry.kind == *kind && entry.completed == Some(true)
            });
            ((*kind).to_string(), streak)
        })
        .collect()
}

/// Days since the last occurrence for every label in `kinds`.
pub fn clean_streaks(
    entries: &[Entry],
    kinds: &[&str],
    offset: &FixedOffset,
    today: NaiveDate,
) -> BTreeMap<String, Option<i64>> {
    kinds
        .iter()
        .map(|kind| {
            let days = days_since_last(entries, offset, today, |entry| entry.kind == *kind);
            ((*kind).to_string(), days)
        })
        .collect()
}
