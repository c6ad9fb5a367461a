//! Cross-domain overview.
//!
//! Rituals only count completed entries, both in tiles and in activity.

use crate::model::domain::Domain;
use crate::model::entry::Entry;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::window::{trailing_days, DayWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DomainTile {
    pub domain: Domain,
    pub total: usize,
    pub today: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub counts: BTreeMap<Domain, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub tiles: Vec<DomainTile>,
    pub activity: Vec<DayActivity>,
}

fn counts_toward_activity(entry: &Entry) -> bool {
    entry.domain != Domain::Rituals || entry.completed == Some(true)
}

/// Builds tiles for every domain and a trailing-week activity series.
///
/// Domains missing from `collections` show up as empty.
pub fn build_dashboard(
    collections: &BTreeMap<Domain, Vec<Entry>>,
    now: DateTime<Utc>,
    offset: &FixedOffset,
) -> Dashboard {
    let today = now.with_timezone(offset).date_naive();
    let empty = Vec::new();

    let tiles = Domain::ALL
        .iter()
        .map(|domain| {
            let entries = collections.get(domain).unwrap_or(&empty);
            let counted: Vec<&Entry> = entries
                .iter()
                .filter(|entry| counts_toward_activity(entry))
                .collect();
            DomainTile {
                domain: *domain,
                total: counted.len(),
                today: counted
                    .iter()
                    .filter(|entry| entry.local_date(offset) == today)
                    .count(),
            }
        })
        .collect();

    let activity = trailing_days(today, DayWindow::WEEK.days())
        .into_iter()
        .map(|date| {
            let counts = Domain::ALL
                .iter()
                .map(|domain| {
                    let count = collections.get(domain).map_or(0, |entries| {
                        entries
                            .iter()
                            .filter(|entry| counts_toward_activity(entry))
                            .filter(|entry| entry.local_date(offset) == date)
                            .count()
                    });
                    (*domain, count)
                })
                .collect();
            DayActivity { date, counts }
        })
        .collect();

    Dashboard { tiles, activity }
}
