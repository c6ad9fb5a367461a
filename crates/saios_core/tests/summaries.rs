use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use saios_core::stats::dashboard::build_dashboard;
use saios_core::stats::summary::{
    category_totals, completion_percentage, completion_stats, finance_totals, journal_stats,
    kind_counts, numeric_series, period_totals, portfolio_stats, project_progress,
};
use saios_core::{Domain, Entry, NewEntry, Project, Task};
use std::collections::BTreeMap;

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 18, 0, 0).unwrap()
}

fn logged(domain: Domain, input: NewEntry, ago: Duration) -> Entry {
    Entry::create(domain, input, now() - ago)
}

#[test]
fn completion_percentage_is_zero_for_empty_totals() {
    assert_eq!(completion_percentage(0, 0), 0.0);
    assert_eq!(completion_percentage(2, 3), 66.7);
    assert_eq!(completion_percentage(4, 4), 100.0);
}

#[test]
fn kind_counts_split_today_week_and_total() {
    let entries = vec![
        logged(Domain::Mental, NewEntry::new("Meditation"), Duration::hours(1)),
        logged(Domain::Mental, NewEntry::new("Meditation"), Duration::days(3)),
        logged(Domain::Mental, NewEntry::new("Meditation"), Duration::days(20)),
        logged(Domain::Mental, NewEntry::new("Therapy"), Duration::hours(2)),
    ];

    let counts = kind_counts(&entries, "Meditation", now(), &utc());
    assert_eq!((counts.today, counts.week, counts.total), (1, 2, 3));
}

#[test]
fn period_totals_report_week_over_week_improvement() {
    let entries = vec![
        logged(Domain::Addiction, NewEntry::new("Cigarettes").with_amount(2.0), Duration::hours(3)),
        logged(Domain::Addiction, NewEntry::new("Cigarettes").with_amount(4.0), Duration::days(2)),
        logged(Domain::Addiction, NewEntry::new("Cigarettes").with_amount(10.0), Duration::days(9)),
    ];

    let totals = period_totals(&entries, now(), &utc());
    assert_eq!(totals.today, 2.0);
    assert_eq!(totals.this_week, 6.0);
    assert_eq!(totals.last_week, 10.0);
    assert_eq!(totals.improvement, 40.0);

    let quiet = period_totals(&entries[..1], now(), &utc());
    assert_eq!(quiet.improvement, 0.0);
}

#[test]
fn completion_stats_cover_today_week_and_overall() {
    let entries = vec![
        logged(Domain::Rituals, NewEntry::new("Prayer").with_completed(true), Duration::hours(10)),
        logged(Domain::Rituals, NewEntry::new("Reading").with_completed(false), Duration::hours(9)),
        logged(Domain::Rituals, NewEntry::new("Prayer").with_completed(true), Duration::days(4)),
        logged(Domain::Rituals, NewEntry::new("Prayer").with_completed(false), Duration::days(12)),
    ];

    let stats = completion_stats(&entries, now(), &utc());
    assert_eq!(stats.today.rate, 50.0);
    assert_eq!((stats.week.completed, stats.week.total), (2, 3));
    assert_eq!(stats.overall.rate, 50.0);
    assert_eq!(completion_stats(&[], now(), &utc()).overall.rate, 0.0);
}

#[test]
fn finance_totals_and_categories() {
    let entries = vec![
        logged(Domain::Finance, NewEntry::new("Income").with_amount(3000.0), Duration::days(1)),
        logged(
            Domain::Finance,
            NewEntry::new("Expense").with_amount(120.5).with_category("Food"),
            Duration::days(1),
        ),
        logged(
            Domain::Finance,
            NewEntry::new("Expense").with_amount(79.5).with_category("Food"),
            Duration::days(2),
        ),
        logged(Domain::Finance, NewEntry::new("Expense").with_amount(50.0), Duration::days(2)),
        logged(Domain::Finance, NewEntry::new("Savings").with_amount(500.0), Duration::days(3)),
    ];

    let totals = finance_totals(&entries);
    assert_eq!(totals.income, 3000.0);
    assert_eq!(totals.expenses, 250.0);
    assert_eq!(totals.savings, 500.0);
    assert_eq!(totals.balance, 2750.0);

    let expenses: Vec<Entry> = entries
        .into_iter()
        .filter(|entry| entry.kind == "Expense")
        .collect();
    let by_category = category_totals(&expenses);
    assert_eq!(by_category["Food"], 200.0);
    assert_eq!(by_category["Uncategorized"], 50.0);
}

#[test]
fn journal_stats_average_mood_over_entries_with_mood() {
    let entries = vec![
        logged(
            Domain::Journal,
            NewEntry::new("Entry").with_value("great run").with_mood("😄 Great"),
            Duration::hours(2),
        ),
        logged(
            Domain::Journal,
            NewEntry::new("Entry").with_value("fine").with_mood("😊"),
            Duration::days(5),
        ),
        logged(
            Domain::Journal,
            NewEntry::new("Entry").with_value("old notes"),
            Duration::days(25),
        ),
    ];

    let stats = journal_stats(&entries, now(), &utc());
    assert_eq!((stats.today, stats.week, stats.month, stats.total), (1, 2, 3, 3));
    assert_eq!(stats.average_mood, 4.5);
    assert_eq!(stats.average_mood_emoji, "😄");

    let empty = journal_stats(&[], now(), &utc());
    assert_eq!(empty.average_mood, 0.0);
    assert_eq!(empty.average_mood_emoji, "😐");
}

#[test]
fn numeric_series_is_chronological_and_falls_back_to_text_values() {
    let entries = vec![
        logged(Domain::Physical, NewEntry::new("Weight").with_amount(71.2), Duration::days(1)),
        logged(Domain::Physical, NewEntry::new("Weight").with_value("72.0"), Duration::days(3)),
        logged(Domain::Physical, NewEntry::new("Weight").with_value("heavy"), Duration::days(2)),
        logged(Domain::Physical, NewEntry::new("Steps").with_amount(9000.0), Duration::days(1)),
    ];

    let series = numeric_series(&entries, "Weight");
    let values: Vec<f64> = series.iter().map(|point| point.value).collect();
    assert_eq!(values, vec![72.0, 71.2]);
}

#[test]
fn project_and_portfolio_progress() {
    let created = now() - Duration::days(10);
    let done = Project::new("Garden", None, created);
    let open = Project::new("Taxes", Some("2023 return".to_string()), created);
    let empty = Project::new("Someday", None, created);

    let mut weeding = Task::new(done.id, "Weed beds", created);
    weeding.toggle(now());
    let mut forms = Task::new(open.id, "Collect forms", created);
    forms.toggle(now());
    let filing = Task::new(open.id, "File return", created);

    let progress = project_progress(&[forms.clone(), filing.clone()]);
    assert_eq!((progress.completed, progress.total), (1, 2));
    assert_eq!(progress.percentage, 50.0);
    assert!(!progress.is_done());
    assert!(!project_progress(&[]).is_done());

    let portfolio = portfolio_stats(&[done, open, empty], &[weeding, forms, filing]);
    assert_eq!(portfolio.total_projects, 3);
    assert_eq!(portfolio.total_tasks, 3);
    assert_eq!(portfolio.completed_tasks, 2);
    assert_eq!(portfolio.completed_projects, 1);
    assert_eq!(portfolio.overall_progress, 66.7);
}

#[test]
fn dashboard_counts_only_completed_rituals() {
    let mut collections = BTreeMap::new();
    collections.insert(
        Domain::Rituals,
        vec![
            logged(Domain::Rituals, NewEntry::new("Prayer").with_completed(true), Duration::hours(1)),
            logged(Domain::Rituals, NewEntry::new("Reading").with_completed(false), Duration::hours(1)),
        ],
    );
    collections.insert(
        Domain::Physical,
        vec![
            logged(Domain::Physical, NewEntry::new("Steps"), Duration::hours(1)),
            logged(Domain::Physical, NewEntry::new("Steps"), Duration::days(2)),
            logged(Domain::Physical, NewEntry::new("Steps"), Duration::days(40)),
        ],
    );

    let dashboard = build_dashboard(&collections, now(), &utc());

    assert_eq!(dashboard.tiles.len(), Domain::ALL.len());
    let rituals = dashboard
        .tiles
        .iter()
        .find(|tile| tile.domain == Domain::Rituals)
        .unwrap();
    assert_eq!((rituals.total, rituals.today), (1, 1));
    let physical = dashboard
        .tiles
        .iter()
        .find(|tile| tile.domain == Domain::Physical)
        .unwrap();
    assert_eq!((physical.total, physical.today), (3, 1));
    let journal = dashboard
        .tiles
        .iter()
        .find(|tile| tile.domain == Domain::Journal)
        .unwrap();
    assert_eq!(journal.total, 0);

    assert_eq!(dashboard.activity.len(), 7);
    let today = dashboard.activity.last().unwrap();
    assert_eq!(today.counts[&Domain::Rituals], 1);
    assert_eq!(today.counts[&Domain::Physical], 1);
    let week_total: usize = dashboard
        .activity
        .iter()
        .map(|day| day.counts[&Domain::Physical])
        .sum();
    assert_eq!(week_total, 2);
}
