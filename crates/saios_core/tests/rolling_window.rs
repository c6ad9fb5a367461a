use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
use saios_core::stats::window::{
    bucket_by_day, daily_completion_rate, daily_mood_average, series_by_kind, DayWindow, Reducer,
};
use saios_core::{Domain, Entry, NewEntry};

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn entry(domain: Domain, input: NewEntry, y: i32, m: u32, d: u32, h: u32) -> Entry {
    Entry::create(domain, input, Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
}

#[test]
fn empty_collection_yields_one_zero_point_per_window_day() {
    let today = day(2024, 5, 10);
    for window in [DayWindow::WEEK, DayWindow::FORTNIGHT, DayWindow::MONTH] {
        let points = bucket_by_day(&[], window, today, &utc(), |_| true, Reducer::Count);
        assert_eq!(points.len(), window.days());
        assert!(points.iter().all(|point| point.value == 0.0));
        assert_eq!(points.last().map(|point| point.date), Some(today));
        assert!(points.windows(2).all(|pair| pair[0].date < pair[1].date));
    }
}

#[test]
fn arbitrary_window_lengths_yield_one_point_per_day() {
    let today = day(2024, 3, 5);
    let entries = vec![
        entry(Domain::Physical, NewEntry::new("Workout"), 2024, 3, 5, 7),
        entry(Domain::Physical, NewEntry::new("Workout"), 2024, 2, 25, 7),
        entry(Domain::Physical, NewEntry::new("Workout"), 2024, 2, 24, 7),
    ];

    let single = DayWindow::from_days(1).unwrap();
    let points = bucket_by_day(&entries, single, today, &utc(), |_| true, Reducer::Count);
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].date, today);
    assert_eq!(points[0].value, 1.0);

    let ten = DayWindow::from_days(10).unwrap();
    let points = bucket_by_day(&entries, ten, today, &utc(), |_| true, Reducer::Count);
    assert_eq!(points.len(), 10);
    assert_eq!(points[0].date, day(2024, 2, 25));
    assert_eq!(points[0].value, 1.0);
    assert_eq!(points.iter().map(|point| point.value).sum::<f64>(), 2.0);

    let series = series_by_kind(&entries, ten, today, &utc(), &["Workout", "Steps"], Reducer::Count);
    assert_eq!(series.len(), 10);
}

#[test]
fn fortnight_of_cigarette_counts_places_sums_on_the_right_days() {
    let entries = vec![
        entry(
            Domain::Addiction,
            NewEntry::new("Cigarettes").with_amount(5.0),
            2024,
            1,
            1,
            9,
        ),
        entry(
            Domain::Addiction,
            NewEntry::new("Cigarettes").with_amount(0.0),
            2024,
            1,
            2,
            9,
        ),
        entry(
            Domain::Addiction,
            NewEntry::new("Alcohol").with_amount(2.0),
            2024,
            1,
            1,
            22,
        ),
    ];

    let points = bucket_by_day(
        &entries,
        DayWindow::FORTNIGHT,
        day(2024, 1, 14),
        &utc(),
        |entry| entry.kind == "Cigarettes",
        Reducer::Sum,
    );

    assert_eq!(points.len(), 14);
    assert_eq!(points[0].date, day(2024, 1, 1));
    assert_eq!(points[0].value, 5.0);
    assert_eq!(points[1].date, day(2024, 1, 2));
    assert_eq!(points[1].value, 0.0);
    assert!(points[2..].iter().all(|point| point.value == 0.0));
}

#[test]
fn entries_outside_the_window_are_ignored() {
    let entries = vec![
        entry(Domain::Physical, NewEntry::new("Workout"), 2024, 1, 1, 9),
        entry(Domain::Physical, NewEntry::new("Workout"), 2024, 1, 9, 9),
    ];

    let points = bucket_by_day(
        &entries,
        DayWindow::WEEK,
        day(2024, 1, 8),
        &utc(),
        |_| true,
        Reducer::Count,
    );

    assert_eq!(points.iter().map(|point| point.value).sum::<f64>(), 0.0);
}

#[test]
fn offset_moves_late_evening_entries_to_the_next_local_day() {
    let late = entry(Domain::Mental, NewEntry::new("Meditation"), 2024, 6, 1, 22);
    let plus_three = FixedOffset::east_opt(3 * 3600).unwrap();

    let points = bucket_by_day(
        &[late],
        DayWindow::WEEK,
        day(2024, 6, 2),
        &plus_three,
        |_| true,
        Reducer::Any,
    );

    assert_eq!(points[5].date, day(2024, 6, 1));
    assert_eq!(points[5].value, 0.0);
    assert_eq!(points[6].date, day(2024, 6, 2));
    assert_eq!(points[6].value, 1.0);
}

#[test]
fn series_by_kind_reports_every_requested_label_each_day() {
    let entries = vec![
        entry(Domain::Addiction, NewEntry::new("Cigarettes").with_amount(4.0), 2024, 3, 6, 8),
        entry(Domain::Addiction, NewEntry::new("Cigarettes").with_amount(1.0), 2024, 3, 6, 20),
        entry(Domain::Addiction, NewEntry::new("Gaming").with_amount(2.0), 2024, 3, 7, 20),
    ];

    let series = series_by_kind(
        &entries,
        DayWindow::WEEK,
        day(2024, 3, 7),
        &utc(),
        &["Cigarettes", "Gaming", "Alcohol"],
        Reducer::Sum,
    );

    assert_eq!(series.len(), 7);
    assert!(series.iter().all(|point| point.values.len() == 3));
    let previous = &series[5];
    assert_eq!(previous.values["Cigarettes"], 5.0);
    assert_eq!(previous.values["Gaming"], 0.0);
    let last = &series[6];
    assert_eq!(last.values["Gaming"], 2.0);
    assert_eq!(last.values["Alcohol"], 0.0);
}

#[test]
fn daily_completion_rate_rounds_to_one_decimal() {
    let entries = vec![
        entry(Domain::Rituals, NewEntry::new("Prayer").with_completed(true), 2024, 2, 10, 6),
        entry(Domain::Rituals, NewEntry::new("Reading").with_completed(false), 2024, 2, 10, 7),
        entry(Domain::Rituals, NewEntry::new("Exercise").with_completed(false), 2024, 2, 10, 8),
    ];

    let rates = daily_completion_rate(&entries, DayWindow::WEEK, day(2024, 2, 10), &utc());

    let last = rates.last().unwrap();
    assert_eq!((last.completed, last.total), (1, 3));
    assert_eq!(last.rate, 33.3);
    assert_eq!(rates[0].rate, 0.0);
}

#[test]
fn daily_mood_average_skips_entries_without_mood() {
    let entries = vec![
        entry(
            Domain::Journal,
            NewEntry::new("Entry").with_value("good").with_mood("😄"),
            2024,
            2,
            10,
            6,
        ),
        entry(
            Domain::Journal,
            NewEntry::new("Entry").with_value("meh").with_mood("😐 Neutral"),
            2024,
            2,
            10,
            18,
        ),
        entry(
            Domain::Journal,
            NewEntry::new("Entry").with_value("no mood"),
            2024,
            2,
            10,
            20,
        ),
    ];

    let moods = daily_mood_average(&entries, DayWindow::WEEK, day(2024, 2, 10), &utc());

    let last = moods.last().unwrap();
    assert_eq!(last.entries, 3);
    assert_eq!(last.average_mood, 4.0);
    assert_eq!(moods[0].average_mood, 0.0);
}
