//! Chart data over trailing day windows.
//!
//! Prints the series that a page would chart: one row per day, oldest first.

use clap::Args;
use saios_core::stats::window::{
    bucket_by_day, daily_completion_rate, daily_mood_average, series_by_kind, DayWindow, Reducer,
};
use saios_core::Domain;

use super::{parse_domain, print_json, CommandResult, Context};

#[derive(Args)]
pub struct ChartArgs {
    #[arg(value_parser = parse_domain)]
    pub domain: Domain,
    /// Window length in days, e.g. 7, 14 or 30 (config default when omitted)
    #[arg(long, value_parser = parse_window)]
    pub days: Option<DayWindow>,
    /// Restrict to one or more category labels; repeat for a per-label series
    #[arg(long = "type")]
    pub kinds: Vec<String>,
    /// count, sum, any, mean or completed
    #[arg(long, value_parser = parse_reducer)]
    pub reduce: Option<Reducer>,
    /// Per-day completion rate instead of a reduced value
    #[arg(long, conflicts_with_all = ["mood", "reduce"])]
    pub completion: bool,
    /// Per-day average mood score
    #[arg(long, conflicts_with = "reduce")]
    pub mood: bool,
    #[arg(long)]
    pub json: bool,
}

fn parse_window(value: &str) -> Result<DayWindow, String> {
    value
        .trim()
        .parse::<u32>()
        .ok()
        .and_then(DayWindow::from_days)
        .ok_or_else(|| format!("invalid window `{value}`; expected a positive number of days"))
}

fn parse_reducer(value: &str) -> Result<Reducer, String> {
    Reducer::parse(value).ok_or_else(|| {
        format!("unknown reducer `{value}`; expected count, sum, any, mean or completed")
    })
}

/// Counts for most pages, summed amounts where entries carry quantities.
fn default_reducer(domain: Domain) -> Reducer {
    match domain {
        Domain::Finance | Domain::Addiction => Reducer::Sum,
        _ => Reducer::Count,
    }
}

pub fn run(ctx: &Context, args: ChartArgs) -> CommandResult {
    let window = args.days.unwrap_or_else(|| ctx.config.default_window());
    let today = ctx.today();
    let offset = ctx.offset();
    let mut entries = ctx.entries()?.get_all(args.domain)?;
    if !args.kinds.is_empty() && (args.completion || args.mood) {
        entries.retain(|entry| args.kinds.contains(&entry.kind));
    }

    if args.completion {
        let rates = daily_completion_rate(&entries, window, today, &offset);
        if args.json {
            return print_json(&rates);
        }
        for day in &rates {
            println!("{}  {:>5.1}%  ({}/{})", day.date, day.rate, day.completed, day.total);
        }
        return Ok(());
    }

    if args.mood {
        let moods = daily_mood_average(&entries, window, today, &offset);
        if args.json {
            return print_json(&moods);
        }
        for day in &moods {
            println!("{}  {:.1}  ({} entries)", day.date, day.average_mood, day.entries);
        }
        return Ok(());
    }

    let reducer = args.reduce.unwrap_or_else(|| default_reducer(args.domain));
    if args.kinds.len() > 1 {
        let labels: Vec<&str> = args.kinds.iter().map(String::as_str).collect();
        let series = series_by_kind(&entries, window, today, &offset, &labels, reducer);
        if args.json {
            return print_json(&series);
        }
        for day in &series {
            let values: Vec<String> = day
                .values
                .iter()
                .map(|(label, value)| format!("{label}={value}"))
                .collect();
            println!("{}  {}", day.date, values.join("  "));
        }
        return Ok(());
    }

    let kind = args.kinds.first();
    let points = bucket_by_day(
        &entries,
        window,
        today,
        &offset,
        |entry| kind.map_or(true, |kind| &entry.kind == kind),
        reducer,
    );
    if args.json {
        return print_json(&points);
    }
    for point in &points {
        println!("{}  {}", point.date, point.value);
    }
    Ok(())
}
