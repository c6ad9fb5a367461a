//! Streak report per category label.

use clap::{Args, ValueEnum};
use saios_core::stats::streak::{clean_streaks, completion_streaks, consecutive_day_streak};
use saios_core::Domain;
use std::collections::BTreeMap;

use super::{parse_domain, print_json, CommandResult, Context};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StreakMode {
    /// Days in a row, ending today, with an entry (a completed one for rituals)
    Consecutive,
    /// Days since the most recent entry
    DaysSince,
}

#[derive(Args)]
pub struct StreakArgs {
    #[arg(value_parser = parse_domain)]
    pub domain: Domain,
    /// Defaults to days-since for addiction, consecutive otherwise
    #[arg(long, value_enum)]
    pub mode: Option<StreakMode>,
    /// Labels to report; the domain defaults when omitted
    #[arg(long = "type")]
    pub kinds: Vec<String>,
    #[arg(long)]
    pub json: bool,
}

pub fn run(ctx: &Context, args: StreakArgs) -> CommandResult {
    let mode = args.mode.unwrap_or(match args.domain {
        Domain::Addiction => StreakMode::DaysSince,
        _ => StreakMode::Consecutive,
    });
    let labels: Vec<&str> = if args.kinds.is_empty() {
        args.domain.default_kinds().to_vec()
    } else {
        args.kinds.iter().map(String::as_str).collect()
    };
    let entries = ctx.entries()?.get_all(args.domain)?;
    let offset = ctx.offset();
    let today = ctx.today();

    match mode {
        StreakMode::Consecutive => {
            let streaks = if args.domain == Domain::Rituals {
                completion_streaks(&entries, &labels, &offset, today)
            } else {
                labels
                    .iter()
                    .map(|label| {
                        let days = consecutive_day_streak(&entries, &offset, today, |entry| {
                            entry.kind == *label
                        });
                        ((*label).to_string(), days)
                    })
                    .collect::<BTreeMap<String, u32>>()
            };
            if args.json {
                return print_json(&streaks);
            }
            for (label, days) in &streaks {
                println!("{label}: {days} day streak");
            }
        }
        StreakMode::DaysSince => {
            let streaks = clean_streaks(&entries, &labels, &offset, today);
            if args.json {
                return print_json(&streaks);
            }
            for (label, days) in &streaks {
                match days {
                    Some(days) => println!("{label}: {days} days clean"),
                    None => println!("{label}: never logged"),
                }
            }
        }
    }
    Ok(())
}
