//! Domain summary figures and the cross-domain dashboard.

use clap::Args;
use saios_core::stats::dashboard::build_dashboard;
use saios_core::stats::summary::{
    category_totals, completion_stats, finance_totals, journal_stats, kind_counts,
    numeric_series, period_totals, CompletionStats, FinanceTotals, JournalStats, KindCounts,
    NumericPoint, PeriodTotals,
};
use saios_core::{Domain, Entry};
use serde::Serialize;
use std::collections::BTreeMap;

use super::{parse_domain, print_json, CommandResult, Context};

#[derive(Args)]
pub struct StatsArgs {
    #[arg(value_parser = parse_domain)]
    pub domain: Domain,
    #[arg(long)]
    pub json: bool,
}

/// Figures shown at the top of each domain page.
#[derive(Debug, Serialize)]
#[serde(tag = "domain", rename_all = "snake_case")]
enum DomainStats {
    Physical {
        kinds: BTreeMap<String, KindCounts>,
        weight: Vec<NumericPoint>,
    },
    Mental {
        kinds: BTreeMap<String, KindCounts>,
    },
    Finance {
        totals: FinanceTotals,
        expenses_by_category: BTreeMap<String, f64>,
    },
    Addiction {
        overall: PeriodTotals,
        kinds: BTreeMap<String, PeriodTotals>,
    },
    Rituals {
        completion: CompletionStats,
    },
    Journal {
        summary: JournalStats,
    },
}

fn counts_by_kind(ctx: &Context, domain: Domain, entries: &[Entry]) -> BTreeMap<String, KindCounts> {
    let offset = ctx.offset();
    domain
        .default_kinds()
        .iter()
        .map(|kind| {
            (
                (*kind).to_string(),
                kind_counts(entries, kind, ctx.now(), &offset),
            )
        })
        .collect()
}

fn collect(ctx: &Context, domain: Domain, entries: &[Entry]) -> DomainStats {
    let offset = ctx.offset();
    let now = ctx.now();
    match domain {
        Domain::Physical => DomainStats::Physical {
            kinds: counts_by_kind(ctx, domain, entries),
            weight: numeric_series(entries, "Weight"),
        },
        Domain::Mental => DomainStats::Mental {
            kinds: counts_by_kind(ctx, domain, entries),
        },
        Domain::Finance => {
            let expenses: Vec<Entry> = entries
                .iter()
                .filter(|entry| entry.kind == "Expense")
                .cloned()
                .collect();
            DomainStats::Finance {
                totals: finance_totals(entries),
                expenses_by_category: category_totals(&expenses),
            }
        }
        Domain::Addiction => DomainStats::Addiction {
            overall: period_totals(entries, now, &offset),
            kinds: domain
                .default_kinds()
                .iter()
                .map(|kind| {
                    let matching: Vec<Entry> = entries
                        .iter()
                        .filter(|entry| entry.kind == *kind)
                        .cloned()
                        .collect();
                    ((*kind).to_string(), period_totals(&matching, now, &offset))
                })
                .collect(),
        },
        Domain::Rituals => DomainStats::Rituals {
            completion: completion_stats(entries, now, &offset),
        },
        Domain::Journal => DomainStats::Journal {
            summary: journal_stats(entries, now, &offset),
        },
    }
}

fn print_kind_counts(kinds: &BTreeMap<String, KindCounts>) {
    for (kind, counts) in kinds {
        println!(
            "{kind}: today {}  week {}  total {}",
            counts.today, counts.week, counts.total
        );
    }
}

fn print_period(label: &str, totals: &PeriodTotals) {
    println!(
        "{label}: today {}  this week {}  last week {}  improvement {:.1}%",
        totals.today, totals.this_week, totals.last_week, totals.improvement
    );
}

pub fn run(ctx: &Context, args: StatsArgs) -> CommandResult {
    let entries = ctx.entries()?.get_all(args.domain)?;
    let stats = collect(ctx, args.domain, &entries);
    if args.json {
        return print_json(&stats);
    }

    match &stats {
        DomainStats::Physical { kinds, weight } => {
            print_kind_counts(kinds);
            if let Some(latest) = weight.last() {
                println!("Latest weight: {}", latest.value);
            }
        }
        DomainStats::Mental { kinds } => print_kind_counts(kinds),
        DomainStats::Finance {
            totals,
            expenses_by_category,
        } => {
            println!("Income: {:.2}", totals.income);
            println!("Expenses: {:.2}", totals.expenses);
            println!("Savings: {:.2}", totals.savings);
            println!("Balance: {:.2}", totals.balance);
            for (category, amount) in expenses_by_category {
                println!("  {category}: {amount:.2}");
            }
        }
        DomainStats::Addiction { overall, kinds } => {
            print_period("All", overall);
            for (kind, totals) in kinds {
                print_period(kind, totals);
            }
        }
        DomainStats::Rituals { completion } => {
            for (label, rate) in [
                ("Today", &completion.today),
                ("Week", &completion.week),
                ("Overall", &completion.overall),
            ] {
                println!(
                    "{label}: {:.1}% ({}/{})",
                    rate.rate, rate.completed, rate.total
                );
            }
        }
        DomainStats::Journal { summary } => {
            println!(
                "Entries: today {}  week {}  month {}  total {}",
                summary.today, summary.week, summary.month, summary.total
            );
            println!(
                "Average mood: {} {:.1}",
                summary.average_mood_emoji, summary.average_mood
            );
        }
    }
    Ok(())
}

pub fn dashboard(ctx: &Context, json: bool) -> CommandResult {
    let entries = ctx.entries()?;
    let mut collections = BTreeMap::new();
    for domain in Domain::ALL {
        collections.insert(domain, entries.get_all(domain)?);
    }
    let dashboard = build_dashboard(&collections, ctx.now(), &ctx.offset());
    if json {
        return print_json(&dashboard);
    }

    for tile in &dashboard.tiles {
        println!(
            "{:<10} total {:>5}  today {:>3}",
            tile.domain.key(),
            tile.total,
            tile.today
        );
    }
    println!();
    for day in &dashboard.activity {
        let counts: Vec<String> = day
            .counts
            .iter()
            .map(|(domain, count)| format!("{}={count}", domain.key()))
            .collect();
        println!("{}  {}", day.date, counts.join(" "));
    }
    Ok(())
}
