//! Entry store commands: log, list, edit, toggle, delete.

use chrono::{DateTime, Utc};
use clap::Args;
use saios_core::{Domain, EntryListQuery, EntryPatch, NewEntry};

use super::{describe_entry, parse_domain, parse_id, parse_when, print_json, CommandResult, Context};

#[derive(Args)]
pub struct LogArgs {
    /// Domain key (physical, mental, finance, addiction, rituals, journal)
    #[arg(value_parser = parse_domain)]
    pub domain: Domain,
    /// Category label, e.g. "Cigarettes"; journal entries default to "Entry"
    #[arg(long = "type")]
    pub kind: Option<String>,
    /// Free-text payload (journal body, measurement text)
    #[arg(long)]
    pub value: Option<String>,
    /// Numeric payload (amount, count, measurement)
    #[arg(long, allow_negative_numbers = true)]
    pub amount: Option<f64>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub mood: Option<String>,
    /// Completion flag for rituals
    #[arg(long)]
    pub completed: Option<bool>,
    #[arg(long)]
    pub notes: Option<String>,
    /// Backdate the entry (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_when)]
    pub at: Option<DateTime<Utc>>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(value_parser = parse_domain)]
    pub domain: Domain,
    #[arg(long = "type")]
    pub kind: Option<String>,
    /// Inclusive lower bound (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_when)]
    pub since: Option<DateTime<Utc>>,
    /// Inclusive upper bound (YYYY-MM-DD or RFC 3339)
    #[arg(long, value_parser = parse_when)]
    pub until: Option<DateTime<Utc>>,
    #[arg(long)]
    pub limit: Option<u32>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct EditArgs {
    /// Entry id
    pub id: String,
    #[arg(long = "type")]
    pub kind: Option<String>,
    #[arg(long)]
    pub value: Option<String>,
    #[arg(long, allow_negative_numbers = true)]
    pub amount: Option<f64>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub mood: Option<String>,
    #[arg(long)]
    pub completed: Option<bool>,
    #[arg(long)]
    pub notes: Option<String>,
    #[arg(long, value_parser = parse_when)]
    pub at: Option<DateTime<Utc>>,
}

pub fn log(ctx: &Context, args: LogArgs) -> CommandResult {
    let kind = match (args.kind, args.domain) {
        (Some(kind), _) => kind,
        (None, Domain::Journal) => saios_core::model::domain::JOURNAL_ENTRY_KIND.to_string(),
        (None, domain) => {
            return Err(format!(
                "--type is required for {domain}; known types: {}",
                domain.default_kinds().join(", ")
            )
            .into())
        }
    };

    let input = NewEntry {
        kind,
        value: args.value,
        amount: args.amount,
        category: args.category,
        mood: args.mood,
        completed: args.completed,
        notes: args.notes,
    };
    let entries = ctx.entries()?;
    let entry = entries.add_at(args.domain, input, args.at.unwrap_or_else(|| ctx.now()))?;

    if args.json {
        return print_json(&entry);
    }
    println!("Logged {} entry {}", entry.domain, entry.id);
    Ok(())
}

pub fn list(ctx: &Context, args: ListArgs) -> CommandResult {
    let query = EntryListQuery {
        kind: args.kind,
        since: args.since,
        until: args.until,
        limit: args.limit,
        ..EntryListQuery::domain(args.domain)
    };
    let found = ctx.entries()?.list(&query)?;

    if args.json {
        return print_json(&found);
    }
    if found.is_empty() {
        println!("No {} entries", args.domain);
        return Ok(());
    }
    let offset = ctx.offset();
    for entry in &found {
        println!("{}", describe_entry(entry, &offset));
    }
    Ok(())
}

pub fn edit(ctx: &Context, args: EditArgs) -> CommandResult {
    let id = parse_id(&args.id)?;
    let patch = EntryPatch {
        kind: args.kind,
        value: args.value,
        amount: args.amount,
        category: args.category,
        mood: args.mood,
        completed: args.completed,
        notes: args.notes,
        recorded_at: args.at,
    };
    if patch.is_empty() {
        return Err("nothing to change; pass at least one field flag".into());
    }

    match ctx.entries()?.update(id, &patch)? {
        Some(entry) => println!("Updated {}", describe_entry(&entry, &ctx.offset())),
        None => println!("No entry {id}"),
    }
    Ok(())
}

pub fn toggle(ctx: &Context, id: &str) -> CommandResult {
    let id = parse_id(id)?;
    match ctx.entries()?.toggle_completed(id)? {
        Some(entry) => println!("{}", describe_entry(&entry, &ctx.offset())),
        None => println!("No entry {id}"),
    }
    Ok(())
}

pub fn delete(ctx: &Context, id: &str) -> CommandResult {
    let id = parse_id(id)?;
    if ctx.entries()?.delete(id)? {
        println!("Deleted {id}");
    } else {
        println!("No entry {id}");
    }
    Ok(())
}
