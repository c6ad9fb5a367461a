//! Schema history of the tracker store.
//!
//! Each step is a SQL script bundled into the binary. A store records the
//! last step it has seen in `PRAGMA user_version`; opening it runs every
//! later step in one transaction.
//!
//! - v1 `init`: `entries` for all domains, `projects`, `tasks` (cascading
//!   on project delete).
//! - v2 `indexes`: lookups by domain, date, kind and project.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "init",
        sql: include_str!("0001_init.sql"),
    },
    SchemaStep {
        version: 2,
        name: "indexes",
        sql: include_str!("0002_indexes.sql"),
    },
];

/// Schema version a store has after every known step is applied.
pub fn target_version() -> u32 {
    STEPS.iter().map(|step| step.version).max().unwrap_or(0)
}

/// Schema version recorded in the store.
pub fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

/// Brings the store up to `target_version()`.
///
/// Returns the number of steps applied; zero for an up-to-date store.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    let from = stored_version(conn)?;
    let target = target_version();
    if from > target {
        return Err(DbError::StoreTooNew {
            store_version: from,
            supported_version: target,
        });
    }

    let pending: Vec<&SchemaStep> = STEPS.iter().filter(|step| step.version > from).collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=db_migrate_step module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={from} to_version={target} steps={}",
        pending.len()
    );
    Ok(pending.len())
}
