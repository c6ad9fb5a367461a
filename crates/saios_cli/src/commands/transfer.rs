//! Backup export and restore.

use saios_core::transfer::to_json_pretty;
use saios_core::{export_bundle, import_bundle};
use std::path::Path;

use super::{CommandResult, Context};

pub fn export(ctx: &Context, out: Option<&Path>) -> CommandResult {
    let bundle = export_bundle(&ctx.conn, ctx.now())?;
    let json = to_json_pretty(&bundle)?;
    match out {
        Some(path) => {
            std::fs::write(path, json)?;
            println!("Exported to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn import(ctx: &mut Context, file: &Path) -> CommandResult {
    let json = std::fs::read_to_string(file)?;
    let summary = import_bundle(&mut ctx.conn, &json)?;
    for (collection, count) in &summary.collections {
        println!("{collection}: {count} records");
    }
    println!("Imported {} records", summary.total_records());
    Ok(())
}
