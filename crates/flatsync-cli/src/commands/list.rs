//! The list command

use colored::Colorize;

use crate::context::KindContext;
use crate::error::Result;

/// Print every record of the kind, one name per line or as JSON.
pub fn run_list(context: KindContext, json: bool) -> Result<()> {
    let mut sync = context.engine()?;
    let records = sync.list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for record in &records {
        match &record.target {
            Some(target) => println!("{:<20} {}", record.name.green(), target.dimmed()),
            None => println!("{}", record.name.green()),
        }
    }
    if records.is_empty() {
        println!("{} no {} records", "note:".dimmed(), sync.kind());
    }
    Ok(())
}
