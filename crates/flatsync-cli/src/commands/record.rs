//! Commands that operate on a single named record

use colored::Colorize;
use flatsync_core::record::ENSURE;
use flatsync_core::{FlatFileSync, FlushReport, RecordFormat, Resource};
use flatsync_formats::DelimitedFormat;

use crate::context::KindContext;
use crate::error::{CliError, Result};

/// Split `attr=value` assignments, rejecting attributes the format lacks.
fn parse_assignments(format: &DelimitedFormat, assignments: &[String]) -> Result<Vec<(String, String)>> {
    assignments
        .iter()
        .map(|assignment| {
            let (attr, value) = assignment.split_once('=').ok_or_else(|| {
                CliError::user(format!("invalid assignment '{assignment}', expected attr=value"))
            })?;
            if attr == format.name_attr() {
                return Err(CliError::user(format!(
                    "'{attr}' is the record name and cannot be set; create a new record instead"
                )));
            }
            if attr != ENSURE && !format.valid_attr(attr) {
                return Err(CliError::user(format!(
                    "unknown {} attribute '{attr}'. Valid: {}",
                    format.kind(),
                    format.fields().join(", ")
                )));
            }
            Ok((attr.to_string(), value.to_string()))
        })
        .collect()
}

/// Register `resource` and load the kind's records.
fn load(context: KindContext, resource: Resource) -> Result<FlatFileSync<DelimitedFormat>> {
    let mut sync = context.engine()?;
    sync.register(resource.into_shared());
    sync.prefetch()?;
    Ok(sync)
}

fn print_report(report: &FlushReport) {
    for written in &report.written {
        println!(
            "  {} {} ({})",
            "wrote".dimmed(),
            written.target,
            written.checksum.dimmed()
        );
    }
}

/// Print one attribute of the named record.
pub fn run_get(context: KindContext, name: &str, attr: &str) -> Result<()> {
    let kind = context.config.kind.clone();
    let mut sync = load(context, Resource::new(name))?;
    let proxy = sync.proxy(name)?;

    // ensure is always answerable, even for a missing record
    if attr != ENSURE && !proxy.exists() {
        return Err(CliError::user(format!("no {kind} record named '{name}'")));
    }
    match proxy.get(attr) {
        Some(value) => {
            println!("{value}");
            Ok(())
        }
        None => Err(CliError::user(format!("{kind} '{name}' has no value for '{attr}'"))),
    }
}

/// Write attributes to the named record, creating it first if needed.
pub fn run_set(context: KindContext, name: &str, assignments: &[String], target: Option<&str>) -> Result<()> {
    let values = parse_assignments(&context.format, assignments)?;

    let mut resource = Resource::new(name);
    for (attr, value) in &values {
        resource = resource.with_should(attr.as_str(), value.as_str());
    }
    if let Some(target) = target {
        resource = resource.with_target(target);
    }

    let mut sync = load(context, resource)?;
    let kind = sync.kind().to_string();
    let mut proxy = sync.proxy(name)?;

    let verb = if proxy.exists() {
        "Updated"
    } else {
        let event = proxy.create();
        tracing::debug!(%event, record = name, "Created record");
        "Created"
    };
    for (attr, value) in values {
        proxy.set(&attr, value)?;
    }
    let report = proxy.flush()?;

    println!("{} {kind} {}", verb.green().bold(), name.cyan());
    print_report(&report);
    Ok(())
}

/// Remove the named record from its file.
pub fn run_remove(context: KindContext, name: &str, target: Option<&str>) -> Result<()> {
    let mut resource = Resource::new(name);
    if let Some(target) = target {
        resource = resource.with_target(target);
    }

    let mut sync = load(context, resource)?;
    let kind = sync.kind().to_string();
    let mut proxy = sync.proxy(name)?;

    if !proxy.exists() {
        return Err(CliError::user(format!("no {kind} record named '{name}'")));
    }
    let event = proxy.destroy();
    tracing::debug!(%event, record = name, "Destroyed record");
    let report = proxy.flush()?;

    println!("{} {kind} {}", "Removed".green().bold(), name.cyan());
    print_report(&report);
    Ok(())
}
