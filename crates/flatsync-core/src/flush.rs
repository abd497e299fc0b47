//! Writing dirty targets back to their backing files

use chrono::Local;
use flatsync_fs::checksum::compute_content_checksum;

use crate::engine::{Binding, FlatFileSync};
use crate::format::RecordFormat;
use crate::record::Record;
use crate::target::Target;
use crate::{Error, Result};

/// Prefix of every generated header line.
pub const HEADER_PREFIX: &str = "# HEADER:";

/// Header placed at the top of each generated file.
pub fn header(timestamp: impl std::fmt::Display) -> String {
    format!(
        "{HEADER_PREFIX} This file was autogenerated at {timestamp}\n\
         {HEADER_PREFIX} by flatsync. While it can still be managed manually, it\n\
         {HEADER_PREFIX} is definitely not recommended.\n"
    )
}

/// Remove generated header lines so they are not parsed as content.
pub fn strip_header(text: &str) -> String {
    text.split_inclusive('\n')
        .filter(|line| !line.starts_with(HEADER_PREFIX))
        .collect()
}

/// One target written by a flush pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlushedTarget {
    pub target: Target,
    /// Live records written
    pub records: usize,
    /// `sha256:<hex>` of the written content
    pub checksum: String,
}

/// Targets written by one flush pass, in write order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlushReport {
    pub written: Vec<FlushedTarget>,
}

impl FlushReport {
    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }

    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.written.iter().map(|w| &w.target)
    }
}

impl<F: RecordFormat> FlatFileSync<F> {
    /// Add the named instance's record to the store if it is new, then
    /// flush every dirty target.
    pub(crate) fn flush_record(&mut self, name: &str) -> Result<FlushReport> {
        let detached = match self.bindings.get(name) {
            Some(Binding::Detached(record)) => Some(record.clone()),
            _ => None,
        };
        if let Some(mut record) = detached {
            record.on_disk = true;
            let target = record
                .target
                .clone()
                .unwrap_or_else(|| self.targets.default_target().clone());
            self.dirty.mark(target);

            let id = self.store.push(record);
            self.bindings.insert(name.to_string(), Binding::Stored(id));
        }

        self.flush_all()
    }

    /// Write every dirty target in path order.
    ///
    /// Does no I/O when nothing is dirty. On a write failure the failing
    /// target and every target after it stay dirty; targets already written
    /// in this pass stay clean.
    pub fn flush_all(&mut self) -> Result<FlushReport> {
        let mut report = FlushReport::default();
        if self.dirty.is_empty() {
            return Ok(report);
        }

        for target in self.dirty.snapshot() {
            tracing::debug!(kind = self.kind(), target = %target, "Flushing target");
            report.written.push(self.flush_target(&target)?);
        }

        Ok(report)
    }

    /// Write the live records of one target and mark it clean.
    pub fn flush_target(&mut self, target: &Target) -> Result<FlushedTarget> {
        let live: Vec<&Record> = self
            .store
            .target_records(target)
            .filter(|r| !r.is_absent())
            .collect();
        let records = live
            .iter()
            .filter(|r| r.record_kind == self.format.kind())
            .count();
        let flush_error = |source: Error| Error::Flush {
            target: target.path().clone(),
            source: Box::new(source),
        };
        let body = self.format.to_text(&live).map_err(flush_error)?;

        let text = if self.config.header {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S %z");
            format!("{}{}", header(timestamp), body)
        } else {
            body
        };

        self.targets
            .file(target)
            .write(&text)
            .map_err(|e| flush_error(Error::Fs(e)))?;
        self.dirty.clean(target);

        tracing::info!(kind = self.kind(), target = %target, records, "Wrote target");
        Ok(FlushedTarget {
            target: target.clone(),
            records,
            checksum: compute_content_checksum(&text),
        })
    }
}
