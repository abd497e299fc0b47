//! Per-instance access to a bound record
//!
//! Every write goes through one path that stores the value and marks the
//! affected targets dirty, including the old target when the instance's
//! declared target changed.

use std::fmt;
use std::sync::Arc;

use crate::engine::FlatFileSync;
use crate::flush::FlushReport;
use crate::format::RecordFormat;
use crate::instance::DesiredInstance;
use crate::record::{ENSURE, Ensure, Record};
use crate::{Error, Result};

/// Acknowledgement returned by [`FieldProxy::create`] and [`FieldProxy::destroy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Created { kind: String },
    Deleted { kind: String },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { kind } => write!(f, "{kind}_created"),
            Self::Deleted { kind } => write!(f, "{kind}_deleted"),
        }
    }
}

/// Reads and writes one instance's record.
///
/// Borrows the engine mutably, so no prefetch or flush of the same kind can
/// run while a proxy is alive.
pub struct FieldProxy<'a, F: RecordFormat> {
    sync: &'a mut FlatFileSync<F>,
    instance: Arc<dyn DesiredInstance>,
}

impl<'a, F: RecordFormat> FieldProxy<'a, F> {
    pub(crate) fn new(sync: &'a mut FlatFileSync<F>, instance: Arc<dyn DesiredInstance>) -> Self {
        Self { sync, instance }
    }

    pub fn name(&self) -> &str {
        self.instance.name()
    }

    /// The bound record, if the instance is bound.
    pub fn record(&self) -> Option<&Record> {
        self.sync.bound_record(self.instance.name())
    }

    /// Current value of `attr`; `None` means absent.
    ///
    /// The format's name attribute reads the record name. Attributes the
    /// format does not know, and the record has never been given, report the
    /// instance's desired value instead.
    pub fn get(&self, attr: &str) -> Option<String> {
        let record = self.record();
        if attr == ENSURE {
            return record.and_then(|r| r.ensure).map(|e| e.as_str().to_string());
        }
        if attr == self.sync.format.name_attr() {
            return record.and_then(|r| match (r.name.is_empty(), r.ensure) {
                (false, _) => Some(r.name.clone()),
                // Created but not flushed yet: named at its first flush
                (true, Some(Ensure::Present)) => Some(self.instance.name().to_string()),
                (true, _) => None,
            });
        }

        let stored = record.and_then(|r| r.field(attr));
        if stored.is_some() || self.sync.format.valid_attr(attr) {
            stored.map(str::to_string)
        } else {
            self.instance.should(attr)
        }
    }

    pub fn ensure(&self) -> Option<Ensure> {
        self.record().and_then(|r| r.ensure)
    }

    /// Store `value` under `attr` and mark the record's target dirty.
    ///
    /// Writing `ensure` accepts `present` or `absent`. The name attribute is
    /// read-only; a record is always named after its instance.
    pub fn set(&mut self, attr: &str, value: impl Into<String>) -> Result<()> {
        self.check_writable(attr)?;
        let value = value.into();
        if attr == ENSURE {
            let ensure: Ensure = value.parse()?;
            self.write(|record| record.ensure = Some(ensure));
        } else {
            self.write(|record| {
                record.fields.insert(attr.to_string(), value);
            });
        }
        Ok(())
    }

    /// Remove `attr` from the record, marking dirtiness like [`set`](Self::set).
    pub fn unset(&mut self, attr: &str) -> Result<()> {
        self.check_writable(attr)?;
        if attr == ENSURE {
            self.write(|record| record.ensure = None);
        } else {
            self.write(|record| {
                record.fields.remove(attr);
            });
        }
        Ok(())
    }

    /// Copy every desired value into the record and make it present.
    pub fn create(&mut self) -> Event {
        let target = self.sync.instance_target(self.instance.as_ref());
        let instance = Arc::clone(&self.instance);
        let name_attr = self.sync.format.name_attr().to_string();
        let record = self.sync.bound_record_mut(instance.name());

        for attr in instance.valid_attributes() {
            if attr == ENSURE || attr == name_attr {
                continue;
            }
            if let Some(value) = instance.should(&attr) {
                record.fields.insert(attr, value);
            }
        }
        record.ensure = Some(Ensure::Present);

        let target = record.target.clone().unwrap_or(target);
        self.sync.dirty.mark(target);

        tracing::debug!(kind = self.sync.kind(), name = instance.name(), "Created record");
        Event::Created {
            kind: self.sync.kind().to_string(),
        }
    }

    /// Mark the record absent; it disappears from disk at the next flush.
    pub fn destroy(&mut self) -> Event {
        self.write(|record| record.ensure = Some(Ensure::Absent));
        Event::Deleted {
            kind: self.sync.kind().to_string(),
        }
    }

    /// Whether the record is present. No I/O.
    pub fn exists(&self) -> bool {
        self.ensure() == Some(Ensure::Present)
    }

    /// Persist this instance's record and every other dirty target.
    ///
    /// A record that has never been on disk is added to the store first.
    pub fn flush(&mut self) -> Result<FlushReport> {
        let target = self.sync.instance_target(self.instance.as_ref());
        let name = self.instance.name().to_string();
        let record = self.sync.bound_record_mut(&name);

        let mut newly_targeted = None;
        if record.target.is_none() {
            record.target = Some(target.clone());
            newly_targeted = Some(target);
        }
        if record.name.is_empty() {
            record.name = name.clone();
        }
        if let Some(target) = newly_targeted {
            self.sync.dirty.mark(target);
        }

        self.sync.flush_record(&name)
    }

    fn check_writable(&self, attr: &str) -> Result<()> {
        if attr == self.sync.format.name_attr() {
            return Err(Error::ReadOnly {
                attr: attr.to_string(),
            });
        }
        Ok(())
    }

    fn write(&mut self, apply: impl FnOnce(&mut Record)) {
        let new_target = self.sync.instance_target(self.instance.as_ref());
        let record = self.sync.bound_record_mut(self.instance.name());
        apply(&mut *record);

        let previous = if record.target.as_ref() == Some(&new_target) {
            None
        } else {
            record.target.replace(new_target.clone())
        };

        if let Some(previous) = previous {
            tracing::debug!(
                name = self.instance.name(),
                from = %previous,
                to = %new_target,
                "Record moved to another target"
            );
            self.sync.dirty.mark(previous);
        }
        self.sync.dirty.mark(new_target);
    }
}
