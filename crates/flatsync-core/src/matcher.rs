//! Binding freshly parsed records to registered instances

use crate::engine::{Binding, FlatFileSync};
use crate::format::RecordFormat;
use crate::instance::DesiredInstance;
use crate::store::RecordId;

/// Outcome of matching one record by name.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NameMatch {
    /// An instance of this kind has the record's name.
    Bound(String),
    /// The instance with that name belongs to another kind's provider.
    Foreign,
    /// No instance has the record's name.
    Unclaimed,
}

impl<F: RecordFormat> FlatFileSync<F> {
    /// Whether this engine manages `instance`.
    pub(crate) fn manages(&self, instance: &dyn DesiredInstance) -> bool {
        instance
            .provider_kind()
            .is_none_or(|kind| kind == self.format.kind())
    }

    /// Bind every record of this kind added at or after `start`.
    ///
    /// Names are matched first across all the new records, so the custom
    /// predicate never renames a record onto a name another record holds.
    /// Records nobody claims stay in the store unmanaged.
    pub(crate) fn bind_records(&mut self, start: usize) {
        let kind = self.format.kind();
        let ids: Vec<RecordId> = self
            .store
            .ids_from(start)
            .filter(|id| self.store[*id].record_kind == kind)
            .collect();

        let mut unclaimed = Vec::new();
        for id in ids {
            match self.match_name(id) {
                NameMatch::Bound(name) => {
                    self.bindings.insert(name, Binding::Stored(id));
                }
                NameMatch::Foreign => {}
                NameMatch::Unclaimed => unclaimed.push(id),
            }
        }

        for id in unclaimed {
            if let Some(name) = self.match_predicate(id) {
                tracing::debug!(
                    record = %self.store[id].name,
                    instance = %name,
                    "Record claimed by custom match"
                );
                self.store[id].name = name.clone();
                self.bindings.insert(name, Binding::Stored(id));
            }
        }
    }

    fn match_name(&self, id: RecordId) -> NameMatch {
        let record = &self.store[id];
        match self.instances.get(&record.name) {
            Some(instance) if self.manages(instance.as_ref()) => NameMatch::Bound(record.name.clone()),
            Some(_) => {
                tracing::debug!(record = %record.name, "Instance belongs to another provider");
                NameMatch::Foreign
            }
            None => NameMatch::Unclaimed,
        }
    }

    fn match_predicate(&self, id: RecordId) -> Option<String> {
        let kind = self.format.kind();
        let record = &self.store[id];

        match self.format.match_record(record, &self.instances) {
            Ok(Some(name)) => {
                let Some(instance) = self.instances.get(&name) else {
                    tracing::debug!(instance = %name, "Custom match named an unregistered instance");
                    return None;
                };
                if !self.manages(instance.as_ref()) {
                    return None;
                }
                if self.store.find(kind, &name).is_some() {
                    tracing::debug!(instance = %name, "Custom match would duplicate an existing record");
                    return None;
                }
                Some(name)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(record = %record.name, error = %e, "Custom match failed; leaving record unmanaged");
                None
            }
        }
    }
}
