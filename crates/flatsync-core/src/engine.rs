//! FlatFileSync: the engine owning one record kind
//!
//! Holds the record store, target registry, dirty set and registered
//! instances for a single record kind. All mutation goes through `&mut self`,
//! so prefetch, flush and attribute writes are serialized by ownership.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use flatsync_fs::BackingFile;

use crate::config::KindConfig;
use crate::dirty::DirtySet;
use crate::flush;
use crate::format::RecordFormat;
use crate::instance::{DesiredInstance, InstanceRegistry};
use crate::proxy::FieldProxy;
use crate::record::{CleanRecord, Ensure, Record};
use crate::store::{RecordId, RecordStore};
use crate::target::{Target, TargetRegistry};
use crate::{Error, Result};

/// Where an instance's record lives.
#[derive(Debug, Clone)]
pub(crate) enum Binding {
    /// In the store, shared with the flusher.
    Stored(RecordId),
    /// Owned by the instance until its first flush.
    Detached(Record),
}

/// Synchronization engine for one record kind.
///
/// # Example
///
/// ```ignore
/// let mut sync = FlatFileSync::new(KindConfig::new("passwd", "/etc/passwd"), DelimitedFormat::passwd())?;
/// sync.register(Resource::new("alice").with_should("shell", "/bin/zsh").into_shared());
/// sync.prefetch()?;
/// sync.proxy("alice")?.set("shell", "/bin/zsh")?;
/// sync.proxy("alice")?.flush()?;
/// ```
#[derive(Debug)]
pub struct FlatFileSync<F: RecordFormat> {
    pub(crate) config: KindConfig,
    pub(crate) format: F,
    pub(crate) targets: TargetRegistry,
    pub(crate) store: RecordStore,
    pub(crate) dirty: DirtySet,
    pub(crate) instances: InstanceRegistry,
    pub(crate) bindings: HashMap<String, Binding>,
}

impl<F: RecordFormat> FlatFileSync<F> {
    /// Create the engine for the kind described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDefaultTarget`] if the configuration names no
    /// default target; there is no file to synchronize against.
    pub fn new(config: KindConfig, format: F) -> Result<Self> {
        let default_path = config
            .default_target
            .clone()
            .ok_or_else(|| Error::MissingDefaultTarget {
                kind: format.kind().to_string(),
            })?;

        tracing::debug!(kind = format.kind(), default_target = %default_path, "Creating sync engine");

        Ok(Self {
            targets: TargetRegistry::new(default_path, config.filetype),
            config,
            format,
            store: RecordStore::new(),
            dirty: DirtySet::new(),
            instances: InstanceRegistry::new(),
            bindings: HashMap::new(),
        })
    }

    /// Record kind this engine manages.
    pub fn kind(&self) -> &str {
        self.format.kind()
    }

    pub fn config(&self) -> &KindConfig {
        &self.config
    }

    pub fn format(&self) -> &F {
        &self.format
    }

    pub fn default_target(&self) -> &Target {
        self.targets.default_target()
    }

    /// The target for `path`.
    pub fn target(&self, path: impl Into<flatsync_fs::NormalizedPath>) -> Target {
        self.targets.target(path)
    }

    /// Use a specific backing file for its path instead of opening one.
    pub fn attach_backing(&mut self, file: Box<dyn BackingFile>) -> Target {
        self.targets.attach(file)
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn instances(&self) -> &InstanceRegistry {
        &self.instances
    }

    /// Targets with pending writes, in flush order.
    pub fn dirty_targets(&self) -> Vec<Target> {
        self.dirty.snapshot()
    }

    pub fn is_dirty(&self, target: &Target) -> bool {
        self.dirty.contains(target)
    }

    /// Register a desired instance and bind it to its record.
    ///
    /// An instance whose name matches a cached record of this kind is bound
    /// to it, unless it belongs to another kind's provider; otherwise it gets
    /// a fresh record that does not exist yet.
    pub fn register(&mut self, instance: Arc<dyn DesiredInstance>) {
        let name = instance.name().to_string();
        let cached = self
            .store
            .find(self.format.kind(), &name)
            .filter(|_| self.manages(instance.as_ref()));
        let binding = match cached {
            Some(id) => Binding::Stored(id),
            None => Binding::Detached(Record::unbound(self.format.kind())),
        };
        self.bindings.insert(name, binding);
        self.instances.insert(instance);
    }

    /// Drop an instance and its binding. Records in the store are untouched.
    pub fn unregister(&mut self, name: &str) -> Option<Arc<dyn DesiredInstance>> {
        self.bindings.remove(name);
        self.instances.remove(name)
    }

    /// Accessor for the record bound to the instance `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownInstance`] if no instance has that name.
    pub fn proxy(&mut self, name: &str) -> Result<FieldProxy<'_, F>> {
        let instance = self
            .instances
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownInstance {
                name: name.to_string(),
            })?;
        Ok(FieldProxy::new(self, instance))
    }

    /// Rebuild the store from every known target.
    ///
    /// Targets are the default target, every target named by a registered
    /// instance, and every target opened before. Instances are re-bound to
    /// the fresh records.
    ///
    /// # Errors
    ///
    /// A read or parse failure of any target aborts the whole cycle.
    pub fn prefetch(&mut self) -> Result<()> {
        self.detach_bindings();
        self.store.clear();

        for target in self.prefetch_targets() {
            self.load_target(&target)?;
        }
        self.bind_records(0);

        tracing::debug!(kind = self.kind(), records = self.store.len(), "Prefetch complete");
        Ok(())
    }

    /// Read and parse one target, appending its records and binding them.
    pub fn prefetch_target(&mut self, target: &Target) -> Result<()> {
        let start = self.store.len();
        self.load_target(target)?;
        self.bind_records(start);
        Ok(())
    }

    /// Read and parse one target, appending its records unbound.
    fn load_target(&mut self, target: &Target) -> Result<()> {
        let text = self.targets.file(target).read()?;
        let text = flush::strip_header(&text);
        if text.is_empty() {
            tracing::debug!(target = %target, "Target is empty or missing");
            return Ok(());
        }

        let parsed = self.format.parse(&text).map_err(|e| Error::Prefetch {
            target: target.path().clone(),
            source: Box::new(e),
        })?;

        let start = self.store.len();
        for mut record in parsed {
            record.on_disk = true;
            record.ensure = Some(Ensure::Present);
            record.target = Some(target.clone());
            self.store.push(record);
        }
        tracing::debug!(target = %target, records = self.store.len() - start, "Prefetched target");
        Ok(())
    }

    /// Every record of this kind as currently on disk.
    ///
    /// Runs a fresh [`prefetch`](Self::prefetch) first.
    pub fn list(&mut self) -> Result<Vec<CleanRecord>> {
        self.prefetch()?;
        Ok(self
            .store
            .of_kind(self.format.kind())
            .map(Record::clean)
            .collect())
    }

    pub fn list_by_name(&mut self) -> Result<Vec<String>> {
        Ok(self.list()?.into_iter().map(|r| r.name).collect())
    }

    /// Whether a record with this name is cached.
    pub fn record_exists(&self, name: &str) -> bool {
        self.store.contains(name)
    }

    /// Forget every cached record and backing file handle.
    pub fn clear(&mut self) {
        self.detach_bindings();
        self.store.clear();
        self.targets.clear();
    }

    fn prefetch_targets(&self) -> BTreeSet<Target> {
        let mut targets = BTreeSet::new();
        targets.insert(self.targets.default_target().clone());
        targets.extend(self.targets.known());
        targets.extend(
            self.instances
                .iter()
                .filter_map(|instance| instance.target())
                .map(|path| self.targets.target(path)),
        );
        targets
    }

    /// Move stored records into their bindings before the store is reset.
    fn detach_bindings(&mut self) {
        for binding in self.bindings.values_mut() {
            if let Binding::Stored(id) = binding
                && let Some(record) = self.store.get(*id)
            {
                *binding = Binding::Detached(record.clone());
            }
        }
    }

    /// Target an instance's record belongs in.
    pub(crate) fn instance_target(&self, instance: &dyn DesiredInstance) -> Target {
        match instance.target() {
            Some(path) => self.targets.target(path),
            None => self.targets.default_target().clone(),
        }
    }

    pub(crate) fn bound_record(&self, name: &str) -> Option<&Record> {
        match self.bindings.get(name)? {
            Binding::Stored(id) => self.store.get(*id),
            Binding::Detached(record) => Some(record),
        }
    }

    pub(crate) fn bound_record_mut(&mut self, name: &str) -> &mut Record {
        let kind = self.format.kind();
        let binding = self
            .bindings
            .entry(name.to_string())
            .or_insert_with(|| Binding::Detached(Record::unbound(kind)));
        match binding {
            Binding::Stored(id) => &mut self.store[*id],
            Binding::Detached(record) => record,
        }
    }
}
