//! Desired-state instances the engine reconciles records against

use flatsync_fs::NormalizedPath;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Caller-owned description of the wanted state for one named resource.
///
/// The engine keeps a shared handle and only reads from it.
pub trait DesiredInstance: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// File this instance wants its record in, if not the kind's default.
    fn target(&self) -> Option<NormalizedPath> {
        None
    }

    /// Desired value of `attr`, if any.
    fn should(&self, attr: &str) -> Option<String>;

    /// Every attribute this instance can manage.
    fn valid_attributes(&self) -> Vec<String>;

    /// Record kind of the provider this instance selected, if it selected one.
    fn provider_kind(&self) -> Option<&str> {
        None
    }
}

/// Registered instances, keyed by name.
#[derive(Debug, Default, Clone)]
pub struct InstanceRegistry {
    instances: BTreeMap<String, Arc<dyn DesiredInstance>>,
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the instance previously registered under the same name.
    pub fn insert(&mut self, instance: Arc<dyn DesiredInstance>) -> Option<Arc<dyn DesiredInstance>> {
        self.instances.insert(instance.name().to_string(), instance)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn DesiredInstance>> {
        self.instances.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn DesiredInstance>> {
        self.instances.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn DesiredInstance>> {
        self.instances.values()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// A plain [`DesiredInstance`] built from literal values.
///
/// ```
/// use flatsync_core::{DesiredInstance, Resource};
///
/// let alice = Resource::new("alice")
///     .with_should("shell", "/bin/zsh")
///     .with_target("/etc/passwd.local");
///
/// assert_eq!(alice.should("shell").as_deref(), Some("/bin/zsh"));
/// assert_eq!(alice.valid_attributes(), vec!["shell".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Resource {
    name: String,
    target: Option<NormalizedPath>,
    should: BTreeMap<String, String>,
    attributes: Vec<String>,
    provider_kind: Option<String>,
}

impl Resource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<NormalizedPath>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Set a desired value; the attribute becomes valid if it was not already.
    pub fn with_should(mut self, attr: impl Into<String>, value: impl Into<String>) -> Self {
        let attr = attr.into();
        if !self.attributes.contains(&attr) {
            self.attributes.push(attr.clone());
        }
        self.should.insert(attr, value.into());
        self
    }

    pub fn with_attributes<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for attr in attrs {
            let attr = attr.into();
            if !self.attributes.contains(&attr) {
                self.attributes.push(attr);
            }
        }
        self
    }

    pub fn with_provider_kind(mut self, kind: impl Into<String>) -> Self {
        self.provider_kind = Some(kind.into());
        self
    }

    pub fn into_shared(self) -> Arc<dyn DesiredInstance> {
        Arc::new(self)
    }
}

impl DesiredInstance for Resource {
    fn name(&self) -> &str {
        &self.name
    }

    fn target(&self) -> Option<NormalizedPath> {
        self.target.clone()
    }

    fn should(&self, attr: &str) -> Option<String> {
        self.should.get(attr).cloned()
    }

    fn valid_attributes(&self) -> Vec<String> {
        self.attributes.clone()
    }

    fn provider_kind(&self) -> Option<&str> {
        self.provider_kind.as_deref()
    }
}
