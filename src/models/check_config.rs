use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_WORKING_COPY_ID: AtomicU64 = AtomicU64::new(1);

/// Kind of a check configuration, identified in XML by its internal name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigurationType {
    /// Shipped with the plugin; never persisted per project.
    #[serde(rename = "builtin")]
    BuiltIn,
    /// File somewhere in the local filesystem.
    External,
    /// File inside the workspace project tree.
    Project,
    /// Fetched from a URL.
    Remote,
}

impl ConfigurationType {
    pub fn internal_name(&self) -> &'static str {
        match self {
            Self::BuiltIn => "builtin",
            Self::External => "external",
            Self::Project => "project",
            Self::Remote => "remote",
        }
    }

    pub fn from_internal_name(name: &str) -> Option<Self> {
        match name {
            "builtin" => Some(Self::BuiltIn),
            "external" => Some(Self::External),
            "project" => Some(Self::Project),
            "remote" => Some(Self::Remote),
            _ => None,
        }
    }

    pub fn is_built_in(&self) -> bool {
        matches!(self, Self::BuiltIn)
    }
}

/// A named, typed definition of lint rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckConfiguration {
    pub name: String,
    pub location: String,
    #[serde(rename = "type")]
    pub config_type: ConfigurationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Extra type-specific key/value data, kept in insertion order.
    #[serde(default)]
    pub additional_data: IndexMap<String, String>,
    #[serde(default)]
    pub global: bool,
}

impl CheckConfiguration {
    pub fn new(
        name: impl Into<String>,
        location: impl Into<String>,
        config_type: ConfigurationType,
        global: bool,
    ) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            config_type,
            description: None,
            additional_data: IndexMap::new(),
            global,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_additional_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.additional_data.insert(key.into(), value.into());
        self
    }

    /// Only non-built-in, project-local configurations go into the project file.
    pub fn is_persisted_per_project(&self) -> bool {
        !self.config_type.is_built_in() && !self.global
    }
}

// IndexMap has no Hash impl; the identifying fields are enough and stay
// consistent with the derived PartialEq.
impl Hash for CheckConfiguration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.location.hash(state);
        self.config_type.hash(state);
        self.global.hash(state);
    }
}

/// Identity of a check configuration working copy. Clones and commits keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkingCopyId(u64);

impl WorkingCopyId {
    fn next() -> Self {
        Self(NEXT_WORKING_COPY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Editable copy of a check configuration that remembers where it came from.
///
/// File sets refer to a working copy either by holding a clone of it (same
/// [`WorkingCopyId`]) or by holding the `Arc` it was opened from. Both stay
/// valid while the copy is edited, renamed or committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConfigurationWorkingCopy {
    id: WorkingCopyId,
    /// Configuration the copy was opened from; unlike `source` it survives commits.
    origin: Option<Arc<CheckConfiguration>>,
    source: Option<Arc<CheckConfiguration>>,
    config: CheckConfiguration,
}

impl CheckConfigurationWorkingCopy {
    /// Working copy of an existing configuration.
    pub fn of(source: Arc<CheckConfiguration>) -> Self {
        let config = (*source).clone();
        Self {
            id: WorkingCopyId::next(),
            origin: Some(Arc::clone(&source)),
            source: Some(source),
            config,
        }
    }

    /// Working copy of a configuration that has never been committed.
    pub fn new_unsaved(config: CheckConfiguration) -> Self {
        Self {
            id: WorkingCopyId::next(),
            origin: None,
            source: None,
            config,
        }
    }

    pub fn id(&self) -> WorkingCopyId {
        self.id
    }

    pub fn config(&self) -> &CheckConfiguration {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut CheckConfiguration {
        &mut self.config
    }

    /// The configuration this copy was made from, if any.
    pub fn source_check_configuration(&self) -> Option<&Arc<CheckConfiguration>> {
        self.source.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        match &self.source {
            Some(source) => **source != self.config,
            None => true,
        }
    }

    /// True if `reference` points at this copy by identity: a clone of it, or
    /// the `Arc` it was opened from or last committed as.
    pub fn is_identified_by(&self, reference: &CheckConfigRef) -> bool {
        match reference {
            CheckConfigRef::WorkingCopy(other) => other.id == self.id,
            CheckConfigRef::Config(config) => [&self.origin, &self.source]
                .into_iter()
                .flatten()
                .any(|known| Arc::ptr_eq(known, config)),
        }
    }

    /// Identity first, then value equality with the current or committed state.
    pub fn is_referenced_by(&self, reference: &CheckConfigRef) -> bool {
        self.is_identified_by(reference)
            || reference.matches(&self.config)
            || self
                .source
                .as_ref()
                .is_some_and(|source| reference.matches(source))
    }

    /// Make the current state the new source and return it.
    pub(crate) fn commit(&mut self) -> Arc<CheckConfiguration> {
        let committed = Arc::new(self.config.clone());
        self.source = Some(Arc::clone(&committed));
        committed
    }
}

/// Reference from a file set to the check configuration it is audited with.
#[derive(Debug, Clone)]
pub enum CheckConfigRef {
    Config(Arc<CheckConfiguration>),
    WorkingCopy(CheckConfigurationWorkingCopy),
}

impl CheckConfigRef {
    /// The configuration as it currently reads.
    pub fn config(&self) -> &CheckConfiguration {
        match self {
            Self::Config(config) => config,
            Self::WorkingCopy(copy) => copy.config(),
        }
    }

    /// Unwrap a working copy to its source configuration.
    pub fn source(&self) -> Option<&Arc<CheckConfiguration>> {
        match self {
            Self::Config(_) => None,
            Self::WorkingCopy(copy) => copy.source_check_configuration(),
        }
    }

    /// True if this reference denotes `config`, either directly or through
    /// the source of a working copy.
    pub fn matches(&self, config: &CheckConfiguration) -> bool {
        self.config() == config || self.source().is_some_and(|source| **source == *config)
    }
}

impl PartialEq for CheckConfigRef {
    fn eq(&self, other: &Self) -> bool {
        self.config() == other.config()
    }
}

impl Eq for CheckConfigRef {}

impl Hash for CheckConfigRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.config().hash(state);
    }
}

impl From<Arc<CheckConfiguration>> for CheckConfigRef {
    fn from(config: Arc<CheckConfiguration>) -> Self {
        Self::Config(config)
    }
}

impl From<CheckConfiguration> for CheckConfigRef {
    fn from(config: CheckConfiguration) -> Self {
        Self::Config(Arc::new(config))
    }
}
