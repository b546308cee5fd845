// Project configuration working copy
//
// Editable shadow of a committed ProjectConfiguration. Edits happen on deep
// copies of the file sets and filters; dirtiness is computed by comparing
// against the baseline, and store() writes the XML file and commits the
// local check configurations.

use crate::error::{PersistenceError, PluginError};
use crate::filters::FilterRegistry;
use crate::models::{
    CheckConfigRef, CheckConfiguration, CheckConfigurationWorkingCopy, FileSet, Filter,
    ProjectConfiguration, ProjectConfigurationView, ProjectHandle,
};
use crate::persistence::{PROJECT_CONFIGURATION_FILE, to_xml_bytes};
use crate::working_set::{CheckConfigurationWorkingSet, WorkingSetScope};
use camino::Utf8Path;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Working set shared between a working copy and its clones.
pub type SharedWorkingSet = Arc<RwLock<CheckConfigurationWorkingSet>>;

/// Modifiable project configuration.
///
/// # Equality
///
/// Two configurations are equal when project, simple-mode flag, file sets and
/// filters are equal. The check configuration working sets are not part of
/// equality; [`is_dirty`](Self::is_dirty) consults the local set separately.
///
/// # Cloning
///
/// `clone()` deep-copies file sets and filters but shares both working sets
/// with the original.
#[derive(Debug)]
pub struct ProjectConfigurationWorkingCopy {
    baseline: Arc<ProjectConfiguration>,
    registry: Arc<FilterRegistry>,
    local_config_working_set: SharedWorkingSet,
    global_config_working_set: SharedWorkingSet,
    file_sets: Vec<FileSet>,
    filters: Vec<Filter>,
    use_simple_config: bool,
}

impl ProjectConfigurationWorkingCopy {
    /// Create a working copy of `baseline`.
    ///
    /// Filters start out as the registry's standard filters, each replaced by
    /// the project's own settings where the baseline has a filter with the
    /// same internal name.
    pub fn new(
        baseline: Arc<ProjectConfiguration>,
        registry: Arc<FilterRegistry>,
        global_configs: &[Arc<CheckConfiguration>],
    ) -> Self {
        let local_config_working_set = CheckConfigurationWorkingSet::new(
            WorkingSetScope::Local,
            baseline.local_check_configs(),
        );
        let global_config_working_set =
            CheckConfigurationWorkingSet::new(WorkingSetScope::Global, global_configs);

        let file_sets = baseline.file_sets().to_vec();
        let filters = registry.merge(baseline.filters());
        let use_simple_config = baseline.use_simple_config();

        tracing::debug!(
            "Created working copy of {}: {} file sets, {} filters",
            baseline.project_name(),
            file_sets.len(),
            filters.len()
        );

        Self {
            baseline,
            registry,
            local_config_working_set: Arc::new(RwLock::new(local_config_working_set)),
            global_config_working_set: Arc::new(RwLock::new(global_config_working_set)),
            file_sets,
            filters,
            use_simple_config,
        }
    }

    /// The configuration this working copy was created from.
    pub fn baseline(&self) -> &Arc<ProjectConfiguration> {
        &self.baseline
    }

    pub fn registry(&self) -> &Arc<FilterRegistry> {
        &self.registry
    }

    pub fn local_check_config_working_set(&self) -> &SharedWorkingSet {
        &self.local_config_working_set
    }

    pub fn global_check_config_working_set(&self) -> &SharedWorkingSet {
        &self.global_config_working_set
    }

    /// Project local check configuration with the given name.
    pub fn local_check_config_by_name(&self, name: &str) -> Option<CheckConfigurationWorkingCopy> {
        read(&self.local_config_working_set).working_copy(name).cloned()
    }

    /// Global check configuration with the given name.
    pub fn global_check_config_by_name(&self, name: &str) -> Option<CheckConfigurationWorkingCopy> {
        read(&self.global_config_working_set).working_copy(name).cloned()
    }

    pub fn file_sets_mut(&mut self) -> &mut Vec<FileSet> {
        &mut self.file_sets
    }

    pub fn filters_mut(&mut self) -> &mut [Filter] {
        &mut self.filters
    }

    pub fn filter_mut(&mut self, internal_name: &str) -> Option<&mut Filter> {
        self.filters
            .iter_mut()
            .find(|f| f.internal_name == internal_name)
    }

    pub fn set_use_simple_config(&mut self, use_simple_config: bool) {
        self.use_simple_config = use_simple_config;
    }

    /// Remove a local check configuration unless a file set still uses it.
    ///
    /// A file set uses the configuration when its reference identifies the
    /// working copy, whatever edits happened since it was bound.
    /// Returns `Ok(None)` when no local configuration has that name.
    pub fn remove_local_check_config(
        &self,
        name: &str,
    ) -> Result<Option<CheckConfigurationWorkingCopy>, PluginError> {
        let in_use = {
            let set = read(&self.local_config_working_set);
            let Some(copy) = set.working_copy(name) else {
                return Ok(None);
            };
            self.file_sets
                .iter()
                .filter_map(|file_set| file_set.check_config.as_ref())
                .any(|reference| copy.is_referenced_by(reference))
        };
        if in_use {
            return Err(PluginError::ConfigInUse(name.to_string()));
        }

        Ok(write(&self.local_config_working_set).remove_check_configuration(name))
    }

    /// True if the configuration differs from the baseline or the local check
    /// configurations have uncommitted changes.
    pub fn is_dirty(&self) -> bool {
        !self.eq_configuration(self.baseline.as_ref())
            || read(&self.local_config_working_set).is_dirty()
    }

    /// Compare against any configuration view. The other side's filters are
    /// normalised through the registry first.
    pub fn eq_configuration(&self, other: &dyn ProjectConfigurationView) -> bool {
        self.project_name() == other.project_name()
            && self.use_simple_config == other.use_simple_config()
            && self.file_sets == other.file_sets()
            && self.filters == self.registry.merge(other.filters())
    }

    /// Serialize without writing anything.
    pub fn to_xml(&self) -> Result<Vec<u8>, PluginError> {
        to_xml_bytes(self, &self.registry).map_err(PluginError::WriteConfigurations)
    }

    /// Write the project configuration file and commit the local check
    /// configurations.
    ///
    /// The whole document is built in memory before the project file is
    /// touched, so a failure while serializing leaves the stored file as it
    /// was. The working copy itself is never modified by a failed store.
    pub fn store(&self) -> Result<(), PluginError> {
        self.store_to_persistence().map_err(|e| {
            tracing::error!("Storing configuration of {} failed: {}", self.project_name(), e);
            PluginError::WriteConfigurations(e)
        })
    }

    fn store_to_persistence(&self) -> Result<(), PersistenceError> {
        let buffer = to_xml_bytes(self, &self.registry)?;

        let project = self.project();
        let file = Utf8Path::new(PROJECT_CONFIGURATION_FILE);
        if project.file_exists(file) {
            project.set_contents(file, &buffer)?;
        } else {
            project.create_file(file, &buffer)?;
            project.refresh_local(file)?;
        }

        write(&self.local_config_working_set).store()?;

        tracing::info!(
            "Stored {} ({} bytes) in project {}",
            PROJECT_CONFIGURATION_FILE,
            buffer.len(),
            project.name()
        );
        Ok(())
    }
}

impl ProjectConfigurationView for ProjectConfigurationWorkingCopy {
    fn project(&self) -> &ProjectHandle {
        self.baseline.project()
    }

    fn local_check_configurations(&self) -> Vec<CheckConfiguration> {
        read(&self.local_config_working_set)
            .working_copies()
            .iter()
            .map(|c| c.config().clone())
            .collect()
    }

    fn file_sets(&self) -> &[FileSet] {
        &self.file_sets
    }

    fn filters(&self) -> &[Filter] {
        &self.filters
    }

    fn use_simple_config(&self) -> bool {
        self.use_simple_config
    }

    /// Local configurations first, then global ones; a reference to a
    /// configuration neither set knows keeps its own view.
    fn resolve_check_config(&self, reference: &CheckConfigRef) -> CheckConfiguration {
        [&self.local_config_working_set, &self.global_config_working_set]
            .into_iter()
            .find_map(|set| {
                read(set)
                    .referenced_by(reference)
                    .map(|copy| copy.config().clone())
            })
            .unwrap_or_else(|| reference.config().clone())
    }
}

impl Clone for ProjectConfigurationWorkingCopy {
    fn clone(&self) -> Self {
        Self {
            baseline: Arc::clone(&self.baseline),
            registry: Arc::clone(&self.registry),
            local_config_working_set: Arc::clone(&self.local_config_working_set),
            global_config_working_set: Arc::clone(&self.global_config_working_set),
            file_sets: self.file_sets.iter().cloned().collect(),
            filters: self.filters.iter().cloned().collect(),
            use_simple_config: self.use_simple_config,
        }
    }
}

impl PartialEq for ProjectConfigurationWorkingCopy {
    fn eq(&self, other: &Self) -> bool {
        self.project_name() == other.project_name()
            && self.use_simple_config == other.use_simple_config
            && self.file_sets == other.file_sets
            && self.filters == other.filters
    }
}

impl Eq for ProjectConfigurationWorkingCopy {}

impl Hash for ProjectConfigurationWorkingCopy {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.project_name().hash(state);
        self.use_simple_config.hash(state);
        self.file_sets.hash(state);
        self.filters.hash(state);
    }
}

fn read(set: &SharedWorkingSet) -> RwLockReadGuard<'_, CheckConfigurationWorkingSet> {
    set.read().unwrap_or_else(PoisonError::into_inner)
}

fn write(set: &SharedWorkingSet) -> RwLockWriteGuard<'_, CheckConfigurationWorkingSet> {
    set.write().unwrap_or_else(PoisonError::into_inner)
}
