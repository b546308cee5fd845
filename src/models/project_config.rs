use super::check_config::{CheckConfigRef, CheckConfiguration};
use super::file_set::FileSet;
use super::filter::Filter;
use crate::project::ProjectResources;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a project.
pub type ProjectHandle = Arc<dyn ProjectResources>;

/// Read contract shared by committed configurations and working copies, so
/// an in-progress edit can be treated exactly like a stored configuration.
pub trait ProjectConfigurationView {
    fn project(&self) -> &ProjectHandle;

    fn local_check_configurations(&self) -> Vec<CheckConfiguration>;

    fn file_sets(&self) -> &[FileSet];

    fn filters(&self) -> &[Filter];

    fn use_simple_config(&self) -> bool;

    /// Project identity.
    fn project_name(&self) -> String {
        self.project().name()
    }

    /// Current state of the check configuration `reference` points at.
    ///
    /// Committed configurations are immutable, so the reference's own view is
    /// current. Working copies resolve it through their working sets.
    fn resolve_check_config(&self, reference: &CheckConfigRef) -> CheckConfiguration {
        reference.config().clone()
    }

    /// True if any file set references `config` directly, through the source
    /// of a check configuration working copy, or by resolving to it.
    fn is_config_in_use(&self, config: &CheckConfiguration) -> bool {
        self.file_sets()
            .iter()
            .filter_map(|file_set| file_set.check_config.as_ref())
            .any(|reference| {
                reference.matches(config) || self.resolve_check_config(reference) == *config
            })
    }
}

/// Committed, immutable project configuration.
#[derive(Clone)]
pub struct ProjectConfiguration {
    project: ProjectHandle,
    local_check_configs: Vec<Arc<CheckConfiguration>>,
    file_sets: Vec<FileSet>,
    filters: Vec<Filter>,
    use_simple_config: bool,
}

impl ProjectConfiguration {
    pub fn new(
        project: ProjectHandle,
        local_check_configs: Vec<Arc<CheckConfiguration>>,
        file_sets: Vec<FileSet>,
        filters: Vec<Filter>,
        use_simple_config: bool,
    ) -> Self {
        Self {
            project,
            local_check_configs,
            file_sets,
            filters,
            use_simple_config,
        }
    }

    /// Configuration of a project that has never been configured.
    pub fn empty(project: ProjectHandle, filters: Vec<Filter>) -> Self {
        Self::new(project, Vec::new(), Vec::new(), filters, true)
    }

    pub fn local_check_configs(&self) -> &[Arc<CheckConfiguration>] {
        &self.local_check_configs
    }
}

impl ProjectConfigurationView for ProjectConfiguration {
    fn project(&self) -> &ProjectHandle {
        &self.project
    }

    fn local_check_configurations(&self) -> Vec<CheckConfiguration> {
        self.local_check_configs
            .iter()
            .map(|config| (**config).clone())
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
}

impl fmt::Debug for ProjectConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectConfiguration")
            .field("project", &self.project.name())
            .field("local_check_configs", &self.local_check_configs)
            .field("file_sets", &self.file_sets)
            .field("filters", &self.filters)
            .field("use_simple_config", &self.use_simple_config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CheckConfigurationWorkingCopy, ConfigurationType};
    use crate::project::FsProject;

    #[test]
    fn test_config_in_use_directly_and_through_working_copy() {
        let team = Arc::new(CheckConfiguration::new(
            "Team",
            "team.xml",
            ConfigurationType::Project,
            false,
        ));
        let unused = CheckConfiguration::new("Other", "other.xml", ConfigurationType::Project, false);

        let mut copy = CheckConfigurationWorkingCopy::of(Arc::clone(&team));
        copy.config_mut().name = "Team v2".to_string();

        let config = ProjectConfiguration::new(
            Arc::new(FsProject::new("/tmp/demo")),
            vec![Arc::clone(&team)],
            vec![FileSet::new("All", Some(crate::models::CheckConfigRef::WorkingCopy(copy)))],
            Vec::new(),
            false,
        );

        assert!(config.is_config_in_use(&team));
        assert!(!config.is_config_in_use(&unused));
        assert_eq!(config.project_name(), "demo");
    }

    #[test]
    fn test_file_set_without_config_is_not_a_use() {
        let team = CheckConfiguration::new("Team", "team.xml", ConfigurationType::Project, false);
        let config = ProjectConfiguration::new(
            Arc::new(FsProject::new("/tmp/demo")),
            Vec::new(),
            vec![FileSet::new("All", None)],
            Vec::new(),
            true,
        );
        assert!(!config.is_config_in_use(&team));
    }
}
