// Check configuration working sets
//
// Editable collections of check configurations with their own dirty flag.
// The project working copy holds one for the project-local configurations
// and one for the global configurations.

use crate::error::PersistenceError;
use crate::models::{CheckConfigRef, CheckConfiguration, CheckConfigurationWorkingCopy};
use std::sync::Arc;

/// Which configurations a working set manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkingSetScope {
    Local,
    Global,
}

impl WorkingSetScope {
    fn is_global(self) -> bool {
        matches!(self, Self::Global)
    }
}

#[derive(Debug, Clone)]
pub struct CheckConfigurationWorkingSet {
    scope: WorkingSetScope,
    /// Configurations as last committed.
    originals: Vec<Arc<CheckConfiguration>>,
    working_copies: Vec<CheckConfigurationWorkingCopy>,
    /// Committed configurations removed since the last store.
    deleted: Vec<Arc<CheckConfiguration>>,
}

impl CheckConfigurationWorkingSet {
    pub fn new(scope: WorkingSetScope, configs: &[Arc<CheckConfiguration>]) -> Self {
        Self {
            scope,
            originals: configs.to_vec(),
            working_copies: configs
                .iter()
                .map(|c| CheckConfigurationWorkingCopy::of(Arc::clone(c)))
                .collect(),
            deleted: Vec::new(),
        }
    }

    pub fn empty(scope: WorkingSetScope) -> Self {
        Self::new(scope, &[])
    }

    pub fn scope(&self) -> WorkingSetScope {
        self.scope
    }

    pub fn working_copies(&self) -> &[CheckConfigurationWorkingCopy] {
        &self.working_copies
    }

    pub fn working_copy(&self, name: &str) -> Option<&CheckConfigurationWorkingCopy> {
        self.working_copies.iter().find(|c| c.config().name == name)
    }

    pub fn working_copy_mut(&mut self, name: &str) -> Option<&mut CheckConfigurationWorkingCopy> {
        self.working_copies
            .iter_mut()
            .find(|c| c.config().name == name)
    }

    /// The working copy a file set reference points at. Identity wins over
    /// value equality.
    pub fn referenced_by(
        &self,
        reference: &CheckConfigRef,
    ) -> Option<&CheckConfigurationWorkingCopy> {
        self.working_copies
            .iter()
            .find(|c| c.is_identified_by(reference))
            .or_else(|| {
                self.working_copies
                    .iter()
                    .find(|c| c.is_referenced_by(reference))
            })
    }

    pub fn is_name_unique(&self, name: &str) -> bool {
        self.working_copy(name).is_none()
    }

    /// Add a new configuration. Its global flag is forced to match the scope.
    pub fn add_check_configuration(
        &mut self,
        mut config: CheckConfiguration,
    ) -> Result<(), PersistenceError> {
        if !self.is_name_unique(&config.name) {
            return Err(PersistenceError::DuplicateName(config.name));
        }
        config.global = self.scope.is_global();
        tracing::debug!("Adding check configuration '{}' ({:?})", config.name, self.scope);
        self.working_copies
            .push(CheckConfigurationWorkingCopy::new_unsaved(config));
        Ok(())
    }

    /// Remove a configuration by name and return its working copy.
    pub fn remove_check_configuration(
        &mut self,
        name: &str,
    ) -> Option<CheckConfigurationWorkingCopy> {
        let index = self
            .working_copies
            .iter()
            .position(|c| c.config().name == name)?;
        let removed = self.working_copies.remove(index);
        if let Some(source) = removed.source_check_configuration() {
            self.deleted.push(Arc::clone(source));
        }
        Some(removed)
    }

    pub fn is_dirty(&self) -> bool {
        !self.deleted.is_empty()
            || self.working_copies.len() != self.originals.len()
            || self.working_copies.iter().any(|c| c.is_dirty())
    }

    /// Commit all working copies; they become the new originals.
    pub fn store(&mut self) -> Result<(), PersistenceError> {
        let was_dirty = self.is_dirty();
        self.originals = self.working_copies.iter_mut().map(|c| c.commit()).collect();
        self.deleted.clear();
        if was_dirty {
            tracing::info!(
                "Committed {} {:?} check configurations",
                self.originals.len(),
                self.scope
            );
        }
        Ok(())
    }

    /// Configurations as last committed.
    pub fn committed(&self) -> &[Arc<CheckConfiguration>] {
        &self.originals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ConfigurationType;

    fn team() -> Arc<CheckConfiguration> {
        Arc::new(CheckConfiguration::new(
            "Team",
            "team.xml",
            ConfigurationType::Project,
            false,
        ))
    }

    #[test]
    fn test_fresh_set_is_clean() {
        let set = CheckConfigurationWorkingSet::new(WorkingSetScope::Local, &[team()]);
        assert!(!set.is_dirty());
        assert_eq!(set.working_copies().len(), 1);
    }

    #[test]
    fn test_add_forces_scope_and_unique_name() {
        let mut set = CheckConfigurationWorkingSet::new(WorkingSetScope::Global, &[team()]);
        let dup = CheckConfiguration::new("Team", "x.xml", ConfigurationType::External, false);
        assert!(matches!(
            set.add_check_configuration(dup),
            Err(PersistenceError::DuplicateName(name)) if name == "Team"
        ));

        let other = CheckConfiguration::new("Other", "x.xml", ConfigurationType::External, false);
        set.add_check_configuration(other).unwrap();
        assert!(set.working_copy("Other").unwrap().config().global);
        assert!(set.is_dirty());
    }

    #[test]
    fn test_edit_remove_and_store() {
        let mut set = CheckConfigurationWorkingSet::new(WorkingSetScope::Local, &[team()]);

        set.working_copy_mut("Team").unwrap().config_mut().location = "new.xml".to_string();
        assert!(set.is_dirty());

        set.store().unwrap();
        assert!(!set.is_dirty());
        assert_eq!(set.committed()[0].location, "new.xml");

        assert!(set.remove_check_configuration("Team").is_some());
        assert!(set.is_dirty());
        assert!(set.remove_check_configuration("Team").is_none());

        set.store().unwrap();
        assert!(!set.is_dirty());
        assert!(set.committed().is_empty());
    }

    #[test]
    fn test_referenced_by_follows_renames() {
        let original = team();
        let mut set =
            CheckConfigurationWorkingSet::new(WorkingSetScope::Local, &[Arc::clone(&original)]);
        let by_arc = CheckConfigRef::Config(Arc::clone(&original));
        let by_copy = CheckConfigRef::WorkingCopy(set.working_copy("Team").unwrap().clone());

        set.working_copy_mut("Team").unwrap().config_mut().name = "Renamed".to_string();
        set.store().unwrap();
        set.working_copy_mut("Renamed").unwrap().config_mut().location = "moved.xml".to_string();

        for reference in [&by_arc, &by_copy] {
            let found = set.referenced_by(reference).unwrap();
            assert_eq!(found.config().name, "Renamed");
            assert_eq!(found.config().location, "moved.xml");
        }

        let stranger = CheckConfigRef::from(CheckConfiguration::new(
            "Other",
            "other.xml",
            ConfigurationType::External,
            false,
        ));
        assert!(set.referenced_by(&stranger).is_none());
    }
}
