//! Registry of standard filter prototypes.
//!
//! The registry is an explicit value handed to the working copy and to the
//! persistence layer. It is read-only once built; callers clone prototypes
//! out of it.

use crate::error::PluginError;
use crate::models::Filter;
use anyhow::Context;
use camino::Utf8Path;
use std::fs;

#[derive(Debug, Clone, PartialEq)]
pub struct FilterRegistry {
    prototypes: Vec<Filter>,
}

impl FilterRegistry {
    /// Build a registry from prototypes. Internal names must be unique.
    pub fn new(prototypes: Vec<Filter>) -> Result<Self, PluginError> {
        for (i, filter) in prototypes.iter().enumerate() {
            if prototypes[..i]
                .iter()
                .any(|other| other.internal_name == filter.internal_name)
            {
                return Err(PluginError::FilterRegistry(format!(
                    "duplicate filter '{}'",
                    filter.internal_name
                )));
            }
        }
        Ok(Self { prototypes })
    }

    /// The filters every project starts out with.
    pub fn standard() -> Self {
        let prototypes = vec![
            Filter::new("DerivedFilesFilter", "Derived files")
                .with_description("Excludes files marked as derived (build output).")
                .enabled(true),
            Filter::new("FilesInSyncFilter", "Files in sync with repository")
                .with_description("Excludes files without outgoing changes."),
            Filter::new("FilesOlderThanOneDayFilter", "Files older than one day")
                .with_description("Excludes files not modified within the last day."),
            Filter::new("FilesFromPackageFilter", "Files from packages")
                .with_description("Excludes files located in the configured folders."),
            Filter::new("FileTypesFilter", "Checked file types")
                .with_description("Restricts checking to the configured file extensions.")
                .with_data(vec!["java".to_string()]),
            Filter::new("NonSrcDirsFilter", "Files outside source folders")
                .with_description("Excludes files not located in a source folder."),
            Filter::new("UnOpenedFilesFilter", "Unopened files")
                .with_description("Excludes files not open in an editor."),
            Filter::new("WriteProtectedFilesFilter", "Write protected files")
                .with_description("Excludes read-only files."),
        ];
        Self { prototypes }
    }

    /// Parse a YAML list of filter prototypes.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PluginError> {
        let prototypes: Vec<Filter> = serde_yaml_ng::from_str(yaml)
            .map_err(|e| PluginError::FilterRegistry(e.to_string()))?;
        Self::new(prototypes)
    }

    /// Load a registry definition file.
    pub fn load(path: &Utf8Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read filter registry: {}", path))?;
        let registry = Self::from_yaml_str(&contents)
            .with_context(|| format!("Failed to parse filter registry: {}", path))?;
        tracing::info!("Loaded {} filters from {}", registry.len(), path);
        Ok(registry)
    }

    pub fn filters(&self) -> &[Filter] {
        &self.prototypes
    }

    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    pub fn prototype(&self, internal_name: &str) -> Option<&Filter> {
        self.prototypes
            .iter()
            .find(|f| f.internal_name == internal_name)
    }

    /// One filter per registry entry, in registry order. A configured filter
    /// replaces the prototype with the same internal name; configured filters
    /// the registry does not know are dropped.
    pub fn merge(&self, configured: &[Filter]) -> Vec<Filter> {
        self.prototypes
            .iter()
            .map(|prototype| {
                configured
                    .iter()
                    .rev()
                    .find(|c| c.internal_name == prototype.internal_name)
                    .unwrap_or(prototype)
                    .clone()
            })
            .collect()
    }

    /// A filter is default when it equals its prototype. Filters without a
    /// prototype are never default.
    pub fn is_default(&self, filter: &Filter) -> bool {
        self.prototype(&filter.internal_name)
            .is_some_and(|prototype| prototype == filter)
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry() {
        let registry = FilterRegistry::standard();
        assert_eq!(registry.len(), 8);
        assert!(registry.prototype("DerivedFilesFilter").unwrap().enabled);
        assert!(!registry.prototype("NonSrcDirsFilter").unwrap().enabled);
        assert!(registry.prototype("NoSuchFilter").is_none());
    }

    #[test]
    fn test_merge_keeps_registry_order_and_overrides() {
        let registry = FilterRegistry::standard();
        let custom = Filter::new("NonSrcDirsFilter", "").enabled(true);
        let unknown = Filter::new("LegacyFilter", "").enabled(true);

        let merged = registry.merge(&[unknown, custom.clone()]);

        assert_eq!(merged.len(), registry.len());
        let names: Vec<_> = merged.iter().map(|f| f.internal_name.as_str()).collect();
        let expected: Vec<_> = registry
            .filters()
            .iter()
            .map(|f| f.internal_name.as_str())
            .collect();
        assert_eq!(names, expected);
        assert!(merged.contains(&custom));
        assert!(!merged.iter().any(|f| f.internal_name == "LegacyFilter"));
    }

    #[test]
    fn test_merge_of_nothing_is_defaults() {
        let registry = FilterRegistry::standard();
        assert_eq!(registry.merge(&[]), registry.filters());
    }

    #[test]
    fn test_is_default() {
        let registry = FilterRegistry::standard();
        let proto = registry.prototype("FileTypesFilter").unwrap().clone();
        assert!(registry.is_default(&proto));
        assert!(!registry.is_default(&proto.clone().with_data(vec!["xml".to_string()])));
        assert!(!registry.is_default(&Filter::new("Unknown", "")));
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
- internal_name: DerivedFilesFilter
  name: Derived files
  enabled: true
- internal_name: FileTypesFilter
  filter_data: [java, groovy]
"#;
        let registry = FilterRegistry::from_yaml_str(yaml).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.prototype("FileTypesFilter").unwrap().filter_data,
            vec!["java", "groovy"]
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let yaml = "- internal_name: A\n- internal_name: A\n";
        let err = FilterRegistry::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, PluginError::FilterRegistry(_)));
    }
}
