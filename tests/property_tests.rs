//! Property tests for working copy construction and cloning
//!
//! For arbitrary baselines:
//! - a fresh working copy is not dirty
//! - a clone equals its original and hashes the same
//! - editing the copy leaves the baseline untouched
//! - storing and reloading reproduces the configuration

use camino::Utf8PathBuf;
use fileset_config::persistence::read_project_configuration;
use fileset_config::{
    CheckConfigRef, CheckConfiguration, ConfigurationType, FileMatchPattern, FileSet, Filter,
    FilterRegistry, FsProject, ProjectConfiguration, ProjectConfigurationView,
    ProjectConfigurationWorkingCopy,
};
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tempfile::TempDir;

fn global_configs() -> Vec<Arc<CheckConfiguration>> {
    vec![Arc::new(CheckConfiguration::new(
        "Sun Checks",
        "sun_checks.xml",
        ConfigurationType::BuiltIn,
        true,
    ))]
}

fn arb_pattern() -> impl Strategy<Value = FileMatchPattern> {
    ("[a-zA-Z0-9_./*$]{0,12}", any::<bool>()).prop_map(|(pattern, include)| FileMatchPattern {
        match_pattern: Some(pattern),
        include_pattern: include,
    })
}

fn arb_file_set() -> impl Strategy<Value = FileSet> {
    (
        "[A-Za-z][A-Za-z0-9 ]{0,15}",
        any::<bool>(),
        prop::collection::vec(arb_pattern(), 0..4),
    )
        .prop_map(|(name, enabled, patterns)| {
            let mut file_set = FileSet::new(
                name,
                Some(CheckConfigRef::Config(Arc::clone(&global_configs()[0]))),
            );
            file_set.enabled = enabled;
            file_set.file_match_patterns = patterns;
            file_set
        })
}

/// Random subset of registry filters with random customisations.
fn arb_filters() -> impl Strategy<Value = Vec<Filter>> {
    let prototypes = FilterRegistry::standard().filters().to_vec();
    let count = prototypes.len();
    prop::collection::vec(
        (
            any::<bool>(),
            any::<bool>(),
            prop::collection::vec("[a-z<&\"]{1,6}", 0..3),
        ),
        count,
    )
    .prop_map(move |choices| {
        prototypes
            .iter()
            .zip(choices)
            .filter(|(_, (customise, _, _))| *customise)
            .map(|(prototype, (_, enabled, data))| {
                prototype.clone().enabled(enabled).with_data(data)
            })
            .collect()
    })
}

fn arb_baseline_parts() -> impl Strategy<Value = (Vec<FileSet>, Vec<Filter>, bool)> {
    (
        prop::collection::vec(arb_file_set(), 0..4),
        arb_filters(),
        any::<bool>(),
    )
}

fn working_copy(
    project: Arc<FsProject>,
    (file_sets, filters, simple): (Vec<FileSet>, Vec<Filter>, bool),
) -> (Arc<ProjectConfiguration>, ProjectConfigurationWorkingCopy) {
    let baseline = Arc::new(ProjectConfiguration::new(
        project,
        Vec::new(),
        file_sets,
        filters,
        simple,
    ));
    let copy = ProjectConfigurationWorkingCopy::new(
        Arc::clone(&baseline),
        Arc::new(FilterRegistry::standard()),
        &global_configs(),
    );
    (baseline, copy)
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

proptest! {
    #[test]
    fn fresh_working_copy_is_clean(parts in arb_baseline_parts()) {
        let (_, copy) = working_copy(Arc::new(FsProject::new("/work/demo")), parts);
        prop_assert!(!copy.is_dirty());
    }

    #[test]
    fn clone_equals_original(parts in arb_baseline_parts()) {
        let (_, copy) = working_copy(Arc::new(FsProject::new("/work/demo")), parts);
        let clone = copy.clone();
        prop_assert_eq!(&clone, &copy);
        prop_assert_eq!(hash_of(&clone), hash_of(&copy));
    }

    #[test]
    fn editing_copy_keeps_baseline(parts in arb_baseline_parts(), extra in arb_file_set()) {
        let (baseline, mut copy) = working_copy(Arc::new(FsProject::new("/work/demo")), parts);
        let before = baseline.file_sets().to_vec();

        copy.file_sets_mut().push(extra);
        for file_set in copy.file_sets_mut().iter_mut() {
            file_set.enabled = !file_set.enabled;
            file_set.file_match_patterns.clear();
        }

        prop_assert_eq!(baseline.file_sets(), before.as_slice());
        prop_assert!(copy.is_dirty());
    }

    #[test]
    fn store_and_reload_round_trips(parts in arb_baseline_parts()) {
        let temp_dir = TempDir::new().unwrap();
        let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
        let project = Arc::new(FsProject::with_name("demo", root));

        let (_, copy) = working_copy(Arc::clone(&project), parts);
        copy.store().unwrap();

        let registry = FilterRegistry::standard();
        let reloaded = read_project_configuration(project, &registry, &global_configs()).unwrap();
        prop_assert!(copy.eq_configuration(&reloaded));
    }
}
