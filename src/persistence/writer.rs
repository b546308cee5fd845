use super::document::{DocumentWriter, XmlDocumentWriter};
use super::tags::*;
use crate::error::PersistenceError;
use crate::filters::FilterRegistry;
use crate::models::{CheckConfiguration, FileMatchPattern, FileSet, Filter, ProjectConfigurationView};

/// Serialize a project configuration into an in-memory XML document.
pub fn to_xml_bytes(
    config: &dyn ProjectConfigurationView,
    registry: &FilterRegistry,
) -> Result<Vec<u8>, PersistenceError> {
    let mut out = XmlDocumentWriter::new(Vec::new());
    write_project_config(config, registry, &mut out)?;
    Ok(out.into_inner())
}

/// Push the document events of a whole project configuration.
pub fn write_project_config(
    config: &dyn ProjectConfigurationView,
    registry: &FilterRegistry,
    out: &mut dyn DocumentWriter,
) -> Result<(), PersistenceError> {
    out.start_document()?;

    let simple = config.use_simple_config().to_string();
    out.start_element(
        FILESET_CONFIG_TAG,
        &[
            (FORMAT_VERSION_TAG, CURRENT_FILE_FORMAT_VERSION),
            (SIMPLE_CONFIG_TAG, simple.as_str()),
        ],
    )?;
    out.ignorable_whitespace("\n")?;

    for check_config in config.local_check_configurations() {
        write_local_configuration(&check_config, out)?;
    }

    let project = config.project_name();
    for file_set in config.file_sets() {
        let check_config = file_set
            .check_config
            .as_ref()
            .map(|reference| config.resolve_check_config(reference));
        write_file_set(file_set, check_config.as_ref(), &project, out)?;
    }

    for filter in config.filters() {
        write_filter(filter, registry, out)?;
    }

    out.end_element(FILESET_CONFIG_TAG)?;
    out.end_document()
}

fn write_local_configuration(
    check_config: &CheckConfiguration,
    out: &mut dyn DocumentWriter,
) -> Result<(), PersistenceError> {
    if !check_config.is_persisted_per_project() {
        tracing::debug!("Not persisting check configuration '{}'", check_config.name);
        return Ok(());
    }

    let mut attrs = vec![
        (NAME_TAG, check_config.name.as_str()),
        (LOCATION_TAG, check_config.location.as_str()),
        (TYPE_TAG, check_config.config_type.internal_name()),
    ];
    if let Some(description) = &check_config.description {
        attrs.push((DESCRIPTION_TAG, description.as_str()));
    }
    out.start_element(CHECK_CONFIG_TAG, &attrs)?;

    for (key, value) in &check_config.additional_data {
        out.start_element(
            ADDITIONAL_DATA_TAG,
            &[(NAME_TAG, key.as_str()), (VALUE_TAG, value.as_str())],
        )?;
        out.end_element(ADDITIONAL_DATA_TAG)?;
    }

    out.end_element(CHECK_CONFIG_TAG)?;
    out.ignorable_whitespace("\n")
}

fn write_file_set(
    file_set: &FileSet,
    check_config: Option<&CheckConfiguration>,
    project: &str,
    out: &mut dyn DocumentWriter,
) -> Result<(), PersistenceError> {
    let Some(check_config) = check_config else {
        return Err(PersistenceError::FileSetWithoutCheckConfig {
            file_set: file_set.name.clone(),
            project: project.to_string(),
        });
    };

    let enabled = file_set.enabled.to_string();
    let local = (!check_config.global).to_string();
    out.start_element(
        FILESET_TAG,
        &[
            (NAME_TAG, file_set.name.as_str()),
            (ENABLED_TAG, enabled.as_str()),
            (CHECK_CONFIG_NAME_TAG, check_config.name.as_str()),
            (LOCAL_TAG, local.as_str()),
        ],
    )?;
    out.ignorable_whitespace("\n")?;

    for pattern in &file_set.file_match_patterns {
        write_match_pattern(pattern, out)?;
    }

    out.end_element(FILESET_TAG)?;
    out.ignorable_whitespace("\n")
}

fn write_match_pattern(
    pattern: &FileMatchPattern,
    out: &mut dyn DocumentWriter,
) -> Result<(), PersistenceError> {
    let include = pattern.include_pattern.to_string();
    out.start_element(
        FILE_MATCH_PATTERN_TAG,
        &[
            (MATCH_PATTERN_TAG, pattern.match_pattern.as_deref().unwrap_or("")),
            (INCLUDE_PATTERN_TAG, include.as_str()),
        ],
    )?;
    out.end_element(FILE_MATCH_PATTERN_TAG)?;
    out.ignorable_whitespace("\n")
}

fn write_filter(
    filter: &Filter,
    registry: &FilterRegistry,
    out: &mut dyn DocumentWriter,
) -> Result<(), PersistenceError> {
    // only filters changed from their registry default are stored
    if registry.is_default(filter) {
        return Ok(());
    }

    let enabled = filter.enabled.to_string();
    out.start_element(
        FILTER_TAG,
        &[(NAME_TAG, filter.internal_name.as_str()), (ENABLED_TAG, enabled.as_str())],
    )?;
    out.ignorable_whitespace("\n")?;

    for value in &filter.filter_data {
        out.start_element(FILTER_DATA_TAG, &[(VALUE_TAG, value.as_str())])?;
        out.end_element(FILTER_DATA_TAG)?;
        out.ignorable_whitespace("\n")?;
    }

    out.end_element(FILTER_TAG)?;
    out.ignorable_whitespace("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CheckConfigRef, ConfigurationType, ProjectConfiguration};
    use crate::project::FsProject;
    use std::sync::Arc;

    fn render(config: &ProjectConfiguration) -> String {
        let bytes = to_xml_bytes(config, &FilterRegistry::standard()).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    fn project() -> Arc<FsProject> {
        Arc::new(FsProject::new("/work/demo"))
    }

    #[test]
    fn test_minimal_document() {
        let config = ProjectConfiguration::empty(project(), Vec::new());
        assert_eq!(
            render(&config),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <fileset-config file-format-version=\"1.2.0\" simple-config=\"true\">\n\
             </fileset-config>"
        );
    }

    #[test]
    fn test_local_config_with_additional_data() {
        let team = CheckConfiguration::new("Team", "cfg/team.xml", ConfigurationType::Project, false)
            .with_description("Team rules")
            .with_additional_data("protect-config-file", "true")
            .with_additional_data("cache", "off");
        let config = ProjectConfiguration::new(
            project(),
            vec![Arc::new(team)],
            Vec::new(),
            Vec::new(),
            false,
        );

        let xml = render(&config);
        assert!(xml.contains(
            "<check-config name=\"Team\" location=\"cfg/team.xml\" type=\"project\" description=\"Team rules\">\
             <property name=\"protect-config-file\" value=\"true\"/>\
             <property name=\"cache\" value=\"off\"/>\
             </check-config>\n"
        ));
    }

    #[test]
    fn test_built_in_and_global_configs_are_skipped() {
        let built_in =
            CheckConfiguration::new("Sun Checks", "sun_checks.xml", ConfigurationType::BuiltIn, false);
        let global = CheckConfiguration::new("Shared", "shared.xml", ConfigurationType::External, true);
        let config = ProjectConfiguration::new(
            project(),
            vec![Arc::new(built_in), Arc::new(global)],
            Vec::new(),
            Vec::new(),
            false,
        );

        assert!(!render(&config).contains("<check-config"));
    }

    #[test]
    fn test_filter_with_data() {
        let registry = FilterRegistry::standard();
        let mut filters = registry.filters().to_vec();
        filters[3] = filters[3]
            .clone()
            .enabled(true)
            .with_data(vec!["src/gen".to_string(), "a&b".to_string()]);
        let config = ProjectConfiguration::new(project(), Vec::new(), Vec::new(), filters, false);

        let xml = render(&config);
        assert!(xml.contains(
            "<filter name=\"FilesFromPackageFilter\" enabled=\"true\">\n\
             <filter-data value=\"src/gen\"/>\n\
             <filter-data value=\"a&amp;b\"/>\n\
             </filter>\n"
        ));
        assert_eq!(xml.matches("<filter ").count(), 1);
    }

    #[test]
    fn test_missing_pattern_written_as_empty() {
        let sun = CheckConfiguration::new("Sun Checks", "sun_checks.xml", ConfigurationType::BuiltIn, true);
        let mut file_set = FileSet::new("All", Some(CheckConfigRef::from(sun)));
        file_set.file_match_patterns.push(FileMatchPattern {
            match_pattern: None,
            include_pattern: false,
        });
        let config = ProjectConfiguration::new(project(), Vec::new(), vec![file_set], Vec::new(), false);

        assert!(render(&config).contains(
            "<fileset name=\"All\" enabled=\"true\" check-config-name=\"Sun Checks\" local=\"false\">\n\
             <match-pattern match-pattern=\"\" include-pattern=\"false\"/>\n\
             </fileset>\n"
        ));
    }

    #[test]
    fn test_file_set_without_config_fails() {
        let config = ProjectConfiguration::new(
            project(),
            Vec::new(),
            vec![FileSet::new("Orphans", None)],
            Vec::new(),
            false,
        );

        let err = to_xml_bytes(&config, &FilterRegistry::standard()).unwrap_err();
        match err {
            PersistenceError::FileSetWithoutCheckConfig { file_set, project } => {
                assert_eq!(file_set, "Orphans");
                assert_eq!(project, "demo");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
