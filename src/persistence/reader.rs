use super::tags::*;
use crate::error::{PersistenceError, PluginError};
use crate::filters::FilterRegistry;
use crate::models::{
    CheckConfigRef, CheckConfiguration, ConfigurationType, FileMatchPattern, FileSet, Filter,
    ProjectConfiguration, ProjectConfigurationView, ProjectHandle,
};
use camino::Utf8Path;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::sync::Arc;

/// Load the committed configuration of a project.
///
/// A project without a configuration file gets the default configuration:
/// no file sets, registry default filters and the simple editor.
pub fn read_project_configuration(
    project: ProjectHandle,
    registry: &FilterRegistry,
    global_configs: &[Arc<CheckConfiguration>],
) -> Result<ProjectConfiguration, PluginError> {
    let file = Utf8Path::new(PROJECT_CONFIGURATION_FILE);
    if !project.file_exists(file) {
        tracing::info!(
            "No {} in project {}, using defaults",
            PROJECT_CONFIGURATION_FILE,
            project.name()
        );
        return Ok(ProjectConfiguration::empty(project, registry.filters().to_vec()));
    }

    let bytes = project
        .read_file(file)
        .map_err(|e| PluginError::ReadConfigurations(e.into()))?;
    let xml = String::from_utf8(bytes)
        .map_err(|e| PluginError::ReadConfigurations(PersistenceError::xml(e)))?;

    let config = parse_project_configuration(project, &xml, registry, global_configs)
        .map_err(PluginError::ReadConfigurations)?;
    tracing::info!(
        "Loaded project configuration of {}: {} file sets",
        config.project_name(),
        config.file_sets().len()
    );
    Ok(config)
}

/// Parse a configuration document.
pub fn parse_project_configuration(
    project: ProjectHandle,
    xml: &str,
    registry: &FilterRegistry,
    global_configs: &[Arc<CheckConfiguration>],
) -> Result<ProjectConfiguration, PersistenceError> {
    let mut state = ParseState::new(global_configs, registry);
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event().map_err(PersistenceError::xml)? {
            Event::Start(e) => state.start(&e)?,
            Event::Empty(e) => {
                state.start(&e)?;
                state.end(e.name().as_ref());
            }
            Event::End(e) => state.end(e.name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
    }

    if !state.seen_root {
        return Err(PersistenceError::Xml(format!(
            "missing <{}> root element",
            FILESET_CONFIG_TAG
        )));
    }

    Ok(ProjectConfiguration::new(
        project,
        state.local_configs,
        state.file_sets,
        registry.merge(&state.filters),
        state.use_simple_config,
    ))
}

struct PendingFileSet {
    file_set: FileSet,
    check_config_name: String,
    local: bool,
}

struct ParseState<'a> {
    globals: &'a [Arc<CheckConfiguration>],
    registry: &'a FilterRegistry,
    seen_root: bool,
    use_simple_config: bool,
    local_configs: Vec<Arc<CheckConfiguration>>,
    file_sets: Vec<FileSet>,
    filters: Vec<Filter>,
    current_config: Option<CheckConfiguration>,
    current_file_set: Option<PendingFileSet>,
    current_filter: Option<Filter>,
}

impl<'a> ParseState<'a> {
    fn new(globals: &'a [Arc<CheckConfiguration>], registry: &'a FilterRegistry) -> Self {
        Self {
            globals,
            registry,
            seen_root: false,
            use_simple_config: false,
            local_configs: Vec::new(),
            file_sets: Vec::new(),
            filters: Vec::new(),
            current_config: None,
            current_file_set: None,
            current_filter: None,
        }
    }

    fn start(&mut self, e: &BytesStart<'_>) -> Result<(), PersistenceError> {
        let name = e.name();
        let tag = std::str::from_utf8(name.as_ref()).map_err(PersistenceError::xml)?;
        let mut attrs = Attributes::of(tag, e)?;

        match tag {
            FILESET_CONFIG_TAG => {
                self.seen_root = true;
                let version = attrs.optional(FORMAT_VERSION_TAG);
                if version.as_deref() != Some(CURRENT_FILE_FORMAT_VERSION) {
                    tracing::warn!("Reading file format version {:?}", version);
                }
                self.use_simple_config = attrs.flag(SIMPLE_CONFIG_TAG);
            }
            CHECK_CONFIG_TAG => {
                let type_name = attrs.required(TYPE_TAG)?;
                let config_type = ConfigurationType::from_internal_name(&type_name)
                    .ok_or_else(|| {
                        PersistenceError::Xml(format!("unknown configuration type '{}'", type_name))
                    })?;
                let mut config = CheckConfiguration::new(
                    attrs.required(NAME_TAG)?,
                    attrs.required(LOCATION_TAG)?,
                    config_type,
                    false,
                );
                config.description = attrs.optional(DESCRIPTION_TAG);
                self.current_config = Some(config);
            }
            ADDITIONAL_DATA_TAG => {
                if let Some(config) = self.current_config.as_mut() {
                    config
                        .additional_data
                        .insert(attrs.required(NAME_TAG)?, attrs.required(VALUE_TAG)?);
                }
            }
            FILESET_TAG => {
                let mut file_set = FileSet::new(attrs.required(NAME_TAG)?, None);
                file_set.enabled = attrs.flag(ENABLED_TAG);
                self.current_file_set = Some(PendingFileSet {
                    file_set,
                    check_config_name: attrs.required(CHECK_CONFIG_NAME_TAG)?,
                    local: attrs.flag(LOCAL_TAG),
                });
            }
            FILE_MATCH_PATTERN_TAG => {
                if let Some(pending) = self.current_file_set.as_mut() {
                    pending.file_set.file_match_patterns.push(FileMatchPattern {
                        match_pattern: attrs.optional(MATCH_PATTERN_TAG),
                        include_pattern: attrs.flag(INCLUDE_PATTERN_TAG),
                    });
                }
            }
            FILTER_TAG => {
                let internal_name = attrs.required(NAME_TAG)?;
                match self.registry.prototype(&internal_name) {
                    Some(prototype) => {
                        let mut filter = prototype.clone();
                        filter.enabled = attrs.flag(ENABLED_TAG);
                        filter.filter_data.clear();
                        self.current_filter = Some(filter);
                    }
                    None => tracing::warn!("Ignoring unknown filter '{}'", internal_name),
                }
            }
            FILTER_DATA_TAG => {
                if let Some(filter) = self.current_filter.as_mut() {
                    filter.filter_data.push(attrs.required(VALUE_TAG)?);
                }
            }
            other => tracing::debug!("Ignoring element <{}>", other),
        }
        Ok(())
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            n if n == CHECK_CONFIG_TAG.as_bytes() => {
                if let Some(config) = self.current_config.take() {
                    self.local_configs.push(Arc::new(config));
                }
            }
            n if n == FILESET_TAG.as_bytes() => {
                if let Some(pending) = self.current_file_set.take() {
                    let file_set = self.resolve(pending);
                    self.file_sets.push(file_set);
                }
            }
            n if n == FILTER_TAG.as_bytes() => {
                if let Some(filter) = self.current_filter.take() {
                    self.filters.push(filter);
                }
            }
            _ => {}
        }
    }

    fn resolve(&self, pending: PendingFileSet) -> FileSet {
        let PendingFileSet {
            mut file_set,
            check_config_name,
            local,
        } = pending;
        let candidates = if local {
            self.local_configs.as_slice()
        } else {
            self.globals
        };
        file_set.check_config = candidates
            .iter()
            .find(|c| c.name == check_config_name)
            .map(|c| CheckConfigRef::Config(Arc::clone(c)));
        if file_set.check_config.is_none() {
            tracing::warn!(
                "File set '{}' references unknown {} check configuration '{}'",
                file_set.name,
                if local { "local" } else { "global" },
                check_config_name
            );
        }
        file_set
    }
}

/// Unescaped attributes of one element.
struct Attributes {
    tag: String,
    values: HashMap<String, String>,
}

impl Attributes {
    fn of(tag: &str, e: &BytesStart<'_>) -> Result<Self, PersistenceError> {
        let mut values = HashMap::new();
        for attr in e.attributes() {
            let attr = attr.map_err(PersistenceError::xml)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(PersistenceError::xml)?;
            values.insert(key, value.into_owned());
        }
        Ok(Self {
            tag: tag.to_string(),
            values,
        })
    }

    fn optional(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    fn required(&mut self, name: &str) -> Result<String, PersistenceError> {
        self.optional(name).ok_or_else(|| {
            PersistenceError::Xml(format!("<{}> lacks attribute '{}'", self.tag, name))
        })
    }

    fn flag(&mut self, name: &str) -> bool {
        self.optional(name).is_some_and(|v| v == "true")
    }
}
