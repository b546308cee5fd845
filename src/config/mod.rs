use crate::filters::FilterRegistry;
use crate::models::{CheckConfiguration, ConfigurationType};
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::Arc;

/// Prefix of environment variables overriding settings, e.g. `FILESET_CONFIG_DEBUG_MODE=true`.
pub const ENV_PREFIX: &str = "FILESET_CONFIG";

/// Plugin-wide settings from `fileset-config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginSettings {
    /// Directory for rotating log files.
    pub log_dir: Utf8PathBuf,

    pub debug_mode: bool,

    /// Optional YAML file replacing the standard filter registry.
    pub filter_registry: Option<Utf8PathBuf>,

    /// Workspace-wide check configurations file sets may refer to.
    pub global_check_configs: Vec<CheckConfiguration>,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            log_dir: Utf8PathBuf::from("logs"),
            debug_mode: false,
            filter_registry: None,
            global_check_configs: vec![
                CheckConfiguration::new(
                    "Sun Checks",
                    "sun_checks.xml",
                    ConfigurationType::BuiltIn,
                    true,
                )
                .with_description("Checks the Sun coding conventions"),
                CheckConfiguration::new(
                    "Sun Checks (Eclipse)",
                    "sun_checks_eclipse.xml",
                    ConfigurationType::BuiltIn,
                    true,
                )
                .with_description("Sun coding conventions adjusted to the Eclipse formatter"),
            ],
        }
    }
}

impl PluginSettings {
    /// Global configurations, flagged global whatever the file says.
    pub fn global_configs(&self) -> Vec<Arc<CheckConfiguration>> {
        self.global_check_configs
            .iter()
            .cloned()
            .map(|mut config| {
                config.global = true;
                Arc::new(config)
            })
            .collect()
    }

    /// The configured filter registry, or the standard one.
    pub fn filter_registry(&self) -> Result<FilterRegistry> {
        match &self.filter_registry {
            Some(path) => FilterRegistry::load(path),
            None => Ok(FilterRegistry::standard()),
        }
    }
}

/// Loads and saves [`PluginSettings`].
///
/// Values come from the settings file (if present) and are overridden by
/// `FILESET_CONFIG_*` environment variables.
#[derive(Debug, Clone)]
pub struct SettingsManager {
    settings_path: Utf8PathBuf,
}

impl SettingsManager {
    pub fn new<P: AsRef<Utf8Path>>(settings_path: P) -> Self {
        Self {
            settings_path: settings_path.as_ref().to_path_buf(),
        }
    }

    pub fn load_settings(&self) -> Result<PluginSettings> {
        if !self.settings_path.exists() {
            tracing::warn!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
        }

        let settings = config::Config::builder()
            .add_source(
                config::File::from(self.settings_path.as_std_path())
                    .format(config::FileFormat::Yaml)
                    .required(false),
            )
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?;

        let settings: PluginSettings = settings
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::debug!("Loaded settings from {}", self.settings_path);
        Ok(settings)
    }

    pub fn save_settings(&self, settings: &PluginSettings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        if let Some(parent) = self.settings_path.parent() {
            if !parent.as_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create settings directory: {}", parent))?;
            }
        }

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }
}
