// fileset-config - per-project lint file set configuration
//
// This is the library crate with the data model, the editable working copy
// and the XML persistence. The binary crate (main.rs) is a small CLI on top.

pub mod config;
pub mod error;
pub mod filters;
pub mod logging;
pub mod models;
pub mod persistence;
pub mod project;
pub mod working_copy;
pub mod working_set;

// Re-export commonly used types for convenience
pub use config::{PluginSettings, SettingsManager};
pub use error::{PersistenceError, PluginError};
pub use filters::FilterRegistry;
pub use models::{
    CheckConfigRef, CheckConfiguration, CheckConfigurationWorkingCopy, ConfigurationType,
    FileMatchPattern, FileSet, Filter, ProjectConfiguration, ProjectConfigurationView,
    WorkingCopyId,
};
pub use project::{FsProject, ProjectResources};
pub use working_copy::ProjectConfigurationWorkingCopy;
pub use working_set::{CheckConfigurationWorkingSet, WorkingSetScope};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
