//! Data model of a project's lint configuration.
//!
//! - [`FileMatchPattern`] / [`FileSet`]: which files are audited and with which check configuration
//! - [`Filter`]: suppression rules, customised per project on top of the registry defaults
//! - [`CheckConfiguration`]: rule set definitions; [`CheckConfigurationWorkingCopy`] is the editable form
//! - [`ProjectConfiguration`]: the committed baseline, read through [`ProjectConfigurationView`]
//!
//! All containers are owned, so `Clone` on any entity is a deep copy. Check
//! configurations are shared through `Arc` because several file sets may point
//! at the same one.

pub mod check_config;
pub mod file_set;
pub mod filter;
pub mod project_config;

pub use check_config::{
    CheckConfigRef, CheckConfiguration, CheckConfigurationWorkingCopy, ConfigurationType,
    WorkingCopyId,
};
pub use file_set::{FileMatchPattern, FileSet};
pub use filter::Filter;
pub use project_config::{ProjectConfiguration, ProjectConfigurationView, ProjectHandle};
