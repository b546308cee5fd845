//! Error taxonomy for loading and storing project configurations.
//!
//! Lower-level helpers return [`PersistenceError`]. The public entry points
//! ([`ProjectConfigurationWorkingCopy::store`](crate::working_copy::ProjectConfigurationWorkingCopy::store),
//! [`read_project_configuration`](crate::persistence::read_project_configuration))
//! are the single boundary translating them into [`PluginError`].

use std::io;
use thiserror::Error;

/// Errors raised while building, writing or reading the XML document.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("File set '{file_set}' of project '{project}' has no check configuration")]
    FileSetWithoutCheckConfig { file_set: String, project: String },

    #[error("XML error: {0}")]
    Xml(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("A check configuration named '{0}' already exists")]
    DuplicateName(String),
}

/// Plugin-level errors surfaced to callers.
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Error writing check configurations: {0}")]
    WriteConfigurations(#[source] PersistenceError),

    #[error("Error reading check configurations: {0}")]
    ReadConfigurations(#[source] PersistenceError),

    #[error("Check configuration '{0}' is still used by a file set")]
    ConfigInUse(String),

    #[error("Invalid filter registry: {0}")]
    FilterRegistry(String),
}

impl PersistenceError {
    /// Wrap any displayable XML toolkit error.
    pub(crate) fn xml(err: impl std::fmt::Display) -> Self {
        Self::Xml(err.to_string())
    }
}
