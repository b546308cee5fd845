//! XML persistence of project configurations.
//!
//! One document per project, stored at [`PROJECT_CONFIGURATION_FILE`]:
//!
//! ```text
//! <fileset-config file-format-version="1.2.0" simple-config="true|false">
//!   <check-config name location type description?> <property name value/>* </check-config>*
//!   <fileset name enabled check-config-name local> <match-pattern match-pattern include-pattern/>* </fileset>*
//!   <filter name enabled> <filter-data value/>* </filter>*
//! </fileset-config>
//! ```
//!
//! Only project-local, non-built-in check configurations and filters that
//! differ from their registry default are written.

pub mod document;
pub mod reader;
pub mod tags;
pub mod writer;

pub use document::{DocumentWriter, XmlDocumentWriter};
pub use reader::{parse_project_configuration, read_project_configuration};
pub use tags::{CURRENT_FILE_FORMAT_VERSION, PROJECT_CONFIGURATION_FILE};
pub use writer::{to_xml_bytes, write_project_config};
