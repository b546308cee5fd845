//! Element and attribute names of the project configuration file. These are
//! a stable on-disk contract.

/// Project-relative location of the configuration file.
pub const PROJECT_CONFIGURATION_FILE: &str = ".checkstyle";

/// Format version written into new files.
pub const CURRENT_FILE_FORMAT_VERSION: &str = "1.2.0";

pub const FILESET_CONFIG_TAG: &str = "fileset-config";
pub const FORMAT_VERSION_TAG: &str = "file-format-version";
pub const SIMPLE_CONFIG_TAG: &str = "simple-config";

pub const CHECK_CONFIG_TAG: &str = "check-config";
pub const ADDITIONAL_DATA_TAG: &str = "property";
pub const NAME_TAG: &str = "name";
pub const LOCATION_TAG: &str = "location";
pub const TYPE_TAG: &str = "type";
pub const DESCRIPTION_TAG: &str = "description";
pub const VALUE_TAG: &str = "value";

pub const FILESET_TAG: &str = "fileset";
pub const ENABLED_TAG: &str = "enabled";
pub const CHECK_CONFIG_NAME_TAG: &str = "check-config-name";
pub const LOCAL_TAG: &str = "local";

pub const FILE_MATCH_PATTERN_TAG: &str = "match-pattern";
pub const MATCH_PATTERN_TAG: &str = "match-pattern";
pub const INCLUDE_PATTERN_TAG: &str = "include-pattern";

pub const FILTER_TAG: &str = "filter";
pub const FILTER_DATA_TAG: &str = "filter-data";
