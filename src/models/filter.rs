use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Named suppression rule with optional string parameters.
///
/// Identity is the internal name. Equality ignores the display name and
/// description, which belong to the registry rather than to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filter {
    pub internal_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub filter_data: Vec<String>,
}

impl Filter {
    pub fn new(internal_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            internal_name: internal_name.into(),
            name: name.into(),
            description: String::new(),
            enabled: false,
            filter_data: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_data(mut self, data: Vec<String>) -> Self {
        self.filter_data = data;
        self
    }
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        self.internal_name == other.internal_name
            && self.enabled == other.enabled
            && self.filter_data == other.filter_data
    }
}

impl Eq for Filter {}

impl Hash for Filter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.internal_name.hash(state);
        self.enabled.hash(state);
        self.filter_data.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_ignores_display_metadata() {
        let a = Filter::new("DerivedFilesFilter", "Derived files").with_description("a");
        let b = Filter::new("DerivedFilesFilter", "").with_description("b");
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_considers_state() {
        let proto = Filter::new("FileTypesFilter", "File types");
        assert_ne!(proto, proto.clone().enabled(true));
        assert_ne!(proto, proto.clone().with_data(vec!["xml".to_string()]));
        assert_ne!(proto, Filter::new("NonSrcDirsFilter", "File types"));
    }
}
