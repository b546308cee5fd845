use super::check_config::CheckConfigRef;
use regex::Regex;
use std::hash::{Hash, Hasher};

/// Include or exclude rule matched against project-relative file paths.
///
/// Patterns are regular expressions searched anywhere in the path, so
/// `.java$` selects all Java sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileMatchPattern {
    pub match_pattern: Option<String>,
    pub include_pattern: bool,
}

impl FileMatchPattern {
    /// An include pattern.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            match_pattern: Some(pattern.into()),
            include_pattern: true,
        }
    }

    pub fn exclude(pattern: impl Into<String>) -> Self {
        Self {
            match_pattern: Some(pattern.into()),
            include_pattern: false,
        }
    }

    /// An invalid or missing pattern never matches.
    pub fn is_match(&self, path: &str) -> bool {
        let Some(pattern) = self.match_pattern.as_deref() else {
            return false;
        };
        match Regex::new(pattern) {
            Ok(re) => re.is_match(path),
            Err(e) => {
                tracing::debug!("Ignoring invalid match pattern '{}': {}", pattern, e);
                false
            }
        }
    }
}

/// Named, switchable group of match patterns bound to one check configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    pub name: String,
    pub enabled: bool,
    pub check_config: Option<CheckConfigRef>,
    pub file_match_patterns: Vec<FileMatchPattern>,
}

impl FileSet {
    pub fn new(name: impl Into<String>, check_config: Option<CheckConfigRef>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            check_config,
            file_match_patterns: Vec::new(),
        }
    }

    pub fn with_pattern(mut self, pattern: FileMatchPattern) -> Self {
        self.file_match_patterns.push(pattern);
        self
    }

    /// Whether `path` belongs to this file set. The last matching pattern wins.
    pub fn includes(&self, path: &str) -> bool {
        self.file_match_patterns
            .iter()
            .rev()
            .find(|p| p.is_match(path))
            .is_some_and(|p| p.include_pattern)
    }
}

impl Hash for FileSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.enabled.hash(state);
        self.check_config.hash(state);
        self.file_match_patterns.hash(state);
    }
}
