use crate::analysis::label::parse_label;
use crate::config::ExplainerConfig;
use crate::model::ParsedLabel;

/// Inclusion predicates over class names and raw labels.
///
/// Borrowed from the configuration so the lists are never copied per run.
#[derive(Debug, Clone, Copy)]
pub struct InclusionPolicy<'a> {
    ignored_class_prefixes: &'a [String],
    ignored_labels: &'a [String],
    class_filter: Option<&'a str>,
}

impl<'a> InclusionPolicy<'a> {
    pub fn new(ignored_class_prefixes: &'a [String], ignored_labels: &'a [String]) -> Self {
        Self { ignored_class_prefixes, ignored_labels, class_filter: None }
    }

    pub fn from_config(config: &'a ExplainerConfig) -> Self {
        Self::new(&config.ignored_class_prefixes, &config.ignored_labels)
    }

    /// Only accept records whose class name equals `class_name`.
    pub fn with_class_filter(mut self, class_name: Option<&'a str>) -> Self {
        self.class_filter = class_name;
        self
    }

    pub fn is_ignored_class(&self, class_name: &str) -> bool {
        self.ignored_class_prefixes.iter().any(|prefix| class_name.starts_with(prefix.as_str()))
    }

    pub fn is_ignored_label(&self, label_name: &str) -> bool {
        self.ignored_labels.iter().any(|label| label == label_name)
    }

    pub fn matches_filter(&self, class_name: &str) -> bool {
        self.class_filter.map_or(true, |filter| filter == class_name)
    }

    /// Parse `label_name` and return it only if every predicate accepts it.
    pub fn accept(&self, label_name: &str) -> Option<ParsedLabel> {
        if self.is_ignored_label(label_name) {
            return None;
        }
        let parsed = parse_label(label_name)?;
        if self.is_ignored_class(&parsed.class_name) || !self.matches_filter(&parsed.class_name) {
            return None;
        }
        Some(parsed)
    }
}
