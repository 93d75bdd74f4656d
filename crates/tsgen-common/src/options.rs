//! Resolved generator configuration.
//!
//! The host (CLI) folds its raw config file and flag overrides into a
//! `GeneratorOptions` value; the resolver consumes `validation_mode` and the
//! emitters consume the naming options. Nothing here reads files - raw config
//! loading lives in the host crate.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Policy applied when a view schema references names the target does not
/// declare.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Any violation skips the whole view; sibling views continue.
    Strict,
    /// Invalid names are dropped with a warning; the rest is generated.
    #[default]
    Partial,
    /// Same dropping behavior as partial, reported as plain information.
    Loose,
}

impl ValidationMode {
    /// Get the mode name as it appears in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationMode::Strict => "strict",
            ValidationMode::Partial => "partial",
            ValidationMode::Loose => "loose",
        }
    }

    /// Parse a configuration string, case-insensitively.
    pub fn parse(value: &str) -> Option<ValidationMode> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(ValidationMode::Strict),
            "partial" => Some(ValidationMode::Partial),
            "loose" => Some(ValidationMode::Loose),
            _ => None,
        }
    }
}

static DEFAULT_STRIP_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(ViewModel|View|Props)$").unwrap());

/// The built-in strip-suffix pattern applied during name derivation.
pub fn default_strip_suffix() -> &'static Regex {
    &DEFAULT_STRIP_SUFFIX
}

/// Resolved options consumed by the resolver and the emitters.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// View-schema validation policy.
    pub validation_mode: ValidationMode,
    /// Suffix appended to generated view interface names.
    pub interface_suffix: String,
    /// Suffix appended to generated implementation class names.
    pub class_name_suffix: String,
    /// Prefix prepended to generated factory function names.
    pub function_prefix: String,
    /// Pattern stripped from the target name before derivation.
    pub strip_suffix: Regex,
    /// Emit artifacts into a sibling file instead of inserting inline.
    pub in_new_file: bool,
    /// View schemas keyed by view name, in configuration order.
    pub views: IndexMap<String, Vec<String>>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        GeneratorOptions {
            validation_mode: ValidationMode::default(),
            interface_suffix: String::new(),
            class_name_suffix: "Impl".to_string(),
            function_prefix: "create".to_string(),
            strip_suffix: default_strip_suffix().clone(),
            in_new_file: false,
            views: IndexMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_mode_parse() {
        assert_eq!(ValidationMode::parse("strict"), Some(ValidationMode::Strict));
        assert_eq!(ValidationMode::parse(" Loose "), Some(ValidationMode::Loose));
        assert_eq!(ValidationMode::parse("unknown"), None);
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let options = GeneratorOptions::default();
        assert_eq!(options.validation_mode, ValidationMode::Partial);
        assert_eq!(options.class_name_suffix, "Impl");
        assert_eq!(options.function_prefix, "create");
        assert_eq!(options.interface_suffix, "");
        assert!(!options.in_new_file);
        assert!(options.strip_suffix.is_match("PostViewModel"));
        assert!(options.strip_suffix.is_match("PostProps"));
        assert!(!options.strip_suffix.is_match("Post"));
    }
}
