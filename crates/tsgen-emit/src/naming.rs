//! Derived naming for generated artifacts.
//!
//! Targets often follow a `_Name` / `NameViewModel` convention; generated
//! artifacts drop that noise before attaching their own prefix or suffix.

use tsgen_common::GeneratorOptions;

/// Strip the conventional noise off a target declaration name.
///
/// Leading underscores go first, then the configured strip-suffix pattern.
/// A stripping step that would empty the name entirely is skipped.
pub fn base_name(target: &str, options: &GeneratorOptions) -> String {
    let trimmed = target.trim_start_matches('_');
    let trimmed = if trimmed.is_empty() { target } else { trimmed };
    let stripped = options.strip_suffix.replace(trimmed, "");
    if stripped.is_empty() {
        trimmed.to_string()
    } else {
        stripped.into_owned()
    }
}

/// Name of the generated implementation class.
pub fn class_name(target: &str, options: &GeneratorOptions) -> String {
    format!("{}{}", base_name(target, options), options.class_name_suffix)
}

/// Name of the generated factory function.
pub fn factory_name(target: &str, options: &GeneratorOptions) -> String {
    format!("{}{}", options.function_prefix, base_name(target, options))
}

/// Name of the interface generated for one view-schema entry.
pub fn view_interface_name(target: &str, view_key: &str, options: &GeneratorOptions) -> String {
    format!(
        "{}{}{}",
        base_name(target, options),
        upper_camel(view_key),
        options.interface_suffix
    )
}

/// Upper-camelize a view key: `profile` becomes `Profile`, `admin_list`
/// becomes `AdminList`. Already-camelized keys keep their interior casing.
pub fn upper_camel(key: &str) -> String {
    let mut result = String::with_capacity(key.len());
    for segment in key.split(|ch: char| ch == '_' || ch == '-' || ch.is_whitespace()) {
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}
