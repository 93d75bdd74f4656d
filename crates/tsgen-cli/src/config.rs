//! tsgen.json loading and option resolution.
//!
//! Configuration folds in precedence order: built-in defaults, then the
//! nearest tsgen.json, then command-line flags. Invalid config values degrade
//! to the defaults with a warning instead of aborting the run. The file is
//! read as JSONC: comments and trailing commas are tolerated.

use anyhow::{Context, Result, bail};
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use tsgen_common::{GeneratorOptions, Notice, ValidationMode};

use crate::args::GenerateArgs;

pub const CONFIG_FILE_NAME: &str = "tsgen.json";

/// Raw tsgen.json contents before folding with CLI overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfig {
    #[serde(default)]
    pub validation_mode: Option<String>,
    #[serde(default)]
    pub interface_suffix: Option<String>,
    #[serde(default)]
    pub class_name_suffix: Option<String>,
    #[serde(default)]
    pub function_prefix: Option<String>,
    #[serde(default)]
    pub strip_suffix_regex: Option<String>,
    #[serde(default)]
    pub in_new_file: Option<bool>,
    #[serde(default)]
    pub views: Option<IndexMap<String, Vec<String>>>,
}

pub fn parse_config(source: &str) -> Result<RawConfig> {
    let stripped = strip_jsonc(source);
    let normalized = remove_trailing_commas(&stripped);
    let config = serde_json::from_str(&normalized).context("failed to parse tsgen.json")?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<RawConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&source).with_context(|| format!("failed to parse config: {}", path.display()))
}

/// Search upward from `start` (a file or directory) for the nearest
/// tsgen.json.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let origin = if start.is_dir() { start } else { start.parent()? };
    for dir in origin.ancestors() {
        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Locate, load, and fold configuration for one generation request.
pub fn load_options(args: &GenerateArgs) -> Result<(GeneratorOptions, Vec<Notice>)> {
    let config_path = match &args.config {
        Some(path) => Some(path.clone()),
        None => find_config(&args.file),
    };
    let config = match &config_path {
        Some(path) => Some(load_config(path)?),
        None => None,
    };
    resolve_options(config.as_ref(), args)
}

/// Fold a raw config and flag overrides into resolved options.
///
/// Each degraded value produces a warning notice so the user sees what was
/// ignored. Malformed `--view` flags are hard errors; they were typed on the
/// command line and a silent fallback would hide the typo.
pub fn resolve_options(
    config: Option<&RawConfig>,
    args: &GenerateArgs,
) -> Result<(GeneratorOptions, Vec<Notice>)> {
    let mut options = GeneratorOptions::default();
    let mut notices = Vec::new();

    if let Some(config) = config {
        if let Some(raw_mode) = config.validation_mode.as_deref() {
            match ValidationMode::parse(raw_mode) {
                Some(mode) => options.validation_mode = mode,
                None => notices.push(Notice::warning(format!(
                    "unknown validationMode '{raw_mode}' in {CONFIG_FILE_NAME}; using '{}'",
                    options.validation_mode.as_str()
                ))),
            }
        }
        if let Some(suffix) = &config.interface_suffix {
            options.interface_suffix = suffix.clone();
        }
        if let Some(suffix) = &config.class_name_suffix {
            options.class_name_suffix = suffix.clone();
        }
        if let Some(prefix) = &config.function_prefix {
            options.function_prefix = prefix.clone();
        }
        if let Some(pattern) = config.strip_suffix_regex.as_deref() {
            apply_strip_suffix(&mut options, pattern, &mut notices);
        }
        if let Some(in_new_file) = config.in_new_file {
            options.in_new_file = in_new_file;
        }
        if let Some(views) = &config.views {
            options.views = views.clone();
        }
    }

    // Flags win over the config file.
    if let Some(mode) = args.mode {
        options.validation_mode = mode.to_validation_mode();
    }
    if let Some(suffix) = &args.interface_suffix {
        options.interface_suffix = suffix.clone();
    }
    if let Some(suffix) = &args.class_suffix {
        options.class_name_suffix = suffix.clone();
    }
    if let Some(prefix) = &args.function_prefix {
        options.function_prefix = prefix.clone();
    }
    if let Some(pattern) = args.strip_suffix.as_deref() {
        apply_strip_suffix(&mut options, pattern, &mut notices);
    }
    if args.in_new_file {
        options.in_new_file = true;
    }
    for raw in &args.views {
        let (key, tokens) = parse_view_flag(raw)?;
        options.views.insert(key, tokens);
    }

    Ok((options, notices))
}

fn apply_strip_suffix(options: &mut GeneratorOptions, pattern: &str, notices: &mut Vec<Notice>) {
    match Regex::new(pattern) {
        Ok(regex) => options.strip_suffix = regex,
        Err(_) => notices.push(Notice::warning(format!(
            "invalid stripSuffixRegex '{pattern}'; using the default pattern"
        ))),
    }
}

/// Parse a `--view name=tok,tok` flag value.
pub fn parse_view_flag(raw: &str) -> Result<(String, Vec<String>)> {
    let Some((name, token_list)) = raw.split_once('=') else {
        bail!("invalid --view '{raw}': expected name=token,token,...");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("invalid --view '{raw}': the view name is empty");
    }
    let tokens: Vec<String> = token_list
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect();
    Ok((name.to_string(), tokens))
}

fn strip_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;
    let mut in_line_comment = false;
    let mut in_block_comment = false;

    while let Some(ch) = chars.next() {
        if in_line_comment {
            if ch == '\n' {
                in_line_comment = false;
                out.push(ch);
            }
            continue;
        }

        if in_block_comment {
            if ch == '*' && chars.peek() == Some(&'/') {
                chars.next();
                in_block_comment = false;
            } else if ch == '\n' {
                out.push(ch);
            }
            continue;
        }

        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => {
                in_string = true;
                out.push(ch);
            }
            '/' if chars.peek() == Some(&'/') => {
                chars.next();
                in_line_comment = true;
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                in_block_comment = true;
            }
            other => out.push(other),
        }
    }

    out
}

fn remove_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
            out.push(ch);
            continue;
        }

        if ch == ',' {
            let mut lookahead = chars.clone();
            let next_significant = loop {
                match lookahead.next() {
                    Some(next) if next.is_whitespace() => continue,
                    other => break other,
                }
            };
            if matches!(next_significant, Some('}') | Some(']')) {
                continue;
            }
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn base_args() -> GenerateArgs {
        GenerateArgs {
            file: PathBuf::from("post.ts"),
            name: Some("_Post".to_string()),
            line: None,
            views: Vec::new(),
            mode: None,
            in_new_file: false,
            print: false,
            config: None,
            interface_suffix: None,
            class_suffix: None,
            function_prefix: None,
            strip_suffix: None,
        }
    }

    #[test]
    fn test_parse_camel_case_fields() {
        let config = parse_config(
            r#"{
                "validationMode": "strict",
                "interfaceSuffix": "View",
                "classNameSuffix": "Model",
                "functionPrefix": "make",
                "inNewFile": true,
                "views": { "profile": ["id", "author.!id"], "card": ["id"] }
            }"#,
        )
        .expect("config should parse");

        assert_eq!(config.validation_mode.as_deref(), Some("strict"));
        assert_eq!(config.interface_suffix.as_deref(), Some("View"));
        assert_eq!(config.in_new_file, Some(true));
        let views = config.views.expect("views should parse");
        let keys: Vec<&String> = views.keys().collect();
        assert_eq!(keys, ["profile", "card"]);
    }

    #[test]
    fn test_jsonc_comments_and_trailing_commas_tolerated() {
        let config = parse_config(
            r#"{
                // generated artifacts
                "classNameSuffix": "Impl", /* the default, spelled out */
                "views": {
                    "profile": ["id", "title",],
                },
            }"#,
        )
        .expect("jsonc should parse");
        assert_eq!(config.class_name_suffix.as_deref(), Some("Impl"));
    }

    #[test]
    fn test_invalid_validation_mode_degrades_with_warning() {
        let config = parse_config(r#"{ "validationMode": "pedantic" }"#).unwrap();
        let (options, notices) = resolve_options(Some(&config), &base_args()).unwrap();

        assert_eq!(options.validation_mode, ValidationMode::Partial);
        assert_eq!(notices.len(), 1);
        assert!(notices[0].message.contains("pedantic"), "{}", notices[0].message);
    }

    #[test]
    fn test_invalid_strip_regex_degrades_with_warning() {
        let config = parse_config(r#"{ "stripSuffixRegex": "([unclosed" }"#).unwrap();
        let (options, notices) = resolve_options(Some(&config), &base_args()).unwrap();

        assert_eq!(notices.len(), 1);
        assert!(options.strip_suffix.is_match("PostViewModel"));
    }

    #[test]
    fn test_flags_override_config() {
        let config = parse_config(
            r#"{ "validationMode": "loose", "classNameSuffix": "Record", "views": { "card": ["id"] } }"#,
        )
        .unwrap();
        let mut args = base_args();
        args.mode = Some(crate::args::ModeArg::Strict);
        args.class_suffix = Some("Impl".to_string());
        args.in_new_file = true;
        args.views = vec!["card=id,title".to_string(), "mini=id".to_string()];

        let (options, notices) = resolve_options(Some(&config), &args).unwrap();
        assert!(notices.is_empty());
        assert_eq!(options.validation_mode, ValidationMode::Strict);
        assert_eq!(options.class_name_suffix, "Impl");
        assert!(options.in_new_file);
        assert_eq!(options.views["card"], vec!["id", "title"]);
        assert_eq!(options.views["mini"], vec!["id"]);
        assert_eq!(options.views.get_index_of("card"), Some(0));
    }

    #[test]
    fn test_view_flag_requires_equals() {
        assert!(parse_view_flag("profile").is_err());
        assert!(parse_view_flag("=id,title").is_err());
        let (name, tokens) = parse_view_flag("profile= id , ,title ").unwrap();
        assert_eq!(name, "profile");
        assert_eq!(tokens, vec!["id", "title"]);
    }

    #[test]
    fn test_find_config_walks_upward() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let nested = dir.path().join("src").join("models");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{}").unwrap();
        let file = nested.join("post.ts");
        std::fs::write(&file, "interface Post { id: string; }").unwrap();

        let found = find_config(&file).expect("config should be found");
        assert_eq!(found, dir.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_missing_config_resolves_defaults() {
        let (options, notices) = resolve_options(None, &base_args()).unwrap();
        assert!(notices.is_empty());
        assert_eq!(options.class_name_suffix, "Impl");
        assert_eq!(options.function_prefix, "create");
        assert!(options.views.is_empty());
    }
}
