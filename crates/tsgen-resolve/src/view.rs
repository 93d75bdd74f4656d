//! View-schema splitting, validation, and composite assembly.
//!
//! A view schema is a list of selection tokens over one target declaration:
//! - `name` - top-level field
//! - `?name` - top-level field, forced optional
//! - `parent.child` - nested composite member
//! - `parent.?child` - nested composite member, forced optional
//! - `parent.!child` - parent stays top-level, its composite drops `child`
//!
//! Splitting classifies tokens; validation checks every name against the
//! target's actual fields under one of three modes (strict aborts the view,
//! partial and loose drop what is invalid); assembly renders the surviving
//! selection into final fields, in target declaration order.

use crate::extract::{extract_fields, fields_from_members, member_type_text, FieldDescriptor};
use crate::heritage::unwrap_wrappers;
use crate::nearby::{resolve_nearby, ResolvedRecord};
use crate::store::DeclarationStore;
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::{debug, trace};
use tsgen_common::{Notice, ValidationMode};
use tsgen_syntax::{PropertySig, SourceFile, TypeNode};

// =============================================================================
// Selection model
// =============================================================================

/// Structured form of one view schema's tokens.
///
/// A parent may appear in both `top_fields` and `nested_fields`; the nested
/// composite wins unless `exclusions` carries an entry for it, which forces
/// the top-level branch with an exclusion-filtered composite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSelection {
    pub top_fields: IndexSet<String>,
    pub optional_top_fields: IndexSet<String>,
    pub nested_fields: IndexMap<String, IndexSet<String>>,
    pub optional_nested_fields: IndexMap<String, IndexSet<String>>,
    pub exclusions: IndexMap<String, IndexSet<String>>,
}

impl ViewSelection {
    /// True when nothing would be emitted for this selection.
    pub fn is_empty(&self) -> bool {
        self.top_fields.is_empty() && self.nested_fields.is_empty()
    }

    /// Whether `parent` renders as a nested composite rather than a plain
    /// top-level field.
    pub fn renders_nested(&self, parent: &str) -> bool {
        self.nested_fields.contains_key(parent) && !self.exclusions.contains_key(parent)
    }
}

/// Classify tokens into a selection. Tokens are independent; empty or
/// malformed ones (missing parent/child around a marker) are dropped.
pub fn split_tokens<S: AsRef<str>>(tokens: &[S]) -> ViewSelection {
    let mut selection = ViewSelection::default();
    for raw in tokens {
        let token = raw.as_ref().trim();
        if token.is_empty() {
            continue;
        }
        if let Some((parent, rest)) = token.split_once('.') {
            if parent.is_empty() || rest.is_empty() {
                trace!(token, "dropping malformed view token");
                continue;
            }
            if let Some(child) = rest.strip_prefix('!') {
                if child.is_empty() {
                    trace!(token, "dropping malformed view token");
                    continue;
                }
                selection.top_fields.insert(parent.to_string());
                selection
                    .exclusions
                    .entry(parent.to_string())
                    .or_default()
                    .insert(child.to_string());
            } else if let Some(child) = rest.strip_prefix('?') {
                if child.is_empty() {
                    trace!(token, "dropping malformed view token");
                    continue;
                }
                selection
                    .nested_fields
                    .entry(parent.to_string())
                    .or_default()
                    .insert(child.to_string());
                selection
                    .optional_nested_fields
                    .entry(parent.to_string())
                    .or_default()
                    .insert(child.to_string());
            } else {
                selection
                    .nested_fields
                    .entry(parent.to_string())
                    .or_default()
                    .insert(rest.to_string());
            }
        } else if let Some(name) = token.strip_prefix('?') {
            if name.is_empty() {
                trace!(token, "dropping malformed view token");
                continue;
            }
            selection.top_fields.insert(name.to_string());
            selection.optional_top_fields.insert(name.to_string());
        } else {
            selection.top_fields.insert(token.to_string());
        }
    }
    selection
}

// =============================================================================
// Child context
// =============================================================================

/// Fields reachable under one parent field, plus whether the composite
/// wraps as an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildContext {
    pub fields: Vec<FieldDescriptor>,
    pub is_array: bool,
}

/// Why a parent field cannot serve as a composite parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildContextFailure {
    /// Still a union after nullish members are stripped; no defined merge.
    UnionUnsupported,
    /// Scalar, opaque, or unannotated type with no member fields.
    NoChildFields,
    /// The type names a declaration that is not found nearby.
    ReferenceNotFound { name: String },
}

/// Derive the child lookup context from a parent member's declared type.
///
/// Nullish union members are stripped first; `T[]`, `Array<T>`, and
/// `ReadonlyArray<T>` unwrap to `T` and mark the composite as
/// array-of-object; inline object literals contribute their members
/// directly; named references are resolved nearby and extracted.
pub fn child_context(
    store: &mut DeclarationStore,
    file: &Arc<SourceFile>,
    member: &PropertySig,
) -> Result<ChildContext, ChildContextFailure> {
    match &member.type_node {
        Some(node) => context_of_type(store, file, node, false),
        None => Err(ChildContextFailure::NoChildFields),
    }
}

fn context_of_type(
    store: &mut DeclarationStore,
    file: &Arc<SourceFile>,
    node: &TypeNode,
    is_array: bool,
) -> Result<ChildContext, ChildContextFailure> {
    match unwrap_wrappers(node) {
        TypeNode::Union { members, .. } => {
            let concrete: Vec<&TypeNode> =
                members.iter().filter(|member| !member.is_nullish()).collect();
            match concrete.as_slice() {
                [] => Err(ChildContextFailure::NoChildFields),
                [only] => context_of_type(store, file, only, is_array),
                _ => Err(ChildContextFailure::UnionUnsupported),
            }
        }
        TypeNode::Array { element, .. } => context_of_type(store, file, element, true),
        TypeNode::Reference {
            name, type_args, ..
        } if type_args.len() == 1 && (name == "Array" || name == "ReadonlyArray") => {
            context_of_type(store, file, &type_args[0], true)
        }
        TypeNode::ObjectLiteral { members, .. } => Ok(ChildContext {
            fields: fields_from_members(members, &file.text),
            is_array,
        }),
        TypeNode::Reference { name, .. } => {
            match resolve_nearby(store, name, &file.path) {
                Ok(Some(record)) => {
                    let fields = extract_fields(store, &record);
                    if fields.is_empty() {
                        return Err(ChildContextFailure::NoChildFields);
                    }
                    Ok(ChildContext { fields, is_array })
                }
                Ok(None) | Err(_) => Err(ChildContextFailure::ReferenceNotFound {
                    name: name.clone(),
                }),
            }
        }
        _ => Err(ChildContextFailure::NoChildFields),
    }
}

// =============================================================================
// Validation
// =============================================================================

/// What validation decided about one selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub mode: ValidationMode,
    /// Top-level names the target does not declare
    pub invalid_top: Vec<String>,
    /// Nested parents that do not exist or cannot carry a composite
    pub invalid_nested_parents: Vec<String>,
    /// `parent.child` entries whose child is absent from the parent
    pub invalid_nested_children: Vec<String>,
    /// `parent.!child` entries whose child is absent from the parent
    pub invalid_exclusions: Vec<String>,
    pub surviving_selection: ViewSelection,
    pub warnings: Vec<Notice>,
}

impl ValidationOutcome {
    pub fn has_violations(&self) -> bool {
        !self.invalid_top.is_empty()
            || !self.invalid_nested_parents.is_empty()
            || !self.invalid_nested_children.is_empty()
            || !self.invalid_exclusions.is_empty()
    }

    /// All violations, in bucket order, as one display list.
    pub fn violation_list(&self) -> String {
        self.invalid_top
            .iter()
            .chain(self.invalid_nested_parents.iter())
            .chain(self.invalid_nested_children.iter())
            .chain(self.invalid_exclusions.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Check every selected name against the target's fields and apply the mode
/// policy. `label` names the view in user-facing messages.
pub fn validate_selection(
    store: &mut DeclarationStore,
    target: &ResolvedRecord,
    selection: &ViewSelection,
    mode: ValidationMode,
    label: &str,
) -> ValidationOutcome {
    let members = target.decl().own_members();
    let by_name: FxHashMap<&str, &PropertySig> = members
        .iter()
        .map(|member| (member.name.as_str(), member))
        .collect();

    let mut outcome = ValidationOutcome {
        mode,
        invalid_top: Vec::new(),
        invalid_nested_parents: Vec::new(),
        invalid_nested_children: Vec::new(),
        invalid_exclusions: Vec::new(),
        surviving_selection: selection.clone(),
        warnings: Vec::new(),
    };
    let surviving = &mut outcome.surviving_selection;

    // Top-level names. An invalid name also takes its exclusion entry down.
    for name in selection.top_fields.iter() {
        if !by_name.contains_key(name.as_str()) {
            outcome.invalid_top.push(name.clone());
            surviving.top_fields.shift_remove(name);
            surviving.optional_top_fields.shift_remove(name);
            surviving.exclusions.shift_remove(name);
        }
    }

    // Nested parents and their children.
    for (parent, children) in selection.nested_fields.iter() {
        let Some(member) = by_name.get(parent.as_str()) else {
            outcome.invalid_nested_parents.push(parent.clone());
            surviving.nested_fields.shift_remove(parent);
            surviving.optional_nested_fields.shift_remove(parent);
            continue;
        };
        match child_context(store, target.file(), member) {
            Ok(context) => {
                for child in children.iter() {
                    if !context.fields.iter().any(|field| &field.name == child) {
                        outcome
                            .invalid_nested_children
                            .push(format!("{parent}.{child}"));
                        if let Some(set) = surviving.nested_fields.get_mut(parent) {
                            set.shift_remove(child);
                        }
                        if let Some(set) = surviving.optional_nested_fields.get_mut(parent) {
                            set.shift_remove(child);
                        }
                    }
                }
                // A composite emptied by dropping is no composite at all.
                if surviving
                    .nested_fields
                    .get(parent)
                    .is_some_and(|set| set.is_empty())
                {
                    surviving.nested_fields.shift_remove(parent);
                    surviving.optional_nested_fields.shift_remove(parent);
                }
            }
            Err(failure) => {
                debug!(parent, ?failure, "composite parent rejected");
                outcome.invalid_nested_parents.push(parent.clone());
                surviving.nested_fields.shift_remove(parent);
                surviving.optional_nested_fields.shift_remove(parent);
            }
        }
    }

    // Exclusions: the parent survived the top pass; its children must exist
    // in the parent's composite context.
    for (parent, excluded) in selection.exclusions.iter() {
        let Some(member) = by_name.get(parent.as_str()) else {
            continue; // already reported through invalid_top
        };
        match child_context(store, target.file(), member) {
            Ok(context) => {
                for child in excluded.iter() {
                    if !context.fields.iter().any(|field| &field.name == child) {
                        outcome
                            .invalid_exclusions
                            .push(format!("{parent}.!{child}"));
                        if let Some(set) = surviving.exclusions.get_mut(parent) {
                            set.shift_remove(child);
                        }
                    }
                }
                if surviving
                    .exclusions
                    .get(parent)
                    .is_some_and(|set| set.is_empty())
                {
                    surviving.exclusions.shift_remove(parent);
                }
            }
            Err(failure) => {
                debug!(parent, ?failure, "exclusion parent has no composite context");
                for child in excluded.iter() {
                    outcome
                        .invalid_exclusions
                        .push(format!("{parent}.!{child}"));
                }
                // The parent stays a plain top-level field.
                surviving.exclusions.shift_remove(parent);
            }
        }
    }

    if outcome.has_violations() {
        let list = outcome.violation_list();
        match mode {
            ValidationMode::Strict => {
                outcome.surviving_selection = ViewSelection::default();
                outcome.warnings.push(Notice::warning(format!(
                    "view '{label}' skipped; invalid selections: {list}"
                )));
            }
            ValidationMode::Partial => {
                outcome.warnings.push(Notice::warning(format!(
                    "view '{label}': dropped invalid selections: {list}"
                )));
            }
            ValidationMode::Loose => {
                outcome.warnings.push(Notice::info(format!(
                    "view '{label}': ignored unknown selections: {list}"
                )));
            }
        }
    }
    outcome
}

// =============================================================================
// Assembly
// =============================================================================

/// Render the surviving selection into final fields, walking the target's
/// members in declaration order so the output never reorders the source.
pub fn build_view_fields(
    store: &mut DeclarationStore,
    target: &ResolvedRecord,
    selection: &ViewSelection,
) -> Vec<FieldDescriptor> {
    let mut fields = Vec::new();
    let source = target.source();
    for member in target.decl().own_members() {
        let name = member.name.as_str();
        if let Some(excluded) = selection.exclusions.get(name) {
            if let Some(field) = excluded_composite(store, target, member, excluded, selection) {
                let forced = selection.optional_top_fields.contains(name);
                fields.push(FieldDescriptor {
                    is_optional: field.is_optional || forced,
                    ..field
                });
            }
            continue;
        }
        if selection.renders_nested(name) {
            if let Some(children) = selection.nested_fields.get(name) {
                if let Some(field) = nested_composite(store, target, member, children, selection) {
                    fields.push(field);
                }
            }
            continue;
        }
        if selection.top_fields.contains(name) {
            let forced = selection.optional_top_fields.contains(name);
            fields.push(FieldDescriptor::new(
                member.name.clone(),
                member_type_text(member, source),
                member.is_optional || forced,
            ));
        }
    }
    fields
}

/// `parent.!child`: the whole composite minus the excluded children.
fn excluded_composite(
    store: &mut DeclarationStore,
    target: &ResolvedRecord,
    member: &PropertySig,
    excluded: &IndexSet<String>,
    selection: &ViewSelection,
) -> Option<FieldDescriptor> {
    let context = child_context(store, target.file(), member).ok()?;
    let children: Vec<FieldDescriptor> = context
        .fields
        .iter()
        .filter(|field| !excluded.contains(field.name.as_str()))
        .map(|field| mark_optional(field, &member.name, selection))
        .collect();
    if children.is_empty() {
        return None;
    }
    Some(FieldDescriptor::new(
        member.name.clone(),
        composite_text(&children, context.is_array),
        member.is_optional,
    ))
}

/// `parent.child` tokens: a composite of just the selected children, in the
/// child declaration's own order.
fn nested_composite(
    store: &mut DeclarationStore,
    target: &ResolvedRecord,
    member: &PropertySig,
    children: &IndexSet<String>,
    selection: &ViewSelection,
) -> Option<FieldDescriptor> {
    let context = child_context(store, target.file(), member).ok()?;
    let selected: Vec<FieldDescriptor> = context
        .fields
        .iter()
        .filter(|field| children.contains(field.name.as_str()))
        .map(|field| mark_optional(field, &member.name, selection))
        .collect();
    if selected.is_empty() {
        return None;
    }
    let forced = selection.optional_top_fields.contains(member.name.as_str());
    Some(FieldDescriptor::new(
        member.name.clone(),
        composite_text(&selected, context.is_array),
        member.is_optional || forced,
    ))
}

fn mark_optional(
    field: &FieldDescriptor,
    parent: &str,
    selection: &ViewSelection,
) -> FieldDescriptor {
    let forced = selection
        .optional_nested_fields
        .get(parent)
        .is_some_and(|set| set.contains(field.name.as_str()));
    FieldDescriptor {
        is_optional: field.is_optional || forced,
        ..field.clone()
    }
}

/// `{ a: string; b?: number }`, with `[]` appended for array contexts.
fn composite_text(children: &[FieldDescriptor], is_array: bool) -> String {
    let mut inner = String::new();
    for (index, child) in children.iter().enumerate() {
        if index > 0 {
            inner.push_str("; ");
        }
        inner.push_str(&child.name);
        if child.is_optional {
            inner.push('?');
        }
        inner.push_str(": ");
        inner.push_str(&child.type_text);
    }
    if is_array {
        format!("{{ {inner} }}[]")
    } else {
        format!("{{ {inner} }}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsgen_syntax::parse_source;

    fn target(text: &str, name: &str) -> ResolvedRecord {
        let file = Arc::new(parse_source("view_test.ts", text.to_string()));
        ResolvedRecord::find(&file, name).unwrap()
    }

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|token| token.to_string()).collect()
    }

    const POST: &str = r#"
interface Post {
    id: string;
    title: string;
    text: string;
    images: string[];
    author: { id: string; name: string };
}
"#;

    #[test]
    fn test_split_classifies_every_token_kind() {
        let selection = split_tokens(&tokens(&[
            "id",
            "?title",
            "author.name",
            "author.?bio",
            "meta.!internal",
        ]));
        assert!(selection.top_fields.contains("id"));
        assert!(selection.top_fields.contains("title"));
        assert!(selection.optional_top_fields.contains("title"));
        assert!(selection.nested_fields["author"].contains("name"));
        assert!(selection.nested_fields["author"].contains("bio"));
        assert!(selection.optional_nested_fields["author"].contains("bio"));
        assert!(!selection.optional_nested_fields["author"].contains("name"));
        assert!(selection.top_fields.contains("meta"));
        assert!(selection.exclusions["meta"].contains("internal"));
    }

    #[test]
    fn test_split_drops_malformed_tokens() {
        let selection = split_tokens(&tokens(&["", "?", ".x", "a.", "a.!", "  ok  "]));
        assert_eq!(selection.top_fields.len(), 1);
        assert!(selection.top_fields.contains("ok"));
        assert!(selection.nested_fields.is_empty());
        assert!(selection.exclusions.is_empty());
    }

    #[test]
    fn test_nested_beats_top_unless_excluded() {
        let plain = split_tokens(&tokens(&["author", "author.name"]));
        assert!(plain.renders_nested("author"));
        let excluded = split_tokens(&tokens(&["author.name", "author.!id"]));
        assert!(!excluded.renders_nested("author"));
    }

    #[test]
    fn test_partial_mode_drops_and_warns() {
        let target = target(POST, "Post");
        let mut store = DeclarationStore::new();
        let selection = split_tokens(&tokens(&["id", "missing", "author.name", "author.nope"]));
        let outcome = validate_selection(
            &mut store,
            &target,
            &selection,
            ValidationMode::Partial,
            "summary",
        );
        assert_eq!(outcome.invalid_top, vec!["missing".to_string()]);
        assert_eq!(
            outcome.invalid_nested_children,
            vec!["author.nope".to_string()]
        );
        assert!(outcome.surviving_selection.top_fields.contains("id"));
        assert!(!outcome.surviving_selection.top_fields.contains("missing"));
        assert!(outcome.surviving_selection.nested_fields["author"].contains("name"));
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].severity.is_warning());
        assert!(outcome.warnings[0].message.contains("missing"));
        assert!(outcome.warnings[0].message.contains("author.nope"));
    }

    #[test]
    fn test_strict_mode_aborts_whole_view() {
        let target = target(POST, "Post");
        let mut store = DeclarationStore::new();
        let selection = split_tokens(&tokens(&["id", "title", "missing"]));
        let outcome = validate_selection(
            &mut store,
            &target,
            &selection,
            ValidationMode::Strict,
            "summary",
        );
        assert!(outcome.surviving_selection.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].message.contains("skipped"));
    }

    #[test]
    fn test_loose_mode_is_informational() {
        let target = target(POST, "Post");
        let mut store = DeclarationStore::new();
        let selection = split_tokens(&tokens(&["id", "missing"]));
        let outcome = validate_selection(
            &mut store,
            &target,
            &selection,
            ValidationMode::Loose,
            "summary",
        );
        assert!(outcome.surviving_selection.top_fields.contains("id"));
        assert!(!outcome.warnings[0].severity.is_warning());
    }

    #[test]
    fn test_validation_is_idempotent() {
        let target = target(POST, "Post");
        let mut store = DeclarationStore::new();
        let selection = split_tokens(&tokens(&["id", "missing", "author.nope"]));
        let first = validate_selection(
            &mut store,
            &target,
            &selection,
            ValidationMode::Partial,
            "v",
        );
        let second = validate_selection(
            &mut store,
            &target,
            &selection,
            ValidationMode::Partial,
            "v",
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_emptied_composite_is_dropped() {
        let target = target(POST, "Post");
        let mut store = DeclarationStore::new();
        let selection = split_tokens(&tokens(&["id", "author.nope"]));
        let outcome = validate_selection(
            &mut store,
            &target,
            &selection,
            ValidationMode::Partial,
            "v",
        );
        assert!(!outcome
            .surviving_selection
            .nested_fields
            .contains_key("author"));
        let fields = build_view_fields(&mut store, &target, &outcome.surviving_selection);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "id");
    }

    #[test]
    fn test_build_keeps_target_declaration_order() {
        let target = target(POST, "Post");
        let mut store = DeclarationStore::new();
        // Token order scrambled on purpose.
        let selection = split_tokens(&tokens(&["author.name", "text", "id"]));
        let fields = build_view_fields(&mut store, &target, &selection);
        let names: Vec<_> = fields.iter().map(|field| field.name.as_str()).collect();
        assert_eq!(names, vec!["id", "text", "author"]);
    }

    #[test]
    fn test_exclusion_composite_drops_named_child() {
        let target = target(POST, "Post");
        let mut store = DeclarationStore::new();
        let selection = split_tokens(&tokens(&["id", "author.!id"]));
        let fields = build_view_fields(&mut store, &target, &selection);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].name, "author");
        assert_eq!(fields[1].type_text, "{ name: string }");
    }

    #[test]
    fn test_optional_marker_with_exclusion_keeps_composite() {
        let target = target(POST, "Post");
        let mut store = DeclarationStore::new();
        let selection = split_tokens(&tokens(&["?author", "author.!id"]));
        let fields = build_view_fields(&mut store, &target, &selection);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "author");
        assert!(fields[0].is_optional);
        assert_eq!(fields[0].type_text, "{ name: string }");
    }

    #[test]
    fn test_array_parent_wraps_composite() {
        let target = target(
            "interface Feed { entries: Array<{ id: string; body: string }>; tags: { label: string }[]; }",
            "Feed",
        );
        let mut store = DeclarationStore::new();
        let selection = split_tokens(&tokens(&["entries.id", "tags.label"]));
        let fields = build_view_fields(&mut store, &target, &selection);
        assert_eq!(fields[0].type_text, "{ id: string }[]");
        assert_eq!(fields[1].type_text, "{ label: string }[]");
    }

    #[test]
    fn test_nullable_parent_uses_non_null_context() {
        let target = target(
            "interface Page { header: { title: string; subtitle: string } | null; }",
            "Page",
        );
        let mut store = DeclarationStore::new();
        let selection = split_tokens(&tokens(&["header.title"]));
        let outcome = validate_selection(
            &mut store,
            &target,
            &selection,
            ValidationMode::Partial,
            "v",
        );
        assert!(!outcome.has_violations());
        let fields = build_view_fields(&mut store, &target, &outcome.surviving_selection);
        assert_eq!(fields[0].type_text, "{ title: string }");
    }

    #[test]
    fn test_array_of_union_parent_is_unsupported() {
        let target = target(
            "interface Mixed { entries: ({ a: string } | { b: string })[]; id: string; }",
            "Mixed",
        );
        let mut store = DeclarationStore::new();
        let selection = split_tokens(&tokens(&["id", "entries.a"]));
        let outcome = validate_selection(
            &mut store,
            &target,
            &selection,
            ValidationMode::Partial,
            "v",
        );
        assert_eq!(outcome.invalid_nested_parents, vec!["entries".to_string()]);
        let fields = build_view_fields(&mut store, &target, &outcome.surviving_selection);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "id");
    }

    #[test]
    fn test_scalar_parent_cannot_nest() {
        let target = target(POST, "Post");
        let mut store = DeclarationStore::new();
        let selection = split_tokens(&tokens(&["title.length"]));
        let outcome = validate_selection(
            &mut store,
            &target,
            &selection,
            ValidationMode::Partial,
            "v",
        );
        assert_eq!(outcome.invalid_nested_parents, vec!["title".to_string()]);
        assert!(outcome.surviving_selection.is_empty());
    }

    #[test]
    fn test_invalid_exclusion_leaves_plain_top_field() {
        let target = target(POST, "Post");
        let mut store = DeclarationStore::new();
        let selection = split_tokens(&tokens(&["author.!nope"]));
        let outcome = validate_selection(
            &mut store,
            &target,
            &selection,
            ValidationMode::Partial,
            "v",
        );
        assert_eq!(outcome.invalid_exclusions, vec!["author.!nope".to_string()]);
        let fields = build_view_fields(&mut store, &target, &outcome.surviving_selection);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "author");
        assert_eq!(fields[0].type_text, "{ id: string; name: string }");
    }
}
