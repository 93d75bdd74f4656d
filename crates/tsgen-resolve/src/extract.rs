//! Field extraction: normalizing a declaration into its field list.
//!
//! Three declaration shapes come out identical:
//! - a direct interface declaration;
//! - an alias to an inline object literal;
//! - an alias to a named (possibly wrapper-wrapped) reference, followed
//!   through nearby resolution until a body is found.
//!
//! A member whose type text cannot be read keeps its place in the list with
//! the opaque `any` marker; extraction itself never fails.

use crate::heritage::unwrap_wrappers;
use crate::nearby::{resolve_nearby, ResolvedRecord};
use crate::store::DeclarationStore;
use tracing::{debug, warn};
use tsgen_syntax::{CheckerError, DeclKind, PropertySig, TypeNode};

/// Stand-in type text when a member's real type is unreadable.
pub const ANY_TYPE: &str = "any";

/// Alias-to-alias hops extraction will follow before giving up.
const MAX_REFERENCE_HOPS: usize = 8;

/// One normalized field of a record declaration.
///
/// Identity is `name` within the owning declaration; the type is carried as
/// opaque text exactly as the author spelled it (collapsed to one line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub type_text: String,
    pub is_optional: bool,
}

impl FieldDescriptor {
    pub fn new(
        name: impl Into<String>,
        type_text: impl Into<String>,
        is_optional: bool,
    ) -> FieldDescriptor {
        FieldDescriptor {
            name: name.into(),
            type_text: type_text.into(),
            is_optional,
        }
    }
}

/// Extract the record's fields, in declaration order.
pub fn extract_fields(
    store: &mut DeclarationStore,
    record: &ResolvedRecord,
) -> Vec<FieldDescriptor> {
    match resolve_member_source(store, record, MAX_REFERENCE_HOPS) {
        Some(source) => fields_from_members(source.decl().own_members(), source.source()),
        None => Vec::new(),
    }
}

/// Find the record that actually carries member signatures: the declaration
/// itself, or - for an alias to a named reference - the declaration the
/// reference resolves to nearby, followed up to a fixed hop limit.
pub fn resolve_member_source(
    store: &mut DeclarationStore,
    record: &ResolvedRecord,
    hops: usize,
) -> Option<ResolvedRecord> {
    let decl = record.decl();
    if decl.kind == DeclKind::Interface || !decl.own_members().is_empty() {
        return Some(record.clone());
    }
    if hops == 0 {
        warn!(name = %decl.name, "alias chain too deep; treating as field-less");
        return None;
    }
    let alias = decl.alias_type.as_ref()?;
    match unwrap_wrappers(alias) {
        TypeNode::Reference { name, .. } => {
            match resolve_nearby(store, name, &record.file().path) {
                Ok(Some(next)) => resolve_member_source(store, &next, hops - 1),
                Ok(None) => {
                    debug!(alias = %decl.name, target = %name, "alias target not found nearby");
                    None
                }
                Err(error) => {
                    warn!(%error, "alias target unreadable");
                    None
                }
            }
        }
        // Unions, literals, function types: no fields to extract.
        _ => None,
    }
}

/// Normalize member signatures into field descriptors.
pub fn fields_from_members(members: &[PropertySig], source: &str) -> Vec<FieldDescriptor> {
    members
        .iter()
        .map(|member| {
            FieldDescriptor::new(
                member.name.clone(),
                member_type_text(member, source),
                member.is_optional,
            )
        })
        .collect()
}

/// The member's annotation text. Failures are downgraded to the opaque
/// marker right here; nothing above this sees a `CheckerError`.
pub fn member_type_text(member: &PropertySig, source: &str) -> String {
    let computed = match &member.type_node {
        Some(node) => node.computed_text(source),
        None => Err(CheckerError::MissingAnnotation { span: member.span }),
    };
    match computed {
        Ok(text) => text,
        Err(error) => {
            debug!(member = %member.name, %error, "defaulting member type to opaque marker");
            ANY_TYPE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tsgen_syntax::parse_source;

    fn record(text: &str, name: &str) -> ResolvedRecord {
        let file = Arc::new(parse_source("test.ts", text.to_string()));
        ResolvedRecord::find(&file, name).unwrap()
    }

    fn write(dir: &TempDir, name: &str, text: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_interface_fields_in_declaration_order() {
        let mut store = DeclarationStore::new();
        let target = record(
            "interface Post { id: string; title: string; draft?: boolean; }",
            "Post",
        );
        let fields = extract_fields(&mut store, &target);
        assert_eq!(
            fields,
            vec![
                FieldDescriptor::new("id", "string", false),
                FieldDescriptor::new("title", "string", false),
                FieldDescriptor::new("draft", "boolean", true),
            ]
        );
    }

    #[test]
    fn test_alias_to_inline_record() {
        let mut store = DeclarationStore::new();
        let target = record("type Point = { x: number; y: number };", "Point");
        let fields = extract_fields(&mut store, &target);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "x");
        assert_eq!(fields[1].type_text, "number");
    }

    #[test]
    fn test_alias_to_named_reference_follows_nearby() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "author.ts",
            "export interface Author { name: string; email?: string; }",
        );
        let main = write(
            &dir,
            "main.ts",
            "import { Author } from './author';\ntype Writer = Readonly<Author>;\n",
        );
        let mut store = DeclarationStore::new();
        let file = store.get_or_load(&main).unwrap();
        let target = ResolvedRecord::find(&file, "Writer").unwrap();
        let fields = extract_fields(&mut store, &target);
        assert_eq!(
            fields,
            vec![
                FieldDescriptor::new("name", "string", false),
                FieldDescriptor::new("email", "string", true),
            ]
        );
    }

    #[test]
    fn test_unannotated_member_gets_opaque_marker() {
        let mut store = DeclarationStore::new();
        let target = record("interface Odd { bare; typed: string; }", "Odd");
        let fields = extract_fields(&mut store, &target);
        assert_eq!(fields[0].type_text, ANY_TYPE);
        assert_eq!(fields[1].type_text, "string");
    }

    #[test]
    fn test_alias_cycle_terminates_empty() {
        let dir = TempDir::new().unwrap();
        let main = write(&dir, "main.ts", "type A = B;\ntype B = A;\n");
        let mut store = DeclarationStore::new();
        let file = store.get_or_load(&main).unwrap();
        let target = ResolvedRecord::find(&file, "A").unwrap();
        assert!(extract_fields(&mut store, &target).is_empty());
    }

    #[test]
    fn test_union_alias_has_no_fields() {
        let mut store = DeclarationStore::new();
        let target = record("type Status = 'open' | 'closed';", "Status");
        assert!(extract_fields(&mut store, &target).is_empty());
    }
}
