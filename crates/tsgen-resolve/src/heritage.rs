//! Pick/Omit heritage selectors.
//!
//! A declaration written as a narrowing of a base -
//! `interface Narrow extends Pick<Base, 'a' | 'b'>` or
//! `type Narrow = Omit<Base, 'c'>` - carries a heritage selector. Selectors
//! are recognized structurally on the parsed type tree, so formatting
//! (whitespace, multiline generics) never affects matching. They are
//! recomputed per request and never persisted.

use crate::extract::FieldDescriptor;
use indexmap::IndexSet;
use rustc_hash::FxHashSet;
use tracing::trace;
use tsgen_syntax::{DeclKind, RecordDecl, TypeNode};

/// Single-argument wrapper references transparent to base-name resolution.
const TRANSPARENT_WRAPPERS: [&str; 3] = ["Readonly", "Partial", "Required"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    Pick,
    Omit,
}

impl SelectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectorKind::Pick => "Pick",
            SelectorKind::Omit => "Omit",
        }
    }
}

/// A parsed `Pick`/`Omit` narrowing: which base, and which keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeritageSelector {
    pub kind: SelectorKind,
    /// Base type name as written, possibly dotted (`models.Post`)
    pub base_name: String,
    /// Selected (pick) or removed (omit) keys, in written order
    pub keys: IndexSet<String>,
}

/// Keys a pick selector names that the base does not declare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKeys {
    pub base_name: String,
    pub keys: Vec<String>,
}

/// Peel `Readonly<...>` / `Partial<...>` / `Required<...>` down to the wrapped
/// type. Anything else is returned unchanged.
pub fn unwrap_wrappers(node: &TypeNode) -> &TypeNode {
    let mut current = node;
    while let TypeNode::Reference {
        name, type_args, ..
    } = current
    {
        if type_args.len() == 1 && TRANSPARENT_WRAPPERS.contains(&name.as_str()) {
            current = &type_args[0];
        } else {
            break;
        }
    }
    current
}

/// Find the declaration's heritage selector, if any.
///
/// Interfaces are scanned clause by clause; for a type alias the aliased
/// type itself is the single candidate clause. The first clause yielding at
/// least one key wins; a clause with zero usable keys is treated as absent
/// and scanning continues.
pub fn parse_heritage(decl: &RecordDecl, source: &str) -> Option<HeritageSelector> {
    let clauses: &[TypeNode] = match decl.kind {
        DeclKind::Interface => &decl.heritage,
        DeclKind::TypeAlias => match &decl.alias_type {
            Some(alias) => std::slice::from_ref(alias),
            None => &[],
        },
    };
    clauses
        .iter()
        .find_map(|clause| selector_from_clause(clause, source))
}

fn selector_from_clause(clause: &TypeNode, source: &str) -> Option<HeritageSelector> {
    let TypeNode::Reference {
        name, type_args, ..
    } = unwrap_wrappers(clause)
    else {
        return None;
    };
    let kind = match name.as_str() {
        "Pick" => SelectorKind::Pick,
        "Omit" => SelectorKind::Omit,
        _ => return None,
    };
    if type_args.len() != 2 {
        return None;
    }
    let base_name = base_name_of(&type_args[0], source)?;
    let keys = literal_keys(&type_args[1]);
    if keys.is_empty() {
        trace!(%base_name, selector = kind.as_str(), "clause has no usable keys; treated as absent");
        return None;
    }
    Some(HeritageSelector {
        kind,
        base_name,
        keys,
    })
}

fn base_name_of(node: &TypeNode, source: &str) -> Option<String> {
    match unwrap_wrappers(node) {
        TypeNode::Reference { name, .. } => Some(name.clone()),
        other => other.computed_text(source).ok(),
    }
}

/// Collect string-literal keys out of `'a'` or `'a' | 'b' | ...`. Anything
/// that is not a string literal contributes no key.
fn literal_keys(node: &TypeNode) -> IndexSet<String> {
    let mut keys = IndexSet::new();
    collect_keys(node, &mut keys);
    keys
}

fn collect_keys(node: &TypeNode, keys: &mut IndexSet<String>) {
    match node {
        TypeNode::StringLiteral { value, .. } => {
            keys.insert(value.clone());
        }
        TypeNode::Union { members, .. } => {
            for member in members {
                collect_keys(member, keys);
            }
        }
        _ => {}
    }
}

/// Apply the selector to the base's fields, then merge the narrowing
/// declaration's own fields on top.
///
/// - pick: base fields named by the keys, in base order. A key the base does
///   not declare aborts with the full unknown list.
/// - omit: base fields not named by the keys.
/// Own-declared fields always win: they replace an inherited field in place
/// or append after it.
pub fn apply_selector(
    selector: &HeritageSelector,
    base_fields: &[FieldDescriptor],
    own_fields: &[FieldDescriptor],
) -> Result<Vec<FieldDescriptor>, UnknownKeys> {
    let mut fields: Vec<FieldDescriptor> = match selector.kind {
        SelectorKind::Pick => {
            let declared: FxHashSet<&str> =
                base_fields.iter().map(|field| field.name.as_str()).collect();
            let unknown: Vec<String> = selector
                .keys
                .iter()
                .filter(|key| !declared.contains(key.as_str()))
                .cloned()
                .collect();
            if !unknown.is_empty() {
                return Err(UnknownKeys {
                    base_name: selector.base_name.clone(),
                    keys: unknown,
                });
            }
            base_fields
                .iter()
                .filter(|field| selector.keys.contains(field.name.as_str()))
                .cloned()
                .collect()
        }
        SelectorKind::Omit => base_fields
            .iter()
            .filter(|field| !selector.keys.contains(field.name.as_str()))
            .cloned()
            .collect(),
    };
    merge_own_fields(&mut fields, own_fields);
    Ok(fields)
}

/// Replace same-named fields in place, append the rest in their own order.
pub fn merge_own_fields(fields: &mut Vec<FieldDescriptor>, own_fields: &[FieldDescriptor]) {
    for own in own_fields {
        match fields.iter_mut().find(|field| field.name == own.name) {
            Some(existing) => *existing = own.clone(),
            None => fields.push(own.clone()),
        }
    }
}
