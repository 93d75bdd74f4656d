//! Parsed declaration structures.
//!
//! The tree deliberately covers only what shape derivation needs: imports,
//! record-like declarations (interfaces and type aliases), property
//! signatures, and a small structural type-expression tree. Every node keeps
//! its span so the author's spelling can be reproduced verbatim; anything the
//! subset does not model structurally is an `Opaque` node whose text is the
//! span slice.

use crate::CheckerError;
use bitflags::bitflags;
use std::path::PathBuf;
use tsgen_common::Span;

bitflags! {
    /// Declaration modifiers the parser records.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ModifierFlags: u8 {
        const EXPORT = 1 << 0;
        const DECLARE = 1 << 1;
    }
}

/// Kind of a record-like declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeclKind {
    Interface,
    TypeAlias,
}

impl DeclKind {
    /// Keyword as it appears in source.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Interface => "interface",
            DeclKind::TypeAlias => "type",
        }
    }
}

/// A structural type expression.
///
/// Only the shapes the generator inspects are modeled; everything else is
/// captured as `Opaque` text. `Error` marks positions where a type was
/// expected but none could be read - computing its text fails with a
/// `CheckerError`.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeNode {
    /// `Name`, `Ns.Name`, or `Name<Args>`
    Reference {
        name: String,
        type_args: Vec<TypeNode>,
        span: Span,
    },
    /// `'key'` - string-literal type
    StringLiteral { value: String, span: Span },
    /// `{ a: T; b?: U }` - inline anonymous record
    ObjectLiteral { members: Vec<PropertySig>, span: Span },
    /// `T[]`
    Array { element: Box<TypeNode>, span: Span },
    /// `A | B | null`
    Union { members: Vec<TypeNode>, span: Span },
    /// Anything else, kept as raw source text
    Opaque { span: Span },
    /// A position where a type was expected but none was present
    Error { span: Span },
}

impl TypeNode {
    /// The source span of this node.
    pub fn span(&self) -> Span {
        match self {
            TypeNode::Reference { span, .. }
            | TypeNode::StringLiteral { span, .. }
            | TypeNode::ObjectLiteral { span, .. }
            | TypeNode::Array { span, .. }
            | TypeNode::Union { span, .. }
            | TypeNode::Opaque { span }
            | TypeNode::Error { span } => *span,
        }
    }

    /// The author's spelling of this type.
    ///
    /// Multiline spellings are collapsed to one line so a type written across
    /// several source lines stays usable as a field annotation. Fails for
    /// `Error` nodes - the caller decides what stands in for an unreadable
    /// type.
    pub fn computed_text(&self, source: &str) -> Result<String, CheckerError> {
        if let TypeNode::Error { .. } = self {
            return Err(CheckerError::MalformedType {
                span: self.span(),
            });
        }
        let raw = self.span().text(source);
        if raw.is_empty() {
            return Err(CheckerError::MalformedType {
                span: self.span(),
            });
        }
        Ok(collapse_lines(raw))
    }

    /// True for the `null` / `undefined` keywords.
    pub fn is_nullish(&self) -> bool {
        matches!(
            self,
            TypeNode::Reference { name, type_args, .. }
                if type_args.is_empty() && (name == "null" || name == "undefined")
        )
    }
}

/// Collapse a multiline spelling to a single line.
fn collapse_lines(raw: &str) -> String {
    if !raw.contains('\n') {
        return raw.trim().to_string();
    }
    let mut out = String::with_capacity(raw.len());
    for (index, line) in raw.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if index > 0 && !out.is_empty() {
            out.push(' ');
        }
        out.push_str(trimmed);
    }
    out
}

/// A property signature inside an interface body or object-literal type.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertySig {
    /// Property name (identifier text, or the value of a literal key)
    pub name: String,
    /// Declared type annotation, if present
    pub type_node: Option<TypeNode>,
    /// `name?:` optional marker
    pub is_optional: bool,
    /// `readonly` modifier
    pub is_readonly: bool,
    /// Whole member span
    pub span: Span,
}

/// A record-like declaration: `interface X ...` or `type X = ...`.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordDecl {
    pub name: String,
    pub kind: DeclKind,
    pub modifiers: ModifierFlags,
    /// Interface members (empty for type aliases)
    pub members: Vec<PropertySig>,
    /// `extends` clause entries, in source order (interfaces only)
    pub heritage: Vec<TypeNode>,
    /// The aliased type (type aliases only)
    pub alias_type: Option<TypeNode>,
    /// Whether the declaration carries type parameters (`<T>`, unsupported
    /// beyond being skipped)
    pub has_type_params: bool,
    /// Whole declaration span, including the body
    pub span: Span,
}

impl RecordDecl {
    /// Member signatures declared directly on this record, if it has a
    /// syntactic body: interface members, or the members of an alias to an
    /// inline object literal. Aliases to named references have none.
    pub fn own_members(&self) -> &[PropertySig] {
        match self.kind {
            DeclKind::Interface => &self.members,
            DeclKind::TypeAlias => match &self.alias_type {
                Some(TypeNode::ObjectLiteral { members, .. }) => members,
                _ => &[],
            },
        }
    }
}

/// A module specifier imported by the file (`import ... from '...'`,
/// `import '...'`, or `export ... from '...'`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportDecl {
    pub specifier: String,
    pub span: Span,
}

impl ImportDecl {
    /// True for `./` and `../` specifiers - the only ones nearby resolution
    /// follows.
    pub fn is_relative(&self) -> bool {
        self.specifier.starts_with("./") || self.specifier.starts_with("../")
    }
}

/// A parsed source file: the declaration-level view of one module.
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
    /// Import specifiers in source order
    pub imports: Vec<ImportDecl>,
    /// Record-like declarations in source order
    pub declarations: Vec<RecordDecl>,
}

impl SourceFile {
    /// Look up a declaration by name. Returns the first match in source
    /// order.
    pub fn declaration(&self, name: &str) -> Option<&RecordDecl> {
        self.declarations.iter().find(|decl| decl.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_relativity() {
        let relative = ImportDecl {
            specifier: "./models/post".to_string(),
            span: Span::default(),
        };
        let bare = ImportDecl {
            specifier: "react".to_string(),
            span: Span::default(),
        };
        assert!(relative.is_relative());
        assert!(!bare.is_relative());
    }

    #[test]
    fn test_collapse_lines() {
        assert_eq!(collapse_lines("Pick<\n  Base,\n  'a' | 'b'\n>"), "Pick< Base, 'a' | 'b' >");
        assert_eq!(collapse_lines("  string  "), "string");
    }
}
