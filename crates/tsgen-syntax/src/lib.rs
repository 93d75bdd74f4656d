//! TypeScript declaration syntax for the tsgen generator.
//!
//! This crate provides the lexical and syntactic phase:
//! - `SyntaxKind` / `Token` - Token types over byte spans
//! - `tokenize` - Trivia-skipping tokenizer
//! - `parse_source` - Declaration-level parser producing a `SourceFile`
//! - `RecordDecl` / `PropertySig` / `TypeNode` - The declaration AST
//!
//! The parser reads whole program files but models only what shape
//! derivation needs: imports, interfaces, and type aliases. Function bodies,
//! classes, and statements are stepped over without being understood.

use std::fmt;
use tsgen_common::Span;

// Tokenizer - SyntaxKind, Token, tokenize
pub mod scanner;
pub use scanner::{string_value, tokenize, SyntaxKind, Token};

// Declaration AST - declarations, members, type nodes
pub mod ast;
pub use ast::{
    DeclKind, ImportDecl, ModifierFlags, PropertySig, RecordDecl, SourceFile, TypeNode,
};

// Declaration-level parser
pub mod parser;
pub use parser::parse_source;

/// Failure to compute the printable type text of a member.
///
/// Callers treat these as "type unknown" rather than hard errors: the member
/// keeps participating in shape derivation with an unresolved type marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckerError {
    /// The member carries no type annotation at all.
    MissingAnnotation { span: Span },
    /// The annotation is present but its text could not be recovered.
    MalformedType { span: Span },
}

impl CheckerError {
    pub fn span(&self) -> Span {
        match self {
            CheckerError::MissingAnnotation { span } | CheckerError::MalformedType { span } => {
                *span
            }
        }
    }
}

impl fmt::Display for CheckerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckerError::MissingAnnotation { .. } => write!(f, "member has no type annotation"),
            CheckerError::MalformedType { .. } => write!(f, "type annotation text is unreadable"),
        }
    }
}
