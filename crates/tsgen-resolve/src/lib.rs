//! Declaration resolution and shape derivation for the tsgen generator.
//!
//! This crate is the engine: given a named record-like declaration (possibly
//! narrowed through a `Pick`/`Omit` heritage selector, possibly defined in a
//! file reachable only through relative imports), it derives the validated
//! field list a generated artifact must conform to.
//!
//! Pieces, leaf-first:
//! - `DeclarationStore` - lazily-populated parse cache with wholesale
//!   invalidation
//! - `resolve_nearby` - bounded three-tier symbol lookup (current file,
//!   relative imports, same-directory names)
//! - `extract_fields` - declaration to normalized field list
//! - `parse_heritage` / `apply_selector` - Pick/Omit narrowing
//! - `split_tokens` / `validate_selection` - view schemas and the
//!   strict/partial/loose validation policies
//! - `ShapeResolver` - the orchestrator and public entry point
//!
//! Everything is request-scoped except the store's cache. Failures are
//! tagged values; this crate never panics across its public boundary.

// Parse cache and filesystem probing
pub mod store;
pub use store::{DeclarationStore, StoreError};

// Bounded symbol lookup
pub mod nearby;
pub use nearby::{resolve_nearby, ResolvedRecord};

// Field normalization
pub mod extract;
pub use extract::{extract_fields, FieldDescriptor, ANY_TYPE};

// Pick/Omit heritage selectors
pub mod heritage;
pub use heritage::{apply_selector, parse_heritage, HeritageSelector, SelectorKind};

// View schemas: splitting, validation, assembly
pub mod view;
pub use view::{
    build_view_fields, split_tokens, validate_selection, ValidationOutcome, ViewSelection,
};

// Orchestration
pub mod shape;
pub use shape::{ResolvedShape, ResolvedView, ShapeFailure, ShapeResolver, ViewBatch};
