//! Common types for the tsgen code generator.
//!
//! This crate provides the foundational types shared by the other tsgen
//! crates:
//! - Source spans (`Span`) - byte-offset ranges into source text
//! - Notices (`Notice`, `Severity`) - user-facing warnings and infos
//!   produced during shape resolution
//! - Generator options (`GeneratorOptions`, `ValidationMode`) - the resolved
//!   configuration consumed by the resolver and the emitters

// Span - source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Notices - warning/info messages surfaced to the host
pub mod notice;
pub use notice::{Notice, Severity};

// Options - resolved generator configuration
pub mod options;
pub use options::{GeneratorOptions, ValidationMode, default_strip_suffix};
