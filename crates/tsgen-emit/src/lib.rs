//! TypeScript artifact emitters.
//!
//! Turns resolved shapes into generated source text:
//! - implementation classes implementing the target declaration
//! - factory functions building the target from an init object
//! - narrowed view interfaces, one per view-schema entry
//!
//! Emission is purely textual. Resolution failures never reach this crate;
//! the host reports them before an emitter runs.

pub mod emitter;
pub mod naming;
pub mod writer;

pub use emitter::ArtifactEmitter;
pub use naming::{base_name, class_name, factory_name, upper_camel, view_interface_name};
pub use writer::ArtifactWriter;
