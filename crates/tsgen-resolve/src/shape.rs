//! Shape resolution: the engine's single public entry point.
//!
//! A request names a declaration in a file and asks either for its record
//! shape (class/factory generation) or for a batch of view shapes. The
//! resolver wires the pieces together in a fixed order: heritage detection,
//! base resolution nearby, field extraction, selector application, and for
//! views the schema splitter plus validation-mode policy. Every failure is a
//! tagged value with its own user-facing message; nothing panics across
//! this boundary.

use crate::extract::{extract_fields, fields_from_members, resolve_member_source, FieldDescriptor};
use crate::heritage::{apply_selector, parse_heritage, SelectorKind};
use crate::nearby::{resolve_nearby, ResolvedRecord};
use crate::store::{DeclarationStore, StoreError};
use crate::view::{build_view_fields, split_tokens, validate_selection};
use indexmap::IndexMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tsgen_common::{Notice, ValidationMode};

/// Alias hops followed when a view target is itself an alias.
const MAX_TARGET_HOPS: usize = 8;

/// A fully resolved record shape, ready for an emitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedShape {
    /// Target declaration name, as written in the source
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
    pub warnings: Vec<Notice>,
}

/// One generated view: the schema key plus its final fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedView {
    pub key: String,
    pub fields: Vec<FieldDescriptor>,
}

/// All views of one batch request. Skipped views simply do not appear;
/// their stories are told by `warnings`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewBatch {
    pub target: String,
    pub views: Vec<ResolvedView>,
    pub warnings: Vec<Notice>,
}

/// Why shape resolution failed. Each variant surfaces as its own message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeFailure {
    /// The named declaration is not in the requested file.
    DeclarationNotFound { name: String, file: PathBuf },
    /// A heritage selector names a base that nearby resolution cannot find.
    BaseNotFoundNearby { base_name: String, from_file: PathBuf },
    /// A pick selector names keys its base does not declare.
    InvalidSelection {
        kind: SelectorKind,
        base_name: String,
        invalid_keys: Vec<String>,
    },
    /// The final field list came out empty.
    NoProperties { name: String },
    /// The requested file could not be read.
    FileUnreadable(StoreError),
}

impl fmt::Display for ShapeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeFailure::DeclarationNotFound { name, file } => {
                write!(f, "declaration '{}' not found in {}", name, file.display())
            }
            ShapeFailure::BaseNotFoundNearby {
                base_name,
                from_file,
            } => write!(
                f,
                "base type '{}' not found nearby {} (searched the current file, relative imports, and same-directory names)",
                base_name,
                from_file.display()
            ),
            ShapeFailure::InvalidSelection {
                kind,
                base_name,
                invalid_keys,
            } => write!(
                f,
                "{} selector references keys missing from '{}': {}",
                kind.as_str(),
                base_name,
                invalid_keys.join(", ")
            ),
            ShapeFailure::NoProperties { name } => {
                write!(f, "no properties found on '{name}'")
            }
            ShapeFailure::FileUnreadable(error) => error.fmt(f),
        }
    }
}

impl From<StoreError> for ShapeFailure {
    fn from(error: StoreError) -> ShapeFailure {
        ShapeFailure::FileUnreadable(error)
    }
}

/// The orchestrator. Owns the declaration store so one resolver instance
/// serves many requests against a warm cache; `store_mut` exposes it for
/// invalidation between requests.
#[derive(Default)]
pub struct ShapeResolver {
    store: DeclarationStore,
}

impl ShapeResolver {
    pub fn new() -> ShapeResolver {
        ShapeResolver::default()
    }

    pub fn store_mut(&mut self) -> &mut DeclarationStore {
        &mut self.store
    }

    /// Resolve the record shape of `name` in `file`: heritage selector
    /// applied against its nearby-resolved base, own fields merged on top.
    pub fn resolve_shape(&mut self, file: &Path, name: &str) -> Result<ResolvedShape, ShapeFailure> {
        let target = self.find_target(file, name)?;
        let decl = target.decl();

        let fields = match parse_heritage(decl, target.source()) {
            Some(selector) => {
                debug!(
                    target = name,
                    base = %selector.base_name,
                    selector = selector.kind.as_str(),
                    "applying heritage selector"
                );
                let base = resolve_nearby(&mut self.store, &selector.base_name, file)?.ok_or_else(
                    || ShapeFailure::BaseNotFoundNearby {
                        base_name: selector.base_name.clone(),
                        from_file: file.to_path_buf(),
                    },
                )?;
                let base_fields = extract_fields(&mut self.store, &base);
                let own_fields = fields_from_members(decl.own_members(), target.source());
                apply_selector(&selector, &base_fields, &own_fields).map_err(|unknown| {
                    ShapeFailure::InvalidSelection {
                        kind: selector.kind,
                        base_name: unknown.base_name,
                        invalid_keys: unknown.keys,
                    }
                })?
            }
            None => extract_fields(&mut self.store, &target),
        };

        if fields.is_empty() {
            return Err(ShapeFailure::NoProperties {
                name: name.to_string(),
            });
        }
        info!(target = name, fields = fields.len(), "record shape resolved");
        Ok(ResolvedShape {
            name: name.to_string(),
            fields,
            warnings: Vec::new(),
        })
    }

    /// Resolve a batch of view schemas against the target's own fields.
    ///
    /// Heritage selectors play no part here. Invalid selections are handled
    /// per the validation mode; a skipped view never stops its siblings.
    pub fn resolve_views(
        &mut self,
        file: &Path,
        name: &str,
        schemas: &IndexMap<String, Vec<String>>,
        mode: ValidationMode,
    ) -> Result<ViewBatch, ShapeFailure> {
        let target = self.find_target(file, name)?;
        let member_source = resolve_member_source(&mut self.store, &target, MAX_TARGET_HOPS)
            .ok_or_else(|| ShapeFailure::NoProperties {
                name: name.to_string(),
            })?;

        let mut batch = ViewBatch {
            target: name.to_string(),
            views: Vec::new(),
            warnings: Vec::new(),
        };
        for (key, tokens) in schemas {
            let selection = split_tokens(tokens);
            if selection.is_empty() {
                batch
                    .warnings
                    .push(Notice::warning(format!("view '{key}' selects no fields; skipped")));
                continue;
            }
            let outcome =
                validate_selection(&mut self.store, &member_source, &selection, mode, key);
            batch.warnings.extend(outcome.warnings);
            if outcome.surviving_selection.is_empty() {
                continue;
            }
            let fields =
                build_view_fields(&mut self.store, &member_source, &outcome.surviving_selection);
            if fields.is_empty() {
                debug!(view = %key, "selection survived validation but produced no fields");
                continue;
            }
            batch.views.push(ResolvedView {
                key: key.clone(),
                fields,
            });
        }
        info!(
            target = name,
            views = batch.views.len(),
            requested = schemas.len(),
            "view batch resolved"
        );
        Ok(batch)
    }

    fn find_target(&mut self, file: &Path, name: &str) -> Result<ResolvedRecord, ShapeFailure> {
        let current = self.store.get_or_load(file)?;
        ResolvedRecord::find(&current, name).ok_or_else(|| ShapeFailure::DeclarationNotFound {
            name: name.to_string(),
            file: file.to_path_buf(),
        })
    }
}
