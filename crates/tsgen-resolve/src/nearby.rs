//! Bounded "nearby" symbol resolution.
//!
//! Given a symbol name and the file that mentions it, search exactly three
//! tiers, first match wins:
//! 1. the current file's own declarations;
//! 2. files reachable through the current file's relative import specifiers,
//!    in source order;
//! 3. same-directory files named after the symbol (`<Name>.ts`, `<Name>.tsx`,
//!    `<Name>.d.ts`).
//!
//! Imports-of-imports are never followed and there is no workspace scan: a
//! miss here is reported to the user as "not found nearby" rather than
//! silently widened into an expensive search.

use crate::store::{normalize_path, DeclarationStore, StoreError};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};
use tsgen_syntax::{RecordDecl, SourceFile};

/// Filename guesses for the same-directory tier.
const GUESS_EXTENSIONS: [&str; 3] = [".ts", ".tsx", ".d.ts"];

/// A declaration found in some loaded file. Owns its file so the caller can
/// read member spans out of the original text.
#[derive(Clone)]
pub struct ResolvedRecord {
    file: Arc<SourceFile>,
    index: usize,
}

impl ResolvedRecord {
    pub fn new(file: Arc<SourceFile>, index: usize) -> ResolvedRecord {
        ResolvedRecord { file, index }
    }

    /// Locate `name` among the file's declarations.
    pub fn find(file: &Arc<SourceFile>, name: &str) -> Option<ResolvedRecord> {
        file.declarations
            .iter()
            .position(|decl| decl.name == name)
            .map(|index| ResolvedRecord::new(Arc::clone(file), index))
    }

    pub fn decl(&self) -> &RecordDecl {
        &self.file.declarations[self.index]
    }

    pub fn file(&self) -> &Arc<SourceFile> {
        &self.file
    }

    /// Full text of the file the declaration lives in; member type spans
    /// index into this.
    pub fn source(&self) -> &str {
        &self.file.text
    }
}

/// Resolve `name` starting from `from_file`.
///
/// `Ok(None)` means all three tiers missed. Failing to read the current file
/// is an error; unreadable tier-2/3 candidates are skipped with a log line,
/// matching the "best effort, bounded" contract of this lookup.
pub fn resolve_nearby(
    store: &mut DeclarationStore,
    name: &str,
    from_file: &Path,
) -> Result<Option<ResolvedRecord>, StoreError> {
    // Qualified references (`models.Post`) look up their last segment.
    let name = name.rsplit('.').next().unwrap_or(name);

    let current = store.get_or_load(from_file)?;
    if let Some(found) = ResolvedRecord::find(&current, name) {
        debug!(name, "resolved in current file");
        return Ok(Some(found));
    }

    for import in current.imports.iter().filter(|import| import.is_relative()) {
        let Some(candidate) = store.resolve_relative_specifier(from_file, &import.specifier)
        else {
            continue;
        };
        let file = match store.get_or_load(&candidate) {
            Ok(file) => file,
            Err(error) => {
                warn!(%error, "skipping unreadable import target");
                continue;
            }
        };
        if let Some(found) = ResolvedRecord::find(&file, name) {
            debug!(name, specifier = %import.specifier, "resolved through relative import");
            return Ok(Some(found));
        }
    }

    let dir = from_file.parent().unwrap_or_else(|| Path::new(""));
    for extension in GUESS_EXTENSIONS {
        let candidate = normalize_path(&dir.join(format!("{name}{extension}")));
        if candidate == normalize_path(from_file) || !store.file_exists(&candidate) {
            continue;
        }
        let file = match store.get_or_load(&candidate) {
            Ok(file) => file,
            Err(error) => {
                warn!(%error, "skipping unreadable name-convention candidate");
                continue;
            }
        };
        if let Some(found) = ResolvedRecord::find(&file, name) {
            debug!(name, file = %candidate.display(), "resolved by same-directory naming");
            return Ok(Some(found));
        }
    }

    debug!(name, from = %from_file.display(), "not found nearby");
    Ok(None)
}
