//! Declaration store: the file cache behind all symbol lookups.
//!
//! Wraps filesystem access and the declaration parser. Files are parsed at
//! most once per generation pass and shared as `Arc<SourceFile>`. The cache
//! is append-only while a request runs; `invalidate` clears it wholesale
//! between requests (watch mode calls it on every change batch). There is no
//! per-file invalidation on purpose: rebuilds are cheap next to the cost of
//! tracking fine-grained dependencies correctly.

use rustc_hash::FxHashMap;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};
use tsgen_syntax::{parse_source, SourceFile};

/// Extensions probed when a relative specifier names no file directly.
const SPECIFIER_SUFFIXES: [&str; 3] = [".ts", ".tsx", ".d.ts"];

/// Index files probed when a relative specifier names a directory.
const SPECIFIER_INDEX_FILES: [&str; 2] = ["index.ts", "index.tsx"];

/// Why a file could not be brought into the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The file could not be read.
    Unreadable {
        /// Path that failed to load
        path: PathBuf,
        /// Underlying I/O error text
        message: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unreadable { path, message } => {
                write!(f, "cannot read '{}': {}", path.display(), message)
            }
        }
    }
}

/// Process-wide cache of parsed source files.
#[derive(Default)]
pub struct DeclarationStore {
    cache: FxHashMap<PathBuf, Arc<SourceFile>>,
}

impl DeclarationStore {
    pub fn new() -> DeclarationStore {
        DeclarationStore::default()
    }

    /// Parse `path` or return the cached parse.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<SourceFile>, StoreError> {
        let key = normalize_path(path);
        if let Some(file) = self.cache.get(&key) {
            trace!(path = %key.display(), "store hit");
            return Ok(Arc::clone(file));
        }
        let text = fs::read_to_string(&key).map_err(|error| StoreError::Unreadable {
            path: key.clone(),
            message: error.to_string(),
        })?;
        debug!(path = %key.display(), bytes = text.len(), "parsing file");
        let file = Arc::new(parse_source(key.clone(), text));
        self.cache.insert(key, Arc::clone(&file));
        Ok(file)
    }

    /// Insert an already-materialized file, bypassing the filesystem.
    ///
    /// The host uses this for the active document, whose buffer may be newer
    /// than what is on disk.
    pub fn insert_text(&mut self, path: &Path, text: String) -> Arc<SourceFile> {
        let key = normalize_path(path);
        let file = Arc::new(parse_source(key.clone(), text));
        self.cache.insert(key, Arc::clone(&file));
        file
    }

    pub fn file_exists(&self, path: &Path) -> bool {
        fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
    }

    /// Resolve a relative import specifier against the importing file.
    ///
    /// Candidates are probed in a fixed order: the literal path when the
    /// specifier already spells an extension, then `.ts`, `.tsx`, `.d.ts`
    /// appended to it, then `/index.ts` and `/index.tsx` under it. The first
    /// existing candidate wins; None when nothing exists.
    pub fn resolve_relative_specifier(&self, from: &Path, specifier: &str) -> Option<PathBuf> {
        let base = from.parent().unwrap_or_else(|| Path::new("")).join(specifier);

        if has_source_extension(specifier) && self.file_exists(&base) {
            return Some(normalize_path(&base));
        }
        for suffix in SPECIFIER_SUFFIXES {
            let candidate = append_suffix(&base, suffix);
            if self.file_exists(&candidate) {
                return Some(normalize_path(&candidate));
            }
        }
        for index_file in SPECIFIER_INDEX_FILES {
            let candidate = base.join(index_file);
            if self.file_exists(&candidate) {
                return Some(normalize_path(&candidate));
            }
        }
        trace!(specifier, from = %from.display(), "specifier resolved to no file");
        None
    }

    /// Drop every cached file. The next lookup reparses from disk.
    pub fn invalidate(&mut self) {
        if !self.cache.is_empty() {
            debug!(files = self.cache.len(), "invalidating declaration store");
        }
        self.cache.clear();
    }

    pub fn cached_file_count(&self) -> usize {
        self.cache.len()
    }
}

fn has_source_extension(specifier: &str) -> bool {
    specifier.ends_with(".ts") || specifier.ends_with(".tsx")
}

fn append_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut joined = path.as_os_str().to_os_string();
    joined.push(suffix);
    PathBuf::from(joined)
}

/// Lexically normalize `.` and `..` components so the same file loaded
/// through different specifiers shares one cache entry. Purely textual; no
/// symlink resolution.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(Component::ParentDir);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
