//! Generation driver shared by the one-shot subcommands and watch mode.
//!
//! One `generate` call runs the full pipeline for a single request: select
//! the target declaration, resolve its shape or view batch, emit the
//! artifact text, and place it (stdout, sibling file, or inline insertion).
//! The outcome keeps engine diagnostics, which the reporter renders and
//! which drive the exit code, apart from hard errors such as unwritable
//! output paths, which propagate as `anyhow` errors.

use anyhow::{Context, Result, anyhow, bail};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use tsgen_common::{GeneratorOptions, Notice};
use tsgen_emit::ArtifactEmitter;
use tsgen_resolve::{ShapeFailure, ShapeResolver};

use crate::args::GenerateArgs;
use crate::config::CONFIG_FILE_NAME;
use crate::document;
use crate::reporter::Reporter;

pub const EXIT_CLEAN: i32 = 0;
pub const EXIT_WARNINGS: i32 = 1;
pub const EXIT_FAILED: i32 = 2;

/// Which artifact a subcommand asked for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Artifact {
    Class,
    Factory,
    Views,
}

impl Artifact {
    pub fn as_str(self) -> &'static str {
        match self {
            Artifact::Class => "class",
            Artifact::Factory => "factory",
            Artifact::Views => "views",
        }
    }

    /// Tag used in sibling-file names: `post.impl.ts`, `post.factory.ts`,
    /// `post.views.ts`.
    pub fn file_tag(self) -> &'static str {
        match self {
            Artifact::Class => "impl",
            Artifact::Factory => "factory",
            Artifact::Views => "views",
        }
    }
}

/// Where the artifact text ended up.
#[derive(Debug)]
pub enum Placement {
    /// `--print`: the text goes to stdout during reporting.
    Printed(String),
    /// Written to a sibling file.
    Written(PathBuf),
    /// Inserted into the original document.
    Inserted(PathBuf),
    /// Nothing to place, either a failure or an all-skipped view batch.
    Empty,
}

/// What one generation pass produced.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub artifact: Artifact,
    pub target: String,
    pub notices: Vec<Notice>,
    pub failure: Option<ShapeFailure>,
    pub placement: Placement,
}

impl GenerationOutcome {
    pub fn exit_code(&self) -> i32 {
        if self.failure.is_some() {
            EXIT_FAILED
        } else if self.notices.iter().any(|notice| notice.severity.is_warning()) {
            EXIT_WARNINGS
        } else {
            EXIT_CLEAN
        }
    }
}

fn failed(artifact: Artifact, target: String, failure: ShapeFailure) -> GenerationOutcome {
    GenerationOutcome {
        artifact,
        target,
        notices: Vec::new(),
        failure: Some(failure),
        placement: Placement::Empty,
    }
}

/// Run one generation request end to end.
///
/// The resolver is borrowed, not owned, so watch mode can keep its parse
/// cache warm across iterations and invalidate it only when files change.
pub fn generate(
    resolver: &mut ShapeResolver,
    artifact: Artifact,
    args: &GenerateArgs,
    options: &GeneratorOptions,
) -> Result<GenerationOutcome> {
    let source = match resolver.store_mut().get_or_load(&args.file) {
        Ok(source) => source,
        Err(error) => {
            let target = args.name.clone().unwrap_or_default();
            return Ok(failed(artifact, target, ShapeFailure::from(error)));
        }
    };

    let target = match (&args.name, args.line) {
        (Some(name), _) => name.clone(),
        (None, Some(line)) => {
            document::declaration_name_at_line(&source.text, line).ok_or_else(|| {
                anyhow!(
                    "no interface or type declaration on line {line} of {}",
                    args.file.display()
                )
            })?
        }
        (None, None) => bail!("pass --name or --line to select the target declaration"),
    };
    info!(
        artifact = artifact.as_str(),
        target = %target,
        file = %args.file.display(),
        "generating"
    );

    match artifact {
        Artifact::Class | Artifact::Factory => {
            let shape = match resolver.resolve_shape(&args.file, &target) {
                Ok(shape) => shape,
                Err(failure) => return Ok(failed(artifact, target, failure)),
            };
            let notices = shape.warnings.clone();
            let mut emitter = ArtifactEmitter::new(options);
            let text = if artifact == Artifact::Class {
                emitter.emit_class(&shape)
            } else {
                emitter.emit_factory(&shape)
            };
            place_artifact(resolver, artifact, args, options, target, notices, text)
        }
        Artifact::Views => {
            if options.views.is_empty() {
                bail!(
                    "no view schemas configured; pass --view name=token,... or add a views table to {CONFIG_FILE_NAME}"
                );
            }
            let batch = match resolver.resolve_views(
                &args.file,
                &target,
                &options.views,
                options.validation_mode,
            ) {
                Ok(batch) => batch,
                Err(failure) => return Ok(failed(artifact, target, failure)),
            };
            let mut notices = batch.warnings.clone();
            if batch.views.is_empty() {
                notices.push(Notice::warning(format!(
                    "no views survived for '{target}'; nothing generated"
                )));
                return Ok(GenerationOutcome {
                    artifact,
                    target,
                    notices,
                    failure: None,
                    placement: Placement::Empty,
                });
            }
            let text = ArtifactEmitter::new(options).emit_views(&batch);
            place_artifact(resolver, artifact, args, options, target, notices, text)
        }
    }
}

fn place_artifact(
    resolver: &mut ShapeResolver,
    artifact: Artifact,
    args: &GenerateArgs,
    options: &GeneratorOptions,
    target: String,
    notices: Vec<Notice>,
    text: String,
) -> Result<GenerationOutcome> {
    let placement = if args.print {
        Placement::Printed(text)
    } else if options.in_new_file {
        let path = sibling_artifact_path(&args.file, artifact)?;
        fs::write(&path, &text).with_context(|| format!("failed to write {}", path.display()))?;
        Placement::Written(path)
    } else {
        let source = match resolver.store_mut().get_or_load(&args.file) {
            Ok(source) => source,
            Err(error) => return Ok(failed(artifact, target, ShapeFailure::from(error))),
        };
        let decl = source.declaration(&target).ok_or_else(|| {
            anyhow!("declaration '{target}' vanished from {}", args.file.display())
        })?;
        let updated =
            document::insert_after_declaration(&source.text, decl.span.end as usize, &text);
        fs::write(&args.file, updated)
            .with_context(|| format!("failed to update {}", args.file.display()))?;
        // The document changed underneath the cache.
        resolver.store_mut().invalidate();
        Placement::Inserted(args.file.clone())
    };
    Ok(GenerationOutcome {
        artifact,
        target,
        notices,
        failure: None,
        placement,
    })
}

/// Sibling output path for new-file placement: `post.ts` with the class
/// artifact becomes `post.impl.ts`.
pub fn sibling_artifact_path(file: &Path, artifact: Artifact) -> Result<PathBuf> {
    let stem = file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| anyhow!("cannot derive an output name from {}", file.display()))?;
    Ok(file.with_file_name(format!("{stem}.{}.ts", artifact.file_tag())))
}

/// Print one outcome and fold it into an exit code.
pub fn report(outcome: &GenerationOutcome, reporter: &Reporter) -> i32 {
    if let Placement::Printed(text) = &outcome.placement {
        print!("{text}");
    }
    let rendered = reporter.render(&outcome.notices);
    if !rendered.is_empty() {
        eprintln!("{rendered}");
    }
    if let Some(failure) = &outcome.failure {
        eprintln!("{}", reporter.format_failure(&failure.to_string()));
        return EXIT_FAILED;
    }
    match &outcome.placement {
        Placement::Written(path) => println!(
            "{}",
            reporter.format_success(&format!(
                "wrote {} artifact for '{}' to {}",
                outcome.artifact.as_str(),
                outcome.target,
                path.display()
            ))
        ),
        Placement::Inserted(path) => println!(
            "{}",
            reporter.format_success(&format!(
                "inserted {} artifact for '{}' into {}",
                outcome.artifact.as_str(),
                outcome.target,
                path.display()
            ))
        ),
        Placement::Printed(_) | Placement::Empty => {}
    }
    outcome.exit_code()
}
