//! Watch mode: regenerate whenever the watched sources change.
//!
//! The watcher observes the target file's directory (non-recursively) and
//! debounces event bursts before regenerating. Every relevant batch clears
//! the declaration store first, so each pass reparses from disk. Inline
//! insertion is refused up front: regenerating into the watched file would
//! trigger the watcher again.

use anyhow::{Context, Result, anyhow, bail};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;
use tracing::debug;

use tsgen_resolve::ShapeResolver;

use crate::args::WatchArgs;
use crate::config;
use crate::driver;
use crate::reporter::Reporter;

/// Quiet window after the first event; editors write in bursts.
const DEBOUNCE: Duration = Duration::from_millis(200);

pub fn run(args: &WatchArgs) -> Result<()> {
    let artifact = args.artifact.to_artifact();
    let reporter = Reporter::for_stderr();

    let (options, config_notices) = config::load_options(&args.generate)?;
    if !args.generate.print && !options.in_new_file {
        bail!(
            "watch mode would rewrite the watched file on every pass; add --print or --in-new-file"
        );
    }
    let rendered = reporter.render(&config_notices);
    if !rendered.is_empty() {
        eprintln!("{rendered}");
    }

    let mut generate_args = args.generate.clone();
    generate_args.file = args
        .generate
        .file
        .canonicalize()
        .with_context(|| format!("cannot watch {}", args.generate.file.display()))?;
    let dir = generate_args
        .file
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow!("{} has no parent directory", generate_args.file.display()))?;
    let own_output = if options.in_new_file {
        Some(driver::sibling_artifact_path(&generate_args.file, artifact)?)
    } else {
        None
    };

    let mut resolver = ShapeResolver::new();
    let outcome = driver::generate(&mut resolver, artifact, &generate_args, &options)?;
    driver::report(&outcome, &reporter);

    let (sender, receiver) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |event: notify::Result<Event>| {
        let _ = sender.send(event);
    })
    .context("failed to initialize the file watcher")?;
    watcher
        .watch(&dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", dir.display()))?;
    eprintln!("watching {} (ctrl-c to stop)", dir.display());

    loop {
        let Ok(first) = receiver.recv() else {
            // The watcher backend is gone.
            return Ok(());
        };
        let mut relevant = event_is_relevant(&first, own_output.as_deref());
        // Drain the burst before regenerating.
        while let Ok(event) = receiver.recv_timeout(DEBOUNCE) {
            relevant |= event_is_relevant(&event, own_output.as_deref());
        }
        if !relevant {
            continue;
        }
        debug!("change batch settled; regenerating");
        resolver.store_mut().invalidate();
        let outcome = driver::generate(&mut resolver, artifact, &generate_args, &options)?;
        driver::report(&outcome, &reporter);
    }
}

/// Whether an event batch member should trigger regeneration.
///
/// Access events and the generator's own output file are filtered out;
/// everything else with a TypeScript extension counts. Watcher errors count
/// too: regenerating is better than silently stalling.
fn event_is_relevant(event: &notify::Result<Event>, own_output: Option<&Path>) -> bool {
    let event = match event {
        Ok(event) => event,
        Err(_) => return true,
    };
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    event.paths.iter().any(|path| {
        if own_output.is_some_and(|output| path == output) {
            return false;
        }
        matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("ts") | Some("tsx")
        )
    })
}
