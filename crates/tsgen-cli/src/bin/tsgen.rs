#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;

use tsgen_cli::args::{CliArgs, Command, GenerateArgs};
use tsgen_cli::driver::{self, Artifact};
use tsgen_cli::reporter::Reporter;
use tsgen_cli::{config, logging, watch};
use tsgen_resolve::ShapeResolver;

fn main() -> Result<()> {
    // Initialize tracing if TSGEN_LOG or RUST_LOG is set (zero cost
    // otherwise). Supports TSGEN_LOG_FORMAT=tree|json|text (see logging.rs).
    logging::init_tracing();

    let args = CliArgs::parse();
    let code = match args.command {
        Command::Class(generate) => run_single(Artifact::Class, &generate)?,
        Command::Factory(generate) => run_single(Artifact::Factory, &generate)?,
        Command::Views(generate) => run_single(Artifact::Views, &generate)?,
        Command::Watch(watch_args) => {
            watch::run(&watch_args)?;
            driver::EXIT_CLEAN
        }
    };
    std::process::exit(code);
}

fn run_single(artifact: Artifact, args: &GenerateArgs) -> Result<i32> {
    let reporter = Reporter::for_stderr();
    let (options, config_notices) = config::load_options(args)?;
    let rendered = reporter.render(&config_notices);
    if !rendered.is_empty() {
        eprintln!("{rendered}");
    }

    let mut resolver = ShapeResolver::new();
    let outcome = driver::generate(&mut resolver, artifact, args, &options)?;
    let mut code = driver::report(&outcome, &reporter);
    if code == driver::EXIT_CLEAN
        && config_notices
            .iter()
            .any(|notice| notice.severity.is_warning())
    {
        code = driver::EXIT_WARNINGS;
    }
    Ok(code)
}
