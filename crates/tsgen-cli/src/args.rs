use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use tsgen_common::ValidationMode;

use crate::driver::Artifact;

/// CLI arguments for the tsgen binary.
#[derive(Parser, Debug)]
#[command(
    name = "tsgen",
    version,
    about = "Generate TypeScript classes, factories, and view interfaces from declarations"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate an implementation class for a record declaration.
    Class(GenerateArgs),
    /// Generate a factory function for a record declaration.
    Factory(GenerateArgs),
    /// Generate narrowed view interfaces for a record declaration.
    Views(GenerateArgs),
    /// Re-run a generation whenever the watched sources change.
    Watch(WatchArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Source file containing the target declaration.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Name of the target declaration.
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// One-based line to probe for `interface X` / `type X` instead of --name.
    #[arg(short = 'l', long, conflicts_with = "name")]
    pub line: Option<u32>,

    /// View schema as `name=token,token,...`; repeatable. Merged over the
    /// `views` table from tsgen.json.
    #[arg(long = "view", value_name = "NAME=TOKENS")]
    pub views: Vec<String>,

    /// View validation policy.
    #[arg(long, value_enum, ignore_case = true)]
    pub mode: Option<ModeArg>,

    /// Write the artifact to a sibling `<stem>.<artifact>.ts` file.
    #[arg(long = "in-new-file", alias = "inNewFile")]
    pub in_new_file: bool,

    /// Print the artifact to stdout instead of writing files.
    #[arg(long)]
    pub print: bool,

    /// Path to tsgen.json (defaults to searching upward from the source file).
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Suffix for generated view interface names.
    #[arg(long = "interface-suffix", alias = "interfaceSuffix")]
    pub interface_suffix: Option<String>,

    /// Suffix for generated class names.
    #[arg(long = "class-suffix", alias = "classNameSuffix")]
    pub class_suffix: Option<String>,

    /// Prefix for generated factory function names.
    #[arg(long = "function-prefix", alias = "functionPrefix")]
    pub function_prefix: Option<String>,

    /// Regex stripped from the target name before deriving artifact names.
    #[arg(long = "strip-suffix", alias = "stripSuffixRegex")]
    pub strip_suffix: Option<String>,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// The artifact to regenerate on changes.
    #[arg(value_enum)]
    pub artifact: ArtifactArg,

    #[command(flatten)]
    pub generate: GenerateArgs,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ArtifactArg {
    Class,
    Factory,
    Views,
}

impl ArtifactArg {
    pub fn to_artifact(self) -> Artifact {
        match self {
            ArtifactArg::Class => Artifact::Class,
            ArtifactArg::Factory => Artifact::Factory,
            ArtifactArg::Views => Artifact::Views,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum ModeArg {
    Strict,
    Partial,
    Loose,
}

impl ModeArg {
    pub fn to_validation_mode(self) -> ValidationMode {
        match self {
            ModeArg::Strict => ValidationMode::Strict,
            ModeArg::Partial => ValidationMode::Partial,
            ModeArg::Loose => ValidationMode::Loose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_class_subcommand_with_name() {
        let args = CliArgs::try_parse_from(["tsgen", "class", "src/post.ts", "--name", "_Post"])
            .expect("class args should parse");

        let Command::Class(generate) = args.command else {
            panic!("expected class subcommand");
        };
        assert_eq!(generate.file, PathBuf::from("src/post.ts"));
        assert_eq!(generate.name.as_deref(), Some("_Post"));
        assert!(generate.line.is_none());
        assert!(!generate.print);
        assert!(!generate.in_new_file);
    }

    #[test]
    fn parses_repeated_view_flags_and_mode() {
        let args = CliArgs::try_parse_from([
            "tsgen",
            "views",
            "post.ts",
            "--line",
            "12",
            "--view",
            "profile=id,title,author.!id",
            "--view",
            "card=id",
            "--mode",
            "strict",
            "--print",
        ])
        .expect("views args should parse");

        let Command::Views(generate) = args.command else {
            panic!("expected views subcommand");
        };
        assert_eq!(generate.line, Some(12));
        assert_eq!(
            generate.views,
            vec!["profile=id,title,author.!id".to_string(), "card=id".to_string()]
        );
        assert_eq!(generate.mode, Some(ModeArg::Strict));
        assert!(generate.print);
    }

    #[test]
    fn name_and_line_conflict() {
        let result = CliArgs::try_parse_from([
            "tsgen", "class", "post.ts", "--name", "Post", "--line", "3",
        ]);
        assert!(result.is_err(), "conflicting selectors should be rejected");
    }

    #[test]
    fn parses_watch_with_artifact() {
        let args = CliArgs::try_parse_from([
            "tsgen",
            "watch",
            "factory",
            "post.ts",
            "--name",
            "Post",
            "--in-new-file",
        ])
        .expect("watch args should parse");

        let Command::Watch(watch) = args.command else {
            panic!("expected watch subcommand");
        };
        assert_eq!(watch.artifact, ArtifactArg::Factory);
        assert_eq!(watch.generate.name.as_deref(), Some("Post"));
        assert!(watch.generate.in_new_file);
    }

    #[test]
    fn camel_case_aliases_accepted() {
        let args = CliArgs::try_parse_from([
            "tsgen",
            "class",
            "post.ts",
            "--name",
            "Post",
            "--inNewFile",
            "--classNameSuffix",
            "Model",
        ])
        .expect("camelCase aliases should parse");

        let Command::Class(generate) = args.command else {
            panic!("expected class subcommand");
        };
        assert!(generate.in_new_file);
        assert_eq!(generate.class_suffix.as_deref(), Some("Model"));
    }
}
