// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sharp_pup_common::LanguageVersion;
use sharp_pup_lint_impl::Mode;

// CLI Arguments
#[derive(Parser, Debug)]
#[command(name = "sharp-pup", author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct PupCli {
    #[command(subcommand)]
    pub command: Option<PupCommand>,

    #[command(flatten)]
    pub options: PupOptions,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum PupCommand {
    /// Run the configured lints (default)
    Check(Targets),
    /// Print every C# file with its namespaces and applicable lints
    PrintFiles(Targets),
    /// Generate an initial pup.generated.ron for the project
    GenerateConfig(Targets),
}

#[derive(Args, Debug, Clone, PartialEq, Default)]
pub struct Targets {
    /// Files or directories to analyse; defaults to the current directory
    pub paths: Vec<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct PupOptions {
    /// Lint configuration to use instead of the nearest pup.ron
    #[arg(long, global = true, value_name = "FILE")]
    pub pup_config: Option<PathBuf>,

    /// C# language version the sources are written against (e.g. 5, 6, 7.3, latest)
    #[arg(long, global = true, value_name = "VERSION", default_value = "latest")]
    pub lang_version: LanguageVersion,

    /// How diagnostics are printed
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// When to colour output
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Source excerpts with carets, like a compiler
    Human,
    /// One line per diagnostic
    Short,
    /// A JSON array of diagnostics
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl PupCli {
    /// The subcommand to run; a bare `sharp-pup` checks the current directory.
    pub fn command(&self) -> PupCommand {
        self.command
            .clone()
            .unwrap_or_else(|| PupCommand::Check(Targets::default()))
    }
}

impl PupCommand {
    pub fn mode(&self) -> Mode {
        match self {
            PupCommand::Check(_) => Mode::Check,
            PupCommand::PrintFiles(_) => Mode::PrintFiles,
            PupCommand::GenerateConfig(_) => Mode::GenerateConfig,
        }
    }

    /// The roots to analyse, falling back to `.`.
    pub fn roots(&self) -> Vec<PathBuf> {
        let targets = match self {
            PupCommand::Check(targets)
            | PupCommand::PrintFiles(targets)
            | PupCommand::GenerateConfig(targets) => targets,
        };
        if targets.paths.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            targets.paths.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> PupCli {
        PupCli::try_parse_from(std::iter::once("sharp-pup").chain(args.iter().copied()))
            .expect("valid arguments")
    }

    #[test]
    fn bare_invocation_checks_current_directory() {
        let cli = parse(&[]);
        assert_eq!(cli.command().mode(), Mode::Check);
        assert_eq!(cli.command().roots(), vec![PathBuf::from(".")]);
        assert_eq!(cli.options.lang_version, LanguageVersion::LATEST);
        assert_eq!(cli.options.format, OutputFormat::Human);
        assert_eq!(cli.options.color, ColorChoice::Auto);
    }

    #[test]
    fn global_options_follow_the_subcommand() {
        let cli = parse(&[
            "check",
            "src",
            "tests/Fixtures.cs",
            "--lang-version",
            "5",
            "--format",
            "json",
            "--pup-config",
            "custom.ron",
        ]);
        assert_eq!(
            cli.command().roots(),
            vec![PathBuf::from("src"), PathBuf::from("tests/Fixtures.cs")]
        );
        assert_eq!(cli.options.lang_version, LanguageVersion::CSharp5);
        assert_eq!(cli.options.format, OutputFormat::Json);
        assert_eq!(cli.options.pup_config, Some(PathBuf::from("custom.ron")));
    }

    #[test]
    fn subcommands_map_to_modes() {
        assert_eq!(parse(&["print-files"]).command().mode(), Mode::PrintFiles);
        assert_eq!(parse(&["generate-config", "app"]).command().mode(), Mode::GenerateConfig);
    }

    #[test]
    fn rejects_unknown_language_versions() {
        let result = PupCli::try_parse_from(["sharp-pup", "--lang-version", "42"]);
        assert!(result.is_err());
    }
}
