// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

//!
//! sharp-pup
//!
//! Finds `typeof(T).Member` lookups in C# sources that could be written
//! with `nameof`, and reports them according to a `pup.ron` configuration.
//!
//!  # Running
//!
//!   1. `sharp-pup generate-config` proposes a `pup.generated.ron` with one
//!      lint per top-level namespace. Rename it to `pup.ron` and edit it.
//!   2. `sharp-pup print-files` shows which lints apply to which files.
//!   3. `sharp-pup` (or `sharp-pup check`) runs the lints. Any `Error`
//!      severity diagnostic makes the process exit with status 1.
//!
//! Without a `pup.ron`, every file is checked with the `prefer_nameof`
//! lint at warning severity.
//!

mod cli;
mod logging;
mod render;

use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ansi_term::Colour::{Cyan, Green, Red, Yellow};
use ansi_term::Style;
use anyhow::{Context, Result};
use clap::Parser;
use sharp_pup_common::project_context::{PUP_DIR, ProjectContext};
use sharp_pup_lint_config::Severity;
use sharp_pup_lint_impl::{LintCollection, LintConfigurationFactory, LintRunner, Mode};

use cli::{ColorChoice, OutputFormat, PupCli, PupOptions};
use render::Painter;

/// File `generate-config` writes. Never overwritten.
pub const GENERATED_CONFIG_FILE: &str = "pup.generated.ron";

fn show_ascii_puppy() {
    println!("{}", Cyan.paint(r#"
     / \__
    (    @\___
    /         O
   /   (_____/
  /_____/   U
"#));
}

pub fn main() -> ExitCode {
    logging::init_tracing();

    if env::args().any(|a| a == "--help" || a == "-h") {
        show_ascii_puppy();
    }
    let cli = PupCli::parse();
    let painter = Painter::new(use_colour(cli.options.color));

    match run(&cli, painter) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", painter.paint(Red.bold(), "Error:"));
            ExitCode::FAILURE
        }
    }
}

fn use_colour(choice: ColorChoice) -> bool {
    match choice {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal(),
    }
}

fn run(cli: &PupCli, painter: Painter) -> Result<ExitCode> {
    let command = cli.command();
    let roots = command.roots();
    tracing::debug!(?command, version = %cli.options.lang_version, "starting");

    match command.mode() {
        Mode::Check => check(&roots, &cli.options, painter),
        Mode::PrintFiles => print_files(&roots, &cli.options, painter),
        Mode::GenerateConfig => generate_config(&roots, &cli.options, painter),
    }
}

fn runner(mode: Mode, options: &PupOptions) -> Result<LintRunner> {
    let cwd = env::current_dir().context("Failed to read the current directory")?;
    let (lints, config) = LintConfigurationFactory::setup_lints(options.pup_config.as_deref(), &cwd)?;
    match &config {
        Some(path) => tracing::info!(config = %path.display(), lints = lints.len(), "loaded lints"),
        None => tracing::info!("no pup.ron found; using the default lint"),
    }
    Ok(LintRunner::new(mode, options.lang_version, LintCollection::new(lints)))
}

fn check(roots: &[PathBuf], options: &PupOptions, painter: Painter) -> Result<ExitCode> {
    let report = runner(Mode::Check, options)?.run(roots)?;

    let output = render::render(&report.diagnostics, options.format, painter)?;
    print!("{output}");
    if options.format != OutputFormat::Json {
        println!(
            "{}",
            render::summary(
                report.count(Severity::Error),
                report.count(Severity::Warn),
                report.files_analyzed,
                painter
            )
        );
    }

    Ok(if report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Runs the discovery modes, then reads back what they recorded under `.pup`.
fn collect_contexts(mode: Mode, roots: &[PathBuf], options: &PupOptions) -> Result<(ProjectContext, Vec<String>)> {
    let scratch = ProjectContext::new();
    scratch.clean_context_files()?;

    let report = runner(mode, options)?.run(roots)?;
    tracing::debug!(files = report.files_analyzed, contexts = report.context_files.len(), "recorded project context");

    let loaded = ProjectContext::load_all_contexts_from_dir(Path::new(PUP_DIR))
        .context("Failed to load project context data");
    scratch.clean_context_files()?;
    loaded
}

fn print_files(roots: &[PathBuf], options: &PupOptions, painter: Painter) -> Result<ExitCode> {
    let (context, project_roots) = collect_contexts(Mode::PrintFiles, roots, options)?;
    print!("{}", render::project_files(&context, &project_roots, painter));
    Ok(ExitCode::SUCCESS)
}

fn generate_config(roots: &[PathBuf], options: &PupOptions, painter: Painter) -> Result<ExitCode> {
    let target = Path::new(GENERATED_CONFIG_FILE);
    if target.exists() {
        show_ascii_puppy();
        println!("{}", painter.paint(Red.bold(), &format!("{GENERATED_CONFIG_FILE} already exists!")));
        println!("Remove it if you want to regenerate the configuration.");
        return Ok(ExitCode::FAILURE);
    }

    let (context, _) = collect_contexts(Mode::GenerateConfig, roots, options)?;
    let builder = LintConfigurationFactory::generate_config(std::slice::from_ref(&context));
    builder
        .write_to_file(target)
        .with_context(|| format!("Failed to write {GENERATED_CONFIG_FILE}"))?;

    println!(
        "{} {} with {} lints from {} files",
        painter.paint(Style::new().bold(), "Generated"),
        painter.paint(Green.normal(), GENERATED_CONFIG_FILE),
        builder.lints.len(),
        context.files.len()
    );
    if !Path::new("pup.ron").exists() {
        println!(
            "{}",
            painter.paint(Yellow.normal(), &format!("Rename it to pup.ron to start using it: mv {GENERATED_CONFIG_FILE} pup.ron"))
        );
    }
    Ok(ExitCode::SUCCESS)
}
