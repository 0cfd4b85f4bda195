// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use rayon::prelude::*;
use sharp_pup_common::LanguageVersion;
use sharp_pup_common::project_context::{FileInfo, PUP_DIR, ProjectContext};
use sharp_pup_lint_config::Severity;
use sharp_pup_syntax::{ParseOptions, SyntaxTree, parse};
use walkdir::{DirEntry, WalkDir};

use crate::LintCollection;
use crate::diagnostics::{DescriptorRegistry, Diagnostic, sort_diagnostics, syntax_diagnostic};
use crate::host::{LintStore, display_path};

/// Extension of the files we analyse.
pub const SOURCE_EXTENSION: &str = "cs";

/// Build output and tooling directories that never hold sources of interest.
const SKIPPED_DIRS: &[&str] = &["bin", "obj", "node_modules"];

///
/// The mode our lint runner should operate in
///
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Mode {
    /// Run the lints
    Check,

    /// Record files, their namespaces and applicable lints
    PrintFiles,

    /// Record project context for configuration generation
    GenerateConfig,
}

/// What a run produced.
#[derive(Debug, Default)]
pub struct RunReport {
    pub files_analyzed: usize,
    /// Sorted by path, then position, then rule
    pub diagnostics: Vec<Diagnostic>,
    /// Context files written in the non-check modes
    pub context_files: Vec<PathBuf>,
}

impl RunReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == severity).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(Severity::Error) > 0
    }
}

struct FileOutcome {
    path: String,
    namespaces: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

///
/// Runs the configured lints over C# source trees.
///
pub struct LintRunner {
    mode: Mode,
    lint_collection: Arc<LintCollection>,
    language_version: LanguageVersion,
    registry: DescriptorRegistry,
    context_dir: PathBuf,
}

impl LintRunner {
    pub fn new(mode: Mode, language_version: LanguageVersion, lint_collection: LintCollection) -> Self {
        LintRunner {
            mode,
            lint_collection: Arc::new(lint_collection),
            language_version,
            registry: DescriptorRegistry::with_builtin(),
            context_dir: PathBuf::from(PUP_DIR),
        }
    }

    /// Write project contexts somewhere other than `.pup`.
    pub fn with_context_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.context_dir = dir.into();
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn context_dir(&self) -> &Path {
        &self.context_dir
    }

    ///
    /// Analyse every C# file under `roots`. Files are independent, so
    /// they are parsed and checked in parallel; the report is sorted
    /// afterwards and does not depend on scheduling.
    ///
    pub fn run(&self, roots: &[PathBuf]) -> Result<RunReport> {
        let store = match self.mode {
            Mode::Check => self.lint_collection.build_store(),
            Mode::PrintFiles | Mode::GenerateConfig => LintStore::new(),
        };

        let mut report = RunReport::default();
        for root in roots {
            let files = discover_sources(root)?;
            tracing::debug!(root = %root.display(), files = files.len(), "discovered sources");

            let outcomes = files
                .par_iter()
                .map(|file| self.analyze_file(file, &store))
                .collect::<Result<Vec<FileOutcome>>>()?;

            report.files_analyzed += outcomes.len();
            match self.mode {
                Mode::Check => {
                    report
                        .diagnostics
                        .extend(outcomes.into_iter().flat_map(|outcome| outcome.diagnostics));
                }
                Mode::PrintFiles | Mode::GenerateConfig => {
                    let context = self.build_project_context(root, outcomes);
                    let written = context.serialize_to_file().with_context(|| {
                        format!("Failed to write project context for {}", root.display())
                    })?;
                    report.context_files.push(written);
                }
            }
        }

        sort_diagnostics(&mut report.diagnostics);
        Ok(report)
    }

    #[tracing::instrument(level = "debug", skip(self, store), fields(path = %path.display()))]
    fn analyze_file(&self, path: &Path, store: &LintStore) -> Result<FileOutcome> {
        let tree = self.parse_file(path)?;
        let namespaces = tree.declared_namespaces();

        let mut diagnostics = Vec::new();
        if self.mode == Mode::Check {
            diagnostics.extend(syntax_diagnostic(&tree));
            diagnostics.extend(store.check_tree(&tree, &self.registry));
        }

        Ok(FileOutcome {
            path: display_path(path),
            namespaces,
            diagnostics,
        })
    }

    fn parse_file(&self, path: &Path) -> Result<SyntaxTree> {
        let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let text = String::from_utf8_lossy(&bytes);
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
        Ok(parse(path, text, ParseOptions::new(self.language_version)))
    }

    /// Files, namespaces and applicable lints under one root.
    fn build_project_context(&self, root: &Path, outcomes: Vec<FileOutcome>) -> ProjectContext {
        let mut files: Vec<FileInfo> = outcomes
            .into_iter()
            .map(|outcome| {
                let applicable_lints = self
                    .lint_collection
                    .applicable_to_file(&outcome.path, &outcome.namespaces);
                FileInfo {
                    path: outcome.path,
                    namespaces: outcome.namespaces,
                    applicable_lints,
                }
            })
            .collect();
        files.sort_by(|a, b| a.path.cmp(&b.path));

        let mut context = ProjectContext::with_base_dir(&self.context_dir);
        context.project_root = project_root_name(root);
        context.language_version = self.language_version;
        context.files = files;
        context
    }
}

/// The name a root is recorded under: its directory name, or the
/// current directory's name for `.`.
pub fn project_root_name(root: &Path) -> String {
    let resolved = fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
    let named = if resolved.is_file() {
        resolved.file_stem()
    } else {
        resolved.file_name()
    };
    named
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "project".to_string())
}

/// Every `.cs` file under `root`, in a stable order. A root that is itself
/// a file is returned as-is.
pub fn discover_sources(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        anyhow::bail!("Path not found: {}", root.display());
    }
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == SOURCE_EXTENSION)
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.iter().any(|skipped| name.eq_ignore_ascii_case(skipped))
}
