// This product includes software developed at Datadog (https://www.datadoghq.com/) Copyright 2024 Datadog, Inc.

use crate::language_version::LanguageVersion;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

pub const PUP_DIR: &str = ".pup";
pub const CONTEXT_FILE_SUFFIX: &str = "_context.json";

/// Information about a source file and the lints that apply to it
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Path of the file, relative to the project root where possible
    pub path: String,
    /// Namespaces declared in the file, fully qualified
    #[serde(default)]
    pub namespaces: Vec<String>,
    /// List of lint names that apply to this file
    #[serde(default)]
    pub applicable_lints: Vec<String>,
}

/// Context discovered while walking a project - the files we saw,
/// what they declare, and which lints target them. Used to print the
/// project tree and to generate an initial configuration.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProjectContext {
    /// All analysed files with their applicable lints
    pub files: Vec<FileInfo>,
    /// Name of the project root (the directory name we were run against)
    pub project_root: String,
    /// Language version the files were parsed under
    #[serde(default)]
    pub language_version: LanguageVersion,
    /// Base directory for storing context files (not serialized)
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Default for ProjectContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectContext {
    /// Creates a new empty project context with default base directory (.pup)
    pub fn new() -> Self {
        Self::with_base_dir(PUP_DIR)
    }

    /// Creates a new empty project context with a custom base directory
    pub fn with_base_dir(dir_path: impl AsRef<Path>) -> Self {
        Self {
            files: Vec::new(),
            project_root: String::new(),
            language_version: LanguageVersion::default(),
            base_dir: dir_path.as_ref().to_path_buf(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Every distinct namespace declared across the project, sorted
    pub fn namespaces(&self) -> Vec<String> {
        let mut namespaces: Vec<String> = self
            .files
            .iter()
            .flat_map(|file| file.namespaces.iter().cloned())
            .collect();
        namespaces.sort();
        namespaces.dedup();
        namespaces
    }

    /// Serialize this project context to a file in the base directory
    /// with a name based on the project root
    pub fn serialize_to_file(&self) -> Result<PathBuf> {
        if self.project_root.is_empty() {
            return Err(anyhow::anyhow!(
                "Cannot serialize ProjectContext with empty project_root"
            ));
        }

        fs::create_dir_all(&self.base_dir)
            .context(format!("Failed to create directory: {}", self.base_dir.display()))?;

        let filename = format!("{}{}", self.project_root, CONTEXT_FILE_SUFFIX);
        let file_path = self.base_dir.join(&filename);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&file_path)
            .context(format!(
                "Failed to open file for writing: {}",
                file_path.display()
            ))?;

        serde_json::to_writer_pretty(file, &self).context(format!(
            "Failed to serialize ProjectContext to: {}",
            file_path.display()
        ))?;

        Ok(file_path)
    }

    /// Load all project contexts from a directory and return the merged result
    /// along with the project roots that were found
    pub fn load_all_contexts_from_dir(dir_path: &Path) -> Result<(ProjectContext, Vec<String>)> {
        if !dir_path.exists() {
            return Err(anyhow::anyhow!("Directory not found: {}", dir_path.display()));
        }

        let mut aggregated_context = ProjectContext::with_base_dir(dir_path);
        let mut project_roots = Vec::new();

        let entries = fs::read_dir(dir_path)
            .context(format!("Failed to read directory: {}", dir_path.display()))?;

        let mut contexts_found = false;
        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            let Some(filename) = path.file_name().and_then(|f| f.to_str()) else {
                continue;
            };
            if !filename.ends_with(CONTEXT_FILE_SUFFIX) {
                continue;
            }

            let content = fs::read_to_string(&path)
                .context(format!("Failed to read file: {}", path.display()))?;
            let context: ProjectContext = serde_json::from_str(&content)
                .context(format!("Failed to parse JSON from: {}", path.display()))?;

            contexts_found = true;
            if !project_roots.contains(&context.project_root) {
                project_roots.push(context.project_root.clone());
            }
            aggregated_context.merge(&context);
        }

        if !contexts_found {
            return Err(anyhow::anyhow!(
                "No project context files found in {}",
                dir_path.display()
            ));
        }

        aggregated_context.files.sort_by(|a, b| a.path.cmp(&b.path));
        project_roots.sort();

        Ok((aggregated_context, project_roots))
    }

    /// Clean up all context files from the base directory
    pub fn clean_context_files(&self) -> Result<()> {
        if !self.base_dir.exists() {
            return Ok(());
        }

        let entries = fs::read_dir(&self.base_dir)
            .context(format!("Failed to read directory: {}", self.base_dir.display()))?;

        for entry in entries.filter_map(Result::ok) {
            let path = entry.path();
            if let Some(filename) = path.file_name().and_then(|f| f.to_str())
                && filename.ends_with(CONTEXT_FILE_SUFFIX)
            {
                let _ = fs::remove_file(&path);
            }
        }

        Ok(())
    }

    fn merge(&mut self, other: &ProjectContext) {
        if self.project_root.is_empty() {
            self.project_root = other.project_root.clone();
            self.language_version = other.language_version;
        }
        self.files.extend(other.files.clone());
    }
}
