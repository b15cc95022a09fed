//! File driver: discovers Go sources, parses them, and fans the analyzer
//! registry out across files with rayon.
//!
//! Per-file failures (unreadable, unparseable) are logged and skipped; the
//! tool stays advisory. Only a missing input path is an error.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::analysis::diagnostics::Diagnostic;
use crate::errors::{ChronolintError, Result};
use crate::parsing::GoParser;
use crate::pipeline::registry::AnalyzerRegistry;

#[derive(Debug, Clone, Default)]
pub struct DriverOptions {
    /// Skip `*_test.go` files.
    pub skip_tests: bool,
}

pub struct Driver {
    registry: AnalyzerRegistry,
    options: DriverOptions,
}

impl Driver {
    pub fn new(registry: AnalyzerRegistry) -> Self {
        Self {
            registry,
            options: DriverOptions::default(),
        }
    }

    pub fn with_options(registry: AnalyzerRegistry, options: DriverOptions) -> Self {
        Self { registry, options }
    }

    /// Analyze every Go file under the given paths. Diagnostics come back
    /// ordered by (path, position).
    pub fn run(&self, paths: &[PathBuf]) -> Result<Vec<Diagnostic>> {
        let mut files = Vec::new();
        for path in paths {
            if !path.exists() {
                return Err(ChronolintError::config(format!(
                    "no such path: {}",
                    path.display()
                )));
            }
            if path.is_dir() {
                files.extend(collect_go_files(path, self.options.skip_tests));
            } else {
                files.push(path.clone());
            }
        }
        files.sort();
        files.dedup();
        debug!(files = files.len(), "starting analysis");

        let mut diagnostics: Vec<Diagnostic> = files
            .par_iter()
            .filter_map(|file| match self.analyze_file(file) {
                Ok(diags) => Some(diags),
                Err(err) => {
                    warn!(file = %file.display(), %err, "skipping file");
                    None
                }
            })
            .flatten()
            .collect();
        diagnostics.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.span.cmp(&b.span)));
        Ok(diagnostics)
    }

    fn analyze_file(&self, file: &Path) -> Result<Vec<Diagnostic>> {
        let source = fs::read_to_string(file)?;
        let mut parser = GoParser::new()?;
        let unit = parser.parse(&file.to_string_lossy(), &source)?;
        Ok(self.registry.run_all(&unit))
    }
}

/// Recursively collect `.go` files, skipping vendored trees, testdata, and
/// hidden directories.
pub fn collect_go_files(root: &Path, skip_tests: bool) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            name != "vendor" && name != "testdata" && !name.starts_with('.')
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().map(|ext| ext == "go").unwrap_or(false))
        .filter(|path| {
            !skip_tests
                || !path
                    .file_name()
                    .map(|name| name.to_string_lossy().ends_with("_test.go"))
                    .unwrap_or(false)
        })
        .collect()
}
