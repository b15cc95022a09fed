//! Analyzer registry.
//!
//! Several independent analyzers composed under one driver. The registry
//! is agnostic to analyzer internals and is built explicitly at startup;
//! there is no process-wide registration state.

use std::collections::HashSet;

use crate::analysis::analyzer::UnixUtcAnalyzer;
use crate::analysis::diagnostics::Diagnostic;
use crate::parsing::CompilationUnit;

/// One independent checker over a compilation unit.
pub trait Analyzer: Send + Sync {
    fn name(&self) -> &'static str;
    fn run(&self, unit: &CompilationUnit) -> Vec<Diagnostic>;
}

impl Analyzer for UnixUtcAnalyzer {
    fn name(&self) -> &'static str {
        crate::analysis::analyzer::ANALYZER_NAME
    }

    fn run(&self, unit: &CompilationUnit) -> Vec<Diagnostic> {
        UnixUtcAnalyzer::run(self, unit)
    }
}

/// Explicitly constructed set of active analyzers.
pub struct AnalyzerRegistry {
    analyzers: Vec<Box<dyn Analyzer>>,
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        Self {
            analyzers: Vec::new(),
        }
    }

    pub fn register(mut self, analyzer: Box<dyn Analyzer>) -> Self {
        self.analyzers.push(analyzer);
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.analyzers.iter().map(|a| a.name()).collect()
    }

    /// Run every analyzer over the unit; merge, order by position, and
    /// deduplicate overlapping findings by (analyzer, span).
    pub fn run_all(&self, unit: &CompilationUnit) -> Vec<Diagnostic> {
        let mut merged = Vec::new();
        for analyzer in &self.analyzers {
            merged.extend(analyzer.run(unit));
        }
        let mut seen = HashSet::new();
        merged.retain(|d| seen.insert((d.analyzer.clone(), d.span)));
        merged.sort_by(|a, b| a.span.cmp(&b.span).then_with(|| a.analyzer.cmp(&b.analyzer)));
        merged
    }
}

impl Default for AnalyzerRegistry {
    /// The built-in analyzer set.
    fn default() -> Self {
        Self::new().register(Box::new(UnixUtcAnalyzer::new()))
    }
}
