//! Structured findings.
//!
//! Diagnostics are value objects; the emitter owns deduplication. The
//! primary range is the construction site, so several boundary uses of one
//! binding collapse into a single report anchored where the fix goes.

use std::collections::HashSet;

use serde::Serialize;

use crate::analysis::escape::BoundaryUse;
use crate::shared::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// A textual insertion the driver may apply or merely display. Nothing in
/// this crate rewrites source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedFix {
    /// Byte offset of the insertion point, immediately after the flagged
    /// construction expression.
    pub insert_at: usize,
    pub text: String,
}

/// One reported finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub analyzer: String,
    pub path: String,
    pub span: Span,
    pub message: String,
    pub severity: Severity,
    pub fix: Option<SuggestedFix>,
}

/// Converts boundary findings into diagnostics for one compilation unit.
pub struct DiagnosticEmitter {
    analyzer: &'static str,
    path: String,
    seen: HashSet<Span>,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticEmitter {
    pub fn new(analyzer: &'static str, path: &str) -> Self {
        Self {
            analyzer,
            path: path.to_string(),
            seen: HashSet::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Report one unnormalized-at-boundary finding. Repeated findings for
    /// the same construction are dropped.
    pub fn report(&mut self, finding: &BoundaryUse) {
        if !self.seen.insert(finding.origin.span) {
            return;
        }
        let message = format!(
            "{} result built at {} reaches {} at {} without UTC normalization; \
             normalize with .UTC() at the construction",
            finding.origin.constructor, finding.origin.span, finding.boundary, finding.use_span,
        );
        self.diagnostics.push(Diagnostic {
            analyzer: self.analyzer.to_string(),
            path: self.path.clone(),
            span: finding.origin.span,
            message,
            severity: Severity::Warning,
            fix: Some(SuggestedFix {
                insert_at: finding.origin.insert_at,
                text: ".UTC()".to_string(),
            }),
        });
    }

    /// Diagnostics ordered by source position.
    pub fn finish(mut self) -> Vec<Diagnostic> {
        self.diagnostics.sort_by(|a, b| a.span.cmp(&b.span));
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::escape::BoundaryKind;
    use crate::analysis::flow::ConstructionSite;

    fn finding(origin_line: u32, use_line: u32) -> BoundaryUse {
        BoundaryUse {
            origin: ConstructionSite {
                constructor: "time.Unix".to_string(),
                span: Span::new(origin_line, 10, origin_line, 28),
                insert_at: 120,
            },
            boundary: "json.Marshal".to_string(),
            use_span: Span::new(use_line, 5, use_line, 40),
            kind: BoundaryKind::SerializationBoundary,
        }
    }

    #[test]
    fn test_report_builds_message_and_fix() {
        let mut emitter = DiagnosticEmitter::new("time-unix-utc", "main.go");
        emitter.report(&finding(5, 8));

        let diagnostics = emitter.finish();
        assert_eq!(diagnostics.len(), 1);

        let diag = &diagnostics[0];
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.span.start_line, 5);
        assert!(diag.message.contains("time.Unix"));
        assert!(diag.message.contains("json.Marshal"));
        assert!(diag.message.contains("8:5"));

        let fix = diag.fix.as_ref().unwrap();
        assert_eq!(fix.text, ".UTC()");
        assert_eq!(fix.insert_at, 120);
    }

    #[test]
    fn test_dedup_by_construction_span() {
        let mut emitter = DiagnosticEmitter::new("time-unix-utc", "main.go");
        // Same construction reaching two boundaries reports once.
        emitter.report(&finding(5, 8));
        emitter.report(&finding(5, 12));

        assert_eq!(emitter.finish().len(), 1);
    }

    #[test]
    fn test_output_ordered_by_position() {
        let mut emitter = DiagnosticEmitter::new("time-unix-utc", "main.go");
        emitter.report(&finding(9, 10));
        emitter.report(&finding(3, 10));

        let diagnostics = emitter.finish();
        assert_eq!(diagnostics[0].span.start_line, 3);
        assert_eq!(diagnostics[1].span.start_line, 9);
    }

    #[test]
    fn test_diagnostic_serializes_to_json() {
        let mut emitter = DiagnosticEmitter::new("time-unix-utc", "main.go");
        emitter.report(&finding(5, 8));
        let diagnostics = emitter.finish();

        let json = serde_json::to_string(&diagnostics).unwrap();
        assert!(json.contains("\"severity\":\"warning\""));
        assert!(json.contains("\"insert_at\":120"));
    }
}
