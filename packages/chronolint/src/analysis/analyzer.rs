//! Analyzer facade: the entry point the aggregator calls once per
//! compilation unit.
//!
//! Never fails: a shape the catalog cannot resolve degrades to Unknown and
//! is skipped. Precision failures over availability failures; this is an
//! advisory tool.

use std::sync::atomic::{AtomicBool, Ordering};

use tree_sitter::Node;

use crate::analysis::catalog::SignatureCatalog;
use crate::analysis::diagnostics::{Diagnostic, DiagnosticEmitter};
use crate::analysis::escape::BoundaryKind;
use crate::analysis::flow::FlowTracker;
use crate::parsing::CompilationUnit;

pub const ANALYZER_NAME: &str = "time-unix-utc";

/// Flags epoch-built time values that reach a serialization boundary
/// without UTC normalization.
pub struct UnixUtcAnalyzer {
    catalog: SignatureCatalog,
}

impl UnixUtcAnalyzer {
    pub fn new() -> Self {
        Self {
            catalog: SignatureCatalog::new(),
        }
    }

    pub fn with_catalog(catalog: SignatureCatalog) -> Self {
        Self { catalog }
    }

    /// Analyze one unit: fresh flow tracker per function body, findings
    /// unioned, ordered, and deduplicated.
    pub fn run(&self, unit: &CompilationUnit) -> Vec<Diagnostic> {
        self.run_with_cancel(unit, &AtomicBool::new(false))
    }

    /// Like `run`, with cooperative cancellation checked between function
    /// bodies only; a single body's traversal is O(statements) and bounded.
    pub fn run_with_cancel(&self, unit: &CompilationUnit, cancel: &AtomicBool) -> Vec<Diagnostic> {
        let mut emitter = DiagnosticEmitter::new(ANALYZER_NAME, unit.path());
        let mut bodies = Vec::new();
        collect_function_bodies(unit.root(), &mut bodies);
        for body in bodies {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            let findings = FlowTracker::new(unit, &self.catalog).run(body);
            for finding in &findings {
                if finding.kind == BoundaryKind::SerializationBoundary {
                    emitter.report(finding);
                }
            }
        }
        emitter.finish()
    }
}

impl Default for UnixUtcAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Function, method, and function-literal bodies, each a separate scope.
fn collect_function_bodies<'a>(node: Node<'a>, out: &mut Vec<Node<'a>>) {
    if matches!(
        node.kind(),
        "function_declaration" | "method_declaration" | "func_literal"
    ) {
        if let Some(body) = node.child_by_field_name("body") {
            out.push(body);
        }
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.named_children(&mut cursor).collect();
    for child in children {
        collect_function_bodies(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::GoParser;

    fn analyze(source: &str) -> Vec<Diagnostic> {
        let unit = GoParser::new().unwrap().parse("main.go", source).unwrap();
        UnixUtcAnalyzer::new().run(&unit)
    }

    #[test]
    fn test_no_construction_no_diagnostics() {
        let diagnostics = analyze(
            r#"
package main

func f(t time.Time) {
    json.Marshal(Order{CreatedAt: t.UTC()})
}
"#,
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_scenario_bad_struct_literal() {
        let source = r#"
package main

func bad(unixTimestamp int64) {
    b, _ := json.MarshalIndent(Order{
        CreatedAt: time.Unix(unixTimestamp, 0),
    }, "", "  ")
    fmt.Printf("bad: %v\n", string(b))
}
"#;
        let diagnostics = analyze(source);
        assert_eq!(diagnostics.len(), 1);

        let diag = &diagnostics[0];
        assert_eq!(diag.analyzer, ANALYZER_NAME);
        assert_eq!(diag.span.start_line, 6);

        let fix = diag.fix.as_ref().unwrap();
        assert_eq!(fix.text, ".UTC()");
        let construction = "time.Unix(unixTimestamp, 0)";
        let expected = source.find(construction).unwrap() + construction.len();
        assert_eq!(fix.insert_at, expected);
    }

    #[test]
    fn test_scenario_good_struct_literal() {
        let diagnostics = analyze(
            r#"
package main

func good(unixTimestamp int64) {
    b, _ := json.MarshalIndent(Order{
        CreatedAt: time.Unix(unixTimestamp, 0).UTC(),
    }, "", "  ")
    fmt.Printf("good: %v\n", string(b))
}
"#,
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_multiple_functions_union() {
        let diagnostics = analyze(
            r#"
package main

func a(ts int64) {
    json.Marshal(Order{CreatedAt: time.Unix(ts, 0)})
}

func b(ts int64) {
    json.Marshal(Order{CreatedAt: time.UnixMilli(ts)})
}

func clean(ts int64) {
    json.Marshal(Order{CreatedAt: time.Unix(ts, 0).UTC()})
}
"#,
        );
        assert_eq!(diagnostics.len(), 2);
        // Ordered by source position.
        assert!(diagnostics[0].span < diagnostics[1].span);
    }

    #[test]
    fn test_function_literal_body_is_analyzed() {
        let diagnostics = analyze(
            r#"
package main

func outer(ts int64) {
    handler := func() {
        json.Marshal(Order{CreatedAt: time.Unix(ts, 0)})
    }
    handler()
}
"#,
        );
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_cancelled_run_stops_early() {
        let unit = GoParser::new()
            .unwrap()
            .parse(
                "main.go",
                r#"
package main

func a(ts int64) {
    json.Marshal(Order{CreatedAt: time.Unix(ts, 0)})
}
"#,
            )
            .unwrap();
        let cancelled = AtomicBool::new(true);
        let diagnostics = UnixUtcAnalyzer::new().run_with_cancel(&unit, &cancelled);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_idempotent_runs() {
        let unit = GoParser::new()
            .unwrap()
            .parse(
                "main.go",
                r#"
package main

func f(ts int64) {
    t := time.Unix(ts, 0)
    json.Marshal(Order{CreatedAt: t})
}
"#,
            )
            .unwrap();
        let analyzer = UnixUtcAnalyzer::new();
        assert_eq!(analyzer.run(&unit), analyzer.run(&unit));
    }
}
