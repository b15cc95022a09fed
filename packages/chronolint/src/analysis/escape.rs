//! Use-site classification for tracked values.
//!
//! Three-way split: a use either reaches a serialization boundary (the one
//! pattern this tool reports), escapes local analysis (conservative
//! silence), or is plain local consumption (no effect). The split bounds
//! false positives without interprocedural analysis.

use tree_sitter::Node;

use crate::analysis::catalog::SignatureCatalog;
use crate::analysis::flow::{BindingState, BindingTag, ConstructionSite};
use crate::parsing::CompilationUnit;
use crate::shared::Span;

/// What a use of a tracked value amounts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryKind {
    /// The value becomes observable in an externally consumed encoded form.
    SerializationBoundary,
    /// Downstream fate is untrackable; forces Unknown, never reported.
    Escape,
    /// Any other read; no effect on the tag.
    LocalConsumption,
}

/// One observed use of a tracked value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryUse {
    pub origin: ConstructionSite,
    /// Call target or context of the use, e.g. `json.Marshal` or `return`.
    pub boundary: String,
    pub use_span: Span,
    pub kind: BoundaryKind,
}

/// Scans the argument subtree of a recognized serialization call for
/// unnormalized values, through struct literals built in place.
pub struct EscapeClassifier<'a> {
    unit: &'a CompilationUnit,
    catalog: &'a SignatureCatalog,
}

impl<'a> EscapeClassifier<'a> {
    pub fn new(unit: &'a CompilationUnit, catalog: &'a SignatureCatalog) -> Self {
        Self { unit, catalog }
    }

    pub fn scan_serialization_args(
        &self,
        args: Node<'a>,
        boundary: &str,
        call_span: Span,
        bindings: &BindingState,
        findings: &mut Vec<BoundaryUse>,
    ) {
        let mut cursor = args.walk();
        let arguments: Vec<Node> = args.named_children(&mut cursor).collect();
        for argument in arguments {
            self.scan_value(argument, boundary, call_span, bindings, findings);
        }
    }

    fn scan_value(
        &self,
        node: Node<'a>,
        boundary: &str,
        call_span: Span,
        bindings: &BindingState,
        findings: &mut Vec<BoundaryUse>,
    ) {
        match node.kind() {
            "call_expression" => {
                let Some(function) = node.child_by_field_name("function") else {
                    return;
                };
                let callee = self.unit.node_text(&function);
                if self.catalog.is_raw_construction(callee) {
                    // Inline construction serialized in place.
                    findings.push(BoundaryUse {
                        origin: ConstructionSite {
                            constructor: callee.to_string(),
                            span: Span::of(&node),
                            insert_at: node.end_byte(),
                        },
                        boundary: boundary.to_string(),
                        use_span: call_span,
                        kind: BoundaryKind::SerializationBoundary,
                    });
                    return;
                }
                if function.kind() == "selector_expression" {
                    let method = function
                        .child_by_field_name("field")
                        .map(|f| self.unit.node_text(&f))
                        .unwrap_or("");
                    if self.catalog.is_normalization(method, self.first_argument_text(node)) {
                        // Canonical by construction.
                        return;
                    }
                }
                // Unmodeled call: its result is untrackable, and descending
                // could only add findings that an intermediate call must
                // suppress.
            }
            "identifier" => {
                if let Some(BindingTag::Unnormalized(site)) =
                    bindings.get(self.unit.node_text(&node))
                {
                    findings.push(BoundaryUse {
                        origin: site.clone(),
                        boundary: boundary.to_string(),
                        use_span: call_span,
                        kind: BoundaryKind::SerializationBoundary,
                    });
                }
            }
            "composite_literal"
            | "literal_value"
            | "keyed_element"
            | "literal_element"
            | "element"
            | "unary_expression"
            | "parenthesized_expression"
            | "expression_list" => {
                let mut cursor = node.walk();
                let children: Vec<Node> = node.named_children(&mut cursor).collect();
                for child in children {
                    self.scan_value(child, boundary, call_span, bindings, findings);
                }
            }
            _ => {}
        }
    }

    fn first_argument_text(&self, call: Node<'a>) -> Option<&str> {
        let args = call.child_by_field_name("arguments")?;
        let mut cursor = args.walk();
        let first = args.named_children(&mut cursor).next()?;
        Some(self.unit.node_text(&first))
    }
}
