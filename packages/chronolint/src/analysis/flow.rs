//! Forward flow tracking for epoch-built time values.
//!
//! One `FlowTracker` instance covers exactly one function body. It walks
//! statements in source order, single forward pass (loops are visited once,
//! no fixed point; a binding reassigned inside a loop keeps the state of
//! its last in-order assignment). Anything the signature catalog does not
//! model degrades the tag to `Unknown`, which is never reported: false
//! negatives over false positives.

use std::collections::HashMap;

use tree_sitter::Node;

use crate::analysis::catalog::SignatureCatalog;
use crate::analysis::escape::{BoundaryKind, BoundaryUse, EscapeClassifier};
use crate::parsing::CompilationUnit;
use crate::shared::Span;

/// Where an unnormalized value was built. Carried inside the tag so a
/// finding at a boundary can point back at, and anchor its fix to, the
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionSite {
    /// Constructor call target, e.g. `time.Unix`.
    pub constructor: String,
    pub span: Span,
    /// Byte offset just past the constructor call, where `.UTC()` goes.
    pub insert_at: usize,
}

/// Three-state tag for one local binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingTag {
    Unnormalized(ConstructionSite),
    Normalized,
    Unknown,
}

/// Binding name -> tag, scoped to a single function-body traversal.
#[derive(Debug, Default)]
pub struct BindingState {
    tags: HashMap<String, BindingTag>,
}

impl BindingState {
    pub fn get(&self, name: &str) -> Option<&BindingTag> {
        self.tags.get(name)
    }

    pub fn set(&mut self, name: &str, tag: BindingTag) {
        self.tags.insert(name.to_string(), tag);
    }

    /// Conservative downgrade after an escape. A Normalized binding stays
    /// Normalized: the value already is canonical and cannot regress.
    pub fn downgrade(&mut self, name: &str) {
        if matches!(self.tags.get(name), Some(BindingTag::Unnormalized(_))) {
            self.tags.insert(name.to_string(), BindingTag::Unknown);
        }
    }
}

/// Walks the statements of one function body and records every boundary
/// use of a tracked value.
pub struct FlowTracker<'a> {
    unit: &'a CompilationUnit,
    catalog: &'a SignatureCatalog,
    classifier: EscapeClassifier<'a>,
    bindings: BindingState,
    findings: Vec<BoundaryUse>,
}

impl<'a> FlowTracker<'a> {
    pub fn new(unit: &'a CompilationUnit, catalog: &'a SignatureCatalog) -> Self {
        Self {
            unit,
            catalog,
            classifier: EscapeClassifier::new(unit, catalog),
            bindings: BindingState::default(),
            findings: Vec::new(),
        }
    }

    /// Run the pass to completion over one function body.
    pub fn run(mut self, body: Node<'a>) -> Vec<BoundaryUse> {
        self.walk_block(body);
        self.findings
    }

    fn walk_block(&mut self, node: Node<'a>) {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            self.walk_stmt(child);
        }
    }

    fn walk_stmt(&mut self, node: Node<'a>) {
        match node.kind() {
            "short_var_declaration" | "assignment_statement" => self.handle_assignment(node),
            "var_declaration" => self.handle_var_declaration(node),
            "return_statement" => {
                if let Some(values) = node.named_child(0) {
                    // Serialization calls inside the return expression are
                    // still boundaries; the returned values then escape.
                    self.handle_expression(values);
                    self.record_escapes(values, "return");
                }
            }
            "expression_statement" | "go_statement" | "defer_statement" => {
                if let Some(expr) = node.named_child(0) {
                    self.handle_expression(expr);
                }
            }
            "block" => self.walk_block(node),
            "if_statement"
            | "for_statement"
            | "expression_switch_statement"
            | "type_switch_statement"
            | "select_statement"
            | "expression_case"
            | "type_case"
            | "default_case"
            | "communication_case"
            | "labeled_statement" => {
                let mut cursor = node.walk();
                let children: Vec<Node> = node.named_children(&mut cursor).collect();
                for child in children {
                    if is_statement_kind(child.kind()) {
                        self.walk_stmt(child);
                    } else {
                        self.handle_expression(child);
                    }
                }
            }
            _ => {}
        }
    }

    /// Assignment transfer. Fresh raw construction tags the target
    /// Unnormalized; a recognized normalization tags it Normalized; any
    /// unrelated right-hand side clears the target to Unknown (shadowing
    /// safety). Field and index targets push the value out of local
    /// tracking.
    fn handle_assignment(&mut self, node: Node<'a>) {
        let (Some(left), Some(right)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) else {
            return;
        };
        let mut left_cursor = left.walk();
        let targets: Vec<Node> = left.named_children(&mut left_cursor).collect();
        let mut right_cursor = right.walk();
        let values: Vec<Node> = right.named_children(&mut right_cursor).collect();

        if targets.len() == values.len() {
            for (target, value) in targets.iter().zip(values.iter()) {
                let tag = self.classify_expr(*value);
                if target.kind() == "identifier" {
                    let name = self.unit.node_text(target);
                    if name != "_" {
                        self.bindings.set(name, tag);
                    }
                } else {
                    // Field or index target: the stored value leaves local
                    // tracking, and so does anything it was read from.
                    self.record_escapes(*value, "field assignment");
                    self.record_escapes(*target, "field assignment");
                }
            }
        } else {
            // Multi-value form (call result spread over several targets):
            // evaluate the right side for its uses, results are opaque.
            for value in &values {
                let _ = self.classify_expr(*value);
            }
            for target in &targets {
                if target.kind() == "identifier" {
                    let name = self.unit.node_text(target);
                    if name != "_" {
                        self.bindings.set(name, BindingTag::Unknown);
                    }
                }
            }
        }
    }

    fn handle_var_declaration(&mut self, node: Node<'a>) {
        let mut cursor = node.walk();
        let specs: Vec<Node> = node
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "var_spec")
            .collect();
        for spec in specs {
            let mut name_cursor = spec.walk();
            let names: Vec<Node> = spec
                .children_by_field_name("name", &mut name_cursor)
                .collect();
            let values: Vec<Node> = match spec.child_by_field_name("value") {
                Some(list) => {
                    let mut value_cursor = list.walk();
                    list.named_children(&mut value_cursor).collect()
                }
                None => Vec::new(),
            };
            if names.len() == values.len() {
                for (name, value) in names.iter().zip(values.iter()) {
                    let tag = self.classify_expr(*value);
                    self.bindings.set(self.unit.node_text(name), tag);
                }
            } else {
                for value in &values {
                    let _ = self.classify_expr(*value);
                }
                // Declared without matching initializers: never tracked.
            }
        }
    }

    /// Statement-position expression: only calls have flow effects.
    fn handle_expression(&mut self, node: Node<'a>) {
        match node.kind() {
            "call_expression" => {
                let _ = self.classify_call(node);
            }
            // Function literals open a fresh scope; the facade analyzes
            // their bodies separately.
            "func_literal" => {}
            _ => {
                let mut cursor = node.walk();
                let children: Vec<Node> = node.named_children(&mut cursor).collect();
                for child in children {
                    self.handle_expression(child);
                }
            }
        }
    }

    /// Classify a right-hand-side expression into a binding tag. Calls are
    /// also evaluated for their flow side effects (boundary scans, escape
    /// downgrades).
    fn classify_expr(&mut self, node: Node<'a>) -> BindingTag {
        match node.kind() {
            "parenthesized_expression" => node
                .named_child(0)
                .map(|inner| self.classify_expr(inner))
                .unwrap_or(BindingTag::Unknown),
            "unary_expression" => node
                .child_by_field_name("operand")
                .map(|inner| self.classify_expr(inner))
                .unwrap_or(BindingTag::Unknown),
            "identifier" => self
                .bindings
                .get(self.unit.node_text(&node))
                .cloned()
                .unwrap_or(BindingTag::Unknown),
            "call_expression" => self.classify_call(node),
            "composite_literal" => self.classify_composite(node),
            _ => BindingTag::Unknown,
        }
    }

    fn classify_call(&mut self, call: Node<'a>) -> BindingTag {
        let Some(function) = call.child_by_field_name("function") else {
            return BindingTag::Unknown;
        };
        let callee = self.unit.node_text(&function).to_string();

        if self.catalog.is_raw_construction(&callee) {
            return BindingTag::Unnormalized(ConstructionSite {
                constructor: callee,
                span: Span::of(&call),
                insert_at: call.end_byte(),
            });
        }
        if self.catalog.is_serialization_function(&callee) {
            self.scan_boundary(call, &callee);
            return BindingTag::Unknown;
        }
        if function.kind() == "selector_expression" {
            let method = function
                .child_by_field_name("field")
                .map(|f| self.unit.node_text(&f).to_string())
                .unwrap_or_default();
            let first_arg = self.first_argument_text(call);
            if self.catalog.is_normalization(&method, first_arg.as_deref()) {
                // A chained constructor receiver is consumed right here;
                // the produced value is canonical either way.
                if let Some(operand) = function.child_by_field_name("operand") {
                    let _ = self.classify_expr(operand);
                }
                return BindingTag::Normalized;
            }
            if self.catalog.is_serialization_method(&method) {
                self.scan_boundary(call, &method);
                return BindingTag::Unknown;
            }
        }
        // Unmodeled call: arguments escape local tracking. Reading the
        // receiver of an unmodeled method is plain local consumption.
        if let Some(args) = call.child_by_field_name("arguments") {
            self.record_escapes(args, &callee);
        }
        BindingTag::Unknown
    }

    /// A struct or slice literal carrying an unnormalized value inherits
    /// that value's construction site, so a later serialization of the
    /// literal's binding still reports.
    fn classify_composite(&mut self, literal: Node<'a>) -> BindingTag {
        match literal.child_by_field_name("body") {
            Some(body) => self.classify_literal_value(body),
            None => BindingTag::Unknown,
        }
    }

    fn classify_literal_value(&mut self, body: Node<'a>) -> BindingTag {
        let mut cursor = body.walk();
        let elements: Vec<Node> = body.named_children(&mut cursor).collect();
        let mut carried: Option<ConstructionSite> = None;
        for element in elements {
            let Some(value) = element_value(element) else {
                continue;
            };
            let tag = if value.kind() == "literal_value" {
                self.classify_literal_value(value)
            } else {
                self.classify_expr(value)
            };
            if let BindingTag::Unnormalized(site) = tag {
                carried.get_or_insert(site);
            }
        }
        match carried {
            Some(site) => BindingTag::Unnormalized(site),
            None => BindingTag::Unknown,
        }
    }

    fn scan_boundary(&mut self, call: Node<'a>, boundary: &str) {
        if let Some(args) = call.child_by_field_name("arguments") {
            self.classifier.scan_serialization_args(
                args,
                boundary,
                Span::of(&call),
                &self.bindings,
                &mut self.findings,
            );
        }
    }

    /// Every tracked Unnormalized identifier under `node` escapes: record
    /// the use and downgrade the binding so later boundary uses of it stay
    /// silent.
    fn record_escapes(&mut self, node: Node<'a>, context: &str) {
        let mut identifiers = Vec::new();
        collect_identifiers(node, &mut identifiers);
        for identifier in identifiers {
            let name = self.unit.node_text(&identifier).to_string();
            let site = match self.bindings.get(&name) {
                Some(BindingTag::Unnormalized(site)) => site.clone(),
                _ => continue,
            };
            self.findings.push(BoundaryUse {
                origin: site,
                boundary: context.to_string(),
                use_span: Span::of(&identifier),
                kind: BoundaryKind::Escape,
            });
            self.bindings.downgrade(&name);
        }
    }

    fn first_argument_text(&self, call: Node<'a>) -> Option<String> {
        let args = call.child_by_field_name("arguments")?;
        let mut cursor = args.walk();
        let first = args.named_children(&mut cursor).next()?;
        Some(self.unit.node_text(&first).to_string())
    }
}

/// The value expression of a composite-literal element, keyed or not.
fn element_value(element: Node) -> Option<Node> {
    let node = match element.kind() {
        "keyed_element" => element.named_child(element.named_child_count().saturating_sub(1))?,
        _ => element,
    };
    match node.kind() {
        "literal_element" | "element" => node.named_child(0),
        _ => Some(node),
    }
}

/// Identifiers under `node` whose value escapes through it. Reading a
/// binding as a plain method receiver (`t.String()`) is local consumption
/// and is excluded.
fn collect_identifiers<'a>(node: Node<'a>, out: &mut Vec<Node<'a>>) {
    match node.kind() {
        "identifier" => out.push(node),
        // Fresh scope, analyzed separately.
        "func_literal" => {}
        "call_expression" => {
            if let Some(function) = node.child_by_field_name("function") {
                if function.kind() == "selector_expression" {
                    if let Some(operand) = function.child_by_field_name("operand") {
                        if operand.kind() != "identifier" {
                            collect_identifiers(operand, out);
                        }
                    }
                } else {
                    collect_identifiers(function, out);
                }
            }
            if let Some(args) = node.child_by_field_name("arguments") {
                collect_identifiers(args, out);
            }
        }
        _ => {
            let mut cursor = node.walk();
            let children: Vec<Node> = node.named_children(&mut cursor).collect();
            for child in children {
                collect_identifiers(child, out);
            }
        }
    }
}

fn is_statement_kind(kind: &str) -> bool {
    matches!(
        kind,
        "short_var_declaration"
            | "assignment_statement"
            | "var_declaration"
            | "const_declaration"
            | "return_statement"
            | "expression_statement"
            | "go_statement"
            | "defer_statement"
            | "block"
            | "if_statement"
            | "for_statement"
            | "expression_switch_statement"
            | "type_switch_statement"
            | "select_statement"
            | "expression_case"
            | "type_case"
            | "default_case"
            | "communication_case"
            | "labeled_statement"
            | "break_statement"
            | "continue_statement"
            | "inc_statement"
            | "dec_statement"
    )
}
