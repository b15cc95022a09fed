// The detection engine.
//
// Stages, leaves first:
// - catalog: the call shapes the analysis recognizes (pure data)
// - flow: per-function forward pass maintaining a three-state binding tag
// - escape: classifies each use of a tracked value
// - diagnostics: structured findings with dedup and fix suggestions
// - analyzer: the facade the aggregator calls once per compilation unit

pub mod analyzer;
pub mod catalog;
pub mod diagnostics;
pub mod escape;
pub mod flow;

pub use analyzer::{UnixUtcAnalyzer, ANALYZER_NAME};
pub use catalog::SignatureCatalog;
pub use diagnostics::{Diagnostic, DiagnosticEmitter, Severity, SuggestedFix};
pub use escape::{BoundaryKind, BoundaryUse, EscapeClassifier};
pub use flow::{BindingState, BindingTag, ConstructionSite, FlowTracker};
