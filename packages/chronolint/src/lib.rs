/*
 * chronolint - flow-sensitive lint for unnormalized epoch timestamps
 *
 * Detects Go code that builds a time.Time from a raw epoch value
 * (time.Unix and friends) and serializes it (json.Marshal and friends)
 * without first normalizing to UTC. Unnormalized values serialize with
 * the host's local offset baked in, silently violating wire-format
 * contracts such as "created_at is always RFC3339 with Z".
 *
 * Layout:
 * - shared/    : Span and other small models
 * - parsing/   : tree-sitter-go wrapper producing CompilationUnit
 * - analysis/  : catalog -> flow tracker -> escape classifier -> emitter -> facade
 * - pipeline/  : analyzer registry (aggregation) and file driver
 * - config     : YAML catalog extension
 */

pub mod analysis;
pub mod config;
pub mod errors;
pub mod parsing;
pub mod pipeline;
pub mod shared;

pub use analysis::analyzer::{UnixUtcAnalyzer, ANALYZER_NAME};
pub use analysis::catalog::SignatureCatalog;
pub use analysis::diagnostics::{Diagnostic, Severity, SuggestedFix};
pub use config::CatalogConfig;
pub use errors::{ChronolintError, Result};
pub use parsing::{CompilationUnit, GoParser};
pub use pipeline::driver::{collect_go_files, Driver, DriverOptions};
pub use pipeline::registry::{Analyzer, AnalyzerRegistry};
pub use shared::Span;
