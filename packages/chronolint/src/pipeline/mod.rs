//! Aggregation and file driving: everything around the analysis core.

pub mod driver;
pub mod registry;

pub use driver::{collect_go_files, Driver, DriverOptions};
pub use registry::{Analyzer, AnalyzerRegistry};
