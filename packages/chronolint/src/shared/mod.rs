//! Shared models.

pub mod span;

pub use span::Span;
