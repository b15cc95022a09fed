//! Source position model.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 1-based line/column range in one source file.
///
/// Ordering follows source order (start position first), which makes the
/// span itself the stable position key used for deduplication and output
/// ordering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Span {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

impl Span {
    pub fn new(start_line: u32, start_col: u32, end_line: u32, end_col: u32) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Span of a tree-sitter node. Rows and columns come back 0-based from
    /// the parser and are stored 1-based.
    pub fn of(node: &tree_sitter::Node) -> Self {
        let start = node.start_position();
        let end = node.end_position();
        Self {
            start_line: start.row as u32 + 1,
            start_col: start.column as u32 + 1,
            end_line: end.row as u32 + 1,
            end_col: end.column as u32 + 1,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_ordering_is_source_order() {
        let first = Span::new(1, 5, 1, 20);
        let second = Span::new(3, 1, 3, 10);
        assert!(first < second);

        let same_line_earlier = Span::new(3, 1, 3, 4);
        assert!(same_line_earlier <= second);
    }

    #[test]
    fn test_span_display() {
        let span = Span::new(12, 7, 12, 30);
        assert_eq!(span.to_string(), "12:7");
    }
}
