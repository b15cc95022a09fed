//! Go source parsing.
//!
//! Wraps tree-sitter-go behind `CompilationUnit`, the read-only handle the
//! analysis layer consumes. Parse failures are driver-level concerns and
//! surface as errors here; the analysis itself never fails.

use tree_sitter::{Node, Parser, Tree};

use crate::errors::{ChronolintError, Result};

/// One parsed source file. Owned by the driver, read-only to the analysis.
pub struct CompilationUnit {
    path: String,
    source: String,
    tree: Tree,
}

impl CompilationUnit {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Source text covered by a node.
    pub fn node_text(&self, node: &Node) -> &str {
        &self.source[node.byte_range()]
    }
}

/// Go parser. Not shared across threads; the driver creates one per file
/// inside its parallel loop.
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::language())
            .map_err(|e| ChronolintError::parse_error(format!("failed to load Go grammar: {e}")))?;
        Ok(Self { parser })
    }

    pub fn parse(&mut self, path: &str, source: &str) -> Result<CompilationUnit> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| ChronolintError::parse_error(format!("{path}: parser returned no tree")))?;
        Ok(CompilationUnit {
            path: path.to_string(),
            source: source.to_string(),
            tree,
        })
    }
}
