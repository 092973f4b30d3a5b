//! A hand-written tree builder for constructing [`SyntaxNode`] fixtures.
//!
//! Lexing and parsing real Objective-C source is out of scope (see the
//! module doc on [`crate::cst`]); this builder exists so this crate's own
//! tests can assemble CST fixtures that match the shape a real grammar
//! would produce, without needing one.

use rowan::{GreenNode, GreenNodeBuilder};

use super::syntax_kind::{SyntaxKind, SyntaxNode};

pub struct TreeBuilder {
    inner: GreenNodeBuilder<'static>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            inner: GreenNodeBuilder::new(),
        }
    }

    pub fn start_node(&mut self, kind: SyntaxKind) -> &mut Self {
        self.inner.start_node(kind.into());
        self
    }

    pub fn finish_node(&mut self) -> &mut Self {
        self.inner.finish_node();
        self
    }

    pub fn token(&mut self, kind: SyntaxKind, text: &str) -> &mut Self {
        self.inner.token(kind.into(), text);
        self
    }

    /// Convenience for a node with a single known-text token as its only child,
    /// e.g. an identifier node wrapping one `Ident` token.
    pub fn leaf_node(&mut self, node_kind: SyntaxKind, token_kind: SyntaxKind, text: &str) -> &mut Self {
        self.start_node(node_kind);
        self.token(token_kind, text);
        self.finish_node();
        self
    }

    pub fn finish(self) -> SyntaxNode {
        let green: GreenNode = self.inner.finish();
        SyntaxNode::new_root(green)
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
