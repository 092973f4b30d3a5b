//! The concrete syntax tree shape handed back by an (external) Objective-C
//! parser, plus a typed accessor layer over it.
//!
//! Lexing and parsing real `.h`/`.m` text is a deliberately external
//! collaborator (see the crate root docs): this module only fixes the
//! *shape* of the tree such a parser produces (green/red `rowan` tree,
//! node/token kinds in [`syntax_kind`]) and a typed accessor layer
//! ([`nodes`]) that [`crate::reader`] walks. [`builder`] is a hand-written
//! tree constructor used only by this crate's own fixtures.

pub mod builder;
pub mod nodes;
pub mod syntax_kind;

pub use syntax_kind::{ObjcLang, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
