//! Swift pretty-printer: turns the finished intention graph into Swift
//! source text after the body queue has rewritten every body. Nothing
//! in this module mutates the collection.

pub mod emitter;
pub mod expr_emit;

pub use emitter::emit_all;
