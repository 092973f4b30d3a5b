//! Crate-wide error types.
//!
//! Each pipeline stage gets its own variant set where the distinctions are
//! useful to a caller; stages that only ever fail one way fold straight into
//! [`TranslateError`].

use thiserror::Error;

use crate::intention::IntentionId;
use swiftgen_core::Span;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("pass {pass} failed: {source}")]
    Pass {
        pass: &'static str,
        #[source]
        source: PassError,
    },

    #[error("{0}")]
    Reader(#[from] ReaderError),

    #[error("{0}")]
    Emit(#[from] EmitError),
}

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("file {file:?} has no top-level root node")]
    MissingRoot { file: swiftgen_core::FileId },

    #[error("method at {span} declares {declared} parameters but selector has {in_selector} keyword(s)")]
    SelectorArityMismatch {
        span: Span,
        declared: usize,
        in_selector: usize,
    },
}

#[derive(Debug, Error)]
pub enum PassError {
    #[error("intention {0:?} referenced but not present in the collection")]
    DanglingIntention(IntentionId),

    #[error("duplicate type name {name:?} across files could not be resolved: {reason}")]
    UnresolvedDuplicate { name: String, reason: String },

    #[error("property {property:?} on {owner:?} synthesizes a backing ivar that collides with an existing member")]
    SynthesizeCollision { owner: IntentionId, property: String },
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("intention {0:?} could not be emitted: missing required data for its kind")]
    Incomplete(IntentionId),
}

pub type PassResult<T> = Result<T, PassError>;
pub type ReaderResult<T> = Result<T, ReaderError>;
pub type EmitResult<T> = Result<T, EmitError>;
