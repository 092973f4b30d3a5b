//! The structural reader's context stack.
//!
//! An explicit stack rather than implicit closures over shared mutable
//! state: each frame is pushed on entering a construct and popped on exit,
//! so re-entrant traversal (a category nested in... nothing, here, but the
//! same shape a nested block would need) never leaks state across siblings.

use swiftgen_core::{FileId, IntentionId};

use crate::intention::ivar::AccessLevel;

#[derive(Debug, Clone, Copy)]
pub struct ReaderContext {
    pub file: FileId,
    pub file_intention: IntentionId,
    pub in_nonnull_region: bool,
    pub current_type: Option<IntentionId>,
    pub ivar_access_level: AccessLevel,
}

impl ReaderContext {
    pub fn new(file: FileId, file_intention: IntentionId) -> Self {
        Self {
            file,
            file_intention,
            in_nonnull_region: false,
            current_type: None,
            ivar_access_level: AccessLevel::Private,
        }
    }

    pub fn enter_type(self, type_intention: IntentionId) -> Self {
        Self {
            current_type: Some(type_intention),
            ivar_access_level: AccessLevel::Private,
            ..self
        }
    }

    pub fn with_nonnull_region(self, in_region: bool) -> Self {
        Self {
            in_nonnull_region: in_region,
            ..self
        }
    }

    pub fn with_ivar_access(self, level: AccessLevel) -> Self {
        Self {
            ivar_access_level: level,
            ..self
        }
    }
}

/// Byte ranges bracketing each `NS_ASSUME_NONNULL_BEGIN/END` region, as
/// delivered by the source-to-IR adapter. The reader
/// consults this to decide `in_nonnull_region` when entering each node.
#[derive(Debug, Clone, Default)]
pub struct NonnullRegions {
    ranges: Vec<(u32, u32)>,
}

impl NonnullRegions {
    pub fn new(ranges: Vec<(u32, u32)>) -> Self {
        Self { ranges }
    }

    pub fn contains(&self, offset: u32) -> bool {
        self.ranges.iter().any(|(start, end)| offset >= *start && offset < *end)
    }
}
