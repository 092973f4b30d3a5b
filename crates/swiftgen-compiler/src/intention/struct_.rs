//! Struct intention payload.

use swiftgen_core::{IntentionId, Symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructData {
    pub type_name: Symbol,
    pub ivars: Vec<IntentionId>,
}

impl StructData {
    pub fn new(type_name: Symbol) -> Self {
        Self {
            type_name,
            ivars: Vec::new(),
        }
    }
}
