//! Protocol intention payload.

use swiftgen_core::{IntentionId, Symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolData {
    pub type_name: Symbol,
    pub properties: Vec<IntentionId>,
    pub methods: Vec<IntentionId>,
}

impl ProtocolData {
    pub fn new(type_name: Symbol) -> Self {
        Self {
            type_name,
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }
}
