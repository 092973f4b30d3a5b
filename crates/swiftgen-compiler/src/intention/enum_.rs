//! Enum intention payload. Cases are plain data, not owned intentions —
//! nothing in the pipeline needs to hold a stable handle to an individual case.

use swiftgen_core::Symbol;

use crate::types::SwiftType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumCase {
    pub name: Symbol,
    pub raw_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumData {
    pub type_name: Symbol,
    pub raw_type: SwiftType,
    pub cases: Vec<EnumCase>,
}

impl EnumData {
    pub fn new(type_name: Symbol, raw_type: SwiftType) -> Self {
        Self {
            type_name,
            raw_type,
            cases: Vec::new(),
        }
    }
}
