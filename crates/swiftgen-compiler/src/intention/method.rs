//! Method, global function and initializer payloads — all share one
//! `Signature` shape.

use swiftgen_core::Symbol;

use crate::reader::swift_ast::Block;
use crate::selector::Selector;
use crate::types::SwiftType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: Symbol,
    pub ty: SwiftType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub selector: Selector,
    pub params: Vec<Param>,
    pub return_type: SwiftType,
}

impl Signature {
    pub fn new(selector: Selector, params: Vec<Param>, return_type: SwiftType) -> Self {
        Self {
            selector,
            params,
            return_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodData {
    pub signature: Signature,
    pub body: Option<Block>,
    pub is_class_method: bool,
    /// Set by Property Merge when this selector is a protocol `@optional` member.
    pub is_optional: bool,
    pub is_override: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitializerData {
    pub signature: Signature,
    pub body: Option<Block>,
    pub is_override: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalFunctionData {
    pub signature: Signature,
    pub body: Option<Block>,
}
