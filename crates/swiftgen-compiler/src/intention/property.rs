//! Property intention payload.

use swiftgen_core::Symbol;

use crate::reader::swift_ast::Block;
use super::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PropertyAttributes {
    pub weak: bool,
    pub assign: bool,
    pub copy: bool,
    pub readonly: bool,
    pub is_class: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyMode {
    /// A plain stored property with no explicit accessor bodies.
    Field,
    /// Computed with only a getter body.
    Getter { body: Block },
    /// Computed with both getter and setter, or fused from `-name`/`-setName:`
    /// methods by Property Merge.
    GetterSetter { getter: Block, setter: Block, setter_param: Symbol },
}

impl PropertyMode {
    pub fn is_field(&self) -> bool {
        matches!(self, PropertyMode::Field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyData {
    pub name: Symbol,
    pub storage: Storage,
    pub attributes: PropertyAttributes,
    pub mode: PropertyMode,
    pub getter_name: Option<Symbol>,
    pub setter_name: Option<Symbol>,
    /// Set by Synthesize Backing Field when a `readonly` property
    /// collapses onto a `@private` backing ivar of the same name: the
    /// property keeps a public getter but emits `private(set)` rather than
    /// a plain `let`.
    pub restricted_set: bool,
}

impl PropertyData {
    pub fn new(name: Symbol, storage: Storage, attributes: PropertyAttributes) -> Self {
        Self {
            name,
            storage,
            attributes,
            mode: PropertyMode::Field,
            getter_name: None,
            setter_name: None,
            restricted_set: false,
        }
    }
}
