//! Class and class-extension (category) intention payloads.

use swiftgen_core::{IntentionId, Symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassData {
    pub type_name: Symbol,
    pub superclass_name: Option<Symbol>,
    pub ivars: Vec<IntentionId>,
    pub properties: Vec<IntentionId>,
    pub methods: Vec<IntentionId>,
    pub initializers: Vec<IntentionId>,
    pub protocol_conformances: Vec<Symbol>,
    /// `@synthesize property = backing;` directives observed by the reader
    /// (`backing == property` when the directive omits the ivar name),
    /// consumed by `crate::passes::synthesize_backing`.
    pub synthesize_pairs: Vec<(Symbol, Symbol)>,
}

impl ClassData {
    pub fn new(type_name: Symbol, superclass_name: Option<Symbol>) -> Self {
        Self {
            type_name,
            superclass_name,
            ivars: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            initializers: Vec::new(),
            protocol_conformances: Vec::new(),
            synthesize_pairs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassExtensionData {
    pub type_name: Symbol,
    pub category_name: Option<Symbol>,
    pub ivars: Vec<IntentionId>,
    pub properties: Vec<IntentionId>,
    pub methods: Vec<IntentionId>,
    pub initializers: Vec<IntentionId>,
    pub protocol_conformances: Vec<Symbol>,
}

impl ClassExtensionData {
    pub fn new(type_name: Symbol, category_name: Option<Symbol>) -> Self {
        Self {
            type_name,
            category_name,
            ivars: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            initializers: Vec::new(),
            protocol_conformances: Vec::new(),
        }
    }
}
