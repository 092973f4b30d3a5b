//! Instance variable intention payload.

use swiftgen_core::Symbol;

use super::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessLevel {
    #[default]
    Private,
    Protected,
    Package,
    Public,
}

impl AccessLevel {
    pub fn swift_keyword(self) -> &'static str {
        match self {
            AccessLevel::Private => "private",
            AccessLevel::Protected => "internal",
            AccessLevel::Package => "internal",
            AccessLevel::Public => "public",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceVariableData {
    pub name: Symbol,
    pub storage: Storage,
    pub access: AccessLevel,
}
