//! Global variable payload. Global functions live in [`super::method`]
//! since they share the `Signature` shape with methods and initializers.

use swiftgen_core::Symbol;

use crate::reader::swift_ast::Expr;
use super::storage::Storage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalVariableData {
    pub name: Symbol,
    pub storage: Storage,
    pub initializer: Option<Expr>,
}
