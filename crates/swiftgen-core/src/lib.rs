//! Core data structures shared by the swiftgen translation pipeline:
//! - `interner` - string interning for selector labels and type names
//! - `ids` - lightweight identity handles for intention-graph nodes
//! - `span` - byte-range source locations, independent of any one CST library

pub mod ids;
pub mod interner;
pub mod span;

pub use ids::{FileId, IntentionId, IntentionKind};
pub use interner::{Interner, Symbol};
pub use span::Span;
