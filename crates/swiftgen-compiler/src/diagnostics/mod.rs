//! Diagnostics infrastructure shared by readers, passes and the body queue.

mod collection;
mod message;
mod printer;

pub use collection::{DiagnosticBuilder, Diagnostics};
pub use message::Severity;
pub use printer::DiagnosticsPrinter;
