//! Collection of diagnostics accumulated across the pipeline.

use swiftgen_core::Span;

use super::message::{DiagnosticMessage, Fix, RelatedInfo};
pub use super::message::Severity;
use super::printer::DiagnosticsPrinter;

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<DiagnosticMessage>,
}

/// Builder for constructing a diagnostic message.
#[must_use = "diagnostic not emitted, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: DiagnosticMessage,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    pub fn error(&mut self, msg: impl Into<String>, span: Span) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::error(span, msg),
        }
    }

    pub fn warning(&mut self, msg: impl Into<String>, span: Span) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: DiagnosticMessage::warning(span, msg),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|d| d.is_error())
    }

    pub fn has_warnings(&self) -> bool {
        self.messages.iter().any(|d| d.is_warning())
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_warning()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticMessage> {
        self.messages.iter()
    }

    pub fn printer<'a>(&'a self) -> DiagnosticsPrinter<'a, 'a> {
        DiagnosticsPrinter::new(self)
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }
}

impl<'a> DiagnosticBuilder<'a> {
    pub fn related_to(mut self, msg: impl Into<String>, span: Span) -> Self {
        self.message.related.push(RelatedInfo::new(span, msg));
        self
    }

    pub fn fix(mut self, description: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.message.fix = Some(Fix::new(replacement, description));
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}

#[cfg(test)]
mod collection_tests {
    use super::*;

    #[test]
    fn unemitted_builder_does_not_record_anything() {
        let mut d = Diagnostics::new();
        let _ = d.error("ignored", Span::new(0, 1));
        assert!(d.is_empty());
    }

    #[test]
    fn emit_records_the_message() {
        let mut d = Diagnostics::new();
        d.error("bad selector", Span::new(0, 3)).emit();
        assert_eq!(d.error_count(), 1);
        assert!(d.has_errors());
        assert!(!d.has_warnings());
    }

    #[test]
    fn extend_merges_two_collections() {
        let mut a = Diagnostics::new();
        a.error("a", Span::new(0, 1)).emit();
        let mut b = Diagnostics::new();
        b.warning("b", Span::new(1, 2)).emit();
        a.extend(b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.error_count(), 1);
        assert_eq!(a.warning_count(), 1);
    }
}
