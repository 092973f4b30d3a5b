//! `Translator`: a single entry point that owns the intention graph, the
//! diagnostics sink and the translation options, and drives the pipeline's
//! four stages in the order a caller must call them: [`Translator::add_sources`],
//! [`Translator::run_passes`], [`Translator::drain_body_queue`],
//! [`Translator::emit_all`].

use tracing::instrument;

use swiftgen_core::{FileId, Interner};

use crate::config::TranslationOptions;
use crate::diagnostics::Diagnostics;
use crate::error::{ReaderError, TranslateError};
use crate::intake::{self, InputSource, SourceAdapter};
use crate::intention::file::FileKind;
use crate::intention::IntentionCollection;
use crate::passes::{self, UsageIndex};
use crate::reader::StructuralReader;
use crate::{body_queue, emit};

/// Owns every piece of mutable pipeline state. `interner` is separate from
/// `collection` (rather than folded into it) because the expression passes
/// need to read symbols after the structural graph is considered frozen.
pub struct Translator {
    interner: Interner,
    collection: IntentionCollection,
    diagnostics: Diagnostics,
    options: TranslationOptions,
    usage: Option<UsageIndex>,
}

impl Translator {
    pub fn new(options: TranslationOptions) -> Self {
        Self {
            interner: Interner::new(),
            collection: IntentionCollection::new(),
            diagnostics: Diagnostics::new(),
            options,
            usage: None,
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn options(&self) -> &TranslationOptions {
        &self.options
    }

    /// Stage 1: parses every source in parallel and builds its intentions
    /// sequentially on the calling thread, since the structural reader
    /// needs exclusive access to the shared `Interner` and
    /// `IntentionCollection`.
    #[instrument(skip_all)]
    pub fn add_sources(&mut self, sources: &[InputSource], adapter: &dyn SourceAdapter) {
        for (file_id, name, kind, parsed) in intake::parse_all(sources, adapter) {
            self.diagnostics.extend(parsed.diagnostics);
            self.add_parsed_file(file_id, &name, kind, parsed.root, parsed.nonnull_regions);
        }
    }

    fn add_parsed_file(
        &mut self,
        file_id: FileId,
        name: &str,
        kind: FileKind,
        root: Option<crate::cst::nodes::Root>,
        nonnull_regions: crate::reader::NonnullRegions,
    ) {
        let Some(root) = root else {
            let err: TranslateError = ReaderError::MissingRoot { file: file_id }.into();
            self.diagnostics.error(err.to_string(), swiftgen_core::Span::new(0, 0)).emit();
            return;
        };
        let mut reader = StructuralReader::new(&mut self.interner, &mut self.collection, nonnull_regions);
        reader.read_file(file_id, name, kind, &root);
    }

    /// Stage 2: runs the structural passes in their fixed order and
    /// stashes the usage index the body queue needs next.
    #[instrument(skip_all)]
    pub fn run_passes(&mut self) {
        self.usage = Some(passes::run_all(&mut self.collection, &mut self.interner));
    }

    /// Stage 3: collects every body-carrying intention, runs the
    /// expression-rewriting passes and writes the results back.
    /// Panics if called before [`Translator::run_passes`] — the usage index
    /// it depends on does not exist yet.
    #[instrument(skip_all)]
    pub fn drain_body_queue(&mut self) {
        let usage = self.usage.as_ref().expect("run_passes must run before drain_body_queue");
        body_queue::run(&mut self.collection, &self.interner, usage);
    }

    /// Stage 4: renders the finished intention graph to Swift source text.
    /// Emit failures become diagnostics rather than aborting the whole
    /// translation — a caller still gets everything else that did render.
    #[instrument(skip_all)]
    pub fn emit_all(&mut self) -> String {
        match emit::emit_all(&self.collection, &self.interner, &self.options) {
            Ok(text) => text,
            Err(err) => {
                let translate_err: TranslateError = err.into();
                self.diagnostics.error(translate_err.to_string(), swiftgen_core::Span::new(0, 0)).emit();
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod translator_tests {
    use super::*;
    use crate::cst::builder::TreeBuilder;
    use crate::cst::nodes::Root;
    use crate::cst::SyntaxKind;
    use crate::intake::ParsedSource;

    struct FixtureAdapter(SyntaxKind);

    impl SourceAdapter for FixtureAdapter {
        fn parse(&self, _source: &InputSource) -> ParsedSource {
            let mut builder = TreeBuilder::new();
            builder.start_node(SyntaxKind::Root);
            builder.start_node(self.0);
            builder.token(SyntaxKind::Ident, "C");
            builder.finish_node();
            builder.finish_node();
            ParsedSource {
                root: Root::cast(builder.finish()),
                nonnull_regions: crate::reader::NonnullRegions::default(),
                diagnostics: Diagnostics::new(),
            }
        }
    }

    #[test]
    fn missing_root_is_recorded_as_a_diagnostic_and_does_not_panic() {
        struct NoRootAdapter;
        impl SourceAdapter for NoRootAdapter {
            fn parse(&self, _source: &InputSource) -> ParsedSource {
                ParsedSource {
                    root: None,
                    nonnull_regions: crate::reader::NonnullRegions::default(),
                    diagnostics: Diagnostics::new(),
                }
            }
        }

        let mut translator = Translator::new(TranslationOptions::default());
        let sources = vec![InputSource::new("C.h", "", FileKind::Header)];
        translator.add_sources(&sources, &NoRootAdapter);
        assert!(!translator.diagnostics().is_empty());
    }

    #[test]
    fn full_pipeline_runs_stages_in_order_without_panicking() {
        let mut translator = Translator::new(TranslationOptions::default());
        let sources = vec![InputSource::new("C.h", "@interface C @end", FileKind::Header)];
        translator.add_sources(&sources, &FixtureAdapter(SyntaxKind::InterfaceDecl));
        translator.run_passes();
        translator.drain_body_queue();
        let text = translator.emit_all();
        assert!(text.contains("class C"));
    }
}
