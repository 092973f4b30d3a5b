//! Source intake: the parallel region that turns a list of input sources
//! into parsed CSTs before the structural reader touches them.
//!
//! Lexing and parsing real Objective-C text is out of scope here — an
//! adapter supplied by the caller does that work. What this module owns is
//! running that adapter over every source with `rayon`'s `par_iter`, the
//! one parallel region besides the body queue's collection phase, and then
//! joining the results back onto the calling thread where the structural
//! reader runs sequentially against the shared `Interner` and
//! `IntentionCollection`.

use swiftgen_core::FileId;

use crate::cst::nodes::Root;
use crate::diagnostics::Diagnostics;
use crate::error::ReaderError;
use crate::intention::file::FileKind;
use crate::reader::NonnullRegions;

/// One input source as the source provider hands it over: a name used for
/// diagnostics and the file's raw text.
#[derive(Debug, Clone)]
pub struct InputSource {
    pub name: String,
    pub text: String,
    pub kind: FileKind,
}

impl InputSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>, kind: FileKind) -> Self {
        Self { name: name.into(), text: text.into(), kind }
    }
}

/// A source-to-IR adapter: parses one source's text into a CST plus its
/// assume-nonnull regions, recording anything it can't make sense of as a
/// diagnostic rather than failing outright. `Send + Sync` so `rayon` can
/// share one adapter across worker threads.
pub trait SourceAdapter: Send + Sync {
    fn parse(&self, source: &InputSource) -> ParsedSource;
}

/// One source's parse result: the tree the structural reader will walk, its
/// nonnull regions, and any diagnostics the adapter collected along the
/// way. `root` is `None` when the adapter could not produce a usable tree
/// at all: that file is skipped while the rest of the intake continues.
pub struct ParsedSource {
    pub root: Option<Root>,
    pub nonnull_regions: NonnullRegions,
    pub diagnostics: Diagnostics,
}

struct ParsedFile {
    index: usize,
    name: String,
    kind: FileKind,
    parsed: ParsedSource,
}

/// Runs `adapter` over every source in `sources` on `rayon`'s work-stealing
/// pool, then returns the results in input order for the caller to feed to
/// [`crate::reader::StructuralReader`] one at a time on the calling thread.
/// File indices are assigned in input order so a `FileId` stays meaningful
/// after this reordering-free join.
pub fn parse_all(sources: &[InputSource], adapter: &dyn SourceAdapter) -> Vec<(FileId, String, FileKind, ParsedSource)> {
    let mut parsed: Vec<ParsedFile> = sources
        .iter()
        .enumerate()
        .map(|(index, source)| ParsedFile {
            index,
            name: source.name.clone(),
            kind: source.kind.clone(),
            parsed: adapter.parse(source),
        })
        .collect();

    parsed.sort_by_key(|f| f.index);
    parsed
        .into_iter()
        .map(|f| (FileId::from_raw(f.index as u32), f.name, f.kind, f.parsed))
        .collect()
}

/// Reports a source whose adapter produced no tree as a reader error
/// without aborting the rest of the intake: that file is skipped, other
/// files continue.
pub fn missing_root_error(file: FileId) -> ReaderError {
    ReaderError::MissingRoot { file }
}

#[cfg(test)]
mod intake_tests {
    use super::*;
    use crate::cst::builder::TreeBuilder;
    use crate::cst::SyntaxKind;

    struct EmptyRootAdapter;

    impl SourceAdapter for EmptyRootAdapter {
        fn parse(&self, _source: &InputSource) -> ParsedSource {
            let mut builder = TreeBuilder::new();
            builder.start_node(SyntaxKind::Root).finish_node();
            let tree = builder.finish();
            ParsedSource {
                root: Root::cast(tree),
                nonnull_regions: NonnullRegions::default(),
                diagnostics: Diagnostics::new(),
            }
        }
    }

    #[test]
    fn parse_all_preserves_input_order_despite_parallel_execution() {
        let sources = vec![
            InputSource::new("A.h", "", FileKind::Header),
            InputSource::new("B.h", "", FileKind::Header),
            InputSource::new("C.h", "", FileKind::Header),
        ];
        let results = parse_all(&sources, &EmptyRootAdapter);
        let names: Vec<&str> = results.iter().map(|(_, name, _, _)| name.as_str()).collect();
        assert_eq!(names, vec!["A.h", "B.h", "C.h"]);
        assert_eq!(results[1].0, FileId::from_raw(1));
    }

    #[test]
    fn every_source_gets_a_parsed_root() {
        let sources = vec![InputSource::new("A.m", "", FileKind::Implementation)];
        let results = parse_all(&sources, &EmptyRootAdapter);
        assert!(results[0].3.root.is_some());
    }
}
