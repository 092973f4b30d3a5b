//! File intention payload: the root each translation unit produces.

use swiftgen_core::{IntentionId, Span, Symbol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    Header,
    Implementation,
}

/// `typedef NS_ENUM(...)`/`typedef struct` etc: an alias name bound to the
/// type intention it introduces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typealias {
    pub alias: Symbol,
    pub target: IntentionId,
}

/// A preprocessor directive preserved verbatim as a comment rather than
/// evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessorDirective {
    pub span: Span,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileData {
    pub path: String,
    pub kind: FileKind,
    /// Classes, class extensions, structs and enums, in reader-insertion
    /// order.
    pub types: Vec<IntentionId>,
    pub protocols: Vec<IntentionId>,
    pub globals: Vec<IntentionId>,
    pub global_functions: Vec<IntentionId>,
    pub typealiases: Vec<Typealias>,
    pub preprocessor_directives: Vec<PreprocessorDirective>,
}

impl FileData {
    pub fn new(path: impl Into<String>, kind: FileKind) -> Self {
        Self {
            path: path.into(),
            kind,
            types: Vec::new(),
            protocols: Vec::new(),
            globals: Vec::new(),
            global_functions: Vec::new(),
            typealiases: Vec::new(),
            preprocessor_directives: Vec::new(),
        }
    }

    /// The basename shared between a header and its implementation file, used
    /// by File Grouping to find a match.
    pub fn basename(&self) -> &str {
        let file_name = self.path.rsplit('/').next().unwrap_or(&self.path);
        file_name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(file_name)
    }
}
