//! Token and node kinds for the Objective-C concrete syntax tree.
//!
//! Producing this tree (lexing and parsing real Objective-C source) is an
//! external collaborator's job; what lives here is the *shape* of the tree
//! such a parser would hand back, because the readers in [`crate::reader`]
//! need concrete node handles to walk and the passes need them to cite in
//! diagnostics and history records.
//!
//! Variants are ordered tokens-then-nodes, mirroring the convention this
//! corpus uses for its own query-language syntax tree.

use rowan::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // ---- tokens ----
    Ident,
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    CharLiteral,

    // Objective-C / C keywords and directives the readers branch on.
    KwInterface,
    KwImplementation,
    KwEnd,
    KwProperty,
    KwSynthesize,
    KwDynamic,
    KwProtocol,
    KwOptional,
    KwRequired,
    KwSelector,
    KwPrivate,
    KwProtected,
    KwPackage,
    KwPublic,
    KwReturn,
    KwBreak,
    KwContinue,
    KwIf,
    KwElse,
    KwWhile,
    KwDo,
    KwFor,
    KwIn,
    KwSwitch,
    KwCase,
    KwDefault,
    KwSuper,
    KwSelf,
    KwNil,
    AssumeNonnullBegin,
    AssumeNonnullEnd,
    NonnullKw,
    NullableKw,
    NullUnspecifiedKw,
    NullResettableKw,

    // Punctuation
    ParenOpen,
    ParenClose,
    BraceOpen,
    BraceClose,
    BracketOpen,
    BracketClose,
    AngleOpen,
    AngleClose,
    Colon,
    Semicolon,
    Comma,
    Dot,
    Arrow,
    Star,
    Amp,
    Caret,
    Plus,
    Minus,
    Slash,
    Percent,
    Eq,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AmpAmp,
    PipePipe,
    Bang,
    PlusPlus,
    MinusMinus,
    PlusEq,
    MinusEq,
    Question,
    At,

    // Trivia
    Whitespace,
    Comment,
    Error,

    // ---- nodes ----
    Root,
    InterfaceDecl,
    ImplementationDecl,
    CategoryDecl,
    CategoryImplDecl,
    ProtocolDecl,
    IvarList,
    IvarDecl,
    PropertyDecl,
    PropertyAttrList,
    MethodDecl,
    MethodParam,
    TypedefDecl,
    EnumDecl,
    EnumCase,
    StructDecl,
    GlobalVarDecl,
    SynthesizeDecl,
    DynamicDecl,
    TypeRef,
    NullabilitySpec,
    ProtocolRefList,

    CompoundStmt,
    IfStmt,
    WhileStmt,
    DoWhileStmt,
    ForStmt,
    ForInStmt,
    SwitchStmt,
    CaseLabel,
    ReturnStmt,
    BreakStmt,
    ContinueStmt,
    ExprStmt,
    LocalVarDecl,

    MessageExpr,
    MessageKeywordArg,
    SelectorExpr,
    TernaryExpr,
    BinaryExpr,
    UnaryExpr,
    PostfixExpr,
    CastExpr,
    BlockExpr,
    BlockParam,
    ParenExpr,
    ArrayLiteralExpr,
    DictLiteralExpr,
    IdentExpr,
    LiteralExpr,
    UnknownNode,

    #[doc(hidden)]
    __Last,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Comment)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Zero-sized marker tagging Rowan's generic tree types with our kind enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjcLang {}

impl Language for ObjcLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __Last as u16);
        // SAFETY: bounds-checked above, and SyntaxKind is repr(u16).
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<ObjcLang>;
pub type SyntaxToken = rowan::SyntaxToken<ObjcLang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;
