//! Swift-shaped expression and statement trees.
//!
//! The expression and statement readers lower Objective-C CST nodes directly
//! into these trees; nothing downstream ever walks the original CST again.
//! [`crate::body_queue`]'s expression passes rewrite nodes in place.

use swiftgen_core::{Span, Symbol};

use crate::types::SwiftType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub span: Span,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Expr(Expr),
    LocalVar {
        span: Span,
        name: Symbol,
        declared_type: Option<SwiftType>,
        init: Option<Expr>,
    },
    If {
        span: Span,
        cond: Expr,
        then_branch: Block,
        else_branch: Option<Block>,
    },
    While {
        span: Span,
        cond: Expr,
        body: Block,
    },
    DoWhile {
        span: Span,
        cond: Expr,
        body: Block,
    },
    For {
        span: Span,
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        step: Option<Expr>,
        body: Block,
    },
    ForIn {
        span: Span,
        binding: Symbol,
        iterable: Expr,
        body: Block,
    },
    Switch {
        span: Span,
        scrutinee: Expr,
        cases: Vec<SwitchCase>,
    },
    Return {
        span: Span,
        value: Option<Expr>,
    },
    Break {
        span: Span,
    },
    Continue {
        span: Span,
    },
    Compound(Block),
    /// A CST branch the readers could not lower: the source text is
    /// preserved verbatim so a human can review it.
    Unknown {
        span: Span,
        source_text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchCase {
    pub span: Span,
    /// `None` marks the `default:` case.
    pub labels: Vec<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Ident {
        span: Span,
        name: Symbol,
        /// Filled in by the type-resolution expression pass; `None` until then.
        resolved_type: Option<SwiftType>,
    },
    IntLiteral {
        span: Span,
        text: String,
        base: NumericBase,
    },
    FloatLiteral {
        span: Span,
        text: String,
    },
    StringLiteral {
        span: Span,
        value: String,
    },
    BoolLiteral {
        span: Span,
        value: bool,
    },
    NilLiteral {
        span: Span,
    },
    SelfExpr {
        span: Span,
    },
    SuperExpr {
        span: Span,
    },
    /// `receiver.keyword(args...)`, lowered from `[receiver keyword:arg ...]`.
    Call {
        span: Span,
        receiver: Box<Expr>,
        method_name: Symbol,
        args: Vec<CallArg>,
    },
    MemberAccess {
        span: Span,
        receiver: Box<Expr>,
        member: Symbol,
        /// Inserted by the nil-coalescing/if-let expression passes; starts `false`.
        optional_chained: bool,
    },
    Binary {
        span: Span,
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        span: Span,
        op: UnaryOp,
        operand: Box<Expr>,
    },
    /// A compound assignment introduced either directly or by `++`/`--`
    /// lowering.
    CompoundAssign {
        span: Span,
        op: BinaryOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Assign {
        span: Span,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// `a ?? c`, either written directly or produced from Objective-C's
    /// `a ?: c` GCC-extension ternary.
    NilCoalescing {
        span: Span,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Ternary {
        span: Span,
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    /// `expr as? T` or `T(expr)`, resolved by the cast-insertion pass based
    /// on whether `T` is a reference or numeric value type.
    Cast {
        span: Span,
        expr: Box<Expr>,
        target_type: SwiftType,
        style: CastStyle,
    },
    Paren(Box<Expr>),
    ArrayLiteral {
        span: Span,
        elements: Vec<Expr>,
    },
    DictLiteral {
        span: Span,
        entries: Vec<(Expr, Expr)>,
    },
    /// `Selector("x:")`, lowered from `@selector(x:)`.
    SelectorLiteral {
        span: Span,
        text: String,
    },
    Closure {
        span: Span,
        params: Vec<(Symbol, Option<SwiftType>)>,
        return_type: Option<SwiftType>,
        body: Block,
    },
    Unknown {
        span: Span,
        source_text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallArg {
    pub label: Option<Symbol>,
    pub value: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericBase {
    Decimal,
    Octal,
    Hex,
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    ShiftLeft,
    ShiftRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    BitNot,
    Deref,
    AddressOf,
    /// Lowered from prefix/postfix `++`; the expression reader rewrites the
    /// surrounding statement into `CompoundAssign` and this variant should
    /// not survive past that rewrite.
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastStyle {
    /// `expr as? T` — `T` is a reference type.
    Conditional,
    /// `T(expr)` — `T` is a numeric value type.
    ValueInit,
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Ident { span, .. }
            | Expr::IntLiteral { span, .. }
            | Expr::FloatLiteral { span, .. }
            | Expr::StringLiteral { span, .. }
            | Expr::BoolLiteral { span, .. }
            | Expr::NilLiteral { span }
            | Expr::SelfExpr { span }
            | Expr::SuperExpr { span }
            | Expr::Call { span, .. }
            | Expr::MemberAccess { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Unary { span, .. }
            | Expr::CompoundAssign { span, .. }
            | Expr::Assign { span, .. }
            | Expr::NilCoalescing { span, .. }
            | Expr::Ternary { span, .. }
            | Expr::Cast { span, .. }
            | Expr::ArrayLiteral { span, .. }
            | Expr::DictLiteral { span, .. }
            | Expr::SelectorLiteral { span, .. }
            | Expr::Closure { span, .. }
            | Expr::Unknown { span, .. } => *span,
            Expr::Paren(inner) => inner.span(),
        }
    }
}
