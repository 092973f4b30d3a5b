//! Expression reader: lowers Objective-C expression CST nodes into
//! [`crate::reader::swift_ast::Expr`].

use swiftgen_core::{Interner, Span, Symbol};

use crate::cst::nodes::{self, MemberHost as _};
use crate::cst::{SyntaxKind, SyntaxNode};
use crate::types::{MappingContext, Nullability, SwiftType, TypeMapper};

use super::swift_ast::{BinaryOp, CallArg, CastStyle, Expr, NumericBase, UnaryOp};

pub struct ExprReader<'a> {
    interner: &'a mut Interner,
}

impl<'a> ExprReader<'a> {
    pub fn new(interner: &'a mut Interner) -> Self {
        Self { interner }
    }

    pub fn lower(&mut self, node: &SyntaxNode) -> Expr {
        let span = node_span(node);
        match node.kind() {
            SyntaxKind::ParenExpr => {
                let inner = node.children().next();
                match inner {
                    Some(inner) => Expr::Paren(Box::new(self.lower(&inner))),
                    None => unknown(node, span),
                }
            }
            SyntaxKind::IdentExpr => self.lower_ident(node, span),
            SyntaxKind::LiteralExpr => self.lower_literal(node, span),
            SyntaxKind::MessageExpr => self.lower_message(node, span),
            SyntaxKind::SelectorExpr => self.lower_selector_literal(node, span),
            SyntaxKind::TernaryExpr => self.lower_ternary(node, span),
            SyntaxKind::BinaryExpr => self.lower_binary(node, span),
            SyntaxKind::UnaryExpr => self.lower_unary(node, span),
            SyntaxKind::PostfixExpr => self.lower_postfix(node, span),
            SyntaxKind::CastExpr => self.lower_cast(node, span),
            SyntaxKind::BlockExpr => self.lower_block_literal(node, span),
            SyntaxKind::ArrayLiteralExpr => Expr::ArrayLiteral {
                span,
                elements: node.children().map(|c| self.lower(&c)).collect(),
            },
            SyntaxKind::DictLiteralExpr => {
                let mut entries = Vec::new();
                let mut children = node.children();
                while let (Some(k), Some(v)) = (children.next(), children.next()) {
                    entries.push((self.lower(&k), self.lower(&v)));
                }
                Expr::DictLiteral { span, entries }
            }
            _ => unknown(node, span),
        }
    }

    fn lower_ident(&mut self, node: &SyntaxNode, span: Span) -> Expr {
        let token = node
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::Ident);
        match token {
            Some(t) => match t.text() {
                "self" => Expr::SelfExpr { span },
                "super" => Expr::SuperExpr { span },
                "nil" | "Nil" | "NULL" => Expr::NilLiteral { span },
                text => Expr::Ident {
                    span,
                    name: self.interner.intern(text),
                    resolved_type: None,
                },
            },
            None => unknown(node, span),
        }
    }

    fn lower_literal(&mut self, node: &SyntaxNode, span: Span) -> Expr {
        let Some(token) = node.children_with_tokens().filter_map(|e| e.into_token()).next() else {
            return unknown(node, span);
        };
        match token.kind() {
            SyntaxKind::IntLiteral => {
                let (text, base) = strip_numeric_suffix(token.text());
                Expr::IntLiteral { span, text, base }
            }
            SyntaxKind::FloatLiteral => {
                let (text, _) = strip_numeric_suffix(token.text());
                Expr::FloatLiteral { span, text }
            }
            SyntaxKind::StringLiteral => Expr::StringLiteral {
                span,
                value: unquote(token.text()),
            },
            SyntaxKind::KwNil => Expr::NilLiteral { span },
            _ => unknown(node, span),
        }
    }

    /// `[receiver keyword:arg ...]` → `receiver.keyword(...)`: the
    /// first keyword becomes the method name, subsequent keywords become
    /// labeled arguments, and extra comma-separated expressions inside one
    /// keyword arg become unlabeled positional arguments.
    fn lower_message(&mut self, node: &SyntaxNode, span: Span) -> Expr {
        let Some(receiver_node) = node.children().next() else {
            return unknown(node, span);
        };
        let receiver = Box::new(self.lower(&receiver_node));

        let keyword_args: Vec<nodes::MessageKeywordArg> = node
            .children()
            .filter_map(nodes::MessageKeywordArg::cast)
            .collect();

        if keyword_args.is_empty() {
            // Unary message: second token child is the selector identifier.
            let selector_ident = node
                .children_with_tokens()
                .filter_map(|e| e.into_token())
                .filter(|t| t.kind() == SyntaxKind::Ident)
                .nth(1);
            let Some(selector_ident) = selector_ident else {
                return unknown(node, span);
            };
            return Expr::Call {
                span,
                receiver,
                method_name: self.interner.intern(selector_ident.text()),
                args: Vec::new(),
            };
        }

        let mut method_name = None;
        let mut args = Vec::new();
        for (i, kw_arg) in keyword_args.iter().enumerate() {
            let label_token = kw_arg
                .syntax()
                .children_with_tokens()
                .filter_map(|e| e.into_token())
                .find(|t| t.kind() == SyntaxKind::Ident);
            let label = label_token.map(|t| self.interner.intern(t.text()));
            let mut exprs = kw_arg.syntax().children();
            let Some(first_expr) = exprs.next() else { continue };
            if i == 0 {
                method_name = label;
                args.push(CallArg {
                    label: None,
                    value: self.lower(&first_expr),
                });
            } else {
                args.push(CallArg {
                    label,
                    value: self.lower(&first_expr),
                });
            }
            // Extra comma-separated expressions become unlabeled positional args.
            for extra in exprs {
                args.push(CallArg {
                    label: None,
                    value: self.lower(&extra),
                });
            }
        }

        let Some(method_name) = method_name else {
            return unknown(node, span);
        };
        Expr::Call {
            span,
            receiver,
            method_name,
            args,
        }
    }

    fn lower_selector_literal(&mut self, node: &SyntaxNode, span: Span) -> Expr {
        let text = node
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::Ident || t.kind() == SyntaxKind::StringLiteral)
            .map(|t| t.text().to_string())
            .unwrap_or_default();
        Expr::SelectorLiteral { span, text }
    }

    /// `a ? b : c`; when the "true" arm is missing (Objective-C's GCC `?:`
    /// extension), this collapses to `a ?? c`.
    fn lower_ternary(&mut self, node: &SyntaxNode, span: Span) -> Expr {
        let children: Vec<SyntaxNode> = node.children().collect();
        match children.as_slice() {
            [cond, else_branch] => Expr::NilCoalescing {
                span,
                lhs: Box::new(self.lower(cond)),
                rhs: Box::new(self.lower(else_branch)),
            },
            [cond, then_branch, else_branch] => Expr::Ternary {
                span,
                cond: Box::new(self.lower(cond)),
                then_branch: Box::new(self.lower(then_branch)),
                else_branch: Box::new(self.lower(else_branch)),
            },
            _ => unknown(node, span),
        }
    }

    fn lower_binary(&mut self, node: &SyntaxNode, span: Span) -> Expr {
        let children: Vec<SyntaxNode> = node.children().collect();
        let [lhs, rhs] = match children.as_slice() {
            [a, b] => [a.clone(), b.clone()],
            _ => return unknown(node, span),
        };
        let Some(op) = binary_op_from_tokens(node) else {
            return unknown(node, span);
        };
        let lhs = Box::new(self.lower(&lhs));
        let rhs = Box::new(self.lower(&rhs));
        if matches!(node_assign_kind(node), Some(AssignKind::Compound)) {
            Expr::CompoundAssign { span, op, target: lhs, value: rhs }
        } else if matches!(node_assign_kind(node), Some(AssignKind::Plain)) {
            Expr::Assign { span, target: lhs, value: rhs }
        } else {
            Expr::Binary { span, op, lhs, rhs }
        }
    }

    /// `++`/`--` prefix and postfix map to `+= 1` / `-= 1`.
    fn lower_unary(&mut self, node: &SyntaxNode, span: Span) -> Expr {
        let Some(operand_node) = node.children().next() else {
            return unknown(node, span);
        };
        let operand = self.lower(&operand_node);
        let Some(op_token) = node.children_with_tokens().filter_map(|e| e.into_token()).next() else {
            return unknown(node, span);
        };
        match op_token.kind() {
            SyntaxKind::PlusPlus => increment_to_compound_assign(span, operand, true),
            SyntaxKind::MinusMinus => decrement_to_compound_assign(span, operand, true),
            SyntaxKind::Minus => Expr::Unary { span, op: UnaryOp::Neg, operand: Box::new(operand) },
            SyntaxKind::Bang => Expr::Unary { span, op: UnaryOp::Not, operand: Box::new(operand) },
            SyntaxKind::Caret => Expr::Unary { span, op: UnaryOp::BitNot, operand: Box::new(operand) },
            SyntaxKind::Star => Expr::Unary { span, op: UnaryOp::Deref, operand: Box::new(operand) },
            SyntaxKind::Amp => Expr::Unary { span, op: UnaryOp::AddressOf, operand: Box::new(operand) },
            _ => unknown(node, span),
        }
    }

    fn lower_postfix(&mut self, node: &SyntaxNode, span: Span) -> Expr {
        let Some(operand_node) = node.children().next() else {
            return unknown(node, span);
        };
        let operand = self.lower(&operand_node);
        let Some(op_token) = node.children_with_tokens().filter_map(|e| e.into_token()).last() else {
            return unknown(node, span);
        };
        match op_token.kind() {
            SyntaxKind::PlusPlus => increment_to_compound_assign(span, operand, false),
            SyntaxKind::MinusMinus => decrement_to_compound_assign(span, operand, false),
            SyntaxKind::Dot => {
                // Member access: `.Dot` followed by an Ident is handled as a node
                // in a real grammar; conservatively treat malformed shapes as unknown.
                unknown(node, span)
            }
            _ => unknown(node, span),
        }
    }

    /// `(T)expr` → `expr as? T` when `T` is a reference type, `T(expr)` when
    /// `T` is a numeric value type.
    fn lower_cast(&mut self, node: &SyntaxNode, span: Span) -> Expr {
        let Some(type_ref) = node.children().find_map(nodes::TypeRef::cast) else {
            return unknown(node, span);
        };
        let Some(operand_node) = node.children().find(|c| nodes::TypeRef::cast(c.clone()).is_none()) else {
            return unknown(node, span);
        };
        let operand = self.lower(&operand_node);

        let objc_ty = objc_type_from_type_ref(&type_ref, self.interner);
        let mut mapper = TypeMapper::new(self.interner);
        let ctx = MappingContext::new(true, Nullability::Unspecified);
        let target_type = mapper.map(&objc_ty, ctx);

        let style = if is_numeric_value_type(&target_type, self.interner) {
            CastStyle::ValueInit
        } else {
            CastStyle::Conditional
        };
        Expr::Cast {
            span,
            expr: Box::new(operand),
            target_type,
            style,
        }
    }

    fn lower_block_literal(&mut self, node: &SyntaxNode, span: Span) -> Expr {
        use crate::reader::stmt::StmtReader;

        let params: Vec<(Symbol, Option<SwiftType>)> = node
            .children()
            .filter(|c| c.kind() == SyntaxKind::BlockParam)
            .map(|p| {
                let name = p
                    .children_with_tokens()
                    .filter_map(|e| e.into_token())
                    .find(|t| t.kind() == SyntaxKind::Ident)
                    .map(|t| self.interner.intern(t.text()))
                    .unwrap_or_else(|| self.interner.intern("_"));
                let return_type = p.children().find_map(nodes::TypeRef::cast).map(|tr| {
                    let objc_ty = objc_type_from_type_ref(&tr, self.interner);
                    let mut mapper = TypeMapper::new(self.interner);
                    mapper.map(&objc_ty, MappingContext::new(true, Nullability::Unspecified))
                });
                (name, return_type)
            })
            .collect();

        let return_type = node.children().find_map(nodes::TypeRef::cast).map(|tr| {
            let objc_ty = objc_type_from_type_ref(&tr, self.interner);
            let mut mapper = TypeMapper::new(self.interner);
            mapper.map(&objc_ty, MappingContext::new(true, Nullability::Unspecified))
        });

        let body_node = node.children().find(|c| c.kind() == SyntaxKind::CompoundStmt);
        let body = match body_node.and_then(nodes::CompoundStmt::cast) {
            Some(compound) => {
                let mut stmt_reader = StmtReader::new(self.interner);
                stmt_reader.lower_compound(&compound)
            }
            None => super::swift_ast::Block { span, stmts: vec![] },
        };

        Expr::Closure {
            span,
            params,
            return_type,
            body,
        }
    }
}

enum AssignKind {
    Plain,
    Compound,
}

fn node_assign_kind(node: &SyntaxNode) -> Option<AssignKind> {
    let op = node.children_with_tokens().filter_map(|e| e.into_token()).find(|t| {
        matches!(
            t.kind(),
            SyntaxKind::Eq | SyntaxKind::PlusEq | SyntaxKind::MinusEq
        )
    })?;
    match op.kind() {
        SyntaxKind::Eq => Some(AssignKind::Plain),
        SyntaxKind::PlusEq | SyntaxKind::MinusEq => Some(AssignKind::Compound),
        _ => None,
    }
}

fn binary_op_from_tokens(node: &SyntaxNode) -> Option<BinaryOp> {
    let tokens: Vec<_> = node.children_with_tokens().filter_map(|e| e.into_token()).collect();

    // Shift operators arrive as paired `<`/`>` tokens since the grammar
    // produces angle brackets individually rather than as `<<`/`>>`.
    let angle_kinds: Vec<SyntaxKind> = tokens
        .iter()
        .map(|t| t.kind())
        .filter(|k| matches!(k, SyntaxKind::AngleOpen | SyntaxKind::AngleClose))
        .collect();
    if angle_kinds == [SyntaxKind::AngleOpen, SyntaxKind::AngleOpen] {
        return Some(BinaryOp::ShiftLeft);
    }
    if angle_kinds == [SyntaxKind::AngleClose, SyntaxKind::AngleClose] {
        return Some(BinaryOp::ShiftRight);
    }

    for t in &tokens {
        let op = match t.kind() {
            SyntaxKind::Plus => BinaryOp::Add,
            SyntaxKind::Minus => BinaryOp::Sub,
            SyntaxKind::Star => BinaryOp::Mul,
            SyntaxKind::Slash => BinaryOp::Div,
            SyntaxKind::Percent => BinaryOp::Mod,
            SyntaxKind::EqEq => BinaryOp::Eq,
            SyntaxKind::NotEq => BinaryOp::NotEq,
            SyntaxKind::Lt => BinaryOp::Lt,
            SyntaxKind::LtEq => BinaryOp::LtEq,
            SyntaxKind::Gt => BinaryOp::Gt,
            SyntaxKind::GtEq => BinaryOp::GtEq,
            SyntaxKind::AmpAmp => BinaryOp::And,
            SyntaxKind::PipePipe => BinaryOp::Or,
            SyntaxKind::Amp => BinaryOp::BitAnd,
            SyntaxKind::Caret => BinaryOp::BitXor,
            _ => continue,
        };
        return Some(op);
    }
    None
}

fn increment_to_compound_assign(span: Span, operand: Expr, _prefix: bool) -> Expr {
    Expr::CompoundAssign {
        span,
        op: BinaryOp::Add,
        target: Box::new(operand),
        value: Box::new(Expr::IntLiteral {
            span,
            text: "1".to_string(),
            base: NumericBase::Decimal,
        }),
    }
}

fn decrement_to_compound_assign(span: Span, operand: Expr, _prefix: bool) -> Expr {
    Expr::CompoundAssign {
        span,
        op: BinaryOp::Sub,
        target: Box::new(operand),
        value: Box::new(Expr::IntLiteral {
            span,
            text: "1".to_string(),
            base: NumericBase::Decimal,
        }),
    }
}

/// Strips `u/U/l/L/f/F/d/D` numeric suffixes and tags the literal's base
///.
fn strip_numeric_suffix(text: &str) -> (String, NumericBase) {
    let base = if text.starts_with("0x") || text.starts_with("0X") {
        NumericBase::Hex
    } else if text.starts_with("0b") || text.starts_with("0B") {
        NumericBase::Binary
    } else if text.starts_with('0') && text.len() > 1 && text.chars().nth(1).is_some_and(|c| c.is_ascii_digit()) {
        NumericBase::Octal
    } else {
        NumericBase::Decimal
    };
    let stripped = text.trim_end_matches(['u', 'U', 'l', 'L', 'f', 'F', 'd', 'D']);
    (stripped.to_string(), base)
}

fn unquote(text: &str) -> String {
    text.trim_matches('"').to_string()
}

fn is_numeric_value_type(ty: &SwiftType, interner: &Interner) -> bool {
    match ty.unwrapped() {
        SwiftType::Nominal { name, .. } => matches!(
            interner.resolve(*name),
            "Int" | "Int8" | "Int16" | "Int32" | "Int64"
                | "UInt" | "UInt8" | "UInt16" | "UInt32" | "UInt64"
                | "Float" | "Double" | "CGFloat" | "Bool"
        ),
        _ => false,
    }
}

fn unknown(node: &SyntaxNode, span: Span) -> Expr {
    Expr::Unknown {
        span,
        source_text: node.text().to_string(),
    }
}

fn node_span(node: &SyntaxNode) -> Span {
    let range = node.text_range();
    Span::new(u32::from(range.start()), u32::from(range.end()))
}

fn objc_type_from_type_ref(type_ref: &nodes::TypeRef, interner: &mut Interner) -> crate::types::ObjcType {
    super::structural::objc_type_from_type_ref(type_ref, interner)
}
