//! Nil-coalescing insertion: rewrites `a.b.c` into
//! `a?.b?.c` along any link whose receiver resolved optional, then wraps the
//! whole chain in `?? <default>` only at use sites that need a non-optional
//! value — concretely, a local declared with a non-optional type whose
//! initializer resolved optional.

use swiftgen_core::Span;

use crate::reader::swift_ast::{Block, Expr, Stmt};
use crate::types::SwiftType;

use super::super::WorkItem;

pub fn run(items: &mut [WorkItem]) {
    for item in items.iter_mut() {
        rewrite_block(&mut item.body);
    }
}

fn rewrite_block(block: &mut Block) {
    for stmt in &mut block.stmts {
        rewrite_stmt(stmt);
    }
}

fn rewrite_stmt(stmt: &mut Stmt) {
    match stmt {
        Stmt::Expr(e) => chain_optional(e),
        Stmt::LocalVar { declared_type, init, .. } => {
            if let Some(e) = init {
                chain_optional(e);
                if let Some(declared) = declared_type {
                    if !declared.is_optional_like() {
                        if let Some(inner_ty) = expr_optional_type(e) {
                            wrap_in_coalescing(e, inner_ty);
                        }
                    }
                }
            }
        }
        Stmt::If { cond, then_branch, else_branch, .. } => {
            chain_optional(cond);
            rewrite_block(then_branch);
            if let Some(b) = else_branch {
                rewrite_block(b);
            }
        }
        Stmt::While { cond, body, .. } | Stmt::DoWhile { cond, body, .. } => {
            chain_optional(cond);
            rewrite_block(body);
        }
        Stmt::For { init, cond, step, body, .. } => {
            if let Some(s) = init.as_deref_mut() {
                rewrite_stmt(s);
            }
            if let Some(e) = cond {
                chain_optional(e);
            }
            if let Some(e) = step {
                chain_optional(e);
            }
            rewrite_block(body);
        }
        Stmt::ForIn { iterable, body, .. } => {
            chain_optional(iterable);
            rewrite_block(body);
        }
        Stmt::Switch { scrutinee, cases, .. } => {
            chain_optional(scrutinee);
            for case in cases {
                for label in &mut case.labels {
                    chain_optional(label);
                }
                for s in &mut case.body {
                    rewrite_stmt(s);
                }
            }
        }
        Stmt::Return { value, .. } => {
            if let Some(e) = value {
                chain_optional(e);
            }
        }
        Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Unknown { .. } => {}
        Stmt::Compound(b) => rewrite_block(b),
    }
}

/// Marks `optional_chained` on every `MemberAccess` link whose immediate
/// receiver resolved to an optional type, walking outside-in from the
/// outermost access.
fn chain_optional(expr: &mut Expr) {
    if let Expr::MemberAccess { receiver, optional_chained, .. } = expr {
        chain_optional(receiver);
        if receiver_is_optional(receiver) {
            *optional_chained = true;
        }
        return;
    }
    for child in direct_children_mut(expr) {
        chain_optional(child);
    }
}

fn receiver_is_optional(expr: &Expr) -> bool {
    match expr {
        Expr::Ident { resolved_type: Some(ty), .. } => ty.is_optional_like(),
        Expr::MemberAccess { optional_chained, .. } => *optional_chained,
        _ => false,
    }
}

fn expr_optional_type(expr: &Expr) -> Option<SwiftType> {
    match expr {
        Expr::Ident { resolved_type: Some(ty), .. } if ty.is_optional_like() => Some(ty.unwrapped().clone()),
        _ => None,
    }
}

fn wrap_in_coalescing(expr: &mut Expr, inner_ty: SwiftType) {
    let span = expr.span();
    let taken = std::mem::replace(expr, Expr::Unknown { span, source_text: String::new() });
    *expr = Expr::NilCoalescing {
        span,
        lhs: Box::new(taken),
        rhs: Box::new(default_for_type(&inner_ty, span)),
    };
}

/// Best-effort default literal for the coalescing fallback; anything beyond
/// an empty collection falls back to `nil`, which reads oddly for a
/// non-optional target but flags the spot for human review same as any
/// other best-effort type resolution result.
fn default_for_type(ty: &SwiftType, span: Span) -> Expr {
    match ty {
        SwiftType::Array(_) => Expr::ArrayLiteral { span, elements: vec![] },
        _ => Expr::NilLiteral { span },
    }
}

fn direct_children_mut(expr: &mut Expr) -> Vec<&mut Expr> {
    match expr {
        Expr::Call { receiver, args, .. } => {
            let mut v = vec![receiver.as_mut()];
            v.extend(args.iter_mut().map(|a| &mut a.value));
            v
        }
        Expr::Binary { lhs, rhs, .. } | Expr::NilCoalescing { lhs, rhs, .. } => vec![lhs.as_mut(), rhs.as_mut()],
        Expr::Unary { operand, .. } => vec![operand.as_mut()],
        Expr::CompoundAssign { target, value, .. } | Expr::Assign { target, value, .. } => vec![target.as_mut(), value.as_mut()],
        Expr::Ternary { cond, then_branch, else_branch, .. } => vec![cond.as_mut(), then_branch.as_mut(), else_branch.as_mut()],
        Expr::Cast { expr, .. } => vec![expr.as_mut()],
        Expr::Paren(inner) => vec![inner.as_mut()],
        Expr::ArrayLiteral { elements, .. } => elements.iter_mut().collect(),
        Expr::DictLiteral { entries, .. } => entries.iter_mut().flat_map(|(k, v)| [k, v]).collect(),
        Expr::Closure { body, .. } => {
            for s in &mut body.stmts {
                rewrite_stmt(s);
            }
            vec![]
        }
        _ => vec![],
    }
}

#[cfg(test)]
mod nil_coalescing_tests {
    use super::*;
    use crate::body_queue::{BodyCarrier, BodyContext};
    use swiftgen_core::{IntentionId, Symbol};

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn optional_receiver_member_access_becomes_chained() {
        let mut items = vec![WorkItem {
            carrier: BodyCarrier::Method(IntentionId::new(0, 0)),
            body: Block {
                span: span(),
                stmts: vec![Stmt::Expr(Expr::MemberAccess {
                    span: span(),
                    receiver: Box::new(Expr::Ident {
                        span: span(),
                        name: Symbol::from_raw(0),
                        resolved_type: Some(SwiftType::Optional(Box::new(SwiftType::AnyObject))),
                    }),
                    member: Symbol::from_raw(1),
                    optional_chained: false,
                })],
            },
            context: BodyContext { owning_type: None, is_class_scope: false },
        }];

        run(&mut items);

        let Stmt::Expr(Expr::MemberAccess { optional_chained, .. }) = &items[0].body.stmts[0] else { panic!() };
        assert!(*optional_chained);
    }
}
