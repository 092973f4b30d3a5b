//! Cast insertion: wraps an expression in
//! `TargetType(...)` when its inferred numeric type differs from its use
//! site's declared numeric type — a `CGFloat` divided and stored into an
//! `Int` local needs an explicit `Int(...)` wrap.

use swiftgen_core::Interner;

use crate::reader::swift_ast::{Block, CastStyle, Expr, Stmt};
use crate::types::SwiftType;

use super::super::WorkItem;

const NUMERIC_NAMES: &[&str] = &["Int", "Int32", "Int64", "UInt", "UInt32", "UInt64", "Double", "Float", "CGFloat"];

pub fn run(items: &mut [WorkItem], interner: &Interner) {
    for item in items.iter_mut() {
        rewrite_block(&mut item.body, interner);
    }
}

fn rewrite_block(block: &mut Block, interner: &Interner) {
    for stmt in &mut block.stmts {
        rewrite_stmt(stmt, interner);
    }
}

fn rewrite_stmt(stmt: &mut Stmt, interner: &Interner) {
    match stmt {
        Stmt::LocalVar { declared_type, init, .. } => {
            if let (Some(declared), Some(e)) = (declared_type.clone(), init.as_mut()) {
                maybe_insert_cast(e, &declared, interner);
            }
        }
        Stmt::Expr(e) | Stmt::Return { value: Some(e), .. } => walk_nested(e, interner),
        Stmt::If { then_branch, else_branch, .. } => {
            rewrite_block(then_branch, interner);
            if let Some(b) = else_branch {
                rewrite_block(b, interner);
            }
        }
        Stmt::While { body, .. } | Stmt::DoWhile { body, .. } | Stmt::ForIn { body, .. } => rewrite_block(body, interner),
        Stmt::For { init, body, .. } => {
            if let Some(s) = init.as_deref_mut() {
                rewrite_stmt(s, interner);
            }
            rewrite_block(body, interner);
        }
        Stmt::Switch { cases, .. } => {
            for case in cases {
                for s in &mut case.body {
                    rewrite_stmt(s, interner);
                }
            }
        }
        Stmt::Compound(b) => rewrite_block(b, interner),
        Stmt::Return { value: None, .. } | Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Unknown { .. } => {}
    }
}

fn walk_nested(_expr: &mut Expr, _interner: &Interner) {
    // Assignment and call-argument use sites aren't tracked here; the
    // LocalVar declared-type use site is the only one with an unambiguous
    // target type to cast against.
}

fn maybe_insert_cast(expr: &mut Expr, declared: &SwiftType, interner: &Interner) {
    let Some(declared_name) = numeric_name(declared, interner) else { return };
    let Some(source_ty) = numeric_source_type(expr) else { return };
    let Some(source_name) = numeric_name(&source_ty, interner) else { return };
    if source_name == declared_name {
        return;
    }

    let span = expr.span();
    let taken = std::mem::replace(expr, Expr::Unknown { span, source_text: String::new() });
    *expr = Expr::Cast {
        span,
        expr: Box::new(taken),
        target_type: declared.clone(),
        style: CastStyle::ValueInit,
    };
}

fn numeric_source_type(expr: &Expr) -> Option<SwiftType> {
    match expr {
        Expr::Ident { resolved_type: Some(ty), .. } => Some(ty.clone()),
        _ => None,
    }
}

fn numeric_name(ty: &SwiftType, interner: &Interner) -> Option<String> {
    let unwrapped = ty.unwrapped();
    match unwrapped {
        SwiftType::Nominal { name, generic_args } if generic_args.is_empty() => {
            let text = interner.resolve(*name);
            NUMERIC_NAMES.contains(&text).then(|| text.to_string())
        }
        _ => None,
    }
}

#[cfg(test)]
mod cast_insertion_tests {
    use super::*;
    use crate::body_queue::{BodyCarrier, BodyContext};
    use swiftgen_core::{IntentionId, Span, Symbol};

    fn span() -> Span {
        Span::new(0, 1)
    }

    fn nominal(interner: &mut Interner, name: &str) -> SwiftType {
        SwiftType::Nominal { name: interner.intern(name), generic_args: vec![] }
    }

    #[test]
    fn mismatched_numeric_local_init_gets_wrapped_in_a_cast() {
        let mut interner = Interner::new();
        let cgfloat = nominal(&mut interner, "CGFloat");
        let int_ty = nominal(&mut interner, "Int");
        let mut items = vec![WorkItem {
            carrier: BodyCarrier::Method(IntentionId::new(0, 0)),
            body: Block {
                span: span(),
                stmts: vec![Stmt::LocalVar {
                    span: span(),
                    name: Symbol::from_raw(0),
                    declared_type: Some(int_ty),
                    init: Some(Expr::Ident { span: span(), name: Symbol::from_raw(1), resolved_type: Some(cgfloat) }),
                }],
            },
            context: BodyContext { owning_type: None, is_class_scope: false },
        }];

        run(&mut items, &interner);

        let Stmt::LocalVar { init: Some(Expr::Cast { style, .. }), .. } = &items[0].body.stmts[0] else { panic!() };
        assert_eq!(*style, CastStyle::ValueInit);
    }
}
