//! If-let rewriting: when an optional expression is
//! passed where a declared parameter is non-optional, wraps the call
//! statement in `if let name = name { ... }`.
//!
//! This tree has no dedicated if-let statement node and this pass has no
//! `Interner` to mint a fresh binding name, so the rewrite shadows: the
//! binding reuses the source identifier's own name (`if let x = x`) or, for
//! a `self.member` argument, the member's name (`if let title = self.title`),
//! both idiomatic Swift and both expressible with a plain [`Stmt::If`].

use std::collections::HashMap;

use swiftgen_core::{IntentionId, IntentionKind, Symbol};

use crate::intention::{IntentionCollection, IntentionPayload};
use crate::intention::method::Signature;
use crate::passes::UsageIndex;
use crate::reader::swift_ast::{Block, BinaryOp, CallArg, Expr, Stmt};
use crate::selector::Selector;
use crate::types::SwiftType;

use super::super::WorkItem;

pub fn run(items: &mut [WorkItem], collection: &IntentionCollection, usage: &UsageIndex) {
    let signatures = index_signatures(collection);
    for item in items.iter_mut() {
        let members = members_by_name(collection, item.context.owning_type);
        rewrite_block(&mut item.body, &signatures, &members, usage);
    }
}

fn index_signatures(collection: &IntentionCollection) -> Vec<Signature> {
    let mut out = Vec::new();
    for type_id in collection
        .iter_of_kind(IntentionKind::Class)
        .chain(collection.iter_of_kind(IntentionKind::ClassExtension))
    {
        let Some((methods, initializers)) = member_lists(collection, type_id) else { continue };
        for id in methods.iter().chain(initializers.iter()) {
            if let Some(sig) = signature_of(collection, *id) {
                out.push(sig);
            }
        }
    }
    out
}

fn member_lists(collection: &IntentionCollection, type_id: IntentionId) -> Option<(Vec<IntentionId>, Vec<IntentionId>)> {
    match &collection.get(type_id)?.payload {
        IntentionPayload::Class(c) => Some((c.methods.clone(), c.initializers.clone())),
        IntentionPayload::ClassExtension(c) => Some((c.methods.clone(), c.initializers.clone())),
        _ => None,
    }
}

fn signature_of(collection: &IntentionCollection, id: IntentionId) -> Option<Signature> {
    match &collection.get(id)?.payload {
        IntentionPayload::Method(m) => Some(m.signature.clone()),
        IntentionPayload::Initializer(i) => Some(i.signature.clone()),
        _ => None,
    }
}

fn members_by_name(collection: &IntentionCollection, owning_type: Option<IntentionId>) -> HashMap<Symbol, IntentionId> {
    let mut map = HashMap::new();
    let Some(type_id) = owning_type else { return map };
    let (ivars, properties) = match collection.get(type_id).map(|n| &n.payload) {
        Some(IntentionPayload::Class(c)) => (&c.ivars, &c.properties),
        Some(IntentionPayload::ClassExtension(c)) => (&c.ivars, &c.properties),
        _ => return map,
    };
    for id in ivars.iter().chain(properties.iter()) {
        if let Some(name) = member_name(collection, *id) {
            map.insert(name, *id);
        }
    }
    map
}

fn member_name(collection: &IntentionCollection, id: IntentionId) -> Option<Symbol> {
    match &collection.get(id)?.payload {
        IntentionPayload::InstanceVariable(d) => Some(d.name),
        IntentionPayload::Property(p) => Some(p.name),
        _ => None,
    }
}

fn resolve_signature(signatures: &[Signature], method_name: Symbol, arg_count: usize) -> Option<&Signature> {
    signatures.iter().find(|sig| {
        let sel = &sig.selector;
        sel.keywords().first() == Some(&method_name) && (sel.is_unary() && arg_count == 0 || sel.param_count() == arg_count)
    })
}

fn rewrite_block(block: &mut Block, signatures: &[Signature], members: &HashMap<Symbol, IntentionId>, usage: &UsageIndex) {
    let mut rewritten = Vec::with_capacity(block.stmts.len());
    for stmt in block.stmts.drain(..) {
        rewritten.push(rewrite_stmt(stmt, signatures, members, usage));
    }
    block.stmts = rewritten;
}

fn rewrite_stmt(stmt: Stmt, signatures: &[Signature], members: &HashMap<Symbol, IntentionId>, usage: &UsageIndex) -> Stmt {
    match stmt {
        Stmt::Expr(Expr::Call { span, receiver, method_name, args }) => {
            match binding_candidate(&args, signatures, method_name, members, usage) {
                Some((index, binding_name, unwrapped_ty, source)) => {
                    let mut new_args = args;
                    new_args[index] = CallArg {
                        label: new_args[index].label,
                        value: Expr::Ident { span, name: binding_name, resolved_type: Some(unwrapped_ty) },
                    };
                    let call = Expr::Call { span, receiver, method_name, args: new_args };
                    Stmt::If {
                        span,
                        cond: Expr::Binary { span, op: BinaryOp::NotEq, lhs: Box::new(source), rhs: Box::new(Expr::NilLiteral { span }) },
                        then_branch: Block { span, stmts: vec![Stmt::Expr(call)] },
                        else_branch: None,
                    }
                }
                None => Stmt::Expr(Expr::Call { span, receiver, method_name, args }),
            }
        }
        Stmt::If { span, cond, mut then_branch, else_branch } => {
            rewrite_block(&mut then_branch, signatures, members, usage);
            let else_branch = else_branch.map(|mut b| {
                rewrite_block(&mut b, signatures, members, usage);
                b
            });
            Stmt::If { span, cond, then_branch, else_branch }
        }
        Stmt::While { span, cond, mut body } => {
            rewrite_block(&mut body, signatures, members, usage);
            Stmt::While { span, cond, body }
        }
        Stmt::DoWhile { span, cond, mut body } => {
            rewrite_block(&mut body, signatures, members, usage);
            Stmt::DoWhile { span, cond, body }
        }
        Stmt::For { span, init, cond, step, mut body } => {
            rewrite_block(&mut body, signatures, members, usage);
            Stmt::For { span, init, cond, step, body }
        }
        Stmt::ForIn { span, binding, iterable, mut body } => {
            rewrite_block(&mut body, signatures, members, usage);
            Stmt::ForIn { span, binding, iterable, body }
        }
        Stmt::Switch { span, scrutinee, cases } => {
            let cases = cases
                .into_iter()
                .map(|mut case| {
                    case.body = case.body.into_iter().map(|s| rewrite_stmt(s, signatures, members, usage)).collect();
                    case
                })
                .collect();
            Stmt::Switch { span, scrutinee, cases }
        }
        Stmt::Compound(mut b) => {
            rewrite_block(&mut b, signatures, members, usage);
            Stmt::Compound(b)
        }
        other => other,
    }
}

/// Returns `(arg_index, binding_name, unwrapped_type, source_expr)` for the
/// first argument that needs wrapping, if any.
fn binding_candidate(
    args: &[CallArg],
    signatures: &[Signature],
    method_name: Symbol,
    members: &HashMap<Symbol, IntentionId>,
    usage: &UsageIndex,
) -> Option<(usize, Symbol, SwiftType, Expr)> {
    let sig = resolve_signature(signatures, method_name, args.len())?;
    for (i, arg) in args.iter().enumerate() {
        let Some(param) = sig.params.get(i) else { continue };
        if param.ty.is_optional_like() {
            continue;
        }
        match &arg.value {
            Expr::Ident { name, resolved_type: Some(ty), .. } if ty.is_optional_like() => {
                return Some((i, *name, ty.unwrapped().clone(), arg.value.clone()));
            }
            Expr::MemberAccess { receiver, member, .. } if matches!(receiver.as_ref(), Expr::SelfExpr { .. }) => {
                let Some(id) = members.get(member) else { continue };
                if !usage.is_referenced(*id) {
                    continue;
                }
                if let Some(ty) = member_optional_type(arg) {
                    return Some((i, *member, ty, arg.value.clone()));
                }
            }
            _ => {}
        }
    }
    None
}

fn member_optional_type(arg: &CallArg) -> Option<SwiftType> {
    if let Expr::MemberAccess { optional_chained: true, .. } = &arg.value {
        Some(SwiftType::AnyObject)
    } else {
        None
    }
}

#[cfg(test)]
mod iflet_rewrite_tests {
    use super::*;
    use crate::body_queue::{BodyCarrier, BodyContext};
    use crate::intention::class::ClassData;
    use crate::intention::method::{MethodData, Param};
    use swiftgen_core::{Interner, Span};

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn optional_local_passed_to_a_nonoptional_param_gets_wrapped() {
        let mut col = IntentionCollection::new();
        let mut interner = Interner::new();
        let class_name = interner.intern("Foo");
        let method_name = interner.intern("consume");
        let param_name = interner.intern("value");

        let class_id = col.insert(None, span(), false, IntentionPayload::Class(ClassData::new(class_name, None)));
        let method_id = col.insert(
            Some(class_id),
            span(),
            false,
            IntentionPayload::Method(MethodData {
                signature: Signature::new(
                    Selector::keyword(vec![method_name]),
                    vec![Param { name: param_name, ty: SwiftType::AnyObject }],
                    SwiftType::Void,
                ),
                body: None,
                is_class_method: false,
                is_optional: false,
                is_override: false,
            }),
        );
        if let IntentionPayload::Class(c) = &mut col.get_mut(class_id).unwrap().payload {
            c.methods.push(method_id);
        }

        let call = Expr::Call {
            span: span(),
            receiver: Box::new(Expr::SelfExpr { span: span() }),
            method_name,
            args: vec![CallArg {
                label: Some(method_name),
                value: Expr::Ident {
                    span: span(),
                    name: param_name,
                    resolved_type: Some(SwiftType::Optional(Box::new(SwiftType::AnyObject))),
                },
            }],
        };

        let mut items = vec![WorkItem {
            carrier: BodyCarrier::Method(method_id),
            body: Block { span: span(), stmts: vec![Stmt::Expr(call)] },
            context: BodyContext { owning_type: Some(class_id), is_class_scope: false },
        }];

        let usage = UsageIndex::default();
        run(&mut items, &col, &usage);

        assert!(matches!(items[0].body.stmts[0], Stmt::If { .. }));
    }
}
