//! Override Detection: marks a method or initializer `is_override`
//! when its selector is also declared somewhere up its class's superclass
//! chain, or when its body calls `super` with that same selector — the
//! latter counts on its own even if the ancestor declaration couldn't be
//! resolved (a superclass defined outside the translated sources, say).

use std::collections::HashMap;

use swiftgen_core::{Interner, IntentionId, IntentionKind, Symbol};

use crate::intention::{IntentionCollection, IntentionPayload};
use crate::reader::swift_ast::{Block, Expr, Stmt};
use crate::selector::Selector;

pub fn apply(collection: &mut IntentionCollection, _interner: &mut Interner) {
    let classes_by_name = index_classes_by_name(collection);
    let class_ids: Vec<IntentionId> = collection.iter_of_kind(IntentionKind::Class).collect();

    for class_id in class_ids {
        let ancestor_selectors = ancestor_selectors(collection, &classes_by_name, class_id);
        let (method_ids, init_ids) = members(collection, class_id);

        for method_id in method_ids {
            mark_if_override(collection, method_id, &ancestor_selectors, true);
        }
        for init_id in init_ids {
            mark_if_override(collection, init_id, &ancestor_selectors, false);
        }
    }
}

fn index_classes_by_name(collection: &IntentionCollection) -> HashMap<Symbol, IntentionId> {
    let mut map = HashMap::new();
    for id in collection.iter_of_kind(IntentionKind::Class) {
        if let Some(IntentionPayload::Class(c)) = collection.get(id).map(|n| &n.payload) {
            map.insert(c.type_name, id);
        }
    }
    map
}

fn members(collection: &IntentionCollection, class_id: IntentionId) -> (Vec<IntentionId>, Vec<IntentionId>) {
    match collection.get(class_id).map(|n| &n.payload) {
        Some(IntentionPayload::Class(c)) => (c.methods.clone(), c.initializers.clone()),
        _ => (Vec::new(), Vec::new()),
    }
}

/// Every selector declared by a method or initializer anywhere up `class_id`'s
/// superclass chain. Stops at the first ancestor name that doesn't resolve to
/// a translated class (superclass lives outside these sources).
fn ancestor_selectors(
    collection: &IntentionCollection,
    classes_by_name: &HashMap<Symbol, IntentionId>,
    class_id: IntentionId,
) -> Vec<Selector> {
    let mut selectors = Vec::new();
    let mut current = match collection.get(class_id).map(|n| &n.payload) {
        Some(IntentionPayload::Class(c)) => c.superclass_name,
        _ => None,
    };

    while let Some(name) = current {
        let Some(&ancestor_id) = classes_by_name.get(&name) else { break };
        let Some(IntentionPayload::Class(c)) = collection.get(ancestor_id).map(|n| &n.payload) else { break };

        for id in c.methods.iter().chain(c.initializers.iter()) {
            if let Some(sel) = member_selector(collection, *id) {
                selectors.push(sel);
            }
        }
        current = c.superclass_name;
    }

    selectors
}

fn member_selector(collection: &IntentionCollection, id: IntentionId) -> Option<Selector> {
    match &collection.get(id)?.payload {
        IntentionPayload::Method(m) => Some(m.signature.selector.clone()),
        IntentionPayload::Initializer(i) => Some(i.signature.selector.clone()),
        _ => None,
    }
}

fn mark_if_override(collection: &mut IntentionCollection, id: IntentionId, ancestor_selectors: &[Selector], is_method: bool) {
    let Some(selector) = member_selector(collection, id) else { return };
    let declared_in_ancestor = ancestor_selectors.contains(&selector);
    let calls_super = body_of(collection, id).is_some_and(|b| block_calls_super_selector(&b, &selector));

    if !declared_in_ancestor && !calls_super {
        return;
    }

    if let Some(node) = collection.get_mut(id) {
        match &mut node.payload {
            IntentionPayload::Method(m) if is_method => m.is_override = true,
            IntentionPayload::Initializer(i) if !is_method => i.is_override = true,
            _ => {}
        }
    }
    let reason = if declared_in_ancestor {
        "marked override: selector declared by a superclass"
    } else {
        "marked override: body calls super with the same selector"
    };
    collection.push_history(id, "override_detection", reason);
}

fn body_of(collection: &IntentionCollection, id: IntentionId) -> Option<Block> {
    match &collection.get(id)?.payload {
        IntentionPayload::Method(m) => m.body.clone(),
        IntentionPayload::Initializer(i) => i.body.clone(),
        _ => None,
    }
}

fn block_calls_super_selector(block: &Block, selector: &Selector) -> bool {
    block.stmts.iter().any(|s| stmt_calls_super_selector(s, selector))
}

fn stmt_calls_super_selector(stmt: &Stmt, selector: &Selector) -> bool {
    match stmt {
        Stmt::Expr(e) => expr_calls_super_selector(e, selector),
        Stmt::LocalVar { init, .. } => init.as_ref().is_some_and(|e| expr_calls_super_selector(e, selector)),
        Stmt::If { cond, then_branch, else_branch, .. } => {
            expr_calls_super_selector(cond, selector)
                || block_calls_super_selector(then_branch, selector)
                || else_branch.as_ref().is_some_and(|b| block_calls_super_selector(b, selector))
        }
        Stmt::While { cond, body, .. } | Stmt::DoWhile { cond, body, .. } => {
            expr_calls_super_selector(cond, selector) || block_calls_super_selector(body, selector)
        }
        Stmt::For { init, cond, step, body, .. } => {
            init.as_deref().is_some_and(|s| stmt_calls_super_selector(s, selector))
                || cond.as_ref().is_some_and(|e| expr_calls_super_selector(e, selector))
                || step.as_ref().is_some_and(|e| expr_calls_super_selector(e, selector))
                || block_calls_super_selector(body, selector)
        }
        Stmt::ForIn { iterable, body, .. } => expr_calls_super_selector(iterable, selector) || block_calls_super_selector(body, selector),
        Stmt::Switch { scrutinee, cases, .. } => {
            expr_calls_super_selector(scrutinee, selector)
                || cases.iter().any(|c| c.body.iter().any(|s| stmt_calls_super_selector(s, selector)))
        }
        Stmt::Return { value, .. } => value.as_ref().is_some_and(|e| expr_calls_super_selector(e, selector)),
        Stmt::Break { .. } | Stmt::Continue { .. } => false,
        Stmt::Compound(b) => block_calls_super_selector(b, selector),
        Stmt::Unknown { .. } => false,
    }
}

fn expr_calls_super_selector(expr: &Expr, selector: &Selector) -> bool {
    match expr {
        Expr::Call { receiver, method_name, args, .. } => {
            let matches_here = matches!(receiver.as_ref(), Expr::SuperExpr { .. }) && call_matches_selector(*method_name, args.len(), selector);
            matches_here
                || expr_calls_super_selector(receiver, selector)
                || args.iter().any(|a| expr_calls_super_selector(&a.value, selector))
        }
        Expr::MemberAccess { receiver, .. } => expr_calls_super_selector(receiver, selector),
        Expr::Binary { lhs, rhs, .. } => expr_calls_super_selector(lhs, selector) || expr_calls_super_selector(rhs, selector),
        Expr::Unary { operand, .. } => expr_calls_super_selector(operand, selector),
        Expr::CompoundAssign { target, value, .. } | Expr::Assign { target, value, .. } => {
            expr_calls_super_selector(target, selector) || expr_calls_super_selector(value, selector)
        }
        Expr::NilCoalescing { lhs, rhs, .. } => expr_calls_super_selector(lhs, selector) || expr_calls_super_selector(rhs, selector),
        Expr::Ternary { cond, then_branch, else_branch, .. } => {
            expr_calls_super_selector(cond, selector) || expr_calls_super_selector(then_branch, selector) || expr_calls_super_selector(else_branch, selector)
        }
        Expr::Cast { expr, .. } => expr_calls_super_selector(expr, selector),
        Expr::Paren(inner) => expr_calls_super_selector(inner, selector),
        Expr::ArrayLiteral { elements, .. } => elements.iter().any(|e| expr_calls_super_selector(e, selector)),
        Expr::DictLiteral { entries, .. } => entries.iter().any(|(k, v)| expr_calls_super_selector(k, selector) || expr_calls_super_selector(v, selector)),
        Expr::Closure { body, .. } => block_calls_super_selector(body, selector),
        _ => false,
    }
}

/// `method_name` alone disambiguates a unary call's selector; a multi-arg
/// call's full keyword sequence isn't captured by the lowered `Call` node
/// (its keyword labels live on `CallArg::label`), so this matches on the
/// first keyword and arity only — sufficient to recognize a `super` call to
/// the same method the reader already distinguishes by selector elsewhere.
fn call_matches_selector(method_name: Symbol, arg_count: usize, selector: &Selector) -> bool {
    if selector.is_unary() {
        arg_count == 0 && selector.keywords().first() == Some(&method_name)
    } else {
        selector.param_count() == arg_count && selector.keywords().first() == Some(&method_name)
    }
}

#[cfg(test)]
mod override_detection_tests {
    use super::*;
    use crate::intention::class::ClassData;
    use crate::intention::method::{InitializerData, MethodData, Signature};
    use crate::types::SwiftType;
    use swiftgen_core::Span;

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn method_matching_a_superclass_selector_is_marked_override() {
        let mut col = IntentionCollection::new();
        let mut interner = Interner::new();
        let base_name = interner.intern("Base");
        let sub_name = interner.intern("Sub");
        let method_name = interner.intern("run");

        let base_id = col.insert(None, span(), false, IntentionPayload::Class(ClassData::new(base_name, None)));
        let base_method = col.insert(
            Some(base_id),
            span(),
            false,
            IntentionPayload::Method(MethodData {
                signature: Signature::new(Selector::unary(method_name), vec![], SwiftType::Void),
                body: None,
                is_class_method: false,
                is_optional: false,
                is_override: false,
            }),
        );
        if let IntentionPayload::Class(c) = &mut col.get_mut(base_id).unwrap().payload {
            c.methods.push(base_method);
        }

        let sub_id = col.insert(None, span(), false, IntentionPayload::Class(ClassData::new(sub_name, Some(base_name))));
        let sub_method = col.insert(
            Some(sub_id),
            span(),
            false,
            IntentionPayload::Method(MethodData {
                signature: Signature::new(Selector::unary(method_name), vec![], SwiftType::Void),
                body: None,
                is_class_method: false,
                is_optional: false,
                is_override: false,
            }),
        );
        if let IntentionPayload::Class(c) = &mut col.get_mut(sub_id).unwrap().payload {
            c.methods.push(sub_method);
        }

        apply(&mut col, &mut interner);

        let IntentionPayload::Method(m) = &col.get(sub_method).unwrap().payload else { panic!() };
        assert!(m.is_override);
    }

    #[test]
    fn initializer_calling_super_init_is_marked_override_without_a_resolvable_ancestor() {
        let mut col = IntentionCollection::new();
        let mut interner = Interner::new();
        let sub_name = interner.intern("Sub");
        let init_name = interner.intern("init");

        let sub_id = col.insert(None, span(), false, IntentionPayload::Class(ClassData::new(sub_name, None)));
        let body = Block {
            span: span(),
            stmts: vec![Stmt::Expr(Expr::Call {
                span: span(),
                receiver: Box::new(Expr::SuperExpr { span: span() }),
                method_name: init_name,
                args: vec![],
            })],
        };
        let init_id = col.insert(
            Some(sub_id),
            span(),
            false,
            IntentionPayload::Initializer(InitializerData {
                signature: Signature::new(Selector::unary(init_name), vec![], SwiftType::Void),
                body: Some(body),
                is_override: false,
            }),
        );
        if let IntentionPayload::Class(c) = &mut col.get_mut(sub_id).unwrap().payload {
            c.initializers.push(init_id);
        }

        apply(&mut col, &mut interner);

        let IntentionPayload::Initializer(i) = &col.get(init_id).unwrap().payload else { panic!() };
        assert!(i.is_override);
    }
}
