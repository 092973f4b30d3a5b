//! Usage Analysis: walks every function body and records, for each
//! referenced declaration, the sites that reference it — the data the body
//! queue's expression passes consult to decide things like
//! "this receiver's declared type is nullable, so chain `?.` through it".

use std::collections::HashMap;

use swiftgen_core::{IntentionId, IntentionKind, Span, Symbol};

use crate::intention::{IntentionCollection, IntentionPayload};
use crate::reader::swift_ast::{Block, Expr, Stmt};
use crate::selector::Selector;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UsageIndex {
    sites: HashMap<IntentionId, Vec<Span>>,
}

impl UsageIndex {
    pub fn sites_for(&self, id: IntentionId) -> &[Span] {
        self.sites.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_referenced(&self, id: IntentionId) -> bool {
        self.sites.contains_key(&id)
    }

    fn record(&mut self, id: IntentionId, span: Span) {
        self.sites.entry(id).or_default().push(span);
    }
}

pub fn apply(collection: &mut IntentionCollection) -> UsageIndex {
    let mut index = UsageIndex::default();

    let type_ids: Vec<IntentionId> = collection
        .iter_of_kind(IntentionKind::Class)
        .chain(collection.iter_of_kind(IntentionKind::ClassExtension))
        .collect();
    for type_id in type_ids {
        analyze_type(collection, &mut index, type_id);
    }

    for file_id in collection.files().to_vec() {
        analyze_file_globals(collection, &mut index, file_id);
    }

    annotate_history(collection, &index);
    index
}

fn analyze_type(collection: &IntentionCollection, index: &mut UsageIndex, type_id: IntentionId) {
    let Some((ivars, properties, methods, initializers)) = type_members(collection, type_id) else { return };

    let mut members_by_name: HashMap<Symbol, IntentionId> = HashMap::new();
    for id in ivars.iter().chain(properties.iter()) {
        if let Some(name) = member_name(collection, *id) {
            members_by_name.insert(name, *id);
        }
    }

    let mut selectors: Vec<(Selector, IntentionId)> = Vec::new();
    for id in methods.iter().chain(initializers.iter()) {
        if let Some(sel) = member_selector(collection, *id) {
            selectors.push((sel, *id));
        }
    }

    for id in methods.iter().chain(initializers.iter()) {
        let Some(body) = member_body(collection, *id) else { continue };
        walk_block(&body, &mut |expr| {
            record_self_reference(expr, index, &members_by_name, &selectors);
        });
    }
}

fn analyze_file_globals(collection: &IntentionCollection, index: &mut UsageIndex, file_id: IntentionId) {
    let Some(IntentionPayload::File(f)) = collection.get(file_id).map(|n| &n.payload) else { return };

    let mut globals_by_name: HashMap<Symbol, IntentionId> = HashMap::new();
    for id in &f.globals {
        if let Some(IntentionPayload::GlobalVariable(g)) = collection.get(*id).map(|n| &n.payload) {
            globals_by_name.insert(g.name, *id);
        }
    }
    if globals_by_name.is_empty() {
        return;
    }

    for fn_id in &f.global_functions {
        let Some(IntentionPayload::GlobalFunction(g)) = collection.get(*fn_id).map(|n| &n.payload) else { continue };
        let Some(body) = &g.body else { continue };
        walk_block(body, &mut |expr| {
            if let Expr::Ident { span, name, .. } = expr {
                if let Some(id) = globals_by_name.get(name) {
                    index.record(*id, *span);
                }
            }
        });
    }
}

fn record_self_reference(expr: &Expr, index: &mut UsageIndex, members_by_name: &HashMap<Symbol, IntentionId>, selectors: &[(Selector, IntentionId)]) {
    match expr {
        Expr::MemberAccess { span, receiver, member, .. } if matches!(receiver.as_ref(), Expr::SelfExpr { .. }) => {
            if let Some(id) = members_by_name.get(member) {
                index.record(*id, *span);
            }
        }
        Expr::Call { span, receiver, method_name, args } if matches!(receiver.as_ref(), Expr::SelfExpr { .. } | Expr::SuperExpr { .. }) => {
            if let Some(id) = resolve_selector(selectors, *method_name, args.len()) {
                index.record(id, *span);
            }
        }
        _ => {}
    }
}

fn resolve_selector(selectors: &[(Selector, IntentionId)], method_name: Symbol, arg_count: usize) -> Option<IntentionId> {
    selectors
        .iter()
        .find(|(sel, _)| {
            sel.keywords().first() == Some(&method_name) && (sel.is_unary() && arg_count == 0 || sel.param_count() == arg_count)
        })
        .map(|(_, id)| *id)
}

#[allow(clippy::type_complexity)]
fn type_members(
    collection: &IntentionCollection,
    type_id: IntentionId,
) -> Option<(Vec<IntentionId>, Vec<IntentionId>, Vec<IntentionId>, Vec<IntentionId>)> {
    match &collection.get(type_id)?.payload {
        IntentionPayload::Class(c) => Some((c.ivars.clone(), c.properties.clone(), c.methods.clone(), c.initializers.clone())),
        IntentionPayload::ClassExtension(c) => Some((c.ivars.clone(), c.properties.clone(), c.methods.clone(), c.initializers.clone())),
        _ => None,
    }
}

fn member_name(collection: &IntentionCollection, id: IntentionId) -> Option<Symbol> {
    match &collection.get(id)?.payload {
        IntentionPayload::InstanceVariable(d) => Some(d.name),
        IntentionPayload::Property(p) => Some(p.name),
        _ => None,
    }
}

fn member_selector(collection: &IntentionCollection, id: IntentionId) -> Option<Selector> {
    match &collection.get(id)?.payload {
        IntentionPayload::Method(m) => Some(m.signature.selector.clone()),
        IntentionPayload::Initializer(i) => Some(i.signature.selector.clone()),
        _ => None,
    }
}

fn member_body(collection: &IntentionCollection, id: IntentionId) -> Option<Block> {
    match &collection.get(id)?.payload {
        IntentionPayload::Method(m) => m.body.clone(),
        IntentionPayload::Initializer(i) => i.body.clone(),
        _ => None,
    }
}

fn annotate_history(collection: &mut IntentionCollection, index: &UsageIndex) {
    let referenced: Vec<(IntentionId, usize)> = index.sites.iter().map(|(id, sites)| (*id, sites.len())).collect();
    for (id, count) in referenced {
        collection.push_history(id, "usage_analysis", format!("referenced at {count} site(s)"));
    }
}

fn walk_block(block: &Block, f: &mut impl FnMut(&Expr)) {
    for stmt in &block.stmts {
        walk_stmt(stmt, f);
    }
}

fn walk_stmt(stmt: &Stmt, f: &mut impl FnMut(&Expr)) {
    match stmt {
        Stmt::Expr(e) => walk_expr(e, f),
        Stmt::LocalVar { init, .. } => {
            if let Some(e) = init {
                walk_expr(e, f);
            }
        }
        Stmt::If { cond, then_branch, else_branch, .. } => {
            walk_expr(cond, f);
            walk_block(then_branch, f);
            if let Some(b) = else_branch {
                walk_block(b, f);
            }
        }
        Stmt::While { cond, body, .. } | Stmt::DoWhile { cond, body, .. } => {
            walk_expr(cond, f);
            walk_block(body, f);
        }
        Stmt::For { init, cond, step, body, .. } => {
            if let Some(s) = init {
                walk_stmt(s, f);
            }
            if let Some(e) = cond {
                walk_expr(e, f);
            }
            if let Some(e) = step {
                walk_expr(e, f);
            }
            walk_block(body, f);
        }
        Stmt::ForIn { iterable, body, .. } => {
            walk_expr(iterable, f);
            walk_block(body, f);
        }
        Stmt::Switch { scrutinee, cases, .. } => {
            walk_expr(scrutinee, f);
            for case in cases {
                for label in &case.labels {
                    walk_expr(label, f);
                }
                for s in &case.body {
                    walk_stmt(s, f);
                }
            }
        }
        Stmt::Return { value, .. } => {
            if let Some(e) = value {
                walk_expr(e, f);
            }
        }
        Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Unknown { .. } => {}
        Stmt::Compound(b) => walk_block(b, f),
    }
}

fn walk_expr(expr: &Expr, f: &mut impl FnMut(&Expr)) {
    f(expr);
    match expr {
        Expr::Call { receiver, args, .. } => {
            walk_expr(receiver, f);
            for a in args {
                walk_expr(&a.value, f);
            }
        }
        Expr::MemberAccess { receiver, .. } => walk_expr(receiver, f),
        Expr::Binary { lhs, rhs, .. } | Expr::NilCoalescing { lhs, rhs, .. } => {
            walk_expr(lhs, f);
            walk_expr(rhs, f);
        }
        Expr::Unary { operand, .. } => walk_expr(operand, f),
        Expr::CompoundAssign { target, value, .. } | Expr::Assign { target, value, .. } => {
            walk_expr(target, f);
            walk_expr(value, f);
        }
        Expr::Ternary { cond, then_branch, else_branch, .. } => {
            walk_expr(cond, f);
            walk_expr(then_branch, f);
            walk_expr(else_branch, f);
        }
        Expr::Cast { expr, .. } => walk_expr(expr, f),
        Expr::Paren(inner) => walk_expr(inner, f),
        Expr::ArrayLiteral { elements, .. } => {
            for e in elements {
                walk_expr(e, f);
            }
        }
        Expr::DictLiteral { entries, .. } => {
            for (k, v) in entries {
                walk_expr(k, f);
                walk_expr(v, f);
            }
        }
        Expr::Closure { body, .. } => walk_block(body, f),
        _ => {}
    }
}

#[cfg(test)]
mod usage_analysis_tests {
    use super::*;
    use crate::intention::class::ClassData;
    use crate::intention::ivar::{AccessLevel, InstanceVariableData};
    use crate::intention::method::{MethodData, Signature};
    use crate::intention::storage::{Ownership, Storage};
    use crate::types::SwiftType;
    use swiftgen_core::{Interner, Span};

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn self_member_access_inside_a_method_body_is_recorded_against_the_ivar() {
        let mut col = IntentionCollection::new();
        let mut interner = Interner::new();
        let class_name = interner.intern("Foo");
        let ivar_name = interner.intern("_x");
        let method_name = interner.intern("reset");

        let class_id = col.insert(None, span(), false, IntentionPayload::Class(ClassData::new(class_name, None)));
        let ivar_id = col.insert(
            Some(class_id),
            span(),
            false,
            IntentionPayload::InstanceVariable(InstanceVariableData {
                name: ivar_name,
                storage: Storage::new(SwiftType::AnyObject, Ownership::Strong, false),
                access: AccessLevel::Private,
            }),
        );
        let body = Block {
            span: span(),
            stmts: vec![Stmt::Expr(Expr::Assign {
                span: span(),
                target: Box::new(Expr::MemberAccess {
                    span: span(),
                    receiver: Box::new(Expr::SelfExpr { span: span() }),
                    member: ivar_name,
                    optional_chained: false,
                }),
                value: Box::new(Expr::NilLiteral { span: span() }),
            })],
        };
        let method_id = col.insert(
            Some(class_id),
            span(),
            false,
            IntentionPayload::Method(MethodData {
                signature: Signature::new(Selector::unary(method_name), vec![], SwiftType::Void),
                body: Some(body),
                is_class_method: false,
                is_optional: false,
                is_override: false,
            }),
        );
        if let IntentionPayload::Class(c) = &mut col.get_mut(class_id).unwrap().payload {
            c.ivars.push(ivar_id);
            c.methods.push(method_id);
        }

        let index = apply(&mut col);

        assert!(index.is_referenced(ivar_id));
        assert_eq!(index.sites_for(ivar_id).len(), 1);
    }
}
