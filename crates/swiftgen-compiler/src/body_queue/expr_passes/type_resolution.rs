//! Type resolution: fills in `Expr::Ident`'s
//! `resolved_type` by looking identifiers up against the enclosing scope's
//! locals first, then the owning type's ivars/properties, falling back to
//! `AnyObject!` on failure — type resolution failure is never an error,
//! just a weaker answer.

use std::collections::HashMap;

use swiftgen_core::Symbol;

use crate::intention::{IntentionCollection, IntentionPayload};
use crate::reader::swift_ast::{Block, Expr, Stmt};
use crate::types::SwiftType;

use super::super::WorkItem;

pub fn run(items: &mut [WorkItem], collection: &IntentionCollection) {
    for item in items.iter_mut() {
        let members = member_types(collection, item.context.owning_type);
        let mut scope = vec![HashMap::new()];
        resolve_block(&mut item.body, &members, &mut scope);
    }
}

fn member_types(collection: &IntentionCollection, owning_type: Option<swiftgen_core::IntentionId>) -> HashMap<Symbol, SwiftType> {
    let mut map = HashMap::new();
    let Some(type_id) = owning_type else { return map };
    let Some(node) = collection.get(type_id) else { return map };
    let (ivars, properties) = match &node.payload {
        IntentionPayload::Class(c) => (&c.ivars, &c.properties),
        IntentionPayload::ClassExtension(c) => (&c.ivars, &c.properties),
        _ => return map,
    };
    for id in ivars.iter().chain(properties.iter()) {
        match collection.get(*id).map(|n| &n.payload) {
            Some(IntentionPayload::InstanceVariable(d)) => {
                map.insert(d.name, d.storage.ty.clone());
            }
            Some(IntentionPayload::Property(p)) => {
                map.insert(p.name, p.storage.ty.clone());
            }
            _ => {}
        }
    }
    map
}

fn fallback_type() -> SwiftType {
    SwiftType::ImplicitlyUnwrapped(Box::new(SwiftType::AnyObject))
}

fn lookup(name: Symbol, members: &HashMap<Symbol, SwiftType>, scope: &[HashMap<Symbol, SwiftType>]) -> SwiftType {
    for frame in scope.iter().rev() {
        if let Some(ty) = frame.get(&name) {
            return ty.clone();
        }
    }
    members.get(&name).cloned().unwrap_or_else(fallback_type)
}

fn resolve_block(block: &mut Block, members: &HashMap<Symbol, SwiftType>, scope: &mut Vec<HashMap<Symbol, SwiftType>>) {
    scope.push(HashMap::new());
    for stmt in &mut block.stmts {
        resolve_stmt(stmt, members, scope);
    }
    scope.pop();
}

fn resolve_stmt(stmt: &mut Stmt, members: &HashMap<Symbol, SwiftType>, scope: &mut Vec<HashMap<Symbol, SwiftType>>) {
    match stmt {
        Stmt::Expr(e) => resolve_expr(e, members, scope),
        Stmt::LocalVar { name, declared_type, init, .. } => {
            if let Some(e) = init {
                resolve_expr(e, members, scope);
            }
            let ty = declared_type.clone().unwrap_or_else(fallback_type);
            scope.last_mut().expect("scope always has a frame").insert(*name, ty);
        }
        Stmt::If { cond, then_branch, else_branch, .. } => {
            resolve_expr(cond, members, scope);
            resolve_block(then_branch, members, scope);
            if let Some(b) = else_branch {
                resolve_block(b, members, scope);
            }
        }
        Stmt::While { cond, body, .. } | Stmt::DoWhile { cond, body, .. } => {
            resolve_expr(cond, members, scope);
            resolve_block(body, members, scope);
        }
        Stmt::For { init, cond, step, body, .. } => {
            scope.push(HashMap::new());
            if let Some(s) = init.as_deref_mut() {
                resolve_stmt(s, members, scope);
            }
            if let Some(e) = cond {
                resolve_expr(e, members, scope);
            }
            if let Some(e) = step {
                resolve_expr(e, members, scope);
            }
            resolve_block(body, members, scope);
            scope.pop();
        }
        Stmt::ForIn { binding, iterable, body, .. } => {
            resolve_expr(iterable, members, scope);
            scope.push(HashMap::new());
            scope.last_mut().unwrap().insert(*binding, fallback_type());
            for s in &mut body.stmts {
                resolve_stmt(s, members, scope);
            }
            scope.pop();
        }
        Stmt::Switch { scrutinee, cases, .. } => {
            resolve_expr(scrutinee, members, scope);
            for case in cases {
                for label in &mut case.labels {
                    resolve_expr(label, members, scope);
                }
                scope.push(HashMap::new());
                for s in &mut case.body {
                    resolve_stmt(s, members, scope);
                }
                scope.pop();
            }
        }
        Stmt::Return { value, .. } => {
            if let Some(e) = value {
                resolve_expr(e, members, scope);
            }
        }
        Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Unknown { .. } => {}
        Stmt::Compound(b) => resolve_block(b, members, scope),
    }
}

fn resolve_expr(expr: &mut Expr, members: &HashMap<Symbol, SwiftType>, scope: &mut Vec<HashMap<Symbol, SwiftType>>) {
    match expr {
        Expr::Ident { name, resolved_type, .. } => {
            *resolved_type = Some(lookup(*name, members, scope));
        }
        Expr::Call { receiver, args, .. } => {
            resolve_expr(receiver, members, scope);
            for a in args {
                resolve_expr(&mut a.value, members, scope);
            }
        }
        Expr::MemberAccess { receiver, .. } => resolve_expr(receiver, members, scope),
        Expr::Binary { lhs, rhs, .. } | Expr::NilCoalescing { lhs, rhs, .. } => {
            resolve_expr(lhs, members, scope);
            resolve_expr(rhs, members, scope);
        }
        Expr::Unary { operand, .. } => resolve_expr(operand, members, scope),
        Expr::CompoundAssign { target, value, .. } | Expr::Assign { target, value, .. } => {
            resolve_expr(target, members, scope);
            resolve_expr(value, members, scope);
        }
        Expr::Ternary { cond, then_branch, else_branch, .. } => {
            resolve_expr(cond, members, scope);
            resolve_expr(then_branch, members, scope);
            resolve_expr(else_branch, members, scope);
        }
        Expr::Cast { expr, .. } => resolve_expr(expr, members, scope),
        Expr::Paren(inner) => resolve_expr(inner, members, scope),
        Expr::ArrayLiteral { elements, .. } => {
            for e in elements {
                resolve_expr(e, members, scope);
            }
        }
        Expr::DictLiteral { entries, .. } => {
            for (k, v) in entries {
                resolve_expr(k, members, scope);
                resolve_expr(v, members, scope);
            }
        }
        Expr::Closure { params, body, .. } => {
            scope.push(HashMap::new());
            for (name, ty) in params {
                scope.last_mut().unwrap().insert(*name, ty.clone().unwrap_or_else(fallback_type));
            }
            for s in &mut body.stmts {
                resolve_stmt(s, members, scope);
            }
            scope.pop();
        }
        _ => {}
    }
}

#[cfg(test)]
mod type_resolution_tests {
    use super::*;
    use crate::body_queue::{BodyCarrier, BodyContext};
    use crate::intention::class::ClassData;
    use crate::intention::ivar::{AccessLevel, InstanceVariableData};
    use crate::intention::storage::{Ownership, Storage};
    use swiftgen_core::{Interner, Span};

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn ident_matching_an_ivar_resolves_to_its_storage_type() {
        let mut col = IntentionCollection::new();
        let mut interner = Interner::new();
        let class_name = interner.intern("Foo");
        let ivar_name = interner.intern("count");

        let class_id = col.insert(None, span(), false, IntentionPayload::Class(ClassData::new(class_name, None)));
        let ivar_id = col.insert(
            Some(class_id),
            span(),
            false,
            IntentionPayload::InstanceVariable(InstanceVariableData {
                name: ivar_name,
                storage: Storage::new(SwiftType::Nominal { name: interner.intern("Int"), generic_args: vec![] }, Ownership::Strong, false),
                access: AccessLevel::Private,
            }),
        );
        if let IntentionPayload::Class(c) = &mut col.get_mut(class_id).unwrap().payload {
            c.ivars.push(ivar_id);
        }

        let mut items = vec![WorkItem {
            carrier: BodyCarrier::Method(ivar_id),
            body: Block {
                span: span(),
                stmts: vec![Stmt::Return {
                    span: span(),
                    value: Some(Expr::Ident { span: span(), name: ivar_name, resolved_type: None }),
                }],
            },
            context: BodyContext { owning_type: Some(class_id), is_class_scope: false },
        }];

        run(&mut items, &col);

        let Stmt::Return { value: Some(Expr::Ident { resolved_type, .. }), .. } = &items[0].body.stmts[0] else {
            panic!()
        };
        assert_eq!(resolved_type.as_ref().unwrap().render(&interner), "Int");
    }
}
