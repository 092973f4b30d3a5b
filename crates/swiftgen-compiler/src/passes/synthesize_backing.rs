//! Synthesize Backing Field: resolves each `@synthesize name =
//! backing;` directive the reader recorded on a class (`@dynamic` needs no
//! handling here — it already does nothing by construction, since the
//! reader never records it as a pair).

use swiftgen_core::{Interner, IntentionId, IntentionKind, Span, Symbol};

use crate::intention::ivar::{AccessLevel, InstanceVariableData};
use crate::intention::property::PropertyMode;
use crate::intention::storage::{Ownership, Storage};
use crate::intention::{IntentionCollection, IntentionPayload};
use crate::reader::swift_ast::{Block, Expr, Stmt};

pub fn apply(collection: &mut IntentionCollection, interner: &mut Interner) {
    let class_ids: Vec<IntentionId> = collection.iter_of_kind(IntentionKind::Class).collect();
    for class_id in class_ids {
        let pairs = match &collection.get(class_id).map(|n| &n.payload) {
            Some(IntentionPayload::Class(c)) => c.synthesize_pairs.clone(),
            _ => continue,
        };
        for (property_name, backing_name) in pairs {
            resolve_pair(collection, interner, class_id, property_name, backing_name);
        }
    }
}

fn resolve_pair(
    collection: &mut IntentionCollection,
    interner: &mut Interner,
    class_id: IntentionId,
    property_name: Symbol,
    backing_name: Symbol,
) {
    let Some(property_id) = find_property(collection, class_id, property_name) else {
        return;
    };

    if backing_name == property_name {
        collapse_onto_existing_ivar(collection, class_id, property_id, backing_name);
    } else {
        rewrite_as_computed(collection, interner, class_id, property_id, backing_name);
    }
}

/// `@synthesize name = name;` (or bare `@synthesize name;`): the property
/// and an ivar of the exact same name describe one stored field. Drop the
/// separate ivar; the property itself stays a plain stored field, gaining
/// `private(set)` if it was declared `readonly` over a `@private` ivar.
fn collapse_onto_existing_ivar(collection: &mut IntentionCollection, class_id: IntentionId, property_id: IntentionId, backing_name: Symbol) {
    let Some(ivar_id) = find_ivar(collection, class_id, backing_name) else { return };
    let ivar_is_private = matches!(
        collection.get(ivar_id).map(|n| &n.payload),
        Some(IntentionPayload::InstanceVariable(d)) if d.access == AccessLevel::Private
    );
    let property_is_readonly = matches!(
        collection.get(property_id).map(|n| &n.payload),
        Some(IntentionPayload::Property(p)) if p.attributes.readonly
    );

    if let Some(node) = collection.get_mut(property_id) {
        if let IntentionPayload::Property(p) = &mut node.payload {
            p.mode = PropertyMode::Field;
            p.restricted_set = property_is_readonly && ivar_is_private;
        }
    }
    collection.push_history(property_id, "synthesize_backing", "collapsed onto its backing ivar of the same name");

    remove_ivar_from_class(collection, class_id, ivar_id);
    collection.remove(ivar_id);
}

/// `@synthesize name = backing;` with a distinct backing name: `backing`
/// becomes (or already is) a private stored ivar, and the property becomes
/// computed over it.
fn rewrite_as_computed(
    collection: &mut IntentionCollection,
    interner: &mut Interner,
    class_id: IntentionId,
    property_id: IntentionId,
    backing_name: Symbol,
) {
    let ivar_id = match find_ivar(collection, class_id, backing_name) {
        Some(id) => id,
        None => create_backing_ivar(collection, class_id, property_id, backing_name),
    };

    let readonly = matches!(
        collection.get(property_id).map(|n| &n.payload),
        Some(IntentionPayload::Property(p)) if p.attributes.readonly
    );
    let property_span = collection.get(property_id).map(|n| n.source).unwrap_or(Span::new(0, 0));
    let getter_body = getter_returning(backing_name, property_span);

    let mode = if readonly {
        PropertyMode::Getter { body: getter_body }
    } else {
        let new_value = interner.intern("newValue");
        PropertyMode::GetterSetter {
            getter: getter_body,
            setter: setter_assigning(backing_name, new_value, property_span),
            setter_param: new_value,
        }
    };

    if let Some(node) = collection.get_mut(property_id) {
        if let IntentionPayload::Property(p) = &mut node.payload {
            p.mode = mode;
        }
    }
    collection.push_history(
        property_id,
        "synthesize_backing",
        "rewritten as computed over an explicitly named backing ivar",
    );
    let _ = ivar_id;
}

fn create_backing_ivar(collection: &mut IntentionCollection, class_id: IntentionId, property_id: IntentionId, backing_name: Symbol) -> IntentionId {
    let (storage, span) = match collection.get(property_id).map(|n| (&n.payload, n.source)) {
        Some((IntentionPayload::Property(p), span)) => (p.storage.clone(), span),
        _ => (Storage::new(crate::types::SwiftType::AnyObject, Ownership::Strong, false), Span::new(0, 0)),
    };
    let ivar_id = collection.insert(
        Some(class_id),
        span,
        false,
        IntentionPayload::InstanceVariable(InstanceVariableData {
            name: backing_name,
            storage,
            access: AccessLevel::Private,
        }),
    );
    if let Some(node) = collection.get_mut(class_id) {
        if let IntentionPayload::Class(c) = &mut node.payload {
            c.ivars.push(ivar_id);
        }
    }
    collection.push_history(ivar_id, "synthesize_backing", "synthesized as an explicit backing ivar");
    ivar_id
}

fn getter_returning(name: Symbol, span: Span) -> Block {
    Block {
        span,
        stmts: vec![Stmt::Return {
            span,
            value: Some(Expr::Ident {
                span,
                name,
                resolved_type: None,
            }),
        }],
    }
}

fn setter_assigning(target: Symbol, value: Symbol, span: Span) -> Block {
    Block {
        span,
        stmts: vec![Stmt::Expr(Expr::Assign {
            span,
            target: Box::new(Expr::Ident {
                span,
                name: target,
                resolved_type: None,
            }),
            value: Box::new(Expr::Ident {
                span,
                name: value,
                resolved_type: None,
            }),
        })],
    }
}

fn find_property(collection: &IntentionCollection, class_id: IntentionId, name: Symbol) -> Option<IntentionId> {
    let IntentionPayload::Class(c) = &collection.get(class_id)?.payload else {
        return None;
    };
    c.properties.iter().copied().find(|id| {
        matches!(collection.get(*id).map(|n| &n.payload), Some(IntentionPayload::Property(p)) if p.name == name)
    })
}

fn find_ivar(collection: &IntentionCollection, class_id: IntentionId, name: Symbol) -> Option<IntentionId> {
    let IntentionPayload::Class(c) = &collection.get(class_id)?.payload else {
        return None;
    };
    c.ivars.iter().copied().find(|id| {
        matches!(collection.get(*id).map(|n| &n.payload), Some(IntentionPayload::InstanceVariable(d)) if d.name == name)
    })
}

fn remove_ivar_from_class(collection: &mut IntentionCollection, class_id: IntentionId, ivar_id: IntentionId) {
    if let Some(node) = collection.get_mut(class_id) {
        if let IntentionPayload::Class(c) = &mut node.payload {
            c.ivars.retain(|id| *id != ivar_id);
        }
    }
}

#[cfg(test)]
mod synthesize_backing_tests {
    use super::*;
    use crate::intention::class::ClassData;
    use crate::intention::property::{PropertyAttributes, PropertyData};
    use crate::types::SwiftType;

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn same_name_synthesize_collapses_ivar_and_downgrades_to_private_set() {
        let mut col = IntentionCollection::new();
        let mut interner = Interner::new();
        let class_name = interner.intern("Foo");
        let prop_name = interner.intern("a");

        let class_id = col.insert(None, span(), false, IntentionPayload::Class(ClassData::new(class_name, None)));
        let storage = Storage::new(SwiftType::AnyObject, Ownership::Strong, false);
        let mut attrs = PropertyAttributes::default();
        attrs.readonly = true;
        let prop_id = col.insert(
            Some(class_id),
            span(),
            false,
            IntentionPayload::Property(PropertyData::new(prop_name, storage.clone(), attrs)),
        );
        let ivar_id = col.insert(
            Some(class_id),
            span(),
            false,
            IntentionPayload::InstanceVariable(InstanceVariableData {
                name: prop_name,
                storage,
                access: AccessLevel::Private,
            }),
        );
        if let IntentionPayload::Class(c) = &mut col.get_mut(class_id).unwrap().payload {
            c.properties.push(prop_id);
            c.ivars.push(ivar_id);
            c.synthesize_pairs.push((prop_name, prop_name));
        }

        apply(&mut col, &mut interner);

        assert!(col.get(ivar_id).is_none());
        let IntentionPayload::Property(p) = &col.get(prop_id).unwrap().payload else { panic!() };
        assert!(p.restricted_set);
        assert!(p.mode.is_field());
    }

    #[test]
    fn distinct_backing_name_rewrites_property_as_computed() {
        let mut col = IntentionCollection::new();
        let mut interner = Interner::new();
        let class_name = interner.intern("Foo");
        let prop_name = interner.intern("a");
        let backing_name = interner.intern("_a");

        let class_id = col.insert(None, span(), false, IntentionPayload::Class(ClassData::new(class_name, None)));
        let storage = Storage::new(SwiftType::AnyObject, Ownership::Strong, false);
        let prop_id = col.insert(
            Some(class_id),
            span(),
            false,
            IntentionPayload::Property(PropertyData::new(prop_name, storage, PropertyAttributes::default())),
        );
        if let IntentionPayload::Class(c) = &mut col.get_mut(class_id).unwrap().payload {
            c.properties.push(prop_id);
            c.synthesize_pairs.push((prop_name, backing_name));
        }

        apply(&mut col, &mut interner);

        let IntentionPayload::Class(c) = &col.get(class_id).unwrap().payload else { panic!() };
        assert_eq!(c.ivars.len(), 1);
        let IntentionPayload::Property(p) = &col.get(prop_id).unwrap().payload else { panic!() };
        assert!(matches!(p.mode, PropertyMode::GetterSetter { .. }));
    }
}
