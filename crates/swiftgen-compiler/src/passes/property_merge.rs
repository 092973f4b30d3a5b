//! Property Merge: fuses explicit `-name`/`-setName:` methods into
//! the property they implement, so the emitter only ever sees one member for
//! that piece of state instead of a property plus one or two redundant
//! methods restating the same selector.

use swiftgen_core::{Interner, IntentionId, IntentionKind, Span, Symbol};

use crate::intention::property::PropertyMode;
use crate::intention::{IntentionCollection, IntentionPayload};
use crate::reader::swift_ast::Block;
use crate::selector::Selector;

pub fn apply(collection: &mut IntentionCollection, interner: &mut Interner) {
    let type_ids: Vec<IntentionId> = collection
        .iter_of_kind(IntentionKind::Class)
        .chain(collection.iter_of_kind(IntentionKind::ClassExtension))
        .collect();
    for type_id in type_ids {
        merge_type_properties(collection, interner, type_id);
    }
}

fn merge_type_properties(collection: &mut IntentionCollection, interner: &mut Interner, type_id: IntentionId) {
    let Some(prop_ids) = property_ids(collection, type_id) else { return };

    for prop_id in prop_ids {
        let Some(prop_name) = property_name(collection, prop_id) else { continue };
        let getter_sel = Selector::property_getter(prop_name);
        let setter_sel = Selector::property_setter(prop_name, interner);

        let methods = method_ids(collection, type_id);
        let getter_id = methods.iter().copied().find(|id| method_selector(collection, *id).as_ref() == Some(&getter_sel));
        let setter_id = methods.iter().copied().find(|id| method_selector(collection, *id).as_ref() == Some(&setter_sel));

        let Some(getter_id) = getter_id else { continue };
        let getter_body = method_body(collection, getter_id).unwrap_or_else(empty_block);

        let mode = match setter_id {
            Some(setter_id) => {
                let setter_body = method_body(collection, setter_id).unwrap_or_else(empty_block);
                let setter_param = method_first_param(collection, setter_id).unwrap_or_else(|| interner.intern("newValue"));
                PropertyMode::GetterSetter {
                    getter: getter_body,
                    setter: setter_body,
                    setter_param,
                }
            }
            None => PropertyMode::Getter { body: getter_body },
        };

        if let Some(node) = collection.get_mut(prop_id) {
            if let IntentionPayload::Property(p) = &mut node.payload {
                p.mode = mode;
                p.getter_name = Some(prop_name);
                if setter_id.is_some() {
                    p.setter_name = Some(prop_name);
                }
            }
        }
        collection.push_history(prop_id, "property_merge", "fused explicit accessor method(s) into this property");

        collection.push_history(getter_id, "property_merge", "folded into property accessor, method removed");
        remove_method_from_type(collection, type_id, getter_id);
        collection.remove(getter_id);

        if let Some(setter_id) = setter_id {
            collection.push_history(setter_id, "property_merge", "folded into property accessor, method removed");
            remove_method_from_type(collection, type_id, setter_id);
            collection.remove(setter_id);
        }
    }
}

fn property_ids(collection: &IntentionCollection, type_id: IntentionId) -> Option<Vec<IntentionId>> {
    match &collection.get(type_id)?.payload {
        IntentionPayload::Class(c) => Some(c.properties.clone()),
        IntentionPayload::ClassExtension(c) => Some(c.properties.clone()),
        _ => None,
    }
}

fn method_ids(collection: &IntentionCollection, type_id: IntentionId) -> Vec<IntentionId> {
    match collection.get(type_id).map(|n| &n.payload) {
        Some(IntentionPayload::Class(c)) => c.methods.clone(),
        Some(IntentionPayload::ClassExtension(c)) => c.methods.clone(),
        _ => Vec::new(),
    }
}

fn remove_method_from_type(collection: &mut IntentionCollection, type_id: IntentionId, method_id: IntentionId) {
    if let Some(node) = collection.get_mut(type_id) {
        match &mut node.payload {
            IntentionPayload::Class(c) => c.methods.retain(|id| *id != method_id),
            IntentionPayload::ClassExtension(c) => c.methods.retain(|id| *id != method_id),
            _ => {}
        }
    }
}

fn property_name(collection: &IntentionCollection, id: IntentionId) -> Option<Symbol> {
    match &collection.get(id)?.payload {
        IntentionPayload::Property(p) => Some(p.name),
        _ => None,
    }
}

fn method_selector(collection: &IntentionCollection, id: IntentionId) -> Option<Selector> {
    match &collection.get(id)?.payload {
        IntentionPayload::Method(m) => Some(m.signature.selector.clone()),
        _ => None,
    }
}

fn method_body(collection: &IntentionCollection, id: IntentionId) -> Option<Block> {
    match &collection.get(id)?.payload {
        IntentionPayload::Method(m) => m.body.clone(),
        _ => None,
    }
}

fn method_first_param(collection: &IntentionCollection, id: IntentionId) -> Option<Symbol> {
    match &collection.get(id)?.payload {
        IntentionPayload::Method(m) => m.signature.params.first().map(|p| p.name),
        _ => None,
    }
}

fn empty_block() -> Block {
    Block {
        span: Span::new(0, 0),
        stmts: Vec::new(),
    }
}

#[cfg(test)]
mod property_merge_tests {
    use super::*;
    use crate::intention::class::ClassData;
    use crate::intention::method::{MethodData, Param, Signature};
    use crate::intention::property::{PropertyAttributes, PropertyData};
    use crate::intention::storage::{Ownership, Storage};
    use crate::types::SwiftType;

    fn span() -> Span {
        Span::new(0, 1)
    }

    fn block() -> Block {
        Block { span: span(), stmts: vec![] }
    }

    #[test]
    fn matching_getter_and_setter_fuse_into_getter_setter_property() {
        let mut col = IntentionCollection::new();
        let mut interner = Interner::new();
        let class_name = interner.intern("Foo");
        let prop_name = interner.intern("name");

        let class_id = col.insert(None, span(), false, IntentionPayload::Class(ClassData::new(class_name, None)));
        let storage = Storage::new(SwiftType::AnyObject, Ownership::Strong, false);
        let prop_id = col.insert(
            Some(class_id),
            span(),
            false,
            IntentionPayload::Property(PropertyData::new(prop_name, storage, PropertyAttributes::default())),
        );

        let getter_id = col.insert(
            Some(class_id),
            span(),
            false,
            IntentionPayload::Method(MethodData {
                signature: Signature::new(Selector::unary(prop_name), vec![], SwiftType::AnyObject),
                body: Some(block()),
                is_class_method: false,
                is_optional: false,
                is_override: false,
            }),
        );
        let new_value = interner.intern("newValue");
        let setter_sel = Selector::property_setter(prop_name, &mut interner);
        let setter_id = col.insert(
            Some(class_id),
            span(),
            false,
            IntentionPayload::Method(MethodData {
                signature: Signature::new(
                    setter_sel,
                    vec![Param {
                        name: new_value,
                        ty: SwiftType::AnyObject,
                    }],
                    SwiftType::Void,
                ),
                body: Some(block()),
                is_class_method: false,
                is_optional: false,
                is_override: false,
            }),
        );
        if let IntentionPayload::Class(c) = &mut col.get_mut(class_id).unwrap().payload {
            c.properties.push(prop_id);
            c.methods.push(getter_id);
            c.methods.push(setter_id);
        }

        apply(&mut col, &mut interner);

        assert!(col.get(getter_id).is_none());
        assert!(col.get(setter_id).is_none());
        let IntentionPayload::Property(p) = &col.get(prop_id).unwrap().payload else { panic!() };
        assert!(matches!(p.mode, PropertyMode::GetterSetter { .. }));
        let IntentionPayload::Class(c) = &col.get(class_id).unwrap().payload else { panic!() };
        assert!(c.methods.is_empty());
    }
}
