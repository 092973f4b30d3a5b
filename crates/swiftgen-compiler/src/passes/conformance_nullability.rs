//! Conformance Nullability: walks each conforming type's declared
//! protocols and merges a matching member's nullability onto the
//! conformer's member, the same merge rule `Nullability::merge_into` uses
//! for `-name`/`-setName:` pairs — the protocol's annotation wins only
//! where the conformer left its own unannotated.
//!
//! Property and method types are already resolved `SwiftType`s by the time
//! this pass runs, so nullability is read back off the wrapper
//! (`Optional`/`ImplicitlyUnwrapped`/bare) rather than carried separately.

use std::collections::HashMap;

use swiftgen_core::{Interner, IntentionId, IntentionKind, Symbol};

use crate::intention::method::{Param, Signature};
use crate::intention::{IntentionCollection, IntentionPayload};
use crate::selector::Selector;
use crate::types::{Nullability, Optionality, SwiftType};

pub fn apply(collection: &mut IntentionCollection, interner: &mut Interner) {
    let protocols_by_name = index_protocols_by_name(collection);
    let type_ids: Vec<IntentionId> = collection.iter_of_kind(IntentionKind::Class).chain(collection.iter_of_kind(IntentionKind::ClassExtension)).collect();

    for type_id in type_ids {
        let Some((conformances, property_ids, method_ids)) = type_members(collection, type_id) else { continue };

        for proto_name in conformances {
            let Some(&proto_id) = protocols_by_name.get(&proto_name) else { continue };
            let (proto_props, proto_methods) = protocol_member_maps(collection, proto_id);
            let proto_name_str = interner.resolve(proto_name).to_string();

            for prop_id in &property_ids {
                merge_property_nullability(collection, *prop_id, &proto_props, &proto_name_str);
            }
            for method_id in &method_ids {
                merge_method_nullability(collection, *method_id, &proto_methods, &proto_name_str);
            }
        }
    }
}

fn index_protocols_by_name(collection: &IntentionCollection) -> HashMap<Symbol, IntentionId> {
    let mut map = HashMap::new();
    for id in collection.iter_of_kind(IntentionKind::Protocol) {
        if let Some(IntentionPayload::Protocol(p)) = collection.get(id).map(|n| &n.payload) {
            map.insert(p.type_name, id);
        }
    }
    map
}

fn type_members(collection: &IntentionCollection, type_id: IntentionId) -> Option<(Vec<Symbol>, Vec<IntentionId>, Vec<IntentionId>)> {
    match collection.get(type_id).map(|n| &n.payload) {
        Some(IntentionPayload::Class(c)) => Some((c.protocol_conformances.clone(), c.properties.clone(), c.methods.clone())),
        Some(IntentionPayload::ClassExtension(c)) => Some((c.protocol_conformances.clone(), c.properties.clone(), c.methods.clone())),
        _ => None,
    }
}

fn protocol_member_maps(collection: &IntentionCollection, proto_id: IntentionId) -> (HashMap<Symbol, SwiftType>, HashMap<Selector, Signature>) {
    let mut props = HashMap::new();
    let mut methods = HashMap::new();
    let Some(IntentionPayload::Protocol(p)) = collection.get(proto_id).map(|n| &n.payload) else {
        return (props, methods);
    };

    for id in &p.properties {
        if let Some(IntentionPayload::Property(prop)) = collection.get(*id).map(|n| &n.payload) {
            props.insert(prop.name, prop.storage.ty.clone());
        }
    }
    for id in &p.methods {
        if let Some(IntentionPayload::Method(m)) = collection.get(*id).map(|n| &n.payload) {
            methods.insert(m.signature.selector.clone(), m.signature.clone());
        }
    }
    (props, methods)
}

fn merge_property_nullability(collection: &mut IntentionCollection, prop_id: IntentionId, proto_props: &HashMap<Symbol, SwiftType>, proto_name: &str) {
    let Some(node) = collection.get(prop_id) else { return };
    let IntentionPayload::Property(p) = &node.payload else { return };
    let Some(proto_ty) = proto_props.get(&p.name) else { return };
    let merged = merge_type_nullability(&p.storage.ty, proto_ty);
    if merged == p.storage.ty {
        return;
    }

    if let Some(node) = collection.get_mut(prop_id) {
        if let IntentionPayload::Property(p) = &mut node.payload {
            p.storage.ty = merged;
        }
    }
    collection.push_history(prop_id, "conformance_nullability", format!("nullability inherited from conformance to {proto_name}"));
}

fn merge_method_nullability(collection: &mut IntentionCollection, method_id: IntentionId, proto_methods: &HashMap<Selector, Signature>, proto_name: &str) {
    let Some(node) = collection.get(method_id) else { return };
    let IntentionPayload::Method(m) = &node.payload else { return };
    let Some(proto_sig) = proto_methods.get(&m.signature.selector) else { return };

    let merged_return = merge_type_nullability(&m.signature.return_type, &proto_sig.return_type);
    let merged_params: Vec<Param> = m
        .signature
        .params
        .iter()
        .zip(proto_sig.params.iter())
        .map(|(param, proto_param)| Param {
            name: param.name,
            ty: merge_type_nullability(&param.ty, &proto_param.ty),
        })
        .collect();
    let unchanged = merged_return == m.signature.return_type && merged_params == m.signature.params;
    if unchanged {
        return;
    }

    if let Some(node) = collection.get_mut(method_id) {
        if let IntentionPayload::Method(m) = &mut node.payload {
            m.signature.return_type = merged_return;
            m.signature.params = merged_params;
        }
    }
    collection.push_history(method_id, "conformance_nullability", format!("nullability inherited from conformance to {proto_name}"));
}

/// Reads a resolved `SwiftType`'s wrapper back as the `Nullability` it
/// would have come from: `Optional` as `Nullable`, `ImplicitlyUnwrapped` as
/// `Unspecified` (the outside-assume-nonnull default), anything else as
/// `Nonnull`.
fn nullability_of(ty: &SwiftType) -> Nullability {
    match ty {
        SwiftType::Optional(_) => Nullability::Nullable,
        SwiftType::ImplicitlyUnwrapped(_) => Nullability::Unspecified,
        _ => Nullability::Nonnull,
    }
}

fn optionality_of(nullability: Nullability) -> Optionality {
    match nullability {
        Nullability::Nonnull => Optionality::NonOptional,
        Nullability::Nullable | Nullability::NullResettable => Optionality::Optional,
        Nullability::Unspecified => Optionality::ImplicitlyUnwrapped,
    }
}

fn merge_type_nullability(target: &SwiftType, incoming: &SwiftType) -> SwiftType {
    let merged = nullability_of(target).merge_into(nullability_of(incoming));
    target.unwrapped().clone().with_optionality(optionality_of(merged))
}

#[cfg(test)]
mod conformance_nullability_tests {
    use super::*;
    use crate::intention::class::ClassData;
    use crate::intention::method::MethodData;
    use crate::intention::property::{PropertyAttributes, PropertyData};
    use crate::intention::protocol::ProtocolData;
    use crate::intention::storage::{Ownership, Storage};
    use swiftgen_core::Span;

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn unannotated_conforming_property_inherits_protocol_nullability() {
        let mut col = IntentionCollection::new();
        let mut interner = Interner::new();
        let proto_name = interner.intern("P");
        let prop_name = interner.intern("value");
        let any_ty = SwiftType::AnyObject;

        let proto_id = col.insert(None, span(), false, IntentionPayload::Protocol(ProtocolData::new(proto_name)));
        let proto_prop_id = col.insert(
            Some(proto_id),
            span(),
            false,
            IntentionPayload::Property(PropertyData::new(prop_name, Storage::new(SwiftType::Optional(Box::new(any_ty.clone())), Ownership::Strong, false), PropertyAttributes { readonly: true, ..Default::default() })),
        );
        if let IntentionPayload::Protocol(p) = &mut col.get_mut(proto_id).unwrap().payload {
            p.properties.push(proto_prop_id);
        }

        let class_name = interner.intern("C");
        let mut class_data = ClassData::new(class_name, None);
        class_data.protocol_conformances.push(proto_name);
        let class_id = col.insert(None, span(), false, IntentionPayload::Class(class_data));
        let class_prop_id = col.insert(
            Some(class_id),
            span(),
            false,
            IntentionPayload::Property(PropertyData::new(prop_name, Storage::new(SwiftType::ImplicitlyUnwrapped(Box::new(any_ty)), Ownership::Strong, false), PropertyAttributes::default())),
        );
        if let IntentionPayload::Class(c) = &mut col.get_mut(class_id).unwrap().payload {
            c.properties.push(class_prop_id);
        }

        apply(&mut col, &mut interner);

        let IntentionPayload::Property(p) = &col.get(class_prop_id).unwrap().payload else { panic!() };
        assert!(matches!(p.storage.ty, SwiftType::Optional(_)), "expected Optional, got {:?}", p.storage.ty);
    }

    #[test]
    fn explicitly_annotated_conforming_member_keeps_its_own_nullability() {
        let mut col = IntentionCollection::new();
        let mut interner = Interner::new();
        let proto_name = interner.intern("P");
        let method_name = interner.intern("f");

        let proto_id = col.insert(None, span(), false, IntentionPayload::Protocol(ProtocolData::new(proto_name)));
        let proto_method_id = col.insert(
            Some(proto_id),
            span(),
            false,
            IntentionPayload::Method(MethodData {
                signature: Signature::new(Selector::unary(method_name), vec![], SwiftType::Optional(Box::new(SwiftType::AnyObject))),
                body: None,
                is_class_method: false,
                is_optional: false,
                is_override: false,
            }),
        );
        if let IntentionPayload::Protocol(p) = &mut col.get_mut(proto_id).unwrap().payload {
            p.methods.push(proto_method_id);
        }

        let class_name = interner.intern("C");
        let mut class_data = ClassData::new(class_name, None);
        class_data.protocol_conformances.push(proto_name);
        let class_id = col.insert(None, span(), false, IntentionPayload::Class(class_data));
        let class_method_id = col.insert(
            Some(class_id),
            span(),
            false,
            IntentionPayload::Method(MethodData {
                signature: Signature::new(Selector::unary(method_name), vec![], SwiftType::AnyObject),
                body: None,
                is_class_method: false,
                is_optional: false,
                is_override: false,
            }),
        );
        if let IntentionPayload::Class(c) = &mut col.get_mut(class_id).unwrap().payload {
            c.methods.push(class_method_id);
        }

        apply(&mut col, &mut interner);

        let IntentionPayload::Method(m) = &col.get(class_method_id).unwrap().payload else { panic!() };
        assert_eq!(m.signature.return_type, SwiftType::AnyObject, "already-nonnull return type should not be touched");
    }
}
