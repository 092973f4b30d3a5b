//! File Grouping: pairs each implementation file with the header
//! sharing its basename and folds the header's declarations into it.

use tracing::debug;

use swiftgen_core::{Interner, IntentionId, Symbol};

use crate::intention::file::FileKind;
use crate::intention::method::MethodData;
use crate::intention::{IntentionCollection, IntentionPayload};
use crate::types::SwiftType;

pub fn apply(collection: &mut IntentionCollection, _interner: &mut Interner) {
    let file_ids = collection.files().to_vec();
    let (headers, impls): (Vec<IntentionId>, Vec<IntentionId>) =
        file_ids.into_iter().partition(|id| file_kind(collection, *id) == Some(FileKind::Header));

    for impl_id in impls {
        let Some(impl_basename) = basename(collection, impl_id) else { continue };
        let Some(header_id) = headers.iter().copied().find(|h| basename(collection, *h).as_deref() == Some(&impl_basename))
        else {
            continue;
        };
        merge_file(collection, header_id, impl_id);
    }
}

fn file_kind(collection: &IntentionCollection, id: IntentionId) -> Option<FileKind> {
    match &collection.get(id)?.payload {
        IntentionPayload::File(f) => Some(f.kind.clone()),
        _ => None,
    }
}

fn basename(collection: &IntentionCollection, id: IntentionId) -> Option<String> {
    match &collection.get(id)?.payload {
        IntentionPayload::File(f) => Some(f.basename().to_string()),
        _ => None,
    }
}

fn merge_file(collection: &mut IntentionCollection, header_id: IntentionId, impl_id: IntentionId) {
    debug!(?header_id, ?impl_id, "merging header into implementation");

    let (header_types, header_protocols, header_globals, header_global_functions, header_typealiases, header_directives) =
        match &collection.get(header_id).unwrap().payload {
            IntentionPayload::File(f) => (
                f.types.clone(),
                f.protocols.clone(),
                f.globals.clone(),
                f.global_functions.clone(),
                f.typealiases.clone(),
                f.preprocessor_directives.clone(),
            ),
            _ => return,
        };

    for header_type_id in header_types {
        let Some((name, kind)) = type_identity(collection, header_type_id) else { continue };
        let target = impl_type_ids(collection, impl_id)
            .into_iter()
            .find(|id| type_identity(collection, *id) == Some((name, kind)));
        match target {
            Some(impl_type_id) => merge_types(collection, header_type_id, impl_type_id),
            None => {
                collection.set_parent(header_type_id, Some(impl_id), "file_grouping");
                push_type(collection, impl_id, header_type_id);
            }
        }
    }

    for protocol_id in header_protocols {
        if !file_has_protocol_named(collection, impl_id, protocol_id) {
            collection.set_parent(protocol_id, Some(impl_id), "file_grouping");
            push_protocol(collection, impl_id, protocol_id);
        }
    }

    for global_id in header_globals {
        collection.set_parent(global_id, Some(impl_id), "file_grouping");
        push_global(collection, impl_id, global_id);
    }

    for func_id in header_global_functions {
        collection.set_parent(func_id, Some(impl_id), "file_grouping");
        push_global_function(collection, impl_id, func_id);
    }

    if let Some(node) = collection.get_mut(impl_id) {
        if let IntentionPayload::File(f) = &mut node.payload {
            f.typealiases.extend(header_typealiases);
            f.preprocessor_directives.extend(header_directives);
        }
    }

    collection.push_history(impl_id, "file_grouping", "merged header declarations");
    collection.remove(header_id);
}

fn type_identity(collection: &IntentionCollection, id: IntentionId) -> Option<(Symbol, &'static str)> {
    match &collection.get(id)?.payload {
        IntentionPayload::Class(c) => Some((c.type_name, "class")),
        IntentionPayload::ClassExtension(c) => Some((c.type_name, "class_extension")),
        IntentionPayload::Struct(s) => Some((s.type_name, "struct")),
        IntentionPayload::Enum(e) => Some((e.type_name, "enum")),
        _ => None,
    }
}

fn impl_type_ids(collection: &IntentionCollection, impl_id: IntentionId) -> Vec<IntentionId> {
    match &collection.get(impl_id).map(|n| &n.payload) {
        Some(IntentionPayload::File(f)) => f.types.clone(),
        _ => Vec::new(),
    }
}

fn push_type(collection: &mut IntentionCollection, file_id: IntentionId, type_id: IntentionId) {
    if let Some(node) = collection.get_mut(file_id) {
        if let IntentionPayload::File(f) = &mut node.payload {
            f.types.push(type_id);
        }
    }
}

fn push_protocol(collection: &mut IntentionCollection, file_id: IntentionId, protocol_id: IntentionId) {
    if let Some(node) = collection.get_mut(file_id) {
        if let IntentionPayload::File(f) = &mut node.payload {
            f.protocols.push(protocol_id);
        }
    }
}

fn push_global(collection: &mut IntentionCollection, file_id: IntentionId, global_id: IntentionId) {
    if let Some(node) = collection.get_mut(file_id) {
        if let IntentionPayload::File(f) = &mut node.payload {
            f.globals.push(global_id);
        }
    }
}

fn push_global_function(collection: &mut IntentionCollection, file_id: IntentionId, func_id: IntentionId) {
    if let Some(node) = collection.get_mut(file_id) {
        if let IntentionPayload::File(f) = &mut node.payload {
            f.global_functions.push(func_id);
        }
    }
}

fn file_has_protocol_named(collection: &IntentionCollection, file_id: IntentionId, candidate: IntentionId) -> bool {
    let Some(candidate_name) = (match &collection.get(candidate).map(|n| &n.payload) {
        Some(IntentionPayload::Protocol(p)) => Some(p.type_name),
        _ => None,
    }) else {
        return false;
    };
    let Some(IntentionPayload::File(f)) = collection.get(file_id).map(|n| &n.payload) else {
        return false;
    };
    f.protocols.iter().any(|id| match &collection.get(*id).map(|n| &n.payload) {
        Some(IntentionPayload::Protocol(p)) => p.type_name == candidate_name,
        _ => false,
    })
}

/// Merges `header_type`'s members into `impl_type` in the fixed per-type
/// merge order (ivars, then properties, then methods) and drops the now-empty
/// header type intention.
fn merge_types(collection: &mut IntentionCollection, header_type: IntentionId, impl_type: IntentionId) {
    let Some((header_ivars, header_props, header_methods)) = member_lists(collection, header_type) else {
        return;
    };

    for ivar_id in header_ivars {
        merge_ivar(collection, impl_type, ivar_id);
    }
    for prop_id in header_props {
        merge_property(collection, impl_type, prop_id);
    }
    for method_id in header_methods {
        merge_method(collection, impl_type, method_id);
    }

    collection.push_history(impl_type, "file_grouping", "merged interface declaration");
    collection.remove(header_type);
}

fn member_lists(collection: &IntentionCollection, type_id: IntentionId) -> Option<(Vec<IntentionId>, Vec<IntentionId>, Vec<IntentionId>)> {
    match &collection.get(type_id)?.payload {
        IntentionPayload::Class(c) => Some((c.ivars.clone(), c.properties.clone(), c.methods.clone())),
        IntentionPayload::ClassExtension(c) => Some((c.ivars.clone(), c.properties.clone(), c.methods.clone())),
        _ => None,
    }
}

fn ivar_name(collection: &IntentionCollection, id: IntentionId) -> Option<Symbol> {
    match &collection.get(id)?.payload {
        IntentionPayload::InstanceVariable(d) => Some(d.name),
        _ => None,
    }
}

fn property_name(collection: &IntentionCollection, id: IntentionId) -> Option<Symbol> {
    match &collection.get(id)?.payload {
        IntentionPayload::Property(d) => Some(d.name),
        _ => None,
    }
}

fn method_selector(collection: &IntentionCollection, id: IntentionId) -> Option<crate::selector::Selector> {
    match &collection.get(id)?.payload {
        IntentionPayload::Method(d) => Some(d.signature.selector.clone()),
        _ => None,
    }
}

fn merge_ivar(collection: &mut IntentionCollection, owner: IntentionId, header_ivar: IntentionId) {
    let Some(name) = ivar_name(collection, header_ivar) else { return };
    let exists = member_lists(collection, owner)
        .map(|(ivars, _, _)| ivars.iter().any(|id| ivar_name(collection, *id) == Some(name)))
        .unwrap_or(false);
    if exists {
        collection.remove(header_ivar);
        return;
    }
    collection.set_parent(header_ivar, Some(owner), "file_grouping");
    if let Some(node) = collection.get_mut(owner) {
        match &mut node.payload {
            IntentionPayload::Class(c) => c.ivars.push(header_ivar),
            IntentionPayload::ClassExtension(c) => c.ivars.push(header_ivar),
            _ => {}
        }
    }
}

fn merge_property(collection: &mut IntentionCollection, owner: IntentionId, header_prop: IntentionId) {
    let Some(name) = property_name(collection, header_prop) else { return };
    let exists = member_lists(collection, owner)
        .map(|(_, props, _)| props.iter().any(|id| property_name(collection, *id) == Some(name)))
        .unwrap_or(false);
    if exists {
        collection.remove(header_prop);
        return;
    }
    collection.set_parent(header_prop, Some(owner), "file_grouping");
    if let Some(node) = collection.get_mut(owner) {
        match &mut node.payload {
            IntentionPayload::Class(c) => c.properties.push(header_prop),
            IntentionPayload::ClassExtension(c) => c.properties.push(header_prop),
            _ => {}
        }
    }
}

fn merge_method(collection: &mut IntentionCollection, owner: IntentionId, header_method: IntentionId) {
    let Some(header_selector) = method_selector(collection, header_method) else { return };
    let existing = member_lists(collection, owner)
        .map(|(_, _, methods)| methods.into_iter().find(|id| method_selector(collection, *id).as_ref() == Some(&header_selector)));
    match existing.flatten() {
        Some(impl_method) => merge_method_pair(collection, impl_method, header_method),
        None => {
            collection.set_parent(header_method, Some(owner), "file_grouping");
            if let Some(node) = collection.get_mut(owner) {
                match &mut node.payload {
                    IntentionPayload::Class(c) => c.methods.push(header_method),
                    IntentionPayload::ClassExtension(c) => c.methods.push(header_method),
                    _ => {}
                }
            }
        }
    }
}

/// The declaration/implementation method-merge rule: parameter
/// names come from the implementation (`target`); an unspecified nullability
/// slot on the target is filled in from the header (`incoming`) if the
/// header specified one.
fn merge_method_pair(collection: &mut IntentionCollection, target_id: IntentionId, incoming_id: IntentionId) {
    let Some(IntentionPayload::Method(incoming)) = collection.get(incoming_id).map(|n| n.payload.clone()) else {
        return;
    };
    if let Some(node) = collection.get_mut(target_id) {
        if let IntentionPayload::Method(target) = &mut node.payload {
            target.signature.return_type = merge_nullability(&target.signature.return_type, &incoming.signature.return_type);
            for (t_param, i_param) in target.signature.params.iter_mut().zip(incoming.signature.params.iter()) {
                t_param.ty = merge_nullability(&t_param.ty, &i_param.ty);
            }
            if target.body.is_none() && incoming.body.is_some() {
                target.body = incoming.body;
            }
        }
    }
    collection.push_history(target_id, "file_grouping", "merged declaration from header (method merge)");
    collection.remove(incoming_id);
}

/// An `ImplicitlyUnwrapped` wrapping is this pipeline's "nullability
/// unspecified" marker; copy the incoming type over only when the
/// target is in that state and the incoming one is not.
fn merge_nullability(target: &SwiftType, incoming: &SwiftType) -> SwiftType {
    match (target, incoming) {
        (SwiftType::ImplicitlyUnwrapped(_), SwiftType::ImplicitlyUnwrapped(_)) => target.clone(),
        (SwiftType::ImplicitlyUnwrapped(_), _) => incoming.clone(),
        _ => target.clone(),
    }
}

#[cfg(test)]
mod file_grouping_tests {
    use super::*;
    use crate::intention::class::ClassData;
    use crate::intention::file::FileData;
    use crate::intention::method::Signature;
    use crate::selector::Selector;
    use swiftgen_core::Span;

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn header_only_type_moves_wholesale_into_implementation_file() {
        let mut col = IntentionCollection::new();
        let mut interner = Interner::new();
        let name = interner.intern("Foo");

        let header = col.insert(None, span(), false, IntentionPayload::File(FileData::new("Foo.h", FileKind::Header)));
        let impl_file = col.insert(None, span(), false, IntentionPayload::File(FileData::new("Foo.m", FileKind::Implementation)));
        let class_id = col.insert(Some(header), span(), false, IntentionPayload::Class(ClassData::new(name, None)));
        if let IntentionPayload::File(f) = &mut col.get_mut(header).unwrap().payload {
            f.types.push(class_id);
        }

        apply(&mut col, &mut interner);

        assert!(col.get(header).is_none());
        let IntentionPayload::File(f) = &col.get(impl_file).unwrap().payload else { panic!() };
        assert_eq!(f.types, vec![class_id]);
    }

    #[test]
    fn matching_method_merges_nullability_and_keeps_implementation_body() {
        let mut col = IntentionCollection::new();
        let mut interner = Interner::new();
        let class_name = interner.intern("Foo");
        let sel_name = interner.intern("run");

        let header = col.insert(None, span(), false, IntentionPayload::File(FileData::new("Foo.h", FileKind::Header)));
        let impl_file = col.insert(None, span(), false, IntentionPayload::File(FileData::new("Foo.m", FileKind::Implementation)));

        let header_class = col.insert(Some(header), span(), false, IntentionPayload::Class(ClassData::new(class_name, None)));
        let impl_class = col.insert(Some(impl_file), span(), false, IntentionPayload::Class(ClassData::new(class_name, None)));
        if let IntentionPayload::File(f) = &mut col.get_mut(header).unwrap().payload {
            f.types.push(header_class);
        }
        if let IntentionPayload::File(f) = &mut col.get_mut(impl_file).unwrap().payload {
            f.types.push(impl_class);
        }

        let nonopt = SwiftType::AnyObject;
        let implicit = SwiftType::ImplicitlyUnwrapped(Box::new(SwiftType::AnyObject));

        let header_method = col.insert(
            Some(header_class),
            span(),
            false,
            IntentionPayload::Method(MethodData {
                signature: Signature::new(Selector::unary(sel_name), vec![], nonopt.clone()),
                body: None,
                is_class_method: false,
                is_optional: false,
                is_override: false,
            }),
        );
        if let IntentionPayload::Class(c) = &mut col.get_mut(header_class).unwrap().payload {
            c.methods.push(header_method);
        }

        let body = crate::reader::swift_ast::Block { span: span(), stmts: vec![] };
        let impl_method = col.insert(
            Some(impl_class),
            span(),
            false,
            IntentionPayload::Method(MethodData {
                signature: Signature::new(Selector::unary(sel_name), vec![], implicit),
                body: Some(body.clone()),
                is_class_method: false,
                is_optional: false,
                is_override: false,
            }),
        );
        if let IntentionPayload::Class(c) = &mut col.get_mut(impl_class).unwrap().payload {
            c.methods.push(impl_method);
        }

        apply(&mut col, &mut interner);

        let IntentionPayload::Method(merged) = &col.get(impl_method).unwrap().payload else {
            panic!("expected method")
        };
        assert_eq!(merged.signature.return_type, nonopt);
        assert_eq!(merged.body, Some(body));
        assert!(col.get(header_method).is_none());
    }
}
