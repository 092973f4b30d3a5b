//! Pins the exact emitted Swift text for a small, representative intention
//! graph.

use swiftgen_compiler::config::TranslationOptions;
use swiftgen_compiler::emit;
use swiftgen_compiler::intention::class::ClassData;
use swiftgen_compiler::intention::file::{FileData, FileKind};
use swiftgen_compiler::intention::property::{PropertyAttributes, PropertyData};
use swiftgen_compiler::intention::storage::{Ownership, Storage};
use swiftgen_compiler::intention::{IntentionCollection, IntentionPayload};
use swiftgen_compiler::types::SwiftType;
use swiftgen_core::{Interner, Span};

#[test]
fn a_class_with_one_stored_property_renders_as_an_objc_nsobject_subclass() {
    let mut interner = Interner::new();
    let mut collection = IntentionCollection::new();
    let class_name = interner.intern("C");
    let prop_name = interner.intern("x");
    let int_ty = SwiftType::Nominal { name: interner.intern("Int"), generic_args: vec![] };

    let file_id = collection.insert(None, Span::new(0, 1), false, IntentionPayload::File(FileData::new("C.h", FileKind::Header)));
    let class_id = collection.insert(Some(file_id), Span::new(0, 1), false, IntentionPayload::Class(ClassData::new(class_name, None)));
    let prop_id = collection.insert(
        Some(class_id),
        Span::new(0, 1),
        false,
        IntentionPayload::Property(PropertyData::new(prop_name, Storage::new(int_ty, Ownership::Strong, false), PropertyAttributes::default())),
    );
    if let IntentionPayload::Class(c) = &mut collection.get_mut(class_id).unwrap().payload {
        c.properties.push(prop_id);
    }
    if let IntentionPayload::File(f) = &mut collection.get_mut(file_id).unwrap().payload {
        f.types.push(class_id);
    }

    let text = emit::emit_all(&collection, &interner, &TranslationOptions::default()).unwrap();
    assert_eq!(text, "@objc class C: NSObject {\n    var x: Int\n}\n\n");
}
