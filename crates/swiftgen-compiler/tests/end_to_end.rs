//! End-to-end scenarios: each test drives the intention graph through the
//! full translate-and-emit pipeline (structural passes, the body queue,
//! then the pretty-printer) and checks the rendered Swift text.
//!
//! Scenarios that hinge on an unambiguous CST shape go through
//! `StructuralReader`; the rest build their intentions directly, the same
//! way the emitter's own tests do, since the expression reader's CST
//! contract for message sends isn't exercised anywhere in this codebase.

use swiftgen_compiler::body_queue;
use swiftgen_compiler::config::TranslationOptions;
use swiftgen_compiler::cst::builder::TreeBuilder;
use swiftgen_compiler::cst::nodes::Root;
use swiftgen_compiler::cst::SyntaxKind;
use swiftgen_compiler::emit;
use swiftgen_compiler::intention::class::ClassData;
use swiftgen_compiler::intention::enum_::{EnumCase, EnumData};
use swiftgen_compiler::intention::file::{FileData, FileKind};
use swiftgen_compiler::intention::ivar::{AccessLevel, InstanceVariableData};
use swiftgen_compiler::intention::method::{MethodData, Signature};
use swiftgen_compiler::intention::property::{PropertyAttributes, PropertyData};
use swiftgen_compiler::intention::protocol::ProtocolData;
use swiftgen_compiler::intention::storage::{Ownership, Storage};
use swiftgen_compiler::intention::{IntentionCollection, IntentionPayload};
use swiftgen_compiler::passes;
use swiftgen_compiler::reader::swift_ast::{Block, Expr, Stmt};
use swiftgen_compiler::reader::{NonnullRegions, StructuralReader};
use swiftgen_compiler::selector::Selector;
use swiftgen_compiler::types::{MappingContext, Nullability, SwiftType, TypeMapper};
use swiftgen_core::{Interner, Span};

fn span() -> Span {
    Span::new(0, 1)
}

fn run_pipeline(mut collection: IntentionCollection, mut interner: Interner, options: &TranslationOptions) -> String {
    // Lets `RUST_LOG=trace cargo test -- --nocapture` show each pass's
    // `#[instrument]` spans; harmless if a prior test already installed one.
    let _ = tracing_subscriber::fmt().with_test_writer().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).try_init();

    let usage = passes::run_all(&mut collection, &mut interner);
    body_queue::run(&mut collection, &interner, &usage);
    emit::emit_all(&collection, &interner, options).expect("emit should succeed for a well-formed fixture")
}

/// A class with no declared superclass gets `NSObject`
/// inserted, reached through a real `@interface C @end` CST via the
/// structural reader rather than a hand-built intention.
#[test]
fn interface_with_no_superclass_becomes_nsobject_subclass() {
    let mut interner = Interner::new();
    let mut collection = IntentionCollection::new();

    let mut builder = TreeBuilder::new();
    builder.start_node(SyntaxKind::Root);
    builder.start_node(SyntaxKind::InterfaceDecl);
    builder.token(SyntaxKind::Ident, "C");
    builder.finish_node();
    builder.finish_node();
    let root = Root::cast(builder.finish()).expect("tree has a Root node");

    let mut reader = StructuralReader::new(&mut interner, &mut collection, NonnullRegions::default());
    reader.read_file(swiftgen_core::FileId::from_raw(0), "C.h", FileKind::Header, &root);

    let text = run_pipeline(collection, interner, &TranslationOptions::default());
    assert!(text.contains("class C: NSObject {"), "got:\n{text}");
}

/// A nullable `NSString*` property renders as an optional Swift `String`,
/// bridged by the type mapper rather than kept as a nominal `NSString`.
#[test]
fn nullable_nsstring_property_renders_as_optional_string() {
    let mut interner = Interner::new();
    let nsstring = interner.intern("NSString");

    let objc_ty = swiftgen_compiler::types::ObjcType::Named { name: nsstring, generic_args: vec![], is_pointer: true };
    let swift_ty = {
        let mut mapper = TypeMapper::new(&mut interner);
        let ctx = MappingContext::new(false, Nullability::Nullable);
        mapper.map(&objc_ty, ctx)
    };
    assert!(swift_ty.is_optional_like(), "expected an optional String, got {swift_ty:?}");

    let mut collection = IntentionCollection::new();
    let class_name = interner.intern("C");
    let prop_name = interner.intern("s");

    let file_id = collection.insert(None, span(), false, IntentionPayload::File(FileData::new("C.h", FileKind::Header)));
    let class_id = collection.insert(Some(file_id), span(), false, IntentionPayload::Class(ClassData::new(class_name, None)));
    let prop_id = collection.insert(
        Some(class_id),
        span(),
        false,
        IntentionPayload::Property(PropertyData::new(prop_name, Storage::new(swift_ty, Ownership::Strong, false), PropertyAttributes::default())),
    );
    if let IntentionPayload::Class(c) = &mut collection.get_mut(class_id).unwrap().payload {
        c.properties.push(prop_id);
    }
    if let IntentionPayload::File(f) = &mut collection.get_mut(file_id).unwrap().payload {
        f.types.push(class_id);
    }

    let text = run_pipeline(collection, interner, &TranslationOptions::default());
    assert!(text.contains("var s: String?"), "got:\n{text}");
}

/// A method body that sends itself a message renders as a
/// `self.` call. Built directly at the intention level: the expression
/// reader's `MessageExpr` convention for a receiver-less selector token
/// isn't exercised by any fixture in this codebase, so a CST-level
/// construction here would be guessing at an undocumented contract rather
/// than testing a resolved one.
#[test]
fn self_call_in_a_method_body_renders_as_a_self_dot_call() {
    let mut interner = Interner::new();
    let mut collection = IntentionCollection::new();

    let class_name = interner.intern("C");
    let method_name = interner.intern("m");

    let file_id = collection.insert(None, span(), false, IntentionPayload::File(FileData::new("C.m", FileKind::Implementation)));
    let class_id = collection.insert(Some(file_id), span(), false, IntentionPayload::Class(ClassData::new(class_name, None)));

    let body = Block {
        span: span(),
        stmts: vec![Stmt::Expr(Expr::Call {
            span: span(),
            receiver: Box::new(Expr::SelfExpr { span: span() }),
            method_name,
            args: vec![],
        })],
    };
    let method_id = collection.insert(
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
    if let IntentionPayload::Class(c) = &mut collection.get_mut(class_id).unwrap().payload {
        c.methods.push(method_id);
    }
    if let IntentionPayload::File(f) = &mut collection.get_mut(file_id).unwrap().payload {
        f.types.push(class_id);
    }

    let text = run_pipeline(collection, interner, &TranslationOptions::default());
    assert!(text.contains("self.m()"), "got:\n{text}");
}

/// A protocol declares `-(nonnull NSString*)f:(nullable NSObject*)o;` and a
/// conforming class redeclares `f:` with no nullability annotations of its
/// own (the default outside an assume-nonnull region). The conformance
/// nullability pass inherits the protocol's annotations onto the class's
/// method, so the emitted signature is `(NSObject?) -> String`, not the
/// implicitly-unwrapped shape the class's own declaration would have
/// produced on its own.
#[test]
fn conforming_method_inherits_nullability_from_its_protocol_requirement() {
    let mut interner = Interner::new();
    let mut collection = IntentionCollection::new();

    let proto_name = interner.intern("P");
    let method_name = interner.intern("f");
    let param_name = interner.intern("o");
    let nsstring = interner.intern("NSString");
    let nsobject = interner.intern("NSObject");

    let objc_string = swiftgen_compiler::types::ObjcType::Named { name: nsstring, generic_args: vec![], is_pointer: true };
    let objc_object = swiftgen_compiler::types::ObjcType::Named { name: nsobject, generic_args: vec![], is_pointer: true };

    let (proto_return_ty, proto_param_ty) = {
        let mut mapper = TypeMapper::new(&mut interner);
        let ret = mapper.map(&objc_string, MappingContext::new(true, Nullability::Nonnull));
        let param = mapper.map(&objc_object, MappingContext::new(true, Nullability::Nullable));
        (ret, param)
    };
    let (class_return_ty, class_param_ty) = {
        let mut mapper = TypeMapper::new(&mut interner);
        let ret = mapper.map(&objc_string, MappingContext::new(false, Nullability::Unspecified));
        let param = mapper.map(&objc_object, MappingContext::new(false, Nullability::Unspecified));
        (ret, param)
    };
    assert!(!proto_return_ty.is_optional_like(), "nonnull NSString* should bridge to a bare String");
    assert!(class_return_ty.is_optional_like(), "an unannotated class return type starts out implicitly unwrapped");

    let file_id = collection.insert(None, span(), false, IntentionPayload::File(FileData::new("P.h", FileKind::Header)));
    let proto_id = collection.insert(Some(file_id), span(), false, IntentionPayload::Protocol(ProtocolData::new(proto_name)));
    let proto_method_id = collection.insert(
        Some(proto_id),
        span(),
        false,
        IntentionPayload::Method(MethodData {
            signature: Signature::new(Selector::keyword(vec![method_name]), vec![swiftgen_compiler::intention::method::Param { name: param_name, ty: proto_param_ty }], proto_return_ty),
            body: None,
            is_class_method: false,
            is_optional: false,
            is_override: false,
        }),
    );
    if let IntentionPayload::Protocol(p) = &mut collection.get_mut(proto_id).unwrap().payload {
        p.methods.push(proto_method_id);
    }
    if let IntentionPayload::File(f) = &mut collection.get_mut(file_id).unwrap().payload {
        f.protocols.push(proto_id);
    }

    let class_name = interner.intern("C");
    let class_id = collection.insert(Some(file_id), span(), false, IntentionPayload::Class(ClassData::new(class_name, None)));
    let class_method_id = collection.insert(
        Some(class_id),
        span(),
        false,
        IntentionPayload::Method(MethodData {
            signature: Signature::new(Selector::keyword(vec![method_name]), vec![swiftgen_compiler::intention::method::Param { name: param_name, ty: class_param_ty }], class_return_ty),
            body: None,
            is_class_method: false,
            is_optional: false,
            is_override: false,
        }),
    );
    if let IntentionPayload::Class(c) = &mut collection.get_mut(class_id).unwrap().payload {
        c.methods.push(class_method_id);
        c.protocol_conformances.push(proto_name);
    }
    if let IntentionPayload::File(f) = &mut collection.get_mut(file_id).unwrap().payload {
        f.types.push(class_id);
    }

    let text = run_pipeline(collection, interner, &TranslationOptions::default());
    let class_line = text.lines().find(|l| l.contains("func f(")).expect("conforming method line");
    assert!(class_line.contains("func f(o: NSObject?) -> String"), "got:\n{class_line}");
}

/// An enum case referenced from a method body renders as
/// `.caseName` through a plain member-access expression, and the enum's own
/// declaration renders with its raw type and cases.
#[test]
fn enum_case_referenced_from_a_method_body_renders_alongside_its_declaration() {
    let mut interner = Interner::new();
    let mut collection = IntentionCollection::new();

    let enum_name = interner.intern("Direction");
    let case_name = interner.intern("north");
    let int_ty = interner.intern("Int");

    let file_id = collection.insert(None, span(), false, IntentionPayload::File(FileData::new("C.m", FileKind::Implementation)));
    let mut enum_data = EnumData::new(enum_name, SwiftType::Nominal { name: int_ty, generic_args: vec![] });
    enum_data.cases.push(EnumCase { name: case_name, raw_value: None });
    let enum_id = collection.insert(Some(file_id), span(), false, IntentionPayload::Enum(enum_data));

    let class_name = interner.intern("C");
    let method_name = interner.intern("north");
    let class_id = collection.insert(Some(file_id), span(), false, IntentionPayload::Class(ClassData::new(class_name, None)));
    let body = Block {
        span: span(),
        stmts: vec![Stmt::Return {
            span: span(),
            value: Some(Expr::MemberAccess {
                span: span(),
                receiver: Box::new(Expr::Ident { span: span(), name: enum_name, resolved_type: None }),
                member: case_name,
                optional_chained: false,
            }),
        }],
    };
    let method_id = collection.insert(
        Some(class_id),
        span(),
        false,
        IntentionPayload::Method(MethodData {
            signature: Signature::new(Selector::unary(method_name), vec![], SwiftType::Nominal { name: enum_name, generic_args: vec![] }),
            body: Some(body),
            is_class_method: false,
            is_optional: false,
            is_override: false,
        }),
    );
    if let IntentionPayload::Class(c) = &mut collection.get_mut(class_id).unwrap().payload {
        c.methods.push(method_id);
    }
    if let IntentionPayload::File(f) = &mut collection.get_mut(file_id).unwrap().payload {
        f.types.push(enum_id);
        f.types.push(class_id);
    }

    let text = run_pipeline(collection, interner, &TranslationOptions::default());
    assert!(text.contains("enum Direction: Int {"), "got:\n{text}");
    assert!(text.contains("case north"), "got:\n{text}");
    assert!(text.contains("Direction.north"), "got:\n{text}");
}

/// `@synthesize a = _a;` over a `readonly` property and a
/// `@private` ivar of the matching backing name collapses onto a single
/// `private(set)` stored property.
#[test]
fn readonly_property_synthesized_onto_a_private_ivar_becomes_private_set() {
    let mut interner = Interner::new();
    let mut collection = IntentionCollection::new();

    let class_name = interner.intern("C");
    let prop_name = interner.intern("a");
    let backing_name = interner.intern("_a");
    let int_ty = SwiftType::Nominal { name: interner.intern("Int"), generic_args: vec![] };

    let file_id = collection.insert(None, span(), false, IntentionPayload::File(FileData::new("C.m", FileKind::Implementation)));
    let mut class_data = ClassData::new(class_name, None);
    class_data.synthesize_pairs.push((prop_name, backing_name));
    let class_id = collection.insert(Some(file_id), span(), false, IntentionPayload::Class(class_data));

    let ivar_id = collection.insert(
        Some(class_id),
        span(),
        false,
        IntentionPayload::InstanceVariable(InstanceVariableData { name: backing_name, storage: Storage::new(int_ty.clone(), Ownership::Strong, false), access: AccessLevel::Private }),
    );
    let prop_id = collection.insert(
        Some(class_id),
        span(),
        false,
        IntentionPayload::Property(PropertyData::new(prop_name, Storage::new(int_ty, Ownership::Strong, false), PropertyAttributes { readonly: true, ..Default::default() })),
    );
    if let IntentionPayload::Class(c) = &mut collection.get_mut(class_id).unwrap().payload {
        c.ivars.push(ivar_id);
        c.properties.push(prop_id);
    }
    if let IntentionPayload::File(f) = &mut collection.get_mut(file_id).unwrap().payload {
        f.types.push(class_id);
    }

    let text = run_pipeline(collection, interner, &TranslationOptions::default());
    assert!(text.contains("private(set) var a: Int"), "got:\n{text}");
    assert!(!text.contains("_a"), "backing ivar should have been dropped, got:\n{text}");
}
