//! Declaration-level Swift pretty-printer: walks the finished intention
//! graph and renders one Swift source file's worth of text per input file,
//! in the order `typealiases, globals, types`, each type's members in the
//! order `ivars -> properties -> initializers -> methods`.

use swiftgen_core::{Interner, IntentionId};

use crate::config::TranslationOptions;
use crate::error::{EmitError, EmitResult};
use crate::intention::class::{ClassData, ClassExtensionData};
use crate::intention::enum_::EnumData;
use crate::intention::file::FileData;
use crate::intention::global::GlobalVariableData;
use crate::intention::ivar::InstanceVariableData;
use crate::intention::method::{GlobalFunctionData, InitializerData, MethodData, Signature};
use crate::intention::property::{PropertyData, PropertyMode};
use crate::intention::protocol::ProtocolData;
use crate::intention::struct_::StructData;
use crate::intention::{IntentionCollection, IntentionPayload};

use super::expr_emit::{render_block, render_expr};

const INDENT: &str = "    ";

/// Renders every file intention in the collection and joins the results,
/// one Swift source blob per input file separated by a blank line.
pub fn emit_all(collection: &IntentionCollection, interner: &Interner, options: &TranslationOptions) -> EmitResult<String> {
    let mut sections = Vec::new();
    for file_id in collection.files() {
        sections.push(emit_file(collection, interner, options, *file_id)?);
    }
    Ok(sections.join("\n"))
}

fn emit_file(collection: &IntentionCollection, interner: &Interner, options: &TranslationOptions, file_id: IntentionId) -> EmitResult<String> {
    let IntentionPayload::File(file) = &collection.get(file_id).ok_or(EmitError::Incomplete(file_id))?.payload else {
        return Err(EmitError::Incomplete(file_id));
    };

    let mut out = String::new();
    emit_history_comment(&mut out, collection, file_id, options);

    for alias in &file.typealiases {
        out.push_str(&format!("typealias {} = ", interner.resolve(alias.alias)));
        out.push_str(&type_name_for(collection, alias.target, interner));
        out.push('\n');
    }
    if !file.typealiases.is_empty() {
        out.push('\n');
    }

    for id in &file.globals {
        emit_global(&mut out, collection, interner, options, *id)?;
    }
    for id in &file.global_functions {
        emit_global_function(&mut out, collection, interner, options, *id)?;
    }
    if !file.globals.is_empty() || !file.global_functions.is_empty() {
        out.push('\n');
    }

    for id in &file.protocols {
        emit_protocol(&mut out, collection, interner, options, *id)?;
    }

    for id in &file.types {
        emit_type(&mut out, collection, interner, options, *id)?;
    }

    Ok(out)
}

fn type_name_for(collection: &IntentionCollection, id: IntentionId, interner: &Interner) -> String {
    match collection.get(id).map(|n| &n.payload) {
        Some(IntentionPayload::Class(c)) => interner.resolve(c.type_name).to_string(),
        Some(IntentionPayload::Struct(s)) => interner.resolve(s.type_name).to_string(),
        Some(IntentionPayload::Enum(e)) => interner.resolve(e.type_name).to_string(),
        Some(IntentionPayload::Protocol(p)) => interner.resolve(p.type_name).to_string(),
        _ => "AnyObject".to_string(),
    }
}

fn emit_history_comment(out: &mut String, collection: &IntentionCollection, id: IntentionId, options: &TranslationOptions) {
    if !options.print_intention_history {
        return;
    }
    let Some(node) = collection.get(id) else { return };
    if node.history.is_empty() {
        return;
    }
    out.push_str("// history:\n");
    for record in node.history.records() {
        out.push_str(&format!("//   {record}\n"));
    }
}

fn objc_attribute(options: &TranslationOptions) -> &'static str {
    if options.omit_objc_compatibility {
        ""
    } else {
        "@objc "
    }
}

fn emit_global(out: &mut String, collection: &IntentionCollection, interner: &Interner, options: &TranslationOptions, id: IntentionId) -> EmitResult<()> {
    let IntentionPayload::GlobalVariable(g) = &collection.get(id).ok_or(EmitError::Incomplete(id))?.payload else {
        return Err(EmitError::Incomplete(id));
    };
    emit_history_comment(out, collection, id, options);
    render_global(out, g, interner);
    Ok(())
}

fn render_global(out: &mut String, g: &GlobalVariableData, interner: &Interner) {
    let name = interner.resolve(g.name);
    let ty = g.storage.ty.render(interner);
    let rhs = g.initializer.as_ref().map(|e| format!(" = {}", render_expr(e, interner))).unwrap_or_default();
    out.push_str(&format!("{} {name}: {ty}{rhs}\n", g.storage.keyword()));
}

fn emit_global_function(out: &mut String, collection: &IntentionCollection, interner: &Interner, options: &TranslationOptions, id: IntentionId) -> EmitResult<()> {
    let IntentionPayload::GlobalFunction(g) = &collection.get(id).ok_or(EmitError::Incomplete(id))?.payload else {
        return Err(EmitError::Incomplete(id));
    };
    emit_history_comment(out, collection, id, options);
    render_global_function(out, g, interner);
    Ok(())
}

fn render_global_function(out: &mut String, g: &GlobalFunctionData, interner: &Interner) {
    out.push_str(&format!("func {} {{\n", render_signature(&g.signature, interner)));
    if let Some(body) = &g.body {
        out.push_str(&render_block(body, interner, 1));
    }
    out.push_str("}\n");
}

fn render_signature(sig: &Signature, interner: &Interner) -> String {
    let name = interner.resolve(sig.selector.swift_name());
    let params: Vec<String> = sig.params.iter().map(|p| format!("{}: {}", interner.resolve(p.name), p.ty.render(interner))).collect();
    let ret = match &sig.return_type {
        crate::types::SwiftType::Void => String::new(),
        other => format!(" -> {}", other.render(interner)),
    };
    format!("{name}({}){ret}", params.join(", "))
}

fn emit_protocol(out: &mut String, collection: &IntentionCollection, interner: &Interner, options: &TranslationOptions, id: IntentionId) -> EmitResult<()> {
    let IntentionPayload::Protocol(p) = &collection.get(id).ok_or(EmitError::Incomplete(id))?.payload else {
        return Err(EmitError::Incomplete(id));
    };
    emit_history_comment(out, collection, id, options);
    render_protocol(out, collection, interner, options, p)?;
    Ok(())
}

fn render_protocol(out: &mut String, collection: &IntentionCollection, interner: &Interner, options: &TranslationOptions, p: &ProtocolData) -> EmitResult<()> {
    out.push_str(&format!("{}protocol {} {{\n", objc_attribute(options), interner.resolve(p.type_name)));
    for id in &p.properties {
        if let Some(IntentionPayload::Property(prop)) = collection.get(*id).map(|n| &n.payload) {
            out.push_str(&format!("{INDENT}var {}: {} {{ get{} }}\n", interner.resolve(prop.name), prop.storage.ty.render(interner), if prop.attributes.readonly { "" } else { " set" }));
        }
    }
    for id in &p.methods {
        if let Some(IntentionPayload::Method(m)) = collection.get(*id).map(|n| &n.payload) {
            out.push_str(&format!("{INDENT}func {}\n", render_signature(&m.signature, interner)));
        }
    }
    out.push_str("}\n\n");
    Ok(())
}

fn emit_type(out: &mut String, collection: &IntentionCollection, interner: &Interner, options: &TranslationOptions, id: IntentionId) -> EmitResult<()> {
    let payload = &collection.get(id).ok_or(EmitError::Incomplete(id))?.payload;
    emit_history_comment(out, collection, id, options);
    match payload {
        IntentionPayload::Class(c) => render_class(out, collection, interner, options, c),
        IntentionPayload::ClassExtension(c) => render_class_extension(out, collection, interner, options, c),
        IntentionPayload::Struct(s) => render_struct(out, collection, interner, s),
        IntentionPayload::Enum(e) => Ok(render_enum(out, interner, e)),
        _ => Err(EmitError::Incomplete(id)),
    }
}

fn render_class(out: &mut String, collection: &IntentionCollection, interner: &Interner, options: &TranslationOptions, c: &ClassData) -> EmitResult<()> {
    let superclass = if options.omit_objc_compatibility {
        c.superclass_name.map(|s| interner.resolve(s).to_string())
    } else {
        Some(c.superclass_name.map(|s| interner.resolve(s).to_string()).unwrap_or_else(|| "NSObject".to_string()))
    };
    let mut bases = Vec::new();
    if let Some(sup) = superclass {
        bases.push(sup);
    }
    bases.extend(c.protocol_conformances.iter().map(|s| interner.resolve(*s).to_string()));
    let inheritance = if bases.is_empty() { String::new() } else { format!(": {}", bases.join(", ")) };

    out.push_str(&format!("{}class {}{inheritance} {{\n", objc_attribute(options), interner.resolve(c.type_name)));
    render_members(out, collection, interner, options, &c.ivars, &c.properties, &c.initializers, &c.methods)?;
    out.push_str("}\n\n");
    Ok(())
}

fn render_class_extension(
    out: &mut String,
    collection: &IntentionCollection,
    interner: &Interner,
    options: &TranslationOptions,
    c: &ClassExtensionData,
) -> EmitResult<()> {
    if let Some(category) = c.category_name {
        out.push_str(&format!("// MARK: - {} ({})\n", interner.resolve(c.type_name), interner.resolve(category)));
    } else {
        out.push_str(&format!("// MARK: - {}\n", interner.resolve(c.type_name)));
    }
    let conformance = if c.protocol_conformances.is_empty() {
        String::new()
    } else {
        format!(": {}", c.protocol_conformances.iter().map(|s| interner.resolve(*s).to_string()).collect::<Vec<_>>().join(", "))
    };
    out.push_str(&format!("extension {}{conformance} {{\n", interner.resolve(c.type_name)));
    render_members(out, collection, interner, options, &c.ivars, &c.properties, &c.initializers, &c.methods)?;
    out.push_str("}\n\n");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn render_members(
    out: &mut String,
    collection: &IntentionCollection,
    interner: &Interner,
    options: &TranslationOptions,
    ivars: &[IntentionId],
    properties: &[IntentionId],
    initializers: &[IntentionId],
    methods: &[IntentionId],
) -> EmitResult<()> {
    for id in ivars {
        if let Some(IntentionPayload::InstanceVariable(v)) = collection.get(*id).map(|n| &n.payload) {
            render_ivar(out, v, interner);
        }
    }
    for id in properties {
        if let Some(IntentionPayload::Property(p)) = collection.get(*id).map(|n| &n.payload) {
            render_property(out, p, interner);
        }
    }
    for id in initializers {
        if let Some(IntentionPayload::Initializer(i)) = collection.get(*id).map(|n| &n.payload) {
            render_initializer(out, i, interner, options);
        }
    }
    for id in methods {
        if let Some(IntentionPayload::Method(m)) = collection.get(*id).map(|n| &n.payload) {
            render_method(out, m, interner, options);
        }
    }
    Ok(())
}

fn render_ivar(out: &mut String, v: &InstanceVariableData, interner: &Interner) {
    out.push_str(&format!(
        "{INDENT}{} {} {}: {}\n",
        v.access.swift_keyword(),
        v.storage.keyword(),
        interner.resolve(v.name),
        v.storage.ty.render(interner)
    ));
}

fn render_property(out: &mut String, p: &PropertyData, interner: &Interner) {
    let name = interner.resolve(p.name);
    let ty = p.storage.ty.render(interner);
    match &p.mode {
        PropertyMode::Field => {
            let access = if p.restricted_set { "private(set) " } else { "" };
            out.push_str(&format!("{INDENT}{access}var {name}: {ty}\n"));
        }
        PropertyMode::Getter { body } => {
            out.push_str(&format!("{INDENT}var {name}: {ty} {{\n"));
            out.push_str(&render_block(body, interner, 2));
            out.push_str(&format!("{INDENT}}}\n"));
        }
        PropertyMode::GetterSetter { getter, setter, setter_param } => {
            out.push_str(&format!("{INDENT}var {name}: {ty} {{\n"));
            out.push_str(&format!("{INDENT}{INDENT}get {{\n"));
            out.push_str(&render_block(getter, interner, 3));
            out.push_str(&format!("{INDENT}{INDENT}}}\n"));
            out.push_str(&format!("{INDENT}{INDENT}set({}) {{\n", interner.resolve(*setter_param)));
            out.push_str(&render_block(setter, interner, 3));
            out.push_str(&format!("{INDENT}{INDENT}}}\n"));
            out.push_str(&format!("{INDENT}}}\n"));
        }
    }
}

fn render_initializer(out: &mut String, i: &InitializerData, interner: &Interner, options: &TranslationOptions) {
    let over = if i.is_override { "override " } else { "" };
    out.push_str(&format!("{INDENT}{}{}init({}) {{\n", objc_attribute(options), over, render_init_params(i, interner)));
    if let Some(body) = &i.body {
        out.push_str(&render_block(body, interner, 2));
    }
    out.push_str(&format!("{INDENT}}}\n"));
}

fn render_init_params(i: &InitializerData, interner: &Interner) -> String {
    i.signature.params.iter().map(|p| format!("{}: {}", interner.resolve(p.name), p.ty.render(interner))).collect::<Vec<_>>().join(", ")
}

fn render_method(out: &mut String, m: &MethodData, interner: &Interner, options: &TranslationOptions) {
    let over = if m.is_override { "override " } else { "" };
    let class_kw = if m.is_class_method { "class " } else { "" };
    out.push_str(&format!("{INDENT}{}{class_kw}{over}func {} {{\n", objc_attribute(options), render_signature(&m.signature, interner)));
    if let Some(body) = &m.body {
        out.push_str(&render_block(body, interner, 2));
    }
    out.push_str(&format!("{INDENT}}}\n"));
}

fn render_struct(out: &mut String, collection: &IntentionCollection, interner: &Interner, s: &StructData) -> EmitResult<()> {
    out.push_str(&format!("struct {} {{\n", interner.resolve(s.type_name)));
    for id in &s.ivars {
        if let Some(IntentionPayload::InstanceVariable(v)) = collection.get(*id).map(|n| &n.payload) {
            render_ivar(out, v, interner);
        }
    }
    out.push_str("}\n\n");
    Ok(())
}

fn render_enum(out: &mut String, interner: &Interner, e: &EnumData) {
    out.push_str(&format!("enum {}: {} {{\n", interner.resolve(e.type_name), e.raw_type.render(interner)));
    for case in &e.cases {
        let raw = case.raw_value.as_ref().map(|v| format!(" = {v}")).unwrap_or_default();
        out.push_str(&format!("{INDENT}case {}{raw}\n", interner.resolve(case.name)));
    }
    out.push_str("}\n\n");
}

#[cfg(test)]
mod emitter_tests {
    use super::*;
    use crate::intention::file::FileKind;
    use crate::intention::ivar::AccessLevel;
    use crate::intention::property::PropertyAttributes;
    use crate::intention::storage::{Ownership, Storage};
    use crate::types::SwiftType;
    use swiftgen_core::Span;

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn class_with_no_superclass_gets_nsobject_under_default_options() {
        let mut col = IntentionCollection::new();
        let mut interner = Interner::new();
        let name = interner.intern("C");

        let file_id = col.insert(None, span(), false, IntentionPayload::File(FileData::new("C.m", FileKind::Implementation)));
        let class_id = col.insert(Some(file_id), span(), false, IntentionPayload::Class(ClassData::new(name, None)));
        if let IntentionPayload::File(f) = &mut col.get_mut(file_id).unwrap().payload {
            f.types.push(class_id);
        }

        let options = TranslationOptions::default();
        let text = emit_all(&col, &interner, &options).unwrap();
        assert!(text.contains("class C: NSObject {"));
    }

    #[test]
    fn omit_objc_compatibility_drops_the_nsobject_base_and_attribute() {
        let mut col = IntentionCollection::new();
        let mut interner = Interner::new();
        let name = interner.intern("C");

        let file_id = col.insert(None, span(), false, IntentionPayload::File(FileData::new("C.m", FileKind::Implementation)));
        let class_id = col.insert(Some(file_id), span(), false, IntentionPayload::Class(ClassData::new(name, None)));
        if let IntentionPayload::File(f) = &mut col.get_mut(file_id).unwrap().payload {
            f.types.push(class_id);
        }

        let options = TranslationOptions { omit_objc_compatibility: true, print_intention_history: false };
        let text = emit_all(&col, &interner, &options).unwrap();
        assert!(text.contains("class C {"));
        assert!(!text.contains("@objc"));
    }

    #[test]
    fn nullable_property_renders_as_optional_string_with_objc() {
        let mut col = IntentionCollection::new();
        let mut interner = Interner::new();
        let class_name = interner.intern("C");
        let prop_name = interner.intern("s");
        let string_ty = interner.intern("String");

        let file_id = col.insert(None, span(), false, IntentionPayload::File(FileData::new("C.h", FileKind::Header)));
        let class_id = col.insert(Some(file_id), span(), false, IntentionPayload::Class(ClassData::new(class_name, None)));
        let prop_id = col.insert(
            Some(class_id),
            span(),
            false,
            IntentionPayload::Property(PropertyData::new(
                prop_name,
                Storage::new(SwiftType::Optional(Box::new(SwiftType::Nominal { name: string_ty, generic_args: vec![] })), Ownership::Strong, false),
                PropertyAttributes::default(),
            )),
        );
        if let IntentionPayload::Class(c) = &mut col.get_mut(class_id).unwrap().payload {
            c.properties.push(prop_id);
        }
        if let IntentionPayload::File(f) = &mut col.get_mut(file_id).unwrap().payload {
            f.types.push(class_id);
        }

        let options = TranslationOptions::default();
        let text = emit_all(&col, &interner, &options).unwrap();
        assert!(text.contains("var s: String?"));
        assert!(text.contains("@objc class C"));
    }

    #[test]
    fn ivar_renders_with_access_keyword_and_storage_keyword() {
        let mut interner = Interner::new();
        let name = interner.intern("_x");
        let mut out = String::new();
        render_ivar(
            &mut out,
            &InstanceVariableData { name, storage: Storage::new(SwiftType::AnyObject, Ownership::Strong, false), access: AccessLevel::Private },
            &interner,
        );
        assert_eq!(out, "    private var _x: AnyObject\n");
    }
}
