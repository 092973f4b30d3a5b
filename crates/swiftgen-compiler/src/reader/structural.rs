//! Structural reader: walks the top-level Objective-C CST and produces
//! intentions.
//!
//! One `StructuralReader` is constructed per source file; the caller wires
//! its context stack (current file, assume-nonnull region, current type,
//! ivar access level).

use swiftgen_core::{FileId, Interner, Span, Symbol};

use crate::cst::nodes::{self, MemberHost as _};
use crate::cst::{SyntaxKind, SyntaxNode};
use crate::intention::class::{ClassData, ClassExtensionData};
use crate::intention::enum_::{EnumCase, EnumData};
use crate::intention::file::{FileData, FileKind, Typealias};
use crate::intention::global::GlobalVariableData;
use crate::intention::ivar::{AccessLevel, InstanceVariableData};
use crate::intention::method::{MethodData, Param, Signature};
use crate::intention::property::{PropertyAttributes, PropertyData};
use crate::intention::protocol::ProtocolData;
use crate::intention::storage::{Ownership, Storage};
use crate::intention::struct_::StructData;
use crate::intention::{IntentionCollection, IntentionPayload};
use crate::selector::Selector;
use crate::types::{MappingContext, Nullability, ObjcType, Primitive, TypeMapper};
use swiftgen_core::IntentionId;

use super::context::{NonnullRegions, ReaderContext};

pub struct StructuralReader<'a> {
    pub interner: &'a mut Interner,
    pub collection: &'a mut IntentionCollection,
    nonnull_regions: NonnullRegions,
}

impl<'a> StructuralReader<'a> {
    pub fn new(
        interner: &'a mut Interner,
        collection: &'a mut IntentionCollection,
        nonnull_regions: NonnullRegions,
    ) -> Self {
        Self {
            interner,
            collection,
            nonnull_regions,
        }
    }

    pub fn read_file(&mut self, file_id: FileId, path: &str, kind: FileKind, root: &nodes::Root) -> IntentionId {
        let file_span = node_span(root.syntax());
        let file_payload = IntentionPayload::File(FileData::new(path, kind));
        let file_intention = self.collection.insert(None, file_span, false, file_payload);

        let mut ctx = ReaderContext::new(file_id, file_intention);

        for decl in root.top_level_decls() {
            self.read_top_level(&mut ctx, decl);
        }

        file_intention
    }

    fn in_region(&self, node: &SyntaxNode) -> bool {
        self.nonnull_regions.contains(u32::from(node.text_range().start()))
    }

    fn read_top_level(&mut self, ctx: &mut ReaderContext, decl: nodes::TopLevelDecl) {
        use nodes::TopLevelDecl::*;
        match decl {
            Interface(n) => self.read_interface(ctx, &n),
            Implementation(n) => self.read_implementation(ctx, &n),
            Category(n) => self.read_category(ctx, &n),
            CategoryImpl(n) => self.read_category_impl(ctx, &n),
            Protocol(n) => self.read_protocol(ctx, &n),
            Typedef(n) => self.read_typedef(ctx, &n),
            Enum(n) => {
                self.read_enum(ctx, &n);
            }
            Struct(n) => self.read_struct(ctx, &n),
            GlobalVar(n) => self.read_global_var(ctx, &n),
            Unknown(_) => {}
        }
    }

    fn read_interface(&mut self, ctx: &mut ReaderContext, node: &nodes::InterfaceDecl) {
        let Some(name_tok) = node.name_token() else { return };
        let name = self.interner.intern(name_tok.text());
        let superclass = node.superclass_name().map(|s| self.interner.intern(&s));

        let in_region = self.in_region(node.syntax());
        let span = node_span(node.syntax());
        let payload = IntentionPayload::Class(ClassData::new(name, superclass));
        let class_id = self.collection.insert(Some(ctx.file_intention), span, in_region, payload);
        self.link_type_to_file(ctx.file_intention, class_id);

        let mut type_ctx = ctx.enter_type(class_id);
        if let Some(ivar_list) = node.ivar_list() {
            self.read_ivars(&mut type_ctx, class_id, &ivar_list);
        }
        for prop in node.property_decls() {
            self.read_property(class_id, &prop);
        }
        for method in node.method_decls() {
            self.read_method_decl_only(class_id, &method);
        }
    }

    fn read_implementation(&mut self, ctx: &mut ReaderContext, node: &nodes::ImplementationDecl) {
        let Some(name_tok) = node.name_token() else { return };
        let name = self.interner.intern(name_tok.text());

        let in_region = self.in_region(node.syntax());
        let span = node_span(node.syntax());
        let payload = IntentionPayload::Class(ClassData::new(name, None));
        let class_id = self.collection.insert(Some(ctx.file_intention), span, in_region, payload);
        self.link_type_to_file(ctx.file_intention, class_id);

        let mut type_ctx = ctx.enter_type(class_id);
        if let Some(ivar_list) = node.ivar_list() {
            self.read_ivars(&mut type_ctx, class_id, &ivar_list);
        }
        for method in node.method_decls() {
            self.read_method_with_body(class_id, &method);
        }
        // `@synthesize`/`@dynamic` directives are read here but acted on by
        // the Synthesize Backing Field pass; the reader only records
        // them as plain data on the owning property once found by name.
        for synth in node.synthesize_decls() {
            self.apply_synthesize(class_id, &synth);
        }
    }

    fn read_category(&mut self, ctx: &mut ReaderContext, node: &nodes::CategoryDecl) {
        let Some(class_name_tok) = node.class_name_token() else { return };
        let type_name = self.interner.intern(class_name_tok.text());
        let category_name = node.category_name_token().map(|t| self.interner.intern(t.text()));

        let in_region = self.in_region(node.syntax());
        let span = node_span(node.syntax());
        let payload = IntentionPayload::ClassExtension(ClassExtensionData::new(type_name, category_name));
        let ext_id = self.collection.insert(Some(ctx.file_intention), span, in_region, payload);
        self.link_type_to_file(ctx.file_intention, ext_id);

        for prop in node.property_decls() {
            self.read_property(ext_id, &prop);
        }
        for method in node.method_decls() {
            self.read_method_decl_only(ext_id, &method);
        }
    }

    fn read_category_impl(&mut self, ctx: &mut ReaderContext, node: &nodes::CategoryImplDecl) {
        let Some(class_name_tok) = node.class_name_token() else { return };
        let type_name = self.interner.intern(class_name_tok.text());
        let category_name = node.category_name_token().map(|t| self.interner.intern(t.text()));

        let in_region = self.in_region(node.syntax());
        let span = node_span(node.syntax());
        let payload = IntentionPayload::ClassExtension(ClassExtensionData::new(type_name, category_name));
        let ext_id = self.collection.insert(Some(ctx.file_intention), span, in_region, payload);
        self.link_type_to_file(ctx.file_intention, ext_id);

        for method in node.method_decls() {
            self.read_method_with_body(ext_id, &method);
        }
    }

    fn read_protocol(&mut self, ctx: &mut ReaderContext, node: &nodes::ProtocolDecl) {
        let Some(name_tok) = node.name_token() else { return };
        let name = self.interner.intern(name_tok.text());

        let in_region = self.in_region(node.syntax());
        let span = node_span(node.syntax());
        let payload = IntentionPayload::Protocol(ProtocolData::new(name));
        let proto_id = self.collection.insert(Some(ctx.file_intention), span, in_region, payload);
        if let Some(node_mut) = self.collection.get_mut(ctx.file_intention) {
            if let IntentionPayload::File(f) = &mut node_mut.payload {
                f.protocols.push(proto_id);
            }
        }

        // `@optional`/`@required` region tracking: scan member tokens in
        // order and flip the running flag at each marker keyword.
        let mut optional = false;
        for child in node.syntax().children_with_tokens() {
            match child {
                rowan::NodeOrToken::Token(t) if t.kind() == SyntaxKind::KwOptional => optional = true,
                rowan::NodeOrToken::Token(t) if t.kind() == SyntaxKind::KwRequired => optional = false,
                rowan::NodeOrToken::Node(n) if n.kind() == SyntaxKind::PropertyDecl => {
                    if let Some(prop) = nodes::PropertyDecl::cast(n) {
                        self.read_property(proto_id, &prop);
                    }
                }
                rowan::NodeOrToken::Node(n) if n.kind() == SyntaxKind::MethodDecl => {
                    if let Some(method) = nodes::MethodDecl::cast(n) {
                        let method_id = self.read_method_decl_only(proto_id, &method);
                        if optional {
                            if let Some(node) = self.collection.get_mut(method_id) {
                                if let IntentionPayload::Method(m) = &mut node.payload {
                                    m.is_optional = true;
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn read_typedef(&mut self, ctx: &mut ReaderContext, node: &nodes::TypedefDecl) {
        let Some(enum_decl) = node.enum_decl() else { return };
        let enum_id = self.read_enum(ctx, &enum_decl);
        if let Some(alias_name) = node.alias_name() {
            let alias = self.interner.intern(&alias_name);
            if let Some(file_node) = self.collection.get_mut(ctx.file_intention) {
                if let IntentionPayload::File(f) = &mut file_node.payload {
                    f.typealiases.push(Typealias { alias, target: enum_id });
                }
            }
        }
    }

    fn read_enum(&mut self, ctx: &mut ReaderContext, node: &nodes::EnumDecl) -> IntentionId {
        let raw_objc_type = node
            .raw_type()
            .and_then(|t| t.base_name())
            .and_then(|n| Primitive::from_name(&n))
            .unwrap_or(Primitive::NsInteger);
        let mut mapper = TypeMapper::new(self.interner);
        let raw_type = mapper.map(
            &ObjcType::Primitive(raw_objc_type),
            MappingContext::new(true, Nullability::Unspecified),
        );

        // Name the enum after its first typedef alias if called from
        // `read_typedef`; otherwise fall back to an anonymous placeholder.
        let name_sym = self.interner.intern("AnonymousEnum");
        let mut data = EnumData::new(name_sym, raw_type);
        for case in node.cases() {
            if let Some(tok) = case.name_token() {
                data.cases.push(EnumCase {
                    name: self.interner.intern(tok.text()),
                    raw_value: None,
                });
            }
        }

        let span = node_span(node.syntax());
        let payload = IntentionPayload::Enum(data);
        let enum_id = self.collection.insert(Some(ctx.file_intention), span, true, payload);
        self.link_type_to_file(ctx.file_intention, enum_id);
        enum_id
    }

    fn read_struct(&mut self, ctx: &mut ReaderContext, node: &nodes::StructDecl) {
        let Some(name_tok) = node.name_token() else { return };
        let name = self.interner.intern(name_tok.text());
        let span = node_span(node.syntax());
        let mut data = StructData::new(name);

        let struct_id = self.collection.insert(Some(ctx.file_intention), span, true, IntentionPayload::Struct(data.clone()));
        for ivar in node.ivars() {
            let Some(ivar_name_tok) = ivar.name_token() else { continue };
            let ivar_name = self.interner.intern(ivar_name_tok.text());
            let storage = self.storage_for_type_ref(ivar.type_ref(), true, Nullability::Unspecified);
            let ivar_span = node_span(ivar.syntax());
            let ivar_id = self.collection.insert(
                Some(struct_id),
                ivar_span,
                true,
                IntentionPayload::InstanceVariable(InstanceVariableData {
                    name: ivar_name,
                    storage,
                    access: AccessLevel::Public,
                }),
            );
            data.ivars.push(ivar_id);
        }
        if let Some(node_mut) = self.collection.get_mut(struct_id) {
            node_mut.payload = IntentionPayload::Struct(data);
        }
        self.link_type_to_file(ctx.file_intention, struct_id);
    }

    fn read_global_var(&mut self, ctx: &mut ReaderContext, node: &nodes::GlobalVarDecl) {
        let Some(name_tok) = node.name_token() else { return };
        let name = self.interner.intern(name_tok.text());
        let in_region = self.in_region(node.syntax());
        let storage = self.storage_for_type_ref(node.type_ref(), in_region, Nullability::Unspecified);
        let span = node_span(node.syntax());
        let payload = IntentionPayload::GlobalVariable(GlobalVariableData {
            name,
            storage,
            initializer: None,
        });
        let id = self.collection.insert(Some(ctx.file_intention), span, in_region, payload);
        if let Some(file_node) = self.collection.get_mut(ctx.file_intention) {
            if let IntentionPayload::File(f) = &mut file_node.payload {
                f.globals.push(id);
            }
        }
    }

    fn read_ivars(&mut self, ctx: &mut ReaderContext, owner: IntentionId, ivar_list: &nodes::IvarList) {
        let mut current_access = ctx.ivar_access_level;
        for ivar in ivar_list.ivars() {
            if let Some(explicit) = ivar.explicit_access_keyword() {
                current_access = match explicit {
                    SyntaxKind::KwPrivate => AccessLevel::Private,
                    SyntaxKind::KwProtected => AccessLevel::Protected,
                    SyntaxKind::KwPackage => AccessLevel::Package,
                    SyntaxKind::KwPublic => AccessLevel::Public,
                    _ => current_access,
                };
            }
            let Some(name_tok) = ivar.name_token() else { continue };
            let name = self.interner.intern(name_tok.text());
            let in_region = self.in_region(ivar.syntax());
            let storage = self.storage_for_type_ref(ivar.type_ref(), in_region, Nullability::Unspecified);
            let span = node_span(ivar.syntax());
            let payload = IntentionPayload::InstanceVariable(InstanceVariableData {
                name,
                storage,
                access: current_access,
            });
            let ivar_id = self.collection.insert(Some(owner), span, in_region, payload);
            self.push_ivar(owner, ivar_id);
        }
        ctx.ivar_access_level = current_access;
    }

    fn read_property(&mut self, owner: IntentionId, node: &nodes::PropertyDecl) {
        let Some(name_tok) = node.name_token() else { return };
        let name = self.interner.intern(name_tok.text());
        let attr_texts: Vec<String> = node.attr_tokens().iter().map(|t| t.text().to_string()).collect();
        let attrs = PropertyAttributes {
            weak: attr_texts.iter().any(|a| a == "weak"),
            assign: attr_texts.iter().any(|a| a == "assign"),
            copy: attr_texts.iter().any(|a| a == "copy"),
            readonly: attr_texts.iter().any(|a| a == "readonly"),
            is_class: attr_texts.iter().any(|a| a == "class"),
        };
        let explicit_null = if attr_texts.iter().any(|a| a == "nullable") {
            Nullability::Nullable
        } else if attr_texts.iter().any(|a| a == "nonnull") {
            Nullability::Nonnull
        } else {
            Nullability::Unspecified
        };
        let in_region = self.in_region(node.syntax());
        let storage = self.storage_for_type_ref(node.type_ref(), in_region, explicit_null);
        let span = node_span(node.syntax());
        let payload = IntentionPayload::Property(PropertyData::new(name, storage, attrs));
        let prop_id = self.collection.insert(Some(owner), span, in_region, payload);
        self.push_property(owner, prop_id);
    }

    fn read_method_decl_only(&mut self, owner: IntentionId, node: &nodes::MethodDecl) -> IntentionId {
        self.read_method(owner, node, false)
    }

    fn read_method_with_body(&mut self, owner: IntentionId, node: &nodes::MethodDecl) -> IntentionId {
        self.read_method(owner, node, true)
    }

    fn read_method(&mut self, owner: IntentionId, node: &nodes::MethodDecl, read_body: bool) -> IntentionId {
        let keyword_idents = node.selector_keyword_tokens();
        let keywords: Vec<Symbol> = keyword_idents.iter().map(|t| self.interner.intern(t.text())).collect();
        let param_nodes = node.params();
        // `keywords.len()` alone can't distinguish `run` (0 args) from
        // `run:` (1 arg, one label) — the param list is the only place that
        // arity actually lives.
        let selector = if param_nodes.is_empty() {
            Selector::unary(keywords.first().copied().unwrap_or_else(|| self.interner.intern("unknown")))
        } else {
            Selector::keyword(keywords)
        };

        let in_region = self.in_region(node.syntax());
        let params: Vec<Param> = param_nodes
            .iter()
            .map(|p| {
                let name = p
                    .name_token()
                    .map(|t| self.interner.intern(t.text()))
                    .unwrap_or_else(|| self.interner.intern("_"));
                let storage = self.storage_for_type_ref(p.type_ref(), in_region, Nullability::Unspecified);
                Param { name, ty: storage.ty }
            })
            .collect();

        let return_storage = self.storage_for_type_ref(node.return_type(), in_region, Nullability::Unspecified);

        let signature = Signature::new(selector, params, return_storage.ty);
        let body = if read_body {
            node.body().map(|compound| {
                let mut stmt_reader = super::stmt::StmtReader::new(self.interner);
                stmt_reader.lower_compound(&compound)
            })
        } else {
            None
        };

        let span = node_span(node.syntax());
        let payload = IntentionPayload::Method(MethodData {
            signature,
            body,
            is_class_method: node.is_class_method(),
            is_optional: false,
            is_override: false,
        });
        let method_id = self.collection.insert(Some(owner), span, in_region, payload);
        self.push_method(owner, method_id);
        method_id
    }

    fn apply_synthesize(&mut self, owner: IntentionId, synth: &nodes::SynthesizeDecl) {
        let Some((property, backing)) = synth.pair() else { return };
        let property_sym = self.interner.intern(&property);
        let backing_sym = self.interner.intern(&backing);
        if let Some(node) = self.collection.get_mut(owner) {
            if let IntentionPayload::Class(c) = &mut node.payload {
                c.synthesize_pairs.push((property_sym, backing_sym));
            }
        }
        // The actual property/ivar rewrite happens once structural reading
        // for the whole file is complete, in the Synthesize Backing Field
        // pass.
        self.collection.push_history(owner, "reader", "observed @synthesize directive");
    }

    fn storage_for_type_ref(
        &mut self,
        type_ref: Option<nodes::TypeRef>,
        in_region: bool,
        explicit_override: Nullability,
    ) -> Storage {
        let Some(type_ref) = type_ref else {
            return Storage::new(crate::types::SwiftType::AnyObject, Ownership::Strong, false);
        };
        let objc_ty = objc_type_from_type_ref(&type_ref, self.interner);
        let explicit = nullability_from_type_ref(&type_ref).merge_into(explicit_override);
        let mut mapper = TypeMapper::new(self.interner);
        let ty = mapper.map(&objc_ty, MappingContext::new(in_region, explicit));
        let ownership = ownership_from_type_ref(&type_ref);
        Storage::new(ty, ownership, false)
    }

    fn link_type_to_file(&mut self, file_id: IntentionId, type_id: IntentionId) {
        if let Some(file_node) = self.collection.get_mut(file_id) {
            if let IntentionPayload::File(f) = &mut file_node.payload {
                f.types.push(type_id);
            }
        }
    }

    fn push_ivar(&mut self, owner: IntentionId, ivar_id: IntentionId) {
        if let Some(node) = self.collection.get_mut(owner) {
            match &mut node.payload {
                IntentionPayload::Class(c) => c.ivars.push(ivar_id),
                IntentionPayload::ClassExtension(c) => c.ivars.push(ivar_id),
                IntentionPayload::Struct(s) => s.ivars.push(ivar_id),
                _ => {}
            }
        }
    }

    fn push_property(&mut self, owner: IntentionId, prop_id: IntentionId) {
        if let Some(node) = self.collection.get_mut(owner) {
            match &mut node.payload {
                IntentionPayload::Class(c) => c.properties.push(prop_id),
                IntentionPayload::ClassExtension(c) => c.properties.push(prop_id),
                IntentionPayload::Protocol(p) => p.properties.push(prop_id),
                _ => {}
            }
        }
    }

    fn push_method(&mut self, owner: IntentionId, method_id: IntentionId) {
        if let Some(node) = self.collection.get_mut(owner) {
            match &mut node.payload {
                IntentionPayload::Class(c) => c.methods.push(method_id),
                IntentionPayload::ClassExtension(c) => c.methods.push(method_id),
                IntentionPayload::Protocol(p) => p.methods.push(method_id),
                _ => {}
            }
        }
    }
}

/// Converts a CST `TypeRef` into the Type Mapper's input descriptor. Shared
/// by the structural and expression readers, so it lives free-standing
/// rather than on `StructuralReader`.
pub(crate) fn objc_type_from_type_ref(type_ref: &nodes::TypeRef, interner: &mut Interner) -> ObjcType {
    let Some(base) = type_ref.base_name() else {
        return ObjcType::Void;
    };

    if base == "id" {
        let protocols = type_ref
            .generic_args()
            .iter()
            .filter_map(|g| g.base_name())
            .map(|n| interner.intern(&n))
            .collect();
        return ObjcType::Id { protocols };
    }

    if base == "void" {
        return ObjcType::Void;
    }

    if let Some(prim) = Primitive::from_name(&base) {
        return ObjcType::Primitive(prim);
    }

    let generic_args = type_ref
        .generic_args()
        .iter()
        .map(|g| objc_type_from_type_ref(g, interner))
        .collect();
    ObjcType::Named {
        name: interner.intern(&base),
        generic_args,
        is_pointer: type_ref.is_pointer(),
    }
}

fn nullability_from_type_ref(type_ref: &nodes::TypeRef) -> Nullability {
    for kind in type_ref.nullability_tokens() {
        return match kind {
            SyntaxKind::NonnullKw => Nullability::Nonnull,
            SyntaxKind::NullableKw => Nullability::Nullable,
            SyntaxKind::NullResettableKw => Nullability::NullResettable,
            _ => Nullability::Unspecified,
        };
    }
    Nullability::Unspecified
}

fn ownership_from_type_ref(type_ref: &nodes::TypeRef) -> Ownership {
    let _ = type_ref;
    // Ownership qualifiers (`__weak`/`__unsafe_unretained`) are attached as
    // separate tokens the grammar would need to expose; until that's part
    // of the CST shape this conservatively defaults to strong.
    Ownership::Strong
}

fn node_span(node: &SyntaxNode) -> Span {
    let range = node.text_range();
    Span::new(u32::from(range.start()), u32::from(range.end()))
}
