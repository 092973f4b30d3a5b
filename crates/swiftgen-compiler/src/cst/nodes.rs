//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a [`SyntaxNode`] and provides typed accessors. Casting
//! is infallible for a matching `SyntaxKind`; structural validity past the
//! kind check is the reader's problem, not this layer's.

use super::syntax_kind::{SyntaxKind, SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(Root, Root);
ast_node!(InterfaceDecl, InterfaceDecl);
ast_node!(ImplementationDecl, ImplementationDecl);
ast_node!(CategoryDecl, CategoryDecl);
ast_node!(CategoryImplDecl, CategoryImplDecl);
ast_node!(ProtocolDecl, ProtocolDecl);
ast_node!(IvarList, IvarList);
ast_node!(IvarDecl, IvarDecl);
ast_node!(PropertyDecl, PropertyDecl);
ast_node!(MethodDecl, MethodDecl);
ast_node!(MethodParam, MethodParam);
ast_node!(TypedefDecl, TypedefDecl);
ast_node!(EnumDecl, EnumDecl);
ast_node!(EnumCase, EnumCase);
ast_node!(StructDecl, StructDecl);
ast_node!(GlobalVarDecl, GlobalVarDecl);
ast_node!(SynthesizeDecl, SynthesizeDecl);
ast_node!(DynamicDecl, DynamicDecl);
ast_node!(TypeRef, TypeRef);

ast_node!(CompoundStmt, CompoundStmt);
ast_node!(IfStmt, IfStmt);
ast_node!(WhileStmt, WhileStmt);
ast_node!(DoWhileStmt, DoWhileStmt);
ast_node!(ForStmt, ForStmt);
ast_node!(ForInStmt, ForInStmt);
ast_node!(SwitchStmt, SwitchStmt);
ast_node!(CaseLabel, CaseLabel);
ast_node!(ReturnStmt, ReturnStmt);
ast_node!(BreakStmt, BreakStmt);
ast_node!(ContinueStmt, ContinueStmt);
ast_node!(ExprStmt, ExprStmt);
ast_node!(LocalVarDecl, LocalVarDecl);

ast_node!(MessageExpr, MessageExpr);
ast_node!(MessageKeywordArg, MessageKeywordArg);
ast_node!(SelectorExpr, SelectorExpr);
ast_node!(TernaryExpr, TernaryExpr);
ast_node!(BinaryExpr, BinaryExpr);
ast_node!(UnaryExpr, UnaryExpr);
ast_node!(PostfixExpr, PostfixExpr);
ast_node!(CastExpr, CastExpr);
ast_node!(BlockExpr, BlockExpr);
ast_node!(ParenExpr, ParenExpr);
ast_node!(ArrayLiteralExpr, ArrayLiteralExpr);
ast_node!(DictLiteralExpr, DictLiteralExpr);
ast_node!(IdentExpr, IdentExpr);
ast_node!(LiteralExpr, LiteralExpr);
ast_node!(UnknownNode, UnknownNode);

/// Any node that introduces a member list (class, category, protocol):
/// shared accessors for walking children by kind.
pub trait MemberHost {
    fn syntax(&self) -> &SyntaxNode;

    fn children_of_kind(&self, kind: SyntaxKind) -> Vec<SyntaxNode> {
        self.syntax()
            .children()
            .filter(|n| n.kind() == kind)
            .collect()
    }

    fn method_decls(&self) -> Vec<MethodDecl> {
        self.children_of_kind(SyntaxKind::MethodDecl)
            .into_iter()
            .filter_map(MethodDecl::cast)
            .collect()
    }

    fn property_decls(&self) -> Vec<PropertyDecl> {
        self.children_of_kind(SyntaxKind::PropertyDecl)
            .into_iter()
            .filter_map(PropertyDecl::cast)
            .collect()
    }
}

impl MemberHost for InterfaceDecl {
    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}
impl MemberHost for ImplementationDecl {
    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}
impl MemberHost for CategoryDecl {
    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}
impl MemberHost for CategoryImplDecl {
    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}
impl MemberHost for ProtocolDecl {
    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

impl InterfaceDecl {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token_named(&self.0, SyntaxKind::Ident)
    }

    pub fn superclass_name(&self) -> Option<String> {
        // Second Ident token directly under the node is the superclass, by
        // convention of how the builder lays these nodes out.
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::Ident)
            .nth(1)
            .map(|t| t.text().to_string())
    }

    pub fn ivar_list(&self) -> Option<IvarList> {
        self.0.children().find_map(IvarList::cast)
    }
}

impl ImplementationDecl {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token_named(&self.0, SyntaxKind::Ident)
    }

    pub fn ivar_list(&self) -> Option<IvarList> {
        self.0.children().find_map(IvarList::cast)
    }

    pub fn synthesize_decls(&self) -> Vec<SynthesizeDecl> {
        self.0.children().filter_map(SynthesizeDecl::cast).collect()
    }

    pub fn dynamic_decls(&self) -> Vec<DynamicDecl> {
        self.0.children().filter_map(DynamicDecl::cast).collect()
    }
}

impl CategoryDecl {
    pub fn class_name_token(&self) -> Option<SyntaxToken> {
        first_token_named(&self.0, SyntaxKind::Ident)
    }

    pub fn category_name_token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::Ident)
            .nth(1)
    }
}

impl CategoryImplDecl {
    pub fn class_name_token(&self) -> Option<SyntaxToken> {
        first_token_named(&self.0, SyntaxKind::Ident)
    }

    pub fn category_name_token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::Ident)
            .nth(1)
    }
}

impl ProtocolDecl {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token_named(&self.0, SyntaxKind::Ident)
    }
}

impl IvarList {
    pub fn ivars(&self) -> Vec<IvarDecl> {
        self.0.children().filter_map(IvarDecl::cast).collect()
    }
}

impl IvarDecl {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token_named(&self.0, SyntaxKind::Ident)
    }

    pub fn type_ref(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }

    /// Preceding access-level keyword, if this ivar is immediately under one
    /// (the structural reader instead usually tracks this via context).
    pub fn explicit_access_keyword(&self) -> Option<SyntaxKind> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| t.kind())
            .find(|k| {
                matches!(
                    k,
                    SyntaxKind::KwPrivate
                        | SyntaxKind::KwProtected
                        | SyntaxKind::KwPackage
                        | SyntaxKind::KwPublic
                )
            })
    }
}

impl PropertyDecl {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token_named(&self.0, SyntaxKind::Ident)
    }

    pub fn type_ref(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }

    pub fn attr_tokens(&self) -> Vec<SyntaxToken> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::PropertyAttrList)
            .map(|n| {
                n.children_with_tokens()
                    .filter_map(|e| e.into_token())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl MethodDecl {
    pub fn is_class_method(&self) -> bool {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .next()
            .map(|t| t.kind() == SyntaxKind::Plus)
            .unwrap_or(false)
    }

    pub fn selector_keyword_tokens(&self) -> Vec<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::Ident)
            .collect()
    }

    pub fn params(&self) -> Vec<MethodParam> {
        self.0.children().filter_map(MethodParam::cast).collect()
    }

    pub fn return_type(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }

    pub fn body(&self) -> Option<CompoundStmt> {
        self.0.children().find_map(CompoundStmt::cast)
    }
}

impl MethodParam {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token_named(&self.0, SyntaxKind::Ident)
    }

    pub fn type_ref(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }
}

impl TypeRef {
    pub fn base_name(&self) -> Option<String> {
        first_token_named(&self.0, SyntaxKind::Ident).map(|t| t.text().to_string())
    }

    pub fn is_pointer(&self) -> bool {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .any(|t| t.kind() == SyntaxKind::Star)
    }

    pub fn nullability_tokens(&self) -> Vec<SyntaxKind> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| t.kind())
            .filter(|k| {
                matches!(
                    k,
                    SyntaxKind::NonnullKw
                        | SyntaxKind::NullableKw
                        | SyntaxKind::NullUnspecifiedKw
                        | SyntaxKind::NullResettableKw
                )
            })
            .collect()
    }

    pub fn generic_args(&self) -> Vec<TypeRef> {
        self.0.children().filter_map(TypeRef::cast).collect()
    }
}

impl SynthesizeDecl {
    /// `(property, backing)` identifier pair.
    pub fn pair(&self) -> Option<(String, String)> {
        let mut idents = self
            .0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::Ident);
        let property = idents.next()?.text().to_string();
        let backing = idents.next().map(|t| t.text().to_string()).unwrap_or_else(|| property.clone());
        Some((property, backing))
    }
}

fn first_token_named(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

/// Any top-level declaration the structural reader dispatches on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TopLevelDecl {
    Interface(InterfaceDecl),
    Implementation(ImplementationDecl),
    Category(CategoryDecl),
    CategoryImpl(CategoryImplDecl),
    Protocol(ProtocolDecl),
    Typedef(TypedefDecl),
    Enum(EnumDecl),
    Struct(StructDecl),
    GlobalVar(GlobalVarDecl),
    Unknown(UnknownNode),
}

impl TopLevelDecl {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        use TopLevelDecl::*;
        Some(match node.kind() {
            SyntaxKind::InterfaceDecl => Interface(InterfaceDecl::cast(node)?),
            SyntaxKind::ImplementationDecl => Implementation(ImplementationDecl::cast(node)?),
            SyntaxKind::CategoryDecl => Category(CategoryDecl::cast(node)?),
            SyntaxKind::CategoryImplDecl => CategoryImpl(CategoryImplDecl::cast(node)?),
            SyntaxKind::ProtocolDecl => Protocol(ProtocolDecl::cast(node)?),
            SyntaxKind::TypedefDecl => Typedef(TypedefDecl::cast(node)?),
            SyntaxKind::EnumDecl => Enum(EnumDecl::cast(node)?),
            SyntaxKind::StructDecl => Struct(StructDecl::cast(node)?),
            SyntaxKind::GlobalVarDecl => GlobalVar(GlobalVarDecl::cast(node)?),
            SyntaxKind::UnknownNode => Unknown(UnknownNode::cast(node)?),
            _ => return None,
        })
    }
}

impl Root {
    pub fn top_level_decls(&self) -> Vec<TopLevelDecl> {
        self.0.children().filter_map(TopLevelDecl::cast).collect()
    }
}

impl TypedefDecl {
    pub fn alias_name(&self) -> Option<String> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::Ident)
            .last()
            .map(|t| t.text().to_string())
    }

    pub fn enum_decl(&self) -> Option<EnumDecl> {
        self.0.children().find_map(EnumDecl::cast)
    }
}

impl EnumDecl {
    pub fn raw_type(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }

    pub fn cases(&self) -> Vec<EnumCase> {
        self.0.children().filter_map(EnumCase::cast).collect()
    }
}

impl EnumCase {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token_named(&self.0, SyntaxKind::Ident)
    }
}

impl StructDecl {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token_named(&self.0, SyntaxKind::Ident)
    }

    pub fn ivars(&self) -> Vec<IvarDecl> {
        self.0.children().filter_map(IvarDecl::cast).collect()
    }
}

impl GlobalVarDecl {
    pub fn name_token(&self) -> Option<SyntaxToken> {
        first_token_named(&self.0, SyntaxKind::Ident)
    }

    pub fn type_ref(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }
}

impl CompoundStmt {
    /// Statements and local declarations in source order — callers must
    /// never re-sort this; downstream passes depend on source order being
    /// preserved exactly.
    pub fn ordered_children(&self) -> Vec<SyntaxNode> {
        self.0.children().collect()
    }
}
