//! Statement reader: lowers Objective-C statement CST nodes into
//! [`crate::reader::swift_ast`] statements, preserving source order within
//! compound statements.

use swiftgen_core::{Interner, Span};

use crate::cst::nodes;
use crate::cst::{SyntaxKind, SyntaxNode};
use crate::types::{MappingContext, Nullability, TypeMapper};

use super::expr::ExprReader;
use super::swift_ast::{Block, Stmt, SwitchCase};

pub struct StmtReader<'a> {
    interner: &'a mut Interner,
}

impl<'a> StmtReader<'a> {
    pub fn new(interner: &'a mut Interner) -> Self {
        Self { interner }
    }

    /// Lowers every statement and local declaration in source order — the
    /// order here is load-bearing, not incidental.
    pub fn lower_compound(&mut self, compound: &nodes::CompoundStmt) -> Block {
        let span = node_span(compound.syntax());
        let stmts = compound
            .ordered_children()
            .iter()
            .map(|c| self.lower(c))
            .collect();
        Block { span, stmts }
    }

    pub fn lower(&mut self, node: &SyntaxNode) -> Stmt {
        let span = node_span(node);
        match node.kind() {
            SyntaxKind::ExprStmt => {
                let Some(expr_node) = node.children().next() else {
                    return unknown(node, span);
                };
                Stmt::Expr(ExprReader::new(self.interner).lower(&expr_node))
            }
            SyntaxKind::LocalVarDecl => self.lower_local_var(node, span),
            SyntaxKind::IfStmt => self.lower_if(node, span),
            SyntaxKind::WhileStmt => self.lower_while(node, span),
            SyntaxKind::DoWhileStmt => self.lower_do_while(node, span),
            SyntaxKind::ForStmt => self.lower_for(node, span),
            SyntaxKind::ForInStmt => self.lower_for_in(node, span),
            SyntaxKind::SwitchStmt => self.lower_switch(node, span),
            SyntaxKind::ReturnStmt => {
                let value = node.children().next().map(|e| ExprReader::new(self.interner).lower(&e));
                Stmt::Return { span, value }
            }
            SyntaxKind::BreakStmt => Stmt::Break { span },
            SyntaxKind::ContinueStmt => Stmt::Continue { span },
            SyntaxKind::CompoundStmt => {
                let compound = nodes::CompoundStmt::cast(node.clone()).expect("matched kind");
                Stmt::Compound(self.lower_compound(&compound))
            }
            _ => unknown(node, span),
        }
    }

    fn lower_local_var(&mut self, node: &SyntaxNode, span: Span) -> Stmt {
        let Some(name_token) = node
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::Ident)
        else {
            return unknown(node, span);
        };
        let name = self.interner.intern(name_token.text());

        let declared_type = node.children().find_map(nodes::TypeRef::cast).map(|tr| {
            let objc_ty = super::structural::objc_type_from_type_ref(&tr, self.interner);
            let mut mapper = TypeMapper::new(self.interner);
            mapper.map(&objc_ty, MappingContext::new(true, Nullability::Unspecified))
        });

        let init = node
            .children()
            .find(|c| nodes::TypeRef::cast(c.clone()).is_none())
            .map(|e| ExprReader::new(self.interner).lower(&e));

        Stmt::LocalVar {
            span,
            name,
            declared_type,
            init,
        }
    }

    fn lower_if(&mut self, node: &SyntaxNode, span: Span) -> Stmt {
        let mut children = node.children();
        let Some(cond_node) = children.next() else {
            return unknown(node, span);
        };
        let cond = ExprReader::new(self.interner).lower(&cond_node);
        let Some(then_node) = children.next() else {
            return unknown(node, span);
        };
        let then_branch = self.lower_branch_block(&then_node);
        let else_branch = children.next().map(|n| self.lower_branch_block(&n));
        Stmt::If {
            span,
            cond,
            then_branch,
            else_branch,
        }
    }

    fn lower_while(&mut self, node: &SyntaxNode, span: Span) -> Stmt {
        let mut children = node.children();
        let (Some(cond_node), Some(body_node)) = (children.next(), children.next()) else {
            return unknown(node, span);
        };
        Stmt::While {
            span,
            cond: ExprReader::new(self.interner).lower(&cond_node),
            body: self.lower_branch_block(&body_node),
        }
    }

    fn lower_do_while(&mut self, node: &SyntaxNode, span: Span) -> Stmt {
        let mut children = node.children();
        let (Some(body_node), Some(cond_node)) = (children.next(), children.next()) else {
            return unknown(node, span);
        };
        Stmt::DoWhile {
            span,
            cond: ExprReader::new(self.interner).lower(&cond_node),
            body: self.lower_branch_block(&body_node),
        }
    }

    fn lower_for(&mut self, node: &SyntaxNode, span: Span) -> Stmt {
        let children: Vec<SyntaxNode> = node.children().collect();
        let Some(body_node) = children.last() else {
            return unknown(node, span);
        };
        let body = self.lower_branch_block(body_node);
        let parts = &children[..children.len().saturating_sub(1)];
        let init = parts.first().map(|n| Box::new(self.lower(n)));
        let cond = parts.get(1).map(|n| ExprReader::new(self.interner).lower(n));
        let step = parts.get(2).map(|n| ExprReader::new(self.interner).lower(n));
        Stmt::For {
            span,
            init,
            cond,
            step,
            body,
        }
    }

    fn lower_for_in(&mut self, node: &SyntaxNode, span: Span) -> Stmt {
        let Some(binding_token) = node
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::Ident)
        else {
            return unknown(node, span);
        };
        let mut children = node.children();
        let Some(iterable_node) = children.next() else {
            return unknown(node, span);
        };
        let Some(body_node) = children.next() else {
            return unknown(node, span);
        };
        Stmt::ForIn {
            span,
            binding: self.interner.intern(binding_token.text()),
            iterable: ExprReader::new(self.interner).lower(&iterable_node),
            body: self.lower_branch_block(&body_node),
        }
    }

    fn lower_switch(&mut self, node: &SyntaxNode, span: Span) -> Stmt {
        let mut children = node.children();
        let Some(scrutinee_node) = children.next() else {
            return unknown(node, span);
        };
        let scrutinee = ExprReader::new(self.interner).lower(&scrutinee_node);
        let cases = children
            .filter(|c| c.kind() == SyntaxKind::CaseLabel)
            .map(|c| self.lower_case(&c))
            .collect();
        Stmt::Switch { span, scrutinee, cases }
    }

    fn lower_case(&mut self, node: &SyntaxNode) -> SwitchCase {
        let span = node_span(node);
        let is_default = node
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .any(|t| t.kind() == SyntaxKind::KwDefault);
        let mut exprs = Vec::new();
        let mut body = Vec::new();
        for child in node.children() {
            if is_stmt_kind(child.kind()) {
                body.push(self.lower(&child));
            } else if !is_default {
                exprs.push(ExprReader::new(self.interner).lower(&child));
            }
        }
        SwitchCase {
            span,
            labels: exprs,
            body,
        }
    }

    /// A branch target that isn't itself a `CompoundStmt` (e.g. `if (x) y();`
    /// without braces) is wrapped in a single-statement block so callers have
    /// a uniform `Block` to walk.
    fn lower_branch_block(&mut self, node: &SyntaxNode) -> Block {
        if let Some(compound) = nodes::CompoundStmt::cast(node.clone()) {
            return self.lower_compound(&compound);
        }
        let span = node_span(node);
        Block {
            span,
            stmts: vec![self.lower(node)],
        }
    }
}

fn is_stmt_kind(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::ExprStmt
            | SyntaxKind::LocalVarDecl
            | SyntaxKind::IfStmt
            | SyntaxKind::WhileStmt
            | SyntaxKind::DoWhileStmt
            | SyntaxKind::ForStmt
            | SyntaxKind::ForInStmt
            | SyntaxKind::SwitchStmt
            | SyntaxKind::ReturnStmt
            | SyntaxKind::BreakStmt
            | SyntaxKind::ContinueStmt
            | SyntaxKind::CompoundStmt
    )
}

fn unknown(node: &SyntaxNode, span: Span) -> Stmt {
    Stmt::Unknown {
        span,
        source_text: node.text().to_string(),
    }
}

fn node_span(node: &SyntaxNode) -> Span {
    let range = node.text_range();
    Span::new(u32::from(range.start()), u32::from(range.end()))
}
