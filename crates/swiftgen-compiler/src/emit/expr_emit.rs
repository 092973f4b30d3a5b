//! Expression and statement rendering: turns a [`crate::reader::swift_ast`]
//! tree into Swift source text. Runs after the body queue so every node it
//! walks already carries its final, rewritten shape.

use swiftgen_core::Interner;

use crate::reader::swift_ast::{BinaryOp, Block, CastStyle, Expr, NumericBase, Stmt, SwitchCase, UnaryOp};

const INDENT_UNIT: &str = "    ";

fn indent(level: usize) -> String {
    INDENT_UNIT.repeat(level)
}

pub fn render_block(block: &Block, interner: &Interner, level: usize) -> String {
    let mut out = String::new();
    for stmt in &block.stmts {
        out.push_str(&render_stmt(stmt, interner, level));
    }
    out
}

pub fn render_stmt(stmt: &Stmt, interner: &Interner, level: usize) -> String {
    let pad = indent(level);
    match stmt {
        Stmt::Expr(e) => format!("{pad}{}\n", render_expr(e, interner)),
        Stmt::LocalVar { name, declared_type, init, .. } => {
            let name_text = interner.resolve(*name);
            let ty = declared_type.as_ref().map(|t| format!(": {}", t.render(interner))).unwrap_or_default();
            let rhs = init.as_ref().map(|e| format!(" = {}", render_expr(e, interner))).unwrap_or_default();
            format!("{pad}var {name_text}{ty}{rhs}\n")
        }
        Stmt::If { cond, then_branch, else_branch, .. } => {
            let mut out = format!("{pad}if {} {{\n{}{pad}}}", render_expr(cond, interner), render_block(then_branch, interner, level + 1));
            if let Some(else_block) = else_branch {
                out.push_str(&format!(" else {{\n{}{pad}}}", render_block(else_block, interner, level + 1)));
            }
            out.push('\n');
            out
        }
        Stmt::While { cond, body, .. } => {
            format!("{pad}while {} {{\n{}{pad}}}\n", render_expr(cond, interner), render_block(body, interner, level + 1))
        }
        Stmt::DoWhile { cond, body, .. } => {
            format!("{pad}repeat {{\n{}{pad}}} while {}\n", render_block(body, interner, level + 1), render_expr(cond, interner))
        }
        Stmt::For { init, cond, step, body, .. } => {
            let init_text = init.as_deref().map(|s| render_stmt(s, interner, 0).trim_end().to_string()).unwrap_or_default();
            let cond_text = cond.as_ref().map(|e| render_expr(e, interner)).unwrap_or_default();
            let step_text = step.as_ref().map(|e| render_expr(e, interner)).unwrap_or_default();
            format!("{pad}for ({init_text}; {cond_text}; {step_text}) {{\n{}{pad}}}\n", render_block(body, interner, level + 1))
        }
        Stmt::ForIn { binding, iterable, body, .. } => {
            let name_text = interner.resolve(*binding);
            format!("{pad}for {name_text} in {} {{\n{}{pad}}}\n", render_expr(iterable, interner), render_block(body, interner, level + 1))
        }
        Stmt::Switch { scrutinee, cases, .. } => {
            let mut out = format!("{pad}switch {} {{\n", render_expr(scrutinee, interner));
            for case in cases {
                out.push_str(&render_switch_case(case, interner, level));
            }
            out.push_str(&format!("{pad}}}\n"));
            out
        }
        Stmt::Return { value, .. } => match value {
            Some(e) => format!("{pad}return {}\n", render_expr(e, interner)),
            None => format!("{pad}return\n"),
        },
        Stmt::Break { .. } => format!("{pad}break\n"),
        Stmt::Continue { .. } => format!("{pad}continue\n"),
        Stmt::Compound(b) => render_block(b, interner, level),
        Stmt::Unknown { source_text, .. } => format!("{pad}/* unknown */ {source_text}\n"),
    }
}

fn render_switch_case(case: &SwitchCase, interner: &Interner, level: usize) -> String {
    let pad = indent(level);
    let label = if case.labels.is_empty() {
        "default".to_string()
    } else {
        let rendered: Vec<String> = case.labels.iter().map(|e| render_expr(e, interner)).collect();
        format!("case {}", rendered.join(", "))
    };
    let mut out = format!("{pad}{label}:\n");
    for stmt in &case.body {
        out.push_str(&render_stmt(stmt, interner, level + 1));
    }
    out
}

pub fn render_expr(expr: &Expr, interner: &Interner) -> String {
    match expr {
        Expr::Ident { name, .. } => interner.resolve(*name).to_string(),
        Expr::IntLiteral { text, base, .. } => render_int_literal(text, *base),
        Expr::FloatLiteral { text, .. } => text.clone(),
        Expr::StringLiteral { value, .. } => format!("{value:?}"),
        Expr::BoolLiteral { value, .. } => value.to_string(),
        Expr::NilLiteral { .. } => "nil".to_string(),
        Expr::SelfExpr { .. } => "self".to_string(),
        Expr::SuperExpr { .. } => "super".to_string(),
        Expr::Call { receiver, method_name, args, .. } => {
            let rendered_args: Vec<String> = args
                .iter()
                .map(|a| match a.label {
                    Some(label) => format!("{}: {}", interner.resolve(label), render_expr(&a.value, interner)),
                    None => render_expr(&a.value, interner),
                })
                .collect();
            format!("{}.{}({})", render_expr(receiver, interner), interner.resolve(*method_name), rendered_args.join(", "))
        }
        Expr::MemberAccess { receiver, member, optional_chained, .. } => {
            let dot = if *optional_chained { "?." } else { "." };
            format!("{}{dot}{}", render_expr(receiver, interner), interner.resolve(*member))
        }
        Expr::Binary { op, lhs, rhs, .. } => {
            format!("{} {} {}", render_expr(lhs, interner), binary_op_token(*op), render_expr(rhs, interner))
        }
        Expr::Unary { op, operand, .. } => render_unary(*op, operand, interner),
        Expr::CompoundAssign { op, target, value, .. } => {
            format!("{} {}= {}", render_expr(target, interner), binary_op_token(*op), render_expr(value, interner))
        }
        Expr::Assign { target, value, .. } => format!("{} = {}", render_expr(target, interner), render_expr(value, interner)),
        Expr::NilCoalescing { lhs, rhs, .. } => format!("{} ?? {}", render_expr(lhs, interner), render_expr(rhs, interner)),
        Expr::Ternary { cond, then_branch, else_branch, .. } => {
            format!("{} ? {} : {}", render_expr(cond, interner), render_expr(then_branch, interner), render_expr(else_branch, interner))
        }
        Expr::Cast { expr, target_type, style, .. } => match style {
            CastStyle::Conditional => format!("({} as? {})", render_expr(expr, interner), target_type.render(interner)),
            CastStyle::ValueInit => format!("{}({})", target_type.render(interner), render_expr(expr, interner)),
        },
        Expr::Paren(inner) => format!("({})", render_expr(inner, interner)),
        Expr::ArrayLiteral { elements, .. } => {
            let rendered: Vec<String> = elements.iter().map(|e| render_expr(e, interner)).collect();
            format!("[{}]", rendered.join(", "))
        }
        Expr::DictLiteral { entries, .. } => {
            if entries.is_empty() {
                return "[:]".to_string();
            }
            let rendered: Vec<String> = entries.iter().map(|(k, v)| format!("{}: {}", render_expr(k, interner), render_expr(v, interner))).collect();
            format!("[{}]", rendered.join(", "))
        }
        Expr::SelectorLiteral { text, .. } => format!("#selector({text})"),
        Expr::Closure { params, return_type, body, .. } => {
            let rendered_params: Vec<String> = params
                .iter()
                .map(|(name, ty)| match ty {
                    Some(t) => format!("{}: {}", interner.resolve(*name), t.render(interner)),
                    None => interner.resolve(*name).to_string(),
                })
                .collect();
            let ret = return_type.as_ref().map(|t| format!(" -> {}", t.render(interner))).unwrap_or_default();
            format!("{{ ({}){ret} in\n{}}}", rendered_params.join(", "), render_block(body, interner, 1))
        }
        Expr::Unknown { source_text, .. } => format!("/* unknown */ {source_text}"),
    }
}

fn render_int_literal(text: &str, base: NumericBase) -> String {
    match base {
        NumericBase::Decimal => text.to_string(),
        NumericBase::Octal => format!("0o{text}"),
        NumericBase::Hex => format!("0x{text}"),
        NumericBase::Binary => format!("0b{text}"),
    }
}

fn render_unary(op: UnaryOp, operand: &Expr, interner: &Interner) -> String {
    let operand_text = render_expr(operand, interner);
    match op {
        UnaryOp::Neg => format!("-{operand_text}"),
        UnaryOp::Not => format!("!{operand_text}"),
        UnaryOp::BitNot => format!("~{operand_text}"),
        UnaryOp::Deref => operand_text,
        UnaryOp::AddressOf => format!("&{operand_text}"),
        // The expression reader rewrites these into `CompoundAssign` before
        // anything downstream sees them; render verbatim if one
        // somehow survives, so the output still names the fragment.
        UnaryOp::PreIncrement | UnaryOp::PostIncrement => format!("{operand_text} /* ++ */"),
        UnaryOp::PreDecrement | UnaryOp::PostDecrement => format!("{operand_text} /* -- */"),
    }
}

fn binary_op_token(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Mod => "%",
        BinaryOp::Eq => "==",
        BinaryOp::NotEq => "!=",
        BinaryOp::Lt => "<",
        BinaryOp::LtEq => "<=",
        BinaryOp::Gt => ">",
        BinaryOp::GtEq => ">=",
        BinaryOp::And => "&&",
        BinaryOp::Or => "||",
        BinaryOp::BitAnd => "&",
        BinaryOp::BitOr => "|",
        BinaryOp::BitXor => "^",
        BinaryOp::ShiftLeft => "<<",
        BinaryOp::ShiftRight => ">>",
    }
}

#[cfg(test)]
mod expr_emit_tests {
    use super::*;
    use swiftgen_core::{Interner, Span};

    fn span() -> Span {
        Span::new(0, 1)
    }

    #[test]
    fn self_member_access_renders_with_a_dot() {
        let mut interner = Interner::new();
        let name = interner.intern("count");
        let expr = Expr::MemberAccess {
            span: span(),
            receiver: Box::new(Expr::SelfExpr { span: span() }),
            member: name,
            optional_chained: false,
        };
        assert_eq!(render_expr(&expr, &interner), "self.count");
    }

    #[test]
    fn nil_coalescing_renders_with_double_question_mark() {
        let interner = Interner::new();
        let expr = Expr::NilCoalescing {
            span: span(),
            lhs: Box::new(Expr::NilLiteral { span: span() }),
            rhs: Box::new(Expr::BoolLiteral { span: span(), value: true }),
        };
        assert_eq!(render_expr(&expr, &interner), "nil ?? true");
    }

    #[test]
    fn unknown_statement_preserves_its_source_text() {
        let interner = Interner::new();
        let stmt = Stmt::Unknown { span: span(), source_text: "@try { ... }".to_string() };
        assert_eq!(render_stmt(&stmt, &interner, 0), "/* unknown */ @try { ... }\n");
    }
}
