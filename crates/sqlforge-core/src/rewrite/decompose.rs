//! Splits a predicate tree into its leaf comparisons.

use crate::ast::{Expr, UnaryOp};

/// Strips parentheses and `NOT` wrappers.
fn peel(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren { expr, .. }
        | Expr::Unary {
            op: UnaryOp::Not,
            operand: expr,
            ..
        } => peel(expr),
        other => other,
    }
}

fn is_binary(expr: &Expr) -> bool {
    matches!(peel(expr), Expr::Binary { .. })
}

/// Returns the leaf binary expressions of `expr`, left to right.
///
/// A leaf is a binary expression neither of whose operands is itself a
/// binary expression. Parentheses and `NOT` are looked through, so
/// `a = 1 AND NOT (b = 2 OR c = 3)` yields `a = 1`, `b = 2`, `c = 3`. A
/// lone comparison yields itself; anything that is not binary yields
/// nothing.
#[must_use]
pub fn leaf_comparisons(expr: &Expr) -> Vec<&Expr> {
    let mut leaves = Vec::new();
    collect(expr, &mut leaves);
    leaves
}

fn collect<'a>(expr: &'a Expr, leaves: &mut Vec<&'a Expr>) {
    let expr = peel(expr);
    if let Expr::Binary { left, right, .. } = expr {
        if is_binary(left) || is_binary(right) {
            collect(left, leaves);
            collect(right, leaves);
        } else {
            leaves.push(expr);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Statement;
    use crate::parser::parse;

    fn where_of(sql: &str) -> Expr {
        match parse(sql).unwrap() {
            Statement::Select(select) => select.where_clause.unwrap(),
            _ => panic!("Expected SELECT"),
        }
    }

    fn leaf_texts(sql: &str) -> Vec<String> {
        let expr = where_of(sql);
        leaf_comparisons(&expr)
            .into_iter()
            .map(|leaf| leaf.span().text(sql).to_string())
            .collect()
    }

    #[test]
    fn test_single_comparison_is_its_own_leaf() {
        assert_eq!(leaf_texts("SELECT * FROM t WHERE a = 1"), vec!["a = 1"]);
    }

    #[test]
    fn test_left_to_right_order() {
        assert_eq!(
            leaf_texts("SELECT * FROM t WHERE a = 1 AND b > 2 OR c < 3"),
            vec!["a = 1", "b > 2", "c < 3"]
        );
    }

    #[test]
    fn test_parens_and_not_are_transparent() {
        assert_eq!(
            leaf_texts("SELECT * FROM t WHERE (a = 1) AND NOT (b = 2 OR c = 3)"),
            vec!["a = 1", "b = 2", "c = 3"]
        );
    }

    #[test]
    fn test_non_binary_predicates_are_skipped() {
        assert_eq!(
            leaf_texts("SELECT * FROM t WHERE a IS NULL AND b = 2"),
            vec!["b = 2"]
        );
        assert!(leaf_texts("SELECT * FROM t WHERE a IN (1, 2)").is_empty());
    }
}
