//! Expression tree traversal helpers.

use crate::ast::{Expr, SelectStatement};

/// Direct sub-expressions of `expr` in source order.
///
/// Queries nested in `expr` are not expressions and are not returned; see
/// [`nested_queries`].
pub(crate) fn children(expr: &Expr) -> Vec<&Expr> {
    match expr {
        Expr::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
        Expr::Unary { operand, .. } => vec![operand.as_ref()],
        Expr::Function(call) => call.args.iter().collect(),
        Expr::IsNull { expr, .. }
        | Expr::InSubquery { expr, .. }
        | Expr::Cast { expr, .. }
        | Expr::Paren { expr, .. } => vec![expr.as_ref()],
        Expr::In { expr, list, .. } => std::iter::once(expr.as_ref()).chain(list).collect(),
        Expr::Between {
            expr, low, high, ..
        } => vec![expr.as_ref(), low.as_ref(), high.as_ref()],
        Expr::Case {
            operand,
            when_clauses,
            else_clause,
            ..
        } => operand
            .as_deref()
            .into_iter()
            .chain(when_clauses.iter().flat_map(|(when, then)| [when, then]))
            .chain(else_clause.as_deref())
            .collect(),
        Expr::Literal { .. }
        | Expr::Column { .. }
        | Expr::Subquery { .. }
        | Expr::Exists { .. }
        | Expr::Parameter { .. }
        | Expr::Wildcard { .. } => vec![],
    }
}

/// Every query nested in `expr`, outermost first.
///
/// The returned queries are not searched themselves.
pub(crate) fn nested_queries(expr: &Expr) -> Vec<&SelectStatement> {
    let mut queries = Vec::new();
    collect_queries(expr, &mut queries);
    queries
}

fn collect_queries<'a>(expr: &'a Expr, queries: &mut Vec<&'a SelectStatement>) {
    match expr {
        Expr::Subquery { query, .. } | Expr::Exists { query, .. } => queries.push(query),
        Expr::InSubquery { expr, query, .. } => {
            collect_queries(expr, queries);
            queries.push(query);
        }
        other => {
            for child in children(other) {
                collect_queries(child, queries);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Statement;
    use crate::parser::parse;

    #[test]
    fn test_children_of_between() {
        let sql = "SELECT * FROM t WHERE a BETWEEN 1 AND 2";
        let Statement::Select(select) = parse(sql).unwrap() else {
            panic!("Expected SELECT");
        };
        let where_clause = select.where_clause.unwrap();
        let texts: Vec<&str> = children(&where_clause)
            .into_iter()
            .map(|c| c.span().text(sql))
            .collect();
        assert_eq!(texts, vec!["a", "1", "2"]);
    }

    #[test]
    fn test_nested_queries_found_through_operators() {
        let sql = "SELECT * FROM t WHERE a = 1 AND (b IN (SELECT x FROM u) OR EXISTS (SELECT 1 FROM v))";
        let Statement::Select(select) = parse(sql).unwrap() else {
            panic!("Expected SELECT");
        };
        assert_eq!(nested_queries(select.where_clause.as_ref().unwrap()).len(), 2);
    }
}
