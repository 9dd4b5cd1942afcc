//! Transforms over dashboard filter expressions.

use crate::models::{Condition, Expression};

/// Copy of `expr` keeping only the leaves accepted by `keep`.
///
/// AND/OR nodes are always kept, even when every child is removed, so the
/// combinator structure of the input survives. A rejected root leaf yields
/// `None`.
pub fn filter_expressions<F>(expr: &Expression, keep: F) -> Option<Expression>
where
    F: Fn(&Expression) -> bool,
{
    filter_node(expr, &keep)
}

fn filter_node<F>(expr: &Expression, keep: &F) -> Option<Expression>
where
    F: Fn(&Expression) -> bool,
{
    match expr {
        Expression::Cond(cond) if cond.op.is_combinator() => {
            let exprs = cond
                .exprs
                .iter()
                .filter_map(|child| filter_node(child, keep))
                .collect();
            Some(Expression::Cond(Condition { op: cond.op, exprs }))
        }
        leaf if keep(leaf) => Some(leaf.clone()),
        _ => None,
    }
}

/// Filter with every condition on `dimension_name` removed.
///
/// Used to compute a dimension's own options without applying its current
/// selection.
pub fn filters_for_other_dimensions(
    filter_expr: Option<&Expression>,
    dimension_name: &str,
) -> Option<Expression> {
    let expr = filter_expr?;
    filter_expressions(expr, |e| e.first_ident() != Some(dimension_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Operation;
    use serde_json::json;

    fn eq(ident: &str, value: &str) -> Expression {
        Expression::compare(Operation::Eq, ident, value)
    }

    #[test]
    fn test_removes_matching_leaf() {
        let filter = Expression::and(vec![eq("country", "X"), eq("city", "Y")]);
        assert_eq!(
            filters_for_other_dimensions(Some(&filter), "country"),
            Some(Expression::and(vec![eq("city", "Y")]))
        );
    }

    #[test]
    fn test_no_match_returns_equal_tree() {
        let filter = Expression::and(vec![eq("country", "X"), eq("city", "Y")]);
        assert_eq!(
            filters_for_other_dimensions(Some(&filter), "zone"),
            Some(filter.clone())
        );
    }

    #[test]
    fn test_absent_filter_is_none() {
        assert_eq!(filters_for_other_dimensions(None, "country"), None);
    }

    #[test]
    fn test_nested_combinators_are_preserved() {
        let filter = Expression::and(vec![
            Expression::or(vec![eq("country", "X"), eq("country", "Z")]),
            Expression::in_list("publisher", vec![json!("a"), json!("b")]),
        ]);
        assert_eq!(
            filters_for_other_dimensions(Some(&filter), "country"),
            Some(Expression::and(vec![
                Expression::or(vec![]),
                Expression::in_list("publisher", vec![json!("a"), json!("b")]),
            ]))
        );
    }

    #[test]
    fn test_matching_root_leaf_is_removed() {
        let filter = eq("country", "X");
        assert_eq!(filters_for_other_dimensions(Some(&filter), "country"), None);
        assert_eq!(
            filters_for_other_dimensions(Some(&filter), "city"),
            Some(filter.clone())
        );
    }

    #[test]
    fn test_filter_expressions_with_custom_predicate() {
        let filter = Expression::and(vec![
            Expression::compare(Operation::Gt, "bids", 10),
            eq("country", "X"),
        ]);
        let kept = filter_expressions(&filter, |e| {
            matches!(e, Expression::Cond(c) if c.op == Operation::Eq)
        });
        assert_eq!(kept, Some(Expression::and(vec![eq("country", "X")])));
    }
}
