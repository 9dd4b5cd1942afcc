//! Filter expressions attached to dashboard queries.

use serde::{Deserialize, Serialize};

/// Operator of a condition node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "OPERATION_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "OPERATION_EQ")]
    Eq,
    #[serde(rename = "OPERATION_NEQ")]
    Neq,
    #[serde(rename = "OPERATION_LT")]
    Lt,
    #[serde(rename = "OPERATION_LTE")]
    Lte,
    #[serde(rename = "OPERATION_GT")]
    Gt,
    #[serde(rename = "OPERATION_GTE")]
    Gte,
    #[serde(rename = "OPERATION_OR")]
    Or,
    #[serde(rename = "OPERATION_AND")]
    And,
    #[serde(rename = "OPERATION_IN")]
    In,
    #[serde(rename = "OPERATION_NIN")]
    Nin,
    #[serde(rename = "OPERATION_LIKE")]
    Like,
    #[serde(rename = "OPERATION_NLIKE")]
    Nlike,
}

impl Operation {
    /// AND/OR combine sub-expressions; everything else is a leaf comparison.
    pub fn is_combinator(self) -> bool {
        matches!(self, Operation::And | Operation::Or)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub op: Operation,
    #[serde(default)]
    pub exprs: Vec<Expression>,
}

/// Expression tree node: `{"ident": ..}`, `{"val": ..}` or `{"cond": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Expression {
    Ident(String),
    Val(serde_json::Value),
    Cond(Condition),
}

impl Expression {
    pub fn ident(name: impl Into<String>) -> Self {
        Expression::Ident(name.into())
    }

    pub fn val(value: impl Into<serde_json::Value>) -> Self {
        Expression::Val(value.into())
    }

    pub fn cond(op: Operation, exprs: Vec<Expression>) -> Self {
        Expression::Cond(Condition { op, exprs })
    }

    pub fn and(exprs: Vec<Expression>) -> Self {
        Self::cond(Operation::And, exprs)
    }

    pub fn or(exprs: Vec<Expression>) -> Self {
        Self::cond(Operation::Or, exprs)
    }

    /// `ident <op> value` comparison.
    pub fn compare(
        op: Operation,
        ident: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        Self::cond(op, vec![Self::ident(ident), Self::val(value)])
    }

    /// `ident IN (values...)`.
    pub fn in_list(ident: impl Into<String>, values: Vec<serde_json::Value>) -> Self {
        let mut exprs = Vec::with_capacity(values.len() + 1);
        exprs.push(Self::ident(ident));
        exprs.extend(values.into_iter().map(Expression::Val));
        Self::cond(Operation::In, exprs)
    }

    /// Identifier of the first operand of a condition, if any.
    pub fn first_ident(&self) -> Option<&str> {
        match self {
            Expression::Cond(cond) => match cond.exprs.first() {
                Some(Expression::Ident(ident)) => Some(ident),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_wire_format() {
        let expr = Expression::and(vec![Expression::compare(Operation::Eq, "country", "US")]);
        assert_eq!(
            serde_json::to_value(&expr).unwrap(),
            json!({"cond": {"op": "OPERATION_AND", "exprs": [
                {"cond": {"op": "OPERATION_EQ", "exprs": [{"ident": "country"}, {"val": "US"}]}}
            ]}})
        );
    }

    #[test]
    fn test_first_ident() {
        let expr = Expression::in_list("city", vec![json!("Oslo"), json!("Bergen")]);
        assert_eq!(expr.first_ident(), Some("city"));
        assert_eq!(Expression::ident("city").first_ident(), None);
        assert_eq!(Expression::and(vec![]).first_ident(), None);
    }
}
