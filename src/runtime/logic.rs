//! Boolean expressions: `operand op operand op operand ...`, reduced strictly
//! left to right with no precedence.

use crate::language::lexer::{split_operands, unwrap_group};
use crate::runtime::{
    error::{RuntimeError, RuntimeResult},
    value::Value,
};
use std::collections::VecDeque;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Or,
    And,
    /// Negates the left operand; the right operand is still consumed.
    Not,
    Contains,
    Equal,
    Less,
    Greater,
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(Operator::Or),
            "*" => Some(Operator::And),
            "~" => Some(Operator::Not),
            "^" => Some(Operator::Contains),
            "=" => Some(Operator::Equal),
            "<" => Some(Operator::Less),
            ">" => Some(Operator::Greater),
            _ => None,
        }
    }

    pub fn apply(&self, lhs: &Value, rhs: &Value) -> RuntimeResult<bool> {
        Ok(match self {
            Operator::Or => lhs.as_bool() || rhs.as_bool(),
            Operator::And => lhs.as_bool() && rhs.as_bool(),
            Operator::Not => !lhs.as_bool(),
            Operator::Contains => rhs.to_string().contains(&lhs.to_string()),
            Operator::Equal => lhs.loosely_equals(rhs),
            Operator::Less | Operator::Greater => {
                let ordering = lhs.compare(rhs).ok_or_else(|| RuntimeError::TypeMismatch {
                    message: format!(
                        "cannot compare {} with {}",
                        lhs.type_name(),
                        rhs.type_name()
                    ),
                })?;
                if *self == Operator::Less {
                    ordering.is_lt()
                } else {
                    ordering.is_gt()
                }
            }
        })
    }
}

enum Item {
    Token(String),
    Value(Value),
}

/// Reduces `expression` to a boolean. `operand` turns one operand token
/// (parentheses already removed) into a value.
pub fn evaluate(
    expression: &str,
    mut operand: impl FnMut(&str) -> RuntimeResult<Value>,
) -> RuntimeResult<bool> {
    let insufficient = || RuntimeError::InsufficientLogicalArguments {
        expression: expression.trim().to_string(),
    };
    let mut queue: VecDeque<Item> = split_operands(expression)?
        .into_iter()
        .map(Item::Token)
        .collect();

    while queue.len() > 1 {
        if queue.len() < 3 {
            return Err(insufficient());
        }
        let (Some(lhs), Some(op), Some(rhs)) =
            (queue.pop_front(), queue.pop_front(), queue.pop_front())
        else {
            return Err(insufficient());
        };
        let lhs = resolve(lhs, &mut operand)?;
        let op = match op {
            Item::Token(symbol) => Operator::from_symbol(&symbol)
                .ok_or(RuntimeError::UnknownOperator { symbol })?,
            Item::Value(value) => {
                return Err(RuntimeError::UnknownOperator {
                    symbol: value.to_string(),
                });
            }
        };
        let rhs = resolve(rhs, &mut operand)?;
        queue.push_front(Item::Value(Value::Bool(op.apply(&lhs, &rhs)?)));
    }

    match queue.pop_front() {
        Some(last) => Ok(resolve(last, &mut operand)?.as_bool()),
        None => Err(insufficient()),
    }
}

fn resolve(
    item: Item,
    operand: &mut impl FnMut(&str) -> RuntimeResult<Value>,
) -> RuntimeResult<Value> {
    match item {
        Item::Token(token) => operand(unwrap_group(&token)),
        Item::Value(value) => Ok(value),
    }
}
