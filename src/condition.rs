//! `{{if:..}}` conditions: bare-key truthiness or a single loose comparison.

use std::{borrow::Cow, cmp::Ordering};

use crate::value::{Scope, Value, parse_number};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub(crate) enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

impl CompareOp {
    /// Order in which operators are tried at a given position, so `>=` wins
    /// over `>` and `<=` over `<`.
    const SEARCH_ORDER: [Self; 6] = [Self::Ge, Self::Gt, Self::Le, Self::Lt, Self::Eq, Self::Ne];

    pub(crate) const fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Ge => ">=",
            Self::Le => "<=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Condition<'a> {
    /// The whole condition is a key tested for truthiness.
    Truthy { key: &'a str },
    Compare {
        lhs: &'a str,
        op: CompareOp,
        rhs: &'a str,
    },
}

impl<'a> Condition<'a> {
    /// Splits `raw` on the rightmost operator that leaves both sides
    /// non-empty; without one the whole string is a key.
    pub(crate) fn parse(raw: &'a str) -> Self {
        for (pos, _) in raw.char_indices().rev() {
            if pos == 0 {
                break;
            }
            let (lhs, rest) = raw.split_at(pos);
            for op in CompareOp::SEARCH_ORDER {
                if let Some(rhs) = rest.strip_prefix(op.symbol()) {
                    if !rhs.is_empty() {
                        return Self::Compare { lhs, op, rhs };
                    }
                }
            }
        }
        Self::Truthy { key: raw }
    }

    /// The condition as written inside `{{if:..}}`.
    pub(crate) fn source(&self) -> Cow<'a, str> {
        match self {
            Self::Truthy { key } => Cow::Borrowed(key),
            Self::Compare { lhs, op, rhs } => Cow::Owned(format!("{lhs}{}{rhs}", op.symbol())),
        }
    }

    pub(crate) fn evaluate(&self, scope: Scope<'_>) -> bool {
        match self {
            Self::Truthy { key } => scope.get(key).is_some_and(Value::is_truthy),
            Self::Compare { lhs, op, rhs } => {
                let lhs = Operand::resolve(lhs, scope);
                let rhs = Operand::resolve(rhs, scope);
                compare(&lhs, *op, &rhs)
            }
        }
    }
}

/// A comparison side after coercion to a primitive.
#[derive(Debug, Clone, PartialEq)]
enum Operand<'v> {
    Null,
    Bool(bool),
    Number(f64),
    Text(Cow<'v, str>),
}

impl<'v> Operand<'v> {
    /// A side naming a key of the scope takes that key's value; anything
    /// else is literal text.
    fn resolve(side: &'v str, scope: Scope<'v>) -> Self {
        match scope.get(side) {
            None => Self::Text(Cow::Borrowed(side)),
            Some(Value::Null) => Self::Null,
            Some(Value::Bool(b)) => Self::Bool(*b),
            Some(Value::Number(n)) => Self::Number(*n),
            Some(value @ (Value::String(_) | Value::List(_) | Value::Object(_))) => {
                Self::Text(value.to_text())
            }
        }
    }

    fn to_number(&self) -> f64 {
        match self {
            Self::Null => 0.0,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::Text(text) => parse_number(text),
        }
    }
}

fn loose_eq(lhs: &Operand<'_>, rhs: &Operand<'_>) -> bool {
    match (lhs, rhs) {
        (Operand::Null, Operand::Null) => true,
        (Operand::Null, _) | (_, Operand::Null) => false,
        (Operand::Text(a), Operand::Text(b)) => a == b,
        // Everything else meets on the number line; NaN equals nothing.
        _ => lhs.to_number() == rhs.to_number(),
    }
}

/// `None` when the operands are unordered (one of them coerces to NaN).
fn loose_cmp(lhs: &Operand<'_>, rhs: &Operand<'_>) -> Option<Ordering> {
    match (lhs, rhs) {
        (Operand::Text(a), Operand::Text(b)) => Some(a.encode_utf16().cmp(b.encode_utf16())),
        _ => lhs.to_number().partial_cmp(&rhs.to_number()),
    }
}

fn compare(lhs: &Operand<'_>, op: CompareOp, rhs: &Operand<'_>) -> bool {
    match op {
        CompareOp::Eq => loose_eq(lhs, rhs),
        CompareOp::Ne => !loose_eq(lhs, rhs),
        CompareOp::Gt => loose_cmp(lhs, rhs) == Some(Ordering::Greater),
        CompareOp::Lt => loose_cmp(lhs, rhs) == Some(Ordering::Less),
        CompareOp::Ge => matches!(loose_cmp(lhs, rhs), Some(Ordering::Greater | Ordering::Equal)),
        CompareOp::Le => matches!(loose_cmp(lhs, rhs), Some(Ordering::Less | Ordering::Equal)),
    }
}
