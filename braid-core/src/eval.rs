//! Ground-term evaluation.
//!
//! Evaluates the variable-free fragment of the term language. Used by test
//! harnesses standing in for the arithmetic back-end: a ground length
//! formula produced by the string layer can be checked for truth directly.

use crate::ast::{TermId, TermKind, TermManager};
use num_bigint::BigInt;
use num_traits::Zero;

/// A ground value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(BigInt),
    /// String value.
    Str(String),
}

/// Evaluate a ground term. Returns `None` for terms containing variables
/// or shapes outside the evaluated fragment (regular expressions,
/// uninterpreted string functions).
pub fn eval_ground(tm: &TermManager, id: TermId) -> Option<Value> {
    match tm.kind(id) {
        TermKind::True => Some(Value::Bool(true)),
        TermKind::False => Some(Value::Bool(false)),
        TermKind::Not(a) => match eval_ground(tm, *a)? {
            Value::Bool(b) => Some(Value::Bool(!b)),
            _ => None,
        },
        TermKind::And(args) => {
            let mut result = true;
            for &arg in args {
                match eval_ground(tm, arg)? {
                    Value::Bool(b) => result &= b,
                    _ => return None,
                }
            }
            Some(Value::Bool(result))
        }
        TermKind::Eq(a, b) => {
            let va = eval_ground(tm, *a)?;
            let vb = eval_ground(tm, *b)?;
            Some(Value::Bool(va == vb))
        }
        TermKind::Le(a, b) => match (eval_ground(tm, *a)?, eval_ground(tm, *b)?) {
            (Value::Int(va), Value::Int(vb)) => Some(Value::Bool(va <= vb)),
            _ => None,
        },
        TermKind::IntConst(v) => Some(Value::Int(v.clone())),
        TermKind::Add(args) => {
            let mut sum = BigInt::zero();
            for &arg in args {
                match eval_ground(tm, arg)? {
                    Value::Int(v) => sum += v,
                    _ => return None,
                }
            }
            Some(Value::Int(sum))
        }
        TermKind::StrLit(s) => Some(Value::Str(s.clone())),
        TermKind::StrConcat(a, b) => match (eval_ground(tm, *a)?, eval_ground(tm, *b)?) {
            (Value::Str(sa), Value::Str(sb)) => Some(Value::Str(sa + &sb)),
            _ => None,
        },
        TermKind::StrLen(a) => match eval_ground(tm, *a)? {
            Value::Str(s) => Some(Value::Int(BigInt::from(s.chars().count()))),
            _ => None,
        },
        TermKind::StrContains(a, b) => match (eval_ground(tm, *a)?, eval_ground(tm, *b)?) {
            (Value::Str(hay), Value::Str(needle)) => Some(Value::Bool(hay.contains(&needle))),
            _ => None,
        },
        _ => None,
    }
}
