//! Length-constraint trees and their translation to solver terms.
//!
//! The decision procedure reports, on sat, a tree of length constraints
//! over string variables. [`len_to_term`] turns that tree back into a
//! solver term the arithmetic back-end can check. Variables the decision
//! procedure invented internally (absent from the variable map) get a
//! fresh string-sorted solver variable minted and registered, so the same
//! unknown atom translates identically for the rest of the session.

use crate::error::{Result, TheoryError};
use crate::session::VariableMap;
use braid_core::{TermId, TermManager};
use num_bigint::BigInt;

/// An atom at a leaf of a length tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LenAtom {
    /// An integer literal.
    Lit(BigInt),
    /// The length of a string variable, by identity.
    Var(String),
}

/// A tree of length constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LenNode {
    /// A literal or variable-length atom.
    Leaf(LenAtom),
    /// N-ary sum; at least two children required at translation time.
    Plus(Vec<LenNode>),
    /// Equality between two subtrees.
    Eq(Box<LenNode>, Box<LenNode>),
    /// Less-or-equal between two subtrees.
    Leq(Box<LenNode>, Box<LenNode>),
    /// Conjunction; the empty conjunction is trivially true.
    And(Vec<LenNode>),
}

impl LenNode {
    /// Leaf holding an integer literal.
    pub fn lit(value: impl Into<BigInt>) -> Self {
        LenNode::Leaf(LenAtom::Lit(value.into()))
    }

    /// Leaf holding the length of a variable.
    pub fn var(name: &str) -> Self {
        LenNode::Leaf(LenAtom::Var(name.to_string()))
    }

    /// Equality node.
    pub fn eq(left: LenNode, right: LenNode) -> Self {
        LenNode::Eq(Box::new(left), Box::new(right))
    }

    /// Less-or-equal node.
    pub fn leq(left: LenNode, right: LenNode) -> Self {
        LenNode::Leq(Box::new(left), Box::new(right))
    }
}

/// Translate a length tree into a solver term.
///
/// Leaf variables resolve through `var_map`; a miss mints a fresh
/// string-sorted variable and registers it. A `Plus` with fewer than two
/// children is a malformed tree and fatal.
pub fn len_to_term(
    tm: &mut TermManager,
    var_map: &mut VariableMap,
    node: &LenNode,
) -> Result<TermId> {
    match node {
        LenNode::Leaf(LenAtom::Lit(value)) => Ok(tm.mk_int(value.clone())),
        LenNode::Leaf(LenAtom::Var(name)) => {
            let var = match var_map.term_of(name) {
                Some(term) => term,
                None => {
                    // Introduced inside the decision procedure; give it a
                    // solver-side identity now.
                    let string_sort = tm.sorts.string_sort;
                    let fresh = tm.mk_fresh_var(name, string_sort);
                    var_map.insert(name, fresh);
                    fresh
                }
            };
            Ok(tm.mk_str_len(var))
        }
        LenNode::Plus(children) => {
            if children.len() < 2 {
                return Err(TheoryError::MalformedLengthFormula(format!(
                    "sum with {} children",
                    children.len()
                )));
            }
            let args = children
                .iter()
                .map(|child| len_to_term(tm, var_map, child))
                .collect::<Result<Vec<_>>>()?;
            Ok(tm.mk_add(args))
        }
        LenNode::Eq(left, right) => {
            let left = len_to_term(tm, var_map, left)?;
            let right = len_to_term(tm, var_map, right)?;
            Ok(tm.mk_eq(left, right))
        }
        LenNode::Leq(left, right) => {
            let left = len_to_term(tm, var_map, left)?;
            let right = len_to_term(tm, var_map, right)?;
            Ok(tm.mk_le(left, right))
        }
        LenNode::And(children) => {
            let args = children
                .iter()
                .map(|child| len_to_term(tm, var_map, child))
                .collect::<Result<Vec<_>>>()?;
            Ok(tm.mk_and(args))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braid_core::eval::{Value, eval_ground};

    #[test]
    fn test_ground_round_trip() {
        // Eq(Plus(3, 4), 7) evaluates to true.
        let mut tm = TermManager::new();
        let mut var_map = VariableMap::new();
        let tree = LenNode::eq(
            LenNode::Plus(vec![LenNode::lit(3), LenNode::lit(4)]),
            LenNode::lit(7),
        );
        let term = len_to_term(&mut tm, &mut var_map, &tree).unwrap();
        assert_eq!(eval_ground(&tm, term), Some(Value::Bool(true)));
    }

    #[test]
    fn test_empty_and_is_true() {
        let mut tm = TermManager::new();
        let mut var_map = VariableMap::new();
        let term = len_to_term(&mut tm, &mut var_map, &LenNode::And(vec![])).unwrap();
        assert_eq!(eval_ground(&tm, term), Some(Value::Bool(true)));
    }

    #[test]
    fn test_known_variable_becomes_length() {
        let mut tm = TermManager::new();
        let mut var_map = VariableMap::new();
        let x = tm.mk_var("x", tm.sorts.string_sort);
        var_map.insert("x", x);

        let term = len_to_term(&mut tm, &mut var_map, &LenNode::var("x")).unwrap();
        let expected = tm.mk_str_len(x);
        assert_eq!(term, expected);
    }

    #[test]
    fn test_unknown_variable_minted_once() {
        let mut tm = TermManager::new();
        let mut var_map = VariableMap::new();

        let first = len_to_term(&mut tm, &mut var_map, &LenNode::var("tmp")).unwrap();
        let second = len_to_term(&mut tm, &mut var_map, &LenNode::var("tmp")).unwrap();
        assert_eq!(first, second);
        assert!(var_map.term_of("tmp").is_some());
    }

    #[test]
    fn test_short_sum_fatal() {
        let mut tm = TermManager::new();
        let mut var_map = VariableMap::new();
        let err = len_to_term(&mut tm, &mut var_map, &LenNode::Plus(vec![LenNode::lit(1)]))
            .unwrap_err();
        assert!(matches!(err, TheoryError::MalformedLengthFormula(_)));
    }

    #[test]
    fn test_leq_translation() {
        let mut tm = TermManager::new();
        let mut var_map = VariableMap::new();
        let tree = LenNode::leq(LenNode::lit(3), LenNode::lit(4));
        let term = len_to_term(&mut tm, &mut var_map, &tree).unwrap();
        assert_eq!(eval_ground(&tm, term), Some(Value::Bool(true)));
    }

    #[test]
    fn test_conjunction_translation() {
        let mut tm = TermManager::new();
        let mut var_map = VariableMap::new();
        let tree = LenNode::And(vec![
            LenNode::eq(LenNode::lit(1), LenNode::lit(1)),
            LenNode::leq(LenNode::lit(1), LenNode::lit(2)),
        ]);
        let term = len_to_term(&mut tm, &mut var_map, &tree).unwrap();
        assert_eq!(eval_ground(&tm, term), Some(Value::Bool(true)));
    }
}
