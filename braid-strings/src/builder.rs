//! Building word-equation predicates from solver terms.
//!
//! Concatenation trees are flattened into flat abstract-term sequences;
//! equalities and negated equalities become [`Predicate`]s; sets of them
//! become a [`Formula`]. Translation is deterministic: the same term
//! always flattens to the same sequence, which the constraint store's
//! discard/restore semantics rely on.

use crate::error::{Result, TheoryError};
use crate::formula::{Formula, Predicate, PredicateKind, Word, WordTerm};
use crate::session::Session;
use braid_core::{SortKind, TermId, TermKind, TermManager};

/// Flatten a concatenation-shaped term into a sequence of abstract terms.
///
/// Literals become [`WordTerm::Literal`]; variables become
/// [`WordTerm::Variable`] under their declared name and are registered in
/// the session's variable map on first encounter. Any other node must
/// have a placeholder registered in the session's replacement map
/// (compound string functions are pre-replaced by fresh variables); a
/// missing placeholder is a programming error, not a user error.
pub fn flatten_concat(tm: &TermManager, session: &mut Session, node: TermId) -> Result<Word> {
    let mut word = Word::new();
    flatten_concat_rec(tm, session, node, &mut word)?;
    Ok(word)
}

fn flatten_concat_rec(
    tm: &TermManager,
    session: &mut Session,
    node: TermId,
    word: &mut Word,
) -> Result<()> {
    match tm.kind(node) {
        TermKind::StrLit(s) => {
            word.push(WordTerm::Literal(s.clone()));
            Ok(())
        }
        TermKind::Var(name) => {
            let name = tm.resolve(*name).to_string();
            session.var_map.insert(&name, node);
            word.push(WordTerm::Variable(name));
            Ok(())
        }
        TermKind::StrConcat(left, right) => {
            flatten_concat_rec(tm, session, *left, word)?;
            flatten_concat_rec(tm, session, *right, word)
        }
        _ => match session.replacement_of(node) {
            Some(placeholder) => flatten_concat_rec(tm, session, placeholder, word),
            None => Err(TheoryError::MissingReplacement(tm.display(node))),
        },
    }
}

/// Convert an equality or negated equality over strings into a predicate.
///
/// As a side effect, registers every newly seen variable in the session's
/// variable map.
pub fn to_predicate(tm: &TermManager, session: &mut Session, node: TermId) -> Result<Predicate> {
    let (kind, left, right) = match tm.kind(node) {
        TermKind::Eq(left, right) => (PredicateKind::Equation, *left, *right),
        TermKind::Not(inner) => match tm.kind(*inner) {
            TermKind::Eq(left, right) => (PredicateKind::Disequation, *left, *right),
            _ => return Err(TheoryError::NotAnEquation(tm.display(node))),
        },
        _ => return Err(TheoryError::NotAnEquation(tm.display(node))),
    };
    if tm.sorts.get(tm.sort_of(left)) != SortKind::String {
        return Err(TheoryError::UnexpectedSort(tm.display(node)));
    }
    let left = flatten_concat(tm, session, left)?;
    let right = flatten_concat(tm, session, right)?;
    Ok(Predicate { kind, left, right })
}

/// Convert a set of (dis)equations into a deduplicated formula.
pub fn build_formula(
    tm: &TermManager,
    session: &mut Session,
    nodes: &[TermId],
) -> Result<Formula> {
    let mut formula = Formula::new();
    for &node in nodes {
        formula.insert(to_predicate(tm, session, node)?);
    }
    Ok(formula)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::WordTerm;

    fn lit(s: &str) -> WordTerm {
        WordTerm::Literal(s.to_string())
    }

    fn var(s: &str) -> WordTerm {
        WordTerm::Variable(s.to_string())
    }

    #[test]
    fn test_flatten_literal() {
        let mut tm = TermManager::new();
        let mut session = Session::new();
        let ab = tm.mk_str_lit("ab");
        let word = flatten_concat(&tm, &mut session, ab).unwrap();
        assert_eq!(word.as_slice(), &[lit("ab")]);
    }

    #[test]
    fn test_flatten_nested_concat() {
        let mut tm = TermManager::new();
        let mut session = Session::new();
        let x = tm.mk_var("x", tm.sorts.string_sort);
        let a = tm.mk_str_lit("a");
        let b = tm.mk_str_lit("b");
        let inner = tm.mk_str_concat(a, x);
        let outer = tm.mk_str_concat(inner, b);

        let word = flatten_concat(&tm, &mut session, outer).unwrap();
        assert_eq!(word.as_slice(), &[lit("a"), var("x"), lit("b")]);
        assert_eq!(session.var_map.term_of("x"), Some(x));
    }

    #[test]
    fn test_flatten_idempotent() {
        let mut tm = TermManager::new();
        let mut session = Session::new();
        let x = tm.mk_var("x", tm.sorts.string_sort);
        let ab = tm.mk_str_lit("ab");
        let cat = tm.mk_str_concat(x, ab);

        let first = flatten_concat(&tm, &mut session, cat).unwrap();
        let second = flatten_concat(&tm, &mut session, cat).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_flatten_through_replacement() {
        let mut tm = TermManager::new();
        let mut session = Session::new();
        let x = tm.mk_var("x", tm.sorts.string_sort);
        let zero = tm.mk_int(0.into());
        let two = tm.mk_int(2.into());
        let substr = tm.mk_str_substr(x, zero, two);
        let placeholder = tm.mk_var("substr!0", tm.sorts.string_sort);
        session.register_replacement(substr, placeholder);

        let word = flatten_concat(&tm, &mut session, substr).unwrap();
        assert_eq!(word.as_slice(), &[var("substr!0")]);
    }

    #[test]
    fn test_flatten_missing_replacement_fatal() {
        let mut tm = TermManager::new();
        let mut session = Session::new();
        let x = tm.mk_var("x", tm.sorts.string_sort);
        let zero = tm.mk_int(0.into());
        let two = tm.mk_int(2.into());
        let substr = tm.mk_str_substr(x, zero, two);

        let err = flatten_concat(&tm, &mut session, substr).unwrap_err();
        assert!(matches!(err, TheoryError::MissingReplacement(_)));
    }

    #[test]
    fn test_to_predicate_commuted_sides() {
        // x . "ab" = "ab" . x
        let mut tm = TermManager::new();
        let mut session = Session::new();
        let x = tm.mk_var("x", tm.sorts.string_sort);
        let ab = tm.mk_str_lit("ab");
        let lhs = tm.mk_str_concat(x, ab);
        let rhs = tm.mk_str_concat(ab, x);
        let eq = tm.mk_eq(lhs, rhs);

        let predicate = to_predicate(&tm, &mut session, eq).unwrap();
        assert_eq!(predicate.kind, PredicateKind::Equation);
        assert_eq!(predicate.left.as_slice(), &[var("x"), lit("ab")]);
        assert_eq!(predicate.right.as_slice(), &[lit("ab"), var("x")]);
    }

    #[test]
    fn test_to_predicate_negated() {
        let mut tm = TermManager::new();
        let mut session = Session::new();
        let x = tm.mk_var("x", tm.sorts.string_sort);
        let ab = tm.mk_str_lit("ab");
        let eq = tm.mk_eq(x, ab);
        let neq = tm.mk_not(eq);

        let predicate = to_predicate(&tm, &mut session, neq).unwrap();
        assert_eq!(predicate.kind, PredicateKind::Disequation);
    }

    #[test]
    fn test_to_predicate_rejects_non_equation() {
        let mut tm = TermManager::new();
        let mut session = Session::new();
        let x = tm.mk_var("x", tm.sorts.string_sort);
        let ab = tm.mk_str_lit("ab");
        let contains = tm.mk_str_contains(x, ab);

        let err = to_predicate(&tm, &mut session, contains).unwrap_err();
        assert!(matches!(err, TheoryError::NotAnEquation(_)));
    }

    #[test]
    fn test_to_predicate_rejects_int_equation() {
        let mut tm = TermManager::new();
        let mut session = Session::new();
        let i = tm.mk_var("i", tm.sorts.int_sort);
        let five = tm.mk_int(5.into());
        let eq = tm.mk_eq(i, five);

        let err = to_predicate(&tm, &mut session, eq).unwrap_err();
        assert!(matches!(err, TheoryError::UnexpectedSort(_)));
    }

    #[test]
    fn test_build_formula_dedup() {
        let mut tm = TermManager::new();
        let mut session = Session::new();
        let x = tm.mk_var("x", tm.sorts.string_sort);
        let ab = tm.mk_str_lit("ab");
        let eq = tm.mk_eq(x, ab);

        let formula = build_formula(&tm, &mut session, &[eq, eq]).unwrap();
        assert_eq!(formula.len(), 1);
    }

    #[test]
    fn test_translation_deterministic() {
        let mut tm = TermManager::new();
        let x = tm.mk_var("x", tm.sorts.string_sort);
        let ab = tm.mk_str_lit("ab");
        let lhs = tm.mk_str_concat(x, ab);
        let eq = tm.mk_eq(lhs, x);

        let mut s1 = Session::new();
        let mut s2 = Session::new();
        let p1 = to_predicate(&tm, &mut s1, eq).unwrap();
        let p2 = to_predicate(&tm, &mut s2, eq).unwrap();
        assert_eq!(p1, p2);
    }
}
