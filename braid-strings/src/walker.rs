//! Pure traversals over the solver term graph.
//!
//! Three collectors feed the translation layer: variables, literal
//! symbols, and length sub-terms. All three are plain recursive walks;
//! recursion depth is bounded by the host's own term-depth bound.
//!
//! Symbol collection follows an explicit per-operator table over the
//! regex shapes. Operators outside the allow-list are a fatal error
//! rather than being skipped: an alphabet missing characters would
//! silently corrupt every automaton built from it.

use crate::alphabet::Alphabet;
use crate::error::{Result, TheoryError};
use braid_core::{SortKind, TermId, TermKind, TermManager};
use rustc_hash::FxHashSet;

/// Collect every variable occurring in `node`.
///
/// A zero-child node that is not a literal-like leaf is a variable;
/// literals contribute nothing; compound nodes recurse into every child.
pub fn collect_variables(tm: &TermManager, node: TermId) -> FxHashSet<TermId> {
    let mut vars = FxHashSet::default();
    collect_variables_rec(tm, node, &mut vars);
    vars
}

fn collect_variables_rec(tm: &TermManager, node: TermId, vars: &mut FxHashSet<TermId>) {
    match tm.kind(node) {
        TermKind::Var(_) => {
            vars.insert(node);
        }
        _ => {
            for child in tm.children(node) {
                collect_variables_rec(tm, child, vars);
            }
        }
    }
}

/// Collect every literal character reachable from `node` into `alphabet`.
///
/// Regex shapes follow the explicit table described in the module
/// documentation; any other compound node is walked structurally.
pub fn collect_symbols(tm: &TermManager, node: TermId, alphabet: &mut Alphabet) -> Result<()> {
    match tm.kind(node) {
        TermKind::StrLit(s) => {
            alphabet.insert_str(s);
            Ok(())
        }
        TermKind::Var(_) => {
            // A variable in regex position has no defined alphabet
            // contribution; refuse rather than guess.
            if tm.sorts.get(tm.sort_of(node)) == SortKind::Regex {
                return Err(TheoryError::VariableInRegex(tm.display(node)));
            }
            Ok(())
        }
        TermKind::ReLit(child) | TermKind::ReStar(child) | TermKind::RePlus(child)
        | TermKind::ReOpt(child) => collect_symbols(tm, *child, alphabet),
        TermKind::ReConcat(left, right) | TermKind::ReUnion(left, right) => {
            collect_symbols(tm, *left, alphabet)?;
            collect_symbols(tm, *right, alphabet)
        }
        TermKind::ReAllChar => {
            alphabet.mark_unconstrained();
            Ok(())
        }
        TermKind::ReComplement(_)
        | TermKind::ReInter(_, _)
        | TermKind::ReDiff(_, _)
        | TermKind::ReDerivative(_, _)
        | TermKind::ReRange(_, _)
        | TermKind::ReLoop(_, _, _)
        | TermKind::ReReverse(_)
        | TermKind::ReOfPred(_) => Err(TheoryError::UnsupportedRegexOp(tm.display(node))),
        _ => {
            for child in tm.children(node) {
                collect_symbols(tm, child, alphabet)?;
            }
            Ok(())
        }
    }
}

/// Collect every `str.len` sub-term of `node`.
pub fn collect_length_terms(tm: &TermManager, node: TermId) -> FxHashSet<TermId> {
    let mut lens = FxHashSet::default();
    collect_length_terms_rec(tm, node, &mut lens);
    lens
}

fn collect_length_terms_rec(tm: &TermManager, node: TermId, lens: &mut FxHashSet<TermId>) {
    if matches!(tm.kind(node), TermKind::StrLen(_)) {
        lens.insert(node);
        return;
    }
    for child in tm.children(node) {
        collect_length_terms_rec(tm, child, lens);
    }
}
