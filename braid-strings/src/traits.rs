//! Boundaries with the host solver and the external string machinery.
//!
//! This layer does not decide string satisfiability itself. It consumes
//! a boolean truth assignment and an arithmetic length check from the
//! host, an automaton-construction service, and the automata-based
//! decision procedure, all through the traits here.

use crate::alphabet::Alphabet;
use crate::error::Result;
use crate::formula::{Formula, WordTerm};
use crate::length::LenNode;
use braid_core::{TermId, TermManager};
use rustc_hash::{FxHashMap, FxHashSet};

/// Assignment of string variables to automata, keyed by abstract term.
pub type AutAssignment<A> = FxHashMap<WordTerm, A>;

/// Outcome of one decision-procedure invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// Satisfiable; the carried tree constrains the lengths of the
    /// model's string variables.
    Sat(LenNode),
    /// Unsatisfiable under the given automaton assignment.
    Unsat,
    /// The procedure cannot decide this fragment.
    Unknown,
}

/// Three-valued answer from the arithmetic back-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Satisfiability {
    /// The length formula is satisfiable.
    Sat,
    /// The length formula is unsatisfiable.
    Unsat,
    /// The back-end cannot decide.
    Unknown,
}

/// The host's current partial boolean assignment.
pub trait TruthAssignment {
    /// Whether `atom` is currently asserted true.
    fn is_true(&self, atom: TermId) -> bool;
}

/// Automaton construction service, keyed by the accumulated alphabet.
pub trait AutomatonProvider {
    /// Automaton handle type.
    type Automaton: Clone;

    /// Build the automaton for a regular-expression term.
    fn from_regex(
        &mut self,
        tm: &TermManager,
        regex: TermId,
        alphabet: &Alphabet,
    ) -> Result<Self::Automaton>;

    /// The automaton accepting every word over the alphabet.
    fn universal(&mut self, alphabet: &Alphabet) -> Self::Automaton;

    /// Language complement.
    fn complement(&mut self, automaton: &Self::Automaton) -> Self::Automaton;

    /// Language intersection.
    fn intersect(&mut self, a: &Self::Automaton, b: &Self::Automaton) -> Self::Automaton;

    /// Language equivalence check.
    fn equivalent(&mut self, a: &Self::Automaton, b: &Self::Automaton) -> bool;
}

/// The automata-based word-equation decision procedure.
pub trait DecisionProcedure {
    /// Automaton handle type, shared with the provider used to build
    /// the variable assignment.
    type Automaton: Clone;

    /// Decide the formula under the given variable-to-automaton
    /// assignment. `length_vars` names the variables whose lengths the
    /// caller will check arithmetically afterwards.
    fn solve(
        &mut self,
        formula: &Formula,
        assignment: &AutAssignment<Self::Automaton>,
        length_vars: &FxHashSet<WordTerm>,
    ) -> SolveOutcome;

    /// Under-approximating variant, tried when [`DecisionProcedure::solve`]
    /// answers unknown. Only a sat answer from this method is usable; an
    /// under-approximate unsat proves nothing.
    fn solve_underapprox(
        &mut self,
        _formula: &Formula,
        _assignment: &AutAssignment<Self::Automaton>,
        _length_vars: &FxHashSet<WordTerm>,
    ) -> SolveOutcome {
        SolveOutcome::Unknown
    }
}

/// The host's arithmetic satisfiability check for length formulas.
pub trait LengthChecker {
    /// Check whether the length formula is satisfiable together with the
    /// arithmetic constraints the host already holds.
    fn check_len_sat(&mut self, tm: &TermManager, len_formula: TermId) -> Satisfiability;
}
