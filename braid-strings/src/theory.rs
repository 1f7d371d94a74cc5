//! Theory-plugin surface: orchestration of translation, bookkeeping,
//! relevancy, and the external decision procedure.
//!
//! [`StringTheory`] receives constraint notifications from the host's
//! callback protocol, keeps the scoped constraint store in lock-step with
//! the host's push/pop, and on each final check hands the relevant
//! constraint subset to the decision procedure. Conflicts come back as a
//! refinement lemma: the negated conjunction of every guard atom that
//! made a constraint relevant this round.

use crate::builder::{flatten_concat, to_predicate};
use crate::error::{Result, TheoryError};
use crate::formula::{Formula, WordTerm};
use crate::length::{LenNode, len_to_term};
use crate::relevancy::{RelevantConstraints, relevant_subset};
use crate::session::Session;
use crate::store::{ConstraintStore, MembershipConstraint, StoreSnapshot, TermPair};
use crate::traits::{
    AutAssignment, AutomatonProvider, DecisionProcedure, LengthChecker, Satisfiability,
    SolveOutcome, TruthAssignment,
};
use crate::walker::{collect_length_terms, collect_symbols, collect_variables};
use braid_core::{SortKind, TermId, TermKind, TermManager};
use rustc_hash::FxHashSet;
use std::collections::hash_map::Entry;
use tracing::debug;

/// Configuration of the theory plugin.
#[derive(Debug, Clone, Default)]
pub struct StringTheoryConfig {
    /// Try the decision procedure's under-approximating variant when the
    /// exact one answers unknown. Off by default.
    pub underapprox: bool,
}

/// Counters over the lifetime of the theory object.
#[derive(Debug, Clone, Default)]
pub struct TheoryStats {
    /// Final checks run.
    pub final_checks: u64,
    /// Final checks that ended sat.
    pub sat: u64,
    /// Final checks that ended unsat.
    pub unsat: u64,
    /// Final checks that ended unknown.
    pub unknown: u64,
    /// Refinement lemmas constructed.
    pub refinements: u64,
    /// Placeholder variables minted for compound string functions.
    pub placeholders: u64,
}

/// Outcome of one final check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinalCheck {
    /// The relevant constraints are satisfiable.
    Sat,
    /// The relevant constraints are unsatisfiable; asserting the
    /// refinement lemma blocks the current assignment.
    Unsat {
        /// Negated conjunction of every relevant guard atom.
        refinement: TermId,
    },
    /// This fragment cannot be decided; the host must fall back.
    Unknown,
}

/// The string theory plugin's coordination state.
#[derive(Debug, Default)]
pub struct StringTheory {
    session: Session,
    store: ConstraintStore,
    len_var_names: FxHashSet<String>,
    config: StringTheoryConfig,
    stats: TheoryStats,
}

impl StringTheory {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with the given configuration.
    pub fn with_config(config: StringTheoryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The session state (variable map, alphabet, replacements).
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Lifetime counters.
    pub fn stats(&self) -> &TheoryStats {
        &self.stats
    }

    /// Current scope depth.
    pub fn depth(&self) -> usize {
        self.store.depth()
    }

    /// Owned copies of every live constraint.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.snapshot()
    }

    // ------------------------------------------------------------------
    // Constraint notifications
    // ------------------------------------------------------------------

    fn absorb_symbols(&mut self, tm: &TermManager, node: TermId) -> Result<()> {
        collect_symbols(tm, node, &mut self.session.alphabet)
    }

    /// An equality between two terms became relevant. Routed by sort:
    /// string equalities are word equations, regex equalities are
    /// language equations; anything else is not this theory's business
    /// and fatal.
    pub fn notify_eq(&mut self, tm: &TermManager, left: TermId, right: TermId) -> Result<()> {
        self.absorb_symbols(tm, left)?;
        self.absorb_symbols(tm, right)?;
        match tm.sorts.get(tm.sort_of(left)) {
            SortKind::String => {
                self.store.add_word_eq(TermPair::new(left, right));
                Ok(())
            }
            SortKind::Regex => {
                self.store.add_lang_eq(TermPair::new(left, right));
                Ok(())
            }
            _ => Err(TheoryError::UnexpectedSort(tm.display(left))),
        }
    }

    /// A disequality between two terms became relevant.
    pub fn notify_diseq(&mut self, tm: &TermManager, left: TermId, right: TermId) -> Result<()> {
        self.absorb_symbols(tm, left)?;
        self.absorb_symbols(tm, right)?;
        match tm.sorts.get(tm.sort_of(left)) {
            SortKind::String => {
                self.store.add_word_diseq(TermPair::new(left, right));
                Ok(())
            }
            SortKind::Regex => {
                self.store.add_lang_diseq(TermPair::new(left, right));
                Ok(())
            }
            _ => Err(TheoryError::UnexpectedSort(tm.display(left))),
        }
    }

    /// A regular-expression membership became relevant.
    pub fn notify_membership(
        &mut self,
        tm: &TermManager,
        subject: TermId,
        regex: TermId,
        positive: bool,
    ) -> Result<()> {
        self.absorb_symbols(tm, subject)?;
        self.absorb_symbols(tm, regex)?;
        self.store.add_membership(MembershipConstraint {
            subject,
            regex,
            positive,
        });
        Ok(())
    }

    /// A not-contains constraint became relevant. Stored for relevancy
    /// tracking only; the decision procedure does not decide this
    /// fragment.
    pub fn notify_not_contains(
        &mut self,
        tm: &TermManager,
        haystack: TermId,
        needle: TermId,
    ) -> Result<()> {
        self.absorb_symbols(tm, haystack)?;
        self.absorb_symbols(tm, needle)?;
        self.store.add_not_contains(TermPair::new(haystack, needle));
        Ok(())
    }

    /// A term containing `str.len` applications was internalized. Marks
    /// the variables under each length application as length-sensitive.
    pub fn notify_length_term(&mut self, tm: &TermManager, node: TermId) {
        for len_term in collect_length_terms(tm, node) {
            if let TermKind::StrLen(arg) = tm.kind(len_term) {
                for var in collect_variables(tm, *arg) {
                    if let Some(name) = tm.var_name(var) {
                        self.len_var_names.insert(name.to_string());
                        self.session.var_map.insert(name, var);
                    }
                }
            }
        }
    }

    /// Register an externally chosen placeholder for a compound string
    /// function node.
    pub fn register_replacement(&mut self, source: TermId, placeholder: TermId) {
        self.session.register_replacement(source, placeholder);
    }

    /// Mint and register a placeholder variable for a compound string
    /// function node. Idempotent per node.
    pub fn substitute_compound(&mut self, tm: &mut TermManager, node: TermId) -> TermId {
        if let Some(existing) = self.session.replacement_of(node) {
            return existing;
        }
        let string_sort = tm.sorts.string_sort;
        let placeholder = tm.mk_fresh_var("str", string_sort);
        self.session.register_replacement(node, placeholder);
        self.stats.placeholders += 1;
        placeholder
    }

    // ------------------------------------------------------------------
    // Scope management
    // ------------------------------------------------------------------

    /// The host opened a scope.
    pub fn push_scope(&mut self) {
        self.store.push_scope();
        debug!(depth = self.store.depth(), "pushed scope");
    }

    /// The host backtracked `k` scopes.
    pub fn pop_scopes(&mut self, k: usize) -> Result<()> {
        self.store.pop_scopes(k)?;
        debug!(popped = k, depth = self.store.depth(), "popped scopes");
        Ok(())
    }

    /// Full reset: drop session state, constraints, and scopes.
    pub fn reset(&mut self) {
        self.session.reset();
        self.store.clear();
        self.len_var_names.clear();
        debug!("theory reset");
    }

    // ------------------------------------------------------------------
    // Final check
    // ------------------------------------------------------------------

    fn refinement(&mut self, tm: &mut TermManager, relevant: &RelevantConstraints) -> TermId {
        let guards = relevant.guards();
        let conjunction = tm.mk_and(guards);
        self.stats.refinements += 1;
        tm.mk_not(conjunction)
    }

    fn conclude_sat(&mut self) -> FinalCheck {
        self.stats.sat += 1;
        FinalCheck::Sat
    }

    fn conclude_unknown(&mut self) -> FinalCheck {
        self.stats.unknown += 1;
        FinalCheck::Unknown
    }

    fn conclude_unsat(
        &mut self,
        tm: &mut TermManager,
        relevant: &RelevantConstraints,
    ) -> FinalCheck {
        let refinement = self.refinement(tm, relevant);
        self.stats.unsat += 1;
        FinalCheck::Unsat { refinement }
    }

    fn check_lengths<L: LengthChecker>(
        &mut self,
        tm: &mut TermManager,
        lengths: &mut L,
        relevant: &RelevantConstraints,
        len_tree: &LenNode,
    ) -> Result<FinalCheck> {
        let len_formula = len_to_term(tm, &mut self.session.var_map, len_tree)?;
        debug!(formula = %tm.display(len_formula), "checking length formula");
        Ok(match lengths.check_len_sat(tm, len_formula) {
            Satisfiability::Sat => self.conclude_sat(),
            Satisfiability::Unsat => self.conclude_unsat(tm, relevant),
            Satisfiability::Unknown => self.conclude_unknown(),
        })
    }

    /// Run one decision round over the currently relevant constraints.
    ///
    /// Not-contains constraints asserted true force an unknown result:
    /// the decision procedure does not decide that fragment, and
    /// reporting anything stronger would be unsound.
    pub fn final_check<P, E, L>(
        &mut self,
        tm: &mut TermManager,
        assignment: &dyn TruthAssignment,
        provider: &mut P,
        engine: &mut E,
        lengths: &mut L,
    ) -> Result<FinalCheck>
    where
        P: AutomatonProvider,
        E: DecisionProcedure<Automaton = P::Automaton>,
        L: LengthChecker,
    {
        self.stats.final_checks += 1;
        let snapshot = self.store.snapshot();
        let relevant = relevant_subset(&snapshot, assignment, tm);
        debug!(
            word_eqs = relevant.word_eqs.len(),
            word_diseqs = relevant.word_diseqs.len(),
            lang = relevant.lang.len(),
            memberships = relevant.memberships.len(),
            not_contains = relevant.not_contains.len(),
            "final check"
        );

        if !relevant.not_contains.is_empty() {
            debug!("not-contains constraint asserted; result unknown");
            return Ok(self.conclude_unknown());
        }

        // Ground language (dis)equalities are resolved right here by
        // automata comparison; a violated one conflicts immediately.
        for (guarded, is_eq) in &relevant.lang {
            let left = provider.from_regex(tm, guarded.constraint.left, &self.session.alphabet)?;
            let right =
                provider.from_regex(tm, guarded.constraint.right, &self.session.alphabet)?;
            let equivalent = provider.equivalent(&left, &right);
            if equivalent != *is_eq {
                debug!("language constraint violated");
                return Ok(self.conclude_unsat(tm, &relevant));
            }
        }

        // The guard atoms are exactly the (dis)equality terms the word
        // formula is built from.
        let mut formula = Formula::new();
        for guarded in relevant.word_eqs.iter().chain(&relevant.word_diseqs) {
            formula.insert(to_predicate(tm, &mut self.session, guarded.guard)?);
        }

        // Memberships become the initial automaton assignment: negative
        // polarity is complemented, several constraints on one variable
        // intersect.
        let mut automata: AutAssignment<P::Automaton> = AutAssignment::default();
        for guarded in &relevant.memberships {
            let membership = guarded.constraint;
            let word = flatten_concat(tm, &mut self.session, membership.subject)?;
            let key = match word.as_slice() {
                [term @ WordTerm::Variable(_)] => term.clone(),
                _ => {
                    return Err(TheoryError::MembershipSubject(
                        tm.display(membership.subject),
                    ));
                }
            };
            let mut automaton = provider.from_regex(tm, membership.regex, &self.session.alphabet)?;
            if !membership.positive {
                automaton = provider.complement(&automaton);
            }
            match automata.entry(key) {
                Entry::Occupied(mut entry) => {
                    let merged = provider.intersect(entry.get(), &automaton);
                    *entry.get_mut() = merged;
                }
                Entry::Vacant(entry) => {
                    entry.insert(automaton);
                }
            }
        }

        // Formula variables without any membership are unconstrained.
        for name in formula.variables() {
            let key = WordTerm::Variable(name);
            automata
                .entry(key)
                .or_insert_with(|| provider.universal(&self.session.alphabet));
        }

        let length_vars: FxHashSet<WordTerm> = automata
            .keys()
            .filter(|term| match term {
                WordTerm::Variable(name) => self.len_var_names.contains(name),
                WordTerm::Literal(_) => false,
            })
            .cloned()
            .collect();

        match engine.solve(&formula, &automata, &length_vars) {
            SolveOutcome::Sat(len_tree) => {
                self.check_lengths(tm, lengths, &relevant, &len_tree)
            }
            SolveOutcome::Unsat => Ok(self.conclude_unsat(tm, &relevant)),
            SolveOutcome::Unknown => {
                if self.config.underapprox {
                    debug!("engine unknown; trying under-approximation");
                    match engine.solve_underapprox(&formula, &automata, &length_vars) {
                        SolveOutcome::Sat(len_tree) => {
                            self.check_lengths(tm, lengths, &relevant, &len_tree)
                        }
                        // An under-approximate unsat proves nothing.
                        SolveOutcome::Unsat | SolveOutcome::Unknown => {
                            Ok(self.conclude_unknown())
                        }
                    }
                } else {
                    Ok(self.conclude_unknown())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_eq_routes_by_sort() {
        let mut tm = TermManager::new();
        let mut theory = StringTheory::new();
        let x = tm.mk_var("x", tm.sorts.string_sort);
        let ab = tm.mk_str_lit("ab");
        theory.notify_eq(&tm, x, ab).unwrap();

        let re1 = tm.mk_re_lit(ab);
        let re2 = tm.mk_re_star(re1);
        theory.notify_eq(&tm, re1, re2).unwrap();

        let snapshot = theory.snapshot();
        assert_eq!(snapshot.word_eqs.len(), 1);
        assert_eq!(snapshot.lang_eqs.len(), 1);
    }

    #[test]
    fn test_notify_eq_rejects_other_sorts() {
        let mut tm = TermManager::new();
        let mut theory = StringTheory::new();
        let i = tm.mk_var("i", tm.sorts.int_sort);
        let five = tm.mk_int(5.into());
        let err = theory.notify_eq(&tm, i, five).unwrap_err();
        assert!(matches!(err, TheoryError::UnexpectedSort(_)));
    }

    #[test]
    fn test_notify_feeds_alphabet() {
        let mut tm = TermManager::new();
        let mut theory = StringTheory::new();
        let x = tm.mk_var("x", tm.sorts.string_sort);
        let ab = tm.mk_str_lit("ab");
        let cat = tm.mk_str_concat(x, ab);
        let cd = tm.mk_str_lit("cd");
        theory.notify_eq(&tm, cat, cd).unwrap();

        for c in "abcd".chars() {
            assert!(theory.session().alphabet.contains(c));
        }
    }

    #[test]
    fn test_alphabet_failure_surfaces_at_assert() {
        let mut tm = TermManager::new();
        let mut theory = StringTheory::new();
        let x = tm.mk_var("x", tm.sorts.string_sort);
        let ab = tm.mk_str_lit("ab");
        let re = tm.mk_re_lit(ab);
        let comp = tm.mk_re_complement(re);
        let err = theory.notify_membership(&tm, x, comp, true).unwrap_err();
        assert!(matches!(err, TheoryError::UnsupportedRegexOp(_)));
    }

    #[test]
    fn test_scope_mismatch_fatal() {
        let mut theory = StringTheory::new();
        theory.push_scope();
        assert!(theory.pop_scopes(1).is_ok());
        assert!(matches!(
            theory.pop_scopes(1),
            Err(TheoryError::ScopeUnderflow { .. })
        ));
    }

    #[test]
    fn test_substitute_compound_idempotent() {
        let mut tm = TermManager::new();
        let mut theory = StringTheory::new();
        let x = tm.mk_var("x", tm.sorts.string_sort);
        let zero = tm.mk_int(0.into());
        let one = tm.mk_int(1.into());
        let substr = tm.mk_str_substr(x, zero, one);

        let first = theory.substitute_compound(&mut tm, substr);
        let second = theory.substitute_compound(&mut tm, substr);
        assert_eq!(first, second);
        assert_eq!(theory.stats().placeholders, 1);
        assert_eq!(tm.sort_of(first), tm.sorts.string_sort);
    }

    #[test]
    fn test_length_sensitive_variables() {
        let mut tm = TermManager::new();
        let mut theory = StringTheory::new();
        let x = tm.mk_var("x", tm.sorts.string_sort);
        let len = tm.mk_str_len(x);
        let five = tm.mk_int(5.into());
        let atom = tm.mk_le(len, five);
        theory.notify_length_term(&tm, atom);

        assert!(theory.len_var_names.contains("x"));
        assert_eq!(theory.session().var_map.term_of("x"), Some(x));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut tm = TermManager::new();
        let mut theory = StringTheory::new();
        let x = tm.mk_var("x", tm.sorts.string_sort);
        let ab = tm.mk_str_lit("ab");
        theory.push_scope();
        theory.notify_eq(&tm, x, ab).unwrap();
        let len = tm.mk_str_len(x);
        theory.notify_length_term(&tm, len);

        theory.reset();
        assert_eq!(theory.depth(), 0);
        assert_eq!(theory.snapshot(), StoreSnapshot::default());
        assert!(theory.session().alphabet.is_empty());
        assert!(theory.len_var_names.is_empty());
    }
}
