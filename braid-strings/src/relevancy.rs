//! Filtering stored constraints down to the currently relevant subset.
//!
//! The store holds everything ever asserted in live scopes; only the
//! constraints whose guarding boolean atom is true under the current
//! partial assignment go to the decision procedure. Guard atoms are
//! rebuilt through the hash-consing manager, so the lookup finds exactly
//! the atom the host branched on; equality guards are probed in both
//! orientations because the host may have built either.
//!
//! Recomputed from scratch every decision round; never cached, since the
//! relevant subset can change with every boolean decision.

use crate::store::{MembershipConstraint, StoreSnapshot, TermPair};
use crate::traits::TruthAssignment;
use braid_core::{TermId, TermManager};
use tracing::trace;

/// A constraint kept by the filter, together with the guard atom that
/// tested true. The guards feed refinement-lemma construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guarded<T> {
    /// The constraint itself.
    pub constraint: T,
    /// The boolean atom under which it is asserted.
    pub guard: TermId,
}

/// The relevant subset of one snapshot, per kind.
///
/// Language constraints carry an equation/disequation flag; memberships
/// carry their polarity inside the constraint. Not-contains constraints
/// are collected but never forwarded to the decision procedure: the
/// procedure does not decide that fragment, so their presence forces an
/// unknown round.
#[derive(Debug, Clone, Default)]
pub struct RelevantConstraints {
    /// Word equalities asserted true.
    pub word_eqs: Vec<Guarded<TermPair>>,
    /// Word disequalities asserted true.
    pub word_diseqs: Vec<Guarded<TermPair>>,
    /// Language constraints asserted true; `true` flags an equation.
    pub lang: Vec<(Guarded<TermPair>, bool)>,
    /// Membership constraints asserted true.
    pub memberships: Vec<Guarded<MembershipConstraint>>,
    /// Not-contains constraints asserted true.
    pub not_contains: Vec<Guarded<TermPair>>,
}

impl RelevantConstraints {
    /// Total number of relevant constraints across all kinds.
    pub fn len(&self) -> usize {
        self.word_eqs.len()
            + self.word_diseqs.len()
            + self.lang.len()
            + self.memberships.len()
            + self.not_contains.len()
    }

    /// Whether no constraint is relevant.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every guard atom of every kept constraint.
    pub fn guards(&self) -> Vec<TermId> {
        let mut guards = Vec::with_capacity(self.len());
        guards.extend(self.word_eqs.iter().map(|g| g.guard));
        guards.extend(self.word_diseqs.iter().map(|g| g.guard));
        guards.extend(self.lang.iter().map(|(g, _)| g.guard));
        guards.extend(self.memberships.iter().map(|g| g.guard));
        guards.extend(self.not_contains.iter().map(|g| g.guard));
        guards
    }
}

/// The equality guard of a pair that is currently true, probing both
/// orientations.
fn true_eq_guard(
    tm: &mut TermManager,
    assignment: &dyn TruthAssignment,
    pair: TermPair,
) -> Option<TermId> {
    let eq = tm.mk_eq(pair.left, pair.right);
    if assignment.is_true(eq) {
        return Some(eq);
    }
    let eq_rev = tm.mk_eq(pair.right, pair.left);
    if assignment.is_true(eq_rev) {
        return Some(eq_rev);
    }
    None
}

/// The negated-equality guard of a pair that is currently true, probing
/// both orientations.
fn true_diseq_guard(
    tm: &mut TermManager,
    assignment: &dyn TruthAssignment,
    pair: TermPair,
) -> Option<TermId> {
    let eq = tm.mk_eq(pair.left, pair.right);
    let neq = tm.mk_not(eq);
    if assignment.is_true(neq) {
        return Some(neq);
    }
    let eq_rev = tm.mk_eq(pair.right, pair.left);
    let neq_rev = tm.mk_not(eq_rev);
    if assignment.is_true(neq_rev) {
        return Some(neq_rev);
    }
    None
}

/// Compute the relevant subset of a snapshot under the current partial
/// boolean assignment.
pub fn relevant_subset(
    snapshot: &StoreSnapshot,
    assignment: &dyn TruthAssignment,
    tm: &mut TermManager,
) -> RelevantConstraints {
    let mut relevant = RelevantConstraints::default();

    for &pair in &snapshot.word_eqs {
        if let Some(guard) = true_eq_guard(tm, assignment, pair) {
            trace!(guard = %tm.display(guard), "relevant word equality");
            relevant.word_eqs.push(Guarded {
                constraint: pair,
                guard,
            });
        }
    }
    for &pair in &snapshot.word_diseqs {
        if let Some(guard) = true_diseq_guard(tm, assignment, pair) {
            trace!(guard = %tm.display(guard), "relevant word disequality");
            relevant.word_diseqs.push(Guarded {
                constraint: pair,
                guard,
            });
        }
    }
    for &pair in &snapshot.lang_eqs {
        if let Some(guard) = true_eq_guard(tm, assignment, pair) {
            trace!(guard = %tm.display(guard), "relevant language equality");
            relevant.lang.push((
                Guarded {
                    constraint: pair,
                    guard,
                },
                true,
            ));
        }
    }
    for &pair in &snapshot.lang_diseqs {
        if let Some(guard) = true_diseq_guard(tm, assignment, pair) {
            trace!(guard = %tm.display(guard), "relevant language disequality");
            relevant.lang.push((
                Guarded {
                    constraint: pair,
                    guard,
                },
                false,
            ));
        }
    }
    for &membership in &snapshot.memberships {
        let atom = tm.mk_str_in_re(membership.subject, membership.regex);
        let guard = if membership.positive {
            atom
        } else {
            tm.mk_not(atom)
        };
        if assignment.is_true(guard) {
            trace!(guard = %tm.display(guard), "relevant membership");
            relevant.memberships.push(Guarded {
                constraint: membership,
                guard,
            });
        }
    }
    for &pair in &snapshot.not_contains {
        let contains = tm.mk_str_contains(pair.left, pair.right);
        let guard = tm.mk_not(contains);
        if assignment.is_true(guard) {
            trace!(guard = %tm.display(guard), "relevant not-contains");
            relevant.not_contains.push(Guarded {
                constraint: pair,
                guard,
            });
        }
    }

    relevant
}
