//! Scope-stack-aware storage of asserted string constraints.
//!
//! Six independent kinds of constraint are tracked, each in a
//! [`ScopedVec`] of frames mirroring the host solver's push/pop protocol.
//! Popping discards frames outright; a discarded constraint cannot
//! resurface, so re-asserting the same term later is indistinguishable
//! from a first assertion.

use crate::error::{Result, TheoryError};
use braid_core::TermId;

/// A pair of terms making up one (dis)equality or not-contains
/// constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TermPair {
    /// Left term (haystack, for not-contains).
    pub left: TermId,
    /// Right term (needle, for not-contains).
    pub right: TermId,
}

impl TermPair {
    /// Create a pair.
    pub fn new(left: TermId, right: TermId) -> Self {
        Self { left, right }
    }
}

/// A regular-expression membership constraint with polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MembershipConstraint {
    /// The string term constrained by the membership.
    pub subject: TermId,
    /// The regular-expression term.
    pub regex: TermId,
    /// `true` for `str.in_re`, `false` for its negation.
    pub positive: bool,
}

/// A vector of frames mirroring the host's scope stack.
///
/// The base frame (depth 0) is always present and never popped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedVec<T> {
    frames: Vec<Vec<T>>,
}

impl<T: Clone> ScopedVec<T> {
    /// Create with a single empty base frame.
    pub fn new() -> Self {
        Self {
            frames: vec![Vec::new()],
        }
    }

    /// Append to the innermost frame.
    pub fn push_entry(&mut self, entry: T) {
        self.frames
            .last_mut()
            .expect("base frame always present")
            .push(entry);
    }

    /// Open a new empty frame.
    pub fn push_frame(&mut self) {
        self.frames.push(Vec::new());
    }

    /// Discard the top `k` frames and everything they contain. The base
    /// frame cannot be popped; asking for more frames than are open
    /// fails without mutating the stack.
    pub fn pop_frames(&mut self, k: usize) -> Result<()> {
        let depth = self.depth();
        if k > depth {
            return Err(TheoryError::ScopeUnderflow {
                requested: k,
                depth,
            });
        }
        self.frames.truncate(self.frames.len() - k);
        Ok(())
    }

    /// Number of open frames beyond the base frame.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }

    /// Iterate over all live entries, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.frames.iter().flatten()
    }

    /// Number of live entries across all frames.
    pub fn len(&self) -> usize {
        self.frames.iter().map(Vec::len).sum()
    }

    /// Whether no entry is live.
    pub fn is_empty(&self) -> bool {
        self.frames.iter().all(Vec::is_empty)
    }

    /// Drop all frames and entries, back to a single empty base frame.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.frames.push(Vec::new());
    }
}

impl<T: Clone> Default for ScopedVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// The six scoped stacks of asserted string constraints.
#[derive(Debug, Clone, Default)]
pub struct ConstraintStore {
    word_eqs: ScopedVec<TermPair>,
    word_diseqs: ScopedVec<TermPair>,
    lang_eqs: ScopedVec<TermPair>,
    lang_diseqs: ScopedVec<TermPair>,
    not_contains: ScopedVec<TermPair>,
    memberships: ScopedVec<MembershipConstraint>,
}

/// Owned copies of all currently-live constraints, per kind. Input to
/// relevancy filtering; also usable for state-equality assertions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    /// Live word equalities.
    pub word_eqs: Vec<TermPair>,
    /// Live word disequalities.
    pub word_diseqs: Vec<TermPair>,
    /// Live language equalities.
    pub lang_eqs: Vec<TermPair>,
    /// Live language disequalities.
    pub lang_diseqs: Vec<TermPair>,
    /// Live not-contains constraints.
    pub not_contains: Vec<TermPair>,
    /// Live membership constraints.
    pub memberships: Vec<MembershipConstraint>,
}

impl ConstraintStore {
    /// Create an empty store at scope depth 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a word equality.
    pub fn add_word_eq(&mut self, pair: TermPair) {
        self.word_eqs.push_entry(pair);
    }

    /// Record a word disequality.
    pub fn add_word_diseq(&mut self, pair: TermPair) {
        self.word_diseqs.push_entry(pair);
    }

    /// Record a language equality.
    pub fn add_lang_eq(&mut self, pair: TermPair) {
        self.lang_eqs.push_entry(pair);
    }

    /// Record a language disequality.
    pub fn add_lang_diseq(&mut self, pair: TermPair) {
        self.lang_diseqs.push_entry(pair);
    }

    /// Record a not-contains constraint.
    pub fn add_not_contains(&mut self, pair: TermPair) {
        self.not_contains.push_entry(pair);
    }

    /// Record a membership constraint.
    pub fn add_membership(&mut self, constraint: MembershipConstraint) {
        self.memberships.push_entry(constraint);
    }

    /// Open a new scope on all six stacks at once.
    pub fn push_scope(&mut self) {
        self.word_eqs.push_frame();
        self.word_diseqs.push_frame();
        self.lang_eqs.push_frame();
        self.lang_diseqs.push_frame();
        self.not_contains.push_frame();
        self.memberships.push_frame();
    }

    /// Discard the top `k` scopes from all six stacks at once.
    ///
    /// The open-frame count must match the host's scope depth; popping
    /// more scopes than are open is a fatal invariant violation.
    pub fn pop_scopes(&mut self, k: usize) -> Result<()> {
        // All six stacks share one depth, so the first check covers the
        // rest and a failure leaves the store untouched.
        self.word_eqs.pop_frames(k)?;
        self.word_diseqs.pop_frames(k)?;
        self.lang_eqs.pop_frames(k)?;
        self.lang_diseqs.pop_frames(k)?;
        self.not_contains.pop_frames(k)?;
        self.memberships.pop_frames(k)?;
        Ok(())
    }

    /// Current scope depth.
    pub fn depth(&self) -> usize {
        self.word_eqs.depth()
    }

    /// Owned copies of every live constraint, per kind.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            word_eqs: self.word_eqs.iter().copied().collect(),
            word_diseqs: self.word_diseqs.iter().copied().collect(),
            lang_eqs: self.lang_eqs.iter().copied().collect(),
            lang_diseqs: self.lang_diseqs.iter().copied().collect(),
            not_contains: self.not_contains.iter().copied().collect(),
            memberships: self.memberships.iter().copied().collect(),
        }
    }

    /// Drop every constraint and every scope.
    pub fn clear(&mut self) {
        self.word_eqs.clear();
        self.word_diseqs.clear();
        self.lang_eqs.clear();
        self.lang_diseqs.clear();
        self.not_contains.clear();
        self.memberships.clear();
    }
}
