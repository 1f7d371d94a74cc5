//! Word equations over abstract terms.
//!
//! The decision procedure never sees solver terms; it sees [`Predicate`]s
//! built from [`WordTerm`]s, collected into a duplicate-free [`Formula`].
//! Variable identity is the declared name of the originating zero-arity
//! term node, which the hash-consing term manager keeps stable for the
//! session.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::fmt;

/// An abstract term of a word equation: a literal or a variable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WordTerm {
    /// A string literal.
    Literal(String),
    /// A string variable, identified by its declared name.
    Variable(String),
}

impl WordTerm {
    /// Whether this is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(self, WordTerm::Literal(_))
    }

    /// Whether this is a variable.
    pub fn is_variable(&self) -> bool {
        matches!(self, WordTerm::Variable(_))
    }
}

impl fmt::Display for WordTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordTerm::Literal(s) => write!(f, "{s:?}"),
            WordTerm::Variable(name) => write!(f, "{name}"),
        }
    }
}

/// One side of a word equation: a flattened sequence of abstract terms.
pub type Word = SmallVec<[WordTerm; 4]>;

/// Polarity of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredicateKind {
    /// Word equality.
    Equation,
    /// Word disequality.
    Disequation,
}

/// A single word (dis)equation over abstract terms.
///
/// Both sides are fully flattened: no concatenation structure remains.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate {
    /// Polarity of the predicate.
    pub kind: PredicateKind,
    /// Left-hand side.
    pub left: Word,
    /// Right-hand side.
    pub right: Word,
}

impl Predicate {
    /// Create an equation.
    pub fn equation(left: Word, right: Word) -> Self {
        Self {
            kind: PredicateKind::Equation,
            left,
            right,
        }
    }

    /// Create a disequation.
    pub fn disequation(left: Word, right: Word) -> Self {
        Self {
            kind: PredicateKind::Disequation,
            left,
            right,
        }
    }

    /// Iterate over the abstract terms of both sides.
    pub fn terms(&self) -> impl Iterator<Item = &WordTerm> {
        self.left.iter().chain(self.right.iter())
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.kind {
            PredicateKind::Equation => "=",
            PredicateKind::Disequation => "!=",
        };
        let side = |word: &Word| {
            word.iter()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(" . ")
        };
        write!(f, "{} {} {}", side(&self.left), op, side(&self.right))
    }
}

/// A conjunction of predicates.
///
/// Duplicate-free; insertion order is preserved so diagnostics are
/// deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formula {
    predicates: Vec<Predicate>,
    seen: FxHashSet<Predicate>,
}

impl Formula {
    /// Create an empty formula.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a predicate. Returns `false` if it was already present.
    pub fn insert(&mut self, predicate: Predicate) -> bool {
        if self.seen.contains(&predicate) {
            return false;
        }
        self.seen.insert(predicate.clone());
        self.predicates.push(predicate);
        true
    }

    /// The predicates in insertion order.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Number of distinct predicates.
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Whether the formula is empty.
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// The set of variable identities occurring anywhere in the formula.
    pub fn variables(&self) -> FxHashSet<String> {
        let mut vars = FxHashSet::default();
        for predicate in &self.predicates {
            for term in predicate.terms() {
                if let WordTerm::Variable(name) = term {
                    vars.insert(name.clone());
                }
            }
        }
        vars
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, predicate) in self.predicates.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{predicate}")?;
        }
        Ok(())
    }
}
