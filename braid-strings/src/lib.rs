//! Braid Strings - Translation Layer for an Automata-Based String Theory
//!
//! This crate sits between a boolean/arithmetic solver's term
//! representation and an automata-based string-constraint decision
//! procedure. It does four things:
//!
//! - **Term walking**: extract variables, literal alphabets, and length
//!   sub-terms from solver term graphs
//! - **Formula building**: convert term-graph (dis)equalities into word
//!   equations over abstract literals and variables
//! - **Length bridging**: convert the decision procedure's
//!   length-constraint trees back into solver terms for the arithmetic
//!   back-end
//! - **Incremental bookkeeping**: track asserted string constraints
//!   across push/pop and filter them down to the subset relevant to the
//!   current partial boolean assignment
//!
//! It deliberately does *not* decide string satisfiability; the decision
//! procedure, the automaton constructor, and the host solver are
//! consumed through the traits in [`traits`].
//!
//! # Example
//!
//! ```
//! use braid_core::ast::TermManager;
//! use braid_strings::builder::to_predicate;
//! use braid_strings::formula::{PredicateKind, WordTerm};
//! use braid_strings::session::Session;
//!
//! let mut tm = TermManager::new();
//! let mut session = Session::new();
//!
//! // x . "ab" = "ab" . x
//! let x = tm.mk_var("x", tm.sorts.string_sort);
//! let ab = tm.mk_str_lit("ab");
//! let lhs = tm.mk_str_concat(x, ab);
//! let rhs = tm.mk_str_concat(ab, x);
//! let eq = tm.mk_eq(lhs, rhs);
//!
//! let predicate = to_predicate(&tm, &mut session, eq).unwrap();
//! assert_eq!(predicate.kind, PredicateKind::Equation);
//! assert_eq!(predicate.left[0], WordTerm::Variable("x".into()));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod alphabet;
pub mod builder;
pub mod error;
pub mod formula;
pub mod length;
pub mod relevancy;
pub mod session;
pub mod store;
pub mod theory;
pub mod traits;
pub mod walker;

pub use alphabet::Alphabet;
pub use builder::{build_formula, flatten_concat, to_predicate};
pub use error::{Result, TheoryError};
pub use formula::{Formula, Predicate, PredicateKind, Word, WordTerm};
pub use length::{LenAtom, LenNode, len_to_term};
pub use relevancy::{Guarded, RelevantConstraints, relevant_subset};
pub use session::{Session, VariableMap};
pub use store::{ConstraintStore, MembershipConstraint, ScopedVec, StoreSnapshot, TermPair};
pub use theory::{FinalCheck, StringTheory, StringTheoryConfig, TheoryStats};
pub use traits::{
    AutAssignment, AutomatonProvider, DecisionProcedure, LengthChecker, Satisfiability,
    SolveOutcome, TruthAssignment,
};
pub use walker::{collect_length_terms, collect_symbols, collect_variables};
