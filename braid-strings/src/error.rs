//! Error type for the string theory layer.
//!
//! Every variant is a fatal internal-invariant violation: a silently
//! mistranslated or dropped constraint would make the overall result
//! unsound, so translation aborts for the whole round instead. Known
//! incompleteness (not-contains constraints, an engine answering unknown)
//! is *not* an error; it surfaces as an `Unknown` result.

use thiserror::Error;

/// Error type for translation and bookkeeping operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TheoryError {
    /// A regex operator outside the explicit alphabet-collection
    /// allow-list was reached.
    #[error("unsupported regex operator in alphabet collection: {0}")]
    UnsupportedRegexOp(String),
    /// A variable occurred directly under a regex operator.
    #[error("variable occurs in regex position: {0}")]
    VariableInRegex(String),
    /// A compound string function had no registered placeholder.
    #[error("no replacement registered for compound term: {0}")]
    MissingReplacement(String),
    /// A term handed to the formula builder was not an equation or a
    /// negated equation.
    #[error("not an equation or negated equation: {0}")]
    NotAnEquation(String),
    /// An equality was notified over a sort this layer does not handle.
    #[error("unexpected sort for string constraint: {0}")]
    UnexpectedSort(String),
    /// A membership subject did not flatten to a single variable.
    #[error("membership subject is not a single variable: {0}")]
    MembershipSubject(String),
    /// More scopes were popped than are open.
    #[error("pop of {requested} scopes exceeds open depth {depth}")]
    ScopeUnderflow {
        /// Number of scopes the host asked to pop.
        requested: usize,
        /// Number of scopes actually open.
        depth: usize,
    },
    /// A length-constraint tree violated its arity invariants.
    #[error("malformed length formula: {0}")]
    MalformedLengthFormula(String),
    /// The automaton provider reported a construction failure.
    #[error("automaton construction failed: {0}")]
    Automaton(String),
}

/// Result type for translation and bookkeeping operations.
pub type Result<T> = std::result::Result<T, TheoryError>;
