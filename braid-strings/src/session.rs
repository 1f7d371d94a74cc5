//! Session-scoped translation state.
//!
//! A [`Session`] owns the state that must survive across incremental
//! push/pop but is discarded on full reset: the bidirectional variable
//! map, the accumulated alphabet, and the replacement map for compound
//! string functions. It is passed explicitly into every walker and
//! builder call rather than living as ambient state.

use crate::alphabet::Alphabet;
use braid_core::TermId;
use rustc_hash::FxHashMap;

/// Bidirectional association between abstract variable identities and
/// the originating solver terms.
///
/// Entries are added lazily on first encounter and never removed
/// mid-session; [`VariableMap::clear`] runs only at full reset.
#[derive(Debug, Clone, Default)]
pub struct VariableMap {
    by_name: FxHashMap<String, TermId>,
    by_term: FxHashMap<TermId, String>,
}

impl VariableMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a variable identity with its originating term. The
    /// first association for a name wins; re-registering the same pair
    /// is a no-op.
    pub fn insert(&mut self, name: &str, term: TermId) {
        self.by_name.entry(name.to_string()).or_insert(term);
        self.by_term.entry(term).or_insert_with(|| name.to_string());
    }

    /// The solver term for a variable identity.
    pub fn term_of(&self, name: &str) -> Option<TermId> {
        self.by_name.get(name).copied()
    }

    /// The variable identity for a solver term.
    pub fn name_of(&self, term: TermId) -> Option<&str> {
        self.by_term.get(&term).map(String::as_str)
    }

    /// Whether an identity is registered.
    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of registered variables.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether no variable is registered.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.by_name.clear();
        self.by_term.clear();
    }
}

/// State owned for the duration of one incremental solving session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Variable identity ↔ originating term.
    pub var_map: VariableMap,
    /// Characters seen in asserted constraints.
    pub alphabet: Alphabet,
    /// Compound string function → its placeholder variable.
    replacements: FxHashMap<TermId, TermId>,
}

impl Session {
    /// Start a fresh session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a placeholder variable standing in for a compound
    /// string function node.
    pub fn register_replacement(&mut self, source: TermId, placeholder: TermId) {
        self.replacements.insert(source, placeholder);
    }

    /// The placeholder registered for a compound node, if any.
    pub fn replacement_of(&self, source: TermId) -> Option<TermId> {
        self.replacements.get(&source).copied()
    }

    /// Full reset: drop all session state.
    pub fn reset(&mut self) {
        self.var_map.clear();
        self.alphabet.clear();
        self.replacements.clear();
    }
}
