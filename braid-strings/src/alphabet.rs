//! Alphabet accumulated from the asserted constraint set.
//!
//! Every literal character reachable in a string-producing term must end
//! up here; operators denoting "any character" are recorded by the
//! `unconstrained` marker instead of being enumerated. The symbol set is
//! ordered so automata construction sees a deterministic alphabet.

use std::collections::BTreeSet;

/// The set of characters relevant to the current constraint set, plus a
/// marker for "any character" positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alphabet {
    symbols: BTreeSet<char>,
    unconstrained: bool,
}

impl Alphabet {
    /// Create an empty alphabet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single character.
    pub fn insert_char(&mut self, c: char) {
        self.symbols.insert(c);
    }

    /// Add every character of a literal.
    pub fn insert_str(&mut self, s: &str) {
        self.symbols.extend(s.chars());
    }

    /// Record that an "any character" position was seen.
    pub fn mark_unconstrained(&mut self) {
        self.unconstrained = true;
    }

    /// Whether a character is in the enumerated symbol set.
    pub fn contains(&self, c: char) -> bool {
        self.symbols.contains(&c)
    }

    /// Whether an "any character" position was seen.
    pub fn is_unconstrained(&self) -> bool {
        self.unconstrained
    }

    /// The enumerated symbols, in character order.
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.symbols.iter().copied()
    }

    /// Number of enumerated symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Whether no symbol and no marker has been recorded.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty() && !self.unconstrained
    }

    /// Remove every symbol and clear the marker.
    pub fn clear(&mut self) {
        self.symbols.clear();
        self.unconstrained = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_str() {
        let mut alphabet = Alphabet::new();
        alphabet.insert_str("abba");
        assert_eq!(alphabet.len(), 2);
        assert!(alphabet.contains('a'));
        assert!(alphabet.contains('b'));
        assert!(!alphabet.contains('c'));
    }

    #[test]
    fn test_symbols_ordered() {
        let mut alphabet = Alphabet::new();
        alphabet.insert_str("cba");
        let collected: Vec<char> = alphabet.symbols().collect();
        assert_eq!(collected, vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_unconstrained_marker() {
        let mut alphabet = Alphabet::new();
        assert!(alphabet.is_empty());
        alphabet.mark_unconstrained();
        assert!(!alphabet.is_empty());
        assert!(alphabet.is_unconstrained());
        assert_eq!(alphabet.len(), 0);
    }
}
