//! Sort system for the braid term language.
//!
//! The string theory layer only ever sees four sorts: booleans, integers,
//! strings, and regular-expression languages. The table is fixed at
//! construction; well-known sorts are exposed as public fields so callers
//! write `tm.sorts.string_sort` instead of looking names up.

/// Sort identifier, an index into the [`Sorts`] table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SortId(pub u32);

/// The kinds of sorts the string theory layer works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKind {
    /// Boolean sort.
    Bool,
    /// Mathematical integer sort.
    Int,
    /// String sort (sequences of unicode characters).
    String,
    /// Regular-language sort (`RegLan` in SMT-LIB).
    Regex,
}

/// Sort table with well-known sort ids.
#[derive(Debug, Clone)]
pub struct Sorts {
    kinds: Vec<SortKind>,
    /// The boolean sort.
    pub bool_sort: SortId,
    /// The integer sort.
    pub int_sort: SortId,
    /// The string sort.
    pub string_sort: SortId,
    /// The regular-language sort.
    pub regex_sort: SortId,
}

impl Sorts {
    /// Create the sort table with the four well-known sorts registered.
    pub fn new() -> Self {
        let kinds = vec![
            SortKind::Bool,
            SortKind::Int,
            SortKind::String,
            SortKind::Regex,
        ];
        Self {
            kinds,
            bool_sort: SortId(0),
            int_sort: SortId(1),
            string_sort: SortId(2),
            regex_sort: SortId(3),
        }
    }

    /// Get the kind of a sort.
    pub fn get(&self, id: SortId) -> SortKind {
        self.kinds[id.0 as usize]
    }
}

impl Default for Sorts {
    fn default() -> Self {
        Self::new()
    }
}
