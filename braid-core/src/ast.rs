//! Hash-consed term representation.
//!
//! Terms are stored in a single arena owned by [`TermManager`]; a [`TermId`]
//! is an index into that arena. Construction goes through the `mk_*`
//! constructors, which hash-cons: building the same term twice yields the
//! same [`TermId`]. This is what makes variable identity and guard-atom
//! lookup deterministic for the string theory layer sitting on top.
//!
//! The term language is deliberately closed: the string layer switches over
//! [`TermKind`] with exhaustive matches instead of open-ended runtime type
//! probing.

use crate::sort::{SortId, Sorts};
use lasso::{Rodeo, Spur};
use num_bigint::BigInt;
use rustc_hash::FxHashMap;
use smallvec::{SmallVec, smallvec};
use std::fmt::Write as _;

/// Term identifier, an index into the manager's term arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(pub u32);

/// The closed set of term shapes the string theory layer operates on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// Boolean constant `true`.
    True,
    /// Boolean constant `false`.
    False,
    /// Boolean negation.
    Not(TermId),
    /// N-ary conjunction.
    And(Vec<TermId>),
    /// Equality between two terms of the same sort.
    Eq(TermId, TermId),
    /// Integer less-or-equal.
    Le(TermId, TermId),
    /// Free variable with an interned name.
    Var(Spur),
    /// Integer constant.
    IntConst(BigInt),
    /// N-ary integer sum.
    Add(Vec<TermId>),
    /// String literal.
    StrLit(String),
    /// Binary string concatenation.
    StrConcat(TermId, TermId),
    /// String length.
    StrLen(TermId),
    /// `str.contains` predicate.
    StrContains(TermId, TermId),
    /// Regular-expression membership `str.in_re`.
    StrInRe(TermId, TermId),
    /// Substring extraction `str.substr` (string, offset, length).
    StrSubstr(TermId, TermId, TermId),
    /// Character at index `str.at`.
    StrAt(TermId, TermId),
    /// First-occurrence replacement `str.replace`.
    StrReplace(TermId, TermId, TermId),
    /// Injection of a string into a regular language (`str.to_re`).
    ReLit(TermId),
    /// Regular-expression concatenation.
    ReConcat(TermId, TermId),
    /// Regular-expression union.
    ReUnion(TermId, TermId),
    /// Kleene star.
    ReStar(TermId),
    /// Positive iteration.
    RePlus(TermId),
    /// Zero-or-one iteration.
    ReOpt(TermId),
    /// The language of all single characters (`re.allchar`).
    ReAllChar,
    /// Language complement.
    ReComplement(TermId),
    /// Language intersection.
    ReInter(TermId, TermId),
    /// Language difference.
    ReDiff(TermId, TermId),
    /// Brzozowski derivative by a character term.
    ReDerivative(TermId, TermId),
    /// Character range `re.range`.
    ReRange(TermId, TermId),
    /// Bounded iteration `re.loop`.
    ReLoop(TermId, u32, u32),
    /// Language reversal.
    ReReverse(TermId),
    /// Language of characters satisfying a predicate.
    ReOfPred(TermId),
}

/// A term: its shape plus its sort, computed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    /// Shape of the term.
    pub kind: TermKind,
    /// Sort of the term.
    pub sort: SortId,
}

/// Arena-allocating, hash-consing term manager.
///
/// Owns the term arena, the name interner, and the sort table. All term
/// construction goes through the `mk_*` constructors.
pub struct TermManager {
    terms: Vec<Term>,
    cons: FxHashMap<(TermKind, SortId), TermId>,
    names: Rodeo,
    /// The sort table with well-known sort ids.
    pub sorts: Sorts,
    fresh_counter: u32,
}

impl TermManager {
    /// Create an empty term manager.
    pub fn new() -> Self {
        Self {
            terms: Vec::new(),
            cons: FxHashMap::default(),
            names: Rodeo::default(),
            sorts: Sorts::new(),
            fresh_counter: 0,
        }
    }

    fn intern(&mut self, kind: TermKind, sort: SortId) -> TermId {
        // Keyed on (kind, sort): a variable name can be declared at more
        // than one sort, and the two declarations must stay distinct terms.
        if let Some(&id) = self.cons.get(&(kind.clone(), sort)) {
            return id;
        }
        let id = TermId(self.terms.len() as u32);
        self.terms.push(Term {
            kind: kind.clone(),
            sort,
        });
        self.cons.insert((kind, sort), id);
        id
    }

    /// Get a term by id.
    pub fn get(&self, id: TermId) -> &Term {
        &self.terms[id.0 as usize]
    }

    /// Get the shape of a term.
    pub fn kind(&self, id: TermId) -> &TermKind {
        &self.get(id).kind
    }

    /// Get the sort of a term.
    pub fn sort_of(&self, id: TermId) -> SortId {
        self.get(id).sort
    }

    /// Number of distinct terms constructed so far.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether no term has been constructed yet.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Resolve an interned name.
    pub fn resolve(&self, spur: Spur) -> &str {
        self.names.resolve(&spur)
    }

    /// The declared name of a variable term, if `id` is a variable.
    pub fn var_name(&self, id: TermId) -> Option<&str> {
        match &self.get(id).kind {
            TermKind::Var(name) => Some(self.names.resolve(name)),
            _ => None,
        }
    }

    /// The direct children of a term, in declaration order.
    pub fn children(&self, id: TermId) -> SmallVec<[TermId; 4]> {
        match &self.get(id).kind {
            TermKind::True
            | TermKind::False
            | TermKind::Var(_)
            | TermKind::IntConst(_)
            | TermKind::StrLit(_)
            | TermKind::ReAllChar => smallvec![],
            TermKind::Not(a)
            | TermKind::StrLen(a)
            | TermKind::ReLit(a)
            | TermKind::ReStar(a)
            | TermKind::RePlus(a)
            | TermKind::ReOpt(a)
            | TermKind::ReComplement(a)
            | TermKind::ReLoop(a, _, _)
            | TermKind::ReReverse(a)
            | TermKind::ReOfPred(a) => smallvec![*a],
            TermKind::Eq(a, b)
            | TermKind::Le(a, b)
            | TermKind::StrConcat(a, b)
            | TermKind::StrContains(a, b)
            | TermKind::StrInRe(a, b)
            | TermKind::StrAt(a, b)
            | TermKind::ReConcat(a, b)
            | TermKind::ReUnion(a, b)
            | TermKind::ReInter(a, b)
            | TermKind::ReDiff(a, b)
            | TermKind::ReDerivative(a, b)
            | TermKind::ReRange(a, b) => smallvec![*a, *b],
            TermKind::StrSubstr(a, b, c) | TermKind::StrReplace(a, b, c) => {
                smallvec![*a, *b, *c]
            }
            TermKind::And(args) | TermKind::Add(args) => args.iter().copied().collect(),
        }
    }

    // ------------------------------------------------------------------
    // Boolean constructors
    // ------------------------------------------------------------------

    /// The boolean constant `true`.
    pub fn mk_true(&mut self) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::True, sort)
    }

    /// The boolean constant `false`.
    pub fn mk_false(&mut self) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::False, sort)
    }

    /// Boolean negation.
    pub fn mk_not(&mut self, a: TermId) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::Not(a), sort)
    }

    /// N-ary conjunction. The empty conjunction is `true`; no other
    /// simplification is performed.
    pub fn mk_and(&mut self, args: Vec<TermId>) -> TermId {
        if args.is_empty() {
            return self.mk_true();
        }
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::And(args), sort)
    }

    /// Equality. The two sides must share a sort; no reordering is done,
    /// so `mk_eq(a, b)` and `mk_eq(b, a)` are distinct terms.
    pub fn mk_eq(&mut self, a: TermId, b: TermId) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::Eq(a, b), sort)
    }

    /// Integer less-or-equal.
    pub fn mk_le(&mut self, a: TermId, b: TermId) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::Le(a, b), sort)
    }

    // ------------------------------------------------------------------
    // Variables and arithmetic
    // ------------------------------------------------------------------

    /// A free variable with the given declared name and sort.
    pub fn mk_var(&mut self, name: &str, sort: SortId) -> TermId {
        let spur = self.names.get_or_intern(name);
        self.intern(TermKind::Var(spur), sort)
    }

    /// Mint a variable whose name is guaranteed unused, derived from
    /// `hint`. Distinct calls yield distinct variables even when hints
    /// collide.
    pub fn mk_fresh_var(&mut self, hint: &str, sort: SortId) -> TermId {
        loop {
            self.fresh_counter += 1;
            let name = format!("{hint}!{}", self.fresh_counter);
            if self.names.get(&name).is_none() {
                return self.mk_var(&name, sort);
            }
        }
    }

    /// An integer constant.
    pub fn mk_int(&mut self, value: BigInt) -> TermId {
        let sort = self.sorts.int_sort;
        self.intern(TermKind::IntConst(value), sort)
    }

    /// N-ary integer sum.
    pub fn mk_add(&mut self, args: Vec<TermId>) -> TermId {
        let sort = self.sorts.int_sort;
        self.intern(TermKind::Add(args), sort)
    }

    // ------------------------------------------------------------------
    // String constructors
    // ------------------------------------------------------------------

    /// A string literal.
    pub fn mk_str_lit(&mut self, content: &str) -> TermId {
        let sort = self.sorts.string_sort;
        self.intern(TermKind::StrLit(content.to_string()), sort)
    }

    /// Binary string concatenation.
    pub fn mk_str_concat(&mut self, a: TermId, b: TermId) -> TermId {
        let sort = self.sorts.string_sort;
        self.intern(TermKind::StrConcat(a, b), sort)
    }

    /// String length.
    pub fn mk_str_len(&mut self, a: TermId) -> TermId {
        let sort = self.sorts.int_sort;
        self.intern(TermKind::StrLen(a), sort)
    }

    /// `str.contains` predicate.
    pub fn mk_str_contains(&mut self, haystack: TermId, needle: TermId) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::StrContains(haystack, needle), sort)
    }

    /// Regular-expression membership.
    pub fn mk_str_in_re(&mut self, s: TermId, re: TermId) -> TermId {
        let sort = self.sorts.bool_sort;
        self.intern(TermKind::StrInRe(s, re), sort)
    }

    /// Substring extraction.
    pub fn mk_str_substr(&mut self, s: TermId, offset: TermId, length: TermId) -> TermId {
        let sort = self.sorts.string_sort;
        self.intern(TermKind::StrSubstr(s, offset, length), sort)
    }

    /// Character at index.
    pub fn mk_str_at(&mut self, s: TermId, index: TermId) -> TermId {
        let sort = self.sorts.string_sort;
        self.intern(TermKind::StrAt(s, index), sort)
    }

    /// First-occurrence replacement.
    pub fn mk_str_replace(&mut self, s: TermId, pattern: TermId, replacement: TermId) -> TermId {
        let sort = self.sorts.string_sort;
        self.intern(TermKind::StrReplace(s, pattern, replacement), sort)
    }

    // ------------------------------------------------------------------
    // Regular-expression constructors
    // ------------------------------------------------------------------

    /// Injection of a string term into a regular language.
    pub fn mk_re_lit(&mut self, s: TermId) -> TermId {
        let sort = self.sorts.regex_sort;
        self.intern(TermKind::ReLit(s), sort)
    }

    /// Regular-expression concatenation.
    pub fn mk_re_concat(&mut self, a: TermId, b: TermId) -> TermId {
        let sort = self.sorts.regex_sort;
        self.intern(TermKind::ReConcat(a, b), sort)
    }

    /// Regular-expression union.
    pub fn mk_re_union(&mut self, a: TermId, b: TermId) -> TermId {
        let sort = self.sorts.regex_sort;
        self.intern(TermKind::ReUnion(a, b), sort)
    }

    /// Kleene star.
    pub fn mk_re_star(&mut self, a: TermId) -> TermId {
        let sort = self.sorts.regex_sort;
        self.intern(TermKind::ReStar(a), sort)
    }

    /// Positive iteration.
    pub fn mk_re_plus(&mut self, a: TermId) -> TermId {
        let sort = self.sorts.regex_sort;
        self.intern(TermKind::RePlus(a), sort)
    }

    /// Zero-or-one iteration.
    pub fn mk_re_opt(&mut self, a: TermId) -> TermId {
        let sort = self.sorts.regex_sort;
        self.intern(TermKind::ReOpt(a), sort)
    }

    /// The language of all single characters.
    pub fn mk_re_all_char(&mut self) -> TermId {
        let sort = self.sorts.regex_sort;
        self.intern(TermKind::ReAllChar, sort)
    }

    /// Language complement.
    pub fn mk_re_complement(&mut self, a: TermId) -> TermId {
        let sort = self.sorts.regex_sort;
        self.intern(TermKind::ReComplement(a), sort)
    }

    /// Language intersection.
    pub fn mk_re_inter(&mut self, a: TermId, b: TermId) -> TermId {
        let sort = self.sorts.regex_sort;
        self.intern(TermKind::ReInter(a, b), sort)
    }

    /// Language difference.
    pub fn mk_re_diff(&mut self, a: TermId, b: TermId) -> TermId {
        let sort = self.sorts.regex_sort;
        self.intern(TermKind::ReDiff(a, b), sort)
    }

    /// Brzozowski derivative by a character term.
    pub fn mk_re_derivative(&mut self, c: TermId, re: TermId) -> TermId {
        let sort = self.sorts.regex_sort;
        self.intern(TermKind::ReDerivative(c, re), sort)
    }

    /// Character range.
    pub fn mk_re_range(&mut self, lo: TermId, hi: TermId) -> TermId {
        let sort = self.sorts.regex_sort;
        self.intern(TermKind::ReRange(lo, hi), sort)
    }

    /// Bounded iteration.
    pub fn mk_re_loop(&mut self, a: TermId, lo: u32, hi: u32) -> TermId {
        let sort = self.sorts.regex_sort;
        self.intern(TermKind::ReLoop(a, lo, hi), sort)
    }

    /// Language reversal.
    pub fn mk_re_reverse(&mut self, a: TermId) -> TermId {
        let sort = self.sorts.regex_sort;
        self.intern(TermKind::ReReverse(a), sort)
    }

    /// Language of characters satisfying a predicate term.
    pub fn mk_re_of_pred(&mut self, p: TermId) -> TermId {
        let sort = self.sorts.regex_sort;
        self.intern(TermKind::ReOfPred(p), sort)
    }

    // ------------------------------------------------------------------
    // Display
    // ------------------------------------------------------------------

    /// Render a term in SMT-LIB-flavoured concrete syntax, for
    /// diagnostics and error messages.
    pub fn display(&self, id: TermId) -> String {
        let mut out = String::new();
        self.write_term(&mut out, id);
        out
    }

    fn write_app(&self, out: &mut String, op: &str, args: &[TermId]) {
        out.push('(');
        out.push_str(op);
        for &arg in args {
            out.push(' ');
            self.write_term(out, arg);
        }
        out.push(')');
    }

    fn write_term(&self, out: &mut String, id: TermId) {
        match &self.get(id).kind {
            TermKind::True => out.push_str("true"),
            TermKind::False => out.push_str("false"),
            TermKind::Not(a) => self.write_app(out, "not", &[*a]),
            TermKind::And(args) => self.write_app(out, "and", args),
            TermKind::Eq(a, b) => self.write_app(out, "=", &[*a, *b]),
            TermKind::Le(a, b) => self.write_app(out, "<=", &[*a, *b]),
            TermKind::Var(name) => out.push_str(self.names.resolve(name)),
            TermKind::IntConst(v) => {
                let _ = write!(out, "{v}");
            }
            TermKind::Add(args) => self.write_app(out, "+", args),
            TermKind::StrLit(s) => {
                let _ = write!(out, "{s:?}");
            }
            TermKind::StrConcat(a, b) => self.write_app(out, "str.++", &[*a, *b]),
            TermKind::StrLen(a) => self.write_app(out, "str.len", &[*a]),
            TermKind::StrContains(a, b) => self.write_app(out, "str.contains", &[*a, *b]),
            TermKind::StrInRe(a, b) => self.write_app(out, "str.in_re", &[*a, *b]),
            TermKind::StrSubstr(a, b, c) => self.write_app(out, "str.substr", &[*a, *b, *c]),
            TermKind::StrAt(a, b) => self.write_app(out, "str.at", &[*a, *b]),
            TermKind::StrReplace(a, b, c) => self.write_app(out, "str.replace", &[*a, *b, *c]),
            TermKind::ReLit(a) => self.write_app(out, "str.to_re", &[*a]),
            TermKind::ReConcat(a, b) => self.write_app(out, "re.++", &[*a, *b]),
            TermKind::ReUnion(a, b) => self.write_app(out, "re.union", &[*a, *b]),
            TermKind::ReStar(a) => self.write_app(out, "re.*", &[*a]),
            TermKind::RePlus(a) => self.write_app(out, "re.+", &[*a]),
            TermKind::ReOpt(a) => self.write_app(out, "re.opt", &[*a]),
            TermKind::ReAllChar => out.push_str("re.allchar"),
            TermKind::ReComplement(a) => self.write_app(out, "re.comp", &[*a]),
            TermKind::ReInter(a, b) => self.write_app(out, "re.inter", &[*a, *b]),
            TermKind::ReDiff(a, b) => self.write_app(out, "re.diff", &[*a, *b]),
            TermKind::ReDerivative(a, b) => self.write_app(out, "re.derivative", &[*a, *b]),
            TermKind::ReRange(a, b) => self.write_app(out, "re.range", &[*a, *b]),
            TermKind::ReLoop(a, lo, hi) => {
                let _ = write!(out, "((_ re.loop {lo} {hi}) ");
                self.write_term(out, *a);
                out.push(')');
            }
            TermKind::ReReverse(a) => self.write_app(out, "re.reverse", &[*a]),
            TermKind::ReOfPred(a) => self.write_app(out, "re.of_pred", &[*a]),
        }
    }
}

impl Default for TermManager {
    fn default() -> Self {
        Self::new()
    }
}
