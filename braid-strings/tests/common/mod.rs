//! Test doubles for the external collaborators: the host's truth
//! assignment, the automaton service, the decision procedure, and the
//! arithmetic length check.

#![allow(dead_code)]

use braid_core::eval::{Value, eval_ground};
use braid_core::{TermId, TermManager};
use braid_strings::alphabet::Alphabet;
use braid_strings::error::Result;
use braid_strings::formula::{Formula, WordTerm};
use braid_strings::traits::{
    AutAssignment, AutomatonProvider, DecisionProcedure, LengthChecker, Satisfiability,
    SolveOutcome, TruthAssignment,
};
use rustc_hash::FxHashSet;

/// Truth assignment backed by an explicit set of true atoms.
#[derive(Default)]
pub struct FixedAssignment {
    true_atoms: FxHashSet<TermId>,
}

impl FixedAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_true(&mut self, atom: TermId) {
        self.true_atoms.insert(atom);
    }
}

impl TruthAssignment for FixedAssignment {
    fn is_true(&self, atom: TermId) -> bool {
        self.true_atoms.contains(&atom)
    }
}

/// Symbolic automaton handle. Hash-consing makes structurally equal
/// ground regexes share a term id, so equality on this handle is a
/// usable stand-in for language equivalence in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolicAut {
    Regex(TermId),
    Universal,
    Complement(Box<SymbolicAut>),
    Intersect(Box<SymbolicAut>, Box<SymbolicAut>),
}

/// Automaton provider producing [`SymbolicAut`] handles.
#[derive(Default)]
pub struct SymbolicProvider;

impl AutomatonProvider for SymbolicProvider {
    type Automaton = SymbolicAut;

    fn from_regex(
        &mut self,
        _tm: &TermManager,
        regex: TermId,
        _alphabet: &Alphabet,
    ) -> Result<SymbolicAut> {
        Ok(SymbolicAut::Regex(regex))
    }

    fn universal(&mut self, _alphabet: &Alphabet) -> SymbolicAut {
        SymbolicAut::Universal
    }

    fn complement(&mut self, automaton: &SymbolicAut) -> SymbolicAut {
        SymbolicAut::Complement(Box::new(automaton.clone()))
    }

    fn intersect(&mut self, a: &SymbolicAut, b: &SymbolicAut) -> SymbolicAut {
        SymbolicAut::Intersect(Box::new(a.clone()), Box::new(b.clone()))
    }

    fn equivalent(&mut self, a: &SymbolicAut, b: &SymbolicAut) -> bool {
        a == b
    }
}

/// Decision procedure returning scripted outcomes and recording what it
/// was handed.
pub struct ScriptedEngine {
    pub outcome: SolveOutcome,
    pub underapprox_outcome: SolveOutcome,
    pub solve_calls: usize,
    pub underapprox_calls: usize,
    pub last_formula: Option<Formula>,
    pub last_assignment_keys: Vec<WordTerm>,
    pub last_length_vars: FxHashSet<WordTerm>,
}

impl ScriptedEngine {
    pub fn answering(outcome: SolveOutcome) -> Self {
        Self {
            outcome,
            underapprox_outcome: SolveOutcome::Unknown,
            solve_calls: 0,
            underapprox_calls: 0,
            last_formula: None,
            last_assignment_keys: Vec::new(),
            last_length_vars: FxHashSet::default(),
        }
    }
}

impl DecisionProcedure for ScriptedEngine {
    type Automaton = SymbolicAut;

    fn solve(
        &mut self,
        formula: &Formula,
        assignment: &AutAssignment<SymbolicAut>,
        length_vars: &FxHashSet<WordTerm>,
    ) -> SolveOutcome {
        self.solve_calls += 1;
        self.last_formula = Some(formula.clone());
        self.last_assignment_keys = assignment.keys().cloned().collect();
        self.last_length_vars = length_vars.clone();
        self.outcome.clone()
    }

    fn solve_underapprox(
        &mut self,
        _formula: &Formula,
        _assignment: &AutAssignment<SymbolicAut>,
        _length_vars: &FxHashSet<WordTerm>,
    ) -> SolveOutcome {
        self.underapprox_calls += 1;
        self.underapprox_outcome.clone()
    }
}

/// Length check that evaluates ground formulas and gives up on anything
/// containing variables.
#[derive(Default)]
pub struct GroundLengthChecker;

impl LengthChecker for GroundLengthChecker {
    fn check_len_sat(&mut self, tm: &TermManager, len_formula: TermId) -> Satisfiability {
        match eval_ground(tm, len_formula) {
            Some(Value::Bool(true)) => Satisfiability::Sat,
            Some(Value::Bool(false)) => Satisfiability::Unsat,
            _ => Satisfiability::Unknown,
        }
    }
}
