//! Stepping evaluator for a [`Nfa`], used directly by tests that check a NFA and the DFA derived
//! from it agree on the language they accept.

use crate::nfa::{Label, Nfa, NfaState};
use std::collections::HashSet;

#[derive(Clone, Debug)]
pub struct NfaEvaluator<'a> {
    nfa: &'a Nfa,
    current_states: HashSet<usize>,
}

impl<'a> NfaEvaluator<'a> {
    pub fn is_accepting(&self) -> bool {
        self.current_states().iter().any(|s| s.accepting)
    }

    pub fn current_states(&self) -> Vec<&NfaState> {
        self.current_states.iter().map(|&s| &self.nfa.states[s]).collect()
    }

    pub fn current_states_idx(&self) -> &HashSet<usize> {
        &self.current_states
    }

    /// Advances by one input symbol: `read(n, c) ∪ read(n, Σ)` for every current state `n`,
    /// followed by an ε-closure.
    pub fn step(&mut self, c: char) {
        let mut next = HashSet::new();
        for &state in &self.current_states {
            if let Some(targets) = self.nfa.states[state].transitions.get(&Label::Char(c)) {
                next.extend(targets.iter().copied());
            }
            if let Some(targets) = self.nfa.states[state].transitions.get(&Label::Sigma) {
                next.extend(targets.iter().copied());
            }
        }
        self.current_states = next;
        self.include_closure();
    }

    pub fn accepts(&mut self, s: &str) -> bool {
        for c in s.chars() {
            if self.current_states.is_empty() {
                return false;
            }
            self.step(c);
        }
        self.is_accepting()
    }

    fn include_closure(&mut self) {
        let mut closed = HashSet::new();
        for &s in &self.current_states {
            closed.extend(self.nfa.closure(s));
        }
        self.current_states = closed;
    }
}

impl<'a> From<&'a Nfa> for NfaEvaluator<'a> {
    fn from(nfa: &'a Nfa) -> Self {
        let mut evaluator = Self {
            nfa,
            current_states: HashSet::new(),
        };
        evaluator.current_states.insert(nfa.initial_state);
        evaluator.include_closure();
        evaluator
    }
}
