//! # Deterministic finite automaton
//! The [`Dfa`] produced by [`crate::nfa::Nfa::to_dfa`] is not yet total: a state may have no
//! transition at all for some input symbol. [`Dfa::complete`] fixes that by routing every
//! uncovered symbol to a shared trap state, and [`Dfa::minimize`] then collapses
//! indistinguishable states by iterative signature refinement. [`crate::automaton::compile`]
//! always runs both in order; a bare, incomplete `Dfa` is only ever seen right after
//! [`crate::nfa::Nfa::to_dfa`].

pub mod eval;

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct DfaState {
    pub accepting: bool,
    /// Explicit transitions on concrete symbols.
    pub transitions: HashMap<char, usize>,
    /// The Σ (catch-all) transition, used for any symbol not in `transitions`. `None` until the
    /// automaton has been completed.
    pub default: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Dfa {
    pub states: Vec<DfaState>,
    pub initial_state: usize,
}

impl Dfa {
    /// Reads one symbol from `state`, following the concrete transition if present, else the Σ
    /// default. Panics if neither is present; this can only happen on a DFA that hasn't been
    /// completed yet.
    pub fn read(&self, state: usize, c: char) -> usize {
        let s = &self.states[state];
        s.transitions
            .get(&c)
            .copied()
            .or(s.default)
            .expect("dfa state has neither a transition nor a default; complete() first")
    }

    /// Adds a trap state and wires it as the Σ default of every reachable state missing one.
    /// The trap state is non-final and loops to itself on every symbol.
    pub fn complete(mut self) -> Dfa {
        let trap_id = self.states.len();
        self.states.push(DfaState {
            accepting: false,
            transitions: HashMap::new(),
            default: None,
        });
        self.states[trap_id].default = Some(trap_id);

        for state in &mut self.states[..trap_id] {
            if state.default.is_none() {
                state.default = Some(trap_id);
            }
        }
        self
    }

    /// Minimizes a completed DFA by signature refinement (section 4.6): states start
    /// partitioned by finality, then states are repeatedly re-split by the class of their
    /// targets over the ordered alphabet (plus the class of their Σ target) until the partition
    /// stops changing. One fresh state is built per surviving class.
    pub fn minimize(self) -> Dfa {
        let reachable = self.reachable_states();
        let alphabet = self.alphabet(&reachable);

        let mut class_of: HashMap<usize, usize> = reachable
            .iter()
            .map(|&id| (id, if self.states[id].accepting { 2 } else { 1 }))
            .collect();

        loop {
            let mut signature_to_class: HashMap<Vec<usize>, usize> = HashMap::new();
            let mut next_class = 1;
            let mut new_class_of = HashMap::with_capacity(class_of.len());

            for &id in &reachable {
                let mut signature = Vec::with_capacity(alphabet.len() + 2);
                signature.push(class_of[&id]);
                for &c in &alphabet {
                    let target = self.read(id, c);
                    signature.push(class_of[&target]);
                }
                let default_target = self.states[id]
                    .default
                    .expect("minimize() requires a completed dfa");
                signature.push(class_of[&default_target]);

                let class = *signature_to_class.entry(signature).or_insert_with(|| {
                    let id = next_class;
                    next_class += 1;
                    id
                });
                new_class_of.insert(id, class);
            }

            if new_class_of == class_of {
                break;
            }
            class_of = new_class_of;
        }

        self.rebuild_from_classes(&reachable, &class_of)
    }

    fn reachable_states(&self) -> Vec<usize> {
        let mut seen = HashSet::new();
        seen.insert(self.initial_state);
        let mut stack = vec![self.initial_state];
        while let Some(id) = stack.pop() {
            let state = &self.states[id];
            for &target in state.transitions.values() {
                if seen.insert(target) {
                    stack.push(target);
                }
            }
            if let Some(target) = state.default {
                if seen.insert(target) {
                    stack.push(target);
                }
            }
        }
        let mut v: Vec<usize> = seen.into_iter().collect();
        v.sort_unstable();
        v
    }

    /// The ordered alphabet of concrete symbols appearing on reachable states. Σ is not part of
    /// this vector: it is handled as a dedicated trailing component of each state's signature,
    /// which has the same effect as appending it last to the ordering.
    fn alphabet(&self, reachable: &[usize]) -> Vec<char> {
        let mut set = HashSet::new();
        for &id in reachable {
            set.extend(self.states[id].transitions.keys().copied());
        }
        let mut v: Vec<char> = set.into_iter().collect();
        v.sort_unstable();
        v
    }

    fn rebuild_from_classes(&self, reachable: &[usize], class_of: &HashMap<usize, usize>) -> Dfa {
        let mut classes: Vec<usize> = class_of.values().copied().collect();
        classes.sort_unstable();
        classes.dedup();
        let class_to_new: HashMap<usize, usize> =
            classes.iter().enumerate().map(|(i, &c)| (c, i)).collect();

        let mut new_states: Vec<Option<DfaState>> = vec![None; class_to_new.len()];
        for &id in reachable {
            let new_id = class_to_new[&class_of[&id]];
            if new_states[new_id].is_some() {
                continue;
            }
            let original = &self.states[id];
            let transitions = original
                .transitions
                .iter()
                .map(|(&c, &target)| (c, class_to_new[&class_of[&target]]))
                .collect();
            let default = original
                .default
                .map(|target| class_to_new[&class_of[&target]]);
            new_states[new_id] = Some(DfaState {
                accepting: original.accepting,
                transitions,
                default,
            });
        }

        Dfa {
            states: new_states
                .into_iter()
                .map(|s| s.expect("every surviving class has at least one representative state"))
                .collect(),
            initial_state: class_to_new[&class_of[&self.initial_state]],
        }
    }

    pub fn evaluator(&self) -> eval::DfaEvaluator<'_> {
        eval::DfaEvaluator::new(self)
    }
}
