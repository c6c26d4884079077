//! # Nondeterministic finite automaton
//! The NFA module holds the [`Nfa`] type, built from a [`crate::pattern::Pattern`] via Thompson
//! construction. States are identified by a small integer id rather than by name or pointer,
//! which keeps the (possibly cyclic, because of `*`) automaton graph easy to store in an arena
//! (`Vec<NfaState>`) without any unsafe code.
//!
//! ## Operations
//! Converting a [`Pattern`](crate::pattern::Pattern) to a NFA ([`Nfa::from_pattern`]) and
//! converting a NFA to a [`Dfa`](crate::dfa::Dfa) ([`Nfa::to_dfa`], subset construction) are the
//! two operations this module exposes. Matching a string directly against a NFA is available
//! through [`eval::NfaEvaluator`], mostly useful for tests checking that the NFA and the DFA it
//! produces agree on the language they accept.

pub mod eval;

use crate::dfa::{Dfa, DfaState};
use crate::pattern::{Builder, Pattern, PatternChar, PatternTree, IGNORE_CASE};
use std::collections::{HashMap, HashSet};
use std::mem;

/// A transition label: either a concrete input symbol or the catch-all Σ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Char(char),
    Sigma,
}

#[derive(Debug, Clone, Default)]
pub struct NfaState {
    pub accepting: bool,
    pub epsilon_transitions: Vec<usize>,
    pub transitions: HashMap<Label, Vec<usize>>,
}

#[derive(Debug, Clone)]
pub struct Nfa {
    pub states: Vec<NfaState>,
    pub initial_state: usize,
}

impl Nfa {
    /// Builds a NFA from a pattern's syntax tree using Thompson construction. The accepting
    /// state is always id 0, the initial state is always id 1.
    pub fn from_pattern(pattern: &Pattern, flags: u32) -> Nfa {
        let mut builder = Builder::new();

        let accepting_state = NfaState {
            accepting: true,
            ..NfaState::default()
        };
        let _accepting_id = builder.next(); // 0

        let mut initial_state = NfaState::default();
        let initial_id = builder.next(); // 1
        initial_state.epsilon_transitions.push(builder.peek());

        let mut tree_states = tree_to_nfa(&pattern.tree, &mut builder, flags, 0);
        let mut states = Vec::with_capacity(tree_states.len() + 2);
        states.push(accepting_state);
        states.push(initial_state);
        states.append(&mut tree_states);

        Nfa {
            states,
            initial_state: initial_id,
        }
    }

    /// ε-closure of a single state.
    pub fn closure(&self, start: usize) -> HashSet<usize> {
        let mut all = HashSet::new();
        all.insert(start);
        let mut frontier = vec![start];
        while !frontier.is_empty() {
            let old = mem::take(&mut frontier);
            for state in old {
                for &target in &self.states[state].epsilon_transitions {
                    if all.insert(target) {
                        frontier.push(target);
                    }
                }
            }
        }
        all
    }

    /// Converts this NFA to a [`Dfa`] via subset construction (section 4.4): each DFA state
    /// corresponds to a frozen (sorted) set of NFA states; Σ is tracked like any other label,
    /// except that reading a concrete symbol `c` always also follows any Σ edge (mirroring the
    /// NFA matcher's `read(n, c) ∪ read(n, Σ)` semantics), while the DFA's own Σ default edge is
    /// exactly the closure of every Σ edge alone.
    pub fn to_dfa(&self) -> Dfa {
        let initial_set = self.closure(self.initial_state);
        let initial_key = Self::set_to_vec(&initial_set);

        let mut next_id = 0usize..;
        let mut set_to_id: HashMap<Vec<usize>, usize> = HashMap::new();
        let mut accepting: HashSet<usize> = HashSet::new();
        let mut transitions: HashMap<usize, (HashMap<char, usize>, Option<usize>)> =
            HashMap::new();

        let initial_dfa_id = next_id.next().unwrap();
        set_to_id.insert(initial_key.clone(), initial_dfa_id);
        if self.set_is_accepting(&initial_set) {
            accepting.insert(initial_dfa_id);
        }

        let mut worklist = vec![initial_set];
        while let Some(set) = worklist.pop() {
            let dfa_id = set_to_id[&Self::set_to_vec(&set)];

            let mut concrete_labels: HashSet<char> = HashSet::new();
            let mut has_sigma = false;
            for &n in &set {
                for label in self.states[n].transitions.keys() {
                    match label {
                        Label::Char(c) => {
                            concrete_labels.insert(*c);
                        }
                        Label::Sigma => has_sigma = true,
                    }
                }
            }

            let mut char_targets = HashMap::new();
            for c in concrete_labels {
                let mut target_set = HashSet::new();
                for &n in &set {
                    if let Some(targets) = self.states[n].transitions.get(&Label::Char(c)) {
                        target_set.extend(targets.iter().copied());
                    }
                    if let Some(targets) = self.states[n].transitions.get(&Label::Sigma) {
                        target_set.extend(targets.iter().copied());
                    }
                }
                let closed = self.close_set(&target_set);
                let key = Self::set_to_vec(&closed);
                let target_id = *set_to_id.entry(key).or_insert_with(|| {
                    let id = next_id.next().unwrap();
                    if self.set_is_accepting(&closed) {
                        accepting.insert(id);
                    }
                    worklist.push(closed.clone());
                    id
                });
                char_targets.insert(c, target_id);
            }

            let default_target = if has_sigma {
                let mut target_set = HashSet::new();
                for &n in &set {
                    if let Some(targets) = self.states[n].transitions.get(&Label::Sigma) {
                        target_set.extend(targets.iter().copied());
                    }
                }
                let closed = self.close_set(&target_set);
                let key = Self::set_to_vec(&closed);
                let target_id = *set_to_id.entry(key).or_insert_with(|| {
                    let id = next_id.next().unwrap();
                    if self.set_is_accepting(&closed) {
                        accepting.insert(id);
                    }
                    worklist.push(closed.clone());
                    id
                });
                Some(target_id)
            } else {
                None
            };

            transitions.insert(dfa_id, (char_targets, default_target));
        }

        let state_count = set_to_id.len();
        let mut states: Vec<Option<DfaState>> = vec![None; state_count];
        for (id, (char_targets, default_target)) in transitions {
            states[id] = Some(DfaState {
                accepting: accepting.contains(&id),
                transitions: char_targets,
                default: default_target,
            });
        }

        Dfa {
            states: states.into_iter().map(|s| s.expect("every dfa id produced during subset construction gets a transition row")).collect(),
            initial_state: initial_dfa_id,
        }
    }

    fn close_set(&self, set: &HashSet<usize>) -> HashSet<usize> {
        let mut result = HashSet::new();
        for &s in set {
            result.extend(self.closure(s));
        }
        result
    }

    fn set_is_accepting(&self, set: &HashSet<usize>) -> bool {
        set.iter().any(|&s| self.states[s].accepting)
    }

    fn set_to_vec(set: &HashSet<usize>) -> Vec<usize> {
        let mut v: Vec<usize> = set.iter().copied().collect();
        v.sort_unstable();
        v
    }
}

/// Recursively builds the states for `tree`, threading `send_to` (the state the subtree should
/// transition to once matched) through the recursion. Mirrors the structure of a textbook
/// Thompson construction: sequencing shares a tail state, alternation fans out from a shared
/// entry and merges at `send_to`, and Kleene star adds a skip edge plus a loop-back edge.
fn tree_to_nfa(tree: &PatternTree, builder: &mut Builder, flags: u32, send_to: usize) -> Vec<NfaState> {
    let incoming_id = builder.next();
    let mut incoming = NfaState::default();

    match tree {
        PatternTree::Sequence(seq) => {
            if seq.is_empty() {
                incoming.epsilon_transitions.push(send_to);
                vec![incoming]
            } else {
                // Skip the "after" placeholder this same loop is about to allocate (below) and
                // land on the first element's own entry state, one level deeper.
                incoming.epsilon_transitions.push(builder.peek() + 1);
                let seq_len = seq.len();
                let mut states = Vec::new();
                for (idx, subtree) in seq.iter().enumerate() {
                    let after_id = builder.next();
                    let mut after = NfaState::default();
                    let new_states = tree_to_nfa(subtree, builder, flags, after_id);
                    if idx + 1 == seq_len {
                        after.epsilon_transitions.push(send_to);
                    } else {
                        after.epsilon_transitions.push(builder.peek() + 1);
                    }
                    states.push(after);
                    states.extend(new_states);
                }
                let mut ret = vec![incoming];
                ret.append(&mut states);
                ret
            }
        }
        PatternTree::Alt(alt) => {
            let mut additional = Vec::new();
            for subtree in alt {
                incoming.epsilon_transitions.push(builder.peek());
                additional.extend(tree_to_nfa(subtree, builder, flags, send_to));
            }
            let mut ret = vec![incoming];
            ret.append(&mut additional);
            ret
        }
        PatternTree::Repeat(inner) => {
            incoming.epsilon_transitions = vec![builder.peek(), send_to];
            let mut additional = tree_to_nfa(inner, builder, flags, incoming_id);
            let mut ret = vec![incoming];
            ret.append(&mut additional);
            ret
        }
        PatternTree::Char(c) => match c {
            PatternChar::Literal(ch) => {
                incoming
                    .transitions
                    .entry(Label::Char(*ch))
                    .or_default()
                    .push(send_to);
                if flags & IGNORE_CASE != 0 {
                    if let Some(sibling) = case_sibling(*ch) {
                        incoming
                            .transitions
                            .entry(Label::Char(sibling))
                            .or_default()
                            .push(send_to);
                    }
                }
                vec![incoming]
            }
            PatternChar::Sigma => {
                incoming.transitions.entry(Label::Sigma).or_default().push(send_to);
                vec![incoming]
            }
            PatternChar::Epsilon => {
                incoming.epsilon_transitions.push(send_to);
                vec![incoming]
            }
        },
    }
}

/// The opposite-case ASCII letter for `c`, if `c` is an ASCII letter.
fn case_sibling(c: char) -> Option<char> {
    if c.is_ascii_lowercase() {
        Some(c.to_ascii_uppercase())
    } else if c.is_ascii_uppercase() {
        Some(c.to_ascii_lowercase())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::parse::parse;

    fn nfa_accepts(nfa: &Nfa, s: &str) -> bool {
        let mut eval = eval::NfaEvaluator::from(nfa);
        for c in s.chars() {
            eval.step(c);
        }
        eval.is_accepting()
    }

    #[test]
    fn literal_sequence() {
        let pattern = parse("ab").unwrap();
        let nfa = Nfa::from_pattern(&pattern, 0);
        assert!(nfa_accepts(&nfa, "ab"));
        assert!(!nfa_accepts(&nfa, "a"));
        assert!(!nfa_accepts(&nfa, "ba"));
    }

    #[test]
    fn alternation() {
        let pattern = parse("a|b").unwrap();
        let nfa = Nfa::from_pattern(&pattern, 0);
        assert!(nfa_accepts(&nfa, "a"));
        assert!(nfa_accepts(&nfa, "b"));
        assert!(!nfa_accepts(&nfa, "c"));
    }

    #[test]
    fn kleene_star() {
        let pattern = parse("a*").unwrap();
        let nfa = Nfa::from_pattern(&pattern, 0);
        assert!(nfa_accepts(&nfa, ""));
        assert!(nfa_accepts(&nfa, "a"));
        assert!(nfa_accepts(&nfa, "aaaa"));
        assert!(!nfa_accepts(&nfa, "b"));
    }

    #[test]
    fn ignore_case_adds_sibling_transition() {
        let pattern = parse("a").unwrap();
        let nfa = Nfa::from_pattern(&pattern, IGNORE_CASE);
        assert!(nfa_accepts(&nfa, "a"));
        assert!(nfa_accepts(&nfa, "A"));
    }

    #[test]
    fn subset_construction_preserves_language() {
        let pattern = parse("(a|b)*abb").unwrap();
        let nfa = Nfa::from_pattern(&pattern, 0);
        let dfa = nfa.to_dfa();
        for s in ["abb", "aabb", "babb", "abababb", "ab", "a", ""] {
            assert_eq!(
                nfa_accepts(&nfa, s),
                dfa.evaluator().accepts(s),
                "mismatch on {s:?}"
            );
        }
    }
}
