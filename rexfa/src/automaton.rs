//! The public entry point: [`compile`] runs the whole pipeline (expand, parse, Thompson
//! construction, subset construction, completion, minimization) and hands back an [`Automaton`],
//! the only type most callers need.

use crate::dfa::Dfa;
use crate::error::PatternError;
use crate::nfa::Nfa;
use crate::pattern::{expand, parse};
use std::collections::HashSet;

/// A compiled pattern: a completed, minimized DFA plus the matching operations from section 4.7.
/// The only way to obtain one is through [`compile`], so "completed" and "minimized" are
/// guarantees of the type rather than something callers need to track themselves.
#[derive(Debug, Clone)]
pub struct Automaton {
    dfa: Dfa,
}

/// Compiles `pattern` (in the extended surface grammar) into an [`Automaton`]. `flags` is a
/// bitmask; currently only [`crate::pattern::IGNORE_CASE`] is defined.
pub fn compile(pattern: &str, flags: u32) -> Result<Automaton, PatternError> {
    let canonical = expand::expand(pattern)?;
    let parsed = parse::parse(&canonical)?;
    let nfa = Nfa::from_pattern(&parsed, flags);
    let dfa = nfa.to_dfa().complete().minimize();
    Ok(Automaton { dfa })
}

impl Automaton {
    /// Full-string match: accepts iff `s` drives the automaton to a final state.
    pub fn matches(&self, s: &str) -> bool {
        self.dfa.evaluator().accepts(s)
    }

    /// Length, in chars, of the shortest prefix of `s` that is itself accepted. 0 if none.
    pub fn read_lazy(&self, s: &str) -> usize {
        self.dfa.evaluator().read_lazy(s)
    }

    /// Length, in chars, of the longest prefix of `s` that is itself accepted. 0 if none.
    pub fn read_greedy(&self, s: &str) -> usize {
        self.dfa.evaluator().read_greedy(s)
    }

    /// Like [`Self::read_greedy`], but only accepting a prefix boundary whose following state is
    /// a member of `followers` (or accepting any boundary if `followers` is empty). Intended for
    /// a tokenizer built on top of this crate, where "the longest match" must also be one a
    /// follower token can continue scanning from.
    pub fn read_greedy_peek(&self, s: &str, followers: &HashSet<usize>) -> usize {
        self.dfa.evaluator().read_greedy_peek(s, followers)
    }

    /// The number of states in the compiled (minimized, completed) automaton.
    pub fn state_count(&self) -> usize {
        self.dfa.states.len()
    }

    /// A textual dump of the transition table, in the style of [`crate::table::Table`]. Intended
    /// for `-v/--verbose` diagnostics, not for parsing back in.
    pub fn to_table(&self) -> String {
        crate::table::dfa_table(&self.dfa)
    }
}
