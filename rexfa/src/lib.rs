//! # rexfa
//! rexfa compiles a pattern into a finite automaton and matches strings against it. The pattern
//! grammar is written in a UTF-8 encoded string. There are six reserved characters: `(`, `)`,
//! `ε`, `|`, `*` and `\`. These need to be escaped with a backslash (`\`) to be matched literally,
//! while all other characters (including `Σ`, the catch-all symbol) are supported as-is.
//! Parenthesis `(`, `)` are used for grouping, `ε` denotes the empty string, `|` denotes
//! alternation, and `*` is the Kleene star (zero or more).
//!
//! An extended surface grammar is expanded to the canonical grammar above before parsing:
//! `.` is an alias for `Σ`, `?` is an alias for `ε`, `[abc]`/`[a-z]` expand to alternations, and
//! `\s`/`\d`/`\w` expand to their usual character classes.
//!
//! ## Pipeline
//! A pattern is compiled in five stages: expand the surface syntax, parse it into a syntax tree
//! and build a [`nfa::Nfa`] from it (Thompson construction), convert the NFA to a [`dfa::Dfa`]
//! (subset construction), complete the DFA with a trap state, then minimize it. The result is an
//! [`automaton::Automaton`], the only type client code needs to hold on to.
//!
//! ```
//! use rexfa::automaton::compile;
//!
//! let a = compile("a(b|c)d", 0).unwrap();
//! assert!(a.matches("abd"));
//! assert!(a.matches("acd"));
//! assert!(!a.matches("ad"));
//!
//! let lazy = compile("ab*", 0).unwrap();
//! assert_eq!(lazy.read_lazy("abbbbbb"), 1);
//! assert_eq!(lazy.read_greedy("abbbbbb"), 7);
//! ```

pub mod automaton;
pub mod dfa;
pub mod error;
pub mod nfa;
pub mod pattern;
pub mod table;

pub use automaton::{compile, Automaton};
pub use error::PatternError;
pub use pattern::IGNORE_CASE;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readme_example_compiles_and_matches() {
        let a = compile("a(b|c)d", 0).unwrap();
        assert!(a.matches("abd"));
        assert!(a.matches("acd"));
        assert!(!a.matches("ad"));
    }
}
