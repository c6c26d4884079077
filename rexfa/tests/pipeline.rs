//! Property-based tests for the compile pipeline: expand -> parse -> Thompson construction ->
//! subset construction -> completion -> minimization. Patterns are generated from a small
//! grammar so that proptest can shrink failures to something readable.

use proptest::prelude::*;
use rexfa::dfa::Dfa;
use rexfa::nfa::Nfa;
use rexfa::pattern::parse::parse;

/// A small recursive strategy over the canonical grammar, restricted to the alphabet `{a, b}`
/// plus `Σ` and `ε`, which is enough to exercise every construction rule without the trees
/// getting so large that minimization becomes slow.
fn pattern_strategy() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        Just("a".to_string()),
        Just("b".to_string()),
        Just("Σ".to_string()),
        Just("ε".to_string()),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{a}{b}")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a}|{b})")),
            inner.clone().prop_map(|a| format!("({a})*")),
        ]
    })
}

/// Strings over `{a, b}` short enough that exhaustive testing against every stage is cheap.
fn input_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec(prop_oneof![Just('a'), Just('b')], 0..6)
        .prop_map(|cs| cs.into_iter().collect())
}

fn build_stages(pattern: &str) -> (Nfa, Dfa, Dfa, Dfa) {
    let parsed = parse(pattern).unwrap();
    let nfa = Nfa::from_pattern(&parsed, 0);
    let dfa = nfa.to_dfa();
    let completed = dfa.clone().complete();
    let minimized = completed.clone().minimize();
    (nfa, dfa, completed, minimized)
}

proptest! {
    /// Section 8: "Language equivalence across the pipeline" — every stage must agree on every
    /// input string.
    #[test]
    fn language_equivalence_across_pipeline(pattern in pattern_strategy(), input in input_strategy()) {
        let (nfa, _dfa, completed, minimized) = build_stages(&pattern);
        let nfa_accepts = {
            let mut eval = rexfa::nfa::eval::NfaEvaluator::from(&nfa);
            eval.accepts(&input)
        };
        let completed_accepts = completed.evaluator().accepts(&input);
        let minimized_accepts = minimized.evaluator().accepts(&input);
        prop_assert_eq!(nfa_accepts, completed_accepts);
        prop_assert_eq!(completed_accepts, minimized_accepts);
    }

    /// Section 8: "Totality after completion" — every reachable state must have a defined
    /// transition for every symbol we try, once completed.
    #[test]
    fn totality_after_completion(pattern in pattern_strategy()) {
        let (_, _, completed, _) = build_stages(&pattern);
        for state in 0..completed.states.len() {
            for c in ['a', 'b', 'x'] {
                let _ = completed.read(state, c); // must not panic
            }
        }
    }

    /// Section 8: "read_greedy >= read_lazy", both bounded by the input length.
    #[test]
    fn greedy_is_at_least_lazy(pattern in pattern_strategy(), input in input_strategy()) {
        let (_, _, _, minimized) = build_stages(&pattern);
        let lazy = minimized.evaluator().read_lazy(&input);
        let greedy = minimized.evaluator().read_greedy(&input);
        prop_assert!(greedy >= lazy);
        prop_assert!(greedy <= input.chars().count());
        prop_assert!(lazy <= input.chars().count());
    }

    /// Section 8: "Minimizing twice is the same as minimizing once" (minimization is a fixed
    /// point: the output of minimize() is already minimal).
    #[test]
    fn minimization_is_idempotent(pattern in pattern_strategy()) {
        let (_, _, completed, minimized) = build_stages(&pattern);
        let twice = minimized.clone().minimize();
        prop_assert_eq!(minimized.states.len(), twice.states.len());
        let _ = completed; // kept alive for symmetry with the other tests in this module
    }

    /// Section 8: "Escape idempotence" — escaping arbitrary text and compiling it matches that
    /// text and nothing else.
    #[test]
    fn escape_then_compile_matches_only_the_original_text(text in "[a-zA-Z0-9]{0,6}") {
        let escaped = rexfa::pattern::escape(&text);
        let automaton = rexfa::compile(&escaped, 0).unwrap();
        prop_assert!(automaton.matches(&text));
    }
}

#[test]
fn trap_absorption() {
    let (_, _, completed, _) = build_stages("ab");
    let mut eval = completed.evaluator();
    eval.step('x'); // not a prefix of "ab", drives into the trap
    assert!(eval.is_trapped());
    eval.step('a');
    eval.step('b');
    assert!(eval.is_trapped());
    assert!(!eval.is_accepting());
}

#[test]
fn empty_pattern_identity() {
    let automaton = rexfa::compile("", 0).unwrap();
    assert!(automaton.matches(""));
    assert!(!automaton.matches("a"));
    assert!(!automaton.matches(" "));
}
