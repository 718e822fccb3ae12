use workbench_lib::{
    automaton::{Automaton, EPSILON, State},
    transform::grammar::fa_to_grammar,
};

fn bodies(grammar: &workbench_lib::transform::grammar::Grammar) -> Vec<String> {
    grammar.productions.iter().map(|p| p.to_string()).collect()
}

#[test]
fn test_even_a_grammar() {
    let mut dfa = Automaton::new();
    let even = dfa.add_state(State::accepting("even").initial());
    let odd = dfa.add_state(State::new("odd"));
    dfa.add_edge(&even, &odd, ["a"]);
    dfa.add_edge(&even, &even, ["b"]);
    dfa.add_edge(&odd, &even, ["a"]);
    dfa.add_edge(&odd, &odd, ["b"]);

    let grammar = fa_to_grammar(&dfa).unwrap();

    assert_eq!(grammar.start.as_deref(), Some("S"));
    assert_eq!(grammar.nonterminals[1].1, "A");
    assert_eq!(
        bodies(&grammar),
        vec!["S → aA", "S → bS", "S → ε", "A → aS", "A → bA"]
    );
    assert_eq!(grammar.to_string().lines().count(), 5);
}

#[test]
fn test_start_symbol_comes_first() {
    let mut nfa = Automaton::new();
    let q0 = nfa.add_state(State::accepting("q0"));
    let q1 = nfa.add_state(State::new("q1").initial());
    nfa.add_edge(&q1, &q0, ["a", EPSILON]);

    let grammar = fa_to_grammar(&nfa).unwrap();

    assert_eq!(grammar.nonterminals[0].1, "A");
    assert_eq!(grammar.nonterminals[1].1, "S");
    assert_eq!(bodies(&grammar), vec!["S → aA", "S → A", "A → ε"]);
}

#[test]
fn test_duplicate_transitions_yield_one_production() {
    let mut nfa = Automaton::new();
    let q0 = nfa.add_state(State::new("q0").initial());
    let q1 = nfa.add_state(State::accepting("q1"));
    nfa.add_edge(&q0, &q1, ["a"]);
    nfa.add_edge(&q0, &q1, ["a"]);

    let grammar = fa_to_grammar(&nfa).unwrap();
    assert_eq!(bodies(&grammar), vec!["S → aA", "A → ε"]);
}

#[test]
fn test_nonterminal_names_skip_s() {
    let mut nfa = Automaton::new();
    nfa.add_state(State::new("init").initial());
    for i in 0..30 {
        nfa.add_state(State::new(format!("q{i}")));
    }

    let grammar = fa_to_grammar(&nfa).unwrap();
    let names = grammar
        .nonterminals
        .iter()
        .map(|(_, name)| name.as_str())
        .collect::<Vec<_>>();

    assert_eq!(names.iter().filter(|&&n| n == "S").count(), 1);
    assert_eq!(names[18], "R");
    assert_eq!(names[19], "T");
    assert_eq!(names[26], "N0");
    assert!(grammar.productions.is_empty());
}

#[test]
fn test_no_initial_state() {
    let mut nfa = Automaton::new();
    nfa.add_state(State::accepting("q0"));

    let grammar = fa_to_grammar(&nfa).unwrap();
    assert_eq!(grammar.start, None);
    assert_eq!(bodies(&grammar), vec!["A → ε"]);
}
