use workbench_lib::{
    automaton::{Automaton, Mode, State, StateId},
    random::{RandomOptions, generate_random_nfas},
    simulation,
    transform::{minimize::minimize, subset::subset_construction, thompson::thompson},
    validation::same_language::assert_same_language,
};

fn ids(ids: &[StateId]) -> Vec<&str> {
    ids.iter().map(StateId::as_str).collect()
}

/// Parity of `a`s with a redundant copy of each state and an unreachable one.
fn redundant_parity() -> Automaton {
    let mut dfa = Automaton::new();
    let even = dfa.add_state(State::accepting("even").initial());
    let odd = dfa.add_state(State::new("odd"));
    let even2 = dfa.add_state(State::accepting("even2"));
    let odd2 = dfa.add_state(State::new("odd2"));
    let lost = dfa.add_state(State::new("lost"));

    dfa.add_edge(&even, &odd, ["a"]);
    dfa.add_edge(&odd, &even2, ["a"]);
    dfa.add_edge(&even2, &odd2, ["a"]);
    dfa.add_edge(&odd2, &even, ["a"]);
    dfa.add_edge(&lost, &even, ["a"]);

    dfa
}

#[test]
fn test_merge_equivalent_states() {
    let dfa = redundant_parity();
    let result = minimize(&dfa).unwrap();

    assert!(!result.determinized);
    assert_eq!(ids(&result.unreachable), vec!["lost"]);
    assert_eq!(result.automaton.state_count(), 2);
    assert_eq!(result.removed_count, 3);
    assert_eq!(result.classes.len(), 2);
    assert_eq!(ids(&result.classes[0]), vec!["even", "even2"]);

    let initial = result.automaton.initial().unwrap();
    assert_eq!(initial.id.as_str(), "even");
    assert_eq!(initial.label, "even,even2");
    assert!(initial.is_accepting);

    let original = simulation::compile(&dfa).unwrap();
    let minimal = simulation::compile(&result.automaton).unwrap();
    assert_same_language(&original, &minimal, &['a'], 8);
}

#[test]
fn test_initial_state_stays_representative() {
    // the initial state comes last in enumeration order
    let mut dfa = Automaton::new();
    let sink = dfa.add_state(State::accepting("sink"));
    let start = dfa.add_state(State::accepting("start").initial());
    dfa.add_edge(&sink, &sink, ["a"]);
    dfa.add_edge(&start, &sink, ["a"]);

    let result = minimize(&dfa).unwrap();
    assert_eq!(result.automaton.state_count(), 1);
    assert_eq!(result.automaton.states[0].id.as_str(), "start");
    assert!(result.automaton.states[0].is_initial);
    assert_eq!(result.automaton.edges[0].from.as_str(), "start");
    assert_eq!(result.automaton.edges[0].to.as_str(), "start");
}

#[test]
fn test_already_minimal() {
    let mut dfa = Automaton::new();
    let q0 = dfa.add_state(State::new("q0").initial());
    let q1 = dfa.add_state(State::accepting("q1"));
    dfa.add_edge(&q0, &q1, ["a"]);
    dfa.add_edge(&q1, &q0, ["a"]);

    let result = minimize(&dfa).unwrap();
    assert_eq!(result.removed_count, 0);
    assert_eq!(result.automaton.states, dfa.states);
    assert_eq!(result.distinguished.len(), 1);
    assert_eq!(result.distinguished[0].round, 0);
}

#[test]
fn test_distinguishing_rounds() {
    // q0 -a-> q1 -a-> q2 (accepting), q2 -a-> q2
    let mut dfa = Automaton::new();
    let q0 = dfa.add_state(State::new("q0").initial());
    let q1 = dfa.add_state(State::new("q1"));
    let q2 = dfa.add_state(State::accepting("q2"));
    dfa.add_edge(&q0, &q1, ["a"]);
    dfa.add_edge(&q1, &q2, ["a"]);
    dfa.add_edge(&q2, &q2, ["a"]);

    let result = minimize(&dfa).unwrap();
    assert_eq!(result.removed_count, 0);

    let marked = result
        .distinguished
        .iter()
        .find(|d| ids(&[d.pair.0.clone(), d.pair.1.clone()]) == vec!["q0", "q1"])
        .unwrap();
    assert_eq!(marked.round, 1);
    assert_eq!(marked.symbol, Some('a'));
    assert_eq!(
        marked.destinations,
        Some((Some(StateId::from("q1")), Some(StateId::from("q2"))))
    );
}

#[test]
fn test_textbook_example() {
    let nfa = thompson("(a|b)*abb").unwrap().automaton;
    let dfa = subset_construction(&nfa).unwrap().automaton;
    assert_eq!(dfa.state_count(), 5);

    let result = minimize(&dfa).unwrap();
    assert_eq!(result.automaton.state_count(), 4);
    assert_eq!(result.removed_count, 1);

    let index = simulation::compile(&result.automaton).unwrap();
    let accepts = |word: &str| simulation::accepts(&index, Mode::Dfa, word.chars());

    for word in ["abb", "aabb", "babb", "abbabb", "bbbababb"] {
        assert!(accepts(word), "{word}");
    }
    for word in ["", "ab", "abba", "abbb", "bba"] {
        assert!(!accepts(word), "{word}");
    }
}

#[test]
fn test_nondeterministic_input_is_determinized() {
    let nfa = thompson("a*b").unwrap().automaton;
    let result = minimize(&nfa).unwrap();

    assert!(result.determinized);
    let original = simulation::compile(&nfa).unwrap();
    let minimal = simulation::compile(&result.automaton).unwrap();
    assert!(simulation::is_deterministic(&minimal));
    assert_same_language(&original, &minimal, &['a', 'b'], 6);
}

#[test]
fn test_random_idempotence_and_language() {
    let options = RandomOptions::default().with_seed(11).with_state_count(6);

    for nfa in generate_random_nfas(&options, 30) {
        let dfa = subset_construction(&nfa).unwrap().automaton;
        let once = minimize(&dfa).unwrap();
        let twice = minimize(&once.automaton).unwrap();

        assert_eq!(
            once.automaton.state_count(),
            twice.automaton.state_count()
        );
        assert_eq!(twice.removed_count, 0);

        let dfa_index = simulation::compile(&dfa).unwrap();
        let minimal_index = simulation::compile(&once.automaton).unwrap();
        assert_same_language(&dfa_index, &minimal_index, &options.alphabet, 6);
    }
}

#[test]
fn test_no_initial_state() {
    let mut dfa = redundant_parity();
    dfa.states[0].is_initial = false;

    let result = minimize(&dfa).unwrap();
    assert_eq!(result.automaton.state_count(), 0);
    assert_eq!(result.unreachable.len(), 5);
}
