use workbench_lib::{
    automaton::{Automaton, State},
    config::PdaConfig,
    pda::{self, AcceptanceCriterion, PdaSimulation, PdaStatus},
};

/// a^n b^n for n >= 0, accepting by final state.
fn anbn() -> Automaton {
    let mut pda = Automaton::new();
    let push = pda.add_state(State::new("push").initial());
    let pop = pda.add_state(State::new("pop"));
    let done = pda.add_state(State::accepting("done"));

    pda.add_edge(&push, &push, ["a, Z → AZ", "a, A → AA"]);
    pda.add_edge(&push, &pop, ["ε, ε → ε"]);
    pda.add_edge(&pop, &pop, ["b, A → ε"]);
    pda.add_edge(&pop, &done, ["ε, Z → Z"]);

    pda
}

#[test]
fn test_anbn() {
    let pda = anbn();
    let config = PdaConfig::default();

    for word in ["", "ab", "aabb", "aaabbb"] {
        let outcome = pda::run(&pda, word, &config).unwrap();
        assert!(outcome.accepted, "{word}");
        assert_eq!(outcome.status, PdaStatus::Accepted);
    }

    for word in ["a", "b", "abb", "aab", "ba", "abab"] {
        let outcome = pda::run(&pda, word, &config).unwrap();
        assert!(!outcome.accepted, "{word}");
        assert_eq!(outcome.status, PdaStatus::Rejected);
    }
}

#[test]
fn test_accepting_path() {
    let pda = anbn();
    let outcome = pda::run(&pda, "ab", &PdaConfig::default()).unwrap();

    let path = outcome.accepting_path.unwrap();
    let states = path.iter().map(|c| c.state.as_str()).collect::<Vec<_>>();
    let stacks = path.iter().map(|c| c.stack.as_str()).collect::<Vec<_>>();

    assert_eq!(states, vec!["push", "push", "pop", "pop", "done"]);
    assert_eq!(stacks, vec!["Z", "AZ", "AZ", "Z", "Z"]);
    assert_eq!(path[0].transition, None);
    assert_eq!(path[1].transition.as_deref(), Some("a, Z → AZ"));
    assert_eq!(path.last().unwrap().position, 2);
}

#[test]
fn test_push_order_and_empty_stack() {
    // pushes `XY` so that `X` ends up on top, then has to pop X before Y
    let mut pda = Automaton::new();
    let q0 = pda.add_state(State::new("q0").initial());
    let q1 = pda.add_state(State::new("q1"));
    pda.add_edge(&q0, &q1, ["a, Z → XY"]);
    pda.add_edge(&q1, &q1, ["x, X → ε", "y, Y → ε"]);

    let config = PdaConfig::default().with_acceptance(AcceptanceCriterion::EmptyStack);

    assert!(pda::run(&pda, "axy", &config).unwrap().accepted);
    assert!(!pda::run(&pda, "ayx", &config).unwrap().accepted);
    assert!(!pda::run(&pda, "ax", &config).unwrap().accepted);

    let final_state = PdaConfig::default();
    assert!(!pda::run(&pda, "axy", &final_state).unwrap().accepted);
}

#[test]
fn test_epsilon_loop_hits_cap() {
    let mut pda = Automaton::new();
    let q0 = pda.add_state(State::new("q0").initial());
    let q1 = pda.add_state(State::accepting("q1"));
    pda.add_edge(&q0, &q0, ["ε, ε → A", "ε, ε → B"]);
    pda.add_edge(&q0, &q1, ["b, ε → ε"]);

    let config = PdaConfig::default().with_max_configurations(200);
    let outcome = pda::run(&pda, "a", &config).unwrap();

    assert_eq!(outcome.status, PdaStatus::LimitExceeded);
    assert!(!outcome.accepted);
    assert_eq!(outcome.configurations, 200);
}

#[test]
fn test_accepting_child_survives_cap() {
    let mut pda = Automaton::new();
    let q0 = pda.add_state(State::new("q0").initial());
    let q1 = pda.add_state(State::accepting("q1"));
    pda.add_edge(&q0, &q1, ["ε, ε → ε"]);
    pda.add_edge(&q0, &q0, ["ε, ε → A"]);

    let config = PdaConfig::default().with_max_configurations(2);
    let outcome = pda::run(&pda, "", &config).unwrap();

    assert_eq!(outcome.status, PdaStatus::LimitExceeded);
    assert_eq!(outcome.configurations, 2);
    assert!(outcome.accepted);
    let path = outcome.accepting_path.unwrap();
    assert_eq!(path.last().unwrap().state.as_str(), "q1");
}

#[test]
fn test_default_cap_terminates() {
    let mut pda = Automaton::new();
    let q0 = pda.add_state(State::new("q0").initial());
    pda.add_edge(&q0, &q0, ["ε, ε → ε"]);

    let outcome = pda::run(&pda, "", &PdaConfig::default()).unwrap();
    assert_eq!(outcome.status, PdaStatus::LimitExceeded);
    assert_eq!(outcome.configurations, 10_000);
}

#[test]
fn test_stepping() {
    let pda = anbn();
    let config = PdaConfig::default();
    let index = pda::compile(&pda).unwrap();

    let simulation = PdaSimulation::start(&index, "aabb", &config);
    assert_eq!(simulation.status(), PdaStatus::Running);
    assert_eq!(simulation.live().count(), 1);

    let simulation = simulation.step(&index);
    assert_eq!(simulation.rounds(), 1);
    assert!(!simulation.is_done());
    assert_eq!(
        simulation.live().map(|c| c.stack_string()).collect::<Vec<_>>(),
        vec!["AZ", "Z"]
    );

    let simulation = simulation.fast_run(&index);
    assert!(simulation.is_done());
    assert_eq!(simulation.status(), PdaStatus::Accepted);

    let accepted = simulation.accepted().next().unwrap();
    let trace = simulation.trace(accepted.id);
    assert_eq!(trace.first().unwrap().id, 0);
    assert_eq!(trace.last().unwrap().id, accepted.id);
    assert!(simulation.rejected().count() > 0);
}

#[test]
fn test_fast_run_round_limit() {
    let mut pda = Automaton::new();
    let q0 = pda.add_state(State::new("q0").initial());
    pda.add_edge(&q0, &q0, ["ε, ε → ε"]);

    let config = PdaConfig::default().with_fast_run_rounds(7);
    let index = pda::compile(&pda).unwrap();
    let simulation = PdaSimulation::start(&index, "", &config).fast_run(&index);

    assert_eq!(simulation.rounds(), 7);
    assert_eq!(simulation.status(), PdaStatus::Running);
}

#[test]
fn test_missing_initial_state() {
    let mut pda = anbn();
    pda.states[0].is_initial = false;

    let outcome = pda::run(&pda, "ab", &PdaConfig::default()).unwrap();
    assert_eq!(outcome.status, PdaStatus::Rejected);
    assert_eq!(outcome.configurations, 0);
}

#[test]
fn test_malformed_label() {
    let mut pda = anbn();
    pda.edges[0].labels.push("a Z → A".to_string());
    assert!(pda::run(&pda, "ab", &PdaConfig::default()).is_err());
}
