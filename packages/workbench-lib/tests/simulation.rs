use itertools::Itertools;
use workbench_lib::{
    automaton::{Automaton, EPSILON, Mode, Snapshot, State, StateId},
    error::{ValidationError, WorkbenchError},
    simulation::{self, NfaSession, SessionStatus, StateSet},
};

fn parity_dfa() -> Automaton {
    let mut dfa = Automaton::new();
    let q0 = dfa.add_state(State::accepting("q0").initial());
    let q1 = dfa.add_state(State::new("q1"));

    dfa.add_edge(&q0, &q1, ["0"]);
    dfa.add_edge(&q1, &q0, ["0"]);
    dfa.add_edge(&q0, &q0, ["1"]);
    dfa.add_edge(&q1, &q1, ["1"]);

    dfa
}

/// Accepts words over {a, b} containing `ab`, with an epsilon shortcut.
fn contains_ab_nfa() -> Automaton {
    let mut nfa = Automaton::new();
    let q0 = nfa.add_state(State::new("q0").initial());
    let q1 = nfa.add_state(State::new("q1"));
    let q2 = nfa.add_state(State::new("q2"));
    let q3 = nfa.add_state(State::accepting("q3"));

    nfa.add_edge(&q0, &q0, ["a", "b"]);
    nfa.add_edge(&q0, &q1, ["a"]);
    nfa.add_edge(&q1, &q2, ["b"]);
    nfa.add_edge(&q2, &q3, [EPSILON]);
    nfa.add_edge(&q3, &q3, ["a", "b"]);

    nfa
}

#[test]
fn test_parity_dfa() {
    let dfa = parity_dfa();

    assert!(simulation::run(&dfa, "0011", Mode::Dfa).unwrap());
    assert!(!simulation::run(&dfa, "0", Mode::Dfa).unwrap());
    assert!(simulation::run(&dfa, "", Mode::Dfa).unwrap());
    assert!(simulation::run(&dfa, "101101", Mode::Dfa).unwrap());
}

#[test]
fn test_nfa_with_epsilon() {
    let nfa = contains_ab_nfa();

    for word in ["ab", "aab", "bab", "abba", "bbbab"] {
        assert!(simulation::run(&nfa, word, Mode::Nfa).unwrap(), "{word}");
    }
    for word in ["", "a", "b", "ba", "bbaa"] {
        assert!(!simulation::run(&nfa, word, Mode::Nfa).unwrap(), "{word}");
    }
}

#[test]
fn test_epsilon_closure() {
    let mut nfa = Automaton::new();
    let q0 = nfa.add_state(State::new("q0").initial());
    let q1 = nfa.add_state(State::new("q1"));
    let q2 = nfa.add_state(State::accepting("q2"));
    let q3 = nfa.add_state(State::new("q3"));
    nfa.add_edge(&q0, &q1, [EPSILON]);
    nfa.add_edge(&q1, &q2, [EPSILON]);
    nfa.add_edge(&q2, &q0, [EPSILON]);
    nfa.add_edge(&q2, &q3, ["a"]);

    let index = simulation::compile(&nfa).unwrap();
    let start = StateSet::from([index.node_of(&q0).unwrap()]);
    let closure = simulation::epsilon_closure(&index, &start);

    assert_eq!(
        simulation::ids(&index, &closure),
        vec![q0.clone(), q1, q2]
    );
    assert!(simulation::epsilon_closure(&index, &StateSet::new()).is_empty());

    // the dead configuration is an empty set, not an error
    let dead = simulation::step(&index, &StateSet::from([index.node_of(&q3).unwrap()]), 'a');
    assert!(dead.is_empty());
}

#[test]
fn test_missing_initial_rejects() {
    let mut nfa = contains_ab_nfa();
    nfa.states[0].is_initial = false;

    assert!(!simulation::run(&nfa, "ab", Mode::Nfa).unwrap());
    assert!(!simulation::run(&nfa, "", Mode::Nfa).unwrap());
}

#[test]
fn test_validation_errors() {
    let mut duplicate = parity_dfa();
    duplicate.add_state(State::new("q1"));
    assert_eq!(
        simulation::run(&duplicate, "0", Mode::Dfa),
        Err(WorkbenchError::Validation(ValidationError::DuplicateState(
            StateId::from("q1")
        )))
    );

    let mut dangling = parity_dfa();
    let q0 = StateId::from("q0");
    let edge = dangling.add_edge(&q0, &StateId::from("nowhere"), ["1"]);
    assert_eq!(
        simulation::run(&dangling, "0", Mode::Dfa),
        Err(WorkbenchError::Validation(ValidationError::DanglingEdge {
            edge,
            state: StateId::from("nowhere")
        }))
    );

    let mut two_initial = parity_dfa();
    two_initial.states[1].is_initial = true;
    assert!(matches!(
        simulation::run(&two_initial, "0", Mode::Dfa),
        Err(WorkbenchError::Validation(
            ValidationError::MultipleInitialStates(_)
        ))
    ));

    let mut malformed = parity_dfa();
    malformed.edges[0].labels.push("ab".to_string());
    let Err(WorkbenchError::Label(error)) = simulation::run(&malformed, "0", Mode::Dfa) else {
        panic!("expected a label error");
    };
    assert_eq!(error.label, "ab");
}

#[test]
fn test_session() {
    let nfa = contains_ab_nfa();
    let index = simulation::compile(&nfa).unwrap();
    let mut session = NfaSession::new("abb", Mode::Nfa);

    assert_eq!(session.status(), SessionStatus::Idle);
    assert_eq!(session.step(&index), SessionStatus::Idle);

    assert_eq!(session.start(&index), SessionStatus::Stepping);
    assert_eq!(simulation::ids(&index, session.active()), vec![StateId::from("q0")]);

    assert_eq!(session.step(&index), SessionStatus::Stepping);
    assert_eq!(session.step(&index), SessionStatus::Stepping);
    assert_eq!(
        simulation::ids(&index, session.active()).into_iter().map(|s| s.0).collect_vec(),
        vec!["q0", "q2", "q3"]
    );
    assert_eq!(session.step(&index), SessionStatus::Accepted);
    assert_eq!(session.position(), 3);
    assert_eq!(session.history().len(), 4);

    session.reset();
    assert_eq!(session.status(), SessionStatus::Idle);
    assert!(session.active().is_empty());
    assert_eq!(session.finish(&index), SessionStatus::Accepted);
}

#[test]
fn test_session_dead_configuration() {
    let dfa = parity_dfa();
    let index = simulation::compile(&dfa).unwrap();

    let mut session = NfaSession::new("0x1", Mode::Dfa);
    session.start(&index);
    assert_eq!(session.step(&index), SessionStatus::Stepping);
    assert_eq!(session.step(&index), SessionStatus::Rejected);
    assert_eq!(session.step(&index), SessionStatus::Rejected);
    assert_eq!(session.position(), 2);
}

#[test]
fn test_determinism_and_alphabet() {
    let dfa = parity_dfa();
    let index = simulation::compile(&dfa).unwrap();
    assert!(simulation::is_deterministic(&index));
    assert_eq!(simulation::alphabet(&index), vec!['0', '1']);

    let nfa = contains_ab_nfa();
    let index = simulation::compile(&nfa).unwrap();
    assert!(!simulation::is_deterministic(&index));
    assert_eq!(simulation::alphabet(&index), vec!['a', 'b']);
}

#[test]
fn test_snapshot_json_round_trip() {
    let mut automaton = contains_ab_nfa();
    automaton.states[1] = automaton.states[1].clone().with_position(120.5, -40.0);
    automaton.states[2].label = "middle".to_string();
    let snapshot = Snapshot::new(Mode::Nfa, automaton);

    let json = snapshot.to_json().unwrap();
    assert!(json.contains("\"isInitial\": true"));
    assert!(json.contains("\"mode\": \"nfa\""));
    assert_eq!(Snapshot::from_json(&json).unwrap(), snapshot);

    let minimal = r#"{
        "mode": "dfa",
        "states": [{ "id": "s", "label": "s", "isInitial": true, "isAccepting": true }],
        "edges": [{ "id": "e0", "from": "s", "to": "s", "labels": ["a"] }]
    }"#;
    let parsed = Snapshot::from_json(minimal).unwrap();
    assert_eq!(parsed.mode, Mode::Dfa);
    assert!(simulation::run(&parsed.automaton, "aaa", parsed.mode).unwrap());
}

#[test]
fn test_mode_names() {
    for mode in [Mode::Dfa, Mode::Nfa, Mode::Pda, Mode::Tm, Mode::Mealy, Mode::Moore] {
        assert_eq!(mode.to_string().parse::<Mode>(), Ok(mode));
    }
    assert_eq!("NFA".parse::<Mode>(), Ok(Mode::Nfa));
    assert!("lba".parse::<Mode>().is_err());
}
