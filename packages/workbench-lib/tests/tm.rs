use workbench_lib::{
    automaton::{Automaton, State},
    config::TmConfig,
    label::Direction,
    tm::{self, Tape, TmState, TmStatus},
};

/// Replaces every `a` by `b` and accepts at the first blank.
fn replace_machine() -> Automaton {
    let mut tm = Automaton::new();
    let q0 = tm.add_state(State::new("q0").initial());
    let done = tm.add_state(State::accepting("done"));

    tm.add_edge(&q0, &q0, ["a → b, R", "b → b, R"]);
    tm.add_edge(&q0, &done, ["□ → □, S"]);

    tm
}

#[test]
fn test_replace() {
    let outcome = tm::run(&replace_machine(), "abab", &TmConfig::default()).unwrap();

    assert_eq!(outcome.status, TmStatus::Accepted);
    assert_eq!(outcome.tape, "bbbb");
    assert_eq!(outcome.head, 4);
    assert_eq!(outcome.steps, 5);
    assert_eq!(outcome.history.len(), 5);
    assert_eq!(outcome.history[0], "q0: read a at 0, write b, move R → q0");
}

#[test]
fn test_stuck_machine_rejects() {
    let outcome = tm::run(&replace_machine(), "abc", &TmConfig::default()).unwrap();
    assert_eq!(outcome.status, TmStatus::Rejected);
    assert_eq!(outcome.head, 2);
    assert_eq!(outcome.tape, "bbc");
}

#[test]
fn test_no_blank_transition_stops_in_one_step() {
    let mut machine = Automaton::new();
    let q0 = machine.add_state(State::new("q0").initial());
    machine.add_edge(&q0, &q0, ["a → a, R"]);

    let index = tm::compile(&machine).unwrap();
    let start = TmState::start(&index, "");
    let once = start.step(&index);
    assert_eq!(once.status, TmStatus::Rejected);
    assert!(once.history.is_empty());

    let finished = start.fast_run(&index, 1000);
    assert_eq!(finished, once);
    drop(index);

    machine.states[0].is_accepting = true;
    let index = tm::compile(&machine).unwrap();
    let finished = TmState::start(&index, "").fast_run(&index, 1000);
    assert_eq!(finished.status, TmStatus::Accepted);
    assert_eq!(finished.steps, 0);
}

#[test]
fn test_budget_halts() {
    let mut machine = Automaton::new();
    let q0 = machine.add_state(State::new("q0").initial());
    machine.add_edge(&q0, &q0, ["* → *, R"]);

    let config = TmConfig::default().with_step_budget(50);
    let outcome = tm::run(&machine, "ab", &config).unwrap();

    assert_eq!(outcome.status, TmStatus::Halted);
    assert_eq!(outcome.steps, 50);
    assert_eq!(outcome.head, 50);
    // the wildcard write leaves the input untouched
    assert_eq!(outcome.tape, "ab");
}

#[test]
fn test_step_is_pure() {
    let machine = replace_machine();
    let index = tm::compile(&machine).unwrap();

    let start = TmState::start(&index, "a");
    let next = start.step(&index);

    assert_eq!(start.tape.read(0), 'a');
    assert_eq!(start.head, 0);
    assert_eq!(next.tape.read(0), 'b');
    assert_eq!(next.head, 1);
    assert_eq!(next.history[0].direction, Direction::Right);
    assert_eq!(next.status, TmStatus::Running);
}

#[test]
fn test_tape_grows_left() {
    let mut machine = Automaton::new();
    let q0 = machine.add_state(State::new("q0").initial());
    let q1 = machine.add_state(State::accepting("q1"));
    machine.add_edge(&q0, &q0, ["a -> a, L"]);
    machine.add_edge(&q0, &q1, ["□ → x, S"]);

    let outcome = tm::run(&machine, "ab", &TmConfig::default()).unwrap();
    assert_eq!(outcome.status, TmStatus::Accepted);
    assert_eq!(outcome.head, -1);
    assert_eq!(outcome.tape, "xab");
}

#[test]
fn test_first_matching_transition_wins() {
    let mut machine = Automaton::new();
    let q0 = machine.add_state(State::new("q0").initial());
    let yes = machine.add_state(State::accepting("yes"));
    let no = machine.add_state(State::new("no"));
    machine.add_edge(&q0, &yes, ["a → a, S"]);
    machine.add_edge(&q0, &no, ["* → *, S"]);

    let outcome = tm::run(&machine, "a", &TmConfig::default()).unwrap();
    assert_eq!(outcome.status, TmStatus::Accepted);
    assert_eq!(outcome.state.unwrap().as_str(), "yes");
}

#[test]
fn test_sparse_tape() {
    let mut tape = Tape::from_input("ab");
    assert_eq!(tape.read(-5), '□');
    assert_eq!(tape.bounds(), Some((0, 1)));

    tape.write(10, 'z');
    tape.write(0, '□');
    assert_eq!(tape.non_blank_cells(), 2);
    assert_eq!(tape.bounds(), Some((1, 10)));
    assert_eq!(tape.window(-1, 2), "□□b□");
    assert_eq!(Tape::new().to_string(), "□");
}
