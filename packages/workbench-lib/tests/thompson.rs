use workbench_lib::{
    error::WorkbenchError,
    simulation,
    transform::{
        regex::{Regex, RegexErrorKind},
        thompson::{build, thompson},
    },
    validation::same_language::assert_same_language,
};

fn assert_matches_reference(expression: &str, alphabet: &[char]) {
    let result = thompson(expression).unwrap();
    let index = simulation::compile(&result.automaton).unwrap();
    let reference = Regex::parse(expression).unwrap();

    assert_same_language(&index, &reference, alphabet, 6);
}

#[test]
fn test_curated_expressions() {
    assert_matches_reference("a", &['a', 'b']);
    assert_matches_reference("a|b", &['a', 'b']);
    assert_matches_reference("(a|b)*abb", &['a', 'b']);
    assert_matches_reference("a+", &['a', 'b']);
    assert_matches_reference("a?", &['a', 'b']);
}

#[test]
fn test_more_expressions() {
    assert_matches_reference("ab*c|ε", &['a', 'b', 'c']);
    assert_matches_reference("(ab|ba)+c?", &['a', 'b', 'c']);
    assert_matches_reference("((a|ε)b)*", &['a', 'b']);
    assert_matches_reference("a**|b+?", &['a', 'b']);
    assert_matches_reference("\\*a", &['*', 'a']);
}

#[test]
fn test_structure() {
    let result = thompson("ab").unwrap();
    let automaton = &result.automaton;

    // concatenation fuses the inner states
    assert_eq!(automaton.state_count(), 3);
    assert_eq!(automaton.edge_count(), 2);
    assert_eq!(automaton.initial().unwrap().id.as_str(), "q0");
    assert_eq!(automaton.accepting_states().count(), 1);

    let union = thompson("a|b").unwrap().automaton;
    assert_eq!(union.state_count(), 6);
    assert_eq!(union.edge_count(), 6);

    let star = thompson("a*").unwrap().automaton;
    assert_eq!(star.state_count(), 4);
    assert_eq!(star.edge_count(), 5);

    let plus = thompson("a+").unwrap().automaton;
    assert_eq!(plus.edge_count(), 4);
}

#[test]
fn test_trace() {
    let result = thompson("(a|b)c").unwrap();
    let descriptions = result
        .steps
        .iter()
        .map(|s| s.description.as_str())
        .collect::<Vec<_>>();

    assert_eq!(
        descriptions,
        vec![
            "symbol a",
            "symbol b",
            "union a|b",
            "symbol c",
            "concatenation (a|b)c"
        ]
    );

    // the start of `c` was merged into the end of the union
    let union = &result.steps[2];
    let c = &result.steps[3];
    assert_eq!(union.end, c.start);

    let last = result.steps.last().unwrap();
    assert_eq!(&last.start, &result.automaton.initial().unwrap().id);
}

#[test]
fn test_parse_error_abandons_construction() {
    let Err(WorkbenchError::Regex(error)) = thompson("(a|b") else {
        panic!("expected a regex error");
    };
    assert_eq!(error.kind, RegexErrorKind::MissingCloseParen);
    assert_eq!(error.position, 4);

    let Err(WorkbenchError::Regex(error)) = thompson("a)b") else {
        panic!("expected a regex error");
    };
    assert_eq!(error.kind, RegexErrorKind::UnmatchedCloseParen);
    assert_eq!(error.position, 1);
}

#[test]
fn test_empty_concatenation_matches_empty_word() {
    let result = build(&Regex::Concat(vec![]));
    let index = simulation::compile(&result.automaton).unwrap();

    assert_same_language(&index, &Regex::Epsilon, &['a'], 4);
    assert_eq!(result.automaton.states.len(), 2);
}
