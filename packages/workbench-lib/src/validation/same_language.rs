use crate::{automaton::Language, validation::words};

/// Checks that `a` and `b` agree on every word over `alphabet` up to
/// `max_word_length`.
pub fn same_language(
    a: &impl Language,
    b: &impl Language,
    alphabet: &[char],
    max_word_length: usize,
) -> bool {
    words(alphabet, max_word_length).all(|word| a.accepts(&word) == b.accepts(&word))
}

pub fn assert_same_language(
    a: &impl Language,
    b: &impl Language,
    alphabet: &[char],
    max_word_length: usize,
) {
    for word in words(alphabet, max_word_length) {
        match (a.accepts(&word), b.accepts(&word)) {
            (true, false) => {
                panic!(
                    "{:?} is accepted by automaton `a` but not by automaton `b`. Thus their languages are not equal.",
                    word
                );
            }
            (false, true) => {
                panic!(
                    "{:?} is accepted by automaton `b` but not by automaton `a`. Thus their languages are not equal.",
                    word
                );
            }
            _ => {}
        }
    }
}

/// Assert that no word is accepted by both `a` and `b` and no word is
/// accepted by neither.
pub fn assert_inverse_language(
    a: &impl Language,
    b: &impl Language,
    alphabet: &[char],
    max_word_length: usize,
) {
    for word in words(alphabet, max_word_length) {
        match (a.accepts(&word), b.accepts(&word)) {
            (true, true) => {
                panic!(
                    "{:?} is accepted by automaton `a` and by automaton `b`. Thus their languages are not inverse.",
                    word
                );
            }
            (false, false) => {
                panic!(
                    "{:?} is accepted by neither automaton. Thus their languages are not inverse.",
                    word
                );
            }
            _ => {}
        }
    }
}
