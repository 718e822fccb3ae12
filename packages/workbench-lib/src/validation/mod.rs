//! Brute-force language checks used to validate the engines.

use itertools::{Itertools, repeat_n};

pub mod reference;
pub mod same_language;

/// All words over `alphabet` of length at most `max_word_length`, shortest
/// first.
pub fn words(alphabet: &[char], max_word_length: usize) -> impl Iterator<Item = Vec<char>> + '_ {
    (0..=max_word_length).flat_map(move |length| {
        repeat_n(alphabet.iter().copied(), length).multi_cartesian_product()
    })
}

#[test]
fn test_words_counts() {
    assert_eq!(words(&['a', 'b'], 3).count(), 1 + 2 + 4 + 8);
    assert_eq!(words(&['a'], 0).collect_vec(), vec![Vec::<char>::new()]);
}
