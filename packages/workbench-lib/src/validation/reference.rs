//! A regular expression matcher based on Brzozowski derivatives. Shares no
//! code with the automaton constructions, which makes it usable as an oracle
//! for them.

use crate::{automaton::Language, transform::regex::Regex};

/// The expression matching exactly the words `w` with `symbol · w` in the
/// language of `regex`.
pub fn derivative(regex: &Regex, symbol: char) -> Regex {
    match regex {
        Regex::Empty | Regex::Epsilon => Regex::Empty,
        Regex::Symbol(c) => {
            if *c == symbol {
                Regex::Epsilon
            } else {
                Regex::Empty
            }
        }
        Regex::Union(parts) => parts
            .iter()
            .map(|p| derivative(p, symbol))
            .fold(Regex::Empty, Regex::union),
        Regex::Concat(parts) => {
            let Some((first, rest)) = parts.split_first() else {
                return Regex::Empty;
            };
            let rest = rest
                .iter()
                .cloned()
                .fold(Regex::Epsilon, Regex::concat);

            let head = derivative(first, symbol).concat(rest.clone());
            if first.is_nullable() {
                head.union(derivative(&rest, symbol))
            } else {
                head
            }
        }
        Regex::Star(inner) | Regex::Plus(inner) => {
            derivative(inner, symbol).concat(Regex::Star(inner.clone()))
        }
        Regex::Optional(inner) => derivative(inner, symbol),
    }
}

pub fn matches(regex: &Regex, word: &[char]) -> bool {
    word.iter()
        .fold(regex.clone(), |r, &symbol| derivative(&r, symbol))
        .is_nullable()
}

impl Language for Regex {
    fn accepts(&self, word: &[char]) -> bool {
        matches(self, word)
    }
}

#[test]
fn test_reference_matcher() {
    let regex = Regex::parse("(a|b)*abb").unwrap();

    assert!(matches(&regex, &['a', 'b', 'b']));
    assert!(matches(&regex, &['b', 'a', 'a', 'b', 'b']));
    assert!(!matches(&regex, &['a', 'b']));
    assert!(!matches(&regex, &['a', 'b', 'b', 'a']));
    assert!(!matches(&regex, &[]));

    let plus = Regex::parse("a+b?").unwrap();
    assert!(matches(&plus, &['a']));
    assert!(matches(&plus, &['a', 'a', 'b']));
    assert!(!matches(&plus, &['b']));
}
