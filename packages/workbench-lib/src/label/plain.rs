use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::label::{LabelCodec, LabelError};

pub(crate) const EPSILON_CHAR_STR: &str = "ε";
pub const EPSILON_CHAR: char = 'ε';

/// A DFA/NFA transition: either a concrete input symbol or epsilon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlainEntry {
    Symbol(char),
    Epsilon,
}

impl PlainEntry {
    pub fn is_epsilon(&self) -> bool {
        matches!(self, PlainEntry::Epsilon)
    }

    /// Checks whether this entry consumes the given input symbol.
    pub fn matches(&self, symbol: char) -> bool {
        match self {
            PlainEntry::Symbol(s) => *s == symbol,
            PlainEntry::Epsilon => false,
        }
    }

    pub fn symbol(&self) -> Option<char> {
        match self {
            PlainEntry::Symbol(s) => Some(*s),
            PlainEntry::Epsilon => None,
        }
    }
}

impl From<Option<char>> for PlainEntry {
    fn from(value: Option<char>) -> Self {
        match value {
            Some(c) => PlainEntry::Symbol(c),
            None => PlainEntry::Epsilon,
        }
    }
}

impl LabelCodec for PlainEntry {
    /// A plain label is a single symbol, `ε`, or empty (also epsilon).
    fn parse(label: &str) -> Result<Self, LabelError> {
        let trimmed = label.trim();
        let mut chars = trimmed.chars();

        match (chars.next(), chars.next()) {
            (None, _) => Ok(PlainEntry::Epsilon),
            (Some(EPSILON_CHAR), None) => Ok(PlainEntry::Epsilon),
            (Some(c), None) => Ok(PlainEntry::Symbol(c)),
            (Some(_), Some(_)) => {
                let offset = label.chars().take_while(|c| c.is_whitespace()).count();
                Err(LabelError::new(
                    label,
                    offset + 1,
                    "expected a single symbol or `ε`",
                ))
            }
        }
    }
}

impl Display for PlainEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlainEntry::Symbol(c) => write!(f, "{c}"),
            PlainEntry::Epsilon => write!(f, "{EPSILON_CHAR}"),
        }
    }
}

#[test]
fn test_plain_symbol() {
    assert_eq!(PlainEntry::parse("a"), Ok(PlainEntry::Symbol('a')));
    assert_eq!(PlainEntry::parse(" 0 "), Ok(PlainEntry::Symbol('0')));
    assert_eq!(PlainEntry::parse("ε"), Ok(PlainEntry::Epsilon));
    assert_eq!(PlainEntry::parse(""), Ok(PlainEntry::Epsilon));
}

#[test]
fn test_plain_rejects_words() {
    let err = PlainEntry::parse("ab").unwrap_err();
    assert_eq!(err.position, 1);
}
