//! Regular expression syntax tree, parser and printer.
//!
//! Grammar, with spaces ignored outside of escapes:
//!
//! ```text
//! union  → concat ('|' concat)*
//! concat → kleene+
//! kleene → atom ('*' | '+' | '?')*
//! atom   → symbol | '\' any | 'ε' | '∅' | '(' union ')'
//! ```

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::label::plain::EPSILON_CHAR;

/// Printed for the empty language. Only ever produced as a whole expression.
pub const EMPTY_SET: char = '∅';

const SPECIAL: [char; 8] = ['|', '*', '+', '?', '(', ')', '\\', EMPTY_SET];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Regex {
    Empty,
    Epsilon,
    Symbol(char),
    Concat(Vec<Regex>),
    Union(Vec<Regex>),
    Star(Box<Regex>),
    Plus(Box<Regex>),
    Optional(Box<Regex>),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegexErrorKind {
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("missing `)`")]
    MissingCloseParen,
    #[error("`)` without matching `(`")]
    UnmatchedCloseParen,
    #[error("`\\` at the end of the expression")]
    DanglingEscape,
}

/// A parse failure. `position` is a character offset into the expression.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[error("Invalid regular expression at position {position}: {kind}")]
pub struct RegexError {
    pub position: usize,
    pub kind: RegexErrorKind,
}

impl Regex {
    pub fn parse(expression: &str) -> Result<Regex, RegexError> {
        let mut parser = RegexParser {
            chars: expression.chars().collect(),
            position: 0,
            depth: 0,
        };

        let regex = parser.union()?;
        parser.skip_spaces();

        match parser.peek() {
            None => Ok(regex),
            Some(')') => Err(parser.error(RegexErrorKind::UnmatchedCloseParen)),
            Some(c) => Err(parser.error(RegexErrorKind::UnexpectedChar(c))),
        }
    }

    /// Concatenation that drops epsilon factors and collapses on `∅`.
    pub fn concat(self, other: Regex) -> Regex {
        let mut factors = vec![];
        for part in [self, other] {
            match part {
                Regex::Empty => return Regex::Empty,
                Regex::Epsilon => {}
                Regex::Concat(inner) => factors.extend(inner),
                r => factors.push(r),
            }
        }

        match factors.len() {
            0 => Regex::Epsilon,
            1 => factors.remove(0),
            _ => Regex::Concat(factors),
        }
    }

    /// Alternation that ignores `∅`, drops duplicates and removes epsilon
    /// alternatives that are already covered.
    pub fn union(self, other: Regex) -> Regex {
        let mut alternatives: Vec<Regex> = vec![];
        for part in [self, other] {
            let parts = match part {
                Regex::Empty => vec![],
                Regex::Union(inner) => inner,
                r => vec![r],
            };
            for p in parts {
                if !alternatives.contains(&p) {
                    alternatives.push(p);
                }
            }
        }

        let has_epsilon = alternatives.contains(&Regex::Epsilon);
        if has_epsilon && alternatives.len() > 1 {
            alternatives.retain(|a| *a != Regex::Epsilon);
            let rest = if alternatives.len() == 1 {
                alternatives.remove(0)
            } else {
                Regex::Union(alternatives)
            };
            return if rest.is_nullable() { rest } else { Regex::Optional(Box::new(rest)) };
        }

        match alternatives.len() {
            0 => Regex::Empty,
            1 => alternatives.remove(0),
            _ => Regex::Union(alternatives),
        }
    }

    pub fn star(self) -> Regex {
        match self {
            Regex::Empty | Regex::Epsilon => Regex::Epsilon,
            Regex::Star(inner) | Regex::Plus(inner) | Regex::Optional(inner) => Regex::Star(inner),
            r => Regex::Star(Box::new(r)),
        }
    }

    /// True if the language contains the empty word.
    pub fn is_nullable(&self) -> bool {
        match self {
            Regex::Empty | Regex::Symbol(_) => false,
            Regex::Epsilon | Regex::Star(_) | Regex::Optional(_) => true,
            Regex::Plus(inner) => inner.is_nullable(),
            Regex::Concat(parts) => parts.iter().all(Regex::is_nullable),
            Regex::Union(parts) => parts.iter().any(Regex::is_nullable),
        }
    }

    /// All literal symbols, in order of first occurrence.
    pub fn symbols(&self) -> Vec<char> {
        let mut symbols = vec![];
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, symbols: &mut Vec<char>) {
        match self {
            Regex::Empty | Regex::Epsilon => {}
            Regex::Symbol(c) => {
                if !symbols.contains(c) {
                    symbols.push(*c);
                }
            }
            Regex::Concat(parts) | Regex::Union(parts) => {
                parts.iter().for_each(|p| p.collect_symbols(symbols))
            }
            Regex::Star(inner) | Regex::Plus(inner) | Regex::Optional(inner) => {
                inner.collect_symbols(symbols)
            }
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Regex::Union(_) => 0,
            Regex::Concat(_) => 1,
            Regex::Star(_) | Regex::Plus(_) | Regex::Optional(_) => 2,
            Regex::Empty | Regex::Epsilon | Regex::Symbol(_) => 3,
        }
    }

    fn fmt_operand(&self, f: &mut std::fmt::Formatter<'_>, min: u8) -> std::fmt::Result {
        if self.precedence() < min {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

impl Display for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Regex::Empty => write!(f, "{EMPTY_SET}"),
            Regex::Epsilon => write!(f, "{EPSILON_CHAR}"),
            Regex::Symbol(c) => {
                if SPECIAL.contains(c) || *c == EPSILON_CHAR || c.is_whitespace() {
                    write!(f, "\\{c}")
                } else {
                    write!(f, "{c}")
                }
            }
            Regex::Concat(parts) => parts.iter().try_for_each(|p| p.fmt_operand(f, 2)),
            Regex::Union(parts) => {
                for (i, p) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    p.fmt_operand(f, 1)?;
                }
                Ok(())
            }
            Regex::Star(inner) => {
                inner.fmt_operand(f, 3)?;
                write!(f, "*")
            }
            Regex::Plus(inner) => {
                inner.fmt_operand(f, 3)?;
                write!(f, "+")
            }
            Regex::Optional(inner) => {
                inner.fmt_operand(f, 3)?;
                write!(f, "?")
            }
        }
    }
}

struct RegexParser {
    chars: Vec<char>,
    position: usize,
    depth: usize,
}

impl RegexParser {
    fn skip_spaces(&mut self) {
        while self.chars.get(self.position).is_some_and(|c| c.is_whitespace()) {
            self.position += 1;
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_spaces();
        self.chars.get(self.position).copied()
    }

    fn error(&self, kind: RegexErrorKind) -> RegexError {
        RegexError {
            position: self.position,
            kind,
        }
    }

    fn union(&mut self) -> Result<Regex, RegexError> {
        let mut alternatives = vec![self.concat()?];
        while self.peek() == Some('|') {
            self.position += 1;
            alternatives.push(self.concat()?);
        }

        Ok(if alternatives.len() == 1 {
            alternatives.remove(0)
        } else {
            Regex::Union(alternatives)
        })
    }

    fn concat(&mut self) -> Result<Regex, RegexError> {
        let mut factors = vec![self.kleene()?];
        while let Some(c) = self.peek()
            && c != '|'
            && c != ')'
        {
            factors.push(self.kleene()?);
        }

        Ok(if factors.len() == 1 {
            factors.remove(0)
        } else {
            Regex::Concat(factors)
        })
    }

    fn kleene(&mut self) -> Result<Regex, RegexError> {
        let mut regex = self.atom()?;
        loop {
            regex = match self.peek() {
                Some('*') => Regex::Star(Box::new(regex)),
                Some('+') => Regex::Plus(Box::new(regex)),
                Some('?') => Regex::Optional(Box::new(regex)),
                _ => return Ok(regex),
            };
            self.position += 1;
        }
    }

    fn atom(&mut self) -> Result<Regex, RegexError> {
        let Some(c) = self.peek() else {
            return Err(self.error(if self.depth > 0 {
                RegexErrorKind::MissingCloseParen
            } else {
                RegexErrorKind::UnexpectedEnd
            }));
        };

        match c {
            '(' => {
                self.position += 1;
                self.depth += 1;
                let inner = self.union()?;
                if self.peek() != Some(')') {
                    return Err(self.error(RegexErrorKind::MissingCloseParen));
                }
                self.position += 1;
                self.depth -= 1;
                Ok(inner)
            }
            ')' if self.depth == 0 => Err(self.error(RegexErrorKind::UnmatchedCloseParen)),
            '\\' => match self.chars.get(self.position + 1) {
                Some(&escaped) => {
                    self.position += 2;
                    Ok(Regex::Symbol(escaped))
                }
                None => Err(self.error(RegexErrorKind::DanglingEscape)),
            },
            EPSILON_CHAR => {
                self.position += 1;
                Ok(Regex::Epsilon)
            }
            EMPTY_SET => {
                self.position += 1;
                Ok(Regex::Empty)
            }
            '|' | ')' | '*' | '+' | '?' => Err(self.error(RegexErrorKind::UnexpectedChar(c))),
            c => {
                self.position += 1;
                Ok(Regex::Symbol(c))
            }
        }
    }
}

#[test]
fn test_parse_precedence() {
    let regex = Regex::parse("ab|c*").unwrap();
    assert_eq!(
        regex,
        Regex::Union(vec![
            Regex::Concat(vec![Regex::Symbol('a'), Regex::Symbol('b')]),
            Regex::Star(Box::new(Regex::Symbol('c'))),
        ])
    );
    assert_eq!(regex.to_string(), "ab|c*");
}

#[test]
fn test_parse_groups_and_escapes() {
    let regex = Regex::parse("( a | \\* ) +").unwrap();
    assert_eq!(
        regex,
        Regex::Plus(Box::new(Regex::Union(vec![
            Regex::Symbol('a'),
            Regex::Symbol('*')
        ])))
    );
    assert_eq!(regex.to_string(), "(a|\\*)+");
    assert_eq!(Regex::parse(&regex.to_string()), Ok(regex));
}

#[test]
fn test_parse_errors() {
    let error = |s: &str| Regex::parse(s).unwrap_err();

    assert_eq!(error("").kind, RegexErrorKind::UnexpectedEnd);
    assert_eq!(
        error("a|"),
        RegexError {
            position: 2,
            kind: RegexErrorKind::UnexpectedEnd
        }
    );
    assert_eq!(error("(ab").kind, RegexErrorKind::MissingCloseParen);
    assert_eq!(error("(ab").position, 3);
    assert_eq!(error("ab)").kind, RegexErrorKind::UnmatchedCloseParen);
    assert_eq!(error("ab)").position, 2);
    assert_eq!(error("*a").kind, RegexErrorKind::UnexpectedChar('*'));
    assert_eq!(error("a\\").kind, RegexErrorKind::DanglingEscape);
    assert_eq!(error("a||b").position, 2);
}

#[test]
fn test_smart_constructors() {
    let a = Regex::Symbol('a');
    let b = Regex::Symbol('b');

    assert_eq!(Regex::Epsilon.concat(a.clone()), a);
    assert_eq!(Regex::Empty.concat(a.clone()), Regex::Empty);
    assert_eq!(Regex::Empty.union(a.clone()), a);
    assert_eq!(a.clone().union(a.clone()), a);
    assert_eq!(
        Regex::Epsilon.union(a.clone()),
        Regex::Optional(Box::new(a.clone()))
    );
    assert_eq!(
        Regex::Epsilon.union(b.clone().star()),
        Regex::Star(Box::new(b.clone()))
    );
    assert_eq!(Regex::Empty.star(), Regex::Epsilon);
    assert_eq!(Regex::Empty.to_string(), "∅");
}

#[test]
fn test_empty_set_literal() {
    assert_eq!(Regex::parse("∅"), Ok(Regex::Empty));
    assert_eq!(Regex::Symbol(EMPTY_SET).to_string(), "\\∅");
    assert_eq!(Regex::parse("\\∅"), Ok(Regex::Symbol(EMPTY_SET)));
}
