use std::fmt::Display;

use nom::{Parser, branch::alt, combinator::value};
use serde::{Deserialize, Serialize};

use crate::label::{
    LabelCodec, LabelError, LabelResult, any_symbol, arrow, lit, parse_complete, separator,
};

/// The symbol of a tape cell that was never written.
pub const BLANK: char = '□';
pub const WILDCARD: char = '*';

/// A symbol slot of a TM transition. On the read side the wildcard matches
/// any symbol, on the write side it leaves the cell unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TapeSymbol {
    Wildcard,
    Symbol(char),
}

impl TapeSymbol {
    pub fn matches(&self, symbol: char) -> bool {
        match self {
            TapeSymbol::Wildcard => true,
            TapeSymbol::Symbol(s) => *s == symbol,
        }
    }

    /// The symbol left in a cell currently holding `current`.
    pub fn write_over(&self, current: char) -> char {
        match self {
            TapeSymbol::Wildcard => current,
            TapeSymbol::Symbol(s) => *s,
        }
    }
}

impl Display for TapeSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TapeSymbol::Wildcard => write!(f, "{WILDCARD}"),
            TapeSymbol::Symbol(c) => write!(f, "{c}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Stay,
}

impl Direction {
    pub fn offset(&self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
            Direction::Stay => 0,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Left => write!(f, "L"),
            Direction::Right => write!(f, "R"),
            Direction::Stay => write!(f, "S"),
        }
    }
}

/// A Turing machine transition `read → write, direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TmEntry {
    pub read: TapeSymbol,
    pub write: TapeSymbol,
    pub direction: Direction,
}

impl TmEntry {
    pub fn new(read: TapeSymbol, write: TapeSymbol, direction: Direction) -> Self {
        TmEntry {
            read,
            write,
            direction,
        }
    }
}

fn tape_symbol(input: &str) -> LabelResult<'_, TapeSymbol> {
    alt((
        value(TapeSymbol::Wildcard, lit("*")),
        any_symbol.map(TapeSymbol::Symbol),
    ))
    .parse(input)
}

fn direction(input: &str) -> LabelResult<'_, Direction> {
    alt((
        value(Direction::Left, lit("L")),
        value(Direction::Right, lit("R")),
        value(Direction::Stay, lit("S")),
    ))
    .parse(input)
}

fn tm_entry(input: &str) -> LabelResult<'_, TmEntry> {
    let (input, read) = tape_symbol(input)?;
    let (input, _) = arrow(input)?;
    let (input, write) = tape_symbol(input)?;
    let (input, _) = separator(",").parse(input)?;
    let (input, direction) = direction(input)?;

    Ok((
        input,
        TmEntry {
            read,
            write,
            direction,
        },
    ))
}

impl LabelCodec for TmEntry {
    fn parse(label: &str) -> Result<Self, LabelError> {
        let trimmed = label.trim_start();
        let skipped = label.chars().count() - trimmed.chars().count();
        parse_complete(trimmed, "`read → write, L|R|S`", tm_entry).map_err(|mut e| {
            e.label = label.to_string();
            e.position += skipped;
            e
        })
    }
}

impl Display for TmEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}, {}", self.read, self.write, self.direction)
    }
}

#[test]
fn test_tm_entry_1() {
    let entry = TmEntry::parse("a → b, R").unwrap();
    assert_eq!(
        entry,
        TmEntry::new(
            TapeSymbol::Symbol('a'),
            TapeSymbol::Symbol('b'),
            Direction::Right
        )
    );
    assert_eq!(entry.to_string(), "a → b, R");
}

#[test]
fn test_tm_entry_wildcards() {
    let entry = TmEntry::parse("*->*,S").unwrap();
    assert_eq!(
        entry,
        TmEntry::new(TapeSymbol::Wildcard, TapeSymbol::Wildcard, Direction::Stay)
    );
}

#[test]
fn test_tm_entry_bad_direction() {
    let err = TmEntry::parse("a → b, X").unwrap_err();
    assert_eq!(err.position, 7);
}
