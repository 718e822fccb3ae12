//! Per-mode edge and state label syntax.
//!
//! Labels are plain strings in the graph model; the codec of the active mode
//! turns each of them into a structured entry. The textual forms are:
//!
//! | mode    | syntax                      | example     |
//! |---------|-----------------------------|-------------|
//! | DFA/NFA | `symbol` or `ε`             | `a`         |
//! | PDA     | `input, pop → push`         | `a, Z → AZ` |
//! | TM      | `read → write, L\|R\|S`     | `a → *, R`  |
//! | Mealy   | `input/output`              | `a/01`      |
//! | Moore   | `name/output` (state label) | `q0/1`      |

use std::fmt::{Debug, Display};

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{anychar, space0},
    combinator::value,
};
use thiserror::Error;

pub mod mealy;
pub mod moore;
pub mod pda;
pub mod plain;
pub mod tm;

pub use mealy::MealyEntry;
pub use moore::MooreLabel;
pub use pda::PdaEntry;
pub use plain::PlainEntry;
pub use tm::{Direction, TapeSymbol, TmEntry};

/// A label that could not be parsed. `position` is a character offset into
/// `label`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed label `{label}` at position {position}: {message}")]
pub struct LabelError {
    pub label: String,
    pub position: usize,
    pub message: String,
}

impl LabelError {
    pub fn new(label: &str, position: usize, message: impl Into<String>) -> Self {
        LabelError {
            label: label.to_string(),
            position,
            message: message.into(),
        }
    }

    /// Builds an error from the unconsumed remainder of `label`.
    fn at_remainder(label: &str, remainder: &str, message: impl Into<String>) -> Self {
        let consumed = &label[..label.len() - remainder.len()];
        LabelError::new(label, consumed.chars().count(), message)
    }
}

/// A structured label entry that can be parsed from and formatted back to its
/// textual form.
pub trait LabelCodec: Debug + Clone + PartialEq + Display + Sized {
    fn parse(label: &str) -> Result<Self, LabelError>;
}

type LabelResult<'a, T> = IResult<&'a str, T, nom::error::Error<&'a str>>;

/// Runs `parser` on the whole label, requiring that only whitespace remains.
fn parse_complete<'a, T>(
    label: &'a str,
    expected: &str,
    mut parser: impl Parser<&'a str, Output = T, Error = nom::error::Error<&'a str>>,
) -> Result<T, LabelError> {
    match parser.parse(label) {
        Ok((rest, entry)) => {
            if rest.trim().is_empty() {
                Ok(entry)
            } else {
                Err(LabelError::at_remainder(
                    label,
                    rest,
                    format!("unexpected trailing input, expected {expected}"),
                ))
            }
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(LabelError::at_remainder(
            label,
            e.input,
            format!("expected {expected}"),
        )),
        Err(nom::Err::Incomplete(_)) => Err(LabelError::new(
            label,
            label.chars().count(),
            format!("unexpected end of label, expected {expected}"),
        )),
    }
}

fn ws(input: &str) -> LabelResult<'_, &str> {
    space0(input)
}

fn lit<'a>(text: &'static str) -> impl Fn(&'a str) -> LabelResult<'a, &'a str> {
    move |input| tag(text)(input)
}

fn any_symbol(input: &str) -> LabelResult<'_, char> {
    anychar(input)
}

fn arrow(input: &str) -> LabelResult<'_, ()> {
    let (input, _) = ws(input)?;
    let (input, _) = alt((lit("→"), lit("->"))).parse(input)?;
    let (input, _) = ws(input)?;
    Ok((input, ()))
}

fn separator<'a>(sep: &'static str) -> impl Fn(&'a str) -> LabelResult<'a, ()> {
    move |input| {
        let (input, _) = ws(input)?;
        let (input, _) = lit(sep)(input)?;
        let (input, _) = ws(input)?;
        Ok((input, ()))
    }
}

/// A single symbol slot where `ε` stands for "no symbol".
fn optional_symbol(input: &str) -> LabelResult<'_, Option<char>> {
    alt((
        value(None, lit(plain::EPSILON_CHAR_STR)),
        any_symbol.map(Some),
    ))
    .parse(input)
}

fn fmt_optional_symbol(symbol: &Option<char>) -> String {
    match symbol {
        Some(c) => c.to_string(),
        None => plain::EPSILON_CHAR_STR.to_string(),
    }
}

#[test]
fn test_label_error_position_counts_chars() {
    let err = PdaEntry::parse("ε, Z ⇒ A").unwrap_err();
    assert_eq!(err.position, 5);
    assert_eq!(err.label, "ε, Z ⇒ A");
}
