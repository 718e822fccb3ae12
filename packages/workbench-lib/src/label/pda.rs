use std::fmt::Display;

use nom::Parser;
use serde::{Deserialize, Serialize};

use crate::label::{
    LabelCodec, LabelError, LabelResult, arrow, fmt_optional_symbol, optional_symbol,
    parse_complete, plain::EPSILON_CHAR, separator,
};

/// A pushdown transition `input, pop → push`. `None` in `input` or `pop`
/// means epsilon. The first character of `push` ends up on top of the stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PdaEntry {
    pub input: Option<char>,
    pub pop: Option<char>,
    pub push: String,
}

impl PdaEntry {
    pub fn new(input: Option<char>, pop: Option<char>, push: impl Into<String>) -> Self {
        PdaEntry {
            input,
            pop,
            push: push.into(),
        }
    }
}

fn push_string(input: &str) -> LabelResult<'_, String> {
    let trimmed = input.trim();
    let push = if trimmed == EPSILON_CHAR.to_string() {
        String::new()
    } else {
        trimmed
            .chars()
            .filter(|c| *c != EPSILON_CHAR && !c.is_whitespace())
            .collect()
    };
    Ok(("", push))
}

fn pda_entry(input: &str) -> LabelResult<'_, PdaEntry> {
    let (input, read) = optional_symbol(input)?;
    let (input, _) = separator(",").parse(input)?;
    let (input, pop) = optional_symbol(input)?;
    let (input, _) = arrow(input)?;
    let (input, push) = push_string(input)?;

    Ok((
        input,
        PdaEntry {
            input: read,
            pop,
            push,
        },
    ))
}

impl LabelCodec for PdaEntry {
    fn parse(label: &str) -> Result<Self, LabelError> {
        parse_complete(label.trim_start(), "`input, pop → push`", pda_entry).map_err(|mut e| {
            e.label = label.to_string();
            e.position += label.chars().count() - label.trim_start().chars().count();
            e
        })
    }
}

impl Display for PdaEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let push = if self.push.is_empty() {
            EPSILON_CHAR.to_string()
        } else {
            self.push.clone()
        };
        write!(
            f,
            "{}, {} → {}",
            fmt_optional_symbol(&self.input),
            fmt_optional_symbol(&self.pop),
            push
        )
    }
}

#[test]
fn test_pda_entry_1() {
    let entry = PdaEntry::parse("a, Z → AZ").unwrap();
    assert_eq!(entry, PdaEntry::new(Some('a'), Some('Z'), "AZ"));
    assert_eq!(entry.to_string(), "a, Z → AZ");
}

#[test]
fn test_pda_entry_epsilon_slots() {
    let entry = PdaEntry::parse("ε,ε->ε").unwrap();
    assert_eq!(entry, PdaEntry::new(None, None, ""));
    assert_eq!(entry.to_string(), "ε, ε → ε");
}

#[test]
fn test_pda_entry_missing_arrow() {
    let err = PdaEntry::parse("a, Z AZ").unwrap_err();
    assert_eq!(err.position, 5);
}
