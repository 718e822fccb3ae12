use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::label::{LabelCodec, LabelError};

/// A Mealy transition `input/output`: consumes one symbol and emits `output`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MealyEntry {
    pub input: char,
    pub output: String,
}

impl MealyEntry {
    pub fn new(input: char, output: impl Into<String>) -> Self {
        MealyEntry {
            input,
            output: output.into(),
        }
    }
}

impl LabelCodec for MealyEntry {
    fn parse(label: &str) -> Result<Self, LabelError> {
        let Some((input, output)) = label.split_once('/') else {
            return Err(LabelError::new(
                label,
                label.chars().count(),
                "expected `input/output`",
            ));
        };

        let mut chars = input.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(MealyEntry::new(c, output.trim())),
            (None, _) => Err(LabelError::new(label, 0, "missing input symbol")),
            (Some(_), Some(_)) => Err(LabelError::new(
                label,
                input.chars().take_while(|c| c.is_whitespace()).count() + 1,
                "input must be a single symbol",
            )),
        }
    }
}

impl Display for MealyEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.input, self.output)
    }
}

#[test]
fn test_mealy_entry() {
    let entry = MealyEntry::parse("a/01").unwrap();
    assert_eq!(entry, MealyEntry::new('a', "01"));
    assert_eq!(entry.to_string(), "a/01");

    assert_eq!(MealyEntry::parse("b/"), Ok(MealyEntry::new('b', "")));
    assert_eq!(MealyEntry::parse("ab").unwrap_err().position, 2);
    assert_eq!(MealyEntry::parse("ab/x").unwrap_err().position, 1);
}
