use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::label::{LabelCodec, LabelError};

/// A Moore state label `name/output`. Unlike the other codecs this one is
/// applied to state labels, not edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MooreLabel {
    pub name: String,
    pub output: String,
}

impl MooreLabel {
    pub fn new(name: impl Into<String>, output: impl Into<String>) -> Self {
        MooreLabel {
            name: name.into(),
            output: output.into(),
        }
    }
}

impl LabelCodec for MooreLabel {
    fn parse(label: &str) -> Result<Self, LabelError> {
        // the output may itself contain slashes, the name may not
        let Some((name, output)) = label.split_once('/') else {
            return Err(LabelError::new(
                label,
                label.chars().count(),
                "expected `name/output`",
            ));
        };

        if name.trim().is_empty() {
            return Err(LabelError::new(label, 0, "missing state name"));
        }

        Ok(MooreLabel::new(name.trim(), output.trim()))
    }
}

impl Display for MooreLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name, self.output)
    }
}

#[test]
fn test_moore_label() {
    let label = MooreLabel::parse("q0 / 1").unwrap();
    assert_eq!(label, MooreLabel::new("q0", "1"));
    assert_eq!(label.to_string(), "q0/1");

    assert_eq!(MooreLabel::parse("q1").unwrap_err().position, 2);
    assert_eq!(MooreLabel::parse("/1").unwrap_err().position, 0);
}
