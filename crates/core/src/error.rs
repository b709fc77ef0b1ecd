use std::fmt;

use serde::{Deserialize, Serialize};

/// Pipeline stage that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Preprocess,
    Parse,
    Validate,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Preprocess => "preprocess",
            Stage::Parse => "parse",
            Stage::Validate => "validate",
        }
    }
}

/// A single parse or validation diagnostic.
///
/// Diagnostics are append-only per parse call; their order is discovery
/// order. `line` is the 1-based line in the original input, absent for
/// checks that run on the finished model rather than on text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Diagnostic {
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(stage: Stage, line: Option<u32>, message: impl Into<String>) -> Self {
        Diagnostic {
            stage,
            line,
            message: message.into(),
        }
    }

    pub fn preprocess(line: u32, message: impl Into<String>) -> Self {
        Diagnostic::new(Stage::Preprocess, Some(line), message)
    }

    pub fn parse(line: u32, message: impl Into<String>) -> Self {
        Diagnostic::new(Stage::Parse, Some(line), message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Diagnostic::new(Stage::Validate, None, message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "L{}: {}", line, self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_line_when_known() {
        let d = Diagnostic::parse(12, "missing closing ')'");
        assert_eq!(d.to_string(), "L12: missing closing ')'");
    }

    #[test]
    fn display_plain_for_validation_messages() {
        let d = Diagnostic::validation("block 0: must have exactly 8 vertices");
        assert_eq!(d.to_string(), "block 0: must have exactly 8 vertices");
    }

    #[test]
    fn serializes_stage_lowercase() {
        let d = Diagnostic::preprocess(3, "bad eval");
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["stage"], "preprocess");
        assert_eq!(json["line"], 3);
    }
}
