use serde::{Deserialize, Serialize};

/// A lexical or syntactic error. Fatal: the run that produced it stops
/// at the offending construct.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyntaxError {
    pub file: String,
    /// 1-based line of the offending token.
    pub line: u32,
    pub message: String,
}

impl SyntaxError {
    pub fn lex(file: &str, line: u32, message: impl Into<String>) -> Self {
        SyntaxError {
            file: file.to_owned(),
            line,
            message: message.into(),
        }
    }

    pub fn parse(file: &str, line: u32, message: impl Into<String>) -> Self {
        SyntaxError {
            file: file.to_owned(),
            line,
            message: message.into(),
        }
    }

    /// Serialize for the machine-readable CLI output mode.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "file":    self.file,
            "line":    self.line,
            "message": self.message,
        })
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.message)
    }
}

impl std::error::Error for SyntaxError {}
