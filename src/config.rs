//! Interpreter settings chosen at startup.

use crate::error::ShellError;
use crate::lexer;
use crate::redirect::RedirectScan;

/// Interpreter settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    /// Text printed before each input line.
    pub prompt: String,
    /// How redirection operators are found in a line.
    pub redirect_scan: RedirectScan,
    /// Reject lines that end inside a quote instead of closing the word silently.
    pub strict_quotes: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "$ ".to_string(),
            redirect_scan: RedirectScan::Raw,
            strict_quotes: false,
        }
    }
}

impl ShellConfig {
    /// Split command text into words according to `strict_quotes`.
    pub fn tokenize(&self, text: &str) -> Result<Vec<String>, ShellError> {
        if self.strict_quotes {
            lexer::split_into_tokens_strict(text)
        } else {
            Ok(lexer::split_into_tokens(text))
        }
    }
}
